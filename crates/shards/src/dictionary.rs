//! word dictionary shared by phrases and word identifiers
//!
//! the dictionary is an explicit value handed to the mnemonic codec and the
//! share codec, so both always agree on the word list in use.

use bip39::Language;

/// fixed, ordered word list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dictionary {
    language: Language,
}

impl Dictionary {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn english() -> Self {
        Self::new(Language::English)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// word at `index`, if it is within the dictionary
    pub fn word(&self, index: u16) -> Option<&'static str> {
        self.language.word_list().get(index as usize).copied()
    }

    /// index of `word`, matched case-insensitively
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.language.find_word(&word.trim().to_lowercase())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index_of(word).is_some()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::english()
    }
}
