//! mnemonic phrase codec
//!
//! entropy ⇄ word phrase with the dictionary's built-in checksum. the share
//! codec and both orchestrators only see the [`MnemonicCodec`] trait; the
//! shipped implementation is bip39.

use bip39::Mnemonic;

use crate::dictionary::Dictionary;
use crate::{Error, Result};

/// word counts a bip39 phrase may have
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// entropy ⇄ phrase codec
pub trait MnemonicCodec: Send + Sync {
    /// render entropy as a phrase
    fn encode(&self, entropy: &[u8]) -> Result<String>;

    /// parse a phrase back into entropy, validating its checksum
    fn decode(&self, phrase: &str) -> Result<Vec<u8>>;

    fn is_valid(&self, phrase: &str) -> bool {
        self.decode(phrase).is_ok()
    }

    /// dictionary the phrases are written in
    fn dictionary(&self) -> &Dictionary;
}

/// bip39 codec over an explicit dictionary
#[derive(Debug, Clone, Default)]
pub struct Bip39Codec {
    dictionary: Dictionary,
}

impl Bip39Codec {
    pub fn new(dictionary: Dictionary) -> Self {
        Self { dictionary }
    }

    fn parse(&self, phrase: &str) -> Result<Mnemonic> {
        let normalized = normalize_phrase(phrase);
        Mnemonic::parse_in_normalized(self.dictionary.language(), &normalized)
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))
    }
}

impl MnemonicCodec for Bip39Codec {
    fn encode(&self, entropy: &[u8]) -> Result<String> {
        Mnemonic::from_entropy_in(self.dictionary.language(), entropy)
            .map(|m| m.to_string())
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))
    }

    fn decode(&self, phrase: &str) -> Result<Vec<u8>> {
        Ok(self.parse(phrase)?.to_entropy())
    }

    fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }
}

/// lower-case words joined by single spaces
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
