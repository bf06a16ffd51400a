//! share codec
//!
//! converts between the transcribable form (identifier + phrase) and the raw
//! form handed to the sharing scheme (fragment bytes + tag). every decode
//! recomputes the checksum byte, which is the only thing standing between a
//! mistyped share and a silently wrong recovery.
//!
//! identifiers are read as:
//! - `0x`-prefixed hex (`0xade1`, optionally with a trailing `:`)
//! - a single dictionary word packing a one-byte tag and three checksum bits
//! - bare hex (`ade1`) when the token is not a dictionary word

use crate::dictionary::Dictionary;
use crate::mnemonic::{normalize_phrase, Bip39Codec, MnemonicCodec, VALID_WORD_COUNTS};
use crate::shamir::TAG_LEN;
use crate::share::{checksum_byte, MnemonicShare};
use crate::{Error, Result};

/// checksum bits carried by a word identifier
const WORD_CHECKSUM_MASK: u8 = 0x07;

/// identifier text after parsing, before it is checked against a phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedIdentifier {
    /// full identifier bytes, checksum byte last
    Bytes(Vec<u8>),
    /// one-byte tag plus the low checksum bits
    Word { tag: u8, checksum_bits: u8 },
}

/// one line of a share file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLine {
    /// identifier token, colon stripped
    pub identifier: Option<String>,
    /// normalized phrase
    pub phrase: String,
}

/// share codec over a mnemonic codec and a fixed tag length
#[derive(Debug, Clone)]
pub struct ShareCodec<M = Bip39Codec> {
    mnemonic: M,
    tag_len: usize,
}

impl Default for ShareCodec<Bip39Codec> {
    fn default() -> Self {
        Self::new(Bip39Codec::default(), TAG_LEN)
    }
}

impl<M: MnemonicCodec> ShareCodec<M> {
    pub fn new(mnemonic: M, tag_len: usize) -> Self {
        Self { mnemonic, tag_len }
    }

    pub fn mnemonic(&self) -> &M {
        &self.mnemonic
    }

    pub fn dictionary(&self) -> &Dictionary {
        self.mnemonic.dictionary()
    }

    pub fn tag_len(&self) -> usize {
        self.tag_len
    }

    /// parse identifier text
    ///
    /// `0x` always means hex. otherwise a dictionary word wins over hex, so
    /// a word such as `face` is a word identifier unless written `0xface`.
    pub fn parse_identifier(&self, text: &str) -> Result<ParsedIdentifier> {
        let trimmed = text.trim();
        let token = trimmed.strip_suffix(':').unwrap_or(trimmed).trim();
        let invalid = |reason: &str| Error::InvalidIdentifier {
            identifier: text.to_string(),
            reason: reason.to_string(),
        };

        if token.is_empty() {
            return Err(invalid("empty identifier"));
        }

        let hex_digits = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
            Some(digits) => digits,
            None => {
                if let Some(index) = self.dictionary().index_of(token) {
                    if self.tag_len != 1 {
                        return Err(invalid("word identifiers need a one-byte tag"));
                    }
                    return Ok(ParsedIdentifier::Word {
                        tag: (index >> 3) as u8,
                        checksum_bits: index as u8 & WORD_CHECKSUM_MASK,
                    });
                }
                token
            }
        };

        let bytes = hex::decode(hex_digits).map_err(|e| invalid(&e.to_string()))?;
        if bytes.is_empty() {
            return Err(invalid("empty identifier"));
        }
        Ok(ParsedIdentifier::Bytes(bytes))
    }

    /// build a share from identifier text and a phrase, verifying the checksum
    pub fn decode(&self, identifier: &str, phrase: &str) -> Result<MnemonicShare> {
        match self.parse_identifier(identifier)? {
            ParsedIdentifier::Bytes(bytes) => self.from_parts(bytes, phrase),
            ParsedIdentifier::Word { tag, checksum_bits } => {
                let entropy = self.mnemonic.decode(phrase)?;
                let expected = checksum_byte(&[tag], &entropy);
                if expected & WORD_CHECKSUM_MASK != checksum_bits {
                    return Err(Error::ChecksumMismatch {
                        identifier: identifier.trim().to_string(),
                        expected: expected & WORD_CHECKSUM_MASK,
                        actual: checksum_bits,
                    });
                }
                Ok(MnemonicShare {
                    identifier: vec![tag, expected],
                    mnemonic: normalize_phrase(phrase),
                })
            }
        }
    }

    /// build a share from identifier bytes and a phrase, verifying the checksum
    pub fn from_parts(&self, identifier: Vec<u8>, phrase: &str) -> Result<MnemonicShare> {
        let share = MnemonicShare {
            identifier,
            mnemonic: normalize_phrase(phrase),
        };
        self.to_raw(&share)?;
        Ok(share)
    }

    /// turn a raw `fragment ++ tag` share into its transcribable form
    pub fn encode_from_raw(&self, raw: &[u8]) -> Result<MnemonicShare> {
        let min = self.tag_len + 1;
        if raw.len() < min {
            return Err(Error::InvalidRawShareLength {
                len: raw.len(),
                min,
            });
        }

        let (data, tag) = raw.split_at(raw.len() - self.tag_len);
        let mut identifier = Vec::with_capacity(tag.len() + 1);
        identifier.extend_from_slice(tag);
        identifier.push(checksum_byte(tag, data));

        Ok(MnemonicShare {
            identifier,
            mnemonic: self.mnemonic.encode(data)?,
        })
    }

    /// raw `fragment ++ tag` bytes of a share, after checking its checksum
    pub fn to_raw(&self, share: &MnemonicShare) -> Result<Vec<u8>> {
        let Some(actual) = share.checksum() else {
            return Err(Error::InvalidIdentifier {
                identifier: String::new(),
                reason: "empty identifier".into(),
            });
        };

        let mut raw = self.mnemonic.decode(&share.mnemonic)?;
        let tag = share.tag();
        // leading zero bytes leave the checksum unchanged
        if tag.len() != self.tag_len {
            return Err(Error::InvalidIdentifier {
                identifier: share.identifier_hex(),
                reason: format!("expected {} tag bytes, got {}", self.tag_len, tag.len()),
            });
        }
        let expected = checksum_byte(tag, &raw);
        if expected != actual {
            return Err(Error::ChecksumMismatch {
                identifier: share.identifier_hex(),
                expected,
                actual,
            });
        }

        raw.extend_from_slice(tag);
        Ok(raw)
    }

    /// `0x<identifier>: <phrase>`
    pub fn render(&self, share: &MnemonicShare) -> String {
        share.to_string()
    }

    /// single dictionary word for a two-byte identifier
    pub fn identifier_word(&self, share: &MnemonicShare) -> Option<&'static str> {
        match share.identifier.as_slice() {
            &[tag, checksum] => {
                let index = (tag as u16) << 3 | (checksum & WORD_CHECKSUM_MASK) as u16;
                self.dictionary().word(index)
            }
            _ => None,
        }
    }

    /// `<word>: <phrase>`, when the identifier packs into one word
    pub fn render_word(&self, share: &MnemonicShare) -> Option<String> {
        self.identifier_word(share)
            .map(|word| format!("{}: {}", word, share.mnemonic))
    }

    /// split a share-file line into identifier and phrase
    ///
    /// the leading token is the identifier when it ends with `:`, starts with
    /// `0x`, or when dropping it leaves a valid phrase length.
    pub fn parse_line(&self, line: &str) -> Result<ShareLine> {
        let mut words: Vec<&str> = line.split_whitespace().collect();

        let identifier = match words.first() {
            Some(first) if is_identifier_token(first, words.len()) => {
                let token = first.strip_suffix(':').unwrap_or(first).to_string();
                words.remove(0);
                Some(token)
            }
            _ => None,
        };

        if !VALID_WORD_COUNTS.contains(&words.len()) {
            return Err(Error::InvalidMnemonic(format!(
                "mnemonic must contain {} words, got {}",
                word_counts(),
                words.len()
            )));
        }

        if let Some(word) = words.iter().find(|w| !self.dictionary().contains(w)) {
            return Err(Error::InvalidMnemonic(format!(
                "invalid word in mnemonic: {}",
                word
            )));
        }

        Ok(ShareLine {
            identifier,
            phrase: normalize_phrase(&words.join(" ")),
        })
    }

    /// parse a full `identifier: phrase` line into a checked share
    pub fn decode_line(&self, line: &str) -> Result<MnemonicShare> {
        let parsed = self.parse_line(line)?;
        let Some(identifier) = parsed.identifier else {
            return Err(Error::InvalidIdentifier {
                identifier: String::new(),
                reason: "share line has no identifier".into(),
            });
        };
        self.decode(&identifier, &parsed.phrase)
    }
}

fn is_identifier_token(token: &str, total_words: usize) -> bool {
    token.ends_with(':')
        || token.starts_with("0x")
        || token.starts_with("0X")
        || (!VALID_WORD_COUNTS.contains(&total_words)
            && VALID_WORD_COUNTS.contains(&(total_words - 1)))
}

fn word_counts() -> String {
    let counts: Vec<String> = VALID_WORD_COUNTS.iter().map(|c| c.to_string()).collect();
    counts.join(", ")
}
