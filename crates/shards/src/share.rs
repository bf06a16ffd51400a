//! share types and serialization
//!
//! a share is written down as `0x<identifier>: <phrase>`. the identifier is
//! the sharing tag followed by one checksum byte; the phrase renders the
//! share's fragment bytes with the same dictionary as the original secret.

use std::fmt;

use serde::{Deserialize, Serialize};

/// one transcribable share of a split secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MnemonicShare {
    /// sharing tag bytes plus a trailing checksum byte
    #[serde(with = "hex_bytes")]
    pub identifier: Vec<u8>,
    /// phrase rendering of the fragment bytes
    pub mnemonic: String,
}

impl MnemonicShare {
    /// tag bytes, without the checksum
    pub fn tag(&self) -> &[u8] {
        match self.identifier.split_last() {
            Some((_, tag)) => tag,
            None => &[],
        }
    }

    /// trailing checksum byte
    pub fn checksum(&self) -> Option<u8> {
        self.identifier.last().copied()
    }

    /// identifier as `0x`-prefixed hex
    pub fn identifier_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.identifier))
    }
}

impl fmt::Display for MnemonicShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.identifier_hex(), self.mnemonic)
    }
}

/// shares of one split, with the parameters they were made for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSet {
    pub threshold: usize,
    pub total: usize,
    pub shares: Vec<MnemonicShare>,
}

impl ShareSet {
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MnemonicShare> {
        self.shares.iter()
    }
}

impl IntoIterator for ShareSet {
    type Item = MnemonicShare;
    type IntoIter = std::vec::IntoIter<MnemonicShare>;

    fn into_iter(self) -> Self::IntoIter {
        self.shares.into_iter()
    }
}

impl<'a> IntoIterator for &'a ShareSet {
    type Item = &'a MnemonicShare;
    type IntoIter = std::slice::Iter<'a, MnemonicShare>;

    fn into_iter(self) -> Self::IntoIter {
        self.shares.iter()
    }
}

/// xor-fold over tag and fragment bytes
///
/// an all-zero fragment leaves only the tag in the fold, so such a share is
/// protected no better than its tag.
pub fn checksum_byte(tag: &[u8], data: &[u8]) -> u8 {
    tag.iter().chain(data).fold(0u8, |acc, b| acc ^ b)
}

/// hex serialization helper for serde
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}
