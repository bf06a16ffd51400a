//! error types for shards

use thiserror::Error;

use crate::shamir::SharingError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // === codec errors ===
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("invalid identifier {identifier:?}: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("invalid checksum on share {identifier} (expected: {expected:02x}, got: {actual:02x})")]
    ChecksumMismatch {
        identifier: String,
        expected: u8,
        actual: u8,
    },

    #[error("invalid share length: {len} bytes, need at least {min}")]
    InvalidRawShareLength { len: usize, min: usize },

    // === split errors ===
    #[error("invalid threshold {threshold}-of-{total}: {reason}")]
    ThresholdInvalid {
        threshold: usize,
        total: usize,
        reason: String,
    },

    #[error("failed to split secret: {0}")]
    SplitFailed(#[source] SharingError),

    #[error("verification failed for shares {}: {reason}", one_based(.subset))]
    VerificationFailed { subset: Vec<usize>, reason: String },

    // === recover errors ===
    #[error("at least two shares are required to recover the secret, got {0}")]
    InsufficientShares(usize),

    #[error("failed to recover secret: {0}")]
    CombineFailed(#[source] SharingError),

    #[error("share {}: {source}", .index + 1)]
    Share {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// attach the position of the offending share
    pub(crate) fn at_share(self, index: usize) -> Self {
        Error::Share {
            index,
            source: Box::new(self),
        }
    }

    /// the underlying error kind, with share positions peeled off
    pub fn root(&self) -> &Error {
        match self {
            Error::Share { source, .. } => source.root(),
            other => other,
        }
    }
}

fn one_based(subset: &[usize]) -> String {
    let numbers: Vec<String> = subset.iter().map(|i| (i + 1).to_string()).collect();
    format!("[{}]", numbers.join(", "))
}
