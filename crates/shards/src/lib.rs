//! # shards
//!
//! split a bip39 recovery phrase into n mnemonic shares, any k of which
//! recover it.
//!
//! ## architecture
//!
//! ```text
//!   recovery phrase
//!        │ bip39 decode
//!        ▼
//!   ┌──────────┐
//!   │ entropy  │
//!   └────┬─────┘
//!        │ shamir over GF(256)
//!    ┌───┼───┐
//!    ▼   ▼   ▼
//!   raw shares        fragment ++ tag
//!    │   │   │ share codec
//!    ▼   ▼   ▼
//!   0xade1: drum wage genuine ...    tag ++ checksum : phrase
//! ```
//!
//! before any share is returned, every k-subset of the n shares is decoded,
//! combined and compared against the original phrase.
//!
//! ## security properties
//!
//! - fewer than k shares reveal nothing about the secret
//! - each share carries a one-byte xor checksum over its tag and fragment, so
//!   a mistyped word or identifier is rejected instead of silently producing
//!   a wrong phrase (an all-zero fragment is covered by its tag only)
//! - secret material is never logged
//!
//! ## usage
//!
//! ```rust,ignore
//! use shards::{Recoverer, Splitter};
//!
//! let set = Splitter::default().split(phrase, 5, 3)?;
//! for share in &set {
//!     println!("{share}");
//! }
//!
//! let recovered = Recoverer::default().recover(&set.shares[..3])?;
//! assert_eq!(recovered, phrase);
//! ```

pub mod codec;
pub mod combinations;
pub mod dictionary;
pub mod error;
pub mod mnemonic;
pub mod recover;
pub mod shamir;
pub mod share;
pub mod split;

pub use codec::{ParsedIdentifier, ShareCodec, ShareLine};
pub use combinations::{binomial, Combinations};
pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use mnemonic::{Bip39Codec, MnemonicCodec};
pub use recover::Recoverer;
pub use shamir::{SecretSharing, Shamir, SharingError};
pub use share::{checksum_byte, MnemonicShare, ShareSet};
pub use split::{SplitOptions, Splitter};
