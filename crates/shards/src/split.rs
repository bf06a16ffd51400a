//! split a phrase into shares and prove every threshold subset recovers it
//!
//! shares only leave [`Splitter::split`] after each of the C(n, k) subsets of
//! size k has been decoded, combined and rendered back to the original
//! phrase. a single bad subset fails the whole split.

use tracing::{debug, info};

use crate::codec::ShareCodec;
use crate::combinations::{binomial, Combinations};
use crate::mnemonic::{Bip39Codec, MnemonicCodec};
use crate::recover::combine_raw;
use crate::shamir::{SecretSharing, Shamir, MAX_SHARES};
use crate::share::ShareSet;
use crate::{Error, Result};

/// default cap on the number of subsets verified per split
pub const DEFAULT_MAX_SUBSETS: u64 = 1_000_000;

/// knobs for [`Splitter`]
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// reject (n, k) pairs with more subsets than this
    pub max_subsets: u64,
    /// verify subsets on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            max_subsets: DEFAULT_MAX_SUBSETS,
            parallel: cfg!(feature = "parallel"),
        }
    }
}

/// split orchestrator
pub struct Splitter<S = Shamir, M = Bip39Codec> {
    sharing: S,
    codec: ShareCodec<M>,
    options: SplitOptions,
}

impl Default for Splitter<Shamir, Bip39Codec> {
    fn default() -> Self {
        let sharing = Shamir::new();
        let codec = ShareCodec::new(Bip39Codec::default(), sharing.tag_len());
        Self::new(sharing, codec)
    }
}

impl<S: SecretSharing, M: MnemonicCodec> Splitter<S, M> {
    pub fn new(sharing: S, codec: ShareCodec<M>) -> Self {
        Self {
            sharing,
            codec,
            options: SplitOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SplitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn codec(&self) -> &ShareCodec<M> {
        &self.codec
    }

    /// split `phrase` into `total` shares with a `threshold`-of-`total` policy
    ///
    /// # errors
    /// - `InvalidMnemonic` if the phrase does not decode
    /// - `ThresholdInvalid` if `threshold` is outside `1..=total`, `total`
    ///   exceeds the tag space, or verification would exceed the subset budget
    /// - `SplitFailed` if the sharing scheme rejects the parameters
    /// - `VerificationFailed` if any threshold subset fails to recover
    pub fn split(&self, phrase: &str, total: usize, threshold: usize) -> Result<ShareSet> {
        let secret = self.codec.mnemonic().decode(phrase)?;
        self.check_parameters(total, threshold)?;

        let raw = self
            .sharing
            .split(&secret, total, threshold)
            .map_err(Error::SplitFailed)?;

        let shares = raw
            .iter()
            .map(|r| self.codec.encode_from_raw(r))
            .collect::<Result<Vec<_>>>()?;

        let set = ShareSet {
            threshold,
            total,
            shares,
        };
        self.verify(&secret, &set)?;

        info!(total, threshold, "split verified");
        Ok(set)
    }

    fn check_parameters(&self, total: usize, threshold: usize) -> Result<()> {
        let invalid = |reason: String| Error::ThresholdInvalid {
            threshold,
            total,
            reason,
        };

        if threshold < 1 {
            return Err(invalid("threshold must be at least 1".into()));
        }
        if threshold > total {
            return Err(invalid("parts cannot be less than threshold".into()));
        }
        if total > MAX_SHARES {
            return Err(invalid(format!("at most {} shares are supported", MAX_SHARES)));
        }
        let subsets = binomial(total, threshold);
        if subsets > self.options.max_subsets {
            return Err(invalid(format!(
                "{} subsets to verify, limit is {}",
                subsets, self.options.max_subsets
            )));
        }
        Ok(())
    }

    /// check that every `threshold`-sized subset of `set` recovers `secret`
    pub fn verify(&self, secret: &[u8], set: &ShareSet) -> Result<()> {
        let expected = self.codec.mnemonic().encode(secret)?;

        // decode once, every subset borrows from here
        let raw = set
            .shares
            .iter()
            .enumerate()
            .map(|(i, share)| {
                self.codec.to_raw(share).map_err(|e| Error::VerificationFailed {
                    subset: vec![i],
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let subsets = Combinations::new(set.shares.len(), set.threshold);
        debug!(
            subsets = binomial(set.shares.len(), set.threshold),
            "verifying share subsets"
        );

        match self.first_failure(subsets, &raw, &expected) {
            Some((subset, reason)) => Err(Error::VerificationFailed { subset, reason }),
            None => Ok(()),
        }
    }

    /// first failing subset in enumeration order
    fn first_failure(
        &self,
        mut subsets: Combinations,
        raw: &[Vec<u8>],
        expected: &str,
    ) -> Option<(Vec<usize>, String)> {
        #[cfg(feature = "parallel")]
        if self.options.parallel {
            use rayon::prelude::*;
            let all: Vec<Vec<usize>> = subsets.collect();
            return all.into_par_iter().find_map_first(|subset| {
                self.check_subset(&subset, raw, expected)
                    .err()
                    .map(|reason| (subset, reason))
            });
        }

        subsets.find_map(|subset| {
            self.check_subset(&subset, raw, expected)
                .err()
                .map(|reason| (subset, reason))
        })
    }

    fn check_subset(
        &self,
        subset: &[usize],
        raw: &[Vec<u8>],
        expected: &str,
    ) -> std::result::Result<(), String> {
        let parts: Vec<&[u8]> = subset.iter().map(|&i| raw[i].as_slice()).collect();
        let phrase = combine_raw(&self.sharing, self.codec.mnemonic(), &parts)
            .map_err(|e| e.to_string())?;
        if phrase != expected {
            return Err("recovered phrase does not match the secret".into());
        }
        Ok(())
    }
}
