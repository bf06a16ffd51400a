//! recover a phrase from transcribed shares
//!
//! the threshold is not written on the shares, so recovery cannot tell when
//! too few were supplied: combining fewer than k shares yields a different,
//! well-formed phrase. only the floor of two shares is enforced here.

use tracing::info;

use crate::codec::ShareCodec;
use crate::mnemonic::{Bip39Codec, MnemonicCodec};
use crate::shamir::{SecretSharing, Shamir};
use crate::share::MnemonicShare;
use crate::{Error, Result};

/// fewest shares recovery accepts
pub const MIN_SHARES: usize = 2;

/// recover orchestrator
pub struct Recoverer<S = Shamir, M = Bip39Codec> {
    sharing: S,
    codec: ShareCodec<M>,
}

impl Default for Recoverer<Shamir, Bip39Codec> {
    fn default() -> Self {
        let sharing = Shamir::new();
        let codec = ShareCodec::new(Bip39Codec::default(), sharing.tag_len());
        Self::new(sharing, codec)
    }
}

impl<S: SecretSharing, M: MnemonicCodec> Recoverer<S, M> {
    pub fn new(sharing: S, codec: ShareCodec<M>) -> Self {
        Self { sharing, codec }
    }

    pub fn codec(&self) -> &ShareCodec<M> {
        &self.codec
    }

    /// recover the phrase the shares were split from
    ///
    /// # errors
    /// - `InsufficientShares` for fewer than two shares
    /// - `Share { index, .. }` wrapping `ChecksumMismatch`, `InvalidMnemonic`
    ///   or `InvalidIdentifier` for the first share that does not decode
    /// - `CombineFailed` if the sharing scheme rejects the set
    pub fn recover(&self, shares: &[MnemonicShare]) -> Result<String> {
        if shares.len() < MIN_SHARES {
            return Err(Error::InsufficientShares(shares.len()));
        }

        let raw = shares
            .iter()
            .enumerate()
            .map(|(i, share)| self.codec.to_raw(share).map_err(|e| e.at_share(i)))
            .collect::<Result<Vec<_>>>()?;

        let parts: Vec<&[u8]> = raw.iter().map(Vec::as_slice).collect();
        let phrase = combine_raw(&self.sharing, self.codec.mnemonic(), &parts)?;

        info!(shares = shares.len(), "recovered phrase");
        Ok(phrase)
    }
}

/// combine raw shares and render the result as a phrase
pub(crate) fn combine_raw<S, M>(sharing: &S, mnemonic: &M, parts: &[&[u8]]) -> Result<String>
where
    S: SecretSharing + ?Sized,
    M: MnemonicCodec + ?Sized,
{
    let secret = sharing.combine(parts).map_err(Error::CombineFailed)?;
    mnemonic.encode(&secret)
}
