//! shamir secret sharing over GF(256)
//!
//! every secret byte gets its own random polynomial of degree `threshold - 1`
//! with the byte as intercept. a raw share is the polynomial values followed
//! by the one-byte x coordinate, `y_0 .. y_len ++ x`. x coordinates are a
//! random draw of distinct non-zero field elements.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{CryptoRng, RngCore, SeedableRng};
use thiserror::Error;

/// bytes appended to each raw share to tag its x coordinate
pub const TAG_LEN: usize = 1;

/// largest share count the one-byte tag space allows
pub const MAX_SHARES: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SharingError {
    #[error("cannot split an empty secret")]
    EmptySecret,

    #[error("parts cannot be less than threshold ({parts} < {threshold})")]
    PartsLessThanThreshold { parts: usize, threshold: usize },

    #[error("parts cannot exceed {MAX_SHARES}, got {0}")]
    TooManyParts(usize),

    #[error("threshold must be at least 2, got {0}")]
    ThresholdTooSmall(usize),

    #[error("less than two parts cannot be used to reconstruct the secret")]
    TooFewParts,

    #[error("parts must be at least {min} bytes, got {len}")]
    PartTooShort { len: usize, min: usize },

    #[error("all parts must be the same length")]
    LengthMismatch,

    #[error("duplicate part detected (x = {0:#04x})")]
    DuplicatePart(u8),
}

/// (k, n) threshold sharing of byte strings
pub trait SecretSharing: Send + Sync {
    /// number of trailing tag bytes in every raw share
    fn tag_len(&self) -> usize;

    /// split `secret` into `parts` raw shares, any `threshold` of which combine
    fn split(
        &self,
        secret: &[u8],
        parts: usize,
        threshold: usize,
    ) -> Result<Vec<Vec<u8>>, SharingError>;

    /// reconstruct the secret from raw shares of one split
    fn combine(&self, parts: &[&[u8]]) -> Result<Vec<u8>, SharingError>;
}

/// GF(256) multiplication using AES polynomial (x^8 + x^4 + x^3 + x + 1)
const fn gf256_mul_slow(a: u8, b: u8) -> u8 {
    let mut result = 0u8;
    let mut a = a;
    let mut b = b;

    while b != 0 {
        if b & 1 != 0 {
            result ^= a;
        }
        let hi = a & 0x80;
        a <<= 1;
        if hi != 0 {
            a ^= 0x1b;
        }
        b >>= 1;
    }
    result
}

/// exp/log tables over generator 3
static TABLES: ([u8; 255], [u8; 256]) = {
    let mut exp = [0u8; 255];
    let mut log = [0u8; 256];
    let mut x = 1u8;
    let mut i = 0;
    while i < 255 {
        exp[i] = x;
        log[x as usize] = i as u8;
        x = gf256_mul_slow(x, 3);
        i += 1;
    }
    (exp, log)
};

fn gf256_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let (exp, log) = &TABLES;
    let sum = log[a as usize] as usize + log[b as usize] as usize;
    exp[sum % 255]
}

/// b must be non-zero
fn gf256_div(a: u8, b: u8) -> u8 {
    debug_assert!(b != 0, "division by zero in GF(256)");
    if a == 0 {
        return 0;
    }
    let (exp, log) = &TABLES;
    let diff = 255 + log[a as usize] as usize - log[b as usize] as usize;
    exp[diff % 255]
}

/// evaluate polynomial at point x (horner)
fn poly_eval(coeffs: &[u8], x: u8) -> u8 {
    coeffs
        .iter()
        .rev()
        .fold(0u8, |acc, &c| gf256_mul(acc, x) ^ c)
}

/// lagrange basis values at x=0 for the given distinct x coordinates
fn lagrange_basis_at_zero(xs: &[u8]) -> Vec<u8> {
    xs.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let mut num = 1u8;
            let mut den = 1u8;
            for (j, &xj) in xs.iter().enumerate() {
                if i != j {
                    num = gf256_mul(num, xj); // (0 - xj) = xj in GF(256)
                    den = gf256_mul(den, xi ^ xj); // (xi - xj)
                }
            }
            gf256_div(num, den)
        })
        .collect()
}

/// shamir sharing with an owned rng
pub struct Shamir<R = StdRng> {
    rng: Mutex<R>,
}

impl Shamir<StdRng> {
    /// shamir sharing seeded from the operating system
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }
}

impl Default for Shamir<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> Shamir<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng: Mutex::new(rng) }
    }
}

impl<R: RngCore + CryptoRng + Send> SecretSharing for Shamir<R> {
    fn tag_len(&self) -> usize {
        TAG_LEN
    }

    fn split(
        &self,
        secret: &[u8],
        parts: usize,
        threshold: usize,
    ) -> Result<Vec<Vec<u8>>, SharingError> {
        if parts < threshold {
            return Err(SharingError::PartsLessThanThreshold { parts, threshold });
        }
        if parts > MAX_SHARES {
            return Err(SharingError::TooManyParts(parts));
        }
        if threshold < 2 {
            return Err(SharingError::ThresholdTooSmall(threshold));
        }
        if secret.is_empty() {
            return Err(SharingError::EmptySecret);
        }

        // a poisoned lock only means another split panicked mid-draw
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        // distinct x coordinates in 1..=255
        let xs: Vec<u8> = index::sample(&mut *rng, MAX_SHARES, parts)
            .into_iter()
            .map(|i| (i + 1) as u8)
            .collect();

        let mut shares: Vec<Vec<u8>> = xs
            .iter()
            .map(|_| Vec::with_capacity(secret.len() + TAG_LEN))
            .collect();

        let mut coeffs = vec![0u8; threshold];
        for &byte in secret {
            coeffs[0] = byte;
            rng.fill_bytes(&mut coeffs[1..]);
            for (share, &x) in shares.iter_mut().zip(&xs) {
                share.push(poly_eval(&coeffs, x));
            }
        }
        for (share, &x) in shares.iter_mut().zip(&xs) {
            share.push(x);
        }

        Ok(shares)
    }

    fn combine(&self, parts: &[&[u8]]) -> Result<Vec<u8>, SharingError> {
        combine_parts(parts)
    }
}

/// reconstruct a secret from raw shares (independent of the rng)
pub fn combine_parts(parts: &[&[u8]]) -> Result<Vec<u8>, SharingError> {
    if parts.len() < 2 {
        return Err(SharingError::TooFewParts);
    }

    let len = parts[0].len();
    if len < TAG_LEN + 1 {
        return Err(SharingError::PartTooShort { len, min: TAG_LEN + 1 });
    }
    if parts.iter().any(|p| p.len() != len) {
        return Err(SharingError::LengthMismatch);
    }

    let mut xs = Vec::with_capacity(parts.len());
    for part in parts {
        let x = part[len - 1];
        if xs.contains(&x) {
            return Err(SharingError::DuplicatePart(x));
        }
        xs.push(x);
    }

    let basis = lagrange_basis_at_zero(&xs);
    let secret = (0..len - TAG_LEN)
        .map(|i| {
            parts
                .iter()
                .zip(&basis)
                .fold(0u8, |acc, (part, &b)| acc ^ gf256_mul(part[i], b))
        })
        .collect();

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;

    fn seeded(seed: u64) -> Shamir<ChaCha20Rng> {
        Shamir::from_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_gf256_ops() {
        assert_eq!(gf256_mul(0, 0), 0);
        assert_eq!(gf256_mul(1, 1), 1);
        assert_eq!(gf256_mul(2, 2), 4);
        assert_eq!(gf256_mul(0x57, 0x83), 0xc1); // FIPS-197 example

        for a in 0..=255u8 {
            for b in 0..=255u8 {
                assert_eq!(gf256_mul(a, b), gf256_mul_slow(a, b), "{a} * {b}");
            }
        }

        for a in 1..=255u8 {
            assert_eq!(gf256_mul(a, gf256_div(1, a)), 1, "inverse failed for {}", a);
        }
    }

    #[test]
    fn test_split_combine() {
        let secret = [42u8; 32];
        let sharing = seeded(1);
        let shares = sharing.split(&secret, 3, 2).unwrap();
        assert_eq!(shares.len(), 3);
        assert!(shares.iter().all(|s| s.len() == 33));

        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            let recovered = sharing.combine(&[&shares[a][..], &shares[b][..]]).unwrap();
            assert_eq!(recovered, secret);
        }

        let all: Vec<&[u8]> = shares.iter().map(Vec::as_slice).collect();
        assert_eq!(sharing.combine(&all).unwrap(), secret);
    }

    #[test]
    fn test_tags_distinct_and_nonzero() {
        let shares = seeded(7).split(b"secret", MAX_SHARES, 3).unwrap();
        let mut tags: Vec<u8> = shares.iter().map(|s| s[s.len() - 1]).collect();
        assert!(!tags.contains(&0));
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), MAX_SHARES);
    }

    #[test]
    fn test_below_threshold_does_not_reconstruct() {
        let secret = b"this is a very secret message";
        let sharing = seeded(3);
        let shares = sharing.split(secret, 5, 3).unwrap();
        let recovered = sharing.combine(&[&shares[0][..], &shares[1][..]]).unwrap();
        assert_ne!(recovered.as_slice(), secret.as_slice());
    }

    #[test]
    fn test_seeded_split_is_deterministic() {
        let a = seeded(99).split(&[9u8; 16], 4, 3).unwrap();
        let b = seeded(99).split(&[9u8; 16], 4, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_errors() {
        let sharing = seeded(0);
        assert_eq!(
            sharing.split(&[1], 2, 3),
            Err(SharingError::PartsLessThanThreshold { parts: 2, threshold: 3 })
        );
        assert_eq!(sharing.split(&[1], 256, 2), Err(SharingError::TooManyParts(256)));
        assert_eq!(sharing.split(&[1], 3, 1), Err(SharingError::ThresholdTooSmall(1)));
        assert_eq!(sharing.split(&[], 3, 2), Err(SharingError::EmptySecret));
    }

    #[test]
    fn test_combine_errors() {
        let a: &[u8] = &[1, 2, 3];
        let b: &[u8] = &[4, 5, 3];
        let short: &[u8] = &[1, 2];
        assert_eq!(combine_parts(&[a]), Err(SharingError::TooFewParts));
        assert_eq!(combine_parts(&[a, short]), Err(SharingError::LengthMismatch));
        assert_eq!(combine_parts(&[a, b]), Err(SharingError::DuplicatePart(3)));
        assert_eq!(
            combine_parts(&[&[1u8][..], &[2u8][..]]),
            Err(SharingError::PartTooShort { len: 1, min: 2 })
        );
    }
}
