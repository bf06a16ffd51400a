//! k-subsets of share positions
//!
//! yields every size-`k` subset of `0..n` exactly once, in lexicographic
//! order. the iterator is a value: clone it to restart the sequence.

/// lexicographic k-of-n index subsets
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }

    /// advance `indices` to the next subset in place
    fn step(&mut self) {
        let k = self.indices.len();
        // rightmost position that can still move right
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) else {
            self.done = true;
            return;
        };
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();
        self.step();
        Some(current)
    }
}

/// C(n, k), saturating at `u64::MAX`
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k) as u64;
    let n = n as u64;
    let mut result: u64 = 1;
    for i in 0..k {
        // exact at every step: result * (n - i) is divisible by (i + 1)
        result = match result.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return u64::MAX,
        };
    }
    result
}
