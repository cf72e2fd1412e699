//! Power table for the 16-bit rolling hash.
//!
//! `H(w) = Σ value(w[i]) · B^(k-1-i)  (mod 2^16)` with `B = 16807`.
//! All arithmetic is `u16` wrapping arithmetic, so the modulus is implicit.

/// Multiplicative base of the rolling hash.
pub const ROLL_BASE: u16 = 16_807;

/// Inverse of [`ROLL_BASE`] modulo 2^16.
pub const ROLL_BASE_INV: u16 = inverse_mod_2_16(ROLL_BASE);

/// Bucket count addressed by a rolling hash.
pub const ROLLING_BUCKETS: usize = 1 << 16;

/// Newton iteration for an odd `a`; precision doubles from 3 bits each round.
const fn inverse_mod_2_16(a: u16) -> u16 {
    let mut x = a;
    let mut i = 0;
    while i < 4 {
        x = x.wrapping_mul(2u16.wrapping_sub(a.wrapping_mul(x)));
        i += 1;
    }
    x
}

/// Precomputed `v · B^p` for every symbol value `v < radix` and position `p < k`.
#[derive(Clone, Debug)]
pub struct PowerTable {
    k: usize,
    radix: usize,
    terms: Vec<u16>,
}

impl PowerTable {
    /// Build the table for words of length `k` over `radix` symbol values.
    pub fn new(k: usize, radix: usize) -> Self {
        let mut powers = Vec::with_capacity(k);
        let mut p: u16 = 1;
        for _ in 0..k {
            powers.push(p);
            p = p.wrapping_mul(ROLL_BASE);
        }
        let mut terms = vec![0u16; radix * k];
        for v in 0..radix {
            for (pos, &pw) in powers.iter().enumerate() {
                terms[v * k + pos] = (v as u16).wrapping_mul(pw);
            }
        }
        PowerTable { k, radix, terms }
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn radix(&self) -> usize {
        self.radix
    }

    /// Contribution of symbol value `v` at power `pos` (`pos = k-1` is the oldest symbol).
    #[inline]
    pub fn term(&self, v: u8, pos: usize) -> u16 {
        debug_assert!((v as usize) < self.radix && pos < self.k);
        self.terms[v as usize * self.k + pos]
    }

    /// From-scratch hash of a sequence of symbol values (Horner form).
    pub fn hash<I: IntoIterator<Item = u8>>(&self, values: I) -> u16 {
        values
            .into_iter()
            .fold(0u16, |h, v| h.wrapping_mul(ROLL_BASE).wrapping_add(v as u16))
    }
}
