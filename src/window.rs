//! Sliding window with O(1) forward and reverse-complement rolling hashes.
//!
//! Both buffers are mirrored rings of length `2k`: each symbol is written at
//! slot `i` and `i + k`, so the current window is always one contiguous slice.

use std::sync::Arc;

use crate::power::{ROLL_BASE, ROLL_BASE_INV};
use crate::scheme::FeatureScheme;

/// Rolling state of the last `k` valid symbols.
#[derive(Clone, Debug)]
pub struct Window {
    scheme: Arc<FeatureScheme>,
    fwd_buf: Vec<u8>,
    rev_buf: Vec<u8>,
    // last written forward slot; the window starts one past it
    fwd_slot: usize,
    rev_head: usize,
    fwd_hash: u16,
    rev_hash: u16,
    run: usize,
}

impl Window {
    pub fn new(scheme: Arc<FeatureScheme>) -> Self {
        let k = scheme.k();
        let rev_len = if scheme.folds_strands() { 2 * k } else { 0 };
        Window {
            fwd_buf: vec![0; 2 * k],
            rev_buf: vec![0; rev_len],
            fwd_slot: k - 1,
            rev_head: 0,
            fwd_hash: 0,
            rev_hash: 0,
            run: 0,
            scheme,
        }
    }

    #[inline]
    pub fn scheme(&self) -> &Arc<FeatureScheme> {
        &self.scheme
    }

    /// Drop the current run. Buffers are left as is; they are fully
    /// overwritten before the next complete window.
    #[inline]
    pub fn reset(&mut self) {
        self.fwd_hash = 0;
        self.rev_hash = 0;
        self.run = 0;
    }

    /// Number of consecutive valid symbols, capped at `k`.
    #[inline]
    pub fn run(&self) -> usize {
        self.run
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.run == self.scheme.k()
    }

    /// Push one raw byte. Returns `true` when a complete feature is available.
    /// An invalid byte resets the run.
    #[inline]
    pub fn push(&mut self, raw: u8) -> bool {
        let alphabet = self.scheme.alphabet();
        let Some((c, v)) = alphabet.symbol(raw) else {
            self.reset();
            return false;
        };
        let k = self.scheme.k();
        let powers = self.scheme.powers();
        let was_full = self.run == k;

        // Forward: drop the oldest symbol, shift in c
        let slot = (self.fwd_slot + 1) % k;
        if was_full {
            let out = alphabet.value(self.fwd_buf[slot]);
            self.fwd_hash = self.fwd_hash.wrapping_sub(powers.term(out, k - 1));
        } else {
            self.run += 1;
        }
        self.fwd_buf[slot] = c;
        self.fwd_buf[slot + k] = c;
        self.fwd_slot = slot;
        self.fwd_hash = self.fwd_hash.wrapping_mul(ROLL_BASE).wrapping_add(v as u16);

        // Reverse complement: complement enters on the left, oldest leaves on the right
        if self.scheme.folds_strands() {
            let cc = alphabet.complement(c).unwrap_or(c);
            let head = (self.rev_head + k - 1) % k;
            let mut h = self.rev_hash;
            if was_full {
                let out = alphabet.value(self.rev_buf[head]);
                h = h.wrapping_sub(powers.term(out, 0));
            }
            h = h
                .wrapping_mul(ROLL_BASE_INV)
                .wrapping_add(powers.term(alphabet.value(cc), k - 1));
            self.rev_hash = h;
            self.rev_buf[head] = cc;
            self.rev_buf[head + k] = cc;
            self.rev_head = head;
        }

        self.run == k
    }

    /// Forward window; meaningful only when [`is_full`](Self::is_full).
    #[inline]
    pub fn forward(&self) -> &[u8] {
        let start = self.fwd_slot + 1;
        &self.fwd_buf[start..start + self.scheme.k()]
    }

    #[inline]
    pub fn forward_hash(&self) -> u16 {
        self.fwd_hash
    }

    /// Reverse-complement window; empty unless strands are folded.
    #[inline]
    pub fn reverse(&self) -> &[u8] {
        if self.rev_buf.is_empty() {
            return &[];
        }
        &self.rev_buf[self.rev_head..self.rev_head + self.scheme.k()]
    }

    #[inline]
    pub fn reverse_hash(&self) -> u16 {
        self.rev_hash
    }

    /// Canonical feature and its unmasked rolling hash.
    #[inline]
    pub fn canonical(&self) -> (&[u8], u16) {
        if self.scheme.folds_strands() {
            self.scheme
                .choose_strand(self.forward(), self.fwd_hash, self.reverse(), self.rev_hash)
        } else {
            (self.forward(), self.fwd_hash)
        }
    }
}
