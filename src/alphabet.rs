//! Alphabet tables: raw byte → canonical byte → symbol value.
//!
//! Conventions
//! - A *canonical byte* is what the window stores: upper-case, folded
//!   (RY-coding, amino-acid classes, U written as T).
//! - Symbol values are `1..radix`; `0` marks an invalid byte.
//! - Every lookup is a static 256-entry LUT.

use std::fmt;

/// Value of an invalid byte in every table.
pub const INVALID: u8 = 0;

const NUC_SYMBOLS: &[u8] = b"ACGTRY";
const RY_SYMBOLS: &[u8] = b"RY";
const AMINO_SYMBOLS: &[u8] = b"ACDEFGHIKLMNPQRSTVWYBZJX";
const CLASS_SYMBOLS: &[u8] = b"ACDFGHIKNPSX";
const TEXT_SYMBOLS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Fold LUT from `(raw, canonical)` pairs; lower-case raw bytes fold the same way.
const fn fold_table(pairs: &[(u8, u8)]) -> [u8; 256] {
    let mut t = [INVALID; 256];
    let mut i = 0;
    while i < pairs.len() {
        let (raw, canon) = pairs[i];
        t[raw as usize] = canon;
        t[raw.to_ascii_lowercase() as usize] = canon;
        i += 1;
    }
    t
}

/// Identity fold over `symbols`, case-insensitive.
const fn identity_table(symbols: &[u8]) -> [u8; 256] {
    let mut t = [INVALID; 256];
    let mut i = 0;
    while i < symbols.len() {
        let s = symbols[i];
        t[s as usize] = s;
        t[s.to_ascii_lowercase() as usize] = s;
        i += 1;
    }
    t
}

/// Value LUT over canonical bytes: `symbols[i]` gets `i + 1`.
const fn value_table(symbols: &[u8]) -> [u8; 256] {
    let mut t = [INVALID; 256];
    let mut i = 0;
    while i < symbols.len() {
        t[symbols[i] as usize] = (i + 1) as u8;
        i += 1;
    }
    t
}

static NUC_FOLD: [u8; 256] = fold_table(&[
    (b'A', b'A'),
    (b'C', b'C'),
    (b'G', b'G'),
    (b'T', b'T'),
    (b'U', b'T'),
    (b'R', b'R'),
    (b'Y', b'Y'),
]);

static RY_FOLD: [u8; 256] = fold_table(&[
    (b'A', b'R'),
    (b'G', b'R'),
    (b'R', b'R'),
    (b'C', b'Y'),
    (b'T', b'Y'),
    (b'U', b'Y'),
    (b'Y', b'Y'),
]);

static AMINO_FOLD: [u8; 256] = identity_table(AMINO_SYMBOLS);

static CLASS_FOLD: [u8; 256] = fold_table(&[
    (b'A', b'A'),
    (b'C', b'C'),
    (b'D', b'D'),
    (b'E', b'D'),
    (b'F', b'F'),
    (b'W', b'F'),
    (b'Y', b'F'),
    (b'G', b'G'),
    (b'H', b'H'),
    (b'I', b'I'),
    (b'L', b'I'),
    (b'M', b'I'),
    (b'V', b'I'),
    (b'J', b'I'),
    (b'K', b'K'),
    (b'Q', b'K'),
    (b'R', b'K'),
    (b'N', b'N'),
    (b'P', b'P'),
    (b'S', b'S'),
    (b'T', b'S'),
    (b'B', b'X'),
    (b'Z', b'X'),
    (b'X', b'X'),
]);

static TEXT_FOLD: [u8; 256] = identity_table(TEXT_SYMBOLS);

static NUC_VALUES: [u8; 256] = value_table(NUC_SYMBOLS);
static RY_VALUES: [u8; 256] = value_table(RY_SYMBOLS);
static AMINO_VALUES: [u8; 256] = value_table(AMINO_SYMBOLS);
static CLASS_VALUES: [u8; 256] = value_table(CLASS_SYMBOLS);
static TEXT_VALUES: [u8; 256] = value_table(TEXT_SYMBOLS);

/// Complement over canonical nucleotide bytes (A↔T, C↔G, R↔Y).
pub static COMPLEMENT_LUT: [u8; 256] = {
    let mut t = [INVALID; 256];
    t[b'A' as usize] = b'T';
    t[b'T' as usize] = b'A';
    t[b'C' as usize] = b'G';
    t[b'G' as usize] = b'C';
    t[b'R' as usize] = b'Y';
    t[b'Y' as usize] = b'R';
    t
};

/// Symbol alphabet, including its folding sub-mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alphabet {
    /// A, C, G, T (U read as T) and the R/Y ambiguity codes.
    Nucleotide,
    /// Nucleotides folded onto purine (R) / pyrimidine (Y).
    NucleotideRy,
    /// 20 standard residues plus B, Z, J, X.
    Amino,
    /// Amino acids folded into 12 physicochemical classes.
    AminoClassed,
    /// ASCII letters, case-insensitive.
    Text,
}

impl Alphabet {
    #[inline]
    fn tables(self) -> (&'static [u8; 256], &'static [u8; 256]) {
        match self {
            Alphabet::Nucleotide => (&NUC_FOLD, &NUC_VALUES),
            Alphabet::NucleotideRy => (&RY_FOLD, &RY_VALUES),
            Alphabet::Amino => (&AMINO_FOLD, &AMINO_VALUES),
            Alphabet::AminoClassed => (&CLASS_FOLD, &CLASS_VALUES),
            Alphabet::Text => (&TEXT_FOLD, &TEXT_VALUES),
        }
    }

    /// Canonical byte for a raw input byte. `None` if invalid.
    #[inline]
    pub fn fold(self, raw: u8) -> Option<u8> {
        let c = self.tables().0[raw as usize];
        if c == INVALID { None } else { Some(c) }
    }

    /// Symbol value of a canonical byte (`0` if it is not canonical).
    #[inline]
    pub fn value(self, canon: u8) -> u8 {
        self.tables().1[canon as usize]
    }

    /// Fold and evaluate in one step: `(canonical byte, value)`.
    #[inline]
    pub fn symbol(self, raw: u8) -> Option<(u8, u8)> {
        let c = self.fold(raw)?;
        Some((c, self.value(c)))
    }

    /// One past the largest symbol value.
    pub fn radix(self) -> usize {
        let n = match self {
            Alphabet::Nucleotide => NUC_SYMBOLS.len(),
            Alphabet::NucleotideRy => RY_SYMBOLS.len(),
            Alphabet::Amino => AMINO_SYMBOLS.len(),
            Alphabet::AminoClassed => CLASS_SYMBOLS.len(),
            Alphabet::Text => TEXT_SYMBOLS.len(),
        };
        n + 1
    }

    /// Whether the alphabet has a complement map.
    #[inline]
    pub fn is_nucleotide(self) -> bool {
        matches!(self, Alphabet::Nucleotide | Alphabet::NucleotideRy)
    }

    /// Whether `>` starts a FASTA header line in this alphabet.
    #[inline]
    pub fn recognizes_headers(self) -> bool {
        !matches!(self, Alphabet::Text)
    }

    /// Complement of a canonical byte. `None` outside nucleotide alphabets.
    #[inline]
    pub fn complement(self, canon: u8) -> Option<u8> {
        if !self.is_nucleotide() {
            return None;
        }
        let c = COMPLEMENT_LUT[canon as usize];
        if c == INVALID { None } else { Some(c) }
    }

    /// Fold a whole key. `None` if any byte is invalid.
    pub fn fold_key(self, key: &[u8]) -> Option<Vec<u8>> {
        key.iter().map(|&b| self.fold(b)).collect()
    }

    /// Reverse complement of a canonical key.
    pub fn reverse_complement(self, key: &[u8]) -> Option<Vec<u8>> {
        key.iter().rev().map(|&b| self.complement(b)).collect()
    }

    /// Short lowercase name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Alphabet::Nucleotide => "nucleotide",
            Alphabet::NucleotideRy => "nucleotide-ry",
            Alphabet::Amino => "amino",
            Alphabet::AminoClassed => "amino-classed",
            Alphabet::Text => "text",
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
