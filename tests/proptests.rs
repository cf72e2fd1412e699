use kira_ffp_profiler::*;
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Symbols used to draw inputs: valid ones plus at least one invalid byte.
fn symbols(a: Alphabet) -> &'static [u8] {
    match a {
        Alphabet::Nucleotide | Alphabet::NucleotideRy => b"ACGTURYacgtN",
        Alphabet::Amino | Alphabet::AminoClassed => b"ACDEFGHIKLMNPQRSTVWYBZJXacdO",
        Alphabet::Text => b"ABCXYZabcxyz1",
    }
}

fn draw(a: Alphabet, picks: &[Index]) -> Vec<u8> {
    let s = symbols(a);
    picks.iter().map(|i| s[i.index(s.len())]).collect()
}

fn scheme(a: Alphabet, k: usize, mask: Option<Mask>, rc: bool) -> Arc<FeatureScheme> {
    Arc::new(FeatureScheme::new(a, k, mask, rc, StrandRule::Lexicographic).unwrap())
}

fn profile(s: Arc<FeatureScheme>, input: &[u8], multi: bool, chunk: usize) -> Vec<Profile> {
    let mut p = Profiler::new(s).multi_record(multi);
    let mut out = Vec::new();
    for c in input.chunks(chunk.max(1)) {
        p.feed(c, &mut out).unwrap();
    }
    p.finish(&mut out).unwrap();
    out
}

/// Number of complete windows: positions ending k valid bytes.
fn naive_windows(seq: &[u8], k: usize, a: Alphabet) -> u64 {
    let mut run = 0usize;
    let mut n = 0u64;
    for &b in seq {
        if a.fold(b).is_some() {
            run += 1;
            if run >= k {
                n += 1;
            }
        } else {
            run = 0;
        }
    }
    n
}

fn alphabets() -> impl Strategy<Value = Alphabet> {
    prop::sample::select(vec![
        Alphabet::Nucleotide,
        Alphabet::NucleotideRy,
        Alphabet::Amino,
        Alphabet::AminoClassed,
        Alphabet::Text,
    ])
}

proptest! {
    // Rolling forward and reverse hashes equal a from-scratch hash at every window.
    #[test]
    fn prop_rolling_matches_scratch(
        a in alphabets(),
        k in 1usize..=12,
        picks in prop::collection::vec(any::<Index>(), 0..256)
    ) {
        let seq = draw(a, &picks);
        let s = scheme(a, k, None, a.is_nucleotide());
        let mut w = Window::new(Arc::clone(&s));
        let mut valid: Vec<u8> = Vec::new();
        for &b in &seq {
            let full = w.push(b);
            match a.fold(b) {
                Some(c) => valid.push(c),
                None => valid.clear(),
            }
            prop_assert_eq!(w.run(), valid.len().min(k));
            prop_assert_eq!(full, valid.len() >= k);
            if !full {
                continue;
            }
            let fwd = &valid[valid.len() - k..];
            prop_assert_eq!(w.forward(), fwd);
            prop_assert_eq!(w.forward_hash(), s.hash(fwd));
            if s.folds_strands() {
                let rev = a.reverse_complement(fwd).unwrap();
                prop_assert_eq!(w.reverse(), &rev[..]);
                prop_assert_eq!(w.reverse_hash(), s.hash(&rev));
            }
        }
    }

    // Sum of counts equals the number of complete windows.
    #[test]
    fn prop_conservation(
        a in alphabets(),
        k in 1usize..=8,
        picks in prop::collection::vec(any::<Index>(), 0..300)
    ) {
        let seq = draw(a, &picks);
        let out = profile(scheme(a, k, None, a.is_nucleotide()), &seq, false, seq.len());
        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(out[0].total(), naive_windows(&seq, k, a));
    }

    // Feeding in arbitrary chunk sizes never changes the profiles.
    #[test]
    fn prop_chunking_invariance(
        k in 1usize..=6,
        multi in any::<bool>(),
        chunk in 1usize..40,
        seq in prop::collection::vec(prop::sample::select(b"ACGTN>\n x".to_vec()), 0..300)
    ) {
        let s = scheme(Alphabet::Nucleotide, k, None, true);
        let whole = profile(Arc::clone(&s), &seq, multi, seq.len());
        let split = profile(s, &seq, multi, chunk);
        prop_assert_eq!(whole, split);
    }

    // A sequence and its reverse complement give the same folded profile.
    #[test]
    fn prop_strand_symmetry(
        k in 1usize..=8,
        seq in prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 0..200)
    ) {
        let a = Alphabet::Nucleotide;
        let rc = a.reverse_complement(&seq).unwrap();
        let s = scheme(a, k, None, true);
        let fwd = profile(Arc::clone(&s), &seq, false, 64);
        let rev = profile(s, &rc, false, 64);
        prop_assert_eq!(fwd[0].to_map(), rev[0].to_map());
    }

    // Keys differing only at masked positions share one entry.
    #[test]
    fn prop_masked_equality(
        k in 2usize..=10,
        m in 1usize..10,
        seed in any::<u64>(),
        rc in any::<bool>(),
        key in prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 10),
        noise in prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 10)
    ) {
        let mask = Mask::random(k, m, Some(seed));
        let a: Vec<u8> = key[..k].to_vec();
        let b: Vec<u8> = (0..k).map(|i| if mask.is_kept(i) { a[i] } else { noise[i] }).collect();
        let s = scheme(Alphabet::Nucleotide, k, Some(mask), rc);
        prop_assert!(s.keys_equal(&a, &b));
        prop_assert_eq!(s.bucket_hash(&a, s.hash(&a)), s.bucket_hash(&b, s.hash(&b)));

        let mut t = FeatureTable::rolling(s);
        prop_assert_eq!(t.increment(&a, 1), Tally::Created);
        prop_assert_eq!(t.increment(&b, 1), Tally::Existing);
        prop_assert_eq!(t.len(), 1);
        prop_assert_eq!(t.get(&a), Some(2));
    }

    // A restricted profile never leaves its vocabulary.
    #[test]
    fn prop_vocabulary_closure(
        k in 1usize..=5,
        words in prop::collection::vec(
            prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 5),
            1..12,
        ),
        seq in prop::collection::vec(prop::sample::select(b"ACGTN".to_vec()), 0..300)
    ) {
        let s = scheme(Alphabet::Nucleotide, k, None, true);
        let list: Vec<u8> = words
            .iter()
            .flat_map(|w| w[..k].iter().copied().chain([b' ']))
            .collect();
        let vocab = vocabulary_from_reader(&list[..], Arc::clone(&s)).unwrap();
        let allowed: BTreeSet<Vec<u8>> = vocab.keys().map(<[u8]>::to_vec).collect();

        let mut p = Profiler::with_vocabulary(vocab);
        let mut out: Vec<Profile> = Vec::new();
        p.feed(&seq, &mut out).unwrap();
        p.finish(&mut out).unwrap();

        let seen: BTreeSet<Vec<u8>> = out[0].features.iter().map(|(key, _)| key.clone()).collect();
        prop_assert_eq!(seen, allowed);
        prop_assert!(out[0].total() <= naive_windows(&seq, k, Alphabet::Nucleotide));
    }
}
