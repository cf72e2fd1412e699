use kira_ffp_profiler::*;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

fn write_file(dir: &tempfile::TempDir, name: &str, body: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(body).unwrap();
    path
}

#[test]
fn test_max_feature_len_parsing() {
    assert_eq!(parse_max_feature_len(None), DEFAULT_MAX_FEATURE_LEN);
    assert_eq!(parse_max_feature_len(Some("64")), 64);
    assert_eq!(parse_max_feature_len(Some(" 12 ")), 12);
    assert_eq!(parse_max_feature_len(Some("0")), DEFAULT_MAX_FEATURE_LEN);
    assert_eq!(parse_max_feature_len(Some("many")), DEFAULT_MAX_FEATURE_LEN);
}

#[test]
fn test_defaults() {
    let s = ProfileConfig::default().max_length(40).scheme().unwrap();
    assert_eq!(s.k(), DEFAULT_FEATURE_LEN);
    assert_eq!(s.alphabet(), Alphabet::NucleotideRy);
    assert!(s.folds_strands());
    assert!(s.mask().is_none());
    assert_eq!(s.strand_rule(), StrandRule::Lexicographic);
}

#[test]
fn test_length_bounds() {
    let err = ProfileConfig::default().length(0).scheme().unwrap_err();
    assert!(matches!(err, ConfigError::ZeroLength));

    let err = ProfileConfig::default().length(41).max_length(40).scheme().unwrap_err();
    assert!(matches!(err, ConfigError::FeatureTooLong { k: 41, max: 40 }));

    let s = ProfileConfig::default().length(50).max_length(64).scheme().unwrap();
    assert_eq!(s.k(), 50);
}

#[test]
fn test_mask_errors() {
    let base = || ProfileConfig::default().length(4).max_length(40);

    let err = base().mask("101").scheme().unwrap_err();
    assert!(matches!(err, ConfigError::MaskLength { len: 3, k: 4 }));

    let err = base().mask("10x1").scheme().unwrap_err();
    assert!(matches!(err, ConfigError::MaskSymbol('x')));

    // length is counted in bytes, the same unit it is checked in
    let err = Mask::parse("é0", 4).unwrap_err();
    assert!(matches!(err, ConfigError::MaskLength { len: 3, k: 4 }));

    let err = base().mask("1001").random_mask(1).scheme().unwrap_err();
    assert!(matches!(err, ConfigError::ConflictingOptions(..)));

    let s = base().mask("1001").scheme().unwrap();
    assert_eq!(s.mask().map(Mask::ignored), Some(&[1usize, 2][..]));
}

#[test]
fn test_reverse_complement_only_for_nucleotides() {
    let s = ProfileConfig::default()
        .alphabet(Alphabet::Amino)
        .length(3)
        .max_length(40)
        .scheme()
        .unwrap();
    assert!(!s.folds_strands());

    let err =
        FeatureScheme::new(Alphabet::Text, 3, None, true, StrandRule::Lexicographic).unwrap_err();
    assert!(matches!(err, ConfigError::ReverseComplementUnsupported(Alphabet::Text)));
}

#[test]
fn test_random_mask() {
    let m = Mask::random(10, 3, Some(7));
    assert_eq!(m.len(), 10);
    assert_eq!(m.ignored().len(), 3);
    assert_eq!(m, Mask::random(10, 3, Some(7)));
    assert_eq!(m.as_str().bytes().filter(|&b| b == b'0').count(), 3);

    // at least one position is always kept
    assert_eq!(Mask::random(4, 10, Some(1)).ignored().len(), 3);
    assert_eq!(Mask::random(1, 5, Some(1)).as_str(), "1");

    let s = ProfileConfig::default()
        .length(8)
        .max_length(40)
        .random_mask(2)
        .seed(99)
        .reverse_complement(false)
        .scheme()
        .unwrap();
    assert_eq!(s.mask().map(|m| m.ignored().len()), Some(2));
}

#[test]
fn test_mask_mirroring() {
    let m = Mask::parse("11001", 5).unwrap();
    assert!(!m.is_symmetric());
    let mirrored = m.mirrored();
    assert_eq!(mirrored.as_str(), "10001");
    assert!(mirrored.is_symmetric());
    assert_eq!(mirrored.mirrored(), mirrored);
    assert_eq!(Mask::parse("0110", 4).unwrap().mirrored().as_str(), "0110");
    assert_eq!(Mask::parse("1100", 4).unwrap().mirrored().as_str(), "0000");
    assert_eq!(m.kept(b"ACGTA").collect::<Vec<_>>(), b"ACA".to_vec());

    // folding applies the mirrored mask, a single strand keeps it as given
    let base = || ProfileConfig::default().length(5).max_length(40).mask("11001");
    let s = base().alphabet(Alphabet::Nucleotide).scheme().unwrap();
    assert_eq!(s.mask().map(Mask::as_str), Some("10001"));
    let s = base().alphabet(Alphabet::Nucleotide).reverse_complement(false).scheme().unwrap();
    assert_eq!(s.mask().map(Mask::as_str), Some("11001"));
    let s = base().alphabet(Alphabet::Amino).scheme().unwrap();
    assert_eq!(s.mask().map(Mask::as_str), Some("11001"));
}

#[test]
fn test_mask_matching() {
    let m = Mask::parse("1001", 4).unwrap();
    assert!(m.matches(b"ATGC", b"ATTC"));
    assert!(m.matches(b"ATGC", b"AAAC"));
    assert!(!m.matches(b"ATGC", b"TTGC"));
    assert!(!m.matches(b"ATGC", b"ATG"));
    assert!(m.is_kept(0) && !m.is_kept(1));
    assert_eq!(m.to_string(), "1001");
}

#[test]
fn test_vocabulary_loading() {
    let s = Arc::new(
        FeatureScheme::new(Alphabet::Nucleotide, 3, None, false, StrandRule::Lexicographic)
            .unwrap(),
    );

    let v = vocabulary_from_reader(&b"  ACG\n\nTTT  cgu \n"[..], Arc::clone(&s)).unwrap();
    assert!(v.is_restricted());
    assert_eq!(v.len(), 3);
    assert_eq!(v.get(b"CGT"), Some(0));

    // invalid symbols are skipped, not fatal
    let v = vocabulary_from_reader(&b"ACG NNN"[..], Arc::clone(&s)).unwrap();
    assert_eq!(v.len(), 1);

    let err = vocabulary_from_reader(&b"ACG ACGT"[..], Arc::clone(&s)).unwrap_err();
    match err {
        ProfileError::VocabularyLength { token, len, k } => {
            assert_eq!((token.as_str(), len, k), ("ACGT", 4, 3));
        }
        other => panic!("unexpected error: {other}"),
    }

    let dir = tempfile::TempDir::new().unwrap();
    let err = load_vocabulary(&dir.path().join("none.txt"), Arc::clone(&s)).unwrap_err();
    assert!(matches!(err, ProfileError::Open { .. }));
    let err = load_vocabulary(dir.path(), s).unwrap_err();
    assert!(matches!(err, ProfileError::IsDirectory(_)));
}

#[test]
fn test_config_profiler_with_vocabulary() {
    let dir = tempfile::TempDir::new().unwrap();
    let vocab = write_file(&dir, "vocab.txt", b"AAA\nCCC\n");
    let mut p = ProfileConfig::default()
        .alphabet(Alphabet::Nucleotide)
        .reverse_complement(false)
        .length(3)
        .max_length(40)
        .vocabulary(&vocab)
        .profiler()
        .unwrap();
    assert!(p.table().is_restricted());

    let mut out: Vec<Profile> = Vec::new();
    p.profile_reader(&b"AAAAGGG"[..], 3, &mut out).unwrap();
    assert_eq!(out[0].get(b"AAA"), Some(2));
    assert_eq!(out[0].get(b"CCC"), Some(0));
    assert_eq!(out[0].len(), 2);
}

#[test]
fn test_parallel_matches_sequential() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_file(&dir, "a.fa", b">x\nACGTACGGA\n>y\nTTGACC\n");
    let b = write_file(&dir, "b.fa", b"GATTACAGATTACA\n");
    let cfg = ProfileConfig::default()
        .alphabet(Alphabet::Nucleotide)
        .length(4)
        .max_length(40)
        .multi_record(true);

    let rendered = profile_files_parallel(&[a.clone(), b.clone()], &cfg).unwrap();
    assert_eq!(rendered.len(), 2);

    let mut p = cfg.profiler().unwrap();
    for (path, got) in [a, b].iter().zip(rendered) {
        let mut sink = TsvWriter::new(Vec::new());
        p.profile_path(path, &mut sink).unwrap();
        assert_eq!(got.unwrap(), sink.into_inner());
    }

    let missing = dir.path().join("missing.fa");
    let rendered = profile_files_parallel(&[missing], &cfg).unwrap();
    assert!(matches!(rendered[0], Err(ProfileError::Open { .. })));
}
