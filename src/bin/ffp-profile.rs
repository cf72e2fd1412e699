use clap::{Parser, ValueEnum};
use kira_ffp_profiler::*;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// Print a Feature Frequency Profile (feature/count pairs) for each input.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Feature length (default 10, max MAX_WORD_SIZE, 40 unless set)
    #[arg(short = 'l', long, default_value_t = DEFAULT_FEATURE_LEN)]
    length: usize,

    /// Symbol alphabet
    #[arg(long, value_enum, default_value_t = AlphabetArg::Nucleotide)]
    alphabet: AlphabetArg,

    /// Disable RY-coding (nucleotide) or amino-acid classing (amino)
    #[arg(short = 'd', long, default_value_t = false)]
    disable: bool,

    /// Disable reverse-complement folding
    #[arg(short = 'r', long, default_value_t = false)]
    disable_rev: bool,

    /// Feature mask over {0,1}; 0 positions are ignored
    #[arg(short = 'w', long)]
    mask: Option<String>,

    /// Random mask with this many ignored positions
    #[arg(short = 'z', long)]
    random_mask: Option<usize>,

    /// Seed for the random mask
    #[arg(short = 's', long)]
    random_seed: Option<u64>,

    /// Count only the features listed in this file (prints counts only)
    #[arg(short = 'f', long)]
    feature_list: Option<PathBuf>,

    /// One profile per FASTA record
    #[arg(short = 'm', long, default_value_t = false)]
    multiple: bool,

    /// Canonical strand rule
    #[arg(long, value_enum, default_value_t = StrandArg::Lexicographic)]
    strand_rule: StrandArg,

    /// Profile file arguments in parallel with this many threads
    #[arg(long)]
    threads: Option<usize>,

    /// Only report errors
    #[arg(short = 'q', long, default_value_t = false)]
    quiet: bool,

    /// Input files; `-` or none reads stdin
    files: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AlphabetArg {
    #[value(alias = "nt", alias = "dna", alias = "rna")]
    Nucleotide,
    #[value(alias = "aa", alias = "protein")]
    Amino,
    #[value(alias = "txt")]
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrandArg {
    Lexicographic,
    #[value(alias = "hash-value", alias = "legacy")]
    Hash,
}

/// `fold` selects RY-coding or amino-acid classing.
fn alphabet_of(arg: AlphabetArg, fold: bool) -> Alphabet {
    match (arg, fold) {
        (AlphabetArg::Nucleotide, true) => Alphabet::NucleotideRy,
        (AlphabetArg::Nucleotide, false) => Alphabet::Nucleotide,
        (AlphabetArg::Amino, true) => Alphabet::AminoClassed,
        (AlphabetArg::Amino, false) => Alphabet::Amino,
        (AlphabetArg::Text, _) => Alphabet::Text,
    }
}

fn strand_rule_of(arg: StrandArg) -> StrandRule {
    match arg {
        StrandArg::Lexicographic => StrandRule::Lexicographic,
        StrandArg::Hash => StrandRule::HashValue,
    }
}

fn is_stdin(p: &Path) -> bool {
    p.as_os_str() == "-"
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cfg = ProfileConfig::default()
        .alphabet(alphabet_of(args.alphabet, !args.disable))
        .length(args.length)
        .reverse_complement(!args.disable_rev)
        .strand_rule(strand_rule_of(args.strand_rule))
        .multi_record(args.multiple);
    let cfg = match &args.mask {
        Some(m) => cfg.mask(m.as_str()),
        None => cfg,
    };
    let cfg = match args.random_mask {
        Some(z) => cfg.random_mask(z),
        None => cfg,
    };
    let cfg = match args.random_seed {
        Some(s) => cfg.seed(s),
        None => cfg,
    };
    let cfg = match &args.feature_list {
        Some(p) => cfg.vocabulary(p),
        None => cfg,
    };
    let cfg = match args.threads {
        Some(n) => cfg.threads(n),
        None => cfg,
    };
    let values_only = args.feature_list.is_some();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let parallel = args.threads.is_some_and(|n| n > 1)
        && args.files.len() > 1
        && !args.files.iter().any(|p| is_stdin(p));
    if parallel {
        debug!("profiling {} files in parallel", args.files.len());
        for rendered in profile_files_parallel(&args.files, &cfg)? {
            out.write_all(&rendered?)?;
        }
        out.flush()?;
        return Ok(());
    }

    let mut profiler = cfg.profiler()?;
    let mut sink = TsvWriter::new(out).values_only(values_only);
    if args.files.is_empty() {
        profiler.profile_stdin(&mut sink)?;
    }
    for path in &args.files {
        if is_stdin(path) {
            profiler.profile_stdin(&mut sink)?;
        } else {
            profiler.profile_path(path, &mut sink)?;
        }
    }
    sink.flush()?;
    debug!("{} profile(s) written", profiler.records());

    Ok(())
}
