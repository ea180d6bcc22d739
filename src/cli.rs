use clap::{crate_version, Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

use crate::error::{CorrectionError, Result};

/// Tuning configuration for one correction run, parsed once from the
/// `correct` subcommand's matches and threaded through the pipeline instead
/// of passing `ArgMatches` past the CLI boundary.
#[derive(Debug, Clone)]
pub struct Config {
    pub bam_file: String,
    pub output: String,
    pub fdr: f64,
    pub block_size: usize,
    pub ncpu: usize,
    /// Reserved; parsed but never consulted by the covariation test (spec §6).
    pub threshold: u32,
    pub all_fe_tests: Option<String>,
    pub write_stats: Option<String>,
}

/// Parses `flag`'s value out of `m`, failing fast with a typed
/// `CorrectionError::InvalidConfig` rather than silently substituting a
/// default on a malformed numeric argument (e.g. a mistyped `--fdr`).
fn parse_arg<T: std::str::FromStr>(m: &ArgMatches, flag: &'static str) -> Result<T> {
    let raw = m.get_one::<String>(flag).unwrap();
    raw.parse().map_err(|_| CorrectionError::InvalidConfig {
        flag,
        value: raw.clone(),
    })
}

impl Config {
    pub fn from_matches(m: &ArgMatches) -> Result<Self> {
        Ok(Config {
            bam_file: m.get_one::<String>("bam-file").unwrap().clone(),
            output: m.get_one::<String>("output").unwrap().clone(),
            fdr: parse_arg(m, "fdr")?,
            block_size: parse_arg(m, "block-size")?,
            ncpu: parse_arg(m, "threads")?,
            threshold: parse_arg(m, "threshold")?,
            all_fe_tests: m.get_one::<String>("all-fe-tests").cloned(),
            write_stats: m.get_one::<String>("write-stats").cloned(),
        })
    }
}

/// Builds the `covarrect` command-line surface: one `correct` subcommand
/// plus a `shell-completion` utility subcommand.
pub fn build_cli() -> Command {
    Command::new("covarrect")
        .version(crate_version!())
        .about("Covariation-based error correction of indexed BAM alignments")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("correct")
                .about("Correct an indexed, coordinate-sorted BAM against its own covariation structure")
                .arg(
                    Arg::new("bam-file")
                        .short('b')
                        .long("bam-file")
                        .help("Sorted, indexed input BAM with exactly one reference sequence")
                        .required(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Path to write the corrected BAM")
                        .required(true),
                )
                .arg(
                    Arg::new("fdr")
                        .long("fdr")
                        .help("Target false discovery rate for the Benjamini-Hochberg cutoff")
                        .default_value("0.001"),
                )
                .arg(
                    Arg::new("block-size")
                        .long("block-size")
                        .help("Number of column pairs tested per dispatched block")
                        .default_value("250"),
                )
                .arg(
                    Arg::new("threads")
                        .short('t')
                        .long("threads")
                        .help("Number of worker threads (default: host CPU count)")
                        .default_value("24"),
                )
                .arg(
                    Arg::new("threshold")
                        .long("threshold")
                        .help("Reserved; not consulted by the covariation test")
                        .default_value("20"),
                )
                .arg(
                    Arg::new("all-fe-tests")
                        .long("all-fe-tests")
                        .help("Precomputed col_i,col_j,i_char,j_char,p_value CSV to short-circuit C5/C6"),
                )
                .arg(
                    Arg::new("write-stats")
                        .long("write-stats")
                        .help("Write the full statistical universe to this CSV path before FDR selection"),
                )
                .arg(
                    Arg::new("verbose")
                        .short('v')
                        .long("verbose")
                        .action(ArgAction::SetTrue)
                        .help("Enable debug-level logging"),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Only log warnings and errors"),
                ),
        )
        .subcommand(
            Command::new("shell-completion")
                .about("Generate a shell completion script")
                .arg(
                    Arg::new("shell")
                        .long("shell")
                        .required(true)
                        .value_parser(clap::value_parser!(clap_complete::Shell)),
                )
                .arg(
                    Arg::new("output-file")
                        .long("output-file")
                        .required(true),
                ),
        )
}

/// Sets the global log level from `-v`/`-q` flags: quiet wins over verbose,
/// default is `Info`.
pub fn set_log_level(matches: &clap::ArgMatches) {
    let mut builder = env_logger::Builder::from_default_env();
    let level = if matches.get_flag("quiet") {
        LevelFilter::Warn
    } else if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    builder.filter_level(level).init();
}
