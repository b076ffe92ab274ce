//! Command-line surface (spec.md §6). A single flat command -- stark only
//! ever does one job, turning one overlap graph into one blunt graph --
//! so this keeps the teacher crate's `clap` `derive` idiom but drops its
//! `Subcommand` layer, which existed for the teacher's several pipeline
//! stages and has no counterpart here.

use clap::error::ErrorKind;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "stark",
    version = "1.0",
    about = "Bluntify a bidirected sequence-overlap graph in GFA format"
)]
pub struct Cli {
    /// Input GFA file (v1 or v2)
    #[arg(short = 'i', long = "input")]
    pub input: String,

    /// Output GFA file; if omitted the graph is still built and any
    /// requested statistics are printed, but nothing is written
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Log level: 0 (off) .. 1000 (all); see logger::level for the named
    /// thresholds in between
    #[arg(short = 'l', long = "log", default_value_t = crate::logger::level::INFO)]
    pub log_level: i32,

    /// Merge policy: 0 = no merge, 1 = only node-reducing merges, 2 = all merges
    #[arg(short = 'm', long = "merge-type", default_value_t = 0)]
    pub merge_type: u8,

    /// Unify the input graph's unitigs before bluntifying
    #[arg(short = 'u', long = "unify-before-run", default_value_t = false)]
    pub unify_before_run: bool,

    /// Statistics verbosity: 0 = none, 1 = trivial (node count), 2 = full
    /// (also edge/dead-end/letter totals)
    #[arg(short = 's', long = "statistics", default_value_t = 0)]
    pub statistics: u8,
}

impl Cli {
    /// Parse `argv`, but translate clap's own usage-error exit path into
    /// spec.md §6/§7's contract: exit 1 on a missing `-i` or an unknown
    /// flag, rather than clap v4's default exit code of 2. Mirrors
    /// `original_source/src/main.cpp`'s `read_args`, which sets
    /// `need_help` on an unrecognized option or a missing `input_file_name`
    /// and returns `1`; `--help`/`--version` still exit 0, since those
    /// aren't "errors" in spec.md's sense.
    pub fn parse_or_exit() -> Self {
        match Cli::try_parse() {
            Ok(cli) => cli,
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
                _ => {
                    eprint!("{err}");
                    std::process::exit(1);
                }
            },
        }
    }
}

impl From<&Cli> for crate::config::RunConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            input: cli.input.clone().into(),
            output: cli.output.clone().map(Into::into),
            log_level: cli.log_level,
            merge_type: cli.merge_type,
            unify_before_run: cli.unify_before_run,
            statistics: crate::stats::StatisticsLevel::from_cli(cli.statistics),
        }
    }
}
