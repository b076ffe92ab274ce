//! Resolved run configuration, assembled from [`crate::cli::Cli`] the same
//! way the teacher crate turns each subcommand's `*Args` into a `*Config`
//! in `configs.rs` -- generalized here to stark's one flat command.

use std::path::PathBuf;

use crate::stats::StatisticsLevel;

pub struct RunConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub log_level: i32,
    pub merge_type: u8,
    pub unify_before_run: bool,
    pub statistics: StatisticsLevel,
}
