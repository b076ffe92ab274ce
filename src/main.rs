mod bluntify;
mod cli;
mod config;
mod edges;
mod error;
mod gfa;
mod graph;
mod logger;
mod merge;
mod node;
mod seq_arena;
mod stats;
mod time_profile;
mod unify;

use time_profile::TimeProfile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse_or_exit();
    let config: config::RunConfig = (&cli).into();

    logger::init(config.log_level);

    let mut profile = TimeProfile::new();

    let (mut graph, k) = profile.time("read", || gfa::read_gfa(&config.input))?;
    stats::print_statistics(&graph, k, config.statistics);

    if config.unify_before_run {
        profile.time("unify_before_run", || unify::unify(&mut graph, k));
        stats::print_statistics(&graph, k, config.statistics);
    }

    profile.time("bluntify", || bluntify::bluntify(&mut graph, k));
    stats::print_statistics(&graph, 1, config.statistics);

    if k % 2 == 0 {
        profile.time("unify_after_bluntify", || unify::unify(&mut graph, 1));
        stats::print_statistics(&graph, 1, config.statistics);
    }

    if config.merge_type > 0 {
        profile.time("merge", || merge::merge_nodes(&mut graph, config.merge_type == 2));
        stats::print_statistics(&graph, 1, config.statistics);
    }

    if let Some(output) = &config.output {
        profile.time("write", || gfa::write_gfa(&graph, output))?;
    }

    log::debug!("pass timings: {}", profile.summary());
    Ok(())
}
