use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use squadsmith_analysis::enrichment::EnrichedRoster;
use squadsmith_evaluator::{hero_scorer::HeroScorer, power_index::PowerIndex};
use squadsmith_roster::Mode as GameMode;
use squadsmith_tagging::TagEngine;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{self, Config},
    data,
};

use self::{
    generate::GenerateArg, init_config::InitConfigArg, power_index::PowerIndexArg, tags::TagsArg,
};

mod generate;
mod init_config;
mod power_index;
mod tags;
#[cfg(test)]
mod test_util;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Generate team recommendations for every hero
    Generate(#[clap(flatten)] GenerateArg),
    /// Print the per-mode power ranking with score breakdowns
    PowerIndex(#[clap(flatten)] PowerIndexArg),
    /// Print the capability tags of each hero with evidence
    Tags(#[clap(flatten)] TagsArg),
    /// Write the default configuration and vocabulary
    InitConfig(#[clap(flatten)] InitConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Generate(arg) => generate::run(&arg)?,
        Mode::PowerIndex(arg) => power_index::run(&arg)?,
        Mode::Tags(arg) => tags::run(&arg)?,
        Mode::InitConfig(arg) => init_config::run(&arg)?,
    }
    Ok(())
}

/// Logs go to stderr so that documents written to stdout stay parseable.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Inputs shared by the commands that read a roster.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InputArgs {
    /// Directory of hero record JSON files
    #[arg(long)]
    heroes: PathBuf,
    /// Configuration file (built-in defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Tag vocabulary file (built-in vocabulary when omitted)
    #[arg(long)]
    vocabulary: Option<PathBuf>,
}

/// A validated configuration and the tagged roster it applies to.
#[derive(Debug)]
pub(crate) struct Pipeline {
    pub config: Config,
    pub enriched: EnrichedRoster,
}

impl InputArgs {
    /// Loads everything, applying `overrides` to the configuration before validation.
    pub fn load(&self, overrides: impl FnOnce(&mut Config)) -> anyhow::Result<Pipeline> {
        let (config, vocabulary) = config::load(
            self.config.as_deref(),
            self.vocabulary.as_deref(),
            overrides,
        )?;
        let roster = data::load_roster(&self.heroes, &config.roster)?;
        let engine = TagEngine::new(&config.tagging, &vocabulary)
            .context("Failed to build the tag engine")?;
        tracing::debug!(strategy = engine.strategy_name(), "tagging roster");
        let enriched = EnrichedRoster::build(roster, &engine);
        Ok(Pipeline { config, enriched })
    }
}

impl Pipeline {
    pub fn power_index(&self) -> anyhow::Result<PowerIndex> {
        let scorer =
            HeroScorer::new(&self.config.scoring).context("Failed to build the hero scorer")?;
        Ok(PowerIndex::compute(
            &self.enriched,
            &scorer,
            &self.config.scoring.tiers,
        ))
    }
}

/// The selected modes in canonical order, or every mode when none is given.
fn selected_modes(modes: &[GameMode]) -> Vec<GameMode> {
    if modes.is_empty() {
        return GameMode::ALL.to_vec();
    }
    let mut modes = modes.to_vec();
    modes.sort();
    modes.dedup();
    modes
}
