use std::{num::NonZeroUsize, path::PathBuf};

use squadsmith_roster::Mode;
use squadsmith_search::{recommend::Recommender, sampler::TeamSampler};

use super::{InputArgs, selected_modes};
use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    #[clap(flatten)]
    input: InputArgs,
    /// Modes to generate, comma separated (all modes when omitted)
    #[arg(long = "mode", value_delimiter = ',')]
    modes: Vec<Mode>,
    /// Seed of the team search, replacing the configured one
    #[arg(long)]
    seed: Option<u64>,
    /// Sampling attempts per faction plan, replacing the configured count
    #[arg(long)]
    attempts: Option<usize>,
    /// Number of worker threads (all available cores when omitted)
    #[arg(long)]
    threads: Option<NonZeroUsize>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let GenerateArg {
        input,
        modes,
        seed,
        attempts,
        threads,
        output,
    } = arg;

    let pipeline = input.load(|config| {
        if let Some(seed) = seed {
            config.search.seed = *seed;
        }
        if let Some(attempts) = attempts {
            config.search.attempts = *attempts;
        }
    })?;
    let power = pipeline.power_index()?;
    let config = &pipeline.config;

    let modes = selected_modes(modes);
    tracing::info!(
        heroes = pipeline.enriched.len(),
        seed = config.search.seed,
        attempts = config.search.attempts,
        "generating recommendations"
    );
    let sampler = TeamSampler::new(
        &pipeline.enriched,
        &power,
        &config.faction_bonus,
        &config.search,
    );
    let document = Recommender::new(sampler, &config.formation).run(&modes, *threads);

    Output::save_json(&document, output.clone())?;
    Ok(())
}
