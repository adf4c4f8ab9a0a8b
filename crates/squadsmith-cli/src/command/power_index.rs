use std::{collections::BTreeMap, path::PathBuf};

use serde::Serialize;
use squadsmith_evaluator::hero_scorer::ScoreBreakdown;
use squadsmith_roster::{Faction, HeroId, Mode, RatingTier};

use super::{InputArgs, selected_modes};
use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PowerIndexArg {
    #[clap(flatten)]
    input: InputArgs,
    /// Modes to rank, comma separated (all modes when omitted)
    #[arg(long = "mode", value_delimiter = ',')]
    modes: Vec<Mode>,
    /// Only list the strongest N heroes per mode
    #[arg(long)]
    top: Option<usize>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RankedHero<'a> {
    rank: usize,
    id: &'a HeroId,
    name: &'a str,
    faction: &'a Faction,
    score: f32,
    tier: RatingTier,
    breakdown: &'a ScoreBreakdown,
}

pub(crate) fn run(arg: &PowerIndexArg) -> anyhow::Result<()> {
    let PowerIndexArg {
        input,
        modes,
        top,
        output,
    } = arg;

    let pipeline = input.load(|_| {})?;
    let power = pipeline.power_index()?;
    let enriched = &pipeline.enriched;

    let document = selected_modes(modes)
        .into_iter()
        .map(|mode| {
            let ranking = power
                .ranking(mode)
                .into_iter()
                .take(top.unwrap_or(usize::MAX))
                .enumerate()
                .map(|(i, (index, hero_power))| {
                    let hero = enriched.hero(index);
                    RankedHero {
                        rank: i + 1,
                        id: hero.id(),
                        name: hero.name(),
                        faction: hero.faction(),
                        score: (hero_power.score * 10.0).round() / 10.0,
                        tier: hero_power.tier,
                        breakdown: &hero_power.breakdown,
                    }
                })
                .collect::<Vec<_>>();
            (mode, ranking)
        })
        .collect::<BTreeMap<_, _>>();

    Output::save_json(&document, output.clone())?;
    Ok(())
}
