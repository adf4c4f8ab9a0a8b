//! Deduplication and labeling of sampled teams.
//!
//! Teams are ranked by score (ties broken by member key), duplicates dropped, then up
//! to three distinct teams are picked:
//!
//! 1. `meta`: the best team.
//! 2. `max_bonus`: the best other team holding the top bonus tier that the anchor
//!    receives; failing that, `best_bonus`: the best other team at the highest lower
//!    tier the anchor receives.
//! 3. `mixed`: the best team not picked yet.
//!
//! A slot without a candidate is left out.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use squadsmith_evaluator::faction_bonus::BonusTier;
use squadsmith_roster::Faction;

use crate::sampler::ScoredTeam;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionLabel {
    #[display("meta")]
    Meta,
    #[display("max_bonus")]
    MaxBonus,
    #[display("best_bonus")]
    BestBonus,
    #[display("mixed")]
    Mixed,
}

/// Sorts teams best first and drops repeated member sets.
#[must_use]
pub fn rank(mut teams: Vec<ScoredTeam>) -> Vec<ScoredTeam> {
    teams.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.key.cmp(&b.key)));
    let mut seen = BTreeSet::new();
    teams.retain(|team| seen.insert(team.key));
    teams
}

/// Picks the labeled teams of an anchor of faction `anchor_faction`.
#[must_use]
pub fn select(
    teams: Vec<ScoredTeam>,
    anchor_faction: &Faction,
    wildcard: &Faction,
) -> Vec<(SelectionLabel, ScoredTeam)> {
    let mut ranked = rank(teams).into_iter().map(Some).collect::<Vec<_>>();
    let mut selected = vec![];

    let Some(meta) = ranked.first_mut().and_then(Option::take) else {
        return selected;
    };
    selected.push((SelectionLabel::Meta, meta));

    let receives = |team: &ScoredTeam| team.bonus.benefits(anchor_faction, wildcard);
    let top = ranked
        .iter()
        .position(|team| team.as_ref().is_some_and(|t| t.bonus.tier == BonusTier::Five && receives(t)));
    let bonus_pick = match top {
        Some(position) => Some((SelectionLabel::MaxBonus, position)),
        None => {
            let best_tier = ranked
                .iter()
                .flatten()
                .filter(|team| receives(*team))
                .map(|team| team.bonus.tier)
                .max();
            best_tier.and_then(|tier| {
                let position = ranked
                    .iter()
                    .position(|team| team.as_ref().is_some_and(|t| t.bonus.tier == tier && receives(t)))?;
                Some((SelectionLabel::BestBonus, position))
            })
        }
    };
    if let Some((label, position)) = bonus_pick
        && let Some(team) = ranked[position].take()
    {
        selected.push((label, team));
    }

    if let Some(team) = ranked.iter_mut().find_map(Option::take) {
        selected.push((SelectionLabel::Mixed, team));
    }
    selected
}
