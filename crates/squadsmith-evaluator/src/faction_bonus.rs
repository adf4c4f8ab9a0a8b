//! Faction set bonus of a five-hero team.
//!
//! Wildcard heroes join whichever faction is most numerous among the others, then the
//! bonus is read from the resulting counts, highest tier first:
//!
//! | Counts              | Tier           | Default |
//! |---------------------|----------------|---------|
//! | 5 of one faction    | `Five`         | 35      |
//! | 4 of one faction    | `Four`         | 30      |
//! | 3 of one + 2 of one | `ThreePlusTwo` | 25      |
//! | 3 of one faction    | `Three`        | 15      |
//! | otherwise           | `None`         | 0       |
//!
//! A team made only of wildcards is a full set. Apart from a 3+2 split, only one set is
//! completed: factions tied for the lead yield to the first in key order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use squadsmith_roster::Faction;

/// Bonus tier, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusTier {
    None,
    Three,
    ThreePlusTwo,
    Four,
    Five,
}

/// Bonus value of each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactionBonusConfig {
    pub five: u32,
    pub four: u32,
    pub three_plus_two: u32,
    pub three: u32,
}

impl Default for FactionBonusConfig {
    fn default() -> Self {
        Self {
            five: 35,
            four: 30,
            three_plus_two: 25,
            three: 15,
        }
    }
}

impl FactionBonusConfig {
    #[must_use]
    pub fn value(&self, tier: BonusTier) -> u32 {
        match tier {
            BonusTier::None => 0,
            BonusTier::Three => self.three,
            BonusTier::ThreePlusTwo => self.three_plus_two,
            BonusTier::Four => self.four,
            BonusTier::Five => self.five,
        }
    }

    /// Computes the bonus of a team from its members' factions.
    ///
    /// The result does not depend on the order of `factions`.
    pub fn evaluate<'a, I>(&self, factions: I, wildcard: &Faction) -> FactionBonus
    where
        I: IntoIterator<Item = &'a Faction>,
    {
        let mut counts: BTreeMap<&Faction, usize> = BTreeMap::new();
        let mut wildcards = 0;
        for faction in factions {
            if faction.matches(wildcard.as_str()) {
                wildcards += 1;
            } else {
                *counts.entry(faction).or_default() += 1;
            }
        }

        if counts.is_empty() {
            let (tier, beneficiaries) = if wildcards > 0 {
                (BonusTier::Five, vec![wildcard.clone()])
            } else {
                (BonusTier::None, vec![])
            };
            return FactionBonus {
                tier,
                value: self.value(tier),
                beneficiaries,
                wildcards,
            };
        }

        let mut ranked = counts.into_iter().collect::<Vec<_>>();
        // stable: equal counts stay in faction order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let top = ranked[0].1;
        let dominant = top + wildcards;
        let runner_up = ranked.get(1).map_or(0, |(_, count)| *count);

        let tier = match (dominant, runner_up) {
            (5.., _) => BonusTier::Five,
            (4, _) => BonusTier::Four,
            (3, 2) => BonusTier::ThreePlusTwo,
            (3, _) => BonusTier::Three,
            _ => BonusTier::None,
        };

        let mut beneficiaries: Vec<Faction> = match tier {
            BonusTier::None => vec![],
            // both sets of a 3+2 split profit, whichever of them took the wildcards
            BonusTier::ThreePlusTwo => ranked
                .iter()
                .filter(|(_, count)| *count >= runner_up)
                .map(|(faction, _)| (*faction).clone())
                .collect(),
            // a single set is completed; ties go to the first faction in key order
            _ => ranked
                .first()
                .map(|(faction, _)| (*faction).clone())
                .into_iter()
                .collect(),
        };
        beneficiaries.sort();

        FactionBonus {
            tier,
            value: self.value(tier),
            beneficiaries,
            wildcards,
        }
    }
}

/// Bonus of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactionBonus {
    pub tier: BonusTier,
    pub value: u32,
    /// Factions receiving the bonus, sorted. Empty when there is no bonus.
    pub beneficiaries: Vec<Faction>,
    /// Number of wildcard members.
    pub wildcards: usize,
}

impl FactionBonus {
    /// Returns `true` if a hero of `faction` receives the bonus.
    ///
    /// A wildcard hero benefits from any non-zero bonus.
    #[must_use]
    pub fn benefits(&self, faction: &Faction, wildcard: &Faction) -> bool {
        self.value > 0
            && (faction.matches(wildcard.as_str()) || self.beneficiaries.contains(faction))
    }

    /// Human-readable summary, e.g. `35% bonus for Solaris (Starglint counts as joker)`.
    #[must_use]
    pub fn describe(&self, wildcard: &Faction) -> String {
        if self.value == 0 {
            return "0% (no 3+ faction set)".to_owned();
        }
        let factions = self
            .beneficiaries
            .iter()
            .map(Faction::as_str)
            .collect::<Vec<_>>()
            .join(" & ");
        let mut text = format!("{}% bonus for {factions}", self.value);
        if self.wildcards > 0 && !self.beneficiaries.contains(wildcard) {
            text.push_str(&format!(" ({wildcard} counts as joker)"));
        }
        text
    }
}
