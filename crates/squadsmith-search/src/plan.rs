//! Faction plans.
//!
//! Uniform sampling from a mixed pool rarely produces a full faction set, so sampling
//! is steered by plans, tried in order of the bonus they aim for:
//!
//! | Plan           | Quotas (besides the anchor)              |
//! |----------------|------------------------------------------|
//! | `five`         | 4 × main                                 |
//! | `four`         | 3 × main, 1 × anyone                     |
//! | `three_plus_two` | 2 × main, 2 × second                   |
//! | `three`        | 2 × main, 2 × anyone                     |
//!
//! A faction quota also accepts wildcard heroes. The main faction is the anchor's own;
//! a wildcard anchor adopts the strongest faction of its pool. The second faction is the
//! strongest remaining one, strength being the summed power of its best few heroes.

use std::collections::BTreeMap;

use squadsmith_analysis::enrichment::EnrichedRoster;
use squadsmith_evaluator::{faction_bonus::BonusTier, power_index::PowerIndex};
use squadsmith_roster::{Faction, Hero, HeroIndex, Mode};

use crate::pool::CandidatePool;

/// Which heroes may fill a quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// Heroes of this faction, or wildcards.
    Faction(Faction),
    Any,
}

impl Eligibility {
    #[must_use]
    pub fn accepts(&self, hero: &Hero) -> bool {
        match self {
            Self::Faction(faction) => hero.is_wildcard() || hero.faction() == faction,
            Self::Any => true,
        }
    }
}

/// `slots` draws restricted to `eligibility`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quota {
    pub eligibility: Eligibility,
    pub slots: usize,
}

impl Quota {
    fn faction(faction: &Faction, slots: usize) -> Self {
        Self {
            eligibility: Eligibility::Faction(faction.clone()),
            slots,
        }
    }

    fn any(slots: usize) -> Self {
        Self {
            eligibility: Eligibility::Any,
            slots,
        }
    }
}

/// A sampling plan and the bonus tier it promises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactionPlan {
    pub name: &'static str,
    pub promised: BonusTier,
    pub quotas: Vec<Quota>,
}

/// Main faction of an anchor's search and the plans derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSet {
    /// `None` when neither the anchor nor its pool has a regular faction.
    pub main: Option<Faction>,
    pub plans: Vec<FactionPlan>,
}

impl PlanSet {
    /// Derives the plans of `anchor` over `pool`.
    ///
    /// `depth` is how many of a faction's best heroes count toward its strength.
    #[must_use]
    pub fn build(
        enriched: &EnrichedRoster,
        power: &PowerIndex,
        anchor: HeroIndex,
        mode: Mode,
        pool: &CandidatePool,
        depth: usize,
    ) -> Self {
        let strengths = faction_strengths(enriched, power, mode, pool, depth);
        let strongest_except = |excluded: Option<&Faction>| {
            strengths
                .iter()
                .filter(|(faction, _)| Some(*faction) != excluded)
                .fold(None, |best: Option<(&Faction, f32)>, (faction, strength)| {
                    match best {
                        Some((_, best_strength)) if best_strength >= *strength => best,
                        _ => Some((faction, *strength)),
                    }
                })
                .map(|(faction, _)| faction.clone())
        };

        let anchor_hero = enriched.hero(anchor);
        let main = if anchor_hero.is_wildcard() {
            strongest_except(None)
        } else {
            Some(anchor_hero.faction().clone())
        };

        let Some(main_faction) = &main else {
            // nothing but wildcards: any draw completes the set
            let plans = vec![FactionPlan {
                name: "open",
                promised: BonusTier::None,
                quotas: vec![Quota::any(4)],
            }];
            return Self { main, plans };
        };

        let mut plans = vec![
            FactionPlan {
                name: "five",
                promised: BonusTier::Five,
                quotas: vec![Quota::faction(main_faction, 4)],
            },
            FactionPlan {
                name: "four",
                promised: BonusTier::Four,
                quotas: vec![Quota::faction(main_faction, 3), Quota::any(1)],
            },
        ];
        if let Some(second) = strongest_except(Some(main_faction)) {
            plans.push(FactionPlan {
                name: "three_plus_two",
                promised: BonusTier::ThreePlusTwo,
                quotas: vec![Quota::faction(main_faction, 2), Quota::faction(&second, 2)],
            });
        }
        plans.push(FactionPlan {
            name: "three",
            promised: BonusTier::Three,
            quotas: vec![Quota::faction(main_faction, 2), Quota::any(2)],
        });
        Self { main, plans }
    }
}

/// Summed power of the best `depth` pool heroes of every regular faction.
fn faction_strengths(
    enriched: &EnrichedRoster,
    power: &PowerIndex,
    mode: Mode,
    pool: &CandidatePool,
    depth: usize,
) -> BTreeMap<Faction, f32> {
    let mut scores: BTreeMap<Faction, Vec<f32>> = BTreeMap::new();
    for index in pool.members() {
        let hero = enriched.hero(*index);
        if hero.is_wildcard() {
            continue;
        }
        scores
            .entry(hero.faction().clone())
            .or_default()
            .push(power.score(*index, mode));
    }
    scores
        .into_iter()
        .map(|(faction, mut scores)| {
            scores.sort_by(|a, b| b.total_cmp(a));
            let strength = scores.iter().take(depth).sum();
            (faction, strength)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{
        SearchConfig,
        test_util::{HeroSpec, enriched, power_index},
    };

    fn plans(specs: &[HeroSpec], anchor: &str) -> PlanSet {
        let enriched = enriched(specs);
        let power = power_index(&enriched);
        let anchor = enriched.roster().index_of(&anchor.into()).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let config = SearchConfig::default();
        let pool = CandidatePool::build(&enriched, anchor, Mode::Pve, &config, &mut rng);
        PlanSet::build(&enriched, &power, anchor, Mode::Pve, &pool, 8)
    }

    #[test]
    fn test_regular_anchor_plans() {
        let set = plans(
            &[
                HeroSpec::new("h1", "Hearts"),
                HeroSpec::new("h2", "Hearts"),
                HeroSpec::new("c1", "Clubs").hp(5000.0),
                HeroSpec::new("c2", "Clubs"),
                HeroSpec::new("s1", "Spades"),
            ],
            "h1",
        );
        assert_eq!(set.main, Some(Faction::new("Hearts")));
        let names = set.plans.iter().map(|plan| plan.name).collect::<Vec<_>>();
        assert_eq!(names, ["five", "four", "three_plus_two", "three"]);
        assert_eq!(
            set.plans[2].quotas[1].eligibility,
            Eligibility::Faction(Faction::new("Clubs"))
        );
        for plan in &set.plans {
            assert_eq!(plan.quotas.iter().map(|q| q.slots).sum::<usize>(), 4);
        }
    }

    #[test]
    fn test_wildcard_anchor_adopts_strongest_faction() {
        let set = plans(
            &[
                HeroSpec::new("w", "Starglint"),
                HeroSpec::new("h1", "Hearts"),
                HeroSpec::new("c1", "Clubs").hp(5000.0),
                HeroSpec::new("c2", "Clubs").hp(4000.0),
                HeroSpec::new("s1", "Spades"),
            ],
            "w",
        );
        assert_eq!(set.main, Some(Faction::new("Clubs")));
    }

    #[test]
    fn test_all_wildcard_roster_has_open_plan() {
        let set = plans(
            &[
                HeroSpec::new("w1", "Starglint"),
                HeroSpec::new("w2", "Starglint"),
                HeroSpec::new("w3", "Starglint"),
                HeroSpec::new("w4", "Starglint"),
                HeroSpec::new("w5", "Starglint"),
            ],
            "w1",
        );
        assert_eq!(set.main, None);
        assert_eq!(set.plans.len(), 1);
        assert_eq!(set.plans[0].quotas, [Quota::any(4)]);
    }
}
