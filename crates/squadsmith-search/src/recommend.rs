//! Recommendation documents and the parallel driver.
//!
//! The document maps every anchor id to its recommendations per mode. Both levels are
//! ordered maps, so serializing the same document always yields the same bytes.

use std::{collections::BTreeMap, num::NonZeroUsize, thread};

use serde::Serialize;
use squadsmith_evaluator::faction_bonus::{BonusTier, FactionBonus};
use squadsmith_roster::{Faction, HeroId, HeroIndex, Mode, RatingTier};

use crate::{
    formation::FormationConfig,
    sampler::{ScoredTeam, TeamSampler},
    selection::{self, SelectionLabel},
};

/// Maximum number of tags listed per hero summary.
const SUMMARY_TAGS: usize = 3;

pub type RecommendationDocument = BTreeMap<HeroId, BTreeMap<Mode, Vec<Recommendation>>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub label: SelectionLabel,
    /// Anchor first.
    pub members: Vec<HeroId>,
    pub formation: Vec<FormationSlot>,
    /// Team score, rounded to one decimal.
    pub score: f32,
    pub faction_bonus: BonusSummary,
    pub rationale: Vec<String>,
    pub heroes: Vec<HeroSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormationSlot {
    pub slot: String,
    pub hero: HeroId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusSummary {
    pub value: u32,
    pub tier: BonusTier,
    pub factions: Vec<Faction>,
    pub description: String,
}

impl BonusSummary {
    fn new(bonus: &FactionBonus, wildcard: &Faction) -> Self {
        Self {
            value: bonus.value,
            tier: bonus.tier,
            factions: bonus.beneficiaries.clone(),
            description: bonus.describe(wildcard),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroSummary {
    pub id: HeroId,
    pub class: String,
    pub role: String,
    pub faction: Faction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<RatingTier>,
    pub tags: Vec<String>,
}

/// Turns search outcomes into labeled, placed recommendations.
#[derive(Debug, Clone, Copy)]
pub struct Recommender<'a> {
    sampler: TeamSampler<'a>,
    formation: &'a FormationConfig,
}

impl<'a> Recommender<'a> {
    #[must_use]
    pub fn new(sampler: TeamSampler<'a>, formation: &'a FormationConfig) -> Self {
        Self { sampler, formation }
    }

    /// Recommendations of one anchor in one mode, best first.
    #[must_use]
    pub fn recommend(&self, anchor: HeroIndex, mode: Mode) -> Vec<Recommendation> {
        let enriched = self.sampler.enriched();
        let wildcard = enriched.roster().wildcard();
        let outcome = self.sampler.run(anchor, mode);
        let selected = selection::select(outcome.teams, enriched.hero(anchor).faction(), wildcard);
        selected
            .into_iter()
            .take(self.sampler.config().results_per_mode)
            .map(|(label, team)| self.build(label, &team))
            .collect()
    }

    fn build(&self, label: SelectionLabel, scored: &ScoredTeam) -> Recommendation {
        let enriched = self.sampler.enriched();
        let wildcard = enriched.roster().wildcard();
        let formation = self.formation.assign(&scored.team, enriched);

        let mut rationale = vec![scored.bonus.describe(wildcard)];
        rationale.extend(scored.synergy.rationale.iter().cloned());
        rationale.extend(formation.notes);

        let heroes = scored
            .team
            .members()
            .iter()
            .map(|index| {
                let hero = enriched.hero(*index);
                HeroSummary {
                    id: hero.id().clone(),
                    class: hero.class().to_owned(),
                    role: hero.role().to_owned(),
                    faction: hero.faction().clone(),
                    overall: hero.ratings().tier(Mode::General),
                    tags: enriched
                        .enriched(*index)
                        .tags()
                        .tags()
                        .take(SUMMARY_TAGS)
                        .map(|tag| tag.as_str().to_owned())
                        .collect(),
                }
            })
            .collect();

        Recommendation {
            label,
            members: scored
                .team
                .members()
                .iter()
                .map(|index| enriched.hero(*index).id().clone())
                .collect(),
            formation: formation
                .placements
                .into_iter()
                .map(|placement| FormationSlot {
                    slot: placement.slot,
                    hero: enriched.hero(placement.hero).id().clone(),
                })
                .collect(),
            score: (scored.score * 10.0).round() / 10.0,
            faction_bonus: BonusSummary::new(&scored.bonus, wildcard),
            rationale,
            heroes,
        }
    }

    /// Recommendations of every hero of the roster in every `modes`.
    ///
    /// Anchors are split across `threads` scoped threads (all available cores when
    /// `None`). The document does not depend on the thread count.
    #[must_use]
    pub fn run(&self, modes: &[Mode], threads: Option<NonZeroUsize>) -> RecommendationDocument {
        let threads = threads
            .or_else(|| thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get);
        let mut results = self
            .sampler
            .enriched()
            .roster()
            .indices()
            .map(|anchor| (anchor, BTreeMap::new()))
            .collect::<Vec<_>>();
        let chunk_size = results.len().div_ceil(threads).max(1);

        thread::scope(|s| {
            for chunk in results.chunks_mut(chunk_size) {
                s.spawn(move || {
                    for (anchor, by_mode) in chunk {
                        for &mode in modes {
                            by_mode.insert(mode, self.recommend(*anchor, mode));
                        }
                    }
                });
            }
        });

        tracing::info!(
            anchors = results.len(),
            modes = modes.len(),
            threads,
            "recommendations generated"
        );
        let enriched = self.sampler.enriched();
        results
            .into_iter()
            .map(|(anchor, by_mode)| (enriched.hero(anchor).id().clone(), by_mode))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use squadsmith_evaluator::faction_bonus::FactionBonusConfig;

    use super::*;
    use crate::{
        SearchConfig,
        test_util::{HeroSpec, enriched, power_index},
    };

    fn document(specs: &[HeroSpec], threads: usize) -> RecommendationDocument {
        let enriched = enriched(specs);
        let power = power_index(&enriched);
        let bonus = FactionBonusConfig::default();
        let config = SearchConfig {
            attempts: 30,
            ..SearchConfig::default()
        };
        let formation = FormationConfig::default();
        let sampler = TeamSampler::new(&enriched, &power, &bonus, &config);
        Recommender::new(sampler, &formation).run(&Mode::ALL, NonZeroUsize::new(threads))
    }

    fn mixed_roster() -> Vec<HeroSpec> {
        vec![
            HeroSpec::new("s1", "Solaris").class("Tank").hp(4000.0),
            HeroSpec::new("s2", "Solaris").skill("Heals all allies for 10% of max HP."),
            HeroSpec::new("s3", "Solaris").atk(250.0),
            HeroSpec::new("h1", "Hearts").class("Assassin"),
            HeroSpec::new("h2", "Hearts").skill("Stuns the target for 2 seconds."),
            HeroSpec::new("h3", "Hearts").rating("SS"),
            HeroSpec::new("c1", "Clubs"),
            HeroSpec::new("w1", "Starglint").rating("A"),
        ]
    }

    #[test]
    fn test_distinct_factions_get_only_meta() {
        let doc = document(
            &[
                HeroSpec::new("a", "Hearts"),
                HeroSpec::new("b", "Clubs"),
                HeroSpec::new("c", "Spades"),
                HeroSpec::new("d", "Diamonds"),
                HeroSpec::new("e", "Solaris"),
            ],
            2,
        );
        assert_eq!(doc.len(), 5);
        for by_mode in doc.values() {
            assert_eq!(by_mode.len(), 3);
            for recommendations in by_mode.values() {
                assert_eq!(recommendations.len(), 1);
                let meta = &recommendations[0];
                assert_eq!(meta.label, SelectionLabel::Meta);
                assert_eq!(meta.faction_bonus.value, 0);
                assert_eq!(meta.members.iter().collect::<BTreeSet<_>>().len(), 5);
                assert_eq!(meta.rationale[0], "0% (no 3+ faction set)");
            }
        }
    }

    #[test]
    fn test_full_faction_with_wildcard_keeps_top_bonus() {
        let doc = document(
            &[
                HeroSpec::new("s1", "Solaris"),
                HeroSpec::new("s2", "Solaris"),
                HeroSpec::new("s3", "Solaris"),
                HeroSpec::new("s4", "Solaris"),
                HeroSpec::new("s5", "Solaris"),
                HeroSpec::new("w1", "Starglint"),
            ],
            1,
        );
        for id in ["s1", "s2", "s3", "s4", "s5"] {
            for recommendations in doc[&HeroId::new(id)].values() {
                assert!(!recommendations.is_empty());
                for recommendation in recommendations {
                    assert_eq!(recommendation.faction_bonus.value, 35);
                }
            }
        }
    }

    #[test]
    fn test_teams_and_formations_are_valid() {
        let doc = document(&mixed_roster(), 3);
        for (anchor, by_mode) in &doc {
            for recommendations in by_mode.values() {
                let labels = recommendations.iter().map(|r| r.label).collect::<Vec<_>>();
                assert_eq!(labels[0], SelectionLabel::Meta);
                let mut keys = BTreeSet::new();
                for recommendation in recommendations {
                    let members = recommendation.members.iter().collect::<BTreeSet<_>>();
                    assert_eq!(members.len(), 5);
                    assert_eq!(&recommendation.members[0], anchor);
                    assert!(keys.insert(members.clone()));

                    let placed = recommendation
                        .formation
                        .iter()
                        .map(|slot| &slot.hero)
                        .collect::<BTreeSet<_>>();
                    assert_eq!(placed, members);
                    let slots = recommendation
                        .formation
                        .iter()
                        .map(|slot| slot.slot.as_str())
                        .collect::<BTreeSet<_>>();
                    assert_eq!(slots.len(), 5);
                    assert_eq!(recommendation.heroes.len(), 5);
                    assert!(recommendation.heroes.iter().all(|h| h.tags.len() <= 3));
                }
            }
        }
    }

    #[test]
    fn test_document_is_reproducible_across_thread_counts() {
        let one = serde_json::to_string_pretty(&document(&mixed_roster(), 1)).unwrap();
        let again = serde_json::to_string_pretty(&document(&mixed_roster(), 1)).unwrap();
        let many = serde_json::to_string_pretty(&document(&mixed_roster(), 4)).unwrap();
        assert_eq!(one, again);
        assert_eq!(one, many);
    }

    #[test]
    fn test_document_shape() {
        let doc = document(&mixed_roster(), 2);
        let json = serde_json::to_value(&doc).unwrap();
        let meta = &json["h1"]["pvp"][0];
        assert_eq!(meta["label"], "meta");
        assert_eq!(meta["members"][0], "h1");
        assert_eq!(meta["formation"].as_array().unwrap().len(), 5);
        assert_eq!(meta["formation"][0]["slot"], "back-left");
        assert!(meta["score"].is_number());
        assert!(meta["faction_bonus"]["description"].is_string());
        assert!(meta["rationale"].as_array().unwrap().len() >= 2);
        assert_eq!(json["w1"]["general"][0]["heroes"][0]["overall"], "A");
    }
}
