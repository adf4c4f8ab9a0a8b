//! Read-only enriched view of a roster.
//!
//! Tagging and normalization run exactly once per run; everything downstream
//! (scoring, search, formation) borrows the resulting [`EnrichedRoster`].

use std::collections::BTreeMap;

use squadsmith_roster::{Hero, HeroIndex, Roster};
use squadsmith_tagging::{TagEngine, evidence::HeroTags};

use crate::normalization::StatNormalizer;

/// A hero with its tags, evidence and stat percentiles.
#[derive(Debug, Clone)]
pub struct EnrichedHero {
    index: HeroIndex,
    tags: HeroTags,
    percentiles: BTreeMap<String, f32>,
}

impl EnrichedHero {
    #[must_use]
    pub fn index(&self) -> HeroIndex {
        self.index
    }

    #[must_use]
    pub fn tags(&self) -> &HeroTags {
        &self.tags
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    #[must_use]
    pub fn percentiles(&self) -> &BTreeMap<String, f32> {
        &self.percentiles
    }

    /// Percentile of `stat`, `None` if the hero does not expose it.
    #[must_use]
    pub fn percentile(&self, stat: &str) -> Option<f32> {
        self.percentiles.get(stat).copied()
    }
}

/// The roster plus everything derived from it before scoring.
#[derive(Debug, Clone)]
pub struct EnrichedRoster {
    roster: Roster,
    heroes: Vec<EnrichedHero>,
    normalizer: StatNormalizer,
}

impl EnrichedRoster {
    #[must_use]
    pub fn build(roster: Roster, engine: &TagEngine) -> Self {
        let normalizer = StatNormalizer::from_roster(&roster);
        let heroes = roster
            .iter()
            .map(|(index, hero)| EnrichedHero {
                index,
                tags: engine.tag_hero(hero),
                percentiles: normalizer.hero_percentiles(hero),
            })
            .collect::<Vec<_>>();
        tracing::info!(
            heroes = heroes.len(),
            stats = normalizer.stat_params.len(),
            strategy = engine.strategy_name(),
            "roster enriched"
        );
        Self {
            roster,
            heroes,
            normalizer,
        }
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn normalizer(&self) -> &StatNormalizer {
        &self.normalizer
    }

    #[must_use]
    pub fn hero(&self, index: HeroIndex) -> &Hero {
        self.roster.hero(index)
    }

    #[must_use]
    pub fn enriched(&self, index: HeroIndex) -> &EnrichedHero {
        &self.heroes[index.get()]
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Hero, &EnrichedHero)> {
        self.heroes
            .iter()
            .map(|enriched| (self.roster.hero(enriched.index), enriched))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}
