//! Candidate pool of an anchor.
//!
//! Sampling over the whole roster would waste most attempts on weak heroes, so each
//! search first ranks every other hero by a cheap key and keeps the top `pool_size`.
//!
//! The key is `Σ weight × percentile` over a few core stats plus the hero's rating for
//! the mode times `rating_weight`. Optional Gaussian noise lets repeated runs with
//! different seeds explore slightly different pools.

use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use squadsmith_analysis::enrichment::EnrichedRoster;
use squadsmith_roster::{HeroIndex, Mode, RatingTier};

use crate::SearchConfig;

/// Weights of the pool ranking key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolKeyConfig {
    pub stat_weights: BTreeMap<String, f32>,
    pub rating_weight: f32,
}

impl Default for PoolKeyConfig {
    fn default() -> Self {
        let stat_weights = [("hp", 1.0), ("atk", 1.0), ("armor", 0.5), ("magicRes", 0.5)]
            .into_iter()
            .map(|(stat, weight)| (stat.to_owned(), weight))
            .collect();
        Self {
            stat_weights,
            rating_weight: 0.6,
        }
    }
}

/// Numeric value of each rating tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatingValues {
    pub sss: f32,
    pub ss: f32,
    pub s: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    /// Value of a hero without a usable rating.
    pub unrated: f32,
}

impl Default for RatingValues {
    fn default() -> Self {
        Self {
            sss: 10.0,
            ss: 9.0,
            s: 8.0,
            a: 6.0,
            b: 4.0,
            c: 2.0,
            d: 1.0,
            unrated: 2.0,
        }
    }
}

impl RatingValues {
    #[must_use]
    pub fn value(&self, tier: Option<RatingTier>) -> f32 {
        match tier {
            Some(RatingTier::Sss) => self.sss,
            Some(RatingTier::Ss) => self.ss,
            Some(RatingTier::S) => self.s,
            Some(RatingTier::A) => self.a,
            Some(RatingTier::B) => self.b,
            Some(RatingTier::C) => self.c,
            Some(RatingTier::D) => self.d,
            None => self.unrated,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> {
        [
            self.sss,
            self.ss,
            self.s,
            self.a,
            self.b,
            self.c,
            self.d,
            self.unrated,
        ]
        .into_iter()
    }
}

/// The heroes an anchor's teams are drawn from, best key first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    members: Vec<HeroIndex>,
}

impl CandidatePool {
    /// Ranks every hero except `anchor` and keeps the best `config.pool_size`.
    ///
    /// With `noise_sigma > 0` a normal sample is added to each key, drawn in roster order.
    pub fn build<R>(
        enriched: &EnrichedRoster,
        anchor: HeroIndex,
        mode: Mode,
        config: &SearchConfig,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let key_config = &config.pool_key;
        let noise = (config.noise_sigma > 0.0)
            .then(|| Normal::new(0.0, config.noise_sigma).ok())
            .flatten();
        let mut ranked = enriched
            .iter()
            .filter(|(_, info)| info.index() != anchor)
            .map(|(hero, info)| {
                let stat_key = key_config
                    .stat_weights
                    .iter()
                    .filter_map(|(stat, weight)| Some(info.percentile(stat)? * weight))
                    .sum::<f32>();
                let rating = config.rating_values.value(hero.ratings().tier(mode));
                let mut key = stat_key + rating * key_config.rating_weight;
                if let Some(noise) = noise {
                    key += rng.sample(noise);
                }
                (info.index(), key)
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|(a_index, a), (b_index, b)| b.total_cmp(a).then(a_index.cmp(b_index)));
        ranked.truncate(config.pool_size);
        Self {
            members: ranked.into_iter().map(|(index, _)| index).collect(),
        }
    }

    #[must_use]
    pub fn members(&self) -> &[HeroIndex] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
