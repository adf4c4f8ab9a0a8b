//! Roster-wide power index.
//!
//! Raw hero scores only mean something relative to the rest of the roster, so for each
//! mode they are rescaled onto `[0, 100]` against the observed minimum and maximum
//! (a roster where every hero scores the same puts everyone at 50) and mapped onto
//! a rating tier.
//!
//! The rescaled score is what the team search sums over members.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use squadsmith_analysis::enrichment::EnrichedRoster;
use squadsmith_roster::{HeroIndex, Mode, RatingTier};
use squadsmith_stats::descriptive::DescriptiveStats;
use squadsmith_stats::scale::MinMaxScale;

use crate::hero_scorer::{HeroScorer, ScoreBreakdown};

/// Upper bound of the power index.
pub const POWER_SPAN: f32 = 100.0;

/// Lowest score that earns `tier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierBoundary {
    pub tier: RatingTier,
    pub min_score: f32,
}

/// Score-to-tier mapping.
///
/// Boundaries are checked in order and must be strictly descending; a score below
/// every boundary gets `floor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierScale {
    pub boundaries: Vec<TierBoundary>,
    pub floor: RatingTier,
}

impl Default for TierScale {
    fn default() -> Self {
        let boundaries = [
            (RatingTier::Sss, 90.0),
            (RatingTier::Ss, 80.0),
            (RatingTier::S, 70.0),
            (RatingTier::A, 60.0),
            (RatingTier::B, 50.0),
        ]
        .into_iter()
        .map(|(tier, min_score)| TierBoundary { tier, min_score })
        .collect();
        Self {
            boundaries,
            floor: RatingTier::C,
        }
    }
}

impl TierScale {
    #[must_use]
    pub fn tier(&self, score: f32) -> RatingTier {
        self.boundaries
            .iter()
            .find(|boundary| score >= boundary.min_score)
            .map_or(self.floor, |boundary| boundary.tier)
    }

    /// Returns `true` if the boundaries are finite and strictly descending.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.boundaries.iter().all(|b| b.min_score.is_finite())
            && self
                .boundaries
                .windows(2)
                .all(|pair| pair[0].min_score > pair[1].min_score)
    }
}

/// One hero's standing in one mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroPower {
    /// Raw score rescaled onto `[0, 100]`.
    pub score: f32,
    pub tier: RatingTier,
    pub breakdown: ScoreBreakdown,
}

/// Power of every hero in every mode.
#[derive(Debug, Clone)]
pub struct PowerIndex {
    indices: Vec<HeroIndex>,
    modes: BTreeMap<Mode, Vec<HeroPower>>,
}

impl PowerIndex {
    #[must_use]
    pub fn compute(enriched: &EnrichedRoster, scorer: &HeroScorer, tiers: &TierScale) -> Self {
        let modes = Mode::ALL
            .into_iter()
            .map(|mode| (mode, Self::compute_mode(enriched, scorer, tiers, mode)))
            .collect();
        let indices = enriched.iter().map(|(_, info)| info.index()).collect();
        Self { indices, modes }
    }

    fn compute_mode(
        enriched: &EnrichedRoster,
        scorer: &HeroScorer,
        tiers: &TierScale,
        mode: Mode,
    ) -> Vec<HeroPower> {
        let breakdowns = enriched
            .iter()
            .map(|(hero, info)| scorer.score(hero, info, mode))
            .collect::<Vec<_>>();
        let scale = DescriptiveStats::new(breakdowns.iter().map(|b| b.total))
            .map_or(MinMaxScale::new(0.0, 0.0), |stats| stats.scale());
        tracing::debug!(
            %mode,
            min = scale.min(),
            max = scale.max(),
            "raw score range"
        );
        breakdowns
            .into_iter()
            .map(|breakdown| {
                let score = scale.rescale(breakdown.total, POWER_SPAN);
                HeroPower {
                    score,
                    tier: tiers.tier(score),
                    breakdown,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn get(&self, index: HeroIndex, mode: Mode) -> &HeroPower {
        &self.modes[&mode][index.get()]
    }

    /// Rescaled score of `index` in `mode`.
    #[must_use]
    pub fn score(&self, index: HeroIndex, mode: Mode) -> f32 {
        self.get(index, mode).score
    }

    /// Heroes of `mode` ordered by descending score, ties by index.
    #[must_use]
    pub fn ranking(&self, mode: Mode) -> Vec<(HeroIndex, &HeroPower)> {
        let mut ranked = self
            .indices
            .iter()
            .copied()
            .zip(&self.modes[&mode])
            .collect::<Vec<_>>();
        ranked.sort_by(|(a_index, a), (b_index, b)| {
            b.score.total_cmp(&a.score).then(a_index.cmp(b_index))
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use squadsmith_roster::{HeroRecord, Roster, RosterConfig, StatValue};
    use squadsmith_tagging::{TagEngine, TaggingConfig, tag::TagVocabulary};

    use super::*;
    use crate::hero_scorer::ScoringConfig;

    fn power_index(hps: &[f32]) -> (EnrichedRoster, PowerIndex) {
        let records = hps.iter().enumerate().map(|(i, hp)| {
            let mut record = HeroRecord::minimal(&format!("h{i}"), "H", "Hearts");
            record.stats.insert("hp".into(), StatValue::Number(*hp));
            record.stats.insert("atk".into(), StatValue::Number(100.0));
            record
        });
        let roster = Roster::from_records(records, &RosterConfig::default()).unwrap();
        let engine = TagEngine::new(&TaggingConfig::default(), &TagVocabulary::default()).unwrap();
        let enriched = EnrichedRoster::build(roster, &engine);
        let config = ScoringConfig::default();
        let scorer = HeroScorer::new(&config).unwrap();
        let index = PowerIndex::compute(&enriched, &scorer, &config.tiers);
        (enriched, index)
    }

    #[test]
    fn test_scores_span_zero_to_hundred() {
        let (enriched, index) = power_index(&[1000.0, 3000.0, 2000.0, 1500.0, 2500.0]);
        for mode in Mode::ALL {
            let ranking = index.ranking(mode);
            assert_eq!(ranking.len(), enriched.len());
            assert_eq!(ranking[0].1.score, 100.0);
            assert_eq!(ranking[0].1.tier, RatingTier::Sss);
            assert_eq!(ranking[4].1.score, 0.0);
            assert_eq!(ranking[4].1.tier, RatingTier::C);
            let top = enriched.roster().hero(ranking[0].0);
            assert_eq!(top.id().as_str(), "h1");
        }
    }

    #[test]
    fn test_identical_heroes_score_fifty() {
        let (enriched, index) = power_index(&[1000.0; 5]);
        for (_, info) in enriched.iter() {
            assert_eq!(index.score(info.index(), Mode::Pvp), 50.0);
            assert_eq!(index.get(info.index(), Mode::Pvp).tier, RatingTier::B);
        }
    }

    #[test]
    fn test_default_tiers() {
        let tiers = TierScale::default();
        assert!(tiers.is_sorted());
        assert_eq!(tiers.tier(100.0), RatingTier::Sss);
        assert_eq!(tiers.tier(90.0), RatingTier::Sss);
        assert_eq!(tiers.tier(89.9), RatingTier::Ss);
        assert_eq!(tiers.tier(70.0), RatingTier::S);
        assert_eq!(tiers.tier(60.0), RatingTier::A);
        assert_eq!(tiers.tier(50.0), RatingTier::B);
        assert_eq!(tiers.tier(49.9), RatingTier::C);
        assert_eq!(tiers.tier(0.0), RatingTier::C);
    }

    #[test]
    fn test_unsorted_tiers_are_detected() {
        let mut tiers = TierScale::default();
        tiers.boundaries.swap(0, 1);
        assert!(!tiers.is_sorted());
    }
}
