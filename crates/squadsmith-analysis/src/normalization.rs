//! Roster-relative stat normalization
//!
//! Raw stats live on wildly different scales (HP in the tens of thousands, crit rate
//! in single digits), so every stat is mapped onto \[0, 1\] relative to the range
//! observed on the current roster before any weight is applied.
//!
//! # Overview
//!
//! 1. For each stat name observed on at least one hero, collect the values of the
//!    heroes that expose it (a missing stat is *absent*, not zero)
//! 2. Summarize them with [`DescriptiveStats`]
//! 3. Map a value to its position in `[min, max]` with [`MinMaxScale`]
//!
//! # Example
//!
//! ```no_run
//! use squadsmith_analysis::normalization::StatNormalizer;
//! use squadsmith_roster::Roster;
//!
//! let roster: Roster = todo!();
//! let normalizer = StatNormalizer::from_roster(&roster);
//! if let Some(param) = normalizer.get("hp") {
//!     println!("hp: min {}, max {}, mean {}", param.stats.min, param.stats.max, param.stats.mean);
//! }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use squadsmith_roster::{Hero, Roster};
use squadsmith_stats::{descriptive::DescriptiveStats, scale::MinMaxScale};

/// Normalization parameters for every stat observed on a roster.
#[derive(Debug, Clone)]
pub struct StatNormalizer {
    /// Mapping from canonical stat name to its parameters
    pub stat_params: BTreeMap<String, StatNormalizationParam>,
}

/// Normalization parameters for a single stat.
#[derive(Debug, Clone)]
pub struct StatNormalizationParam {
    /// Summary of the values observed on heroes exposing the stat
    pub stats: DescriptiveStats,
    /// Scale spanning the observed range
    pub scale: MinMaxScale,
}

/// Serializable summary, used by the power index report.
#[derive(Debug, Clone, Serialize)]
pub struct StatSummary {
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl StatNormalizer {
    /// Computes parameters for every stat present on at least one hero.
    #[must_use]
    pub fn from_roster(roster: &Roster) -> Self {
        Self::from_heroes(roster.iter().map(|(_, hero)| hero))
    }

    /// Computes parameters from an arbitrary set of heroes.
    #[must_use]
    pub fn from_heroes<'a, I>(heroes: I) -> Self
    where
        I: IntoIterator<Item = &'a Hero>,
    {
        let mut values: BTreeMap<&str, Vec<f32>> = BTreeMap::new();
        for hero in heroes {
            for (name, value) in hero.stats() {
                values.entry(name.as_str()).or_default().push(*value);
            }
        }
        let stat_params = values
            .into_iter()
            .filter_map(|(name, values)| {
                let stats = DescriptiveStats::new(values)?;
                let scale = stats.scale();
                Some((name.to_owned(), StatNormalizationParam { stats, scale }))
            })
            .collect();
        Self { stat_params }
    }

    #[must_use]
    pub fn get(&self, stat: &str) -> Option<&StatNormalizationParam> {
        self.stat_params.get(stat)
    }

    /// Position of `value` within the observed range of `stat`.
    ///
    /// Returns `None` for a stat no hero exposes.
    #[must_use]
    pub fn percentile(&self, stat: &str, value: f32) -> Option<f32> {
        self.get(stat).map(|param| param.scale.position(value))
    }

    /// Percentiles of every stat the hero exposes.
    #[must_use]
    pub fn hero_percentiles(&self, hero: &Hero) -> BTreeMap<String, f32> {
        hero.stats()
            .iter()
            .filter_map(|(name, value)| Some((name.clone(), self.percentile(name, *value)?)))
            .collect()
    }

    /// Summaries of every stat, keyed by name.
    #[must_use]
    pub fn summaries(&self) -> BTreeMap<String, StatSummary> {
        self.stat_params
            .iter()
            .map(|(name, param)| {
                let summary = StatSummary {
                    count: param.stats.count,
                    min: param.stats.min,
                    max: param.stats.max,
                    mean: param.stats.mean,
                };
                (name.clone(), summary)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use squadsmith_roster::{HeroRecord, RosterConfig, StatValue};

    use super::*;

    fn roster(stats: &[&[(&str, f32)]]) -> Roster {
        let records = stats.iter().enumerate().map(|(i, stats)| {
            let mut record = HeroRecord::minimal(&format!("h{i}"), "H", "Hearts");
            record.stats.insert("hp".into(), StatValue::Number(1000.0));
            record.stats.insert("atk".into(), StatValue::Number(100.0));
            for (name, value) in *stats {
                record
                    .stats
                    .insert((*name).to_owned(), StatValue::Number(*value));
            }
            record
        });
        Roster::from_records(records, &RosterConfig::default()).unwrap()
    }

    #[test]
    fn test_missing_stats_are_excluded() {
        let roster = roster(&[
            &[("might", 10.0)],
            &[("might", 30.0)],
            &[],
            &[],
            &[("might", 20.0)],
        ]);
        let normalizer = StatNormalizer::from_roster(&roster);
        let might = normalizer.get("might").unwrap();
        assert_eq!(might.stats.count, 3);
        assert_eq!(might.stats.mean, 20.0);
        assert_eq!(normalizer.percentile("might", 30.0), Some(1.0));
        assert_eq!(normalizer.percentile("might", 20.0), Some(0.5));
        assert_eq!(normalizer.percentile("nonexistent", 1.0), None);

        let hero = roster.hero(roster.index_of(&"h2".into()).unwrap());
        assert!(!normalizer.hero_percentiles(hero).contains_key("might"));
    }

    #[test]
    fn test_constant_stat_is_midpoint() {
        let roster = roster(&[&[], &[], &[], &[], &[]]);
        let normalizer = StatNormalizer::from_roster(&roster);
        assert_eq!(normalizer.percentile("hp", 1000.0), Some(0.5));
    }

    #[test]
    fn test_percentiles_are_bounded_and_max_is_one() {
        let roster = roster(&[
            &[("armor", 12.5)],
            &[("armor", 800.0)],
            &[("armor", 3.0)],
            &[("armor", 400.0)],
            &[("armor", 799.0)],
        ]);
        let normalizer = StatNormalizer::from_roster(&roster);
        for (_, hero) in roster.iter() {
            for (stat, p) in normalizer.hero_percentiles(hero) {
                assert!((0.0..=1.0).contains(&p), "{stat}: {p}");
            }
        }
        let top = roster.hero(roster.index_of(&"h1".into()).unwrap());
        assert_eq!(normalizer.hero_percentiles(top)["armor"], 1.0);
    }
}
