//! The configuration document and its validation.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use squadsmith_evaluator::{faction_bonus::FactionBonusConfig, hero_scorer::ScoringConfig};
use squadsmith_roster::{Mode, RosterConfig, TEAM_SIZE};
use squadsmith_search::{SearchConfig, formation::FormationConfig};
use squadsmith_tagging::{
    TaggingConfig,
    tag::{Tag, TagVocabulary},
};

use crate::util;

/// Every tunable of a run.
///
/// When a file is given every section must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub tagging: TaggingConfig,
    pub roster: RosterConfig,
    pub scoring: ScoringConfig,
    pub faction_bonus: FactionBonusConfig,
    pub search: SearchConfig,
    pub formation: FormationConfig,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{path} must be a finite number, got {value}")]
    NonFinite { path: String, value: f32 },
    #[display("{path} must not be negative, got {value}")]
    Negative { path: String, value: f32 },
    #[display("{path} refers to unknown stat '{stat}'")]
    UnknownStat { path: String, stat: String },
    #[display("{path} refers to tag '{tag}' which is not in the vocabulary")]
    UnknownTag { path: String, tag: String },
    #[display("{path} refers to unknown signal '{signal}'")]
    UnknownSignal { path: String, signal: String },
    #[display("search.attempts must be at least 1")]
    ZeroAttempts,
    #[display("search.pool_size must be at least {min}, got {pool_size}")]
    PoolTooSmall { pool_size: usize, min: usize },
    #[display("scoring.tiers boundaries must be sorted by descending score")]
    UnsortedTiers,
    #[display("formation slot '{slot}' is listed more than once")]
    DuplicateSlot { slot: String },
    #[display("formation override for {hero} names unknown slot '{slot}'")]
    UnknownSlot { hero: String, slot: String },
}

impl Config {
    /// Checks cross-references and numeric ranges that serde cannot express.
    pub fn validate(&self, vocabulary: &TagVocabulary) -> Result<(), ConfigError> {
        for (path, value) in self.numbers() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { path, value });
            }
        }
        if self.search.noise_sigma < 0.0 {
            return Err(ConfigError::Negative {
                path: "search.noise_sigma".to_owned(),
                value: self.search.noise_sigma,
            });
        }
        if self.search.attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        let min = TEAM_SIZE - 1;
        if self.search.pool_size < min {
            return Err(ConfigError::PoolTooSmall {
                pool_size: self.search.pool_size,
                min,
            });
        }
        if !self.scoring.tiers.is_sorted() {
            return Err(ConfigError::UnsortedTiers);
        }
        self.validate_stats()?;
        self.validate_tags(vocabulary)?;
        self.validate_signals()?;
        self.validate_slots()
    }

    /// Every weight of the document with its path.
    fn numbers(&self) -> Vec<(String, f32)> {
        let mut numbers = vec![];
        let mut map = |prefix: &str, values: &BTreeMap<String, f32>| {
            numbers.extend(
                values
                    .iter()
                    .map(|(key, value)| (format!("{prefix}.{key}"), *value)),
            );
        };

        let scoring = &self.scoring;
        map("scoring.stat_weights", &scoring.stat_weights);
        map("scoring.synergy.tag_points", &scoring.synergy.tag_points);
        for mode in Mode::ALL {
            let weights = scoring.modes.get(mode);
            map(
                &format!("scoring.modes.{mode}.signal_multipliers"),
                &weights.signal_multipliers,
            );
            map(
                &format!("scoring.modes.{mode}.tag_multipliers"),
                &weights.tag_multipliers,
            );
        }
        map("search.pool_key.stat_weights", &self.search.pool_key.stat_weights);
        for (name, profile) in [
            ("high_pressure", &self.formation.high_pressure),
            ("low_pressure", &self.formation.low_pressure),
        ] {
            map(&format!("formation.{name}.tags"), &profile.tags);
            map(&format!("formation.{name}.classes"), &profile.classes);
        }

        let mut push = |path: &str, value: f32| numbers.push((path.to_owned(), value));
        push("scoring.channel_points", scoring.channel_points);
        push("scoring.text_cap", scoring.text_cap);
        push(
            "scoring.numeric_density.saturation",
            scoring.numeric_density.saturation,
        );
        push(
            "scoring.numeric_density.max_bonus",
            scoring.numeric_density.max_bonus,
        );
        push("scoring.synergy.cap", scoring.synergy.cap);
        push("scoring.synergy.scale", scoring.synergy.scale);
        for signal in &scoring.signals {
            push(&format!("scoring.signals.{}", signal.key), signal.points);
        }
        for mode in Mode::ALL {
            let weights = scoring.modes.get(mode);
            push(&format!("scoring.modes.{mode}.stats"), weights.stats);
            push(&format!("scoring.modes.{mode}.text"), weights.text);
            push(&format!("scoring.modes.{mode}.synergy"), weights.synergy);
        }
        for boundary in &scoring.tiers.boundaries {
            push(
                &format!("scoring.tiers.{}", boundary.tier),
                boundary.min_score,
            );
        }

        let search = &self.search;
        push("search.noise_sigma", search.noise_sigma);
        push("search.pool_key.rating_weight", search.pool_key.rating_weight);
        for value in search.rating_values.iter() {
            push("search.rating_values", value);
        }
        push("search.faction_weight", search.faction_weight);
        push("search.presence_weight", search.presence_weight);
        push("search.plan_penalty", search.plan_penalty);
        push("search.synergy.cap", search.synergy.cap);
        for (i, rule) in search.synergy.rules.iter().enumerate() {
            for points in rule.points() {
                push(&format!("search.synergy.rules[{i}]"), points);
            }
        }

        for (name, profile) in [
            ("high_pressure", &self.formation.high_pressure),
            ("low_pressure", &self.formation.low_pressure),
        ] {
            push(&format!("formation.{name}.durability"), profile.durability);
            push(&format!("formation.{name}.burst"), profile.burst);
        }
        numbers
    }

    fn validate_stats(&self) -> Result<(), ConfigError> {
        let known = self
            .scoring
            .stat_weights
            .keys()
            .chain(&self.roster.required_stats)
            .chain(self.roster.stat_aliases.keys())
            .map(String::as_str)
            .collect::<BTreeSet<_>>();
        let referenced = [
            (
                "search.pool_key.stat_weights",
                self.search.pool_key.stat_weights.keys().collect::<Vec<_>>(),
            ),
            (
                "formation.durability_stats",
                self.formation.durability_stats.iter().collect(),
            ),
            (
                "formation.burst_stats",
                self.formation.burst_stats.iter().collect(),
            ),
        ];
        for (path, stats) in referenced {
            if let Some(stat) = stats.into_iter().find(|stat| !known.contains(stat.as_str())) {
                return Err(ConfigError::UnknownStat {
                    path: path.to_owned(),
                    stat: stat.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_tags(&self, vocabulary: &TagVocabulary) -> Result<(), ConfigError> {
        let unknown = |path: String, names: Vec<&str>| match vocabulary.find_unknown(names) {
            Some(tag) => Err(ConfigError::UnknownTag {
                path,
                tag: tag.to_owned(),
            }),
            None => Ok(()),
        };

        unknown(
            "scoring.synergy.tag_points".to_owned(),
            keys(&self.scoring.synergy.tag_points),
        )?;
        for mode in Mode::ALL {
            unknown(
                format!("scoring.modes.{mode}.tag_multipliers"),
                keys(&self.scoring.modes.get(mode).tag_multipliers),
            )?;
        }
        for (i, rule) in self.search.synergy.rules.iter().enumerate() {
            let names = rule
                .matchers()
                .into_iter()
                .flat_map(|matcher| matcher.tag_names())
                .collect();
            unknown(format!("search.synergy.rules[{i}]"), names)?;
        }
        unknown(
            "formation.high_pressure.tags".to_owned(),
            keys(&self.formation.high_pressure.tags),
        )?;
        unknown(
            "formation.low_pressure.tags".to_owned(),
            keys(&self.formation.low_pressure.tags),
        )
    }

    fn validate_signals(&self) -> Result<(), ConfigError> {
        let known = self
            .scoring
            .signals
            .iter()
            .map(|signal| signal.key.as_str())
            .collect::<BTreeSet<_>>();
        for mode in Mode::ALL {
            let multipliers = &self.scoring.modes.get(mode).signal_multipliers;
            if let Some(signal) = multipliers.keys().find(|key| !known.contains(key.as_str())) {
                return Err(ConfigError::UnknownSignal {
                    path: format!("scoring.modes.{mode}.signal_multipliers"),
                    signal: signal.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_slots(&self) -> Result<(), ConfigError> {
        let mut slots = BTreeSet::new();
        for slot in self.formation.slots() {
            if !slots.insert(slot) {
                return Err(ConfigError::DuplicateSlot {
                    slot: slot.to_owned(),
                });
            }
        }
        for (hero, slot) in &self.formation.overrides {
            if !slots.contains(slot.as_str()) {
                return Err(ConfigError::UnknownSlot {
                    hero: hero.to_string(),
                    slot: slot.clone(),
                });
            }
        }
        Ok(())
    }
}

fn keys(map: &BTreeMap<String, f32>) -> Vec<&str> {
    map.keys().map(String::as_str).collect()
}

/// Reads the configuration, falling back to the built-in defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => util::read_json_file("config", path),
        None => {
            tracing::info!("no configuration file given, using built-in defaults");
            Ok(Config::default())
        }
    }
}

/// Vocabulary file: a plain array of tag names, or a full vocabulary with aliases.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VocabularyFile {
    Names(Vec<String>),
    Full(TagVocabulary),
}

impl From<VocabularyFile> for TagVocabulary {
    fn from(file: VocabularyFile) -> Self {
        match file {
            VocabularyFile::Names(names) => TagVocabulary::new(names.into_iter().map(Tag::new)),
            VocabularyFile::Full(vocabulary) => vocabulary,
        }
    }
}

/// Reads the tag vocabulary, falling back to the built-in one.
pub fn load_vocabulary(path: Option<&Path>) -> anyhow::Result<TagVocabulary> {
    let Some(path) = path else {
        return Ok(TagVocabulary::default());
    };
    let file: VocabularyFile = util::read_json_file("vocabulary", path)?;
    let vocabulary = TagVocabulary::from(file);
    anyhow::ensure!(
        !vocabulary.is_empty(),
        "vocabulary file {} lists no tags",
        path.display()
    );
    tracing::debug!(tags = vocabulary.len(), "vocabulary loaded");
    Ok(vocabulary)
}

/// Reads and validates everything a run needs besides the roster.
pub fn load(
    config: Option<&Path>,
    vocabulary: Option<&Path>,
    overrides: impl FnOnce(&mut Config),
) -> anyhow::Result<(Config, TagVocabulary)> {
    let vocabulary = load_vocabulary(vocabulary)?;
    let mut config = load_config(config)?;
    overrides(&mut config);
    config
        .validate(&vocabulary)
        .context("Invalid configuration")?;
    Ok((config, vocabulary))
}

#[cfg(test)]
mod tests {
    use squadsmith_evaluator::team_synergy::{MemberMatcher, SynergyRule};
    use squadsmith_roster::HeroId;

    use super::*;

    fn check(config: &Config) -> Result<(), ConfigError> {
        config.validate(&TagVocabulary::default())
    }

    #[test]
    fn test_defaults_are_valid() {
        check(&Config::default()).unwrap();
    }

    #[test]
    fn test_defaults_round_trip_through_json() {
        let json = serde_json::to_string_pretty(&Config::default()).unwrap();
        let config: Config = serde_json::from_str(&json).unwrap();
        check(&config).unwrap();
        assert_eq!(serde_json::to_string_pretty(&config).unwrap(), json);
    }

    #[test]
    fn test_missing_and_unknown_sections_are_rejected() {
        let mut value = serde_json::to_value(Config::default()).unwrap();
        value.as_object_mut().unwrap().remove("formation");
        assert!(serde_json::from_value::<Config>(value.clone()).is_err());

        let mut value = serde_json::to_value(Config::default()).unwrap();
        value["search"]["threads"] = 4.into();
        assert!(serde_json::from_value::<Config>(value).is_err());
    }

    #[test]
    fn test_numeric_ranges() {
        let mut config = Config::default();
        config.search.faction_weight = f32::NAN;
        assert!(matches!(
            check(&config),
            Err(ConfigError::NonFinite { path, .. }) if path == "search.faction_weight"
        ));

        let mut config = Config::default();
        config.search.noise_sigma = -1.0;
        assert!(matches!(check(&config), Err(ConfigError::Negative { .. })));

        let mut config = Config::default();
        config.search.attempts = 0;
        assert!(matches!(check(&config), Err(ConfigError::ZeroAttempts)));

        let mut config = Config::default();
        config.search.pool_size = 3;
        assert!(matches!(
            check(&config),
            Err(ConfigError::PoolTooSmall { pool_size: 3, min: 4 })
        ));

        let mut config = Config::default();
        config.scoring.tiers.boundaries.reverse();
        assert!(matches!(check(&config), Err(ConfigError::UnsortedTiers)));
    }

    #[test]
    fn test_unknown_references() {
        let mut config = Config::default();
        config
            .search
            .pool_key
            .stat_weights
            .insert("luck".to_owned(), 1.0);
        assert!(matches!(
            check(&config),
            Err(ConfigError::UnknownStat { stat, .. }) if stat == "luck"
        ));

        let mut config = Config::default();
        config.search.synergy.rules.push(SynergyRule::Count {
            matcher: MemberMatcher {
                tags: vec!["FLYING".to_owned()],
                ..MemberMatcher::default()
            },
            at_least: 1,
            points: 1.0,
            modes: vec![],
            rationale: String::new(),
        });
        assert!(matches!(
            check(&config),
            Err(ConfigError::UnknownTag { tag, .. }) if tag == "FLYING"
        ));

        let mut config = Config::default();
        config
            .scoring
            .modes
            .pvp
            .signal_multipliers
            .insert("TELEPATHY".to_owned(), 2.0);
        assert!(matches!(
            check(&config),
            Err(ConfigError::UnknownSignal { signal, .. }) if signal == "TELEPATHY"
        ));
    }

    #[test]
    fn test_slot_checks() {
        let mut config = Config::default();
        config.formation.back_slots[2] = "back-left".to_owned();
        assert!(matches!(
            check(&config),
            Err(ConfigError::DuplicateSlot { slot }) if slot == "back-left"
        ));

        let mut config = Config::default();
        config
            .formation
            .overrides
            .insert(HeroId::new("x"), "bench".to_owned());
        assert!(matches!(check(&config), Err(ConfigError::UnknownSlot { .. })));
    }

    #[test]
    fn test_vocabulary_file_formats() {
        let names: VocabularyFile = serde_json::from_str(r#"["HEAL_TEAM", "TAUNT"]"#).unwrap();
        let vocabulary = TagVocabulary::from(names);
        assert_eq!(vocabulary.len(), 2);
        assert!(vocabulary.contains("TAUNT"));

        let json = serde_json::to_string(&TagVocabulary::default()).unwrap();
        let full: VocabularyFile = serde_json::from_str(&json).unwrap();
        let vocabulary = TagVocabulary::from(full);
        assert_eq!(vocabulary.len(), TagVocabulary::default().len());
        assert!(vocabulary.resolve("HEAL").is_some());
    }

    #[test]
    fn test_small_vocabulary_rejects_default_tags() {
        let vocabulary = TagVocabulary::new([Tag::new("HEAL_TEAM")]);
        assert!(matches!(
            Config::default().validate(&vocabulary),
            Err(ConfigError::UnknownTag { .. })
        ));
    }
}
