//! Evidence-based capability tagging for heroes.
//!
//! This crate turns a hero's free-text kit (skills, upgrades, relic) into a set of
//! capability tags drawn from a published vocabulary, and records for each tag why
//! it was assigned.
//!
//! # Overview
//!
//! ```text
//! kit text (lower-cased)
//!     ↓ TagStrategy (inference rule table | curated synergies field)
//! tag → evidence
//!     ↓ HeroTags::new (hard exclusions)
//! HeroTags
//! ```
//!
//! - [`tag`]: tag names and the [`TagVocabulary`](tag::TagVocabulary)
//! - [`rule`]: declarative [`RuleSpec`](rule::RuleSpec)s and the generic matcher
//! - [`rule_table`]: the fixed, ordered table of capabilities
//! - [`strategy`]: the [`TagStrategy`](strategy::TagStrategy) implementations
//! - [`evidence`]: matched spans, snippets and the per-hero [`HeroTags`](evidence::HeroTags)
//!
//! # Hard exclusions
//!
//! Whatever the strategy, a hero never carries both the team-wide and the self-only
//! variant of a capability, and a hero whose kit says it performs no ordinary attacks
//! carries no attack-scaling tag.
//!
//! # Example
//!
//! ```
//! use squadsmith_roster::{HeroRecord, Roster, RosterConfig, Skill, StatValue};
//! use squadsmith_tagging::{TagEngine, TaggingConfig, tag::TagVocabulary};
//!
//! let records = (0..5).map(|i| {
//!     let mut record = HeroRecord::minimal(&format!("h{i}"), "Hero", "Hearts");
//!     record.stats.insert("hp".into(), StatValue::Number(1.0));
//!     record.stats.insert("atk".into(), StatValue::Number(1.0));
//!     record.skills.push(Skill {
//!         description: "Heals allies for 20% of max HP.".into(),
//!         ..Skill::default()
//!     });
//!     record
//! });
//! let roster = Roster::from_records(records, &RosterConfig::default()).unwrap();
//! let engine = TagEngine::new(&TaggingConfig::default(), &TagVocabulary::default()).unwrap();
//! let (_, hero) = roster.iter().next().unwrap();
//! let tags = engine.tag_hero(hero);
//! assert!(tags.contains("HEAL_TEAM"));
//! assert!(!tags.contains("SELF_HEAL"));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use squadsmith_roster::Hero;

use self::{
    evidence::HeroTags,
    rule_table::NO_ORDINARY_ATTACKS,
    strategy::{CuratedStrategy, InferenceStrategy, TagStrategy, TagStrategyKind},
    tag::TagVocabulary,
};

pub mod evidence;
pub mod rule;
pub mod rule_table;
pub mod strategy;
pub mod tag;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TagError {
    #[display("rule table refers to tag '{tag}' which is not in the vocabulary")]
    UnknownRuleTag { tag: String },
    #[display("team-wide rule for '{tag}' does not require ally context")]
    MissingTeamContext { tag: String },
    #[display("invalid rule pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Tagging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaggingConfig {
    pub strategy: TagStrategyKind,
    /// Maximum snippet length in characters.
    pub snippet_length: usize,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            strategy: TagStrategyKind::Inference,
            snippet_length: 180,
        }
    }
}

/// Applies a tag strategy and the hard exclusions to heroes.
#[derive(Debug)]
pub struct TagEngine {
    strategy: Box<dyn TagStrategy>,
    no_ordinary_attacks: Regex,
}

impl TagEngine {
    pub fn new(config: &TaggingConfig, vocabulary: &TagVocabulary) -> Result<Self, TagError> {
        let strategy: Box<dyn TagStrategy> = match config.strategy {
            TagStrategyKind::Inference => Box::new(InferenceStrategy::new(
                rule_table::default_rule_table(),
                vocabulary,
                config.snippet_length,
            )?),
            TagStrategyKind::Curated => Box::new(CuratedStrategy::new(vocabulary.clone())),
        };
        Self::with_strategy(strategy)
    }

    pub fn with_strategy(strategy: Box<dyn TagStrategy>) -> Result<Self, TagError> {
        let no_ordinary_attacks =
            Regex::new(NO_ORDINARY_ATTACKS).map_err(|source| TagError::InvalidPattern {
                pattern: NO_ORDINARY_ATTACKS.to_owned(),
                source,
            })?;
        Ok(Self {
            strategy,
            no_ordinary_attacks,
        })
    }

    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    #[must_use]
    pub fn tag_hero(&self, hero: &Hero) -> HeroTags {
        let text = hero.kit_text().to_lowercase();
        let forbids = self.no_ordinary_attacks.is_match(&text);
        let tags = self.strategy.assign(hero, &text);
        HeroTags::new(tags, forbids)
    }
}

#[cfg(test)]
mod tests {
    use squadsmith_roster::{HeroRecord, Relic, Roster, RosterConfig, Skill, StatValue};

    use super::*;
    use crate::tag::known;

    fn roster_with(kits: &[(&str, &[&str])]) -> Roster {
        let mut records = kits
            .iter()
            .map(|(id, skills)| {
                let mut record = HeroRecord::minimal(id, id, "Hearts");
                record.skills = skills
                    .iter()
                    .map(|text| Skill {
                        description: (*text).to_owned(),
                        ..Skill::default()
                    })
                    .collect();
                record
            })
            .collect::<Vec<_>>();
        while records.len() < 5 {
            records.push(HeroRecord::minimal(&format!("filler{}", records.len()), "F", "Spades"));
        }
        for record in &mut records {
            record.stats.insert("hp".into(), StatValue::Number(1.0));
            record.stats.insert("atk".into(), StatValue::Number(1.0));
        }
        Roster::from_records(records, &RosterConfig::default()).unwrap()
    }

    fn tags_for(kit: &[&str]) -> HeroTags {
        let roster = roster_with(&[("subject", kit)]);
        let engine = TagEngine::new(&TaggingConfig::default(), &TagVocabulary::default()).unwrap();
        let hero = roster.hero(roster.index_of(&"subject".into()).unwrap());
        engine.tag_hero(hero)
    }

    fn names(tags: &HeroTags) -> Vec<&str> {
        tags.tags().map(tag::Tag::as_str).collect()
    }

    #[test]
    fn test_team_heal_not_self_heal() {
        let tags = tags_for(&["Heals allies for 20% of max HP."]);
        assert!(tags.contains(known::HEAL_TEAM));
        assert!(!tags.contains(known::SELF_HEAL));
        let evidence = tags.evidence(known::HEAL_TEAM).unwrap();
        assert!(evidence.snippet.contains("allies"));
        assert_eq!(evidence.matched, "heals");
    }

    #[test]
    fn test_self_heal_without_ally_context() {
        let tags = tags_for(&["Strikes the target and heals for 10% of damage dealt."]);
        assert!(tags.contains(known::SELF_HEAL));
        assert!(!tags.contains(known::HEAL_TEAM));
    }

    #[test]
    fn test_negated_energy_drain() {
        let tags = tags_for(&["This skill does not drain Energy."]);
        assert!(!tags.contains(known::ENERGY_DRAIN), "{:?}", names(&tags));
    }

    #[test]
    fn test_energy_drain() {
        let tags = tags_for(&["Each hit drains 20 Energy from the target."]);
        assert!(tags.contains(known::ENERGY_DRAIN));
        assert!(tags.contains(known::ON_HIT_SCALER));
    }

    #[test]
    fn test_attack_speed_scopes() {
        let team = tags_for(&["Increases Attack Speed of all allies by 15%."]);
        assert!(team.contains(known::ATK_SPD_UP));
        assert!(!team.contains(known::ATK_SPEED_SELF_ONLY));

        let own = tags_for(&["Gains 30% Attack Speed for 5 seconds."]);
        assert!(own.contains(known::ATK_SPEED_SELF_ONLY));
        assert!(!own.contains(known::ATK_SPD_UP));

        let debuff = tags_for(&["Reduces enemy Attack Speed by 20%."]);
        assert!(debuff.contains(known::ATK_SPD_DOWN));
        assert!(!debuff.contains(known::ATK_SPD_UP));
        assert!(!debuff.contains(known::ATK_DOWN));
    }

    #[test]
    fn test_ally_keyword_in_another_skill_does_not_scope_team_wide() {
        let tags = tags_for(&[
            "Gains 30% Attack Speed for 5 seconds.",
            "Heals allies for 20% of max HP.",
        ]);
        assert!(tags.contains(known::ATK_SPEED_SELF_ONLY), "{:?}", names(&tags));
        assert!(!tags.contains(known::ATK_SPD_UP), "{:?}", names(&tags));
        assert!(tags.contains(known::HEAL_TEAM));

        let unterminated = tags_for(&["Gains 30% Attack Speed", "Heals allies for 20% of max HP"]);
        assert!(unterminated.contains(known::ATK_SPEED_SELF_ONLY));
        assert!(!unterminated.contains(known::ATK_SPD_UP));
    }

    #[test]
    fn test_crowd_control_and_immunity() {
        let cc = tags_for(&["Stuns the target for 2 seconds."]);
        assert!(cc.contains(known::CROWD_CONTROL));

        let immune = tags_for(&["Becomes immune to stuns while channeling."]);
        assert!(!immune.contains(known::CROWD_CONTROL));
        assert!(immune.contains(known::CC_RESISTANCE));
    }

    #[test]
    fn test_no_ordinary_attacks_suppresses_scalers() {
        let tags = tags_for(&[
            "Each hit grants a stack of Fury.",
            "Transforms and no longer performs normal attacks; basic attacks deal extra damage.",
        ]);
        assert!(tags.forbids_ordinary_attacks());
        for tag in known::ATTACK_SCALING {
            assert!(!tags.contains(tag), "{tag} should be suppressed");
        }
    }

    #[test]
    fn test_relic_text_is_searched() {
        let roster = roster_with(&[("subject", &[])]);
        let mut record = roster
            .hero(roster.index_of(&"subject".into()).unwrap())
            .record()
            .clone();
        record.relic = Some(Relic {
            description: "Grants a shield to all allies.".into(),
            ..Relic::default()
        });
        let mut records = roster.iter().map(|(_, h)| h.record().clone()).collect::<Vec<_>>();
        records.retain(|r| r.id.as_str() != "subject");
        records.push(record);
        let roster = Roster::from_records(records, &RosterConfig::default()).unwrap();
        let engine = TagEngine::new(&TaggingConfig::default(), &TagVocabulary::default()).unwrap();
        let tags = engine.tag_hero(roster.hero(roster.index_of(&"subject".into()).unwrap()));
        assert!(tags.contains(known::SHIELD_TEAM));
    }

    #[test]
    fn test_curated_strategy_rejects_unknown_tags() {
        let mut records = (0..5)
            .map(|i| {
                let mut record = HeroRecord::minimal(&format!("h{i}"), "H", "Hearts");
                record.stats.insert("hp".into(), StatValue::Number(1.0));
                record.stats.insert("atk".into(), StatValue::Number(1.0));
                record
            })
            .collect::<Vec<_>>();
        records[0].synergies = vec![
            "heal_team".into(),
            "SELF_HEAL".into(),
            "FLYING".into(),
            "ATK_SPEED".into(),
        ];
        let roster = Roster::from_records(records, &RosterConfig::default()).unwrap();
        let config = TaggingConfig {
            strategy: TagStrategyKind::Curated,
            ..TaggingConfig::default()
        };
        let engine = TagEngine::new(&config, &TagVocabulary::default()).unwrap();
        let tags = engine.tag_hero(roster.hero(roster.index_of(&"h0".into()).unwrap()));
        assert_eq!(names(&tags), [known::ATK_SPEED_SELF_ONLY, known::HEAL_TEAM]);
        assert_eq!(
            tags.evidence(known::HEAL_TEAM).unwrap().snippet,
            evidence::MANUAL_SNIPPET
        );
    }

    #[test]
    fn test_rule_tag_outside_vocabulary_is_fatal() {
        let vocabulary = TagVocabulary::new([tag::Tag::new(known::HEAL_TEAM)]);
        let err = TagEngine::new(&TaggingConfig::default(), &vocabulary).unwrap_err();
        assert!(matches!(err, TagError::UnknownRuleTag { .. }));
    }

    #[test]
    fn test_team_rule_without_context_is_rejected() {
        use crate::{rule::RuleSpec, rule_table::CapabilitySpec};
        static BROKEN: &[CapabilitySpec] = &[CapabilitySpec::Team {
            tag: known::CDR_TEAM,
            rules: &[RuleSpec::new(r"\bcooldown\b")],
        }];
        let err = InferenceStrategy::new(BROKEN, &TagVocabulary::default(), 180).unwrap_err();
        assert!(matches!(err, TagError::MissingTeamContext { .. }));
    }
}
