//! Capability tags and the published tag vocabulary.

use std::{
    borrow::Borrow,
    collections::{BTreeMap, BTreeSet},
};

use serde::{Deserialize, Serialize};

/// Well-known tag names referenced by the rule table and the default configuration.
pub mod known {
    // team support
    pub const ATK_SPD_UP: &str = "ATK_SPD_UP";
    pub const CC_IMMUNITY_TEAM: &str = "CC_IMMUNITY_TEAM";
    pub const CDR_TEAM: &str = "CDR_TEAM";
    pub const DAMAGE_REDUCTION_TEAM: &str = "DAMAGE_REDUCTION_TEAM";
    pub const DEBUFF_CLEANSE_TEAM: &str = "DEBUFF_CLEANSE_TEAM";
    pub const ENERGY_RESTORE_TEAM: &str = "ENERGY_RESTORE_TEAM";
    pub const HEAL_TEAM: &str = "HEAL_TEAM";
    pub const SHIELD_TEAM: &str = "SHIELD_TEAM";
    // enemy debuffs
    pub const ANTI_HEAL: &str = "ANTI_HEAL";
    pub const ATK_DOWN: &str = "ATK_DOWN";
    pub const ATK_SPD_DOWN: &str = "ATK_SPD_DOWN";
    pub const BUFF_DISPEL: &str = "BUFF_DISPEL";
    pub const CROWD_CONTROL: &str = "CROWD_CONTROL";
    pub const ENEMY_VULNERABILITY: &str = "ENEMY_VULNERABILITY";
    pub const ENERGY_DRAIN: &str = "ENERGY_DRAIN";
    pub const TAUNT: &str = "TAUNT";
    // playstyle
    pub const AREA_DAMAGE_DEALER: &str = "AREA_DAMAGE_DEALER";
    pub const BACKLINE_ACCESS: &str = "BACKLINE_ACCESS";
    pub const BASIC_ATTACK_SCALER: &str = "BASIC_ATTACK_SCALER";
    pub const FAST_STACKING_WITH_HITS: &str = "FAST_STACKING_WITH_HITS";
    pub const ON_HIT_SCALER: &str = "ON_HIT_SCALER";
    pub const ULT_DEPENDENT: &str = "ULT_DEPENDENT";
    // self only
    pub const ATK_SPEED_SELF_ONLY: &str = "ATK_SPEED_SELF_ONLY";
    pub const CC_RESISTANCE: &str = "CC_RESISTANCE";
    pub const DAMAGE_REDUCTION_SELF: &str = "DAMAGE_REDUCTION_SELF";
    pub const DODGE_BUFF: &str = "DODGE_BUFF";
    pub const ENERGY_RESTORE_SELF: &str = "ENERGY_RESTORE_SELF";
    pub const GAIN_ARMOR: &str = "GAIN_ARMOR";
    pub const SELF_HEAL: &str = "SELF_HEAL";
    pub const SELF_SHIELD: &str = "SELF_SHIELD";

    pub const ALL: [&str; 30] = [
        ATK_SPD_UP,
        CC_IMMUNITY_TEAM,
        CDR_TEAM,
        DAMAGE_REDUCTION_TEAM,
        DEBUFF_CLEANSE_TEAM,
        ENERGY_RESTORE_TEAM,
        HEAL_TEAM,
        SHIELD_TEAM,
        ANTI_HEAL,
        ATK_DOWN,
        ATK_SPD_DOWN,
        BUFF_DISPEL,
        CROWD_CONTROL,
        ENEMY_VULNERABILITY,
        ENERGY_DRAIN,
        TAUNT,
        AREA_DAMAGE_DEALER,
        BACKLINE_ACCESS,
        BASIC_ATTACK_SCALER,
        FAST_STACKING_WITH_HITS,
        ON_HIT_SCALER,
        ULT_DEPENDENT,
        ATK_SPEED_SELF_ONLY,
        CC_RESISTANCE,
        DAMAGE_REDUCTION_SELF,
        DODGE_BUFF,
        ENERGY_RESTORE_SELF,
        GAIN_ARMOR,
        SELF_HEAL,
        SELF_SHIELD,
    ];

    /// Team-wide capability paired with its self-only counterpart.
    ///
    /// A hero never carries both tags of a pair.
    pub const SCOPED_PAIRS: [(&str, &str); 6] = [
        (ATK_SPD_UP, ATK_SPEED_SELF_ONLY),
        (CC_IMMUNITY_TEAM, CC_RESISTANCE),
        (DAMAGE_REDUCTION_TEAM, DAMAGE_REDUCTION_SELF),
        (ENERGY_RESTORE_TEAM, ENERGY_RESTORE_SELF),
        (HEAL_TEAM, SELF_HEAL),
        (SHIELD_TEAM, SELF_SHIELD),
    ];

    /// Tags describing damage that scales with ordinary attacks.
    pub const ATTACK_SCALING: [&str; 3] =
        [BASIC_ATTACK_SCALER, ON_HIT_SCALER, FAST_STACKING_WITH_HITS];
}

/// A capability tag drawn from the vocabulary.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The published list of allowed tags.
///
/// `aliases` maps legacy curated spellings onto vocabulary names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagVocabulary {
    tags: BTreeSet<Tag>,
    #[serde(default)]
    aliases: BTreeMap<String, Tag>,
}

impl Default for TagVocabulary {
    fn default() -> Self {
        let aliases = [
            ("ATK_SPEED", known::ATK_SPEED_SELF_ONLY),
            ("HEAL", known::SELF_HEAL),
            ("SHIELD", known::SELF_SHIELD),
            ("DMG_RED", known::DAMAGE_REDUCTION_SELF),
            ("ENERGY_RESTORE", known::ENERGY_RESTORE_SELF),
            ("FAST_STACKING", known::FAST_STACKING_WITH_HITS),
            ("REMOVES_ARMOR", known::ENEMY_VULNERABILITY),
        ];
        Self {
            tags: known::ALL.into_iter().map(Tag::new).collect(),
            aliases: aliases
                .into_iter()
                .map(|(alias, tag)| (alias.to_owned(), Tag::new(tag)))
                .collect(),
        }
    }
}

impl TagVocabulary {
    #[must_use]
    pub fn new<I>(tags: I) -> Self
    where
        I: IntoIterator<Item = Tag>,
    {
        Self {
            tags: tags.into_iter().collect(),
            aliases: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Resolves a curated tag name: trims, upper-cases, applies aliases, then checks
    /// membership. Returns `None` for names outside the vocabulary.
    ///
    /// ```
    /// # use squadsmith_tagging::tag::TagVocabulary;
    /// let vocabulary = TagVocabulary::default();
    /// assert_eq!(vocabulary.resolve(" heal_team ").unwrap().as_str(), "HEAL_TEAM");
    /// assert_eq!(vocabulary.resolve("HEAL").unwrap().as_str(), "SELF_HEAL");
    /// assert!(vocabulary.resolve("FLYING").is_none());
    /// ```
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Tag> {
        let name = name.trim().to_ascii_uppercase();
        let tag = self
            .aliases
            .get(&name)
            .cloned()
            .unwrap_or_else(|| Tag::new(name));
        self.tags.contains(&tag).then_some(tag)
    }

    /// Returns the first name in `names` that is not part of the vocabulary.
    pub fn find_unknown<'a, I>(&self, names: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().find(|name| !self.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary_covers_known_tags() {
        let vocabulary = TagVocabulary::default();
        assert_eq!(vocabulary.len(), known::ALL.len());
        for (team, own) in known::SCOPED_PAIRS {
            assert!(vocabulary.contains(team));
            assert!(vocabulary.contains(own));
        }
    }

    #[test]
    fn test_alias_targets_must_be_in_vocabulary() {
        let json = r#"{ "tags": ["HEAL_TEAM"], "aliases": { "HEAL": "SELF_HEAL" } }"#;
        let vocabulary: TagVocabulary = serde_json::from_str(json).unwrap();
        assert!(vocabulary.resolve("heal").is_none());
        assert!(vocabulary.resolve("heal_team").is_some());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let json = r#"{ "tags": [], "extra": 1 }"#;
        assert!(serde_json::from_str::<TagVocabulary>(json).is_err());
    }
}
