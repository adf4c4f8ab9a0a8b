use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{faction::Faction, rating::Ratings};

/// Unique hero identifier within a roster.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct HeroId(String);

impl HeroId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HeroId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A hero record exactly as stored on disk.
///
/// Only `id`, `name` and `faction` are mandatory; everything else defaults to empty.
/// Unknown fields are ignored so that records can carry extra presentation data.
#[derive(Debug, Clone, Deserialize)]
pub struct HeroRecord {
    pub id: HeroId,
    pub name: String,
    pub faction: Faction,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default)]
    pub stats: BTreeMap<String, StatValue>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub relic: Option<Relic>,
    /// Curated capability tags.
    #[serde(default)]
    pub synergies: Vec<String>,
}

/// A stat value as written in a record.
///
/// Numbers are taken as-is and numeric strings are parsed; anything else is kept
/// so the loader can report it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f32),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl StatValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f32> {
        let value = match self {
            StatValue::Number(v) => *v,
            StatValue::Text(s) => s.trim().trim_end_matches('%').parse().ok()?,
            StatValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f32> for StatValue {
    fn from(value: f32) -> Self {
        StatValue::Number(value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Upgrade text keyed by level label (`level2`, `level3`, ...).
    #[serde(default)]
    pub upgrades: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relic {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub upgrades: BTreeMap<String, String>,
}

/// A validated hero: the record plus canonicalized numeric stats.
#[derive(Debug, Clone)]
pub struct Hero {
    record: HeroRecord,
    stats: BTreeMap<String, f32>,
    wildcard: bool,
}

impl Hero {
    pub(crate) fn new(record: HeroRecord, stats: BTreeMap<String, f32>, wildcard: bool) -> Self {
        Self {
            record,
            stats,
            wildcard,
        }
    }

    #[must_use]
    pub fn id(&self) -> &HeroId {
        &self.record.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    #[must_use]
    pub fn faction(&self) -> &Faction {
        &self.record.faction
    }

    /// Returns `true` if this hero belongs to the wildcard faction.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.record.class
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.record.role
    }

    #[must_use]
    pub fn ratings(&self) -> &Ratings {
        &self.record.ratings
    }

    #[must_use]
    pub fn record(&self) -> &HeroRecord {
        &self.record
    }

    /// Canonical numeric stats (aliases resolved, non-numeric values dropped).
    #[must_use]
    pub fn stats(&self) -> &BTreeMap<String, f32> {
        &self.stats
    }

    #[must_use]
    pub fn stat(&self, name: &str) -> Option<f32> {
        self.stats.get(name).copied()
    }

    /// Full kit text: skill descriptions and upgrades, then relic description and upgrades.
    ///
    /// ```
    /// # use squadsmith_roster::{HeroRecord, Relic, Skill};
    /// let record: HeroRecord = HeroRecord {
    ///     skills: vec![Skill {
    ///         description: "Strikes twice.".into(),
    ///         upgrades: [("level2".to_string(), "Damage +10%.".to_string())].into(),
    ///         ..Skill::default()
    ///     }],
    ///     relic: Some(Relic { description: "Gains a shield.".into(), ..Relic::default() }),
    ///     ..HeroRecord::minimal("a", "A", "Hearts")
    /// };
    /// assert_eq!(
    ///     squadsmith_roster::hero::kit_text(&record),
    ///     "Strikes twice. Damage +10%. Gains a shield."
    /// );
    /// ```
    #[must_use]
    pub fn kit_text(&self) -> String {
        kit_text(&self.record)
    }
}

impl HeroRecord {
    /// A record with only the mandatory fields set.
    #[must_use]
    pub fn minimal(id: &str, name: &str, faction: &str) -> Self {
        Self {
            id: HeroId::new(id),
            name: name.to_owned(),
            faction: Faction::new(faction),
            class: String::new(),
            role: String::new(),
            ratings: Ratings::default(),
            stats: BTreeMap::new(),
            skills: vec![],
            relic: None,
            synergies: vec![],
        }
    }
}

/// Joins every descriptive text of a record with single spaces, each entry closed as a
/// sentence so that no sentence spans two skills.
#[must_use]
pub fn kit_text(record: &HeroRecord) -> String {
    let skill_text = record.skills.iter().flat_map(|skill| {
        std::iter::once(skill.description.as_str()).chain(skill.upgrades.values().map(String::as_str))
    });
    let relic_text = record.relic.iter().flat_map(|relic| {
        std::iter::once(relic.description.as_str()).chain(relic.upgrades.values().map(String::as_str))
    });
    skill_text
        .chain(relic_text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.ends_with(['.', '!', '?']) {
                s.to_owned()
            } else {
                format!("{s}.")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_json() {
        let json = r#"{
            "id": "elaine",
            "name": "Elaine",
            "faction": "Hearts",
            "class": "Support",
            "role": "Arcane",
            "rarity": "Legendary",
            "ratings": { "overall": "SS", "pvp": "S", "grimSurge": "A" },
            "stats": { "hp": 12000, "atk": "850", "critRate": "12%", "notes": [1, 2] },
            "skills": [{ "name": "Mend", "description": "Heals allies.", "upgrades": { "level2": "More." } }],
            "synergies": ["HEAL_TEAM"]
        }"#;
        let record: HeroRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_str(), "elaine");
        assert_eq!(record.ratings.overall.as_deref(), Some("SS"));
        assert_eq!(record.stats["hp"].as_number(), Some(12000.0));
        assert_eq!(record.stats["atk"].as_number(), Some(850.0));
        assert_eq!(record.stats["critRate"].as_number(), Some(12.0));
        assert_eq!(record.stats["notes"].as_number(), None);
        assert_eq!(kit_text(&record), "Heals allies. More.");
    }

    #[test]
    fn test_kit_entries_end_as_sentences() {
        let mut record = HeroRecord::minimal("a", "A", "Hearts");
        record.skills = vec![
            Skill {
                description: "Gains attack speed".into(),
                upgrades: [("level2".to_owned(), "  ".to_owned())].into(),
                ..Skill::default()
            },
            Skill {
                description: "Heals allies!".into(),
                ..Skill::default()
            },
        ];
        assert_eq!(kit_text(&record), "Gains attack speed. Heals allies!");
    }

    #[test]
    fn test_missing_mandatory_field_is_rejected() {
        let json = r#"{ "id": "x", "name": "X" }"#;
        assert!(serde_json::from_str::<HeroRecord>(json).is_err());
    }
}
