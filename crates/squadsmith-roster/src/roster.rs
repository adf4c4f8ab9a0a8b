use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    faction::Faction,
    hero::{Hero, HeroId, HeroRecord},
    team::TEAM_SIZE,
};

/// Position of a hero inside a [`Roster`] (heroes are sorted by id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct HeroIndex(usize);

impl HeroIndex {
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Record validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterConfig {
    /// Faction that counts toward any other faction's bonus.
    pub wildcard_faction: String,
    /// Stats every record must expose; records missing one are skipped.
    pub required_stats: Vec<String>,
    /// Canonical stat name to the alternative spellings found in records.
    pub stat_aliases: BTreeMap<String, Vec<String>>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        let aliases = [
            ("armor", &["def", "defense"][..]),
            ("magicRes", &["mres", "mdef", "magicResistance"]),
            ("atkSpdBonus", &["atkSpd", "attackSpeed"]),
            ("critRate", &["crit"]),
        ];
        Self {
            wildcard_faction: "Starglint".to_owned(),
            required_stats: vec!["hp".to_owned(), "atk".to_owned()],
            stat_aliases: aliases
                .into_iter()
                .map(|(canonical, alts)| {
                    (
                        canonical.to_owned(),
                        alts.iter().map(|s| (*s).to_owned()).collect(),
                    )
                })
                .collect(),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RosterError {
    #[display("roster has {count} usable heroes, at least {TEAM_SIZE} are required")]
    TooSmall { count: usize },
    #[display("stat alias '{alias}' is claimed by both '{first}' and '{second}'")]
    ConflictingAlias {
        alias: String,
        first: String,
        second: String,
    },
}

/// A validated roster: unique ids, canonical stats, stable order.
#[derive(Debug, Clone)]
pub struct Roster {
    heroes: Vec<Hero>,
    by_id: BTreeMap<HeroId, HeroIndex>,
    wildcard: Faction,
}

impl Roster {
    /// Validates records and builds the roster.
    ///
    /// Records with a duplicate id or missing a required stat are skipped with a
    /// warning, as are non-numeric stat values. Fails if fewer than [`TEAM_SIZE`]
    /// heroes remain or the alias table is ambiguous.
    pub fn from_records<I>(records: I, config: &RosterConfig) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = HeroRecord>,
    {
        let aliases = alias_lookup(config)?;
        let wildcard = Faction::new(config.wildcard_faction.as_str());

        let mut by_id_record = BTreeMap::new();
        for record in records {
            if by_id_record.contains_key(&record.id) {
                tracing::warn!(hero = %record.id, "duplicate hero id, skipping record");
                continue;
            }
            by_id_record.insert(record.id.clone(), record);
        }

        let mut heroes = vec![];
        for record in by_id_record.into_values() {
            for label in record.ratings.unknown_labels() {
                tracing::warn!(hero = %record.id, label, "unknown rating label ignored");
            }
            let stats = canonical_stats(&record, &aliases);
            if let Some(missing) = config
                .required_stats
                .iter()
                .find(|name| !stats.contains_key(name.as_str()))
            {
                tracing::warn!(hero = %record.id, stat = %missing, "missing required stat, skipping record");
                continue;
            }
            let is_wildcard = record.faction.matches(wildcard.as_str());
            heroes.push(Hero::new(record, stats, is_wildcard));
        }

        if heroes.len() < TEAM_SIZE {
            return Err(RosterError::TooSmall {
                count: heroes.len(),
            });
        }

        let by_id = heroes
            .iter()
            .enumerate()
            .map(|(i, hero)| (hero.id().clone(), HeroIndex(i)))
            .collect();
        tracing::debug!(count = heroes.len(), "roster validated");
        Ok(Self {
            heroes,
            by_id,
            wildcard,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    #[must_use]
    pub fn wildcard(&self) -> &Faction {
        &self.wildcard
    }

    #[must_use]
    pub fn hero(&self, index: HeroIndex) -> &Hero {
        &self.heroes[index.0]
    }

    #[must_use]
    pub fn index_of(&self, id: &HeroId) -> Option<HeroIndex> {
        self.by_id.get(id).copied()
    }

    pub fn indices(&self) -> impl ExactSizeIterator<Item = HeroIndex> + use<> {
        (0..self.heroes.len()).map(HeroIndex)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (HeroIndex, &Hero)> {
        self.heroes
            .iter()
            .enumerate()
            .map(|(i, hero)| (HeroIndex(i), hero))
    }

    /// Distinct non-wildcard factions, sorted.
    #[must_use]
    pub fn factions(&self) -> BTreeSet<&Faction> {
        self.heroes
            .iter()
            .filter(|hero| !hero.is_wildcard())
            .map(Hero::faction)
            .collect()
    }
}

fn alias_lookup(config: &RosterConfig) -> Result<BTreeMap<&str, &str>, RosterError> {
    let mut lookup: BTreeMap<&str, &str> = BTreeMap::new();
    for (canonical, alts) in &config.stat_aliases {
        for alias in alts {
            if let Some(first) = lookup.insert(alias.as_str(), canonical.as_str()) {
                if first != canonical.as_str() {
                    return Err(RosterError::ConflictingAlias {
                        alias: alias.clone(),
                        first: first.to_owned(),
                        second: canonical.clone(),
                    });
                }
            }
        }
    }
    Ok(lookup)
}

fn canonical_stats(record: &HeroRecord, aliases: &BTreeMap<&str, &str>) -> BTreeMap<String, f32> {
    let mut stats = BTreeMap::new();
    for (name, value) in &record.stats {
        let Some(number) = value.as_number() else {
            tracing::warn!(hero = %record.id, stat = %name, "non-numeric stat value ignored");
            continue;
        };
        let canonical = aliases.get(name.as_str()).copied().unwrap_or(name.as_str());
        // the canonical spelling wins over an alias when a record carries both
        if canonical == name.as_str() || !stats.contains_key(canonical) {
            stats.insert(canonical.to_owned(), number);
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::StatValue;

    fn record(id: &str, faction: &str, hp: Option<f32>) -> HeroRecord {
        let mut record = HeroRecord::minimal(id, id, faction);
        if let Some(hp) = hp {
            record.stats.insert("hp".into(), StatValue::Number(hp));
        }
        record.stats.insert("atk".into(), StatValue::Number(100.0));
        record
    }

    fn five() -> Vec<HeroRecord> {
        ["e", "d", "c", "b", "a"]
            .into_iter()
            .map(|id| record(id, "Hearts", Some(1000.0)))
            .collect()
    }

    #[test]
    fn test_heroes_are_sorted_by_id() {
        let roster = Roster::from_records(five(), &RosterConfig::default()).unwrap();
        let ids = roster
            .iter()
            .map(|(_, h)| h.id().as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);
        assert_eq!(roster.index_of(&"c".into()).map(HeroIndex::get), Some(2));
    }

    #[test]
    fn test_duplicates_and_incomplete_records_are_skipped() {
        let mut records = five();
        records.push(record("a", "Spades", Some(1.0)));
        records.push(record("f", "Spades", None));
        let roster = Roster::from_records(records, &RosterConfig::default()).unwrap();
        assert_eq!(roster.len(), 5);
        let a = roster.hero(roster.index_of(&"a".into()).unwrap());
        assert_eq!(a.faction().as_str(), "Hearts");
    }

    #[test]
    fn test_too_small_roster_is_an_error() {
        let records = five().into_iter().take(4);
        let err = Roster::from_records(records, &RosterConfig::default()).unwrap_err();
        assert!(matches!(err, RosterError::TooSmall { count: 4 }));
    }

    #[test]
    fn test_aliases_are_canonicalized() {
        let mut records = five();
        records[0].stats.insert("def".into(), StatValue::Number(300.0));
        records[1].stats.insert("armor".into(), StatValue::Number(200.0));
        records[1].stats.insert("def".into(), StatValue::Number(999.0));
        let roster = Roster::from_records(records, &RosterConfig::default()).unwrap();
        let e = roster.hero(roster.index_of(&"e".into()).unwrap());
        assert_eq!(e.stat("armor"), Some(300.0));
        assert_eq!(e.stat("def"), None);
        let d = roster.hero(roster.index_of(&"d".into()).unwrap());
        assert_eq!(d.stat("armor"), Some(200.0));
    }

    #[test]
    fn test_wildcard_faction_is_case_insensitive() {
        let mut records = five();
        records[0].faction = Faction::new("starglint");
        let roster = Roster::from_records(records, &RosterConfig::default()).unwrap();
        let e = roster.hero(roster.index_of(&"e".into()).unwrap());
        assert!(e.is_wildcard());
        assert_eq!(roster.factions().len(), 1);
    }

    #[test]
    fn test_conflicting_alias_is_rejected() {
        let mut config = RosterConfig::default();
        config
            .stat_aliases
            .insert("defense".into(), vec!["def".into()]);
        let err = Roster::from_records(five(), &config).unwrap_err();
        assert!(matches!(err, RosterError::ConflictingAlias { .. }));
    }
}
