//! Battlefield placement of a team.
//!
//! The battlefield has two front slots and three back slots. The first front slot takes
//! the most pressure and the second is safer. Placement runs in this order:
//!
//! 1. Members with a fixed position take it (first member wins a contested slot).
//! 2. The high-pressure front slot goes to the best [`PressureProfile`] `high` score.
//! 3. The low-pressure front slot goes to the best `low` score among the rest.
//! 4. Every remaining member fills the first empty slot, front before back, in team
//!    order.
//!
//! Since the team has exactly as many members as there are slots, the last step always
//! leaves two front and three back slots filled with distinct heroes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use squadsmith_analysis::enrichment::{EnrichedHero, EnrichedRoster};
use squadsmith_roster::{Hero, HeroId, HeroIndex, TEAM_SIZE, Team};
use squadsmith_tagging::tag::known;

/// Scoring of a candidate for one front slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PressureProfile {
    /// Points per tag carried.
    pub tags: BTreeMap<String, f32>,
    /// Points per class, compared case-insensitively.
    pub classes: BTreeMap<String, f32>,
    /// Weight of the durability percentile.
    pub durability: f32,
    /// Weight of the burst percentile.
    pub burst: f32,
}

impl PressureProfile {
    fn points<'a>(entries: impl IntoIterator<Item = (&'a str, f32)>) -> BTreeMap<String, f32> {
        entries
            .into_iter()
            .map(|(name, points)| (name.to_owned(), points))
            .collect()
    }

    fn high() -> Self {
        Self {
            tags: Self::points([
                (known::TAUNT, 12.0),
                (known::SHIELD_TEAM, 7.0),
                (known::SELF_SHIELD, 7.0),
                (known::GAIN_ARMOR, 6.0),
                (known::DAMAGE_REDUCTION_SELF, 6.0),
                (known::DAMAGE_REDUCTION_TEAM, 4.0),
                (known::CROWD_CONTROL, 5.0),
                (known::CC_RESISTANCE, 3.0),
            ]),
            classes: Self::points([("Tank", 50.0), ("Warrior", 15.0)]),
            durability: 10.0,
            burst: 0.0,
        }
    }

    fn low() -> Self {
        Self {
            tags: Self::points([
                (known::BACKLINE_ACCESS, 12.0),
                (known::DODGE_BUFF, 5.0),
                (known::SELF_HEAL, 5.0),
                (known::SELF_SHIELD, 3.5),
            ]),
            classes: Self::points([("Assassin", 2.5), ("Warrior", 5.0)]),
            durability: 7.0,
            burst: 3.5,
        }
    }

    fn class_points(&self, hero: &Hero) -> f32 {
        self.classes
            .iter()
            .find(|(class, _)| class.eq_ignore_ascii_case(hero.class()))
            .map_or(0.0, |(_, points)| *points)
    }

    /// Tags of `enriched` this profile rewards, most valuable first.
    fn reasons<'a>(&'a self, hero: &Hero, enriched: &EnrichedHero) -> Vec<&'a str> {
        let mut tags = self
            .tags
            .iter()
            .filter(|(tag, points)| **points > 0.0 && enriched.has_tag(tag))
            .collect::<Vec<_>>();
        tags.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        let mut reasons = tags.into_iter().map(|(tag, _)| tag.as_str()).collect::<Vec<_>>();
        if self.class_points(hero) > 0.0 {
            reasons.push("class");
        }
        reasons
    }
}

/// Slot labels and placement scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormationConfig {
    /// High-pressure slot first.
    pub front_slots: [String; 2],
    pub back_slots: [String; 3],
    /// Fixed slot of specific heroes.
    pub overrides: BTreeMap<HeroId, String>,
    pub high_pressure: PressureProfile,
    pub low_pressure: PressureProfile,
    /// Stats averaged (as percentiles) into durability.
    pub durability_stats: Vec<String>,
    /// Stats averaged (as percentiles) into burst.
    pub burst_stats: Vec<String>,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            // the second row from the enemy is the actual front line
            front_slots: ["back-left".to_owned(), "back-right".to_owned()],
            back_slots: [
                "front-left".to_owned(),
                "front-center".to_owned(),
                "front-right".to_owned(),
            ],
            overrides: [(HeroId::new("heracles"), "back-right".to_owned())].into(),
            high_pressure: PressureProfile::high(),
            low_pressure: PressureProfile::low(),
            durability_stats: vec!["hp".to_owned(), "armor".to_owned(), "magicRes".to_owned()],
            burst_stats: vec!["atk".to_owned(), "critRate".to_owned(), "critDmgBonus".to_owned()],
        }
    }
}

/// One filled slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub slot: String,
    pub hero: HeroIndex,
}

/// Placement of a whole team, front slots first, plus explanatory notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Formation {
    pub placements: Vec<Placement>,
    pub notes: Vec<String>,
}

impl FormationConfig {
    /// Every slot label, front slots first.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.front_slots
            .iter()
            .chain(&self.back_slots)
            .map(String::as_str)
    }

    /// Places the members of `team`.
    #[must_use]
    pub fn assign(&self, team: &Team, enriched: &EnrichedRoster) -> Formation {
        let labels = self.slots().collect::<Vec<_>>();
        let mut slots: [Option<HeroIndex>; TEAM_SIZE] = [None; TEAM_SIZE];
        let mut notes = vec![];
        let name = |index: HeroIndex| enriched.hero(index).name().to_owned();

        for &member in team.members() {
            let Some(fixed) = self.overrides.get(enriched.hero(member).id()) else {
                continue;
            };
            if let Some(position) = labels.iter().position(|label| *label == fixed.as_str())
                && slots[position].is_none()
            {
                slots[position] = Some(member);
                notes.push(format!("{} holds {fixed} (fixed position).", name(member)));
            }
        }

        let unplaced = |slots: &[Option<HeroIndex>]| {
            team.members()
                .iter()
                .copied()
                .filter(|member| !slots.contains(&Some(*member)))
                .collect::<Vec<_>>()
        };

        for (position, profile, pressure) in [
            (0, &self.high_pressure, "high-pressure"),
            (1, &self.low_pressure, "low-pressure"),
        ] {
            if slots[position].is_some() {
                continue;
            }
            let mut best: Option<(HeroIndex, f32)> = None;
            for member in unplaced(&slots) {
                let score = self.pressure_score(profile, member, enriched);
                // strict comparison keeps the earliest member on ties
                if best.is_none_or(|(_, best_score)| score > best_score) {
                    best = Some((member, score));
                }
            }
            if let Some((member, _)) = best {
                slots[position] = Some(member);
                let reasons = profile.reasons(enriched.hero(member), enriched.enriched(member));
                let because = if reasons.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", reasons.join(", "))
                };
                notes.push(format!(
                    "{} takes the {pressure} front slot {}{because}.",
                    name(member),
                    labels[position]
                ));
            }
        }

        let mut rest = unplaced(&slots).into_iter();
        for slot in &mut slots {
            if slot.is_none() {
                *slot = rest.next();
            }
        }

        for &member in team.members() {
            let hero = enriched.hero(member);
            if hero.class().eq_ignore_ascii_case("assassin")
                || enriched.enriched(member).has_tag(known::BACKLINE_ACCESS)
            {
                notes.push(format!("{} can reach the enemy backline.", hero.name()));
            }
        }

        let placements = labels
            .iter()
            .zip(slots)
            .filter_map(|(label, hero)| {
                Some(Placement {
                    slot: (*label).to_owned(),
                    hero: hero?,
                })
            })
            .collect();
        Formation { placements, notes }
    }

    fn pressure_score(
        &self,
        profile: &PressureProfile,
        member: HeroIndex,
        enriched: &EnrichedRoster,
    ) -> f32 {
        let hero = enriched.hero(member);
        let info = enriched.enriched(member);
        let tag_points = profile
            .tags
            .iter()
            .filter(|(tag, _)| info.has_tag(tag))
            .map(|(_, points)| points)
            .sum::<f32>();
        tag_points
            + profile.class_points(hero)
            + profile.durability * mean_percentile(info, &self.durability_stats)
            + profile.burst * mean_percentile(info, &self.burst_stats)
    }
}

/// Mean percentile over the `stats` the hero exposes, `0` if none.
fn mean_percentile(info: &EnrichedHero, stats: &[String]) -> f32 {
    let (sum, count) = stats
        .iter()
        .filter_map(|stat| info.percentile(stat))
        .fold((0.0, 0_u16), |(sum, count), p| (sum + p, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f32::from(count)
    }
}
