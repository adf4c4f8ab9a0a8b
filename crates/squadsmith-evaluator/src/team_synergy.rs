//! Team-level synergy rules.
//!
//! Rules are data: each one matches members by tag, class or role and awards points
//! together with a one-sentence rationale that ends up in the recommendation document.
//!
//! - [`SynergyRule::Count`] fires when at least `at_least` members match.
//! - [`SynergyRule::Pair`] fires when a provider and a receiver are both present, and
//!   pays more when they are different heroes.
//!
//! Either kind can be limited to some modes. The total is capped.

use serde::{Deserialize, Serialize};
use squadsmith_analysis::enrichment::EnrichedHero;
use squadsmith_roster::{Hero, Mode};
use squadsmith_tagging::tag::known;

/// Member predicate: matches if any listed tag, class or role matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberMatcher {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl MemberMatcher {
    fn tags(tags: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn matches(&self, hero: &Hero, enriched: &EnrichedHero) -> bool {
        self.tags.iter().any(|tag| enriched.has_tag(tag))
            || self
                .classes
                .iter()
                .any(|class| hero.class().eq_ignore_ascii_case(class))
            || self
                .roles
                .iter()
                .any(|role| hero.role().eq_ignore_ascii_case(role))
    }

    /// Tag names referenced by this matcher.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

/// A declarative team synergy rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SynergyRule {
    Count {
        matcher: MemberMatcher,
        at_least: usize,
        points: f32,
        /// Modes the rule applies to; empty means all.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modes: Vec<Mode>,
        rationale: String,
    },
    Pair {
        provider: MemberMatcher,
        receiver: MemberMatcher,
        /// Points when provider and receiver are different heroes.
        cross_points: f32,
        /// Points when the only receiver is the provider itself.
        self_points: f32,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modes: Vec<Mode>,
        /// May contain `{provider}` and `{receiver}`, replaced by hero names.
        rationale: String,
    },
}

impl SynergyRule {
    fn modes(&self) -> &[Mode] {
        match self {
            Self::Count { modes, .. } | Self::Pair { modes, .. } => modes,
        }
    }

    fn applies_to(&self, mode: Mode) -> bool {
        let modes = self.modes();
        modes.is_empty() || modes.contains(&mode)
    }

    /// Matchers of the rule, for validation.
    #[must_use]
    pub fn matchers(&self) -> Vec<&MemberMatcher> {
        match self {
            Self::Count { matcher, .. } => vec![matcher],
            Self::Pair {
                provider, receiver, ..
            } => vec![provider, receiver],
        }
    }

    #[must_use]
    pub fn points(&self) -> Vec<f32> {
        match self {
            Self::Count { points, .. } => vec![*points],
            Self::Pair {
                cross_points,
                self_points,
                ..
            } => vec![*cross_points, *self_points],
        }
    }

    fn evaluate(&self, members: &[(&Hero, &EnrichedHero)]) -> Option<(f32, String)> {
        match self {
            Self::Count {
                matcher,
                at_least,
                points,
                rationale,
                ..
            } => {
                let count = members
                    .iter()
                    .filter(|(hero, enriched)| matcher.matches(hero, enriched))
                    .count();
                (count >= *at_least).then(|| (*points, rationale.clone()))
            }
            Self::Pair {
                provider,
                receiver,
                cross_points,
                self_points,
                rationale,
                ..
            } => {
                let providers = members
                    .iter()
                    .filter(|(hero, enriched)| provider.matches(hero, enriched))
                    .collect::<Vec<_>>();
                let receivers = members
                    .iter()
                    .filter(|(hero, enriched)| receiver.matches(hero, enriched))
                    .collect::<Vec<_>>();
                let cross = providers.iter().find_map(|p| {
                    receivers
                        .iter()
                        .find(|r| r.0.id() != p.0.id())
                        .map(|r| (p, r))
                });
                let (points, (p, r)) = match cross {
                    Some(pair) => (*cross_points, pair),
                    None => {
                        let p = providers.first()?;
                        let r = receivers.iter().find(|r| r.0.id() == p.0.id())?;
                        (*self_points, (p, r))
                    }
                };
                let text = rationale
                    .replace("{provider}", p.0.name())
                    .replace("{receiver}", r.0.name());
                Some((points, text))
            }
        }
    }
}

/// Team synergy rules and their cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamSynergyConfig {
    pub rules: Vec<SynergyRule>,
    pub cap: f32,
}

impl Default for TeamSynergyConfig {
    fn default() -> Self {
        let hit_scalers = MemberMatcher::tags(&[
            known::BASIC_ATTACK_SCALER,
            known::ON_HIT_SCALER,
            known::FAST_STACKING_WITH_HITS,
        ]);
        let sustain = MemberMatcher::tags(&[
            known::HEAL_TEAM,
            known::SHIELD_TEAM,
            known::DAMAGE_REDUCTION_TEAM,
        ]);
        let control = MemberMatcher::tags(&[known::CROWD_CONTROL, known::TAUNT]);
        let frontline = MemberMatcher {
            classes: vec!["Tank".to_owned(), "Warrior".to_owned()],
            roles: vec!["Hefty".to_owned()],
            ..MemberMatcher::default()
        };
        let rules = vec![
            SynergyRule::Pair {
                provider: MemberMatcher::tags(&[known::ATK_SPD_UP]),
                receiver: hit_scalers,
                cross_points: 35.0,
                self_points: 18.0,
                modes: vec![],
                rationale: "{provider} increases Attack Speed, enhancing {receiver}'s hit-based scaling."
                    .to_owned(),
            },
            SynergyRule::Pair {
                provider: MemberMatcher::tags(&[known::ENERGY_RESTORE_TEAM]),
                receiver: MemberMatcher::tags(&[known::ULT_DEPENDENT]),
                cross_points: 25.0,
                self_points: 25.0,
                modes: vec![],
                rationale: "Energy support accelerates ultimate-based damage cycles.".to_owned(),
            },
            SynergyRule::Pair {
                provider: MemberMatcher::tags(&[known::ENEMY_VULNERABILITY]),
                receiver: MemberMatcher::tags(&[known::AREA_DAMAGE_DEALER]),
                cross_points: 18.0,
                self_points: 18.0,
                modes: vec![],
                rationale: "Defense reduction enhances team-wide AoE burst.".to_owned(),
            },
            SynergyRule::Pair {
                provider: MemberMatcher::tags(&[known::TAUNT]),
                receiver: MemberMatcher::tags(&[known::BACKLINE_ACCESS]),
                cross_points: 12.0,
                self_points: 0.0,
                modes: vec![],
                rationale: "{provider} draws fire, creating space for {receiver} to dive."
                    .to_owned(),
            },
            SynergyRule::Count {
                matcher: sustain.clone(),
                at_least: 1,
                points: 12.0,
                modes: vec![],
                rationale: "Team-wide sustain keeps the squad standing through burst windows."
                    .to_owned(),
            },
            SynergyRule::Count {
                matcher: sustain,
                at_least: 2,
                points: 6.0,
                modes: vec![],
                rationale: "A second sustain source covers for the first being disrupted."
                    .to_owned(),
            },
            SynergyRule::Count {
                matcher: control.clone(),
                at_least: 1,
                points: 8.0,
                modes: vec![],
                rationale: "Crowd control creates setup windows.".to_owned(),
            },
            SynergyRule::Count {
                matcher: control,
                at_least: 2,
                points: 8.0,
                modes: vec![],
                rationale: "Chained crowd control keeps enemies locked down.".to_owned(),
            },
            SynergyRule::Count {
                matcher: frontline,
                at_least: 2,
                points: 6.0,
                modes: vec![],
                rationale: "Two durable frontliners share incoming pressure.".to_owned(),
            },
            SynergyRule::Count {
                matcher: MemberMatcher::tags(&[known::AREA_DAMAGE_DEALER]),
                at_least: 2,
                points: 8.0,
                modes: vec![Mode::Pve],
                rationale: "Stacked area damage clears waves quickly.".to_owned(),
            },
            SynergyRule::Count {
                matcher: MemberMatcher::tags(&[
                    known::CC_IMMUNITY_TEAM,
                    known::DEBUFF_CLEANSE_TEAM,
                ]),
                at_least: 1,
                points: 8.0,
                modes: vec![Mode::Pvp],
                rationale: "Cleanse or control immunity counters enemy lockdown.".to_owned(),
            },
        ];
        Self { rules, cap: 90.0 }
    }
}

/// Synergy of one team.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynergyOutcome {
    /// Capped total.
    pub points: f32,
    /// Rationale of every rule that fired, in rule order, without duplicates.
    pub rationale: Vec<String>,
}

impl TeamSynergyConfig {
    #[must_use]
    pub fn evaluate(&self, members: &[(&Hero, &EnrichedHero)], mode: Mode) -> SynergyOutcome {
        let mut total = 0.0;
        let mut rationale: Vec<String> = vec![];
        for rule in self.rules.iter().filter(|rule| rule.applies_to(mode)) {
            if let Some((points, text)) = rule.evaluate(members) {
                total += points;
                if !rationale.contains(&text) {
                    rationale.push(text);
                }
            }
        }
        SynergyOutcome {
            points: f32::min(total, self.cap),
            rationale,
        }
    }
}
