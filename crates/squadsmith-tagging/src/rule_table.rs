//! The fixed, ordered rule table used by the inference strategy.
//!
//! Patterns run against lower-cased kit text. Windows use lazy bounded gaps
//! (`[\s\S]{0,N}?`) so the reported span is as short as the rule allows.

use crate::{
    rule::{NEGATION_BEFORE, RuleSpec},
    tag::known,
};

/// Words that turn a buff keyword into a debuff ("reduces ... attack speed").
const DIMINISH_BEFORE: &str = r"\b(?:reduc|decreas|lower|slow|block|prevent)\w*\b[^.]{0,30}$";
/// Words that mean the keyword belongs to the enemy ("breaks enemy shields").
const BREAK_BEFORE: &str = r"\b(?:break|destroy|remov|ignor|pierc|strip)\w*\b[^.]{0,20}$";
/// Immunity phrasing that is not itself crowd control ("immune to stuns"), or a negation.
const IMMUNE_OR_NEGATED_BEFORE: &str = r"(?:\b(?:does|do|did|will|can|could|would)\s+not|\b(?:doesn't|don't|won't|cannot|can't|never|no))\s*$|\b(?:immun|resist)\w*\b[^.]{0,20}$";

/// One capability of the rule table.
#[derive(Debug, Clone, Copy)]
pub enum CapabilitySpec {
    /// A tag asserted by any matching rule.
    Single {
        tag: &'static str,
        rules: &'static [RuleSpec],
    },
    /// A team-wide tag; every rule must require ally context.
    Team {
        tag: &'static str,
        rules: &'static [RuleSpec],
    },
    /// A team-wide tag and its self-only counterpart. The self-only rules are only
    /// consulted when no team-wide rule matched.
    Scoped {
        team: &'static str,
        team_rules: &'static [RuleSpec],
        own: &'static str,
        own_rules: &'static [RuleSpec],
    },
}

impl CapabilitySpec {
    /// Every tag this capability can assert.
    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        match self {
            CapabilitySpec::Single { tag, .. } | CapabilitySpec::Team { tag, .. } => vec![*tag],
            CapabilitySpec::Scoped { team, own, .. } => vec![*team, *own],
        }
    }
}

/// Phrases stating that a hero performs no ordinary attacks.
pub const NO_ORDINARY_ATTACKS: &str = r"\b(?:no longer|does not|doesn't|cannot|can't|never|will not)\s+(?:performs?\s+|uses?\s+|make\s+)?(?:normal|basic)\s+attacks?\b|\bno\s+(?:normal|basic)\s+attacks\b";

const ATTACK_SPEED: &str = r"\b(?:atk spd|atk speed|attack speed|haste)\b";

#[must_use]
pub fn default_rule_table() -> &'static [CapabilitySpec] {
    RULE_TABLE
}

static RULE_TABLE: &[CapabilitySpec] = &[
    CapabilitySpec::Scoped {
        team: known::ATK_SPD_UP,
        team_rules: &[RuleSpec::team(ATTACK_SPEED, 80).forbid_before(DIMINISH_BEFORE, 40)],
        own: known::ATK_SPEED_SELF_ONLY,
        own_rules: &[
            RuleSpec::new(
                r"\b(?:gains?|increases?|grants?|boosts?|bonus)\b[\s\S]{0,60}?\b(?:atk spd|atk speed|attack speed)\b",
            )
            .forbid_before(NEGATION_BEFORE, 24),
            RuleSpec::new(r"\b(?:self|himself|herself|itself)\b[\s\S]{0,40}?\b(?:atk spd|atk speed|attack speed)\b"),
        ],
    },
    CapabilitySpec::Scoped {
        team: known::ENERGY_RESTORE_TEAM,
        team_rules: &[RuleSpec::team(
            r"\b(?:restores?|grants?|provides?|shares?|gives?|recovers?|regenerates?)\b[\s\S]{0,60}?\benergy\b",
            60,
        )
        .not_negated()],
        own: known::ENERGY_RESTORE_SELF,
        own_rules: &[RuleSpec::new(
            r"\b(?:restores?|recovers?|gains?|generates?|regenerates?)\b[\s\S]{0,40}?\benergy\b",
        )
        .not_negated()],
    },
    CapabilitySpec::Team {
        tag: known::CDR_TEAM,
        rules: &[
            RuleSpec::team(
                r"\bcooldowns?\b[\s\S]{0,40}?\b(?:reduc|shorten|decreas|faster)\w*",
                80,
            ),
            RuleSpec::team(
                r"\b(?:reduc|shorten|decreas)\w*\b[\s\S]{0,40}?\bcooldowns?\b",
                80,
            ),
        ],
    },
    CapabilitySpec::Scoped {
        team: known::HEAL_TEAM,
        team_rules: &[
            RuleSpec::team(r"\bheal(?:s|ed|ing)?\b", 120).forbid_before(DIMINISH_BEFORE, 40),
            RuleSpec::team(r"\brestores?\b[\s\S]{0,40}?\b(?:hp|health)\b", 120),
        ],
        own: known::SELF_HEAL,
        own_rules: &[
            RuleSpec::new(r"\bheal(?:s|ed|ing)?\b").forbid_before(DIMINISH_BEFORE, 40),
            RuleSpec::new(r"\b(?:lifesteal|life steal)\b"),
            RuleSpec::new(r"\brestores?\b[\s\S]{0,40}?\b(?:hp|health)\b"),
        ],
    },
    CapabilitySpec::Scoped {
        team: known::SHIELD_TEAM,
        team_rules: &[RuleSpec::team(r"\bshield(?:s|ed)?\b", 120).forbid_before(BREAK_BEFORE, 30)],
        own: known::SELF_SHIELD,
        own_rules: &[RuleSpec::new(r"\bshield(?:s|ed)?\b").forbid_before(BREAK_BEFORE, 30)],
    },
    CapabilitySpec::Scoped {
        team: known::DAMAGE_REDUCTION_TEAM,
        team_rules: &[
            RuleSpec::team(
                r"\b(?:takes?|taken)\b[\s\S]{0,30}?\b(?:less|reduced)\b[\s\S]{0,20}?\bdamage\b",
                60,
            ),
            RuleSpec::team(r"\bdamage reduction\b", 60),
        ],
        own: known::DAMAGE_REDUCTION_SELF,
        own_rules: &[
            RuleSpec::new(
                r"\b(?:takes?|taken)\b[\s\S]{0,30}?\b(?:less|reduced)\b[\s\S]{0,20}?\bdamage\b",
            ),
            RuleSpec::new(r"\bdamage (?:taken )?reduc(?:ed|tion)\b"),
            RuleSpec::new(r"\breduces? (?:the )?damage (?:taken|received)\b"),
        ],
    },
    CapabilitySpec::Team {
        tag: known::DEBUFF_CLEANSE_TEAM,
        rules: &[RuleSpec::team(
            r"\b(?:removes?|cleanses?|purif\w*|dispels?)\b[\s\S]{0,40}?\b(?:debuffs?|negative effects?|control effects?)\b",
            80,
        )],
    },
    CapabilitySpec::Scoped {
        team: known::CC_IMMUNITY_TEAM,
        team_rules: &[RuleSpec::team(
            r"\bimmun(?:e|ity)\b[\s\S]{0,40}?\b(?:cc|crowd control|control effects?|debuffs?|stuns?)\b",
            80,
        )],
        own: known::CC_RESISTANCE,
        own_rules: &[RuleSpec::new(
            r"\b(?:immun\w*|resist\w*)\b[\s\S]{0,30}?\b(?:cc|crowd control|control effects?|stuns?)\b",
        )],
    },
    CapabilitySpec::Single {
        tag: known::ANTI_HEAL,
        rules: &[
            RuleSpec::new(
                r"\b(?:reduc|decreas|lower|block|prevent)\w*\b[\s\S]{0,30}?\bheal(?:ing)?\b[\s\S]{0,20}?\b(?:received|effects?|effectiveness)\b",
            ),
            RuleSpec::new(r"\b(?:anti-heal|grievous wounds?|healing reduction)\b"),
        ],
    },
    CapabilitySpec::Single {
        tag: known::ENEMY_VULNERABILITY,
        rules: &[
            RuleSpec::new(
                r"\b(?:reduc|decreas|lower|shred)\w*\b[\s\S]{0,40}?\b(?:armor|m-res|magic res\w*|defen[cs]e|def)\b",
            )
            .not_negated(),
            RuleSpec::new(
                r"\b(?:increas|amplif)\w*\b[\s\S]{0,30}?\b(?:damage|dmg)\b[\s\S]{0,20}?\b(?:taken|received)\b",
            ),
            RuleSpec::new(r"\bvulnerab\w*\b"),
        ],
    },
    CapabilitySpec::Single {
        tag: known::BUFF_DISPEL,
        rules: &[RuleSpec::new(
            r"\b(?:dispels?|purges?|removes?|strips?)\b[\s\S]{0,40}?\b(?:buffs?|positive effects?)\b",
        )],
    },
    CapabilitySpec::Single {
        tag: known::CROWD_CONTROL,
        rules: &[RuleSpec::new(
            r"\b(?:stun|silenc|freez|frozen|root|sleep|charm|knock|petrif|fear)\w*\b",
        )
        .forbid_before(IMMUNE_OR_NEGATED_BEFORE, 30)],
    },
    CapabilitySpec::Single {
        tag: known::TAUNT,
        rules: &[
            RuleSpec::new(r"\b(?:taunts?|taunted|provokes?)\b").not_negated(),
            RuleSpec::new(r"\bforced? to attack\b"),
        ],
    },
    CapabilitySpec::Single {
        tag: known::ENERGY_DRAIN,
        rules: &[
            RuleSpec::new(r"\b(?:drains?|steals?|burns?)\b[\s\S]{0,40}?\benergy\b").not_negated(),
            RuleSpec::new(r"\benergy (?:drain|steal|burn)\b").not_negated(),
        ],
    },
    CapabilitySpec::Single {
        tag: known::ATK_DOWN,
        rules: &[RuleSpec::new(
            r"\b(?:reduc|decreas|lower)\w*\b[\s\S]{0,30}?\b(?:atk|attack)\b",
        )
        .forbid_after(r"^\s*(?:spd|speed)", 8)],
    },
    CapabilitySpec::Single {
        tag: known::ATK_SPD_DOWN,
        rules: &[RuleSpec::new(
            r"\b(?:reduc|decreas|lower|slow)\w*\b[\s\S]{0,30}?\b(?:atk spd|atk speed|attack speed)\b",
        )],
    },
    CapabilitySpec::Single {
        tag: known::AREA_DAMAGE_DEALER,
        rules: &[
            RuleSpec::new(
                r"\b(?:aoe|all enemies|nearby enemies|surrounding enemies|in a (?:small |large )?area|in an area)\b[\s\S]{0,60}?\b(?:dmg|damage)\b",
            ),
            RuleSpec::new(
                r"\b(?:dmg|damage)\b[\s\S]{0,30}?\b(?:to|against) (?:all|nearby|surrounding) enemies\b",
            ),
        ],
    },
    CapabilitySpec::Single {
        tag: known::BASIC_ATTACK_SCALER,
        rules: &[
            RuleSpec::new(
                r"\b(?:basic|normal) attacks?\b[\s\S]{0,60}?\b(?:increas|boost|extra|additional|bonus)\w*",
            ),
            RuleSpec::new(
                r"\b(?:increas|boost|extra|additional|bonus)\w*\b[\s\S]{0,60}?\b(?:basic|normal) attacks?\b",
            ),
        ],
    },
    CapabilitySpec::Single {
        tag: known::ON_HIT_SCALER,
        rules: &[RuleSpec::new(r"\b(?:on hit|on-hit|each hit|every hit|per hit|per attack)\b")],
    },
    CapabilitySpec::Single {
        tag: known::FAST_STACKING_WITH_HITS,
        rules: &[
            RuleSpec::new(
                r"\bstacks?\b[\s\S]{0,60}?\b(?:on hit|per hit|per attack|each hit|(?:normal|basic) attacks?)\b",
            ),
            RuleSpec::new(
                r"\b(?:each hit|per hit|per attack|(?:normal|basic) attacks?)\b[\s\S]{0,40}?\bstacks?\b",
            ),
        ],
    },
    CapabilitySpec::Single {
        tag: known::ULT_DEPENDENT,
        rules: &[RuleSpec::new(
            r"\b(?:upon|when|after)\b[\s\S]{0,30}?\bcast\w*\b[\s\S]{0,30}?\bultimate\b",
        )],
    },
    CapabilitySpec::Single {
        tag: known::BACKLINE_ACCESS,
        rules: &[RuleSpec::new(
            r"\b(?:farthest enem\w*|back ?row|rear row|backline|behind (?:the )?enem\w*|teleports?|blinks?|leaps? to)\b",
        )],
    },
    CapabilitySpec::Single {
        tag: known::DODGE_BUFF,
        rules: &[RuleSpec::new(r"\b(?:dodge|evasion|evade)\w*\b").not_negated()],
    },
    CapabilitySpec::Single {
        tag: known::GAIN_ARMOR,
        rules: &[RuleSpec::new(
            r"\b(?:gains?|increases?)\b[\s\S]{0,30}?\b(?:armor|defen[cs]e|magic res\w*)\b",
        )],
    },
];

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_every_pattern_compiles() {
        for capability in default_rule_table() {
            let rules = match capability {
                CapabilitySpec::Single { rules, .. } | CapabilitySpec::Team { rules, .. } => {
                    rules.iter().collect::<Vec<_>>()
                }
                CapabilitySpec::Scoped {
                    team_rules,
                    own_rules,
                    ..
                } => team_rules.iter().chain(own_rules.iter()).collect(),
            };
            for rule in rules {
                rule.compile().unwrap();
            }
        }
        regex::Regex::new(NO_ORDINARY_ATTACKS).unwrap();
    }

    #[test]
    fn test_scoped_capabilities_are_declared_pairs() {
        let pairs = known::SCOPED_PAIRS.into_iter().collect::<BTreeSet<_>>();
        for capability in default_rule_table() {
            if let CapabilitySpec::Scoped { team, own, .. } = capability {
                assert!(pairs.contains(&(*team, *own)), "{team}/{own}");
            }
        }
    }

    #[test]
    fn test_each_tag_has_one_capability() {
        let mut seen = BTreeSet::new();
        for capability in default_rule_table() {
            for tag in capability.tags() {
                assert!(seen.insert(tag), "duplicate capability for {tag}");
            }
        }
    }
}
