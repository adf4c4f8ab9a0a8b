//! Per-hero heuristic score.
//!
//! A hero's score in a mode is the weighted sum of three terms:
//!
//! - **Stat term**: `Σ percentile × weight × channel_points` over the configured stat
//!   weights. A stat the hero does not expose contributes nothing.
//! - **Text term**: points of every matched [signal](crate::text_signal), times the mode's
//!   signal multiplier, plus the numeric-density bonus, capped at `text_cap`.
//! - **Synergy term**: configured points of every tag the hero carries, times the mode's
//!   tag multiplier, capped at `synergy.cap` and scaled by `synergy.scale`.
//!
//! Each term is then multiplied by the mode's term weight. The scorer holds no state
//! beyond its compiled configuration, so scoring is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use squadsmith_analysis::enrichment::EnrichedHero;
use squadsmith_roster::{Hero, Mode};
use squadsmith_tagging::tag::known;

use crate::{
    ScoringError,
    power_index::TierScale,
    text_signal::{NumericDensityConfig, SignalSpec, SignalTable, default_signals},
};

/// Points per tag for the synergy term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynergyPoints {
    pub tag_points: BTreeMap<String, f32>,
    pub cap: f32,
    pub scale: f32,
}

impl Default for SynergyPoints {
    fn default() -> Self {
        let tag_points = [
            // providers
            (known::ENERGY_RESTORE_TEAM, 10.0),
            (known::CDR_TEAM, 8.0),
            (known::ENEMY_VULNERABILITY, 6.0),
            (known::ATK_SPD_UP, 4.0),
            (known::SHIELD_TEAM, 1.0),
            (known::HEAL_TEAM, 1.0),
            (known::DEBUFF_CLEANSE_TEAM, 1.0),
            (known::DAMAGE_REDUCTION_TEAM, 1.0),
            (known::CC_IMMUNITY_TEAM, 1.0),
            (known::BUFF_DISPEL, 1.0),
            (known::CROWD_CONTROL, 1.0),
            (known::TAUNT, 1.0),
            (known::ENERGY_DRAIN, 1.0),
            (known::ATK_DOWN, 2.0),
            (known::ATK_SPD_DOWN, 2.0),
            // receivers
            (known::AREA_DAMAGE_DEALER, 8.0),
            (known::BASIC_ATTACK_SCALER, 6.0),
            (known::ATK_SPEED_SELF_ONLY, 3.0),
        ]
        .into_iter()
        .map(|(tag, points)| (tag.to_owned(), points))
        .collect();
        Self {
            tag_points,
            cap: 100.0,
            scale: 0.2,
        }
    }
}

/// Term weights and multipliers of one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeWeights {
    pub stats: f32,
    pub text: f32,
    pub synergy: f32,
    #[serde(default)]
    pub signal_multipliers: BTreeMap<String, f32>,
    #[serde(default)]
    pub tag_multipliers: BTreeMap<String, f32>,
}

impl ModeWeights {
    fn neutral() -> Self {
        Self {
            stats: 1.0,
            text: 1.0,
            synergy: 1.0,
            signal_multipliers: BTreeMap::new(),
            tag_multipliers: BTreeMap::new(),
        }
    }

    fn signal_multiplier(&self, key: &str) -> f32 {
        self.signal_multipliers.get(key).copied().unwrap_or(1.0)
    }

    fn tag_multiplier(&self, tag: &str) -> f32 {
        self.tag_multipliers.get(tag).copied().unwrap_or(1.0)
    }
}

fn multipliers(entries: &[(&str, f32)]) -> BTreeMap<String, f32> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_owned(), *value))
        .collect()
}

/// Weights for every mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeWeightTable {
    pub general: ModeWeights,
    pub pve: ModeWeights,
    pub pvp: ModeWeights,
}

impl ModeWeightTable {
    #[must_use]
    pub fn get(&self, mode: Mode) -> &ModeWeights {
        match mode {
            Mode::General => &self.general,
            Mode::Pve => &self.pve,
            Mode::Pvp => &self.pvp,
        }
    }
}

impl Default for ModeWeightTable {
    fn default() -> Self {
        // PvE rewards control and sustained AoE, PvP rewards burst and anti-dive tools.
        let pve = ModeWeights {
            synergy: 1.1,
            signal_multipliers: multipliers(&[
                ("AOE", 1.5),
                ("STUN", 1.3),
                ("SILENCE", 1.2),
                ("ROOT", 1.2),
                ("KNOCKBACK", 1.2),
                ("SLOW", 1.2),
                ("RAMPING", 1.3),
                ("FOR_ENTIRE_BATTLE", 1.2),
            ]),
            tag_multipliers: multipliers(&[
                (known::AREA_DAMAGE_DEALER, 1.5),
                (known::CROWD_CONTROL, 1.5),
                (known::HEAL_TEAM, 1.3),
                (known::TAUNT, 1.3),
            ]),
            ..ModeWeights::neutral()
        };
        let pvp = ModeWeights {
            stats: 1.05,
            signal_multipliers: multipliers(&[
                ("TRUE_DAMAGE", 1.3),
                ("PERCENT_HP_DAMAGE", 1.3),
                ("DEF_SHRED", 1.2),
                ("DAMAGE_AMP", 1.2),
                ("STUN", 1.2),
                ("SILENCE", 1.3),
                ("CLEANSE", 1.3),
                ("SHIELD", 1.2),
            ]),
            tag_multipliers: multipliers(&[
                (known::BACKLINE_ACCESS, 1.5),
                (known::CC_IMMUNITY_TEAM, 1.5),
                (known::DEBUFF_CLEANSE_TEAM, 1.4),
                (known::ENERGY_DRAIN, 1.4),
                (known::BUFF_DISPEL, 1.3),
                (known::ENEMY_VULNERABILITY, 1.3),
            ]),
            ..ModeWeights::neutral()
        };
        Self {
            general: ModeWeights::neutral(),
            pve,
            pvp,
        }
    }
}

/// Every tunable of the hero scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Canonical stat name to weight.
    pub stat_weights: BTreeMap<String, f32>,
    /// Points a stat channel is worth at weight 1 and percentile 1.
    pub channel_points: f32,
    pub signals: Vec<SignalSpec>,
    pub text_cap: f32,
    pub numeric_density: NumericDensityConfig,
    pub synergy: SynergyPoints,
    pub modes: ModeWeightTable,
    pub tiers: TierScale,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let stat_weights = [
            // offense
            ("atk", 1.0),
            ("might", 1.0),
            ("ultimatePWR", 1.0),
            ("normalSkillPWR", 0.8),
            // defense
            ("hp", 0.75),
            ("armor", 0.65),
            ("magicRes", 0.65),
            // damage modifiers
            ("pDmgBonus", 0.8),
            ("mDmgBonus", 0.8),
            ("pDmgRed", 0.6),
            ("mDmgRed", 0.6),
            // crit
            ("critRate", 0.25),
            ("critRes", 0.5),
            ("critDmgBonus", 0.6),
            ("critDmgRed", 0.5),
            // tempo
            ("atkSpdBonus", 0.8),
            ("dodgeRate", 0.7),
            ("hitBonus", 0.4),
            // effects
            ("effectHit", 0.5),
            ("effectRes", 0.6),
            ("controlBonus", 0.7),
            ("controlRes", 0.6),
            // sustain and economy
            ("healEff", 0.7),
            ("lifestealEff", 0.6),
            ("reflectEff", 0.4),
            ("rechargeEff", 0.5),
            ("cooldownHaste", 0.6),
            ("energy", 0.3),
        ]
        .into_iter()
        .map(|(stat, weight)| (stat.to_owned(), weight))
        .collect();
        Self {
            stat_weights,
            channel_points: 25.0,
            signals: default_signals(),
            text_cap: 40.0,
            numeric_density: NumericDensityConfig::default(),
            synergy: SynergyPoints::default(),
            modes: ModeWeightTable::default(),
            tiers: TierScale::default(),
        }
    }
}

/// Score of one hero in one mode, with its parts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub stat_points: f32,
    pub text_points: f32,
    pub synergy_points: f32,
    pub numeric_density_bonus: f32,
    /// Matched signal keys in table order.
    pub signals: Vec<String>,
    /// Weighted sum of the three terms.
    pub total: f32,
}

/// Compiled hero scorer.
#[derive(Debug, Clone)]
pub struct HeroScorer {
    stat_weights: BTreeMap<String, f32>,
    channel_points: f32,
    signals: SignalTable,
    text_cap: f32,
    synergy: SynergyPoints,
    modes: ModeWeightTable,
}

impl HeroScorer {
    pub fn new(config: &ScoringConfig) -> Result<Self, ScoringError> {
        let signals = SignalTable::new(&config.signals, config.numeric_density)?;
        Ok(Self {
            stat_weights: config.stat_weights.clone(),
            channel_points: config.channel_points,
            signals,
            text_cap: config.text_cap,
            synergy: config.synergy.clone(),
            modes: config.modes.clone(),
        })
    }

    #[must_use]
    pub fn score(&self, hero: &Hero, enriched: &EnrichedHero, mode: Mode) -> ScoreBreakdown {
        let weights = self.modes.get(mode);

        let stat_points = self.stat_points(enriched);

        let hits = self.signals.scan(&hero.kit_text().to_lowercase());
        let numeric_density_bonus = self.signals.density_bonus(hits.numeric_tokens);
        let signal_points = hits
            .hits
            .iter()
            .map(|(key, points)| points * weights.signal_multiplier(key))
            .sum::<f32>();
        let text_points = (signal_points + numeric_density_bonus).min(self.text_cap);

        let tag_points = enriched
            .tags()
            .tags()
            .filter_map(|tag| {
                let points = self.synergy.tag_points.get(tag.as_str())?;
                Some(points * weights.tag_multiplier(tag.as_str()))
            })
            .sum::<f32>();
        let synergy_points = tag_points.min(self.synergy.cap) * self.synergy.scale;

        let total = weights.stats * stat_points
            + weights.text * text_points
            + weights.synergy * synergy_points;

        ScoreBreakdown {
            stat_points,
            text_points,
            synergy_points,
            numeric_density_bonus,
            signals: hits.keys().map(str::to_owned).collect(),
            total,
        }
    }

    fn stat_points(&self, enriched: &EnrichedHero) -> f32 {
        self.stat_weights
            .iter()
            .filter_map(|(stat, weight)| {
                let percentile = enriched.percentile(stat)?;
                Some(percentile * weight * self.channel_points)
            })
            .sum()
    }
}
