//! Keyword-family signals over kit text.
//!
//! Each signal is a regex over the lower-cased kit text worth a fixed number of points
//! when it matches at least once. On top of that, texts dense with explicit numbers earn
//! a small bonus, since numeric detail tends to mean more effects per skill.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ScoringError;

/// A keyword family as configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalSpec {
    pub key: String,
    pub points: f32,
    pub pattern: String,
}

impl SignalSpec {
    fn new(key: &str, points: f32, pattern: &str) -> Self {
        Self {
            key: key.to_owned(),
            points,
            pattern: pattern.to_owned(),
        }
    }
}

/// Parameters of the numeric-density bonus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericDensityConfig {
    /// Token count at which the bonus saturates.
    pub saturation: f32,
    pub max_bonus: f32,
}

impl Default for NumericDensityConfig {
    fn default() -> Self {
        Self {
            saturation: 25.0,
            max_bonus: 4.0,
        }
    }
}

/// Signal families and their points.
#[must_use]
pub fn default_signals() -> Vec<SignalSpec> {
    vec![
        // economy
        SignalSpec::new(
            "ENERGY",
            7.0,
            r"\benergy\b|\brestore(s|d)? energy\b|\bgain(s|ed)? energy\b",
        ),
        SignalSpec::new(
            "COOLDOWN",
            7.0,
            r"\bcooldown\b|\bcdr\b|\breduce(s|d)? cooldown\b",
        ),
        SignalSpec::new(
            "ATK_SPEED",
            5.0,
            r"\batk spd\b|\battack speed\b|\bincrease(s|d)? .*speed\b",
        ),
        // damage
        SignalSpec::new(
            "PERCENT_HP_DAMAGE",
            6.0,
            r"%.*max hp|max hp.*%|percent.*hp|of target'?s max hp",
        ),
        SignalSpec::new("TRUE_DAMAGE", 8.0, r"\btrue dmg\b|\btrue damage\b"),
        SignalSpec::new(
            "AOE",
            4.0,
            r"\ball enemies\b|\ball targets\b|\bao?e\b|\bto all\b",
        ),
        SignalSpec::new(
            "DEF_SHRED",
            6.0,
            r"\breduce(s|d)? (armor|def|m-?res)\b|\bdef shred\b|\barmor shred\b",
        ),
        SignalSpec::new(
            "DAMAGE_AMP",
            6.0,
            r"\bincrease(s|d)? dmg\b|\bdmg (taken|dealt) increased\b|\bvulnerable\b",
        ),
        // sustain
        SignalSpec::new(
            "ALLY_HEAL",
            7.0,
            r"\bheal(s|ed)? allies\b|\brestore(s|d)? hp to allies\b|\blowest hp ally\b",
        ),
        SignalSpec::new("SELF_HEAL", 4.0, r"\bheal(s|ed)? self\b|\brestore(s|d)? hp\b"),
        SignalSpec::new("SHIELD", 6.0, r"\bshield\b"),
        SignalSpec::new(
            "DAMAGE_REDUCTION",
            6.0,
            r"\bdmg taken reduced\b|\breduce(s|d)? dmg taken\b|\bdamage reduction\b|\binvulnerable\b|\binvincibl(e|ity)\b",
        ),
        SignalSpec::new(
            "CLEANSE",
            6.0,
            r"\bcleanse\b|\bremove(s|d)? (debuffs|negative effects)\b",
        ),
        // control
        SignalSpec::new("STUN", 7.0, r"\bstun(ned)?\b"),
        SignalSpec::new("SILENCE", 6.0, r"\bsilence(d)?\b"),
        SignalSpec::new("ROOT", 5.0, r"\broot(ed)?\b"),
        SignalSpec::new("KNOCKBACK", 4.0, r"\bknock\s?back\b"),
        SignalSpec::new("SLOW", 3.0, r"\bslow(ed)?\b"),
        // scaling
        SignalSpec::new("STACKS", 4.0, r"\bstack(s|ed)?\b|\bstacks up to\b"),
        SignalSpec::new(
            "FOR_ENTIRE_BATTLE",
            4.0,
            r"\bfor the entire battle\b|\bfor the whole battle\b|\bpermanent(ly)?\b",
        ),
        SignalSpec::new(
            "RAMPING",
            3.0,
            r"\bramp(s|ing)?\b|\bincrease(s|d)? over time\b",
        ),
    ]
}

#[derive(Debug, Clone)]
struct CompiledSignal {
    key: String,
    points: f32,
    regex: Regex,
}

/// Signals matched in one text, before any mode multiplier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalHits {
    /// `(key, points)` in table order.
    pub hits: Vec<(String, f32)>,
    pub numeric_tokens: usize,
}

impl SignalHits {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.hits.iter().map(|(key, _)| key.as_str())
    }
}

/// Compiled signal table.
#[derive(Debug, Clone)]
pub struct SignalTable {
    signals: Vec<CompiledSignal>,
    numeric_token: Regex,
    density: NumericDensityConfig,
}

impl SignalTable {
    pub fn new(specs: &[SignalSpec], density: NumericDensityConfig) -> Result<Self, ScoringError> {
        let signals = specs
            .iter()
            .map(|spec| {
                let regex = Regex::new(&spec.pattern).map_err(|source| {
                    ScoringError::InvalidSignalPattern {
                        key: spec.key.clone(),
                        source,
                    }
                })?;
                Ok(CompiledSignal {
                    key: spec.key.clone(),
                    points: spec.points,
                    regex,
                })
            })
            .collect::<Result<Vec<_>, ScoringError>>()?;
        let numeric_token = Regex::new(r"\d+(\.\d+)?%?").map_err(|source| {
            ScoringError::InvalidSignalPattern {
                key: "numeric token".to_owned(),
                source,
            }
        })?;
        Ok(Self {
            signals,
            numeric_token,
            density,
        })
    }

    /// Matches every signal against `text` (already lower-cased).
    #[must_use]
    pub fn scan(&self, text: &str) -> SignalHits {
        let hits = self
            .signals
            .iter()
            .filter(|signal| signal.regex.is_match(text))
            .map(|signal| (signal.key.clone(), signal.points))
            .collect();
        SignalHits {
            hits,
            numeric_tokens: self.numeric_token.find_iter(text).count(),
        }
    }

    /// `clamp(tokens / saturation, 0, 1) × max_bonus`.
    #[must_use]
    pub fn density_bonus(&self, numeric_tokens: usize) -> f32 {
        #[expect(clippy::cast_precision_loss)]
        let tokens = numeric_tokens as f32;
        if self.density.saturation <= 0.0 {
            return self.density.max_bonus;
        }
        (tokens / self.density.saturation).clamp(0.0, 1.0) * self.density.max_bonus
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.signals.iter().map(|signal| signal.key.as_str())
    }
}
