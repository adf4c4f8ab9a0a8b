use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Editorial rating tier attached to hero records.
///
/// Parsing is case-insensitive (`"ss"` and `"SS"` are the same tier).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum RatingTier {
    #[serde(rename = "SSS")]
    #[display("SSS")]
    Sss,
    #[serde(rename = "SS")]
    #[display("SS")]
    Ss,
    S,
    A,
    B,
    C,
    D,
}

impl RatingTier {
    pub const ALL: [Self; 7] = [
        Self::Sss,
        Self::Ss,
        Self::S,
        Self::A,
        Self::B,
        Self::C,
        Self::D,
    ];
}

/// Rating labels of a hero, possibly split by mode.
///
/// Labels are kept as written in the record; unknown labels are treated as absent
/// when resolved through [`Ratings::tier`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ratings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pve: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvp: Option<String>,
}

impl Ratings {
    /// Returns the tier for `mode`, falling back to the overall rating.
    ///
    /// ```
    /// # use squadsmith_roster::{Mode, RatingTier, Ratings};
    /// let ratings = Ratings {
    ///     overall: Some("A".into()),
    ///     pvp: Some("sss".into()),
    ///     ..Ratings::default()
    /// };
    /// assert_eq!(ratings.tier(Mode::Pvp), Some(RatingTier::Sss));
    /// assert_eq!(ratings.tier(Mode::Pve), Some(RatingTier::A));
    /// ```
    #[must_use]
    pub fn tier(&self, mode: Mode) -> Option<RatingTier> {
        let specific = match mode {
            Mode::General => None,
            Mode::Pve => self.pve.as_deref(),
            Mode::Pvp => self.pvp.as_deref(),
        };
        specific
            .and_then(parse_label)
            .or_else(|| self.overall.as_deref().and_then(parse_label))
    }

    /// Labels present in the record that do not name a known tier.
    pub fn unknown_labels(&self) -> impl Iterator<Item = &str> {
        [&self.overall, &self.pve, &self.pvp]
            .into_iter()
            .filter_map(|label| label.as_deref())
            .filter(|label| parse_label(label).is_none())
    }
}

fn parse_label(label: &str) -> Option<RatingTier> {
    label.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("sss".parse::<RatingTier>().ok(), Some(RatingTier::Sss));
        assert_eq!("Ss".parse::<RatingTier>().ok(), Some(RatingTier::Ss));
        assert_eq!("b".parse::<RatingTier>().ok(), Some(RatingTier::B));
        assert!("Z".parse::<RatingTier>().is_err());
    }

    #[test]
    fn test_unknown_label_falls_back_to_overall() {
        let ratings = Ratings {
            overall: Some("S".into()),
            pve: Some("great".into()),
            pvp: None,
        };
        assert_eq!(ratings.tier(Mode::Pve), Some(RatingTier::S));
        assert_eq!(ratings.unknown_labels().collect::<Vec<_>>(), ["great"]);
    }

    #[test]
    fn test_tier_serializes_as_label() {
        let json = serde_json::to_string(&RatingTier::Sss).unwrap();
        assert_eq!(json, "\"SSS\"");
        let tier: RatingTier = serde_json::from_str("\"A\"").unwrap();
        assert_eq!(tier, RatingTier::A);
    }
}
