use serde::{Deserialize, Serialize};

/// Scoring context.
///
/// `General` feeds the overall tier list, `Pve` and `Pvp` the mode-specific ones.
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
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[display("general")]
    General,
    #[display("pve")]
    Pve,
    #[display("pvp")]
    Pvp,
}

impl Mode {
    pub const ALL: [Self; 3] = [Self::General, Self::Pve, Self::Pvp];
}
