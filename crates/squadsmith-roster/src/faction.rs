use serde::{Deserialize, Serialize};

/// A faction label as it appears in hero records.
///
/// Factions are open-ended strings; which one acts as the wildcard is decided by
/// [`RosterConfig`](crate::RosterConfig), not by this type.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct Faction(String);

impl Faction {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares labels ignoring ASCII case, since record files are inconsistent about it.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl From<&str> for Faction {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
