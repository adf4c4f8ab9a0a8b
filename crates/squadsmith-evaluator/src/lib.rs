//! Heuristic evaluation of heroes and teams.
//!
//! This crate scores single heroes and the team-level properties the composition search
//! optimizes for:
//!
//! 1. **Hero scoring** ([`hero_scorer`]) - Blends normalized stats, kit-text
//!    [signals](text_signal) and tag-derived synergy points into one score per mode.
//!
//! 2. **Power index** ([`power_index`]) - Rescales hero scores onto `[0, 100]` across the
//!    roster and assigns a tier. This is the per-member score the search sums.
//!
//! 3. **Faction bonus** ([`faction_bonus`]) - Pure function over five faction labels,
//!    with wildcard handling.
//!
//! 4. **Team synergy** ([`team_synergy`]) - Declarative rules rewarding tag, class and
//!    role combinations, each with a rationale sentence.
//!
//! # Example
//!
//! ```rust,no_run
//! use squadsmith_analysis::enrichment::EnrichedRoster;
//! use squadsmith_evaluator::{
//!     hero_scorer::{HeroScorer, ScoringConfig},
//!     power_index::PowerIndex,
//! };
//! use squadsmith_roster::Mode;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let enriched: EnrichedRoster = todo!();
//!
//! let config = ScoringConfig::default();
//! let scorer = HeroScorer::new(&config)?;
//! let index = PowerIndex::compute(&enriched, &scorer, &config.tiers);
//!
//! for (hero, power) in index.ranking(Mode::Pvp) {
//!     println!("{} {:>5.1} {}", enriched.hero(hero).id(), power.score, power.tier);
//! }
//! # Ok(())
//! # }
//! ```

pub mod faction_bonus;
pub mod hero_scorer;
pub mod power_index;
pub mod team_synergy;
pub mod text_signal;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ScoringError {
    #[display("invalid pattern for signal {key}")]
    InvalidSignalPattern { key: String, source: regex::Error },
}
