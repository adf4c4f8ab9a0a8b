//! Stochastic team-composition search.
//!
//! For every anchor hero and mode, the search assembles five-hero teams around the
//! anchor, scores them and keeps a few labeled, distinct recommendations:
//!
//! ```text
//! anchor, mode
//!     ↓ CandidatePool::build      (top pool_size heroes by a cheap key)
//!     ↓ PlanSet::build            (faction quotas: 5, 4, 3+2, 3)
//!     ↓ TeamSampler::run          (seeded draws per plan, scored)
//!     ↓ select                    (dedup, meta / max_bonus | best_bonus / mixed)
//!     ↓ FormationConfig::assign   (2 front slots, 3 back slots)
//! Recommendation
//! ```
//!
//! - [`pool`]: candidate pool and its ranking key
//! - [`plan`]: faction plans and quotas
//! - [`sampler`]: per-(anchor, mode) generator and the team score
//! - [`selection`]: deduplication and labeling
//! - [`formation`]: battlefield placement
//! - [`recommend`]: the parallel driver and the output document
//!
//! Each (anchor, mode) generator is seeded from the global seed, the anchor id and the
//! mode, so results do not depend on thread scheduling.

use serde::{Deserialize, Serialize};
use squadsmith_evaluator::team_synergy::TeamSynergyConfig;

use self::pool::{PoolKeyConfig, RatingValues};

pub mod formation;
pub mod plan;
pub mod pool;
pub mod recommend;
pub mod sampler;
pub mod selection;

#[cfg(test)]
mod test_util;

/// Search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    pub seed: u64,
    /// Heroes kept in an anchor's candidate pool.
    pub pool_size: usize,
    /// Draws per plan.
    pub attempts: usize,
    /// Standard deviation of the noise added to pool keys; `0` disables it.
    pub noise_sigma: f32,
    pub pool_key: PoolKeyConfig,
    pub rating_values: RatingValues,
    /// Multiplier of the faction bonus value in the team score.
    pub faction_weight: f32,
    /// Points per member of the anchor's faction (wildcards included).
    pub presence_weight: f32,
    /// Points lost per bonus point a plan falls short of its promise.
    pub plan_penalty: f32,
    /// Best heroes per faction summed when ranking factions.
    pub second_faction_depth: usize,
    pub synergy: TeamSynergyConfig,
    /// Recommendations kept per anchor and mode.
    pub results_per_mode: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            pool_size: 30,
            attempts: 800,
            noise_sigma: 0.0,
            pool_key: PoolKeyConfig::default(),
            rating_values: RatingValues::default(),
            faction_weight: 10.0,
            presence_weight: 2.0,
            plan_penalty: 15.0,
            second_faction_depth: 8,
            synergy: TeamSynergyConfig::default(),
            results_per_mode: 3,
        }
    }
}
