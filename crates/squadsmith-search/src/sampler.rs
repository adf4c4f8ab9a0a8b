//! Seeded team sampling and the team score.
//!
//! A [`TeamSampler`] runs one (anchor, mode) search: it builds the candidate pool and
//! the faction plans, then draws `attempts` teams per plan. Each draw fills the plan's
//! quotas uniformly from the eligible pool members; quota slots that cannot be filled
//! are taken by the best remaining pool members by power score, so every team has five
//! members. The team score is
//!
//! ```text
//! Σ member power + bonus × faction_weight + presence × presence_weight
//!     + team synergy − shortfall × plan_penalty
//! ```
//!
//! where `shortfall` is how many bonus points the team misses of its plan's promise.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;
use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_pcg::Pcg32;
use squadsmith_analysis::enrichment::{EnrichedHero, EnrichedRoster};
use squadsmith_evaluator::{
    faction_bonus::{FactionBonus, FactionBonusConfig},
    power_index::PowerIndex,
    team_synergy::SynergyOutcome,
};
use squadsmith_roster::{Faction, Hero, HeroId, HeroIndex, Mode, TEAM_SIZE, Team, TeamKey};

use crate::{
    SearchConfig,
    plan::{FactionPlan, PlanSet},
    pool::CandidatePool,
};

/// A sampled team with its score components.
#[derive(Debug, Clone)]
pub struct ScoredTeam {
    pub team: Team,
    pub key: TeamKey,
    pub score: f32,
    pub bonus: FactionBonus,
    pub synergy: SynergyOutcome,
    /// Plan the team scored best under.
    pub plan: &'static str,
    /// Points subtracted for missing the plan's promised bonus.
    pub penalty: f32,
}

/// Result of one (anchor, mode) search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub anchor: HeroIndex,
    pub mode: Mode,
    /// Faction the plans were built around.
    pub main: Option<Faction>,
    /// Distinct teams, in key order.
    pub teams: Vec<ScoredTeam>,
}

/// Read-only context shared by every search of a run.
#[derive(Debug, Clone, Copy)]
pub struct TeamSampler<'a> {
    enriched: &'a EnrichedRoster,
    power: &'a PowerIndex,
    bonus: &'a FactionBonusConfig,
    config: &'a SearchConfig,
}

impl<'a> TeamSampler<'a> {
    #[must_use]
    pub fn new(
        enriched: &'a EnrichedRoster,
        power: &'a PowerIndex,
        bonus: &'a FactionBonusConfig,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            enriched,
            power,
            bonus,
            config,
        }
    }

    #[must_use]
    pub fn enriched(&self) -> &'a EnrichedRoster {
        self.enriched
    }

    #[must_use]
    pub fn power(&self) -> &'a PowerIndex {
        self.power
    }

    #[must_use]
    pub fn bonus_config(&self) -> &'a FactionBonusConfig {
        self.bonus
    }

    #[must_use]
    pub fn config(&self) -> &'a SearchConfig {
        self.config
    }

    /// Runs the search of `anchor` in `mode` with its own seeded generator.
    #[must_use]
    pub fn run(&self, anchor: HeroIndex, mode: Mode) -> SearchOutcome {
        let anchor_id = self.enriched.hero(anchor).id();
        let mut rng = Pcg32::seed_from_u64(generator_seed(self.config.seed, anchor_id, mode));
        self.run_with(anchor, mode, &mut rng)
    }

    /// Runs the search of `anchor` in `mode` drawing from `rng`.
    pub fn run_with<R>(&self, anchor: HeroIndex, mode: Mode, rng: &mut R) -> SearchOutcome
    where
        R: Rng + ?Sized,
    {
        let pool = CandidatePool::build(self.enriched, anchor, mode, self.config, rng);
        let plans = PlanSet::build(
            self.enriched,
            self.power,
            anchor,
            mode,
            &pool,
            self.config.second_faction_depth,
        );

        let mut by_power = pool.members().to_vec();
        by_power.sort_by(|a, b| {
            let (sa, sb) = (self.power.score(*a, mode), self.power.score(*b, mode));
            sb.total_cmp(&sa).then(a.cmp(b))
        });

        let mut teams: BTreeMap<TeamKey, ScoredTeam> = BTreeMap::new();
        for plan in &plans.plans {
            for _ in 0..self.config.attempts {
                let Some(team) = self.draw(anchor, plan, &pool, &by_power, rng) else {
                    continue;
                };
                let key = team.key();
                if let Some(existing) = teams.get_mut(&key) {
                    // same members: only the plan penalty can differ
                    let penalty = self.penalty(plan, &existing.bonus);
                    if penalty < existing.penalty {
                        existing.score += existing.penalty - penalty;
                        existing.penalty = penalty;
                        existing.plan = plan.name;
                    }
                    continue;
                }
                let scored = self.score(team, mode, plans.main.as_ref(), plan);
                teams.insert(key, scored);
            }
        }

        tracing::debug!(
            anchor = %self.enriched.hero(anchor).id(),
            %mode,
            pool = pool.len(),
            plans = plans.plans.len(),
            teams = teams.len(),
            "search finished"
        );
        SearchOutcome {
            anchor,
            mode,
            main: plans.main,
            teams: teams.into_values().collect(),
        }
    }

    fn draw<R>(
        &self,
        anchor: HeroIndex,
        plan: &FactionPlan,
        pool: &CandidatePool,
        by_power: &[HeroIndex],
        rng: &mut R,
    ) -> Option<Team>
    where
        R: Rng + ?Sized,
    {
        let mut chosen: ArrayVec<HeroIndex, { TEAM_SIZE - 1 }> = ArrayVec::new();
        for quota in &plan.quotas {
            let eligible = pool
                .members()
                .iter()
                .copied()
                .filter(|index| {
                    !chosen.contains(index)
                        && quota.eligibility.accepts(self.enriched.hero(*index))
                })
                .collect::<Vec<_>>();
            let slots = quota.slots.min(chosen.remaining_capacity());
            let target = chosen.len() + slots;
            chosen.extend(eligible.choose_multiple(rng, slots).copied());
            if chosen.len() < target {
                let fill = by_power
                    .iter()
                    .copied()
                    .filter(|index| !chosen.contains(index))
                    .take(target - chosen.len())
                    .collect::<Vec<_>>();
                chosen.extend(fill);
            }
        }
        Team::new(anchor, chosen).ok()
    }

    fn score(
        &self,
        team: Team,
        mode: Mode,
        main: Option<&Faction>,
        plan: &FactionPlan,
    ) -> ScoredTeam {
        let members = team
            .members()
            .iter()
            .map(|index| (self.enriched.hero(*index), self.enriched.enriched(*index)))
            .collect::<ArrayVec<(&Hero, &EnrichedHero), TEAM_SIZE>>();
        let wildcard = self.enriched.roster().wildcard();

        let power = team
            .members()
            .iter()
            .map(|index| self.power.score(*index, mode))
            .sum::<f32>();
        let bonus = self
            .bonus
            .evaluate(members.iter().map(|(hero, _)| hero.faction()), wildcard);
        #[expect(clippy::cast_precision_loss)]
        let presence = members
            .iter()
            .filter(|(hero, _)| hero.is_wildcard() || Some(hero.faction()) == main)
            .count() as f32;
        let synergy = self.config.synergy.evaluate(&members, mode);
        let penalty = self.penalty(plan, &bonus);

        #[expect(clippy::cast_precision_loss)]
        let score = power
            + bonus.value as f32 * self.config.faction_weight
            + presence * self.config.presence_weight
            + synergy.points
            - penalty;

        ScoredTeam {
            key: team.key(),
            team,
            score,
            bonus,
            synergy,
            plan: plan.name,
            penalty,
        }
    }

    fn penalty(&self, plan: &FactionPlan, bonus: &FactionBonus) -> f32 {
        let promised = self.bonus.value(plan.promised);
        #[expect(clippy::cast_precision_loss)]
        let shortfall = promised.saturating_sub(bonus.value) as f32;
        shortfall * self.config.plan_penalty
    }
}

/// Seed of the generator of one (anchor, mode) search.
///
/// FNV-1a over the anchor id and the mode name, mixed into the global seed, so the seed
/// is stable across platforms and does not depend on processing order.
#[must_use]
pub fn generator_seed(seed: u64, anchor: &HeroId, mode: Mode) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let bytes = anchor
        .as_str()
        .bytes()
        .chain([0xff])
        .chain(mode.to_string().into_bytes());
    let hash = bytes.fold(OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    });
    seed ^ hash
}
