//! Core roster data model for Squadsmith.
//!
//! This crate defines the types every other crate in the workspace shares:
//!
//! - [`hero`]: raw hero records as read from disk ([`HeroRecord`]) and the validated,
//!   canonicalized [`Hero`] built from them
//! - [`faction`]: faction labels, including the configured wildcard faction
//! - [`rating`]: editorial rating tiers (SSS..D)
//! - [`mode`]: the scoring contexts (`general`, `pve`, `pvp`)
//! - [`roster`]: the validated, id-unique, index-addressable collection of heroes
//! - [`team`]: fixed-size team member lists
//!
//! Records are immutable once loaded. Everything downstream addresses heroes through
//! [`HeroIndex`], a position in the id-sorted roster, so that iteration order is stable
//! regardless of how the records were discovered.

pub mod faction;
pub mod hero;
pub mod mode;
pub mod rating;
pub mod roster;
pub mod team;

pub use self::{
    faction::Faction,
    hero::{Hero, HeroId, HeroRecord, Relic, Skill, StatValue},
    mode::Mode,
    rating::{RatingTier, Ratings},
    roster::{HeroIndex, Roster, RosterConfig, RosterError},
    team::{TEAM_SIZE, Team, TeamError, TeamKey},
};
