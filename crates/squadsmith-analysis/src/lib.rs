//! Roster analysis: stat normalization and enrichment
//!
//! This crate derives everything the scorer needs from a validated roster, once:
//!
//! 1. **Normalize stats** ([`normalization::StatNormalizer`]): per-stat min/max/mean over
//!    the heroes exposing the stat, and each hero's position in that range
//! 2. **Tag heroes** ([`squadsmith_tagging::TagEngine`]): capability tags with evidence
//! 3. **Enrich** ([`enrichment::EnrichedRoster`]): bundle the roster, tags and percentiles
//!    into a read-only view shared by every downstream stage
//!
//! # Example
//!
//! ```no_run
//! use squadsmith_analysis::enrichment::EnrichedRoster;
//! use squadsmith_roster::Roster;
//! use squadsmith_tagging::{TagEngine, TaggingConfig, tag::TagVocabulary};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let roster: Roster = todo!();
//! let engine = TagEngine::new(&TaggingConfig::default(), &TagVocabulary::default())?;
//! let enriched = EnrichedRoster::build(roster, &engine);
//!
//! for (hero, info) in enriched.iter() {
//!     println!("{}: {} tags", hero.id(), info.tags().len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod enrichment;
pub mod normalization;
