//! Statistical utilities for the Squadsmith project.
//!
//! This crate provides the small set of numeric summaries used across the roster
//! pipeline:
//!
//! - **Descriptive statistics**: count, range and mean of a dataset
//! - **Min-max scaling**: map raw values onto \[0, 1\] (or any target range) against an
//!   observed range, with a fixed midpoint for degenerate ranges
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`scale`]: Min-max scaling relative to an observed range
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use squadsmith_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Scaling a value against the observed range
//!
//! ```
//! use squadsmith_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([100.0, 200.0, 300.0]).unwrap();
//! let scale = stats.scale();
//! assert_eq!(scale.position(300.0), 1.0);
//! assert_eq!(scale.position(200.0), 0.5);
//! ```

pub mod descriptive;
pub mod scale;
