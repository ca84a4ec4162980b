//! Statistical utilities for SGF transition analysis.
//!
//! This crate provides the numeric building blocks used by `sgf-analysis`:
//!
//! - **Survival analysis**: Nelson-Aalen cumulative hazard estimation for
//!   right-censored time-to-event data
//! - **Descriptive statistics**: mean, median, variance and standard deviation
//!
//! # Modules
//!
//! - [`hazard`]: Nelson-Aalen cumulative hazard curves
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ## Estimating a cumulative hazard
//!
//! ```
//! use sgf_stats::hazard::NelsonAalenCurve;
//!
//! // Data: (time, is_censored)
//! let data = vec![
//!     (10.0, false), // Event occurred at time 10
//!     (20.0, true),  // Censored at time 20
//!     (30.0, false), // Event occurred at time 30
//! ];
//! let curve = NelsonAalenCurve::from_data(data);
//! assert_eq!(curve.times, [10.0, 30.0]);
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use sgf_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod descriptive;
pub mod hazard;
