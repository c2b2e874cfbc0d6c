//! Analysis modules.
//!
//! Every function here is pure over a slice of already-validated records.
//! The aggregator is the entry point; the other modules are the individual
//! statistics it combines.

pub mod aggregator;
pub mod correlation;
pub mod distribution;
pub mod filter;
pub mod trend;

pub use aggregator::*;
pub use correlation::{correlate, pearson, risk_correlations};
pub use distribution::{comparative_box_plot, summarize, symptom_box_plots};
pub use filter::{AgeRange, AnalyticsFilter};
pub use trend::{age_risk_series, aggregate_trend, summary_stats, TrendAggregate};
