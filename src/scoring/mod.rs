//! Objective scoring and line balance KPIs.
//!
//! `ObjectiveScorer` computes the three normalized objectives used for
//! Pareto analysis. `LineKpi` reports the classic line balancing
//! measures (efficiency, balance delay, smoothness) for display.
//!
//! # References
//!
//! - Scholl (1999), "Balancing and Sequencing of Assembly Lines"
//! - Deb (2001), "Multi-Objective Optimization using Evolutionary Algorithms"

mod kpi;
mod objectives;

pub use kpi::LineKpi;
pub use objectives::{
    economic_score, environmental_score, social_score, weighted_score, ObjectiveScorer,
};
