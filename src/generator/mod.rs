//! Constructive heuristics and multi-start search.
//!
//! # Builders
//!
//! - [`GreedyBuilder`]: priority-rule station filling (LPT, least slack,
//!   positional weight, random, hybrid).
//! - [`TargetedBuilder`]: scored filling toward a target station count,
//!   used to spread the search across station counts.
//!
//! Both return `None` when construction stalls; a returned solution has
//! already been through the full feasibility check.
//!
//! # Search
//!
//! [`BalancingSearch`] runs many independent attempts, deduplicates them
//! in a [`Population`], scores the survivors and extracts the Pareto front.

mod config;
mod greedy;
mod population;
mod search;
mod targeted;

pub use config::{GeneratorConfig, TargetedParams};
pub use greedy::GreedyBuilder;
pub use population::Population;
pub use search::{BalancingSearch, SearchOutcome};
pub use targeted::TargetedBuilder;
