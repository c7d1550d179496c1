//! Multi-objective assembly line balancing.
//!
//! Assigns precedence-constrained tasks to ordered workstations so that
//! every station stays within takt time, respects per-tool limits and
//! keeps precedence order. Candidate balances are generated by
//! constructive heuristics, scored on economic, social (workload
//! balance) and environmental (tool variety) objectives, and reduced to
//! a Pareto front.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `Station`, `Solution`,
//!   `ProblemConfig`, `Weights`, `Scores`
//! - **`validation`**: Input integrity checks (duplicate IDs, DAG cycles,
//!   takt and processing times, weights)
//! - **`precedence`**: Cycle detection, topological order, positional
//!   weight, slack, transitive closure
//! - **`feasibility`**: Full-solution and incremental constraint checks
//! - **`dispatching`**: Priority rules and rule engine for station filling
//! - **`generator`**: Greedy and targeted builders, multi-start search
//! - **`scoring`**: Objective scores and line balance KPIs
//! - **`pareto`**: Dominance, Pareto front, crowding distance
//! - **`report`**: Population statistics, station tables, breakdowns
//! - **`interchange`**: JSON documents for problems and solutions
//!
//! # Example
//!
//! ```
//! use u_linebalance::generator::{BalancingSearch, GeneratorConfig};
//! use u_linebalance::models::{ProblemConfig, Task};
//!
//! let config = ProblemConfig::new(15)
//!     .with_task(Task::new("T1", 10).with_tool("M1"))
//!     .with_task(Task::new("T2", 5).with_tool("M2"))
//!     .with_task(Task::new("T3", 8))
//!     .with_precedence("T1", "T2")
//!     .unwrap();
//!
//! let outcome = BalancingSearch::new(&config, GeneratorConfig::default().with_seed(1))
//!     .run()
//!     .unwrap();
//! for solution in &outcome.front {
//!     assert!(solution.is_valid);
//! }
//! ```
//!
//! # References
//!
//! - Scholl (1999), "Balancing and Sequencing of Assembly Lines"
//! - Boysen, Fliedner & Scholl (2007), "A classification of assembly line
//!   balancing problems"
//! - Deb (2001), "Multi-Objective Optimization using Evolutionary Algorithms"

pub mod dispatching;
pub mod error;
pub mod feasibility;
pub mod generator;
pub mod interchange;
pub mod models;
pub mod pareto;
pub mod precedence;
pub mod report;
pub mod scoring;
pub mod validation;

pub use error::{Error, Result};
