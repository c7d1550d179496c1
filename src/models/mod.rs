//! Line balancing domain models.
//!
//! Provides the data types for representing a balancing problem and
//! candidate solutions.
//!
//! # Domain Mappings
//!
//! | u-linebalance | Automotive | Electronics | Furniture |
//! |---------------|-----------|-------------|-----------|
//! | Task | Work element | Insertion step | Assembly step |
//! | Station | Workstation | Cell | Bench |
//! | Tool | Torque gun | Solder iron | Press |
//! | Solution | Line balance | Cell plan | Bench plan |

mod problem;
mod solution;
mod station;
mod task;

pub use problem::{PrecedenceEdge, ProblemConfig, Weights};
pub use solution::{Scores, Solution, Violation, ViolationType};
pub use station::Station;
pub use task::{Task, NO_TOOL};
