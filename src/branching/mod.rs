//! The decision-heuristic and restart-policy hooks consumed by the solver driver
//!. Concrete strategies are out of scope; each trait
//! carries exactly one default implementation so the core is usable standalone.

mod decision_heuristic;
mod restart_policy;

pub use decision_heuristic::{DecisionHeuristic, FirstFailHeuristic};
pub use restart_policy::{GeometricRestartPolicy, RestartPolicy};
