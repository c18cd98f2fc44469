//! The top-level search driver: propagation to fixpoint, conflict
//! analysis/learning/backjumping, decision making, restarts, and purging, tied
//! together into `solve`/`step`.

pub mod decision_levels;
pub mod driver;

pub use decision_levels::{DecisionLevel, DecisionLevels};
pub use driver::{ConstraintSolver, PropagationResult};
