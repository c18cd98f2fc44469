//! Clause storage: the [`ClauseConstraint`] workhorse constraint, LBD computation,
//! and activity-based purging of the temporary learned-clause pool.

pub mod clause_constraint;
pub mod clause_store;
pub mod lbd;
pub mod simplify;

pub use clause_constraint::{ClauseConstraint, LearnedMetadata};
pub use clause_store::{bump_activity, decay_activities, purge, select_purge_candidates, should_purge, LEARNED_SCALAR, PERMANENT_LBD_THRESHOLD, PURGE_PERCENT};
pub use lbd::calculate_lbd;
