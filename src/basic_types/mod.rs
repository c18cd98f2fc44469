//! Small value types shared across the engine: the variable id, the bitset domain
//! representation, literals, and the handful of "mostly a newtype" results used at
//! crate boundaries.

mod constraint_reference;
mod literal;
#[macro_use]
mod predicate;
mod value_set;
mod var_id;

pub use constraint_reference::{ConstraintId, ConstraintReference};
pub use literal::Literal;
pub use literal::LiteralStatus;
pub use value_set::ValueSet;
pub use var_id::VarId;

/// The outcome of a top-level `solve()`/`step()` call, mirroring the four states the
/// driver can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
 Solved,
 Unsatisfiable,
 Timeout,
 /// The solver has not yet been driven to a terminal state.
 InProgress,
}

/// Errors surfaced at the API boundary rather than handled as ordinary solver control
/// flow. See: these correspond to the `InvariantViolation`/`APIMisuse` rows.
#[derive(Debug, thiserror::Error)]
pub enum ConstraintOperationError {
 #[error("the constraint is trivially unsatisfiable at the point it was registered")]
 InfeasibleConstraint,
 #[error("the clause is trivially unsatisfiable (it has no literals, or is falsified at the root)")]
 InfeasibleClause,
 #[error("the solver is already in an infeasible state")]
 InfeasibleState,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiMisuseError {
 #[error("cannot modify the problem after `start_solving` has been called")]
 ModificationAfterStart,
 #[error("cannot create a variable with an empty initial domain")]
 EmptyInitialDomain,
}
