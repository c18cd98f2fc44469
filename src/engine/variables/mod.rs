//! Variable storage, the assignment log, and the per-variable watcher lists that wake
//! constraints on narrowing.

pub mod assignment_stack;
pub mod domain;
pub mod propagation_queue;
pub mod propagators;
pub mod variable_database;

pub use assignment_stack::{AssignmentStack, Explainer, StackEntry};
pub use domain::Domain;
pub use propagation_queue::PropagationQueue;
pub use propagators::{VariablePropagator, VariablePropagatorOps, WatchKind, WatcherHandle};
pub use variable_database::{HistoricalVariableDatabase, VariableDatabase};
