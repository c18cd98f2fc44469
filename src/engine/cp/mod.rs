//! Constraint-facing plumbing: the [`Constraint`] capability set, the contexts passed
//! to it, the per-variable watcher store, and the flat constraint registry.

pub mod constraint;
pub mod constraint_registry;
pub mod propagation_context;
pub mod watcher_store;

pub use constraint::Constraint;
pub use constraint_registry::{ConstraintEntry, ConstraintRegistry};
pub use propagation_context::{ExplanationContext, InitializationContext, PropagationContextMut};
pub use watcher_store::WatcherStore;

pub use crate::engine::variables::PropagationQueue;
