use crate::basic_types::{Literal, VarId};
use crate::engine::variables::VariableDatabase;

use super::propagation_context::{ExplanationContext, InitializationContext, PropagationContextMut};

/// The capability set every constraint kind satisfies:
/// initialise, propagate, explain, report the variables it constrains, and optionally
/// react to backtracking. Stored as a trait object in a flat, solver-owned vector
/// rather than through virtual-inheritance graphs; constraints refer to variables only
/// by id, never to the solver or to each other directly.
pub trait Constraint: std::fmt::Debug {
 /// Enforces initial arc consistency and registers watchers. Returning `false`
 /// means the constraint is already inconsistent at the point it was registered.
 fn initialize(&mut self, ctx: &mut InitializationContext) -> bool;

 /// Called when a watched variable narrows. Returning `false` means a conflict was
 /// detected (an empty domain, or the constraint's own logic failing).
 fn propagate(&mut self, ctx: &mut PropagationContextMut) -> bool;

 /// Produces the literals explaining why `literal` was (or would be) propagated,
 /// read against the domains as of just before the propagation being explained.
 fn explain(&mut self, literal: &Literal, ctx: &ExplanationContext) -> Vec<Literal>;

 /// Produces the literals explaining why this constraint is currently conflicting
 /// (all of them hold simultaneously and contradict the constraint). Read against
 /// the domains as of just before the conflicting propagation attempt.
 fn explain_conflict(&mut self, ctx: &ExplanationContext) -> Vec<Literal>;

 /// The variables this constraint was built over (used by simplification's
 /// occurrence lists and by graph promotion's initial-value-set comparison).
 fn constraining_variables(&self) -> Vec<VarId>;

 /// Optional backtracking-aware hook. Default: no-op. `db` reflects domains *after*
 /// the rollback, so a constraint caching derived state (graph adjacency, watcher
 /// bookkeeping) can resync by re-reading current values rather than walking its
 /// own undo journal. [`crate::engine::reachability::ReachabilityConstraint`]
 /// overrides this to resynchronise its graph views.
 fn backtrack(&mut self, _db: &VariableDatabase, _new_level: usize) {}

 /// Lets callers that need kind-specific data (clause purging, graph promotion)
 /// downcast without widening this trait's object-safe surface with per-kind
 /// accessors.
 fn as_any(&self) -> &dyn std::any::Any;
 fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
