use crate::basic_types::{ConstraintId, ConstraintReference, ValueSet, VarId};
use crate::engine::variables::{Explainer, HistoricalVariableDatabase, PropagationQueue, VariableDatabase, VariablePropagatorOps, WatchKind, WatcherHandle};

use super::watcher_store::WatcherStore;

/// The communication point between a constraint and the solver, passed to both
/// `Constraint::initialize` and `Constraint::propagate`.
#[derive(Debug)]
pub struct PropagationContextMut<'a> {
 db: &'a mut VariableDatabase,
 watchers: &'a mut WatcherStore,
 queue: &'a mut PropagationQueue,
 constraint_id: ConstraintId,
}

/// Used only during `Constraint::initialize`; an alias rather than a distinct type for
/// the reason given on [`PropagationContextMut`].
pub type InitializationContext<'a> = PropagationContextMut<'a>;

impl<'a> PropagationContextMut<'a> {
 pub fn new(
 db: &'a mut VariableDatabase,
 watchers: &'a mut WatcherStore,
 queue: &'a mut PropagationQueue,
 constraint_id: ConstraintId,
 ) -> Self {
 PropagationContextMut {
 db,
 watchers,
 queue,
 constraint_id,
 }
 }

 pub fn current(&self, var: VarId) -> &ValueSet {
 self.db.current(var)
 }

 pub fn initial(&self, var: VarId) -> &ValueSet {
 self.db.initial(var)
 }

 /// Intersects `var`'s domain with `mask`, attributing the change to this
 /// constraint. Returns `false` on contradiction.
 pub fn narrow(&mut self, var: VarId, mask: &ValueSet, explainer: Option<Explainer>) -> bool {
 self.db
.narrow(var, mask, ConstraintReference::Constraint(self.constraint_id), explainer, self.queue)
 }

 pub fn add_watcher(&mut self, var: VarId, kind: WatchKind) -> WatcherHandle {
 self.watchers.get_mut(var).add_watcher(self.constraint_id, kind)
 }

 pub fn add_value_watcher(&mut self, var: VarId, watch_mask: ValueSet) -> WatcherHandle {
 self.watchers.get_mut(var).add_value_watcher(self.constraint_id, watch_mask)
 }

 pub fn remove_watcher(&mut self, var: VarId, handle: WatcherHandle) {
 self.watchers.get_mut(var).remove_watcher(handle, self.constraint_id)
 }

 pub fn constraint_id(&self) -> ConstraintId {
 self.constraint_id
 }

 pub fn timestamp(&self) -> usize {
 self.db.timestamp()
 }
}

/// A read-only view used by `Constraint::explain`, projecting the database to the
/// timestamp the propagation being explained happened at ('s
/// `HistoricalVariableDatabase(&db, t)` pattern).
pub struct ExplanationContext<'a> {
 historical: HistoricalVariableDatabase<'a>,
}

impl<'a> ExplanationContext<'a> {
 pub fn new(db: &'a VariableDatabase, timestamp: usize) -> Self {
 ExplanationContext {
 historical: HistoricalVariableDatabase::new(db, timestamp),
 }
 }

 pub fn value_at(&self, var: VarId) -> ValueSet {
 self.historical.value_at(var)
 }
}
