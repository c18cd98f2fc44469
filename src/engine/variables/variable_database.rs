use crate::basic_types::{ConstraintReference, ValueSet, VarId};

use super::assignment_stack::{AssignmentStack, Explainer, StackEntry};
use super::domain::Domain;
use super::propagation_queue::PropagationQueue;

/// Per-variable bookkeeping plus the shared assignment log. Owns domains, current
/// values, initial values, and last-solved values (for phase-saving across restarts),
/// and applies narrowings atomically.
#[derive(Debug, Default)]
pub struct VariableDatabase {
 names: Vec<String>,
 domains: Vec<Domain>,
 current: Vec<ValueSet>,
 initial: Vec<ValueSet>,
 last_solved: Vec<ValueSet>,
 last_modification_timestamp: Vec<Option<usize>>,
 stack: AssignmentStack,
 last_contradicting_variable: Option<VarId>,
}

impl VariableDatabase {
 pub fn new() -> Self {
 VariableDatabase::default()
 }

 /// Creates a new variable with the given domain and initial candidate set
 /// (defaulting to the full domain). Returns `None` if the initial set would be
 /// empty; callers surface this as [`crate::basic_types::ApiMisuseError::EmptyInitialDomain`].
 pub fn create_variable(&mut self, name: impl Into<String>, domain: Domain, initial: Option<ValueSet>) -> Option<VarId> {
 let width = domain.len();
 let initial = initial.unwrap_or_else(|| ValueSet::new_full(width));
 if initial.is_zero() && width > 0 {
 return None;
 }
 let id = VarId::new(self.domains.len() as u32);
 self.names.push(name.into());
 self.domains.push(domain);
 self.current.push(initial.clone());
 self.initial.push(initial.clone());
 self.last_solved.push(initial);
 self.last_modification_timestamp.push(None);
 Some(id)
 }

 pub fn num_variables(&self) -> usize {
 self.domains.len()
 }

 pub fn name(&self, var: VarId) -> &str {
 &self.names[var.index()]
 }

 pub fn domain(&self, var: VarId) -> &Domain {
 &self.domains[var.index()]
 }

 pub fn current(&self, var: VarId) -> &ValueSet {
 &self.current[var.index()]
 }

 pub fn initial(&self, var: VarId) -> &ValueSet {
 &self.initial[var.index()]
 }

 pub fn last_solved(&self, var: VarId) -> &ValueSet {
 &self.last_solved[var.index()]
 }

 pub fn remember_last_solved(&mut self, var: VarId) {
 self.last_solved[var.index()] = self.current[var.index()].clone();
 }

 pub fn timestamp(&self) -> usize {
 self.stack.len()
 }

 /// The timestamp of the most recent entry that narrowed `var`, or `None` if it
 /// has never been narrowed since creation.
 pub fn last_modification_timestamp(&self, var: VarId) -> Option<usize> {
 self.last_modification_timestamp[var.index()]
 }

 pub fn last_contradicting_variable(&self) -> Option<VarId> {
 self.last_contradicting_variable
 }

 /// Intersects `var`'s current set with `new_mask`, logging the change. Returns
 /// `false` iff the variable's domain became empty. A no-op
 /// narrowing (the mask changes nothing) returns `true` without touching the stack,
 /// keeping `narrow(v, M); narrow(v, M)` equivalent to a single call.
 pub fn narrow(
 &mut self,
 var: VarId,
 new_mask: &ValueSet,
 cause: ConstraintReference,
 explainer: Option<Explainer>,
 queue: &mut PropagationQueue,
 ) -> bool {
 let index = var.index();
 let mut intersected = self.current[index].clone();
 intersected.intersect(new_mask);
 crate::palisade_assert_moderate!(intersected.is_subset_of(&self.initial[index]), "current(v) must stay a subset of initial(v)");
 if intersected == self.current[index] {
 return true;
 }

 let prev_values = std::mem::replace(&mut self.current[index], intersected);
 let prev_assignment_of = self.last_modification_timestamp[index];
 let timestamp = self.stack.push(StackEntry {
 variable: var,
 prev_values,
 cause,
 explainer,
 prev_assignment_of,
 });
 self.last_modification_timestamp[index] = Some(timestamp);

 if self.current[index].is_zero() {
 self.last_contradicting_variable = Some(var);
 return false;
 }

 queue.enqueue_variable(var);
 true
 }

 /// Truncates the stack to `new_timestamp`, restoring every popped variable's
 /// current set and re-linking its modification timestamp. Cannot fail.
 pub fn backtrack(&mut self, new_timestamp: usize) {
 for entry in self.stack.truncate_from(new_timestamp) {
 let index = entry.variable.index();
 self.current[index] = entry.prev_values;
 self.last_modification_timestamp[index] = entry.prev_assignment_of;
 }
 self.last_contradicting_variable = None;
 }

 /// The variable's possible-value set strictly before `timestamp` (i.e. what
 /// `valueAfter(var, timestamp - 1)` would report; the variable's initial set at
 /// `timestamp == 0`).
 pub fn value_before(&self, var: VarId, timestamp: usize) -> ValueSet {
 match timestamp.checked_sub(1) {
 Some(prior) => self.value_after(var, prior),
 None => self.initial[var.index()].clone(),
 }
 }

 /// The variable's possible-value set as of immediately after the most recent
 /// modification at or before `timestamp`; found by walking the variable's
 /// backward-linked chain (anchored at `lastModificationTimestamp`) until it
 /// straddles `timestamp` (reads are O(#changes to `var` after `t`)).
 pub fn value_after(&self, var: VarId, timestamp: usize) -> ValueSet {
 let index = var.index();
 // `newer` holds the `prev_values` of the nearest entry strictly after
 // `timestamp` seen so far while walking backward; that is exactly the value
 // the variable held right after the most recent modification at or before
 // `timestamp`, once we stop seeing entries newer than it.
 let mut newer: Option<ValueSet> = None;
 let mut cursor = self.last_modification_timestamp[index];
 while let Some(ts) = cursor {
 if ts <= timestamp {
 return newer.unwrap_or_else(|| self.current[index].clone());
 }
 let entry = self.stack.get(ts);
 newer = Some(entry.prev_values.clone());
 cursor = entry.prev_assignment_of;
 }
 newer.unwrap_or_else(|| self.initial[index].clone())
 }

 pub fn stack(&self) -> &AssignmentStack {
 &self.stack
 }
}

/// A read-only projection of a [`VariableDatabase`] as it stood immediately after a
/// given timestamp, used by explainer closures so they can be called after further
/// narrowings have moved the live domains on.
pub struct HistoricalVariableDatabase<'a> {
 db: &'a VariableDatabase,
 timestamp: usize,
}

impl<'a> HistoricalVariableDatabase<'a> {
 pub fn new(db: &'a VariableDatabase, timestamp: usize) -> Self {
 HistoricalVariableDatabase { db, timestamp }
 }

 pub fn value_at(&self, var: VarId) -> ValueSet {
 self.db.value_after(var, self.timestamp)
 }

 pub fn domain(&self, var: VarId) -> &Domain {
 self.db.domain(var)
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 fn bool_var(db: &mut VariableDatabase) -> VarId {
 db.create_variable("x", Domain::from_range(0, 1), None).unwrap()
 }

 #[test]
 fn narrow_is_idempotent() {
 let mut db = VariableDatabase::new();
 let var = bool_var(&mut db);
 let mut queue = PropagationQueue::new();
 let mut mask = ValueSet::new_full(2);
 mask.set(1, false);
 assert!(db.narrow(var, &mask, ConstraintReference::Decision, None, &mut queue));
 let ts_after_first = db.timestamp();
 assert!(db.narrow(var, &mask, ConstraintReference::Decision, None, &mut queue));
 assert_eq!(db.timestamp(), ts_after_first, "repeated narrow must not grow the stack");
 }

 #[test]
 fn narrow_to_empty_reports_contradiction() {
 let mut db = VariableDatabase::new();
 let var = bool_var(&mut db);
 let mut queue = PropagationQueue::new();
 let empty = ValueSet::new_empty(2);
 assert!(!db.narrow(var, &empty, ConstraintReference::Decision, None, &mut queue));
 assert_eq!(db.last_contradicting_variable(), Some(var));
 }

 #[test]
 fn backtrack_restores_prior_domain() {
 let mut db = VariableDatabase::new();
 let var = bool_var(&mut db);
 let mut queue = PropagationQueue::new();
 let ts0 = db.timestamp();
 let mut mask = ValueSet::new_full(2);
 mask.set(1, false);
 db.narrow(var, &mask, ConstraintReference::Decision, None, &mut queue);
 assert_eq!(db.current(var).count(), 1);
 db.backtrack(ts0);
 assert_eq!(db.current(var).count(), 2);
 }

 #[test]
 fn value_before_and_after_straddle_timestamp() {
 let mut db = VariableDatabase::new();
 let var = bool_var(&mut db);
 let mut queue = PropagationQueue::new();
 let mut mask = ValueSet::new_full(2);
 mask.set(1, false);
 let ts = db.timestamp();
 db.narrow(var, &mask, ConstraintReference::Decision, None, &mut queue);
 assert_eq!(db.value_before(var, ts), ValueSet::new_full(2));
 assert_eq!(db.value_after(var, ts), *db.current(var));
 }
}
