//! [`ClauseConstraint`]: a disjunction of literals with the two-watched-literals
//! scheme, the workhorse constraint kind, and the representation
//! both original clauses and learned clauses/nogoods share.

use crate::basic_types::{ConstraintId, Literal, LiteralStatus, VarId};
use crate::engine::cp::{Constraint, ExplanationContext, InitializationContext, PropagationContextMut, WatcherStore};
use crate::engine::graph::ConstraintGraphRelationInfo;
use crate::engine::variables::{VariablePropagatorOps, WatcherHandle};

/// A clause's provenance flags: learned clauses additionally carry LBD,
/// activity, permanence, and graph-promotion bookkeeping; original clauses carry
/// none of this and are simply `None`.
#[derive(Debug, Clone)]
pub struct LearnedMetadata {
 pub lbd: u32,
 pub activity: f32,
 /// `true` for clauses with LBD at or below `PERMANENT_LBD_THRESHOLD` at learn
 /// time; permanent clauses are never purged.
 pub permanent: bool,
 pub step_learned: usize,
 pub promotion_source: Option<ConstraintId>,
 pub graph_relation_info: Option<ConstraintGraphRelationInfo>,
 /// Currently serving as the reason for an assignment on the stack; locked
 /// clauses are never purged.
 pub locked: bool,
}

#[derive(Debug)]
pub struct ClauseConstraint {
 literals: Vec<Literal>,
 watch0: usize,
 watch1: usize,
 watch_handles: [Option<WatcherHandle>; 2],
 pub learned: Option<LearnedMetadata>,
 /// Set by [`ClauseConstraint::disable`] once this clause has been purged
 ///: its watchers are gone, so `propagate`/`initialize` become
 /// inert no-ops rather than touching stale watch slots.
 disabled: bool,
}

impl ClauseConstraint {
 /// Builds an (as yet un-watched) clause. Call [`Constraint::initialize`] to set
 /// up its watches once it is owned by the registry.
 pub fn new(literals: Vec<Literal>, learned: Option<LearnedMetadata>) -> Self {
 ClauseConstraint {
 literals,
 watch0: 0,
 watch1: 0,
 watch_handles: [None, None],
 learned,
 disabled: false,
 }
 }

 pub fn literals(&self) -> &[Literal] {
 &self.literals
 }

 pub fn len(&self) -> usize {
 self.literals.len()
 }

 pub fn is_empty(&self) -> bool {
 self.literals.is_empty()
 }

 pub fn is_locked(&self) -> bool {
 self.learned.as_ref().map(|m| m.locked).unwrap_or(true)
 }

 pub fn set_locked(&mut self, locked: bool) {
 if let Some(meta) = &mut self.learned {
 meta.locked = locked;
 }
 }

 pub fn is_permanent(&self) -> bool {
 self.learned.as_ref().map(|m| m.permanent).unwrap_or(true)
 }

 pub fn is_disabled(&self) -> bool {
 self.disabled
 }

 /// Removes this clause's two watchers without marking it inert; used when a
 /// clause's literal list is about to change and the caller will reinitialize watches
 /// against the new literal set immediately after.
 pub fn remove_watches(&mut self, self_id: ConstraintId, watchers: &mut WatcherStore) {
 for slot in 0..2 {
 if let Some(handle) = self.watch_handles[slot].take() {
 let index = if slot == 0 { self.watch0 } else { self.watch1 };
 let var = self.literals[index].variable();
 watchers.get_mut(var).remove_watcher(handle, self_id);
 }
 }
 }

 /// Replaces the literal list, resetting watch positions to `0`; callers must
 /// call [`Constraint::initialize`] afterwards to re-establish watches.
 pub fn set_literals(&mut self, literals: Vec<Literal>) {
 self.literals = literals;
 self.watch0 = 0;
 self.watch1 = 0;
 }

 /// Removes this clause's two watchers and marks it inert.
 /// The caller (`engine::sat::clause_store::purge`) is responsible for knowing
 /// this clause's own [`ConstraintId`]; the clause itself never stores it.
 pub fn disable(&mut self, self_id: ConstraintId, watchers: &mut WatcherStore) {
 self.remove_watches(self_id, watchers);
 self.disabled = true;
 }

 fn status(&self, index: usize, ctx: &PropagationContextMut) -> LiteralStatus {
 let literal = &self.literals[index];
 literal.status(ctx.current(literal.variable()))
 }

 /// Finds a literal index other than `watch0`/`watch1` that is not unsatisfied.
 fn find_replacement(&self, ctx: &PropagationContextMut) -> Option<usize> {
 (0..self.literals.len())
.find(|&i| i != self.watch0 && i != self.watch1 && self.status(i, ctx) != LiteralStatus::Unsatisfied)
 }

 fn set_watch(&mut self, slot: usize, new_index: usize, ctx: &mut PropagationContextMut) {
 let old_index = if slot == 0 { self.watch0 } else { self.watch1 };
 if let Some(handle) = self.watch_handles[slot].take() {
 ctx.remove_watcher(self.literals[old_index].variable(), handle);
 }
 if slot == 0 {
 self.watch0 = new_index;
 } else {
 self.watch1 = new_index;
 }
 let literal = &self.literals[new_index];
 let handle = ctx.add_value_watcher(literal.variable(), literal.mask().clone());
 self.watch_handles[slot] = Some(handle);
 }

 /// Resolves one watch slot: if its literal is no longer unsatisfied, nothing to
 /// do. Otherwise looks for a replacement; failing that, the other watch is
 /// either unit (propagate it) or also unsatisfied (conflicting).
 fn resolve_slot(&mut self, slot: usize, ctx: &mut PropagationContextMut) -> bool {
 let watch_index = if slot == 0 { self.watch0 } else { self.watch1 };
 if self.status(watch_index, ctx) != LiteralStatus::Unsatisfied {
 return true;
 }
 if let Some(replacement) = self.find_replacement(ctx) {
 self.set_watch(slot, replacement, ctx);
 return true;
 }

 let other_slot = 1 - slot;
 let other_index = if other_slot == 0 { self.watch0 } else { self.watch1 };
 match self.status(other_index, ctx) {
 LiteralStatus::Unsatisfied => false,
 LiteralStatus::Satisfied => true,
 LiteralStatus::Pending => {
 let other = self.literals[other_index].clone();
 let mask = other.mask().clone();
 let literals = self.literals.clone();
 let explainer = Box::new(move |_db: &crate::engine::variables::HistoricalVariableDatabase| {
 literals
.iter()
.enumerate()
.filter(|&(i, _)| i != other_index)
.map(|(_, lit)| lit.negated())
.collect()
 });
 ctx.narrow(other.variable(), &mask, Some(explainer))
 }
 }
 }
}

impl Constraint for ClauseConstraint {
 fn initialize(&mut self, ctx: &mut InitializationContext) -> bool {
 if self.disabled {
 return true;
 }
 if self.literals.is_empty() {
 return false;
 }
 if self.literals.len() == 1 {
 let literal = self.literals[0].clone();
 let mask = literal.mask().clone();
 return ctx.narrow(literal.variable(), &mask, None);
 }

 let non_falsified: Vec<usize> = (0..self.literals.len())
.filter(|&i| self.literals[i].status(ctx.current(self.literals[i].variable())) != LiteralStatus::Unsatisfied)
.collect();

 match non_falsified.len() {
 0 => false,
 1 => {
 let index = non_falsified[0];
 self.watch0 = index;
 self.watch1 = index;
 let literal = self.literals[index].clone();
 let handle = ctx.add_value_watcher(literal.variable(), literal.mask().clone());
 self.watch_handles[0] = Some(handle);
 let mask = literal.mask().clone();
 ctx.narrow(literal.variable(), &mask, None)
 }
 _ => {
 self.watch0 = non_falsified[0];
 self.watch1 = non_falsified[1];
 for (slot, &index) in [self.watch0, self.watch1].iter().enumerate() {
 let literal = &self.literals[index];
 let handle = ctx.add_value_watcher(literal.variable(), literal.mask().clone());
 self.watch_handles[slot] = Some(handle);
 }
 true
 }
 }
 }

 fn propagate(&mut self, ctx: &mut PropagationContextMut) -> bool {
 if self.disabled {
 return true;
 }
 if self.literals.len() < 2 {
 return true;
 }
 crate::palisade_assert_moderate!(self.watch0 != self.watch1, "a clause with >1 literal must watch two distinct positions");
 self.resolve_slot(0, ctx) && self.resolve_slot(1, ctx)
 }

 fn explain(&mut self, literal: &Literal, _ctx: &ExplanationContext) -> Vec<Literal> {
 let propagated_index = self
.literals
.iter()
.position(|lit| lit.variable() == literal.variable() && lit.mask() == literal.mask());
 self.literals
.iter()
.enumerate()
.filter(|&(i, _)| Some(i) != propagated_index)
.map(|(_, lit)| lit.negated())
.collect()
 }

 fn explain_conflict(&mut self, _ctx: &ExplanationContext) -> Vec<Literal> {
 self.literals.iter().map(|lit| lit.negated()).collect()
 }

 fn constraining_variables(&self) -> Vec<VarId> {
 let mut vars: Vec<VarId> = self.literals.iter().map(|l| l.variable()).collect();
 vars.sort_unstable();
 vars.dedup();
 vars
 }

 fn as_any(&self) -> &dyn std::any::Any {
 self
 }

 fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
 self
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::basic_types::ValueSet;
 use crate::engine::cp::{PropagationQueue, WatcherStore};
 use crate::engine::variables::{domain::Domain, VariableDatabase};

 fn setup(n: usize) -> (VariableDatabase, WatcherStore, PropagationQueue, Vec<VarId>) {
 let mut db = VariableDatabase::new();
 let mut watchers = WatcherStore::new(64);
 let mut vars = Vec::new();
 for i in 0..n {
 let var = db.create_variable(format!("x{i}"), Domain::from_range(0, 1), None).unwrap();
 watchers.register_variable(2);
 vars.push(var);
 }
 (db, watchers, PropagationQueue::new(), vars)
 }

 fn true_mask() -> ValueSet {
 let mut mask = ValueSet::new_empty(2);
 mask.set(1, true);
 mask
 }

 #[test]
 fn unit_clause_propagates_then_is_dropped() {
 let (mut db, mut watchers, mut queue, vars) = setup(1);
 let mut clause = ClauseConstraint::new(vec![Literal::new(vars[0], true_mask())], None);
 let mut ctx = InitializationContext::new(&mut db, &mut watchers, &mut queue, ConstraintId::new(0));
 assert!(clause.initialize(&mut ctx));
 assert_eq!(db.current(vars[0]).count(), 1);
 assert!(db.current(vars[0]).get(1));
 }

 #[test]
 fn empty_clause_is_immediately_unsatisfiable() {
 let (mut db, mut watchers, mut queue, _vars) = setup(0);
 let mut clause = ClauseConstraint::new(vec![], None);
 let mut ctx = InitializationContext::new(&mut db, &mut watchers, &mut queue, ConstraintId::new(0));
 assert!(!clause.initialize(&mut ctx));
 }

 #[test]
 fn two_literal_clause_becomes_unit_when_one_watch_falsifies() {
 let (mut db, mut watchers, mut queue, vars) = setup(2);
 let mut clause = ClauseConstraint::new(vec![Literal::new(vars[0], true_mask()), Literal::new(vars[1], true_mask())], None);
 {
 let mut ctx = InitializationContext::new(&mut db, &mut watchers, &mut queue, ConstraintId::new(0));
 assert!(clause.initialize(&mut ctx));
 }

 let mut false_mask = ValueSet::new_full(2);
 false_mask.set(1, false);
 {
 let mut ctx = PropagationContextMut::new(&mut db, &mut watchers, &mut queue, ConstraintId::new(1));
 assert!(ctx.narrow(vars[0], &false_mask, None));
 }
 {
 let mut ctx = PropagationContextMut::new(&mut db, &mut watchers, &mut queue, ConstraintId::new(0));
 assert!(clause.propagate(&mut ctx));
 }
 assert!(db.current(vars[1]).get(1));
 assert!(!db.current(vars[1]).get(0));
 }
}
