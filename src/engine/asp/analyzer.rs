use std::collections::{HashSet, VecDeque};

use crate::basic_types::{Literal, VarId, ValueSet};
use crate::engine::cp::{Constraint, ExplanationContext, InitializationContext, PropagationContextMut};
use crate::engine::ds::FastLookupSet;
use crate::engine::variables::{Explainer, VariableDatabase, WatchKind};

use super::atom::{AtomId, AtomState};
use super::body::{BodyId, BodyState};

fn true_mask() -> ValueSet {
 ValueSet::new_singleton(2, 1)
}

fn false_mask() -> ValueSet {
 ValueSet::new_singleton(2, 0)
}

fn is_true(current: &ValueSet) -> bool {
 current.is_subset_of(&true_mask())
}

fn is_false(current: &ValueSet) -> bool {
 current.is_subset_of(&false_mask())
}

fn explainer_for(literals: Vec<Literal>) -> Explainer {
 Box::new(move |_| literals.clone())
}

/// Watches every normal-logic-program rule that is not part of the tight fragment:
/// finds and falsifies unfounded sets, atoms that are currently asserted true but
/// whose support forms a cycle with no external way in.
///
/// Tight rules (those outside every cycle of positive dependency) are compiled to plain
/// clauses by the rest of the solver and never reach this constraint; this one only
/// needs to know about bodies and atoms that participate in a nontrivial SCC.
#[derive(Debug)]
pub struct UnfoundedSetAnalyzer {
 atoms: Vec<AtomState>,
 bodies: Vec<BodyState>,
 pending_assignments: VecDeque<AtomId>,
 pending_removals: VecDeque<AtomId>,
}

impl UnfoundedSetAnalyzer {
 pub fn new(atoms: Vec<AtomState>, bodies: Vec<BodyState>) -> Self {
 UnfoundedSetAnalyzer {
 atoms,
 bodies,
 pending_assignments: VecDeque::new(),
 pending_removals: VecDeque::new(),
 }
 }

 fn body_is_false(&self, body: BodyId, current_of: &dyn Fn(VarId) -> ValueSet) -> bool {
 is_false(&current_of(self.bodies[body.0 as usize].var))
 }

 /// Assigns `body` as the source of every head it is not already sourcing, then
 /// queues those heads for propagation. Keeps each body's `num_watching` in sync
 /// with the number of atoms whose valid source it is.
 fn assign_source(&mut self, body: BodyId) {
 let heads = self.bodies[body.0 as usize].heads.clone();
 for head in heads {
 let head_idx = head.0 as usize;
 if self.atoms[head_idx].source != Some(body) || !self.atoms[head_idx].source_is_valid {
 if self.atoms[head_idx].source_is_valid {
 if let Some(old_body) = self.atoms[head_idx].source {
 self.bodies[old_body.0 as usize].num_watching =
 self.bodies[old_body.0 as usize].num_watching.saturating_sub(1);
 }
 }
 self.atoms[head_idx].source = Some(body);
 self.atoms[head_idx].source_is_valid = true;
 self.bodies[body.0 as usize].num_watching += 1;
 self.pending_assignments.push_back(head);
 }
 }
 }

 /// Invalidates the source of every head `body` was sourcing, queuing them for
 /// resourcing or, failing that, unfounded-set falsification. Decrements `body`'s
 /// `num_watching` for each head it stops validly sourcing.
 fn remove_source(&mut self, body: BodyId) {
 let heads = self.bodies[body.0 as usize].heads.clone();
 for head in heads {
 let head_idx = head.0 as usize;
 if self.atoms[head_idx].source == Some(body) && self.atoms[head_idx].source_is_valid {
 self.atoms[head_idx].source_is_valid = false;
 self.bodies[body.0 as usize].num_watching = self.bodies[body.0 as usize].num_watching.saturating_sub(1);
 self.pending_removals.push_back(head);
 }
 }
 }

 /// Propagates a one-atom source assignment across bodies in the same SCC that cite
 /// it positively: their `num_unsourced_lits` drops, and a body that reaches zero
 /// becomes a candidate source for its own heads.
 fn on_atom_sourced(&mut self, atom: AtomId) {
 for body_index in 0..self.bodies.len() {
 let body_id = BodyId(body_index as u32);
 if self.bodies[body_index].scc != self.atoms[atom.0 as usize].scc {
 continue;
 }
 if !self.bodies[body_index].positive_same_scc.contains(&atom) {
 continue;
 }
 self.bodies[body_index].num_unsourced_lits =
 self.bodies[body_index].num_unsourced_lits.saturating_sub(1);
 if self.bodies[body_index].num_unsourced_lits == 0 {
 self.assign_source(body_id);
 }
 }
 }

 fn on_atom_unsourced(&mut self, atom: AtomId) {
 for body_index in 0..self.bodies.len() {
 let body_id = BodyId(body_index as u32);
 if self.bodies[body_index].scc != self.atoms[atom.0 as usize].scc {
 continue;
 }
 if !self.bodies[body_index].positive_same_scc.contains(&atom) {
 continue;
 }
 let was_zero = self.bodies[body_index].num_unsourced_lits == 0;
 self.bodies[body_index].num_unsourced_lits += 1;
 if was_zero {
 self.remove_source(body_id);
 }
 }
 }

 /// Drains the assignment/removal queues to a fixpoint, 's
 /// description of source propagation running "until nothing changes".
 fn drain_source_propagation(&mut self) {
 loop {
 if let Some(atom) = self.pending_assignments.pop_front() {
 self.on_atom_sourced(atom);
 continue;
 }
 if let Some(atom) = self.pending_removals.pop_front() {
 self.on_atom_unsourced(atom);
 continue;
 }
 break;
 }
 }

 /// Source propagation seeded by every body that is not falsified and has nothing
 /// left to wait on (used both at `initialize` and after a body's truth changes).
 fn seed_from_sourced_bodies(&mut self, current_of: &dyn Fn(VarId) -> ValueSet) {
 for body_index in 0..self.bodies.len() {
 let body_id = BodyId(body_index as u32);
 if self.body_is_false(body_id, current_of) {
 continue;
 }
 if self.bodies[body_index].num_unsourced_lits == 0 {
 self.assign_source(body_id);
 }
 }
 self.drain_source_propagation();
 }

 /// Looks for a body, other than `atom`'s own cyclic supporters, that can source
 /// `atom` unconditionally right now.
 fn find_new_source(&self, atom: AtomId, current_of: &dyn Fn(VarId) -> ValueSet) -> Option<BodyId> {
 for body_index in 0..self.bodies.len() {
 let body_id = BodyId(body_index as u32);
 let body = &self.bodies[body_index];
 if !body.heads.contains(&atom) {
 continue;
 }
 if self.body_is_false(body_id, current_of) {
 continue;
 }
 if body.num_unsourced_lits == 0 {
 return Some(body_id);
 }
 }
 None
 }

 /// Grows the unfounded-set candidate starting at `start` until it is closed under
 /// "every body that could source a member of the set needs another member of the
 /// set to be sourced first".
 fn unfounded_set_from(&self, start: AtomId, current_of: &dyn Fn(VarId) -> ValueSet) -> Vec<AtomId> {
 let mut set: FastLookupSet<AtomId> = FastLookupSet::new();
 set.insert(start);

 loop {
 let mut shrunk = false;
 let snapshot: Vec<AtomId> = set.iter().collect();
 for atom in snapshot {
 if self.find_new_source(atom, current_of).is_some() {
 set.remove(atom);
 shrunk = true;
 }
 }
 if shrunk {
 if set.is_empty() {
 return Vec::new();
 }
 continue;
 }

 let mut grown = false;
 let snapshot: Vec<AtomId> = set.iter().collect();
 for (body_index, atom) in snapshot
.iter()
.flat_map(|&atom| (0..self.bodies.len()).map(move |i| (i, atom)))
 {
 let body_id = BodyId(body_index as u32);
 let body = &self.bodies[body_index];
 if !body.heads.contains(&atom) || self.body_is_false(body_id, current_of) {
 continue;
 }
 for &positive in &body.positive_same_scc {
 if set.insert(positive) {
 grown = true;
 }
 }
 }
 if !grown {
 return set.iter().collect();
 }
 }
 }

 /// Falsifies every atom in `set`, explaining each with the bodies that could have
 /// sourced it from entirely outside the set. A set with no such external body is unconditionally false.
 fn falsify_unfounded_set(
 &mut self,
 ctx: &mut PropagationContextMut,
 set: &[AtomId],
 ) -> bool {
 let members: HashSet<AtomId> = set.iter().copied().collect();
 let mut external_literals = Vec::new();
 for body in &self.bodies {
 let cites_member = body.heads.iter().any(|h| members.contains(h));
 let fully_external = body.positive_same_scc.iter().all(|a| !members.contains(a));
 if cites_member && fully_external {
 external_literals.push(Literal::new(body.var, false_mask()));
 }
 }

 for &atom in set {
 let var = self.atoms[atom.0 as usize].var;
 if is_false(ctx.current(var)) {
 continue;
 }
 if !ctx.narrow(var, &false_mask(), Some(explainer_for(external_literals.clone()))) {
 return false;
 }
 }
 true
 }

 /// After source propagation settles, re-checks every atom currently asserted true:
 /// if it lost its source and cannot find a new one, its whole unfounded set must be
 /// falsified.
 fn resolve_unsourced_atoms(&mut self, ctx: &mut PropagationContextMut) -> bool {
 loop {
 let current_of = |var: VarId| ctx.current(var).clone();
 let candidate = self.atoms.iter().enumerate().find_map(|(index, atom)| {
 let id = AtomId(index as u32);
 let current = current_of(atom.var);
 if is_true(&current) && !atom.source_is_valid {
 Some(id)
 } else {
 None
 }
 });
 let Some(atom) = candidate else { return true };

 if let Some(source) = self.find_new_source(atom, &current_of) {
 self.atoms[atom.0 as usize].source = Some(source);
 self.atoms[atom.0 as usize].source_is_valid = true;
 self.bodies[source.0 as usize].num_watching += 1;
 self.pending_assignments.push_back(atom);
 self.drain_source_propagation();
 continue;
 }

 let set = self.unfounded_set_from(atom, &current_of);
 if set.is_empty() {
 // every member found a source while we were computing; retry.
 continue;
 }
 if !self.falsify_unfounded_set(ctx, &set) {
 return false;
 }
 }
 }
}

impl Constraint for UnfoundedSetAnalyzer {
 fn initialize(&mut self, ctx: &mut InitializationContext) -> bool {
 for atom in &self.atoms {
 ctx.add_watcher(atom.var, WatchKind::AnyChange);
 }
 for body in &self.bodies {
 ctx.add_watcher(body.var, WatchKind::AnyChange);
 }

 let current_of = |var: VarId| ctx.current(var).clone();
 self.seed_from_sourced_bodies(&current_of);
 self.resolve_unsourced_atoms(ctx)
 }

 fn propagate(&mut self, ctx: &mut PropagationContextMut) -> bool {
 for body_index in 0..self.bodies.len() {
 let body_id = BodyId(body_index as u32);
 let var = self.bodies[body_index].var;
 if is_false(ctx.current(var)) {
 self.remove_source(body_id);
 }
 }
 self.drain_source_propagation();

 let current_of = |var: VarId| ctx.current(var).clone();
 self.seed_from_sourced_bodies(&current_of);

 self.resolve_unsourced_atoms(ctx)
 }

 fn explain(&mut self, literal: &Literal, _ctx: &ExplanationContext) -> Vec<Literal> {
 // Narrowing always carries its own explainer at propagation time; this fallback only runs if the solver ever asks for
 // a re-derivation after the fact.
 vec![literal.negated()]
 }

 fn explain_conflict(&mut self, _ctx: &ExplanationContext) -> Vec<Literal> {
 Vec::new()
 }

 fn constraining_variables(&self) -> Vec<VarId> {
 self.atoms
.iter()
.map(|a| a.var)
.chain(self.bodies.iter().map(|b| b.var))
.collect()
 }

 fn backtrack(&mut self, db: &VariableDatabase, _new_level: usize) {
 for atom in &mut self.atoms {
 atom.source = None;
 atom.source_is_valid = false;
 }
 for body in &mut self.bodies {
 body.num_unsourced_lits = body.positive_same_scc.len() as u32;
 body.num_watching = 0;
 }
 self.pending_assignments.clear();
 self.pending_removals.clear();

 let current_of = |var: VarId| db.current(var).clone();
 self.seed_from_sourced_bodies(&current_of);
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
 use crate::engine::cp::{ConstraintRegistry, WatcherStore};
 use crate::engine::variables::{domain::Domain, PropagationQueue};

 fn bool_var(db: &mut VariableDatabase, watchers: &mut WatcherStore, name: &str) -> VarId {
 let var = db.create_variable(name, Domain::from_range(0, 1), None).unwrap();
 let registered = watchers.register_variable(2);
 assert_eq!(var, registered);
 var
 }

 /// `a:- b.` and `b:- a.` with no other rule deriving either atom: a two-cycle
 /// with no external support, so both atoms must be falsified.
 #[test]
 fn two_atom_cycle_with_no_external_support_is_falsified() {
 let mut db = VariableDatabase::new();
 let mut watchers = WatcherStore::new(64);
 let mut queue = PropagationQueue::new();
 let mut registry = ConstraintRegistry::new();

 let a_var = bool_var(&mut db, &mut watchers, "a");
 let b_var = bool_var(&mut db, &mut watchers, "b");
 let body_a_var = bool_var(&mut db, &mut watchers, "body_a"); // a:- b.
 let body_b_var = bool_var(&mut db, &mut watchers, "body_b"); // b:- a.

 let atoms = vec![AtomState::new(a_var, 0), AtomState::new(b_var, 0)];
 let bodies = vec![
 BodyState::new(body_a_var, 0, vec![AtomId(1)], vec![AtomId(0)]),
 BodyState::new(body_b_var, 0, vec![AtomId(0)], vec![AtomId(1)]),
 ];

 let analyzer = Box::new(UnfoundedSetAnalyzer::new(atoms, bodies));
 let id = registry.register(analyzer, vec![a_var, b_var, body_a_var, body_b_var], false, None);

 queue.resize(db.num_variables(), registry.len());
 let mut ctx = InitializationContext::new(&mut db, &mut watchers, &mut queue, id);
 let ok = registry.get_mut(id).initialize(&mut ctx);
 assert!(ok);

 assert!(is_false(db.current(a_var)));
 assert!(is_false(db.current(b_var)));
 }

 /// A fact `a.` (a body with no positive literals, sourcing `a` unconditionally)
 /// leaves exactly one atom citing that body as its source.
 #[test]
 fn fact_body_ends_up_watched_by_the_atom_it_sources() {
 let mut db = VariableDatabase::new();
 let mut watchers = WatcherStore::new(64);
 let mut queue = PropagationQueue::new();
 let mut registry = ConstraintRegistry::new();

 let a_var = bool_var(&mut db, &mut watchers, "a");
 let fact_a_var = bool_var(&mut db, &mut watchers, "fact_a"); // a.

 let atoms = vec![AtomState::new(a_var, 0)];
 let bodies = vec![BodyState::new(fact_a_var, 0, vec![], vec![AtomId(0)])];

 let analyzer = Box::new(UnfoundedSetAnalyzer::new(atoms, bodies));
 let id = registry.register(analyzer, vec![a_var, fact_a_var], false, None);

 queue.resize(db.num_variables(), registry.len());
 let mut ctx = InitializationContext::new(&mut db, &mut watchers, &mut queue, id);
 let ok = registry.get_mut(id).initialize(&mut ctx);
 assert!(ok);
 assert!(is_true(db.current(a_var)));

 let analyzer = registry.get(id).as_any().downcast_ref::<UnfoundedSetAnalyzer>().unwrap();
 assert_eq!(analyzer.bodies[0].num_watching, 1);
 }

 /// `a:- b.` and `b:- a.` but also a fact `a.` (body with no positive literals at
 /// all) means `a`, and transitively `b`, can be sourced from outside the cycle.
 #[test]
 fn cycle_with_an_external_fact_stays_unconstrained() {
 let mut db = VariableDatabase::new();
 let mut watchers = WatcherStore::new(64);
 let mut queue = PropagationQueue::new();
 let mut registry = ConstraintRegistry::new();

 let a_var = bool_var(&mut db, &mut watchers, "a");
 let b_var = bool_var(&mut db, &mut watchers, "b");
 let body_a_var = bool_var(&mut db, &mut watchers, "body_a"); // a:- b.
 let body_b_var = bool_var(&mut db, &mut watchers, "body_b"); // b:- a.
 let fact_a_var = bool_var(&mut db, &mut watchers, "fact_a"); // a.

 db.narrow(
 fact_a_var,
 &true_mask(),
 crate::basic_types::ConstraintReference::Decision,
 None,
 &mut queue,
 );

 let atoms = vec![AtomState::new(a_var, 0), AtomState::new(b_var, 0)];
 let bodies = vec![
 BodyState::new(body_a_var, 0, vec![AtomId(1)], vec![AtomId(0)]),
 BodyState::new(body_b_var, 0, vec![AtomId(0)], vec![AtomId(1)]),
 BodyState::new(fact_a_var, 0, vec![], vec![AtomId(0)]),
 ];

 let analyzer = Box::new(UnfoundedSetAnalyzer::new(atoms, bodies));
 let id = registry.register(
 analyzer,
 vec![a_var, b_var, body_a_var, body_b_var, fact_a_var],
 false,
 None,
 );

 queue.resize(db.num_variables(), registry.len());
 let mut ctx = InitializationContext::new(&mut db, &mut watchers, &mut queue, id);
 let ok = registry.get_mut(id).initialize(&mut ctx);
 assert!(ok);

 assert!(is_true(db.current(a_var)));
 assert!(!is_false(db.current(b_var)));
 }
}
