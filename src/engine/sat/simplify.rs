//! The optional simplification pre-pass run once before the main search loop: unit propagation to fixpoint over the original (non-learned) clause
//! set, deleting satisfied clauses and shortening clauses with falsified literals,
//! followed by self-subsumption and subsumption elimination using a per-variable
//! occurrence list and a 64-bit hash for fast pre-filtering.

use std::collections::{HashMap, HashSet};

use crate::basic_types::{ConstraintId, Literal, LiteralStatus, VarId};
use crate::engine::cp::{ConstraintRegistry, InitializationContext, WatcherStore};
use crate::engine::variables::{PropagationQueue, VariableDatabase};

use super::clause_constraint::ClauseConstraint;

fn downcast_mut(registry: &mut ConstraintRegistry, id: ConstraintId) -> Option<&mut ClauseConstraint> {
 registry.get_mut(id).as_any_mut().downcast_mut::<ClauseConstraint>()
}

fn downcast(registry: &ConstraintRegistry, id: ConstraintId) -> Option<&ClauseConstraint> {
 registry.get(id).as_any().downcast_ref::<ClauseConstraint>()
}

fn original_clause_ids(registry: &ConstraintRegistry) -> Vec<ConstraintId> {
 registry
.ids()
.filter(|&id| !registry.is_learned(id))
.filter(|&id| downcast(registry, id).is_some_and(|c| !c.is_disabled()))
.collect()
}

/// fast subsumption pre-filter: the bitwise OR, over a clause's
/// literals, of `1 << (variable_id mod 64)`.
pub fn occurrence_hash(literals: &[Literal]) -> u64 {
 literals.iter().fold(0u64, |acc, lit| acc | (1u64 << (lit.variable().index() as u64 % 64)))
}

/// Deletes clauses already satisfied at the current assignment and shortens the rest
/// by dropping already-falsified literals ( (i)). Returns `false` if a
/// clause is shortened down to zero literals (immediate unsatisfiability).
fn propagate_and_shrink(registry: &mut ConstraintRegistry, watchers: &mut WatcherStore, queue: &mut PropagationQueue, db: &mut VariableDatabase) -> bool {
 for id in original_clause_ids(registry) {
 let Some(clause) = downcast(registry, id) else { continue };
 let satisfied = clause.literals().iter().any(|lit| lit.status(db.current(lit.variable())) == LiteralStatus::Satisfied);
 if satisfied {
 downcast_mut(registry, id).expect("just downcast above").disable(id, watchers);
 continue;
 }

 let original_len = clause.len();
 let retained: Vec<Literal> = clause
.literals()
.iter()
.filter(|lit| lit.status(db.current(lit.variable())) != LiteralStatus::Unsatisfied)
.cloned()
.collect();
 if retained.len() == original_len {
 continue;
 }

 let clause = downcast_mut(registry, id).expect("just downcast above");
 clause.remove_watches(id, watchers);
 clause.set_literals(retained);
 let mut ctx = InitializationContext::new(db, watchers, queue, id);
 if !clause.initialize(&mut ctx) {
 return false;
 }
 }
 true
}

/// `true` iff every model of `c` is also a model of `d`
/// hash masked by `!d`'s hash is zero, and every literal of `c` has a counterpart in
/// `d` on the same variable whose mask is a superset.
fn subsumes(c: &[Literal], c_hash: u64, d: &[Literal], d_hash: u64) -> bool {
 if c_hash & !d_hash != 0 {
 return false;
 }
 c.iter().all(|lc| d.iter().any(|ld| ld.variable() == lc.variable() && lc.mask().is_subset_of(ld.mask())))
}

/// Self-subsumption: `c` subsumes `d` except for exactly one literal of `c` whose
/// negation coincides with `d`'s literal on the same variable. That literal of `d` is
/// then redundant and can be dropped ( (ii)). Returns the shortened
/// literal list for `d` if such a single pivot exists, `None` otherwise.
fn self_subsumes(c: &[Literal], d: &[Literal]) -> Option<Vec<Literal>> {
 let mut pivot: Option<usize> = None;
 for lc in c {
 let Some(pos) = d.iter().position(|ld| ld.variable() == lc.variable()) else {
 return None;
 };
 if lc.mask().is_subset_of(d[pos].mask()) {
 continue;
 }
 let negated = lc.negated();
 if negated.mask() == d[pos].mask() {
 if pivot.is_some() {
 return None;
 }
 pivot = Some(pos);
 } else {
 return None;
 }
 }
 let pivot = pivot?;
 Some(d.iter().enumerate().filter(|&(i, _)| i != pivot).map(|(_, l)| l.clone()).collect())
}

/// One pass of self-subsumption and subsumption elimination over every active
/// original clause pair sharing a variable. Returns `true` if any clause was removed
/// or shortened (the caller re-derives occurrence lists and runs another pass).
fn eliminate_subsumed(registry: &mut ConstraintRegistry, watchers: &mut WatcherStore, queue: &mut PropagationQueue, db: &mut VariableDatabase) -> bool {
 let ids = original_clause_ids(registry);
 let mut hashes: HashMap<ConstraintId, u64> = HashMap::new();
 let mut occurrences: HashMap<VarId, Vec<ConstraintId>> = HashMap::new();
 for &id in &ids {
 let literals = downcast(registry, id).expect("id came from original_clause_ids").literals().to_vec();
 hashes.insert(id, occurrence_hash(&literals));
 for lit in &literals {
 occurrences.entry(lit.variable()).or_default().push(id);
 }
 }

 let mut removed: HashSet<ConstraintId> = HashSet::new();
 let mut changed = false;
 for &d_id in &ids {
 if removed.contains(&d_id) {
 continue;
 }
 let d_literals = downcast(registry, d_id).expect("id came from original_clause_ids").literals().to_vec();
 if d_literals.len() < 2 {
 continue;
 }
 let d_hash = hashes[&d_id];

 let mut candidates: Vec<ConstraintId> = d_literals.iter().flat_map(|lit| occurrences.get(&lit.variable()).cloned().unwrap_or_default()).collect();
 candidates.sort_unstable();
 candidates.dedup();

 for c_id in candidates {
 if c_id == d_id || removed.contains(&c_id) {
 continue;
 }
 let c_literals = downcast(registry, c_id).expect("candidate came from occurrence list").literals().to_vec();
 let c_hash = hashes[&c_id];

 if subsumes(&c_literals, c_hash, &d_literals, d_hash) {
 downcast_mut(registry, d_id).expect("known ClauseConstraint").disable(d_id, watchers);
 removed.insert(d_id);
 changed = true;
 break;
 }
 if let Some(shortened) = self_subsumes(&c_literals, &d_literals) {
 let clause = downcast_mut(registry, d_id).expect("known ClauseConstraint");
 clause.remove_watches(d_id, watchers);
 clause.set_literals(shortened);
 let mut ctx = InitializationContext::new(db, watchers, queue, d_id);
 clause.initialize(&mut ctx);
 changed = true;
 break;
 }
 }
 }
 changed
}

/// Runs the simplification pre-pass to a fixpoint: alternates unit-propagation shortening and subsumption
/// elimination until neither changes anything. Both steps are monotone (clauses only
/// shrink or get removed), so this always terminates. Returns `false` if the problem
/// is found unsatisfiable during shortening.
pub fn simplify(registry: &mut ConstraintRegistry, watchers: &mut WatcherStore, queue: &mut PropagationQueue, db: &mut VariableDatabase) -> bool {
 loop {
 if !propagate_and_shrink(registry, watchers, queue, db) {
 return false;
 }
 if !eliminate_subsumed(registry, watchers, queue, db) {
 return true;
 }
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::basic_types::ValueSet;
 use crate::engine::cp::PropagationQueue as Queue;
 use crate::engine::variables::domain::Domain;

 fn mask_true(width: u32) -> ValueSet {
 let mut mask = ValueSet::new_empty(width);
 mask.set(1, true);
 mask
 }

 fn mask_false(width: u32) -> ValueSet {
 let mut mask = ValueSet::new_empty(width);
 mask.set(0, true);
 mask
 }

 fn setup(n: usize) -> (VariableDatabase, WatcherStore, Queue, ConstraintRegistry, Vec<VarId>) {
 let mut db = VariableDatabase::new();
 let mut watchers = WatcherStore::new(64);
 let mut vars = Vec::new();
 for i in 0..n {
 let var = db.create_variable(format!("x{i}"), Domain::from_range(0, 1), None).unwrap();
 watchers.register_variable(2);
 vars.push(var);
 }
 (db, watchers, Queue::new(), ConstraintRegistry::new(), vars)
 }

 fn register_clause(registry: &mut ConstraintRegistry, db: &mut VariableDatabase, watchers: &mut WatcherStore, queue: &mut Queue, literals: Vec<Literal>) -> ConstraintId {
 let variables = literals.iter().map(|l| l.variable()).collect();
 let id = registry.register(Box::new(ClauseConstraint::new(literals, None)), variables, false, None);
 let mut ctx = InitializationContext::new(db, watchers, queue, id);
 assert!(registry.get_mut(id).initialize(&mut ctx));
 id
 }

 #[test]
 fn satisfied_clause_is_disabled() {
 let (mut db, mut watchers, mut queue, mut registry, vars) = setup(2);
 let a = register_clause(&mut registry, &mut db, &mut watchers, &mut queue, vec![Literal::new(vars[0], mask_true(2)), Literal::new(vars[1], mask_true(2))]);
 db.narrow(vars[0], &mask_true(2), crate::basic_types::ConstraintReference::Decision, None, &mut queue);

 assert!(simplify(&mut registry, &mut watchers, &mut queue, &mut db));
 assert!(downcast(&registry, a).unwrap().is_disabled());
 }

 #[test]
 fn falsified_literal_is_dropped_and_clause_becomes_unit() {
 let (mut db, mut watchers, mut queue, mut registry, vars) = setup(2);
 let _id = register_clause(&mut registry, &mut db, &mut watchers, &mut queue, vec![Literal::new(vars[0], mask_true(2)), Literal::new(vars[1], mask_true(2))]);
 db.narrow(vars[0], &mask_false(2), crate::basic_types::ConstraintReference::Decision, None, &mut queue);

 assert!(simplify(&mut registry, &mut watchers, &mut queue, &mut db));
 assert!(db.current(vars[1]).is_subset_of(&mask_true(2)));
 }

 #[test]
 fn subsumed_clause_is_removed() {
 let (mut db, mut watchers, mut queue, mut registry, vars) = setup(3);
 // c = (x0 v x1); d = (x0 v x1 v x2). c subsumes d.
 let c = register_clause(&mut registry, &mut db, &mut watchers, &mut queue, vec![Literal::new(vars[0], mask_true(2)), Literal::new(vars[1], mask_true(2))]);
 let d = register_clause(
 &mut registry,
 &mut db,
 &mut watchers,
 &mut queue,
 vec![Literal::new(vars[0], mask_true(2)), Literal::new(vars[1], mask_true(2)), Literal::new(vars[2], mask_true(2))],
 );

 assert!(simplify(&mut registry, &mut watchers, &mut queue, &mut db));
 assert!(!downcast(&registry, c).unwrap().is_disabled());
 assert!(downcast(&registry, d).unwrap().is_disabled());
 }

 #[test]
 fn self_subsumption_shortens_the_weaker_clause() {
 let (mut db, mut watchers, mut queue, mut registry, vars) = setup(3);
 // c = (x0 v x1); d = (!x0 v x1 v x2). c self-subsumes d, dropping !x0 from d.
 let _c = register_clause(&mut registry, &mut db, &mut watchers, &mut queue, vec![Literal::new(vars[0], mask_true(2)), Literal::new(vars[1], mask_true(2))]);
 let d = register_clause(
 &mut registry,
 &mut db,
 &mut watchers,
 &mut queue,
 vec![Literal::new(vars[0], mask_false(2)), Literal::new(vars[1], mask_true(2)), Literal::new(vars[2], mask_true(2))],
 );

 assert!(simplify(&mut registry, &mut watchers, &mut queue, &mut db));
 let shortened = downcast(&registry, d).unwrap();
 assert_eq!(shortened.len(), 2);
 assert!(shortened.literals().iter().all(|l| l.variable() != vars[0]));
 }
}
