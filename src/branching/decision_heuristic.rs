use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::basic_types::{ValueSet, VarId};
use crate::engine::variables::VariableDatabase;

/// Proposes the next branching decision. Concrete decision heuristics (activity-based
/// LRB and friends) are out of scope; this crate carries only the trait and one
/// default implementation so the core is usable standalone.
pub trait DecisionHeuristic: std::fmt::Debug {
 /// Picks an unsolved variable and a mask to narrow it to. Returns `None` once
 /// every variable is solved (a complete assignment has been reached).
 fn next_decision(&mut self, db: &VariableDatabase) -> Option<(VarId, ValueSet)>;
}

/// Picks the unsolved variable with the fewest remaining candidate values (smallest
/// domain first, ties broken uniformly at random), then commits to its lowest-index
/// remaining value: a `FirstFail` variable selector paired with an in-domain-min
/// value selector, with ties at the smallest domain broken via a seeded RNG rather
/// than always picking the first candidate.
#[derive(Debug)]
pub struct FirstFailHeuristic {
 rng: SmallRng,
}

impl FirstFailHeuristic {
 pub fn new() -> Self {
 FirstFailHeuristic::with_seed(42)
 }

 pub fn with_seed(seed: u64) -> Self {
 FirstFailHeuristic {
 rng: SmallRng::seed_from_u64(seed),
 }
 }
}

impl Default for FirstFailHeuristic {
 fn default() -> Self {
 FirstFailHeuristic::new()
 }
}

impl DecisionHeuristic for FirstFailHeuristic {
 fn next_decision(&mut self, db: &VariableDatabase) -> Option<(VarId, ValueSet)> {
 let smallest_count = (0..db.num_variables() as u32)
.map(VarId::new)
.filter(|&var| !db.current(var).is_singleton() && !db.current(var).is_zero())
.map(|var| db.current(var).count())
.min()?;

 let candidates: Vec<VarId> = (0..db.num_variables() as u32)
.map(VarId::new)
.filter(|&var| !db.current(var).is_singleton() && !db.current(var).is_zero())
.filter(|&var| db.current(var).count() == smallest_count)
.collect();

 let chosen = candidates[self.rng.gen_range(0..candidates.len())];
 let index = db.current(chosen).index_of(true)?;
 Some((chosen, ValueSet::new_singleton(db.current(chosen).len(), index)))
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::engine::variables::domain::Domain;

 #[test]
 fn picks_the_smallest_remaining_domain() {
 let mut db = VariableDatabase::new();
 let wide = db.create_variable("wide", Domain::from_range(0, 3), None).unwrap();
 let narrow = db.create_variable("narrow", Domain::from_range(0, 1), None).unwrap();
 let mut queue = crate::engine::variables::PropagationQueue::new();
 let mut mask = ValueSet::new_full(4);
 mask.set(3, false);
 db.narrow(wide, &mask, crate::basic_types::ConstraintReference::Decision, None, &mut queue);

 let mut heuristic = FirstFailHeuristic::new();
 let (var, mask) = heuristic.next_decision(&db).unwrap();
 assert_eq!(var, narrow);
 assert_eq!(mask.count(), 1);
 }
}
