//! End-to-end scenarios, built on [`crate::api::Solver`] rather than the engine
//! internals each module's own `#[cfg(test)]` block already exercises.

use crate::api::{Solver, SolverOptions};
use crate::basic_types::{Literal, SolveStatus, ValueSet};
use crate::engine::variables::domain::Domain;

fn literal(var: crate::basic_types::VarId, index: u32) -> Literal {
 Literal::new(var, ValueSet::new_singleton(3, index))
}

/// Three pigeons, two holes, `allDifferent`-by-clauses: no assignment of holes to
/// pigeons can keep them all apart, so the problem must be unsatisfiable.
#[test]
fn pigeonhole_three_into_two_is_unsatisfiable() {
 let mut solver = Solver::new(SolverOptions::default());
 let pigeons: Vec<_> = (0..3)
.map(|i| solver.make_variable(format!("pigeon{i}"), Domain::from_range(0, 1), None).unwrap())
.collect();

 for i in 0..pigeons.len() {
 for j in (i + 1)..pigeons.len() {
 // pigeon i and pigeon j cannot share a hole.
 let forbid_both_hole_0 = vec![Literal::new(pigeons[i], ValueSet::new_singleton(2, 1)), Literal::new(pigeons[j], ValueSet::new_singleton(2, 1))];
 let forbid_both_hole_1 = vec![Literal::new(pigeons[i], ValueSet::new_singleton(2, 0)), Literal::new(pigeons[j], ValueSet::new_singleton(2, 0))];
 solver.add_clause(forbid_both_hole_0, None).unwrap();
 solver.add_clause(forbid_both_hole_1, None).unwrap();
 }
 }

 assert_eq!(solver.solve(), SolveStatus::Unsatisfiable);
}

/// A single ternary variable with no constraints at all has exactly three solutions;
/// enumerating past the last one must report `Unsatisfiable`.
#[test]
fn enumerate_next_solution_visits_every_value_exactly_once() {
 let mut solver = Solver::new(SolverOptions::default());
 let var = solver.make_variable("x", Domain::from_range(0, 2), None).unwrap();

 let mut seen = Vec::new();
 assert_eq!(solver.solve(), SolveStatus::Solved);
 seen.push(solver.get_solved_value(var).unwrap());

 for _ in 0..2 {
 assert_eq!(solver.enumerate_next_solution().unwrap(), SolveStatus::Solved);
 seen.push(solver.get_solved_value(var).unwrap());
 }
 seen.sort_unstable();
 assert_eq!(seen, vec![0, 1, 2]);

 assert_eq!(solver.enumerate_next_solution().unwrap(), SolveStatus::Unsatisfiable);
}

/// `get_potential_values` narrows exactly as clauses are added, independent of search.
#[test]
fn potential_values_reflect_registered_clauses_before_solving() {
 let mut solver = Solver::new(SolverOptions::default());
 let var = solver.make_variable("x", Domain::from_range(0, 2), None).unwrap();
 solver.add_clause(vec![literal(var, 0), literal(var, 1)], None).unwrap();

 let mut values = solver.get_potential_values(var);
 values.sort_unstable();
 assert_eq!(values, vec![0, 1]);
}
