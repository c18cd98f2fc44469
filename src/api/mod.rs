//! The public surface: a thin [`Solver`] facade over
//! [`crate::engine::solver::ConstraintSolver`] that enforces the two fatal error kinds
//! (modification after `start_solving`, an empty initial domain)
//! before forwarding to the engine.

mod options;
pub mod outputs;

use std::collections::HashMap;

use crate::basic_types::{ApiMisuseError, ConstraintId, ConstraintOperationError, Literal, SolveStatus, ValueSet, VarId};
use crate::branching::FirstFailHeuristic;
use crate::engine::cp::Constraint;
use crate::engine::graph::ConstraintGraphRelationInfo;
use crate::engine::solver::ConstraintSolver;
use crate::engine::variables::domain::Domain;

pub use options::SolverOptions;

/// The solver as seen from outside the crate. Variable ids, constraint ids, and
/// domains are exactly the engine's own types; there is no reason to wrap them
/// further.
#[derive(Debug)]
pub struct Solver {
 engine: ConstraintSolver,
}

impl Solver {
 pub fn new(options: SolverOptions) -> Self {
 let decision_heuristic = options
.decision_heuristic
.unwrap_or_else(|| Box::new(FirstFailHeuristic::with_seed(options.rng_seed)));
 Solver {
 engine: ConstraintSolver::new(options.propagator_word_width, decision_heuristic, options.restart_policy),
 }
 }

 /// `makeVariable`. Fails with [`ApiMisuseError::ModificationAfterStart`]
 /// once `start_solving` has run, or [`ApiMisuseError::EmptyInitialDomain`] if
 /// `initial_potential_values` would leave the variable with no candidates.
 pub fn make_variable(
 &mut self,
 name: impl Into<String>,
 domain: Domain,
 initial_potential_values: Option<ValueSet>,
 ) -> Result<VarId, ApiMisuseError> {
 if self.engine.has_started() {
 return Err(ApiMisuseError::ModificationAfterStart);
 }
 self.engine
.create_variable(name, domain, initial_potential_values)
.ok_or(ApiMisuseError::EmptyInitialDomain)
 }

 /// `registerConstraint`. `graph_relation_info` only matters for
 /// clause-shaped constraints later promoted across the topology
 /// ([`Self::promote_graph_clauses`]); pass `None` for every other constraint kind.
 pub fn register_constraint(&mut self, constraint: Box<dyn Constraint>, variables: Vec<VarId>) -> Result<ConstraintId, ConstraintOperationError> {
 self.engine.register_constraint(constraint, variables)
 }

 pub fn add_clause(&mut self, literals: Vec<Literal>, graph_relation_info: Option<ConstraintGraphRelationInfo>) -> Result<ConstraintId, ConstraintOperationError> {
 self.engine.add_clause(literals, graph_relation_info)
 }

 /// A `clause`/`nogood` builder alias.
 pub fn add_nogood(&mut self, literals: Vec<Literal>) -> Result<ConstraintId, ConstraintOperationError> {
 self.add_clause(literals, None)
 }

 pub fn promote_graph_clauses(&mut self, id: ConstraintId) {
 self.engine.promote_graph_clauses(id);
 }

 /// `startSolving`: the first call into the search loop. Equivalent to
 /// [`Self::step`], kept as a distinct name because the engine forbids further
 /// problem modification once it has run.
 pub fn start_solving(&mut self) -> SolveStatus {
 self.engine.start_solving()
 }

 pub fn step(&mut self) -> SolveStatus {
 self.engine.step()
 }

 pub fn solve(&mut self) -> SolveStatus {
 self.engine.solve()
 }

 pub fn enumerate_next_solution(&mut self) -> Result<SolveStatus, ConstraintOperationError> {
 self.engine.enumerate_next_solution()
 }

 /// `getSolution`: every variable's name and solved value. Only
 /// meaningful after [`Self::solve`]/[`Self::step`] reports
 /// [`SolveStatus::Solved`]; each variable's current set is read as-is otherwise,
 /// which may not be a singleton.
 pub fn get_solution(&self) -> HashMap<VarId, (String, i64)> {
 let db = self.engine.db();
 (0..db.num_variables() as u32)
.map(VarId::new)
.filter_map(|var| {
 let index = db.current(var).index_of(true)?;
 Some((var, (db.name(var).to_string(), db.domain(var).value_at(index))))
 })
.collect()
 }

 pub fn get_solved_value(&self, var: VarId) -> Option<i64> {
 let db = self.engine.db();
 let index = db.current(var).index_of(true)?;
 Some(db.domain(var).value_at(index))
 }

 /// `getPotentialValues`: every value still in `var`'s domain, in
 /// ascending index order.
 pub fn get_potential_values(&self, var: VarId) -> Vec<i64> {
 let db = self.engine.db();
 db.current(var)
.iter_possible()
.map(|index| db.domain(var).value_at(index))
.collect()
 }

 pub fn log_statistics(&self) {
 self.engine.log_statistics();
 }

 pub fn engine(&self) -> &ConstraintSolver {
 &self.engine
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::basic_types::SolveStatus;

 #[test]
 fn two_binary_variables_forced_unequal_both_solve() {
 let mut solver = Solver::new(SolverOptions::default());
 let a = solver.make_variable("a", Domain::from_range(0, 1), None).unwrap();
 let b = solver.make_variable("b", Domain::from_range(0, 1), None).unwrap();

 solver
.add_clause(vec![Literal::new(a, ValueSet::new_singleton(2, 1)), Literal::new(b, ValueSet::new_singleton(2, 1))], None)
.unwrap();
 solver
.add_clause(vec![Literal::new(a, ValueSet::new_singleton(2, 0)), Literal::new(b, ValueSet::new_singleton(2, 0))], None)
.unwrap();

 let status = solver.solve();
 assert_eq!(status, SolveStatus::Solved);
 assert_ne!(solver.get_solved_value(a), solver.get_solved_value(b));
 }

 #[test]
 fn modification_after_start_is_rejected() {
 let mut solver = Solver::new(SolverOptions::default());
 let _ = solver.make_variable("a", Domain::from_range(0, 1), None).unwrap();
 let _ = solver.start_solving();
 let result = solver.make_variable("b", Domain::from_range(0, 1), None);
 assert!(matches!(result, Err(ApiMisuseError::ModificationAfterStart)));
 }

 #[test]
 fn empty_initial_domain_is_rejected() {
 let mut solver = Solver::new(SolverOptions::default());
 let empty = ValueSet::new_empty(2);
 let result = solver.make_variable("a", Domain::from_range(0, 1), Some(empty));
 assert!(matches!(result, Err(ApiMisuseError::EmptyInitialDomain)));
 }
}
