//! [`ConstraintSolver`]: owns the variable database, watcher store, propagation
//! queue, constraint registry and decision levels, and drives them through
//! propagation, conflict analysis, and decision making.

use std::collections::HashMap;

use crate::basic_types::{ConstraintId, ConstraintOperationError, ConstraintReference, Literal, SolveStatus, ValueSet, VarId};
use crate::branching::{DecisionHeuristic, FirstFailHeuristic, GeometricRestartPolicy, RestartPolicy};
use crate::engine::conflict_analysis::analyze_conflict;
use crate::engine::cp::{Constraint, ConstraintRegistry, ExplanationContext, InitializationContext, PropagationContextMut, WatcherStore};
use crate::engine::graph::{classify_candidates, clause_hash, promotion_candidates, ConstraintGraphRelationInfo, PromotionOutcome};
use crate::engine::sat::{self, calculate_lbd, ClauseConstraint, LearnedMetadata};
use crate::engine::variables::{domain::Domain, VariableDatabase, VariablePropagatorOps};
use crate::statistics::SearchStatistics;

use super::decision_levels::DecisionLevels;

/// The outcome of draining the propagation queue to a fixpoint.
#[derive(Clone, Copy, Debug)]
pub enum PropagationResult {
 Fixpoint,
 Conflict(ConstraintId),
}

/// The whole solver: variable storage, constraint storage, and the search loop over
/// both.
#[derive(Debug)]
pub struct ConstraintSolver {
 db: VariableDatabase,
 watchers: WatcherStore,
 queue: crate::engine::variables::PropagationQueue,
 registry: ConstraintRegistry,
 levels: DecisionLevels,
 activity_increment: f32,
 num_original_constraints: usize,
 promoted_hashes: HashMap<u64, ConstraintId>,
 decision_heuristic: Box<dyn DecisionHeuristic>,
 restart_policy: Box<dyn RestartPolicy>,
 conflicts_since_restart: usize,
 started: bool,
 simplified: bool,
 infeasible_from_simplify: bool,
 stats: SearchStatistics,
}

impl Default for ConstraintSolver {
 fn default() -> Self {
 ConstraintSolver::new(64, Box::new(FirstFailHeuristic::new()), Box::new(GeometricRestartPolicy::default()))
 }
}

impl ConstraintSolver {
 pub fn new(word_width: u32, decision_heuristic: Box<dyn DecisionHeuristic>, restart_policy: Box<dyn RestartPolicy>) -> Self {
 ConstraintSolver {
 db: VariableDatabase::new(),
 watchers: WatcherStore::new(word_width),
 queue: crate::engine::variables::PropagationQueue::new(),
 registry: ConstraintRegistry::new(),
 levels: DecisionLevels::new(),
 activity_increment: 1.0,
 num_original_constraints: 0,
 promoted_hashes: HashMap::new(),
 decision_heuristic,
 restart_policy,
 conflicts_since_restart: 0,
 started: false,
 simplified: false,
 infeasible_from_simplify: false,
 stats: SearchStatistics::new(),
 }
 }

 pub fn db(&self) -> &VariableDatabase {
 &self.db
 }

 pub fn registry(&self) -> &ConstraintRegistry {
 &self.registry
 }

 pub fn has_started(&self) -> bool {
 self.started
 }

 pub fn statistics(&self) -> &SearchStatistics {
 &self.stats
 }

 /// Emits the search counters as `key=value` lines.
 pub fn log_statistics(&self) {
 self.stats.log_statistics();
 }

 /// Creates a new variable before search has started.
 pub fn create_variable(&mut self, name: impl Into<String>, domain: Domain, initial: Option<ValueSet>) -> Option<VarId> {
 let width = domain.len();
 let var = self.db.create_variable(name, domain, initial)?;
 let registered = self.watchers.register_variable(width);
 debug_assert_eq!(var, registered);
 self.queue.resize(self.db.num_variables(), self.registry.len());
 Some(var)
 }

 /// Registers a constraint and runs its initial propagation. `graph_relation_info`, if given, lets the constraint
 /// later be promoted across the topology by [`Self::promote_graph_clauses`]; only
 /// meaningful for [`ClauseConstraint`]s.
 pub fn register_constraint(&mut self, constraint: Box<dyn Constraint>, variables: Vec<VarId>) -> Result<ConstraintId, ConstraintOperationError> {
 let id = self.registry.register(constraint, variables, false, None);
 self.queue.resize(self.db.num_variables(), self.registry.len());
 let ok = {
 let mut ctx = InitializationContext::new(&mut self.db, &mut self.watchers, &mut self.queue, id);
 self.registry.get_mut(id).initialize(&mut ctx)
 };
 if !ok {
 return Err(ConstraintOperationError::InfeasibleConstraint);
 }
 self.num_original_constraints += 1;
 Ok(id)
 }

 /// Registers an original (non-learned) clause, optionally carrying graph-relation
 /// info so it becomes a candidate for [`Self::promote_graph_clauses`].
 pub fn add_clause(&mut self, literals: Vec<Literal>, graph_relation_info: Option<ConstraintGraphRelationInfo>) -> Result<ConstraintId, ConstraintOperationError> {
 if literals.is_empty() {
 return Err(ConstraintOperationError::InfeasibleClause);
 }
 let mut variables: Vec<VarId> = literals.iter().map(|l| l.variable()).collect();
 variables.sort_unstable();
 variables.dedup();

 let metadata = graph_relation_info.map(|info| LearnedMetadata {
 lbd: 0,
 activity: 0.0,
 permanent: true,
 step_learned: self.db.timestamp(),
 promotion_source: None,
 graph_relation_info: Some(info),
 locked: false,
 });
 let clause: Box<dyn Constraint> = Box::new(ClauseConstraint::new(literals, metadata));
 self.register_constraint(clause, variables)
 }

 /// Runs the optional simplification pre-pass over the original clause set once:
 /// unit propagation with clause deletion/shortening, followed by subsumption
 /// elimination, to a fixpoint. Idempotent; later calls after search has progressed
 /// are a no-op beyond re-running an already-converged pass, since simplification
 /// never touches learned clauses.
 pub fn simplify(&mut self) -> bool {
 sat::simplify::simplify(&mut self.registry, &mut self.watchers, &mut self.queue, &mut self.db)
 }

 /// Runs [`Self::simplify`] exactly once, the first time search is driven, either
 /// via [`Self::start_solving`] or the first [`Self::step`]/[`Self::solve`] call.
 fn ensure_simplified(&mut self) {
 if !self.simplified {
 self.simplified = true;
 if !self.simplify() {
 self.infeasible_from_simplify = true;
 }
 }
 }

 /// `startSolving`: runs the simplification pre-pass (if not
 /// already run) and then drives one [`Self::step`].
 pub fn start_solving(&mut self) -> SolveStatus {
 self.started = true;
 self.ensure_simplified();
 self.step()
 }

 /// Drains the propagation queue to a fixpoint: fully drain the
 /// variable-modification queue via each watcher list's `trigger`, then pop one
 /// constraint and propagate it, repeating until both queues are empty.
 pub fn propagate(&mut self) -> PropagationResult {
 loop {
 while let Some(var) = self.queue.pop_variable() {
 let current = self.db.current(var).clone();
 let prev = match self.db.last_modification_timestamp(var) {
 Some(ts) => self.db.stack().get(ts).prev_values.clone(),
 None => current.clone(),
 };
 self.watchers.get_mut(var).trigger(&prev, &current, &mut self.queue);
 }

 let Some(constraint_id) = self.queue.pop_constraint() else {
 return PropagationResult::Fixpoint;
 };
 let ok = {
 let mut ctx = PropagationContextMut::new(&mut self.db, &mut self.watchers, &mut self.queue, constraint_id);
 self.registry.get_mut(constraint_id).propagate(&mut ctx)
 };
 self.stats.num_propagations += 1;
 if !ok {
 return PropagationResult::Conflict(constraint_id);
 }
 }
 }

 /// Analyses a conflicting constraint, learns its 1-UIP clause, and backjumps past
 /// it. If 1-UIP resolution found the learned clause's antecedents all shared one
 /// graph relation, the new clause carries it through to [`Self::promote_graph_clauses`],
 /// called unconditionally right after registration so graph-aware learning applies
 /// to learned clauses, not just original ones. Returns `true` if the problem is now
 /// known unsatisfiable.
 fn learn_from_conflict(&mut self, constraint_id: ConstraintId) -> bool {
 self.stats.num_conflicts += 1;
 let conflict_ts = self.db.timestamp();
 let conflict_literals = {
 let ctx = ExplanationContext::new(&self.db, conflict_ts);
 self.registry.get_mut(constraint_id).explain_conflict(&ctx)
 };

 let result = analyze_conflict(conflict_literals, constraint_id, &self.db, &self.levels, &mut self.registry, &mut self.activity_increment);
 if result.root_conflict {
 return true;
 }

 let lbd = calculate_lbd(&result.learned_literals, &self.db, &self.levels);
 sat::decay_activities(&mut self.activity_increment);

 crate::palisade_assert_simple!(result.backjump_level < self.levels.current_level());
 let rewind_ts = self.levels.backtrack_to(result.backjump_level);
 self.db.backtrack(rewind_ts);
 self.queue.clear();
 for id in self.registry.ids() {
 self.registry.get_mut(id).backtrack(&self.db, result.backjump_level);
 }

 let metadata = LearnedMetadata {
 lbd,
 activity: 0.0,
 permanent: lbd <= sat::PERMANENT_LBD_THRESHOLD,
 step_learned: self.db.timestamp(),
 promotion_source: None,
 graph_relation_info: result.graph_relation_info,
 locked: false,
 };
 let variables: Vec<VarId> = result.learned_literals.iter().map(|l| l.variable()).collect();
 let clause: Box<dyn Constraint> = Box::new(ClauseConstraint::new(result.learned_literals, Some(metadata)));
 let id = self.registry.register(clause, variables, true, None);
 self.queue.resize(self.db.num_variables(), self.registry.len());

 let ok = {
 let mut ctx = InitializationContext::new(&mut self.db, &mut self.watchers, &mut self.queue, id);
 self.registry.get_mut(id).initialize(&mut ctx)
 };
 // A freshly-learned 1-UIP clause is unit at the backjumped level by
 // construction; a `false` here means `analyze_conflict`'s cut was unsound.
 debug_assert!(ok, "a 1-UIP clause must not be immediately falsified after backjumping");

 sat::bump_activity(&mut self.registry, id, &mut self.activity_increment);
 self.conflicts_since_restart += 1;
 self.stats.num_learned_clauses += 1;

 self.promote_graph_clauses(id);

 if sat::should_purge(&self.registry, self.num_original_constraints) {
 self.purge_temporary_clauses();
 }

 false
 }

 fn purge_temporary_clauses(&mut self) {
 for id in sat::select_purge_candidates(&self.registry) {
 sat::purge(&mut self.registry, id, &mut self.watchers);
 self.stats.num_purged_clauses += 1;
 }
 }

 /// Backtracks to decision level 0 and clears the propagation queue. Learned clauses are kept; only the search path is abandoned.
 pub fn restart(&mut self) {
 let rewind_ts = self.levels.backtrack_to(0);
 self.db.backtrack(rewind_ts);
 self.queue.clear();
 self.conflicts_since_restart = 0;
 self.stats.num_restarts += 1;
 for id in self.registry.ids() {
 self.registry.get_mut(id).backtrack(&self.db, 0);
 }
 }

 /// Instantiates a graph-promotable clause across every vertex it resolves at,
 /// skipping vertices whose equivalent clause (by structural hash) is already
 /// registered.
 pub fn promote_graph_clauses(&mut self, id: ConstraintId) {
 let Some(clause) = self.registry.get(id).as_any().downcast_ref::<ClauseConstraint>() else {
 return;
 };
 let Some(info) = clause.learned.as_ref().and_then(|m| m.graph_relation_info.as_ref()) else {
 return;
 };
 if !info.is_promotable() {
 return;
 }
 let info = info.clone();
 let literals = clause.literals().to_vec();
 let own_hash = clause_hash(&literals);
 self.promoted_hashes.entry(own_hash).or_insert(id);

 let candidates = promotion_candidates(&info, &literals, &self.db);
 let outcomes = classify_candidates(candidates, &self.promoted_hashes);

 let mut any_promoted = false;
 for outcome in outcomes {
 match outcome {
 PromotionOutcome::AlreadyPresent {.. } => {}
 PromotionOutcome::Fresh(candidate) => {
 let metadata = LearnedMetadata {
 lbd: 0,
 activity: 0.0,
 permanent: true,
 step_learned: self.db.timestamp(),
 promotion_source: Some(id),
 graph_relation_info: Some(candidate.relation_info),
 locked: false,
 };
 let variables: Vec<VarId> = candidate.literals.iter().map(|l| l.variable()).collect();
 let new_clause: Box<dyn Constraint> = Box::new(ClauseConstraint::new(candidate.literals.clone(), Some(metadata)));
 let new_id = self.registry.register(new_clause, variables, true, Some(id));
 self.queue.resize(self.db.num_variables(), self.registry.len());
 let ok = {
 let mut ctx = InitializationContext::new(&mut self.db, &mut self.watchers, &mut self.queue, new_id);
 self.registry.get_mut(new_id).initialize(&mut ctx)
 };
 if ok {
 self.promoted_hashes.insert(clause_hash(&candidate.literals), new_id);
 any_promoted = true;
 }
 }
 }
 }
 if any_promoted {
 self.registry.mark_promoted_to_graph(id);
 }
 }

 /// Proposes and commits one branching decision. Returns `None` once
 /// every variable is already solved.
 fn decide(&mut self) -> Option<()> {
 let (var, mask) = self.decision_heuristic.next_decision(&self.db)?;
 let ts = self.db.timestamp();
 self.levels.push(ts, var);
 self.db.narrow(var, &mask, ConstraintReference::Decision, None, &mut self.queue);
 self.stats.num_decisions += 1;
 Some(())
 }

 /// One unit of search progress: propagate to a fixpoint,
 /// learning from and backjumping past every conflict encountered; once conflict-free,
 /// either make one more decision or report completion.
 pub fn step(&mut self) -> SolveStatus {
 self.started = true;
 self.ensure_simplified();
 if self.infeasible_from_simplify {
 return SolveStatus::Unsatisfiable;
 }
 loop {
 match self.propagate() {
 PropagationResult::Fixpoint => break,
 PropagationResult::Conflict(constraint_id) => {
 if self.learn_from_conflict(constraint_id) {
 return SolveStatus::Unsatisfiable;
 }
 if self.restart_policy.should_restart(self.conflicts_since_restart) {
 self.restart();
 }
 }
 }
 }

 match self.decide() {
 Some(()) => SolveStatus::InProgress,
 None => {
 for var in (0..self.db.num_variables() as u32).map(VarId::new) {
 self.db.remember_last_solved(var);
 }
 SolveStatus::Solved
 }
 }
 }

 /// Drives [`Self::step`] to a terminal state.
 pub fn solve(&mut self) -> SolveStatus {
 loop {
 match self.step() {
 SolveStatus::InProgress => continue,
 terminal => return terminal,
 }
 }
 }

 /// Adds the negation of the current solution as a nogood and resumes search for
 /// the next one. Must only be called
 /// after `solve()` returned [`SolveStatus::Solved`].
 pub fn enumerate_next_solution(&mut self) -> Result<SolveStatus, ConstraintOperationError> {
 let literals: Vec<Literal> = (0..self.db.num_variables() as u32)
.map(VarId::new)
.map(|var| Literal::new(var, self.db.current(var).clone()).negated())
.collect();

 let rewind_ts = self.levels.backtrack_to(0);
 self.db.backtrack(rewind_ts);
 self.queue.clear();
 for id in self.registry.ids() {
 self.registry.get_mut(id).backtrack(&self.db, 0);
 }

 self.add_clause(literals, None)?;
 Ok(self.solve())
 }
}
