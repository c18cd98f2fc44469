//! 1-UIP conflict analysis: walks the assignment stack
//! backward from a conflict's explanation, resolving out literals at the current
//! decision level until exactly one remains.

use std::collections::HashMap;
use std::rc::Rc;

use crate::basic_types::{ConstraintId, ConstraintReference, Literal, ValueSet, VarId};
use crate::engine::cp::{ConstraintRegistry, ExplanationContext};
use crate::engine::graph::{ConstraintGraphRelationInfo, Relation, Topology, VertexId};
use crate::engine::sat::{bump_activity, ClauseConstraint};
use crate::engine::solver::decision_levels::DecisionLevels;
use crate::engine::variables::{HistoricalVariableDatabase, VariableDatabase};

/// Tracks, across a single conflict's resolution, whether every antecedent clause
/// that contributed a surviving literal shares one graph relation (same topology,
/// same source vertex) - the condition under which the learned clause itself can
/// carry a [`ConstraintGraphRelationInfo`] and become a graph-promotion candidate
/// (spec's "distinctively graph-aware learning").
struct GraphRelationTracker {
 shared: Option<(Rc<dyn Topology>, VertexId)>,
 relations: HashMap<VarId, Relation<VarId>>,
 broken: bool,
}

impl GraphRelationTracker {
 fn new() -> Self {
 GraphRelationTracker {
 shared: None,
 relations: HashMap::new(),
 broken: false,
 }
 }

 /// Folds in `constraint_id`'s graph relation info, if it has one. Once an
 /// antecedent is seen whose topology/source vertex disagrees with an
 /// already-recorded one, tracking is permanently `broken` for this conflict.
 fn observe(&mut self, registry: &ConstraintRegistry, constraint_id: ConstraintId) {
 if self.broken {
 return;
 }
 let Some(clause) = registry.get(constraint_id).as_any().downcast_ref::<ClauseConstraint>() else {
 return;
 };
 let Some(info) = clause.learned.as_ref().and_then(|m| m.graph_relation_info.as_ref()) else {
 return;
 };
 match &self.shared {
 None => self.shared = Some((Rc::clone(info.topology_rc()), info.source_vertex())),
 Some((topology, source_vertex)) => {
 if !Rc::ptr_eq(topology, info.topology_rc()) || *source_vertex != info.source_vertex() {
 self.broken = true;
 return;
 }
 }
 }
 for (literal, relation) in clause.literals().iter().zip(info.relations()) {
 self.relations.entry(literal.variable()).or_insert_with(|| relation.clone());
 }
 }

 /// Builds the learned clause's relation info, anchoring a relation to every
 /// literal in `learned_literals` - fails if any literal's variable was never
 /// covered by an observed antecedent, or if tracking was ever `broken`.
 fn build(&self, learned_literals: &[Literal]) -> Option<ConstraintGraphRelationInfo> {
 if self.broken {
 return None;
 }
 let (topology, source_vertex) = self.shared.clone()?;
 let mut relations = Vec::with_capacity(learned_literals.len());
 for literal in learned_literals {
 relations.push(self.relations.get(&literal.variable())?.clone());
 }
 Some(ConstraintGraphRelationInfo::new(topology, source_vertex, relations))
 }
}

/// The outcome of clause learning.
#[derive(Clone, Debug, Default)]
pub struct ConflictAnalysisResult {
 /// The 1-UIP asserting clause: index 0 is the assertion literal (the single
 /// literal at the conflict's decision level, negated), the rest are the other
 /// literals (also negated), in descending order of decision level.
 pub learned_literals: Vec<Literal>,
 /// The decision level to backjump to: the second-highest decision level among
 /// `learned_literals[1..]`, or 0 if there is none.
 pub backjump_level: usize,
 /// `true` when the conflict's explanation was already entirely at decision level
 /// 0: no cut was needed, and the problem is unconditionally unsatisfiable.
 pub root_conflict: bool,
 /// Set when every antecedent clause touched during resolution that carried a
 /// [`ConstraintGraphRelationInfo`] agreed on the same topology and source vertex,
 /// and every surviving literal's variable has a relation in that info - the
 /// learned clause is then itself a graph-promotion candidate.
 pub graph_relation_info: Option<ConstraintGraphRelationInfo>,
}

fn level_of_variable(db: &VariableDatabase, levels: &DecisionLevels, var: crate::basic_types::VarId) -> usize {
 db.last_modification_timestamp(var).map(|ts| levels.level_of_timestamp(ts)).unwrap_or(0)
}

/// Merges `lit` into the growing conflict-side literal set `cs`: if `cs` already has
/// a literal over the same variable, the two masks are intersected (the conjunction
/// "var ∈ M1 AND var ∈ M2" collapses to "var ∈ M1 ∩ M2"); otherwise `lit` is appended.
fn merge_into(cs: &mut Vec<Literal>, lit: Literal) {
 if let Some(existing) = cs.iter_mut().find(|l| l.variable() == lit.variable()) {
 let mut merged: ValueSet = existing.mask().clone();
 merged.intersect(lit.mask());
 *existing = Literal::new(lit.variable(), merged);
 } else {
 cs.push(lit);
 }
}

/// Runs 1-UIP resolution starting from `initial_conflict_literals` (the literals the
/// failing constraint's `explain_conflict` reported as simultaneously true). Every
/// learned clause resolved through along the way has its activity bumped, in addition
/// to the decay applied on every backtrack.
pub fn analyze_conflict(
 initial_conflict_literals: Vec<Literal>,
 conflict_constraint_id: ConstraintId,
 db: &VariableDatabase,
 levels: &DecisionLevels,
 registry: &mut ConstraintRegistry,
 activity_increment: &mut f32,
) -> ConflictAnalysisResult {
 let current_level = levels.current_level();
 let mut cs: Vec<Literal> = Vec::new();
 for lit in initial_conflict_literals {
 merge_into(&mut cs, lit);
 }

 let mut graph_tracker = GraphRelationTracker::new();
 graph_tracker.observe(registry, conflict_constraint_id);

 loop {
 let at_current: Vec<usize> = cs
.iter()
.enumerate()
.filter(|(_, l)| level_of_variable(db, levels, l.variable()) == current_level)
.map(|(i, _)| i)
.collect();

 if at_current.len() <= 1 {
 break;
 }

 let pivot_idx = at_current
.into_iter()
.max_by_key(|&i| db.last_modification_timestamp(cs[i].variable()).unwrap_or(0))
.expect("non-empty by the len()>1 check above");
 let pivot_lit = cs.remove(pivot_idx);
 let ts = match db.last_modification_timestamp(pivot_lit.variable()) {
 Some(ts) => ts,
 None => {
 cs.push(pivot_lit);
 break;
 }
 };
 let entry = db.stack().get(ts);

 match entry.cause {
 ConstraintReference::Decision => {
 cs.push(pivot_lit);
 break;
 }
 ConstraintReference::Constraint(constraint_id) => {
 graph_tracker.observe(registry, constraint_id);
 let reason = if let Some(explainer) = &entry.explainer {
 let historical = HistoricalVariableDatabase::new(db, ts);
 explainer(&historical)
 } else {
 let ctx = ExplanationContext::new(db, ts);
 registry.get_mut(constraint_id).explain(&pivot_lit, &ctx)
 };
 if registry.is_learned(constraint_id) {
 bump_activity(registry, constraint_id, activity_increment);
 }
 for lit in reason {
 merge_into(&mut cs, lit);
 }
 }
 }
 }

 let assertion_idx = cs.iter().position(|l| level_of_variable(db, levels, l.variable()) == current_level);

 let root_conflict = assertion_idx.is_none() && current_level == 0;

 let mut learned_literals = Vec::with_capacity(cs.len());
 if let Some(idx) = assertion_idx {
 learned_literals.push(cs.remove(idx).negated());
 }

 let mut rest: Vec<(usize, Literal)> = cs
.into_iter()
.map(|l| {
 let level = level_of_variable(db, levels, l.variable());
 (level, l.negated())
 })
.collect();
 rest.sort_by(|a, b| b.0.cmp(&a.0));

 let backjump_level = rest.first().map(|(level, _)| *level).unwrap_or(0);
 learned_literals.extend(rest.into_iter().map(|(_, lit)| lit));

 let graph_relation_info = graph_tracker.build(&learned_literals);

 ConflictAnalysisResult {
 learned_literals,
 backjump_level,
 root_conflict,
 graph_relation_info,
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::basic_types::{ConstraintId, VarId};
 use crate::engine::variables::domain::Domain;
 use crate::engine::variables::PropagationQueue;

 #[test]
 fn two_decisions_at_same_level_cut_to_one_uip() {
 let mut db = VariableDatabase::new();
 let a = db.create_variable("a", Domain::from_range(0, 1), None).unwrap();
 let b = db.create_variable("b", Domain::from_range(0, 1), None).unwrap();
 let mut queue = PropagationQueue::new();
 let mut levels = DecisionLevels::new();
 let mut registry = ConstraintRegistry::new();

 let mut mask = ValueSet::new_full(2);
 mask.set(1, false);

 let ts_decision = db.timestamp();
 db.narrow(a, &mask, ConstraintReference::Decision, None, &mut queue);
 levels.push(ts_decision, a);

 // b is propagated (not a decision) within the same level, citing a dummy
 // constraint whose explanation is `a`'s established literal.
 let constraint_id = registry.register(Box::new(ClauseConstraint::new(vec![], None)), vec![], false, None);
 let a_literal = Literal::new(a, mask.clone());
 let explainer: Box<dyn Fn(&HistoricalVariableDatabase) -> Vec<Literal>> = {
 let a_literal = a_literal.clone();
 Box::new(move |_db: &HistoricalVariableDatabase| vec![a_literal.clone()])
 };
 db.narrow(b, &mask, ConstraintReference::Constraint(constraint_id), Some(explainer), &mut queue);

 let conflict_literals = vec![Literal::new(a, mask.clone()), Literal::new(b, mask)];
 let mut activity_increment = 1.0f32;
 let result = analyze_conflict(conflict_literals, constraint_id, &db, &levels, &mut registry, &mut activity_increment);

 assert_eq!(result.learned_literals.len(), 1, "b's literal resolves into a's, leaving a single UIP");
 assert_eq!(result.backjump_level, 0);
 assert!(!result.root_conflict);
 }
}
