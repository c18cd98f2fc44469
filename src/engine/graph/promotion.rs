//! Graph-aware learning: detecting that a learned clause is graph-promotable and
//! instantiating it at every structurally equivalent vertex of the topology.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::basic_types::{ConstraintId, Literal, VarId};
use crate::engine::variables::VariableDatabase;

use super::relation::Relation;
use super::topology::{Topology, VertexId};

/// A clause's graph-relation attachment: the topology it was
/// instantiated against, the source vertex it was built at, and a relation mapping
/// the topology's vertices to each of the clause's variables, in the same order as
/// the clause's literals.
#[derive(Clone)]
pub struct ConstraintGraphRelationInfo {
 topology: Rc<dyn Topology>,
 source_vertex: VertexId,
 relations: Vec<Relation<VarId>>,
}

impl std::fmt::Debug for ConstraintGraphRelationInfo {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 f.debug_struct("ConstraintGraphRelationInfo")
.field("source_vertex", &self.source_vertex)
.field("num_relations", &self.relations.len())
.finish()
 }
}

impl ConstraintGraphRelationInfo {
 pub fn new(topology: Rc<dyn Topology>, source_vertex: VertexId, relations: Vec<Relation<VarId>>) -> Self {
 ConstraintGraphRelationInfo {
 topology,
 source_vertex,
 relations,
 }
 }

 pub fn source_vertex(&self) -> VertexId {
 self.source_vertex
 }

 pub fn topology(&self) -> &dyn Topology {
 self.topology.as_ref()
 }

 pub fn topology_rc(&self) -> &Rc<dyn Topology> {
 &self.topology
 }

 /// The per-literal relations, aligned index-for-index with the clause's literals.
 pub fn relations(&self) -> &[Relation<VarId>] {
 &self.relations
 }

 /// Valid iff no two variables of the constraint share the same relation key.
 pub fn is_valid(&self) -> bool {
 for i in 0..self.relations.len() {
 for j in (i + 1)..self.relations.len() {
 if self.relations[i] == self.relations[j] {
 return false;
 }
 }
 }
 true
 }

 /// Promotable iff every relation is defined on more than just the source vertex.
 pub fn is_promotable(&self) -> bool {
 self.is_valid()
 && self.relations.iter().all(|relation| {
 (0..self.topology.num_vertices())
.filter(|&v| v != self.source_vertex)
.any(|v| relation.evaluate(v, self.topology.as_ref()).is_some())
 })
 }

 fn anchored_at(&self, vertex: VertexId) -> ConstraintGraphRelationInfo {
 ConstraintGraphRelationInfo {
 topology: Rc::clone(&self.topology),
 source_vertex: vertex,
 relations: self.relations.clone(),
 }
 }
}

/// A single successfully-resolved promotion target: the vertex it was built at, the
/// literal list (same masks as the original, different variables), and the relation
/// info anchored there.
#[derive(Debug)]
pub struct PromotionCandidate {
 pub vertex: VertexId,
 pub literals: Vec<Literal>,
 pub relation_info: ConstraintGraphRelationInfo,
}

/// Order-independent structural hash over a clause's literals.
pub fn clause_hash(literals: &[Literal]) -> u64 {
 literals.iter().fold(0u64, |acc, literal| {
 let mut hasher = DefaultHasher::new();
 literal.variable().hash(&mut hasher);
 literal.mask().hash(&mut hasher);
 acc ^ hasher.finish()
 })
}

/// Computes every vertex at which `info`'s clause can be validly re-instantiated.
/// `literals` is the original clause's literal list, aligned index-for-index with
/// `info`'s relations.
///
/// For each vertex `v != info.source_vertex()`: evaluates every relation at `v`; if
/// any relation fails to resolve, or the resolved variable's initial value set
/// differs from the corresponding original variable's, that vertex is skipped.
/// Otherwise a candidate with the same masks, new variables, and a relation info
/// anchored at `v` is produced.
pub fn promotion_candidates(info: &ConstraintGraphRelationInfo, literals: &[Literal], db: &VariableDatabase) -> Vec<PromotionCandidate> {
 assert_eq!(literals.len(), info.relations.len(), "one relation per literal");

 let topology = info.topology.as_ref();
 let mut candidates = Vec::new();

 for vertex in 0..topology.num_vertices() {
 if vertex == info.source_vertex {
 continue;
 }

 let mut resolved = Vec::with_capacity(literals.len());
 let mut ok = true;
 for (relation, literal) in info.relations.iter().zip(literals) {
 let Some(target_var) = relation.evaluate(vertex, topology) else {
 ok = false;
 break;
 };
 let source_initial = db.initial(literal.variable());
 let target_initial = db.initial(target_var);
 if *target_initial != *source_initial {
 ok = false;
 break;
 }
 resolved.push(target_var);
 }
 if !ok {
 continue;
 }

 let new_literals: Vec<Literal> = resolved
.into_iter()
.zip(literals)
.map(|(var, original)| Literal::new(var, original.mask().clone()))
.collect();

 candidates.push(PromotionCandidate {
 vertex,
 literals: new_literals,
 relation_info: info.anchored_at(vertex),
 });
 }

 candidates
}

/// Drives promotion for a single learned clause against a registry's duplicate index.
/// Kept as a thin stateless helper; ownership of the registry and variable database
/// during registration belongs to [`crate::engine::solver`].
#[derive(Debug, Default)]
pub struct GraphPromoter;

impl GraphPromoter {
 pub fn new() -> Self {
 GraphPromoter
 }

 /// Computes the set of promotion candidates for a clause, annotating which are
 /// already present (by hash) in `known_hashes` so the caller can mark the
 /// existing constraint `promotedFromGraph` instead of registering a duplicate.
 pub fn candidates(&self, info: &ConstraintGraphRelationInfo, literals: &[Literal], db: &VariableDatabase) -> Vec<PromotionCandidate> {
 if !info.is_promotable() {
 return Vec::new();
 }
 promotion_candidates(info, literals, db)
 }
}

/// What happened to one promotion candidate once checked against the learned-clause
/// hash index.
#[derive(Debug)]
pub enum PromotionOutcome {
 /// An equivalent clause already existed; `existing` should be marked
 /// `promotedFromGraph`.
 AlreadyPresent { existing: ConstraintId },
 /// No equivalent clause existed; the candidate should be registered fresh.
 Fresh(PromotionCandidate),
}

/// Classifies each candidate against a hash index of already-learned clauses.
pub fn classify_candidates(candidates: Vec<PromotionCandidate>, known_hashes: &std::collections::HashMap<u64, ConstraintId>) -> Vec<PromotionOutcome> {
 candidates
.into_iter()
.map(|candidate| match known_hashes.get(&clause_hash(&candidate.literals)) {
 Some(&existing) => PromotionOutcome::AlreadyPresent { existing },
 None => PromotionOutcome::Fresh(candidate),
 })
.collect()
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::basic_types::ValueSet;
 use crate::engine::variables::domain::Domain;

 #[derive(Debug)]
 struct Line4;
 impl Topology for Line4 {
 fn num_vertices(&self) -> u32 {
 4
 }
 fn num_outgoing(&self, v: VertexId) -> u32 {
 if v < 3 {
 1
 } else {
 0
 }
 }
 fn outgoing_destination(&self, v: VertexId, i: u32) -> Option<VertexId> {
 (i == 0 && v < 3).then_some(v + 1)
 }
 fn num_incoming(&self, v: VertexId) -> u32 {
 if v > 0 {
 1
 } else {
 0
 }
 }
 fn incoming_source(&self, v: VertexId, i: u32) -> Option<VertexId> {
 (i == 0 && v > 0).then_some(v - 1)
 }
 }

 #[test]
 fn promotes_at_every_vertex_with_a_valid_relation() {
 let mut db = VariableDatabase::new();
 let vars: Vec<VarId> = (0..4).map(|i| db.create_variable(format!("cell{i}"), Domain::from_range(0, 1), None).unwrap()).collect();

 let vars_for_relation = vars.clone();
 let relation = Relation::direct(0, move |v: VertexId| vars_for_relation.get(v as usize).copied());

 let info = ConstraintGraphRelationInfo::new(Rc::new(Line4), 0, vec![relation]);
 assert!(info.is_promotable());

 let mut mask = ValueSet::new_empty(2);
 mask.set(0, true);
 let literals = vec![Literal::new(vars[0], mask)];

 let candidates = promotion_candidates(&info, &literals, &db);
 assert_eq!(candidates.len(), 3, "vertices 1,2,3 should all promote");
 assert_eq!(candidates[0].vertex, 1);
 assert_eq!(candidates[0].literals[0].variable(), vars[1]);
 }

 #[test]
 fn vertex_is_rejected_when_initial_value_sets_differ_at_equal_width() {
 let mut db = VariableDatabase::new();
 let vars: Vec<VarId> = (0..4).map(|i| db.create_variable(format!("cell{i}"), Domain::from_range(0, 1), None).unwrap()).collect();

 // Same width (2) as every other cell's initial set, but a different actual set:
 // only index 0 is possible here, both are possible everywhere else.
 let mut narrow_initial = ValueSet::new_empty(2);
 narrow_initial.set(0, true);
 let narrowed = db.create_variable("cell_narrow", Domain::from_range(0, 1), Some(narrow_initial)).unwrap();

 let vars_for_relation = vars.clone();
 let relation = Relation::direct(0, move |v: VertexId| {
 if v == 1 {
 Some(narrowed)
 } else {
 vars_for_relation.get(v as usize).copied()
 }
 });

 let info = ConstraintGraphRelationInfo::new(Rc::new(Line4), 0, vec![relation]);
 let mut mask = ValueSet::new_empty(2);
 mask.set(0, true);
 let literals = vec![Literal::new(vars[0], mask)];

 let candidates = promotion_candidates(&info, &literals, &db);
 assert!(
 candidates.iter().all(|c| c.vertex != 1),
 "vertex 1 resolves to a variable whose initial value set differs from the source's, even though the width matches"
 );
 }

 #[test]
 fn duplicate_candidate_is_classified_as_already_present() {
 let mut db = VariableDatabase::new();
 let v0 = db.create_variable("a", Domain::from_range(0, 1), None).unwrap();
 let v1 = db.create_variable("b", Domain::from_range(0, 1), None).unwrap();
 let mask = ValueSet::new_full(2);
 let candidate = PromotionCandidate {
 vertex: 1,
 literals: vec![Literal::new(v1, mask.clone())],
 relation_info: ConstraintGraphRelationInfo::new(Rc::new(Line4), 1, vec![]),
 };
 let hash = clause_hash(&[Literal::new(v1, mask)]);
 let mut known = std::collections::HashMap::new();
 known.insert(hash, ConstraintId::new(5));

 let outcomes = classify_candidates(vec![candidate], &known);
 assert_eq!(outcomes.len(), 1);
 assert!(matches!(outcomes[0], PromotionOutcome::AlreadyPresent { existing } if existing == ConstraintId::new(5)));
 let _ = v0;
 }
}
