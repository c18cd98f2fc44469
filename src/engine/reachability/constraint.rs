//! [`ReachabilityConstraint`]: dual min/max dynamic reachability with source
//! management and min-cut explanations.
//!
//! Every edge/source/vertex this constraint watches is backed by a 2-valued variable
//! (the same representation `BooleanPropagator` specialises on): index `0` is the
//! "closed"/"not-source"/"not-reachable" side, index `1` the "open"/"source"/
//! "reachable" side. Callers build these variables and resolve which `VarId` gates
//! which `(u, v)` pair (typically via an [`crate::engine::graph::EdgeTopology`]) before
//! constructing this constraint; it does not create variables itself.

use std::collections::HashMap;

use crate::basic_types::{Literal, ValueSet, VarId};
use crate::engine::cp::{Constraint, ExplanationContext, InitializationContext, PropagationContextMut};
use crate::engine::graph::{Topology, VertexId};
use crate::engine::variables::{Explainer, VariableDatabase, WatchKind};

use super::dynamic_reachability::DynamicReachability;
use super::graph_view::GraphView;
use super::min_cut::min_cut;

fn open_mask() -> ValueSet {
 ValueSet::new_singleton(2, 1)
}

fn blocked_mask() -> ValueSet {
 ValueSet::new_singleton(2, 0)
}

fn is_source_mask() -> ValueSet {
 ValueSet::new_singleton(2, 1)
}

fn not_source_mask() -> ValueSet {
 ValueSet::new_singleton(2, 0)
}

fn reachable_mask() -> ValueSet {
 ValueSet::new_singleton(2, 1)
}

fn not_reachable_mask() -> ValueSet {
 ValueSet::new_singleton(2, 0)
}

fn explainer_for(literals: Vec<Literal>) -> Explainer {
 Box::new(move |_| literals.clone())
}

#[derive(Clone, Copy, Debug)]
struct EdgeEntry {
 u: VertexId,
 v: VertexId,
 var: VarId,
}

#[derive(Clone, Copy, Debug)]
struct SourceEntry {
 vertex: VertexId,
 var: VarId,
}

#[derive(Clone, Copy, Debug)]
struct VertexEntry {
 vertex: VertexId,
 var: VarId,
}

/// Dual (min/max) dynamic graph reachability from a set of potential sources, with
/// min-cut-based unreachability explanations and single-support source narrowing.
#[derive(Debug)]
pub struct ReachabilityConstraint {
 num_vertices: u32,
 edges: Vec<EdgeEntry>,
 sources: Vec<SourceEntry>,
 vertices: Vec<VertexEntry>,
 min_graph: GraphView,
 max_graph: GraphView,
 explanation_graph: GraphView,
 min_oracles: HashMap<VertexId, DynamicReachability>,
 max_oracles: HashMap<VertexId, DynamicReachability>,
 next_journal_timestamp: usize,
}

impl ReachabilityConstraint {
 /// `edges` pairs each directed edge `(u, v)` with the variable gating it; `sources`
 /// pairs each candidate source vertex with its "is source" variable; `vertices`
 /// pairs every vertex whose reachability is tracked with its "reachable" variable.
 pub fn new(topology: &dyn Topology, edges: Vec<(VertexId, VertexId, VarId)>, sources: Vec<(VertexId, VarId)>, vertices: Vec<(VertexId, VarId)>) -> Self {
 let num_vertices = topology.num_vertices();
 ReachabilityConstraint {
 num_vertices,
 edges: edges.into_iter().map(|(u, v, var)| EdgeEntry { u, v, var }).collect(),
 sources: sources.into_iter().map(|(vertex, var)| SourceEntry { vertex, var }).collect(),
 vertices: vertices.into_iter().map(|(vertex, var)| VertexEntry { vertex, var }).collect(),
 min_graph: GraphView::new(num_vertices as usize),
 max_graph: GraphView::new(num_vertices as usize),
 explanation_graph: GraphView::new(num_vertices as usize),
 min_oracles: HashMap::new(),
 max_oracles: HashMap::new(),
 next_journal_timestamp: 0,
 }
 }

 fn next_ts(&mut self) -> usize {
 let ts = self.next_journal_timestamp;
 self.next_journal_timestamp += 1;
 ts
 }

 fn is_potential_source(current: &ValueSet) -> bool {
 current.any_possible(&is_source_mask())
 }

 fn is_definite_source(current: &ValueSet) -> bool {
 current.is_subset_of(&is_source_mask())
 }

 /// Re-derives `minGraph`/`maxGraph`/`explanationGraph`'s edge membership and the
 /// per-source oracle set from the live domains, rather than walking an undo
 /// journal; the resynchronisation strategy the `Constraint::backtrack` contract
 /// itself documents.
 /// `current_of` reads a variable's live value; it is called against
 /// [`VariableDatabase::current`] from [`Constraint::backtrack`] and against
 /// [`PropagationContextMut::current`] from [`Constraint::propagate`], so this one
 /// routine serves both call sites.
 fn resync(&mut self, current_of: &mut dyn FnMut(VarId) -> ValueSet) {
 let edges = self.edges.clone();
 for edge in edges {
 let current = current_of(edge.var);
 let definitely_open = current.is_subset_of(&open_mask());
 let definitely_blocked = current.is_subset_of(&blocked_mask());
 let in_min = self.min_graph.has_edge(edge.u, edge.v);
 let in_max = self.max_graph.has_edge(edge.u, edge.v);

 if definitely_open && !in_min {
 let ts = self.next_ts();
 self.min_graph.insert_edge(ts, edge.u, edge.v);
 }
 if definitely_blocked && in_max {
 let ts = self.next_ts();
 self.max_graph.remove_edge(ts, edge.u, edge.v);
 let ts = self.next_ts();
 self.explanation_graph.remove_edge(ts, edge.u, edge.v);
 } else if !definitely_blocked && !in_max {
 let ts = self.next_ts();
 self.max_graph.insert_edge(ts, edge.u, edge.v);
 let ts = self.next_ts();
 self.explanation_graph.insert_edge(ts, edge.u, edge.v);
 }
 }

 for edge in &self.edges {
 crate::palisade_assert_moderate!(
 !self.min_graph.has_edge(edge.u, edge.v) || self.max_graph.has_edge(edge.u, edge.v),
 "minGraph edges must be a subset of maxGraph edges"
 );
 }

 let sources = self.sources.clone();
 for source in sources {
 let current = current_of(source.var);
 if Self::is_potential_source(&current) {
 self.min_oracles.entry(source.vertex).or_insert_with(|| DynamicReachability::new(source.vertex, self.num_vertices as usize));
 self.max_oracles.entry(source.vertex).or_insert_with(|| DynamicReachability::new(source.vertex, self.num_vertices as usize));
 } else {
 self.min_oracles.remove(&source.vertex);
 self.max_oracles.remove(&source.vertex);
 }
 }

 for oracle in self.min_oracles.values_mut() {
 oracle.mark_dirty();
 }
 for oracle in self.max_oracles.values_mut() {
 oracle.mark_dirty();
 }
 }

 fn refresh_oracles(&mut self) {
 for oracle in self.min_oracles.values_mut() {
 oracle.refresh(&self.min_graph);
 }
 for oracle in self.max_oracles.values_mut() {
 oracle.refresh(&self.max_graph);
 }
 }

 /// The unreachability certificate for `conflict_vertex`: a min-cut
 /// between every still-potential source and the vertex, computed against
 /// `explanationGraph` with every currently-blocked edge temporarily restored (so the
 /// only-cuttable edges, per [`super::min_cut::CLOSED_EDGE_FLOW`], are actually present
 /// in the flow network's topology; `explanationGraph` otherwise only carries
 /// not-definitely-blocked edges, which `min_cut` could never select). Sources sharing
 /// a cut side with an already-handled source reuse its certificate instead of
 /// recomputing one.
 fn unreachable_literals(&mut self, current_of: &dyn Fn(VarId) -> ValueSet, conflict_vertex: VertexId) -> Vec<Literal> {
 let restored = self.explanation_graph.restore_removed_edges();

 let mut literals = Vec::new();
 let mut handled = vec![false; self.num_vertices as usize];
 for source in self.sources.clone() {
 if handled[source.vertex as usize] {
 continue;
 }
 let current = current_of(source.var);
 if !Self::is_potential_source(&current) {
 literals.push(Literal::new(source.var, not_source_mask()));
 continue;
 }

 let is_blocked = |u: VertexId, v: VertexId| {
 self.edges
.iter()
.find(|e| e.u == u && e.v == v)
.map(|e| current_of(e.var).is_subset_of(&blocked_mask()))
.unwrap_or(false)
 };
 let cut = min_cut(&self.explanation_graph, is_blocked, source.vertex, conflict_vertex);
 for (u, v) in cut.cut_edges {
 if let Some(edge) = self.edges.iter().find(|e| e.u == u && e.v == v) {
 literals.push(Literal::new(edge.var, blocked_mask()));
 }
 }
 handled[source.vertex as usize] = true;
 for other in &self.sources {
 if other.vertex != source.vertex && cut.is_on_source_side(other.vertex) {
 handled[other.vertex as usize] = true;
 }
 }
 }

 self.explanation_graph.remove_edges(&restored);
 literals
 }

 /// The single-support certificate for narrowing `chosen_source` to "source": every
 /// required-reachable vertex whose only reaching potential source in `maxGraph` is
 /// `chosen_source`, plus "no other potential source exists" for every source already
 /// ruled out. Ranges over every vertex this constraint tracks, not just those
 /// currently required-reachable, since a source not yet required to reach anything
 /// can still become the unique support for one later.
 fn required_source_literals(&self, current_of: &dyn Fn(VarId) -> ValueSet, chosen_source: VertexId) -> Vec<Literal> {
 let mut literals = Vec::new();
 let oracle = self.max_oracles.get(&chosen_source);
 for vertex_entry in &self.vertices {
 let current = current_of(vertex_entry.var);
 if !current.is_subset_of(&reachable_mask()) {
 continue;
 }
 let reachable_here = oracle.map(|o| o.is_reachable(vertex_entry.vertex)).unwrap_or(false);
 if !reachable_here {
 continue;
 }
 let reachable_elsewhere = self.sources.iter().any(|s| {
 s.vertex != chosen_source
 && Self::is_potential_source(&current_of(s.var))
 && self.max_oracles.get(&s.vertex).map(|o| o.is_reachable(vertex_entry.vertex)).unwrap_or(false)
 });
 if !reachable_elsewhere {
 literals.push(Literal::new(vertex_entry.var, reachable_mask()));
 }
 }
 for source in &self.sources {
 if source.vertex == chosen_source {
 continue;
 }
 if !Self::is_potential_source(&current_of(source.var)) {
 literals.push(Literal::new(source.var, not_source_mask()));
 }
 }
 literals
 }
}

impl Constraint for ReachabilityConstraint {
 fn initialize(&mut self, ctx: &mut InitializationContext) -> bool {
 for edge in self.edges.clone() {
 ctx.add_watcher(edge.var, WatchKind::AnyChange);
 }
 for source in self.sources.clone() {
 ctx.add_watcher(source.var, WatchKind::AnyChange);
 }
 for vertex in self.vertices.clone() {
 ctx.add_watcher(vertex.var, WatchKind::AnyChange);
 }
 self.propagate(ctx)
 }

 fn propagate(&mut self, ctx: &mut PropagationContextMut) -> bool {
 self.resync(&mut |var| ctx.current(var).clone());
 self.refresh_oracles();

 for vertex_entry in self.vertices.clone() {
 let v = vertex_entry.vertex;
 let mut definitely_reachable = false;
 let mut possibly_reachable = false;

 for source in self.sources.clone() {
 let current = ctx.current(source.var).clone();
 if !Self::is_potential_source(&current) {
 continue;
 }
 if Self::is_definite_source(&current) && self.min_oracles.get(&source.vertex).map(|o| o.is_reachable(v)).unwrap_or(false) {
 definitely_reachable = true;
 }
 if self.max_oracles.get(&source.vertex).map(|o| o.is_reachable(v)).unwrap_or(false) {
 possibly_reachable = true;
 }
 }

 if definitely_reachable {
 if !ctx.narrow(vertex_entry.var, &reachable_mask(), None) {
 return false;
 }
 } else if !possibly_reachable {
 let current_of = |var: VarId| ctx.current(var).clone();
 let literals = self.unreachable_literals(&current_of, v);
 if !ctx.narrow(vertex_entry.var, &not_reachable_mask(), Some(explainer_for(literals))) {
 return false;
 }
 } else {
 let required = ctx.current(vertex_entry.var).is_subset_of(&reachable_mask());
 if required {
 let reaching: Vec<SourceEntry> = self
.sources
.iter()
.copied()
.filter(|s| Self::is_potential_source(ctx.current(s.var)) && self.max_oracles.get(&s.vertex).map(|o| o.is_reachable(v)).unwrap_or(false))
.collect();
 if reaching.len() == 1 {
 let source = reaching[0];
 let current_of = |var: VarId| ctx.current(var).clone();
 let literals = self.required_source_literals(&current_of, source.vertex);
 if !ctx.narrow(source.var, &is_source_mask(), Some(explainer_for(literals))) {
 return false;
 }
 }
 }
 }
 }
 true
 }

 fn explain(&mut self, literal: &Literal, _ctx: &ExplanationContext) -> Vec<Literal> {
 // `propagate` always attaches an eager explainer alongside every narrowing it
 // performs, so this fallback is not normally reached; it returns a
 // conservative (non-tight) reason built from every edge this constraint knows.
 self.edges.iter().map(|e| Literal::new(e.var, blocked_mask())).chain(std::iter::once(literal.negated())).collect()
 }

 fn explain_conflict(&mut self, _ctx: &ExplanationContext) -> Vec<Literal> {
 self.edges.iter().map(|e| Literal::new(e.var, blocked_mask())).collect()
 }

 fn constraining_variables(&self) -> Vec<VarId> {
 self.edges
.iter()
.map(|e| e.var)
.chain(self.sources.iter().map(|s| s.var))
.chain(self.vertices.iter().map(|v| v.var))
.collect()
 }

 fn backtrack(&mut self, db: &VariableDatabase, _new_level: usize) {
 self.resync(&mut |var| db.current(var).clone());
 self.refresh_oracles();
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
 use crate::fixtures::GridTopology;

 fn bool_var(db: &mut VariableDatabase, watchers: &mut WatcherStore, name: &str) -> VarId {
 let var = db.create_variable(name, Domain::from_range(0, 1), None).unwrap();
 let registered = watchers.register_variable(2);
 assert_eq!(var, registered);
 var
 }

 #[test]
 fn single_row_reaches_every_cell_once_all_edges_are_open() {
 let topology = GridTopology::new(1, 5);
 let mut db = VariableDatabase::new();
 let mut watchers = WatcherStore::new(64);
 let mut queue = PropagationQueue::new();
 let mut registry = ConstraintRegistry::new();

 let edge_vars: Vec<(VertexId, VertexId, VarId)> = (0..4u32)
.map(|i| (i, i + 1, bool_var(&mut db, &mut watchers, &format!("e{i}"))))
.collect();
 let source_var = bool_var(&mut db, &mut watchers, "s0");
 let vertex_vars: Vec<(VertexId, VarId)> = (0..5u32).map(|i| (i, bool_var(&mut db, &mut watchers, &format!("v{i}")))).collect();

 // v0 is the only source, and every edge is forced definitely open.
 db.narrow(source_var, &is_source_mask(), crate::basic_types::ConstraintReference::Decision, None, &mut queue);
 for &(_, _, var) in &edge_vars {
 db.narrow(var, &open_mask(), crate::basic_types::ConstraintReference::Decision, None, &mut queue);
 }

 let constraint = ReachabilityConstraint::new(&topology, edge_vars, vec![(0, source_var)], vertex_vars.clone());
 let id = registry.register(Box::new(constraint), vec![], false, None);
 queue.resize(db.num_variables(), registry.len());

 let mut ctx = InitializationContext::new(&mut db, &mut watchers, &mut queue, id);
 let ok = registry.get_mut(id).initialize(&mut ctx);
 assert!(ok);

 for &(_, var) in vertex_vars.iter().skip(1) {
 assert!(db.current(var).is_subset_of(&reachable_mask()), "every cell downstream of the only definite source must be definitely reachable");
 }
 }

 #[test]
 fn isolated_vertex_is_definitely_unreachable() {
 let topology = GridTopology::new(1, 2);
 let mut db = VariableDatabase::new();
 let mut watchers = WatcherStore::new(64);
 let mut queue = PropagationQueue::new();
 let mut registry = ConstraintRegistry::new();

 let edge_var = bool_var(&mut db, &mut watchers, "e0");
 let source_var = bool_var(&mut db, &mut watchers, "s0");
 let v0 = bool_var(&mut db, &mut watchers, "v0");
 let v1 = bool_var(&mut db, &mut watchers, "v1");

 db.narrow(source_var, &is_source_mask(), crate::basic_types::ConstraintReference::Decision, None, &mut queue);
 db.narrow(edge_var, &blocked_mask(), crate::basic_types::ConstraintReference::Decision, None, &mut queue);

 let constraint = ReachabilityConstraint::new(&topology, vec![(0, 1, edge_var)], vec![(0, source_var)], vec![(0, v0), (1, v1)]);
 let id = registry.register(Box::new(constraint), vec![], false, None);
 queue.resize(db.num_variables(), registry.len());

 let mut ctx = InitializationContext::new(&mut db, &mut watchers, &mut queue, id);
 let ok = registry.get_mut(id).initialize(&mut ctx);
 assert!(ok);
 assert!(db.current(v1).is_subset_of(&not_reachable_mask()));
 }

 #[test]
 fn unreachable_explanation_names_exactly_the_min_cut_edges() {
 // A diamond: 0 is the source, 3 the target, with two disjoint paths 0-1-3 and
 // 0-2-3. Blocking both edges into 3 is the only way to cut 0 off from it, so the
 // explanation must name exactly those two edges, not the open ones behind them.
 let topology = GridTopology::new(2, 2);
 let mut db = VariableDatabase::new();
 let mut watchers = WatcherStore::new(64);
 let mut queue = PropagationQueue::new();
 let mut registry = ConstraintRegistry::new();

 let e01 = bool_var(&mut db, &mut watchers, "e01");
 let e02 = bool_var(&mut db, &mut watchers, "e02");
 let e13 = bool_var(&mut db, &mut watchers, "e13");
 let e23 = bool_var(&mut db, &mut watchers, "e23");
 let source_var = bool_var(&mut db, &mut watchers, "s0");
 let vertex_vars: Vec<(VertexId, VarId)> = (0..4u32).map(|i| (i, bool_var(&mut db, &mut watchers, &format!("v{i}")))).collect();
 let v3 = vertex_vars[3].1;

 db.narrow(source_var, &is_source_mask(), crate::basic_types::ConstraintReference::Decision, None, &mut queue);
 db.narrow(e01, &open_mask(), crate::basic_types::ConstraintReference::Decision, None, &mut queue);
 db.narrow(e02, &open_mask(), crate::basic_types::ConstraintReference::Decision, None, &mut queue);
 db.narrow(e13, &blocked_mask(), crate::basic_types::ConstraintReference::Decision, None, &mut queue);
 db.narrow(e23, &blocked_mask(), crate::basic_types::ConstraintReference::Decision, None, &mut queue);

 let edges = vec![(0, 1, e01), (0, 2, e02), (1, 3, e13), (2, 3, e23)];
 let constraint = ReachabilityConstraint::new(&topology, edges, vec![(0, source_var)], vertex_vars);
 let id = registry.register(Box::new(constraint), vec![], false, None);
 queue.resize(db.num_variables(), registry.len());

 let mut ctx = InitializationContext::new(&mut db, &mut watchers, &mut queue, id);
 let ok = registry.get_mut(id).initialize(&mut ctx);
 assert!(ok);
 assert!(db.current(v3).is_subset_of(&not_reachable_mask()));

 let ts = db.last_modification_timestamp(v3).expect("v3 was narrowed");
 let entry = db.stack().get(ts);
 let explainer = entry.explainer.as_ref().expect("unreachability narrowing always carries an eager explainer");
 let historical = crate::engine::variables::HistoricalVariableDatabase::new(&db, ts);
 let mut literals = explainer(&historical);
 literals.sort_by_key(|l| l.variable());

 let mut expected = vec![Literal::new(e13, blocked_mask()), Literal::new(e23, blocked_mask())];
 expected.sort_by_key(|l| l.variable());

 assert_eq!(literals.len(), expected.len(), "exactly the two blocking edges, not the open ones behind them");
 for (actual, expected) in literals.iter().zip(expected.iter()) {
 assert_eq!(actual.variable(), expected.variable());
 assert_eq!(actual.mask(), expected.mask());
 }
 }
}
