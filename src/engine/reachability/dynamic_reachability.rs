//! A single-source reachability oracle over a [`GraphView`]. Recomputes by full BFS
//! whenever `refresh()` is called on a dirty oracle, rather than incrementally
//! propagating maybe-shorter/maybe-longer invalidation queues edge-by-edge; a
//! deliberate simplification logged in DESIGN.md under "Dynamic reachability", which
//! preserves every externally observable guarantee (`is_reachable`, `distance`,
//! the per-refresh changed-vertex list) at the cost of doing more work per refresh.

use std::collections::VecDeque;

use crate::engine::graph::VertexId;

use super::graph_view::GraphView;

pub const UNREACHABLE: u32 = u32::MAX;

/// Tracks `d[v]` (shortest distance from `source`) and `nShortestPred[v]` (count of
/// in-neighbours lying on a shortest path), refreshed in batches.
#[derive(Debug)]
pub struct DynamicReachability {
 source: VertexId,
 dist: Vec<u32>,
 num_shortest_pred: Vec<u32>,
 dirty: bool,
}

impl DynamicReachability {
 pub fn new(source: VertexId, num_vertices: usize) -> Self {
 let mut oracle = DynamicReachability {
 source,
 dist: vec![UNREACHABLE; num_vertices],
 num_shortest_pred: vec![0; num_vertices],
 dirty: true,
 };
 oracle.dist[source as usize] = 0;
 oracle
 }

 pub fn source(&self) -> VertexId {
 self.source
 }

 /// Marks this oracle stale; the next [`Self::refresh`] recomputes from scratch
 /// ("batched mode accumulates adds/removes until `refresh()`").
 pub fn mark_dirty(&mut self) {
 self.dirty = true;
 }

 pub fn is_dirty(&self) -> bool {
 self.dirty
 }

 /// Self-reachability is excluded.
 pub fn is_reachable(&self, v: VertexId) -> bool {
 v != self.source && self.dist[v as usize] != UNREACHABLE
 }

 pub fn distance(&self, v: VertexId) -> Option<u32> {
 (self.dist[v as usize] != UNREACHABLE).then_some(self.dist[v as usize])
 }

 pub fn num_shortest_predecessors(&self, v: VertexId) -> u32 {
 self.num_shortest_pred[v as usize]
 }

 /// Recomputes reachability over `graph`'s current adjacency; returns every vertex
 /// whose reachability (not merely its distance) changed since the prior refresh.
 /// A no-op, returning an empty list, when the oracle isn't dirty.
 pub fn refresh(&mut self, graph: &GraphView) -> Vec<VertexId> {
 if !self.dirty {
 return Vec::new();
 }
 self.dirty = false;

 let n = self.dist.len();
 let mut dist = vec![UNREACHABLE; n];
 let mut num_shortest_pred = vec![0u32; n];
 dist[self.source as usize] = 0;

 let mut queue = VecDeque::new();
 queue.push_back(self.source);
 while let Some(u) = queue.pop_front() {
 for &w in graph.out_neighbors(u) {
 let candidate = dist[u as usize] + 1;
 if candidate < dist[w as usize] {
 dist[w as usize] = candidate;
 num_shortest_pred[w as usize] = 1;
 queue.push_back(w);
 } else if candidate == dist[w as usize] {
 num_shortest_pred[w as usize] += 1;
 }
 }
 }

 let mut changed = Vec::new();
 for v in 0..n as VertexId {
 if self.is_reachable(v) != (v != self.source && dist[v as usize] != UNREACHABLE) {
 changed.push(v);
 }
 }

 self.dist = dist;
 self.num_shortest_pred = num_shortest_pred;
 changed
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn reachability_follows_inserted_edges() {
 let mut graph = GraphView::new(3);
 graph.insert_edge(0, 0, 1);
 let mut oracle = DynamicReachability::new(0, 3);
 let changed = oracle.refresh(&graph);
 assert!(changed.contains(&1));
 assert!(oracle.is_reachable(1));
 assert!(!oracle.is_reachable(2));
 assert_eq!(oracle.distance(1), Some(1));
 }

 #[test]
 fn removing_the_only_path_loses_reachability() {
 let mut graph = GraphView::new(2);
 graph.insert_edge(0, 0, 1);
 let mut oracle = DynamicReachability::new(0, 2);
 oracle.refresh(&graph);
 assert!(oracle.is_reachable(1));

 graph.remove_edge(1, 0, 1);
 oracle.mark_dirty();
 let changed = oracle.refresh(&graph);
 assert!(changed.contains(&1));
 assert!(!oracle.is_reachable(1));
 }

 #[test]
 fn refresh_is_a_no_op_when_not_dirty() {
 let graph = GraphView::new(2);
 let mut oracle = DynamicReachability::new(0, 2);
 oracle.refresh(&graph);
 assert!(oracle.refresh(&graph).is_empty());
 }
}
