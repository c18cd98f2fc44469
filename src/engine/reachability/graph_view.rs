//! A timestamped directed adjacency list with reversible edge changes.

use crate::engine::graph::VertexId;

#[derive(Clone, Copy, Debug)]
enum EdgeChange {
 Added(VertexId, VertexId),
 Removed(VertexId, VertexId),
}

impl EdgeChange {
 fn inverse(self) -> EdgeChange {
 match self {
 EdgeChange::Added(u, v) => EdgeChange::Removed(u, v),
 EdgeChange::Removed(u, v) => EdgeChange::Added(u, v),
 }
 }
}

/// A directed graph over a fixed vertex set, journalling every edge change against
/// the timestamp it happened at so it can be rewound (temporarily, for min-cut
/// construction) or permanently truncated (on backtrack).
#[derive(Debug, Default)]
pub struct GraphView {
 out_adj: Vec<Vec<VertexId>>,
 in_adj: Vec<Vec<VertexId>>,
 journal: Vec<(usize, EdgeChange)>,
}

impl GraphView {
 pub fn new(num_vertices: usize) -> Self {
 GraphView {
 out_adj: vec![Vec::new(); num_vertices],
 in_adj: vec![Vec::new(); num_vertices],
 journal: Vec::new(),
 }
 }

 pub fn num_vertices(&self) -> usize {
 self.out_adj.len()
 }

 pub fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
 self.out_adj[u as usize].contains(&v)
 }

 pub fn out_neighbors(&self, u: VertexId) -> &[VertexId] {
 &self.out_adj[u as usize]
 }

 pub fn in_neighbors(&self, v: VertexId) -> &[VertexId] {
 &self.in_adj[v as usize]
 }

 fn apply(&mut self, change: EdgeChange) {
 match change {
 EdgeChange::Added(u, v) => {
 if !self.has_edge(u, v) {
 self.out_adj[u as usize].push(v);
 self.in_adj[v as usize].push(u);
 }
 }
 EdgeChange::Removed(u, v) => {
 if let Some(pos) = self.out_adj[u as usize].iter().position(|&x| x == v) {
 self.out_adj[u as usize].remove(pos);
 }
 if let Some(pos) = self.in_adj[v as usize].iter().position(|&x| x == u) {
 self.in_adj[v as usize].remove(pos);
 }
 }
 }
 }

 /// Inserts `(u, v)` if absent, journalling the change at `timestamp`. Returns
 /// `false` if the edge was already present (a no-op, matching `narrow`'s
 /// idempotence).
 pub fn insert_edge(&mut self, timestamp: usize, u: VertexId, v: VertexId) -> bool {
 if self.has_edge(u, v) {
 return false;
 }
 self.apply(EdgeChange::Added(u, v));
 self.journal.push((timestamp, EdgeChange::Added(u, v)));
 true
 }

 pub fn remove_edge(&mut self, timestamp: usize, u: VertexId, v: VertexId) -> bool {
 if !self.has_edge(u, v) {
 return false;
 }
 self.apply(EdgeChange::Removed(u, v));
 self.journal.push((timestamp, EdgeChange::Removed(u, v)));
 true
 }

 /// Applies the inverse of every journalled change at or after `timestamp`, in
 /// reverse chronological order, without forgetting them; used for transient
 /// historical views. Pair with [`Self::fast_forward`] to restore the present state.
 pub fn rewind_to(&mut self, timestamp: usize) {
 for &(ts, change) in self.journal.iter().rev() {
 if ts < timestamp {
 break;
 }
 self.apply(change.inverse());
 }
 }

 /// Re-applies every journalled change at or after `timestamp`, in chronological
 /// order; the inverse of [`Self::rewind_to`] over the same timestamp.
 pub fn fast_forward(&mut self, timestamp: usize) {
 for &(ts, change) in &self.journal {
 if ts >= timestamp {
 self.apply(change);
 }
 }
 }

 /// Permanently forgets every journalled change at or after `timestamp`. The
 /// caller must have already called [`Self::rewind_to`] with the same timestamp so
 /// the adjacency itself reflects the truncation.
 pub fn truncate_from(&mut self, timestamp: usize) {
 self.journal.retain(|&(ts, _)| ts < timestamp);
 }

 /// Re-inserts every edge this graph has ever removed and currently lacks, without
 /// touching the journal. Used to bring blocked edges back into the topology for a
 /// transient min-cut construction; returns exactly the edges it added, so the
 /// caller can undo the operation with [`Self::remove_edges`] once done. Edges that
 /// are still present (never removed, or removed then re-inserted) are left alone.
 pub fn restore_removed_edges(&mut self) -> Vec<(VertexId, VertexId)> {
 let mut restored = Vec::new();
 for &(_, change) in &self.journal {
 if let EdgeChange::Removed(u, v) = change {
 if !self.has_edge(u, v) {
 self.apply(EdgeChange::Added(u, v));
 restored.push((u, v));
 }
 }
 }
 restored
 }

 /// Removes exactly the given edges, without touching the journal; the inverse of
 /// [`Self::restore_removed_edges`].
 pub fn remove_edges(&mut self, edges: &[(VertexId, VertexId)]) {
 for &(u, v) in edges {
 self.apply(EdgeChange::Removed(u, v));
 }
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn rewind_then_fast_forward_round_trips() {
 let mut graph = GraphView::new(3);
 graph.insert_edge(0, 0, 1);
 graph.insert_edge(1, 1, 2);
 graph.remove_edge(2, 0, 1);
 assert!(!graph.has_edge(0, 1));
 assert!(graph.has_edge(1, 2));

 graph.rewind_to(1);
 assert!(graph.has_edge(0, 1));
 assert!(!graph.has_edge(1, 2));

 graph.fast_forward(1);
 assert!(!graph.has_edge(0, 1));
 assert!(graph.has_edge(1, 2));
 }

 #[test]
 fn truncate_forgets_future_changes_permanently() {
 let mut graph = GraphView::new(2);
 graph.insert_edge(0, 0, 1);
 graph.rewind_to(0);
 graph.truncate_from(0);
 assert!(!graph.has_edge(0, 1));
 graph.fast_forward(0);
 assert!(!graph.has_edge(0, 1), "truncated changes must not be replayable");
 }

 #[test]
 fn restore_removed_edges_brings_back_only_what_was_removed() {
 let mut graph = GraphView::new(3);
 graph.insert_edge(0, 0, 1);
 graph.insert_edge(1, 1, 2);
 graph.remove_edge(2, 0, 1);
 assert!(!graph.has_edge(0, 1));
 assert!(graph.has_edge(1, 2));

 let restored = graph.restore_removed_edges();
 assert_eq!(restored, vec![(0, 1)], "only the removed edge comes back, not a re-insertion of what's already there");
 assert!(graph.has_edge(0, 1));
 assert!(graph.has_edge(1, 2));

 graph.remove_edges(&restored);
 assert!(!graph.has_edge(0, 1));
 assert!(graph.has_edge(1, 2));
 }
}
