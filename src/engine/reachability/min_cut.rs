//! Minimum edge cut via Edmonds–Karp max-flow: blocked edges cost [`CLOSED_EDGE_FLOW`] to cut, every other edge
//! [`OPEN_EDGE_FLOW`]; effectively uncuttable, so the min cut is built entirely from
//! blocked-edge certificates whenever one exists.

use std::collections::{HashMap, VecDeque};

use crate::engine::graph::VertexId;

use super::graph_view::GraphView;

pub const CLOSED_EDGE_FLOW: i64 = 1;
pub const OPEN_EDGE_FLOW: i64 = i64::MAX / 4;

#[derive(Debug, Default)]
struct FlowNetwork {
 capacity: Vec<HashMap<VertexId, i64>>,
}

impl FlowNetwork {
 fn new(num_vertices: usize) -> Self {
 FlowNetwork {
 capacity: vec![HashMap::new(); num_vertices],
 }
 }

 fn add_edge(&mut self, u: VertexId, v: VertexId, cap: i64) {
 *self.capacity[u as usize].entry(v).or_insert(0) += cap;
 self.capacity[v as usize].entry(u).or_insert(0);
 }

 fn residual(&self, u: VertexId, v: VertexId) -> i64 {
 *self.capacity[u as usize].get(&v).unwrap_or(&0)
 }

 fn push_flow(&mut self, u: VertexId, v: VertexId, flow: i64) {
 *self.capacity[u as usize].get_mut(&v).expect("edge exists, found via BFS") -= flow;
 *self.capacity[v as usize].entry(u).or_insert(0) += flow;
 }

 /// Saturates augmenting paths found by BFS (Edmonds–Karp) until none remain.
 fn saturate(&mut self, source: VertexId, sink: VertexId) {
 loop {
 let n = self.capacity.len();
 let mut parent: Vec<Option<VertexId>> = vec![None; n];
 let mut visited = vec![false; n];
 visited[source as usize] = true;
 let mut queue = VecDeque::new();
 queue.push_back(source);

 while let Some(u) = queue.pop_front() {
 let neighbors: Vec<VertexId> = self.capacity[u as usize]
.iter()
.filter(|&(_, &cap)| cap > 0)
.map(|(&v, _)| v)
.collect();
 for v in neighbors {
 if !visited[v as usize] {
 visited[v as usize] = true;
 parent[v as usize] = Some(u);
 queue.push_back(v);
 }
 }
 }

 if !visited[sink as usize] {
 return;
 }

 let mut path = Vec::new();
 let mut v = sink;
 while let Some(u) = parent[v as usize] {
 path.push((u, v));
 v = u;
 }
 let bottleneck = path.iter().map(|&(u, v)| self.residual(u, v)).min().unwrap_or(0);
 if bottleneck == 0 {
 return;
 }
 for (u, v) in path {
 self.push_flow(u, v, bottleneck);
 }
 }
 }

 /// Vertices reachable from `source` in the residual graph once flow is saturated;
 /// the source side of the min cut.
 fn reachable_from(&self, source: VertexId) -> Vec<bool> {
 let n = self.capacity.len();
 let mut visited = vec![false; n];
 visited[source as usize] = true;
 let mut queue = VecDeque::new();
 queue.push_back(source);
 while let Some(u) = queue.pop_front() {
 for (&v, &cap) in &self.capacity[u as usize] {
 if cap > 0 && !visited[v as usize] {
 visited[v as usize] = true;
 queue.push_back(v);
 }
 }
 }
 visited
 }
}

/// A computed min cut: the blocked-edge certificate, plus which vertices remain on
/// `source`'s side of the saturated residual graph; other potential sources found
/// there share the same certificate.
#[derive(Debug, Clone)]
pub struct MinCutResult {
 pub cut_edges: Vec<(VertexId, VertexId)>,
 source_side: Vec<bool>,
}

impl MinCutResult {
 pub fn is_on_source_side(&self, v: VertexId) -> bool {
 self.source_side.get(v as usize).copied().unwrap_or(false)
 }
}

/// Computes a minimum `source -> sink` edge cut over `graph`: builds a
/// flow network where `is_blocked(u, v)` edges cost [`CLOSED_EDGE_FLOW`] and every
/// other edge [`OPEN_EDGE_FLOW`], saturates it, then returns the blocked edges
/// crossing from the source side of the residual cut to the sink side.
pub fn min_cut(graph: &GraphView, is_blocked: impl Fn(VertexId, VertexId) -> bool, source: VertexId, sink: VertexId) -> MinCutResult {
 let n = graph.num_vertices();
 let mut network = FlowNetwork::new(n);
 for u in 0..n as VertexId {
 for &v in graph.out_neighbors(u) {
 let cap = if is_blocked(u, v) { CLOSED_EDGE_FLOW } else { OPEN_EDGE_FLOW };
 network.add_edge(u, v, cap);
 }
 }

 network.saturate(source, sink);
 let reachable = network.reachable_from(source);

 let mut cut_edges = Vec::new();
 for u in 0..n as VertexId {
 if !reachable[u as usize] {
 continue;
 }
 for &v in graph.out_neighbors(u) {
 if !reachable[v as usize] && is_blocked(u, v) {
 cut_edges.push((u, v));
 }
 }
 }
 MinCutResult {
 cut_edges,
 source_side: reachable,
 }
}
