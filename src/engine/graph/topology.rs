//! The graph-topology interface consumed by [`crate::engine::reachability::ReachabilityConstraint`]
//! and [`crate::engine::graph::promotion`]. Concrete topologies (grids,
//! digraphs) are out of scope for the core; [`crate::fixtures::GridTopology`] is a
//! demonstration implementation used only by this crate's own tests.

pub type VertexId = u32;

/// A directed edge-step: either the `i`-th outgoing or `i`-th incoming edge of the
/// current vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeStep {
 Outgoing(u32),
 Incoming(u32),
}

/// An ordered sequence of edge-steps resolving a source vertex to a destination
/// vertex. Two links are equivalent over a topology if they resolve identically
/// from every vertex; used by graph promotion's relation-equality test.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TopologyLink {
 steps: Vec<EdgeStep>,
}

impl TopologyLink {
 pub fn new(steps: Vec<EdgeStep>) -> Self {
 TopologyLink { steps }
 }

 pub fn resolve(&self, topology: &dyn Topology, from: VertexId) -> Option<VertexId> {
 let mut vertex = from;
 for step in &self.steps {
 vertex = match *step {
 EdgeStep::Outgoing(i) => topology.outgoing_destination(vertex, i)?,
 EdgeStep::Incoming(i) => topology.incoming_source(vertex, i)?,
 };
 }
 Some(vertex)
 }

 pub fn equivalent_over(&self, other: &TopologyLink, topology: &dyn Topology) -> bool {
 (0..topology.num_vertices()).all(|v| self.resolve(topology, v) == other.resolve(topology, v))
 }
}

/// Reacts to an edge becoming present/absent, dispatched by a topology implementation
/// that backs edges with variables.
pub trait EdgeChangeListener {
 fn on_edge_changed(&mut self, u: VertexId, v: VertexId, now_present: bool);
}

pub trait Topology: std::fmt::Debug {
 fn num_vertices(&self) -> u32;
 fn is_valid_vertex(&self, v: VertexId) -> bool {
 v < self.num_vertices()
 }
 fn num_outgoing(&self, v: VertexId) -> u32;
 fn outgoing_destination(&self, v: VertexId, i: u32) -> Option<VertexId>;
 fn num_incoming(&self, v: VertexId) -> u32;
 fn incoming_source(&self, v: VertexId, i: u32) -> Option<VertexId>;

 fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
 (0..self.num_outgoing(u)).any(|i| self.outgoing_destination(u, i) == Some(v))
 }

 /// A direct single-step link from `u` to `v` if one of `u`'s outgoing edges leads
 /// there, else `None`.
 fn topology_link(&self, u: VertexId, v: VertexId) -> Option<TopologyLink> {
 (0..self.num_outgoing(u))
.find(|&i| self.outgoing_destination(u, i) == Some(v))
.map(|i| TopologyLink::new(vec![EdgeStep::Outgoing(i)]))
 }
}

/// Additional capability for topologies whose edges are themselves modelled as
/// variables, consumed specifically by reachability constraints.
pub trait EdgeTopology: Topology {
 fn vertex_for_source_edge(&self, u: VertexId, v: VertexId) -> Option<VertexId>;
 fn source_edge_for_vertex(&self, edge_vertex: VertexId) -> Option<(VertexId, VertexId, bool)>;
}
