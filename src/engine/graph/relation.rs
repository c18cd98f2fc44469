//! An algebraic `Relation<T>`: a composable `G.vertex -> T` mapping, built from a
//! topology link composed with a named per-vertex data lookup.
//!
//! Closures can't be compared for equality, so a [`Relation`] carries a small
//! structural key (the link plus a [`DataTableId`] identifying *which* per-vertex data
//! table the lookup reads from) alongside the lookup closure itself. Two relations
//! with equal keys are required by callers to use the same lookup function; equality
//! only inspects the key. Composing a direct lookup with a link eagerly fuses them
//! into one `Linked` value rather than nesting a wrapper, so `mapping_relation(link,
//! vertex_to_data)` and a directly-built `topology_link_graph_relation(link, data)`
//! with the same link and table compare equal,

use std::rc::Rc;

use super::topology::{Topology, TopologyLink, VertexId};

/// Identifies a per-vertex data table a [`Relation`] reads from (e.g. "the array of
/// edge-open variables", "the array of cell variables"). Two relations over the same
/// table must share the same lookup closure; only the id participates in equality.
pub type DataTableId = u32;

/// A post-lookup transform applied to the resolved value, tracked structurally so
/// that, e.g., `invert(direct(t))` still compares equal to another independently
/// built `invert(direct(t))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationTransform {
 Identity,
 Invert,
 UnionWith(DataTableId),
 IntersectWith(DataTableId),
}

/// The structural identity of a relation: the link walked (if any), the data table
/// read, and the transform applied. Two relations are *equivalent*
/// iff their keys are equal and they are evaluated over the same topology.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RelationKey {
 link: Option<TopologyLink>,
 table: DataTableId,
 transform: RelationTransform,
}

/// A composable `vertex -> T` mapping. Construct with
/// [`Relation::direct`], optionally narrow with [`Relation::via_link`], and optionally
/// wrap with [`Relation::inverted`]/[`Relation::union_with`]/[`Relation::intersect_with`].
#[derive(Clone)]
pub struct Relation<T> {
 key: RelationKey,
 lookup: Rc<dyn Fn(VertexId) -> Option<T>>,
}

impl<T> std::fmt::Debug for Relation<T> {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 f.debug_struct("Relation").field("key", &self.key).finish()
 }
}

impl<T> PartialEq for Relation<T> {
 fn eq(&self, other: &Self) -> bool {
 self.key == other.key
 }
}
impl<T> Eq for Relation<T> {}

impl<T: 'static> Relation<T> {
 /// A direct `vertex -> T` lookup from a named data table.
 pub fn direct(table: DataTableId, lookup: impl Fn(VertexId) -> Option<T> + 'static) -> Self {
 Relation {
 key: RelationKey {
 link: None,
 table,
 transform: RelationTransform::Identity,
 },
 lookup: Rc::new(lookup),
 }
 }

 /// Composes this relation with a topology link walked first: the resulting
 /// relation resolves `v` by walking `link` from `v`, then applying this
 /// relation's lookup at the destination. Fuses rather than nests, so the key records the
 /// link directly alongside the original table/transform.
 pub fn via_link(self, link: TopologyLink) -> Self {
 Relation {
 key: RelationKey {
 link: Some(link),
 table: self.key.table,
 transform: self.key.transform,
 },
 lookup: self.lookup,
 }
 }

 pub fn inverted(self) -> Self
 where
 T: Invertible,
 {
 let transform = match self.key.transform {
 RelationTransform::Identity => RelationTransform::Invert,
 RelationTransform::Invert => RelationTransform::Identity,
 other => other,
 };
 let lookup = self.lookup;
 Relation {
 key: RelationKey { transform,..self.key },
 lookup: Rc::new(move |v| lookup(v).map(|t| t.invert())),
 }
 }

 /// Evaluates this relation at vertex `v` against `topology`: walks the link (if
 /// any), then applies the lookup. Fails (`None`) if the link doesn't resolve.
 pub fn evaluate(&self, v: VertexId, topology: &dyn Topology) -> Option<T> {
 let target = match &self.key.link {
 Some(link) => link.resolve(topology, v)?,
 None => v,
 };
 (self.lookup)(target)
 }

 /// Whether `self` and `other` are the same relation: same link-resolution
 /// behaviour over `topology`, same table, same transform.
 pub fn equivalent_over(&self, other: &Relation<T>, topology: &dyn Topology) -> bool {
 if self.key.table != other.key.table || self.key.transform != other.key.transform {
 return false;
 }
 match (&self.key.link, &other.key.link) {
 (None, None) => true,
 (Some(a), Some(b)) => a.equivalent_over(b, topology),
 _ => (0..topology.num_vertices()).all(|v| {
 let resolve = |link: &Option<TopologyLink>| match link {
 Some(l) => l.resolve(topology, v),
 None => Some(v),
 };
 resolve(&self.key.link) == resolve(&other.key.link)
 }),
 }
 }

 pub fn key(&self) -> &RelationKey {
 &self.key
 }
}

/// Values a [`Relation`] can be asked to invert.
pub trait Invertible {
 fn invert(self) -> Self;
}
