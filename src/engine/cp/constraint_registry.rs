use crate::basic_types::{ConstraintId, VarId};

use super::constraint::Constraint;

/// One registered constraint: the trait object itself, the variables it was built
/// over, and the handful of flags the rest of the engine needs.
pub struct ConstraintEntry {
 pub constraint: Box<dyn Constraint>,
 pub variables: Vec<VarId>,
 pub is_learned: bool,
 pub promoted_from: Option<ConstraintId>,
 /// Set once this (learned) clause has itself been successfully promoted across
 /// the graph at least once.
 pub promoted_to_graph: bool,
}

impl std::fmt::Debug for ConstraintEntry {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 f.debug_struct("ConstraintEntry")
.field("constraint", &self.constraint)
.field("variables", &self.variables)
.field("is_learned", &self.is_learned)
.field("promoted_from", &self.promoted_from)
.field("promoted_to_graph", &self.promoted_to_graph)
.finish()
 }
}

/// Stores every constraint (original and learned) in a flat owned vector indexed by
/// [`ConstraintId`].
#[derive(Debug, Default)]
pub struct ConstraintRegistry {
 entries: Vec<ConstraintEntry>,
}

impl ConstraintRegistry {
 pub fn new() -> Self {
 ConstraintRegistry::default()
 }

 pub fn register(&mut self, constraint: Box<dyn Constraint>, variables: Vec<VarId>, is_learned: bool, promoted_from: Option<ConstraintId>) -> ConstraintId {
 let id = ConstraintId::new(self.entries.len() as u32);
 self.entries.push(ConstraintEntry {
 constraint,
 variables,
 is_learned,
 promoted_from,
 promoted_to_graph: false,
 });
 id
 }

 pub fn mark_promoted_to_graph(&mut self, id: ConstraintId) {
 self.entries[id.index()].promoted_to_graph = true;
 }

 pub fn get(&self, id: ConstraintId) -> &dyn Constraint {
 self.entries[id.index()].constraint.as_ref()
 }

 pub fn get_mut(&mut self, id: ConstraintId) -> &mut dyn Constraint {
 self.entries[id.index()].constraint.as_mut()
 }

 pub fn entry(&self, id: ConstraintId) -> &ConstraintEntry {
 &self.entries[id.index()]
 }

 pub fn variables_of(&self, id: ConstraintId) -> &[VarId] {
 &self.entries[id.index()].variables
 }

 pub fn is_learned(&self, id: ConstraintId) -> bool {
 self.entries[id.index()].is_learned
 }

 pub fn len(&self) -> usize {
 self.entries.len()
 }

 pub fn is_empty(&self) -> bool {
 self.entries.is_empty()
 }

 pub fn ids(&self) -> impl Iterator<Item = ConstraintId> {
 (0..self.entries.len()).map(|i| ConstraintId::new(i as u32))
 }
}
