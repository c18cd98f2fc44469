/// A dense identifier for a registered constraint, returned by
/// `registerConstraint` and used to tag assignment-stack entries and
/// learned-clause promotion bookkeeping.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintId(u32);

impl ConstraintId {
 pub fn new(index: u32) -> Self {
 ConstraintId(index)
 }

 pub fn index(self) -> usize {
 self.0 as usize
 }
}

impl std::fmt::Debug for ConstraintId {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 write!(f, "c{}", self.0)
 }
}

/// What caused an assignment-stack entry to be written:
/// either a branching decision, or a registered constraint that narrowed the variable
/// during propagation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintReference {
 /// The narrowing was a branching decision, not implied by any constraint.
 Decision,
 /// The narrowing was implied by the named constraint during propagation.
 Constraint(ConstraintId),
}

impl ConstraintReference {
 pub fn is_decision(self) -> bool {
 matches!(self, ConstraintReference::Decision)
 }

 pub fn constraint_id(self) -> Option<ConstraintId> {
 match self {
 ConstraintReference::Decision => None,
 ConstraintReference::Constraint(id) => Some(id),
 }
 }
}
