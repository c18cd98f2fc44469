use crate::basic_types::VarId;
use crate::engine::ds::DenseId;

use super::body::BodyId;

/// A dense id for a rule head atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub u32);

impl DenseId for AtomId {
 fn dense_index(&self) -> usize {
 self.0 as usize
 }
}

/// Per-atom bookkeeping: the variable carrying its truth value, which strongly
/// connected component of the rule-dependency graph it belongs to, and which body
/// (if any) is currently sourcing it.
#[derive(Clone, Debug)]
pub struct AtomState {
 pub var: VarId,
 pub scc: u32,
 pub source: Option<BodyId>,
 pub source_is_valid: bool,
}

impl AtomState {
 pub fn new(var: VarId, scc: u32) -> Self {
 AtomState {
 var,
 scc,
 source: None,
 source_is_valid: false,
 }
 }
}
