use crate::basic_types::VarId;

use super::atom::AtomId;

/// A dense id for a rule body. Several atoms may share one body when a
/// rule has several heads (a disjunctive or choice rule normalized to one body term).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Per-body bookkeeping. `positive_same_scc` holds the body's positive literals that
/// belong to the same strongly connected component as its heads; these are the only
/// literals that can make the body cyclically dependent on its own heads and therefore
/// the only ones this analyzer must track. `heads` are the atoms this body can source.
#[derive(Clone, Debug)]
pub struct BodyState {
 pub var: VarId,
 pub scc: u32,
 pub positive_same_scc: Vec<AtomId>,
 pub heads: Vec<AtomId>,
 /// Count of atoms currently citing this body as their valid source.
 pub num_watching: u32,
 pub num_unsourced_lits: u32,
}

impl BodyState {
 pub fn new(var: VarId, scc: u32, positive_same_scc: Vec<AtomId>, heads: Vec<AtomId>) -> Self {
 let num_unsourced_lits = positive_same_scc.len() as u32;
 BodyState {
 var,
 scc,
 positive_same_scc,
 heads,
 num_watching: 0,
 num_unsourced_lits,
 }
 }

 /// A body with no same-SCC positive literals can never become a source of cyclic
 /// support; it sources its heads unconditionally whenever it is true.
 pub fn is_external(&self) -> bool {
 self.positive_same_scc.is_empty()
 }
}
