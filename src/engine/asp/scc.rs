//! Tarjan's algorithm over the positive-atom dependency graph, used to assign each
//! atom and body the strongly connected component id that [`super::analyzer`] needs.

use std::collections::HashMap;

use super::atom::AtomId;

/// `edges[a]` lists the atoms that appear as a positive body literal in some rule
/// whose head is `a`, i.e. `a`'s dependencies.
pub fn tarjan_scc(num_atoms: u32, edges: &HashMap<AtomId, Vec<AtomId>>) -> Vec<u32> {
 struct State {
 index: Vec<Option<u32>>,
 low_link: Vec<u32>,
 on_stack: Vec<bool>,
 stack: Vec<u32>,
 next_index: u32,
 scc_of: Vec<u32>,
 next_scc: u32,
 }

 fn strongconnect(v: u32, edges: &HashMap<AtomId, Vec<AtomId>>, state: &mut State) {
 state.index[v as usize] = Some(state.next_index);
 state.low_link[v as usize] = state.next_index;
 state.next_index += 1;
 state.stack.push(v);
 state.on_stack[v as usize] = true;

 if let Some(successors) = edges.get(&AtomId(v)) {
 for &AtomId(w) in successors {
 if state.index[w as usize].is_none() {
 strongconnect(w, edges, state);
 state.low_link[v as usize] = state.low_link[v as usize].min(state.low_link[w as usize]);
 } else if state.on_stack[w as usize] {
 state.low_link[v as usize] = state.low_link[v as usize].min(state.index[w as usize].unwrap());
 }
 }
 }

 if state.low_link[v as usize] == state.index[v as usize].unwrap() {
 let scc = state.next_scc;
 state.next_scc += 1;
 loop {
 let w = state.stack.pop().unwrap();
 state.on_stack[w as usize] = false;
 state.scc_of[w as usize] = scc;
 if w == v {
 break;
 }
 }
 }
 }

 let n = num_atoms as usize;
 let mut state = State {
 index: vec![None; n],
 low_link: vec![0; n],
 on_stack: vec![false; n],
 stack: Vec::new(),
 next_index: 0,
 scc_of: vec![0; n],
 next_scc: 0,
 };

 for v in 0..num_atoms {
 if state.index[v as usize].is_none() {
 strongconnect(v, edges, &mut state);
 }
 }

 state.scc_of
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn two_atom_cycle_shares_one_component() {
 let mut edges = HashMap::new();
 edges.insert(AtomId(0), vec![AtomId(1)]);
 edges.insert(AtomId(1), vec![AtomId(0)]);
 let scc = tarjan_scc(2, &edges);
 assert_eq!(scc[0], scc[1]);
 }

 #[test]
 fn acyclic_chain_gets_distinct_components() {
 let mut edges = HashMap::new();
 edges.insert(AtomId(0), vec![AtomId(1)]);
 edges.insert(AtomId(1), vec![]);
 let scc = tarjan_scc(2, &edges);
 assert_ne!(scc[0], scc[1]);
 }
}
