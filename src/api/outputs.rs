//! On-disk formats names: a debug solution file and an optional decision
//! log. Neither is consulted by the solver itself; they exist purely for inspecting a
//! run after the fact.

use std::io::{self, Write};

use crate::basic_types::VarId;
use crate::engine::variables::VariableDatabase;

/// Writes one line per variable, `"<varId> <internalIndex>\n"`, in variable-id order,
/// UTF-16 encoded. Every variable must currently be solved (a singleton
/// value set); callers should only do this after `solve()` returns `Solved`.
pub fn write_debug_solution_file(writer: &mut impl Write, db: &VariableDatabase) -> io::Result<()> {
 let mut text = String::new();
 for index in 0..db.num_variables() as u32 {
 let var = VarId::new(index);
 let value_index = db
.current(var)
.index_of(true)
.expect("every variable must be solved before writing a debug solution file");
 text.push_str(&format!("{} {}\n", var.index(), value_index));
 }

 for unit in text.encode_utf16() {
 writer.write_all(&unit.to_le_bytes())?;
 }
 Ok(())
}

/// One branching decision: the decision level it was made at, the variable chosen, and
/// the value index it was narrowed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecisionLogEntry {
 pub level: usize,
 pub variable: VarId,
 pub value_index: u32,
}

/// Accumulates [`DecisionLogEntry`] records across a search run. Not wired into
/// [`crate::api::Solver`] automatically
/// opts in by pushing entries itself at each decision (e.g. from a custom
/// [`crate::branching::DecisionHeuristic`] wrapper).
#[derive(Clone, Debug, Default)]
pub struct DecisionLog {
 entries: Vec<DecisionLogEntry>,
}

impl DecisionLog {
 pub fn new() -> Self {
 DecisionLog::default()
 }

 pub fn record(&mut self, level: usize, variable: VarId, value_index: u32) {
 self.entries.push(DecisionLogEntry {
 level,
 variable,
 value_index,
 });
 }

 pub fn entries(&self) -> &[DecisionLogEntry] {
 &self.entries
 }

 pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
 let mut text = String::new();
 for entry in &self.entries {
 text.push_str(&format!("{} {} {}\n", entry.level, entry.variable.index(), entry.value_index));
 }
 for unit in text.encode_utf16() {
 writer.write_all(&unit.to_le_bytes())?;
 }
 Ok(())
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::basic_types::ConstraintReference;
 use crate::engine::variables::domain::Domain;
 use crate::engine::variables::PropagationQueue;

 #[test]
 fn debug_solution_file_round_trips_through_utf16() {
 let mut db = VariableDatabase::new();
 let mut queue = PropagationQueue::new();
 let var = db.create_variable("x", Domain::from_range(0, 2), None).unwrap();
 let mut mask = crate::basic_types::ValueSet::new_full(3);
 mask.set(0, false);
 mask.set(2, false);
 db.narrow(var, &mask, ConstraintReference::Decision, None, &mut queue);

 let mut buffer = Vec::new();
 write_debug_solution_file(&mut buffer, &db).unwrap();

 let units: Vec<u16> = buffer
.chunks_exact(2)
.map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
.collect();
 let text = String::from_utf16(&units).unwrap();
 assert_eq!(text, "0 1\n");
 }

 #[test]
 fn decision_log_records_in_order() {
 let mut log = DecisionLog::new();
 log.record(0, VarId::new(0), 1);
 log.record(1, VarId::new(2), 0);
 assert_eq!(log.entries().len(), 2);
 assert_eq!(log.entries()[1].variable, VarId::new(2));
 }
}
