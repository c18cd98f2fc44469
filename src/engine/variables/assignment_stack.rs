use crate::basic_types::{ConstraintReference, Literal, ValueSet, VarId};

use super::variable_database::HistoricalVariableDatabase;

/// A lazily-materialised reason for a narrowing, captured by value from whatever the
/// propagating constraint knew at the time. Takes a read-only
/// historical view so it can still be asked for a reason after later narrowings have
/// moved the live domains on.
pub type Explainer = Box<dyn Fn(&HistoricalVariableDatabase) -> Vec<Literal>>;

/// One immutable entry of the append-only assignment log.
pub struct StackEntry {
 pub variable: VarId,
 pub prev_values: ValueSet,
 pub cause: ConstraintReference,
 pub explainer: Option<Explainer>,
 /// Timestamp of the previous entry that touched the same variable, if any;
 /// `valueAfter`/`valueBefore` walk this chain.
 pub prev_assignment_of: Option<usize>,
}

impl std::fmt::Debug for StackEntry {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 f.debug_struct("StackEntry")
.field("variable", &self.variable)
.field("prev_values", &self.prev_values)
.field("cause", &self.cause)
.field("has_explainer", &self.explainer.is_some())
.field("prev_assignment_of", &self.prev_assignment_of)
.finish()
 }
}

/// Append-only log of narrowings, binary-searchable by timestamp (its own index).
#[derive(Default)]
pub struct AssignmentStack {
 entries: Vec<StackEntry>,
}

impl std::fmt::Debug for AssignmentStack {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 f.debug_struct("AssignmentStack").field("len", &self.entries.len()).finish()
 }
}

impl AssignmentStack {
 pub fn new() -> Self {
 AssignmentStack::default()
 }

 /// The current timestamp watermark: the index the next push will occupy.
 pub fn len(&self) -> usize {
 self.entries.len()
 }

 pub fn is_empty(&self) -> bool {
 self.entries.is_empty()
 }

 pub fn push(&mut self, entry: StackEntry) -> usize {
 self.entries.push(entry);
 self.entries.len() - 1
 }

 pub fn get(&self, timestamp: usize) -> &StackEntry {
 &self.entries[timestamp]
 }

 /// Removes every entry from `new_len` onward, returning them in the order they
 /// must be undone (most recent first) so the caller can restore `current` values.
 pub fn truncate_from(&mut self, new_len: usize) -> Vec<StackEntry> {
 self.entries.split_off(new_len).into_iter().rev().collect()
 }
}
