//! Decision-level bookkeeping: a contiguous timestamp range per level,
//! plus the reverse lookup "which level was timestamp `t` made at" that conflict
//! analysis and LBD computation need.

use crate::basic_types::VarId;

/// One decision level: `[start_ts, end_ts)` over the assignment stack, and the
/// variable branched on to enter it (`None` at level 0, the root).
#[derive(Clone, Copy, Debug)]
pub struct DecisionLevel {
 pub start_ts: usize,
 pub decision_variable: Option<VarId>,
}

/// Tracks the decision-level boundaries over the assignment stack's timestamps.
/// Level 0 (the root) always exists and starts at timestamp 0.
#[derive(Debug)]
pub struct DecisionLevels {
 levels: Vec<DecisionLevel>,
}

impl Default for DecisionLevels {
 fn default() -> Self {
 DecisionLevels {
 levels: vec![DecisionLevel {
 start_ts: 0,
 decision_variable: None,
 }],
 }
 }
}

impl DecisionLevels {
 pub fn new() -> Self {
 DecisionLevels::default()
 }

 /// The current (deepest) decision level's index.
 pub fn current_level(&self) -> usize {
 self.levels.len() - 1
 }

 /// Opens a new decision level starting at `start_ts`, branching on `decision_variable`.
 pub fn push(&mut self, start_ts: usize, decision_variable: VarId) -> usize {
 self.levels.push(DecisionLevel {
 start_ts,
 decision_variable: Some(decision_variable),
 });
 self.current_level()
 }

 /// Drops every level above `level`, returning the timestamp the assignment stack
 /// must be rewound to.
 pub fn backtrack_to(&mut self, level: usize) -> usize {
 let rewind_ts = self.levels[level + 1].start_ts;
 self.levels.truncate(level + 1);
 rewind_ts
 }

 /// The decision level timestamp `t` belongs to: the greatest level whose
 /// `start_ts <= t`.
 pub fn level_of_timestamp(&self, t: usize) -> usize {
 match self.levels.binary_search_by(|level| level.start_ts.cmp(&t)) {
 Ok(i) => i,
 Err(0) => 0,
 Err(i) => i - 1,
 }
 }

 pub fn decision_variable_at(&self, level: usize) -> Option<VarId> {
 self.levels.get(level).and_then(|l| l.decision_variable)
 }

 pub fn len(&self) -> usize {
 self.levels.len()
 }

 pub fn is_empty(&self) -> bool {
 false
 }
}
