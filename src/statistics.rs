//! `key=value` statistic lines via `log::info!`.

use std::fmt::Display;

/// Emits one `name=value` line at `info` level. Intentionally a free function rather
/// than a `Logger` type: a global log target, not a per-solver one.
pub fn log_statistic(name: &str, value: impl Display) {
 log::info!("{name}={value}");
}

/// Search counters tracked across `ConstraintSolver::step` calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStatistics {
 pub num_decisions: u64,
 pub num_conflicts: u64,
 pub num_propagations: u64,
 pub num_restarts: u64,
 pub num_learned_clauses: u64,
 pub num_purged_clauses: u64,
}

impl SearchStatistics {
 pub fn new() -> Self {
 SearchStatistics::default()
 }

 pub fn log_statistics(&self) {
 log_statistic("numberOfDecisions", self.num_decisions);
 log_statistic("numberOfConflicts", self.num_conflicts);
 log_statistic("numberOfPropagations", self.num_propagations);
 log_statistic("numberOfRestarts", self.num_restarts);
 log_statistic("numberOfLearnedClauses", self.num_learned_clauses);
 log_statistic("numberOfPurgedClauses", self.num_purged_clauses);
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn fresh_statistics_are_all_zero() {
 let stats = SearchStatistics::new();
 assert_eq!(stats.num_decisions, 0);
 assert_eq!(stats.num_conflicts, 0);
 }
}
