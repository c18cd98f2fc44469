use crate::branching::{DecisionHeuristic, GeometricRestartPolicy, RestartPolicy};
use crate::engine::sat::{LEARNED_SCALAR, PERMANENT_LBD_THRESHOLD, PURGE_PERCENT};

/// Tunable solver constants.
/// The clause-purging thresholds are compiled-in constants elsewhere in the crate
/// (`engine::sat::{PERMANENT_LBD_THRESHOLD, LEARNED_SCALAR, PURGE_PERCENT}`); they are
/// re-exported here so callers configuring a [`crate::api::Solver`] can see the values
/// actually in effect without hunting through the `sat` module.
pub struct SolverOptions {
 /// The word width the watcher store buckets variables into.
 pub propagator_word_width: u32,
 /// Seeds the default decision heuristic's tie-breaking randomization. Has no
 /// effect if `decision_heuristic` is `Some`, since a caller-supplied heuristic
 /// owns its own source of randomness.
 pub rng_seed: u64,
 /// `None` builds a [`crate::branching::FirstFailHeuristic`] seeded from `rng_seed`.
 pub decision_heuristic: Option<Box<dyn DecisionHeuristic>>,
 pub restart_policy: Box<dyn RestartPolicy>,
}

impl SolverOptions {
 pub fn permanent_lbd_threshold(&self) -> u32 {
 PERMANENT_LBD_THRESHOLD
 }

 pub fn learned_scalar(&self) -> f64 {
 LEARNED_SCALAR
 }

 pub fn purge_percent(&self) -> f64 {
 PURGE_PERCENT
 }
}

impl std::fmt::Debug for SolverOptions {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 f.debug_struct("SolverOptions")
.field("propagator_word_width", &self.propagator_word_width)
.field("rng_seed", &self.rng_seed)
.finish_non_exhaustive()
 }
}

impl Default for SolverOptions {
 fn default() -> Self {
 SolverOptions {
 propagator_word_width: 64,
 rng_seed: 42,
 decision_heuristic: None,
 restart_policy: Box::new(GeometricRestartPolicy::default()),
 }
 }
}
