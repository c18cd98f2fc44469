/// Decides when the solver should abandon its current search path and restart from
/// decision level 0. Concrete policies (Luby and friends) are out of scope; this
/// crate carries only the trait and one default geometric-sequence implementation.
pub trait RestartPolicy: std::fmt::Debug {
 /// Called once per conflict; returns `true` if the solver should restart now. A
 /// `true` return resets the policy's internal counter for the next run.
 fn should_restart(&mut self, conflicts_since_last_restart: usize) -> bool;
}

/// Restarts once the conflict count since the last restart reaches a threshold that
/// grows geometrically after each restart (multiplier `1.5`, matching common CDCL
/// practice), simplified to a closed-form geometric schedule since concrete restart
/// heuristics are out of scope here.
#[derive(Debug, Clone, Copy)]
pub struct GeometricRestartPolicy {
 initial_threshold: usize,
 growth_factor: f64,
 next_threshold: f64,
}

impl GeometricRestartPolicy {
 pub fn new(initial_threshold: usize, growth_factor: f64) -> Self {
 GeometricRestartPolicy {
 initial_threshold,
 growth_factor,
 next_threshold: initial_threshold as f64,
 }
 }
}

impl Default for GeometricRestartPolicy {
 fn default() -> Self {
 GeometricRestartPolicy::new(100, 1.5)
 }
}

impl RestartPolicy for GeometricRestartPolicy {
 fn should_restart(&mut self, conflicts_since_last_restart: usize) -> bool {
 if conflicts_since_last_restart as f64 >= self.next_threshold {
 self.next_threshold = (self.next_threshold * self.growth_factor).max(self.initial_threshold as f64 + 1.0);
 true
 } else {
 false
 }
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn restarts_once_threshold_reached_then_grows() {
 let mut policy = GeometricRestartPolicy::new(10, 2.0);
 assert!(!policy.should_restart(5));
 assert!(policy.should_restart(10));
 assert!(!policy.should_restart(10));
 assert!(policy.should_restart(20));
 }
}
