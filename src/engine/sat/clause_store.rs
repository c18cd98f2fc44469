//! Activity-based clause purging: decay on backtrack, rescaling to
//! avoid float overflow, and periodic purge of the worst unlocked temporary clauses
//! once the temporary pool outgrows the budget.

use crate::basic_types::ConstraintId;
use crate::engine::cp::{ConstraintRegistry, WatcherStore};

use super::clause_constraint::ClauseConstraint;

/// A learned clause is *permanent* when its LBD at learn time is at or
/// below this threshold; otherwise it is *temporary* and subject to activity decay
/// and purging.
pub const PERMANENT_LBD_THRESHOLD: u32 = 5;
/// Temporary clauses are purged once they exceed `LEARNED_SCALAR * |originalConstraints|`.
pub const LEARNED_SCALAR: f64 = 2.0;
/// The fraction of eligible (unlocked) temporary clauses discarded per purge.
pub const PURGE_PERCENT: f64 = 0.5;
const ACTIVITY_RESCALE_THRESHOLD: f32 = 1e10;
const ACTIVITY_RESCALE_FACTOR: f32 = 1e-10;
const ACTIVITY_DECAY_FACTOR: f32 = 1.0 / 0.95;

fn downcast_mut(registry: &mut ConstraintRegistry, id: ConstraintId) -> Option<&mut ClauseConstraint> {
 registry.get_mut(id).as_any_mut().downcast_mut::<ClauseConstraint>()
}

fn downcast(registry: &ConstraintRegistry, id: ConstraintId) -> Option<&ClauseConstraint> {
 registry.get(id).as_any().downcast_ref::<ClauseConstraint>()
}

/// Scales the shared activity increment by `1/0.95`.
pub fn decay_activities(activity_increment: &mut f32) {
 *activity_increment *= ACTIVITY_DECAY_FACTOR;
}

/// Bumps a single clause's activity by the current increment. If the
/// bump pushes any activity past `1e10`, every temporary clause's activity and the
/// shared increment are rescaled by `1e-10`.
pub fn bump_activity(registry: &mut ConstraintRegistry, id: ConstraintId, activity_increment: &mut f32) {
 let overflowed = if let Some(clause) = downcast_mut(registry, id) {
 if let Some(meta) = &mut clause.learned {
 meta.activity += *activity_increment;
 meta.activity > ACTIVITY_RESCALE_THRESHOLD
 } else {
 false
 }
 } else {
 false
 };

 if overflowed {
 for other in registry.ids() {
 if let Some(clause) = downcast_mut(registry, other) {
 if let Some(meta) = &mut clause.learned {
 meta.activity *= ACTIVITY_RESCALE_FACTOR;
 }
 }
 }
 *activity_increment *= ACTIVITY_RESCALE_FACTOR;
 }
}

/// Whether the temporary-clause pool has outgrown its budget and should be purged.
pub fn should_purge(registry: &ConstraintRegistry, num_original_constraints: usize) -> bool {
 let num_temporary = registry
.ids()
.filter(|&id| downcast(registry, id).is_some_and(|c| c.learned.as_ref().is_some_and(|m| !m.permanent)))
.count();
 num_temporary as f64 > LEARNED_SCALAR * num_original_constraints as f64
}

/// Selects the bottom `PURGE_PERCENT` of unlocked temporary clauses for deletion,
/// sorted so binary clauses come first (cheapest to keep, so they're purged last),
/// then by ascending activity.
pub fn select_purge_candidates(registry: &ConstraintRegistry) -> Vec<ConstraintId> {
 let mut temporary: Vec<(ConstraintId, bool, f32)> = registry
.ids()
.filter_map(|id| {
 let clause = downcast(registry, id)?;
 let meta = clause.learned.as_ref()?;
 (!meta.permanent && !meta.locked).then_some((id, clause.len() == 2, meta.activity))
 })
.collect();

 // Binary clauses sort first (as if maximally active); the rest descend by
 // activity so the least active land at the end of the vector.
 temporary.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal)));

 let purge_count = (temporary.len() as f64 * PURGE_PERCENT).floor() as usize;
 temporary.into_iter().rev().take(purge_count).map(|(id, _, _)| id).collect()
}

/// Disables a purge candidate: removes its two watchers so it stops reacting to
/// narrowings, without shifting any other [`ConstraintId`].
pub fn purge(registry: &mut ConstraintRegistry, id: ConstraintId, watchers: &mut WatcherStore) {
 if let Some(clause) = downcast_mut(registry, id) {
 clause.disable(id, watchers);
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::basic_types::{Literal, ValueSet, VarId};
 use crate::engine::sat::clause_constraint::LearnedMetadata;

 fn learned_clause(len: usize, activity: f32, locked: bool, permanent: bool) -> Box<ClauseConstraint> {
 let literals = (0..len)
.map(|i| Literal::new(VarId::new(i as u32), ValueSet::new_full(2)))
.collect();
 Box::new(ClauseConstraint::new(
 literals,
 Some(LearnedMetadata {
 lbd: 3,
 activity,
 permanent,
 step_learned: 0,
 promotion_source: None,
 graph_relation_info: None,
 locked,
 }),
 ))
 }

 #[test]
 fn purge_skips_locked_and_permanent_clauses() {
 let mut registry = ConstraintRegistry::new();
 let locked = registry.register(learned_clause(3, 0.1, true, false), vec![], true, None);
 let permanent = registry.register(learned_clause(3, 0.1, false, true), vec![], true, None);
 let purgeable = registry.register(learned_clause(3, 0.1, false, false), vec![], true, None);

 let candidates = select_purge_candidates(&registry);
 assert!(!candidates.contains(&locked));
 assert!(!candidates.contains(&permanent));
 assert!(candidates.contains(&purgeable));
 }

 #[test]
 fn bump_rescales_every_activity_on_overflow() {
 let mut registry = ConstraintRegistry::new();
 let id = registry.register(learned_clause(3, 5.0, false, false), vec![], true, None);
 let mut increment = ACTIVITY_RESCALE_THRESHOLD;
 bump_activity(&mut registry, id, &mut increment);
 assert!(increment < ACTIVITY_RESCALE_THRESHOLD);
 let clause = downcast(&registry, id).unwrap();
 assert!(clause.learned.as_ref().unwrap().activity < 5.0);
 }

 #[test]
 fn decay_scales_increment_up() {
 let mut increment = 1.0_f32;
 decay_activities(&mut increment);
 assert!((increment - ACTIVITY_DECAY_FACTOR).abs() < 1e-6);
 }
}
