use super::segments::KindSegments;
use super::{VariablePropagatorOps, WatchKind, WatcherHandle};
use crate::basic_types::{ConstraintId, ValueSet};
use crate::engine::variables::propagation_queue::PropagationQueue;

/// The `d == 2` specialisation. Index 0 is conventionally "false", index 1 "true": a
/// `LowerBoundChanged` watcher fires when false becomes impossible (the variable was
/// pinned true), `UpperBoundChanged` when true becomes impossible, matching
/// `became-true`/`became-false` from three named segments. `Solved`
/// and value watches are tracked in their own segments so registration doesn't need to
/// guess which of the other two a caller meant.
#[derive(Clone, Debug, Default)]
pub struct BooleanPropagator {
 segments: KindSegments<u8>,
}

impl VariablePropagatorOps for BooleanPropagator {
 fn add_watcher(&mut self, sink: ConstraintId, kind: WatchKind) -> WatcherHandle {
 self.segments.add_watcher(sink, kind)
 }

 fn add_value_watcher(&mut self, sink: ConstraintId, watch_mask: ValueSet) -> WatcherHandle {
 let mut mask: u8 = 0;
 if watch_mask.get(0) {
 mask |= 0b01;
 }
 if watch_mask.get(1) {
 mask |= 0b10;
 }
 self.segments.add_value_watcher(sink, mask)
 }

 fn set_watcher_enabled(&mut self, handle: WatcherHandle, sink: ConstraintId, enabled: bool) -> bool {
 self.segments.set_watcher_enabled(handle, sink, enabled)
 }

 fn remove_watcher(&mut self, handle: WatcherHandle, sink: ConstraintId) {
 self.segments.remove_watcher(handle, sink)
 }

 fn trigger(&mut self, prev: &ValueSet, current: &ValueSet, queue: &mut PropagationQueue) -> bool {
 self.segments.trigger(prev, current, queue)
 }

 fn num_watches(&self) -> usize {
 self.segments.num_watches()
 }
}

impl super::segments::ValueMask for u8 {
 fn becomes_unsatisfied(&self, prev: &ValueSet, current: &ValueSet) -> bool {
 let mut prev_bits: u8 = 0;
 if prev.get(0) {
 prev_bits |= 0b01;
 }
 if prev.get(1) {
 prev_bits |= 0b10;
 }
 let mut current_bits: u8 = 0;
 if current.get(0) {
 current_bits |= 0b01;
 }
 if current.get(1) {
 current_bits |= 0b10;
 }
 (prev_bits & self) != 0 && (current_bits & self) == 0
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::basic_types::ConstraintId;

 #[test]
 fn became_true_fires_on_losing_false() {
 let mut propagator = BooleanPropagator::default();
 let sink = ConstraintId::new(0);
 propagator.add_watcher(sink, WatchKind::LowerBoundChanged);
 let mut queue = PropagationQueue::new();
 let prev = ValueSet::new_full(2);
 let mut current = ValueSet::new_full(2);
 current.set(0, false);
 propagator.trigger(&prev, &current, &mut queue);
 assert_eq!(queue.pop_constraint(), Some(sink));
 }

 #[test]
 fn value_watcher_fires_when_masked_bit_removed() {
 let mut propagator = BooleanPropagator::default();
 let sink = ConstraintId::new(1);
 let mut mask = ValueSet::new_empty(2);
 mask.set(1, true);
 propagator.add_value_watcher(sink, mask);
 let mut queue = PropagationQueue::new();
 let prev = ValueSet::new_full(2);
 let mut current = ValueSet::new_full(2);
 current.set(1, false);
 propagator.trigger(&prev, &current, &mut queue);
 assert_eq!(queue.pop_constraint(), Some(sink));
 }
}
