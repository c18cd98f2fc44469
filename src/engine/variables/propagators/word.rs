use super::segments::KindSegments;
use super::{VariablePropagatorOps, WatchKind, WatcherHandle};
use crate::basic_types::{ConstraintId, ValueSet};
use crate::engine::variables::propagation_queue::PropagationQueue;

/// The `2 < d ≤ W` specialisation: value-watch masks fit in a single machine word, so
/// they're stored unboxed as `u64` rather than a heap-allocated [`ValueSet`].
#[derive(Clone, Debug, Default)]
pub struct WordPropagator {
 segments: KindSegments<u64>,
}

impl VariablePropagatorOps for WordPropagator {
 fn add_watcher(&mut self, sink: ConstraintId, kind: WatchKind) -> WatcherHandle {
 self.segments.add_watcher(sink, kind)
 }

 fn add_value_watcher(&mut self, sink: ConstraintId, watch_mask: ValueSet) -> WatcherHandle {
 let mut mask = 0u64;
 for i in watch_mask.iter_possible() {
 if i < 64 {
 mask |= 1u64 << i;
 }
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

#[cfg(test)]
mod tests {
 use super::*;
 use crate::basic_types::ConstraintId;

 #[test]
 fn value_watch_fires_when_last_masked_bit_goes() {
 let mut propagator = WordPropagator::default();
 let sink = ConstraintId::new(0);
 let mut mask = ValueSet::new_empty(10);
 mask.set(3, true);
 mask.set(4, true);
 propagator.add_value_watcher(sink, mask);

 let mut queue = PropagationQueue::new();
 let prev = ValueSet::new_full(10);
 let mut current = ValueSet::new_full(10);
 current.set(3, false);
 assert!(propagator.trigger(&prev, &current, &mut queue));
 assert_eq!(queue.pop_constraint(), None, "mask still has bit 4 possible");

 let mut next = current.clone();
 next.set(4, false);
 propagator.trigger(&current, &next, &mut queue);
 assert_eq!(queue.pop_constraint(), Some(sink));
 }
}
