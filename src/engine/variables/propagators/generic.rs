use super::segments::KindSegments;
use super::{VariablePropagatorOps, WatchKind, WatcherHandle};
use crate::basic_types::{ConstraintId, ValueSet};
use crate::engine::variables::propagation_queue::PropagationQueue;

/// The `d > W` specialisation: value-watch masks are kept as full [`ValueSet`]s since
/// they no longer fit a machine word.
#[derive(Clone, Debug, Default)]
pub struct GenericPropagator {
 segments: KindSegments<ValueSet>,
}

impl VariablePropagatorOps for GenericPropagator {
 fn add_watcher(&mut self, sink: ConstraintId, kind: WatchKind) -> WatcherHandle {
 self.segments.add_watcher(sink, kind)
 }

 fn add_value_watcher(&mut self, sink: ConstraintId, watch_mask: ValueSet) -> WatcherHandle {
 self.segments.add_value_watcher(sink, watch_mask)
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
 fn value_watch_over_wide_domain() {
 let mut propagator = GenericPropagator::default();
 let sink = ConstraintId::new(0);
 let mut mask = ValueSet::new_empty(100);
 mask.set(70, true);
 propagator.add_value_watcher(sink, mask);

 let mut queue = PropagationQueue::new();
 let prev = ValueSet::new_full(100);
 let mut current = ValueSet::new_full(100);
 current.set(70, false);
 propagator.trigger(&prev, &current, &mut queue);
 assert_eq!(queue.pop_constraint(), Some(sink));
 }
}
