use super::{VariablePropagatorOps, WatchKind, WatcherHandle};
use crate::basic_types::{ConstraintId, ValueSet};
use crate::engine::variables::propagation_queue::PropagationQueue;

/// The `d == 1` specialisation: a single-valued variable never changes, so there is
/// nothing to watch.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPropagator;

impl VariablePropagatorOps for NoopPropagator {
 fn add_watcher(&mut self, _sink: ConstraintId, _kind: WatchKind) -> WatcherHandle {
 WatcherHandle::new(0, 0)
 }

 fn add_value_watcher(&mut self, _sink: ConstraintId, _watch_mask: ValueSet) -> WatcherHandle {
 WatcherHandle::new(0, 0)
 }

 fn set_watcher_enabled(&mut self, _handle: WatcherHandle, _sink: ConstraintId, _enabled: bool) -> bool {
 false
 }

 fn remove_watcher(&mut self, _handle: WatcherHandle, _sink: ConstraintId) {}

 fn trigger(&mut self, _prev: &ValueSet, _current: &ValueSet, _queue: &mut PropagationQueue) -> bool {
 true
 }

 fn num_watches(&self) -> usize {
 0
 }
}
