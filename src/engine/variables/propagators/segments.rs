//! Shared trigger-and-transition logic for the boolean/word/generic specialisations.
//! They differ only in how a value-watch mask is represented and tested
//! (`ValueMask`); the four kind segments and the end→start walk are identical.

use super::{kind_segment, WatchKind, WatcherHandle, WatcherSegment, SEGMENT_VALUE};
use crate::basic_types::{ConstraintId, ValueSet};
use crate::engine::variables::propagation_queue::PropagationQueue;

/// A value-watch mask representation: `u64` for the word specialisation, `ValueSet`
/// for the generic one.
pub(super) trait ValueMask: Clone {
 fn becomes_unsatisfied(&self, prev: &ValueSet, current: &ValueSet) -> bool;
}

impl ValueMask for u64 {
 fn becomes_unsatisfied(&self, prev: &ValueSet, current: &ValueSet) -> bool {
 (word_bits(prev) & self) != 0 && (word_bits(current) & self) == 0
 }
}

impl ValueMask for ValueSet {
 fn becomes_unsatisfied(&self, prev: &ValueSet, current: &ValueSet) -> bool {
 prev.any_possible(self) && !current.any_possible(self)
 }
}

fn word_bits(set: &ValueSet) -> u64 {
 let mut bits = 0u64;
 for i in set.iter_possible() {
 if i < 64 {
 bits |= 1u64 << i;
 }
 }
 bits
}

#[derive(Clone, Debug, Default)]
pub(super) struct KindSegments<M> {
 pub any_change: WatcherSegment<()>,
 pub solved: WatcherSegment<()>,
 pub lower_bound: WatcherSegment<()>,
 pub upper_bound: WatcherSegment<()>,
 pub value: WatcherSegment<M>,
}

struct Transitions {
 any_change: bool,
 solved: bool,
 lower_bound_changed: bool,
 upper_bound_changed: bool,
}

fn detect_transitions(prev: &ValueSet, current: &ValueSet) -> Transitions {
 Transitions {
 any_change: prev != current,
 solved: current.is_singleton() && !prev.is_singleton(),
 lower_bound_changed: prev.index_of(true) != current.index_of(true),
 upper_bound_changed: prev.last_index_of(true) != current.last_index_of(true),
 }
}

impl<M: ValueMask> KindSegments<M> {
 pub(super) fn add_watcher(&mut self, sink: ConstraintId, kind: WatchKind) -> WatcherHandle {
 let segment = kind_segment(kind);
 let slot = match kind {
 WatchKind::AnyChange => self.any_change.add(sink, ()),
 WatchKind::Solved => self.solved.add(sink, ()),
 WatchKind::LowerBoundChanged => self.lower_bound.add(sink, ()),
 WatchKind::UpperBoundChanged => self.upper_bound.add(sink, ()),
 };
 WatcherHandle::new(segment, slot)
 }

 pub(super) fn add_value_watcher(&mut self, sink: ConstraintId, mask: M) -> WatcherHandle {
 let slot = self.value.add(sink, mask);
 WatcherHandle::new(SEGMENT_VALUE, slot)
 }

 pub(super) fn set_watcher_enabled(&mut self, handle: WatcherHandle, sink: ConstraintId, enabled: bool) -> bool {
 match handle.segment() {
 super::SEGMENT_ANY_CHANGE => self.any_change.set_enabled(handle.slot(), sink, enabled),
 super::SEGMENT_SOLVED => self.solved.set_enabled(handle.slot(), sink, enabled),
 super::SEGMENT_LOWER_BOUND => self.lower_bound.set_enabled(handle.slot(), sink, enabled),
 super::SEGMENT_UPPER_BOUND => self.upper_bound.set_enabled(handle.slot(), sink, enabled),
 super::SEGMENT_VALUE => self.value.set_enabled(handle.slot(), sink, enabled),
 _ => false,
 }
 }

 pub(super) fn remove_watcher(&mut self, handle: WatcherHandle, sink: ConstraintId) {
 match handle.segment() {
 super::SEGMENT_ANY_CHANGE => self.any_change.remove(handle.slot(), sink),
 super::SEGMENT_SOLVED => self.solved.remove(handle.slot(), sink),
 super::SEGMENT_LOWER_BOUND => self.lower_bound.remove(handle.slot(), sink),
 super::SEGMENT_UPPER_BOUND => self.upper_bound.remove(handle.slot(), sink),
 super::SEGMENT_VALUE => self.value.remove(handle.slot(), sink),
 _ => {}
 }
 }

 /// Visits segments in the fixed order lower-bound, upper-bound, solved, value,
 /// any-change (any-change last, ), walking each end→start.
 pub(super) fn trigger(&mut self, prev: &ValueSet, current: &ValueSet, queue: &mut PropagationQueue) -> bool {
 let transitions = detect_transitions(prev, current);

 if transitions.lower_bound_changed {
 for (_, sink) in self.lower_bound.walk_enabled_end_to_start() {
 queue.enqueue_constraint(sink);
 }
 }
 if transitions.upper_bound_changed {
 for (_, sink) in self.upper_bound.walk_enabled_end_to_start() {
 queue.enqueue_constraint(sink);
 }
 }
 if transitions.solved {
 for (_, sink) in self.solved.walk_enabled_end_to_start() {
 queue.enqueue_constraint(sink);
 }
 }
 let mut value_hits = Vec::new();
 for index in (0..self.value.slots.len()).rev() {
 if let Some(watcher) = &self.value.slots[index] {
 if watcher.enabled && watcher.mask.becomes_unsatisfied(prev, current) {
 value_hits.push(watcher.sink);
 }
 }
 }
 for sink in value_hits {
 queue.enqueue_constraint(sink);
 }
 if transitions.any_change {
 for (_, sink) in self.any_change.walk_enabled_end_to_start() {
 queue.enqueue_constraint(sink);
 }
 }

 self.any_change.compact_pending_deletes();
 self.solved.compact_pending_deletes();
 self.lower_bound.compact_pending_deletes();
 self.upper_bound.compact_pending_deletes();
 self.value.compact_pending_deletes();
 true
 }

 pub(super) fn num_watches(&self) -> usize {
 self.any_change.len() + self.solved.len() + self.lower_bound.len() + self.upper_bound.len() + self.value.len()
 }
}
