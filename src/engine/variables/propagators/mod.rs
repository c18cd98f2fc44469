//! The four watcher-list specialisations selected by domain size. All
//! four expose the same contract via the [`VariablePropagator`] enum, matching the
//! teacher's preference for a flat, non-virtual dispatch surface over trait objects
//! (`engine::cp::propagation::propagator::Propagator` is a trait there because
//! constraints are genuinely open-ended; here the specialisations are a closed, known
//! set, so an enum is the idiomatic choice).

mod boolean;
mod generic;
mod noop;
mod segments;
mod word;

pub use boolean::BooleanPropagator;
pub use generic::GenericPropagator;
pub use noop::NoopPropagator;
pub use word::WordPropagator;

use crate::basic_types::{ConstraintId, ValueSet};
use crate::engine::variables::propagation_queue::PropagationQueue;

/// A watch-kind segment, keyed on which flag transitioned from false to true between
/// the previous and current domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchKind {
 AnyChange,
 Solved,
 LowerBoundChanged,
 UpperBoundChanged,
}

const SEGMENT_ANY_CHANGE: u32 = 0;
const SEGMENT_SOLVED: u32 = 1;
const SEGMENT_LOWER_BOUND: u32 = 2;
const SEGMENT_UPPER_BOUND: u32 = 3;
const SEGMENT_VALUE: u32 = 4;
const SEGMENT_BITS: u32 = 3;

/// An opaque 32-bit token encoding the segment a watcher lives in plus its slot index
/// within that segment. The id space is per-segment.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatcherHandle(u32);

impl std::fmt::Debug for WatcherHandle {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 write!(f, "WatcherHandle(segment={}, slot={})", self.segment(), self.slot())
 }
}

impl WatcherHandle {
 fn new(segment: u32, slot: usize) -> Self {
 debug_assert!(segment < (1 << SEGMENT_BITS));
 WatcherHandle((segment << (u32::BITS - SEGMENT_BITS)) | slot as u32)
 }

 fn segment(self) -> u32 {
 self.0 >> (u32::BITS - SEGMENT_BITS)
 }

 fn slot(self) -> usize {
 (self.0 & ((1 << (u32::BITS - SEGMENT_BITS)) - 1)) as usize
 }
}

fn kind_segment(kind: WatchKind) -> u32 {
 match kind {
 WatchKind::AnyChange => SEGMENT_ANY_CHANGE,
 WatchKind::Solved => SEGMENT_SOLVED,
 WatchKind::LowerBoundChanged => SEGMENT_LOWER_BOUND,
 WatchKind::UpperBoundChanged => SEGMENT_UPPER_BOUND,
 }
}

/// A single watcher slot. `None` marks a physically removed, reusable slot.
#[derive(Clone, Debug)]
struct WatcherSlot<Mask> {
 sink: ConstraintId,
 enabled: bool,
 mask: Mask,
}

/// A segment of watchers of uniform mask type, shared by the word/generic
/// specialisations (and, with `Mask = ()`, by the plain kind segments).
#[derive(Clone, Debug, Default)]
struct WatcherSegment<Mask> {
 slots: Vec<Option<WatcherSlot<Mask>>>,
 pending_delete: Vec<usize>,
}

impl<Mask: Clone> WatcherSegment<Mask> {
 fn new() -> Self {
 WatcherSegment {
 slots: Vec::new(),
 pending_delete: Vec::new(),
 }
 }

 fn add(&mut self, sink: ConstraintId, mask: Mask) -> usize {
 self.slots.push(Some(WatcherSlot {
 sink,
 enabled: true,
 mask,
 }));
 self.slots.len() - 1
 }

 fn set_enabled(&mut self, slot: usize, sink: ConstraintId, enabled: bool) -> bool {
 if let Some(Some(watcher)) = self.slots.get_mut(slot) {
 if watcher.sink == sink && watcher.enabled != enabled {
 watcher.enabled = enabled;
 return true;
 }
 }
 false
 }

 /// Removal is deferred: the slot is only marked, so an in-progress end→start walk
 /// sees a stable snapshot.
 fn remove(&mut self, slot: usize, sink: ConstraintId) {
 if let Some(Some(watcher)) = self.slots.get(slot) {
 if watcher.sink == sink {
 self.pending_delete.push(slot);
 }
 }
 }

 fn compact_pending_deletes(&mut self) {
 for slot in self.pending_delete.drain(..) {
 if let Some(entry) = self.slots.get_mut(slot) {
 *entry = None;
 }
 }
 }

 fn len(&self) -> usize {
 self.slots.iter().filter(|s| s.is_some()).count()
 }

 /// Walks end→start, yielding `(slot_index, sink)` for every currently enabled
 /// watcher; a removal mid-walk cannot displace an index not yet visited.
 fn walk_enabled_end_to_start(&self) -> impl Iterator<Item = (usize, ConstraintId)> + '_ {
 self.slots
.iter()
.enumerate()
.rev()
.filter_map(|(i, slot)| slot.as_ref().filter(|w| w.enabled).map(|w| (i, w.sink)))
 }
}

/// The uniform watcher-list contract every domain-size specialisation implements.
pub trait VariablePropagatorOps {
 fn add_watcher(&mut self, sink: ConstraintId, kind: WatchKind) -> WatcherHandle;
 fn add_value_watcher(&mut self, sink: ConstraintId, watch_mask: ValueSet) -> WatcherHandle;
 fn set_watcher_enabled(&mut self, handle: WatcherHandle, sink: ConstraintId, enabled: bool) -> bool;
 fn remove_watcher(&mut self, handle: WatcherHandle, sink: ConstraintId);
 /// Visits watchers interested in the transition from `prev` to `current`, enqueuing
 /// their sinks into `queue`. Always succeeds: the uniform contract's `bool` return
 /// exists for interface symmetry with constraint propagation, but watcher
 /// notification in this design is a pure enqueue step (see DESIGN.md); actual
 /// failure can only originate from a constraint's own `propagate`.
 fn trigger(&mut self, prev: &ValueSet, current: &ValueSet, queue: &mut PropagationQueue) -> bool;
 fn num_watches(&self) -> usize;
}

/// Dispatches to one of the four domain-size specialisations.
#[derive(Debug)]
pub enum VariablePropagator {
 Noop(NoopPropagator),
 Boolean(BooleanPropagator),
 Word(WordPropagator),
 Generic(GenericPropagator),
}

impl VariablePropagator {
 /// `W` is the machine-word propagator's cutoff (32 or 64; this crate uses 64 since
 /// `ValueSet` already packs into `u64` words).
 pub fn for_domain_size(domain_size: u32, word_width: u32) -> Self {
 match domain_size {
 0 | 1 => VariablePropagator::Noop(NoopPropagator::default()),
 2 => VariablePropagator::Boolean(BooleanPropagator::default()),
 d if d <= word_width => VariablePropagator::Word(WordPropagator::default()),
 _ => VariablePropagator::Generic(GenericPropagator::default()),
 }
 }
}

macro_rules! dispatch {
 ($self:expr, $variant_call:ident ( $($arg:expr),* )) => {
 match $self {
 VariablePropagator::Noop(p) => p.$variant_call($($arg),*),
 VariablePropagator::Boolean(p) => p.$variant_call($($arg),*),
 VariablePropagator::Word(p) => p.$variant_call($($arg),*),
 VariablePropagator::Generic(p) => p.$variant_call($($arg),*),
 }
 };
}

impl VariablePropagatorOps for VariablePropagator {
 fn add_watcher(&mut self, sink: ConstraintId, kind: WatchKind) -> WatcherHandle {
 dispatch!(self, add_watcher(sink, kind))
 }

 fn add_value_watcher(&mut self, sink: ConstraintId, watch_mask: ValueSet) -> WatcherHandle {
 dispatch!(self, add_value_watcher(sink, watch_mask))
 }

 fn set_watcher_enabled(&mut self, handle: WatcherHandle, sink: ConstraintId, enabled: bool) -> bool {
 dispatch!(self, set_watcher_enabled(handle, sink, enabled))
 }

 fn remove_watcher(&mut self, handle: WatcherHandle, sink: ConstraintId) {
 dispatch!(self, remove_watcher(handle, sink))
 }

 fn trigger(&mut self, prev: &ValueSet, current: &ValueSet, queue: &mut PropagationQueue) -> bool {
 dispatch!(self, trigger(prev, current, queue))
 }

 fn num_watches(&self) -> usize {
 dispatch!(self, num_watches())
 }
}
