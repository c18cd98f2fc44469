/// Values usable as a [`FastLookupSet`] member: anything with a dense, stable, 0-based
/// id.
pub trait DenseId: Copy + Eq {
 fn dense_index(&self) -> usize;
}

/// An O(1) insert/remove/contains/iterate set over a dense id space. Used by
/// [`crate::engine::asp::analyzer::UnfoundedSetAnalyzer`] to track unfounded-set
/// candidates without `HashSet`'s hashing overhead.
#[derive(Clone, Debug)]
pub struct FastLookupSet<T: DenseId> {
 slot_of: Vec<Option<u32>>,
 members: Vec<T>,
}

impl<T: DenseId> Default for FastLookupSet<T> {
 fn default() -> Self {
 FastLookupSet {
 slot_of: Vec::new(),
 members: Vec::new(),
 }
 }
}

impl<T: DenseId> FastLookupSet<T> {
 pub fn new() -> Self {
 FastLookupSet::default()
 }

 pub fn contains(&self, value: T) -> bool {
 self.slot_of.get(value.dense_index()).copied().flatten().is_some()
 }

 /// Returns `true` if `value` was newly inserted (`false` if already present).
 pub fn insert(&mut self, value: T) -> bool {
 let index = value.dense_index();
 if index >= self.slot_of.len() {
 self.slot_of.resize(index + 1, None);
 }
 if self.slot_of[index].is_some() {
 return false;
 }
 self.slot_of[index] = Some(self.members.len() as u32);
 self.members.push(value);
 true
 }

 /// Returns `true` if `value` was present and removed. Swap-removes against the end
 /// of the dense member list to stay O(1).
 pub fn remove(&mut self, value: T) -> bool {
 let index = value.dense_index();
 let Some(Some(slot)) = self.slot_of.get(index).copied() else {
 return false;
 };
 let slot = slot as usize;
 let last_index = self.members.len() - 1;
 if slot != last_index {
 let moved = self.members[last_index];
 self.members[slot] = moved;
 self.slot_of[moved.dense_index()] = Some(slot as u32);
 }
 self.members.pop();
 self.slot_of[index] = None;
 true
 }

 pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
 self.members.iter().copied()
 }

 pub fn len(&self) -> usize {
 self.members.len()
 }

 pub fn is_empty(&self) -> bool {
 self.members.is_empty()
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[derive(Clone, Copy, Debug, PartialEq, Eq)]
 struct Id(usize);

 impl DenseId for Id {
 fn dense_index(&self) -> usize {
 self.0
 }
 }

 #[test]
 fn insert_contains_and_remove_round_trip() {
 let mut set: FastLookupSet<Id> = FastLookupSet::new();
 assert!(set.insert(Id(3)));
 assert!(!set.insert(Id(3)), "duplicate insert reports false");
 assert!(set.contains(Id(3)));
 assert!(set.remove(Id(3)));
 assert!(!set.contains(Id(3)));
 assert!(!set.remove(Id(3)), "removing twice reports false");
 }

 #[test]
 fn swap_remove_keeps_remaining_members_intact() {
 let mut set: FastLookupSet<Id> = FastLookupSet::new();
 for id in [Id(0), Id(1), Id(2)] {
 set.insert(id);
 }
 set.remove(Id(0));
 let mut remaining: Vec<usize> = set.iter().map(|id| id.0).collect();
 remaining.sort_unstable();
 assert_eq!(remaining, vec![1, 2]);
 }
}
