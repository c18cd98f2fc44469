use crate::basic_types::VarId;
use crate::engine::variables::{VariablePropagator, VariablePropagatorOps};

/// The per-variable watcher lists, one [`VariablePropagator`] specialisation per
/// variable, selected at creation time from the variable's domain size.
#[derive(Debug, Default)]
pub struct WatcherStore {
 propagators: Vec<VariablePropagator>,
 word_width: u32,
}

impl WatcherStore {
 pub fn new(word_width: u32) -> Self {
 WatcherStore {
 propagators: Vec::new(),
 word_width,
 }
 }

 /// Registers a freshly created variable's watcher list. Must be called in the
 /// same order as [`crate::engine::variables::VariableDatabase::create_variable`]
 /// so indices line up with [`VarId`]s.
 pub fn register_variable(&mut self, domain_size: u32) -> VarId {
 let id = VarId::new(self.propagators.len() as u32);
 self.propagators.push(VariablePropagator::for_domain_size(domain_size, self.word_width));
 id
 }

 pub fn get(&self, var: VarId) -> &VariablePropagator {
 &self.propagators[var.index()]
 }

 pub fn get_mut(&mut self, var: VarId) -> &mut VariablePropagator {
 &mut self.propagators[var.index()]
 }
}
