//! Small internal data structures shared by a handful of engine modules.

pub mod fast_lookup_set;

pub use fast_lookup_set::{DenseId, FastLookupSet};
