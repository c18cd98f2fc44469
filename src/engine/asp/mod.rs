//! Unfounded-set detection for normal logic program rules outside the tight fragment
//!.

pub mod analyzer;
pub mod atom;
pub mod body;
pub mod scc;

pub use analyzer::UnfoundedSetAnalyzer;
pub use atom::{AtomId, AtomState};
pub use body::{BodyId, BodyState};
pub use scc::tarjan_scc;
