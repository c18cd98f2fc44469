//! First-UIP conflict analysis: turns a conflicting constraint's
//! explanation into an asserting clause and a backjump level.

pub mod analyzer;

pub use analyzer::{analyze_conflict, ConflictAnalysisResult};
