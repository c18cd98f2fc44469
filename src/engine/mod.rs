//! The solver internals: variable storage and watching (`variables`), the constraint
//! capability set and plumbing (`cp`), clause storage and conflict analysis (`sat`,
//! `conflict_analysis`), the graph topology interface and graph-aware learning
//! (`graph`), the dynamic reachability constraint (`reachability`), the answer-set
//! unfounded-set analyzer (`asp`), and the top-level search driver (`solver`).

pub mod asp;
pub mod conflict_analysis;
pub mod cp;
pub mod ds;
pub mod graph;
pub mod reachability;
pub mod sat;
pub mod solver;
pub mod variables;
