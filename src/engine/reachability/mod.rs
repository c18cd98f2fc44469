//! Dual min/max dynamic graph reachability with min-cut explanations.

pub mod constraint;
pub mod dynamic_reachability;
pub mod graph_view;
pub mod min_cut;

pub use constraint::ReachabilityConstraint;
pub use dynamic_reachability::DynamicReachability;
pub use graph_view::GraphView;
pub use min_cut::{min_cut, MinCutResult};
