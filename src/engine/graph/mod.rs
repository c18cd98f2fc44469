//! The graph-topology interface ([`topology`]) and graph-aware learning
//! ([`relation`], [`promotion`])

pub mod promotion;
pub mod relation;
pub mod topology;

pub use promotion::{classify_candidates, clause_hash, promotion_candidates, ConstraintGraphRelationInfo, GraphPromoter, PromotionCandidate, PromotionOutcome};
pub use relation::Relation;
pub use topology::{EdgeChangeListener, EdgeStep, EdgeTopology, Topology, TopologyLink, VertexId};
