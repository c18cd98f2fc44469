//! Literal Block Distance: the count of distinct decision
//! levels among a clause's literals at learn time. Small LBD is "glue": a clause
//! tying together few decision levels is considered more reusable.

use crate::basic_types::Literal;
use crate::engine::solver::decision_levels::DecisionLevels;
use crate::engine::variables::VariableDatabase;

/// Computes the LBD of a set of literals against the decision levels their variables
/// were last modified at. Literals whose variable was never modified (still at its
/// initial value) count as level 0.
pub fn calculate_lbd(literals: &[Literal], db: &VariableDatabase, levels: &DecisionLevels) -> u32 {
 let mut seen = Vec::new();
 for literal in literals {
 let ts = db.last_modification_timestamp(literal.variable());
 let level = ts.map(|ts| levels.level_of_timestamp(ts)).unwrap_or(0);
 if !seen.contains(&level) {
 seen.push(level);
 }
 }
 seen.len() as u32
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::basic_types::{ConstraintReference, ValueSet};
 use crate::engine::variables::domain::Domain;
 use crate::engine::variables::PropagationQueue;

 #[test]
 fn counts_distinct_levels_only() {
 let mut db = VariableDatabase::new();
 let a = db.create_variable("a", Domain::from_range(0, 1), None).unwrap();
 let b = db.create_variable("b", Domain::from_range(0, 1), None).unwrap();
 let mut queue = PropagationQueue::new();
 let mut levels = DecisionLevels::new();

 let mut mask = ValueSet::new_full(2);
 mask.set(1, false);
 let ts_a = db.timestamp();
 db.narrow(a, &mask, ConstraintReference::Decision, None, &mut queue);
 levels.push(ts_a, a);
 db.narrow(b, &mask, ConstraintReference::Decision, None, &mut queue);

 let literals = vec![Literal::new(a, mask.clone()), Literal::new(b, mask)];
 assert_eq!(calculate_lbd(&literals, &db, &levels), 1);
 }
}
