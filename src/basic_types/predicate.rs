//! A `predicate!`-style construction macro for [`Literal`](super::Literal): a variable
//! paired with an "inside"/"outside" sign over a value list. Test-only sugar; it does
//! not widen the public API.

/// Builds a [`Literal`](super::Literal) over a domain of `len` values.
///
/// ```ignore
/// predicate!(var, == 3; 5)       // var is exactly index 3 of 5
/// predicate!(var, != 3; 5)       // var is anything but index 3 of 5
/// predicate!(var, in [1, 2]; 5)  // var is index 1 or 2 of 5
/// ```
#[macro_export]
macro_rules! predicate {
    ($var:expr , == $index:expr ; $len:expr) => {
        $crate::basic_types::Literal::new(
            $var,
            $crate::basic_types::ValueSet::new_singleton($len, $index),
        )
    };
    ($var:expr , != $index:expr ; $len:expr) => {
        $crate::basic_types::Literal::new(
            $var,
            $crate::basic_types::ValueSet::new_singleton($len, $index).inverted(),
        )
    };
    ($var:expr , in [ $( $index:expr ),* $(,)? ] ; $len:expr) => {{
        let mut mask = $crate::basic_types::ValueSet::new_empty($len);
        $( mask.set($index, true); )*
        $crate::basic_types::Literal::new($var, mask)
    }};
    ($var:expr , not_in [ $( $index:expr ),* $(,)? ] ; $len:expr) => {{
        let mut mask = $crate::basic_types::ValueSet::new_empty($len);
        $( mask.set($index, true); )*
        $crate::basic_types::Literal::new($var, mask.inverted())
    }};
}

#[cfg(test)]
mod tests {
    use crate::basic_types::{VarId, ValueSet};

    #[test]
    fn equality_predicate_builds_a_singleton_mask() {
        let var = VarId::new(0);
        let lit = predicate!(var, == 2; 5);
        assert_eq!(lit.variable(), var);
        assert_eq!(lit.mask(), &ValueSet::new_singleton(5, 2));
    }

    #[test]
    fn inequality_predicate_builds_the_complement() {
        let var = VarId::new(0);
        let lit = predicate!(var, != 2; 5);
        assert_eq!(lit.mask(), &ValueSet::new_singleton(5, 2).inverted());
    }

    #[test]
    fn in_predicate_builds_a_multi_valued_mask() {
        let var = VarId::new(0);
        let lit = predicate!(var, in [1, 3]; 5);
        assert!(lit.mask().get(1));
        assert!(lit.mask().get(3));
        assert!(!lit.mask().get(0));
    }
}
