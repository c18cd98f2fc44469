/// The ordered list of external integer values a variable's indices map to. Index `i`
/// in a [`crate::basic_types::ValueSet`] of that variable always refers to
/// `values[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Domain {
    values: Vec<i64>,
}

impl Domain {
    pub fn new(mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        values.dedup();
        Domain { values }
    }

    pub fn from_range(min: i64, max: i64) -> Self {
        Domain::new((min..=max).collect())
    }

    pub fn len(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, index: u32) -> i64 {
        self.values[index as usize]
    }

    pub fn index_of_value(&self, value: i64) -> Option<u32> {
        self.values.binary_search(&value).ok().map(|i| i as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_domain_maps_indices_in_order() {
        let domain = Domain::from_range(3, 6);
        assert_eq!(domain.len(), 4);
        assert_eq!(domain.value_at(0), 3);
        assert_eq!(domain.value_at(3), 6);
        assert_eq!(domain.index_of_value(5), Some(2));
        assert_eq!(domain.index_of_value(100), None);
    }

    #[test]
    fn explicit_values_are_sorted_and_deduplicated() {
        let domain = Domain::new(vec![5, 1, 5, 3]);
        assert_eq!(domain.len(), 3);
        assert_eq!(domain.value_at(0), 1);
        assert_eq!(domain.value_at(2), 5);
    }
}
