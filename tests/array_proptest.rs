//! Property-based tests for arrays, the length oracle and the dynamic layer.

use proptest::prelude::*;

use arraykit::oracle::{self, Sparse};
use arraykit::{Array, Error, Value, builtins};

// =============================================================================
// Test helpers
// =============================================================================

fn arbitrary_ints() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1000i64..1000, 0..60)
}

/// A store holding `1..=prefix` plus a scattering of slots past a gap.
fn sparse_with_tail(prefix: usize, tail: &[usize]) -> Sparse<usize> {
    let mut store: Sparse<usize> = (1..=prefix).map(|i| (i, i)).collect();
    for &offset in tail {
        let index = prefix + 2 + offset;
        store.set(index, index);
    }
    store
}

fn numbers(items: &[i64]) -> Value {
    Value::array(items.iter().map(|&n| Value::from(n)).collect())
}

// =============================================================================
// Length oracle
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn dense_length_is_native(items in arbitrary_ints()) {
        prop_assert_eq!(oracle::length(&items), items.len());
        prop_assert_eq!(oracle::length(&Array::new(items.clone())), items.len());
    }

    #[test]
    fn sparse_prefix_length_is_exact(prefix in 0usize..5000) {
        let store = sparse_with_tail(prefix, &[]);
        prop_assert_eq!(oracle::length(&store), prefix);
        prop_assert_eq!(oracle::contiguous_len(&store), prefix);
    }

    #[test]
    fn length_is_always_a_border(
        prefix in 1usize..500,
        tail in prop::collection::vec(0usize..500, 0..20),
    ) {
        let store = sparse_with_tail(prefix, &tail);
        let n = oracle::length(&store);
        prop_assert!(store.get(n).is_some());
        prop_assert!(store.get(n + 1).is_none());
        prop_assert!(n >= prefix);
    }
}

// =============================================================================
// Transformations
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn map_identity(items in arbitrary_ints()) {
        let array = Array::new(items.clone());
        prop_assert_eq!(array.map(|x, _| *x), items);
    }

    #[test]
    fn filter_constant_predicates(items in arbitrary_ints()) {
        let array = Array::new(items.clone());
        prop_assert_eq!(array.filter(|_, _| true), items);
        prop_assert!(array.filter(|_, _| false).is_empty());
    }

    #[test]
    fn filter_keeps_order_and_matches(items in arbitrary_ints()) {
        let array = Array::new(items.clone());
        let evens = array.filter(|x, _| x % 2 == 0);
        let expected: Vec<i64> = items.iter().copied().filter(|x| x % 2 == 0).collect();
        prop_assert_eq!(evens, expected);
    }

    #[test]
    fn scan_ends_with_reduce(items in arbitrary_ints()) {
        let array = Array::new(items);
        let total = array.reduce(|acc, x, _| acc + x, Some(0));
        let running = array.scan(|acc, x, _| acc + x, Some(0));
        prop_assert_eq!(running.len(), array.len());
        prop_assert_eq!(running.last().copied().unwrap_or(0), total.unwrap_or(0));
    }

    #[test]
    fn reverse_twice_is_identity(items in arbitrary_ints()) {
        let array = Array::new(items);
        prop_assert_eq!(array.reverse().reverse(), array);
    }

    #[test]
    fn slice_whole_range_is_identity(items in arbitrary_ints()) {
        let array = Array::new(items);
        prop_assert_eq!(array.slice(1, -1).unwrap(), array);
    }
}

// =============================================================================
// Operators and extrema
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn elementwise_add_matches_zip(pairs in prop::collection::vec((-1000i64..1000, -1000i64..1000), 0..40)) {
        let (left, right): (Vec<i64>, Vec<i64>) = pairs.iter().copied().unzip();
        let sum = (Array::new(left) + Array::new(right)).unwrap();
        let expected: Vec<i64> = pairs.iter().map(|(a, b)| a + b).collect();
        prop_assert_eq!(sum, expected);
    }

    #[test]
    fn elementwise_sizes_must_match(a in arbitrary_ints(), b in arbitrary_ints()) {
        prop_assume!(a.len() != b.len());
        let (left, right) = (a.len(), b.len());
        let result = &Array::new(a) * &Array::new(b);
        prop_assert_eq!(result, Err(Error::SizeMismatch { op: "mul", left, right }));
    }

    #[test]
    fn max_is_first_largest(items in prop::collection::vec(0i64..20, 1..40)) {
        let array = Array::new(items.clone());
        let (value, index) = array.max().unwrap();
        prop_assert_eq!(Some(value), items.iter().max());
        prop_assert_eq!(items.iter().position(|x| x == value), Some(index - 1));
    }

    #[test]
    fn dynamic_max_agrees_with_typed(items in prop::collection::vec(-50i64..50, 1..30)) {
        let typed = Array::new(items.clone());
        let (value, index) = builtins::max(&numbers(&items)).unwrap();
        let (expected, expected_index) = typed.max().unwrap();
        prop_assert_eq!(value, Value::from(*expected));
        prop_assert_eq!(index, expected_index);
    }
}

#[test]
fn test_empty_extrema() {
    assert_eq!(Array::<i64>::empty().min(), Err(Error::EmptyCollection { op: "min" }));
    assert_eq!(builtins::max(&numbers(&[])), Err(Error::EmptyCollection { op: "max" }));
}
