//! Integration tests for the typed `Array` API and the length oracle.

use std::collections::HashMap;

use arraykit::oracle::{self, Sparse};
use arraykit::{Array, Error, Matcher, Tag};
use fnkit::maybe::Maybe;
use fnkit::transducer::{compose_t, filter_t, map_t, take_t};

// =============================================================================
// Length oracle
// =============================================================================

#[test]
fn test_oracle_dense_stores_report_native_length() {
    let v = vec!['a', 'b', 'c'];
    assert_eq!(oracle::length(&v), 3);
    assert_eq!(oracle::length(&v[..2]), 2);
    assert_eq!(oracle::length(&Vec::<u8>::new()), 0);
}

#[test]
fn test_oracle_proxy_store_prefix() {
    let mut store = HashMap::new();
    for i in 1..=1000usize {
        store.insert(i, i * i);
    }
    assert_eq!(oracle::length(&store), 1000);
    assert!(oracle::is_proxy(&store));
    assert_eq!(oracle::population(&store), 1000);
}

#[test]
fn test_oracle_holes_give_a_border() {
    let mut store = Sparse::new();
    for i in [1, 2, 3, 5, 6] {
        store.set(i, i);
    }
    let n = oracle::length(&store);
    assert!(store.get(n).is_some());
    assert!(store.get(n + 1).is_none());
    assert_eq!(oracle::contiguous_len(&store), 3);
    assert_eq!(oracle::population(&store), 5);
}

// =============================================================================
// Construction and positions
// =============================================================================

#[test]
fn test_from_sparse_tags_proxy_arrays() {
    let store: Sparse<&str> = [(1, "x"), (2, "y")].into_iter().collect();
    let array = Array::from_sparse(&store);
    assert_eq!(array, vec!["x", "y"]);
    assert_eq!(array.tag(), Tag::Sparse);

    let dense = Array::from_sparse(&vec![1, 2]);
    assert_eq!(dense.tag(), Tag::Dense);
}

#[test]
fn test_transformations_produce_dense_arrays() {
    let store: Sparse<i32> = [(1, 1), (2, 2)].into_iter().collect();
    let mut array = Array::from_sparse(&store);
    assert_eq!(array.map(|x, _| x + 1).tag(), Tag::Dense);
    array.push(3);
    assert_eq!(array.tag(), Tag::Sparse);
}

#[test]
fn test_negative_positions() {
    let array = Array::new(vec![10, 20, 30]);
    assert_eq!(array.get(1), Some(&10));
    assert_eq!(array.get(-1), Some(&30));
    assert_eq!(array.get(-3), Some(&10));
    assert_eq!(array.get(0), None);
    assert_eq!(array.get(4), None);
    assert_eq!(array.get(-4), None);
}

#[test]
fn test_insert_and_set_positions() {
    let mut array = Array::new(vec![1, 3]);
    array.insert(2, 2).unwrap().insert(-1, 4).unwrap();
    assert_eq!(array, vec![1, 2, 3, 4]);
    array.set(5, 5).unwrap().set(-5, 0).unwrap();
    assert_eq!(array, vec![0, 2, 3, 4, 5]);
    assert!(matches!(array.insert(9, 9), Err(Error::InvalidRange { op: "insert", .. })));
    assert!(array.set(0, 1).is_err());
}

// =============================================================================
// Pipelines
// =============================================================================

#[test]
fn test_indexed_callbacks_chain() {
    let words = Array::new(vec!["apple", "kiwi", "banana", "fig"]);
    let long = words.filter(|w, _| w.len() > 3);
    let labelled = long.map(|w, i| format!("{}:{}", i, w));
    assert_eq!(labelled.join(" "), "1:apple 2:kiwi 3:banana");
}

#[test]
fn test_reduce_and_scan_agree() {
    let xs = Array::new(vec![1, 2, 3, 4, 5]);
    let total = xs.reduce(|acc, x, _| acc + x, None);
    let running = xs.scan(|acc, x, _| acc + x, None);
    assert_eq!(total, Some(15));
    assert_eq!(running.last(), Some(&15));
    assert_eq!(running, vec![1, 3, 6, 10, 15]);
}

#[test]
fn test_transducer_over_array() {
    let xs: Array<i64> = (1..=20).collect();
    let xf = compose_t(take_t(3), compose_t(filter_t(|x: &i64| x % 3 == 0), map_t(|x: i64| x * x)));
    // Squares first, then the filter, then the cut.
    let out = xs.transform(&xf);
    assert_eq!(out, vec![9, 36, 81]);
}

#[test]
fn test_search_and_extrema() {
    let xs = Array::new(vec![7, 3, 9, 3]);
    assert_eq!(xs.find(&Matcher::literal(3)), Some((&3, 2)));
    assert_eq!(xs.count(&Matcher::predicate(|x: &i32, _| *x > 5)), 2);
    assert_eq!(xs.max(), Ok((&9, 3)));
    assert_eq!(xs.min(), Ok((&3, 2)));
    assert_eq!(Array::<i32>::empty().max(), Err(Error::EmptyCollection { op: "max" }));
}

#[test]
fn test_elementwise_and_broadcast() {
    let a = Array::new(vec![1.0, 2.0, 3.0]);
    let b = Array::new(vec![0.5, 0.5, 0.5]);
    let scaled = (&a * &b).unwrap();
    assert_eq!(scaled + 1.0, vec![1.5, 2.0, 2.5]);
    assert_eq!(
        &a - &Array::new(vec![1.0]),
        Err(Error::SizeMismatch { op: "sub", left: 3, right: 1 })
    );
}

#[test]
fn test_maybe_lookups() {
    let xs = Array::new(vec![4, 8, 15]);
    let lookup = |pos: i64| Maybe::from(xs.get(pos).copied());
    assert_eq!(lookup(2).map(|x| x * 2), Maybe::Just(16));
    assert_eq!(lookup(7).map(|x| x * 2), Maybe::Nothing);
    assert_eq!(lookup(-1).bind(|x| lookup(x as i64 - 13)).from_maybe(0), 8);
}

#[test]
fn test_range_slices() {
    let xs = Array::<i64>::range(1, 10, 1).unwrap();
    assert_eq!(xs.slice(3, 5).unwrap(), vec![3, 4, 5]);
    assert_eq!(xs.slice_step(10, 1, -3).unwrap(), vec![10, 7, 4, 1]);
    assert_eq!(xs.slice(5, 4).unwrap(), Vec::<i64>::new());
    assert!(xs.slice(6, 4).is_err());
    assert_eq!(Array::<i64>::range(10, 1, -4).unwrap(), vec![10, 6, 2]);
}
