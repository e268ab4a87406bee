//! Searches, membership tests and extrema.

use std::hash::Hash;

use rustc_hash::FxHashSet;

use super::Array;
use crate::error::{Error, Result};

/// What a search looks for: an equal element, or one a predicate accepts.
/// Predicates receive `(element, index)`.
pub enum Matcher<'a, T> {
    Literal(T),
    Predicate(Box<dyn Fn(&T, usize) -> bool + 'a>),
}

impl<'a, T> Matcher<'a, T> {
    pub fn literal(value: T) -> Matcher<'a, T> {
        Matcher::Literal(value)
    }

    pub fn predicate(f: impl Fn(&T, usize) -> bool + 'a) -> Matcher<'a, T> {
        Matcher::Predicate(Box::new(f))
    }

    pub fn matches(&self, item: &T, index: usize) -> bool
    where
        T: PartialEq,
    {
        match self {
            Matcher::Literal(value) => item == value,
            Matcher::Predicate(f) => f(item, index),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Matcher<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Matcher::Literal(value) => write!(f, "Literal({:?})", value),
            Matcher::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

impl<T: PartialEq> Array<T> {
    /// First match and its index.
    pub fn find(&self, matcher: &Matcher<'_, T>) -> Option<(&T, usize)> {
        self.indexed().find(|&(item, i)| matcher.matches(item, i))
    }

    pub fn find_index(&self, matcher: &Matcher<'_, T>) -> Option<usize> {
        self.find(matcher).map(|(_, i)| i)
    }

    /// First match, or `default` when nothing matches.
    pub fn find_or<'s>(&'s self, matcher: &Matcher<'_, T>, default: &'s T) -> &'s T {
        self.find(matcher).map_or(default, |(item, _)| item)
    }

    /// True for an empty array.
    pub fn all(&self, matcher: &Matcher<'_, T>) -> bool {
        self.indexed().all(|(item, i)| matcher.matches(item, i))
    }

    pub fn any(&self, matcher: &Matcher<'_, T>) -> bool {
        self.indexed().any(|(item, i)| matcher.matches(item, i))
    }

    pub fn count(&self, matcher: &Matcher<'_, T>) -> usize {
        self.indexed().filter(|&(item, i)| matcher.matches(item, i)).count()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|item| item == value)
    }
}

impl<T: Hash + Eq> Array<T> {
    fn lookup(&self) -> FxHashSet<&T> {
        self.iter().collect()
    }

    /// True if any of `values` is present.
    pub fn contains_any(&self, values: &[T]) -> bool {
        let table = self.lookup();
        values.iter().any(|value| table.contains(value))
    }

    /// True if every one of `values` is present.
    pub fn contains_all(&self, values: &[T]) -> bool {
        let table = self.lookup();
        values.iter().all(|value| table.contains(value))
    }

    /// Elements of `self` also in `other`, first-seen order, no repeats.
    pub fn intersect(&self, other: &Array<T>) -> Array<T>
    where
        T: Clone,
    {
        let table = other.lookup();
        let mut emitted = FxHashSet::default();
        self.iter()
            .filter(|item| table.contains(item) && emitted.insert(*item))
            .cloned()
            .collect()
    }

    /// True if the arrays share at least one element.
    pub fn intersects(&self, other: &Array<T>) -> bool {
        let table = other.lookup();
        self.iter().any(|item| table.contains(item))
    }
}

fn empty(op: &'static str) -> Error {
    Error::EmptyCollection { op }
}

/// Linear scan keeping the first element that `better` prefers.
fn best_by<'a, T, K>(
    array: &'a Array<T>,
    op: &'static str,
    mut key: impl FnMut(&T) -> K,
    better: impl Fn(&K, &K) -> bool,
) -> Result<(&'a T, K, usize)> {
    let mut indexed = array.indexed();
    let (first, _) = indexed.next().ok_or_else(|| empty(op))?;
    let mut best = (first, key(first), 1);
    for (item, i) in indexed {
        let k = key(item);
        if better(&k, &best.1) {
            best = (item, k, i);
        }
    }
    Ok(best)
}

impl<T: PartialOrd> Array<T> {
    /// Largest element and its index; ties keep the first.
    pub fn max(&self) -> Result<(&T, usize)> {
        self.extreme("max", |a, b| a > b)
    }

    /// Smallest element and its index; ties keep the first.
    pub fn min(&self) -> Result<(&T, usize)> {
        self.extreme("min", |a, b| a < b)
    }

    fn extreme(&self, op: &'static str, better: impl Fn(&T, &T) -> bool) -> Result<(&T, usize)> {
        let mut indexed = self.indexed();
        let mut best = indexed.next().ok_or_else(|| empty(op))?;
        for (item, i) in indexed {
            if better(item, best.0) {
                best = (item, i);
            }
        }
        Ok(best)
    }
}

impl<T> Array<T> {
    /// Element with the largest `key`, the key, and the index.
    pub fn max_by<K: PartialOrd>(&self, key: impl FnMut(&T) -> K) -> Result<(&T, K, usize)> {
        best_by(self, "max_by", key, |a, b| a > b)
    }

    /// Element with the smallest `key`, the key, and the index.
    pub fn min_by<K: PartialOrd>(&self, key: impl FnMut(&T) -> K) -> Result<(&T, K, usize)> {
        best_by(self, "min_by", key, |a, b| a < b)
    }
}
