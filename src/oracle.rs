//! Logical length of indexable stores.
//!
//! Dense stores (slices, vectors, arrays) report their length directly.
//! Proxy stores (hash maps keyed by position, [`Sparse`]) have no
//! meaningful native length, so [`length`] searches for the end of the run
//! of present slots starting at index 1:
//!
//! 1. Gallop: probe 2, 4, 8, ... until a slot is absent.
//! 2. Binary search between the last present probe and the first absent one.
//!
//! Both phases are O(log n). The search finds a *border*, an index `b`
//! where `b` is present and `b + 1` is absent. When the populated indices
//! form a prefix `1..=k` the border is `k`. With holes, the border is some
//! present index before a hole, not necessarily the first one; use
//! [`contiguous_len`] when the exact first hole matters and [`population`]
//! for a count of every slot.
//!
//! All positions here are 1-based.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use rustc_hash::FxHashMap;

/// A store the oracle can measure.
pub trait Indexable {
    type Item;

    /// The store's own length query. Proxy stores return 0.
    fn native_len(&self) -> usize;

    /// The element at 1-based `index`, if present.
    fn get_at(&self, index: usize) -> Option<&Self::Item>;

    fn is_present(&self, index: usize) -> bool {
        return self.get_at(index).is_some();
    }

    /// Number of occupied slots, wherever they are.
    fn population(&self) -> usize {
        return self.native_len();
    }
}

/// Logical length of `seq`: the native length when nonzero, else the border
/// found by galloping and binary search. 0 when index 1 is absent.
pub fn length<S: Indexable + ?Sized>(seq: &S) -> usize {
    let native = seq.native_len();
    if native > 0 {
        return native;
    }
    if !seq.is_present(1) {
        return 0;
    }

    let mut probes = 1usize;
    let mut present = 1usize;
    let mut absent = 2usize;
    while seq.is_present(absent) {
        probes += 1;
        present = absent;
        absent = match absent.checked_mul(2) {
            Some(next) => next,
            None => return present,
        };
    }

    while absent - present > 1 {
        probes += 1;
        let mid = present + (absent - present) / 2;
        if seq.is_present(mid) {
            present = mid;
        } else {
            absent = mid;
        }
    }

    log::trace!("oracle: proxy store length {} after {} probes", present, probes);
    return present;
}

/// Exact length of the run of present slots starting at 1. Linear.
pub fn contiguous_len<S: Indexable + ?Sized>(seq: &S) -> usize {
    let native = seq.native_len();
    if native > 0 {
        return native;
    }
    let mut len = 0;
    while seq.is_present(len + 1) {
        len += 1;
    }
    return len;
}

/// Total occupied slots, including any past a hole.
pub fn population<S: Indexable + ?Sized>(seq: &S) -> usize {
    return seq.population();
}

/// True when `seq` reports no native length but holds elements.
pub fn is_proxy<S: Indexable + ?Sized>(seq: &S) -> bool {
    return seq.native_len() == 0 && seq.population() > 0;
}

impl<T> Indexable for [T] {
    type Item = T;

    fn native_len(&self) -> usize {
        return self.len();
    }

    fn get_at(&self, index: usize) -> Option<&T> {
        return index.checked_sub(1).and_then(|i| self.get(i));
    }
}

impl<T> Indexable for Vec<T> {
    type Item = T;

    fn native_len(&self) -> usize {
        return self.len();
    }

    fn get_at(&self, index: usize) -> Option<&T> {
        return self.as_slice().get_at(index);
    }
}

impl<T, S: BuildHasher> Indexable for HashMap<usize, T, S> {
    type Item = T;

    fn native_len(&self) -> usize {
        return 0;
    }

    fn get_at(&self, index: usize) -> Option<&T> {
        return self.get(&index);
    }

    fn population(&self) -> usize {
        return self.len();
    }
}

impl<T> Indexable for BTreeMap<usize, T> {
    type Item = T;

    fn native_len(&self) -> usize {
        return 0;
    }

    fn get_at(&self, index: usize) -> Option<&T> {
        return self.get(&index);
    }

    fn population(&self) -> usize {
        return self.len();
    }
}

/// A position-keyed proxy store. It has no native length; the oracle
/// measures it by probing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sparse<T> {
    slots: FxHashMap<usize, T>,
}

impl<T> Sparse<T> {
    pub fn new() -> Sparse<T> {
        return Sparse {
            slots: FxHashMap::default(),
        };
    }

    /// Stores `value` at 1-based `index`. Index 0 is not a position and is
    /// ignored.
    pub fn set(&mut self, index: usize, value: T) -> Option<T> {
        if index == 0 {
            return None;
        }
        return self.slots.insert(index, value);
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        return self.slots.remove(&index);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        return self.slots.get(&index);
    }
}

impl<T> Default for Sparse<T> {
    fn default() -> Self {
        return Sparse::new();
    }
}

impl<T> FromIterator<(usize, T)> for Sparse<T> {
    fn from_iter<I: IntoIterator<Item = (usize, T)>>(iter: I) -> Self {
        let mut sparse = Sparse::new();
        for (index, value) in iter {
            sparse.set(index, value);
        }
        return sparse;
    }
}

impl<T> Indexable for Sparse<T> {
    type Item = T;

    fn native_len(&self) -> usize {
        return 0;
    }

    fn get_at(&self, index: usize) -> Option<&T> {
        return self.slots.get(&index);
    }

    fn population(&self) -> usize {
        return self.slots.len();
    }
}
