//! Transformations that build new arrays.

use std::hash::Hash;
use std::ops::{Add, Mul};

use rustc_hash::FxHashSet;

use super::{Array, MAX_RANGE_LEN, resolve};
use crate::error::{Error, Result};

fn invalid(op: &'static str, reason: &'static str) -> Error {
    Error::InvalidRange { op, reason }
}

/// Turns a possibly negative position into a 1-based one, without bounds
/// checking. `-1` becomes `len`.
fn normalize(len: usize, pos: i64) -> i64 {
    if pos < 0 { len as i64 + 1 + pos } else { pos }
}

impl<T> Array<T> {
    /// `f(element, index)` for every element.
    pub fn map<U>(&self, mut f: impl FnMut(&T, usize) -> U) -> Array<U> {
        self.indexed().map(|(item, i)| f(item, i)).collect()
    }

    /// Like `map`, but `None` results are dropped.
    pub fn filter_map<U>(&self, mut f: impl FnMut(&T, usize) -> Option<U>) -> Array<U> {
        self.indexed().filter_map(|(item, i)| f(item, i)).collect()
    }

    /// Folds into an accumulator of any type.
    pub fn fold<A>(&self, init: A, mut f: impl FnMut(A, &T, usize) -> A) -> A {
        let mut acc = init;
        for (item, i) in self.indexed() {
            acc = f(acc, item, i);
        }
        acc
    }

    /// One accumulator per element, for an accumulator of any type.
    pub fn scan_fold<A: Clone>(&self, init: A, mut f: impl FnMut(&A, &T, usize) -> A) -> Array<A> {
        let mut acc = init;
        let mut out = Vec::with_capacity(self.len());
        for (item, i) in self.indexed() {
            acc = f(&acc, item, i);
            out.push(acc.clone());
        }
        Array::new(out)
    }

    /// Pairs elements by position, padding the shorter side with `None`.
    pub fn zip<U: Clone>(&self, other: &Array<U>) -> Array<(Option<T>, Option<U>)>
    where
        T: Clone,
    {
        let len = self.len().max(other.len());
        (0..len)
            .map(|i| (self.items.get(i).cloned(), other.items.get(i).cloned()))
            .collect()
    }

    /// Zips any number of arrays, padding the shorter ones with `None`.
    pub fn zip_all(arrays: &[&Array<T>]) -> Array<Vec<Option<T>>>
    where
        T: Clone,
    {
        let len = arrays.iter().map(|a| a.len()).max().unwrap_or(0);
        (0..len)
            .map(|i| arrays.iter().map(|a| a.items.get(i).cloned()).collect())
            .collect()
    }

    pub fn reverse(&self) -> Array<T>
    where
        T: Clone,
    {
        self.items.iter().rev().cloned().collect()
    }

    /// Stable sort into a new array.
    pub fn sort_by(&self, compare: impl FnMut(&T, &T) -> std::cmp::Ordering) -> Array<T>
    where
        T: Clone,
    {
        let mut items = self.items.clone();
        items.sort_by(compare);
        Array::new(items)
    }

    /// `(matching, rest)`, both in original order.
    pub fn partition(&self, mut predicate: impl FnMut(&T, usize) -> bool) -> (Array<T>, Array<T>)
    where
        T: Clone,
    {
        let mut yes = Vec::new();
        let mut no = Vec::new();
        for (item, i) in self.indexed() {
            if predicate(item, i) {
                yes.push(item.clone());
            } else {
                no.push(item.clone());
            }
        }
        (Array::new(yes), Array::new(no))
    }

    /// Consecutive runs of `size` elements; the last may be shorter.
    pub fn chunk(&self, size: usize) -> Result<Array<Array<T>>>
    where
        T: Clone,
    {
        if size == 0 {
            return Err(invalid("chunk", "chunk size must be positive"));
        }
        Ok(self.items.chunks(size).map(Array::from).collect())
    }

    /// Textual forms joined with `sep`.
    pub fn join(&self, sep: &str) -> String
    where
        T: std::fmt::Display,
    {
        let mut out = String::new();
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(&item.to_string());
        }
        out
    }
}

impl<T: Clone> Array<T> {
    pub fn filter(&self, mut predicate: impl FnMut(&T, usize) -> bool) -> Array<T> {
        self.filter_map(|item, i| predicate(item, i).then(|| item.clone()))
    }

    /// Folds with `f(acc, element, index)`. Without `init` the first element
    /// seeds the fold, which then starts at the second element. An empty
    /// array with no `init` gives `None`.
    pub fn reduce(&self, mut f: impl FnMut(T, &T, usize) -> T, init: Option<T>) -> Option<T> {
        let mut indexed = self.indexed();
        let mut acc = match init {
            Some(init) => init,
            None => indexed.next()?.0.clone(),
        };
        for (item, i) in indexed {
            acc = f(acc, item, i);
        }
        Some(acc)
    }

    /// Every intermediate accumulator of `reduce`, one per element. When
    /// `init` is missing the first element is emitted as is.
    pub fn scan(&self, mut f: impl FnMut(&T, &T, usize) -> T, init: Option<T>) -> Array<T> {
        let mut out: Vec<T> = Vec::with_capacity(self.len());
        let mut acc = init;
        for (item, i) in self.indexed() {
            let next = match &acc {
                Some(acc) => f(acc, item, i),
                None => item.clone(),
            };
            out.push(next.clone());
            acc = Some(next);
        }
        Array::new(out)
    }

    /// Inclusive slice between two positions.
    pub fn slice(&self, start: i64, stop: i64) -> Result<Array<T>> {
        self.slice_step(start, stop, 1)
    }

    /// Inclusive slice walking by `step`. Negative steps walk backwards and
    /// need `start >= stop`. Bounds past either end are clamped; a start one
    /// past the stop yields an empty array.
    pub fn slice_step(&self, start: i64, stop: i64, step: i64) -> Result<Array<T>> {
        if step == 0 {
            return Err(invalid("slice", "step must be nonzero"));
        }
        let len = self.len() as i64;
        let start = normalize(self.len(), start);
        let stop = normalize(self.len(), stop);

        // Order checks in i128 so extreme bounds cannot overflow.
        let (wide_start, wide_stop) = (start as i128, stop as i128);
        let mut out = Vec::new();
        if step > 0 {
            if wide_start > wide_stop + 1 {
                return Err(invalid("slice", "start is after stop"));
            }
            let mut pos = start.max(1);
            let last = stop.min(len);
            while pos <= last {
                out.push(self.items[(pos - 1) as usize].clone());
                let Some(next) = pos.checked_add(step) else { break };
                pos = next;
            }
        } else {
            if wide_start + 1 < wide_stop {
                return Err(invalid("slice", "start is before stop for a negative step"));
            }
            let mut pos = start.min(len);
            let last = stop.max(1);
            while pos >= last {
                out.push(self.items[(pos - 1) as usize].clone());
                let Some(next) = pos.checked_add(step) else { break };
                pos = next;
            }
        }
        Ok(Array::new(out))
    }

    /// The first `n` elements.
    pub fn take(&self, n: usize) -> Array<T> {
        self.items.iter().take(n).cloned().collect()
    }

    /// `n` elements starting at position `start`.
    pub fn take_from(&self, n: usize, start: i64) -> Array<T> {
        match resolve(self.len(), start) {
            Some(index) => self.items[index..].iter().take(n).cloned().collect(),
            None => Array::empty(),
        }
    }

    /// Every `step`th element from `start`, up to `count` of them.
    pub fn take_every(&self, step: usize, start: i64, count: Option<usize>) -> Result<Array<T>> {
        if step == 0 {
            return Err(invalid("take_every", "step must be positive"));
        }
        let Some(index) = resolve(self.len(), start) else {
            return Ok(Array::empty());
        };
        let picked = self.items[index..].iter().step_by(step).cloned();
        Ok(match count {
            Some(count) => picked.take(count).collect(),
            None => picked.collect(),
        })
    }

    /// Appends `other` after `self`.
    pub fn concat(&self, other: &Array<T>) -> Array<T> {
        let mut items = Vec::with_capacity(self.len() + other.len());
        items.extend_from_slice(&self.items);
        items.extend_from_slice(&other.items);
        Array::new(items)
    }
}

impl<T: Clone + Hash + Eq> Array<T> {
    /// Drops repeats, keeping first-seen order.
    pub fn unique(&self) -> Array<T> {
        self.unique_by(|item| item.clone())
    }
}

impl<T: Clone> Array<T> {
    /// Drops elements whose key was already seen.
    pub fn unique_by<K: Hash + Eq>(&self, mut key: impl FnMut(&T) -> K) -> Array<T> {
        let mut seen = FxHashSet::default();
        self.items
            .iter()
            .filter(|item| seen.insert(key(*item)))
            .cloned()
            .collect()
    }
}

impl<A, B> Array<(A, B)> {
    pub fn unzip(self) -> (Array<A>, Array<B>) {
        let (left, right): (Vec<A>, Vec<B>) = self.items.into_iter().unzip();
        (Array::new(left), Array::new(right))
    }
}

impl<T> Array<Array<T>> {
    /// One level of nesting removed.
    pub fn flatten(self) -> Array<T> {
        self.items.into_iter().flat_map(|inner| inner.items).collect()
    }
}

impl<T: Clone + std::iter::Sum<T>> Array<T> {
    pub fn sum(&self) -> T {
        self.items.iter().cloned().sum()
    }
}

impl<T> Array<T>
where
    T: Copy + Default + Add<Output = T> + Mul<Output = T>,
{
    /// Discrete convolution: `len(self) + len(kernel) - 1` elements, or
    /// none when either side is empty.
    pub fn convolve(&self, kernel: &Array<T>) -> Array<T> {
        if self.is_empty() || kernel.is_empty() {
            return Array::empty();
        }
        let mut out = vec![T::default(); self.len() + kernel.len() - 1];
        for (i, &x) in self.items.iter().enumerate() {
            for (j, &y) in kernel.items.iter().enumerate() {
                out[i + j] = out[i + j] + x * y;
            }
        }
        Array::new(out)
    }
}

impl Array<i64> {
    /// `start, start + step, ...` up to and including `stop`.
    pub fn range(start: i64, stop: i64, step: i64) -> Result<Array<i64>> {
        if step == 0 {
            return Err(invalid("range", "step must be nonzero"));
        }
        if (step > 0 && start > stop) || (step < 0 && start < stop) {
            return Err(invalid("range", "bounds run against the step"));
        }
        let span = (stop as i128 - start as i128) / step as i128 + 1;
        if span > MAX_RANGE_LEN as i128 {
            return Err(invalid("range", "too many elements"));
        }
        Ok((0..span as i64).map(|k| start + k * step).collect())
    }
}
