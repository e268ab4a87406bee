//! The `Array` collection.
//!
//! Positions at this API are 1-based: callbacks receive `(element, index)`
//! with `index` starting at 1, searches report 1-based indices, and
//! positional arguments accept negative values counting back from the end
//! (`-1` is the last element).
//!
//! Every transformation builds a new array with a `Dense` tag. Only
//! [`Array::insert`], [`Array::set`], [`Array::push`] and [`Array::retag`]
//! mutate, and they hand back the same array.

mod overlay;
mod search;
mod transform;

pub use overlay::to_string_concat;
pub use search::Matcher;

use fnkit::transducer::{self, Transducer};

use crate::error::{Error, Result};
use crate::oracle::{self, Indexable};

/// Largest array `Array::range` will build.
pub const MAX_RANGE_LEN: usize = 1 << 24;

/// Where an array's elements came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tag {
    /// A plain contiguous sequence.
    #[default]
    Dense,
    /// Copied out of a proxy store measured by the length oracle.
    Sparse,
}

/// An ordered sequence with 1-based positions.
#[derive(Clone, Debug, Default)]
pub struct Array<T> {
    items: Vec<T>,
    tag: Tag,
}

/// Maps a 1-based or negative position onto a 0-based index into `len`
/// elements.
pub(crate) fn resolve(len: usize, pos: i64) -> Option<usize> {
    if pos > 0 {
        let index = (pos - 1) as usize;
        (index < len).then_some(index)
    } else if pos < 0 {
        let back = pos.unsigned_abs() as usize;
        len.checked_sub(back)
    } else {
        None
    }
}

fn out_of_bounds(op: &'static str) -> Error {
    Error::InvalidRange {
        op,
        reason: "position out of bounds",
    }
}

impl<T> Array<T> {
    pub fn new(items: Vec<T>) -> Array<T> {
        Array {
            items,
            tag: Tag::Dense,
        }
    }

    pub fn empty() -> Array<T> {
        Array::new(Vec::new())
    }

    pub fn with_tag(items: Vec<T>, tag: Tag) -> Array<T> {
        Array { items, tag }
    }

    /// Copies the contiguous prefix of `store` as measured by
    /// [`oracle::length`]. Proxy stores produce a `Sparse`-tagged array.
    pub fn from_sparse<S>(store: &S) -> Array<T>
    where
        S: Indexable<Item = T> + ?Sized,
        T: Clone,
    {
        let len = oracle::length(store);
        let items: Vec<T> = (1..=len).map_while(|i| store.get_at(i).cloned()).collect();
        let tag = if store.native_len() == 0 && len > 0 {
            Tag::Sparse
        } else {
            Tag::Dense
        };
        Array { items, tag }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn retag(&mut self, tag: Tag) -> &mut Self {
        self.tag = tag;
        self
    }

    /// Element at a 1-based or negative position.
    pub fn get(&self, pos: i64) -> Option<&T> {
        resolve(self.items.len(), pos).map(|i| &self.items[i])
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Elements paired with their 1-based index.
    pub fn indexed(&self) -> impl Iterator<Item = (&T, usize)> {
        self.items.iter().enumerate().map(|(i, item)| (item, i + 1))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Inserts so that `value` ends up at `pos`. Accepts `1..=len + 1`;
    /// `-1` appends.
    pub fn insert(&mut self, pos: i64, value: T) -> Result<&mut Self> {
        let slots = self.items.len() + 1;
        let index = resolve(slots, pos).ok_or_else(|| out_of_bounds("insert"))?;
        self.items.insert(index, value);
        Ok(self)
    }

    /// Replaces the element at `pos`. `len + 1` appends.
    pub fn set(&mut self, pos: i64, value: T) -> Result<&mut Self> {
        let len = self.items.len();
        if pos == len as i64 + 1 {
            self.items.push(value);
            return Ok(self);
        }
        let index = resolve(len, pos).ok_or_else(|| out_of_bounds("set"))?;
        self.items[index] = value;
        Ok(self)
    }

    pub fn push(&mut self, value: T) -> &mut Self {
        self.items.push(value);
        self
    }
}

impl<T: Clone + 'static> Array<T> {
    /// Folds the elements through a transducer in one pass.
    pub fn transduce<A, U>(
        &self,
        xf: &Transducer<A, T, U>,
        reducer: impl FnMut(A, U) -> A + 'static,
        init: A,
    ) -> A
    where
        A: 'static,
        U: 'static,
    {
        transducer::transduce(xf, reducer, init, self.items.iter().cloned())
    }

    /// Runs the elements through `xf` into a new array.
    pub fn transform<U: 'static>(&self, xf: &Transducer<Vec<U>, T, U>) -> Array<U> {
        Array::new(transducer::into_vec(xf, self.items.iter().cloned()))
    }
}

impl<T: 'static> Array<T> {
    /// Builds an array from any source run through `xf`.
    pub fn from_transducer<S, I>(xf: &Transducer<Vec<T>, S, T>, source: I) -> Array<T>
    where
        S: 'static,
        I: IntoIterator<Item = S>,
    {
        Array::new(transducer::into_vec(xf, source))
    }
}

impl<T> Indexable for Array<T> {
    type Item = T;

    fn native_len(&self) -> usize {
        self.items.len()
    }

    fn get_at(&self, index: usize) -> Option<&T> {
        self.items.get_at(index)
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(items: Vec<T>) -> Self {
        Array::new(items)
    }
}

impl<T: Clone> From<&[T]> for Array<T> {
    fn from(items: &[T]) -> Self {
        Array::new(items.to_vec())
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Array::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Array<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> AsRef<[T]> for Array<T> {
    fn as_ref(&self) -> &[T] {
        &self.items
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Array<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Sparse;
    use fnkit::transducer::{filter_t, map_t, take_t};

    #[test]
    fn resolve_positions() {
        assert_eq!(resolve(3, 1), Some(0));
        assert_eq!(resolve(3, 3), Some(2));
        assert_eq!(resolve(3, 4), None);
        assert_eq!(resolve(3, -1), Some(2));
        assert_eq!(resolve(3, -3), Some(0));
        assert_eq!(resolve(3, -4), None);
        assert_eq!(resolve(3, 0), None);
    }

    #[test]
    fn from_sparse_copies_prefix() {
        let store: Sparse<i32> = [(1, 10), (2, 20), (3, 30), (5, 50)].into_iter().collect();
        let array = Array::from_sparse(&store);
        assert_eq!(array.as_slice(), &[10, 20, 30]);
        assert_eq!(array.tag(), Tag::Sparse);

        let dense = Array::from_sparse(&vec![1, 2]);
        assert_eq!(dense.tag(), Tag::Dense);
    }

    #[test]
    fn from_sparse_without_first_slot() {
        let store: Sparse<i32> = [(2, 20)].into_iter().collect();
        let array = Array::from_sparse(&store);
        assert!(array.is_empty());
        assert_eq!(array.tag(), Tag::Dense);
    }

    #[test]
    fn get_first_last() {
        let array = Array::new(vec!['a', 'b', 'c']);
        assert_eq!(array.get(1), Some(&'a'));
        assert_eq!(array.get(-1), Some(&'c'));
        assert_eq!(array.get(0), None);
        assert_eq!(array.first(), Some(&'a'));
        assert_eq!(array.last(), Some(&'c'));
    }

    #[test]
    fn insert_positions() {
        let mut array = Array::new(vec![1, 2, 3]);
        array.insert(1, 0).unwrap();
        array.insert(-1, 4).unwrap();
        array.insert(3, 9).unwrap();
        assert_eq!(array.as_slice(), &[0, 1, 9, 2, 3, 4]);
        assert!(array.insert(8, 0).is_err());
        assert!(array.insert(0, 0).is_err());
    }

    #[test]
    fn set_in_place_keeps_tag() {
        let store: Sparse<i32> = [(1, 1), (2, 2)].into_iter().collect();
        let mut array = Array::from_sparse(&store);
        array.set(1, 10).unwrap().set(-1, 20).unwrap().set(3, 30).unwrap();
        assert_eq!(array.as_slice(), &[10, 20, 30]);
        assert_eq!(array.tag(), Tag::Sparse);
        assert_eq!(
            array.set(5, 0).unwrap_err(),
            Error::InvalidRange {
                op: "set",
                reason: "position out of bounds"
            }
        );
    }

    #[test]
    fn push_and_retag_chain() {
        let mut array = Array::empty();
        array.push(1).push(2).retag(Tag::Sparse);
        assert_eq!(array.len(), 2);
        assert_eq!(array.tag(), Tag::Sparse);
    }

    #[test]
    fn display_uses_braces() {
        assert_eq!(Array::new(vec![1, 2, 3]).to_string(), "{1, 2, 3}");
        assert_eq!(Array::<i32>::empty().to_string(), "{}");
    }

    #[test]
    fn transducer_glue() {
        let array: Array<i64> = (1..=10).collect();
        let xf = filter_t(|x: &i64| x % 2 == 0).then(map_t(|x: i64| x * 10)).then(take_t(3));
        assert_eq!(array.transform(&xf).as_slice(), &[20, 40, 60]);

        let sum = array.transduce(&map_t(|x: i64| x * x), |acc: i64, x| acc + x, 0);
        assert_eq!(sum, 385);

        let built = Array::from_transducer(&map_t(|x: i32| x * 3), vec![1, 2]);
        assert_eq!(built.as_slice(), &[3, 6]);
    }
}
