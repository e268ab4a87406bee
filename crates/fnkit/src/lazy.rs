//! Lazy sequences.
//!
//! `iterate` and `unfold` are plain iterators: nothing is computed until
//! `next()` asks for it. `Stream` is a cons-stream whose tail is a delayed
//! thunk, forced at most once and then remembered, so walking the same
//! stream twice does the work once.

use std::cell::RefCell;
use std::rc::Rc;

/// `seed, f(seed), f(f(seed)), ...`
pub struct Iterate<T, F> {
    next: Option<T>,
    f: F,
}

pub fn iterate<T, F: FnMut(&T) -> T>(seed: T, f: F) -> Iterate<T, F> {
    Iterate { next: Some(seed), f }
}

impl<T, F: FnMut(&T) -> T> Iterator for Iterate<T, F> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let current = self.next.take()?;
        self.next = Some((self.f)(&current));
        Some(current)
    }
}

/// Produces items from a state until `f` returns `None`.
pub struct Unfold<S, F> {
    state: Option<S>,
    f: F,
}

pub fn unfold<S, T, F: FnMut(S) -> Option<(T, S)>>(state: S, f: F) -> Unfold<S, F> {
    Unfold { state: Some(state), f }
}

impl<S, T, F: FnMut(S) -> Option<(T, S)>> Iterator for Unfold<S, F> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let state = self.state.take()?;
        let (item, next) = (self.f)(state)?;
        self.state = Some(next);
        Some(item)
    }
}

enum Tail<T> {
    Delayed(Box<dyn FnOnce() -> Stream<T>>),
    Forcing,
    Forced(Stream<T>),
}

struct Node<T> {
    head: T,
    tail: RefCell<Tail<T>>,
}

/// A memoizing cons-stream.
pub struct Stream<T> {
    node: Option<Rc<Node<T>>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Stream {
            node: self.node.clone(),
        }
    }
}

/// Unlinks forced cells one at a time, so a long chain does not drop
/// recursively.
impl<T> Drop for Stream<T> {
    fn drop(&mut self) {
        let mut next = self.node.take();
        while let Some(node) = next {
            let Ok(node) = Rc::try_unwrap(node) else {
                break;
            };
            next = match node.tail.into_inner() {
                Tail::Forced(mut rest) => rest.node.take(),
                Tail::Delayed(_) | Tail::Forcing => None,
            };
        }
    }
}

impl<T: 'static> Stream<T> {
    pub fn empty() -> Stream<T> {
        Stream { node: None }
    }

    /// A stream of `head` followed by whatever `tail` produces when forced.
    pub fn cons(head: T, tail: impl FnOnce() -> Stream<T> + 'static) -> Stream<T> {
        Stream {
            node: Some(Rc::new(Node {
                head,
                tail: RefCell::new(Tail::Delayed(Box::new(tail))),
            })),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    pub fn head(&self) -> Option<&T> {
        self.node.as_ref().map(|node| &node.head)
    }

    /// Forces the tail once; later calls return the remembered stream.
    /// A tail that demands itself while being computed sees an empty stream.
    pub fn tail(&self) -> Stream<T> {
        let Some(node) = &self.node else {
            return Stream::empty();
        };
        let thunk = {
            let mut slot = node.tail.borrow_mut();
            match std::mem::replace(&mut *slot, Tail::Forcing) {
                Tail::Forced(stream) => {
                    *slot = Tail::Forced(stream.clone());
                    return stream;
                }
                Tail::Forcing => {
                    log::debug!("stream tail demanded while it was being forced");
                    return Stream::empty();
                }
                Tail::Delayed(thunk) => thunk,
            }
        };
        let forced = thunk();
        *node.tail.borrow_mut() = Tail::Forced(forced.clone());
        forced
    }

    /// Lazily yields the contents of `iter`.
    pub fn from_iter<I>(iter: I) -> Stream<T>
    where
        I: Iterator<Item = T> + 'static,
    {
        let mut iter = iter;
        match iter.next() {
            Some(head) => Stream::cons(head, move || Stream::from_iter(iter)),
            None => Stream::empty(),
        }
    }

    /// `seed, f(seed), f(f(seed)), ...` as a stream.
    pub fn iterate(seed: T, f: impl Fn(&T) -> T + 'static) -> Stream<T> {
        fn go<T: 'static>(seed: T, f: Rc<dyn Fn(&T) -> T>) -> Stream<T> {
            let next = f(&seed);
            Stream::cons(seed, move || go(next, f))
        }
        go(seed, Rc::new(f))
    }

    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Stream<U> {
        fn go<T: 'static, U: 'static>(stream: Stream<T>, f: Rc<dyn Fn(&T) -> U>) -> Stream<U> {
            let Some(head) = stream.head() else {
                return Stream::empty();
            };
            let mapped = f(head);
            Stream::cons(mapped, move || go(stream.tail(), f))
        }
        go(self.clone(), Rc::new(f))
    }

    /// Skips ahead to the first matching element, then stays lazy. On an
    /// infinite stream with no further match this does not return.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Stream<T>
    where
        T: Clone,
    {
        fn go<T: Clone + 'static>(stream: Stream<T>, predicate: Rc<dyn Fn(&T) -> bool>) -> Stream<T> {
            let mut current = stream;
            while let Some(head) = current.head() {
                if predicate(head) {
                    let head = head.clone();
                    let rest = current.clone();
                    return Stream::cons(head, move || go(rest.tail(), predicate));
                }
                current = current.tail();
            }
            Stream::empty()
        }
        go(self.clone(), Rc::new(predicate))
    }

    pub fn iter(&self) -> StreamIter<T> {
        StreamIter {
            current: self.clone(),
            started: false,
        }
    }

    /// The first `n` elements.
    pub fn take(&self, n: usize) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().take(n).collect()
    }
}

/// Walks a stream. A tail is forced only when the element after it is
/// asked for.
pub struct StreamIter<T> {
    current: Stream<T>,
    started: bool,
}

impl<T: Clone + 'static> Iterator for StreamIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.started {
            self.current = self.current.tail();
        }
        self.started = true;
        self.current.head().cloned()
    }
}
