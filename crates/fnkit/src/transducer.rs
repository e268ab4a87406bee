//! Transducers: composable reducer transformations.
//!
//! A reducer folds one input into an accumulator. A transducer wraps a
//! reducer in another reducer, so a `filter -> map -> take` pipeline runs
//! as a single pass over the source with no intermediate collections.
//!
//! Transducers never see the whole source; they only get the per-element
//! callback and a [`Halt`] signal shared by the whole pipeline. The one
//! stateful transducer here, `take_t`, creates its counter when it is
//! applied to a reducer, so every `transduce` call starts counting from
//! zero even when the same composed transducer is reused. Once its quota
//! is met it raises the halt signal and `transduce` stops pulling from the
//! source, which makes infinite sources safe behind a `take_t`.
//!
//! Ordering: in `compose_t(outer, inner)` and `compose_all([t1, .., tn])`
//! the rightmost transducer sees each element first. `a.then(b)` reads in
//! flow order: `a` first, then `b`.

use std::cell::Cell;
use std::rc::Rc;

/// `(accumulator, input) -> accumulator`.
pub type Reducer<A, T> = Box<dyn FnMut(A, T) -> A>;

/// Early-termination flag shared by every stage of one pipeline run.
#[derive(Clone, Default, Debug)]
pub struct Halt(Rc<Cell<bool>>);

impl Halt {
    pub fn new() -> Halt {
        Halt::default()
    }

    /// Asks the driver to stop feeding elements.
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Turns a reducer over `U` into a reducer over `T`.
pub struct Transducer<A, T, U> {
    wrap: Rc<dyn Fn(Reducer<A, U>, &Halt) -> Reducer<A, T>>,
}

impl<A, T, U> Clone for Transducer<A, T, U> {
    fn clone(&self) -> Self {
        Transducer {
            wrap: Rc::clone(&self.wrap),
        }
    }
}

impl<A: 'static, T: 'static, U: 'static> Transducer<A, T, U> {
    pub fn new(wrap: impl Fn(Reducer<A, U>, &Halt) -> Reducer<A, T> + 'static) -> Self {
        Transducer { wrap: Rc::new(wrap) }
    }

    /// Wraps `reducer`. Any per-pipeline state is created here.
    pub fn apply(&self, reducer: Reducer<A, U>, halt: &Halt) -> Reducer<A, T> {
        (self.wrap)(reducer, halt)
    }

    /// Elements pass through `self`, then through `next`.
    pub fn then<V: 'static>(self, next: Transducer<A, U, V>) -> Transducer<A, T, V> {
        Transducer::new(move |reducer, halt| self.apply(next.apply(reducer, halt), halt))
    }
}

/// Applies `f` to every element.
pub fn map_t<A, T, U>(f: impl Fn(T) -> U + 'static) -> Transducer<A, T, U>
where
    A: 'static,
    T: 'static,
    U: 'static,
{
    let f = Rc::new(f);
    Transducer::new(move |mut reducer: Reducer<A, U>, _: &Halt| -> Reducer<A, T> {
        let f = Rc::clone(&f);
        Box::new(move |acc, item| reducer(acc, f(item)))
    })
}

/// Passes on only the elements matching `predicate`.
pub fn filter_t<A, T>(predicate: impl Fn(&T) -> bool + 'static) -> Transducer<A, T, T>
where
    A: 'static,
    T: 'static,
{
    let predicate = Rc::new(predicate);
    Transducer::new(move |mut reducer: Reducer<A, T>, _: &Halt| -> Reducer<A, T> {
        let predicate = Rc::clone(&predicate);
        Box::new(move |acc, item| {
            if predicate(&item) {
                reducer(acc, item)
            } else {
                acc
            }
        })
    })
}

/// Passes on the first `n` elements, then halts the pipeline.
pub fn take_t<A, T>(n: usize) -> Transducer<A, T, T>
where
    A: 'static,
    T: 'static,
{
    Transducer::new(move |mut reducer: Reducer<A, T>, halt: &Halt| -> Reducer<A, T> {
        if n == 0 {
            halt.stop();
        }
        let halt = halt.clone();
        let mut taken = 0usize;
        Box::new(move |acc, item| {
            if taken >= n {
                return acc;
            }
            taken += 1;
            if taken == n {
                halt.stop();
            }
            reducer(acc, item)
        })
    })
}

/// Composes two transducers; `inner` sees each element first.
pub fn compose_t<A, T, U, V>(
    outer: Transducer<A, U, V>,
    inner: Transducer<A, T, U>,
) -> Transducer<A, T, V>
where
    A: 'static,
    T: 'static,
    U: 'static,
    V: 'static,
{
    inner.then(outer)
}

/// Composes a homogeneous list; the last transducer sees each element first.
pub fn compose_all<A: 'static, T: 'static>(transducers: Vec<Transducer<A, T, T>>) -> Transducer<A, T, T> {
    Transducer::new(move |reducer: Reducer<A, T>, halt: &Halt| {
        let mut reducer = reducer;
        for transducer in transducers.iter() {
            reducer = transducer.apply(reducer, halt);
        }
        reducer
    })
}

/// Runs `source` through `xf` into `reducer`, starting from `init`.
///
/// Stops pulling from `source` as soon as a stage raises the halt signal,
/// so an unbounded source terminates when the pipeline contains a
/// `take_t`. Without one, `source` is drained completely.
pub fn transduce<A, T, U, I>(
    xf: &Transducer<A, T, U>,
    reducer: impl FnMut(A, U) -> A + 'static,
    init: A,
    source: I,
) -> A
where
    A: 'static,
    T: 'static,
    U: 'static,
    I: IntoIterator<Item = T>,
{
    let halt = Halt::new();
    let mut step = xf.apply(Box::new(reducer), &halt);
    let mut acc = init;
    if halt.is_stopped() {
        return acc;
    }
    for item in source {
        acc = step(acc, item);
        if halt.is_stopped() {
            break;
        }
    }
    acc
}

/// Collects the output of `xf` into a vector.
pub fn into_vec<T, U, I>(xf: &Transducer<Vec<U>, T, U>, source: I) -> Vec<U>
where
    T: 'static,
    U: 'static,
    I: IntoIterator<Item = T>,
{
    transduce(
        xf,
        |mut out: Vec<U>, item| {
            out.push(item);
            out
        },
        Vec::new(),
        source,
    )
}
