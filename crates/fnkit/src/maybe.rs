//! The Maybe monad.
//!
//! `Maybe<T>` is either `Just(value)` or `Nothing`. Presence lives in the
//! tag alone: `Just(0)`, `Just(false)` and `Just("")` are all present.
//!
//! Laws (checked by the property tests):
//!
//! ```text
//! m.map(id)              == m
//! m.bind(f).bind(g)      == m.bind(|x| f(x).bind(g))
//! m.map(f)               == m.bind(|x| Just(f(x)))
//! ```

/// An optional value with monadic composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Maybe<T> {
    Just(T),
    Nothing,
}

pub use Maybe::{Just, Nothing};

impl<T> Maybe<T> {
    pub fn just(value: T) -> Maybe<T> {
        Just(value)
    }

    pub fn nothing() -> Maybe<T> {
        Nothing
    }

    /// True for any `Just`, whatever its payload.
    pub fn is_just(&self) -> bool {
        matches!(self, Just(_))
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Nothing)
    }

    pub fn as_ref(&self) -> Maybe<&T> {
        match self {
            Just(value) => Just(value),
            Nothing => Nothing,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Maybe<U> {
        match self {
            Just(value) => Just(f(value)),
            Nothing => Nothing,
        }
    }

    /// Flat map: `f` decides whether the chain continues.
    pub fn bind<U>(self, f: impl FnOnce(T) -> Maybe<U>) -> Maybe<U> {
        match self {
            Just(value) => f(value),
            Nothing => Nothing,
        }
    }

    /// The payload, or `default`.
    pub fn from_maybe(self, default: T) -> T {
        match self {
            Just(value) => value,
            Nothing => default,
        }
    }

    /// Catamorphism: `f(value)` for `Just`, `default` for `Nothing`.
    pub fn maybe<U>(self, default: U, f: impl FnOnce(T) -> U) -> U {
        match self {
            Just(value) => f(value),
            Nothing => default,
        }
    }

    /// `self` if present, else `other`.
    pub fn or(self, other: Maybe<T>) -> Maybe<T> {
        match self {
            Just(_) => self,
            Nothing => other,
        }
    }

    /// Keeps the payload only if it satisfies `predicate`.
    pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Maybe<T> {
        match self {
            Just(value) => {
                if predicate(&value) {
                    Just(value)
                } else {
                    Nothing
                }
            }
            Nothing => Nothing,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Just(value) => Some(value),
            Nothing => None,
        }
    }
}

impl<F> Maybe<F> {
    /// Applies a wrapped function to a wrapped value; `Nothing` on either
    /// side short-circuits.
    pub fn ap<A, B>(self, value: Maybe<A>) -> Maybe<B>
    where
        F: FnOnce(A) -> B,
    {
        match (self, value) {
            (Just(f), Just(a)) => Just(f(a)),
            _ => Nothing,
        }
    }
}

impl<T> Maybe<Maybe<T>> {
    pub fn flatten(self) -> Maybe<T> {
        self.bind(|inner| inner)
    }
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Nothing
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(option: Option<T>) -> Self {
        match option {
            Some(value) => Just(value),
            None => Nothing,
        }
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(maybe: Maybe<T>) -> Self {
        maybe.into_option()
    }
}

/// Lifts a plain function into one over `Maybe`.
pub fn lift<A, B>(f: impl Fn(A) -> B) -> impl Fn(Maybe<A>) -> Maybe<B> {
    move |m: Maybe<A>| m.map(&f)
}

/// Lifts a binary function; `Nothing` in either argument gives `Nothing`.
pub fn lift2<A, B, C>(f: impl Fn(A, B) -> C) -> impl Fn(Maybe<A>, Maybe<B>) -> Maybe<C> {
    move |a: Maybe<A>, b: Maybe<B>| match (a, b) {
        (Just(a), Just(b)) => Just(f(a, b)),
        _ => Nothing,
    }
}

/// `Just` of all payloads if every element is `Just`, else `Nothing`.
pub fn sequence<T>(items: impl IntoIterator<Item = Maybe<T>>) -> Maybe<Vec<T>> {
    let mut out = Vec::new();
    for item in items {
        match item {
            Just(value) => out.push(value),
            Nothing => return Nothing,
        }
    }
    Just(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn safe_div(x: i32) -> impl Fn(i32) -> Maybe<i32> {
        move |d: i32| if d == 0 { Nothing } else { Just(x / d) }
    }

    #[test]
    fn falsy_payload_is_still_just() {
        assert!(Just(0).is_just());
        assert!(Just(false).is_just());
        assert!(Just("").is_just());
        assert!(Maybe::<i32>::nothing().is_nothing());
    }

    #[test]
    fn map_and_bind() {
        assert_eq!(Just(3).map(|x| x + 1), Just(4));
        assert_eq!(Nothing.map(|x: i32| x + 1), Nothing);
        assert_eq!(Just(5).bind(safe_div(100)), Just(20));
        assert_eq!(Just(0).bind(safe_div(100)), Nothing);
        assert_eq!(Nothing.bind(safe_div(100)), Nothing);
    }

    #[test]
    fn ap_short_circuits() {
        let add1 = |x: i32| x + 1;
        assert_eq!(Just(add1).ap(Just(1)), Just(2));
        assert_eq!(Just(add1).ap(Nothing), Nothing);
        assert_eq!(Maybe::<fn(i32) -> i32>::Nothing.ap(Just(1)), Nothing);
    }

    #[test]
    fn extraction() {
        assert_eq!(Just(1).from_maybe(9), 1);
        assert_eq!(Nothing.from_maybe(9), 9);
        assert_eq!(Just(2).maybe(0, |x| x * 10), 20);
        assert_eq!(Nothing.maybe(0, |x: i32| x * 10), 0);
    }

    #[test]
    fn or_and_filter() {
        assert_eq!(Nothing.or(Just(2)), Just(2));
        assert_eq!(Just(1).or(Just(2)), Just(1));
        assert_eq!(Just(4).filter(|x| x % 2 == 0), Just(4));
        assert_eq!(Just(3).filter(|x| x % 2 == 0), Nothing);
    }

    #[test]
    fn lifting() {
        let double = lift(|x: i32| x * 2);
        assert_eq!(double(Just(4)), Just(8));
        assert_eq!(double(Nothing), Nothing);

        let add = lift2(|a: i32, b: i32| a + b);
        assert_eq!(add(Just(1), Just(2)), Just(3));
        assert_eq!(add(Just(1), Nothing), Nothing);
    }

    #[test]
    fn sequence_all_or_nothing() {
        assert_eq!(sequence(vec![Just(1), Just(2)]), Just(vec![1, 2]));
        assert_eq!(sequence(vec![Just(1), Nothing]), Nothing);
        assert_eq!(sequence(Vec::<Maybe<i32>>::new()), Just(vec![]));
    }

    #[test]
    fn option_round_trip() {
        assert_eq!(Maybe::from(Some(1)), Just(1));
        assert_eq!(Option::<i32>::from(Nothing), None);
        assert_eq!(Just(Just(1)).flatten(), Just(1));
    }
}
