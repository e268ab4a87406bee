//! Classic combinators.
//!
//! All of these are pure: calling one twice with the same arguments yields
//! closures that behave identically. `compose` applies right-to-left,
//! `pipe` applies left-to-right; the `compose!` and `pipe!` macros extend
//! both to any number of stages with differing types.

/// Returns its argument.
pub fn identity<T>(x: T) -> T {
    x
}

/// A function that ignores its argument and returns `value`.
pub fn constant<T: Clone, A>(value: T) -> impl Fn(A) -> T {
    move |_: A| value.clone()
}

/// Swaps the two arguments of `f`.
pub fn flip<A, B, R>(f: impl Fn(A, B) -> R) -> impl Fn(B, A) -> R {
    move |b: B, a: A| f(a, b)
}

/// `compose(f, g)(x) == f(g(x))`.
pub fn compose<A, B, C>(f: impl Fn(B) -> C, g: impl Fn(A) -> B) -> impl Fn(A) -> C {
    move |x: A| f(g(x))
}

/// `pipe(f, g)(x) == g(f(x))`.
pub fn pipe<A, B, C>(f: impl Fn(A) -> B, g: impl Fn(B) -> C) -> impl Fn(A) -> C {
    move |x: A| g(f(x))
}

/// Composes a homogeneous chain; the last function runs first.
/// An empty chain is the identity.
pub fn compose_all<T>(fns: Vec<Box<dyn Fn(T) -> T>>) -> impl Fn(T) -> T {
    move |x: T| fns.iter().rev().fold(x, |acc, f| f(acc))
}

/// Pipes a homogeneous chain; the first function runs first.
pub fn pipe_all<T>(fns: Vec<Box<dyn Fn(T) -> T>>) -> impl Fn(T) -> T {
    move |x: T| fns.iter().fold(x, |acc, f| f(acc))
}

/// Binds the first argument of a binary function.
pub fn partial<A: Clone, B, R>(f: impl Fn(A, B) -> R, a: A) -> impl Fn(B) -> R {
    move |b: B| f(a.clone(), b)
}

/// Binds the last argument of a binary function.
pub fn partial_right<A, B: Clone, R>(f: impl Fn(A, B) -> R, b: B) -> impl Fn(A) -> R {
    move |a: A| f(a, b.clone())
}

/// Negates a predicate.
pub fn complement<T: ?Sized>(pred: impl Fn(&T) -> bool) -> impl Fn(&T) -> bool {
    move |x: &T| !pred(x)
}

/// Runs `f` for its side effect and passes the value through.
pub fn tap<T>(f: impl Fn(&T)) -> impl Fn(T) -> T {
    move |x: T| {
        f(&x);
        x
    }
}

/// Right-to-left composition of any number of unary functions.
///
/// ```
/// let f = fnkit::compose!(|x: i32| x - 1, |x: i32| x * 10, |s: &str| s.len() as i32);
/// assert_eq!(f("abc"), 29);
/// ```
#[macro_export]
macro_rules! compose {
    ($f:expr $(,)?) => {
        $f
    };
    ($f:expr, $($rest:expr),+ $(,)?) => {
        $crate::combinator::compose($f, $crate::compose!($($rest),+))
    };
}

/// Left-to-right composition of any number of unary functions.
///
/// ```
/// let f = fnkit::pipe!(|s: &str| s.len() as i32, |x: i32| x * 10, |x: i32| x - 1);
/// assert_eq!(f("abc"), 29);
/// ```
#[macro_export]
macro_rules! pipe {
    ($f:expr $(,)?) => {
        $f
    };
    ($f:expr, $($rest:expr),+ $(,)?) => {
        $crate::combinator::pipe($f, $crate::pipe!($($rest),+))
    };
}
