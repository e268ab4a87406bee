//! Currying and partial application.
//!
//! Two flavours:
//!
//! 1. `curry2` / `curry3` are fixed-arity fast paths that return nested
//!    closures, one boxed stage per argument.
//!
//! 2. `Curried` is an explicit state machine for arbitrary arity. It keeps
//!    the captured arguments and the remaining count, and each `apply`
//!    either returns a new partial state or runs the function. Arguments
//!    may be supplied in any grouping: `c(1)(2)(3)`, `c(1, 2)(3)`, and
//!    `c(1, 2, 3)` all end in the same call.
//!
//! Supplying more arguments than remain is an error rather than a silent
//! truncation. `apply_truncating` keeps the permissive behaviour for
//! callers that ask for it.

use std::rc::Rc;

use smallvec::SmallVec;

/// Most curried functions in practice take four or fewer arguments.
const INLINE_ARGS: usize = 4;

/// Returned when a curried function receives more arguments than remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityError {
    /// Arguments the function still accepted.
    pub expected: usize,
    /// Arguments actually supplied in the offending call.
    pub supplied: usize,
}

impl std::fmt::Display for ArityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(
            f,
            "curried function expected at most {} argument(s), got {}",
            self.expected, self.supplied
        );
    }
}

impl std::error::Error for ArityError {}

/// Curries a binary function.
pub fn curry2<A, B, R>(f: impl Fn(A, B) -> R + 'static) -> impl Fn(A) -> Box<dyn Fn(B) -> R>
where
    A: Clone + 'static,
    B: 'static,
    R: 'static,
{
    let f: Rc<dyn Fn(A, B) -> R> = Rc::new(f);
    return move |a: A| -> Box<dyn Fn(B) -> R> {
        let f = Rc::clone(&f);
        Box::new(move |b: B| f(a.clone(), b))
    };
}

/// Curries a ternary function.
pub fn curry3<A, B, C, R>(
    f: impl Fn(A, B, C) -> R + 'static,
) -> impl Fn(A) -> Box<dyn Fn(B) -> Box<dyn Fn(C) -> R>>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: 'static,
    R: 'static,
{
    let f: Rc<dyn Fn(A, B, C) -> R> = Rc::new(f);
    return move |a: A| -> Box<dyn Fn(B) -> Box<dyn Fn(C) -> R>> {
        let f = Rc::clone(&f);
        Box::new(move |b: B| -> Box<dyn Fn(C) -> R> {
            let f = Rc::clone(&f);
            let a = a.clone();
            Box::new(move |c: C| f(a.clone(), b.clone(), c))
        })
    };
}

/// The outcome of applying arguments to a `Curried` function.
pub enum Applied<A, R> {
    /// More arguments are needed.
    Partial(Curried<A, R>),
    /// All arguments were supplied and the function ran.
    Done(R),
}

impl<A, R> Applied<A, R> {
    /// The result, if the function ran.
    pub fn done(self) -> Option<R> {
        return match self {
            Applied::Done(result) => Some(result),
            Applied::Partial(_) => None,
        };
    }

    /// The partial state, if more arguments are needed.
    pub fn partial(self) -> Option<Curried<A, R>> {
        return match self {
            Applied::Partial(curried) => Some(curried),
            Applied::Done(_) => None,
        };
    }

    pub fn is_done(&self) -> bool {
        return matches!(self, Applied::Done(_));
    }
}

impl<A, R: std::fmt::Debug> std::fmt::Debug for Applied<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return match self {
            Applied::Partial(curried) => write!(f, "Partial({:?})", curried),
            Applied::Done(result) => write!(f, "Done({:?})", result),
        };
    }
}

/// A function of fixed arity that accepts its arguments in any grouping.
pub struct Curried<A, R> {
    f: Rc<dyn Fn(&[A]) -> R>,
    arity: usize,
    captured: SmallVec<[A; INLINE_ARGS]>,
}

impl<A: Clone, R> Clone for Curried<A, R> {
    fn clone(&self) -> Self {
        return Curried {
            f: Rc::clone(&self.f),
            arity: self.arity,
            captured: self.captured.clone(),
        };
    }
}

impl<A, R> std::fmt::Debug for Curried<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(
            f,
            "Curried {{ arity: {}, captured: {}, remaining: {} }}",
            self.arity,
            self.captured.len(),
            self.remaining()
        );
    }
}

impl<A, R> Curried<A, R> {
    /// Total number of arguments the function takes.
    pub fn arity(&self) -> usize {
        return self.arity;
    }

    /// Arguments already captured.
    pub fn captured(&self) -> &[A] {
        return &self.captured;
    }

    /// Arguments still needed before the function runs.
    pub fn remaining(&self) -> usize {
        return self.arity - self.captured.len();
    }
}

impl<A: Clone, R> Curried<A, R> {
    /// Wraps `f`, which always receives exactly `arity` arguments.
    pub fn new(arity: usize, f: impl Fn(&[A]) -> R + 'static) -> Curried<A, R> {
        return Curried {
            f: Rc::new(f),
            arity,
            captured: SmallVec::new(),
        };
    }

    /// Supplies `args`. Errors if more arguments are given than remain.
    pub fn apply(&self, args: &[A]) -> Result<Applied<A, R>, ArityError> {
        if args.len() > self.remaining() {
            log::debug!(
                "curried over-application: {} remaining, {} supplied",
                self.remaining(),
                args.len()
            );
            return Err(ArityError {
                expected: self.remaining(),
                supplied: args.len(),
            });
        }
        return Ok(self.accept(args));
    }

    /// Supplies `args`, silently discarding any beyond the remaining count.
    pub fn apply_truncating(&self, args: &[A]) -> Applied<A, R> {
        let take = args.len().min(self.remaining());
        return self.accept(&args[..take]);
    }

    /// Convenience for a single argument.
    pub fn apply1(&self, arg: A) -> Result<Applied<A, R>, ArityError> {
        return self.apply(std::slice::from_ref(&arg));
    }

    fn accept(&self, args: &[A]) -> Applied<A, R> {
        // Nothing captured and everything supplied: call straight through.
        if self.captured.is_empty() && args.len() == self.arity {
            return Applied::Done((self.f)(args));
        }

        let mut captured = self.captured.clone();
        captured.extend(args.iter().cloned());
        if captured.len() == self.arity {
            return Applied::Done((self.f)(&captured));
        }
        return Applied::Partial(Curried {
            f: Rc::clone(&self.f),
            arity: self.arity,
            captured,
        });
    }
}

/// Binds leading arguments of an n-ary function, returning a `Curried`
/// waiting for the rest.
pub fn partial<A: Clone + 'static, R: 'static>(
    arity: usize,
    f: impl Fn(&[A]) -> R + 'static,
    leading: &[A],
) -> Result<Applied<A, R>, ArityError> {
    return Curried::new(arity, f).apply(leading);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum3() -> Curried<i64, i64> {
        return Curried::new(3, |args: &[i64]| args[0] * 100 + args[1] * 10 + args[2]);
    }

    #[test]
    fn curry2_nests() {
        let sub = curry2(|a: i32, b: i32| a - b);
        assert_eq!(sub(10)(3), 7);
        let from_ten = sub(10);
        assert_eq!(from_ten(1), 9);
        assert_eq!(from_ten(2), 8);
    }

    #[test]
    fn curry3_nests() {
        let f = curry3(|a: i32, b: i32, c: i32| a * 100 + b * 10 + c);
        assert_eq!(f(1)(2)(3), 123);
        let g = f(4)(5);
        assert_eq!(g(6), 456);
        assert_eq!(g(7), 457);
    }

    #[test]
    fn one_at_a_time() {
        let c = sum3();
        let c = c.apply(&[1]).unwrap().partial().unwrap();
        assert_eq!(c.remaining(), 2);
        let c = c.apply(&[2]).unwrap().partial().unwrap();
        assert_eq!(c.apply(&[3]).unwrap().done(), Some(123));
    }

    #[test]
    fn grouped_arguments() {
        let c = sum3();
        let c = c.apply(&[1, 2]).unwrap().partial().unwrap();
        assert_eq!(c.apply(&[3]).unwrap().done(), Some(123));
        assert_eq!(sum3().apply(&[1, 2, 3]).unwrap().done(), Some(123));
    }

    #[test]
    fn partial_states_are_reusable() {
        let c = sum3().apply(&[1]).unwrap().partial().unwrap();
        assert_eq!(c.apply(&[2, 3]).unwrap().done(), Some(123));
        assert_eq!(c.apply(&[5, 6]).unwrap().done(), Some(156));
    }

    #[test]
    fn empty_application_keeps_state() {
        let c = sum3().apply(&[]).unwrap().partial().unwrap();
        assert_eq!(c.remaining(), 3);
    }

    #[test]
    fn over_application_fails() {
        let err = sum3().apply(&[1, 2, 3, 4]).unwrap_err();
        assert_eq!(err, ArityError { expected: 3, supplied: 4 });

        let c = sum3().apply(&[1, 2]).unwrap().partial().unwrap();
        let err = c.apply(&[3, 4]).unwrap_err();
        assert_eq!(err, ArityError { expected: 1, supplied: 2 });
    }

    #[test]
    fn truncating_discards_extras() {
        let applied = sum3().apply_truncating(&[1, 2, 3, 4]);
        assert_eq!(applied.done(), Some(123));
    }

    #[test]
    fn zero_arity_runs_immediately() {
        let c: Curried<i32, &str> = Curried::new(0, |_| "ran");
        assert_eq!(c.apply(&[]).unwrap().done(), Some("ran"));
    }

    #[test]
    fn high_arity_accumulates() {
        let c = Curried::new(8, |args: &[u32]| args.iter().sum::<u32>());
        let mut state = c;
        for i in 1..8 {
            state = state.apply1(i).unwrap().partial().unwrap();
        }
        assert_eq!(state.captured().len(), 7);
        assert_eq!(state.apply1(8).unwrap().done(), Some(36));
    }

    #[test]
    fn partial_helper_binds_leading() {
        let rest = partial(3, |a: &[i32]| a.iter().product::<i32>(), &[2])
            .unwrap()
            .partial()
            .unwrap();
        assert_eq!(rest.apply(&[3, 4]).unwrap().done(), Some(24));
    }

    #[test]
    fn owned_arguments_are_captured() {
        let join = Curried::new(3, |parts: &[String]| parts.concat());
        let head = join.apply(&["a".to_string()]).unwrap().partial().unwrap();
        assert_eq!(
            format!("{:?}", head),
            "Curried { arity: 3, captured: 1, remaining: 2 }"
        );
        let out = head.apply(&["b".to_string(), "c".to_string()]).unwrap();
        assert_eq!(format!("{:?}", out), "Done(\"abc\")");
    }
}
