//! Function-level building blocks for the `arraykit` collection core.
//!
//! Everything here operates on plain functions and iterators, independent
//! of any particular collection type:
//!
//! | Module | Provides |
//! |--------|----------|
//! | `combinator` | identity, constant, flip, compose, pipe, partial |
//! | `curry` | fixed-arity fast paths and the `Curried` state machine |
//! | `transducer` | fused map/filter/take pipelines |
//! | `maybe` | `Maybe<T>` with map/bind/ap and lifting |
//! | `memo` | bounded memoization cache with full-clear eviction |
//! | `lazy` | iterate/unfold iterators and a memoizing stream |
//!
//! # Example
//!
//! ```
//! use fnkit::compose;
//! use fnkit::curry::curry3;
//! use fnkit::maybe::Maybe;
//!
//! let add3 = curry3(|a: i32, b: i32, c: i32| a + b + c);
//! assert_eq!(add3(1)(2)(3), 6);
//!
//! let inc_then_double = compose!(|x: i32| x * 2, |x: i32| x + 1);
//! assert_eq!(inc_then_double(4), 10);
//!
//! let half = |x: i32| if x % 2 == 0 { Maybe::Just(x / 2) } else { Maybe::Nothing };
//! assert_eq!(Maybe::Just(8).bind(half).bind(half), Maybe::Just(2));
//! assert_eq!(Maybe::Just(6).bind(half).bind(half), Maybe::Nothing);
//! ```

pub mod combinator;
pub mod curry;
pub mod lazy;
pub mod maybe;
pub mod memo;
pub mod transducer;
