//! Arraykit - 1-based functional arrays with a sparse-aware length oracle.
//!
//! # Quick Start
//!
//! ```
//! use arraykit::Array;
//! use arraykit::oracle::{self, Sparse};
//!
//! // Length of a store with holes: any border is a valid answer.
//! let store: Sparse<i32> = [(1, 10), (2, 20), (3, 30)].into_iter().collect();
//! assert_eq!(oracle::length(&store), 3);
//!
//! // Callbacks see 1-based indices.
//! let xs = Array::new(vec![5, 6, 7]);
//! let tagged = xs.map(|x, i| x * 10 + i as i32);
//! assert_eq!(tagged, vec![51, 62, 73]);
//!
//! // Elementwise operators check sizes.
//! assert!((&xs + &Array::new(vec![1])).is_err());
//! ```
//!
//! The dynamic layer in [`value`] and [`builtins`] carries the same
//! operations over heterogeneous values with kind-checked arguments.
//! Function-level tools (currying, transducers, `Maybe`, memoization) live
//! in the [`fnkit`] crate, re-exported here.

pub mod array;
pub mod builtins;
pub mod error;
pub mod oracle;
pub mod value;

pub use array::{Array, MAX_RANGE_LEN, Matcher, Tag, to_string_concat};
pub use error::{Error, Result};
pub use fnkit;
pub use value::{Function, KeyStrategy, Kind, Value, ValueKey};
