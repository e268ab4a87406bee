//! Operators on arrays.
//!
//! Two arrays combine elementwise and must have the same length, so those
//! operators return `Result`. An array and a bare number broadcast the
//! number over every element and cannot fail; the number may sit on either
//! side. Broadcast is implemented for `f64`, `f32`, `i64` and `i32`.
//! Integer division follows the primitive: a zero divisor panics, while
//! float division yields infinities or NaN.
//!
//! Appending is [`Array::concat`]. Joining two textual forms is the
//! separate [`to_string_concat`].

use std::fmt::Display;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::Array;
use crate::error::{Error, Result};

fn elementwise<T: Clone>(
    op: &'static str,
    lhs: &Array<T>,
    rhs: &Array<T>,
    f: impl Fn(T, T) -> T,
) -> Result<Array<T>> {
    if lhs.len() != rhs.len() {
        return Err(Error::SizeMismatch {
            op,
            left: lhs.len(),
            right: rhs.len(),
        });
    }
    Ok(lhs
        .iter()
        .zip(rhs.iter())
        .map(|(a, b)| f(a.clone(), b.clone()))
        .collect())
}

macro_rules! elementwise_op {
    ($trait:ident, $method:ident, $name:literal) => {
        impl<T: Clone + $trait<Output = T>> $trait<&Array<T>> for &Array<T> {
            type Output = Result<Array<T>>;

            fn $method(self, rhs: &Array<T>) -> Result<Array<T>> {
                elementwise($name, self, rhs, |a, b| a.$method(b))
            }
        }

        impl<T: Clone + $trait<Output = T>> $trait<Array<T>> for Array<T> {
            type Output = Result<Array<T>>;

            fn $method(self, rhs: Array<T>) -> Result<Array<T>> {
                elementwise($name, &self, &rhs, |a, b| a.$method(b))
            }
        }
    };
}

elementwise_op!(Add, add, "add");
elementwise_op!(Sub, sub, "sub");
elementwise_op!(Mul, mul, "mul");
elementwise_op!(Div, div, "div");

macro_rules! broadcast_op {
    ($(#[$doc:meta])* $trait:ident, $method:ident, $($t:ty),*) => {
        broadcast_op!(@each [$(#[$doc])*] $trait, $method, $($t),*);
    };
    (@each $docs:tt $trait:ident, $method:ident, $($t:ty),*) => {$(
        broadcast_op!(@one $docs $trait, $method, $t);
    )*};
    (@one [$(#[$doc:meta])*] $trait:ident, $method:ident, $t:ty) => {
        $(#[$doc])*
        impl $trait<$t> for &Array<$t> {
            type Output = Array<$t>;

            fn $method(self, rhs: $t) -> Array<$t> {
                self.map(|x, _| <$t as $trait<$t>>::$method(*x, rhs))
            }
        }

        $(#[$doc])*
        impl $trait<$t> for Array<$t> {
            type Output = Array<$t>;

            fn $method(self, rhs: $t) -> Array<$t> {
                <&Array<$t> as $trait<$t>>::$method(&self, rhs)
            }
        }

        $(#[$doc])*
        impl $trait<&Array<$t>> for $t {
            type Output = Array<$t>;

            fn $method(self, rhs: &Array<$t>) -> Array<$t> {
                rhs.map(|x, _| <$t as $trait<$t>>::$method(self, *x))
            }
        }

        $(#[$doc])*
        impl $trait<Array<$t>> for $t {
            type Output = Array<$t>;

            fn $method(self, rhs: Array<$t>) -> Array<$t> {
                <$t as $trait<&Array<$t>>>::$method(self, &rhs)
            }
        }
    };
}

broadcast_op!(Add, add, f64, f32, i64, i32);
broadcast_op!(Sub, sub, f64, f32, i64, i32);
broadcast_op!(Mul, mul, f64, f32, i64, i32);
broadcast_op!(
    /// Divides with the primitive `/`. For `i64` and `i32` a zero divisor
    /// (or any zero element when the scalar is on the left) panics.
    Div, div, f64, f32, i64, i32
);

impl<T: Clone + Neg<Output = T>> Neg for &Array<T> {
    type Output = Array<T>;

    fn neg(self) -> Array<T> {
        self.map(|x, _| -x.clone())
    }
}

impl<T: Clone + Neg<Output = T>> Neg for Array<T> {
    type Output = Array<T>;

    fn neg(self) -> Array<T> {
        -&self
    }
}

impl Array<f64> {
    /// Elementwise power.
    pub fn pow(&self, exponents: &Array<f64>) -> Result<Array<f64>> {
        elementwise("pow", self, exponents, f64::powf)
    }

    /// Every element raised to `exponent`.
    pub fn powf(&self, exponent: f64) -> Array<f64> {
        self.map(|x, _| x.powf(exponent))
    }
}

/// Both textual forms, one after the other.
pub fn to_string_concat(lhs: &impl Display, rhs: &impl Display) -> String {
    format!("{}{}", lhs, rhs)
}

/// Length first, then element by element. The tag does not take part.
impl<T: PartialEq> PartialEq for Array<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for Array<T> {}

impl<T: PartialEq> PartialEq<Vec<T>> for Array<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}
