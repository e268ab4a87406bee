//! Dynamically typed values.
//!
//! `Value` is the element model of the hosting template language: numbers,
//! strings, booleans, nil, callables, and two kinds of sequence. A `Table`
//! is a plain sequence as the host hands it over. An `Array` is a wrapped
//! collection with the full operation set and operator overlay.
//! [`Array::wrap`] turns nested tables into arrays once, at construction.
//!
//! Arithmetic on values follows the typed overlay: array with array is
//! elementwise and length-checked, array with number broadcasts, and nested
//! arrays recurse. Anything else is a `TypeMismatch`.
//!
//! [`ValueKey`] is a hashable structural descriptor, used for `unique` and
//! as a memoization key.

use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

use rustc_hash::FxHasher;

use crate::array::{Array, to_string_concat};
use crate::error::{Error, Result};

/// Elements hashed by `KeyStrategy::Prefix` when no length is given.
pub const DEFAULT_PREFIX_LEN: usize = 10;

/// The kind of a value, as reported in type errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Number,
    Text,
    Table,
    Array,
    Function,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::Text => "string",
            Kind::Table => "table",
            Kind::Array => "array",
            Kind::Function => "function",
        }
    }
}

type NativeFn = dyn Fn(&[Value]) -> Result<Value>;

/// A named callable. Two functions are equal only if they share a body.
#[derive(Clone)]
pub struct Function {
    name: Rc<str>,
    body: Rc<NativeFn>,
}

impl Function {
    pub fn new(name: &str, body: impl Fn(&[Value]) -> Result<Value> + 'static) -> Function {
        Function {
            name: Rc::from(name),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.body)(args)
    }

    /// Address of the shared body; stable for the function's lifetime.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.body) as *const () as usize
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    Text(Rc<str>),
    Table(Vec<Value>),
    Array(Array<Value>),
    Function(Function),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::Text(_) => Kind::Text,
            Value::Table(_) => Kind::Table,
            Value::Array(_) => Kind::Array,
            Value::Function(_) => Kind::Function,
        }
    }

    /// Everything except `nil` and `false`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Wraps `items` as an array, converting nested tables too.
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Array::wrap(items))
    }

    pub fn function(name: &str, body: impl Fn(&[Value]) -> Result<Value> + 'static) -> Value {
        Value::Function(Function::new(name, body))
    }

    /// Applies `op`, broadcasting numbers over arrays and recursing into
    /// nested arrays.
    pub fn arith(&self, op: ArithOp, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(op.apply(*a, *b))),
            (Value::Array(a), Value::Array(b)) => {
                if a.len() != b.len() {
                    return Err(Error::SizeMismatch {
                        op: op.name(),
                        left: a.len(),
                        right: b.len(),
                    });
                }
                let items = a.iter().zip(b.iter()).map(|(x, y)| x.arith(op, y));
                Ok(Value::Array(items.collect::<Result<Array<Value>>>()?))
            }
            (Value::Array(a), Value::Number(_)) => {
                let items = a.iter().map(|x| x.arith(op, rhs));
                Ok(Value::Array(items.collect::<Result<Array<Value>>>()?))
            }
            (Value::Number(_), Value::Array(b)) => {
                let items = b.iter().map(|y| self.arith(op, y));
                Ok(Value::Array(items.collect::<Result<Array<Value>>>()?))
            }
            (Value::Number(_) | Value::Array(_), other) => Err(arith_mismatch(op, 2, other)),
            (other, _) => Err(arith_mismatch(op, 1, other)),
        }
    }

    pub fn negate(&self) -> Result<Value> {
        match self {
            Value::Number(n) => Ok(Value::Number(-n)),
            Value::Array(a) => Ok(Value::Array(
                a.iter().map(Value::negate).collect::<Result<Array<Value>>>()?,
            )),
            other => Err(Error::TypeMismatch {
                op: "neg",
                position: 1,
                expected: "number or array",
                actual: other.kind().name(),
            }),
        }
    }

    /// Two arrays append. Any other pairing joins the textual forms.
    pub fn concat(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Array(a), Value::Array(b)) => Value::Array(a.concat(b)),
            _ => Value::Text(Rc::from(to_string_concat(self, rhs))),
        }
    }

    /// Exact structural key.
    pub fn key(&self) -> ValueKey {
        ValueKey::of(self, KeyStrategy::Full)
    }
}

fn arith_mismatch(op: ArithOp, position: usize, actual: &Value) -> Error {
    Error::TypeMismatch {
        op: op.name(),
        position,
        expected: "number or array",
        actual: actual.kind().name(),
    }
}

impl Array<Value> {
    /// Builds an array, turning every nested `Table` into an `Array`.
    pub fn wrap(items: Vec<Value>) -> Array<Value> {
        items
            .into_iter()
            .map(|item| match item {
                Value::Table(inner) => Value::Array(Array::wrap(inner)),
                other => other,
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl ArithOp {
    pub fn name(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "div",
            ArithOp::Pow => "pow",
        }
    }

    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
            ArithOp::Pow => a.powf(b),
        }
    }
}

macro_rules! value_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<&Value> for &Value {
            type Output = Result<Value>;

            fn $method(self, rhs: &Value) -> Result<Value> {
                self.arith($op, rhs)
            }
        }
    };
}

value_op!(Add, add, ArithOp::Add);
value_op!(Sub, sub, ArithOp::Sub);
value_op!(Mul, mul, ArithOp::Mul);
value_op!(Div, div, ArithOp::Div);

impl Neg for &Value {
    type Output = Result<Value>;

    fn neg(self) -> Result<Value> {
        self.negate()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Table(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            Value::Array(array) => write!(f, "{}", array),
            Value::Function(func) => write!(f, "function: {}", func.name()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(Rc::from(s))
    }
}

impl From<Array<Value>> for Value {
    fn from(array: Array<Value>) -> Self {
        Value::Array(array)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

/// How much of a sequence goes into its key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Every element. Exact.
    #[default]
    Full,
    /// Length plus a hash of the first `n` elements. Sequences that differ
    /// only past the prefix get the same key.
    Prefix(usize),
}

impl KeyStrategy {
    /// `Prefix` over the first [`DEFAULT_PREFIX_LEN`] elements.
    pub fn prefix() -> KeyStrategy {
        KeyStrategy::Prefix(DEFAULT_PREFIX_LEN)
    }
}

/// Hashable structural descriptor of a [`Value`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Nil,
    Bool(bool),
    Number(u64),
    Text(Rc<str>),
    Seq(Vec<ValueKey>),
    Digest { len: usize, prefix: u64 },
    Function(usize),
}

impl ValueKey {
    pub fn of(value: &Value, strategy: KeyStrategy) -> ValueKey {
        match value {
            Value::Nil => ValueKey::Nil,
            Value::Bool(b) => ValueKey::Bool(*b),
            // -0.0 and 0.0 compare equal, so they share a key.
            Value::Number(n) => ValueKey::Number(if *n == 0.0 { 0 } else { n.to_bits() }),
            Value::Text(s) => ValueKey::Text(Rc::clone(s)),
            Value::Table(items) => ValueKey::of_seq(items, strategy),
            Value::Array(array) => ValueKey::of_seq(array.as_slice(), strategy),
            Value::Function(func) => ValueKey::Function(func.id()),
        }
    }

    /// Key for an argument list.
    pub fn of_args(args: &[Value], strategy: KeyStrategy) -> ValueKey {
        ValueKey::Seq(args.iter().map(|arg| ValueKey::of(arg, strategy)).collect())
    }

    fn of_seq(items: &[Value], strategy: KeyStrategy) -> ValueKey {
        match strategy {
            KeyStrategy::Prefix(n) if items.len() > n => {
                let mut hasher = FxHasher::default();
                for item in &items[..n] {
                    ValueKey::of(item, strategy).hash(&mut hasher);
                }
                ValueKey::Digest {
                    len: items.len(),
                    prefix: hasher.finish(),
                }
            }
            _ => ValueKey::Seq(items.iter().map(|item| ValueKey::of(item, strategy)).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(items: &[f64]) -> Value {
        Value::array(items.iter().map(|&n| Value::Number(n)).collect())
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::from("").is_truthy());
    }

    #[test]
    fn wrap_is_deep() {
        let nested = Value::Table(vec![Value::from(1), Value::Table(vec![Value::from(2)])]);
        let wrapped = Array::wrap(vec![nested]);
        let Value::Array(outer) = &wrapped.as_slice()[0] else {
            panic!("outer table not wrapped");
        };
        assert!(matches!(outer.get(2), Some(Value::Array(_))));
    }

    #[test]
    fn elementwise_and_broadcast() {
        let a = nums(&[1.0, 2.0, 3.0]);
        let b = nums(&[4.0, 5.0, 6.0]);
        assert_eq!((&a + &b).unwrap(), nums(&[5.0, 7.0, 9.0]));
        assert_eq!((&a * &Value::from(2)).unwrap(), nums(&[2.0, 4.0, 6.0]));
        assert_eq!((&Value::from(10) - &a).unwrap(), nums(&[9.0, 8.0, 7.0]));
        assert_eq!(a.arith(ArithOp::Pow, &Value::from(2)).unwrap(), nums(&[1.0, 4.0, 9.0]));
        assert_eq!((-&a).unwrap(), nums(&[-1.0, -2.0, -3.0]));
    }

    #[test]
    fn nested_arrays_recurse() {
        let m = Value::array(vec![
            Value::Table(vec![Value::from(1), Value::from(2)]),
            Value::Table(vec![Value::from(3), Value::from(4)]),
        ]);
        let doubled = (&m + &m).unwrap();
        assert_eq!(doubled.to_string(), "{{2, 4}, {6, 8}}");
    }

    #[test]
    fn arith_errors() {
        let a = nums(&[1.0, 2.0]);
        let b = nums(&[1.0]);
        assert_eq!(
            &a + &b,
            Err(Error::SizeMismatch {
                op: "add",
                left: 2,
                right: 1
            })
        );
        assert_eq!(
            &a + &Value::from("x"),
            Err(Error::TypeMismatch {
                op: "add",
                position: 2,
                expected: "number or array",
                actual: "string"
            })
        );
        assert_eq!(
            (&Value::Nil * &a).unwrap_err(),
            Error::TypeMismatch {
                op: "mul",
                position: 1,
                expected: "number or array",
                actual: "nil"
            }
        );
    }

    #[test]
    fn concat_splits_on_kind() {
        let a = nums(&[1.0]);
        let b = nums(&[2.0]);
        assert_eq!(a.concat(&b), nums(&[1.0, 2.0]));
        assert_eq!(a.concat(&Value::from("!")), Value::from("{1}!"));
        assert_eq!(Value::from("n=").concat(&Value::from(3)), Value::from("n=3"));
    }

    #[test]
    fn keys() {
        assert_eq!(Value::Number(0.0).key(), Value::Number(-0.0).key());
        assert_ne!(Value::from(1).key(), Value::from("1").key());
        assert_eq!(nums(&[1.0, 2.0]).key(), Value::Table(vec![Value::from(1), Value::from(2)]).key());

        let long_a = nums(&[1.0, 2.0, 3.0]);
        let long_b = nums(&[1.0, 2.0, 4.0]);
        let prefix = KeyStrategy::Prefix(2);
        assert_eq!(ValueKey::of(&long_a, prefix), ValueKey::of(&long_b, prefix));
        assert_ne!(long_a.key(), long_b.key());
        assert_ne!(ValueKey::of(&long_a, prefix), ValueKey::of(&nums(&[1.0, 2.0]), prefix));
    }

    #[test]
    fn function_identity() {
        let f = Function::new("id", |args| Ok(args.first().cloned().unwrap_or_default()));
        let g = f.clone();
        let h = Function::new("id", |args| Ok(args.first().cloned().unwrap_or_default()));
        assert_eq!(f, g);
        assert_ne!(f, h);
        assert_eq!(f.call(&[Value::from(7)]).unwrap(), Value::from(7));
        assert_eq!(Value::from(f).to_string(), "function: id");
    }
}
