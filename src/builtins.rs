//! Kind-checked entry points over dynamic values.
//!
//! Each function checks its arguments before doing any work and reports a
//! `TypeMismatch` naming the operation, the 1-based argument position, and
//! the expected and actual kinds. Array arguments accept a wrapped `Array`
//! or a plain `Table`. Callbacks receive `(element, index)` with a 1-based
//! index. Check arguments may be a function (used as a predicate, tested
//! for truthiness) or any other value (compared for equality).

use std::borrow::Cow;
use std::cell::RefCell;
use std::cmp::Ordering;

use fnkit::curry::{Applied, Curried};
use fnkit::memo::{CacheConfig, MemoCache};
use rustc_hash::FxHashSet;

use crate::array::Array;
use crate::error::{Error, Result};
use crate::value::{Function, KeyStrategy, Value, ValueKey};

fn mismatch(op: &'static str, position: usize, expected: &'static str, actual: &Value) -> Error {
    Error::TypeMismatch {
        op,
        position,
        expected,
        actual: actual.kind().name(),
    }
}

fn expect_array<'a>(op: &'static str, position: usize, value: &'a Value) -> Result<Cow<'a, Array<Value>>> {
    match value {
        Value::Array(array) => Ok(Cow::Borrowed(array)),
        Value::Table(items) => Ok(Cow::Owned(Array::wrap(items.clone()))),
        other => Err(mismatch(op, position, "array", other)),
    }
}

fn expect_function<'a>(op: &'static str, position: usize, value: &'a Value) -> Result<&'a Function> {
    value
        .as_function()
        .ok_or_else(|| mismatch(op, position, "function", value))
}

fn expect_number(op: &'static str, position: usize, value: &Value) -> Result<f64> {
    value
        .as_number()
        .ok_or_else(|| mismatch(op, position, "number", value))
}

/// A non-negative integral number.
fn expect_count(op: &'static str, position: usize, value: &Value) -> Result<usize> {
    let n = expect_number(op, position, value)?;
    if n < 0.0 || n.fract() != 0.0 {
        return Err(mismatch(op, position, "non-negative integer", value));
    }
    Ok(n as usize)
}

fn expect_position(op: &'static str, position: usize, value: &Value) -> Result<i64> {
    let n = expect_number(op, position, value)?;
    if n.fract() != 0.0 {
        return Err(mismatch(op, position, "integer", value));
    }
    Ok(n as i64)
}

fn call(f: &Function, item: &Value, index: usize) -> Result<Value> {
    f.call(&[item.clone(), Value::from(index)])
}

/// Literal-or-predicate dispatch for the dynamic layer. Unlike the typed
/// `Matcher`, testing can fail because the predicate can.
enum Check<'a> {
    Literal(&'a Value),
    Predicate(&'a Function),
}

impl<'a> Check<'a> {
    fn from_value(value: &'a Value) -> Check<'a> {
        match value {
            Value::Function(f) => Check::Predicate(f),
            other => Check::Literal(other),
        }
    }

    fn test(&self, item: &Value, index: usize) -> Result<bool> {
        match self {
            Check::Literal(value) => Ok(item.key() == value.key()),
            Check::Predicate(f) => Ok(call(f, item, index)?.is_truthy()),
        }
    }
}

/// `f(element, index)` for every element; `nil` results are dropped.
pub fn map(array: &Value, f: &Value) -> Result<Value> {
    let array = expect_array("map", 1, array)?;
    let f = expect_function("map", 2, f)?;
    let mut out = Vec::with_capacity(array.len());
    for (item, i) in array.indexed() {
        let mapped = call(f, item, i)?;
        if !mapped.is_nil() {
            out.push(mapped);
        }
    }
    Ok(Value::Array(Array::new(out)))
}

pub fn filter(array: &Value, predicate: &Value) -> Result<Value> {
    let array = expect_array("filter", 1, array)?;
    let predicate = expect_function("filter", 2, predicate)?;
    let mut out = Vec::new();
    for (item, i) in array.indexed() {
        if call(predicate, item, i)?.is_truthy() {
            out.push(item.clone());
        }
    }
    Ok(Value::Array(Array::new(out)))
}

/// Folds with `f(acc, element, index)`. Without `init` the first element
/// seeds the fold; an empty array with no `init` gives `nil`.
pub fn reduce(array: &Value, f: &Value, init: Option<&Value>) -> Result<Value> {
    let array = expect_array("reduce", 1, array)?;
    let f = expect_function("reduce", 2, f)?;
    let mut indexed = array.indexed();
    let mut acc = match init {
        Some(init) => init.clone(),
        None => match indexed.next() {
            Some((first, _)) => first.clone(),
            None => return Ok(Value::Nil),
        },
    };
    for (item, i) in indexed {
        acc = f.call(&[acc, item.clone(), Value::from(i)])?;
    }
    Ok(acc)
}

/// Every intermediate accumulator of `reduce`.
pub fn scan(array: &Value, f: &Value, init: Option<&Value>) -> Result<Value> {
    let array = expect_array("scan", 1, array)?;
    let f = expect_function("scan", 2, f)?;
    let mut out = Vec::with_capacity(array.len());
    let mut acc = init.cloned();
    for (item, i) in array.indexed() {
        let next = match acc {
            Some(acc) => f.call(&[acc, item.clone(), Value::from(i)])?,
            None => item.clone(),
        };
        out.push(next.clone());
        acc = Some(next);
    }
    Ok(Value::Array(Array::new(out)))
}

/// First element passing `check`, or `default`.
pub fn find(array: &Value, check: &Value, default: &Value) -> Result<Value> {
    let array = expect_array("find", 1, array)?;
    let check = Check::from_value(check);
    for (item, i) in array.indexed() {
        if check.test(item, i)? {
            return Ok(item.clone());
        }
    }
    Ok(default.clone())
}

/// Index of the first element passing `check`, or `nil`.
pub fn find_index(array: &Value, check: &Value) -> Result<Value> {
    let array = expect_array("find_index", 1, array)?;
    let check = Check::from_value(check);
    for (item, i) in array.indexed() {
        if check.test(item, i)? {
            return Ok(Value::from(i));
        }
    }
    Ok(Value::Nil)
}

pub fn all(array: &Value, check: &Value) -> Result<bool> {
    let array = expect_array("all", 1, array)?;
    let check = Check::from_value(check);
    for (item, i) in array.indexed() {
        if !check.test(item, i)? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn any(array: &Value, check: &Value) -> Result<bool> {
    let array = expect_array("any", 1, array)?;
    let check = Check::from_value(check);
    for (item, i) in array.indexed() {
        if check.test(item, i)? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn count(array: &Value, check: &Value) -> Result<usize> {
    let array = expect_array("count", 1, array)?;
    let check = Check::from_value(check);
    let mut n = 0;
    for (item, i) in array.indexed() {
        if check.test(item, i)? {
            n += 1;
        }
    }
    Ok(n)
}

/// Drops repeats by structural key, or by the key `key_fn` returns.
pub fn unique(array: &Value, key_fn: Option<&Value>) -> Result<Value> {
    let array = expect_array("unique", 1, array)?;
    let key_fn = key_fn.map(|f| expect_function("unique", 2, f)).transpose()?;
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for (item, i) in array.indexed() {
        let key = match key_fn {
            Some(f) => call(f, item, i)?.key(),
            None => item.key(),
        };
        if seen.insert(key) {
            out.push(item.clone());
        }
    }
    Ok(Value::Array(Array::new(out)))
}

pub fn slice(array: &Value, start: &Value, stop: &Value) -> Result<Value> {
    let array = expect_array("slice", 1, array)?;
    let start = expect_position("slice", 2, start)?;
    let stop = expect_position("slice", 3, stop)?;
    Ok(Value::Array(array.slice(start, stop)?))
}

/// `n` elements from `start` (default 1).
pub fn take(array: &Value, n: &Value, start: Option<&Value>) -> Result<Value> {
    let array = expect_array("take", 1, array)?;
    let n = expect_count("take", 2, n)?;
    let start = match start {
        Some(start) => expect_position("take", 3, start)?,
        None => 1,
    };
    Ok(Value::Array(array.take_from(n, start)))
}

/// Rows of elements by position, padded with `nil` to the longest input.
pub fn zip(arrays: &[Value]) -> Result<Value> {
    let arrays = arrays
        .iter()
        .enumerate()
        .map(|(i, a)| expect_array("zip", i + 1, a))
        .collect::<Result<Vec<_>>>()?;
    let refs: Vec<&Array<Value>> = arrays.iter().map(|a| &**a).collect();
    let rows = Array::zip_all(&refs).map(|row, _| {
        Value::Array(row.iter().map(|slot| slot.clone().unwrap_or_default()).collect())
    });
    Ok(Value::Array(rows))
}

/// Orders `a`, found at `index`, against `b`.
fn compare(op: &'static str, index: usize, a: &Value, b: &Value) -> Result<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Ok(x.partial_cmp(y).unwrap_or(Ordering::Equal)),
        (Value::Text(x), Value::Text(y)) => Ok(x.cmp(y)),
        _ => Err(Error::Incomparable {
            op,
            index,
            left: a.kind().name(),
            right: b.kind().name(),
        }),
    }
}

fn extreme(op: &'static str, array: &Value, wanted: Ordering) -> Result<(Value, usize)> {
    let array = expect_array(op, 1, array)?;
    let mut indexed = array.indexed();
    let (first, _) = indexed.next().ok_or(Error::EmptyCollection { op })?;
    let mut best = (first, 1);
    for (item, i) in indexed {
        if compare(op, i, item, best.0)? == wanted {
            best = (item, i);
        }
    }
    Ok((best.0.clone(), best.1))
}

/// Largest element and its index; ties keep the first.
pub fn max(array: &Value) -> Result<(Value, usize)> {
    extreme("max", array, Ordering::Greater)
}

pub fn min(array: &Value) -> Result<(Value, usize)> {
    extreme("min", array, Ordering::Less)
}

/// Element with the largest `f(element, index)`, that value, and the index.
pub fn max_by(array: &Value, f: &Value) -> Result<(Value, Value, usize)> {
    let array = expect_array("max_by", 1, array)?;
    let f = expect_function("max_by", 2, f)?;
    let mut indexed = array.indexed();
    let (first, _) = indexed.next().ok_or(Error::EmptyCollection { op: "max_by" })?;
    let mut best = (first, call(f, first, 1)?, 1);
    for (item, i) in indexed {
        let derived = call(f, item, i)?;
        if compare("max_by", i, &derived, &best.1)? == Ordering::Greater {
            best = (item, derived, i);
        }
    }
    Ok((best.0.clone(), best.1, best.2))
}

pub fn contains(array: &Value, value: &Value) -> Result<bool> {
    let array = expect_array("contains", 1, array)?;
    let key = value.key();
    Ok(array.iter().any(|item| item.key() == key))
}

/// Elements of `a` also in `b`, by structural key.
pub fn intersect(a: &Value, b: &Value) -> Result<Value> {
    let a = expect_array("intersect", 1, a)?;
    let b = expect_array("intersect", 2, b)?;
    let table: FxHashSet<ValueKey> = b.iter().map(Value::key).collect();
    let mut emitted = FxHashSet::default();
    let out = a.filter(|item, _| {
        let key = item.key();
        table.contains(&key) && emitted.insert(key)
    });
    Ok(Value::Array(out))
}

/// Inclusive numeric range. `step` defaults to 1.
pub fn range(start: &Value, stop: &Value, step: Option<&Value>) -> Result<Value> {
    let start = expect_number("range", 1, start)?;
    let stop = expect_number("range", 2, stop)?;
    let step = match step {
        Some(step) => expect_number("range", 3, step)?,
        None => 1.0,
    };
    let invalid = |reason| Error::InvalidRange { op: "range", reason };
    if step == 0.0 || !step.is_finite() {
        return Err(invalid("step must be a nonzero number"));
    }
    if (step > 0.0 && start > stop) || (step < 0.0 && start < stop) {
        return Err(invalid("bounds run against the step"));
    }
    let span = ((stop - start) / step + 1e-9).floor() + 1.0;
    if !span.is_finite() || span > crate::array::MAX_RANGE_LEN as f64 {
        return Err(invalid("too many elements"));
    }
    let items = (0..span as usize).map(|k| Value::Number(start + k as f64 * step));
    Ok(Value::Array(items.collect()))
}

pub fn convolve(x: &Value, y: &Value) -> Result<Value> {
    let numbers = |position: usize, value: &Value| -> Result<Array<f64>> {
        let array = expect_array("convolve", position, value)?;
        array
            .iter()
            .map(|item| item.as_number().ok_or_else(|| mismatch("convolve", position, "array of numbers", item)))
            .collect()
    };
    let out = numbers(1, x)?.convolve(&numbers(2, y)?);
    Ok(Value::Array(out.map(|n, _| Value::Number(*n))))
}

/// Runs `edit` on the array inside `target`, in place.
fn edit_in_place(
    op: &'static str,
    target: &mut Value,
    edit: impl FnOnce(&mut Array<Value>) -> Result<()>,
) -> Result<()> {
    match target {
        Value::Array(array) => edit(array),
        Value::Table(items) => {
            let mut array = Array::new(std::mem::take(items));
            let result = edit(&mut array);
            *items = array.into_vec();
            result
        }
        other => Err(mismatch(op, 1, "array", other)),
    }
}

/// Inserts `value` at `pos` in place.
pub fn insert(target: &mut Value, pos: &Value, value: Value) -> Result<()> {
    let pos = expect_position("insert", 2, pos)?;
    edit_in_place("insert", target, |array| array.insert(pos, value).map(|_| ()))
}

/// Replaces the element at `pos` in place.
pub fn set(target: &mut Value, pos: &Value, value: Value) -> Result<()> {
    let pos = expect_position("set", 2, pos)?;
    edit_in_place("set", target, |array| array.set(pos, value).map(|_| ()))
}

/// Appends two arrays, or joins textual forms for anything else.
pub fn concat(a: &Value, b: &Value) -> Value {
    a.concat(b)
}

fn curried_value(curried: Curried<Value, Result<Value>>) -> Value {
    let name = format!("curried/{}", curried.remaining());
    Value::function(&name, move |args| match curried.apply(args)? {
        Applied::Done(result) => result,
        Applied::Partial(next) => Ok(curried_value(next)),
    })
}

/// A function taking `arity` arguments in any grouping. Supplying more
/// than remain is an `Arity` error.
pub fn curry(f: &Value, arity: &Value) -> Result<Value> {
    let f = expect_function("curry", 1, f)?.clone();
    let arity = expect_count("curry", 2, arity)?;
    Ok(curried_value(Curried::new(arity, move |args: &[Value]| f.call(args))))
}

/// Right to left: the last function receives the call's arguments and each
/// earlier one receives the previous result.
pub fn compose(fns: &[Value]) -> Result<Value> {
    let fns = fns
        .iter()
        .enumerate()
        .map(|(i, f)| expect_function("compose", i + 1, f).cloned())
        .collect::<Result<Vec<Function>>>()?;
    Ok(Value::function("composed", move |args| {
        let mut stages = fns.iter().rev();
        let Some(innermost) = stages.next() else {
            return Ok(args.first().cloned().unwrap_or_default());
        };
        let mut result = innermost.call(args)?;
        for stage in stages {
            result = stage.call(&[result])?;
        }
        Ok(result)
    }))
}

/// Wraps `f` with a cache keyed on its arguments. Errors are not cached.
pub fn memoize(f: &Value, strategy: KeyStrategy, config: CacheConfig) -> Result<Value> {
    let f = expect_function("memoize", 1, f)?.clone();
    let cache = RefCell::new(MemoCache::<ValueKey, Value>::new(config));
    let name = format!("memoized/{}", f.name());
    Ok(Value::function(&name, move |args| {
        let key = ValueKey::of_args(args, strategy);
        let cached = cache.borrow_mut().get(&key);
        if let Some(hit) = cached {
            return Ok(hit);
        }
        let result = f.call(args)?;
        cache.borrow_mut().insert(key, result.clone());
        Ok(result)
    }))
}
