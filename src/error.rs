//! Errors raised by collection operations.

/// Everything the collection core can fail with. Raised where the problem
/// is detected and never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An argument had the wrong kind, e.g. a predicate that is not callable.
    TypeMismatch {
        op: &'static str,
        /// 1-based argument position.
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },
    /// Elementwise arithmetic between arrays of different lengths.
    SizeMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },
    /// Two elements of kinds that have no ordering between them. `index`
    /// is the 1-based position of the element being compared.
    Incomparable {
        op: &'static str,
        index: usize,
        left: &'static str,
        right: &'static str,
    },
    /// `max`, `min` and friends on an empty array.
    EmptyCollection { op: &'static str },
    /// Zero step, inconsistent bounds, or a range over the size limit.
    InvalidRange {
        op: &'static str,
        reason: &'static str,
    },
    /// A curried function was given more arguments than it had left.
    Arity { expected: usize, supplied: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return match self {
            Error::TypeMismatch {
                op,
                position,
                expected,
                actual,
            } => write!(
                f,
                "{}: argument {} expected {}, got {}",
                op, position, expected, actual
            ),
            Error::SizeMismatch { op, left, right } => write!(
                f,
                "{}: size mismatch ({} vs {} elements)",
                op, left, right
            ),
            Error::Incomparable {
                op,
                index,
                left,
                right,
            } => write!(
                f,
                "{}: element {} ({}) cannot be compared with {}",
                op, index, left, right
            ),
            Error::EmptyCollection { op } => write!(f, "{}: empty collection", op),
            Error::InvalidRange { op, reason } => write!(f, "{}: invalid range, {}", op, reason),
            Error::Arity { expected, supplied } => write!(
                f,
                "expected at most {} argument(s), got {}",
                expected, supplied
            ),
        };
    }
}

impl std::error::Error for Error {}

impl From<fnkit::curry::ArityError> for Error {
    fn from(err: fnkit::curry::ArityError) -> Self {
        return Error::Arity {
            expected: err.expected,
            supplied: err.supplied,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_everything() {
        let err = Error::TypeMismatch {
            op: "filter",
            position: 2,
            expected: "function",
            actual: "number",
        };
        assert_eq!(err.to_string(), "filter: argument 2 expected function, got number");
    }

    #[test]
    fn incomparable_names_the_element() {
        let err = Error::Incomparable {
            op: "max",
            index: 3,
            left: "string",
            right: "number",
        };
        assert_eq!(err.to_string(), "max: element 3 (string) cannot be compared with number");
    }

    #[test]
    fn arity_converts() {
        let err: Error = fnkit::curry::ArityError { expected: 1, supplied: 3 }.into();
        assert_eq!(err, Error::Arity { expected: 1, supplied: 3 });
    }
}
