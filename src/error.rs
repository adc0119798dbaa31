//! Error types for piecewise evaluation

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using the crate's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building tensors or evaluating a piecewise function
#[derive(Error, Debug)]
pub enum Error {
    /// Shape mismatch between an input and the shape it must align to
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// A function list entry is a callable rather than a precomputed value
    #[error("Callable functions are not supported in piecewise evaluation")]
    UnsupportedCallable,

    /// Condition count does not pair with the function count
    #[error(
        "with {condlen} condition(s), either {condlen} or {} functions are expected, got {funclen}",
        .condlen + 1
    )]
    ArityMismatch {
        /// Number of conditions supplied
        condlen: usize,
        /// Number of functions supplied
        funclen: usize,
    },

    /// Out of memory
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an arity mismatch error
    pub fn arity_mismatch(condlen: usize, funclen: usize) -> Self {
        Self::ArityMismatch { condlen, funclen }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message_lists_both_counts() {
        let msg = Error::arity_mismatch(2, 5).to_string();
        assert_eq!(
            msg,
            "with 2 condition(s), either 2 or 3 functions are expected, got 5"
        );
    }

    #[test]
    fn test_shape_mismatch_helper() {
        match Error::shape_mismatch(&[2, 3], &[6]) {
            Error::ShapeMismatch { expected, got } => {
                assert_eq!(expected, vec![2, 3]);
                assert_eq!(got, vec![6]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
