//! Error types for structured error handling.
//!
//! Only index range violations are runtime errors. Schema, layout and
//! arity violations are rejected while the program is built:
//! - `SchemaError`: unsupported scalar type or zero extra dimension
//! - `LayoutError`: vector length not a positive power of two, or a
//!   member offset that breaks its scalar alignment
//! - `AccessArityError`: sub-index count differs from the member's rank
//!
//! Those three names appear in the build error messages and have no
//! runtime representation.

use std::fmt;
use thiserror::Error;

/// Axis of a block index.
///
/// # Examples
/// ```
/// use soa_core::types::Axis;
///
/// assert_eq!(format!("{}", Axis::Tuple), "tuple index");
/// assert_eq!(format!("{}", Axis::Extra(1)), "sub-index 1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Tuple index, bounded by the vector length.
    Tuple,
    /// Extra dimension `k` of a multi-dimensional member, outermost first.
    Extra(usize),
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Tuple => write!(f, "tuple index"),
            Axis::Extra(k) => write!(f, "sub-index {}", k),
        }
    }
}

/// Runtime errors raised by checked block access.
///
/// # Examples
/// ```
/// use soa_core::types::{Axis, SoaError};
///
/// let err = SoaError::IndexOutOfRange { axis: Axis::Tuple, index: 8, bound: 8 };
/// assert_eq!(format!("{}", err), "index out of range: tuple index 8 not in [0, 8)");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SoaError {
    /// Index outside its declared bound.
    #[error("index out of range: {axis} {index} not in [0, {bound})")]
    IndexOutOfRange {
        /// Axis that was violated
        axis: Axis,
        /// Offending index
        index: usize,
        /// Exclusive upper bound of the axis
        bound: usize,
    },
}

/// Result type for checked block access.
pub type Result<T> = std::result::Result<T, SoaError>;

impl SoaError {
    /// Checks `index < bound` on the given axis.
    #[inline]
    pub(crate) fn check(axis: Axis, index: usize, bound: usize) -> Result<()> {
        if index < bound {
            Ok(())
        } else {
            Err(SoaError::IndexOutOfRange { axis, index, bound })
        }
    }
}
