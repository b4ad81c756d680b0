//! Scalar and error types.
//!
//! This module provides:
//! - `scalar`: the [`Scalar`] trait and its [`ScalarKind`] descriptor
//! - `error`: [`SoaError`] for checked access and the [`Axis`] it reports

pub mod error;
pub mod scalar;

pub use error::{Axis, Result, SoaError};
pub use scalar::{Scalar, ScalarKind};
