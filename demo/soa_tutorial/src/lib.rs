//! Structure-of-arrays tutorial program
//!
//! Builds a particle block from a three-member schema, fills it once
//! element by element and once lane by lane on the worker pool, checks
//! that both agree, and reports the layout and tuple values.

pub mod config;
pub mod error;
pub mod runtime;
pub mod tutorial;

pub use soa_core;

/// Tutorial version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
