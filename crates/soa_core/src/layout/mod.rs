//! Schema description and layout computation.
//!
//! This module provides:
//! - `member`: the [`Member`] trait for scalars and nested arrays of scalars
//! - `schema`: the [`Schema`] trait for member tuples and [`MemberAt`] index lookup
//! - `descriptor`: [`BlockLayout`] and friends, runtime mirrors of a layout
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Member`], [`SubIndex`], [`MAX_RANK`] from `member`
//! - [`Schema`], [`MemberAt`], [`MemberOf`], [`ScalarOf`], [`IndexOf`] from `schema`
//! - [`BlockLayout`], [`MemberLayout`], [`MemberSpec`] from `descriptor`

pub mod descriptor;
pub mod member;
pub mod schema;

pub use descriptor::{BlockLayout, MemberLayout, MemberSpec};
pub use member::{Member, SubIndex, MAX_RANK};
pub use schema::{IndexOf, MemberAt, MemberOf, ScalarOf, Schema};
