//! Scalar element types admitted into a schema.
//!
//! A scalar is a fixed-width numeric plain-old-data type. Every value stored
//! in a block, whatever the member's rank, is ultimately one scalar.

use bytemuck::Pod;
use num_traits::Num;
use std::fmt;

/// Fixed-width numeric type that may appear at the leaves of a member.
///
/// The trait is implemented for the primitive integer and floating-point
/// types. A type without an implementation cannot be named in a schema,
/// so an unsupported scalar is rejected when the program is built.
///
/// # Examples
///
/// ```
/// use soa_core::types::{Scalar, ScalarKind};
///
/// assert_eq!(<f64 as Scalar>::KIND, ScalarKind::F64);
/// assert_eq!(<i32 as Scalar>::KIND.size(), 4);
/// ```
///
/// ```compile_fail
/// use soa_core::SoaBlock;
///
/// // SchemaError: `bool` is not a supported scalar type.
/// let _ = SoaBlock::<(bool,), 8>::new();
/// ```
pub trait Scalar: Pod + Num + Default + PartialOrd + fmt::Debug + Send + Sync {
    /// Runtime descriptor used for layout reporting.
    const KIND: ScalarKind;
}

/// Runtime descriptor of a [`Scalar`] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScalarKind {
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 128-bit signed integer
    I128,
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// 128-bit unsigned integer
    U128,
}

impl ScalarKind {
    /// Returns the Rust spelling of the type.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::I128 => "i128",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::U128 => "u128",
        }
    }

    /// Size of one value in bytes.
    pub fn size(&self) -> usize {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::I16 | ScalarKind::U16 => 2,
            ScalarKind::F32 | ScalarKind::I32 | ScalarKind::U32 => 4,
            ScalarKind::F64 | ScalarKind::I64 | ScalarKind::U64 => 8,
            ScalarKind::I128 | ScalarKind::U128 => 16,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;
            }
        )+
    };
}

impl_scalar! {
    f32 => F32,
    f64 => F64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
}
