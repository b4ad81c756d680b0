//! Member specifications: a scalar type plus zero or more extra dimensions.
//!
//! Members are plain Rust types. A scalar such as `i32` is a rank-0 member,
//! and `[M; N]` is a member whose outermost extra dimension is `N`:
//!
//! | Rust type       | scalar | extra dims |
//! |-----------------|--------|------------|
//! | `i32`           | `i32`  | none       |
//! | `[f32; 4]`      | `f32`  | `[4]`      |
//! | `[[f64; 3]; 2]` | `f64`  | `[2][3]`   |
//!
//! Each member also names the type of its sub-block for a given vector
//! length `V` ([`Member::Lanes`]). The tuple axis is always innermost, so
//! `[[f64; 3]; 2]` is stored as `[[[f64; V]; 3]; 2]`.

use super::descriptor::MemberSpec;
use crate::types::{Axis, Result, Scalar, SoaError};
use bytemuck::Pod;
use std::fmt;

/// Maximum number of extra dimensions a member may declare.
pub const MAX_RANK: usize = 6;

/// Sub-index tuple of a member: one `usize` per extra dimension.
///
/// Implemented for `[usize; 0]` through `[usize; MAX_RANK]`.
pub trait SubIndex: Copy + fmt::Debug + AsRef<[usize]> + Send + Sync + 'static {}

/// Sub-index one rank higher, used when wrapping a member in an array.
pub trait Extend: SubIndex {
    /// Sub-index with one more leading (outermost) axis.
    type Extended: SubIndex;
}

macro_rules! impl_sub_index {
    ($($rank:literal),+) => {
        $( impl SubIndex for [usize; $rank] {} )+
    };
}

macro_rules! impl_extend {
    ($($rank:literal => $next:literal),+) => {
        $(
            impl Extend for [usize; $rank] {
                type Extended = [usize; $next];
            }
        )+
    };
}

impl_sub_index!(0, 1, 2, 3, 4, 5, 6);
impl_extend!(0 => 1, 1 => 2, 2 => 3, 3 => 4, 4 => 5, 5 => 6);

/// One entry of a schema.
///
/// All shape information is carried in associated constants, so nothing
/// about a member exists at runtime except its values.
///
/// # Examples
///
/// ```
/// use soa_core::layout::Member;
///
/// type Stress = [[f64; 3]; 3];
/// assert_eq!(Stress::RANK, 2);
/// assert_eq!(Stress::EXTENT, 9);
/// assert_eq!(Stress::TUPLE_BYTES, 72);
/// assert_eq!(Stress::flatten(&[1, 2]), 5);
/// ```
///
/// A zero extra dimension is rejected at build time:
///
/// ```compile_fail
/// use soa_core::layout::Member;
///
/// // SchemaError: extra dimension must be positive
/// let _ = <[f64; 0] as Member>::EXTENT;
/// ```
pub trait Member: Copy + Send + Sync + 'static {
    /// Scalar stored at every leaf.
    type Scalar: Scalar;

    /// Sub-index type, `[usize; RANK]`.
    type Index: SubIndex;

    /// Storage of this member across `V` tuples, tuple axis innermost.
    type Lanes<const V: usize>: Pod + Send + Sync;

    /// Number of extra dimensions.
    const RANK: usize;

    /// Product of the extra dimensions (1 for a scalar).
    const EXTENT: usize;

    /// Extra dimensions, outermost first; entries past `RANK` are zero.
    const DIMS: [usize; MAX_RANK];

    /// Bytes one tuple contributes to this member's sub-block.
    const TUPLE_BYTES: usize = Self::EXTENT * std::mem::size_of::<Self::Scalar>();

    /// Copies the value of tuple `tuple` out of the sub-block.
    fn gather<const V: usize>(lanes: &Self::Lanes<V>, tuple: usize) -> Self;

    /// Writes `value` into tuple `tuple` of the sub-block.
    fn scatter<const V: usize>(lanes: &mut Self::Lanes<V>, tuple: usize, value: Self);

    /// Row-major flat index over the extra dimensions.
    ///
    /// Indices are not checked; see [`Member::checked_flatten`].
    #[inline]
    fn flatten(sub: &Self::Index) -> usize {
        let dims = Self::DIMS;
        sub.as_ref()
            .iter()
            .zip(dims.iter())
            .fold(0, |flat, (&index, &extent)| flat * extent + index)
    }

    /// Row-major flat index with every sub-index checked against its extent.
    fn checked_flatten(sub: &Self::Index) -> Result<usize> {
        let dims = Self::DIMS;
        let mut flat = 0;
        for (axis, (&index, &extent)) in sub.as_ref().iter().zip(dims.iter()).enumerate() {
            SoaError::check(Axis::Extra(axis), index, extent)?;
            flat = flat * extent + index;
        }
        Ok(flat)
    }

    /// Extra dimensions as a vector, outermost first.
    fn extra_dims() -> Vec<usize> {
        let dims = Self::DIMS;
        dims[..Self::RANK].to_vec()
    }

    /// Runtime description of this member.
    fn spec() -> MemberSpec {
        MemberSpec::new(<Self::Scalar as Scalar>::KIND, Self::extra_dims())
    }
}

/// Shifts `inner` one axis outward and places `outer` in front.
const fn prepend_extent(outer: usize, inner: [usize; MAX_RANK]) -> [usize; MAX_RANK] {
    let mut dims = [0; MAX_RANK];
    dims[0] = outer;
    let mut axis = 1;
    while axis < MAX_RANK {
        dims[axis] = inner[axis - 1];
        axis += 1;
    }
    dims
}

macro_rules! impl_scalar_member {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Member for $ty {
                type Scalar = $ty;
                type Index = [usize; 0];
                type Lanes<const V: usize> = [$ty; V];

                const RANK: usize = 0;
                const EXTENT: usize = 1;
                const DIMS: [usize; MAX_RANK] = [0; MAX_RANK];

                #[inline]
                fn gather<const V: usize>(lanes: &Self::Lanes<V>, tuple: usize) -> Self {
                    lanes[tuple]
                }

                #[inline]
                fn scatter<const V: usize>(lanes: &mut Self::Lanes<V>, tuple: usize, value: Self) {
                    lanes[tuple] = value;
                }
            }
        )+
    };
}

impl_scalar_member!(f32, f64, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl<M: Member, const N: usize> Member for [M; N]
where
    M::Index: Extend,
{
    type Scalar = M::Scalar;
    type Index = <M::Index as Extend>::Extended;
    type Lanes<const V: usize> = [M::Lanes<V>; N];

    const RANK: usize = M::RANK + 1;
    const EXTENT: usize = {
        assert!(N > 0, "SchemaError: extra dimension must be positive");
        N * M::EXTENT
    };
    const DIMS: [usize; MAX_RANK] = prepend_extent(N, M::DIMS);

    #[inline]
    fn gather<const V: usize>(lanes: &Self::Lanes<V>, tuple: usize) -> Self {
        std::array::from_fn(|n| M::gather::<V>(&lanes[n], tuple))
    }

    #[inline]
    fn scatter<const V: usize>(lanes: &mut Self::Lanes<V>, tuple: usize, value: Self) {
        for (lane, inner) in lanes.iter_mut().zip(value) {
            M::scatter::<V>(lane, tuple, inner);
        }
    }
}
