//! Fixed-size structure-of-arrays block.
//!
//! [`SoaBlock<S, V>`] holds exactly `V` tuples of schema `S`. It is a plain
//! value: one flat region split into one sub-block per member, in schema
//! order, with the tuple index stride-1 inside every sub-block.
//!
//! # Address computation
//!
//! For member `i` with extra dimensions `d_0..d_{n-1}`:
//!
//! ```text
//! address = base + offset(i)
//!         + size_of(scalar_i) * (flatten(sub, d) * V + tuple)
//! ```
//!
//! where `flatten` is row-major over the extra dimensions only. Moving to
//! the next tuple therefore always moves by exactly one scalar.
//!
//! # Index checking
//!
//! [`SoaBlock::try_access`] always checks every index and reports
//! [`SoaError::IndexOutOfRange`]. [`SoaBlock::access`] checks every axis
//! only when [`VALIDATE_INDICES`] is set (debug builds, or the `validate`
//! feature); otherwise it checks the final element position against the
//! sub-block only, so a bad sub-index may land on another element of the
//! same member but never outside it. [`SoaBlock::access_unchecked`] skips
//! all checks.
//!
//! Blocks are expected to be used while the host's runtime scope is active;
//! the block itself neither requires nor checks any global state.

use crate::layout::schema::{offsets_aligned, prefix_sum};
use crate::layout::{BlockLayout, IndexOf, Member, MemberAt, MemberOf, ScalarOf, Schema};
use crate::types::{Axis, Result, SoaError};
use bytemuck::Zeroable;
use std::fmt;

/// Whether [`SoaBlock::access`] checks every axis.
pub const VALIDATE_INDICES: bool = cfg!(any(debug_assertions, feature = "validate"));

/// Block of `V` tuples laid out as a structure of arrays.
///
/// `V` must be a positive power of two and every sub-block must start at a
/// multiple of its scalar alignment; both are checked when the block type
/// is used, and a violation fails the build.
///
/// # Examples
///
/// ```
/// use soa_core::SoaBlock;
///
/// type Particles = SoaBlock<([[f64; 3]; 3], [f32; 4], i32), 8>;
///
/// let mut block = Particles::new();
/// *block.access_mut::<0>(3, [1, 2]) = 4.5;
/// block.set::<2>(7, [], 42);
///
/// assert_eq!(*block.access::<0>(3, [1, 2]), 4.5);
/// assert_eq!(block.get::<2>(7, []), 42);
/// assert_eq!(Particles::total_size(), 736);
/// assert_eq!(Particles::offset::<2>(), 704);
/// ```
///
/// A vector length that is not a power of two fails the build:
///
/// ```compile_fail
/// use soa_core::SoaBlock;
///
/// // LayoutError: invalid vector length
/// let _ = SoaBlock::<(f64, i32), 6>::new();
/// ```
///
/// So does a member index past the end of the schema:
///
/// ```compile_fail
/// use soa_core::SoaBlock;
///
/// let block = SoaBlock::<(f64, i32), 8>::new();
/// let _ = block.get::<2>(0, []);
/// ```
///
/// And a sub-index count that differs from the member's rank
/// (AccessArityError):
///
/// ```compile_fail
/// use soa_core::SoaBlock;
///
/// let block = SoaBlock::<([[f64; 3]; 3],), 8>::new();
/// let _ = block.get::<0>(0, [1]);
/// ```
///
/// Zeroing the type through [`Zeroable`] does not bypass the check; the
/// block cannot be read or written:
///
/// ```compile_fail
/// use bytemuck::Zeroable;
/// use soa_core::SoaBlock;
///
/// let mut block = <SoaBlock<(f64, i32), 6> as Zeroable>::zeroed();
/// block.set::<0>(5, [], 2.5);
/// ```
///
/// A member whose offset breaks its scalar alignment is also rejected:
///
/// ```compile_fail
/// use soa_core::SoaBlock;
///
/// // LayoutError: misaligned member (f64 sub-block would start at byte 4)
/// let _ = SoaBlock::<(u8, f64), 4>::new();
/// ```
#[repr(transparent)]
pub struct SoaBlock<S: Schema, const V: usize> {
    storage: S::Storage<V>,
}

// SAFETY: transparent over a `Zeroable` storage struct.
unsafe impl<S: Schema, const V: usize> Zeroable for SoaBlock<S, V> {}

impl<S: Schema, const V: usize> SoaBlock<S, V> {
    /// Number of tuples in the block.
    pub const VECTOR_LENGTH: usize = V;

    /// Number of members in the schema.
    pub const MEMBERS: usize = S::LEN;

    /// Sum of all sub-block sizes, before any check.
    const PACKED_SIZE: usize = V * prefix_sum(S::TUPLE_BYTES, S::LEN);

    /// Definition-time layout checks; evaluated whenever the type is used.
    const DEFINITION_CHECK: () = {
        assert!(
            V > 0 && V.is_power_of_two(),
            "LayoutError: invalid vector length, must be a positive power of two"
        );
        assert!(
            offsets_aligned(S::TUPLE_BYTES, S::ALIGNS, V),
            "LayoutError: misaligned member, sub-block offset is not a multiple of its scalar alignment"
        );
        assert!(
            std::mem::size_of::<S::Storage<V>>() == Self::PACKED_SIZE,
            "LayoutError: block storage size differs from the sum of sub-block sizes"
        );
    };

    /// Total block size in bytes.
    pub const TOTAL_SIZE: usize = {
        let () = Self::DEFINITION_CHECK;
        Self::PACKED_SIZE
    };

    /// Creates a zero-initialised block.
    pub fn new() -> Self {
        let () = Self::DEFINITION_CHECK;
        Zeroable::zeroed()
    }

    /// Creates a zero-initialised block directly on the heap.
    ///
    /// Prefer this over `Box::new(SoaBlock::new())` for wide blocks, which
    /// would otherwise be built on the stack first.
    pub fn boxed() -> Box<Self> {
        let () = Self::DEFINITION_CHECK;
        bytemuck::allocation::zeroed_box()
    }

    /// Total block size in bytes.
    #[inline]
    pub const fn total_size() -> usize {
        Self::TOTAL_SIZE
    }

    /// Size in bytes of member `I`'s sub-block.
    #[inline]
    pub const fn sub_block_size<const I: usize>() -> usize
    where
        S: MemberAt<I>,
    {
        let () = Self::DEFINITION_CHECK;
        V * <MemberOf<S, I> as Member>::TUPLE_BYTES
    }

    /// Byte offset of member `I`'s sub-block from the start of the block.
    #[inline]
    pub const fn offset<const I: usize>() -> usize
    where
        S: MemberAt<I>,
    {
        let () = Self::DEFINITION_CHECK;
        V * <S as MemberAt<I>>::PRECEDING_TUPLE_BYTES
    }

    /// Runtime description of the layout.
    pub fn layout() -> BlockLayout {
        let () = Self::DEFINITION_CHECK;
        BlockLayout::from_specs(S::specs(), V)
    }

    /// Validates `tuple` and `sub` for member `I` and returns the element
    /// position inside the member's sub-block.
    ///
    /// # Errors
    ///
    /// [`SoaError::IndexOutOfRange`] for the first axis out of bounds,
    /// tuple index first.
    pub fn element_index<const I: usize>(tuple: usize, sub: &IndexOf<S, I>) -> Result<usize>
    where
        S: MemberAt<I>,
    {
        SoaError::check(Axis::Tuple, tuple, V)?;
        let flat = <MemberOf<S, I> as Member>::checked_flatten(sub)?;
        Ok(flat * V + tuple)
    }

    #[inline]
    fn position<const I: usize>(tuple: usize, sub: &IndexOf<S, I>) -> usize
    where
        S: MemberAt<I>,
    {
        if VALIDATE_INDICES {
            match Self::element_index::<I>(tuple, sub) {
                Ok(position) => position,
                Err(err) => panic!("{}", err),
            }
        } else {
            <MemberOf<S, I> as Member>::flatten(sub) * V + tuple
        }
    }

    /// Reference to one scalar of member `I`.
    ///
    /// # Panics
    ///
    /// With [`VALIDATE_INDICES`], panics if any index is out of range.
    /// Otherwise panics only if the element position falls outside the
    /// member's sub-block.
    #[inline]
    pub fn access<const I: usize>(&self, tuple: usize, sub: IndexOf<S, I>) -> &ScalarOf<S, I>
    where
        S: MemberAt<I>,
    {
        let position = Self::position::<I>(tuple, &sub);
        &self.member_slice::<I>()[position]
    }

    /// Mutable reference to one scalar of member `I`.
    ///
    /// # Panics
    ///
    /// As [`SoaBlock::access`].
    #[inline]
    pub fn access_mut<const I: usize>(
        &mut self,
        tuple: usize,
        sub: IndexOf<S, I>,
    ) -> &mut ScalarOf<S, I>
    where
        S: MemberAt<I>,
    {
        let position = Self::position::<I>(tuple, &sub);
        &mut self.member_slice_mut::<I>()[position]
    }

    /// Checked reference to one scalar of member `I`.
    ///
    /// # Errors
    ///
    /// [`SoaError::IndexOutOfRange`] if `tuple >= V` or any sub-index is
    /// outside its extent.
    ///
    /// # Examples
    ///
    /// ```
    /// use soa_core::SoaBlock;
    /// use soa_core::types::{Axis, SoaError};
    ///
    /// let block = SoaBlock::<(i32,), 8>::new();
    /// assert_eq!(
    ///     block.try_access::<0>(8, []),
    ///     Err(SoaError::IndexOutOfRange { axis: Axis::Tuple, index: 8, bound: 8 })
    /// );
    /// ```
    #[inline]
    pub fn try_access<const I: usize>(
        &self,
        tuple: usize,
        sub: IndexOf<S, I>,
    ) -> Result<&ScalarOf<S, I>>
    where
        S: MemberAt<I>,
    {
        let position = Self::element_index::<I>(tuple, &sub)?;
        Ok(&self.member_slice::<I>()[position])
    }

    /// Checked mutable reference to one scalar of member `I`.
    ///
    /// # Errors
    ///
    /// As [`SoaBlock::try_access`].
    #[inline]
    pub fn try_access_mut<const I: usize>(
        &mut self,
        tuple: usize,
        sub: IndexOf<S, I>,
    ) -> Result<&mut ScalarOf<S, I>>
    where
        S: MemberAt<I>,
    {
        let position = Self::element_index::<I>(tuple, &sub)?;
        Ok(&mut self.member_slice_mut::<I>()[position])
    }

    /// Reference to one scalar of member `I` without any index check.
    ///
    /// # Safety
    ///
    /// `tuple < V` and every sub-index must be below its extent.
    #[inline]
    pub unsafe fn access_unchecked<const I: usize>(
        &self,
        tuple: usize,
        sub: IndexOf<S, I>,
    ) -> &ScalarOf<S, I>
    where
        S: MemberAt<I>,
    {
        debug_assert!(Self::element_index::<I>(tuple, &sub).is_ok());
        let position = <MemberOf<S, I> as Member>::flatten(&sub) * V + tuple;
        // SAFETY: caller guarantees the indices, so `position` is inside the sub-block.
        unsafe { self.member_slice::<I>().get_unchecked(position) }
    }

    /// Mutable reference to one scalar of member `I` without any index check.
    ///
    /// # Safety
    ///
    /// As [`SoaBlock::access_unchecked`].
    #[inline]
    pub unsafe fn access_unchecked_mut<const I: usize>(
        &mut self,
        tuple: usize,
        sub: IndexOf<S, I>,
    ) -> &mut ScalarOf<S, I>
    where
        S: MemberAt<I>,
    {
        debug_assert!(Self::element_index::<I>(tuple, &sub).is_ok());
        let position = <MemberOf<S, I> as Member>::flatten(&sub) * V + tuple;
        // SAFETY: caller guarantees the indices, so `position` is inside the sub-block.
        unsafe { self.member_slice_mut::<I>().get_unchecked_mut(position) }
    }

    /// Reads one scalar of member `I`.
    #[inline]
    pub fn get<const I: usize>(&self, tuple: usize, sub: IndexOf<S, I>) -> ScalarOf<S, I>
    where
        S: MemberAt<I>,
    {
        *self.access::<I>(tuple, sub)
    }

    /// Writes one scalar of member `I`.
    #[inline]
    pub fn set<const I: usize>(&mut self, tuple: usize, sub: IndexOf<S, I>, value: ScalarOf<S, I>)
    where
        S: MemberAt<I>,
    {
        *self.access_mut::<I>(tuple, sub) = value;
    }

    /// Whole sub-block of member `I`, `V * extent` scalars.
    #[inline]
    pub fn member_slice<const I: usize>(&self) -> &[ScalarOf<S, I>]
    where
        S: MemberAt<I>,
    {
        let () = Self::DEFINITION_CHECK;
        let lanes = <S as MemberAt<I>>::lanes::<V>(&self.storage);
        bytemuck::cast_slice(std::slice::from_ref(lanes))
    }

    /// Mutable sub-block of member `I`.
    #[inline]
    pub fn member_slice_mut<const I: usize>(&mut self) -> &mut [ScalarOf<S, I>]
    where
        S: MemberAt<I>,
    {
        let () = Self::DEFINITION_CHECK;
        let lanes = <S as MemberAt<I>>::lanes_mut::<V>(&mut self.storage);
        bytemuck::cast_slice_mut(std::slice::from_mut(lanes))
    }

    #[inline]
    fn lane_start<const I: usize>(sub: &IndexOf<S, I>) -> usize
    where
        S: MemberAt<I>,
    {
        let flat = if VALIDATE_INDICES {
            match <MemberOf<S, I> as Member>::checked_flatten(sub) {
                Ok(flat) => flat,
                Err(err) => panic!("{}", err),
            }
        } else {
            <MemberOf<S, I> as Member>::flatten(sub)
        };
        flat * V
    }

    /// The `V` contiguous values of member `I` sharing sub-indices `sub`.
    ///
    /// # Examples
    ///
    /// ```
    /// use soa_core::SoaBlock;
    ///
    /// let mut block = SoaBlock::<([f32; 4],), 8>::new();
    /// block.lane_mut::<0>([2]).fill(1.5);
    ///
    /// assert_eq!(block.lane::<0>([2]), &[1.5; 8]);
    /// assert_eq!(block.get::<0>(5, [2]), 1.5);
    /// assert_eq!(block.get::<0>(5, [1]), 0.0);
    /// ```
    #[inline]
    pub fn lane<const I: usize>(&self, sub: IndexOf<S, I>) -> &[ScalarOf<S, I>]
    where
        S: MemberAt<I>,
    {
        let start = Self::lane_start::<I>(&sub);
        &self.member_slice::<I>()[start..start + V]
    }

    /// Mutable lane of member `I` for sub-indices `sub`.
    #[inline]
    pub fn lane_mut<const I: usize>(&mut self, sub: IndexOf<S, I>) -> &mut [ScalarOf<S, I>]
    where
        S: MemberAt<I>,
    {
        let start = Self::lane_start::<I>(&sub);
        &mut self.member_slice_mut::<I>()[start..start + V]
    }

    /// All lanes of member `I` in row-major sub-index order.
    #[inline]
    pub fn lanes<const I: usize>(&self) -> std::slice::ChunksExact<'_, ScalarOf<S, I>>
    where
        S: MemberAt<I>,
    {
        self.member_slice::<I>().chunks_exact(V)
    }

    /// Mutable lanes of member `I` in row-major sub-index order.
    #[inline]
    pub fn lanes_mut<const I: usize>(&mut self) -> std::slice::ChunksExactMut<'_, ScalarOf<S, I>>
    where
        S: MemberAt<I>,
    {
        self.member_slice_mut::<I>().chunks_exact_mut(V)
    }

    /// Sets every value of member `I` to `value`.
    #[inline]
    pub fn fill<const I: usize>(&mut self, value: ScalarOf<S, I>)
    where
        S: MemberAt<I>,
    {
        self.member_slice_mut::<I>().fill(value);
    }

    /// Copies tuple `tuple` out as one schema value.
    ///
    /// # Panics
    ///
    /// Panics if `tuple >= V`.
    ///
    /// # Examples
    ///
    /// ```
    /// use soa_core::SoaBlock;
    ///
    /// let mut block = SoaBlock::<([f64; 2], u32), 4>::new();
    /// block.set_tuple(1, ([0.25, 0.75], 9));
    ///
    /// assert_eq!(block.tuple(1), ([0.25, 0.75], 9));
    /// assert_eq!(block.get::<0>(1, [1]), 0.75);
    /// ```
    #[inline]
    pub fn tuple(&self, tuple: usize) -> S {
        let () = Self::DEFINITION_CHECK;
        S::gather::<V>(&self.storage, tuple)
    }

    /// Writes one schema value into tuple `tuple`.
    ///
    /// # Panics
    ///
    /// Panics if `tuple >= V`.
    #[inline]
    pub fn set_tuple(&mut self, tuple: usize, value: S) {
        let () = Self::DEFINITION_CHECK;
        S::scatter::<V>(&mut self.storage, tuple, value);
    }

    /// Base address of the block, for handing it across an FFI boundary.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        (self as *const Self).cast()
    }

    /// Mutable base address of the block.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        (self as *mut Self).cast()
    }
}

#[cfg(feature = "parallel")]
impl<S: Schema, const V: usize> SoaBlock<S, V> {
    /// Parallel iterator over the lanes of member `I`.
    #[inline]
    pub fn par_lanes<const I: usize>(&self) -> rayon::slice::ChunksExact<'_, ScalarOf<S, I>>
    where
        S: MemberAt<I>,
    {
        use rayon::prelude::*;

        self.member_slice::<I>().par_chunks_exact(V)
    }

    /// Parallel iterator over the mutable lanes of member `I`.
    ///
    /// Lanes are disjoint, so each can be written from a different thread.
    ///
    /// # Examples
    ///
    /// ```
    /// use rayon::prelude::*;
    /// use soa_core::SoaBlock;
    ///
    /// let mut block = SoaBlock::<([u32; 3],), 16>::new();
    /// block
    ///     .par_lanes_mut::<0>()
    ///     .enumerate()
    ///     .for_each(|(k, lane)| lane.fill(k as u32));
    ///
    /// assert_eq!(block.get::<0>(11, [2]), 2);
    /// ```
    #[inline]
    pub fn par_lanes_mut<const I: usize>(
        &mut self,
    ) -> rayon::slice::ChunksExactMut<'_, ScalarOf<S, I>>
    where
        S: MemberAt<I>,
    {
        use rayon::prelude::*;

        self.member_slice_mut::<I>().par_chunks_exact_mut(V)
    }
}

impl<S: Schema, const V: usize> Default for SoaBlock<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema, const V: usize> Clone for SoaBlock<S, V> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
        }
    }
}

impl<S: Schema, const V: usize> fmt::Debug for SoaBlock<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoaBlock")
            .field("members", &S::LEN)
            .field("vector_length", &V)
            .field("total_size", &Self::TOTAL_SIZE)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type Particle = ([[f64; 3]; 3], [f32; 4], i32);
    type Particles = SoaBlock<Particle, 8>;

    fn address<T>(value: &T) -> usize {
        value as *const T as usize
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(Particles::VECTOR_LENGTH, 8);
        assert_eq!(Particles::MEMBERS, 3);
        assert_eq!(Particles::total_size(), 736);
        assert_eq!(Particles::sub_block_size::<0>(), 576);
        assert_eq!(Particles::sub_block_size::<1>(), 128);
        assert_eq!(Particles::sub_block_size::<2>(), 32);
        assert_eq!(Particles::offset::<0>(), 0);
        assert_eq!(Particles::offset::<1>(), 576);
        assert_eq!(Particles::offset::<2>(), 704);
        assert_eq!(std::mem::size_of::<Particles>(), 736);
    }

    #[test]
    fn test_runtime_layout_matches_constants() {
        let layout = Particles::layout();
        assert_eq!(layout.vector_length(), 8);
        assert_eq!(layout.total_size(), Particles::total_size());
        assert_eq!(layout.offset(1), Some(Particles::offset::<1>()));
        assert_eq!(layout.sub_block_size(2), Some(Particles::sub_block_size::<2>()));
    }

    #[test]
    fn test_new_is_zeroed() {
        let block = Particles::new();
        assert!(block.member_slice::<0>().iter().all(|&v| v == 0.0));
        assert!(block.member_slice::<1>().iter().all(|&v| v == 0.0));
        assert!(block.member_slice::<2>().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_address_formula() {
        let block = Particles::new();
        let base = block.as_ptr() as usize;

        let a = address(block.access::<0>(5, [2, 1]));
        assert_eq!(a, base + 8 * ((2 * 3 + 1) * 8 + 5));

        let b = address(block.access::<1>(3, [2]));
        assert_eq!(b, base + 576 + 4 * (2 * 8 + 3));

        let c = address(block.access::<2>(7, []));
        assert_eq!(c, base + 704 + 4 * 7);
    }

    #[test]
    fn test_write_then_read() {
        let mut block = Particles::new();
        *block.access_mut::<0>(2, [0, 1]) = 3.25;
        *block.access_mut::<1>(2, [3]) = -1.5;
        *block.access_mut::<2>(2, []) = 99;

        assert_relative_eq!(*block.access::<0>(2, [0, 1]), 3.25);
        assert_relative_eq!(*block.access::<1>(2, [3]), -1.5);
        assert_eq!(*block.access::<2>(2, []), 99);

        assert_eq!(block.get::<0>(2, [1, 0]), 0.0);
        assert_eq!(block.get::<0>(3, [0, 1]), 0.0);
    }

    #[test]
    fn test_try_access_reports_tuple_axis() {
        let block = Particles::new();
        assert_eq!(
            block.try_access::<2>(8, []),
            Err(SoaError::IndexOutOfRange {
                axis: Axis::Tuple,
                index: 8,
                bound: 8
            })
        );
    }

    #[test]
    fn test_try_access_reports_sub_axis() {
        let mut block = Particles::new();
        assert_eq!(
            block.try_access_mut::<0>(0, [0, 3]).unwrap_err(),
            SoaError::IndexOutOfRange {
                axis: Axis::Extra(1),
                index: 3,
                bound: 3
            }
        );
        assert!(block.try_access_mut::<0>(7, [2, 2]).is_ok());
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "validate"))]
    #[should_panic(expected = "index out of range: tuple index 8 not in [0, 8)")]
    fn test_access_panics_past_end_when_validating() {
        let block = Particles::new();
        let _ = block.access::<0>(8, [0, 0]);
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "validate"))]
    #[should_panic(expected = "index out of range: sub-index 0 4 not in [0, 4)")]
    fn test_lane_panics_on_bad_sub_index_when_validating() {
        let block = Particles::new();
        let _ = block.lane::<1>([4]);
    }

    #[test]
    fn test_validate_indices_follows_build_mode() {
        assert_eq!(
            VALIDATE_INDICES,
            cfg!(debug_assertions) || cfg!(feature = "validate")
        );
    }

    #[test]
    #[cfg(not(any(debug_assertions, feature = "validate")))]
    fn test_access_without_validation_stays_in_sub_block() {
        let mut block = Particles::new();
        block.set::<0>(0, [1, 0], 3.5);
        // [0, 3] flattens to the same position as [1, 0].
        assert_eq!(*block.access::<0>(0, [0, 3]), 3.5);
    }

    #[test]
    #[should_panic]
    fn test_access_past_sub_block_always_panics() {
        let block = Particles::new();
        let _ = block.access::<2>(8, []);
    }

    #[test]
    fn test_zeroable_block_is_usable() {
        let mut block = <Particles as Zeroable>::zeroed();
        block.set::<2>(4, [], 11);
        assert_eq!(block.get::<2>(4, []), 11);

        let mut boxed = bytemuck::allocation::zeroed_box::<Particles>();
        boxed.set_tuple(1, ([[1.0; 3]; 3], [2.0; 4], 3));
        assert_eq!(boxed.lane::<2>([]), &[0, 3, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_access_unchecked_matches_access() {
        let mut block = Particles::new();
        block.set::<1>(6, [1], 2.0);
        // SAFETY: indices are within V = 8 and extent 4.
        let value = unsafe { *block.access_unchecked::<1>(6, [1]) };
        assert_eq!(value, 2.0);

        // SAFETY: as above.
        unsafe { *block.access_unchecked_mut::<1>(6, [1]) = 4.0 };
        assert_eq!(block.get::<1>(6, [1]), 4.0);
    }

    #[test]
    fn test_lane_is_stride_one() {
        let mut block = Particles::new();
        for (t, value) in block.lane_mut::<0>([1, 1]).iter_mut().enumerate() {
            *value = t as f64;
        }
        for t in 0..8 {
            assert_eq!(block.get::<0>(t, [1, 1]), t as f64);
        }
    }

    #[test]
    fn test_lanes_follow_row_major_order() {
        let mut block = Particles::new();
        for (k, lane) in block.lanes_mut::<0>().enumerate() {
            lane.fill(k as f64);
        }
        assert_eq!(block.lanes::<0>().count(), 9);
        assert_eq!(block.get::<0>(4, [0, 2]), 2.0);
        assert_eq!(block.get::<0>(4, [2, 0]), 6.0);
    }

    #[test]
    fn test_fill_member() {
        let mut block = Particles::new();
        block.fill::<2>(-3);
        assert!(block.member_slice::<2>().iter().all(|&v| v == -3));
        assert!(block.member_slice::<1>().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tuple_round_trip() {
        let mut block = Particles::new();
        let value = ([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], [1.0, 2.0, 3.0, 4.0], 5);
        block.set_tuple(6, value);

        assert_eq!(block.tuple(6), value);
        assert_eq!(block.get::<0>(6, [1, 1]), 1.0);
        assert_eq!(block.get::<1>(6, [3]), 4.0);
        assert_eq!(block.get::<2>(6, []), 5);
        assert_eq!(block.tuple(5), ([[0.0; 3]; 3], [0.0; 4], 0));
    }

    #[test]
    fn test_boxed_is_zeroed() {
        let block = SoaBlock::<([u64; 16], f32), 64>::boxed();
        assert_eq!(SoaBlock::<([u64; 16], f32), 64>::total_size(), 64 * (128 + 4));
        assert!(block.member_slice::<0>().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_clone_copies_values() {
        let mut block = Particles::new();
        block.set::<2>(1, [], 11);
        let copy = block.clone();
        block.set::<2>(1, [], 12);
        assert_eq!(copy.get::<2>(1, []), 11);
        assert_eq!(block.get::<2>(1, []), 12);
    }

    #[test]
    fn test_debug_output() {
        let text = format!("{:?}", Particles::new());
        assert_eq!(
            text,
            "SoaBlock { members: 3, vector_length: 8, total_size: 736 }"
        );
    }

    #[test]
    #[cfg(feature = "parallel")]
    fn test_par_lanes_mut_writes_disjoint_lanes() {
        use rayon::prelude::*;

        let mut block = Particles::new();
        block
            .par_lanes_mut::<1>()
            .enumerate()
            .for_each(|(k, lane)| {
                for (t, value) in lane.iter_mut().enumerate() {
                    *value = (k * 100 + t) as f32;
                }
            });

        assert_eq!(block.get::<1>(7, [3]), 307.0);
        let total: f32 = block.par_lanes::<1>().map(|lane| lane[0]).sum();
        assert_eq!(total, 0.0 + 100.0 + 200.0 + 300.0);
    }
}
