//! Schemas: ordered tuples of members.
//!
//! A schema is a Rust tuple of [`Member`] types, e.g.
//! `([[f64; 3]; 3], [f32; 4], i32)`. Tuple position is the member index.
//! Physical sub-block order equals schema order; members are never
//! reordered.
//!
//! For a vector length `V` the schema names a `repr(C)` storage struct
//! whose `i`-th field is member `i`'s [`Member::Lanes`]. Offsets are the
//! prefix sums of per-member sub-block sizes, computed as constants.

use super::descriptor::MemberSpec;
use super::member::Member;
use bytemuck::Zeroable;

/// Ordered list of members, implemented for tuples of 1 to 12 members.
///
/// Member sizes and alignments are exposed per tuple; multiplying by the
/// vector length gives the sub-block sizes.
///
/// ```compile_fail
/// use soa_core::SoaBlock;
///
/// // The empty tuple is not a schema.
/// let _ = SoaBlock::<(), 8>::new();
/// ```
pub trait Schema: Copy + Send + Sync + 'static {
    /// Block storage for `V` tuples: one field per member, in order.
    type Storage<const V: usize>: Zeroable + Copy + Send + Sync + 'static;

    /// Number of members.
    const LEN: usize;

    /// Bytes each member contributes per tuple, in schema order.
    const TUPLE_BYTES: &'static [usize];

    /// Scalar alignment of each member, in schema order.
    const ALIGNS: &'static [usize];

    /// Copies tuple `tuple` out of the storage as one schema value.
    fn gather<const V: usize>(storage: &Self::Storage<V>, tuple: usize) -> Self;

    /// Writes one schema value into tuple `tuple` of the storage.
    fn scatter<const V: usize>(storage: &mut Self::Storage<V>, tuple: usize, value: Self);

    /// Runtime descriptions of all members, in schema order.
    fn specs() -> Vec<MemberSpec>;
}

/// Member at compile-time index `I` of a schema.
///
/// Only implemented for `I < LEN`, so an invalid member index fails to
/// resolve at build time.
pub trait MemberAt<const I: usize>: Schema {
    /// Member type at position `I`.
    type Member: Member;

    /// Bytes per tuple of all members before `I`; times `V` gives the offset.
    const PRECEDING_TUPLE_BYTES: usize = prefix_sum(Self::TUPLE_BYTES, I);

    /// Sub-block of member `I`.
    fn lanes<const V: usize>(storage: &Self::Storage<V>) -> &<Self::Member as Member>::Lanes<V>;

    /// Mutable sub-block of member `I`.
    fn lanes_mut<const V: usize>(
        storage: &mut Self::Storage<V>,
    ) -> &mut <Self::Member as Member>::Lanes<V>;
}

/// Member type at index `I` of schema `S`.
pub type MemberOf<S, const I: usize> = <S as MemberAt<I>>::Member;

/// Scalar type of member `I` of schema `S`.
pub type ScalarOf<S, const I: usize> = <<S as MemberAt<I>>::Member as Member>::Scalar;

/// Sub-index type of member `I` of schema `S`.
pub type IndexOf<S, const I: usize> = <<S as MemberAt<I>>::Member as Member>::Index;

/// Sum of the first `end` entries.
pub(crate) const fn prefix_sum(values: &[usize], end: usize) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < end {
        total += values[i];
        i += 1;
    }
    total
}

/// Largest entry, or 1 for an empty slice.
pub(crate) const fn max_of(values: &[usize]) -> usize {
    let mut max = 1;
    let mut i = 0;
    while i < values.len() {
        if values[i] > max {
            max = values[i];
        }
        i += 1;
    }
    max
}

/// Returns whether every sub-block starts at a multiple of its alignment
/// when members are packed back to back for vector length `v`.
pub(crate) const fn offsets_aligned(tuple_bytes: &[usize], aligns: &[usize], v: usize) -> bool {
    let mut offset = 0;
    let mut i = 0;
    while i < tuple_bytes.len() {
        if offset % aligns[i] != 0 {
            return false;
        }
        offset += v * tuple_bytes[i];
        i += 1;
    }
    offset % max_of(aligns) == 0
}

macro_rules! impl_schema {
    ($storage:ident; $len:literal; $($idx:tt : $M:ident),+) => {
        #[doc(hidden)]
        #[repr(C)]
        #[derive(Clone, Copy)]
        pub struct $storage<$($M),+>($($M),+);

        // SAFETY: `repr(C)` struct whose fields are all `Zeroable`.
        unsafe impl<$($M: Zeroable),+> Zeroable for $storage<$($M),+> {}

        impl<$($M: Member),+> Schema for ($($M,)+) {
            type Storage<const V: usize> = $storage<$(<$M as Member>::Lanes<V>),+>;

            const LEN: usize = $len;
            const TUPLE_BYTES: &'static [usize] = &[$(<$M as Member>::TUPLE_BYTES),+];
            const ALIGNS: &'static [usize] =
                &[$(std::mem::align_of::<<$M as Member>::Scalar>()),+];

            #[inline]
            fn gather<const V: usize>(storage: &Self::Storage<V>, tuple: usize) -> Self {
                ($(<$M as Member>::gather::<V>(&storage.$idx, tuple),)+)
            }

            #[inline]
            fn scatter<const V: usize>(storage: &mut Self::Storage<V>, tuple: usize, value: Self) {
                $( <$M as Member>::scatter::<V>(&mut storage.$idx, tuple, value.$idx); )+
            }

            fn specs() -> Vec<MemberSpec> {
                vec![$(<$M as Member>::spec()),+]
            }
        }

        impl_schema!(@member_at [$($M),+]; $($idx : $M),+);
    };

    (@member_at $all:tt; $($idx:tt : $M:ident),+) => {
        $( impl_schema!(@one $all; $idx : $M); )+
    };

    (@one [$($All:ident),+]; $idx:tt : $M:ident) => {
        impl<$($All: Member),+> MemberAt<$idx> for ($($All,)+) {
            type Member = $M;

            #[inline]
            fn lanes<const V: usize>(storage: &Self::Storage<V>) -> &<$M as Member>::Lanes<V> {
                &storage.$idx
            }

            #[inline]
            fn lanes_mut<const V: usize>(
                storage: &mut Self::Storage<V>,
            ) -> &mut <$M as Member>::Lanes<V> {
                &mut storage.$idx
            }
        }
    };
}

impl_schema!(SoaStorage1; 1; 0: A);
impl_schema!(SoaStorage2; 2; 0: A, 1: B);
impl_schema!(SoaStorage3; 3; 0: A, 1: B, 2: C);
impl_schema!(SoaStorage4; 4; 0: A, 1: B, 2: C, 3: D);
impl_schema!(SoaStorage5; 5; 0: A, 1: B, 2: C, 3: D, 4: E);
impl_schema!(SoaStorage6; 6; 0: A, 1: B, 2: C, 3: D, 4: E, 5: F);
impl_schema!(SoaStorage7; 7; 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G);
impl_schema!(SoaStorage8; 8; 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H);
impl_schema!(SoaStorage9; 9; 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: J);
impl_schema!(SoaStorage10; 10; 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: J, 9: K);
impl_schema!(SoaStorage11; 11; 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: J, 9: K, 10: L);
impl_schema!(SoaStorage12; 12; 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: J, 9: K, 10: L, 11: N);
