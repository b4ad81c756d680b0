//! Runtime descriptors of a block layout.
//!
//! The authoritative layout is fixed by the block type. These descriptors
//! mirror it as ordinary values for reporting, logging and serialisation;
//! access never consults them.

use crate::types::ScalarKind;
use std::fmt;

/// Scalar kind and extra dimensions of one member.
///
/// # Examples
/// ```
/// use soa_core::layout::MemberSpec;
/// use soa_core::types::ScalarKind;
///
/// let spec = MemberSpec::new(ScalarKind::F64, vec![3, 3]);
/// assert_eq!(spec.extent(), 9);
/// assert_eq!(format!("{}", spec), "f64[3][3]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberSpec {
    scalar: ScalarKind,
    extra_dims: Vec<usize>,
}

impl MemberSpec {
    /// Creates a member description.
    pub fn new(scalar: ScalarKind, extra_dims: Vec<usize>) -> Self {
        Self { scalar, extra_dims }
    }

    /// Scalar type at every leaf.
    #[inline]
    pub fn scalar(&self) -> ScalarKind {
        self.scalar
    }

    /// Extra dimensions, outermost first.
    #[inline]
    pub fn extra_dims(&self) -> &[usize] {
        &self.extra_dims
    }

    /// Number of extra dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.extra_dims.len()
    }

    /// Product of the extra dimensions.
    pub fn extent(&self) -> usize {
        self.extra_dims.iter().product()
    }

    /// Bytes one tuple contributes to the member's sub-block.
    pub fn tuple_bytes(&self) -> usize {
        self.extent() * self.scalar.size()
    }
}

impl fmt::Display for MemberSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scalar)?;
        for extent in &self.extra_dims {
            write!(f, "[{}]", extent)?;
        }
        Ok(())
    }
}

/// Placement of one member's sub-block inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberLayout {
    index: usize,
    spec: MemberSpec,
    sub_block_size: usize,
    offset: usize,
}

impl MemberLayout {
    /// Position of the member in the schema.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Member description.
    #[inline]
    pub fn spec(&self) -> &MemberSpec {
        &self.spec
    }

    /// Sub-block size in bytes.
    #[inline]
    pub fn sub_block_size(&self) -> usize {
        self.sub_block_size
    }

    /// Byte offset of the sub-block from the start of the block.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// One past the last byte of the sub-block.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.sub_block_size
    }
}

/// Byte layout of a block: one sub-block per member, in schema order.
///
/// Obtained from [`SoaBlock::layout`](crate::SoaBlock::layout).
///
/// # Examples
/// ```
/// use soa_core::SoaBlock;
///
/// type Particles = SoaBlock<([[f64; 3]; 3], [f32; 4], i32), 8>;
///
/// let layout = Particles::layout();
/// assert_eq!(layout.total_size(), 736);
/// assert_eq!(layout.offset(1), Some(576));
/// assert_eq!(layout.sub_block_size(2), Some(32));
/// assert_eq!(layout.offset(3), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockLayout {
    vector_length: usize,
    members: Vec<MemberLayout>,
    total_size: usize,
}

impl BlockLayout {
    /// Lays out `specs` back to back as a prefix sum of sub-block sizes.
    pub(crate) fn from_specs(specs: Vec<MemberSpec>, vector_length: usize) -> Self {
        let mut offset = 0;
        let members = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                let sub_block_size = vector_length * spec.tuple_bytes();
                let member = MemberLayout {
                    index,
                    spec,
                    sub_block_size,
                    offset,
                };
                offset += sub_block_size;
                member
            })
            .collect();

        Self {
            vector_length,
            members,
            total_size: offset,
        }
    }

    /// Number of tuples in the block.
    #[inline]
    pub fn vector_length(&self) -> usize {
        self.vector_length
    }

    /// Number of members in the schema.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the schema has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All member layouts in schema order.
    #[inline]
    pub fn members(&self) -> &[MemberLayout] {
        &self.members
    }

    /// Layout of member `index`, if it exists.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&MemberLayout> {
        self.members.get(index)
    }

    /// Sub-block size of member `index` in bytes.
    pub fn sub_block_size(&self, index: usize) -> Option<usize> {
        self.get(index).map(MemberLayout::sub_block_size)
    }

    /// Byte offset of member `index`.
    pub fn offset(&self, index: usize) -> Option<usize> {
        self.get(index).map(MemberLayout::offset)
    }

    /// Total block size in bytes.
    #[inline]
    pub fn total_size(&self) -> usize {
        self.total_size
    }
}

impl fmt::Display for BlockLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "SoA block: {} members, vector length {}, {} bytes",
            self.len(),
            self.vector_length,
            self.total_size
        )?;
        writeln!(
            f,
            "{:<8} {:<16} {:>10} {:>10}",
            "member", "type", "offset", "bytes"
        )?;
        for member in &self.members {
            writeln!(
                f,
                "{:<8} {:<16} {:>10} {:>10}",
                member.index,
                member.spec.to_string(),
                member.offset,
                member.sub_block_size
            )?;
        }
        Ok(())
    }
}
