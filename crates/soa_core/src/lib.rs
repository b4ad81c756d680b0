//! # soa_core: Structure-of-Arrays Layout Engine
//!
//! ## Role
//!
//! soa_core turns a schema of heterogeneous, possibly multi-dimensional
//! members into one flat block holding a fixed number `V` of tuples, with
//! the tuple index stride-1 in every member. It provides:
//! - Member and schema description (`layout::member`, `layout::schema`)
//! - Layout computation as compile-time prefix sums (`layout`, [`SoaBlock`] constants)
//! - Typed access by member index, tuple index and sub-indices (`block`)
//! - Error types: [`SoaError`] (`types::error`)
//!
//! ## Layout
//!
//! For `SoaBlock<([[f64; 3]; 3], [f32; 4], i32), 8>` the block is laid out
//! exactly as the hand-written struct
//!
//! ```text
//! #[repr(C)]
//! struct Equivalent {
//!     d0: [[[f64; 8]; 3]; 3],   // offset   0, 576 bytes
//!     d1: [[f32; 8]; 4],        // offset 576, 128 bytes
//!     d2: [i32; 8],             // offset 704,  32 bytes
//! }                             // total 736 bytes, no padding
//! ```
//!
//! ## Build-Time Contract
//!
//! Unsupported scalar types, zero extra dimensions, vector lengths that are
//! not a positive power of two, misaligned sub-blocks, member indices past
//! the schema and sub-index arity mismatches all fail the build. Only index
//! range violations are runtime errors.
//!
//! ## Usage Examples
//!
//! ```rust
//! use soa_core::SoaBlock;
//!
//! type DataTypes = ([[f64; 3]; 3], [f32; 4], i32);
//! type Particles = SoaBlock<DataTypes, 8>;
//!
//! let mut particles = Particles::new();
//! for t in 0..8 {
//!     for i in 0..3 {
//!         for j in 0..3 {
//!             particles.set::<0>(t, [i, j], (t + i + j) as f64);
//!         }
//!     }
//!     for i in 0..4 {
//!         particles.set::<1>(t, [i], (t + i) as f32);
//!     }
//!     particles.set::<2>(t, [], t as i32 + 1234);
//! }
//!
//! assert_eq!(particles.get::<0>(5, [2, 1]), 8.0);
//! assert_eq!(particles.get::<2>(7, []), 1241);
//! assert_eq!(Particles::total_size(), 736);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): rayon parallel iteration over member lanes
//! - `validate`: per-axis index checks in `access` even without debug assertions
//! - `serde`: serialisation for the layout descriptors

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod block;
pub mod layout;
pub mod types;

pub use block::{SoaBlock, VALIDATE_INDICES};
pub use layout::{BlockLayout, Member, MemberAt, Schema};
pub use types::{Axis, Scalar, SoaError};
