//! Integration tests for the block layout laws.
//!
//! Covers the size law, offset monotonicity, stride-1 addressing,
//! sub-block disjointness, write/read round trips and range checking,
//! across several schemas and vector lengths.

use approx::assert_relative_eq;
use proptest::prelude::*;
use soa_core::layout::{BlockLayout, Schema};
use soa_core::types::{Axis, SoaError};
use soa_core::SoaBlock;
use std::collections::HashMap;

type Particle = ([[f64; 3]; 3], [f32; 4], i32);
type Mixed = (u8, [[u16; 2]; 2], [i64; 3], f32, [[[u8; 2]; 2]; 2]);

fn address<T>(value: &T) -> usize {
    value as *const T as usize
}

/// Size law computed independently of the layout code.
fn expected_total_size<S: Schema>(vector_length: usize) -> usize {
    S::specs()
        .iter()
        .map(|spec| {
            vector_length * spec.extra_dims().iter().product::<usize>() * spec.scalar().size()
        })
        .sum()
}

fn assert_offsets_monotonic(layout: &BlockLayout) {
    assert_eq!(layout.offset(0), Some(0));
    for i in 0..layout.len() - 1 {
        assert_eq!(
            layout.offset(i + 1).unwrap(),
            layout.offset(i).unwrap() + layout.sub_block_size(i).unwrap()
        );
    }
}

fn assert_sub_blocks_disjoint(layout: &BlockLayout) {
    for a in layout.members() {
        for b in layout.members() {
            if a.index() != b.index() {
                assert!(a.end() <= b.offset() || b.end() <= a.offset());
            }
        }
    }
}

// ============================================================================
// Size and Offset Laws
// ============================================================================

#[test]
fn test_documented_example_size() {
    assert_eq!(SoaBlock::<Particle, 8>::total_size(), 8 * (9 * 8) + 8 * (4 * 4) + 8 * 4);
    assert_eq!(SoaBlock::<Particle, 8>::total_size(), 736);
}

macro_rules! check_size_law {
    ($schema:ty, $($v:literal),+) => {
        $(
            assert_eq!(
                SoaBlock::<$schema, $v>::total_size(),
                expected_total_size::<$schema>($v)
            );
            assert_eq!(
                std::mem::size_of::<SoaBlock<$schema, $v>>(),
                SoaBlock::<$schema, $v>::total_size()
            );
            let layout = SoaBlock::<$schema, $v>::layout();
            assert_eq!(layout.total_size(), expected_total_size::<$schema>($v));
            assert_offsets_monotonic(&layout);
            assert_sub_blocks_disjoint(&layout);
        )+
    };
}

#[test]
fn test_size_law_particle() {
    check_size_law!(Particle, 8, 16, 32, 64, 128);
}

#[test]
fn test_size_law_mixed() {
    check_size_law!(Mixed, 8, 16, 32, 64);
}

#[test]
fn test_size_law_single_member() {
    check_size_law!((u8,), 1, 2, 4, 8);
    check_size_law!(([f64; 5],), 1, 2, 4);
}

#[test]
fn test_const_offsets_match_layout() {
    type Block = SoaBlock<Mixed, 16>;
    let layout = Block::layout();

    assert_eq!(layout.offset(0), Some(Block::offset::<0>()));
    assert_eq!(layout.offset(1), Some(Block::offset::<1>()));
    assert_eq!(layout.offset(2), Some(Block::offset::<2>()));
    assert_eq!(layout.offset(3), Some(Block::offset::<3>()));
    assert_eq!(layout.offset(4), Some(Block::offset::<4>()));
    assert_eq!(layout.sub_block_size(2), Some(Block::sub_block_size::<2>()));
    assert_eq!(Block::sub_block_size::<2>(), 16 * 3 * 8);
}

#[test]
fn test_sub_block_placement_in_memory() {
    type Block = SoaBlock<Mixed, 8>;
    let block = Block::new();
    let base = block.as_ptr() as usize;

    assert_eq!(address(block.access::<0>(0, [])), base + Block::offset::<0>());
    assert_eq!(address(block.access::<1>(0, [0, 0])), base + Block::offset::<1>());
    assert_eq!(address(block.access::<2>(0, [0])), base + Block::offset::<2>());
    assert_eq!(address(block.access::<3>(0, [])), base + Block::offset::<3>());
    assert_eq!(address(block.access::<4>(0, [0, 0, 0])), base + Block::offset::<4>());
}

// ============================================================================
// Range Checking
// ============================================================================

#[test]
fn test_one_past_end_is_index_out_of_range() {
    let block = SoaBlock::<Particle, 8>::new();

    assert_eq!(
        block.try_access::<0>(8, [0, 0]),
        Err(SoaError::IndexOutOfRange {
            axis: Axis::Tuple,
            index: 8,
            bound: 8
        })
    );
    assert!(matches!(
        block.try_access::<1>(0, [4]),
        Err(SoaError::IndexOutOfRange {
            axis: Axis::Extra(0),
            ..
        })
    ));
    assert!(block.try_access::<2>(7, []).is_ok());
}

#[test]
#[cfg(any(debug_assertions, feature = "validate"))]
#[should_panic(expected = "index out of range")]
fn test_validation_mode_access_past_end_panics() {
    let block = SoaBlock::<Particle, 8>::new();
    let _ = block.access::<2>(8, []);
}

// ============================================================================
// Tutorial Walk-Through
// ============================================================================

#[test]
fn test_tutorial_values() {
    let mut block = SoaBlock::<Particle, 8>::new();
    for t in 0..8 {
        for i in 0..3 {
            for j in 0..3 {
                *block.access_mut::<0>(t, [i, j]) = 1.0 * (t + i + j) as f64;
            }
        }
        for i in 0..4 {
            *block.access_mut::<1>(t, [i]) = 1.0 * (t + i) as f32;
        }
        *block.access_mut::<2>(t, []) = t as i32 + 1234;
    }

    for t in 0..8 {
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(block.get::<0>(t, [i, j]), (t + i + j) as f64);
            }
        }
        for i in 0..4 {
            assert_relative_eq!(block.get::<1>(t, [i]), (t + i) as f32);
        }
        assert_eq!(block.get::<2>(t, []), t as i32 + 1234);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[derive(Debug, Clone)]
enum Write {
    Stress { t: usize, i: usize, j: usize, value: f64 },
    Weight { t: usize, i: usize, value: f32 },
    Id { t: usize, value: i32 },
}

fn write_strategy() -> impl Strategy<Value = Write> {
    prop_oneof![
        (0usize..8, 0usize..3, 0usize..3, -1.0e6f64..1.0e6)
            .prop_map(|(t, i, j, value)| Write::Stress { t, i, j, value }),
        (0usize..8, 0usize..4, -1.0e6f32..1.0e6)
            .prop_map(|(t, i, value)| Write::Weight { t, i, value }),
        (0usize..8, any::<i32>()).prop_map(|(t, value)| Write::Id { t, value }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_stride_one_for_any_sub_indices(i in 0usize..3, j in 0usize..3, k in 0usize..4) {
        let block = SoaBlock::<Particle, 16>::new();
        for t in 1..16 {
            prop_assert_eq!(
                address(block.access::<0>(t, [i, j])) - address(block.access::<0>(t - 1, [i, j])),
                std::mem::size_of::<f64>()
            );
            prop_assert_eq!(
                address(block.access::<1>(t, [k])) - address(block.access::<1>(t - 1, [k])),
                std::mem::size_of::<f32>()
            );
            prop_assert_eq!(
                address(block.access::<2>(t, [])) - address(block.access::<2>(t - 1, [])),
                std::mem::size_of::<i32>()
            );
        }
    }

    #[test]
    fn test_addresses_stay_inside_own_sub_block(
        t in 0usize..8, a in 0usize..2, b in 0usize..2, c in 0usize..2
    ) {
        type Block = SoaBlock<Mixed, 8>;
        let block = Block::new();
        let base = block.as_ptr() as usize;

        let addr = address(block.access::<4>(t, [a, b, c])) - base;
        prop_assert!(addr >= Block::offset::<4>());
        prop_assert!(addr < Block::offset::<4>() + Block::sub_block_size::<4>());

        let addr = address(block.access::<1>(t, [a, b])) - base;
        prop_assert!(addr >= Block::offset::<1>());
        prop_assert!(addr + 2 <= Block::offset::<1>() + Block::sub_block_size::<1>());
    }

    #[test]
    fn test_writes_read_back_without_interference(
        writes in prop::collection::vec(write_strategy(), 1..64)
    ) {
        let mut block = SoaBlock::<Particle, 8>::new();
        let mut stress = HashMap::new();
        let mut weight = HashMap::new();
        let mut id = HashMap::new();

        for write in &writes {
            match *write {
                Write::Stress { t, i, j, value } => {
                    *block.access_mut::<0>(t, [i, j]) = value;
                    stress.insert((t, i, j), value);
                }
                Write::Weight { t, i, value } => {
                    *block.access_mut::<1>(t, [i]) = value;
                    weight.insert((t, i), value);
                }
                Write::Id { t, value } => {
                    *block.access_mut::<2>(t, []) = value;
                    id.insert(t, value);
                }
            }
        }

        for t in 0..8 {
            for i in 0..3 {
                for j in 0..3 {
                    let expected = stress.get(&(t, i, j)).copied().unwrap_or(0.0);
                    prop_assert_eq!(block.get::<0>(t, [i, j]), expected);
                }
            }
            for i in 0..4 {
                let expected = weight.get(&(t, i)).copied().unwrap_or(0.0);
                prop_assert_eq!(block.get::<1>(t, [i]), expected);
            }
            prop_assert_eq!(block.get::<2>(t, []), id.get(&t).copied().unwrap_or(0));
        }
    }

    #[test]
    fn test_tuple_view_agrees_with_access(
        t in 0usize..32,
        stress in prop::array::uniform3(prop::array::uniform3(-1.0e3f64..1.0e3)),
        weight in prop::array::uniform4(-1.0e3f32..1.0e3),
        id in any::<i32>()
    ) {
        let mut block = SoaBlock::<Particle, 32>::boxed();
        block.set_tuple(t, (stress, weight, id));

        prop_assert_eq!(block.get::<0>(t, [2, 1]), stress[2][1]);
        prop_assert_eq!(block.get::<1>(t, [3]), weight[3]);
        prop_assert_eq!(block.get::<2>(t, []), id);
        prop_assert_eq!(block.tuple(t), (stress, weight, id));
    }

    #[test]
    fn test_checked_access_rejects_out_of_range(
        t in 0usize..40, i in 0usize..5, j in 0usize..5
    ) {
        let block = SoaBlock::<Particle, 32>::new();
        let result = block.try_access::<0>(t, [i, j]);
        prop_assert_eq!(result.is_ok(), t < 32 && i < 3 && j < 3);
    }
}
