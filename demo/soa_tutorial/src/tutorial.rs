//! Particle tutorial.
//!
//! Each particle carries a 3x3 stress tensor, four weights and an id. The
//! block is filled with `stress[i][j] = t + i + j`, `weights[i] = t + i`
//! and `id = t + 1234`.

use crate::config::{ConfigError, OutputFormat, TutorialConfig};
use crate::error::TutorialError;
use crate::runtime::RuntimeScope;
use rayon::prelude::*;
use serde::Serialize;
use soa_core::{BlockLayout, SoaBlock};
use std::fmt::Write as _;

/// Particle schema: stress tensor, weights, id.
pub type DataTypes = ([[f64; 3]; 3], [f32; 4], i32);

/// Particle block of width `V`.
pub type Particles<const V: usize> = SoaBlock<DataTypes, V>;

/// Fill every element through per-element access.
pub fn populate<const V: usize>(particles: &mut Particles<V>) {
    for t in 0..V {
        for i in 0..3 {
            for j in 0..3 {
                *particles.access_mut::<0>(t, [i, j]) = (t + i + j) as f64;
            }
        }
        for i in 0..4 {
            *particles.access_mut::<1>(t, [i]) = (t + i) as f32;
        }
        *particles.access_mut::<2>(t, []) = t as i32 + 1234;
    }
}

/// Fill the same values lane by lane on the current rayon pool.
pub fn populate_parallel<const V: usize>(particles: &mut Particles<V>) {
    particles
        .par_lanes_mut::<0>()
        .enumerate()
        .for_each(|(k, lane)| {
            let (i, j) = (k / 3, k % 3);
            for (t, value) in lane.iter_mut().enumerate() {
                *value = (t + i + j) as f64;
            }
        });
    particles
        .par_lanes_mut::<1>()
        .enumerate()
        .for_each(|(i, lane)| {
            for (t, value) in lane.iter_mut().enumerate() {
                *value = (t + i) as f32;
            }
        });
    particles.par_lanes_mut::<2>().for_each(|lane| {
        for (t, value) in lane.iter_mut().enumerate() {
            *value = t as i32 + 1234;
        }
    });
}

/// Compare two blocks tuple by tuple.
pub fn verify<const V: usize>(
    expected: &Particles<V>,
    actual: &Particles<V>,
) -> Result<(), TutorialError> {
    match (0..V).find(|&t| expected.tuple(t) != actual.tuple(t)) {
        Some(tuple) => Err(TutorialError::FillMismatch { tuple }),
        None => Ok(()),
    }
}

/// One particle as reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TupleRecord {
    pub tuple: usize,
    pub stress: [[f64; 3]; 3],
    pub weights: [f32; 4],
    pub id: i32,
}

/// Layout plus every particle in the block.
#[derive(Debug, Clone, Serialize)]
pub struct TutorialReport {
    pub layout: BlockLayout,
    pub tuples: Vec<TupleRecord>,
}

impl TutorialReport {
    /// Snapshot a filled block.
    pub fn new<const V: usize>(particles: &Particles<V>) -> Self {
        let tuples = (0..V)
            .map(|t| {
                let (stress, weights, id) = particles.tuple(t);
                TupleRecord {
                    tuple: t,
                    stress,
                    weights,
                    id,
                }
            })
            .collect();

        Self {
            layout: Particles::<V>::layout(),
            tuples,
        }
    }

    /// Render the report in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String, TutorialError> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Table => Ok(self.render_table()),
        }
    }

    fn render_table(&self) -> String {
        let mut out = format!("{}\n", self.layout);
        for record in &self.tuples {
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "tuple {:>3} | stress {:?} | weights {:?} | id {}",
                record.tuple, record.stress, record.weights, record.id
            );
        }
        out
    }
}

fn run_width<const V: usize>(
    format: OutputFormat,
    scope: &RuntimeScope,
) -> Result<String, TutorialError> {
    let mut reference = Particles::<V>::boxed();
    populate::<V>(&mut reference);

    let mut particles = Particles::<V>::boxed();
    let target: &mut Particles<V> = &mut particles;
    scope.install(|| populate_parallel::<V>(target));

    verify::<V>(&reference, &particles)?;
    tracing::info!(
        vector_length = V,
        total_size = Particles::<V>::total_size(),
        threads = scope.threads(),
        "Particle block filled"
    );

    let report = TutorialReport::new::<V>(&particles);
    tracing::debug!(tuples = report.tuples.len(), %format, "Rendering report");
    report.render(format)
}

/// Run the tutorial at the configured vector length.
pub fn run(config: &TutorialConfig, scope: &RuntimeScope) -> Result<String, TutorialError> {
    match config.vector_length {
        8 => run_width::<8>(config.format, scope),
        16 => run_width::<16>(config.format, scope),
        32 => run_width::<32>(config.format, scope),
        64 => run_width::<64>(config.format, scope),
        other => Err(ConfigError::InvalidVectorLength(other).into()),
    }
}
