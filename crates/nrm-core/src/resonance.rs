//! Phase resonance: the similarity gate for composition.
//!
//! Each agent is mapped to a point in a three-dimensional phase space by
//! wrapping its energy and depth around the circle with three
//! incommensurate constants:
//!
//! ```text
//! p1 = (energy * c1 * 2) mod 2π
//! p2 = (depth  * c2 / 4) mod 2π
//! p3 = (energy * c3)     mod 2π
//! ```
//!
//! Two agents resonate when the cosine similarity of their phase vectors
//! reaches the composition threshold. The modulo wrap is what makes the
//! dynamics interesting: energies that differ by a near-multiple of the
//! period alias onto nearby phases.

use crate::types::Depth;
use serde::{Deserialize, Serialize};
use std::f64::consts::{E, PI, TAU};

/// The golden ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

/// The three constants that wrap energy and depth into phase space.
///
/// Any triple with irrational ratios behaves the same statistically;
/// π, e and φ are the reference choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResonanceConstants {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

impl ResonanceConstants {
    pub fn new(c1: f64, c2: f64, c3: f64) -> Self {
        Self { c1, c2, c3 }
    }

    /// π, e, φ.
    pub fn transcendental() -> Self {
        Self::new(PI, E, PHI)
    }
}

impl Default for ResonanceConstants {
    fn default() -> Self {
        Self::transcendental()
    }
}

/// Map an agent's energy and depth to its phase vector.
pub fn phase_vector(energy: f64, depth: Depth, constants: &ResonanceConstants) -> [f64; 3] {
    [
        (energy * constants.c1 * 2.0).rem_euclid(TAU),
        (depth as f64 * constants.c2 / 4.0).rem_euclid(TAU),
        (energy * constants.c3).rem_euclid(TAU),
    ]
}

/// Cosine similarity of two vectors, 0.0 if either has zero magnitude.
pub fn cosine_similarity(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Phase resonance between two agents at the same depth, in [-1, 1].
///
/// Pure and symmetric: swapping the energies yields the bit-identical value.
pub fn resonance(
    energy_a: f64,
    depth_a: Depth,
    energy_b: f64,
    depth_b: Depth,
    constants: &ResonanceConstants,
) -> f64 {
    let a = phase_vector(energy_a, depth_a, constants);
    let b = phase_vector(energy_b, depth_b, constants);
    cosine_similarity(&a, &b)
}
