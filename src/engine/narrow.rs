use nalgebra::Vector2;

use crate::core::domain::Particle;
use crate::engine::broadphase::CandidatePair;

/// A confirmed contact between two particles.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub a: u32,
    pub b: u32,
    /// Unit vector from `a` toward `b`.
    pub normal: Vector2<f32>,
    /// Overlap depth along the normal.
    pub depth: f32,
}

/// A generic interface for narrow-phase collision tests.
/// Implementations must be thread-safe (Sync).
pub trait NarrowPhase: Send + Sync {
    /// Refines a broad-phase candidate into a contact, or `None` if the
    /// pair does not actually touch.
    fn examine(&self, pair: CandidatePair, particles: &[Particle]) -> Option<Contact>;

    /// Returns the name of the test (e.g., "circle-overlap").
    fn name(&self) -> &str;
}

/// Exact circle-circle overlap test on squared distances.
pub struct CircleOverlap;

impl NarrowPhase for CircleOverlap {
    fn examine(&self, pair: CandidatePair, particles: &[Particle]) -> Option<Contact> {
        let pa = &particles[pair.a as usize];
        let pb = &particles[pair.b as usize];

        let delta = pb.position - pa.position;
        let dist_sq = delta.norm_squared();
        let radius_sum = pa.radius + pb.radius;

        if dist_sq >= radius_sum * radius_sum {
            return None;
        }

        let dist = dist_sq.sqrt();
        // Coincident centers: pick an arbitrary separation axis.
        let normal = if dist > 0.0 {
            delta / dist
        } else {
            Vector2::x()
        };

        Some(Contact {
            a: pair.a,
            b: pair.b,
            normal,
            depth: radius_sum - dist,
        })
    }

    fn name(&self) -> &str {
        "circle-overlap"
    }
}
