use nalgebra::{Point2, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};

// --- Simulation Types ---

/// A single circular particle. Owned by the simulation driver; the spatial
/// index only ever reads `position` and a caller-assigned index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub position: Point2<f32>,
    pub velocity: Vector2<f32>,
    pub radius: f32,
    pub mass: f32, // area mass: π r²
    pub colliding: bool,
    /// Visual cooling value in [0, 1]; set to 1 on contact, decays per frame.
    pub heat: f32,
}

impl Particle {
    pub fn new(position: Point2<f32>, velocity: Vector2<f32>, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
            mass: std::f32::consts::PI * radius * radius,
            colliding: false,
            heat: 0.0,
        }
    }

    /// Tries to place `params.particle_count` particles inside the world
    /// box with no initial overlaps (rejection sampling, 100 attempts per
    /// particle). Returns `None` if the box is too crowded to pack, or if
    /// the configured geometry is degenerate (inverted radius range, or a
    /// radius too large to fit the box at all). Params come straight from
    /// user config, so bad geometry is a reportable failure, not a panic.
    pub fn spawn_random<R: Rng + ?Sized>(params: &Params, rng: &mut R) -> Option<Vec<Self>> {
        if params.min_radius > params.max_radius || params.min_radius <= 0.0 {
            return None;
        }
        // The sampling range `radius..dim-radius` must be non-empty.
        if params.max_radius * 2.0 >= params.width || params.max_radius * 2.0 >= params.height {
            return None;
        }

        let mut particles: Vec<Self> = Vec::with_capacity(params.particle_count);

        for _ in 0..params.particle_count {
            let radius = rng.gen_range(params.min_radius..=params.max_radius);
            let mut placed = false;

            for _ in 0..100 {
                let position = Point2::new(
                    rng.gen_range(radius..params.width - radius),
                    rng.gen_range(radius..params.height - radius),
                );

                let clash = particles.iter().any(|other| {
                    let limit = radius + other.radius;
                    (position - other.position).norm_squared() < limit * limit
                });

                if !clash {
                    let velocity = Vector2::new(
                        (rng.gen::<f32>() - 0.5) * params.max_speed,
                        (rng.gen::<f32>() - 0.5) * params.max_speed,
                    );
                    particles.push(Self::new(position, velocity, radius));
                    placed = true;
                    break;
                }
            }

            if !placed {
                return None; // Failed to pack
            }
        }

        Some(particles)
    }
}

// --- Configuration Types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    pub seed: u64,

    // World
    pub width: f32,
    pub height: f32,
    pub particle_count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub max_speed: f32,

    // Collaborator physics (integration / response, outside the core)
    pub gravity: f32,
    pub elasticity: f32,

    // Broad phase tuning
    /// Cell edge length; 0 means "derive from the largest particle
    /// diameter", the usual choice that keeps `cell_radius = 1` sufficient.
    pub cell_size: f32,
    pub cell_radius: i32,

    // Driver
    pub max_frames: usize,
    /// Emit a particle snapshot to the UI every N frames.
    pub snapshot_every: usize,
    /// Pacing delay per frame; 0 runs flat out (tests, benchmarks).
    pub frame_delay_ms: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 800.0,
            height: 600.0,
            particle_count: 300,
            min_radius: 2.0,
            max_radius: 6.0,
            max_speed: 4.0,
            gravity: 0.08,
            elasticity: 0.9,
            cell_size: 0.0,
            cell_radius: 1,
            max_frames: 100_000,
            snapshot_every: 2,
            frame_delay_ms: 8,
        }
    }
}

impl Params {
    /// The cell size the grid is actually built with. An explicit value
    /// wins; otherwise one largest-particle diameter, so a radius-1 query
    /// square covers every geometrically possible contact.
    pub fn effective_cell_size(&self) -> f32 {
        if self.cell_size > 0.0 {
            self.cell_size
        } else {
            self.max_radius * 2.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimDefinition {
    pub params: Params,
}
