use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::core::domain::{Params, Particle};
use crate::core::spatial::UniformGrid;
use crate::engine::broadphase::BroadPhase;
use crate::engine::narrow::{Contact, NarrowPhase};
use crate::sim::{FrameSnapshot, FrameStats, SimEvent};

const HEAT_COOLING: f32 = 0.01;
const HEARTBEAT_EVERY: usize = 60;

/// A generic interface for motion integration. The spatial core never
/// depends on this; it exists so the driver can exercise the broad phase
/// against any motion model, including a frozen one in tests.
/// Implementations must be thread-safe (Sync).
pub trait Integrator: Send + Sync {
    /// Advances every particle by one frame.
    fn step(&self, params: &Params, particles: &mut [Particle]);

    /// Returns the name of the motion model (e.g., "ballistic").
    fn name(&self) -> &str;
}

/// Gravity plus wall bounce with restitution, the original demo's motion
/// model. Particles cool their contact heat each frame.
pub struct BallisticIntegrator;

impl Integrator for BallisticIntegrator {
    fn step(&self, params: &Params, particles: &mut [Particle]) {
        let (width, height) = (params.width, params.height);
        let (gravity, elasticity) = (params.gravity, params.elasticity);

        particles.par_iter_mut().for_each(|p| {
            p.velocity.y += gravity;
            p.position += p.velocity;

            if p.position.x - p.radius < 0.0 || p.position.x + p.radius > width {
                p.velocity.x *= -elasticity;
                p.position.x = p.position.x.clamp(p.radius, width - p.radius);
            }
            if p.position.y - p.radius < 0.0 || p.position.y + p.radius > height {
                p.velocity.y *= -elasticity;
                p.position.y = p.position.y.clamp(p.radius, height - p.radius);
            }

            p.heat = (p.heat - HEAT_COOLING).max(0.0);
        });
    }

    fn name(&self) -> &str {
        "ballistic"
    }
}

/// Owns the frame loop: integrate, rebuild the grid, broad phase, narrow
/// phase, contact response, telemetry. Runs on a worker thread and reports
/// through the channel.
pub struct Driver {
    integrator: Arc<dyn Integrator>,
    narrow: Arc<dyn NarrowPhase>,
    params: Params,
}

impl Driver {
    pub fn new(
        integrator: Arc<dyn Integrator>,
        narrow: Arc<dyn NarrowPhase>,
        params: Params,
    ) -> Self {
        Self {
            integrator,
            narrow,
            params,
        }
    }

    /// Runs the simulation loop until `max_frames` frames have elapsed.
    pub fn solve(&self, tx: Sender<SimEvent>) {
        let params = &self.params;

        // Defensive: validate inputs before spinning up a frame loop.
        if params.max_frames == 0 {
            let _ = tx.send(SimEvent::Log("max_frames set to 0. Exiting.".to_string()));
            let _ = tx.send(SimEvent::Finished);
            return;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut particles = match Particle::spawn_random(params, &mut rng) {
            Some(p) => p,
            None => {
                let _ = tx.send(SimEvent::Log(
                    "Could not pack particles into the world box; reduce count or radius."
                        .to_string(),
                ));
                let _ = tx.send(SimEvent::Finished);
                return;
            }
        };

        let grid = match UniformGrid::new(params.width, params.height, params.effective_cell_size())
        {
            Ok(g) => g.with_trace(),
            Err(e) => {
                let _ = tx.send(SimEvent::Log(format!("Grid construction failed: {e}")));
                let _ = tx.send(SimEvent::Finished);
                return;
            }
        };
        let mut broad = BroadPhase::new(grid, params.cell_radius);

        let _ = tx.send(SimEvent::Log(format!(
            "Simulating {} particles, {}x{} cells of {:.1}px, {} motion.",
            particles.len(),
            broad.grid().cols(),
            broad.grid().rows(),
            broad.grid().cell_size(),
            self.integrator.name(),
        )));

        let mut contacts: Vec<Contact> = Vec::new();
        let mut heartbeat_clock = Instant::now();

        for frame in 1..=params.max_frames {
            self.integrator.step(params, &mut particles);

            for p in particles.iter_mut() {
                p.colliding = false;
            }

            // Insertion completes before any query begins.
            broad.rebuild(&particles);

            let mut candidate_pairs = 0usize;
            contacts.clear();
            broad.for_each_candidate(&particles, |pair| {
                candidate_pairs += 1;
                if let Some(contact) = self.narrow.examine(pair, &particles) {
                    contacts.push(contact);
                }
            });

            for contact in &contacts {
                apply_contact_response(&mut particles, contact, params.elasticity);
            }

            let stats = FrameStats {
                frame,
                particle_count: particles.len(),
                candidate_pairs,
                contacts: contacts.len(),
                occupied_cells: broad.grid().occupied_cells(),
                searched_cells: broad.grid().searched_cell_count(),
                cull_ratio: cull_ratio(particles.len(), candidate_pairs),
            };
            if tx.send(SimEvent::FrameUpdate(stats)).is_err() {
                return; // UI hung up; stop the worker.
            }

            if params.snapshot_every > 0 && frame % params.snapshot_every == 0 {
                let _ = tx.send(SimEvent::Snapshot(FrameSnapshot {
                    particles: particles.clone(),
                    searched: broad.grid().searched_cells().collect(),
                    width: params.width,
                    height: params.height,
                    cell_size: broad.grid().cell_size(),
                }));
            }

            if frame % HEARTBEAT_EVERY == 0 {
                let elapsed = heartbeat_clock.elapsed().as_secs_f64();
                if elapsed > 0.0 {
                    let _ = tx.send(SimEvent::WorkerHeartbeat(HEARTBEAT_EVERY as f64 / elapsed));
                }
                heartbeat_clock = Instant::now();
            }

            if params.frame_delay_ms > 0 {
                std::thread::sleep(Duration::from_millis(params.frame_delay_ms));
            }
        }

        let _ = tx.send(SimEvent::Finished);
    }
}

/// Fraction of all unordered pairs the broad phase never emitted.
fn cull_ratio(n: usize, candidates: usize) -> f64 {
    let total = n * n.saturating_sub(1) / 2;
    if total == 0 {
        0.0
    } else {
        1.0 - candidates as f64 / total as f64
    }
}

/// Positional separation plus a restitution impulse along the contact
/// normal. Lives with the driver, not the core: the broad phase ends at
/// candidate enumeration and response belongs to the motion model side.
fn apply_contact_response(particles: &mut [Particle], contact: &Contact, elasticity: f32) {
    let (a, b) = (contact.a as usize, contact.b as usize);
    let normal = contact.normal;

    let inv_a = 1.0 / particles[a].mass;
    let inv_b = 1.0 / particles[b].mass;
    let inv_sum = inv_a + inv_b;

    // Push the circles apart in proportion to inverse mass.
    let push = normal * (contact.depth / inv_sum);
    particles[a].position -= push * inv_a;
    particles[b].position += push * inv_b;

    // Reflect the approaching component of the relative velocity.
    let rel = particles[b].velocity - particles[a].velocity;
    let approach = rel.dot(&normal);
    if approach < 0.0 {
        let impulse = normal * (-(1.0 + elasticity) * approach / inv_sum);
        particles[a].velocity -= impulse * inv_a;
        particles[b].velocity += impulse * inv_b;
    }

    particles[a].colliding = true;
    particles[b].colliding = true;
    particles[a].heat = 1.0;
    particles[b].heat = 1.0;
}
