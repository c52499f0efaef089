use crate::core::domain::Particle;
use crate::core::morton::ZOrder;
use crate::core::spatial::UniformGrid;

/// An unordered candidate pair from the broad phase, `a < b`, as indices
/// into the caller's particle slice. Candidates may or may not actually
/// touch; the narrow phase decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidatePair {
    pub a: u32,
    pub b: u32,
}

/// Per-frame broad phase over a [`UniformGrid`].
///
/// Usage pattern, once per simulation step: [`BroadPhase::rebuild`] with
/// every live particle, then [`BroadPhase::for_each_candidate`] to hand
/// pairs to the narrow phase. The grid is rebuilt from scratch each frame;
/// there is no incremental move tracking.
pub struct BroadPhase {
    grid: UniformGrid,
    cell_radius: i32,
}

impl BroadPhase {
    /// `cell_radius` is the query half-width in cells; 1 is the usual
    /// choice when the cell size is at least one particle diameter.
    /// Negative values are clamped to 0 (own-cell-only queries).
    pub fn new(grid: UniformGrid, cell_radius: i32) -> Self {
        if cell_radius < 0 {
            log::warn!("negative cell_radius {cell_radius} clamped to 0");
        }
        Self {
            grid,
            cell_radius: cell_radius.max(0),
        }
    }

    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    /// Clears and repopulates the grid from current particle positions.
    /// Must complete before any candidate enumeration for this frame.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.grid.clear();
        for (i, p) in particles.iter().enumerate() {
            self.grid.insert(i as u32, p.position.x, p.position.y);
        }
    }

    /// Enumerates candidate pairs: for each particle, every other particle
    /// within `cell_radius` cells. The grid reports the querying particle
    /// itself among its neighbors; the `a < b` filter here drops that self
    /// hit and reports each unordered pair exactly once.
    pub fn for_each_candidate<F: FnMut(CandidatePair)>(
        &mut self,
        particles: &[Particle],
        mut emit: F,
    ) {
        for (i, p) in particles.iter().enumerate() {
            let a = i as u32;
            self.grid
                .for_each_nearby(p.position.x, p.position.y, self.cell_radius, |b| {
                    if a < b {
                        emit(CandidatePair { a, b });
                    }
                });
        }
    }

    pub fn candidate_pairs(&mut self, particles: &[Particle]) -> Vec<CandidatePair> {
        let mut pairs = Vec::new();
        self.for_each_candidate(particles, |pair| pairs.push(pair));
        pairs
    }
}

/// Particle indices ordered by normalized Z-order code, so that spatial
/// neighbors end up adjacent in iteration order. Useful before any
/// cache-sensitive sweep over the particle set; independent of the grid.
pub fn z_sorted_indices(particles: &[Particle], width: f32, height: f32) -> Vec<u32> {
    let mut order: Vec<u32> = (0..particles.len() as u32).collect();
    order.sort_by_key(|&i| {
        let p = &particles[i as usize];
        ZOrder::normalized(p.position.x, p.position.y, width, height)
    });
    order
}
