use crate::core::domain::Particle;
use crate::core::spatial::CellKey;

pub mod driver;

/// Per-frame statistics from the simulation worker.
/// Used for telemetry and UI visualization.
#[derive(Debug, Clone)]
pub struct FrameStats {
    pub frame: usize,
    pub particle_count: usize,
    /// Pairs the broad phase handed to the narrow phase.
    pub candidate_pairs: usize,
    /// Candidates the narrow phase confirmed as touching.
    pub contacts: usize,
    pub occupied_cells: usize,
    pub searched_cells: usize,

    /// Fraction of all N(N-1)/2 pairs the broad phase culled before the
    /// narrow phase ever saw them. The number the whole structure exists for.
    pub cull_ratio: f64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame: 0,
            particle_count: 0,
            candidate_pairs: 0,
            contacts: 0,
            occupied_cells: 0,
            searched_cells: 0,
            cull_ratio: 0.0,
        }
    }
}

/// A renderable copy of the world, sent to the UI every few frames.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub particles: Vec<Particle>,
    /// Cells visited by this frame's neighbor queries (diagnostic overlay).
    pub searched: Vec<CellKey>,
    pub width: f32,
    pub height: f32,
    pub cell_size: f32,
}

/// Events emitted by the simulation worker to the main thread.
#[derive(Debug, Clone)]
pub enum SimEvent {
    /// Diagnostic log message.
    Log(String),

    /// High-level heartbeat (frames per second from the worker's clock).
    WorkerHeartbeat(f64),

    /// A completed frame with full statistics.
    FrameUpdate(FrameStats),

    /// A world snapshot for the canvas views.
    Snapshot(FrameSnapshot),

    /// Worker has finished its run.
    Finished,
}
