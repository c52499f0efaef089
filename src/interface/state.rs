use std::collections::VecDeque;
use std::time::Instant;

use crossbeam_channel::{Receiver, TryRecvError};

use crate::core::domain::Params;
use crate::sim::{FrameSnapshot, FrameStats, SimEvent};

// --- Constants ---
const HISTORY_CAPACITY: usize = 1000;
const LOG_CAPACITY: usize = 200;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Dashboard,
    GridView,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Idle,
    Starting,
    Running,
    Finished,
}

// --- Telemetry & Analytics ---

#[derive(Debug, Clone)]
pub struct Telemetry {
    // History queues for sparklines/charts: (frame, value)
    pub candidate_history: VecDeque<(f64, f64)>,
    pub contact_history: VecDeque<(f64, f64)>,
    pub cull_history: VecDeque<(f64, f64)>, // percentage

    // Global bounds for chart scaling
    pub max_candidates: f64,
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            candidate_history: VecDeque::with_capacity(HISTORY_CAPACITY),
            contact_history: VecDeque::with_capacity(HISTORY_CAPACITY),
            cull_history: VecDeque::with_capacity(HISTORY_CAPACITY),
            max_candidates: 1.0,
        }
    }

    pub fn ingest(&mut self, stats: &FrameStats) {
        // Enforce capacity
        if self.candidate_history.len() >= HISTORY_CAPACITY {
            self.candidate_history.pop_front();
            self.contact_history.pop_front();
            self.cull_history.pop_front();
        }

        if stats.candidate_pairs as f64 > self.max_candidates {
            self.max_candidates = stats.candidate_pairs as f64;
        }

        let x = stats.frame as f64;
        self.candidate_history.push_back((x, stats.candidate_pairs as f64));
        self.contact_history.push_back((x, stats.contacts as f64));
        self.cull_history.push_back((x, stats.cull_ratio * 100.0));
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

// --- The Master State ---

pub struct AppState {
    // System
    pub should_quit: bool,
    pub mode: AppMode,
    pub params: Params,

    // Worker
    pub rx: Option<Receiver<SimEvent>>,
    pub worker_status: WorkerStatus,

    // Simulation data
    pub frame: usize,
    pub start_time: Instant,
    pub latest: FrameStats,
    pub snapshot: Option<FrameSnapshot>,

    // Analytics
    pub telemetry: Telemetry,
    pub logs: VecDeque<String>,
    pub frames_per_second: f64,
}

impl AppState {
    pub fn new(params: Params) -> Self {
        Self {
            should_quit: false,
            mode: AppMode::Dashboard,
            params,
            rx: None,
            worker_status: WorkerStatus::Idle,
            frame: 0,
            start_time: Instant::now(),
            latest: FrameStats::default(),
            snapshot: None,
            telemetry: Telemetry::new(),
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            frames_per_second: 0.0,
        }
    }

    pub fn set_channel(&mut self, rx: Receiver<SimEvent>) {
        self.rx = Some(rx);
        self.worker_status = WorkerStatus::Starting;
        self.start_time = Instant::now();
    }

    pub fn tick(&mut self) {
        // Process events; bounded drain so a fast worker cannot starve the UI.
        if let Some(rx) = self.rx.clone() {
            for _ in 0..100 {
                match rx.try_recv() {
                    Ok(evt) => self.handle_event(evt),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.worker_status = WorkerStatus::Finished;
                        self.log("Worker disconnected.");
                        self.rx = None;
                        break;
                    }
                }
            }
        }
    }

    fn handle_event(&mut self, event: SimEvent) {
        match event {
            SimEvent::Log(msg) => self.log(msg),

            SimEvent::WorkerHeartbeat(fps) => {
                self.worker_status = WorkerStatus::Running;
                if fps > 0.0 {
                    self.frames_per_second = fps;
                }
            }

            SimEvent::FrameUpdate(stats) => {
                self.worker_status = WorkerStatus::Running;
                self.frame = stats.frame;
                self.telemetry.ingest(&stats);
                self.latest = stats;
            }

            SimEvent::Snapshot(snapshot) => {
                self.snapshot = Some(snapshot);
            }

            SimEvent::Finished => {
                self.worker_status = WorkerStatus::Finished;
                self.log("Simulation finished.");
            }
        }
    }

    /// Logs a message to the internal buffer.
    fn log(&mut self, msg: impl Into<String>) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }

    // --- Input Handling ---

    pub fn on_key(&mut self, key: char) {
        match key {
            'q' => self.should_quit = true,
            '1' => self.mode = AppMode::Dashboard,
            '2' => self.mode = AppMode::GridView,
            '?' => self.mode = AppMode::Help,
            _ => {}
        }
    }
}
