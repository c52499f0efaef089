use std::error::Error;
use std::fs;
use std::io;
use std::panic;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::unbounded;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use collide_o_scope::core::domain::Params;
use collide_o_scope::engine::narrow::CircleOverlap;
use collide_o_scope::interface::state::AppState;
use collide_o_scope::interface::ui;
use collide_o_scope::sim::driver::{BallisticIntegrator, Driver};

// --- CLI Definitions ---

#[derive(Parser, Debug)]
#[command(author, version, about = "collide-o-scope: broad-phase collision visualizer", long_about = None)]
struct Args {
    /// Number of particles
    #[arg(short, long, default_value_t = 300)]
    particles: usize,

    /// World width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// World height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Grid cell size in pixels (0 = derive from largest particle diameter)
    #[arg(long, default_value_t = 0.0)]
    cell_size: f32,

    /// Neighbor query half-width in cells
    #[arg(long, default_value_t = 1)]
    cell_radius: i32,

    /// RNG seed for reproducible runs
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// JSON config file; overrides all other flags when given
    #[arg(long)]
    config: Option<String>,
}

// --- Terminal Guard (RAII) ---

struct TuiContext {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TuiContext {
    fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal backend")?;
        Ok(Self { terminal })
    }
}

impl Drop for TuiContext {
    fn drop(&mut self) {
        // Best-effort restoration of terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

// --- Initialization Helpers ---

fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Forcefully restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));
}

fn build_params(args: &Args) -> Result<Params> {
    if let Some(path) = &args.config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        let params: Params = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file '{path}'"))?;
        return Ok(params);
    }

    Ok(Params {
        seed: args.seed,
        width: args.width,
        height: args.height,
        particle_count: args.particles,
        cell_size: args.cell_size,
        cell_radius: args.cell_radius,
        ..Default::default()
    })
}

// --- Main ---

fn main() -> Result<(), Box<dyn Error>> {
    // 1. Safety & Parsing
    setup_panic_hook();
    let args = Args::parse();
    let params = build_params(&args)?;

    // 2. Setup TUI & App State
    let mut tui = TuiContext::new().context("Failed to initialize TUI")?;
    let mut app = AppState::new(params.clone());

    // 3. Spawn Simulation Thread
    let (tx, rx) = unbounded();
    app.set_channel(rx);

    thread::Builder::new()
        .name("Sim-Worker".to_string())
        .spawn(move || {
            let driver = Driver::new(
                Arc::new(BallisticIntegrator),
                Arc::new(CircleOverlap),
                params,
            );
            driver.solve(tx);
        })?;

    // 4. Event Loop
    let tick_rate = Duration::from_millis(50); // 20 FPS
    let mut last_tick = Instant::now();

    while !app.should_quit {
        // Draw
        tui.terminal.draw(|f| ui::draw(f, &mut app))?;

        // Handle Input
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char(c) => app.on_key(c),
                        KeyCode::Esc => app.should_quit = true,
                        _ => {}
                    }
                }
            }
        }

        // Logic Tick
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
