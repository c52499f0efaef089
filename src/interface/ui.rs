use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Rectangle},
        Block, BorderType, Borders, Gauge, List, ListItem, Paragraph, Sparkline, Tabs, Wrap,
    },
};

use crate::interface::state::{AppMode, AppState, WorkerStatus};
use crate::sim::FrameSnapshot;

// --- Color Palette ---
const COL_BG: Color = Color::Reset;
const COL_FG: Color = Color::White;
const COL_HIGHLIGHT: Color = Color::Yellow;
const COL_ACCENT: Color = Color::Cyan;
const COL_PARTICLE: Color = Color::LightBlue;
const COL_CONTACT: Color = Color::LightRed;
const COL_SEARCHED: Color = Color::DarkGray;
const COL_SUCCESS: Color = Color::Green;
const COL_FAIL: Color = Color::Red;
const COL_CULL: Color = Color::LightGreen;

pub fn draw(f: &mut Frame, app: &mut AppState) {
    if f.area().width < 40 || f.area().height < 10 {
        let p = Paragraph::new("Terminal too small.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(p, f.area());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    match app.mode {
        AppMode::Dashboard => draw_dashboard(f, app, chunks[1]),
        AppMode::GridView => draw_grid_view(f, app, chunks[1]),
        AppMode::Help => draw_help(f, chunks[1]),
    }

    draw_footer(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &AppState, area: Rect) {
    let titles = vec![" 1:Dash ", " 2:Grid ", " ?:Help "];
    let idx = match app.mode {
        AppMode::Dashboard => 0,
        AppMode::GridView => 1,
        AppMode::Help => 2,
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(idx)
        .highlight_style(Style::default().fg(COL_HIGHLIGHT).add_modifier(Modifier::BOLD));

    f.render_widget(tabs, area);
}

fn draw_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let status_str = match app.worker_status {
        WorkerStatus::Running => "RUNNING",
        WorkerStatus::Idle => "IDLE",
        WorkerStatus::Starting => "STARTING",
        WorkerStatus::Finished => "DONE",
    };

    let color = match app.worker_status {
        WorkerStatus::Running => COL_SUCCESS,
        _ => COL_FG,
    };

    let text = Line::from(vec![
        Span::styled(
            format!(" STATUS: {:<8}", status_str),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(format!("Frame: {:<7}", app.frame)),
        Span::raw(" | "),
        Span::raw(format!("Sim FPS: {:<6.1}", app.frames_per_second)),
        Span::raw(" | "),
        Span::styled(
            format!("Culled: {:.1}%", app.latest.cull_ratio * 100.0),
            Style::default().fg(COL_ACCENT),
        ),
        Span::raw(" | [Q]uit"),
    ]);

    let p = Paragraph::new(text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(p, area);
}

fn draw_dashboard(f: &mut Frame, app: &AppState, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let left_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(cols[0]);

    if let Some(snapshot) = &app.snapshot {
        draw_world(f, left_rows[0], snapshot, " Particles ", false);
    } else {
        f.render_widget(
            Block::default()
                .title(" Waiting for Data... ")
                .borders(Borders::ALL),
            left_rows[0],
        );
    }

    draw_charts(f, app, left_rows[1]);

    let right_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
        ])
        .split(cols[1]);

    draw_logs(f, app, right_rows[0]);
    draw_cull_gauge(f, app, right_rows[1]);
    draw_stats(f, app, right_rows[2]);
}

/// Full-area canvas with the searched-cell overlay, the view the
/// broad phase exists to explain.
fn draw_grid_view(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(snapshot) = &app.snapshot {
        draw_world(f, area, snapshot, " Grid Coverage ", true);
    } else {
        f.render_widget(
            Block::default()
                .title(" Waiting for Data... ")
                .borders(Borders::ALL),
            area,
        );
    }
}

fn draw_world(f: &mut Frame, area: Rect, snapshot: &FrameSnapshot, title: &str, show_cells: bool) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width < 1 || inner.height < 1 {
        return;
    }

    let width = f64::from(snapshot.width);
    let height = f64::from(snapshot.height);
    let cell = f64::from(snapshot.cell_size);

    let canvas = Canvas::default()
        .background_color(COL_BG)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            if show_cells {
                for key in &snapshot.searched {
                    ctx.draw(&Rectangle {
                        x: f64::from(key.col()) * cell,
                        y: f64::from(key.row()) * cell,
                        width: cell,
                        height: cell,
                        color: COL_SEARCHED,
                    });
                }
            }

            for p in &snapshot.particles {
                let color = if p.colliding {
                    COL_CONTACT
                } else if p.heat > 0.5 {
                    COL_HIGHLIGHT
                } else {
                    COL_PARTICLE
                };
                ctx.draw(&Circle {
                    x: f64::from(p.position.x),
                    // Canvas y grows upward; simulation y grows downward.
                    y: height - f64::from(p.position.y),
                    radius: f64::from(p.radius),
                    color,
                });
            }
        });

    f.render_widget(canvas, inner);
}

fn draw_charts(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().title(" Broad Phase ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 2 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    if !app.telemetry.candidate_history.is_empty() {
        let max = app.telemetry.max_candidates.max(1.0);
        let width = inner.width as usize;
        let data: Vec<u64> = app
            .telemetry
            .candidate_history
            .iter()
            .rev()
            .take(width)
            .map(|(_, c)| ((c / max) * 10.0) as u64)
            .collect();
        let data_rev: Vec<u64> = data.into_iter().rev().collect();

        let spark = Sparkline::default()
            .block(Block::default().title("Candidate Pairs").borders(Borders::NONE))
            .style(Style::default().fg(COL_ACCENT))
            .data(&data_rev);
        f.render_widget(spark, chunks[0]);
    }

    if !app.telemetry.contact_history.is_empty() {
        let max = app
            .telemetry
            .contact_history
            .iter()
            .map(|&(_, c)| c)
            .fold(1.0, f64::max);
        let width = inner.width as usize;
        let data: Vec<u64> = app
            .telemetry
            .contact_history
            .iter()
            .rev()
            .take(width)
            .map(|(_, c)| ((c / max) * 10.0) as u64)
            .collect();
        let data_rev: Vec<u64> = data.into_iter().rev().collect();

        let spark = Sparkline::default()
            .block(Block::default().title("Contacts").borders(Borders::NONE))
            .style(Style::default().fg(COL_CONTACT))
            .data(&data_rev);
        f.render_widget(spark, chunks[1]);
    }
}

fn draw_logs(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().title(" System Log ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let items: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .map(|line| {
            let style = if line.to_lowercase().contains("error") || line.contains("failed") {
                Style::default().fg(COL_FAIL)
            } else {
                Style::default().fg(Color::Gray)
            };

            ListItem::new(Line::from(vec![
                Span::styled(">", Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::raw(line),
            ]))
            .style(style)
        })
        .collect();

    let list = List::new(items);
    f.render_widget(list, inner);
}

fn draw_cull_gauge(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().title(" Efficiency ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 1 {
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1)])
        .split(inner);

    let ratio = app.latest.cull_ratio;
    let label = format!("Pairs culled: {:.1}%", ratio * 100.0);
    // Below ~50% the grid is doing little better than brute force.
    let color = if ratio > 0.5 { COL_CULL } else { COL_FAIL };

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::DarkGray))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);

    f.render_widget(gauge, layout[0]);
}

fn draw_stats(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().title(" Statistics ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let s = &app.latest;
    let lines = vec![
        Line::from(format!("Particles:      {}", s.particle_count)),
        Line::from(format!("Candidates:     {}", s.candidate_pairs)),
        Line::from(format!("Contacts:       {}", s.contacts)),
        Line::from(format!("Occupied cells: {}", s.occupied_cells)),
        Line::from(format!("Searched cells: {}", s.searched_cells)),
        Line::from(format!(
            "Cell size:      {:.1}px, radius {}",
            app.params.effective_cell_size(),
            app.params.cell_radius
        )),
    ];

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(p, inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = Block::default().title(" Help ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::from("1  Dashboard: world view, charts, logs"),
        Line::from("2  Grid view: particles plus searched-cell overlay"),
        Line::from("?  This help"),
        Line::from("q  Quit"),
        Line::from(""),
        Line::from("The grid is rebuilt every frame; the overlay shows which"),
        Line::from("cells the neighbor queries actually touched."),
    ];

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(p, inner);
}
