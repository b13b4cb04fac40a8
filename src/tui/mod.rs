//! Ratatui-based terminal UI.
//!
//! The TUI shows the four simulation charts in a 2×2 grid and lets you
//! reseed the sample, change the drop count, and change the true unit, with
//! the estimate recomputed on every change.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::{RunOutput, run_simulation};
use crate::cli::TuiArgs;
use crate::domain::{EstimatorConfig, SampleConfig};
use crate::error::{AppError, EXIT_INTERNAL};
use crate::plot::series::{
    histogram, indexed, pad_range, theory_levels, theory_line, value_range, verification_points,
};
use crate::report::accuracy_percent;

mod plotters_chart;

use plotters_chart::{ChartData, DISCOVERED_COLOR, DropChart, THEORY_COLOR};

/// Drop-count change per key press.
const DROP_STEP: usize = 5;
/// True-unit change per key press.
const UNIT_STEP: f64 = 0.1;

/// Start the TUI.
pub fn run(args: &TuiArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args.sample.to_config(), args.search.to_config(), args.bins);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_INTERNAL, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    sample: SampleConfig,
    estimator: EstimatorConfig,
    bins: usize,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(sample: SampleConfig, estimator: EstimatorConfig, bins: usize) -> Self {
        let mut app = Self {
            sample,
            estimator,
            bins,
            status: String::new(),
            run: None,
        };
        app.regenerate();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_INTERNAL, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply a key press; returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => {
                self.sample.seed = self.sample.seed.wrapping_add(1);
                self.regenerate();
            }
            KeyCode::Up => {
                self.sample.drop_count = self.sample.drop_count.saturating_add(DROP_STEP);
                self.regenerate();
            }
            KeyCode::Down => {
                self.sample.drop_count = self.sample.drop_count.saturating_sub(DROP_STEP).max(2);
                self.regenerate();
            }
            KeyCode::Right => {
                self.sample.true_unit = step_unit(self.sample.true_unit, UNIT_STEP);
                self.regenerate();
            }
            KeyCode::Left => {
                self.sample.true_unit = step_unit(self.sample.true_unit, -UNIT_STEP);
                self.regenerate();
            }
            _ => {}
        }
        false
    }

    /// Rerun the pipeline; failures are shown in the status line, not fatal.
    fn regenerate(&mut self) {
        match run_simulation(&self.sample, &self.estimator) {
            Ok(run) => {
                self.status = format!(
                    "seed {} | discovered {} (true {})",
                    self.sample.seed, run.estimate.unit, self.sample.true_unit
                );
                self.run = Some(run);
            }
            Err(err) => {
                // stderr is hidden behind the alternate screen; the status line shows it.
                log::debug!("simulation failed: {err}");
                self.status = format!("error: {err}");
                self.run = None;
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_charts(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("oildrop", Style::default().fg(Color::Cyan)),
            Span::raw(" - Millikan oil drop simulation"),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "drops: {} | base mass: {} | true unit: {} | electrons: {}..={} | search: [{}, {}] step {}",
                self.sample.drop_count,
                self.sample.base_mass,
                self.sample.true_unit,
                self.sample.electrons_min,
                self.sample.electrons_max,
                self.estimator.search_low,
                self.estimator.search_high,
                self.estimator.search_step,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No data (see status line).")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        };

        let data_color = plotters::style::RGBColor(120, 170, 255);
        let hist_title = self.histogram_title(run);
        let charts = [
            (top[0], "Raw oil drop masses", mass_chart(run), "drop", "mass"),
            (top[1], "Mass above minimum (red = theory)", difference_chart(run), "drop (sorted)", "mass"),
            (bottom[0], hist_title.as_str(), histogram_chart(run, self.bins), "step size", "count"),
            (bottom[1], "Mass vs electron count", verification_chart(run), "electrons", "mass"),
        ];

        for (rect, title, data, x_label, y_label) in &charts {
            let block = Block::default().title(*title).borders(Borders::ALL);
            let inner = block.inner(*rect);
            frame.render_widget(block, *rect);
            frame.render_widget(Clear, inner);
            frame.render_widget(
                DropChart {
                    data,
                    x_label: *x_label,
                    y_label: *y_label,
                    data_color,
                },
                inner,
            );
        }
    }

    fn histogram_title(&self, run: &RunOutput) -> String {
        format!(
            "Step sizes (red = true {}, cyan = discovered {}, accuracy {:.1}%)",
            self.sample.true_unit,
            run.estimate.unit,
            accuracy_percent(run.estimate.unit, self.sample.true_unit),
        )
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "r reseed  ↑/↓ drops ±5  ←/→ unit ±0.1  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Move the true unit by `delta`, keeping one decimal and a positive floor.
fn step_unit(unit: f64, delta: f64) -> f64 {
    (((unit + delta) * 10.0).round() / 10.0).max(UNIT_STEP)
}

fn mass_chart(run: &RunOutput) -> ChartData {
    let masses = run.sample.masses();
    let n = masses.len().max(2) as f64;
    let (y0, y1) = value_range(&masses).unwrap_or((0.0, 1.0));
    let (y0, y1) = pad_range(y0, y1, 0.05);

    ChartData {
        points: indexed(&masses),
        x_bounds: [-0.5, n - 0.5],
        y_bounds: [y0, y1],
        ..ChartData::default()
    }
}

fn difference_chart(run: &RunOutput) -> ChartData {
    let diffs = &run.analysis.differences;
    let unit = run.sample_config.true_unit;
    let n = diffs.len().max(2) as f64;
    let top = value_range(diffs).map(|(_, max)| max).unwrap_or(0.0).max(unit) * 1.05;

    ChartData {
        bars: diffs
            .iter()
            .enumerate()
            .map(|(i, &d)| (i as f64 - 0.4, i as f64 + 0.4, d))
            .collect(),
        levels: theory_levels(unit, top),
        x_bounds: [-0.5, n - 0.5],
        y_bounds: [0.0, top],
        ..ChartData::default()
    }
}

fn histogram_chart(run: &RunOutput, bins: usize) -> ChartData {
    let true_unit = run.sample_config.true_unit;
    let discovered = run.estimate.unit;
    let markers = vec![(true_unit, THEORY_COLOR), (discovered, DISCOVERED_COLOR)];

    let Some(hist) = histogram(&run.analysis.step_sizes, bins) else {
        let (x0, x1) = pad_range(true_unit.min(discovered), true_unit.max(discovered), 0.5);
        return ChartData {
            markers,
            x_bounds: [x0, x1],
            y_bounds: [0.0, 1.0],
            ..ChartData::default()
        };
    };

    let bars = (0..hist.counts.len())
        .filter(|&i| hist.counts[i] > 0)
        .map(|i| {
            let (l, r) = hist.bin_edges(i);
            (l, r, hist.counts[i] as f64)
        })
        .collect();
    let (x0, x1) = pad_range(
        hist.lo.min(true_unit).min(discovered),
        hist.hi.max(true_unit).max(discovered),
        0.05,
    );

    ChartData {
        bars,
        markers,
        x_bounds: [x0, x1],
        y_bounds: [0.0, hist.max_count().max(1) as f64 * 1.1],
        ..ChartData::default()
    }
}

fn verification_chart(run: &RunOutput) -> ChartData {
    let points = verification_points(run);
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let (e0, e1) = value_range(&xs).unwrap_or((0.0, 1.0));
    let line = theory_line(run.sample_config.base_mass, run.sample_config.true_unit, e0, e1);

    let ys: Vec<f64> = points.iter().map(|p| p.1).chain(line.iter().map(|p| p.1)).collect();
    let (y0, y1) = value_range(&ys).unwrap_or((0.0, 1.0));
    let (x0, x1) = pad_range(e0, e1, 0.05);
    let (y0, y1) = pad_range(y0, y1, 0.05);

    ChartData {
        points,
        line: line.to_vec(),
        x_bounds: [x0, x1],
        y_bounds: [y0, y1],
        ..ChartData::default()
    }
}
