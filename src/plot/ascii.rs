//! ASCII plotting for terminal output.
//!
//! Charts are drawn on a fixed character grid, so the same run always prints
//! the same text and small charts can be compared against literal strings.
//!
//! Four charts are available, mirroring the classroom figure:
//! 1. raw drop masses (`o`)
//! 2. mass above the lightest drop as bars (`#`) with theoretical multiples (`-`)
//! 3. step-size histogram (`#`) with true (`T`) and discovered (`D`) markers
//! 4. mass vs electron count (`o`) with the theory line (`-`)

use crate::app::pipeline::RunOutput;
use crate::plot::series::{
    histogram, indexed, pad_range, theory_levels, theory_line, value_range, verification_points,
};

/// Render all four charts for a run, separated by blank lines.
pub fn render_run_charts(run: &RunOutput, width: usize, height: usize, bins: usize) -> String {
    let masses = run.sample.masses();
    let true_unit = run.sample_config.true_unit;

    [
        render_mass_scatter(&masses, width, height),
        render_difference_bars(&run.analysis.differences, true_unit, width, height),
        render_step_histogram(
            &run.analysis.step_sizes,
            bins,
            true_unit,
            run.estimate.unit,
            width,
            height,
        ),
        render_verification(
            &verification_points(run),
            run.sample_config.base_mass,
            true_unit,
            width,
            height,
        ),
    ]
    .join("\n")
}

/// Chart 1: masses in generation order.
pub fn render_mass_scatter(masses: &[f64], width: usize, height: usize) -> String {
    let points = indexed(masses);
    let x_max = (masses.len().max(2) - 1) as f64;
    let (y_min, y_max) = spread(value_range(masses).unwrap_or((0.0, 1.0)));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut canvas = Canvas::new(width, height, (0.0, x_max), (y_min, y_max));
    for &(x, y) in &points {
        canvas.put(x, y, 'o');
    }

    canvas.render(&format!(
        "Raw oil drop masses: drop=[0, {x_max:.0}] | mass=[{y_min:.2}, {y_max:.2}]"
    ))
}

/// Chart 2: mass above the lightest drop (sorted), with `i * unit` levels.
pub fn render_difference_bars(differences: &[f64], unit: f64, width: usize, height: usize) -> String {
    let x_max = (differences.len().max(2) - 1) as f64;
    let top = value_range(differences).map(|(_, max)| max).unwrap_or(0.0).max(unit);
    let y_max = top * 1.05;

    let mut canvas = Canvas::new(width, height, (0.0, x_max), (0.0, y_max));
    for (x, d) in indexed(differences) {
        canvas.bar(x, d, '#');
    }
    for level in theory_levels(unit, y_max) {
        canvas.hline(level, '-');
    }

    canvas.render(&format!(
        "Mass above minimum (#=data, -=theory every {unit}): drop=[0, {x_max:.0}] | y=[0.00, {y_max:.2}]"
    ))
}

/// Chart 3: histogram of step sizes with true/discovered markers.
pub fn render_step_histogram(
    steps: &[f64],
    bins: usize,
    true_unit: f64,
    discovered: f64,
    width: usize,
    height: usize,
) -> String {
    let Some(hist) = histogram(steps, bins) else {
        return "Step sizes: no non-zero steps to plot\n".to_string();
    };

    let x_lo = hist.lo.min(true_unit).min(discovered);
    let x_hi = hist.hi.max(true_unit).max(discovered);
    let (x_lo, x_hi) = pad_range(x_lo, x_hi, 0.02);
    let y_max = hist.max_count().max(1) as f64;

    let mut canvas = Canvas::new(width, height, (x_lo, x_hi), (0.0, y_max));
    for (i, &count) in hist.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let (left, right) = hist.bin_edges(i);
        canvas.bar_span(left, right, count as f64, '#');
    }
    canvas.vline(true_unit, 'T');
    canvas.vline(discovered, 'D');

    canvas.render(&format!(
        "Step sizes: n={} bins={} | T=true ({true_unit}) D=discovered ({discovered}) | x=[{x_lo:.2}, {x_hi:.2}] | max count={}",
        steps.len(),
        hist.counts.len(),
        hist.max_count(),
    ))
}

/// Chart 4: mass vs electron count with the theory line.
pub fn render_verification(points: &[(f64, f64)], base: f64, unit: f64, width: usize, height: usize) -> String {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let (e_min, e_max) = spread(value_range(&xs).unwrap_or((0.0, 1.0)));
    let line = theory_line(base, unit, e_min, e_max);

    let ys: Vec<f64> = points.iter().map(|p| p.1).chain(line.iter().map(|p| p.1)).collect();
    let (y_min, y_max) = spread(value_range(&ys).unwrap_or((0.0, 1.0)));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut canvas = Canvas::new(width, height, (e_min, e_max), (y_min, y_max));
    canvas.line(line[0], line[1], '-');
    for &(x, y) in points {
        canvas.put(x, y, 'o');
    }

    canvas.render(&format!(
        "Mass vs electron count (o=measured, -=theory): electrons=[{e_min:.0}, {e_max:.0}] | mass=[{y_min:.2}, {y_max:.2}]"
    ))
}

/// Make a degenerate `(v, v)` range drawable.
fn spread((min, max): (f64, f64)) -> (f64, f64) {
    if max - min < 1e-12 {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

/// A character grid with linear data-to-cell mapping (row 0 is the top).
struct Canvas {
    grid: Vec<Vec<char>>,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Canvas {
    fn new(width: usize, height: usize, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        let width = width.max(10);
        let height = height.max(5);
        Self {
            grid: vec![vec![' '; width]; height],
            x_range,
            y_range,
        }
    }

    fn width(&self) -> usize {
        self.grid[0].len()
    }

    fn height(&self) -> usize {
        self.grid.len()
    }

    fn col(&self, x: f64) -> usize {
        let (lo, hi) = self.x_range;
        let u = ((x - lo) / (hi - lo)).clamp(0.0, 1.0);
        (u * (self.width() as f64 - 1.0)).round() as usize
    }

    fn row(&self, y: f64) -> usize {
        let (lo, hi) = self.y_range;
        let u = ((y - lo) / (hi - lo)).clamp(0.0, 1.0);
        // y=top is max -> row 0
        (self.height() as f64 - 1.0 - (u * (self.height() as f64 - 1.0))).round() as usize
    }

    fn put(&mut self, x: f64, y: f64, ch: char) {
        let (c, r) = (self.col(x), self.row(y));
        self.grid[r][c] = ch;
    }

    /// Fill column `x` from the bottom row up to `y`.
    fn bar(&mut self, x: f64, y: f64, ch: char) {
        let c = self.col(x);
        self.fill_column(c, y, ch);
    }

    /// Fill every column between `left` and `right` up to `y`.
    fn bar_span(&mut self, left: f64, right: f64, y: f64, ch: char) {
        let (c0, c1) = (self.col(left), self.col(right));
        for c in c0..=c1.max(c0) {
            self.fill_column(c, y, ch);
        }
    }

    fn fill_column(&mut self, c: usize, y: f64, ch: char) {
        if y <= self.y_range.0 {
            return;
        }
        let top = self.row(y);
        for r in top..self.height() {
            self.grid[r][c] = ch;
        }
    }

    /// Horizontal rule at `y`, drawn only on empty cells.
    fn hline(&mut self, y: f64, ch: char) {
        let r = self.row(y);
        for cell in self.grid[r].iter_mut() {
            if *cell == ' ' {
                *cell = ch;
            }
        }
    }

    /// Vertical marker at `x`, drawn over everything.
    fn vline(&mut self, x: f64, ch: char) {
        let c = self.col(x);
        for row in self.grid.iter_mut() {
            row[c] = ch;
        }
    }

    /// Integer line drawing (Bresenham-ish), only on empty cells.
    fn line(&mut self, from: (f64, f64), to: (f64, f64), ch: char) {
        let mut x0 = self.col(from.0) as isize;
        let mut y0 = self.row(from.1) as isize;
        let x1 = self.col(to.0) as isize;
        let y1 = self.row(to.1) as isize;

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            let cell = &mut self.grid[y0 as usize][x0 as usize];
            if *cell == ' ' {
                *cell = ch;
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn render(self, header: &str) -> String {
        let mut out = String::new();
        out.push_str(header);
        out.push('\n');
        for row in self.grid {
            out.push_str(&row.into_iter().collect::<String>());
            out.push('\n');
        }
        out
    }
}
