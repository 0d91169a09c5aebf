//! ASCII/Unicode charts for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Chart kinds:
//! - category bars: one `#` bar per category, scaled to the largest value
//! - proportion: same bars, scaled to the total, with the share in percent
//! - time series: `*` at each day, `-` between consecutive days

use crate::dashboard::{ChartKind, ChartSpec};
use crate::report::format_percent;

/// Render any chart at the given size.
pub fn render_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let mut out = format!("{}\n", spec.label);
    if spec.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    let body = match spec.kind {
        ChartKind::CategoryBar => render_bars(&spec.points, width, false),
        ChartKind::ProportionPie => render_bars(&spec.points, width, true),
        ChartKind::TimeSeriesLine => render_series(&spec.points, width, height),
    };
    out.push_str(&body);
    out
}

fn render_bars(points: &[(String, f64)], width: usize, as_share: bool) -> String {
    let label_w = points
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(20);
    let bar_w = width.saturating_sub(label_w + 12).max(4);

    let total: f64 = points.iter().map(|(_, v)| v).sum();
    let max = points.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let scale = if as_share { total } else { max };

    let mut out = String::new();
    for (label, v) in points {
        let frac = if scale > 0.0 { (v / scale).clamp(0.0, 1.0) } else { 0.0 };
        let n = (frac * bar_w as f64).round() as usize;
        let value = if as_share {
            format_percent(if total > 0.0 { v / total * 100.0 } else { 0.0 })
        } else {
            format!("{v:.0}")
        };
        let label: String = label.chars().take(label_w).collect();
        out.push_str(
            format!("{label:<label_w$} |{:<bar_w$} {value}\n", "#".repeat(n)).as_str(),
        );
    }
    out
}

fn render_series(points: &[(String, f64)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let n = points.len();

    let mut prev = None;
    for (i, (_, y)) in points.iter().enumerate() {
        let x = map_x(i, n, width);
        let yy = map_y(*y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, yy, '-');
        }
        prev = Some((x, yy));
    }
    for (i, (_, y)) in points.iter().enumerate() {
        grid[map_y(*y, y_min, y_max, height)][map_x(i, n, width)] = '*';
    }

    let first = points.first().map(|(l, _)| l.as_str()).unwrap_or("");
    let last = points.last().map(|(l, _)| l.as_str()).unwrap_or("");
    let mut out = format!("Plot: days=[{first} .. {last}] (n={n}) | y=[{y_min:.2}, {y_max:.2}]\n");
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn y_range(points: &[(String, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (_, y) in points {
        min_y = min_y.min(*y);
        max_y = max_y.max(*y);
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: center it.
        Some((min_y - 1.0, max_y + 1.0))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

/// Days are evenly spaced by index, not by calendar distance.
fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return width / 2;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: ChartKind, points: &[(&str, f64)]) -> ChartSpec {
        ChartSpec {
            kind,
            label: "t".to_string(),
            points: points.iter().map(|(l, v)| (l.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn bars_golden_snapshot() {
        let txt = render_chart(&spec(ChartKind::CategoryBar, &[("AB", 2.0), ("C", 1.0)]), 18, 5);
        let expected = concat!(
            "t\n",
            "AB |#### 2\n",
            "C  |##   1\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn proportion_shows_shares() {
        let txt = render_chart(&spec(ChartKind::ProportionPie, &[("A", 1.0), ("B", 3.0)]), 40, 5);
        assert!(txt.contains("25,0%"));
        assert!(txt.contains("75,0%"));
    }

    #[test]
    fn series_golden_snapshot() {
        let txt = render_chart(
            &spec(ChartKind::TimeSeriesLine, &[("01/01/2024", 100.0), ("02/01/2024", 110.0)]),
            10,
            5,
        );
        let expected = concat!(
            "t\n",
            "Plot: days=[01/01/2024 .. 02/01/2024] (n=2) | y=[99.50, 110.50]\n",
            "        -*\n",
            "      --\n",
            "    --\n",
            "  --\n",
            "*-\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_chart_says_so() {
        let txt = render_chart(&spec(ChartKind::TimeSeriesLine, &[]), 10, 5);
        assert_eq!(txt, "t\n  (no data)\n");
    }
}
