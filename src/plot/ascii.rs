//! ASCII/Unicode line chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal or a CI log
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - daily values: `*`
//! - line between consecutive days: `-`
//! - values above the axis maximum are drawn on the top row

use crate::dashboard::SalesChart;
use crate::report::format_grouped;

/// Render a chart into a `width` × `height` character grid plus a header and
/// a first/last date footer.
pub fn render_ascii_chart(chart: &SalesChart, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let [y_min, y_max] = chart.y_bounds;
    let [x_min, x_max] = chart.x_bounds();

    let mut grid = vec![vec![' '; width]; height];

    let cells: Vec<(usize, usize)> = chart
        .clipped_points()
        .into_iter()
        .map(|(x, y)| (map_x(x, x_min, x_max, width), map_y(y, y_min, y_max, height)))
        .collect();

    // Line first so the day markers overlay it.
    for pair in cells.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }
    for &(x, y) in &cells {
        grid[y][x] = '*';
    }

    let mut out = String::new();
    let first = chart.labels.first().map(String::as_str).unwrap_or("-");
    let last = chart.labels.last().map(String::as_str).unwrap_or("-");
    out.push_str(&format!(
        "Plot: {first}..{last} ({} days) | y=[{}, {}] FCFA\n",
        chart.labels.len(),
        format_grouped(y_min),
        format_grouped(y_max),
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    if chart.labels.len() > 1 {
        let pad = width.saturating_sub(first.len() + last.len()).max(1);
        out.push_str(&format!("{first}{}{last}\n", " ".repeat(pad)));
    } else {
        out.push_str(&format!("{first}\n"));
    }

    out
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
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
