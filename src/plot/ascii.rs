//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed trend: `o` points joined by `-`
//! - forecast: `*` points joined by `.`
//!
//! The x axis is calendar days, so gaps between weeks are visible.

use chrono::NaiveDate;

use crate::domain::{ForecastPoint, TrendPoint};

/// Render the trend series and optional forecast on one grid.
pub fn render_ascii_plot(
    trend: &[TrendPoint],
    forecast: Option<&[ForecastPoint]>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let observed: Vec<(f64, f64)> = trend.iter().map(|p| (day_number(p.date), p.value)).collect();
    let projected: Vec<(f64, f64)> = forecast
        .unwrap_or(&[])
        .iter()
        .map(|p| (day_number(p.date), p.predicted))
        .collect();

    let all = || observed.iter().chain(projected.iter());
    let Some((x_min, x_max)) = range(all().map(|&(x, _)| x)) else {
        return "Plot: (no data)\n".to_string();
    };
    let (y_min, y_max) = range(all().map(|&(_, y)| y)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let (x_min, x_max) = if x_max > x_min { (x_min, x_max) } else { (x_min - 1.0, x_max + 1.0) };

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so markers overlay.
    draw_polyline(&mut grid, &observed, '-', (x_min, x_max), (y_min, y_max));
    let bridge: Vec<(f64, f64)> = observed
        .last()
        .filter(|_| !projected.is_empty())
        .into_iter()
        .chain(projected.iter())
        .copied()
        .collect();
    draw_polyline(&mut grid, &bridge, '.', (x_min, x_max), (y_min, y_max));
    for &(x, y) in &observed {
        grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = 'o';
    }
    for &(x, y) in &projected {
        grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = '*';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: date=[{}, {}] | sales=[{y_min:.2}, {y_max:.2}]\n",
        date_label(x_min),
        date_label(x_max),
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(chrono::Datelike::num_days_from_ce(&date))
}

fn date_label(day: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(day.round() as i32)
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * frac } else { min.abs().max(1.0) * frac };
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], pts: &[(f64, f64)], ch: char, xb: (f64, f64), yb: (f64, f64)) {
    let height = grid.len();
    let width = grid[0].len();
    for w in pts.windows(2) {
        let (x0, y0) = (map_x(w[0].0, xb.0, xb.1, width), map_y(w[0].1, yb.0, yb.1, height));
        let (x1, y1) = (map_x(w[1].0, xb.0, xb.1, width), map_y(w[1].1, yb.0, yb.1, height));
        draw_line(grid, x0, y0, x1, y1, ch);
    }
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

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn flat_trend_golden() {
        let trend = vec![
            TrendPoint { date: ymd(2010, 1, 1), value: 100.0 },
            TrendPoint { date: ymd(2010, 1, 10), value: 100.0 },
        ];
        let txt = render_ascii_plot(&trend, None, 10, 5);
        let expected = concat!(
            "Plot: date=[2010-01-01, 2010-01-10] | sales=[95.00, 105.00]\n",
            "\n",
            "\n",
            "o--------o\n",
            "\n",
            "\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn trend_with_forecast_golden() {
        let trend = vec![
            TrendPoint { date: ymd(2010, 1, 1), value: 0.0 },
            TrendPoint { date: ymd(2010, 1, 4), value: 10.0 },
            TrendPoint { date: ymd(2010, 1, 7), value: 20.0 },
        ];
        let forecast = vec![ForecastPoint { date: ymd(2010, 1, 10), predicted: 30.0 }];
        let txt = render_ascii_plot(&trend, Some(forecast.as_slice()), 10, 5);
        let expected = concat!(
            "Plot: date=[2010-01-01, 2010-01-10] | sales=[-1.50, 31.50]\n",
            "        .*\n",
            "      o.\n",
            "    --\n",
            "  -o\n",
            "o-\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_input_renders_placeholder() {
        assert_eq!(render_ascii_plot(&[], None, 40, 10), "Plot: (no data)\n");
    }
}
