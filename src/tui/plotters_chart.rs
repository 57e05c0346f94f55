//! Plotters-powered sales trend chart widget for Ratatui.
//!
//! Plotters gives us axis + tick rendering for free; the output is drawn into
//! the Ratatui buffer through `plotters-ratatui-backend`.

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{ForecastPoint, TrendPoint};

/// A render-only chart description.
///
/// All series and bounds are computed by [`SalesPlottersChart::new`], so
/// `render()` only draws.
pub struct SalesPlottersChart {
    /// Observed trend as (day number, sales).
    trend: Vec<(f64, f64)>,
    /// Forecast line, starting at the last observed point.
    forecast: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl SalesPlottersChart {
    pub fn new(trend: &[TrendPoint], forecast: Option<&[ForecastPoint]>) -> Self {
        let trend: Vec<(f64, f64)> = trend.iter().map(|p| (day_number(p.date), p.value)).collect();

        let mut projected: Vec<(f64, f64)> = Vec::new();
        if let Some(points) = forecast.filter(|p| !p.is_empty()) {
            projected.extend(trend.last().copied());
            projected.extend(points.iter().map(|p| (day_number(p.date), p.predicted)));
        }

        let all = || trend.iter().chain(projected.iter());
        let x_bounds = bounds(all().map(|&(x, _)| x), 3.5, 0.0);
        let y_bounds = bounds(all().map(|&(_, y)| y), 0.0, 0.08);

        Self {
            trend,
            forecast: projected,
            x_bounds,
            y_bounds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trend.is_empty() && self.forecast.is_empty()
    }
}

impl Widget for SalesPlottersChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }
        if self.is_empty() {
            buf.set_string(
                area.x,
                area.y,
                "No rows match the current filters.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 10)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc("weekly sales")
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| date_label(*v))
                .y_label_formatter(&|v| compact_money(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let trend_color = RGBColor(0, 255, 255); // cyan
            let forecast_color = RGBColor(255, 165, 0); // orange

            chart.draw_series(LineSeries::new(self.trend.iter().copied(), &trend_color))?;
            chart.draw_series(LineSeries::new(self.forecast.iter().copied(), &forecast_color))?;

            // `Circle` radii are mis-scaled by the backend; a Pixel is a clean dot.
            chart.draw_series(
                self.forecast
                    .iter()
                    .skip(1)
                    .map(|&(x, y)| Pixel::new((x, y), WHITE)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn date_label(day: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(day.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// `1.2M` / `850k` style labels for ticks and bars.
pub(super) fn compact_money(v: f64) -> String {
    let a = v.abs();
    if a >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.0}k", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

/// Min/max with absolute (`pad_abs`) and relative (`pad_frac`) padding.
/// Degenerate ranges are widened so the chart can still be built.
fn bounds(values: impl Iterator<Item = f64>, pad_abs: f64, pad_frac: f64) -> [f64; 2] {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    let span = hi - lo;
    let pad = if span > 0.0 {
        pad_abs + span * pad_frac
    } else {
        pad_abs.max(lo.abs().max(1.0) * 0.05)
    };
    [lo - pad, hi + pad]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn forecast_line_starts_at_last_observation() {
        let trend = [
            TrendPoint { date: ymd(2010, 2, 5), value: 10.0 },
            TrendPoint { date: ymd(2010, 2, 12), value: 20.0 },
        ];
        let fc = [ForecastPoint { date: ymd(2010, 2, 14), predicted: 30.0 }];
        let chart = SalesPlottersChart::new(&trend, Some(&fc[..]));
        assert_eq!(chart.forecast.len(), 2);
        assert_eq!(chart.forecast[0], chart.trend[1]);
        assert!(chart.x_bounds[0] < day_number(ymd(2010, 2, 5)));
        assert!(chart.x_bounds[1] > day_number(ymd(2010, 2, 14)));
        assert!(chart.y_bounds[0] < 10.0 && chart.y_bounds[1] > 30.0);
    }

    #[test]
    fn single_point_still_has_a_usable_range() {
        let trend = [TrendPoint { date: ymd(2010, 2, 5), value: 0.0 }];
        let chart = SalesPlottersChart::new(&trend, None);
        assert!(chart.x_bounds[1] > chart.x_bounds[0]);
        assert!(chart.y_bounds[1] > chart.y_bounds[0]);
    }

    #[test]
    fn labels() {
        assert_eq!(date_label(day_number(ymd(2012, 10, 26))), "2012-10-26");
        assert_eq!(compact_money(1_340_000.0), "1.3M");
        assert_eq!(compact_money(-850_000.0), "-850k");
        assert_eq!(compact_money(42.0), "42");
    }

    #[test]
    fn tiny_area_shows_a_hint() {
        let trend = [TrendPoint { date: ymd(2010, 2, 5), value: 1.0 }];
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        SalesPlottersChart::new(&trend, None).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "C");
    }
}
