//! Rendered chart report of the current dashboard, written as SVG.

use super::metrics::comparison_series;
use super::models::{DashboardState, Metric};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;

pub const REPORT_SIZE: (u32, u32) = (1200, 1500);

const PERIOD_A_COLOR: RGBColor = RGBColor(148, 163, 184);
const PERIOD_B_COLOR: RGBColor = RGBColor(37, 99, 235);

pub fn render_svg(state: &DashboardState) -> Result<String, Box<dyn Error>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, REPORT_SIZE).into_drawing_area();
        draw_report(&root, state)?;
        root.present()?;
    }
    Ok(svg)
}

fn draw_report(
    root: &DrawingArea<SVGBackend, Shift>,
    state: &DashboardState,
) -> Result<(), Box<dyn Error>> {
    root.fill(&WHITE)?;
    let body = root.titled(&state.dashboard_title, ("sans-serif", 36))?;

    let panels = body.split_evenly((Metric::ALL.len(), 1));
    for (panel, metric) in panels.iter().zip(Metric::ALL) {
        draw_metric_chart(panel, state, metric)?;
    }
    Ok(())
}

// Each project takes two segments: baseline then comparison.
fn draw_metric_chart(
    area: &DrawingArea<SVGBackend, Shift>,
    state: &DashboardState,
    metric: Metric,
) -> Result<(), Box<dyn Error>> {
    let series = comparison_series(state, metric);
    let names: Vec<&str> = series.iter().map(|(name, _, _)| name.as_str()).collect();
    let segments = (series.len() * 2).max(1);

    let peak = series
        .iter()
        .map(|(_, a, b)| a.max(*b))
        .fold(0.0_f64, f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("{}: {} vs {}", metric.label(), state.period_a_header, state.period_b_header),
            ("sans-serif", 22).into_font(),
        )
        .margin(16)
        .x_label_area_size(36)
        .y_label_area_size(90)
        .build_cartesian_2d((0..segments).into_segmented(), 0.0..y_max)?;

    let label_for = |value: &SegmentValue<usize>| match value {
        SegmentValue::CenterOf(i) if i % 2 == 0 => names.get(i / 2).map(|n| n.to_string()).unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(segments)
        .x_label_formatter(&label_for)
        .y_desc(metric.label())
        .draw()?;

    let bars = |offset: usize, color: RGBColor, pick: fn(&(String, f64, f64)) -> f64| {
        let series = &series;
        (0..series.len()).map(move |i| {
            let x = i * 2 + offset;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(x), 0.0),
                    (SegmentValue::Exact(x + 1), pick(&series[i])),
                ],
                color.filled(),
            );
            bar.set_margin(0, 0, 4, 4);
            bar
        })
    };

    chart
        .draw_series(bars(0, PERIOD_A_COLOR, |s| s.1))?
        .label(state.period_a_header.as_str())
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], PERIOD_A_COLOR.filled()));

    chart
        .draw_series(bars(1, PERIOD_B_COLOR, |s| s.2))?
        .label(state.period_b_header.as_str())
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], PERIOD_B_COLOR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}
