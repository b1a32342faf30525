//! SVG rendering of chart views with plotters

use std::path::Path;

use anyhow::{ensure, Result};
use plotters::prelude::*;

use super::model::{BarView, HistogramView, LineView, ScatterView};

const CHART_SIZE: (u32, u32) = (800, 500);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 22);

/// Axis range over the finite `values` with a small margin.
///
/// Degenerate input gets a unit span. Fails when the range cannot be
/// represented as a finite span, which plotters cannot lay out.
fn padded_range(values: impl Iterator<Item = f64>) -> Result<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return Ok((0.0, 1.0));
    }
    if lo == hi {
        let pad = 0.5f64.max(lo.abs() * 0.05);
        return checked_span((lo - pad).max(f64::MIN), (hi + pad).min(f64::MAX));
    }

    // scale before subtracting so the margin itself cannot overflow
    let margin = hi * 0.05 - lo * 0.05;
    let padded = ((lo - margin).max(f64::MIN), (hi + margin).min(f64::MAX));
    if (padded.1 - padded.0).is_finite() {
        Ok(padded)
    } else {
        checked_span(lo, hi)
    }
}

fn checked_span(lo: f64, hi: f64) -> Result<(f64, f64)> {
    ensure!(
        (hi - lo).is_finite() && hi > lo,
        "value range [{:e}, {:e}] is too wide to plot",
        lo,
        hi
    );
    Ok((lo, hi))
}

/// Cumulative line: running sum against sample index.
pub fn render_line(view: &LineView, path: &Path) -> Result<()> {
    let max_index = view.points.last().map(|(i, _)| *i as f64).unwrap_or(0.0);
    let (y_lo, y_hi) = padded_range(view.points.iter().map(|(_, y)| *y))?;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Cumulative {}", view.column), CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..max_index.max(1.0), y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Sample Index")
        .y_desc(format!("Cumulative {}", view.column))
        .draw()?;

    chart.draw_series(LineSeries::new(
        view.points.iter().map(|(i, y)| (*i as f64, *y)),
        &BLUE,
    ))?;

    root.present()?;
    Ok(())
}

/// Grouped bar chart: one bar per category.
pub fn render_bar(view: &BarView, path: &Path) -> Result<()> {
    let names: Vec<&str> = view.bars.iter().map(|b| b.category.as_str()).collect();
    let (lo, hi) = padded_range(
        view.bars
            .iter()
            .filter_map(|b| b.value)
            .chain(std::iter::once(0.0)),
    )?;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Average {} per {}", view.column, view.label_column),
            CAPTION_FONT,
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0usize..names.len().max(1)).into_segmented(), lo..hi)?;

    let label_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            names.get(*i).map(|s| s.to_string()).unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(view.label_column.as_str())
        .y_desc(view.column.as_str())
        .x_label_formatter(&label_of)
        .draw()?;

    let fill = RGBColor(135, 206, 235).filled();
    chart.draw_series(view.bars.iter().enumerate().filter_map(|(i, bar)| {
        bar.value.filter(|v| v.is_finite()).map(|value| {
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), value)],
                fill,
            );
            rect.set_margin(0, 0, 12, 12);
            rect
        })
    }))?;

    root.present()?;
    Ok(())
}

/// Histogram: one rectangle per bin.
pub fn render_histogram(view: &HistogramView, path: &Path) -> Result<()> {
    let (x_lo, x_hi) = checked_span(
        view.edges.first().copied().unwrap_or(0.0),
        view.edges.last().copied().unwrap_or(1.0),
    )?;
    let y_hi = view.max_count() as u32 + 1;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Distribution of {}", view.column), CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_lo..x_hi, 0u32..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(view.column.as_str())
        .y_desc("Frequency")
        .draw()?;

    let fill = RGBColor(144, 238, 144).filled();
    chart.draw_series(view.counts.iter().enumerate().map(|(i, &count)| {
        Rectangle::new(
            [(view.edges[i], 0u32), (view.edges[i + 1], count as u32)],
            fill,
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Scatter plot coloured by category, with a legend per category.
pub fn render_scatter(view: &ScatterView, path: &Path) -> Result<()> {
    let (x_lo, x_hi) = padded_range(view.points.iter().map(|p| p.x))?;
    let (y_lo, y_hi) = padded_range(view.points.iter().map(|p| p.y))?;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} vs {}", view.x_column, view.y_column),
            CAPTION_FONT,
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(view.x_column.as_str())
        .y_desc(view.y_column.as_str())
        .draw()?;

    for (code, name) in view.legend.iter().enumerate() {
        let color = category_color(code);
        chart
            .draw_series(
                view.series(code)
                    .map(move |(x, y)| Circle::new((x, y), 4, color.filled())),
            )?
            .label(name.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Colour for a category code; the same code always maps to the same colour.
pub fn category_color(code: usize) -> RGBAColor {
    Palette99::pick(code).to_rgba()
}
