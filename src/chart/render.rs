//! PNG rendering of a [`ChartRequest`] with `plotters`.
//!
//! The x axis is positional (`0..n`), labelled from the request's ticks. Log
//! and symlog charts are drawn on a linear axis over `Scale::forward` values,
//! with tick labels mapped back through `Scale::inverse`.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::chart::compose::{ChartRequest, Dash, LineSpec, Marker, Scale};
use crate::chart::theme::Theme;
use crate::config::ChartConfig;

const TITLE_FONT_SIZE: u32 = 30;
const AXIS_LABEL_FONT_SIZE: u32 = 22;
const TICK_LABEL_FONT_SIZE: u32 = 17;
const LEGEND_FONT_SIZE: u32 = 17;
const REFERENCE_FONT_SIZE: u32 = 15;

const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: i32 = 5;
const SWATCH_LENGTH: i32 = 36;
const LEGEND_PADDING: i32 = 10;
const Y_LABELS: usize = 10;

/// Draw `request` to a PNG at `path`, creating parent directories.
pub fn render_png(request: &ChartRequest, config: &ChartConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let theme = &config.theme;
    let scale = request.scale;
    let n = request.ticks.len().max(1);
    let (y_min, y_max) = y_range(request);

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&theme.background.color())?;

    let text = |size: u32| ("sans-serif", size).into_font().color(&theme.text.color());

    let mut chart = ChartBuilder::on(&root)
        .caption(
            &request.title,
            ("sans-serif", TITLE_FONT_SIZE)
                .into_font()
                .color(&theme.title.color()),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), y_min..y_max)?;

    chart.plotting_area().fill(&theme.axes.color())?;

    let ticks = &request.ticks;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| {
            let idx = x.round() as usize;
            if idx < ticks.len() && (x - idx as f64).abs() < 0.3 {
                ticks[idx].clone()
            } else {
                String::new()
            }
        })
        .y_labels(Y_LABELS)
        .y_label_formatter(&|y| format_axis_value(scale.inverse(*y)))
        .x_desc(request.x_label.as_str())
        .y_desc(request.y_label.as_str())
        .label_style(text(TICK_LABEL_FONT_SIZE))
        .axis_desc_style(text(AXIS_LABEL_FONT_SIZE))
        .axis_style(theme.edge.color())
        .bold_line_style(theme.grid.color().mix(0.6))
        .light_line_style(theme.axes.color())
        .draw()?;

    for reference in &request.references {
        let y = scale.forward(reference.value);
        if !y.is_finite() {
            continue;
        }
        let color = theme.reference.color();
        chart.draw_series(DashedLineSeries::new(
            [(-0.5, y), (n as f64 - 0.5, y)],
            8,
            6,
            color.stroke_width(1),
        ))?;
        if let Some(label) = &reference.label {
            chart.draw_series(std::iter::once(Text::new(
                label.clone(),
                (n as f64 - 0.55, y),
                ("sans-serif", REFERENCE_FONT_SIZE)
                    .into_font()
                    .color(&theme.reference_text.color())
                    .pos(Pos::new(HPos::Right, VPos::Bottom)),
            )))?;
        }
    }

    for line in &request.lines {
        draw_line(&mut chart, line, scale)?;
    }

    if !request.lines.is_empty() {
        let (x_pixels, y_pixels) = chart.plotting_area().get_pixel_range();
        let origin = (x_pixels.start + LEGEND_PADDING, y_pixels.start + LEGEND_PADDING);
        draw_legend(&root, origin, &request.lines, theme)?;
    }

    root.present()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Rendered {}", path.display());
    Ok(())
}

type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_line(chart: &mut Chart<'_, '_>, line: &LineSpec, scale: Scale) -> Result<()> {
    let color = line.color.color();
    let style = color.stroke_width(LINE_WIDTH);
    let segments = segments(&line.values, scale);

    for segment in &segments {
        let points = segment.iter().copied();
        match dash_pattern(line.dash) {
            None => chart.draw_series(LineSeries::new(points, style))?,
            Some((on, off)) => chart.draw_series(DashedLineSeries::new(points, on, off, style))?,
        };
    }

    let points = segments.into_iter().flatten();
    let fill = color.filled();
    let s = MARKER_SIZE;
    match line.marker {
        Marker::Circle => {
            chart.draw_series(points.map(|p| EmptyElement::at(p) + Circle::new((0, 0), s, fill)))?;
        }
        Marker::Square => {
            chart.draw_series(
                points.map(|p| EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], fill)),
            )?;
        }
        Marker::Triangle => {
            chart.draw_series(
                points.map(|p| EmptyElement::at(p) + TriangleMarker::new((0, 0), s + 1, fill)),
            )?;
        }
        Marker::Diamond => {
            chart.draw_series(points.map(|p| {
                EmptyElement::at(p)
                    + Polygon::new(vec![(0, -s - 1), (s + 1, 0), (0, s + 1), (-s - 1, 0)], fill)
            }))?;
        }
        Marker::Cross => {
            chart.draw_series(
                points.map(|p| EmptyElement::at(p) + Cross::new((0, 0), s, color.stroke_width(2))),
            )?;
        }
    }
    Ok(())
}

/// Dash and gap lengths in pixels; `None` is a solid line.
fn dash_pattern(dash: Dash) -> Option<(u32, u32)> {
    match dash {
        Dash::Solid => None,
        Dash::Dashed => Some((10, 6)),
        Dash::Dotted => Some((2, 5)),
        Dash::DashDot => Some((12, 4)),
    }
}

/// Drawn `[start, end)` pieces of a legend swatch `length` pixels long.
fn swatch_runs(dash: Dash, length: i32) -> Vec<(i32, i32)> {
    let Some((on, off)) = dash_pattern(dash) else {
        return vec![(0, length)];
    };
    let (on, period) = (on as i32, (on + off) as usize);
    (0..length)
        .step_by(period)
        .map(|start| (start, (start + on).min(length)))
        .collect()
}

/// Legend box in the upper left of the plot, one row per line, each swatch
/// drawn with the line's dash pattern and marker.
fn draw_legend(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    (x0, y0): (i32, i32),
    lines: &[LineSpec],
    theme: &Theme,
) -> Result<()> {
    let font = ("sans-serif", LEGEND_FONT_SIZE)
        .into_font()
        .color(&theme.text.color());
    let row_height = LEGEND_FONT_SIZE as i32 + 8;

    let mut label_width = 0;
    for line in lines {
        let (width, _) = root.estimate_text_size(&line.label, &font)?;
        label_width = label_width.max(width as i32);
    }
    let width = LEGEND_PADDING * 3 + SWATCH_LENGTH + label_width;
    let height = LEGEND_PADDING * 2 + row_height * lines.len() as i32;
    let corners = [(x0, y0), (x0 + width, y0 + height)];
    root.draw(&Rectangle::new(corners, theme.axes.color().mix(0.9).filled()))?;
    root.draw(&Rectangle::new(corners, theme.legend_edge.color()))?;

    for (row, line) in lines.iter().enumerate() {
        let color = line.color.color();
        let x = x0 + LEGEND_PADDING;
        let y = y0 + LEGEND_PADDING + row_height * row as i32 + row_height / 2;
        for (start, end) in swatch_runs(line.dash, SWATCH_LENGTH) {
            root.draw(&PathElement::new(
                vec![(x + start, y), (x + end, y)],
                color.stroke_width(LINE_WIDTH),
            ))?;
        }
        draw_legend_marker(root, (x + SWATCH_LENGTH / 2, y), line.marker, color)?;
        root.draw(&Text::new(
            line.label.clone(),
            (x + SWATCH_LENGTH + LEGEND_PADDING, y),
            font.clone().pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }
    Ok(())
}

fn draw_legend_marker(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    at: (i32, i32),
    marker: Marker,
    color: RGBColor,
) -> Result<()> {
    let fill = color.filled();
    let s = MARKER_SIZE;
    let anchor = EmptyElement::at(at);
    match marker {
        Marker::Circle => root.draw(&(anchor + Circle::new((0, 0), s, fill)))?,
        Marker::Square => root.draw(&(anchor + Rectangle::new([(-s, -s), (s, s)], fill)))?,
        Marker::Triangle => root.draw(&(anchor + TriangleMarker::new((0, 0), s + 1, fill)))?,
        Marker::Diamond => {
            let corners = vec![(0, -s - 1), (s + 1, 0), (0, s + 1), (-s - 1, 0)];
            root.draw(&(anchor + Polygon::new(corners, fill)))?
        }
        Marker::Cross => root.draw(&(anchor + Cross::new((0, 0), s, color.stroke_width(2))))?,
    }
    Ok(())
}

/// Contiguous runs of drawable points; missing values break the line.
fn segments(values: &[f64], scale: Scale) -> Vec<Vec<(f64, f64)>> {
    let mut out: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current = Vec::new();
    for (idx, value) in values.iter().enumerate() {
        let y = scale.forward(*value);
        if y.is_finite() {
            current.push((idx as f64, y));
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Vertical extent in axis space, covering every line and reference.
fn y_range(request: &ChartRequest) -> (f64, f64) {
    let scale = request.scale;
    let (lo, hi) = request
        .lines
        .iter()
        .flat_map(|line| line.values.iter())
        .chain(request.references.iter().map(|r| &r.value))
        .map(|v| scale.forward(*v))
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let pad = match scale {
        Scale::Linear => ((hi - lo) * 0.08).max(hi.abs() * 0.05).max(1e-9),
        Scale::Log | Scale::SymLog { .. } => ((hi - lo) * 0.08).max(0.2),
    };
    let lo = match scale {
        // Linear charts of non-negative data start at zero
        Scale::Linear if lo >= 0.0 => 0.0,
        _ => lo - pad,
    };
    (lo, hi + pad)
}

/// Compact tick text: `0.25`, `12.5`, `340`, `12k`, `3.4M`.
fn format_axis_value(v: f64) -> String {
    let abs = v.abs();
    let trim = |s: String| {
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    };
    if abs >= 1e6 {
        format!("{}M", trim(format!("{:.1}", v / 1e6)))
    } else if abs >= 1e4 {
        format!("{}k", trim(format!("{:.1}", v / 1e3)))
    } else if abs >= 100.0 {
        format!("{v:.0}")
    } else if abs >= 1.0 {
        trim(format!("{v:.1}"))
    } else if abs >= 1e-3 {
        trim(format!("{v:.3}"))
    } else if abs == 0.0 {
        "0".to_string()
    } else {
        format!("{v:.0e}")
    }
}
