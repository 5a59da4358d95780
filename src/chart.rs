use std::fmt::Write;

use plotters::element::Pie;
use plotters::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::models::{CategoryTally, DegreeLevel, Entry, PlotPoint};
use crate::stack;
use crate::tally;

pub const SQUARES_WIDTH: u32 = 600;
pub const SQUARES_HEIGHT: u32 = 420;
pub const MARKER_SIZE: i32 = 20;
pub const MARKER_BORDER: i32 = 2;
/// Vertical pixels per stack step; keeps bordered squares apart.
pub const STEP_PIXELS: i32 = MARKER_SIZE + 2 * MARKER_BORDER;
pub const PIE_SIZE: u32 = 420;

/// Errors that can occur while drawing the charts
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),
}

pub type Result<T> = std::result::Result<T, PlotError>;

/// Both aggregates for one month, as shown in one dashboard panel.
#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub month: String,
    pub points: Vec<PlotPoint>,
    pub tally: CategoryTally,
}

impl MonthView {
    pub fn compute(entries: &[Entry], month: &str) -> Self {
        Self {
            month: month.to_string(),
            points: stack::stack_points(entries, month),
            tally: tally::count_categories(entries, month),
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

/// Canvas height needed so the tallest degree column fits at `STEP_PIXELS` per marker.
fn squares_height(points: &[PlotPoint]) -> u32 {
    let rows = stack::column_sizes(points)
        .iter()
        .map(|(_, count)| *count)
        .max()
        .unwrap_or(0);
    SQUARES_HEIGHT.max((rows as u32 + 2) * STEP_PIXELS as u32)
}

/// Square markers on a transparent canvas with no axes, grid or legend.
///
/// Returns the SVG and the pixel centre of every marker, in point order.
fn draw_squares(points: &[PlotPoint]) -> Result<(String, Vec<(i32, i32)>)> {
    let height = squares_height(points);
    // Fixed data-to-pixel scale: one stack step is STEP_PIXELS tall.
    let units_per_pixel = stack::STEP / STEP_PIXELS as f64;
    let y_top = stack::CEILING - stack::BASE_HEIGHT + stack::STEP;
    let y_bottom = y_top - height as f64 * units_per_pixel;
    let half = MARKER_SIZE / 2;

    let mut svg = String::new();
    let centers = {
        let root = SVGBackend::with_string(&mut svg, (SQUARES_WIDTH, height)).into_drawing_area();
        let mut chart = ChartBuilder::on(&root)
            .margin(0)
            .build_cartesian_2d(0f64..DegreeLevel::ALL.len() as f64, y_bottom..y_top)
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

        // Fill in the degree colour, border in the category colour.
        let corners = [(-half, -half), (half, half)];
        chart
            .draw_series(points.iter().map(|point| {
                EmptyElement::at((point.x, point.y))
                    + Rectangle::new(corners, rgb(point.degree.rgb()).filled())
                    + Rectangle::new(
                        corners,
                        rgb(point.category.rgb()).stroke_width(MARKER_BORDER as u32),
                    )
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        let centers: Vec<(i32, i32)> = points
            .iter()
            .map(|point| chart.backend_coord(&(point.x, point.y)))
            .collect();

        root.present()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        centers
    };

    let hover = hover_layer(points, &centers);
    match svg.rfind("</svg>") {
        Some(end) => svg.insert_str(end, &hover),
        None => svg.push_str(&hover),
    }

    Ok((svg, centers))
}

/// Invisible squares carrying the `<title>` tooltip of each marker.
fn hover_layer(points: &[PlotPoint], centers: &[(i32, i32)]) -> String {
    let half = MARKER_SIZE / 2;
    let mut output = String::new();
    for (point, (cx, cy)) in points.iter().zip(centers) {
        let tooltip = point
            .tooltip
            .iter()
            .map(|line| escape(line))
            .collect::<Vec<_>>()
            .join("\n");
        let _ = writeln!(
            output,
            r#"<rect x="{}" y="{}" width="{s}" height="{s}" fill-opacity="0"><title>{}</title></rect>"#,
            cx - half,
            cy - half,
            tooltip,
            s = MARKER_SIZE
        );
    }
    output
}

pub fn squares_svg(points: &[PlotPoint]) -> Result<String> {
    draw_squares(points).map(|(svg, _)| svg)
}

/// Proportion chart with a `label percent` annotation on every non-empty slice.
pub fn pie_svg(tally: &CategoryTally) -> Result<String> {
    let center = (PIE_SIZE as i32 / 2, PIE_SIZE as i32 / 2);
    let radius = PIE_SIZE as f64 / 3.0;

    let slices: Vec<_> = tally.iter().filter(|(_, count)| *count > 0).collect();
    let sizes: Vec<f64> = slices.iter().map(|(_, count)| *count as f64).collect();
    let colors: Vec<RGBColor> = slices
        .iter()
        .map(|(category, _)| rgb(category.rgb()))
        .collect();
    let labels: Vec<String> = slices
        .iter()
        .map(|(category, _)| format!("{} {:.1}%", category, tally.share(*category) * 100.0))
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (PIE_SIZE, PIE_SIZE)).into_drawing_area();

        if slices.is_empty() {
            root.draw(&Circle::new(
                center,
                radius as i32,
                RGBColor(238, 238, 238).filled(),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
            root.draw(&Text::new(
                "No entries",
                (center.0 - 35, center.1),
                ("sans-serif", 16),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        } else {
            let mut pie = Pie::new(&center, &radius, &sizes[..], &colors[..], &labels[..]);
            pie.start_angle(-90.0);
            pie.label_style(("sans-serif", 12).into_font().color(&BLACK));
            root.draw(&pie)
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }

        root.present()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    Ok(svg)
}

/// Single self-contained page: a month selector and one panel per month.
pub fn render_dashboard(views: &[MonthView], default_month: &str) -> Result<String> {
    let mut output = String::new();
    let _ = writeln!(output, "<!DOCTYPE html>");
    let _ = writeln!(output, r#"<html lang="en">"#);
    let _ = writeln!(output, "<head>");
    let _ = writeln!(output, r#"<meta charset="utf-8">"#);
    let _ = writeln!(output, "<title>Feelings Dashboard</title>");
    let _ = writeln!(
        output,
        "<style>body {{ display: flex; flex-direction: column; align-items: center; \
         justify-content: center; min-height: 100vh; margin: 0; font-family: sans-serif; }} \
         select {{ width: 50%; margin: 20px auto; }} \
         .panel {{ display: flex; flex-direction: column; align-items: center; }} \
         .panel[hidden] {{ display: none; }}</style>"
    );
    let _ = writeln!(output, "</head>");
    let _ = writeln!(output, "<body>");

    let _ = writeln!(output, r#"<select id="month">"#);
    for view in views {
        let month = escape(&view.month);
        let selected = if view.month == default_month {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(output, r#"  <option value="{month}"{selected}>{month}</option>"#);
    }
    let _ = writeln!(output, "</select>");

    for view in views {
        let hidden = if view.month == default_month {
            ""
        } else {
            " hidden"
        };
        let _ = writeln!(
            output,
            r#"<div class="panel" data-month="{}"{}>"#,
            escape(&view.month),
            hidden
        );
        let _ = writeln!(output, r#"<div class="squares">"#);
        output.push_str(&squares_svg(&view.points)?);
        let _ = writeln!(output, "</div>");
        let _ = writeln!(output, r#"<div class="pie">"#);
        output.push_str(&pie_svg(&view.tally)?);
        let _ = writeln!(output, "</div>");
        let _ = writeln!(output, "</div>");
    }

    let _ = writeln!(
        output,
        "<script>document.getElementById('month').addEventListener('change', function (event) {{\n  \
         document.querySelectorAll('.panel').forEach(function (panel) {{\n    \
         panel.hidden = panel.dataset.month !== event.target.value;\n  }});\n}});</script>"
    );
    let _ = writeln!(output, "</body>");
    let _ = writeln!(output, "</html>");
    Ok(output)
}
