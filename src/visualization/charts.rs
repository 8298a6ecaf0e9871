use std::fmt::Write as _;

use colored::Colorize;

use crate::models::DataPoint;

pub const X_AXIS_LABEL: &str = "Time (Weeks)";
pub const Y_AXIS_LABEL: &str = "Number of Users";
pub const SERIES_COLOR: &str = "#2563eb";

const Y_INTERVALS: usize = 4;
const X_TARGET_INTERVALS: f64 = 8.0;
const MAX_X_TICKS: usize = 2 * X_TARGET_INTERVALS as usize;

/// Axis ranges for an adoption chart.
///
/// The y axis always starts at zero; its upper bound is the smallest "nice"
/// value (1, 2, 2.5 or 5 × 10^n per tick) covering the peak.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScale {
    pub x_max: f64,
    pub x_ticks: Vec<f64>,
    pub y_max: f64,
    pub y_ticks: Vec<f64>,
}

/// Round a raw tick interval up to 1, 2, 2.5, 5 or 10 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|n| *n >= normalized - 1e-9)
        .unwrap_or(10.0);
    nice * magnitude
}

impl ChartScale {
    pub fn for_data(data: &[DataPoint]) -> Self {
        let peak = data.iter().map(|p| p.users).max().unwrap_or(0).max(0) as f64;
        let y_step = nice_step(peak / Y_INTERVALS as f64);
        let y_max = y_step * Y_INTERVALS as f64;
        let y_ticks = (0..=Y_INTERVALS).map(|i| i as f64 * y_step).collect();

        let last_time = data
            .iter()
            .map(|p| p.time)
            .filter(|t| t.is_finite())
            .fold(0.0f64, f64::max);
        let x_max = if last_time > 0.0 { last_time } else { 1.0 };
        let x_step = nice_step(x_max / X_TARGET_INTERVALS);
        let x_ticks = (0..=MAX_X_TICKS)
            .map(|i| i as f64 * x_step)
            .take_while(|t| *t <= x_max + 1e-9)
            .collect();

        Self {
            x_max,
            x_ticks,
            y_max,
            y_ticks,
        }
    }
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Pixel layout of the SVG chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            margin_left: 70.0,
            margin_right: 20.0,
            margin_top: 40.0,
            margin_bottom: 50.0,
        }
    }
}

impl ChartLayout {
    fn plot_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    fn plot_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }

    fn x_px(&self, scale: &ChartScale, time: f64) -> f64 {
        self.margin_left + time / scale.x_max * self.plot_width()
    }

    fn y_px(&self, scale: &ChartScale, users: f64) -> f64 {
        self.margin_top + self.plot_height() * (1.0 - users / scale.y_max)
    }
}

/// Render an adoption curve as a standalone SVG line chart.
///
/// Empty data renders the axes and grid with no series line.
pub fn render_svg_chart(data: &[DataPoint]) -> String {
    render_svg_chart_with(data, &ChartLayout::default())
}

pub fn render_svg_chart_with(data: &[DataPoint], layout: &ChartLayout) -> String {
    let scale = ChartScale::for_data(data);
    let left = layout.margin_left;
    let right = layout.width - layout.margin_right;
    let top = layout.margin_top;
    let bottom = layout.height - layout.margin_bottom;

    let mut svg = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="adoption-chart" width="100%" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
        w = layout.width,
        h = layout.height
    );

    // Grid
    let _ = writeln!(svg, r##"<g class="grid" stroke="#ccc" stroke-dasharray="3 3">"##);
    for tick in &scale.y_ticks {
        let y = layout.y_px(&scale, *tick);
        let _ = writeln!(svg, r#"<line x1="{left}" y1="{y:.1}" x2="{right}" y2="{y:.1}"/>"#);
    }
    for tick in &scale.x_ticks {
        let x = layout.x_px(&scale, *tick);
        let _ = writeln!(svg, r#"<line x1="{x:.1}" y1="{top}" x2="{x:.1}" y2="{bottom}"/>"#);
    }
    let _ = writeln!(svg, "</g>");

    // Axes
    let _ = writeln!(
        svg,
        r##"<g class="axes" stroke="#666"><line x1="{left}" y1="{bottom}" x2="{right}" y2="{bottom}"/><line x1="{left}" y1="{top}" x2="{left}" y2="{bottom}"/></g>"##
    );
    let _ = writeln!(svg, r##"<g class="ticks" fill="#666">"##);
    for tick in &scale.y_ticks {
        let y = layout.y_px(&scale, *tick);
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="{y:.1}" text-anchor="end" dominant-baseline="middle">{label}</text>"#,
            x = left - 6.0,
            label = format_tick(*tick)
        );
    }
    for tick in &scale.x_ticks {
        let x = layout.x_px(&scale, *tick);
        let _ = writeln!(
            svg,
            r#"<text x="{x:.1}" y="{y}" text-anchor="middle">{label}</text>"#,
            y = bottom + 16.0,
            label = format_tick(*tick)
        );
    }
    let _ = writeln!(svg, "</g>");

    // Axis labels
    let _ = writeln!(
        svg,
        r#"<text class="x-label" x="{right}" y="{y}" text-anchor="end">{X_AXIS_LABEL}</text>"#,
        y = layout.height - 8.0
    );
    let _ = writeln!(
        svg,
        r#"<text class="y-label" transform="translate(16 {y:.1}) rotate(-90)" text-anchor="middle">{Y_AXIS_LABEL}</text>"#,
        y = (top + bottom) / 2.0
    );

    // Legend
    let legend_x = (left + right) / 2.0;
    let _ = writeln!(
        svg,
        r#"<g class="legend"><line x1="{x1}" y1="18" x2="{x2}" y2="18" stroke="{SERIES_COLOR}" stroke-width="2"/><text x="{tx}" y="22" fill="{SERIES_COLOR}">users</text></g>"#,
        x1 = legend_x - 30.0,
        x2 = legend_x - 14.0,
        tx = legend_x - 8.0
    );

    // Points past the representable time range are left off the line.
    let plotted: Vec<&DataPoint> = data.iter().filter(|p| p.time.is_finite()).collect();
    if !plotted.is_empty() {
        let mut path = String::new();
        for (i, point) in plotted.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(
                path,
                "{cmd}{:.1},{:.1} ",
                layout.x_px(&scale, point.time),
                layout.y_px(&scale, point.users as f64)
            );
        }
        let _ = writeln!(
            svg,
            r#"<path class="series" d="{d}" fill="none" stroke="{SERIES_COLOR}" stroke-width="2"/>"#,
            d = path.trim_end()
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Format a terminal bar chart of an adoption curve.
///
/// At most `max_rows` points are shown, sampled evenly; the final point is
/// always included.
pub fn format_text_chart(data: &[DataPoint], max_rows: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Adoption Curve".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if data.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let scale = ChartScale::for_data(data);
    let bar_width = 40;
    let stride = data.len().div_ceil(max_rows.max(1));

    output.push_str(&format!("  {:>8}  {:>10}  Users\n", "Time", "Users"));
    output.push_str(&format!("  {}\n", "-".repeat(60)));

    let last_index = data.len() - 1;
    for (i, point) in data.iter().enumerate() {
        if i % stride != 0 && i != last_index {
            continue;
        }
        let bar_len = ((point.users.max(0) as f64 / scale.y_max) * bar_width as f64).round() as usize;
        let bar = "\u{2588}".repeat(bar_len);
        output.push_str(&format!(
            "  {:>8}  {:>10}  {}\n",
            format_tick(point.time),
            point.users,
            bar.blue()
        ));
    }

    output.push('\n');
    output
}

/// Print a terminal bar chart of an adoption curve.
pub fn print_text_chart(data: &[DataPoint], max_rows: usize) {
    print!("{}", format_text_chart(data, max_rows));
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn curve(values: &[i64]) -> Vec<DataPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, users)| DataPoint {
                time: i as f64,
                users: *users,
            })
            .collect()
    }

    #[test]
    fn test_nice_step() {
        assert_approx_eq!(nice_step(237.5), 250.0);
        assert_approx_eq!(nice_step(250.0), 250.0);
        assert_approx_eq!(nice_step(13.0), 20.0);
        assert_approx_eq!(nice_step(0.7), 1.0);
        assert_approx_eq!(nice_step(6.375), 10.0);
        assert_approx_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn test_scale_floor_is_zero_and_covers_peak() {
        let scale = ChartScale::for_data(&curve(&[10, 400, 950]));
        assert_eq!(scale.y_ticks[0], 0.0);
        assert_approx_eq!(scale.y_max, 1000.0);
        assert_eq!(scale.y_ticks.len(), 5);
        assert!(scale.y_max >= 950.0);
    }

    #[test]
    fn test_scale_x_ticks() {
        let scale = ChartScale::for_data(&curve(&[1; 52]));
        assert_approx_eq!(scale.x_max, 51.0);
        assert_eq!(scale.x_ticks, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_scale_empty_data() {
        let scale = ChartScale::for_data(&[]);
        assert_approx_eq!(scale.y_max, 4.0);
        assert_approx_eq!(scale.x_max, 1.0);
    }

    #[test]
    fn test_scale_ignores_overflowed_times() {
        let data = crate::client::format_series(&[1.0, 2.0, 3.0], 1e308);
        assert!(data[2].time.is_infinite());
        let scale = ChartScale::for_data(&data);
        assert_eq!(scale.x_max, 1e308);
        assert!(!scale.x_ticks.is_empty());
        assert!(scale.x_ticks.len() <= MAX_X_TICKS + 1);
        assert!(scale.x_ticks.iter().all(|t| t.is_finite()));
    }

    #[test]
    fn test_scale_all_times_non_finite() {
        let data = vec![
            DataPoint {
                time: f64::INFINITY,
                users: 5,
            },
            DataPoint {
                time: f64::NAN,
                users: 7,
            },
        ];
        let scale = ChartScale::for_data(&data);
        assert_approx_eq!(scale.x_max, 1.0);
        assert_eq!(scale.x_ticks.len(), 6);
        assert_eq!(scale.x_ticks[0], 0.0);
        assert_approx_eq!(scale.x_ticks[5], 1.0);
    }

    #[test]
    fn test_svg_skips_non_finite_points() {
        let data = crate::client::format_series(&[1.0, 2.0, 3.0], 1e308);
        let svg = render_svg_chart(&data);
        assert!(svg.contains(r#"class="series""#));
        assert!(!svg.contains("inf"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(250.0), "250");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.25), "0.25");
    }

    #[test]
    fn test_svg_contains_labels_and_series() {
        let svg = render_svg_chart(&curve(&[10, 20, 40, 80]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(X_AXIS_LABEL));
        assert!(svg.contains(Y_AXIS_LABEL));
        assert!(svg.contains(r#"class="series""#));
        assert!(svg.contains(r#"stroke-dasharray="3 3""#));
        assert!(svg.contains(SERIES_COLOR));
    }

    #[test]
    fn test_svg_empty_data_has_no_series() {
        let svg = render_svg_chart(&[]);
        assert!(svg.contains(X_AXIS_LABEL));
        assert!(!svg.contains(r#"class="series""#));
    }

    #[test]
    fn test_svg_series_starts_at_origin_time() {
        let layout = ChartLayout::default();
        let svg = render_svg_chart_with(&curve(&[0, 5]), &layout);
        // First point at time 0 and zero users sits on the axis corner.
        let expected = format!(
            "M{:.1},{:.1}",
            layout.margin_left,
            layout.height - layout.margin_bottom
        );
        assert!(svg.contains(&expected));
    }

    #[test]
    fn test_text_chart_empty() {
        let output = format_text_chart(&[], 20);
        assert!(output.contains("No data available."));
    }

    #[test]
    fn test_text_chart_samples_rows() {
        let data = curve(&(0..52).collect::<Vec<i64>>());
        let output = format_text_chart(&data, 13);
        let rows = output
            .lines()
            .filter(|l| l.contains('\u{2588}') || l.trim_start().starts_with("0 "))
            .count();
        assert!(rows <= 14);
        assert!(output.contains("51"));
    }
}
