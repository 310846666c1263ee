//! Demonstration charts built from example data.
//!
//! Charts are written as SVG and rasterized with [`SvgRasterizer`]. Nothing
//! here runs unless explicitly requested (`solarscope charts`).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

use super::svg_to_png::SvgRasterizer;
use crate::error::ChartError;

/// Scores above this are drawn green, the rest orange.
pub const SCORE_HIGHLIGHT: f64 = 150.0;

const FONT: &str = "font-family=\"sans-serif\"";

/// Example inputs for the demonstration charts
#[derive(Debug, Clone)]
pub struct ExampleData {
    pub locations: Vec<String>,
    pub scores: Vec<f64>,
    /// 10 x 10 brightness samples in [0, 255)
    pub brightness_map: Vec<Vec<f64>>,
    /// Hours of the day
    pub time_of_day: Vec<f64>,
    /// Average brightness per time sample in [0, 100)
    pub brightness_values: Vec<f64>,
    pub shadow_area: f64,
    pub bright_area: f64,
}

impl ExampleData {
    /// Fixed example values plus random maps; `seed` makes them reproducible
    pub fn generate(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let brightness_map = (0..10)
            .map(|_| (0..10).map(|_| rng.gen::<f64>() * 255.0).collect())
            .collect();
        let time_of_day = (0..10).map(|i| 6.0 + 14.0 * i as f64 / 9.0).collect();
        let brightness_values = (0..10).map(|_| rng.gen::<f64>() * 100.0).collect();

        Self {
            locations: vec![
                "Location 1".to_string(),
                "Location 2".to_string(),
                "Location 3".to_string(),
            ],
            scores: vec![180.0, 140.0, 120.0],
            brightness_map,
            time_of_day,
            brightness_values,
            shadow_area: 40.0,
            bright_area: 60.0,
        }
    }
}

/// One rendered chart
pub struct Chart {
    pub file_name: &'static str,
    pub svg: String,
}

/// Build the four chart documents
pub fn example_charts(data: &ExampleData) -> Vec<Chart> {
    vec![
        Chart {
            file_name: "solar_potential_score.png",
            svg: score_bar_chart(&data.locations, &data.scores),
        },
        Chart {
            file_name: "brightness_shadow_heatmap.png",
            svg: brightness_heatmap(&data.brightness_map),
        },
        Chart {
            file_name: "brightness_time_of_day.png",
            svg: brightness_line_chart(&data.time_of_day, &data.brightness_values),
        },
        Chart {
            file_name: "shadow_vs_bright_area.png",
            svg: area_pie_chart(data.shadow_area, data.bright_area),
        },
    ]
}

/// Render all charts into `dir` and return the written paths
pub fn render_example_charts(dir: &Path, seed: Option<u64>) -> Result<Vec<PathBuf>, ChartError> {
    std::fs::create_dir_all(dir)?;
    let rasterizer = SvgRasterizer::new();
    let data = ExampleData::generate(seed);

    let mut written = Vec::new();
    for chart in example_charts(&data) {
        let png = rasterizer.render_to_png(&chart.svg)?;
        let path = dir.join(chart.file_name);
        std::fs::write(&path, &png)?;
        tracing::debug!(path = %path.display(), size_bytes = png.len(), "Wrote chart");
        written.push(path);
    }
    Ok(written)
}

/// Bar color for a score
pub fn score_color(score: f64) -> &'static str {
    if score > SCORE_HIGHLIGHT {
        "green"
    } else {
        "orange"
    }
}

fn svg_open(width: u32, height: u32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><rect width="{width}" height="{height}" fill="white"/>"#
    )
}

fn text(x: f64, y: f64, size: u32, anchor: &str, content: &str) -> String {
    format!(
        r#"<text x="{x:.1}" y="{y:.1}" {FONT} font-size="{size}" text-anchor="{anchor}" fill="black">{}</text>"#,
        xml_escape(content)
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Plot area inside a chart: left, top, width, height
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn axes(&self) -> String {
        format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black" stroke-width="1"/>"#,
            self.left, self.top, self.width, self.height
        )
    }

    /// Horizontal tick labels for `ticks` evenly spaced values in [lo, hi]
    fn y_ticks(&self, lo: f64, hi: f64, ticks: usize) -> String {
        let mut out = String::new();
        for i in 0..=ticks {
            let value = lo + (hi - lo) * i as f64 / ticks as f64;
            let y = self.bottom() - self.height * i as f64 / ticks as f64;
            out.push_str(&format!(
                r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="black"/>"#,
                self.left - 5.0,
                self.left
            ));
            out.push_str(&text(self.left - 8.0, y + 4.0, 12, "end", &format!("{value:.0}")));
        }
        out
    }
}

fn score_bar_chart(labels: &[String], scores: &[f64]) -> String {
    let frame = Frame {
        left: 90.0,
        top: 60.0,
        width: 860.0,
        height: 460.0,
    };
    let max = scores.iter().cloned().fold(0.0f64, f64::max).max(1.0) * 1.05;

    let mut svg = svg_open(1000, 600);
    svg.push_str(&text(500.0, 35.0, 20, "middle", "Solar Potential Score by Location"));
    svg.push_str(&frame.y_ticks(0.0, max, 5));

    let slot = frame.width / scores.len().max(1) as f64;
    for (i, (label, &score)) in labels.iter().zip(scores).enumerate() {
        let bar_height = frame.height * (score.max(0.0) / max);
        let x = frame.left + slot * i as f64 + slot * 0.1;
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{:.1}" width="{:.1}" height="{bar_height:.1}" fill="{}"/>"#,
            frame.bottom() - bar_height,
            slot * 0.8,
            score_color(score)
        ));
        svg.push_str(&text(x + slot * 0.4, frame.bottom() + 20.0, 13, "middle", label));
    }

    svg.push_str(&frame.axes());
    svg.push_str(&text(500.0, 585.0, 14, "middle", "Locations"));
    svg.push_str(&format!(
        r#"<g transform="translate(25 290) rotate(-90)">{}</g>"#,
        text(0.0, 0.0, 14, "middle", "Solar Potential Score")
    ));
    svg.push_str("</svg>");
    svg
}

/// matplotlib "hot": black, red, yellow, white
pub fn hot_color(t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let r = (t / 0.365_079).min(1.0);
    let g = ((t - 0.365_079) / (0.746_032 - 0.365_079)).clamp(0.0, 1.0);
    let b = ((t - 0.746_032) / (1.0 - 0.746_032)).clamp(0.0, 1.0);
    let to_u8 = |v: f64| (v * 255.0).round() as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

fn brightness_heatmap(grid: &[Vec<f64>]) -> String {
    let cell = 45.0;
    let (left, top) = (120.0, 70.0);
    let rows = grid.len();

    let lo = grid.iter().flatten().cloned().fold(f64::INFINITY, f64::min);
    let hi = grid.iter().flatten().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };

    let mut svg = svg_open(800, 600);
    svg.push_str(&text(345.0, 40.0, 20, "middle", "Brightness and Shadow Heatmap"));

    for (r, row) in grid.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let (red, green, blue) = hot_color((value - lo) / span);
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{cell}" height="{cell}" fill="rgb({red},{green},{blue})"/>"#,
                left + c as f64 * cell,
                top + r as f64 * cell
            ));
        }
    }

    // Colorbar
    let bar_left = left + 10.0 * cell + 40.0;
    let bar_height = rows as f64 * cell;
    let steps = 50;
    for i in 0..steps {
        let t = 1.0 - i as f64 / (steps - 1) as f64;
        let (red, green, blue) = hot_color(t);
        svg.push_str(&format!(
            r#"<rect x="{bar_left:.1}" y="{:.1}" width="25" height="{:.2}" fill="rgb({red},{green},{blue})"/>"#,
            top + bar_height * i as f64 / steps as f64,
            bar_height / steps as f64 + 0.5
        ));
    }
    svg.push_str(&text(bar_left + 32.0, top + 10.0, 12, "start", &format!("{hi:.0}")));
    svg.push_str(&text(bar_left + 32.0, top + bar_height, 12, "start", &format!("{lo:.0}")));
    svg.push_str(&format!(
        r#"<g transform="translate({:.1} {:.1}) rotate(-90)">{}</g>"#,
        bar_left + 90.0,
        top + bar_height / 2.0,
        text(0.0, 0.0, 13, "middle", "Brightness/Shadow Intensity")
    ));
    svg.push_str("</svg>");
    svg
}

fn brightness_line_chart(hours: &[f64], values: &[f64]) -> String {
    let frame = Frame {
        left: 90.0,
        top: 60.0,
        width: 860.0,
        height: 460.0,
    };
    let (x_lo, x_hi) = (6.0, 20.0);
    let y_hi = 100.0;

    let to_x = |h: f64| frame.left + frame.width * (h - x_lo) / (x_hi - x_lo);
    let to_y = |v: f64| frame.bottom() - frame.height * (v / y_hi);

    let mut svg = svg_open(1000, 600);
    svg.push_str(&text(500.0, 35.0, 20, "middle", "Average Brightness vs Time of Day"));
    svg.push_str(&frame.y_ticks(0.0, y_hi, 5));

    for hour in (6..=20).step_by(2) {
        let x = to_x(hour as f64);
        svg.push_str(&text(x, frame.bottom() + 20.0, 12, "middle", &hour.to_string()));
    }

    let points: Vec<String> = hours
        .iter()
        .zip(values)
        .map(|(&h, &v)| format!("{:.1},{:.1}", to_x(h), to_y(v)))
        .collect();
    svg.push_str(&format!(
        "<polyline points=\"{}\" fill=\"none\" stroke=\"#1f77b4\" stroke-width=\"2\"/>",
        points.join(" ")
    ));
    for (&h, &v) in hours.iter().zip(values) {
        svg.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"5\" fill=\"#1f77b4\"/>",
            to_x(h),
            to_y(v)
        ));
    }

    svg.push_str(&frame.axes());
    svg.push_str(&text(500.0, 585.0, 14, "middle", "Time of Day"));
    svg.push_str(&format!(
        r#"<g transform="translate(25 290) rotate(-90)">{}</g>"#,
        text(0.0, 0.0, 14, "middle", "Average Brightness")
    ));
    svg.push_str("</svg>");
    svg
}

fn area_pie_chart(shadow: f64, bright: f64) -> String {
    let (cx, cy, radius) = (300.0, 320.0, 220.0);
    let total = shadow + bright;
    let slices = [
        ("Shadow Area", shadow, "#1f77b4"),
        ("Bright Area", bright, "#ff7f0e"),
    ];

    let mut svg = svg_open(600, 600);
    svg.push_str(&text(300.0, 50.0, 20, "middle", "Shadow vs Bright Area"));

    // Start at 12 o'clock, counter-clockwise; y grows downward in SVG
    let mut angle = 90.0f64;
    for (label, value, color) in slices {
        let fraction = if total > 0.0 { value / total } else { 0.0 };
        let sweep = fraction * 360.0;
        let end = angle + sweep;
        let point = |deg: f64, r: f64| {
            let rad = deg.to_radians();
            (cx + r * rad.cos(), cy - r * rad.sin())
        };

        let (x0, y0) = point(angle, radius);
        let (x1, y1) = point(end, radius);
        let large_arc = u8::from(sweep > 180.0);
        svg.push_str(&format!(
            r#"<path d="M {cx} {cy} L {x0:.2} {y0:.2} A {radius} {radius} 0 {large_arc} 0 {x1:.2} {y1:.2} Z" fill="{color}"/>"#
        ));

        let mid = angle + sweep / 2.0;
        let (px, py) = point(mid, radius * 0.6);
        svg.push_str(&text(px, py, 16, "middle", &format!("{:.1}%", fraction * 100.0)));
        let (lx, ly) = point(mid, radius * 1.12);
        svg.push_str(&text(lx, ly, 15, "middle", label));

        angle = end;
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_data_shape() {
        let data = ExampleData::generate(Some(1));
        assert_eq!(data.scores, vec![180.0, 140.0, 120.0]);
        assert_eq!(data.brightness_map.len(), 10);
        assert!(data.brightness_map.iter().all(|row| row.len() == 10));
        assert!(data
            .brightness_map
            .iter()
            .flatten()
            .all(|&v| (0.0..255.0).contains(&v)));
        assert_eq!(data.time_of_day.len(), 10);
        assert_eq!(data.time_of_day[0], 6.0);
        assert!((data.time_of_day[9] - 20.0).abs() < 1e-9);
        assert!(data.brightness_values.iter().all(|&v| (0.0..100.0).contains(&v)));
    }

    #[test]
    fn test_seeded_data_is_reproducible() {
        let a = ExampleData::generate(Some(42));
        let b = ExampleData::generate(Some(42));
        assert_eq!(a.brightness_map, b.brightness_map);
        assert_eq!(a.brightness_values, b.brightness_values);
    }

    #[test]
    fn test_score_colors() {
        assert_eq!(score_color(180.0), "green");
        assert_eq!(score_color(150.0), "orange");
        assert_eq!(score_color(120.0), "orange");
    }

    #[test]
    fn test_bar_chart_uses_score_colors() {
        let data = ExampleData::generate(Some(3));
        let svg = score_bar_chart(&data.locations, &data.scores);
        assert_eq!(svg.matches(r#"fill="green""#).count(), 1);
        assert_eq!(svg.matches(r#"fill="orange""#).count(), 2);
    }

    #[test]
    fn test_hot_colormap_endpoints() {
        assert_eq!(hot_color(0.0), (0, 0, 0));
        assert_eq!(hot_color(1.0), (255, 255, 255));
        let (r, g, b) = hot_color(0.5);
        assert_eq!(r, 255);
        assert!(g > 0 && g < 255);
        assert_eq!(b, 0);
    }

    #[test]
    fn test_pie_labels() {
        let svg = area_pie_chart(40.0, 60.0);
        assert!(svg.contains("40.0%"));
        assert!(svg.contains("60.0%"));
        assert!(svg.contains("#1f77b4"));
        assert!(svg.contains("#ff7f0e"));
    }

    #[test]
    fn test_render_example_charts() {
        let dir = tempfile::tempdir().unwrap();
        let written = render_example_charts(dir.path(), Some(7)).unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "solar_potential_score.png",
                "brightness_shadow_heatmap.png",
                "brightness_time_of_day.png",
                "shadow_vs_bright_area.png",
            ]
        );

        let heatmap = image::open(dir.path().join("brightness_shadow_heatmap.png")).unwrap();
        assert_eq!((heatmap.width(), heatmap.height()), (800, 600));
        let pie = image::open(dir.path().join("shadow_vs_bright_area.png")).unwrap();
        assert_eq!((pie.width(), pie.height()), (600, 600));
    }
}
