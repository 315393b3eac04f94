//! Price series line chart
//!
//! Provides:
//! - [`PriceSeries`]: finite samples in time order
//! - [`Surface`]: the drawing seam (recording surface for tests and the TUI)
//! - [`SeriesRenderer`]: normalisation onto a padded surface with a glow stroke
//! - Ratatui widget replaying recorded draw operations

mod widget;

pub use widget::ChartView;

use super::format::fmt_usd;

/// Default padding between the plot and the surface edge
pub const DEFAULT_PADDING: f64 = 18.0;

/// Number of decorative horizontal gridlines
pub const GRIDLINES: usize = 6;

/// Text drawn when the series is too short to plot
pub const NO_DATA: &str = "No data";

/// Ordered price samples, oldest first. Only finite values are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries(Vec<f64>);

impl PriceSeries {
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self(samples.into_iter().filter(|v| v.is_finite()).collect())
    }

    pub fn samples(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// `(min, max)` over the series, `None` when empty
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let first = *self.0.first()?;
        Some(
            self.0
                .iter()
                .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
        )
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(samples: Vec<f64>) -> Self {
        Self::new(samples)
    }
}

/// Point in surface coordinates: origin top-left, y grows downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Stroke style for lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub rgb: (u8, u8, u8),
    pub alpha: f64,
    pub width: f64,
}

impl Stroke {
    pub const GRID: Stroke = Stroke { rgb: (255, 255, 255), alpha: 0.06, width: 1.0 };
    pub const PRIMARY: Stroke = Stroke { rgb: (57, 255, 180), alpha: 0.85, width: 2.0 };
    pub const GLOW: Stroke = Stroke { rgb: (87, 199, 255), alpha: 0.225, width: 6.0 };
}

/// Minimal 2D drawing surface
pub trait Surface {
    /// `(width, height)` in surface units
    fn size(&self) -> (f64, f64);

    fn clear(&mut self);

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke);

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke);

    fn fill_text(&mut self, at: Point, text: &str);
}

/// Drawing operation captured by [`ChartCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line { from: Point, to: Point, stroke: Stroke },
    Polyline { points: Vec<Point>, stroke: Stroke },
    Text { at: Point, text: String },
}

/// Recording [`Surface`] with fixed logical dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct ChartCanvas {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
}

impl ChartCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Polylines drawn on the surface, in draw order
    pub fn polylines(&self) -> impl Iterator<Item = (&[Point], Stroke)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Polyline { points, stroke } => Some((points.as_slice(), *stroke)),
            _ => None,
        })
    }
}

impl Surface for ChartCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.clear();
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.ops.push(DrawOp::Line { from, to, stroke });
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }

    fn fill_text(&mut self, at: Point, text: &str) {
        self.ops.push(DrawOp::Text {
            at,
            text: text.to_string(),
        });
    }
}

/// Min / max of a rendered series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub min: f64,
    pub max: f64,
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "min: {}  max: {}", fmt_usd(self.min), fmt_usd(self.max))
    }
}

/// Scales a [`PriceSeries`] onto a [`Surface`]
#[derive(Debug, Clone, Copy)]
pub struct SeriesRenderer {
    pub padding: f64,
}

impl Default for SeriesRenderer {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
        }
    }
}

impl SeriesRenderer {
    pub fn new(padding: f64) -> Self {
        Self { padding }
    }

    /// Draw the series. Returns `None` (and draws the placeholder) when fewer
    /// than two samples are available; callers keep their previous summary.
    pub fn render<S: Surface>(&self, series: &PriceSeries, surface: &mut S) -> Option<SeriesSummary> {
        surface.clear();

        let (min, max) = match series.bounds() {
            Some(bounds) if series.len() >= 2 => bounds,
            _ => {
                surface.fill_text(Point::new(self.padding, 30.0), NO_DATA);
                return None;
            }
        };

        let (width, height) = surface.size();
        let pad = self.padding;

        for k in 0..GRIDLINES {
            let y = pad + (height - pad * 2.0) * k as f64 / (GRIDLINES - 1) as f64;
            surface.stroke_line(Point::new(pad, y), Point::new(width - pad, y), Stroke::GRID);
        }

        let points = self.plot(series.samples(), min, max, width, height);
        surface.stroke_polyline(&points, Stroke::PRIMARY);
        surface.stroke_polyline(&points, Stroke::GLOW);

        Some(SeriesSummary { min, max })
    }

    fn plot(&self, samples: &[f64], min: f64, max: f64, width: f64, height: f64) -> Vec<Point> {
        let pad = self.padding;
        let dx = (width - pad * 2.0) / (samples.len() - 1) as f64;
        let range = max - min;

        samples
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let t = if range == 0.0 { 0.5 } else { (v - min) / range };
                Point::new(pad + dx * i as f64, (height - pad) - t * (height - pad * 2.0))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(samples: Vec<f64>) -> (ChartCanvas, Option<SeriesSummary>) {
        let mut canvas = ChartCanvas::new(300.0, 136.0);
        let summary = SeriesRenderer::default().render(&PriceSeries::from(samples), &mut canvas);
        (canvas, summary)
    }

    #[test]
    fn test_short_series_renders_placeholder() {
        for samples in [vec![], vec![42.0]] {
            let (canvas, summary) = render(samples);
            assert!(summary.is_none());
            assert_eq!(
                canvas.ops(),
                &[DrawOp::Text {
                    at: Point::new(DEFAULT_PADDING, 30.0),
                    text: NO_DATA.to_string()
                }]
            );
        }
    }

    #[test]
    fn test_render_clears_previous_drawing() {
        let mut canvas = ChartCanvas::new(300.0, 136.0);
        let renderer = SeriesRenderer::default();
        renderer.render(&PriceSeries::from(vec![1.0, 2.0, 3.0]), &mut canvas);
        renderer.render(&PriceSeries::from(vec![1.0]), &mut canvas);
        assert_eq!(canvas.ops().len(), 1);
    }

    #[test]
    fn test_summary_matches_true_bounds() {
        let (_, summary) = render(vec![100.0, 105.0, 95.0, 110.0]);
        let summary = summary.unwrap();
        assert_eq!(summary.min, 95.0);
        assert_eq!(summary.max, 110.0);
        assert_eq!(summary.to_string(), "min: $95.0000  max: $110.0000");
    }

    #[test]
    fn test_points_are_scaled_into_padded_surface() {
        let (canvas, _) = render(vec![100.0, 105.0, 95.0, 110.0]);
        let (points, stroke) = canvas.polylines().next().unwrap();
        assert_eq!(stroke, Stroke::PRIMARY);
        assert_eq!(points.len(), 4);

        // x: evenly spaced from pad to width - pad
        assert_eq!(points[0].x, 18.0);
        assert_eq!(points[3].x, 282.0);
        assert_eq!(points[1].x, 18.0 + 264.0 / 3.0);

        // y: max at top padding, min at bottom padding
        assert_eq!(points[3].y, 18.0);
        assert_eq!(points[2].y, 118.0);
        assert_eq!(points[0].y, 118.0 - (5.0 / 15.0) * 100.0);
    }

    #[test]
    fn test_flat_series_maps_to_vertical_midpoint() {
        let (canvas, summary) = render(vec![7.0, 7.0, 7.0]);
        assert_eq!(summary, Some(SeriesSummary { min: 7.0, max: 7.0 }));
        for (points, _) in canvas.polylines() {
            assert!(points.iter().all(|p| p.y == 68.0));
        }
    }

    #[test]
    fn test_polyline_drawn_twice_over_six_gridlines() {
        let (canvas, _) = render(vec![1.0, 2.0]);
        let gridlines: Vec<_> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { from, to, .. } => Some((from.y, to.y)),
                _ => None,
            })
            .collect();
        assert_eq!(gridlines.len(), GRIDLINES);
        assert_eq!(gridlines.first(), Some(&(18.0, 18.0)));
        assert_eq!(gridlines.last(), Some(&(118.0, 118.0)));

        let strokes: Vec<Stroke> = canvas.polylines().map(|(_, stroke)| stroke).collect();
        assert_eq!(strokes, vec![Stroke::PRIMARY, Stroke::GLOW]);
    }

    #[test]
    fn test_non_finite_samples_are_dropped() {
        let series = PriceSeries::new([1.0, f64::NAN, 3.0, f64::INFINITY]);
        assert_eq!(series.samples(), &[1.0, 3.0]);
        assert_eq!(series.bounds(), Some((1.0, 3.0)));
    }
}
