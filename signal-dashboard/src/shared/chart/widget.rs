//! Ratatui widget replaying a recorded chart onto a braille canvas

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, Widget,
    },
};

use super::{ChartCanvas, DrawOp, Point, Stroke};

const C_TEXT: Color = Color::Rgb(150, 150, 150);

/// Terminal view of a [`ChartCanvas`]
pub struct ChartView<'a> {
    canvas: &'a ChartCanvas,
    block: Option<Block<'a>>,
}

impl<'a> ChartView<'a> {
    pub fn new(canvas: &'a ChartCanvas) -> Self {
        Self { canvas, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = (self.canvas.width, self.canvas.height);
        let ops = self.canvas.ops();

        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| paint(ctx, ops, height));
        if let Some(block) = self.block {
            canvas = canvas.block(block);
        }
        canvas.render(area, buf);
    }
}

/// Surface y grows downwards, canvas y grows upwards.
fn flip(point: Point, height: f64) -> (f64, f64) {
    (point.x, height - point.y)
}

/// Blend a stroke against the dark terminal background
fn stroke_color(stroke: Stroke) -> Color {
    let (r, g, b) = stroke.rgb;
    let alpha = stroke.alpha.clamp(0.0, 1.0);
    // Hairlines would vanish entirely at their nominal opacity
    let alpha = if stroke.width <= 1.0 { alpha.max(0.25) } else { alpha };
    Color::Rgb(
        (r as f64 * alpha) as u8,
        (g as f64 * alpha) as u8,
        (b as f64 * alpha) as u8,
    )
}

fn paint(ctx: &mut Context<'_>, ops: &[DrawOp], height: f64) {
    // Wide strokes go underneath so the crisp line stays readable.
    let (wide, thin): (Vec<&DrawOp>, Vec<&DrawOp>) = ops.iter().partition(|op| match op {
        DrawOp::Polyline { stroke, .. } => stroke.width > Stroke::PRIMARY.width,
        _ => false,
    });

    for op in wide.into_iter().chain(thin) {
        match op {
            DrawOp::Line { from, to, stroke } => {
                draw_segment(ctx, *from, *to, *stroke, height);
            }
            DrawOp::Polyline { points, stroke } => {
                for pair in points.windows(2) {
                    draw_segment(ctx, pair[0], pair[1], *stroke, height);
                }
            }
            DrawOp::Text { at, text } => {
                let (x, y) = flip(*at, height);
                ctx.print(x, y, Span::styled(text.clone(), Style::default().fg(C_TEXT)));
            }
        }
        ctx.layer();
    }
}

fn draw_segment(ctx: &mut Context<'_>, from: Point, to: Point, stroke: Stroke, height: f64) {
    let (x1, y1) = flip(from, height);
    let (x2, y2) = flip(to, height);
    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, stroke_color(stroke)));
}
