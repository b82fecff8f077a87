//! Cairo-based rendering functions for graphs.
//!
//! Every function here follows the same policy: check that the required
//! fields are present (log at trace level and return if not), save the
//! context, apply style overrides only for fields that are set, draw, and
//! restore. Unset style fields use whatever the context already has.

use super::effects::{self, BackgroundImageExtractor, PixelEffect};
use super::graph::{BoxData, Graph, ImageData, StrokeStyle, TextData};
use super::text;
use crate::util::{self, Point};

/// Arrowhead barb length in logical pixels.
pub const ARROW_HEAD_SIZE: f64 = 10.0;

/// Arrowhead barb spread either side of the shaft.
pub const ARROW_HEAD_SPREAD: f64 = std::f64::consts::FRAC_PI_6;

/// Per-pass inputs for rendering graphs.
#[derive(Default, Clone, Copy)]
pub struct RenderPass<'a> {
    /// Draw graphs even when they are marked invisible (export).
    pub force: bool,
    /// Background sampler for pixel-effect graphs.
    pub extractor: Option<&'a dyn BackgroundImageExtractor>,
}

/// Renders a single graph to a Cairo context.
pub fn render_graph(ctx: &cairo::Context, graph: &Graph, pass: &RenderPass<'_>) {
    match graph {
        Graph::Rect { bounds, stroke } => render_rect(ctx, bounds, stroke),
        Graph::Ellipse { bounds, stroke } => render_ellipse(ctx, bounds, stroke),
        Graph::Line { points, stroke } => render_line(ctx, points.as_deref(), stroke),
        Graph::Arrow { points, stroke } => render_arrow(ctx, points.as_deref(), stroke),
        Graph::Text(data) => render_text(ctx, data, pass.force),
        Graph::Image(data) => render_image(ctx, data),
        Graph::Eraser { bounds } => render_eraser(ctx, bounds),
        Graph::Mosaic { bounds } => render_effect(
            ctx,
            bounds,
            pass.extractor,
            PixelEffect::Pixelate {
                block_size: effects::MOSAIC_BLOCK_SIZE,
            },
        ),
        Graph::GaussianBlur { bounds } => render_effect(
            ctx,
            bounds,
            pass.extractor,
            PixelEffect::Blur {
                radius: effects::BLUR_RADIUS,
            },
        ),
    }
}

fn apply_stroke(ctx: &cairo::Context, stroke: &StrokeStyle) {
    if let Some(color) = stroke.color {
        color.apply_to(ctx);
    }
    if let Some(width) = stroke.width {
        ctx.set_line_width(width);
    }
}

/// Render a rectangle outline
fn render_rect(ctx: &cairo::Context, bounds: &BoxData, stroke: &StrokeStyle) {
    let Some((x, y, width, height)) = bounds.complete() else {
        log::trace!("Rect data is incomplete, giving up rendering");
        return;
    };

    ctx.save().ok();
    apply_stroke(ctx, stroke);
    ctx.rectangle(x, y, width, height);
    let _ = ctx.stroke();
    ctx.restore().ok();
}

/// Render an ellipse as a closed polyline
fn render_ellipse(ctx: &cairo::Context, bounds: &BoxData, stroke: &StrokeStyle) {
    let Some((x, y, width, height)) = bounds.complete() else {
        log::trace!("Ellipse data is incomplete, giving up rendering");
        return;
    };

    ctx.save().ok();
    apply_stroke(ctx, stroke);
    trace_polyline(ctx, &util::ellipse_polyline(x, y, width, height));
    ctx.close_path();
    let _ = ctx.stroke();
    ctx.restore().ok();
}

/// Render an open polyline (straight lines and freehand curves)
fn render_line(ctx: &cairo::Context, points: Option<&[Point]>, stroke: &StrokeStyle) {
    let Some(points) = points else {
        log::trace!("Line data is incomplete, giving up rendering");
        return;
    };

    ctx.save().ok();
    apply_stroke(ctx, stroke);
    ctx.new_path();
    trace_polyline(ctx, points);
    let _ = ctx.stroke();
    ctx.restore().ok();
}

/// Render an arrow from the first point to the second, head at the second
fn render_arrow(ctx: &cairo::Context, points: Option<&[Point]>, stroke: &StrokeStyle) {
    let Some(&[start, end, ..]) = points else {
        log::trace!("Arrow data is incomplete, giving up rendering");
        return;
    };

    let [left, right] = util::arrowhead_points(start, end, ARROW_HEAD_SIZE, ARROW_HEAD_SPREAD);

    ctx.save().ok();
    apply_stroke(ctx, stroke);
    ctx.new_path();
    ctx.move_to(start.0, start.1);
    ctx.line_to(end.0, end.1);
    ctx.line_to(left.0, left.1);
    ctx.move_to(end.0, end.1);
    ctx.line_to(right.0, right.1);
    let _ = ctx.stroke();
    ctx.restore().ok();
}

fn trace_polyline(ctx: &cairo::Context, points: &[Point]) {
    let mut iter = points.iter();
    if let Some(&(x0, y0)) = iter.next() {
        ctx.move_to(x0, y0);
    }
    for &(x, y) in iter {
        ctx.line_to(x, y);
    }
}

/// Renders wrapped text, each row vertically centered on its anchor line.
///
/// Blank content is never drawn. Text marked invisible is skipped unless
/// `force` is set.
pub fn render_text(ctx: &cairo::Context, data: &TextData, force: bool) {
    let (Some(x), Some(y), Some(content), Some(line_height), Some(max_width)) = (
        data.x,
        data.y,
        data.content.as_deref(),
        data.line_height,
        data.max_width,
    ) else {
        log::trace!("Text data is incomplete, giving up rendering");
        return;
    };
    if content.trim().is_empty() {
        log::trace!("Text content is blank, giving up rendering");
        return;
    }
    if data.visible == Some(false) && !force {
        log::trace!("Text is hidden, giving up rendering");
        return;
    }

    ctx.save().ok();
    if let Some(color) = data.font_color {
        color.apply_to(ctx);
    }

    let layout = text::create_layout(ctx, data.font.as_ref(), data.font_size);
    let rows = text::wrap_rows(content, max_width, |candidate| {
        text::layout_size(&layout, candidate).0
    });

    let mut row_y = y;
    for row in rows {
        let (_, height) = text::layout_size(&layout, &row);
        ctx.move_to(x, row_y - height / 2.0);
        pangocairo::functions::show_layout(ctx, &layout);
        row_y += line_height;
    }

    ctx.restore().ok();
}

/// Render a raster at its position, stretched to width/height when both are set
fn render_image(ctx: &cairo::Context, data: &ImageData) {
    let (Some(x), Some(y), Some(source)) = (data.x, data.y, data.source.as_ref()) else {
        log::trace!("Image data is incomplete, giving up rendering");
        return;
    };

    ctx.save().ok();
    ctx.translate(x, y);
    if let (Some(width), Some(height)) = (data.width, data.height) {
        let (source_width, source_height) = (source.width() as f64, source.height() as f64);
        if source_width > 0.0 && source_height > 0.0 {
            ctx.scale(width / source_width, height / source_height);
        }
    }
    if ctx.set_source_surface(source, 0.0, 0.0).is_ok() {
        let _ = ctx.paint();
    }
    ctx.restore().ok();
}

/// Clear a rectangle back to transparent
fn render_eraser(ctx: &cairo::Context, bounds: &BoxData) {
    let Some((x, y, width, height)) = bounds.complete() else {
        log::trace!("Eraser data is incomplete, giving up rendering");
        return;
    };

    ctx.save().ok();
    ctx.set_operator(cairo::Operator::Clear);
    ctx.rectangle(x, y, width, height);
    let _ = ctx.fill();
    ctx.restore().ok();
}

fn render_effect(
    ctx: &cairo::Context,
    bounds: &BoxData,
    extractor: Option<&dyn BackgroundImageExtractor>,
    effect: PixelEffect,
) {
    let Some(region) = bounds.complete() else {
        log::trace!("{:?} data is incomplete, giving up rendering", effect);
        return;
    };
    if region.2 == 0.0 || region.3 == 0.0 {
        log::trace!("{:?} region is empty, giving up rendering", effect);
        return;
    }
    let Some(extractor) = extractor else {
        log::trace!("{:?} has no background extractor, giving up rendering", effect);
        return;
    };

    effects::render_pixel_effect(ctx, extractor, region, effect);
}
