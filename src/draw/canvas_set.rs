//! Layered drawing surfaces for the compositor.

use super::renderer::RenderError;

/// One Cairo surface plus its context, sized in logical pixels.
///
/// The backing surface is `logical size * device_pixel_ratio` device pixels
/// and the context is pre-scaled by the ratio, so callers draw in logical
/// coordinates.
pub struct Canvas {
    surface: cairo::ImageSurface,
    ctx: cairo::Context,
    logical_width: f64,
    logical_height: f64,
    device_pixel_ratio: f64,
}

impl Canvas {
    pub fn new(
        logical_width: f64,
        logical_height: f64,
        device_pixel_ratio: f64,
    ) -> Result<Self, RenderError> {
        let (surface, ctx) = create_surface(logical_width, logical_height, device_pixel_ratio)?;
        Ok(Self {
            surface,
            ctx,
            logical_width,
            logical_height,
            device_pixel_ratio,
        })
    }

    /// Reallocates the surface at a new logical size.
    ///
    /// Content is discarded and the device-pixel-ratio scale is set up again
    /// on the fresh context.
    pub fn resize(&mut self, logical_width: f64, logical_height: f64) -> Result<(), RenderError> {
        let (surface, ctx) =
            create_surface(logical_width, logical_height, self.device_pixel_ratio)?;
        self.surface = surface;
        self.ctx = ctx;
        self.logical_width = logical_width;
        self.logical_height = logical_height;
        log::debug!(
            "Canvas resized to {:.1}x{:.1} logical ({}x{} device)",
            logical_width,
            logical_height,
            self.surface.width(),
            self.surface.height()
        );
        Ok(())
    }

    /// Clears the whole surface to transparent.
    pub fn clear(&self) {
        self.ctx.save().ok();
        self.ctx.set_operator(cairo::Operator::Clear);
        let _ = self.ctx.paint();
        self.ctx.restore().ok();
    }

    pub fn context(&self) -> &cairo::Context {
        &self.ctx
    }

    pub fn surface(&self) -> &cairo::ImageSurface {
        &self.surface
    }

    pub fn logical_size(&self) -> (f64, f64) {
        (self.logical_width, self.logical_height)
    }

    pub fn device_size(&self) -> (i32, i32) {
        (self.surface.width(), self.surface.height())
    }
}

fn create_surface(
    logical_width: f64,
    logical_height: f64,
    device_pixel_ratio: f64,
) -> Result<(cairo::ImageSurface, cairo::Context), RenderError> {
    let width = (logical_width * device_pixel_ratio).round().max(1.0) as i32;
    let height = (logical_height * device_pixel_ratio).round().max(1.0) as i32;
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
    let ctx = cairo::Context::new(&surface)?;
    ctx.scale(device_pixel_ratio, device_pixel_ratio);
    // Canvas-style defaults: 1px black strokes
    ctx.set_line_width(1.0);
    ctx.set_source_rgba(0.0, 0.0, 0.0, 1.0);
    Ok((surface, ctx))
}

/// The three surfaces the renderer composites.
///
/// - `background`: the screenshot being annotated
/// - `annotation`: committed graphs, redrawn on every change
/// - `merge`: background + annotations flattened for export
pub struct CanvasSet {
    pub background: Canvas,
    pub annotation: Canvas,
    pub merge: Canvas,
}

impl CanvasSet {
    pub fn new(
        logical_width: f64,
        logical_height: f64,
        device_pixel_ratio: f64,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            background: Canvas::new(logical_width, logical_height, device_pixel_ratio)?,
            annotation: Canvas::new(logical_width, logical_height, device_pixel_ratio)?,
            merge: Canvas::new(logical_width, logical_height, device_pixel_ratio)?,
        })
    }

    /// Resizes every surface to the same logical size.
    pub fn resize_all(&mut self, logical_width: f64, logical_height: f64) -> Result<(), RenderError> {
        self.background.resize(logical_width, logical_height)?;
        self.annotation.resize(logical_width, logical_height)?;
        self.merge.resize(logical_width, logical_height)?;
        Ok(())
    }

    pub fn logical_size(&self) -> (f64, f64) {
        self.background.logical_size()
    }
}
