//! Custom cursors that preview the active tool's next stroke.
//!
//! The host hides the system pointer while a tool is active and draws
//! [`CustomCursor::render`] on top of the annotation layer instead.

use crate::draw::{BLACK, Color, FontDescriptor, RED, WHITE, text};
use crate::util::Point;

/// Cross-shaped cursor: the "+" inside a `width` x `height` box.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossHairStyle {
    pub stroke_width: f64,
    pub stroke_color: Color,
    pub width: f64,
    pub height: f64,
}

impl Default for CrossHairStyle {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            stroke_color: RED,
            width: 24.0,
            height: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleStyle {
    pub diameter: f64,
    pub stroke_width: f64,
    pub stroke_color: Color,
    pub fill_color: Color,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            diameter: 10.0,
            stroke_width: 0.0,
            stroke_color: RED,
            fill_color: RED,
        }
    }
}

/// Filled circle with a number in it, also used as the Number tool's stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleNumberStyle {
    pub num: u32,
    pub stroke_width: f64,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub font: FontDescriptor,
    pub font_size: f64,
    pub font_color: Color,
    /// Minimum gap between the digits and the circle edge
    pub padding: f64,
}

impl Default for CircleNumberStyle {
    fn default() -> Self {
        Self {
            num: 1,
            stroke_width: 0.0,
            stroke_color: RED,
            fill_color: RED,
            font: FontDescriptor::regular("Sans"),
            font_size: 16.0,
            font_color: WHITE,
            padding: 8.0,
        }
    }
}

impl CircleNumberStyle {
    /// `max(text width, text height) + 2 * padding`.
    pub fn diameter(&self) -> f64 {
        let label = self.num.to_string();
        let (width, height) = text::measure_text(&self.font, self.font_size, &label)
            .unwrap_or((self.font_size, self.font_size));
        width.max(height) + self.padding * 2.0
    }

    /// Renders the marker into a new image sized to its diameter.
    pub fn rasterize(&self) -> Result<cairo::ImageSurface, cairo::Error> {
        let diameter = self.diameter();
        let side = diameter.ceil().max(1.0) as i32;
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, side, side)?;
        {
            let ctx = cairo::Context::new(&surface)?;
            draw_circle_number(&ctx, self, 0.0, 0.0, diameter);
        }
        surface.flush();
        Ok(surface)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextCursorStyle {
    pub height: f64,
    pub color: Color,
}

impl Default for TextCursorStyle {
    fn default() -> Self {
        Self {
            height: 20.0,
            color: BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CursorShape {
    CrossHair(CrossHairStyle),
    Circle(CircleStyle),
    CircleNumber(CircleNumberStyle),
    Text(TextCursorStyle),
}

/// A tool's cursor: its shape plus where the pointer currently is.
///
/// Style changes go through the setters, which re-derive the shape's size
/// and bump [`CustomCursor::revision`] so the host knows to redraw it.
#[derive(Debug, Clone)]
pub struct CustomCursor {
    shape: CursorShape,
    size: (f64, f64),
    position: Option<Point>,
    active: bool,
    revision: u64,
}

impl CustomCursor {
    pub fn new(shape: CursorShape) -> Self {
        let mut cursor = Self {
            shape,
            size: (0.0, 0.0),
            position: None,
            active: false,
            revision: 0,
        };
        cursor.update_cursor_shape();
        cursor
    }

    pub fn cross_hair() -> Self {
        Self::new(CursorShape::CrossHair(CrossHairStyle::default()))
    }

    pub fn circle(style: CircleStyle) -> Self {
        Self::new(CursorShape::Circle(style))
    }

    pub fn circle_number() -> Self {
        Self::new(CursorShape::CircleNumber(CircleNumberStyle::default()))
    }

    pub fn text_cursor() -> Self {
        Self::new(CursorShape::Text(TextCursorStyle::default()))
    }

    pub fn shape(&self) -> &CursorShape {
        &self.shape
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.update_cursor_shape();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.position = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Tracks the pointer while the cursor is active.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        if self.active {
            self.position = Some((x, y));
        }
    }

    /// Pointer left the input surface: stop drawing the cursor.
    pub fn on_pointer_leave(&mut self) {
        self.position = None;
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Top-left corner of the shape, centred on the pointer.
    pub fn left_top(&self) -> Option<Point> {
        let (x, y) = self.position?;
        Some((x - self.size.0 / 2.0, y - self.size.1 / 2.0))
    }

    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ========================================================================
    // Style setters
    // ========================================================================

    pub fn set_stroke_width(&mut self, stroke_width: f64) {
        match &mut self.shape {
            CursorShape::CrossHair(style) => style.stroke_width = stroke_width,
            CursorShape::Circle(style) => style.stroke_width = stroke_width,
            CursorShape::CircleNumber(style) => style.stroke_width = stroke_width,
            CursorShape::Text(_) => return,
        }
        self.update_cursor_shape();
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        match &mut self.shape {
            CursorShape::CrossHair(style) => style.stroke_color = color,
            CursorShape::Circle(style) => style.stroke_color = color,
            CursorShape::CircleNumber(style) => style.stroke_color = color,
            CursorShape::Text(style) => style.color = color,
        }
        self.update_cursor_shape();
    }

    pub fn set_diameter(&mut self, diameter: f64) {
        if let CursorShape::Circle(style) = &mut self.shape {
            style.diameter = diameter;
            self.update_cursor_shape();
        }
    }

    pub fn set_number(&mut self, num: u32) {
        if let CursorShape::CircleNumber(style) = &mut self.shape {
            style.num = num;
            self.update_cursor_shape();
        }
    }

    pub fn set_text_height(&mut self, height: f64) {
        if let CursorShape::Text(style) = &mut self.shape {
            style.height = height;
            self.update_cursor_shape();
        }
    }

    /// Re-derives the cursor's size from its style and marks it for redraw.
    pub fn update_cursor_shape(&mut self) {
        self.size = match &self.shape {
            CursorShape::CrossHair(style) => (style.width, style.height),
            CursorShape::Circle(style) => (style.diameter, style.diameter),
            CursorShape::CircleNumber(style) => {
                let diameter = style.diameter();
                (diameter, diameter)
            }
            CursorShape::Text(style) => (TEXT_CURSOR_WIDTH, style.height),
        };
        self.revision += 1;
        log::trace!(
            "Cursor shape updated to {:.1}x{:.1} (revision {})",
            self.size.0,
            self.size.1,
            self.revision
        );
    }

    /// Draws the cursor at the pointer. Does nothing while the pointer is
    /// off the surface.
    pub fn render(&self, ctx: &cairo::Context) {
        let Some((left, top)) = self.left_top() else {
            return;
        };
        let (width, height) = self.size;

        ctx.save().ok();
        match &self.shape {
            CursorShape::CrossHair(style) => {
                style.stroke_color.apply_to(ctx);
                ctx.set_line_width(style.stroke_width);
                ctx.move_to(left, top + height / 2.0);
                ctx.line_to(left + width, top + height / 2.0);
                ctx.move_to(left + width / 2.0, top);
                ctx.line_to(left + width / 2.0, top + height);
                let _ = ctx.stroke();
            }
            CursorShape::Circle(style) => {
                draw_circle(
                    ctx,
                    left,
                    top,
                    style.diameter,
                    style.fill_color,
                    style.stroke_width,
                    style.stroke_color,
                );
            }
            CursorShape::CircleNumber(style) => {
                draw_circle_number(ctx, style, left, top, width);
            }
            CursorShape::Text(style) => {
                style.color.apply_to(ctx);
                ctx.set_line_width(TEXT_CURSOR_WIDTH);
                ctx.move_to(left + width / 2.0, top);
                ctx.line_to(left + width / 2.0, top + height);
                let _ = ctx.stroke();
            }
        }
        ctx.restore().ok();
    }
}

const TEXT_CURSOR_WIDTH: f64 = 2.0;

fn draw_circle(
    ctx: &cairo::Context,
    left: f64,
    top: f64,
    diameter: f64,
    fill: Color,
    stroke_width: f64,
    stroke: Color,
) {
    let radius = diameter / 2.0;
    ctx.new_path();
    ctx.arc(
        left + radius,
        top + radius,
        radius,
        0.0,
        std::f64::consts::TAU,
    );
    fill.apply_to(ctx);
    if stroke_width > 0.0 {
        let _ = ctx.fill_preserve();
        stroke.apply_to(ctx);
        ctx.set_line_width(stroke_width);
        let _ = ctx.stroke();
    } else {
        let _ = ctx.fill();
    }
}

fn draw_circle_number(
    ctx: &cairo::Context,
    style: &CircleNumberStyle,
    left: f64,
    top: f64,
    diameter: f64,
) {
    draw_circle(
        ctx,
        left,
        top,
        diameter,
        style.fill_color,
        style.stroke_width,
        style.stroke_color,
    );

    let label = style.num.to_string();
    let layout = text::create_layout(ctx, Some(&style.font), Some(style.font_size));
    let (text_width, text_height) = text::layout_size(&layout, &label);
    let radius = diameter / 2.0;
    style.font_color.apply_to(ctx);
    ctx.move_to(
        left + radius - text_width / 2.0,
        top + radius - text_height / 2.0,
    );
    pangocairo::functions::show_layout(ctx, &layout);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::effects::PixelBlock;

    #[test]
    fn cross_hair_is_centred_on_pointer() {
        let mut cursor = CustomCursor::cross_hair();
        assert_eq!(cursor.size(), (24.0, 24.0));

        cursor.on_pointer_move(100.0, 50.0);
        assert_eq!(cursor.left_top(), None, "inactive cursors do not track");

        cursor.activate();
        cursor.on_pointer_move(100.0, 50.0);
        assert_eq!(cursor.left_top(), Some((88.0, 38.0)));

        cursor.on_pointer_leave();
        assert_eq!(cursor.left_top(), None);
    }

    #[test]
    fn setters_bump_revision() {
        let mut cursor = CustomCursor::circle(CircleStyle::default());
        let before = cursor.revision();
        cursor.set_diameter(30.0);
        assert_eq!(cursor.size(), (30.0, 30.0));
        assert!(cursor.revision() > before);

        // Not a text cursor: ignored
        let revision = cursor.revision();
        cursor.set_text_height(40.0);
        assert_eq!(cursor.revision(), revision);
    }

    #[test]
    fn circle_number_grows_with_digits() {
        let mut cursor = CustomCursor::circle_number();
        let one_digit = cursor.size().0;
        assert!(one_digit > 16.0);

        cursor.set_number(100);
        assert!(cursor.size().0 > one_digit);
    }

    #[test]
    fn rasterized_number_matches_diameter() {
        let style = CircleNumberStyle::default();
        let image = style.rasterize().expect("rasterize");
        let side = style.diameter().ceil() as i32;
        assert_eq!((image.width(), image.height()), (side, side));

        // Edge of the fill is red, corner outside the circle is empty
        let block = PixelBlock::read_from(&image, 0, 0, side, side).expect("pixels");
        let middle_left = block.pixel(1, side as u32 / 2);
        assert_eq!(middle_left[0], 255);
        assert_eq!(block.pixel(0, 0)[3], 0);
    }

    #[test]
    fn render_draws_at_pointer() {
        let surface =
            cairo::ImageSurface::create(cairo::Format::ARgb32, 64, 64).expect("surface");
        let ctx = cairo::Context::new(&surface).expect("context");

        let mut cursor = CustomCursor::cross_hair();
        cursor.activate();
        cursor.set_stroke_width(2.0);
        cursor.on_pointer_move(32.0, 32.0);
        cursor.render(&ctx);
        drop(ctx);

        let block = PixelBlock::read_from(&surface, 0, 0, 64, 64).expect("pixels");
        assert_eq!(block.pixel(40, 32), [255, 0, 0, 255]);
        assert_eq!(block.pixel(40, 40)[3], 0);
    }
}
