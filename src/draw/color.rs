//! RGBA color type and predefined color constants.

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use snapscribe::draw::Color;
/// let red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
/// let translucent = red.with_alpha(0.3);
/// assert_eq!(translucent.a, 0.3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha (marker pen translucency).
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Sets this color as the Cairo source.
    pub fn apply_to(&self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

/// Predefined red color, the default annotation stroke
pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Predefined green color
pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);

/// Predefined blue color
pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

/// Predefined yellow color
pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0, 1.0);

/// Predefined orange color
pub const ORANGE: Color = Color::new(1.0, 0.5, 0.0, 1.0);

/// Predefined pink/magenta color
pub const PINK: Color = Color::new(1.0, 0.0, 1.0, 1.0);

/// Predefined white color, used for numbered-marker digits
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Predefined black color, the default text color
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// Fully transparent color (cursor fill when none is set)
pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
