//! Utility functions for colors and annotation geometry.
//!
//! This module provides:
//! - Color name mapping used by the configuration system
//! - Drag-rectangle normalization shared by the box tools
//! - Arrowhead and ellipse geometry

use crate::draw::{Color, color::*};

/// A point in logical (CSS pixel) coordinates.
pub type Point = (f64, f64);

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

// ============================================================================
// Drag Geometry
// ============================================================================

/// Normalizes a drag from `anchor` to `current` into `(x, y, width, height)`.
///
/// The origin is the top-left corner and the size is never negative, whichever
/// direction the pointer moved.
pub fn normalize_rect(anchor: Point, current: Point) -> (f64, f64, f64, f64) {
    let x = anchor.0.min(current.0);
    let y = anchor.1.min(current.1);
    let width = (current.0 - anchor.0).abs();
    let height = (current.1 - anchor.1).abs();
    (x, y, width, height)
}

// ============================================================================
// Arrowhead Geometry
// ============================================================================

/// Calculates the two arrowhead barb endpoints at `end`.
///
/// The barbs spread `spread_radians` either side of the line direction
/// `atan2(dy, dx)` and are `size` units long. A zero-length line still yields
/// barbs (pointing along the positive X axis).
pub fn arrowhead_points(start: Point, end: Point, size: f64, spread_radians: f64) -> [Point; 2] {
    let angle = (end.1 - start.1).atan2(end.0 - start.0);
    let left = (
        end.0 - size * (angle - spread_radians).cos(),
        end.1 - size * (angle - spread_radians).sin(),
    );
    let right = (
        end.0 - size * (angle + spread_radians).cos(),
        end.1 - size * (angle + spread_radians).sin(),
    );
    [left, right]
}

// ============================================================================
// Ellipse Geometry
// ============================================================================

/// Approximates the ellipse inscribed in a bounding box with a polyline.
///
/// The angular step is `1 / max(rx, ry)`, so larger ellipses get more
/// samples. The first point is `(cx + rx, cy)`; the caller closes the path.
/// Degenerate boxes (both radii zero) yield only the start point.
pub fn ellipse_polyline(x: f64, y: f64, width: f64, height: f64) -> Vec<Point> {
    let rx = width / 2.0;
    let ry = height / 2.0;
    let cx = x + rx;
    let cy = y + ry;

    let mut points = vec![(cx + rx, cy)];
    let radius = rx.max(ry);
    if radius <= 0.0 {
        return points;
    }

    let step = 1.0 / radius;
    let mut angle = 0.0;
    while angle < std::f64::consts::TAU {
        points.push((cx + rx * angle.cos(), cy + ry * angle.sin()));
        angle += step;
    }
    points
}
