//! Zoom stepping and the transient zoom-percentage tip.

use std::time::{Duration, Instant};

/// Ratio change per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;

/// How long the percentage tip stays up after the last zoom.
pub const ZOOM_TIP_DURATION: Duration = Duration::from_millis(1000);

const RATIO_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// One notch per wheel event: scrolling up zooms in. A zero delta is no
    /// zoom at all.
    pub fn from_wheel_delta(delta_y: f64) -> Option<Self> {
        if delta_y < 0.0 {
            Some(ZoomDirection::In)
        } else if delta_y > 0.0 {
            Some(ZoomDirection::Out)
        } else {
            None
        }
    }
}

/// Surface size after a zoom, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomResult {
    pub width: f64,
    pub height: f64,
    pub scaling_ratio: f64,
}

/// A single notch: the new absolute ratio and the relative ratio to apply to
/// graph geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomStep {
    pub scaling_ratio: f64,
    pub graph_ratio: f64,
}

/// Computes one zoom notch from `current`.
///
/// Graphs store absolute coordinates, so they are scaled by the ratio between
/// the new and previous zoom factors. Returns `None` when zooming out would
/// drop below one step.
pub fn step(current: f64, direction: ZoomDirection) -> Option<ZoomStep> {
    match direction {
        ZoomDirection::In => {
            let scaling_ratio = current + ZOOM_STEP;
            Some(ZoomStep {
                scaling_ratio,
                graph_ratio: scaling_ratio / (scaling_ratio - ZOOM_STEP),
            })
        }
        ZoomDirection::Out => {
            let scaling_ratio = current - ZOOM_STEP;
            if scaling_ratio < ZOOM_STEP - RATIO_EPSILON {
                return None;
            }
            Some(ZoomStep {
                scaling_ratio,
                graph_ratio: scaling_ratio / (scaling_ratio + ZOOM_STEP),
            })
        }
    }
}

/// Formats a ratio as the tip text, e.g. `1.1` -> `"110%"`.
pub fn percentage_text(scaling_ratio: f64) -> String {
    format!("{:.0}%", scaling_ratio * 100.0)
}

/// Transient "110%" indicator.
///
/// Each zoom replaces the text and pushes the hide deadline out again.
#[derive(Debug, Default)]
pub struct ZoomTip {
    text: String,
    hide_at: Option<Instant>,
}

impl ZoomTip {
    pub fn show(&mut self, text: String, now: Instant) {
        self.text = text;
        self.hide_at = Some(now + ZOOM_TIP_DURATION);
    }

    /// Text to display at `now`, if the tip has not expired.
    pub fn visible_text(&self, now: Instant) -> Option<&str> {
        match self.hide_at {
            Some(hide_at) if now < hide_at => Some(&self.text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_delta_sign_picks_direction() {
        assert_eq!(ZoomDirection::from_wheel_delta(-120.0), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_wheel_delta(0.5), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_wheel_delta(0.0), None);
    }

    #[test]
    fn in_then_out_round_trips() {
        let zoom_in = step(1.0, ZoomDirection::In).expect("zoom in");
        let zoom_out = step(zoom_in.scaling_ratio, ZoomDirection::Out).expect("zoom out");

        assert!((zoom_out.scaling_ratio - 1.0).abs() < 1e-9);
        assert!((zoom_in.graph_ratio * zoom_out.graph_ratio - 1.0).abs() < 1e-9);
        assert!((zoom_in.graph_ratio - 1.1).abs() < 1e-9);
    }

    #[test]
    fn graph_ratio_is_relative_to_previous_ratio() {
        let first = step(1.0, ZoomDirection::In).expect("first");
        let second = step(first.scaling_ratio, ZoomDirection::In).expect("second");
        // 1.2 / 1.1, not 1.2
        assert!((second.graph_ratio - 1.2 / 1.1).abs() < 1e-9);
        assert!((first.graph_ratio * second.graph_ratio - 1.2).abs() < 1e-9);
    }

    #[test]
    fn zoom_out_stops_at_one_step() {
        let mut ratio = 1.0;
        let mut steps = 0;
        while let Some(next) = step(ratio, ZoomDirection::Out) {
            ratio = next.scaling_ratio;
            steps += 1;
        }
        assert_eq!(steps, 9);
        assert!((ratio - ZOOM_STEP).abs() < 1e-9);
    }

    #[test]
    fn tip_expires_and_is_replaced() {
        let start = Instant::now();
        let mut tip = ZoomTip::default();
        assert_eq!(tip.visible_text(start), None);

        tip.show(percentage_text(1.1), start);
        assert_eq!(tip.visible_text(start), Some("110%"));

        let later = start + Duration::from_millis(800);
        tip.show(percentage_text(1.2), later);
        assert_eq!(
            tip.visible_text(start + Duration::from_millis(1500)),
            Some("120%")
        );
        assert_eq!(tip.visible_text(later + ZOOM_TIP_DURATION), None);
    }
}
