//! Color type and the fixed palette used by the weight display.

use serde::{Deserialize, Serialize};

/// RGBA color with alpha channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        )
    }

    /// Apply to Cairo context
    #[cfg(feature = "cairo")]
    pub fn apply_to_cairo(&self, cr: &cairo::Context) {
        cr.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// Fixed palette of the weight display
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb8(25, 35, 50);
    pub const VALUE: Color = Color::rgb8(255, 255, 255);
    pub const SHADOW: Color = Color::rgb8(0, 0, 0);
    pub const UNIT: Color = Color::rgb8(180, 180, 180);
    pub const BADGE: Color = Color::rgb8(50, 55, 65);
    pub const LABEL: Color = Color::rgb8(128, 128, 128);
    pub const FOOTER_BAR: Color = Color::rgb8(35, 45, 60);
    pub const FOOTER_TEXT: Color = Color::rgb8(100, 100, 100);
    pub const LIVE_DOT: Color = Color::rgb8(255, 0, 0);
    pub const LIVE_TEXT: Color = Color::rgb8(255, 255, 255);

    pub const STATUS_STABLE: Color = Color::rgb8(50, 255, 50);
    pub const STATUS_MOTION: Color = Color::rgb8(255, 255, 0);
    pub const STATUS_ERROR: Color = Color::rgb8(255, 50, 50);
    pub const STATUS_NO_DATA: Color = Color::rgb8(128, 128, 128);
}
