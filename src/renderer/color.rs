//! Colors as the canvas understands them

use std::fmt;

/// A CSS color
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgba { r: u8, g: u8, b: u8, a: f32 },
    /// Fully saturated, mid lightness
    Hue { h: f32, a: f32 },
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Color::Rgba { r, g, b, a }
    }

    pub const fn hue(h: f32, a: f32) -> Self {
        Color::Hue { h, a }
    }

    pub fn alpha(&self) -> f32 {
        match self {
            Color::Rgba { a, .. } | Color::Hue { a, .. } => *a,
        }
    }

    /// Same color, different opacity
    pub fn with_alpha(self, a: f32) -> Self {
        match self {
            Color::Rgba { r, g, b, .. } => Color::Rgba { r, g, b, a },
            Color::Hue { h, .. } => Color::Hue { h, a },
        }
    }

    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgba { r, g, b, a } => write!(f, "rgba({r}, {g}, {b}, {a})"),
            Color::Hue { h, a } => write!(f, "hsla({h}, 100%, 50%, {a})"),
        }
    }
}

/// Background palette
pub mod colors {
    use super::Color;

    /// Translucent wash that leaves particle trails behind
    pub const FADE: Color = Color::rgba(10, 10, 20, 0.1);
    pub const SCANLINE: Color = Color::rgba(0, 255, 200, 0.03);
    /// Glitch band base; alpha is rolled per band
    pub const GLITCH: Color = Color::rgba(255, 0, 100, 0.0);
}
