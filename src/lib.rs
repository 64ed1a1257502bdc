//! Tripl Vision - a layered narrative puzzle
//!
//! Core modules:
//! - `sim`: Interaction core (particles, drag, collisions, stage machine)
//! - `renderer`: Draw command composition and 2D canvas backend
//! - `content`: Static text tables for each stage
//! - `settings`: Tunable constants with serde defaults

pub mod content;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{Action, App, AppEvent, Stage};

/// Application configuration constants
pub mod consts {
    /// Particle pool size
    pub const PARTICLE_COUNT: usize = 150;
    /// Life lost per animation frame (~500 frame lifetime)
    pub const PARTICLE_DECAY: f32 = 0.002;
    /// Max absolute velocity per axis (px/frame)
    pub const PARTICLE_MAX_SPEED: f32 = 0.25;
    /// Hue band start (degrees)
    pub const PARTICLE_HUE_MIN: f32 = 180.0;
    /// Hue band width (degrees)
    pub const PARTICLE_HUE_SPAN: f32 = 60.0;
    /// Outer radius of the glow gradient
    pub const GLOW_RADIUS: f32 = 20.0;
    /// Radius of the disc the glow is painted into
    pub const GLOW_DISC_RADIUS: f32 = 10.0;

    /// Vertical distance between scanlines
    pub const SCANLINE_SPACING: f32 = 4.0;
    /// Chance of a glitch band per frame
    pub const GLITCH_CHANCE: f64 = 0.05;
    /// Glitch band height range (px)
    pub const GLITCH_MIN_HEIGHT: f32 = 50.0;
    pub const GLITCH_MAX_HEIGHT: f32 = 150.0;
    /// Glitch band opacity upper bound (exclusive)
    pub const GLITCH_MAX_OPACITY: f32 = 0.1;

    /// Eye widget edge length (px); positions are top-left anchored
    pub const EYE_SIZE: f32 = 50.0;
    pub const EYE_HALF_SIZE: f32 = EYE_SIZE / 2.0;
    /// Number of eyes in the puzzle
    pub const EYE_COUNT: usize = 3;
    /// Acceptance radius of each pyramid vertex
    pub const TARGET_RADIUS: f32 = 40.0;
    /// Horizontal offset of the base vertices from the pyramid center
    pub const TARGET_BASE_SPREAD: f32 = 80.0;
    /// Vertical offset of the apex above the pyramid center
    pub const TARGET_APEX_RISE: f32 = 80.0;
    /// Vertical offset of the base vertices below the pyramid center
    pub const TARGET_BASE_DROP: f32 = 60.0;

    /// Delay between the last placement and the puzzle completing (ms)
    pub const SETTLE_DELAY_MS: f64 = 300.0;

    /// Modulus applied to the found element sum
    pub const CIPHER_MODULUS: u32 = 256;
    /// Modulus applied to the unix time seed of the completion code
    pub const CODE_SEED_MODULUS: u64 = 100_000;
}
