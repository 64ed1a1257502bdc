//! Interaction core
//!
//! Everything that changes state lives here. This module must stay free of
//! browser and rendering dependencies:
//! - Time comes in through `Clock`
//! - Randomness comes from seeded `Pcg32` only
//! - Stage changes go through `App` only

pub mod app;
pub mod collision;
pub mod drag;
pub mod narrative;
pub mod particles;
pub mod puzzle;
pub mod timer;

pub use app::{Action, App, AppEvent, Clock};
pub use collision::{Rect, TargetZone, distance, first_match, is_within, object_center};
pub use drag::DragController;
pub use narrative::{Narrative, Stage, Transition, TransitionError, Trigger, completion_code};
pub use particles::{GlitchBand, Particle, ParticleField};
pub use puzzle::{Eye, PuzzleEvent, PuzzleState};
pub use timer::Deferred;
