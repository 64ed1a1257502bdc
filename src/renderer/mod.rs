//! Background rendering
//!
//! `compose` turns the particle field into draw commands; a `Surface`
//! replays them. The browser surface is a 2D canvas.

pub mod color;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use color::{Color, colors};
pub use shapes::{DrawCommand, compose};

use crate::sim::ParticleField;

/// Anything that can paint draw commands
pub trait Surface {
    fn draw(&mut self, command: &DrawCommand);
}

/// Collects commands instead of painting them
#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<DrawCommand>,
}

impl Surface for Recorder {
    fn draw(&mut self, command: &DrawCommand) {
        self.commands.push(command.clone());
    }
}

/// Paint one frame. Without a surface this does nothing.
pub fn render<S: Surface>(field: &ParticleField, surface: Option<&mut S>) {
    let Some(surface) = surface else {
        return;
    };
    for command in compose(field) {
        surface.draw(&command);
    }
}
