//! Draw command generation for the particle background

use glam::Vec2;

use super::color::{Color, colors};
use crate::consts::*;
use crate::sim::collision::Rect;
use crate::sim::{Particle, ParticleField};

/// One primitive the surface knows how to paint
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color },
    Line { from: Vec2, to: Vec2, color: Color, width: f32 },
    /// Radial gradient from `color` at the center to transparent at
    /// `gradient_radius`, painted into a disc of `disc_radius`
    Glow {
        center: Vec2,
        color: Color,
        gradient_radius: f32,
        disc_radius: f32,
    },
}

/// Full frame: fade, scanlines, particles, then the glitch band
pub fn compose(field: &ParticleField) -> Vec<DrawCommand> {
    let size = field.size();
    let mut commands = Vec::with_capacity(field.particles().len() + (size.y / SCANLINE_SPACING) as usize + 2);

    commands.push(DrawCommand::FillRect {
        rect: Rect::new(0.0, 0.0, size.x, size.y),
        color: colors::FADE,
    });

    if field.scanlines() {
        commands.extend(scanlines(size));
    }

    commands.extend(field.particles().iter().map(glow));

    if let Some(band) = field.glitch() {
        commands.push(DrawCommand::FillRect {
            rect: Rect::new(0.0, band.y, size.x, band.height),
            color: colors::GLITCH.with_alpha(band.opacity),
        });
    }

    commands
}

/// Horizontal lines every `SCANLINE_SPACING` pixels, starting at the top
pub fn scanlines(size: Vec2) -> impl Iterator<Item = DrawCommand> {
    let count = (size.y / SCANLINE_SPACING).ceil().max(0.0) as u32;
    (0..count).map(move |i| {
        let y = i as f32 * SCANLINE_SPACING;
        DrawCommand::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(size.x, y),
            color: colors::SCANLINE,
            width: 1.0,
        }
    })
}

/// Soft glow whose opacity follows the particle's remaining life
pub fn glow(particle: &Particle) -> DrawCommand {
    DrawCommand::Glow {
        center: particle.pos,
        color: Color::hue(particle.hue, particle.alpha()),
        gradient_radius: GLOW_RADIUS,
        disc_radius: GLOW_DISC_RADIUS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_compose_layers_in_order() {
        let settings = Settings {
            glitch: false,
            ..Default::default()
        };
        let field = ParticleField::start(100.0, 40.0, &settings, 11);
        let commands = compose(&field);

        // fade + 10 scanlines + 150 glows
        assert_eq!(commands.len(), 1 + 10 + PARTICLE_COUNT);
        assert!(matches!(commands[0], DrawCommand::FillRect { color, .. } if color == colors::FADE));
        assert!(commands[1..11].iter().all(|c| matches!(c, DrawCommand::Line { .. })));
        assert!(commands[11..].iter().all(|c| matches!(c, DrawCommand::Glow { .. })));
    }

    #[test]
    fn test_scanline_positions() {
        let lines: Vec<_> = scanlines(Vec2::new(50.0, 10.0)).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[2],
            DrawCommand::Line {
                from: Vec2::new(0.0, 8.0),
                to: Vec2::new(50.0, 8.0),
                color: colors::SCANLINE,
                width: 1.0,
            }
        );
    }

    #[test]
    fn test_glow_alpha_follows_life() {
        let p = Particle {
            pos: Vec2::new(5.0, 6.0),
            vel: Vec2::ZERO,
            life: 0.6,
            hue: 210.0,
        };
        match glow(&p) {
            DrawCommand::Glow { center, color, .. } => {
                assert_eq!(center, p.pos);
                assert!((color.alpha() - 0.3).abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_glitch_band_drawn_last() {
        let mut field = ParticleField::start(100.0, 100.0, &Settings::default(), 8);
        let mut seen = false;
        for _ in 0..1000 {
            field.tick();
            if let Some(band) = field.glitch() {
                let commands = compose(&field);
                assert_eq!(
                    commands.last(),
                    Some(&DrawCommand::FillRect {
                        rect: Rect::new(0.0, band.y, 100.0, band.height),
                        color: colors::GLITCH.with_alpha(band.opacity),
                    })
                );
                seen = true;
                break;
            }
        }
        assert!(seen);
    }
}
