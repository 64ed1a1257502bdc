//! Background particle field
//!
//! A fixed pool of glowing particles that drift, fade out and respawn in
//! place. The field only computes state; `renderer::compose` turns it into
//! draw commands.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;

/// A single background particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases every tick
    pub life: f32,
    /// Degrees, within the cyan/blue band
    pub hue: f32,
}

impl Particle {
    /// Fresh particle at a random spot in the viewport
    fn spawn(rng: &mut Pcg32, size: Vec2, life: f32) -> Self {
        Self {
            pos: Vec2::new(rng.random::<f32>() * size.x, rng.random::<f32>() * size.y),
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
                (rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
            ),
            life,
            hue: PARTICLE_HUE_MIN + rng.random::<f32>() * PARTICLE_HUE_SPAN,
        }
    }

    /// Glow opacity, proportional to remaining life
    pub fn alpha(&self) -> f32 {
        self.life * 0.5
    }
}

/// Horizontal flash band drawn over the whole width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlitchBand {
    pub y: f32,
    pub height: f32,
    pub opacity: f32,
}

/// Particle pool plus the per-frame ambient effects
#[derive(Debug, Clone)]
pub struct ParticleField {
    size: Vec2,
    particles: Vec<Particle>,
    /// Glitch band rolled on the most recent tick
    glitch: Option<GlitchBand>,
    glitch_chance: f64,
    scanlines: bool,
    frame: u64,
    rng: Pcg32,
}

impl ParticleField {
    /// Seed a new pool sized to the viewport
    pub fn start(width: f32, height: f32, settings: &Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let size = Vec2::new(width.max(0.0), height.max(0.0));
        let particles = (0..PARTICLE_COUNT)
            .map(|_| {
                let life = rng.random::<f32>();
                Particle::spawn(&mut rng, size, life)
            })
            .collect();

        log::debug!(
            "Particle field started: {}x{}, {} particles, seed {}",
            size.x,
            size.y,
            PARTICLE_COUNT,
            seed
        );

        Self {
            size,
            particles,
            glitch: None,
            glitch_chance: if settings.effective_glitch() {
                settings.glitch_chance.clamp(0.0, 1.0)
            } else {
                0.0
            },
            scanlines: settings.scanlines,
            frame: 0,
            rng,
        }
    }

    /// Advance one animation frame
    pub fn tick(&mut self) {
        self.frame += 1;

        for particle in self.particles.iter_mut() {
            particle.life -= PARTICLE_DECAY;
            if particle.life <= 0.0 {
                *particle = Particle::spawn(&mut self.rng, self.size, 1.0);
            }
            particle.pos += particle.vel;
        }

        self.glitch = if self.glitch_chance > 0.0 && self.rng.random_bool(self.glitch_chance) {
            Some(GlitchBand {
                y: self.rng.random::<f32>() * self.size.y,
                height: GLITCH_MIN_HEIGHT
                    + self.rng.random::<f32>() * (GLITCH_MAX_HEIGHT - GLITCH_MIN_HEIGHT),
                opacity: self.rng.random::<f32>() * GLITCH_MAX_OPACITY,
            })
        } else {
            None
        };
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn glitch(&self) -> Option<GlitchBand> {
        self.glitch
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn scanlines(&self) -> bool {
        self.scanlines
    }

    /// Frames ticked since start
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: u64) -> ParticleField {
        ParticleField::start(800.0, 600.0, &Settings::default(), seed)
    }

    #[test]
    fn test_start_pool() {
        let f = field(7);
        assert_eq!(f.particles().len(), PARTICLE_COUNT);
        for p in f.particles() {
            assert!(p.pos.x >= 0.0 && p.pos.x <= 800.0);
            assert!(p.pos.y >= 0.0 && p.pos.y <= 600.0);
            assert!(p.vel.x.abs() <= PARTICLE_MAX_SPEED);
            assert!(p.vel.y.abs() <= PARTICLE_MAX_SPEED);
            assert!((0.0..1.0).contains(&p.life));
            assert!((PARTICLE_HUE_MIN..PARTICLE_HUE_MIN + PARTICLE_HUE_SPAN).contains(&p.hue));
        }
    }

    #[test]
    fn test_tick_decays_and_moves() {
        let mut f = field(1);
        f.particles_mut()[0] = Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(0.25, -0.25),
            life: 0.5,
            hue: 200.0,
        };
        f.tick();
        let p = &f.particles()[0];
        assert!((p.life - 0.498).abs() < 1e-6);
        assert_eq!(p.pos, Vec2::new(10.25, 9.75));
        assert_eq!(f.frame(), 1);
    }

    #[test]
    fn test_dead_particle_respawns_same_tick() {
        let mut f = field(2);
        f.particles_mut()[3].life = 0.001;
        f.particles_mut()[4].life = 0.0;
        f.tick();
        assert_eq!(f.particles()[3].life, 1.0);
        assert_eq!(f.particles()[4].life, 1.0);
        assert_eq!(f.particles().len(), PARTICLE_COUNT);
    }

    #[test]
    fn test_life_bounds_over_many_ticks() {
        let mut f = field(3);
        for _ in 0..1200 {
            f.tick();
            assert!(f.particles().iter().all(|p| p.life > 0.0 && p.life <= 1.0));
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let mut a = field(99);
        let mut b = field(99);
        for _ in 0..50 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.glitch(), b.glitch());
    }

    #[test]
    fn test_glitch_rolls_occasionally() {
        let mut f = field(5);
        let mut hits = 0;
        for _ in 0..2000 {
            f.tick();
            if let Some(band) = f.glitch() {
                hits += 1;
                assert!(band.y >= 0.0 && band.y <= 600.0);
                assert!(band.height >= GLITCH_MIN_HEIGHT && band.height <= GLITCH_MAX_HEIGHT);
                assert!(band.opacity >= 0.0 && band.opacity <= GLITCH_MAX_OPACITY);
            }
        }
        // ~5% of 2000
        assert!(hits > 40 && hits < 200, "unexpected glitch count {hits}");
    }

    #[test]
    fn test_reduced_motion_disables_glitch() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let mut f = ParticleField::start(800.0, 600.0, &settings, 5);
        for _ in 0..500 {
            f.tick();
            assert!(f.glitch().is_none());
        }
    }

    #[test]
    fn test_zero_viewport() {
        let mut f = ParticleField::start(0.0, 0.0, &Settings::default(), 4);
        f.tick();
        assert_eq!(f.particles().len(), PARTICLE_COUNT);
    }
}
