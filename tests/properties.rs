//! Property tests for hit testing and the particle pool

use glam::Vec2;
use proptest::prelude::*;
use tripl_vision::sim::{ParticleField, Rect, TargetZone, first_match, is_within};
use tripl_vision::Settings;

fn point() -> impl Strategy<Value = Vec2> {
    (-5000i32..5000, -5000i32..5000).prop_map(|(x, y)| Vec2::new(x as f32, y as f32))
}

proptest! {
    #[test]
    fn hit_test_is_translation_invariant(
        object in point(),
        target in point(),
        shift in point(),
        radius in 1i32..200,
    ) {
        let radius = radius as f32;
        prop_assert_eq!(
            is_within(object, target, radius),
            is_within(object + shift, target + shift, radius)
        );
    }

    #[test]
    fn zone_match_is_translation_invariant(
        eye in point(),
        left in -2000i32..2000,
        top in -2000i32..2000,
        shift in point(),
    ) {
        let bounds = Rect::new(left as f32, top as f32, 200.0, 250.0);
        let moved = Rect::new(bounds.left + shift.x, bounds.top + shift.y, 200.0, 250.0);
        let zones = TargetZone::pyramid_vertices(&bounds);
        let moved_zones = TargetZone::pyramid_vertices(&moved);

        let a = first_match(eye, &zones).map(|z| z.center + shift);
        let b = first_match(eye + shift, &moved_zones).map(|z| z.center);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn particle_life_stays_in_range(seed in any::<u64>(), ticks in 1usize..700) {
        let mut field = ParticleField::start(640.0, 480.0, &Settings::default(), seed);
        for _ in 0..ticks {
            field.tick();
            for p in field.particles() {
                prop_assert!(p.life > 0.0 && p.life <= 1.0);
            }
        }
        prop_assert_eq!(field.particles().len(), 150);
    }
}
