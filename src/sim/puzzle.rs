//! Pyramid assembly puzzle
//!
//! Three eyes must be dragged onto the three pyramid vertices. Placement is
//! recomputed from scratch on every release; once every eye sits on a vertex
//! the completion is deferred by the settle delay and then fires once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, TargetZone, first_match};
use super::drag::DragController;
use super::timer::Deferred;

/// A draggable eye (top-left anchored)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eye {
    pub id: u32,
    pub pos: Vec2,
    pub placed: bool,
}

impl Eye {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
            placed: false,
        }
    }

    /// The starting layout of a fresh puzzle
    pub fn initial_set() -> Vec<Eye> {
        vec![
            Eye::new(1, 50.0, 50.0),
            Eye::new(2, 150.0, 100.0),
            Eye::new(3, 250.0, 50.0),
        ]
    }
}

/// Things the puzzle reports back to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum PuzzleEvent {
    Placed(u32),
    Unplaced(u32),
    CompletionScheduled { due_ms: f64 },
    CompletionCancelled,
}

/// Puzzle state; lives only while the puzzle stage is shown
#[derive(Debug, Clone)]
pub struct PuzzleState {
    eyes: Vec<Eye>,
    drag: DragController,
    completion: Deferred,
    settle_delay_ms: f64,
}

impl PuzzleState {
    pub fn new(settle_delay_ms: f64) -> Self {
        Self {
            eyes: Eye::initial_set(),
            drag: DragController::new(),
            completion: Deferred::default(),
            settle_delay_ms,
        }
    }

    pub fn eyes(&self) -> &[Eye] {
        &self.eyes
    }

    pub fn grabbed(&self) -> Option<u32> {
        self.drag.grabbed()
    }

    pub fn all_placed(&self) -> bool {
        self.eyes.iter().all(|e| e.placed)
    }

    /// True once the completion has fired
    pub fn is_solved(&self) -> bool {
        self.completion.has_fired()
    }

    pub fn completion_pending(&self) -> bool {
        self.completion.is_pending()
    }

    pub fn grab(&mut self, id: u32) -> bool {
        if self.is_solved() {
            return false;
        }
        self.drag.grab(id, &self.eyes)
    }

    pub fn pointer_move(&mut self, pointer: Vec2) {
        self.drag.move_to(pointer, &mut self.eyes);
    }

    /// Drop the held eye and evaluate once. Nothing happens if no eye was
    /// held or the pyramid hasn't been laid out yet.
    pub fn release(&mut self, bounds: Option<&Rect>, now_ms: f64) -> Vec<PuzzleEvent> {
        let Some(id) = self.drag.release() else {
            return Vec::new();
        };
        log::debug!("Released eye {}", id);
        match bounds {
            Some(bounds) => self.evaluate_collisions(bounds, now_ms),
            None => {
                log::debug!("Pyramid bounds unknown, skipping collision check");
                Vec::new()
            }
        }
    }

    /// Test every eye against every vertex and snap the matches
    pub fn evaluate_collisions(&mut self, bounds: &Rect, now_ms: f64) -> Vec<PuzzleEvent> {
        if self.is_solved() {
            return Vec::new();
        }

        let zones = TargetZone::pyramid_vertices(bounds);
        let mut events = Vec::new();

        for eye in self.eyes.iter_mut() {
            let was_placed = eye.placed;
            match first_match(eye.pos, &zones) {
                Some(zone) => {
                    eye.pos = zone.snap_position();
                    eye.placed = true;
                }
                None => eye.placed = false,
            }
            if eye.placed != was_placed {
                log::debug!("Eye {} placed: {}", eye.id, eye.placed);
                events.push(if eye.placed {
                    PuzzleEvent::Placed(eye.id)
                } else {
                    PuzzleEvent::Unplaced(eye.id)
                });
            }
        }

        if self.all_placed() {
            if self.completion.schedule(now_ms, self.settle_delay_ms) {
                events.push(PuzzleEvent::CompletionScheduled {
                    due_ms: now_ms + self.settle_delay_ms,
                });
            }
        } else if self.completion.is_pending() {
            self.completion.cancel();
            events.push(PuzzleEvent::CompletionCancelled);
        }

        events
    }

    /// Returns true exactly once, when the settle delay has elapsed
    pub fn poll(&mut self, now_ms: f64) -> bool {
        self.completion.poll(now_ms)
    }

    /// Cancel any pending completion and drop the grab
    pub fn teardown(&mut self) {
        self.completion.cancel();
        self.drag.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn bounds() -> Rect {
        Rect::new(300.0, 175.0, 200.0, 250.0)
    }

    /// Drag `id` so its center lands at `center`, then release
    fn drop_at(p: &mut PuzzleState, id: u32, center: Vec2, now: f64) -> Vec<PuzzleEvent> {
        assert!(p.grab(id));
        p.pointer_move(center);
        p.release(Some(&bounds()), now)
    }

    fn vertices() -> [Vec2; 3] {
        TargetZone::pyramid_vertices(&bounds()).map(|z| z.center)
    }

    #[test]
    fn test_single_placement_snaps() {
        let mut p = PuzzleState::new(SETTLE_DELAY_MS);
        let [top, _, _] = vertices();
        let events = drop_at(&mut p, 1, top + Vec2::new(15.0, -10.0), 0.0);
        assert_eq!(events, vec![PuzzleEvent::Placed(1)]);
        assert!(p.eyes()[0].placed);
        assert_eq!(p.eyes()[0].pos, top - Vec2::splat(EYE_HALF_SIZE));
        assert!(!p.eyes()[1].placed);
        assert!(!p.eyes()[2].placed);
        assert!(!p.completion_pending());
    }

    #[test]
    fn test_miss_leaves_eye_where_dropped() {
        let mut p = PuzzleState::new(SETTLE_DELAY_MS);
        let events = drop_at(&mut p, 2, Vec2::new(10.0, 10.0), 0.0);
        assert!(events.is_empty());
        assert_eq!(p.eyes()[1].pos, Vec2::new(-15.0, -15.0));
        assert!(!p.eyes()[1].placed);
    }

    #[test]
    fn test_completion_after_settle_delay() {
        let mut p = PuzzleState::new(SETTLE_DELAY_MS);
        let [top, left, right] = vertices();
        drop_at(&mut p, 1, top, 0.0);
        drop_at(&mut p, 2, left, 10.0);
        let events = drop_at(&mut p, 3, right, 20.0);
        assert!(events.contains(&PuzzleEvent::CompletionScheduled { due_ms: 320.0 }));
        assert!(p.all_placed());

        assert!(!p.poll(319.0));
        assert!(p.poll(320.0));
        assert!(p.is_solved());
        assert!(!p.poll(1000.0));
    }

    #[test]
    fn test_evaluation_idempotent_when_all_placed() {
        let mut p = PuzzleState::new(SETTLE_DELAY_MS);
        let [top, left, right] = vertices();
        drop_at(&mut p, 1, top, 0.0);
        drop_at(&mut p, 2, left, 0.0);
        drop_at(&mut p, 3, right, 0.0);
        let snapshot = p.eyes().to_vec();

        // Pending: re-evaluation neither moves eyes nor reschedules
        assert!(p.evaluate_collisions(&bounds(), 100.0).is_empty());
        assert_eq!(p.eyes(), snapshot.as_slice());

        assert!(p.poll(300.0));
        // Fired: evaluation is a no-op
        assert!(p.evaluate_collisions(&bounds(), 400.0).is_empty());
        assert_eq!(p.eyes(), snapshot.as_slice());
        assert!(!p.poll(800.0));
        assert!(!p.grab(1));
    }

    #[test]
    fn test_dragging_away_unplaces_and_cancels() {
        let mut p = PuzzleState::new(SETTLE_DELAY_MS);
        let [top, left, right] = vertices();
        drop_at(&mut p, 1, top, 0.0);
        drop_at(&mut p, 2, left, 0.0);
        drop_at(&mut p, 3, right, 0.0);
        assert!(p.completion_pending());

        let events = drop_at(&mut p, 2, Vec2::new(20.0, 20.0), 100.0);
        assert_eq!(
            events,
            vec![PuzzleEvent::Unplaced(2), PuzzleEvent::CompletionCancelled]
        );
        assert!(!p.poll(1000.0));
        assert!(!p.is_solved());
    }

    #[test]
    fn test_two_eyes_on_same_vertex() {
        let mut p = PuzzleState::new(SETTLE_DELAY_MS);
        let [top, _, _] = vertices();
        drop_at(&mut p, 1, top, 0.0);
        drop_at(&mut p, 2, top, 0.0);
        assert!(p.eyes()[0].placed && p.eyes()[1].placed);
        assert!(!p.all_placed());
        assert!(!p.completion_pending());
    }

    #[test]
    fn test_release_without_bounds() {
        let mut p = PuzzleState::new(SETTLE_DELAY_MS);
        let [top, _, _] = vertices();
        assert!(p.grab(1));
        p.pointer_move(top);
        assert!(p.release(None, 0.0).is_empty());
        assert!(!p.eyes()[0].placed);
        assert_eq!(p.grabbed(), None);
    }

    #[test]
    fn test_teardown_cancels_pending() {
        let mut p = PuzzleState::new(SETTLE_DELAY_MS);
        let [top, left, right] = vertices();
        drop_at(&mut p, 1, top, 0.0);
        drop_at(&mut p, 2, left, 0.0);
        drop_at(&mut p, 3, right, 0.0);
        p.teardown();
        assert!(!p.poll(1000.0));
    }
}
