//! Single-pointer drag tracking

use glam::Vec2;

use super::puzzle::Eye;
use crate::consts::EYE_HALF_SIZE;

/// Tracks which eye (if any) follows the pointer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragController {
    grabbed: Option<u32>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `id`. Ignored while another eye is held.
    pub fn grab(&mut self, id: u32, eyes: &[Eye]) -> bool {
        if self.grabbed.is_some() || !eyes.iter().any(|e| e.id == id) {
            return false;
        }
        self.grabbed = Some(id);
        true
    }

    /// Center the held eye under the pointer
    pub fn move_to(&self, pointer: Vec2, eyes: &mut [Eye]) {
        let Some(id) = self.grabbed else {
            return;
        };
        if let Some(eye) = eyes.iter_mut().find(|e| e.id == id) {
            eye.pos = pointer - Vec2::splat(EYE_HALF_SIZE);
        }
    }

    /// Drop the held eye. Returns the id that was held, if any; the caller
    /// runs collision evaluation only in that case.
    pub fn release(&mut self) -> Option<u32> {
        self.grabbed.take()
    }

    pub fn grabbed(&self) -> Option<u32> {
        self.grabbed
    }
}
