//! One-shot deferred callback driven by an external clock
//!
//! Timestamps are milliseconds from whatever clock the caller uses
//! (`performance.now()` in the browser, a counter in tests).

/// State of a one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Deferred {
    #[default]
    Idle,
    /// Will fire once `now >= due_ms`
    Pending { due_ms: f64 },
    /// Already fired; never fires again until reset
    Fired,
}

impl Deferred {
    /// Schedule if idle. Returns false if already pending or fired.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64) -> bool {
        match self {
            Deferred::Idle => {
                *self = Deferred::Pending {
                    due_ms: now_ms + delay_ms,
                };
                true
            }
            _ => false,
        }
    }

    /// Drop a pending timer. Fired timers stay fired.
    pub fn cancel(&mut self) {
        if matches!(self, Deferred::Pending { .. }) {
            *self = Deferred::Idle;
        }
    }

    /// Returns true exactly once, on the first poll at or after the due time
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match *self {
            Deferred::Pending { due_ms } if now_ms >= due_ms => {
                *self = Deferred::Fired;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Deferred::Pending { .. })
    }

    pub fn has_fired(&self) -> bool {
        matches!(self, Deferred::Fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once() {
        let mut t = Deferred::default();
        assert!(t.schedule(1000.0, 300.0));
        assert!(!t.poll(1299.0));
        assert!(t.poll(1300.0));
        assert!(!t.poll(1400.0));
        assert!(t.has_fired());
    }

    #[test]
    fn test_schedule_is_not_rearmed() {
        let mut t = Deferred::default();
        assert!(t.schedule(0.0, 300.0));
        assert!(!t.schedule(100.0, 300.0));
        assert!(t.poll(300.0));
        assert!(!t.schedule(400.0, 300.0));
    }

    #[test]
    fn test_cancel() {
        let mut t = Deferred::default();
        t.schedule(0.0, 300.0);
        t.cancel();
        assert!(!t.is_pending());
        assert!(!t.poll(1000.0));
        assert!(t.schedule(1000.0, 300.0));
    }
}
