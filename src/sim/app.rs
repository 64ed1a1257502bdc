//! Application controller
//!
//! Owns every piece of state and is the only place stage transitions happen.
//! Input arrives as `Action`s; everything observable leaves as `AppEvent`s.

use glam::Vec2;

use super::collision::Rect;
use super::narrative::{Narrative, Stage, Transition, Trigger};
use super::particles::ParticleField;
use super::puzzle::{Eye, PuzzleEvent, PuzzleState};
use crate::settings::Settings;

/// Time as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clock {
    /// Monotonic milliseconds (drives the settle delay)
    pub now_ms: f64,
    /// Wall clock seconds (seeds the verification code)
    pub unix_secs: u64,
}

impl Clock {
    pub fn at(now_ms: f64) -> Self {
        Self {
            now_ms,
            unix_secs: 0,
        }
    }
}

/// User input and layout notifications
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// ENTER on the intro
    Enter,
    /// Pointer down on an eye
    Grab(u32),
    /// Global pointer move (client pixels)
    PointerMove(Vec2),
    /// Global pointer up
    PointerUp,
    /// NEXT LAYER / FINAL STAGE
    Continue,
    /// REVEAL VERIFICATION CODE
    Reveal,
    /// COPY CODE
    CopyCode,
    /// RESTART EXPERIENCE, reseeding the background
    Restart { seed: u64 },
    /// Current bounding box of the pyramid graphic
    SetPyramidBounds(Rect),
    /// Viewport used the next time the background starts
    SetViewport(Vec2),
}

/// Observable consequences of an action or frame
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    StageChanged { from: Stage, to: Stage },
    EyePlaced(u32),
    EyeUnplaced(u32),
    CompletionScheduled { due_ms: f64 },
    CompletionCancelled,
    PuzzleSolved,
    ElementsFound(Vec<u32>),
    CodeGenerated(String),
    CopyRequested(String),
    BackgroundStarted,
    BackgroundStopped,
    /// Window-level pointer listeners should be registered
    ListenersAttached,
    /// Window-level pointer listeners should be removed
    ListenersDetached,
}

/// The whole application state
#[derive(Debug, Clone)]
pub struct App {
    settings: Settings,
    viewport: Vec2,
    seed: u64,
    narrative: Narrative,
    puzzle: Option<PuzzleState>,
    background: Option<ParticleField>,
    pyramid_bounds: Option<Rect>,
}

impl App {
    pub fn new(settings: Settings, viewport: Vec2, seed: u64) -> Self {
        Self {
            settings,
            viewport,
            seed,
            narrative: Narrative::new(),
            puzzle: None,
            background: None,
            pyramid_bounds: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.narrative.stage()
    }

    pub fn narrative(&self) -> &Narrative {
        &self.narrative
    }

    pub fn puzzle(&self) -> Option<&PuzzleState> {
        self.puzzle.as_ref()
    }

    /// Eyes of the running puzzle (empty outside the puzzle stage)
    pub fn eyes(&self) -> &[Eye] {
        self.puzzle.as_ref().map(|p| p.eyes()).unwrap_or(&[])
    }

    pub fn background(&self) -> Option<&ParticleField> {
        self.background.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Handle one input
    pub fn dispatch(&mut self, action: Action, clock: Clock) -> Vec<AppEvent> {
        let mut events = Vec::new();
        let stage = self.stage();

        match action {
            Action::Enter if stage == Stage::Intro => {
                self.transition(Trigger::Click, clock, &mut events);
            }
            Action::Continue if matches!(stage, Stage::Layer1 | Stage::Layer2 | Stage::Layer3) => {
                self.transition(Trigger::Click, clock, &mut events);
            }
            Action::Reveal if stage == Stage::Layer4 => {
                self.transition(Trigger::Click, clock, &mut events);
            }
            Action::Grab(id) => {
                if let Some(puzzle) = self.puzzle.as_mut() {
                    puzzle.grab(id);
                }
            }
            Action::PointerMove(pos) => {
                if let Some(puzzle) = self.puzzle.as_mut() {
                    puzzle.pointer_move(pos);
                }
            }
            Action::PointerUp => {
                if let Some(puzzle) = self.puzzle.as_mut() {
                    let puzzle_events = puzzle.release(self.pyramid_bounds.as_ref(), clock.now_ms);
                    events.extend(puzzle_events.into_iter().map(AppEvent::from));
                }
            }
            Action::CopyCode => match self.narrative.code() {
                Some(code) => events.push(AppEvent::CopyRequested(code.to_string())),
                None => log::debug!("No code to copy yet"),
            },
            Action::Restart { seed } => self.restart(seed, &mut events),
            Action::SetPyramidBounds(rect) => self.pyramid_bounds = Some(rect),
            Action::SetViewport(size) => self.viewport = size,
            other => log::debug!("Ignoring {:?} in stage {}", other, stage),
        }

        events
    }

    /// Per animation frame: fire the deferred puzzle completion, then
    /// advance the background if it is running
    pub fn frame(&mut self, clock: Clock) -> Vec<AppEvent> {
        let mut events = Vec::new();

        let solved = self
            .puzzle
            .as_mut()
            .is_some_and(|puzzle| puzzle.poll(clock.now_ms));
        if solved {
            events.push(AppEvent::PuzzleSolved);
            self.transition(Trigger::PuzzleSolved, clock, &mut events);
        }

        if let Some(field) = self.background.as_mut() {
            field.tick();
        }

        events
    }

    fn transition(&mut self, trigger: Trigger, clock: Clock, events: &mut Vec<AppEvent>) {
        match self.narrative.advance(trigger, clock.unix_secs) {
            Ok(t) => self.apply(t, events),
            Err(e) => log::debug!("Transition rejected: {}", e),
        }
    }

    fn apply(&mut self, t: Transition, events: &mut Vec<AppEvent>) {
        if t.from == Stage::Puzzle {
            if let Some(mut puzzle) = self.puzzle.take() {
                puzzle.teardown();
            }
            events.push(AppEvent::ListenersDetached);
        }

        if !t.found.is_empty() {
            events.push(AppEvent::ElementsFound(t.found));
        }
        if let Some(code) = t.code {
            events.push(AppEvent::CodeGenerated(code));
        }

        if t.to == Stage::Puzzle {
            self.puzzle = Some(PuzzleState::new(self.settings.settle_delay_ms));
            events.push(AppEvent::ListenersAttached);
        }
        if t.to.background_active() && self.background.is_none() {
            self.start_background(events);
        }

        events.push(AppEvent::StageChanged {
            from: t.from,
            to: t.to,
        });
    }

    fn start_background(&mut self, events: &mut Vec<AppEvent>) {
        self.background = Some(ParticleField::start(
            self.viewport.x,
            self.viewport.y,
            &self.settings,
            self.seed,
        ));
        events.push(AppEvent::BackgroundStarted);
    }

    /// Back to the creation-time state of every component
    fn restart(&mut self, seed: u64, events: &mut Vec<AppEvent>) {
        let from = self.stage();
        if let Some(mut puzzle) = self.puzzle.take() {
            puzzle.teardown();
            events.push(AppEvent::ListenersDetached);
        }
        if self.background.take().is_some() {
            events.push(AppEvent::BackgroundStopped);
        }
        self.seed = seed;
        self.narrative = Narrative::new();
        self.pyramid_bounds = None;
        log::info!("Restarted from {} with seed {}", from, seed);
        if from != Stage::Intro {
            events.push(AppEvent::StageChanged {
                from,
                to: Stage::Intro,
            });
        }
    }
}

impl From<PuzzleEvent> for AppEvent {
    fn from(event: PuzzleEvent) -> Self {
        match event {
            PuzzleEvent::Placed(id) => AppEvent::EyePlaced(id),
            PuzzleEvent::Unplaced(id) => AppEvent::EyeUnplaced(id),
            PuzzleEvent::CompletionScheduled { due_ms } => AppEvent::CompletionScheduled { due_ms },
            PuzzleEvent::CompletionCancelled => AppEvent::CompletionCancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::TargetZone;

    fn app() -> App {
        App::new(Settings::default(), Vec2::new(1024.0, 768.0), 42)
    }

    fn bounds() -> Rect {
        Rect::new(412.0, 259.0, 200.0, 250.0)
    }

    #[test]
    fn test_enter_starts_puzzle_and_background() {
        let mut app = app();
        assert!(app.background().is_none());
        let events = app.dispatch(Action::Enter, Clock::at(0.0));
        assert_eq!(
            events,
            vec![
                AppEvent::ListenersAttached,
                AppEvent::BackgroundStarted,
                AppEvent::StageChanged {
                    from: Stage::Intro,
                    to: Stage::Puzzle
                },
            ]
        );
        assert_eq!(app.eyes().len(), 3);
        assert!(app.eyes().iter().all(|e| !e.placed));
        assert!(app.background().is_some());
    }

    #[test]
    fn test_buttons_ignored_in_wrong_stage() {
        let mut app = app();
        assert!(app.dispatch(Action::Continue, Clock::at(0.0)).is_empty());
        assert!(app.dispatch(Action::Reveal, Clock::at(0.0)).is_empty());
        app.dispatch(Action::Enter, Clock::at(0.0));
        assert!(app.dispatch(Action::Enter, Clock::at(0.0)).is_empty());
        assert!(app.dispatch(Action::Continue, Clock::at(0.0)).is_empty());
        assert_eq!(app.stage(), Stage::Puzzle);
    }

    #[test]
    fn test_pointer_input_outside_puzzle_is_noop() {
        let mut app = app();
        assert!(app.dispatch(Action::Grab(1), Clock::at(0.0)).is_empty());
        assert!(app.dispatch(Action::PointerMove(Vec2::ONE), Clock::at(0.0)).is_empty());
        assert!(app.dispatch(Action::PointerUp, Clock::at(0.0)).is_empty());
        assert!(app.eyes().is_empty());
    }

    #[test]
    fn test_solving_moves_to_layer1_after_delay() {
        let mut app = app();
        app.dispatch(Action::Enter, Clock::at(0.0));
        app.dispatch(Action::SetPyramidBounds(bounds()), Clock::at(0.0));

        for (id, zone) in (1..=3).zip(TargetZone::pyramid_vertices(&bounds())) {
            app.dispatch(Action::Grab(id), Clock::at(0.0));
            app.dispatch(Action::PointerMove(zone.center), Clock::at(0.0));
            app.dispatch(Action::PointerUp, Clock::at(100.0));
        }

        assert!(app.frame(Clock::at(399.0)).is_empty());
        assert_eq!(app.stage(), Stage::Puzzle);

        let events = app.frame(Clock::at(400.0));
        assert_eq!(
            events,
            vec![
                AppEvent::PuzzleSolved,
                AppEvent::ListenersDetached,
                AppEvent::StageChanged {
                    from: Stage::Puzzle,
                    to: Stage::Layer1
                },
            ]
        );
        assert!(app.puzzle().is_none());
        assert!(app.narrative().found().is_empty());
        assert!(app.frame(Clock::at(1000.0)).is_empty());
    }

    #[test]
    fn test_settle_delay_follows_monotonic_time_only() {
        let mut app = app();
        let wall = |now_ms: f64, unix_secs: u64| Clock { now_ms, unix_secs };
        app.dispatch(Action::Enter, wall(0.0, 1_700_000_000));
        app.dispatch(Action::SetPyramidBounds(bounds()), wall(0.0, 1_700_000_000));
        for (id, zone) in (1..=3).zip(TargetZone::pyramid_vertices(&bounds())) {
            app.dispatch(Action::Grab(id), wall(0.0, 1_700_000_000));
            app.dispatch(Action::PointerMove(zone.center), wall(0.0, 1_700_000_000));
            app.dispatch(Action::PointerUp, wall(50.0, 1_700_000_000));
        }

        // Wall clock jumps an hour; the settle delay is untouched
        app.frame(wall(349.0, 1_700_003_600));
        assert_eq!(app.stage(), Stage::Puzzle);
        // Wall clock steps back; the delay still elapses
        app.frame(wall(350.0, 1_699_996_400));
        assert_eq!(app.stage(), Stage::Layer1);
    }

    #[test]
    fn test_copy_code_only_when_complete() {
        let mut app = app();
        assert!(app.dispatch(Action::CopyCode, Clock::at(0.0)).is_empty());
    }

    #[test]
    fn test_restart_from_puzzle() {
        let mut app = app();
        app.dispatch(Action::Enter, Clock::at(0.0));
        let events = app.dispatch(Action::Restart { seed: 42 }, Clock::at(0.0));
        assert_eq!(
            events,
            vec![
                AppEvent::ListenersDetached,
                AppEvent::BackgroundStopped,
                AppEvent::StageChanged {
                    from: Stage::Puzzle,
                    to: Stage::Intro
                },
            ]
        );
        assert_eq!(app.stage(), Stage::Intro);
        assert!(app.puzzle().is_none());
        assert!(app.background().is_none());
    }

    #[test]
    fn test_frame_ticks_background() {
        let mut app = app();
        app.dispatch(Action::Enter, Clock::at(0.0));
        app.frame(Clock::at(16.0));
        app.frame(Clock::at(32.0));
        assert_eq!(app.background().map(|f| f.frame()), Some(2));
    }
}
