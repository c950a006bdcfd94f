//! Frame driver: wall-clock frames in, fixed ticks out
//!
//! The presentation layer calls [`Simulation::frame`] once per display
//! refresh. The driver turns the elapsed time into whole fixed steps, applies
//! pending input at the next step boundary, and reports changes to
//! subscribed [`Observer`]s after every step.

use super::events::{GameEvent, Notification, Observer, Watched};
use super::state::{GamePhase, GameState, Viewport};
use super::tick::{TickInput, tick};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::tuning::{Tuning, TuningError};

/// Owns the game state and is its only writer
pub struct Simulation {
    state: GameState,
    input: TickInput,
    accumulator: f32,
    /// Timestamp of the previous frame (ms)
    last_time: Option<f64>,
    observers: Vec<Box<dyn Observer>>,
    watched: Watched,
    /// Events drained since the latest `frame`/`advance` began
    recent_events: Vec<GameEvent>,
    shut_down: bool,
}

impl Simulation {
    /// Validate the tuning and build a game waiting on the Start screen
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport) -> Result<Self, TuningError> {
        tuning.validate(viewport.width)?;
        let state = GameState::new(seed, tuning, viewport);
        let watched = watch(&state);
        Ok(Self {
            state,
            input: TickInput::default(),
            accumulator: 0.0,
            last_time: None,
            observers: Vec::new(),
            watched,
            recent_events: Vec::new(),
            shut_down: false,
        })
    }

    /// Read-only snapshot for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Score as shown to the player
    pub fn displayed_score(&self) -> u64 {
        self.state
            .score
            .displayed(self.state.tuning.fever_multiplier)
    }

    /// Events produced since the last frame began, oldest first
    pub fn recent_events(&self) -> &[GameEvent] {
        &self.recent_events
    }

    pub fn is_running(&self) -> bool {
        !self.shut_down
    }

    /// Register a collaborator; it immediately receives the current values
    pub fn subscribe(&mut self, mut observer: Box<dyn Observer>) {
        observer.notify(Notification::Phase(self.watched.phase));
        observer.notify(Notification::Score(self.watched.score));
        observer.notify(Notification::Combo(self.watched.combo));
        observer.notify(Notification::Fever(self.watched.fever));
        self.observers.push(observer);
    }

    /// Start (or restart) a run with the current seed
    ///
    /// Only legal from Start or GameOver; ignored while Playing.
    pub fn start(&mut self) {
        if self.shut_down {
            return;
        }
        if self.state.phase == GamePhase::Playing {
            log::debug!("Start ignored: already playing");
            return;
        }

        self.state.reset();
        self.state.phase = GamePhase::Playing;
        self.input = TickInput::default();
        self.accumulator = 0.0;
        log::info!("Run started with seed: {}", self.state.seed);
        self.publish();
    }

    /// Restart with a new seed so each run gets a fresh layout
    pub fn restart(&mut self, seed: u64) {
        if self.shut_down {
            return;
        }
        if self.state.phase == GamePhase::Playing {
            log::debug!("Restart ignored: already playing");
            return;
        }
        self.state.seed = seed;
        self.start();
    }

    /// Queue a jump for the next step
    pub fn request_jump(&mut self) {
        self.input.jump = true;
    }

    /// Adopt a new viewport size without resetting or pausing
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width.max(1.0), height.max(1.0));
        if viewport != self.state.viewport {
            log::info!("Viewport resized to {}x{}", viewport.width, viewport.height);
            // Applied anyway; platforms wider than the viewport bounce in place
            if let Err(err) = self.state.tuning.validate(viewport.width) {
                log::warn!("Resized viewport does not fit the tuning: {}", err);
            }
            self.state.viewport = viewport;
        }
    }

    /// Change the cosmetic particle cap (quality setting)
    pub fn set_particle_cap(&mut self, cap: usize) {
        self.state.tuning.max_particles = cap;
        self.state.particles.truncate(cap);
    }

    /// Display-refresh entry point, `now_ms` from the frame callback
    ///
    /// Returns how many fixed steps ran.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        if self.shut_down {
            return 0;
        }
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(now_ms);
        self.advance(dt)
    }

    /// Feed `dt` seconds into the accumulator and run the steps it covers
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.shut_down {
            return 0;
        }
        self.recent_events.clear();
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop any backlog the substep cap left behind
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Run exactly one fixed step and publish what changed
    pub fn step(&mut self) {
        if self.shut_down {
            return;
        }
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input);
        self.publish();
    }

    /// Stop for good; no step runs after this
    pub fn shutdown(&mut self) {
        if !self.shut_down {
            log::info!("Simulation shut down");
        }
        self.shut_down = true;
        self.input = TickInput::default();
    }

    /// Push changed values and drained events to every observer
    fn publish(&mut self) {
        let mut notifications = Vec::new();
        self.watched.diff(watch(&self.state), &mut notifications);
        let events = std::mem::take(&mut self.state.events);

        for observer in &mut self.observers {
            for notification in &notifications {
                observer.notify(*notification);
            }
            for event in &events {
                observer.on_event(*event);
            }
        }
        self.recent_events.extend(events);
    }
}

fn watch(state: &GameState) -> Watched {
    Watched {
        score: state.score.displayed(state.tuning.fever_multiplier),
        phase: state.phase,
        fever: state.score.fever,
        combo: state.score.streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FALL_MARGIN, FEVER_MULTIPLIER};
    use crate::sim::state::JELLY_COLOR;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        notifications: Vec<Notification>,
        events: Vec<GameEvent>,
    }

    struct Recorder(Rc<RefCell<Log>>);

    impl Observer for Recorder {
        fn notify(&mut self, notification: Notification) {
            self.0.borrow_mut().notifications.push(notification);
        }
        fn on_event(&mut self, event: GameEvent) {
            self.0.borrow_mut().events.push(event);
        }
    }

    fn sim() -> Simulation {
        Simulation::new(42, Tuning::default(), Viewport::default()).unwrap()
    }

    fn recorded(sim: &mut Simulation) -> Rc<RefCell<Log>> {
        let log = Rc::new(RefCell::new(Log::default()));
        sim.subscribe(Box::new(Recorder(log.clone())));
        log.borrow_mut().notifications.clear();
        log
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let tuning = Tuning {
            gravity: 0.0,
            ..Default::default()
        };
        assert!(Simulation::new(1, tuning, Viewport::default()).is_err());
    }

    #[test]
    fn test_start_transition_notifies() {
        let mut sim = sim();
        let log = recorded(&mut sim);
        assert_eq!(sim.phase(), GamePhase::Start);

        sim.start();
        assert_eq!(sim.phase(), GamePhase::Playing);
        assert_eq!(
            log.borrow().notifications,
            vec![Notification::Phase(GamePhase::Playing)]
        );

        // Second start while playing is ignored
        sim.start();
        assert_eq!(log.borrow().notifications.len(), 1);
    }

    #[test]
    fn test_idle_steps_are_silent() {
        let mut sim = sim();
        sim.start();
        let log = recorded(&mut sim);
        for _ in 0..5 {
            sim.step();
        }
        assert!(log.borrow().notifications.is_empty());
    }

    #[test]
    fn test_jump_applied_at_next_step() {
        let mut sim = sim();
        sim.start();
        let log = recorded(&mut sim);

        sim.request_jump();
        assert_eq!(sim.state().actor.jumps, 0);
        sim.step();
        assert_eq!(sim.state().actor.jumps, 1);
        assert_eq!(log.borrow().events, vec![GameEvent::Jump { double: false }]);
        assert_eq!(sim.recent_events(), &[GameEvent::Jump { double: false }]);

        // Consumed: the following step does not jump again
        sim.step();
        assert_eq!(sim.state().actor.jumps, 1);
    }

    #[test]
    fn test_accumulator_runs_fixed_steps() {
        let mut sim = sim();
        assert_eq!(sim.advance(SIM_DT * 0.5), 0);
        assert_eq!(sim.advance(SIM_DT * 0.6), 1);
        assert_eq!(sim.state().time_ticks, 1);

        // Long stalls are capped
        assert_eq!(sim.advance(10.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_frame_uses_wall_clock_delta() {
        let mut sim = sim();
        assert_eq!(sim.frame(1000.0), 1);
        let ms = f64::from(SIM_DT) * 1000.0;
        let steps = sim.frame(1000.0 + ms * 3.0 + 0.5);
        assert_eq!(steps, 3);
    }

    #[test]
    fn test_shutdown_stops_ticking() {
        let mut sim = sim();
        sim.start();
        sim.shutdown();
        let ticks = sim.state().time_ticks;
        assert_eq!(sim.frame(0.0), 0);
        assert_eq!(sim.frame(100.0), 0);
        sim.step();
        assert_eq!(sim.state().time_ticks, ticks);
        assert!(!sim.is_running());
    }

    #[test]
    fn test_resize_keeps_running() {
        let mut sim = sim();
        sim.start();
        sim.resize(600.0, 900.0);
        assert_eq!(sim.state().viewport, Viewport::new(600.0, 900.0));
        assert_eq!(sim.phase(), GamePhase::Playing);
        sim.step();
        assert_eq!(sim.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_game_over_and_restart() {
        let mut sim = sim();
        sim.start();
        let log = recorded(&mut sim);

        // Walk off into the void
        sim.state.actor.resting_on = None;
        sim.state.actor.pos.x = -1000.0;
        for _ in 0..200 {
            sim.step();
            if sim.phase() == GamePhase::GameOver {
                break;
            }
        }
        assert_eq!(sim.phase(), GamePhase::GameOver);
        assert!(
            log.borrow()
                .notifications
                .contains(&Notification::Phase(GamePhase::GameOver))
        );
        assert!(log.borrow().events.contains(&GameEvent::Shatter));

        sim.restart(42);
        assert_eq!(sim.phase(), GamePhase::Playing);
        assert_eq!(sim.displayed_score(), 0);
        assert!(sim.state().resting_platform().is_some());
    }

    /// Drop the jelly off the bottom and step until the run ends
    fn fall_out(sim: &mut Simulation) {
        sim.state.actor.resting_on = None;
        sim.state.actor.pos = Vec2::new(-1000.0, sim.state.viewport.height + FALL_MARGIN + 1.0);
        sim.step();
        assert_eq!(sim.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_game_over_clears_combo_and_fever() {
        let mut sim = sim();
        sim.start();
        for _ in 0..3 {
            sim.state.score.register_landing(true, sim.state.tuning.fever_threshold);
        }
        sim.step();
        assert!(sim.state().score.fever);
        let log = recorded(&mut sim);

        fall_out(&mut sim);
        let log = log.borrow();
        let notifications = &log.notifications;
        assert!(notifications.contains(&Notification::Combo(0)));
        assert!(notifications.contains(&Notification::Fever(false)));
        assert_eq!(sim.state().score.best_streak, 3);
        assert_eq!(sim.state().actor.color, JELLY_COLOR);
        // The fever multiplier stays in the final score
        assert!(!notifications.iter().any(|n| matches!(n, Notification::Score(_))));
        assert_eq!(sim.displayed_score(), 3 * FEVER_MULTIPLIER);
    }

    #[test]
    fn test_restart_matches_fresh_simulation() {
        let mut sim = sim();
        sim.start();
        for _ in 0..240 {
            sim.step();
        }
        for _ in 0..3 {
            sim.state.score.register_landing(true, sim.state.tuning.fever_threshold);
        }
        fall_out(&mut sim);

        sim.restart(7);
        let mut fresh = Simulation::new(7, Tuning::default(), Viewport::default()).unwrap();
        fresh.start();

        let layout = |sim: &Simulation| -> Vec<_> {
            sim.state()
                .platforms
                .iter()
                .map(|p| (p.id, p.pos, p.width, p.vel_x, p.landed_on, p.color))
                .collect()
        };
        assert_eq!(layout(&sim), layout(&fresh));
        assert_eq!(sim.state().score, fresh.state().score);
        assert!(!sim.state().score.fever);
        assert_eq!(sim.state().score.streak, 0);

        let (a, b) = (&sim.state().actor, &fresh.state().actor);
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.vel, b.vel);
        assert_eq!(a.jumps, b.jumps);
        assert_eq!(a.resting_on, b.resting_on);
        assert_eq!(a.color, b.color);
        assert_eq!(sim.state().seed, 7);
    }

    #[test]
    fn test_restart_after_shutdown_is_ignored() {
        let mut sim = sim();
        sim.start();
        fall_out(&mut sim);
        sim.shutdown();

        sim.restart(99);
        assert_eq!(sim.state().seed, 42);
        assert_eq!(sim.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_narrow_resize_still_applies() {
        let mut sim = sim();
        sim.start();
        let narrow = sim.state().tuning.platform_max_width - 10.0;
        assert!(matches!(
            sim.state().tuning.validate(narrow),
            Err(TuningError::ViewportTooNarrow { .. })
        ));

        sim.resize(narrow, 900.0);
        assert_eq!(sim.state().viewport, Viewport::new(narrow, 900.0));
        for _ in 0..30 {
            sim.step();
        }
        assert!(sim.is_running());
    }
}
