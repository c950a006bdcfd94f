//! Outbound signals from the simulation
//!
//! Two kinds: fire-and-forget cosmetic/audio [`GameEvent`]s produced inside a
//! tick, and change [`Notification`]s the driver derives after each tick.
//! Collaborators implement [`Observer`] to receive both.

use super::state::GamePhase;

/// Cosmetic/audio cue produced by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Jelly jumped; `double` for the second jump in the air
    Jump { double: bool },
    /// Jelly touched down on a platform
    Land,
    /// Landed near the platform center
    Perfect { streak: u32 },
    /// Streak reached the fever threshold
    FeverStart,
    /// Jelly fell out; the run is over
    Shatter,
}

/// State change visible to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Displayed (multiplied) score
    Score(u64),
    Phase(GamePhase),
    Fever(bool),
    /// Current perfect streak
    Combo(u32),
}

/// Subscriber for simulation output
///
/// Every method defaults to a no-op. Implementations must not panic: the
/// driver treats observers as best-effort.
pub trait Observer {
    fn on_score(&mut self, _score: u64) {}
    fn on_phase(&mut self, _phase: GamePhase) {}
    fn on_fever(&mut self, _fever: bool) {}
    fn on_combo(&mut self, _combo: u32) {}
    fn on_event(&mut self, _event: GameEvent) {}

    /// Route a notification to its channel
    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::Score(score) => self.on_score(score),
            Notification::Phase(phase) => self.on_phase(phase),
            Notification::Fever(fever) => self.on_fever(fever),
            Notification::Combo(combo) => self.on_combo(combo),
        }
    }
}

/// Last values handed to observers, used to report changes only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watched {
    pub score: u64,
    pub phase: GamePhase,
    pub fever: bool,
    pub combo: u32,
}

impl Watched {
    /// Collect notifications for every field that differs from `self`, then
    /// adopt `next`
    pub fn diff(&mut self, next: Watched, out: &mut Vec<Notification>) {
        if next.phase != self.phase {
            out.push(Notification::Phase(next.phase));
        }
        if next.score != self.score {
            out.push(Notification::Score(next.score));
        }
        if next.combo != self.combo {
            out.push(Notification::Combo(next.combo));
        }
        if next.fever != self.fever {
            out.push(Notification::Fever(next.fever));
        }
        *self = next;
    }
}
