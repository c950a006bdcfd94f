//! Combo and fever scoring
//!
//! ```text
//! {streak 0, calm} --perfect--> {streak n} --perfect--> ... --perfect @ threshold--> {fever}
//!        ^                                                                           |
//!        +------------------------- any non-perfect landing -------------------------+
//! ```
//!
//! Game over calls [`ScoreState::end_run`], which banks the displayed score
//! and drops the streak and fever; the machine itself has no terminal state.

use serde::{Deserialize, Serialize};

/// Score, streak and fever for the current run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    /// One point per first landing on a platform
    pub raw: u64,
    /// Consecutive perfect landings
    pub streak: u32,
    /// Longest streak this run
    pub best_streak: u32,
    pub fever: bool,
    /// Displayed score banked at game over
    #[serde(default)]
    pub final_score: Option<u64>,
}

/// What a landing changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LandingOutcome {
    pub perfect: bool,
    pub entered_fever: bool,
    pub left_fever: bool,
    pub streak_broken: bool,
}

impl ScoreState {
    /// Score shown to the player
    pub fn displayed(&self, fever_multiplier: u64) -> u64 {
        if let Some(banked) = self.final_score {
            return banked;
        }
        if self.fever {
            self.raw * fever_multiplier
        } else {
            self.raw
        }
    }

    /// Bank the displayed score and reset streak and fever
    ///
    /// `best_streak` survives for the high-score table.
    pub fn end_run(&mut self, fever_multiplier: u64) {
        self.final_score = Some(self.displayed(fever_multiplier));
        self.streak = 0;
        self.fever = false;
    }

    /// Apply a first landing on a platform
    pub fn register_landing(&mut self, perfect: bool, fever_threshold: u32) -> LandingOutcome {
        self.raw += 1;
        let mut outcome = LandingOutcome {
            perfect,
            ..Default::default()
        };

        if perfect {
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            if !self.fever && self.streak >= fever_threshold {
                self.fever = true;
                outcome.entered_fever = true;
            }
        } else {
            if self.streak > 0 {
                self.streak = 0;
                outcome.streak_broken = true;
            }
            if self.fever {
                self.fever = false;
                outcome.left_fever = true;
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FEVER_MULTIPLIER, FEVER_THRESHOLD};

    #[test]
    fn test_plain_landings() {
        let mut score = ScoreState::default();
        for _ in 0..4 {
            let outcome = score.register_landing(false, FEVER_THRESHOLD);
            assert!(!outcome.perfect);
            assert!(!outcome.streak_broken);
        }
        assert_eq!(score.raw, 4);
        assert_eq!(score.streak, 0);
        assert_eq!(score.displayed(FEVER_MULTIPLIER), 4);
    }

    #[test]
    fn test_fever_on_third_perfect() {
        let mut score = ScoreState::default();
        assert!(!score.register_landing(true, FEVER_THRESHOLD).entered_fever);
        assert!(!score.register_landing(true, FEVER_THRESHOLD).entered_fever);
        assert!(!score.fever);

        let outcome = score.register_landing(true, FEVER_THRESHOLD);
        assert!(outcome.entered_fever);
        assert!(score.fever);
        assert_eq!(score.streak, 3);
        assert_eq!(score.displayed(FEVER_MULTIPLIER), 3 * FEVER_MULTIPLIER);

        // Staying in fever does not re-enter it
        let outcome = score.register_landing(true, FEVER_THRESHOLD);
        assert!(!outcome.entered_fever);
        assert_eq!(score.displayed(FEVER_MULTIPLIER), 4 * FEVER_MULTIPLIER);
    }

    #[test]
    fn test_miss_breaks_fever() {
        let mut score = ScoreState::default();
        for _ in 0..3 {
            score.register_landing(true, FEVER_THRESHOLD);
        }
        let outcome = score.register_landing(false, FEVER_THRESHOLD);
        assert!(outcome.streak_broken);
        assert!(outcome.left_fever);
        assert_eq!(score.streak, 0);
        assert!(!score.fever);
        assert_eq!(score.best_streak, 3);
        assert_eq!(score.displayed(FEVER_MULTIPLIER), 4);
    }

    #[test]
    fn test_end_run_keeps_fever_score() {
        let mut score = ScoreState::default();
        for _ in 0..3 {
            score.register_landing(true, FEVER_THRESHOLD);
        }
        score.end_run(FEVER_MULTIPLIER);
        assert_eq!(score.streak, 0);
        assert!(!score.fever);
        assert_eq!(score.best_streak, 3);
        assert_eq!(score.displayed(FEVER_MULTIPLIER), 3 * FEVER_MULTIPLIER);
    }

    #[test]
    fn test_miss_without_streak_reports_nothing() {
        let mut score = ScoreState::default();
        let outcome = score.register_landing(false, FEVER_THRESHOLD);
        assert_eq!(
            outcome,
            LandingOutcome {
                perfect: false,
                entered_fever: false,
                left_fever: false,
                streak_broken: false,
            }
        );
    }
}
