//! Session countdown, score and outcome.

use gallery_core::config::SessionConfig;
use gallery_core::constants::TIME_EPSILON;
use gallery_core::enums::{SessionOutcome, SessionPhase};

#[derive(Debug, Clone)]
pub struct SessionClock {
    duration: f64,
    remaining: f64,
    score: u32,
    phase: SessionPhase,
    outcome: Option<SessionOutcome>,
}

impl SessionClock {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            duration: config.duration_secs,
            remaining: config.duration_secs,
            score: 0,
            phase: SessionPhase::Idle,
            outcome: None,
        }
    }

    /// Idle -> Running. Returns false if a session already started.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::Idle {
            return false;
        }
        self.phase = SessionPhase::Running;
        true
    }

    /// Back to a fresh, running countdown with zero score.
    pub fn restart(&mut self) {
        self.reset();
        self.phase = SessionPhase::Running;
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.score = 0;
        self.outcome = None;
        self.phase = SessionPhase::Idle;
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.phase = SessionPhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Running;
        true
    }

    /// Count down. Returns the outcome on the tick the clock reaches zero.
    pub fn advance(&mut self, dt: f64) -> Option<SessionOutcome> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining > TIME_EPSILON {
            return None;
        }
        self.remaining = 0.0;
        let outcome = if self.score > 0 {
            SessionOutcome::Win
        } else {
            SessionOutcome::Lose
        };
        self.phase = SessionPhase::Ended;
        self.outcome = Some(outcome);
        Some(outcome)
    }

    /// Score only counts while the session is live.
    pub fn add_score(&mut self, points: u32) {
        if matches!(self.phase, SessionPhase::Running | SessionPhase::Paused) {
            self.score = self.score.saturating_add(points);
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(duration_secs: f64) -> SessionClock {
        SessionClock::new(&SessionConfig {
            duration_secs,
            ..SessionConfig::default()
        })
    }

    #[test]
    fn test_zero_score_loses() {
        let mut c = clock(1.0);
        assert!(c.start());
        let mut outcome = None;
        for _ in 0..30 {
            outcome = outcome.or(c.advance(1.0 / 30.0));
        }
        assert_eq!(outcome, Some(SessionOutcome::Lose));
        assert_eq!(c.phase(), SessionPhase::Ended);
        assert_eq!(c.remaining(), 0.0);
    }

    #[test]
    fn test_any_score_wins() {
        let mut c = clock(0.1);
        c.start();
        c.add_score(10);
        assert_eq!(c.advance(0.2), Some(SessionOutcome::Win));
        assert_eq!(c.advance(0.2), None, "outcome fires once");
    }

    #[test]
    fn test_idle_clock_ignores_time_and_score() {
        let mut c = clock(1.0);
        assert_eq!(c.advance(5.0), None);
        c.add_score(10);
        assert_eq!(c.score(), 0);
        assert_eq!(c.remaining(), 1.0);
    }

    #[test]
    fn test_pause_freezes_countdown() {
        let mut c = clock(1.0);
        c.start();
        c.advance(0.25);
        assert!(c.pause());
        assert_eq!(c.advance(5.0), None);
        assert_eq!(c.remaining(), 0.75);
        assert!(c.resume());
        assert!(!c.resume());
    }

    #[test]
    fn test_restart_clears_score_and_outcome() {
        let mut c = clock(0.1);
        c.start();
        c.add_score(20);
        c.advance(1.0);
        c.restart();
        assert_eq!(c.score(), 0);
        assert_eq!(c.outcome(), None);
        assert!(c.is_running());
        assert_eq!(c.remaining(), 0.1);
    }
}
