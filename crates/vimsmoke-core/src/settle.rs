//! Pane stabilization: decide when the editor has finished drawing.
//!
//! The driver owns the clock and the sleeps; the tracker owns the
//! decision. Feeding it successive pane frames keeps the logic testable
//! without a tmux server.

use std::time::Duration;

/// Tuning for the stabilization poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleConfig {
    /// Pause between pane captures.
    pub poll_interval: Duration,
    /// Consecutive identical frames required to call the pane settled.
    pub stable_after: u32,
    /// Total budget before giving up and proceeding with the last frame.
    pub max_wait: Duration,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(150),
            stable_after: 3,
            max_wait: Duration::from_secs(5),
        }
    }
}

/// Outcome of observing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStatus {
    /// Keep polling.
    Pending,
    /// Enough identical frames in a row.
    Settled,
    /// Budget exhausted before the pane stabilized.
    TimedOut,
}

/// Stabilization state machine over successive pane captures.
#[derive(Debug)]
pub struct SettleTracker {
    config: SettleConfig,
    last_frame: Option<Vec<String>>,
    identical_streak: u32,
    elapsed: Duration,
}

impl SettleTracker {
    pub fn new(config: SettleConfig) -> Self {
        Self {
            config,
            last_frame: None,
            identical_streak: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Feed one captured frame plus the wall time spent since the
    /// previous observation. A settled verdict wins over a timeout when
    /// both are true for the same frame.
    pub fn observe(&mut self, frame: Vec<String>, since_last: Duration) -> SettleStatus {
        self.elapsed += since_last;

        let identical = self.last_frame.as_ref().is_some_and(|prev| *prev == frame);
        self.identical_streak = if identical {
            self.identical_streak + 1
        } else {
            1
        };
        self.last_frame = Some(frame);

        if self.identical_streak >= self.config.stable_after {
            SettleStatus::Settled
        } else if self.elapsed >= self.config.max_wait {
            SettleStatus::TimedOut
        } else {
            SettleStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    fn config(stable_after: u32, max_wait_ms: u64) -> SettleConfig {
        SettleConfig {
            poll_interval: Duration::from_millis(1),
            stable_after,
            max_wait: Duration::from_millis(max_wait_ms),
        }
    }

    #[test]
    fn settles_after_three_identical_frames() {
        let mut tracker = SettleTracker::new(config(3, 1000));
        let f = frame(&["~", "~", "VIM - Vi IMproved"]);
        assert_eq!(tracker.observe(f.clone(), Duration::ZERO), SettleStatus::Pending);
        assert_eq!(tracker.observe(f.clone(), Duration::from_millis(1)), SettleStatus::Pending);
        assert_eq!(tracker.observe(f, Duration::from_millis(1)), SettleStatus::Settled);
    }

    #[test]
    fn changing_frames_reset_the_streak() {
        let mut tracker = SettleTracker::new(config(2, 1000));
        let a = frame(&["loading"]);
        let b = frame(&["loaded"]);
        assert_eq!(tracker.observe(a.clone(), Duration::ZERO), SettleStatus::Pending);
        assert_eq!(tracker.observe(b.clone(), Duration::from_millis(1)), SettleStatus::Pending);
        assert_eq!(tracker.observe(b, Duration::from_millis(1)), SettleStatus::Settled);
    }

    #[test]
    fn times_out_when_frames_keep_changing() {
        let mut tracker = SettleTracker::new(config(3, 10));
        for i in 0..4 {
            let status = tracker.observe(frame(&[&format!("redraw {i}")]), Duration::from_millis(3));
            if i < 3 {
                assert_eq!(status, SettleStatus::Pending);
            } else {
                assert_eq!(status, SettleStatus::TimedOut);
            }
        }
    }

    #[test]
    fn settled_wins_over_timeout_on_the_same_frame() {
        let mut tracker = SettleTracker::new(config(2, 5));
        let f = frame(&["stable"]);
        assert_eq!(tracker.observe(f.clone(), Duration::from_millis(4)), SettleStatus::Pending);
        assert_eq!(tracker.observe(f, Duration::from_millis(4)), SettleStatus::Settled);
    }

    #[test]
    fn single_frame_requirement_settles_immediately() {
        let mut tracker = SettleTracker::new(config(1, 1000));
        assert_eq!(
            tracker.observe(frame(&["anything"]), Duration::ZERO),
            SettleStatus::Settled
        );
    }
}
