use serde::Serialize;
use std::fmt;

/// Running tally for a round of attempts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameStats {
    pub successful_marks: u32,
    pub failed_attempts: u32,
    pub accuracy: f64,
    pub completed: bool,
    pub failed: bool,
}

impl GameStats {
    pub fn total_attempts(&self) -> u32 {
        self.successful_marks + self.failed_attempts
    }

    pub fn record_success(&mut self) {
        self.successful_marks += 1;
        self.accuracy = accuracy(self.successful_marks, self.failed_attempts);
    }

    pub fn record_failure(&mut self) {
        self.failed_attempts += 1;
        self.accuracy = accuracy(self.successful_marks, self.failed_attempts);
    }

    /// Completed without a single miss
    pub fn is_flawless(&self) -> bool {
        self.completed && self.failed_attempts == 0
    }
}

impl fmt::Display for GameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.completed {
            "completed"
        } else if self.failed {
            "failed"
        } else {
            "in progress"
        };
        write!(
            f,
            "{} - {} hits / {} misses - {:.1}% accuracy",
            status, self.successful_marks, self.failed_attempts, self.accuracy
        )
    }
}

/// Hit percentage over all attempts; zero when nothing has been attempted
pub fn accuracy(successes: u32, failures: u32) -> f64 {
    match successes + failures {
        0 => 0.0,
        total => successes as f64 / total as f64 * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_no_attempts() {
        assert_eq!(accuracy(0, 0), 0.0);
        assert_eq!(GameStats::default().accuracy, 0.0);
    }

    #[test]
    fn test_accuracy_values() {
        assert_eq!(accuracy(1, 0), 100.0);
        assert_eq!(accuracy(0, 4), 0.0);
        assert_eq!(accuracy(3, 1), 75.0);
        assert!((accuracy(1, 2) - 33.333333333333336).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_tracks_every_attempt() {
        let mut stats = GameStats::default();
        let sequence = [true, false, false, true, true, false, true];
        let (mut hits, mut misses) = (0u32, 0u32);

        for hit in sequence {
            if hit {
                stats.record_success();
                hits += 1;
            } else {
                stats.record_failure();
                misses += 1;
            }
            let expected = hits as f64 / (hits + misses) as f64 * 100.0;
            assert_eq!(stats.accuracy, expected);
            assert_eq!(stats.total_attempts(), hits + misses);
        }
    }

    #[test]
    fn test_failure_uses_previous_success_count() {
        let mut stats = GameStats::default();
        stats.record_success();
        stats.record_success();
        stats.record_failure();
        assert_eq!(stats.successful_marks, 2);
        assert_eq!(stats.failed_attempts, 1);
        assert!((stats.accuracy - 66.66666666666667).abs() < 1e-12);
    }

    #[test]
    fn test_flawless() {
        let mut stats = GameStats::default();
        stats.record_success();
        assert!(!stats.is_flawless());
        stats.completed = true;
        assert!(stats.is_flawless());
        stats.record_failure();
        assert!(!stats.is_flawless());
    }

    #[test]
    fn test_display() {
        let stats = GameStats {
            successful_marks: 3,
            failed_attempts: 1,
            accuracy: 75.0,
            completed: true,
            failed: false,
        };
        assert_eq!(
            stats.to_string(),
            "completed - 3 hits / 1 misses - 75.0% accuracy"
        );
    }
}
