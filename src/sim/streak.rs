//! Streak scoring
//!
//! Each eat extends the streak by the distance travelled since the previous
//! eat and bumps the multiplier. Closing a streak commits
//! `ceil(distance * multiplier)` to the score.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Running score and the open streak
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakScorer {
    score: u64,
    distance_in_streak: f32,
    multiplier: u32,
    last_eat_time: f64,
    previous_position: Vec2,
    time_difference_to_zero_streak: f32,
}

impl StreakScorer {
    pub fn new(time_difference_to_zero_streak: f32) -> Self {
        Self {
            score: 0,
            distance_in_streak: 0.0,
            multiplier: 1,
            last_eat_time: 0.0,
            previous_position: Vec2::ZERO,
            time_difference_to_zero_streak,
        }
    }

    /// Committed score (excludes the open streak)
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn distance_in_streak(&self) -> f32 {
        self.distance_in_streak
    }

    pub fn last_eat_time(&self) -> f64 {
        self.last_eat_time
    }

    /// Points the open streak would commit right now
    fn streak_increment(&self) -> u64 {
        (self.distance_in_streak * self.multiplier as f32).ceil() as u64
    }

    /// Live preview: committed score plus the open streak. Never mutates.
    pub fn current_score(&self) -> u64 {
        self.score + self.streak_increment()
    }

    /// Commit the open streak and start a fresh one
    pub fn finish_streak(&mut self) {
        self.score += self.streak_increment();
        self.distance_in_streak = 0.0;
        self.multiplier = 1;
    }

    /// Extend the streak with food eaten at `food_pos` at time `now`
    ///
    /// The step is credited before the gap check, so an eat arriving after a
    /// long pause still counts toward the streak it closes.
    pub fn compute_eating(&mut self, food_pos: Vec2, now: f64) {
        self.distance_in_streak += self.previous_position.distance(food_pos);
        self.multiplier += 1;
        self.previous_position = food_pos;

        if now - self.last_eat_time > f64::from(self.time_difference_to_zero_streak) {
            log::debug!(
                "Streak closed after {:.2}s gap (x{}, {:.2} cells)",
                now - self.last_eat_time,
                self.multiplier,
                self.distance_in_streak
            );
            self.finish_streak();
        }
        self.last_eat_time = now;
    }

    /// Back to a zero score with no streak, measuring from `origin`
    ///
    /// The eat clock also returns to zero, so the first eat of a new run that
    /// happens later than the streak window closes its streak at once.
    pub fn reset(&mut self, origin: Vec2) {
        self.score = 0;
        self.distance_in_streak = 0.0;
        self.multiplier = 1;
        self.last_eat_time = 0.0;
        self.previous_position = origin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eat_then_finish_commits_ceiling() {
        let mut scorer = StreakScorer::new(5.0);
        scorer.compute_eating(Vec2::new(3.0, 4.0), 1.0);
        assert_eq!(scorer.multiplier(), 2);
        assert_eq!(scorer.score(), 0);
        assert_eq!(scorer.current_score(), 10);

        scorer.finish_streak();
        assert_eq!(scorer.score(), 10);
        assert_eq!(scorer.current_score(), 10);
        assert_eq!(scorer.multiplier(), 1);
    }

    #[test]
    fn test_fractional_distance_rounds_up() {
        let mut scorer = StreakScorer::new(5.0);
        scorer.compute_eating(Vec2::new(0.1, 0.0), 0.5);
        scorer.finish_streak();
        assert_eq!(scorer.score(), 1);
    }

    #[test]
    fn test_multiplier_grows_within_streak() {
        let mut scorer = StreakScorer::new(5.0);
        scorer.compute_eating(Vec2::new(1.0, 0.0), 1.0);
        scorer.compute_eating(Vec2::new(2.0, 0.0), 2.0);
        scorer.compute_eating(Vec2::new(3.0, 0.0), 3.0);
        assert_eq!(scorer.multiplier(), 4);
        // 3 cells travelled at x4
        assert_eq!(scorer.current_score(), 12);
    }

    #[test]
    fn test_long_gap_closes_streak_after_crediting_step() {
        let mut scorer = StreakScorer::new(5.0);
        assert_eq!(scorer.last_eat_time(), 0.0);

        scorer.compute_eating(Vec2::new(3.0, 4.0), 10.0);

        // The stale eat was credited at x2 and then committed
        assert_eq!(scorer.score(), 10);
        assert_eq!(scorer.multiplier(), 1);
        assert_eq!(scorer.distance_in_streak(), 0.0);
        assert_eq!(scorer.last_eat_time(), 10.0);
    }

    #[test]
    fn test_gap_exactly_at_threshold_keeps_streak() {
        let mut scorer = StreakScorer::new(5.0);
        scorer.compute_eating(Vec2::new(1.0, 0.0), 5.0);
        assert_eq!(scorer.multiplier(), 2);
        assert_eq!(scorer.score(), 0);
    }

    #[test]
    fn test_finish_twice_adds_nothing() {
        let mut scorer = StreakScorer::new(5.0);
        scorer.compute_eating(Vec2::new(2.0, 0.0), 1.0);
        scorer.finish_streak();
        let committed = scorer.score();
        scorer.finish_streak();
        assert_eq!(scorer.score(), committed);
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let mut scorer = StreakScorer::new(5.0);
        scorer.compute_eating(Vec2::new(1.5, 0.0), 1.0);
        let first = scorer.current_score();
        let second = scorer.current_score();
        assert_eq!(first, second);
        assert_eq!(scorer.score(), 0);
    }

    #[test]
    fn test_reset() {
        let mut scorer = StreakScorer::new(5.0);
        scorer.compute_eating(Vec2::new(2.0, 0.0), 1.0);
        scorer.finish_streak();
        scorer.reset(Vec2::ZERO);
        assert_eq!(scorer.score(), 0);
        assert_eq!(scorer.multiplier(), 1);
        assert_eq!(scorer.current_score(), 0);
        assert_eq!(scorer.last_eat_time(), 0.0);
    }

    #[test]
    fn test_gap_measured_on_long_running_clock() {
        // 48 hours of 60 Hz frames, then two eats one frame apart
        let mut scorer = StreakScorer::new(5.0);
        let now = 48.0 * 3600.0;
        scorer.compute_eating(Vec2::new(1.0, 0.0), now);
        scorer.compute_eating(Vec2::new(2.0, 0.0), now + 1.0 / 60.0);
        assert_eq!(scorer.multiplier(), 2);
        assert!((scorer.last_eat_time() - (now + 1.0 / 60.0)).abs() < 1e-9);
    }
}
