use std::time::{Duration, Instant};

/// Per-process stats shown next to the board. Nothing here outlives the process.
pub struct GameMetrics {
    round_started: Instant,
    pub elapsed: Duration,
    pub high_score: u32,
    pub longest_snake: usize,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_started: Instant::now(),
            elapsed: Duration::ZERO,
            high_score: 0,
            longest_snake: 0,
            games_played: 0,
        }
    }

    /// Refresh the round timer; frozen once the round is over
    pub fn update(&mut self, game_over: bool) {
        if !game_over {
            self.elapsed = self.round_started.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.round_started = Instant::now();
        self.elapsed = Duration::ZERO;
    }

    /// A round ended, by crashing or by the player restarting it
    pub fn on_game_over(&mut self, final_score: u32, final_length: usize) {
        self.games_played += 1;
        self.high_score = self.high_score.max(final_score);
        self.longest_snake = self.longest_snake.max(final_length);
    }

    /// High score counting the round still in progress
    pub fn best_with(&self, current_score: u32) -> u32 {
        self.high_score.max(current_score)
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new();
        assert_eq!(metrics.best_with(30), 30);

        metrics.on_game_over(10, 2);
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(5, 4);
        assert_eq!(metrics.high_score, 10); // Should not decrease
        assert_eq!(metrics.longest_snake, 4);
        assert_eq!(metrics.games_played, 2);
        assert_eq!(metrics.best_with(0), 10);
    }

    #[test]
    fn test_timer_freezes_when_over() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(30));
        metrics.update(false);
        let frozen = metrics.elapsed;
        assert!(frozen.as_millis() >= 30);

        std::thread::sleep(Duration::from_millis(10));
        metrics.update(true);
        assert_eq!(metrics.elapsed, frozen);

        metrics.on_game_start();
        metrics.update(false);
        assert!(metrics.elapsed < frozen);
    }
}
