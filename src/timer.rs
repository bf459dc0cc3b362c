//! Tick scheduling for the game loop
//!
//! The engine never owns a timer. The loop keeps one [`TickTimer`] and calls
//! [`TickTimer::sync`] after every state change: the timer is armed only while
//! the game is playing, re-armed whenever the speed changes, and disarmed on
//! game over or restart. At most one interval exists at any time, so ticks
//! can never overlap.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::game::GameStatus;

pub struct TickTimer {
    interval: Option<Interval>,
    period: Option<Duration>,
}

impl TickTimer {
    /// Create a disarmed timer
    pub fn new() -> Self {
        Self {
            interval: None,
            period: None,
        }
    }

    /// Bring the timer in line with the engine's status and speed
    ///
    /// Returns true if the timer was armed, re-armed or disarmed.
    pub fn sync(&mut self, status: GameStatus, speed_ms: u64) -> bool {
        if status != GameStatus::Playing {
            return self.disarm();
        }

        let period = Duration::from_millis(speed_ms);
        if self.period == Some(period) {
            return false;
        }

        self.arm(period);
        true
    }

    fn arm(&mut self, period: Duration) {
        // First tick fires a full period from now rather than immediately
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::debug!("Tick timer armed at {}ms", period.as_millis());
        self.interval = Some(interval);
        self.period = Some(period);
    }

    /// Drop the current interval, if any
    ///
    /// Returns true if a timer was running.
    pub fn disarm(&mut self) -> bool {
        if self.interval.is_none() {
            return false;
        }

        log::debug!("Tick timer disarmed");
        self.interval = None;
        self.period = None;
        true
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Wait for the next tick; never completes while disarmed
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_disarmed() {
        let timer = TickTimer::new();
        assert!(!timer.is_armed());
        assert_eq!(timer.period(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_armed_only_while_playing() {
        let mut timer = TickTimer::new();

        assert!(!timer.sync(GameStatus::Ready, 150));
        assert!(!timer.is_armed());

        assert!(timer.sync(GameStatus::Playing, 150));
        assert!(timer.is_armed());
        assert_eq!(timer.period(), Some(Duration::from_millis(150)));

        assert!(timer.sync(GameStatus::GameOver, 150));
        assert!(!timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_speed_keeps_interval() {
        let mut timer = TickTimer::new();
        timer.sync(GameStatus::Playing, 150);

        assert!(!timer.sync(GameStatus::Playing, 150));
        assert!(timer.sync(GameStatus::Playing, 145));
        assert_eq!(timer.period(), Some(Duration::from_millis(145)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_waits_one_period() {
        let mut timer = TickTimer::new();
        timer.sync(GameStatus::Playing, 100);

        let start = Instant::now();
        timer.tick().await;
        assert!(start.elapsed() >= Duration::from_millis(100));

        timer.tick().await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_tick_never_fires() {
        let mut timer = TickTimer::new();
        let result = tokio::time::timeout(Duration::from_secs(5), timer.tick()).await;
        assert!(result.is_err());
    }
}
