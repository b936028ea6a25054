// src/simulation/clock.rs
use std::time::Duration;

use tokio::time::Instant;

/// Turns the wall-clock time between simulated readings into whole seconds of
/// device uptime. The sub-second remainder carries over to the next reading, so
/// uptime keeps pace with real time for any refresh interval.
#[derive(Debug, Default)]
pub struct UptimeClock {
    last: Option<Instant>,
    carry: Duration,
}

impl UptimeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole seconds elapsed since the previous call. The first call returns 0.
    pub fn advance(&mut self, now: Instant) -> u64 {
        let elapsed = match self.last.replace(now) {
            Some(last) => now.saturating_duration_since(last) + self.carry,
            None => Duration::ZERO,
        };

        let secs = elapsed.as_secs();
        self.carry = elapsed - Duration::from_secs(secs);
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_advance_is_zero() {
        let mut clock = UptimeClock::new();
        assert_eq!(clock.advance(Instant::now()), 0);
    }

    #[test]
    fn test_fractional_intervals_carry_over() {
        let start = Instant::now();
        let mut clock = UptimeClock::new();
        clock.advance(start);

        let steps: Vec<u64> = (1..=4)
            .map(|i| clock.advance(start + Duration::from_millis(1500 * i)))
            .collect();

        // 1.5s ticks: 1.5 -> 1 (+0.5), 2.0 -> 2, 1.5 -> 1 (+0.5), 2.0 -> 2
        assert_eq!(steps, vec![1, 2, 1, 2]);
        assert_eq!(steps.iter().sum::<u64>(), 6);
    }

    #[test]
    fn test_sub_second_intervals_accumulate() {
        let start = Instant::now();
        let mut clock = UptimeClock::new();
        clock.advance(start);

        let total: u64 = (1..=8)
            .map(|i| clock.advance(start + Duration::from_millis(250 * i)))
            .sum();

        assert_eq!(total, 2);
    }

    #[test]
    fn test_back_to_back_calls_add_nothing() {
        let start = Instant::now();
        let mut clock = UptimeClock::new();
        clock.advance(start + Duration::from_secs(2));

        // Earlier instant than the last one saturates to zero
        assert_eq!(clock.advance(start), 0);
    }
}
