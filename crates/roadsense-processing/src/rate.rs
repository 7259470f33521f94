//! Achieved-throughput accounting for diagnostics

use roadsense_core::SensorStats;

/// Tracks achieved sample and window throughput against the nominal rate
///
/// The reported frequency is a trailing average over the interval since the
/// previous window emission, suitable for health display rather than hard
/// real-time control.
///
/// All timing comes from producer timestamps: the first interval opens at
/// the first recorded sample's timestamp, so the tracker works with any
/// monotonic millisecond timebase, not just the UNIX epoch.
#[derive(Debug, Clone, Default)]
pub struct RateTracker {
    /// Samples since the last window emission
    interval_counter: u64,
    /// Timestamp opening the current interval; None until the first sample
    interval_start_ms: Option<u64>,
    stats: SensorStats,
}

impl RateTracker {
    pub fn new() -> Self {
        RateTracker::default()
    }

    /// Record one accelerometer sample
    pub fn on_sample(&mut self, now_ms: u64) {
        if self.interval_start_ms.is_none() {
            self.interval_start_ms = Some(now_ms);
        }
        self.interval_counter += 1;
        self.stats.sample_count += 1;
    }

    /// Record a window emission and recompute the trailing frequency
    pub fn on_window(&mut self, now_ms: u64) {
        self.stats.window_count += 1;

        if let Some(start_ms) = self.interval_start_ms {
            let elapsed_ms = now_ms.saturating_sub(start_ms);
            if elapsed_ms > 0 {
                self.stats.frequency_hz =
                    ((self.interval_counter as f64 / elapsed_ms as f64) * 1000.0).round() as u32;
            }
        }

        self.interval_counter = 0;
        self.interval_start_ms = Some(now_ms);
    }

    /// Snapshot of the cumulative session counters
    pub fn stats(&self) -> SensorStats {
        self.stats
    }

    /// Reset all counters (session start)
    pub fn reset(&mut self) {
        self.interval_counter = 0;
        self.interval_start_ms = None;
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_50hz_reports_50() {
        let mut tracker = RateTracker::new();

        // 100 samples over 2000ms = 50Hz
        for i in 0..100u64 {
            tracker.on_sample(i * 20);
        }
        tracker.on_window(2000);

        let stats = tracker.stats();
        assert_eq!(stats.frequency_hz, 50);
        assert_eq!(stats.sample_count, 100);
        assert_eq!(stats.window_count, 1);
    }

    #[test]
    fn test_frequency_is_trailing_per_interval() {
        let mut tracker = RateTracker::new();

        for i in 0..100u64 {
            tracker.on_sample(i * 20);
        }
        tracker.on_window(2000);

        // Second interval runs slower: 50 samples over 2000ms = 25Hz
        for i in 0..50u64 {
            tracker.on_sample(2000 + i * 40);
        }
        tracker.on_window(4000);

        let stats = tracker.stats();
        assert_eq!(stats.frequency_hz, 25);
        assert_eq!(stats.sample_count, 150);
        assert_eq!(stats.window_count, 2);
    }

    #[test]
    fn test_interval_opens_at_first_sample_timestamp() {
        // A producer using a boot-relative timebase, nowhere near the epoch
        let base = 7_000_000u64;
        let mut tracker = RateTracker::new();

        for i in 0..100u64 {
            tracker.on_sample(base + i * 20);
        }
        tracker.on_window(base + 2000);

        // The first interval must not be measured from tracker creation
        assert_eq!(tracker.stats().frequency_hz, 50);
    }

    #[test]
    fn test_zero_elapsed_keeps_previous_frequency() {
        let mut tracker = RateTracker::new();
        for _ in 0..10 {
            tracker.on_sample(1000);
        }
        tracker.on_window(1000);
        assert_eq!(tracker.stats().frequency_hz, 0);
    }

    #[test]
    fn test_window_with_no_samples_leaves_frequency() {
        let mut tracker = RateTracker::new();
        tracker.on_window(500);
        assert_eq!(tracker.stats().frequency_hz, 0);
        assert_eq!(tracker.stats().window_count, 1);
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let mut tracker = RateTracker::new();
        for i in 0..100u64 {
            tracker.on_sample(i * 20);
        }
        tracker.on_window(2000);
        tracker.reset();

        assert_eq!(tracker.stats(), SensorStats::default());
    }
}
