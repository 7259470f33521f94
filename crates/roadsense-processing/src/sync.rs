//! Synchronization of two independently-clocked sensor streams

use crate::config::CollectionConfig;
use crate::gravity::GravityFilter;
use crate::rate::RateTracker;
use crate::window_buffer::WindowBuffer;
use roadsense_core::{
    CombinedSample, RawSample, SensorResult, SensorSource, SensorStats, SensorWindow,
};

/// Merges accelerometer and gyroscope events into fused windows
///
/// Accelerometer events define the window cadence: each one appends a new
/// combined sample (gravity removed, gyro zeroed). Gyroscope events attach
/// opportunistically to the most recent sample (last-write-wins) and trigger
/// the window emission check. A gyro event with an empty buffer is dropped.
///
/// All mutation goes through `&mut self`; the owner is responsible for
/// serializing events from both producers onto this one value.
#[derive(Debug)]
pub struct StreamSynchronizer {
    config: CollectionConfig,
    gravity: GravityFilter,
    buffer: WindowBuffer,
    rate: RateTracker,
}

impl StreamSynchronizer {
    pub fn new(config: CollectionConfig) -> SensorResult<Self> {
        config.validate()?;

        Ok(StreamSynchronizer {
            gravity: GravityFilter::new(config.gravity_alpha),
            buffer: WindowBuffer::new(config.window_size, config.step_size),
            rate: RateTracker::new(),
            config,
        })
    }

    /// Route a raw sample to the matching handler
    pub fn handle(&mut self, sample: RawSample) -> Option<SensorWindow> {
        match sample.source {
            SensorSource::Accelerometer => {
                self.on_accelerometer(sample);
                None
            }
            SensorSource::Gyroscope => self.on_gyroscope(sample),
        }
    }

    /// Accelerometer event: gravity-filter the reading and append a new
    /// combined sample. Non-finite readings are skipped, not clamped.
    pub fn on_accelerometer(&mut self, sample: RawSample) {
        if !sample.reading.is_finite() {
            return;
        }

        let linear = self.gravity.update(sample.reading);
        self.buffer
            .push(CombinedSample::from_linear_accel(linear, sample.timestamp_ms));
        self.rate.on_sample(sample.timestamp_ms);
    }

    /// Gyroscope event: fuse into the most recent combined sample, then run
    /// the edge-triggered window check. Returns the emitted window, if any.
    pub fn on_gyroscope(&mut self, sample: RawSample) -> Option<SensorWindow> {
        if !sample.reading.is_finite() {
            return None;
        }

        if !self.buffer.fuse_gyro(sample.reading) {
            // No sample to attach to yet
            return None;
        }

        let window = self.buffer.try_emit(sample.timestamp_ms)?;
        self.rate.on_window(sample.timestamp_ms);
        Some(window)
    }

    /// Cumulative session counters
    pub fn stats(&self) -> SensorStats {
        self.rate.stats()
    }

    /// Number of combined samples currently buffered
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Reset gravity estimate, buffer and counters (session start)
    pub fn reset(&mut self) {
        self.gravity.reset();
        self.buffer.reset();
        self.rate.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadsense_core::Vector3;

    fn test_config() -> CollectionConfig {
        CollectionConfig::default()
    }

    /// Feed one accel+gyro pair at the given timestamp
    fn feed_pair(
        sync: &mut StreamSynchronizer,
        accel: Vector3,
        gyro: Vector3,
        ts: u64,
    ) -> Option<SensorWindow> {
        sync.on_accelerometer(RawSample::accelerometer(accel, ts));
        sync.on_gyroscope(RawSample::gyroscope(gyro, ts))
    }

    #[test]
    fn test_exactly_one_window_at_window_size() {
        let config = test_config();
        let mut sync = StreamSynchronizer::new(config.clone()).unwrap();

        let mut windows = Vec::new();
        for i in 0..config.window_size {
            let ts = (i as u64) * 20;
            if let Some(w) = feed_pair(&mut sync, Vector3::new(0.0, 0.0, 9.8), Vector3::zero(), ts)
            {
                windows.push(w);
            }
        }

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].len(), config.window_size);
        // Buffer slid forward by step_size
        assert_eq!(sync.buffered_len(), config.window_size - config.step_size);
    }

    #[test]
    fn test_two_windows_for_overlapping_feed() {
        let config = test_config();
        let mut sync = StreamSynchronizer::new(config.clone()).unwrap();

        // 2*WINDOW_SIZE - STEP_SIZE pairs emit exactly two windows
        let total = 2 * config.window_size - config.step_size;
        let mut emitted = 0;
        for i in 0..total {
            let ts = (i as u64) * 20;
            if feed_pair(&mut sync, Vector3::new(0.1, 0.0, 9.8), Vector3::zero(), ts).is_some() {
                emitted += 1;
            }
        }

        assert_eq!(emitted, 2);
    }

    #[test]
    fn test_gyro_before_any_accel_is_dropped() {
        let mut sync = StreamSynchronizer::new(test_config()).unwrap();

        let result = sync.on_gyroscope(RawSample::gyroscope(Vector3::new(1.0, 0.0, 0.0), 5));
        assert!(result.is_none());
        assert_eq!(sync.buffered_len(), 0);
        assert_eq!(sync.stats(), SensorStats::default());
    }

    #[test]
    fn test_gravity_tracked_scenario() {
        // Constant (0, 0, 9.8) accel with zero gyro: by the last row the
        // gravity estimate has converged and linear acceleration is ~zero.
        let config = test_config();
        let mut sync = StreamSynchronizer::new(config.clone()).unwrap();

        let mut window = None;
        for i in 0..config.window_size {
            let ts = (i as u64) * 20;
            if let Some(w) = feed_pair(&mut sync, Vector3::new(0.0, 0.0, 9.8), Vector3::zero(), ts)
            {
                window = Some(w);
            }
        }
        let window = window.expect("one window expected");

        for row in &window.rows {
            assert_eq!([row[3], row[4], row[5]], [0.0, 0.0, 0.0]);
        }

        let first_row = window.rows[0];
        let last_row = window.rows[config.window_size - 1];
        // First row still carries most of gravity; last row is fully tracked
        assert!(first_row[2].abs() > 1.0);
        assert!(last_row[2].abs() < 1e-3);
    }

    #[test]
    fn test_rate_reported_near_nominal() {
        let config = test_config();
        let mut sync = StreamSynchronizer::new(config.clone()).unwrap();

        // 100 pairs at exact 20ms spacing: 50Hz within rounding tolerance
        for i in 0..config.window_size {
            let ts = (i as u64 + 1) * 20;
            feed_pair(&mut sync, Vector3::new(0.0, 0.0, 9.8), Vector3::zero(), ts);
        }

        let stats = sync.stats();
        assert_eq!(stats.window_count, 1);
        assert!((stats.frequency_hz as i64 - 50).abs() <= 1);
    }

    #[test]
    fn test_rate_with_boot_relative_timebase() {
        // Producers stamping boot-relative milliseconds (not UNIX epoch)
        // must still get a sane first frequency reading
        let config = test_config();
        let mut sync = StreamSynchronizer::new(config.clone()).unwrap();

        let base = 3_600_000u64;
        for i in 0..config.window_size {
            let ts = base + (i as u64) * 20;
            feed_pair(&mut sync, Vector3::new(0.0, 0.0, 9.8), Vector3::zero(), ts);
        }

        let stats = sync.stats();
        assert_eq!(stats.window_count, 1);
        assert!((stats.frequency_hz as i64 - 50).abs() <= 1);
    }

    #[test]
    fn test_reset_clears_all_session_state() {
        let config = test_config();
        let mut sync = StreamSynchronizer::new(config.clone()).unwrap();

        for i in 0..config.window_size {
            feed_pair(
                &mut sync,
                Vector3::new(0.0, 0.0, 9.8),
                Vector3::zero(),
                (i as u64) * 20,
            );
        }
        assert!(sync.stats().sample_count > 0);

        sync.reset();
        assert_eq!(sync.stats(), SensorStats::default());
        assert_eq!(sync.buffered_len(), 0);

        // Gravity restarts from zero: first post-reset output is raw * alpha
        sync.on_accelerometer(RawSample::accelerometer(Vector3::new(0.0, 0.0, 9.8), 10_020));
        sync.on_gyroscope(RawSample::gyroscope(Vector3::zero(), 10_020));
        assert_eq!(sync.buffered_len(), 1);
        assert_eq!(sync.stats().sample_count, 1);
    }

    #[test]
    fn test_non_finite_samples_are_skipped() {
        let mut sync = StreamSynchronizer::new(test_config()).unwrap();

        sync.on_accelerometer(RawSample::accelerometer(
            Vector3::new(f32::NAN, 0.0, 0.0),
            0,
        ));
        assert_eq!(sync.buffered_len(), 0);
        assert_eq!(sync.stats().sample_count, 0);

        sync.on_accelerometer(RawSample::accelerometer(Vector3::new(0.0, 0.0, 9.8), 20));
        let fused = sync.on_gyroscope(RawSample::gyroscope(
            Vector3::new(f32::INFINITY, 0.0, 0.0),
            20,
        ));
        assert!(fused.is_none());
        assert_eq!(sync.buffered_len(), 1);
    }

    #[test]
    fn test_gyro_last_write_wins() {
        let mut sync = StreamSynchronizer::new(test_config()).unwrap();

        sync.on_accelerometer(RawSample::accelerometer(Vector3::new(0.0, 0.0, 9.8), 0));
        sync.on_gyroscope(RawSample::gyroscope(Vector3::new(0.1, 0.0, 0.0), 2));
        // A second gyro reading before the next accel overwrites the first
        sync.on_gyroscope(RawSample::gyroscope(Vector3::new(0.9, 0.0, 0.0), 4));

        // Fill the window and inspect the first row
        let config = sync.config().clone();
        let mut window = None;
        for i in 1..config.window_size {
            let ts = (i as u64) * 20;
            sync.on_accelerometer(RawSample::accelerometer(Vector3::new(0.0, 0.0, 9.8), ts));
            if let Some(w) = sync.on_gyroscope(RawSample::gyroscope(Vector3::zero(), ts)) {
                window = Some(w);
            }
        }

        let window = window.expect("one window expected");
        assert!((window.rows[0][3] - 0.9).abs() < 1e-6);
    }
}
