//! Real-time simulated sensor feed with independent accel/gyro cadence

use crate::imu_simulator::{ImuConfig, ImuSimulator};
use crate::road_patterns::RoadPattern;
use roadsense_core::{RawSample, SensorError, SensorResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, interval_at, Duration, Instant};

/// Configuration for the real-time feed
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// IMU simulation configuration
    pub imu_config: ImuConfig,
    /// Broadcast channel capacity per sensor stream
    pub channel_capacity: usize,
    /// Gyroscope tick lag behind the accelerometer tick, in milliseconds
    ///
    /// Phone gyro callbacks typically land just after the matching accel
    /// callback; the small lag means each gyro reading has a buffered
    /// sample to attach to.
    pub gyro_lag_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            imu_config: ImuConfig::default(),
            channel_capacity: 256,
            gyro_lag_ms: 2,
        }
    }
}

/// Commands for controlling the feed
#[derive(Debug, Clone)]
pub enum FeedCommand {
    Start,
    Stop,
    UpdatePattern(RoadPattern),
}

/// Feed statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedStats {
    pub is_running: bool,
    pub accel_emitted: u64,
    pub gyro_emitted: u64,
    pub last_update_ms: u64,
}

/// Subscription handle for one sensor stream
///
/// Stays valid after the feed task exits; `subscribe` reports the closure
/// instead of handing out a dead receiver.
#[derive(Debug, Clone)]
pub struct FeedHandle {
    sensor: &'static str,
    sender: broadcast::Sender<RawSample>,
    closed: Arc<AtomicBool>,
}

impl FeedHandle {
    pub fn subscribe(&self) -> SensorResult<broadcast::Receiver<RawSample>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SensorError::ProducerUnavailable {
                sensor: self.sensor,
                reason: "feed task has shut down".to_string(),
            });
        }
        Ok(self.sender.subscribe())
    }
}

/// Real-time simulated IMU feed
///
/// Emits accelerometer and gyroscope readings on separate broadcast
/// channels from two tickers at the same nominal rate, the gyro ticker
/// lagging slightly.
pub struct SensorFeed {
    config: FeedConfig,
    simulator: Arc<Mutex<ImuSimulator>>,
    accel_sender: broadcast::Sender<RawSample>,
    gyro_sender: broadcast::Sender<RawSample>,
    control_receiver: mpsc::Receiver<FeedCommand>,
    control_sender: mpsc::Sender<FeedCommand>,
    is_running: Arc<Mutex<bool>>,
    stats: Arc<Mutex<FeedStats>>,
    closed: Arc<AtomicBool>,
}

impl SensorFeed {
    pub fn new(config: FeedConfig) -> SensorResult<Self> {
        let simulator = ImuSimulator::new(config.imu_config.clone())?;
        let (accel_sender, _) = broadcast::channel(config.channel_capacity);
        let (gyro_sender, _) = broadcast::channel(config.channel_capacity);
        let (control_sender, control_receiver) = mpsc::channel(32);

        Ok(SensorFeed {
            config,
            simulator: Arc::new(Mutex::new(simulator)),
            accel_sender,
            gyro_sender,
            control_receiver,
            control_sender,
            is_running: Arc::new(Mutex::new(false)),
            stats: Arc::new(Mutex::new(FeedStats::default())),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Handle for subscribing to accelerometer readings
    pub fn accel_handle(&self) -> FeedHandle {
        FeedHandle {
            sensor: "accelerometer",
            sender: self.accel_sender.clone(),
            closed: self.closed.clone(),
        }
    }

    /// Handle for subscribing to gyroscope readings
    pub fn gyro_handle(&self) -> FeedHandle {
        FeedHandle {
            sensor: "gyroscope",
            sender: self.gyro_sender.clone(),
            closed: self.closed.clone(),
        }
    }

    /// Get control sender for sending commands
    pub fn control_handle(&self) -> mpsc::Sender<FeedCommand> {
        self.control_sender.clone()
    }

    /// Check if the feed is emitting
    pub async fn is_running(&self) -> bool {
        *self.is_running.lock().await
    }

    /// Snapshot of the current feed statistics
    pub async fn stats(&self) -> FeedStats {
        self.stats.lock().await.clone()
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Run the emission loop until the control channel closes
    pub async fn run(&mut self) -> SensorResult<()> {
        let period = Duration::from_secs_f32(1.0 / self.config.imu_config.sampling_rate);
        let gyro_lag = Duration::from_millis(self.config.gyro_lag_ms);

        let mut accel_timer = interval(period);
        let mut gyro_timer = interval_at(Instant::now() + gyro_lag, period);

        let started_at = Instant::now();

        let result = loop {
            tokio::select! {
                _ = accel_timer.tick() => {
                    if *self.is_running.lock().await {
                        let elapsed = started_at.elapsed().as_secs_f32();
                        let reading = {
                            let mut sim = self.simulator.lock().await;
                            sim.accel_at(elapsed)
                        };
                        let sample = RawSample::accelerometer(reading, wall_clock_ms());

                        {
                            let mut stats = self.stats.lock().await;
                            stats.accel_emitted += 1;
                            stats.last_update_ms = sample.timestamp_ms;
                        }

                        // Ignore send errors; no subscribers is fine
                        let _ = self.accel_sender.send(sample);
                    }
                }

                _ = gyro_timer.tick() => {
                    if *self.is_running.lock().await {
                        let elapsed = started_at.elapsed().as_secs_f32();
                        let reading = {
                            let mut sim = self.simulator.lock().await;
                            sim.gyro_at(elapsed)
                        };
                        let sample = RawSample::gyroscope(reading, wall_clock_ms());

                        {
                            let mut stats = self.stats.lock().await;
                            stats.gyro_emitted += 1;
                            stats.last_update_ms = sample.timestamp_ms;
                        }

                        let _ = self.gyro_sender.send(sample);
                    }
                }

                command = self.control_receiver.recv() => {
                    match command {
                        Some(FeedCommand::Start) => {
                            *self.is_running.lock().await = true;
                            self.stats.lock().await.is_running = true;
                        }
                        Some(FeedCommand::Stop) => {
                            *self.is_running.lock().await = false;
                            let mut stats = self.stats.lock().await;
                            stats.is_running = false;
                            stats.accel_emitted = 0;
                            stats.gyro_emitted = 0;
                        }
                        Some(FeedCommand::UpdatePattern(pattern)) => {
                            let mut sim = self.simulator.lock().await;
                            sim.set_pattern(pattern);
                        }
                        None => {
                            break Ok(());
                        }
                    }
                }
            }
        };

        self.closed.store(true, Ordering::SeqCst);
        result
    }
}

fn wall_clock_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Helper to create a feed and run it in a background task
pub fn start_sensor_feed(
    config: FeedConfig,
) -> SensorResult<(
    FeedHandle,
    FeedHandle,
    mpsc::Sender<FeedCommand>,
    Arc<Mutex<FeedStats>>,
)> {
    let mut feed = SensorFeed::new(config)?;
    let accel = feed.accel_handle();
    let gyro = feed.gyro_handle();
    let control = feed.control_handle();
    let stats_handle = feed.stats.clone();

    tokio::spawn(async move {
        if let Err(e) = feed.run().await {
            eprintln!("Sensor feed error: {}", e);
        }
    });

    Ok((accel, gyro, control, stats_handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imu_simulator::NoiseConfig;
    use roadsense_core::SensorSource;
    use tokio::time::sleep;

    fn fast_config() -> FeedConfig {
        FeedConfig {
            imu_config: ImuConfig {
                sampling_rate: 200.0,
                pattern: RoadPattern::Smooth { roughness: 0.1 },
                noise: NoiseConfig::default(),
                seed: Some(42),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_feed_emits_both_streams() {
        let (accel, gyro, control, _stats) = start_sensor_feed(fast_config()).unwrap();
        let mut accel_rx = accel.subscribe().unwrap();
        let mut gyro_rx = gyro.subscribe().unwrap();

        control.send(FeedCommand::Start).await.unwrap();
        sleep(Duration::from_millis(200)).await;

        let accel_sample = accel_rx.recv().await.unwrap();
        assert_eq!(accel_sample.source, SensorSource::Accelerometer);
        assert!(accel_sample.reading.is_finite());

        let gyro_sample = gyro_rx.recv().await.unwrap();
        assert_eq!(gyro_sample.source, SensorSource::Gyroscope);

        control.send(FeedCommand::Stop).await.unwrap();
    }

    #[tokio::test]
    async fn test_stats_track_emission() {
        let (_accel, _gyro, control, stats) = start_sensor_feed(fast_config()).unwrap();

        assert!(!stats.lock().await.is_running);

        control.send(FeedCommand::Start).await.unwrap();
        sleep(Duration::from_millis(200)).await;

        let snapshot = stats.lock().await.clone();
        assert!(snapshot.is_running);
        assert!(snapshot.accel_emitted > 0);
        assert!(snapshot.gyro_emitted > 0);
        assert!(snapshot.last_update_ms > 0);

        // Stop zeroes the counters
        control.send(FeedCommand::Stop).await.unwrap();
        sleep(Duration::from_millis(50)).await;

        let snapshot = stats.lock().await.clone();
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.accel_emitted, 0);
        assert_eq!(snapshot.gyro_emitted, 0);
    }

    #[tokio::test]
    async fn test_feed_silent_until_started() {
        let (accel, _gyro, control, _stats) = start_sensor_feed(fast_config()).unwrap();
        let mut accel_rx = accel.subscribe().unwrap();

        sleep(Duration::from_millis(100)).await;
        assert!(accel_rx.try_recv().is_err());

        control.send(FeedCommand::Start).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        assert!(accel_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_subscribe_after_shutdown_fails() {
        let (accel, _gyro, control, _stats) = start_sensor_feed(fast_config()).unwrap();

        drop(control);
        sleep(Duration::from_millis(100)).await;

        match accel.subscribe() {
            Err(SensorError::ProducerUnavailable { sensor, .. }) => {
                assert_eq!(sensor, "accelerometer");
            }
            other => panic!("expected ProducerUnavailable, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_pattern_update_while_running() {
        let (accel, _gyro, control, _stats) = start_sensor_feed(fast_config()).unwrap();
        let mut accel_rx = accel.subscribe().unwrap();

        control.send(FeedCommand::Start).await.unwrap();
        control
            .send(FeedCommand::UpdatePattern(RoadPattern::Cobblestone {
                amplitude: 1.0,
                frequency: 10.0,
            }))
            .await
            .unwrap();

        sleep(Duration::from_millis(100)).await;
        assert!(accel_rx.try_recv().is_ok());

        control.send(FeedCommand::Stop).await.unwrap();
    }
}
