//! RoadSense daemon: simulated drive feeding the collection pipeline

mod collector;
mod detector;

use collector::CollectionController;
use detector::ThresholdDetector;
use roadsense_processing::CollectionConfig;
use roadsense_simulation::{
    start_sensor_feed, FeedCommand, FeedConfig, ImuConfig, RoadPattern,
};
use tokio::time::{timeout, Duration};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let started = chrono::Local::now();
    info!("RoadSense daemon starting at {}", started.format("%Y-%m-%d %H:%M:%S"));

    // Simulated drive over a stretch with recurring potholes
    let feed_config = FeedConfig {
        imu_config: ImuConfig {
            pattern: RoadPattern::Pothole {
                depth: 6.0,
                every_secs: 3.0,
                duration_secs: 0.25,
            },
            ..Default::default()
        },
        ..Default::default()
    };

    let config = CollectionConfig::default();
    info!(
        "Pipeline: {}Hz sensors, {}-sample windows, step {}",
        config.sensor_frequency_hz, config.window_size, config.step_size
    );

    let (accel, gyro, feed_control, feed_stats) = start_sensor_feed(feed_config)?;

    let mut controller =
        CollectionController::new(config, Box::new(accel), Box::new(gyro))?;
    let mut windows = controller.subscribe_windows();
    let detector = ThresholdDetector::default();

    controller.start().await?;
    feed_control.send(FeedCommand::Start).await?;

    // Bounded demo session: a handful of windows, then a summary
    let mut detections = 0u32;
    for _ in 0..8 {
        let window = match timeout(Duration::from_secs(10), windows.recv()).await {
            Ok(Ok(window)) => window,
            Ok(Err(e)) => {
                warn!("window stream ended early: {}", e);
                break;
            }
            Err(_) => {
                warn!("timed out waiting for a window");
                break;
            }
        };

        let peak = window.peak_accel_magnitude();
        match detector.analyze(&window) {
            Some(report) => {
                detections += 1;
                info!(
                    "{}: severity {:.2}, confidence {:.2} (peak {:.1} m/s²)",
                    report.kind, report.severity, report.confidence, peak
                );
            }
            None => {
                info!("window {} clean (peak {:.1} m/s²)", window.id, peak);
            }
        }
    }

    // Snapshot the feed counters before Stop zeroes them
    let feed_snapshot = feed_stats.lock().await.clone();
    let _ = feed_control.send(FeedCommand::Stop).await;
    controller.stop().await;

    let stats = controller.stats().await;
    info!(
        "Session {} -> {}: {} of {} samples windowed, {} windows at {}Hz, {} detections",
        started.format("%H:%M:%S"),
        chrono::Local::now().format("%H:%M:%S"),
        stats.sample_count,
        feed_snapshot.accel_emitted,
        stats.window_count,
        stats.frequency_hz,
        detections
    );

    Ok(())
}
