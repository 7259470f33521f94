//! Collection controller: session lifecycle around the fusion pipeline

use roadsense_core::{RawSample, SensorError, SensorResult, SensorStats, SensorWindow};
use roadsense_processing::{CollectionConfig, StreamSynchronizer};
use roadsense_simulation::FeedHandle;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// A subscribable producer of raw sensor samples
///
/// Subscription happens at session start; a producer that cannot deliver
/// must fail here so the session never goes active half-wired.
pub trait SampleSource: Send + Sync {
    fn subscribe(&self) -> SensorResult<broadcast::Receiver<RawSample>>;
}

impl SampleSource for FeedHandle {
    fn subscribe(&self) -> SensorResult<broadcast::Receiver<RawSample>> {
        FeedHandle::subscribe(self)
    }
}

/// State shared between the controller and the running session task
#[derive(Debug, Default)]
struct SessionShared {
    current_window: Option<SensorWindow>,
    stats: SensorStats,
}

struct SessionTask {
    handle: JoinHandle<()>,
    shutdown: oneshot::Sender<()>,
}

/// Two-state collection controller
///
/// Idle: no subscriptions, nothing buffered. Active: one background task
/// owns the `StreamSynchronizer` and is the only writer to it, so fusion
/// state never needs locking. `start` and `stop` are idempotent.
///
/// Stats from a finished session stay readable until the next `start`.
pub struct CollectionController {
    config: CollectionConfig,
    accel_source: Box<dyn SampleSource>,
    gyro_source: Box<dyn SampleSource>,
    shared: Arc<Mutex<SessionShared>>,
    window_sender: broadcast::Sender<SensorWindow>,
    session: Option<SessionTask>,
}

impl CollectionController {
    pub fn new(
        config: CollectionConfig,
        accel_source: Box<dyn SampleSource>,
        gyro_source: Box<dyn SampleSource>,
    ) -> SensorResult<Self> {
        config.validate()?;
        let (window_sender, _) = broadcast::channel(32);

        Ok(CollectionController {
            config,
            accel_source,
            gyro_source,
            shared: Arc::new(Mutex::new(SessionShared::default())),
            window_sender,
            session: None,
        })
    }

    /// Get a receiver for emitted windows
    pub fn subscribe_windows(&self) -> broadcast::Receiver<SensorWindow> {
        self.window_sender.subscribe()
    }

    /// Whether a session is currently running
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Most recently emitted window of the current session
    pub async fn current_window(&self) -> Option<SensorWindow> {
        self.shared.lock().await.current_window.clone()
    }

    /// Counters of the current session, or of the last one while idle
    pub async fn stats(&self) -> SensorStats {
        self.shared.lock().await.stats
    }

    /// Begin a collection session. No-op when already active.
    ///
    /// Both subscriptions must succeed before any state changes; a failed
    /// producer leaves the controller idle with the previous stats intact.
    pub async fn start(&mut self) -> SensorResult<()> {
        if self.session.is_some() {
            return Ok(());
        }

        let accel_rx = self.accel_source.subscribe()?;
        let gyro_rx = self.gyro_source.subscribe()?;

        // Timing comes entirely from producer timestamps; the rate tracker
        // opens its first interval at the first received sample
        let synchronizer = StreamSynchronizer::new(self.config.clone())?;

        {
            let mut shared = self.shared.lock().await;
            shared.current_window = None;
            shared.stats.reset();
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let shared = self.shared.clone();
        let window_sender = self.window_sender.clone();

        let handle = tokio::spawn(async move {
            run_session(synchronizer, accel_rx, gyro_rx, shutdown_rx, shared, window_sender)
                .await;
        });

        self.session = Some(SessionTask {
            handle,
            shutdown: shutdown_tx,
        });

        info!(frequency_hz = self.config.sensor_frequency_hz, "collection session started");
        Ok(())
    }

    /// End the current session. No-op when already idle.
    ///
    /// The session task is torn down before any state is cleared, so no
    /// late sample can repopulate the buffer after the wipe.
    pub async fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        let _ = session.shutdown.send(());
        if let Err(e) = session.handle.await {
            warn!("session task join failed: {}", e);
        }

        let mut shared = self.shared.lock().await;
        shared.current_window = None;
        info!(
            samples = shared.stats.sample_count,
            windows = shared.stats.window_count,
            "collection session stopped"
        );
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }
}

/// Session event loop: the single owner of the synchronizer
async fn run_session(
    mut synchronizer: StreamSynchronizer,
    mut accel_rx: broadcast::Receiver<RawSample>,
    mut gyro_rx: broadcast::Receiver<RawSample>,
    mut shutdown_rx: oneshot::Receiver<()>,
    shared: Arc<Mutex<SessionShared>>,
    window_sender: broadcast::Sender<SensorWindow>,
) {
    loop {
        tokio::select! {
            sample = accel_rx.recv() => {
                match sample {
                    Ok(sample) => {
                        handle_sample(&mut synchronizer, sample, &shared, &window_sender).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("accelerometer stream lagged, skipped {} samples", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("accelerometer stream closed, ending session task");
                        break;
                    }
                }
            }

            sample = gyro_rx.recv() => {
                match sample {
                    Ok(sample) => {
                        handle_sample(&mut synchronizer, sample, &shared, &window_sender).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("gyroscope stream lagged, skipped {} samples", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("gyroscope stream closed, ending session task");
                        break;
                    }
                }
            }

            _ = &mut shutdown_rx => {
                break;
            }
        }
    }

    // Publish final counters for post-session inspection
    let mut shared = shared.lock().await;
    shared.stats = synchronizer.stats();
}

async fn handle_sample(
    synchronizer: &mut StreamSynchronizer,
    sample: RawSample,
    shared: &Arc<Mutex<SessionShared>>,
    window_sender: &broadcast::Sender<SensorWindow>,
) {
    if let Some(window) = synchronizer.handle(sample) {
        info!(
            window_id = %window.id,
            rows = window.len(),
            "window emitted"
        );

        {
            let mut shared = shared.lock().await;
            shared.current_window = Some(window.clone());
            shared.stats = synchronizer.stats();
        }

        // Ignore send errors; no subscribers is fine
        let _ = window_sender.send(window);
    }
}
