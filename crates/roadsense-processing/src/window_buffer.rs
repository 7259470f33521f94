//! Sliding window accumulation over fused samples

use roadsense_core::{CombinedSample, SensorWindow, Vector3};

/// Accumulates combined samples and emits fixed-size overlapping windows
///
/// The buffer grows until it holds `window_size` samples; emission then
/// drains the first `step_size` samples so consecutive windows overlap by
/// `window_size - step_size` rows.
#[derive(Debug)]
pub struct WindowBuffer {
    window_size: usize,
    step_size: usize,
    samples: Vec<CombinedSample>,
}

impl WindowBuffer {
    pub fn new(window_size: usize, step_size: usize) -> Self {
        WindowBuffer {
            window_size,
            step_size,
            samples: Vec::with_capacity(window_size),
        }
    }

    /// Append a combined sample at the buffer tail
    pub fn push(&mut self, sample: CombinedSample) {
        self.samples.push(sample);
    }

    /// Overwrite the gyroscope fields of the most recently appended sample.
    /// Returns false when the buffer is empty (reading is dropped).
    pub fn fuse_gyro(&mut self, angular: Vector3) -> bool {
        match self.samples.last_mut() {
            Some(sample) => {
                sample.set_angular_velocity(angular);
                true
            }
            None => false,
        }
    }

    /// Edge-triggered emission check
    ///
    /// Emits exactly one window when at least `window_size` samples have
    /// accumulated, then slides the buffer forward by `step_size`. Even if
    /// the buffer has grown well past the threshold (a stalled consumer),
    /// only one window is drained per call.
    pub fn try_emit(&mut self, now_ms: u64) -> Option<SensorWindow> {
        if self.samples.len() < self.window_size {
            return None;
        }

        let rows = self.samples[..self.window_size]
            .iter()
            .map(CombinedSample::row)
            .collect();
        self.samples.drain(..self.step_size);

        Some(SensorWindow::new(rows, now_ms))
    }

    /// Number of buffered samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Discard all buffered samples (session teardown / start)
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}
