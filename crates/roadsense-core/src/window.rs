//! SensorWindow: fixed-size motion window handed to the consumer

use uuid::Uuid;

/// Immutable fixed-size window of fused sensor rows
///
/// Each row is (ax, ay, az, gx, gy, gz). Ownership transfers to the consumer
/// on emission; the collection core keeps no reference afterwards.
#[derive(Debug, Clone)]
pub struct SensorWindow {
    /// Unique identifier for this window
    pub id: Uuid,
    /// Ordered rows, exactly `window_size` of them at emission
    pub rows: Vec<[f32; 6]>,
    /// Emission timestamp (monotonic milliseconds)
    pub timestamp_ms: u64,
}

/// Column indices into a window row
pub mod axis {
    pub const AX: usize = 0;
    pub const AY: usize = 1;
    pub const AZ: usize = 2;
    pub const GX: usize = 3;
    pub const GY: usize = 4;
    pub const GZ: usize = 5;
}

impl SensorWindow {
    pub fn new(rows: Vec<[f32; 6]>, timestamp_ms: u64) -> Self {
        SensorWindow {
            id: Uuid::new_v4(),
            rows,
            timestamp_ms,
        }
    }

    /// Number of rows in the window
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Extract one column (see [`axis`]) as a vector
    pub fn column(&self, index: usize) -> Vec<f32> {
        self.rows.iter().map(|row| row[index]).collect()
    }

    /// Summary statistics for one column, for diagnostics and display
    pub fn axis_stats(&self, index: usize) -> AxisStats {
        AxisStats::calculate(&self.column(index))
    }

    /// Peak linear-acceleration magnitude across the window
    pub fn peak_accel_magnitude(&self) -> f32 {
        self.rows
            .iter()
            .map(|row| (row[0] * row[0] + row[1] * row[1] + row[2] * row[2]).sqrt())
            .fold(0.0, f32::max)
    }
}

/// Basic statistics for one window column
#[derive(Debug, Clone, PartialEq)]
pub struct AxisStats {
    pub mean: f32,
    pub rms: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
    pub peak_to_peak: f32,
}

impl AxisStats {
    pub fn calculate(data: &[f32]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let sum: f32 = data.iter().sum();
        let mean = sum / data.len() as f32;

        let sum_sq: f32 = data.iter().map(|x| x * x).sum();
        let rms = (sum_sq / data.len() as f32).sqrt();

        let variance: f32 =
            data.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / data.len() as f32;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f32::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));

        AxisStats {
            mean,
            rms,
            std_dev,
            min,
            max,
            peak_to_peak: max - min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_columns() {
        let window = SensorWindow::new(
            vec![[1.0, 0.0, 0.0, 0.5, 0.0, 0.0], [3.0, 0.0, 0.0, 1.5, 0.0, 0.0]],
            1000,
        );

        assert_eq!(window.len(), 2);
        assert_eq!(window.column(axis::AX), vec![1.0, 3.0]);
        assert_eq!(window.column(axis::GX), vec![0.5, 1.5]);
    }

    #[test]
    fn test_axis_stats() {
        let stats = AxisStats::calculate(&[1.0, 3.0]);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.peak_to_peak, 2.0);
        assert!((stats.std_dev - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_axis_stats_empty() {
        let stats = AxisStats::calculate(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.peak_to_peak, 0.0);
    }

    #[test]
    fn test_peak_accel_magnitude() {
        let window = SensorWindow::new(
            vec![[0.0, 0.0, 1.0, 0.0, 0.0, 0.0], [3.0, 4.0, 0.0, 0.0, 0.0, 0.0]],
            0,
        );
        assert!((window.peak_accel_magnitude() - 5.0).abs() < 1e-6);
    }
}
