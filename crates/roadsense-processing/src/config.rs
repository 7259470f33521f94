//! Configuration for the collection pipeline

use roadsense_core::{SensorError, SensorResult};
use serde::{Deserialize, Serialize};

/// Tunable parameters for one collection session
///
/// All pipeline constants live here so deployments can adjust them without
/// touching the algorithm body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Target sampling rate for both sensors (Hz)
    pub sensor_frequency_hz: f32,
    /// Samples per emitted window
    pub window_size: usize,
    /// Slide increment between consecutive windows (samples)
    pub step_size: usize,
    /// Smoothing constant for the gravity low-pass filter, in (0, 1)
    pub gravity_alpha: f32,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            sensor_frequency_hz: 50.0, // 20ms interval
            window_size: 100,          // 2 seconds at 50Hz
            step_size: 50,             // 50% overlap
            gravity_alpha: 0.8,
        }
    }
}

impl CollectionConfig {
    /// Higher-rate profile for vehicles with fast suspension dynamics
    pub fn high_rate() -> Self {
        Self {
            sensor_frequency_hz: 100.0,
            window_size: 200,
            step_size: 100,
            gravity_alpha: 0.9,
        }
    }

    /// Reduced-rate profile for battery-constrained deployments
    pub fn low_power() -> Self {
        Self {
            sensor_frequency_hz: 25.0,
            window_size: 50,
            step_size: 25,
            gravity_alpha: 0.8,
        }
    }

    /// Nominal interval between samples in milliseconds
    pub fn update_interval_ms(&self) -> u64 {
        (1000.0 / self.sensor_frequency_hz).round() as u64
    }

    /// Validate the configuration
    pub fn validate(&self) -> SensorResult<()> {
        if !self.sensor_frequency_hz.is_finite() || self.sensor_frequency_hz <= 0.0 {
            return Err(SensorError::InvalidConfig {
                message: format!(
                    "sensor frequency must be positive, got {}",
                    self.sensor_frequency_hz
                ),
            });
        }

        if self.window_size == 0 {
            return Err(SensorError::InvalidConfig {
                message: "window size must be greater than 0".to_string(),
            });
        }

        if self.step_size == 0 || self.step_size > self.window_size {
            return Err(SensorError::InvalidConfig {
                message: format!(
                    "step size must be in 1..={}, got {}",
                    self.window_size, self.step_size
                ),
            });
        }

        if !self.gravity_alpha.is_finite()
            || self.gravity_alpha <= 0.0
            || self.gravity_alpha >= 1.0
        {
            return Err(SensorError::InvalidConfig {
                message: format!(
                    "gravity alpha must be in (0, 1), got {}",
                    self.gravity_alpha
                ),
            });
        }

        Ok(())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> SensorResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SensorError::InvalidConfig {
            message: format!("Failed to serialize configuration: {}", e),
        })
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> SensorResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SensorError::InvalidConfig {
                message: format!("Failed to deserialize configuration: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }
}
