//! Simulated vehicle IMU with configurable road patterns and noise

use crate::road_patterns::RoadPattern;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use roadsense_core::{SensorError, SensorResult, Vector3};
use serde::{Deserialize, Serialize};

/// Standard gravity, what a resting accelerometer reads on its z axis
pub const STANDARD_GRAVITY: f32 = 9.80665;

/// Configuration for IMU simulation
#[derive(Debug, Clone)]
pub struct ImuConfig {
    /// Nominal sampling rate in Hz
    pub sampling_rate: f32,
    /// Road-surface profile being driven over
    pub pattern: RoadPattern,
    /// Sensor noise configuration
    pub noise: NoiseConfig,
    /// Gravity magnitude applied on the z axis
    pub gravity: f32,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

/// Noise configuration for realistic sensor output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Accelerometer gaussian noise standard deviation (m/s²)
    pub accel_std: f32,
    /// Gyroscope gaussian noise standard deviation (rad/s)
    pub gyro_std: f32,
    /// Probability of a vibration artifact spike per sample
    pub artifact_prob: f32,
    /// Artifact spike amplitude (m/s²)
    pub artifact_amp: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            accel_std: 0.08,
            gyro_std: 0.01,
            artifact_prob: 0.005,
            artifact_amp: 1.5,
        }
    }
}

impl Default for ImuConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 50.0,
            pattern: RoadPattern::Smooth { roughness: 0.3 },
            noise: NoiseConfig::default(),
            gravity: STANDARD_GRAVITY,
            seed: None,
        }
    }
}

impl ImuConfig {
    pub fn validate(&self) -> SensorResult<()> {
        if !self.sampling_rate.is_finite()
            || self.sampling_rate < 1.0
            || self.sampling_rate > 1000.0
        {
            return Err(SensorError::SimulationError {
                message: format!(
                    "sampling rate must be in 1-1000Hz, got {}",
                    self.sampling_rate
                ),
            });
        }
        Ok(())
    }
}

/// Seedable 6-axis IMU simulator
pub struct ImuSimulator {
    config: ImuConfig,
    rng: rand::rngs::StdRng,
    accel_noise: Normal<f32>,
    gyro_noise: Normal<f32>,
}

impl ImuSimulator {
    pub fn new(config: ImuConfig) -> SensorResult<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_secs()
        });

        let rng = rand::rngs::StdRng::seed_from_u64(seed);
        let accel_noise = Normal::new(0.0, config.noise.accel_std).map_err(|e| {
            SensorError::SimulationError {
                message: format!("Failed to create accel noise distribution: {}", e),
            }
        })?;
        let gyro_noise = Normal::new(0.0, config.noise.gyro_std).map_err(|e| {
            SensorError::SimulationError {
                message: format!("Failed to create gyro noise distribution: {}", e),
            }
        })?;

        Ok(ImuSimulator {
            config,
            rng,
            accel_noise,
            gyro_noise,
        })
    }

    /// Raw accelerometer reading at the given time: gravity on z plus the
    /// road excitation and noise
    pub fn accel_at(&mut self, time: f32) -> Vector3 {
        let vertical = self.config.pattern.vertical_accel_at(time);

        let mut x = self.accel_noise.sample(&mut self.rng);
        let mut y = self.accel_noise.sample(&mut self.rng);
        let mut z = self.config.gravity + vertical + self.accel_noise.sample(&mut self.rng);

        // Occasional vibration artifact spread across axes. Zero amplitude
        // disables artifacts regardless of probability; gen_range rejects
        // an empty range.
        let amp = self.config.noise.artifact_amp;
        if amp > 0.0 && self.rng.gen::<f32>() < self.config.noise.artifact_prob {
            x += self.rng.gen_range(-amp..amp);
            y += self.rng.gen_range(-amp..amp);
            z += self.rng.gen_range(-amp..amp);
        }

        // Clamp to an 8g sensor range
        let limit = 8.0 * STANDARD_GRAVITY;
        Vector3::new(
            x.clamp(-limit, limit),
            y.clamp(-limit, limit),
            z.clamp(-limit, limit),
        )
    }

    /// Raw gyroscope reading at the given time: pitch excitation plus noise
    pub fn gyro_at(&mut self, time: f32) -> Vector3 {
        let pitch = self.config.pattern.pitch_rate_at(time);

        Vector3::new(
            pitch + self.gyro_noise.sample(&mut self.rng),
            self.gyro_noise.sample(&mut self.rng),
            self.gyro_noise.sample(&mut self.rng),
        )
    }

    /// Swap the road pattern mid-run
    pub fn set_pattern(&mut self, pattern: RoadPattern) {
        self.config.pattern = pattern;
    }

    pub fn config(&self) -> &ImuConfig {
        &self.config
    }
}
