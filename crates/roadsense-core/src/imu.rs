//! IMU sample types shared across the collection pipeline

use serde::{Deserialize, Serialize};

/// Which physical instrument produced a raw sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorSource {
    /// 3-axis accelerometer (m/s²)
    Accelerometer,
    /// 3-axis gyroscope (rad/s)
    Gyroscope,
}

impl std::fmt::Display for SensorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorSource::Accelerometer => write!(f, "accelerometer"),
            SensorSource::Gyroscope => write!(f, "gyroscope"),
        }
    }
}

/// 3-axis vector reading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3 { x, y, z }
    }

    pub fn zero() -> Self {
        Vector3::default()
    }

    /// All three components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// One instrument reading as delivered by a sensor producer
///
/// Timestamps are monotonic milliseconds supplied by the producer; the
/// collection core treats them as the only notion of time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub source: SensorSource,
    pub reading: Vector3,
    pub timestamp_ms: u64,
}

impl RawSample {
    pub fn accelerometer(reading: Vector3, timestamp_ms: u64) -> Self {
        RawSample {
            source: SensorSource::Accelerometer,
            reading,
            timestamp_ms,
        }
    }

    pub fn gyroscope(reading: Vector3, timestamp_ms: u64) -> Self {
        RawSample {
            source: SensorSource::Gyroscope,
            reading,
            timestamp_ms,
        }
    }
}

/// Fused per-timestep record: linear acceleration plus angular velocity
///
/// Gyroscope fields default to zero until the next gyroscope reading is
/// merged into this sample. The gyro value may therefore come from a
/// slightly later instant than the acceleration value (bounded staleness).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedSample {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
    pub timestamp_ms: u64,
}

impl CombinedSample {
    /// Create a combined sample from a gravity-filtered acceleration,
    /// with angular velocity defaulted to zero
    pub fn from_linear_accel(linear: Vector3, timestamp_ms: u64) -> Self {
        CombinedSample {
            ax: linear.x,
            ay: linear.y,
            az: linear.z,
            gx: 0.0,
            gy: 0.0,
            gz: 0.0,
            timestamp_ms,
        }
    }

    /// Overwrite the angular-velocity fields (last-write-wins fusion)
    pub fn set_angular_velocity(&mut self, angular: Vector3) {
        self.gx = angular.x;
        self.gy = angular.y;
        self.gz = angular.z;
    }

    /// Row layout used by emitted windows: (ax, ay, az, gx, gy, gz)
    pub fn row(&self) -> [f32; 6] {
        [self.ax, self.ay, self.az, self.gx, self.gy, self.gz]
    }
}

/// Cumulative per-session counters exposed to the consumer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorStats {
    /// Total raw accelerometer samples processed this session
    pub sample_count: u64,
    /// Total windows emitted this session
    pub window_count: u64,
    /// Achieved sampling frequency (Hz), trailing average over the
    /// interval since the previous window emission
    pub frequency_hz: u32,
}

impl SensorStats {
    pub fn reset(&mut self) {
        *self = SensorStats::default();
    }
}
