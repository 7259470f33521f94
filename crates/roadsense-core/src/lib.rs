//! RoadSense-Core: Foundation types for road-anomaly sensing
//!
//! Shared sample, window and error types used by the collection pipeline.

pub mod error;
pub mod imu;
pub mod window;

pub use error::{SensorError, SensorResult};
pub use imu::*;
pub use window::{axis, AxisStats, SensorWindow};
