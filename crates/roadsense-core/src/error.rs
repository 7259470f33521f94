//! Error handling for the RoadSense workspace
//!
//! Provides the shared error type for collection, processing and simulation
//! operations.

use core::fmt;

/// Result type alias for RoadSense operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Error type shared across the RoadSense crates
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SensorError {
    /// Invalid collection or simulation configuration
    InvalidConfig {
        /// Description of the configuration error
        message: String,
    },

    /// A sensor producer could not be subscribed to
    ProducerUnavailable {
        /// Which sensor failed (accelerometer/gyroscope)
        sensor: &'static str,
        /// Why the subscription failed
        reason: String,
    },

    /// An internal channel closed while a session was active
    ChannelClosed {
        /// Which channel closed
        channel: &'static str,
    },

    /// Simulation setup or generation error
    SimulationError {
        /// Description of the simulation issue
        message: String,
    },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::InvalidConfig { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
            SensorError::ProducerUnavailable { sensor, reason } => {
                write!(f, "Sensor producer unavailable ({}): {}", sensor, reason)
            }
            SensorError::ChannelClosed { channel } => {
                write!(f, "Channel closed: {}", channel)
            }
            SensorError::SimulationError { message } => {
                write!(f, "Simulation error: {}", message)
            }
        }
    }
}

impl std::error::Error for SensorError {}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::SensorError::InvalidConfig {
            message: format!($($arg)*),
        }
    };
}
