//! RoadSense-Simulation: vehicle IMU signal generation
//!
//! Provides realistic accelerometer/gyroscope simulation for testing and
//! development without a phone in a moving car.

pub mod imu_simulator;
pub mod road_patterns;
pub mod sensor_feed;

pub use imu_simulator::*;
pub use road_patterns::*;
pub use sensor_feed::*;
