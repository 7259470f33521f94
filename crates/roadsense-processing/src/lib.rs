//! RoadSense-Processing: Sensor fusion and windowing pipeline
//!
//! Gravity isolation, independent-rate stream synchronization, fixed-size
//! overlapping windowing and throughput accounting.

pub mod config;
pub mod gravity;
pub mod rate;
pub mod sync;
pub mod window_buffer;

pub use config::CollectionConfig;
pub use gravity::GravityFilter;
pub use rate::RateTracker;
pub use sync::StreamSynchronizer;
pub use window_buffer::WindowBuffer;
