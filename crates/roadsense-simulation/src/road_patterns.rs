//! Pre-defined road-surface excitation patterns for realistic simulation

use std::f32::consts::PI;

/// Parametric road-surface profiles
///
/// Each pattern describes the vertical-acceleration and pitch-rate
/// excitation a vehicle's IMU sees as a function of time, before gravity
/// and sensor noise are added.
#[derive(Debug, Clone, Copy)]
pub enum RoadPattern {
    /// Well-paved road, only small random-looking texture
    Smooth { roughness: f32 },
    /// Recurring pothole impact: sharp drop followed by a rebound
    Pothole {
        depth: f32,
        every_secs: f32,
        duration_secs: f32,
    },
    /// Recurring speed bump: smooth rise-and-fall hump
    SpeedBump {
        height: f32,
        every_secs: f32,
        duration_secs: f32,
    },
    /// Continuous high-frequency vibration (cobblestone, gravel)
    Cobblestone { amplitude: f32, frequency: f32 },
}

impl RoadPattern {
    /// Vertical acceleration excitation (m/s²) at the given time
    pub fn vertical_accel_at(&self, time: f32) -> f32 {
        match self {
            RoadPattern::Smooth { roughness } => {
                // Low-level broadband texture from summed incommensurate tones
                roughness * ((2.0 * PI * 1.3 * time).sin() + 0.5 * (2.0 * PI * 3.7 * time).sin())
            }

            RoadPattern::Pothole {
                depth,
                every_secs,
                duration_secs,
            } => {
                let phase = time % every_secs;
                if phase < *duration_secs {
                    // Drop into the hole, then a harder rebound on exit
                    let p = phase / duration_secs;
                    if p < 0.5 {
                        -depth * (2.0 * PI * p).sin()
                    } else {
                        1.4 * depth * (2.0 * PI * p).sin()
                    }
                } else {
                    0.0
                }
            }

            RoadPattern::SpeedBump {
                height,
                every_secs,
                duration_secs,
            } => {
                let phase = time % every_secs;
                if phase < *duration_secs {
                    height * (PI * phase / duration_secs).sin()
                } else {
                    0.0
                }
            }

            RoadPattern::Cobblestone { amplitude, frequency } => {
                amplitude * (2.0 * PI * frequency * time).sin()
            }
        }
    }

    /// Pitch-rate excitation (rad/s) at the given time
    ///
    /// Vertical events rotate the chassis around the lateral axis; the
    /// pitch rate roughly follows the slope of the vertical profile.
    pub fn pitch_rate_at(&self, time: f32) -> f32 {
        match self {
            RoadPattern::Smooth { roughness } => {
                0.05 * roughness * (2.0 * PI * 1.3 * time).cos()
            }

            RoadPattern::Pothole {
                depth,
                every_secs,
                duration_secs,
            } => {
                let phase = time % every_secs;
                if phase < *duration_secs {
                    0.3 * depth * (2.0 * PI * phase / duration_secs).cos()
                } else {
                    0.0
                }
            }

            RoadPattern::SpeedBump {
                height,
                every_secs,
                duration_secs,
            } => {
                let phase = time % every_secs;
                if phase < *duration_secs {
                    0.5 * height * (PI * phase / duration_secs).cos()
                } else {
                    0.0
                }
            }

            RoadPattern::Cobblestone { amplitude, frequency } => {
                0.1 * amplitude * (2.0 * PI * frequency * time).cos()
            }
        }
    }

    /// Get pattern description
    pub fn description(&self) -> &'static str {
        match self {
            RoadPattern::Smooth { .. } => "Smooth pavement",
            RoadPattern::Pothole { .. } => "Pothole impacts",
            RoadPattern::SpeedBump { .. } => "Speed bumps",
            RoadPattern::Cobblestone { .. } => "Cobblestone vibration",
        }
    }

    /// Create common preset patterns
    pub fn presets() -> Vec<(&'static str, RoadPattern)> {
        vec![
            ("Highway", RoadPattern::Smooth { roughness: 0.1 }),
            ("City Street", RoadPattern::Smooth { roughness: 0.4 }),
            (
                "Pothole Stretch",
                RoadPattern::Pothole {
                    depth: 6.0,
                    every_secs: 5.0,
                    duration_secs: 0.25,
                },
            ),
            (
                "Residential Bumps",
                RoadPattern::SpeedBump {
                    height: 3.5,
                    every_secs: 8.0,
                    duration_secs: 0.8,
                },
            ),
            (
                "Old Town",
                RoadPattern::Cobblestone {
                    amplitude: 1.2,
                    frequency: 14.0,
                },
            ),
        ]
    }
}
