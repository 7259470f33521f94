//! Threshold-based anomaly scoring over emitted windows

use roadsense_core::{axis, SensorWindow};
use serde::{Deserialize, Serialize};

/// Road anomaly categories understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    Pothole,
    SpeedBump,
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalyKind::Pothole => write!(f, "pothole"),
            AnomalyKind::SpeedBump => write!(f, "speed bump"),
        }
    }
}

/// One scored detection, severity and confidence both in [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub severity: f32,
    pub confidence: f32,
    pub timestamp_ms: u64,
}

/// Heuristic window classifier
///
/// A pothole shows as a sharp bidirectional vertical spike (the wheel
/// drops, then slams the far edge); a speed bump as a slower, mostly
/// one-sided hump. Both are judged on the gravity-free vertical axis.
#[derive(Debug, Clone)]
pub struct ThresholdDetector {
    /// Minimum vertical peak-to-peak (m/s²) to report anything
    pub trigger_pk_pk: f32,
    /// Peak-to-peak at which severity saturates at 1.0
    pub saturation_pk_pk: f32,
}

impl Default for ThresholdDetector {
    fn default() -> Self {
        Self {
            trigger_pk_pk: 3.0,
            saturation_pk_pk: 12.0,
        }
    }
}

impl ThresholdDetector {
    /// Score one window. Returns None for unremarkable road surface.
    pub fn analyze(&self, window: &SensorWindow) -> Option<AnomalyReport> {
        if window.is_empty() {
            return None;
        }

        let vertical = window.axis_stats(axis::AZ);
        if vertical.peak_to_peak < self.trigger_pk_pk {
            return None;
        }

        // Potholes swing hard in both directions; bumps stay mostly positive
        let kind = if -vertical.min > 0.6 * vertical.max {
            AnomalyKind::Pothole
        } else {
            AnomalyKind::SpeedBump
        };

        let severity = ((vertical.peak_to_peak - self.trigger_pk_pk)
            / (self.saturation_pk_pk - self.trigger_pk_pk))
            .clamp(0.0, 1.0);

        // Confidence grows with how far the spike stands out of the noise,
        // with a bonus when pitch activity corroborates a vertical event
        let spike_ratio = if vertical.std_dev > 0.0 {
            (vertical.peak_to_peak / (6.0 * vertical.std_dev)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let pitch_energy = window.axis_stats(axis::GX).rms;
        let confidence = (spike_ratio + (pitch_energy / 0.5).clamp(0.0, 0.2)).clamp(0.0, 1.0);

        Some(AnomalyReport {
            kind,
            severity,
            confidence,
            timestamp_ms: window.timestamp_ms,
        })
    }
}
