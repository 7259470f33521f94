//! Gravity isolation via exponential low-pass filtering

use roadsense_core::Vector3;

/// First-order IIR low-pass filter tracking the gravity component
///
/// A vehicle's accelerometer reads ~1g downward plus transient motion.
/// Subtracting a slow-moving gravity estimate leaves the motion-only signal
/// that distinguishes a pothole jolt from steady driving.
///
/// Per-axis update: `gravity' = alpha * gravity + (1 - alpha) * raw`.
/// State persists across samples within a session and is reset only at
/// session start.
#[derive(Debug, Clone)]
pub struct GravityFilter {
    alpha: f32,
    gravity: Vector3,
}

impl GravityFilter {
    pub fn new(alpha: f32) -> Self {
        GravityFilter {
            alpha,
            gravity: Vector3::zero(),
        }
    }

    /// Update the gravity estimate with a raw accelerometer reading and
    /// return the linear (user) acceleration with gravity removed
    pub fn update(&mut self, raw: Vector3) -> Vector3 {
        let a = self.alpha;
        self.gravity.x = a * self.gravity.x + (1.0 - a) * raw.x;
        self.gravity.y = a * self.gravity.y + (1.0 - a) * raw.y;
        self.gravity.z = a * self.gravity.z + (1.0 - a) * raw.z;

        Vector3::new(
            raw.x - self.gravity.x,
            raw.y - self.gravity.y,
            raw.z - self.gravity.z,
        )
    }

    /// Current gravity estimate
    pub fn gravity(&self) -> Vector3 {
        self.gravity
    }

    /// Reset the estimate to zero (session start)
    pub fn reset(&mut self) {
        self.gravity = Vector3::zero();
    }
}
