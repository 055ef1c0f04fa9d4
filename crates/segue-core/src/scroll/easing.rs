//! Pure easing function for scroll animations
//!
//! Maps a normalized time fraction in [0, 1] to a normalized position
//! fraction in [0, 1].

/// Symmetric quadratic ease-in/ease-out
///
/// Accelerates over the first half, decelerates over the second.
/// `f(0) = 0`, `f(0.5) = 0.5`, `f(1) = 1`. Input is clamped to [0, 1].
#[inline]
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv / 2.0
    }
}
