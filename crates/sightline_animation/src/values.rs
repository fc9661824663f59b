//! Animatable value types
//!
//! Linear interpolation for the handful of value types the engine animates:
//! scroll positions and gesture translations.

use sightline_core::Point;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// Point Implementation
// ============================================================================

impl Interpolate for Point {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_lerp() {
        assert_eq!(0.0f32.lerp(&100.0, 0.25), 25.0);
        assert_eq!(100.0f32.lerp(&0.0, 1.0), 0.0);
        assert!(10.0f32.approx_eq(&10.05, 0.1));
    }

    #[test]
    fn test_point_lerp() {
        let a = Point::new(0.0, 40.0);
        let b = Point::new(20.0, 0.0);
        assert_eq!(a.lerp(&b, 0.5), Point::new(10.0, 20.0));
        assert!(a.lerp(&b, 1.0).approx_eq(&b, 1e-6));
    }
}
