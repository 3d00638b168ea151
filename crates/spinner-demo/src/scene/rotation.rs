use std::f64::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

/// Big-ring angular rate: π/4 per 10 s, in radians per millisecond.
pub const BIG_RATE: f64 = PI / 4.0 / 10_000.0;

/// Small-ring angular rate: one turn per 10 s, in radians per millisecond.
pub const SMALL_RATE: f64 = TAU / 10_000.0;

/// 2x2 rotation matrix, column-major, laid out as a WGSL `mat2x2<f32>`
/// uniform (16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Rotation2 {
    pub cols: [f32; 4],
}

impl Rotation2 {
    pub const IDENTITY: Self = Self {
        cols: [1.0, 0.0, 0.0, 1.0],
    };

    /// `[cos θ, sin θ, -sin θ, cos θ]`
    pub fn from_angle(theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self {
            cols: [cos, sin, -sin, cos],
        }
    }
}

/// Rotation angles of both rings for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RingAngles {
    pub big: f32,
    pub small: f32,
}

impl RingAngles {
    /// Angles at `timestamp_ms` milliseconds into the animation, reduced to
    /// `[0, 2π)`.
    ///
    /// Reduction happens in f64 so long-running windows keep f32 precision.
    pub fn at(timestamp_ms: f64) -> Self {
        Self {
            big: (timestamp_ms * BIG_RATE).rem_euclid(TAU) as f32,
            small: (timestamp_ms * SMALL_RATE).rem_euclid(TAU) as f32,
        }
    }

    pub fn big_xform(&self) -> Rotation2 {
        Rotation2::from_angle(self.big)
    }

    pub fn small_xform(&self) -> Rotation2 {
        Rotation2::from_angle(self.small)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// `M * Mᵀ`, column-major.
    fn times_transpose(m: Rotation2) -> [f32; 4] {
        let [a, b, c, d] = m.cols;
        // M = | a c |   Mᵀ = | a b |
        //     | b d |        | c d |
        [a * a + c * c, b * a + d * c, a * b + c * d, b * b + d * d]
    }

    fn determinant(m: Rotation2) -> f32 {
        let [a, b, c, d] = m.cols;
        a * d - c * b
    }

    /// Distance between two angles on the circle.
    fn angular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn zero_is_identity() {
        let angles = RingAngles::at(0.0);
        assert_eq!(angles.big_xform(), Rotation2::IDENTITY);
        assert_eq!(angles.small_xform(), Rotation2::IDENTITY);
    }

    #[test]
    fn layout_is_column_major() {
        let m = Rotation2::from_angle(std::f32::consts::FRAC_PI_2);
        assert_abs_diff_eq!(m.cols[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(m.cols[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(m.cols[2], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(m.cols[3], 0.0, epsilon = 1e-6);
        assert_eq!(std::mem::size_of::<Rotation2>(), 16);
    }

    #[test]
    fn rotations_are_orthonormal() {
        for t in [0.0, 16.7, 1234.5, 9_999.0, 86_400_000.0] {
            let angles = RingAngles::at(t);
            for m in [angles.big_xform(), angles.small_xform()] {
                let p = times_transpose(m);
                assert_abs_diff_eq!(p[0], 1.0, epsilon = 1e-6);
                assert_abs_diff_eq!(p[1], 0.0, epsilon = 1e-6);
                assert_abs_diff_eq!(p[2], 0.0, epsilon = 1e-6);
                assert_abs_diff_eq!(p[3], 1.0, epsilon = 1e-6);
                assert_abs_diff_eq!(determinant(m), 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn rates_are_distinct() {
        assert!(BIG_RATE != SMALL_RATE);
        assert_abs_diff_eq!(SMALL_RATE / BIG_RATE, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn angles_are_linear_in_time() {
        let a = RingAngles::at(1_000.0);
        assert_abs_diff_eq!(a.big as f64, 1_000.0 * BIG_RATE, epsilon = 1e-6);
        assert_abs_diff_eq!(a.small as f64, 1_000.0 * SMALL_RATE, epsilon = 1e-6);
    }

    #[test]
    fn doubling_time_doubles_angles_mod_two_pi() {
        for t in [250.0, 3_000.0, 7_777.0, 123_456.0] {
            let once = RingAngles::at(t);
            let twice = RingAngles::at(2.0 * t);
            assert!(angular_distance(twice.big as f64, 2.0 * once.big as f64) < 1e-5);
            assert!(angular_distance(twice.small as f64, 2.0 * once.small as f64) < 1e-5);
        }
    }

    #[test]
    fn angles_stay_reduced() {
        let a = RingAngles::at(1.0e9);
        assert!((0.0..std::f32::consts::TAU).contains(&a.big));
        assert!((0.0..std::f32::consts::TAU).contains(&a.small));
    }
}
