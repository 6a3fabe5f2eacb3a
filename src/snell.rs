//! Snell's law in the complex domain.
//!
//! Refraction angles are carried as complex numbers. Below the critical
//! angle the result is real up to roundoff; above it the arcsine argument
//! leaves the unit interval and the angle picks up an imaginary part, which
//! is how the evanescent field in the next layer is represented. Nothing
//! here raises on total internal reflection.

use num_complex::Complex;

use crate::config;

#[cfg(test)]
mod tests {

    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn normal_incidence() {
        let theta_t = refract(Complex::new(1.0, 0.0), Complex::new(1.5, 0.0), 0.0);
        assert_abs_diff_eq!(theta_t.re, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(theta_t.im, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn same_media() {
        let n = Complex::new(1.31, 0.0);
        let theta_t = refract(n, n, 40.0);
        assert_relative_eq!(theta_t.re, 40f64.to_radians(), epsilon = 1e-12);
        assert_abs_diff_eq!(theta_t.im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn angle30_incidence() {
        let theta_t = refract(Complex::new(1.0, 0.0), Complex::new(1.31, 0.0), 30.0);
        assert_relative_eq!(theta_t.re, 0.3916126, epsilon = 1e-6);
        assert_abs_diff_eq!(theta_t.im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn roundtrip_below_critical() {
        let n1 = Complex::new(1.0, 0.0);
        let n2 = Complex::new(1.5, 0.0);
        for theta in [0.0, 10.0, 30.0, 45.0, 60.0, 80.0] {
            let there = refract(n1, n2, theta);
            let back = refract(n2, n1, there.re.to_degrees());
            assert_relative_eq!(back.re, theta.to_radians(), epsilon = 1e-10);
            assert_abs_diff_eq!(back.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn total_internal_reflection_is_complex() {
        // critical angle for 1.5 -> 1.0 is ~41.8 degrees
        let theta_t = refract(Complex::new(1.5, 0.0), Complex::new(1.0, 0.0), 60.0);
        assert!(theta_t.im.abs() > 0.1, "theta_t: {}", theta_t);
        assert_relative_eq!(theta_t.re, std::f64::consts::FRAC_PI_2, epsilon = 1e-10);
        // sin of the complex angle still satisfies snell's law
        let lhs = 1.5 * 60f64.to_radians().sin();
        assert_relative_eq!(theta_t.sin().re, lhs, epsilon = 1e-10);
    }

    #[test]
    fn real_if_close_drops_roundoff_only() {
        let z = real_if_close(Complex::new(0.5, 1e-16));
        assert_eq!(z.im, 0.0);
        let z = real_if_close(Complex::new(0.5, 1e-3));
        assert_eq!(z.im, 1e-3);
    }

    #[test]
    fn complex_angle_kept_complex() {
        // a complex input angle is refracted without being cast to real
        let n = Complex::new(1.0, 0.0);
        let theta = Complex::new(0.3, 0.2);
        let theta_t = refract_complex(n, n, theta);
        assert_relative_eq!(theta_t.re, 0.3, epsilon = 1e-12);
        assert_relative_eq!(theta_t.im, 0.2, epsilon = 1e-12);
    }
}

/// Refracted angle, in radians, for an incidence angle given in degrees.
///
/// This is the entry point used with a user-supplied launch angle. The
/// result is complex: real below the critical angle, complex beyond it.
pub fn refract(n_i: Complex<f64>, n_f: Complex<f64>, theta_i_deg: f64) -> Complex<f64> {
    refract_complex(n_i, n_f, Complex::new(theta_i_deg.to_radians(), 0.0))
}

/// Refracted angle for an incidence angle already in radians.
///
/// **Context**: The composer works in radians throughout and angles may
/// already be complex (absorbing indices). Coercing them to real here would
/// clip total internal reflection.
///
/// **How it Works**: Evaluates `asin(n_i sin(theta_i) / n_f)` on the complex
/// plane after discarding roundoff in the imaginary part of the argument.
pub fn refract_complex(n_i: Complex<f64>, n_f: Complex<f64>, theta_i: Complex<f64>) -> Complex<f64> {
    let arg = real_if_close(n_i * theta_i.sin() / n_f);
    arg.asin()
}

/// Drops an imaginary part that is indistinguishable from roundoff.
///
/// Only the imaginary part is tested, so a real argument with modulus above
/// one is passed through untouched and still yields a complex arcsine.
pub fn real_if_close(z: Complex<f64>) -> Complex<f64> {
    if z.im.abs() < config::REAL_IF_CLOSE_TOL * f64::EPSILON {
        Complex::new(z.re, 0.0)
    } else {
        z
    }
}
