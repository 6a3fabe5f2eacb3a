use std::f64::consts::PI;

use nalgebra::{Matrix2, Vector2};
use num_complex::Complex;

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;

    fn real(x: f64) -> Complex<f64> {
        Complex::new(x, 0.0)
    }

    #[test]
    fn matched_interface_is_identity() {
        let m = matching(real(0.0), real(1.0));
        assert_eq!(m, Matrix2::identity());
    }

    #[test]
    fn matching_scales_by_inverse_t() {
        let m = matching(real(-0.2), real(0.8));
        assert_relative_eq!(m[(0, 0)].re, 1.25, epsilon = 1e-12);
        assert_relative_eq!(m[(0, 1)].re, -0.25, epsilon = 1e-12);
        assert_eq!(m[(0, 1)], m[(1, 0)]);
        assert_eq!(m[(0, 0)], m[(1, 1)]);
    }

    #[test]
    fn zero_thickness_propagation_is_identity() {
        let kz = wavevector(real(1.5), real(0.3), 900.0);
        assert_eq!(propagation(kz, 0.0), Matrix2::identity());
    }

    #[test]
    fn quarter_wave_phase() {
        let wl = 900.0;
        let n = 1.4;
        let kz = wavevector(real(n), real(0.0), wl);
        assert_relative_eq!(kz.re, 2.0 * PI * n / wl, epsilon = 1e-15);
        let p = propagation(kz, wl / (4.0 * n));
        // pi/2 phase: exp(-i pi/2) = -i
        assert_relative_eq!(p[(0, 0)].im, -1.0, epsilon = 1e-12);
        assert_relative_eq!(p[(1, 1)].im, 1.0, epsilon = 1e-12);
        assert_eq!(p[(0, 1)], Complex::new(0.0, 0.0));
        assert_relative_eq!(p[(0, 0)].norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn propagation_exponent_signs() {
        // purely imaginary kz: the forward entry grows, the backward one decays
        let p = propagation(Complex::new(0.0, 0.01), 100.0);
        assert_relative_eq!(p[(0, 0)].re, 1f64.exp(), epsilon = 1e-12);
        assert_relative_eq!(p[(1, 1)].re, (-1f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(p[(0, 0)].im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn evanescent_wavevector_is_imaginary() {
        // angle past the critical angle
        let theta = crate::snell::refract(real(1.5), real(1.0), 60.0);
        let kz = wavevector(real(1.0), theta, 900.0);
        assert!(kz.re.abs() < 1e-12);
        assert!(kz.im.abs() > 1e-4);
        let p = propagation(kz, 100.0);
        assert!((p[(0, 0)].norm() - 1.0).abs() > 0.1);
        assert_relative_eq!((p[(0, 0)] * p[(1, 1)]).re, 1.0, epsilon = 1e-12);
    }
}

/// Matching matrix for one interface, `(1/t) [[1, r], [r, 1]]`.
///
/// Relates the forward and backward field amplitudes on the left of an
/// interface to those on the right. A zero `t` is not guarded against and
/// yields infinite entries.
pub fn matching(r: Complex<f64>, t: Complex<f64>) -> Matrix2<Complex<f64>> {
    let one = Complex::new(1.0, 0.0);
    Matrix2::new(one, r, r, one) * t.inv()
}

/// Normal component of the wavevector, `2 pi n cos(theta) / wavelength`.
pub fn wavevector(n: Complex<f64>, theta: Complex<f64>, wavelength: f64) -> Complex<f64> {
    2.0 * PI * n * theta.cos() / wavelength
}

/// Diagonal propagation matrix across a layer of thickness `d`.
///
/// **Context**: Between two interfaces the forward and backward waves only
/// pick up phase (or decay, when `kz` is complex). Zero thickness, used for
/// the final interface into the substrate, gives the identity.
///
/// **How it Works**: Builds `diag(exp(-i kz d), exp(+i kz d))`.
pub fn propagation(kz: Complex<f64>, d: f64) -> Matrix2<Complex<f64>> {
    let phase = Complex::<f64>::i() * kz * d;
    Matrix2::from_diagonal(&Vector2::new((-phase).exp(), phase.exp()))
}
