//! Fresnel equations for a single planar dielectric interface.
//!
//! This module implements the amplitude reflection and transmission
//! coefficients that the transfer matrix is built from. Angles and indices
//! are complex so that evanescent and absorbing layers need no special
//! casing:
//! - s polarisation: electric field perpendicular to the plane of incidence
//! - p polarisation: electric field in the plane of incidence
//!
//! Both functions take an already validated [`Polarisation`]; an invalid
//! polarisation string is rejected before any of this runs.

use num_complex::Complex;

use crate::polarisation::Polarisation;

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{error::TmmError, snell};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn real(x: f64) -> Complex<f64> {
        Complex::new(x, 0.0)
    }

    #[test]
    fn normal_incidence_values() {
        let zero = real(0.0);
        let r = interface_r(Polarisation::S, real(1.0), real(1.5), zero, zero);
        let t = interface_t(Polarisation::S, real(1.0), real(1.5), zero, zero);
        assert_relative_eq!(r.re, -0.2, epsilon = 1e-12);
        assert_relative_eq!(t.re, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(r.im, 0.0);
    }

    #[test]
    fn normal_incidence_s_p_degenerate() {
        let zero = real(0.0);
        let (n_i, n_f) = (real(2.0), real(1.4));
        let rs = interface_r(Polarisation::S, n_i, n_f, zero, zero);
        let rp = interface_r(Polarisation::P, n_i, n_f, zero, zero);
        let ts = interface_t(Polarisation::S, n_i, n_f, zero, zero);
        let tp = interface_t(Polarisation::P, n_i, n_f, zero, zero);
        // p carries the opposite sign convention for r
        assert_relative_eq!(rs.norm(), rp.norm(), epsilon = 1e-12);
        assert_relative_eq!(ts.re, tp.re, epsilon = 1e-12);
    }

    #[test]
    fn brewster_angle_p() {
        let (n_i, n_f) = (real(1.0), real(1.5));
        let theta_b = 1.5f64.atan().to_degrees();
        let theta_i = real(theta_b.to_radians());
        let theta_f = snell::refract(n_i, n_f, theta_b);
        let rp = interface_r(Polarisation::P, n_i, n_f, theta_i, theta_f);
        let rs = interface_r(Polarisation::S, n_i, n_f, theta_i, theta_f);
        assert!(rp.norm() < 1e-12, "rp: {}", rp);
        assert!(rs.norm() > 0.1);
    }

    #[test]
    fn stokes_relation_lossless() {
        // r^2 + t t' = 1 for a lossless interface
        let (n_i, n_f) = (real(1.0), real(1.5));
        let theta_i = real(35f64.to_radians());
        let theta_f = snell::refract_complex(n_i, n_f, theta_i);
        for pol in [Polarisation::S, Polarisation::P] {
            let r = interface_r(pol, n_i, n_f, theta_i, theta_f);
            let t = interface_t(pol, n_i, n_f, theta_i, theta_f);
            let t_back = interface_t(pol, n_f, n_i, theta_f, theta_i);
            let sum = r * r + t * t_back;
            assert_relative_eq!(sum.re, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn total_internal_reflection_unit_modulus() {
        let (n_i, n_f) = (real(1.5), real(1.0));
        let theta_i = real(60f64.to_radians());
        let theta_f = snell::refract_complex(n_i, n_f, theta_i);
        for pol in [Polarisation::S, Polarisation::P] {
            let r = interface_r(pol, n_i, n_f, theta_i, theta_f);
            assert_relative_eq!(r.norm(), 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn invalid_polarisation_rejected_before_amplitudes() {
        let result = "x"
            .parse::<Polarisation>()
            .map(|pol| interface_r(pol, real(1.0), real(1.5), real(0.0), real(0.0)));
        assert_eq!(result, Err(TmmError::InvalidPolarisation("x".into())));
        let result = "x"
            .parse::<Polarisation>()
            .map(|pol| interface_t(pol, real(1.0), real(1.5), real(0.0), real(0.0)));
        assert_eq!(result, Err(TmmError::InvalidPolarisation("x".into())));
    }
}

/// Computes the Fresnel amplitude reflection coefficient at an interface.
///
/// **Context**: Each interface in the stack reflects part of the incoming
/// field back. The amplitude depends on polarisation, both indices and both
/// propagation angles.
///
/// **How it Works**: Applies the classic s or p formula using the complex
/// cosines of the incident and refracted angles.
///
/// # Example
/// ```rust
/// use microcav::{fresnel, polarisation::Polarisation};
/// use num_complex::Complex;
///
/// let zero = Complex::new(0.0, 0.0);
/// let r = fresnel::interface_r(
///     Polarisation::S,
///     Complex::new(1.0, 0.0),
///     Complex::new(1.5, 0.0),
///     zero,
///     zero,
/// );
/// assert!((r.re + 0.2).abs() < 1e-12);
/// ```
pub fn interface_r(
    pol: Polarisation,
    n_i: Complex<f64>,
    n_f: Complex<f64>,
    theta_i: Complex<f64>,
    theta_f: Complex<f64>,
) -> Complex<f64> {
    let cti = theta_i.cos();
    let ctf = theta_f.cos();
    match pol {
        Polarisation::S => (n_i * cti - n_f * ctf) / (n_i * cti + n_f * ctf),
        Polarisation::P => (n_f * cti - n_i * ctf) / (n_f * cti + n_i * ctf),
    }
}

/// Computes the Fresnel amplitude transmission coefficient at an interface.
///
/// **Context**: The transmitted amplitude normalises the interface matching
/// matrix, so it has to share conventions with [`interface_r`].
///
/// **How it Works**: Both polarisations share the numerator `2 n_i cos θ_i`;
/// the denominator pairs the indices with the cosines the same way as the
/// corresponding reflection formula.
pub fn interface_t(
    pol: Polarisation,
    n_i: Complex<f64>,
    n_f: Complex<f64>,
    theta_i: Complex<f64>,
    theta_f: Complex<f64>,
) -> Complex<f64> {
    let cti = theta_i.cos();
    let ctf = theta_f.cos();
    let numerator = 2.0 * n_i * cti;
    match pol {
        Polarisation::S => numerator / (n_i * cti + n_f * ctf),
        Polarisation::P => numerator / (n_f * cti + n_i * ctf),
    }
}
