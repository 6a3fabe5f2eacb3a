use log::{debug, warn};
use nalgebra::Matrix2;
use ndarray::Array1;
use num_complex::Complex;

use crate::{config, error::TmmError, polarisation::Polarisation, settings::Media};


/// Reflectance and transmittance of a whole stack at one wavelength and angle.
///
/// `field` is always empty; field profile reconstruction is not performed.
/// [`Reflectivity::z`] gives the depth grid such a profile would be sampled on.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflectivity {
    pub reflectance: f64,
    pub transmittance: f64,
    pub r_ampl: Complex<f64>,
    pub t_ampl: Complex<f64>,
    pub field: Vec<Complex<f64>>,
    /// Summed thickness of the stack, the extent of the depth grid.
    pub total_thickness: f64,
}

impl Reflectivity {
    /// Reads the overall amplitudes off the transfer matrix and converts them
    /// to powers.
    ///
    /// **Context**: After the composer has folded every interface into one
    /// 2x2 matrix, the reflection and transmission amplitudes of the whole
    /// stack are ratios of its entries.
    ///
    /// **How it Works**: `r = T[1,0] / T[0,0]` and `t = 1 / T[0,0]`. The
    /// reflectance is `|r|^2`. The transmittance scales `|t|^2` by the
    /// substrate-to-incident index ratio with the cosine of `theta` in both
    /// numerator and denominator; the p branch uses the conjugated cosine.
    /// `theta` is the angle leaving the last interface.
    pub fn extract(
        transfer: &Matrix2<Complex<f64>>,
        pol: Polarisation,
        theta: Complex<f64>,
        media: &Media,
        total_thickness: f64,
    ) -> Self {
        let r = transfer[(1, 0)] / transfer[(0, 0)];
        let t = transfer[(0, 0)].inv();

        let reflectance = r * r.conj();
        if reflectance.im.abs() > config::REFLECTANCE_IMAG_TOL {
            warn!("reflectance has a residual imaginary part: {}", reflectance.im);
        }

        let cos_theta = match pol {
            Polarisation::S => theta.cos(),
            Polarisation::P => theta.cos().conj(),
        };
        let ratio = media.substrate * cos_theta / (media.incident * cos_theta);
        let transmittance = t * t.conj() * ratio;

        let result = Self {
            reflectance: reflectance.re,
            transmittance: transmittance.re,
            r_ampl: r,
            t_ampl: t,
            field: Vec::new(),
            total_thickness,
        };
        debug!(
            "R = {:.6}, T = {:.6}, R + T = {:.6}",
            result.reflectance,
            result.transmittance,
            result.reflectance + result.transmittance
        );
        result
    }

    /// Depth grid `[0, total_thickness)` in steps of [`config::DEPTH_STEP`].
    pub fn z(&self) -> Array1<f64> {
        Array1::range(0.0, self.total_thickness, config::DEPTH_STEP)
    }

    /// Power not accounted for by reflection or transmission, `1 - R - T`.
    ///
    /// Vanishes for a lossless stack when the incident side of the stack
    /// has the incident medium's index.
    pub fn missing(&self) -> f64 {
        1.0 - (self.reflectance + self.transmittance)
    }

    pub fn is_finite(&self) -> bool {
        self.reflectance.is_finite() && self.transmittance.is_finite()
    }

    /// Converts a NaN or infinite result into [`TmmError::NumericalSingularity`].
    pub fn ensure_finite(self) -> Result<Self, TmmError> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(TmmError::NumericalSingularity {
                reflectance: self.reflectance,
                transmittance: self.transmittance,
            })
        }
    }
}
