//! Wavelength and angle sweeps over a single stack.
//!
//! Every sample point is an independent solve, so the sweep is evaluated
//! with rayon, one [`Problem`] per point, and a progress bar tracks the
//! points as they complete. Results are collected in sweep order.
//!
//! Post-processing on the collected spectrum:
//! - [`Spectrum::peak`]: the sample with the highest reflectance
//! - [`Spectrum::stopband`]: the contiguous high-reflectance band around it

use std::{fmt, time::Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use ndarray::Array1;
use ndarray_stats::QuantileExt;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{error::TmmError, problem::Problem};

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{polarisation::Polarisation, settings::Media, structure::Stack};

    fn spectrum_from(x: Vec<f64>, r: Vec<f64>) -> Spectrum {
        let t = r.iter().map(|r| 1.0 - r).collect::<Vec<_>>();
        Spectrum {
            sweep: Sweep::Wavelength {
                start: x[0],
                end: x[x.len() - 1],
                num: x.len(),
            },
            x: Array1::from(x),
            reflectance: Array1::from(r),
            transmittance: Array1::from(t),
        }
    }

    #[test]
    fn sweep_points() {
        let sweep = Sweep::Wavelength {
            start: 800.0,
            end: 1000.0,
            num: 5,
        };
        assert_eq!(sweep.points().to_vec(), vec![800.0, 850.0, 900.0, 950.0, 1000.0]);
        assert_eq!(sweep.with_num(3).num(), 3);
        assert!(sweep.validate().is_ok());
    }

    #[test]
    fn sweep_validation() {
        let empty = Sweep::Angle {
            start: 0.0,
            end: 10.0,
            num: 0,
        };
        assert!(matches!(empty.validate(), Err(TmmError::InvalidSweep(_))));
        let grazing = Sweep::Angle {
            start: 0.0,
            end: 95.0,
            num: 10,
        };
        assert!(grazing.validate().is_err());
        let negative = Sweep::Wavelength {
            start: -1.0,
            end: 10.0,
            num: 10,
        };
        assert!(negative.validate().is_err());
        let single = Sweep::Wavelength {
            start: 900.0,
            end: 900.0,
            num: 1,
        };
        assert!(single.validate().is_ok());
    }

    #[test]
    fn stopband_around_peak() {
        let s = spectrum_from(
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
            vec![0.1, 0.995, 0.2, 0.992, 0.999, 0.995, 0.3],
        );
        assert_eq!(s.peak(), Some((5.0, 0.999)));
        assert_eq!(s.stopband(0.99), Some((4.0, 6.0)));
        assert_eq!(s.stopband(0.9999), None);
    }

    #[test]
    fn angle_sweep_matches_single_solves() {
        let problem = Problem::new(
            Stack::dbr(2.0, 1.4, 3, 900.0).unwrap(),
            Media::default(),
            Polarisation::P,
            0.0,
            900.0,
        );
        let sweep = Sweep::Angle {
            start: 0.0,
            end: 40.0,
            num: 5,
        };
        let spectrum = Spectrum::compute(&problem, &sweep);
        assert_eq!(spectrum.len(), 5);
        for (i, theta) in spectrum.x.iter().enumerate() {
            let single = problem.at_angle(*theta).solve();
            assert_eq!(spectrum.reflectance[i], single.reflectance);
            assert_eq!(spectrum.transmittance[i], single.transmittance);
        }
    }
}

/// The quantity swept across a spectrum. Wavelengths share the layer
/// thickness unit; angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sweep {
    Wavelength { start: f64, end: f64, num: usize },
    Angle { start: f64, end: f64, num: usize },
}

impl Sweep {
    pub fn num(&self) -> usize {
        match self {
            Sweep::Wavelength { num, .. } | Sweep::Angle { num, .. } => *num,
        }
    }

    pub fn with_num(&self, num: usize) -> Self {
        match *self {
            Sweep::Wavelength { start, end, .. } => Sweep::Wavelength { start, end, num },
            Sweep::Angle { start, end, .. } => Sweep::Angle { start, end, num },
        }
    }

    fn range(&self) -> (f64, f64) {
        match *self {
            Sweep::Wavelength { start, end, .. } | Sweep::Angle { start, end, .. } => (start, end),
        }
    }

    /// Evenly spaced sample points, endpoints included.
    pub fn points(&self) -> Array1<f64> {
        let (start, end) = self.range();
        Array1::linspace(start, end, self.num())
    }

    /// Column label used in output files.
    pub fn label(&self) -> &'static str {
        match self {
            Sweep::Wavelength { .. } => "wavelength",
            Sweep::Angle { .. } => "theta",
        }
    }

    pub fn validate(&self) -> Result<(), TmmError> {
        let (start, end) = self.range();
        if self.num() == 0 {
            return Err(TmmError::InvalidSweep("need at least one sample point".into()));
        }
        if !(start <= end) {
            return Err(TmmError::InvalidSweep(format!(
                "start {} must not exceed end {}",
                start, end
            )));
        }
        match self {
            Sweep::Wavelength { .. } if !(start > 0.0) => Err(TmmError::InvalidSweep(format!(
                "wavelengths must be positive, got {}",
                start
            ))),
            Sweep::Angle { .. } if !(start > -90.0 && end < 90.0) => Err(TmmError::InvalidSweep(
                format!("angles must lie in (-90, 90) degrees, got {} to {}", start, end),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.range();
        write!(f, "{} {} to {} ({} points)", self.label(), start, end, self.num())
    }
}

/// Reflectance and transmittance sampled along a [`Sweep`].
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub sweep: Sweep,
    pub x: Array1<f64>,
    pub reflectance: Array1<f64>,
    pub transmittance: Array1<f64>,
}

impl Spectrum {
    /// Solves `problem` at every sample point of `sweep` in parallel.
    ///
    /// **Context**: Spectra and angular scans need hundreds of independent
    /// solves. Nothing is shared between them, so they parallelise at the
    /// level of whole calls.
    ///
    /// **How it Works**: Derives one problem per sample point (varying the
    /// wavelength or the launch angle), solves them with rayon and collects
    /// R and T in sweep order. Non-finite points are kept and reported.
    pub fn compute(problem: &Problem, sweep: &Sweep) -> Self {
        let start = Instant::now();
        let x = sweep.points();
        info!("Computing spectrum: {}", sweep);

        let pb = ProgressBar::new(x.len() as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bar:40.green/blue} {pos:>5}/{len:5} {msg} ETA: {eta_precise}",
        ) {
            pb.set_style(style.progress_chars("█▇▆▅▄▃▂▁"));
        }
        pb.set_message(sweep.label().to_string());

        let (reflectance, transmittance): (Vec<f64>, Vec<f64>) = x
            .to_vec()
            .par_iter()
            .map(|&value| {
                let point = match sweep {
                    Sweep::Wavelength { .. } => problem.at_wavelength(value),
                    Sweep::Angle { .. } => problem.at_angle(value),
                };
                let result = point.solve();
                pb.inc(1);
                (result.reflectance, result.transmittance)
            })
            .unzip();
        pb.finish_and_clear();

        let spectrum = Self {
            sweep: sweep.clone(),
            x,
            reflectance: Array1::from(reflectance),
            transmittance: Array1::from(transmittance),
        };

        let bad = spectrum
            .reflectance
            .iter()
            .zip(spectrum.transmittance.iter())
            .filter(|(r, t)| !(r.is_finite() && t.is_finite()))
            .count();
        if bad > 0 {
            warn!("{} of {} sample points gave non-finite results", bad, spectrum.len());
        }

        let duration = start.elapsed();
        info!(
            "Time taken: {:.2?}, Time per point: {:.2?}",
            duration,
            duration / spectrum.len().max(1) as u32
        );

        spectrum
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Sample point and value of the maximum reflectance. `None` when the
    /// spectrum is empty or contains NaN.
    pub fn peak(&self) -> Option<(f64, f64)> {
        let i = self.reflectance.argmax().ok()?;
        Some((self.x[i], self.reflectance[i]))
    }

    /// Edges of the contiguous band around the reflectance peak where
    /// `R >= threshold`.
    pub fn stopband(&self, threshold: f64) -> Option<(f64, f64)> {
        let peak = self.reflectance.argmax().ok()?;
        if self.reflectance[peak] < threshold {
            return None;
        }
        let r = &self.reflectance;
        let lo = (0..peak)
            .rev()
            .take_while(|&i| r[i] >= threshold)
            .last()
            .unwrap_or(peak);
        let hi = (peak + 1..r.len())
            .take_while(|&i| r[i] >= threshold)
            .last()
            .unwrap_or(peak);
        Some((self.x[lo], self.x[hi]))
    }
}
