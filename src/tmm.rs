//! Transfer matrix composition over a layer stack.
//!
//! The stack is walked interface by interface. At interface `x` the field
//! crosses from layer `x` into layer `x + 1` (or into the substrate after the
//! last layer) and then propagates across the thickness of the layer it
//! entered. Every step right-multiplies the running transfer matrix by a
//! matching matrix and a propagation matrix:
//!
//! ```text
//! T <- T * M(r, t) * P(kz, d[x + 1])
//! ```
//!
//! The last interface has no propagation (the substrate is semi-infinite),
//! so layer 0 is never propagated across: it acts as the medium the stack is
//! illuminated from.

use log::{debug, trace};
use nalgebra::Matrix2;
use num_complex::Complex;

use crate::{
    fresnel, matrix,
    polarisation::Polarisation,
    result::Reflectivity,
    settings::Media,
    snell,
    structure::Stack,
};


/// Transient description of one interface, produced by each composer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interface {
    pub index: usize,
    pub n_left: Complex<f64>,
    pub n_right: Complex<f64>,
    pub theta_left: Complex<f64>,
    pub theta_right: Complex<f64>,
    pub kz_left: Complex<f64>,
    pub kz_right: Complex<f64>,
    pub r: Complex<f64>,
    pub t: Complex<f64>,
    /// Thickness propagated across after the interface.
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeInterface(usize),
    Done,
}

/// Walks a stack and accumulates its transfer matrix.
///
/// **Context**: The whole-stack response is the ordered product of one
/// matching and one propagation matrix per interface. Exposing the walk as
/// a stepper keeps each interface inspectable.
///
/// **How it Works**: Starts from the identity in `BeforeInterface(0)`. Each
/// [`Composer::step`] refracts the launch angle into the next medium,
/// computes the Fresnel amplitudes and right-multiplies `M * P` into the
/// running matrix. The launch angle is the incident angle at every
/// interface; only the angle refracted at the last interface is kept, as
/// the exit angle, once the state becomes `Done`.
#[derive(Debug, Clone)]
pub struct Composer<'a> {
    pol: Polarisation,
    stack: &'a Stack,
    media: &'a Media,
    wavelength: f64,
    theta: Complex<f64>,
    theta_exit: Complex<f64>,
    transfer: Matrix2<Complex<f64>>,
    state: State,
}

impl<'a> Composer<'a> {
    /// Creates a composer for a launch angle `theta` in degrees.
    pub fn new(
        pol: Polarisation,
        stack: &'a Stack,
        theta: f64,
        wavelength: f64,
        media: &'a Media,
    ) -> Self {
        let theta = Complex::new(theta.to_radians(), 0.0);
        Self {
            pol,
            stack,
            media,
            wavelength,
            theta,
            theta_exit: theta,
            transfer: Matrix2::identity(),
            state: State::BeforeInterface(0),
        }
    }

    /// Processes the next interface, or returns `None` once done.
    pub fn step(&mut self) -> Option<Interface> {
        let x = match self.state {
            State::BeforeInterface(x) => x,
            State::Done => return None,
        };

        let layers = self.stack.layers();
        let last = x + 1 == layers.len();

        let n_left = layers[x].refr_index;
        let (n_right, distance) = if last {
            (Complex::new(self.media.substrate, 0.0), 0.0)
        } else {
            (layers[x + 1].refr_index, layers[x + 1].thickness)
        };

        let theta_left = self.theta;
        let theta_right = snell::refract_complex(n_left, n_right, theta_left);

        let kz_left = matrix::wavevector(n_left, theta_left, self.wavelength);
        let kz_right = matrix::wavevector(n_right, theta_right, self.wavelength);

        let r = fresnel::interface_r(self.pol, n_left, n_right, theta_left, theta_right);
        let t = fresnel::interface_t(self.pol, n_left, n_right, theta_left, theta_right);

        let m = matrix::matching(r, t);
        let p = matrix::propagation(kz_right, distance);
        self.transfer = self.transfer * m * p;

        let interface = Interface {
            index: x,
            n_left,
            n_right,
            theta_left,
            theta_right,
            kz_left,
            kz_right,
            r,
            t,
            distance,
        };
        trace!("{:?}", interface);

        self.state = if last {
            self.theta_exit = theta_right;
            State::Done
        } else {
            State::BeforeInterface(x + 1)
        };

        Some(interface)
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Runs the remaining interfaces and returns the transfer matrix with
    /// the angle refracted at the last interface.
    pub fn finish(mut self) -> (Matrix2<Complex<f64>>, Complex<f64>) {
        while self.step().is_some() {}
        (self.transfer, self.theta_exit)
    }
}

/// Reflectance and transmittance of `stack` for one polarisation, launch
/// angle (degrees) and wavelength.
///
/// # Example
/// ```rust
/// use microcav::{polarisation::Polarisation, settings::Media, structure::Stack, tmm};
///
/// let stack = Stack::dbr(2.0, 1.4, 20, 900.0)?;
/// let result = tmm::reflect(Polarisation::S, &stack, 0.0, 900.0, &Media::default());
/// assert!(result.reflectance > 0.99);
/// # Ok::<(), microcav::error::TmmError>(())
/// ```
pub fn reflect(
    pol: Polarisation,
    stack: &Stack,
    theta: f64,
    wavelength: f64,
    media: &Media,
) -> Reflectivity {
    debug!(
        "solving {} layers, pol = {}, theta = {}, wavelength = {}",
        stack.len(),
        pol,
        theta,
        wavelength
    );
    let (transfer, theta_exit) = Composer::new(pol, stack, theta, wavelength, media).finish();
    Reflectivity::extract(&transfer, pol, theta_exit, media, stack.total_thickness())
}
