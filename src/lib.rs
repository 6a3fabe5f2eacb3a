//! Transfer matrix reflectivity of dielectric multilayer microcavities.
//!
//! The solver walks an ordered stack of layers, refracting the field at each
//! interface with Snell's law, weighting it with the Fresnel amplitudes and
//! folding every interface into a single 2x2 transfer matrix. Reflectance and
//! transmittance of the whole stack are read off that matrix.
//!
//! # Example
//! ```rust
//! use microcav::{polarisation::Polarisation, settings::Media, structure::Stack, tmm};
//!
//! let mirror = Stack::dbr(2.0, 1.4, 20, 900.0)?;
//! let inside = tmm::reflect(Polarisation::S, &mirror, 0.0, 900.0, &Media::default());
//! let outside = tmm::reflect(Polarisation::S, &mirror, 0.0, 450.0, &Media::default());
//! assert!(inside.reflectance > 0.99);
//! assert!(outside.reflectance < 0.5);
//! # Ok::<(), microcav::error::TmmError>(())
//! ```

pub mod config;
pub mod error;
pub mod fresnel;
pub mod matrix;
pub mod output;
pub mod polarisation;
pub mod problem;
pub mod result;
pub mod settings;
pub mod snell;
pub mod spectrum;
pub mod structure;
pub mod tmm;
