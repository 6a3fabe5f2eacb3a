use crate::{
    error::TmmError,
    polarisation::Polarisation,
    result::Reflectivity,
    settings::{Media, Settings},
    structure::Stack,
    tmm,
};


/// A single reflectivity calculation: one stack, one polarisation, one angle
/// and one wavelength.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub stack: Stack,
    pub media: Media,
    pub polarisation: Polarisation,
    /// Launch angle in degrees.
    pub theta: f64,
    pub wavelength: f64,
}

impl Problem {
    pub fn new(
        stack: Stack,
        media: Media,
        polarisation: Polarisation,
        theta: f64,
        wavelength: f64,
    ) -> Self {
        Self {
            stack,
            media,
            polarisation,
            theta,
            wavelength,
        }
    }

    /// Builds the microcavity described by the settings at their design
    /// wavelength.
    pub fn from_settings(settings: &Settings) -> Result<Self, TmmError> {
        let stack = Stack::microcavity(&settings.structure, settings.wavelength)?;
        Ok(Self::new(
            stack,
            settings.media,
            settings.polarisation,
            settings.theta,
            settings.wavelength,
        ))
    }

    /// Same problem at another wavelength. The stack is not rebuilt.
    pub fn at_wavelength(&self, wavelength: f64) -> Self {
        Self {
            wavelength,
            ..self.clone()
        }
    }

    /// Same problem at another launch angle, in degrees.
    pub fn at_angle(&self, theta: f64) -> Self {
        Self {
            theta,
            ..self.clone()
        }
    }

    pub fn solve(&self) -> Reflectivity {
        tmm::reflect(
            self.polarisation,
            &self.stack,
            self.theta,
            self.wavelength,
            &self.media,
        )
    }
}
