//! Layer stacks and the builders for common microcavity geometries.
//!
//! A [`Stack`] is the ordered list of (refractive index, thickness) pairs the
//! solver consumes. Layer 0 faces the incident side and also plays the role
//! of the incident medium for the first interface; the last layer sits on the
//! substrate.
//!
//! The builders cover the usual building blocks:
//! - quarter-wave distributed Bragg reflectors ([`Stack::dbr`])
//! - a cavity spacer of `q` half-wavelengths ([`Stack::cavity`])
//! - a full microcavity assembled from [`StructureConfig`]

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::TmmError;


/// A single homogeneous layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub refr_index: Complex<f64>,
    pub thickness: f64,
}

impl Layer {
    pub fn new(refr_index: f64, thickness: f64) -> Self {
        Self {
            refr_index: Complex::new(refr_index, 0.0),
            thickness,
        }
    }

    /// Optical path length at normal incidence, `Re(n) * d`.
    pub fn optical_thickness(&self) -> f64 {
        self.refr_index.re * self.thickness
    }
}

/// An ordered, non-empty sequence of layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Layer>", into = "Vec<Layer>")]
pub struct Stack {
    layers: Vec<Layer>,
}

impl TryFrom<Vec<Layer>> for Stack {
    type Error = TmmError;

    fn try_from(layers: Vec<Layer>) -> Result<Self, Self::Error> {
        Self::from_layers(layers)
    }
}

impl From<Stack> for Vec<Layer> {
    fn from(stack: Stack) -> Self {
        stack.layers
    }
}

impl Stack {
    /// Creates a stack from positionally aligned real indices and thicknesses.
    pub fn new(n: Vec<f64>, d: Vec<f64>) -> Result<Self, TmmError> {
        let n = n.into_iter().map(|n| Complex::new(n, 0.0)).collect();
        Self::from_complex(n, d)
    }

    /// Creates a stack from complex indices, for layers with loss or gain.
    pub fn from_complex(n: Vec<Complex<f64>>, d: Vec<f64>) -> Result<Self, TmmError> {
        if n.len() != d.len() {
            return Err(TmmError::LayerMismatch {
                indices: n.len(),
                thicknesses: d.len(),
            });
        }
        let layers = n
            .into_iter()
            .zip(d)
            .map(|(refr_index, thickness)| Layer {
                refr_index,
                thickness,
            })
            .collect();
        Self::from_layers(layers)
    }

    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, TmmError> {
        if layers.is_empty() {
            return Err(TmmError::EmptyStack);
        }
        Ok(Self { layers })
    }

    /// Quarter-wave Bragg mirror of `pairs` repetitions of `(n1, n2)`.
    ///
    /// **Context**: A DBR reflects strongly in a band around `wavelength`
    /// because every layer has an optical thickness of a quarter wave, so
    /// reflections from successive interfaces add in phase.
    ///
    /// **How it Works**: Each pair contributes a layer of thickness
    /// `wavelength / (4 n1)` followed by one of `wavelength / (4 n2)`.
    /// Zero pairs gives [`TmmError::EmptyStack`].
    pub fn dbr(n1: f64, n2: f64, pairs: usize, wavelength: f64) -> Result<Self, TmmError> {
        Self::from_layers(quarter_wave_layers(n1, n2, pairs, wavelength))
    }

    /// Mirror above the cavity. Same construction as [`Stack::dbr`].
    pub fn top_dbr(n1: f64, n2: f64, pairs: usize, wavelength: f64) -> Result<Self, TmmError> {
        Self::dbr(n1, n2, pairs, wavelength)
    }

    /// Mirror below the cavity. Same construction as [`Stack::dbr`].
    pub fn bottom_dbr(n1: f64, n2: f64, pairs: usize, wavelength: f64) -> Result<Self, TmmError> {
        Self::dbr(n1, n2, pairs, wavelength)
    }

    /// Cavity spacer of order `q`, thickness `q * wavelength / (2 n)`.
    pub fn cavity(n: f64, q: f64, wavelength: f64) -> Self {
        Self {
            layers: vec![Layer::new(n, q * wavelength / (2.0 * n))],
        }
    }

    /// Appends `other` below this stack.
    pub fn then(mut self, other: Stack) -> Self {
        self.layers.extend(other.layers);
        self
    }

    /// Builds the stack described by a [`StructureConfig`].
    ///
    /// The optional entry layer has zero thickness: it only sets the medium
    /// the first interface is seen from. The bottom mirror is laid down with
    /// the low index first so that a cavity sits between two low-index
    /// layers.
    pub fn microcavity(config: &StructureConfig, wavelength: f64) -> Result<Self, TmmError> {
        let mut layers = Vec::new();
        if let Some(n) = config.entry_index {
            layers.push(Layer::new(n, 0.0));
        }
        layers.extend(quarter_wave_layers(
            config.n_high,
            config.n_low,
            config.top_pairs,
            wavelength,
        ));
        if let Some(cavity) = &config.cavity {
            layers.extend(Self::cavity(cavity.refr_index, cavity.order, wavelength).layers);
        }
        layers.extend(quarter_wave_layers(
            config.n_low,
            config.n_high,
            config.bottom_pairs,
            wavelength,
        ));
        Self::from_layers(layers)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn indices(&self) -> Vec<Complex<f64>> {
        self.layers.iter().map(|l| l.refr_index).collect()
    }

    pub fn thicknesses(&self) -> Vec<f64> {
        self.layers.iter().map(|l| l.thickness).collect()
    }

    pub fn total_thickness(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }
}

fn quarter_wave_layers(n1: f64, n2: f64, pairs: usize, wavelength: f64) -> Vec<Layer> {
    let pair = [
        Layer::new(n1, wavelength / (4.0 * n1)),
        Layer::new(n2, wavelength / (4.0 * n2)),
    ];
    std::iter::repeat(pair).take(pairs).flatten().collect()
}

/// Geometry of a microcavity, in terms of its mirrors and spacer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureConfig {
    /// Index of a zero-thickness entry layer placed on top of the stack.
    #[serde(default)]
    pub entry_index: Option<f64>,
    pub n_high: f64,
    pub n_low: f64,
    pub top_pairs: usize,
    #[serde(default)]
    pub bottom_pairs: usize,
    #[serde(default)]
    pub cavity: Option<CavityConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CavityConfig {
    pub refr_index: f64,
    /// Number of half-wavelengths in the spacer.
    pub order: f64,
}
