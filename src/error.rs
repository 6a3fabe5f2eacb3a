//! Error types for the transfer matrix solver.
//!
//! Numerical singularities (zero transmission amplitude, a vanishing
//! top-left transfer matrix element) are not checked during the solve; they
//! surface as NaN or infinite values in the result. Callers that want a
//! typed signal use [`crate::result::Reflectivity::ensure_finite`].

/// Errors raised by the solver and the stack builder.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TmmError {
    #[error("Polarisation value must be 's' or 'p', got '{0}'")]
    InvalidPolarisation(String),

    #[error("Layer stack must contain at least one layer")]
    EmptyStack,

    #[error("Got {indices} refractive indices but {thicknesses} thicknesses")]
    LayerMismatch { indices: usize, thicknesses: usize },

    #[error("Degenerate input gave a non-finite result: R = {reflectance}, T = {transmittance}")]
    NumericalSingularity { reflectance: f64, transmittance: f64 },

    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),
}
