/// Default refractive index of the incident medium (air).
pub const DEFAULT_INCIDENT_REFR_INDEX: f64 = 1.0;
/// Default refractive index of the semi-infinite substrate.
pub const DEFAULT_SUBSTRATE_REFR_INDEX: f64 = 1.5;
/// Spacing of the depth coordinate array, in units of the layer thickness.
pub const DEPTH_STEP: f64 = 0.01;
/// Imaginary parts smaller than this many machine epsilons are treated as roundoff.
pub const REAL_IF_CLOSE_TOL: f64 = 100.0;
/// Residual imaginary part of the reflectance above which a warning is logged.
pub const REFLECTANCE_IMAG_TOL: f64 = 1e-9;
