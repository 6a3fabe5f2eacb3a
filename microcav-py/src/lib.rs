use microcav::{
    config,
    error::TmmError,
    polarisation::Polarisation,
    result::Reflectivity,
    settings::Media,
    structure::Stack,
    tmm,
};
use num_complex::Complex;
use pyo3::{exceptions::PyValueError, prelude::*};

fn to_py_err(err: TmmError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Result of a reflectivity calculation.
#[pyclass(name = "Reflectivity")]
#[derive(Debug, Clone)]
pub struct PyReflectivity {
    inner: Reflectivity,
}

#[pymethods]
impl PyReflectivity {
    #[getter(R)]
    fn reflectance(&self) -> f64 {
        self.inner.reflectance
    }

    #[getter(T)]
    fn transmittance(&self) -> f64 {
        self.inner.transmittance
    }

    /// Field profile placeholder, always empty.
    #[getter(E)]
    fn field(&self) -> Vec<Complex<f64>> {
        self.inner.field.clone()
    }

    #[getter]
    fn z(&self) -> Vec<f64> {
        self.inner.z().to_vec()
    }

    fn __repr__(&self) -> String {
        format!(
            "Reflectivity(R={:.6}, T={:.6})",
            self.inner.reflectance, self.inner.transmittance
        )
    }
}

/// Reflectivity of a layer stack for polarisation "s" or "p", incidence
/// angle `theta` in degrees and wavelength `wl`.
#[pyfunction]
#[pyo3(signature = (
    polarisation,
    n,
    d,
    theta,
    wl,
    n_incident = config::DEFAULT_INCIDENT_REFR_INDEX,
    n_substrate = config::DEFAULT_SUBSTRATE_REFR_INDEX
))]
fn reflect(
    polarisation: &str,
    n: Vec<f64>,
    d: Vec<f64>,
    theta: f64,
    wl: f64,
    n_incident: f64,
    n_substrate: f64,
) -> PyResult<PyReflectivity> {
    let pol: Polarisation = polarisation.parse().map_err(to_py_err)?;
    let stack = Stack::new(n, d).map_err(to_py_err)?;
    let media = Media {
        incident: n_incident,
        substrate: n_substrate,
    };
    Ok(PyReflectivity {
        inner: tmm::reflect(pol, &stack, theta, wl, &media),
    })
}

/// Quarter-wave mirror as parallel index and thickness lists.
#[pyfunction]
fn dbr(n1: f64, n2: f64, pairs: usize, wl: f64) -> PyResult<(Vec<f64>, Vec<f64>)> {
    let stack = Stack::dbr(n1, n2, pairs, wl).map_err(to_py_err)?;
    let n = stack.indices().iter().map(|n| n.re).collect();
    Ok((n, stack.thicknesses()))
}

/// Cavity spacer of order `q` as an (index, thickness) pair.
#[pyfunction]
fn cavity(n: f64, q: f64, wl: f64) -> (f64, f64) {
    let stack = Stack::cavity(n, q, wl);
    (n, stack.total_thickness())
}

/// A Python module implemented in Rust.
#[pymodule]
fn microcav_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(reflect, m)?)?;
    m.add_function(wrap_pyfunction!(dbr, m)?)?;
    m.add_function(wrap_pyfunction!(cavity, m)?)?;
    m.add_class::<PyReflectivity>()?;
    Ok(())
}
