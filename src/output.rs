use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use chrono::Local;
use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::{result::Reflectivity, settings::Settings, spectrum::Spectrum};


/// Condensed description of a spectrum, written as JSON next to the table.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub timestamp: String,
    pub sweep: String,
    pub points: usize,
    pub peak: Option<(f64, f64)>,
    pub stopband_threshold: f64,
    pub stopband: Option<(f64, f64)>,
}

impl Summary {
    pub fn from_spectrum(spectrum: &Spectrum, threshold: f64) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            sweep: spectrum.sweep.to_string(),
            points: spectrum.len(),
            peak: spectrum.peak(),
            stopband_threshold: threshold,
            stopband: spectrum.stopband(threshold),
        }
    }
}

/// Write the spectrum as whitespace separated columns `x R T`.
pub fn write_spectrum(spectrum: &Spectrum, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join("spectrum");
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# {} R T", spectrum.sweep.label())?;
    for ((x, r), t) in spectrum
        .x
        .iter()
        .zip(spectrum.reflectance.iter())
        .zip(spectrum.transmittance.iter())
    {
        writeln!(writer, "{}", [x, r, t].iter().join(" "))?;
    }
    writer.flush()?;

    info!("Wrote spectrum to {}", path.display());
    Ok(())
}

pub fn write_summary(summary: &Summary, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join("results.json");
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)?;
    info!("Wrote summary to {}", path.display());
    Ok(())
}

/// Write the settings the run used, so the output directory is self-describing.
pub fn write_settings(settings: &Settings, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join("settings.toml");
    let text = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write a single-point result: R, T and the depth grid.
pub fn write_point(result: &Reflectivity, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join("point");
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "R {}", result.reflectance)?;
    writeln!(writer, "T {}", result.transmittance)?;
    writeln!(writer, "r {} {}", result.r_ampl.re, result.r_ampl.im)?;
    writeln!(writer, "t {} {}", result.t_ampl.re, result.t_ampl.im)?;
    writeln!(writer, "z {}", result.z().iter().join(" "))?;
    writer.flush()?;
    Ok(())
}
