use std::{
    env, fmt,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use config::{Config, Environment, File};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    config as consts,
    polarisation::Polarisation,
    spectrum::Sweep,
    structure::{CavityConfig, StructureConfig},
};

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn default_config_loads() {
        let settings = load_default_config().unwrap();
        assert_eq!(settings.media, Media::default());
        assert_eq!(settings.polarisation, Polarisation::S);
        assert_eq!(settings.structure.top_pairs, 20);
        assert!(matches!(settings.sweep, Sweep::Wavelength { .. }));
    }

    #[test]
    fn media_defaults() {
        let media = Media::default();
        assert_eq!(media.incident, consts::DEFAULT_INCIDENT_REFR_INDEX);
        assert_eq!(media.substrate, consts::DEFAULT_SUBSTRATE_REFR_INDEX);
        let partial: Media = serde_json::from_str(r#"{"substrate": 3.5}"#).unwrap();
        assert_eq!(partial.incident, 1.0);
        assert_eq!(partial.substrate, 3.5);
    }

    #[test]
    fn cli_overrides() {
        let mut settings = load_default_config().unwrap();
        let args = CliArgs::parse_from([
            "microcav",
            "--pol",
            "p",
            "--ris",
            "3.5",
            "--cavity",
            "2.0",
            "1",
            "--angles",
            "0",
            "60",
            "--num",
            "61",
        ]);
        apply_args(&mut settings, &args);
        assert_eq!(settings.polarisation, Polarisation::P);
        assert_eq!(settings.media.substrate, 3.5);
        assert_eq!(
            settings.structure.cavity,
            Some(CavityConfig {
                refr_index: 2.0,
                order: 1.0
            })
        );
        assert_eq!(
            settings.sweep,
            Sweep::Angle {
                start: 0.0,
                end: 60.0,
                num: 61
            }
        );
        validate_config(&settings).unwrap();
    }

    #[test]
    fn environment_overrides_file_and_cli_overrides_environment() {
        let config = retrieve_project_root().unwrap().join("config/default.toml");
        env::set_var("MICROCAV_MEDIA__SUBSTRATE", "3.5");
        env::set_var("MICROCAV_STRUCTURE__TOP_PAIRS", "7");
        env::set_var("MICROCAV_THETA", "12.0");
        let args = CliArgs::parse_from([
            "microcav",
            "--config",
            config.to_str().unwrap(),
            "--theta",
            "20",
        ]);
        let loaded = load_config_with(&args);
        env::remove_var("MICROCAV_MEDIA__SUBSTRATE");
        env::remove_var("MICROCAV_STRUCTURE__TOP_PAIRS");
        env::remove_var("MICROCAV_THETA");

        let settings = loaded.unwrap();
        assert_eq!(settings.media.substrate, 3.5);
        assert_eq!(settings.media.incident, consts::DEFAULT_INCIDENT_REFR_INDEX);
        assert_eq!(settings.structure.top_pairs, 7);
        assert_eq!(settings.theta, 20.0);
    }

    #[test]
    fn cli_rejects_bad_polarisation() {
        assert!(CliArgs::try_parse_from(["microcav", "--pol", "x"]).is_err());
    }

    #[test]
    fn validation() {
        let mut settings = load_default_config().unwrap();
        settings.wavelength = 0.0;
        assert!(validate_config(&settings).is_err());

        let mut settings = load_default_config().unwrap();
        settings.media.substrate = -1.0;
        assert!(validate_config(&settings).is_err());

        let mut settings = load_default_config().unwrap();
        settings.sweep = Sweep::Wavelength {
            start: 500.0,
            end: 400.0,
            num: 10,
        };
        assert!(validate_config(&settings).is_err());
    }
}

/// Refractive indices of the media bounding the stack.
///
/// The incident index only enters the power-flow correction of the
/// transmittance; the substrate index is the medium behind the last
/// interface.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct Media {
    #[serde(default = "default_incident")]
    pub incident: f64,
    #[serde(default = "default_substrate")]
    pub substrate: f64,
}

impl Default for Media {
    fn default() -> Self {
        Self {
            incident: consts::DEFAULT_INCIDENT_REFR_INDEX,
            substrate: consts::DEFAULT_SUBSTRATE_REFR_INDEX,
        }
    }
}

fn default_incident() -> f64 {
    consts::DEFAULT_INCIDENT_REFR_INDEX
}

fn default_substrate() -> f64 {
    consts::DEFAULT_SUBSTRATE_REFR_INDEX
}

fn default_directory() -> PathBuf {
    PathBuf::from("microcav_run")
}

/// Runtime configuration for the application.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    /// Design wavelength: sets the layer thicknesses and the wavelength of angle sweeps.
    pub wavelength: f64,
    pub polarisation: Polarisation,
    /// Incidence angle in degrees, used by wavelength sweeps.
    #[serde(default)]
    pub theta: f64,
    #[serde(default)]
    pub media: Media,
    pub structure: StructureConfig,
    pub sweep: Sweep,
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

/// Loads `config/default.toml` only, ignoring environment and command line.
pub fn load_default_config() -> Result<Settings> {
    let root = retrieve_project_root()?;
    let default_config_file = root.join("config/default.toml");

    let settings = Config::builder()
        .add_source(File::from(default_config_file).required(true))
        .build()
        .context("Error loading configuration")?;

    let config: Settings = settings
        .try_deserialize()
        .context("Error deserializing configuration")?;

    validate_config(&config)?;

    Ok(config)
}

/// Loads the configuration, parsing command-line arguments from the process.
pub fn load_config() -> Result<Settings> {
    load_config_with(&CliArgs::parse())
}

/// Loads the configuration file, applies `MICROCAV_*` environment variables,
/// then the given command-line overrides.
pub fn load_config_with(args: &CliArgs) -> Result<Settings> {
    let config_file = match &args.config {
        Some(path) => path.clone(),
        None => {
            let root = retrieve_project_root()?;
            let default_config_file = root.join("config/default.toml");
            let local_config = root.join("config/local.toml");
            if local_config.exists() {
                local_config
            } else {
                default_config_file
            }
        }
    };
    info!("Using configuration: {}", config_file.display());

    let settings = Config::builder()
        .add_source(File::from(config_file.as_path()).required(true))
        .add_source(
            Environment::with_prefix("microcav")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Error loading configuration {}", config_file.display()))?;

    let mut config: Settings = settings
        .try_deserialize()
        .context("Error deserializing configuration")?;

    apply_args(&mut config, args);
    validate_config(&config)?;

    debug!("{:#?}", config);

    Ok(config)
}

fn apply_args(config: &mut Settings, args: &CliArgs) {
    if let Some(wavelength) = args.wavelength {
        config.wavelength = wavelength;
    }
    if let Some(pol) = args.pol {
        config.polarisation = pol;
    }
    if let Some(theta) = args.theta {
        config.theta = theta;
    }
    if let Some(incident) = args.ri0 {
        config.media.incident = incident;
    }
    if let Some(substrate) = args.ris {
        config.media.substrate = substrate;
    }
    if let Some(n_high) = args.nh {
        config.structure.n_high = n_high;
    }
    if let Some(n_low) = args.nl {
        config.structure.n_low = n_low;
    }
    if let Some(top) = args.top {
        config.structure.top_pairs = top;
    }
    if let Some(bottom) = args.bottom {
        config.structure.bottom_pairs = bottom;
    }
    if let Some(entry) = args.entry {
        config.structure.entry_index = Some(entry);
    }
    if let Some(cavity) = &args.cavity {
        config.structure.cavity = Some(CavityConfig {
            refr_index: cavity[0],
            order: cavity[1],
        });
    }
    if let Some(dir) = &args.dir {
        config.directory = dir.clone();
    }

    // Handle sweep schemes, keeping the configured sample count unless overridden
    let num = args.num.unwrap_or_else(|| config.sweep.num());
    if let Some(range) = &args.wavelengths {
        config.sweep = Sweep::Wavelength {
            start: range[0],
            end: range[1],
            num,
        };
    } else if let Some(range) = &args.angles {
        config.sweep = Sweep::Angle {
            start: range[0],
            end: range[1],
            num,
        };
    } else if let Some(num) = args.num {
        config.sweep = config.sweep.with_num(num);
    }
}

/// Retrieve the project root directory.
/// This function tries to find the project root directory in different ways:
/// 1. If the CARGO_MANIFEST_DIR environment variable is set, use it.
/// 2. If the MICROCAV_ROOT_DIR environment variable is set, use it.
/// 3. If the "config" subdirectory is found in the executable directory or any of its parents, use it.
fn retrieve_project_root() -> Result<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        // When running through cargo (e.g. cargo run, cargo test)
        return Ok(PathBuf::from(manifest_dir));
    }
    if let Ok(path) = env::var("MICROCAV_ROOT_DIR") {
        return Ok(PathBuf::from(path));
    }

    let exe_path = env::current_exe().context("Failed to get current executable path")?;
    exe_path
        .ancestors()
        .skip(1)
        .find(|dir| dir.join("config").is_dir())
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("Could not find project root directory"))
}

pub fn validate_config(config: &Settings) -> Result<()> {
    if !(config.wavelength > 0.0) {
        return Err(anyhow!("Wavelength must be greater than 0"));
    }
    if !(config.media.incident > 0.0 && config.media.substrate > 0.0) {
        return Err(anyhow!(
            "Ambient refractive indices must be positive, got {:?}",
            config.media
        ));
    }
    let structure = &config.structure;
    if !(structure.n_high > 0.0 && structure.n_low > 0.0) {
        return Err(anyhow!("Mirror refractive indices must be positive"));
    }
    if let Some(cavity) = &structure.cavity {
        if !(cavity.refr_index > 0.0 && cavity.order >= 0.0) {
            return Err(anyhow!("Invalid cavity: {:?}", cavity));
        }
    }
    config.sweep.validate()?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(version, about = "microcav - transfer matrix reflectivity of dielectric microcavities")]
pub struct CliArgs {
    /// Configuration file to load instead of config/default.toml.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Design wavelength, in the same length unit as the layer thicknesses.
    #[arg(short, long)]
    pub wavelength: Option<f64>,

    /// Polarisation of the incident light, "s" or "p".
    #[arg(long)]
    pub pol: Option<Polarisation>,

    /// Incidence angle in degrees.
    #[arg(short, long, allow_negative_numbers = true)]
    pub theta: Option<f64>,

    /// The refractive index of the incident medium.
    #[arg(long)]
    pub ri0: Option<f64>,

    /// The refractive index of the substrate.
    #[arg(long)]
    pub ris: Option<f64>,

    /// High refractive index of the mirror pairs.
    #[arg(long)]
    pub nh: Option<f64>,

    /// Low refractive index of the mirror pairs.
    #[arg(long)]
    pub nl: Option<f64>,

    /// Number of mirror pairs above the cavity.
    #[arg(long)]
    pub top: Option<usize>,

    /// Number of mirror pairs below the cavity.
    #[arg(long)]
    pub bottom: Option<usize>,

    /// Refractive index of a zero-thickness entry layer on top of the stack.
    #[arg(long)]
    pub entry: Option<f64>,

    /// Cavity spacer as refractive index and order (number of half-wavelengths).
    /// Format: n q
    #[arg(long, num_args = 2, value_delimiter = ' ')]
    pub cavity: Option<Vec<f64>>,

    /// Sweep over wavelength. Format: start end
    #[arg(long, num_args = 2, value_delimiter = ' ', group = "sweep")]
    pub wavelengths: Option<Vec<f64>>,

    /// Sweep over incidence angle in degrees. Format: start end
    #[arg(long, num_args = 2, value_delimiter = ' ', group = "sweep")]
    pub angles: Option<Vec<f64>>,

    /// Number of sample points in the sweep.
    #[arg(short, long)]
    pub num: Option<usize>,

    /// Output directory.
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings:
  - Wavelength: {:.6}
  - Polarisation: {}
  - Theta: {:.6}
  - Incident Refractive Index: {:.6}
  - Substrate Refractive Index: {:.6}
  - Mirror Indices: {:.6} / {:.6}
  - Pairs (top / bottom): {} / {}
  - Cavity: {:?}
  - Sweep: {}
  ",
            self.wavelength,
            self.polarisation,
            self.theta,
            self.media.incident,
            self.media.substrate,
            self.structure.n_high,
            self.structure.n_low,
            self.structure.top_pairs,
            self.structure.bottom_pairs,
            self.structure.cavity,
            self.sweep,
        )
    }
}
