use std::io::Write;

use anyhow::Result;
use clap::Parser;
use log::{info, warn, LevelFilter};
use microcav::{
    output::{self, Summary},
    problem::Problem,
    settings::{self, CliArgs},
    spectrum::Spectrum,
};

/// Reflectance above which a sample counts as part of the stopband.
const STOPBAND_THRESHOLD: f64 = 0.99;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    let settings = settings::load_config_with(&args)?;
    println!("{}", settings);

    let problem = Problem::from_settings(&settings)?;
    info!(
        "Built stack of {} layers, total thickness {:.3}",
        problem.stack.len(),
        problem.stack.total_thickness()
    );

    let point = problem.solve();
    match point.clone().ensure_finite() {
        Ok(point) => println!(
            "R = {:.6}, T = {:.6} at wavelength {}",
            point.reflectance, point.transmittance, settings.wavelength
        ),
        Err(err) => warn!("{}", err),
    }

    let spectrum = Spectrum::compute(&problem, &settings.sweep);
    let summary = Summary::from_spectrum(&spectrum, STOPBAND_THRESHOLD);
    if let Some((x, r)) = summary.peak {
        println!("Peak reflectance {:.6} at {} {}", r, spectrum.sweep.label(), x);
    }
    if let Some((lo, hi)) = summary.stopband {
        println!("Stopband (R >= {}): {} to {}", STOPBAND_THRESHOLD, lo, hi);
    }

    output::write_settings(&settings, &settings.directory)?;
    output::write_point(&point, &settings.directory)?;
    output::write_spectrum(&spectrum, &settings.directory)?;
    output::write_summary(&summary, &settings.directory)?;

    Ok(())
}

/// Installs the logger. `RUST_LOG` still applies on top of the verbosity flag.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let top_level_module = record
                .module_path()
                .and_then(|path| path.split("::").next())
                .unwrap_or("microcav");
            writeln!(
                buf,
                "{:5} [{}]: {}",
                record.level(),
                top_level_module,
                record.args()
            )
        })
        .init();
}
