use microcav::{
    polarisation::Polarisation,
    problem::Problem,
    settings::Media,
    spectrum::{Spectrum, Sweep},
    structure::{CavityConfig, Stack, StructureConfig},
};

fn main() {
    let wavelength = 900.0;
    let structure = StructureConfig {
        entry_index: Some(1.0),
        n_high: 2.0,
        n_low: 1.4,
        top_pairs: 6,
        bottom_pairs: 7,
        cavity: Some(CavityConfig {
            refr_index: 2.0,
            order: 1.0,
        }),
    };
    let stack = Stack::microcavity(&structure, wavelength).unwrap();
    let problem = Problem::new(stack, Media::default(), Polarisation::S, 0.0, wavelength);

    let sweep = Sweep::Wavelength {
        start: 880.0,
        end: 920.0,
        num: 401,
    };
    let spectrum = Spectrum::compute(&problem, &sweep);

    let dip = spectrum
        .reflectance
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, r)| (spectrum.x[i], *r));
    println!("stopband: {:?}", spectrum.stopband(0.99));
    println!("cavity mode (wavelength, R): {:?}", dip);
}
