use microcav::{
    polarisation::Polarisation,
    problem::Problem,
    settings::Media,
    spectrum::{Spectrum, Sweep},
    structure::Stack,
};

fn main() {
    let stack = Stack::new(vec![1.0], vec![0.0])
        .unwrap()
        .then(Stack::dbr(2.0, 1.4, 10, 900.0).unwrap());

    let sweep = Sweep::Angle {
        start: 0.0,
        end: 80.0,
        num: 9,
    };

    for pol in [Polarisation::S, Polarisation::P] {
        let problem = Problem::new(stack.clone(), Media::default(), pol, 0.0, 900.0);
        let spectrum = Spectrum::compute(&problem, &sweep);
        println!("{}-polarised:", pol);
        for (theta, r) in spectrum.x.iter().zip(spectrum.reflectance.iter()) {
            println!("  theta = {:>4} deg  R = {:.6}", theta, r);
        }
    }
}
