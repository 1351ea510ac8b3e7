use rand::rngs::SmallRng;
use rand::SeedableRng;

use gpcomp::process::gaussian::kernel::*;
use gpcomp::process::gaussian::*;

/// Semitone offsets of the major scale
const MAJOR: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];
const NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Map a continuous value to a pitch in C major, one scale degree per unit.
fn to_pitch(value: f64) -> String {
    let degree = value.round() as i32;
    let octave = 4 + degree.div_euclid(7);
    let semitone = MAJOR[degree.rem_euclid(7) as usize];
    format!("{}{}", NAMES[semitone as usize], octave)
}

pub fn main() -> Result<(), GaussianProcessError> {
    env_logger::builder().init();
    let mut rng = SmallRng::seed_from_u64(0xABCD);

    let kernels: Vec<(&str, Kernel)> = vec![
        ("rbf", RbfKernel::new(3.0, 9.0)?.into()),
        ("periodic", PeriodicKernel::new(1.0, 8.0, 9.0)?.into()),
        ("rational quadratic", RationalQuadratic::new(2.0, 0.5, 9.0)?.into()),
    ];

    for (label, kernel) in kernels {
        let gp = GaussianProcessRegressor::new(kernel);
        let values = gp.sample_prior_indices(16, &mut rng)?;
        let pitches: Vec<String> = values.iter().map(|&v| to_pitch(v)).collect();
        println!("{:>18}: {}", label, pitches.join(" "));
    }

    Ok(())
}
