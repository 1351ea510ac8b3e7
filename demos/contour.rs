use rand::rngs::SmallRng;
use rand::SeedableRng;

use gpcomp::process::gaussian::kernel::*;
use gpcomp::process::gaussian::*;

/// A short melodic contour: (time in beats, pitch in semitones from the tonic)
const CONTOUR: [(f64, f64); 8] = [
    (0.0, 0.0),
    (1.0, 2.0),
    (2.0, 4.0),
    (3.0, 7.0),
    (4.0, 5.0),
    (5.0, 4.0),
    (6.0, 2.0),
    (7.0, 0.0),
];

fn render(label: &str, values: &[f64]) {
    let line: Vec<String> = values.iter().map(|v| format!("{:6.2}", v)).collect();
    println!("{:>10}: {}", label, line.join(" "));
}

pub fn main() -> Result<(), GaussianProcessError> {
    env_logger::builder().init();
    let mut rng = SmallRng::seed_from_u64(0x1234);

    let xs: Vec<[f64; 1]> = CONTOUR.iter().map(|&(t, _)| [t]).collect();
    let ys: Vec<f64> = CONTOUR.iter().map(|&(_, p)| p).collect();

    let kernel = RbfKernel::new(1.5, 16.0)?;
    let mut gp = GaussianProcessRegressor::new(kernel).with_alpha(1E-4);
    gp.fit(&xs, &ys)?;
    println!("ln m = {:.4}", gp.ln_marginal_likelihood()?);

    // Half-beat grid, running a little past the data
    let grid: Vec<[f64; 1]> = (0..20).map(|i| [0.5 * i as f64]).collect();
    let times: Vec<f64> = grid.iter().map(|x| x[0]).collect();
    render("beat", &times);

    let Prediction { mean, std } = gp.predict_with_uncertainty(&grid)?;
    render("mean", &mean);
    render("std", &std);

    for (i, sample) in gp.sample_y(&grid, 2, &mut rng)?.iter().enumerate() {
        render(&format!("marginal {}", i), sample);
    }
    for (i, sample) in gp.sample_y_joint(&grid, 2, &mut rng)?.iter().enumerate()
    {
        render(&format!("joint {}", i), sample);
    }

    // Swap to a periodic kernel with a four-beat period and refit
    let mut gp = GaussianProcessRegressor::new(PeriodicKernel::new(1.0, 4.0, 16.0)?)
        .with_alpha(1E-2);
    gp.fit(&xs, &ys)?;
    println!("periodic ln m = {:.4}", gp.ln_marginal_likelihood()?);
    render("periodic", &gp.predict(&grid)?);

    Ok(())
}
