use nalgebra::DVector;

use leapfrog_sim::physics::harmonic_with_args;
use leapfrog_sim::{integrate_auto, EstimateConfig, LeapfrogConfig, ParamForce, PhaseState};

/// Forced, undamped pendulum written as a plain closure.
fn driven_pendulum(drive: f64, freq: f64) -> impl Fn(f64, &DVector<f64>, &DVector<f64>) -> DVector<f64> {
    move |t, q, _p| DVector::from_element(1, -q[0].sin() + drive * (freq * t).cos())
}

fn main() {
    let times: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let initial = PhaseState::from_slices(&[0.2], &[0.0]);

    // A closure captures its parameters directly
    let pendulum = driven_pendulum(0.1, 0.8);
    let traj = integrate_auto(
        &pendulum,
        &initial,
        0.0,
        &times,
        &EstimateConfig::default(),
        &LeapfrogConfig::default(),
    )
    .expect("integration");

    println!("Driven pendulum, step {:.3e}", traj.stats.step);
    for (t, s) in traj.iter() {
        println!("  t = {:>5.1}   theta = {:>9.5}   omega = {:>9.5}", t, s.q[0], s.p[0]);
    }

    // A plain function receives its parameters as an argument block
    let spring = ParamForce::new(harmonic_with_args, vec![9.0]);
    let traj = integrate_auto(
        &spring,
        &initial,
        0.0,
        &times,
        &EstimateConfig::default(),
        &LeapfrogConfig::default(),
    )
    .expect("integration");

    println!("\nSpring with k = {} (via argument block), step {:.3e}", spring.args[0], traj.stats.step);
    for (t, s) in traj.iter() {
        println!("  t = {:>5.1}   q = {:>9.5}   exact {:>9.5}", t, s.q[0], 0.2 * (3.0 * t).cos());
    }
}
