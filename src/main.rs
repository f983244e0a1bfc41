use std::f64::consts::PI;
use std::path::Path;
use std::process::ExitCode;

use leapfrog_sim::io::{csv, json::{self, EnergySummary}};
use leapfrog_sim::physics::{planar_angular_momentum, Harmonic, Kepler, Potential};
use leapfrog_sim::{
    estimate_step, integrate, EstimateConfig, IntegrateError, LeapfrogConfig, PhaseState,
    Trajectory,
};

fn main() -> ExitCode {
    env_logger::init();

    // Optional first argument: directory for CSV / JSON output
    let out_dir = std::env::args().nth(1);

    match run(out_dir.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(out_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = LeapfrogConfig::default();
    let estimate = EstimateConfig::default();

    println!();
    println!("====================================================================");
    println!("  LEAPFROG INTEGRATOR: reference systems");
    println!("====================================================================");
    println!();

    // -----------------------------------------------------------------------
    // Harmonic oscillator: 100 periods, sampled 20 times per period
    // -----------------------------------------------------------------------
    let spring = Harmonic { k: 1.0 };
    let osc0 = PhaseState::from_slices(&[1.0], &[0.0]);
    let period = 2.0 * PI / spring.omega();
    let osc_times = sample_times(period / 20.0, 2000);
    let h = estimate_step(&spring, &osc0, 0.0, period * 100.0, period / 20.0, &estimate)?;
    let osc = integrate(&spring, &osc0, 0.0, &osc_times, h, &config)?;
    let osc_summary = EnergySummary::from_trajectory(&osc, |s| spring.hamiltonian(s));

    report("Harmonic oscillator (k = 1, q0 = 1, p0 = 0)", &osc_summary);
    let last = osc.last().ok_or(IntegrateError::EmptyTimes)?;
    let t_end = osc.times[osc.len() - 1];
    println!(
        "  q(T) = {:>12.8}   exact {:>12.8}   |err| {:.2e}",
        last.q[0],
        t_end.cos(),
        (last.q[0] - t_end.cos()).abs()
    );
    println!();

    // -----------------------------------------------------------------------
    // Kepler orbit, e = 0.5: 10 periods
    // -----------------------------------------------------------------------
    let kepler = Kepler::new(1.0);
    let orbit0 = kepler.periapsis_state(1.0, 0.5);
    let orbit_period = kepler.period(1.0);
    let orbit_times = sample_times(orbit_period / 50.0, 500);
    let h = estimate_step(&kepler, &orbit0, 0.0, orbit_period * 10.0, orbit_period / 50.0, &estimate)?;
    let orbit = integrate(&kepler, &orbit0, 0.0, &orbit_times, h, &config)?;
    let orbit_summary = EnergySummary::from_trajectory(&orbit, |s| kepler.hamiltonian(s));

    report("Kepler orbit (mu = 1, a = 1, e = 0.5)", &orbit_summary);
    let l0 = planar_angular_momentum(&orbit0).ok_or("Kepler state must be planar")?;
    let l_drift = orbit
        .iter()
        .filter_map(|(_, s)| planar_angular_momentum(&s))
        .map(|l| (l - l0).abs())
        .fold(0.0_f64, f64::max);
    println!("  Angular momentum drift: {:.2e}", l_drift);
    println!();

    print_table(&orbit, &kepler);

    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir)?;
        write_outputs(dir, "harmonic", &osc, &osc_summary)?;
        write_outputs(dir, "kepler", &orbit, &orbit_summary)?;
        println!("  Wrote CSV and JSON to {}", dir);
    }

    println!("====================================================================");
    println!();
    Ok(())
}

fn sample_times(dt: f64, n: usize) -> Vec<f64> {
    (1..=n).map(|i| i as f64 * dt).collect()
}

fn report(title: &str, s: &EnergySummary) {
    println!("  {}", title);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Step:          {:>10.3e}       Sub-steps:    {:>10}",
        s.step, s.substeps
    );
    println!(
        "  Energy:        {:>10.6}       Max |dE|/E:   {:>10.2e}",
        s.initial_energy, s.max_rel_drift
    );
    println!("  Final dE:      {:>10.2e}", s.final_drift);
}

fn print_table(traj: &Trajectory, kepler: &Kepler) {
    println!("  Orbit samples");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>8}  {:>10}  {:>10}  {:>10}  {:>12}",
        "t", "x", "y", "r", "energy"
    );
    println!("  {}", "─".repeat(58));

    let sample_interval = (traj.len() / 20).max(1);
    for (i, (t, s)) in traj.iter().enumerate() {
        if i % sample_interval != 0 && i != traj.len() - 1 {
            continue;
        }
        println!(
            "  {:>8.3}  {:>10.5}  {:>10.5}  {:>10.5}  {:>12.8}",
            t,
            s.q[0],
            s.q[1],
            s.q.norm(),
            kepler.hamiltonian(&s)
        );
    }
    println!();
}

fn write_outputs(
    dir: &str,
    name: &str,
    traj: &Trajectory,
    summary: &EnergySummary,
) -> std::io::Result<()> {
    let csv_path = Path::new(dir).join(format!("{}.csv", name));
    let json_path = Path::new(dir).join(format!("{}.json", name));
    csv::write_trajectory_file(&csv_path.to_string_lossy(), traj)?;
    json::write_summary_file(&json_path.to_string_lossy(), name, summary)
}
