use std::io::{self, Write};

use crate::phase::{PhaseState, Trajectory};

/// Energy bookkeeping over a trajectory.
#[derive(Debug, Clone)]
pub struct EnergySummary {
    pub initial_energy: f64,
    pub max_abs_drift: f64,
    pub max_rel_drift: f64,
    pub final_drift: f64,
    pub snapshots: usize,
    pub substeps: u64,
    pub step: f64,
}

impl EnergySummary {
    /// Evaluate `hamiltonian` at every snapshot and compare with the first.
    pub fn from_trajectory<H>(trajectory: &Trajectory, hamiltonian: H) -> Self
    where
        H: Fn(&PhaseState) -> f64,
    {
        let energies: Vec<f64> = trajectory.iter().map(|(_, s)| hamiltonian(&s)).collect();
        let initial = energies.first().copied().unwrap_or(0.0);

        let max_abs_drift = energies
            .iter()
            .map(|e| (e - initial).abs())
            .fold(0.0_f64, f64::max);
        let max_rel_drift = if initial != 0.0 { max_abs_drift / initial.abs() } else { max_abs_drift };

        EnergySummary {
            initial_energy: initial,
            max_abs_drift,
            max_rel_drift,
            final_drift: energies.last().map_or(0.0, |e| e - initial),
            snapshots: trajectory.len(),
            substeps: trajectory.stats.substeps,
            step: trajectory.stats.step,
        }
    }
}

/// Write energy summary as JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, system: &str, summary: &EnergySummary) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"system\": \"{}\",", system)?;
    writeln!(writer, "  \"integration\": {{")?;
    writeln!(writer, "    \"step\": {:e},", summary.step)?;
    writeln!(writer, "    \"substeps\": {},", summary.substeps)?;
    writeln!(writer, "    \"snapshots\": {}", summary.snapshots)?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"energy\": {{")?;
    writeln!(writer, "    \"initial\": {:e},", summary.initial_energy)?;
    writeln!(writer, "    \"max_abs_drift\": {:e},", summary.max_abs_drift)?;
    writeln!(writer, "    \"max_rel_drift\": {:e},", summary.max_rel_drift)?;
    writeln!(writer, "    \"final_drift\": {:e}", summary.final_drift)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write energy summary JSON to a file.
pub fn write_summary_file(path: &str, system: &str, summary: &EnergySummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, system, summary)
}
