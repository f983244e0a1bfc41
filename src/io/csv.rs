use std::io::{self, Write};

use crate::phase::Trajectory;

/// Write trajectory snapshots to CSV.
///
/// Columns: time, q0..q{dim-1}, p0..p{dim-1}
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &Trajectory) -> io::Result<()> {
    let dim = trajectory.dim;
    let mut header = String::from("time");
    for i in 0..dim {
        header.push_str(&format!(",q{}", i));
    }
    for i in 0..dim {
        header.push_str(&format!(",p{}", i));
    }
    writeln!(writer, "{}", header)?;

    for (i, &t) in trajectory.times.iter().enumerate() {
        write!(writer, "{:.10}", t)?;
        for v in trajectory.q(i).iter().chain(trajectory.p(i)) {
            write!(writer, ",{:.12e}", v)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, trajectory: &Trajectory) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}
