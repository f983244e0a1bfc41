use nalgebra::DVector;

use crate::error::{IntegrateError, Result};
use crate::integrator::IntegrationStats;

// ---------------------------------------------------------------------------
// Phase-space state: positions q and velocity-equivalent momenta p
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseState {
    pub q: DVector<f64>,
    pub p: DVector<f64>,
}

impl PhaseState {
    pub fn new(q: DVector<f64>, p: DVector<f64>) -> Self {
        Self { q, p }
    }

    pub fn from_slices(q: &[f64], p: &[f64]) -> Self {
        Self {
            q: DVector::from_column_slice(q),
            p: DVector::from_column_slice(p),
        }
    }

    /// Number of degrees of freedom. Only meaningful after `validate`.
    pub fn dim(&self) -> usize {
        self.q.len()
    }

    pub fn validate(&self) -> Result<usize> {
        if self.q.len() != self.p.len() {
            return Err(IntegrateError::DimensionMismatch { q: self.q.len(), p: self.p.len() });
        }
        if self.q.is_empty() {
            return Err(IntegrateError::ZeroDimension);
        }
        Ok(self.q.len())
    }

    /// Same positions, momenta reversed. Leapfrog run on the flipped state
    /// retraces the original path for velocity-independent forces.
    pub fn flipped(&self) -> Self {
        Self { q: self.q.clone(), p: -&self.p }
    }

    /// Kinetic energy for unit mass.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.p.norm_squared()
    }
}

// ---------------------------------------------------------------------------
// Trajectory: one (q, p) snapshot per requested output time
// ---------------------------------------------------------------------------

/// Snapshots are stored back to back, `2 * dim` values each, `q` first.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub dim: usize,
    pub times: Vec<f64>,
    pub data: Vec<f64>,
    pub stats: IntegrationStats,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn slot(&self, i: usize) -> &[f64] {
        let w = 2 * self.dim;
        &self.data[i * w..(i + 1) * w]
    }

    pub fn q(&self, i: usize) -> &[f64] {
        &self.slot(i)[..self.dim]
    }

    pub fn p(&self, i: usize) -> &[f64] {
        &self.slot(i)[self.dim..]
    }

    pub fn state(&self, i: usize) -> PhaseState {
        PhaseState::from_slices(self.q(i), self.p(i))
    }

    pub fn last(&self) -> Option<PhaseState> {
        self.len().checked_sub(1).map(|i| self.state(i))
    }

    /// Iterate `(time, state)` pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, PhaseState)> + '_ {
        self.times.iter().enumerate().map(move |(i, &t)| (t, self.state(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_catches_shape_errors() {
        let empty = PhaseState::from_slices(&[], &[]);
        assert_eq!(empty.validate(), Err(IntegrateError::ZeroDimension));

        let ragged = PhaseState::from_slices(&[1.0, 2.0], &[0.0]);
        assert_eq!(ragged.validate(), Err(IntegrateError::DimensionMismatch { q: 2, p: 1 }));

        let ok = PhaseState::from_slices(&[1.0, 2.0], &[0.0, 3.0]);
        assert_eq!(ok.validate(), Ok(2));
        assert!((ok.kinetic_energy() - 4.5).abs() < 1e-15);
    }

    #[test]
    fn trajectory_slots_split_q_and_p() {
        let traj = Trajectory {
            dim: 2,
            times: vec![0.0, 1.0],
            data: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            stats: IntegrationStats::default(),
        };
        assert_eq!(traj.q(1), &[5.0, 6.0]);
        assert_eq!(traj.p(0), &[3.0, 4.0]);
        assert_eq!(traj.last(), Some(PhaseState::from_slices(&[5.0, 6.0], &[7.0, 8.0])));
        assert_eq!(traj.iter().count(), 2);
    }

    #[test]
    fn flipped_negates_momentum_only() {
        let s = PhaseState::from_slices(&[1.0], &[2.0]).flipped();
        assert_eq!(s.q[0], 1.0);
        assert_eq!(s.p[0], -2.0);
    }
}
