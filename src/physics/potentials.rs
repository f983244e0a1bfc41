use nalgebra::DVector;

use crate::force::Force;
use crate::phase::PhaseState;

// ---------------------------------------------------------------------------
// Conservative reference forces with their potentials
// ---------------------------------------------------------------------------

/// A force derived from a time-independent potential `V(q)`, so that
/// `H = |p|^2 / 2 + V(q)` is conserved by the exact flow.
pub trait Potential: Force {
    fn potential(&self, q: &DVector<f64>) -> f64;

    fn hamiltonian(&self, state: &PhaseState) -> f64 {
        state.kinetic_energy() + self.potential(&state.q)
    }
}

/// No force at all; leapfrog reproduces `q0 + p0 t` exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeParticle;

impl Force for FreeParticle {
    fn eval(&self, _t: f64, q: &DVector<f64>, _p: &DVector<f64>) -> DVector<f64> {
        DVector::zeros(q.len())
    }
}

impl Potential for FreeParticle {
    fn potential(&self, _q: &DVector<f64>) -> f64 {
        0.0
    }
}

/// Uniform acceleration field, e.g. surface gravity.
#[derive(Debug, Clone)]
pub struct UniformField {
    pub accel: DVector<f64>,
}

impl Force for UniformField {
    fn eval(&self, _t: f64, _q: &DVector<f64>, _p: &DVector<f64>) -> DVector<f64> {
        self.accel.clone()
    }
}

impl Potential for UniformField {
    fn potential(&self, q: &DVector<f64>) -> f64 {
        -self.accel.dot(q)
    }
}

/// Isotropic spring `a = -k q`, `V = k |q|^2 / 2`.
#[derive(Debug, Clone, Copy)]
pub struct Harmonic {
    pub k: f64,
}

impl Harmonic {
    pub fn omega(&self) -> f64 {
        self.k.sqrt()
    }
}

impl Force for Harmonic {
    fn eval(&self, _t: f64, q: &DVector<f64>, _p: &DVector<f64>) -> DVector<f64> {
        q * -self.k
    }
}

impl Potential for Harmonic {
    fn potential(&self, q: &DVector<f64>) -> f64 {
        0.5 * self.k * q.norm_squared()
    }
}

/// Spring in the extra-parameter form: `args[0]` is the stiffness.
pub fn harmonic_with_args(_t: f64, q: &DVector<f64>, _p: &DVector<f64>, args: &[f64]) -> DVector<f64> {
    let k = args.first().copied().unwrap_or(1.0);
    q * -k
}

// ---------------------------------------------------------------------------
// Point-mass gravity
// ---------------------------------------------------------------------------

/// Inverse-square attraction towards the origin, `a = -mu q / |q|^3`.
/// Inside `min_radius` the force is switched off.
#[derive(Debug, Clone, Copy)]
pub struct Kepler {
    pub mu: f64,
    pub min_radius: f64,
}

impl Kepler {
    pub fn new(mu: f64) -> Self {
        Self { mu, min_radius: 1e-9 }
    }

    /// Period of a bound orbit with semi-major axis `sma`.
    pub fn period(&self, sma: f64) -> f64 {
        2.0 * std::f64::consts::PI * (sma.powi(3) / self.mu).sqrt()
    }

    /// Planar state at periapsis of an orbit with semi-major axis `sma` and
    /// eccentricity `ecc`, moving counter-clockwise.
    pub fn periapsis_state(&self, sma: f64, ecc: f64) -> PhaseState {
        let r_p = sma * (1.0 - ecc);
        let v_p = (self.mu * (1.0 + ecc) / r_p).sqrt(); // vis-viva at periapsis
        PhaseState::from_slices(&[r_p, 0.0], &[0.0, v_p])
    }
}

impl Force for Kepler {
    fn eval(&self, _t: f64, q: &DVector<f64>, _p: &DVector<f64>) -> DVector<f64> {
        let r = q.norm();
        if r < self.min_radius {
            return DVector::zeros(q.len());
        }
        q * (-self.mu / (r * r * r))
    }
}

impl Potential for Kepler {
    fn potential(&self, q: &DVector<f64>) -> f64 {
        let r = q.norm().max(self.min_radius);
        -self.mu / r
    }
}

/// z-component of `q x p` from the first two coordinates; conserved by
/// central forces. `None` for 1-D states.
pub fn planar_angular_momentum(state: &PhaseState) -> Option<f64> {
    if state.q.len() < 2 || state.p.len() < 2 {
        return None;
    }
    Some(state.q[0] * state.p[1] - state.q[1] * state.p[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harmonic_force_is_minus_gradient() {
        let h = Harmonic { k: 4.0 };
        let q = DVector::from_vec(vec![0.5, -1.0]);
        let a = h.eval(0.0, &q, &q);
        assert_eq!(a.as_slice(), &[-2.0, 4.0]);
        assert!((h.potential(&q) - 2.5).abs() < 1e-15);
        assert_eq!(h.omega(), 2.0);
    }

    #[test]
    fn param_form_matches_struct_form() {
        let q = DVector::from_vec(vec![0.3]);
        let a = harmonic_with_args(0.0, &q, &q, &[3.0]);
        assert_eq!(a, Harmonic { k: 3.0 }.eval(0.0, &q, &q));
    }

    #[test]
    fn uniform_field_energy() {
        let g = UniformField { accel: DVector::from_vec(vec![0.0, -9.81]) };
        let s = PhaseState::from_slices(&[0.0, 10.0], &[0.0, 0.0]);
        assert!((g.hamiltonian(&s) - 98.1).abs() < 1e-12);
    }

    #[test]
    fn kepler_points_inward_with_inverse_square() {
        let k = Kepler::new(1.0);
        let q1 = DVector::from_vec(vec![1.0, 0.0]);
        let q2 = DVector::from_vec(vec![2.0, 0.0]);
        let a1 = k.eval(0.0, &q1, &q1);
        let a2 = k.eval(0.0, &q2, &q2);
        assert_eq!(a1[0], -1.0);
        assert!((a2[0] + 0.25).abs() < 1e-15);
        let origin = DVector::<f64>::zeros(2);
        assert_eq!(k.eval(0.0, &origin, &origin), DVector::<f64>::zeros(2));
    }

    #[test]
    fn periapsis_state_is_bound_with_expected_energy() {
        let k = Kepler::new(1.0);
        let s = k.periapsis_state(1.0, 0.5);
        // specific orbital energy is -mu / (2a)
        assert!((k.hamiltonian(&s) + 0.5).abs() < 1e-12);
        assert!((planar_angular_momentum(&s).unwrap() - 0.75_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn angular_momentum_needs_two_coordinates() {
        let line = PhaseState::from_slices(&[1.0], &[2.0]);
        assert_eq!(planar_angular_momentum(&line), None);
        let plane = PhaseState::from_slices(&[1.0, 0.0], &[0.0, 2.0]);
        assert_eq!(planar_angular_momentum(&plane), Some(2.0));
    }
}
