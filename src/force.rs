use nalgebra::DVector;

use crate::error::{IntegrateError, Result};

// ---------------------------------------------------------------------------
// Force seam
// ---------------------------------------------------------------------------

/// Acceleration field driving the integrator.
///
/// `p` is velocity-equivalent (unit mass), so `eval` returns dp/dt directly;
/// masses and coupling constants belong inside the implementation.
/// Implementations must be pure: the integrator calls them many times and
/// relies on identical inputs giving identical outputs.
pub trait Force {
    fn eval(&self, t: f64, q: &DVector<f64>, p: &DVector<f64>) -> DVector<f64>;
}

impl<F> Force for F
where
    F: Fn(f64, &DVector<f64>, &DVector<f64>) -> DVector<f64>,
{
    fn eval(&self, t: f64, q: &DVector<f64>, p: &DVector<f64>) -> DVector<f64> {
        self(t, q, p)
    }
}

/// Force function with an explicit block of extra parameters
/// (masses, potential coefficients, ...), passed on every evaluation.
pub type ParamForceFn = fn(f64, &DVector<f64>, &DVector<f64>, &[f64]) -> DVector<f64>;

#[derive(Debug, Clone)]
pub struct ParamForce {
    pub func: ParamForceFn,
    pub args: Vec<f64>,
}

impl ParamForce {
    pub fn new(func: ParamForceFn, args: Vec<f64>) -> Self {
        Self { func, args }
    }

    pub fn n_args(&self) -> usize {
        self.args.len()
    }
}

impl Force for ParamForce {
    fn eval(&self, t: f64, q: &DVector<f64>, p: &DVector<f64>) -> DVector<f64> {
        (self.func)(t, q, p, &self.args)
    }
}

/// Evaluate `force` and reject results of the wrong length or with NaN/inf.
pub(crate) fn checked_eval<F: Force + ?Sized>(
    force: &F,
    t: f64,
    q: &DVector<f64>,
    p: &DVector<f64>,
) -> Result<DVector<f64>> {
    let a = force.eval(t, q, p);
    if a.len() != q.len() {
        return Err(IntegrateError::ForceDimension { expected: q.len(), actual: a.len() });
    }
    if a.iter().any(|x| !x.is_finite()) {
        return Err(IntegrateError::NonFiniteForce { t });
    }
    Ok(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spring(_t: f64, q: &DVector<f64>, _p: &DVector<f64>, args: &[f64]) -> DVector<f64> {
        -q * args[0]
    }

    #[test]
    fn closures_are_forces() {
        let g = |_t: f64, q: &DVector<f64>, _p: &DVector<f64>| DVector::from_element(q.len(), -9.81);
        let q = DVector::from_vec(vec![0.0, 1.0]);
        let a = g.eval(0.0, &q, &q);
        assert_eq!(a.len(), 2);
        assert_eq!(a[1], -9.81);
    }

    #[test]
    fn param_force_passes_args() {
        let f = ParamForce::new(spring, vec![4.0]);
        let q = DVector::from_vec(vec![0.5]);
        let p = DVector::zeros(1);
        assert_eq!(f.n_args(), 1);
        assert_eq!(f.eval(0.0, &q, &p)[0], -2.0);
    }

    #[test]
    fn checked_eval_rejects_bad_output() {
        let q = DVector::from_vec(vec![1.0, 2.0]);
        let short = |_t: f64, _q: &DVector<f64>, _p: &DVector<f64>| DVector::<f64>::zeros(1);
        assert_eq!(
            checked_eval(&short, 0.0, &q, &q),
            Err(IntegrateError::ForceDimension { expected: 2, actual: 1 })
        );
        let nan = |_t: f64, q: &DVector<f64>, _p: &DVector<f64>| q.map(|_| f64::NAN);
        assert_eq!(
            checked_eval(&nan, 3.0, &q, &q),
            Err(IntegrateError::NonFiniteForce { t: 3.0 })
        );
    }
}
