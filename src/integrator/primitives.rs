use nalgebra::DVector;

// ---------------------------------------------------------------------------
// Leapfrog update primitives
// ---------------------------------------------------------------------------

/// Drift: `q + h p`.
#[inline]
pub fn leap_q(q: &DVector<f64>, p: &DVector<f64>, h: f64) -> DVector<f64> {
    debug_assert_eq!(q.len(), p.len());
    q + p * h
}

/// Kick: `p + h a`.
#[inline]
pub fn leap_p(p: &DVector<f64>, h: f64, a: &DVector<f64>) -> DVector<f64> {
    debug_assert_eq!(p.len(), a.len());
    p + a * h
}

/// Copy `q` then `p` into a `2 * dim` snapshot slot.
#[inline]
pub fn save_qp(q: &DVector<f64>, p: &DVector<f64>, slot: &mut [f64]) {
    let dim = q.len();
    slot[..dim].copy_from_slice(q.as_slice());
    slot[dim..2 * dim].copy_from_slice(p.as_slice());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_and_kick() {
        let q = DVector::from_vec(vec![1.0, -2.0]);
        let p = DVector::from_vec(vec![0.5, 4.0]);
        let a = DVector::from_vec(vec![-1.0, 2.0]);

        let q1 = leap_q(&q, &p, 0.1);
        assert!((q1[0] - 1.05).abs() < 1e-15);
        assert!((q1[1] + 1.6).abs() < 1e-15);

        let p1 = leap_p(&p, 0.5, &a);
        assert_eq!(p1.as_slice(), &[0.0, 5.0]);

        // inputs untouched
        assert_eq!(q.as_slice(), &[1.0, -2.0]);
    }

    #[test]
    fn save_qp_layout() {
        let q = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let p = DVector::from_vec(vec![4.0, 5.0, 6.0]);
        let mut buf = [0.0; 8];
        save_qp(&q, &p, &mut buf[1..7]);
        assert_eq!(buf, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.0]);
    }
}
