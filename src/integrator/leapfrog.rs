use log::{debug, trace};

use crate::config::{EstimateConfig, LeapfrogConfig, Splitting};
use crate::error::{IntegrateError, Result};
use crate::force::{checked_eval, Force};
use crate::phase::{PhaseState, Trajectory};
use super::estimate::estimate_step;
use super::primitives::{leap_p, leap_q, save_qp};

/// A sub-step ending within this fraction of `step` of an output time lands on it.
const LANDING_SLACK: f64 = 1e-9;

/// Work done by one integration call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegrationStats {
    pub substeps: u64,
    pub force_evals: u64,
    pub step: f64,
}

// ---------------------------------------------------------------------------
// Single leapfrog sub-step
// ---------------------------------------------------------------------------

fn evals_per_step(splitting: Splitting) -> u64 {
    match splitting {
        Splitting::KickDriftKick => 2,
        Splitting::DriftKickDrift => 1,
    }
}

/// One sub-step of size `h` from time `t`. Inputs are not modified.
fn advance<F: Force + ?Sized>(
    force: &F,
    state: &PhaseState,
    t: f64,
    h: f64,
    splitting: Splitting,
) -> Result<PhaseState> {
    match splitting {
        Splitting::KickDriftKick => {
            let a0 = checked_eval(force, t, &state.q, &state.p)?;
            let p_half = leap_p(&state.p, 0.5 * h, &a0);
            let q1 = leap_q(&state.q, &p_half, h);
            let a1 = checked_eval(force, t + h, &q1, &p_half)?;
            let p1 = leap_p(&p_half, 0.5 * h, &a1);
            Ok(PhaseState::new(q1, p1))
        }
        Splitting::DriftKickDrift => {
            let q_half = leap_q(&state.q, &state.p, 0.5 * h);
            let a = checked_eval(force, t + 0.5 * h, &q_half, &state.p)?;
            let p1 = leap_p(&state.p, h, &a);
            let q1 = leap_q(&q_half, &p1, 0.5 * h);
            Ok(PhaseState::new(q1, p1))
        }
    }
}

/// Advance `state` by one sub-step of size `h` starting at time `t`.
///
/// Unlike [`integrate`], negative `h` is accepted: the scheme is
/// time-symmetric, so `step(step(s, t, h), t + h, -h)` recovers `s` up to
/// round-off for velocity-independent forces.
pub fn step<F: Force + ?Sized>(
    force: &F,
    state: &PhaseState,
    t: f64,
    h: f64,
    splitting: Splitting,
) -> Result<PhaseState> {
    if !h.is_finite() || h == 0.0 {
        return Err(IntegrateError::InvalidStep { step: h });
    }
    state.validate()?;
    advance(force, state, t, h, splitting)
}

// ---------------------------------------------------------------------------
// Argument checks (run before any stepping)
// ---------------------------------------------------------------------------

fn validate_times(t0: f64, times: &[f64]) -> Result<()> {
    if !t0.is_finite() {
        return Err(IntegrateError::InvalidArgument { name: "t0", value: t0 });
    }
    if times.is_empty() {
        return Err(IntegrateError::EmptyTimes);
    }
    for (index, &time) in times.iter().enumerate() {
        if !time.is_finite() {
            return Err(IntegrateError::NonFiniteTime { index });
        }
        if time < t0 {
            return Err(IntegrateError::TimeBeforeStart { index, time, t0 });
        }
        if index > 0 && time <= times[index - 1] {
            return Err(IntegrateError::TimesNotIncreasing {
                index,
                prev: times[index - 1],
                next: time,
            });
        }
    }
    Ok(())
}

/// Upper bound on the sub-steps needed: the regular grid plus one landing
/// step per output time.
fn projected_substeps(t0: f64, times: &[f64], step: f64) -> u64 {
    let span = times.last().map_or(0.0, |&t| t - t0);
    let grid = (span / step).ceil();
    (grid as u64).saturating_add(times.len() as u64)
}

fn validate_request(
    state: &PhaseState,
    t0: f64,
    times: &[f64],
    step: f64,
    config: &LeapfrogConfig,
) -> Result<usize> {
    let dim = state.validate()?;
    if !step.is_finite() || step <= 0.0 {
        return Err(IntegrateError::InvalidStep { step });
    }
    validate_times(t0, times)?;
    let needed = projected_substeps(t0, times, step);
    if needed > config.max_substeps {
        return Err(IntegrateError::TooManySubsteps { needed, limit: config.max_substeps });
    }
    Ok(dim)
}

// ---------------------------------------------------------------------------
// Fixed-step integration with exact landing on output times
// ---------------------------------------------------------------------------

/// Stepping loop behind [`integrate_into`] and [`integrate`]; arguments are
/// already validated and `out` holds `times.len() * 2 * dim` values.
///
/// Time is recomputed as `segment start + k * step` rather than summed, so it
/// keeps moving even where `step` is below the f64 spacing around `t0`.
fn run_into<F: Force + ?Sized>(
    force: &F,
    state: &PhaseState,
    t0: f64,
    times: &[f64],
    step: f64,
    config: &LeapfrogConfig,
    out: &mut [f64],
) -> Result<IntegrationStats> {
    let width = 2 * state.dim();
    let per_step = evals_per_step(config.splitting);
    let mut stats = IntegrationStats { step, ..Default::default() };
    let mut current = state.clone();
    let mut t = t0;
    let mut seg_start = t0;
    let mut k: u64 = 0;

    for (i, (&target, slot)) in times.iter().zip(out.chunks_exact_mut(width)).enumerate() {
        loop {
            let remaining = target - t;
            if remaining <= 0.0 {
                break;
            }
            if stats.substeps >= config.max_substeps {
                return Err(IntegrateError::TooManySubsteps {
                    needed: stats.substeps + 1,
                    limit: config.max_substeps,
                });
            }
            let landing = remaining <= step * (1.0 + LANDING_SLACK);
            let h = if landing { remaining } else { step };
            current = advance(force, &current, t, h, config.splitting)?;
            stats.substeps += 1;
            stats.force_evals += per_step;
            if landing {
                t = target;
            } else {
                k += 1;
                t = seg_start + k as f64 * step;
            }
        }
        seg_start = t;
        k = 0;
        save_qp(&current.q, &current.p, slot);
        trace!("snapshot {} at t={}", i, target);
    }

    debug!(
        "leapfrog: {} outputs, {} sub-steps of {:e}, {} force evaluations",
        times.len(),
        stats.substeps,
        step,
        stats.force_evals
    );
    Ok(stats)
}

/// Integrate from `(t0, state)` and write one snapshot per entry of `times`
/// into `out`, which must hold `times.len() * 2 * dim` values.
///
/// Invalid arguments are rejected before `out` is touched. A force failure
/// mid-run leaves the snapshots recorded so far in place.
pub fn integrate_into<F: Force + ?Sized>(
    force: &F,
    state: &PhaseState,
    t0: f64,
    times: &[f64],
    step: f64,
    config: &LeapfrogConfig,
    out: &mut [f64],
) -> Result<IntegrationStats> {
    let dim = validate_request(state, t0, times, step, config)?;
    let width = 2 * dim;
    let expected = times.len() * width;
    if out.len() != expected {
        return Err(IntegrateError::OutputLength { expected, actual: out.len() });
    }
    run_into(force, state, t0, times, step, config, out)
}

/// Integrate and collect the snapshots into a freshly allocated [`Trajectory`].
pub fn integrate<F: Force + ?Sized>(
    force: &F,
    state: &PhaseState,
    t0: f64,
    times: &[f64],
    step: f64,
    config: &LeapfrogConfig,
) -> Result<Trajectory> {
    let dim = validate_request(state, t0, times, step, config)?;
    let mut data = vec![0.0; times.len() * 2 * dim];
    let stats = run_into(force, state, t0, times, step, config, &mut data)?;
    Ok(Trajectory {
        dim,
        times: times.to_vec(),
        data,
        stats,
    })
}

/// Smallest positive gap between consecutive output times (starting at `t0`).
fn smallest_interval(t0: f64, times: &[f64]) -> Option<f64> {
    std::iter::once(t0)
        .chain(times.iter().copied())
        .zip(times.iter().copied())
        .map(|(a, b)| b - a)
        .filter(|&d| d > 0.0)
        .reduce(f64::min)
}

/// Pick a step with [`estimate_step`] and integrate with it.
///
/// The guess handed to the estimator is the shortest output interval, the
/// horizon is the span from `t0` to the last output time.
pub fn integrate_auto<F: Force + ?Sized>(
    force: &F,
    state: &PhaseState,
    t0: f64,
    times: &[f64],
    estimate: &EstimateConfig,
    config: &LeapfrogConfig,
) -> Result<Trajectory> {
    state.validate()?;
    validate_times(t0, times)?;
    let span = times.last().map_or(0.0, |&t| t - t0);
    let guess = smallest_interval(t0, times).unwrap_or(1.0);
    let h = estimate_step(force, state, t0, span, guess, estimate)?;
    integrate(force, state, t0, times, h, config)
}
