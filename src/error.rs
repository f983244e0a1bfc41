use thiserror::Error;

/// Failures reported by the estimator and the integrator.
///
/// Everything before `TooManySubsteps` is detected before the first sub-step,
/// so no snapshot has been written when one of those is returned.
/// `TooManySubsteps` is usually caught up front from the projected count but
/// can also stop a run part way. The last two come from the force function
/// in the middle of stepping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrateError {
    #[error("phase space dimension must be positive")]
    ZeroDimension,

    #[error("q has {q} coordinates but p has {p}")]
    DimensionMismatch { q: usize, p: usize },

    #[error("step size must be positive and finite, got {step}")]
    InvalidStep { step: f64 },

    #[error("no output times requested")]
    EmptyTimes,

    #[error("output times must be strictly increasing: times[{index}] = {next} follows {prev}")]
    TimesNotIncreasing { index: usize, prev: f64, next: f64 },

    #[error("output time times[{index}] = {time} precedes start time {t0}")]
    TimeBeforeStart { index: usize, time: f64, t0: f64 },

    #[error("time value #{index} is not finite")]
    NonFiniteTime { index: usize },

    #[error("output buffer holds {actual} values, expected {expected}")]
    OutputLength { expected: usize, actual: usize },

    #[error("invalid {name}: {value}")]
    InvalidArgument { name: &'static str, value: f64 },

    #[error("integration needs {needed} sub-steps, limit is {limit}")]
    TooManySubsteps { needed: u64, limit: u64 },

    #[error("force returned {actual} components, expected {expected}")]
    ForceDimension { expected: usize, actual: usize },

    #[error("force evaluation produced a non-finite value at t = {t}")]
    NonFiniteForce { t: f64 },
}

pub type Result<T> = std::result::Result<T, IntegrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let e = IntegrateError::TimesNotIncreasing { index: 2, prev: 1.5, next: 1.0 };
        assert_eq!(
            e.to_string(),
            "output times must be strictly increasing: times[2] = 1 follows 1.5"
        );
        let e = IntegrateError::InvalidStep { step: 0.0 };
        assert!(e.to_string().contains("got 0"));
    }
}
