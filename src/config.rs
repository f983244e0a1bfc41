// ---------------------------------------------------------------------------
// Integrator and estimator settings
// ---------------------------------------------------------------------------

/// Ordering of the leapfrog splitting within one sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Splitting {
    /// Half kick, full drift, half kick (velocity Verlet).
    #[default]
    KickDriftKick,
    /// Half drift, full kick at the midpoint, half drift (position Verlet).
    DriftKickDrift,
}

#[derive(Debug, Clone)]
pub struct LeapfrogConfig {
    pub splitting: Splitting,
    /// Upper bound on sub-steps per call, checked up front and while stepping.
    pub max_substeps: u64,
}

impl Default for LeapfrogConfig {
    fn default() -> Self {
        Self {
            splitting: Splitting::KickDriftKick,
            max_substeps: 50_000_000,
        }
    }
}

/// Settings for the single-evaluation step heuristic.
#[derive(Debug, Clone)]
pub struct EstimateConfig {
    pub tolerance: f64,     // relative change allowed per step
    pub safety_factor: f64, // in (0, 1]
    pub min_substeps: u32,  // the horizon is never covered in fewer steps
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            safety_factor: 0.9,
            min_substeps: 10,
        }
    }
}

/// Settings for the step-doubling refiner.
#[derive(Debug, Clone)]
pub struct RefineConfig {
    pub splitting: Splitting,
    pub rtol: f64,
    pub atol: f64,
    /// Stop halving once the interval holds this many steps.
    pub max_refinements: u32,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            splitting: Splitting::KickDriftKick,
            rtol: 1e-6,
            atol: 1e-6,
            max_refinements: 10_000,
        }
    }
}
