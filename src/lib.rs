pub mod error;
pub mod config;
pub mod force;
pub mod phase;
pub mod integrator;
pub mod physics;
pub mod io;

pub use config::{EstimateConfig, LeapfrogConfig, RefineConfig, Splitting};
pub use error::IntegrateError;
pub use force::{Force, ParamForce, ParamForceFn};
pub use integrator::{
    estimate_step, integrate, integrate_auto, integrate_into, refine_step, IntegrationStats,
};
pub use phase::{PhaseState, Trajectory};
