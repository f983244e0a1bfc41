pub mod primitives;
pub mod leapfrog;
pub mod estimate;

pub use primitives::{leap_p, leap_q, save_qp};
pub use leapfrog::{integrate, integrate_auto, integrate_into, step, IntegrationStats};
pub use estimate::{estimate_step, refine_step};
