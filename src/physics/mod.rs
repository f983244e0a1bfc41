pub mod potentials;

pub use potentials::{
    harmonic_with_args, planar_angular_momentum, FreeParticle, Harmonic, Kepler, Potential,
    UniformField,
};
