//! The two morphing populations: needle particles and ornaments

pub mod field;
pub mod ornaments;

pub use field::{
    glow_fragment, morph_vertex, ParticleField, ParticleVertex, Sample, PARTICLE_SMOOTHING,
    PARTICLE_STRIDE,
};
pub use ornaments::{
    OrnamentField, OrnamentItem, OrnamentShape, COLOR_STRIDE, INSTANCE_STRIDE, ORNAMENT_SMOOTHING,
};
