//! Particle buffers for a swarm of instanced spheres.
//!
//! Bodies are generated once from a [`SimConfig`], kept in flat GPU-friendly
//! arrays by [`ParticleState`], and projected every frame into per-instance
//! transforms by [`InstanceBuffer`]. [`RenderLoop`] drives one frame at a time
//! against any [`InstanceSink`].

pub mod camera;
pub mod config;
pub mod error;
pub mod instance;
pub mod mesh;
pub mod particle;
pub mod physics;
pub mod render_loop;

pub use camera::OrbitCamera;
pub use config::SimConfig;
pub use error::ConfigError;
pub use instance::{DirtyStreams, InstanceBuffer};
pub use mesh::Icosphere;
pub use particle::{
    generate_particles, generate_particles_with, rigid_rotation_velocity, Body, MotionMut,
    ParticleState,
};
pub use physics::{Drift, Frozen, PhysicsStep};
pub use render_loop::{FrameStatus, InstanceSink, Presentation, RenderLoop};
