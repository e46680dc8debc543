use std::f32::consts::PI;

use glam::{Vec3, Vec4};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{config::SimConfig, error::ConfigError};

/// Angular coefficient of the initial swirl around the Y axis.
pub const SWIRL_COEFFICIENT: f32 = 0.01;

/// Physical state of one sphere.
///
/// Laid out as exactly eight `f32`s (`position.xyz, radius, velocity.xyz,
/// mass`) so a slice of bodies is the flat two-`vec4`-per-particle array a
/// storage buffer expects.
#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub radius: f32,
    pub velocity: Vec3,
    pub mass: f32,
}

/// Floats per body in [`ParticleState::as_flat`].
pub const BODY_STRIDE: usize = 8;
/// Floats per color in [`ParticleState::colors_flat`].
pub const COLOR_STRIDE: usize = 4;

impl Body {
    /// A body at rest whose mass follows from its radius.
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            radius,
            velocity: Vec3::ZERO,
            mass: sphere_mass(radius),
        }
    }
}

/// Mass of a unit-density sphere.
pub fn sphere_mass(radius: f32) -> f32 {
    4.0 / 3.0 * PI * radius.powi(3)
}

/// Initial velocity of a body at `position`: tangential to the Y axis with a
/// speed of `k * r^2`, where `r` is the distance from the axis.
pub fn rigid_rotation_velocity(position: Vec3) -> Vec3 {
    let r = (position.x * position.x + position.z * position.z).sqrt();
    Vec3::new(
        SWIRL_COEFFICIENT * r * position.z,
        0.0,
        -SWIRL_COEFFICIENT * r * position.x,
    )
}

/// The part of a [`Body`] a physics step may change.
pub struct MotionMut<'a> {
    pub position: &'a mut Vec3,
    pub velocity: &'a mut Vec3,
    pub radius: f32,
    pub mass: f32,
}

/// All bodies of the swarm plus their colors.
///
/// Colors are kept apart from the physical state since they never change and
/// never go through physics or the transform sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleState {
    bodies: Vec<Body>,
    colors: Vec<Vec4>,
}

impl ParticleState {
    /// Pairs bodies with their colors. Both must have the same length.
    pub fn from_parts(bodies: Vec<Body>, colors: Vec<Vec4>) -> Self {
        assert_eq!(
            bodies.len(),
            colors.len(),
            "every body needs exactly one color"
        );
        Self { bodies, colors }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access for a physics step, one [`MotionMut`] per body in index
    /// order. Radius and mass are handed out by value, they stay fixed for
    /// the life of the swarm.
    pub fn motions_mut(&mut self) -> impl Iterator<Item = MotionMut<'_>> {
        self.bodies.iter_mut().map(|body| MotionMut {
            position: &mut body.position,
            velocity: &mut body.velocity,
            radius: body.radius,
            mass: body.mass,
        })
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    /// The physical state as `BODY_STRIDE` floats per body.
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.bodies)
    }

    /// Colors as `COLOR_STRIDE` floats (RGBA) per body.
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Generates the initial swarm, seeded from `config.seed` when present.
pub fn generate_particles(config: &SimConfig) -> Result<ParticleState, ConfigError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    generate_particles_with(config, &mut rng)
}

/// Generates the initial swarm from the given random source.
///
/// Bodies are drawn in index order, so the same seed always yields the same
/// state.
pub fn generate_particles_with<R: Rng>(
    config: &SimConfig,
    rng: &mut R,
) -> Result<ParticleState, ConfigError> {
    config.validate()?;

    let count = config.particles as usize;
    let mut bodies = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);

    let radius_span = config.max_radius - config.min_radius;
    for _ in 0..count {
        let radius = (config.min_radius + radius_span * rng.gen::<f32>()).min(config.max_radius);
        let extent = config.position_extent(radius);

        let mut position = [0.0f32; 3];
        let mut color = [0.0f32, 0.0, 0.0, 1.0];
        for axis in 0..3 {
            position[axis] = (-1.0 + 2.0 * rng.gen::<f32>()) * extent;
            color[axis] = rng.gen::<f32>();
        }

        let mut body = Body::new(Vec3::from_array(position), radius);
        body.velocity = rigid_rotation_velocity(body.position);

        bodies.push(body);
        colors.push(Vec4::from_array(color));
    }

    if let Some(fastest) = bodies
        .iter()
        .map(|b| b.velocity.length())
        .reduce(f32::max)
    {
        debug!("Fastest initial body moves at {fastest:.3} units/s");
    }
    info!(
        "Generated {} bodies (radius {}..{}, box {})",
        count, config.min_radius, config.max_radius, config.box_size
    );

    Ok(ParticleState { bodies, colors })
}
