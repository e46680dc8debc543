use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sphere_swarm::{config::SimConfig, error::ConfigError, Drift, Frozen, PhysicsStep};

/// A swirling swarm of instanced spheres
#[derive(Parser)]
#[command()]
pub struct Args {
    /// TOML file with the swarm settings, flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Total spheres
    #[arg(short = 'n', long)]
    pub particles: Option<u32>,

    /// Smallest sphere radius
    #[arg(long)]
    pub min_radius: Option<f32>,

    /// Largest sphere radius
    #[arg(long)]
    pub max_radius: Option<f32>,

    /// Edge length of the cube the spheres spawn in
    #[arg(short, long)]
    pub box_size: Option<f32>,

    /// Seed for a reproducible swarm
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// How bodies move between frames
    #[arg(short, long, value_enum, default_value_t = PhysicsKind::Frozen)]
    pub physics: PhysicsKind,

    /// Multiplier on the frame time handed to the physics
    #[arg(short, long, default_value_t = 1.0f32)]
    pub time_scale: f32,

    /// The framerate the swarm will run at
    ///
    /// if 0 the swarm will run as fast as possible
    #[arg(short, long, default_value_t = 0)]
    pub framerate: u32,

    /// Icosphere subdivision level of the sphere mesh
    #[arg(long, default_value_t = 4)]
    pub subdivisions: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PhysicsKind {
    /// Bodies stay where they spawned
    Frozen,
    /// Bodies move along their initial velocity
    Drift,
}

impl PhysicsKind {
    pub fn build(self) -> Box<dyn PhysicsStep> {
        match self {
            PhysicsKind::Frozen => Box::new(Frozen),
            PhysicsKind::Drift => Box::new(Drift),
        }
    }
}

impl Args {
    /// The config file (or defaults) with every given flag applied on top.
    pub fn sim_config(&self) -> Result<SimConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };

        if let Some(particles) = self.particles {
            config.particles = particles;
        }
        if let Some(min_radius) = self.min_radius {
            config.min_radius = min_radius;
        }
        if let Some(max_radius) = self.max_radius {
            config.max_radius = max_radius;
        }
        if let Some(box_size) = self.box_size {
            config.box_size = box_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}
