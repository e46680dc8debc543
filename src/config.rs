//! Simulation configuration.
//!
//! A [`SimConfig`] can be built from defaults, from CLI flags, or from a TOML
//! file. Every field is optional in the file, but unknown keys are an error:
//!
//! ```toml
//! particles = 2000
//! min_radius = 0.3
//! max_radius = 1.8
//! box_size = 80.0
//! seed = 42
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Clearance kept between a sphere's center and the box faces, in radii.
pub const CONTAINMENT_MARGIN: f32 = 1.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Number of spheres
    pub particles: u32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Edge length of the containment cube centered at the origin
    pub box_size: f32,
    /// Fixed RNG seed, random when unset
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particles: 1000,
            min_radius: 0.3,
            max_radius: 1.8,
            box_size: 80.0,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Load a config from a TOML file. Missing fields use defaults, misspelled
    /// ones fail to parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Checks every precondition of particle generation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("min_radius", self.min_radius),
            ("max_radius", self.max_radius),
            ("box_size", self.box_size),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }

        if self.min_radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius(self.min_radius));
        }
        if self.min_radius > self.max_radius {
            return Err(ConfigError::InvalidRadiusRange {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if self.box_size <= 0.0 {
            return Err(ConfigError::NonPositiveBoxSize(self.box_size));
        }
        if self.half_box() <= CONTAINMENT_MARGIN * self.max_radius {
            return Err(ConfigError::DegenerateBox {
                box_size: self.box_size,
                max_radius: self.max_radius,
            });
        }

        Ok(())
    }

    pub fn half_box(&self) -> f32 {
        self.box_size / 2.0
    }

    /// Largest allowed |coordinate| for the center of a sphere of `radius`.
    pub fn position_extent(&self, radius: f32) -> f32 {
        self.half_box() - CONTAINMENT_MARGIN * radius
    }
}
