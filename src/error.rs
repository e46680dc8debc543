//! Error types for configuration loading and validation.

use std::fmt;
use std::path::PathBuf;

/// Errors that prevent a particle state from being generated.
#[derive(Debug)]
pub enum ConfigError {
    /// A parameter was NaN or infinite.
    NonFinite(&'static str),
    /// The smallest radius must be strictly positive.
    NonPositiveRadius(f32),
    /// `min_radius` is larger than `max_radius`.
    InvalidRadiusRange { min: f32, max: f32 },
    /// The box edge must be strictly positive.
    NonPositiveBoxSize(f32),
    /// The box is too small to fit the largest sphere plus its margin.
    DegenerateBox { box_size: f32, max_radius: f32 },
    /// Failed to read a config file.
    Io { path: PathBuf, source: std::io::Error },
    /// Failed to parse a config file.
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(name) => write!(f, "`{name}` must be a finite number"),
            Self::NonPositiveRadius(r) => {
                write!(f, "`min_radius` must be positive, got {r}")
            }
            Self::InvalidRadiusRange { min, max } => write!(
                f,
                "`min_radius` ({min}) must not exceed `max_radius` ({max})"
            ),
            Self::NonPositiveBoxSize(size) => {
                write!(f, "`box_size` must be positive, got {size}")
            }
            Self::DegenerateBox {
                box_size,
                max_radius,
            } => write!(
                f,
                "`box_size` {box_size} leaves no room for spheres of radius {max_radius} \
                 (half the box must exceed 1.1 * max_radius)"
            ),
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
