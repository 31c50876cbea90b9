//! Error type shared by every generator, converter, and the configuration layer.
//!
//! All failures are local and deterministic: the same inputs fail the same way
//! on every call, so callers treat them as programmer errors rather than
//! conditions to retry.

use crate::construct::Topology;
use crate::shapes::ShapeKind;

/// Geometry construction error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Parallel arrays or index/strip buffers violate the construct invariants
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A converter received a construct of the wrong source topology
    #[error("topology mismatch: expected {expected}, found {found}")]
    TopologyMismatch { expected: Topology, found: Topology },

    /// No conversion path exists between two topologies
    #[error("no conversion from {from} to {to}")]
    UnsupportedConversion { from: Topology, to: Topology },

    /// A slice/stack/segment count is below the shape minimum
    #[error("insufficient resolution: {parameter} = {value} (minimum {minimum})")]
    InsufficientResolution {
        parameter: &'static str,
        value: u32,
        minimum: u32,
    },

    /// A dimension or ratio is out of range
    #[error("invalid parameter {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    /// The shape will never be generated in this topology
    #[error("{topology} is not supported for {shape}")]
    UnsupportedTopology { shape: ShapeKind, topology: Topology },

    /// The shape could be generated in this topology but no path is wired yet
    #[error("{topology} is not implemented for {shape} yet")]
    NotImplemented { shape: ShapeKind, topology: Topology },

    /// The parameter combination cannot be expressed in the requested topology
    #[error("unsupported configuration for {shape}: {reason}")]
    UnsupportedConfiguration { shape: ShapeKind, reason: String },

    /// Geometry configuration could not be parsed
    #[error("invalid geometry config: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Fail with [`GeometryError::InsufficientResolution`] when `value < minimum`.
pub(crate) fn check_resolution(parameter: &'static str, value: u32, minimum: u32) -> Result<()> {
    if value < minimum {
        return Err(GeometryError::InsufficientResolution {
            parameter,
            value,
            minimum,
        });
    }
    Ok(())
}

/// Require a finite, strictly positive dimension.
pub(crate) fn check_positive(parameter: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GeometryError::InvalidParameter {
            parameter,
            reason: format!("must be finite and > 0.0, got {value}"),
        });
    }
    Ok(())
}

/// Require a finite dimension that may be zero.
pub(crate) fn check_non_negative(parameter: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GeometryError::InvalidParameter {
            parameter,
            reason: format!("must be finite and >= 0.0, got {value}"),
        });
    }
    Ok(())
}

/// Require a `(columns + 1) × (rows + 1)` vertex lattice that `u32`
/// indices can address.
pub(crate) fn check_lattice(columns: u32, rows: u32) -> Result<()> {
    let vertices = (u64::from(columns) + 1) * (u64::from(rows) + 1);
    if vertices > u64::from(u32::MAX) {
        return Err(GeometryError::InvalidParameter {
            parameter: "resolution",
            reason: format!(
                "{columns} x {rows} lattice needs {vertices} vertices, above the u32 index range"
            ),
        });
    }
    Ok(())
}
