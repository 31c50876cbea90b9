//! Preferred-topology configuration
//!
//! One topology per shape kind, passed explicitly to
//! [`Shape::create_geometry`](crate::Shape::create_geometry). Every setter
//! path validates against the shape's support matrix, so a config never holds
//! a topology its shape cannot produce.
//!
//! TOML form:
//!
//! ```toml
//! [preferred-topology]
//! sphere = "triangle-list"
//! grid = "indexed-triangle-list"
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::construct::Topology;
use crate::error::{GeometryError, Result};
use crate::shapes::ShapeKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryConfig {
    preferred: [Topology; ShapeKind::ALL.len()],
}

impl Default for GeometryConfig {
    /// Every shape prefers its native topology
    fn default() -> Self {
        Self {
            preferred: ShapeKind::ALL.map(ShapeKind::native_topology),
        }
    }
}

/// On-disk layout of the config table
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeometryConfigFile {
    #[serde(default)]
    pub preferred_topology: BTreeMap<ShapeKind, Topology>,
}

impl GeometryConfig {
    pub fn preferred(&self, kind: ShapeKind) -> Topology {
        self.preferred[kind as usize]
    }

    /// Select the topology `create_geometry` uses for `kind`.
    ///
    /// Fails with [`GeometryError::UnsupportedTopology`] or
    /// [`GeometryError::NotImplemented`] without changing the config.
    pub fn set_preferred(&mut self, kind: ShapeKind, topology: Topology) -> Result<()> {
        kind.check_topology(topology)?;
        self.preferred[kind as usize] = topology;
        Ok(())
    }

    /// Builder form of [`GeometryConfig::set_preferred`]
    pub fn with_preferred(mut self, kind: ShapeKind, topology: Topology) -> Result<Self> {
        self.set_preferred(kind, topology)?;
        Ok(self)
    }

    /// Apply every entry of a parsed config table on top of the defaults
    pub fn from_file(file: &GeometryConfigFile) -> Result<Self> {
        let mut config = Self::default();
        for (&kind, &topology) in &file.preferred_topology {
            config.set_preferred(kind, topology)?;
            debug!("preferred topology for {kind}: {topology}");
        }
        Ok(config)
    }

    /// Parse a TOML document with an optional `[preferred-topology]` table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: GeometryConfigFile =
            toml::from_str(content).map_err(|e| GeometryError::InvalidConfig(e.to_string()))?;
        Self::from_file(&file)
    }

    /// Every `(kind, topology)` pair, in [`ShapeKind::ALL`] order
    pub fn entries(&self) -> impl Iterator<Item = (ShapeKind, Topology)> + '_ {
        ShapeKind::ALL.into_iter().map(|kind| (kind, self.preferred(kind)))
    }
}
