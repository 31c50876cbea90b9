//! Consumer boundary
//!
//! Generated constructs are handed to a [`GeometrySink`] together with the
//! request that produced them. Buffer layout, upload and anything else the
//! consumer does with the arrays is its own business.

use std::fmt;

use crate::construct::{MeshConstruct, Topology};
use crate::error::GeometryError;
use crate::request::{Features, GeometryRequest};

/// Receives finished constructs
pub trait GeometrySink {
    type Error: From<GeometryError>;

    fn accept(
        &mut self,
        name: &str,
        construct: MeshConstruct,
        request: &GeometryRequest,
    ) -> Result<(), Self::Error>;
}

/// Counts describing one construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshSummary {
    pub topology: Topology,
    pub features: Features,
    pub vertices: usize,
    pub indices: usize,
    pub strips: usize,
    pub triangles: usize,
}

impl MeshSummary {
    pub fn of(construct: &MeshConstruct) -> Self {
        Self {
            topology: construct.topology(),
            features: construct.calculate_feature_bits(),
            vertices: construct.vertex_count(),
            indices: construct.index_count(),
            strips: construct.strip_count(),
            triangles: construct.triangle_count(),
        }
    }
}

impl fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} vertices, {} indices, {} strips, {} triangles",
            self.topology, self.vertices, self.indices, self.strips, self.triangles
        )
    }
}

/// Sink that keeps only a summary of every construct it receives
#[derive(Debug, Default)]
pub struct SummarySink {
    pub entries: Vec<(String, MeshSummary)>,
}

impl GeometrySink for SummarySink {
    type Error = GeometryError;

    fn accept(
        &mut self,
        name: &str,
        construct: MeshConstruct,
        _request: &GeometryRequest,
    ) -> Result<(), Self::Error> {
        self.entries.push((name.to_string(), MeshSummary::of(&construct)));
        Ok(())
    }
}
