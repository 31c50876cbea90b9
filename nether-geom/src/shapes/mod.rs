//! Parametric primitive generators
//!
//! Each shape is a plain parameter struct implementing [`Shape`]. A shape
//! builds itself in one native topology; every other supported topology is
//! reached through the converters, except where a shape can emit it directly.
//!
//! Conventions shared by every generator:
//! - +Y is up. Curved bodies run along Y; flat shapes lie in XY facing +Z
//!   unless stated otherwise.
//! - Angular sampling uses `x = cos θ, z = -sin θ`.
//! - Parametric rows are emitted top to bottom, so each strip starts on its
//!   upper ring and its first triangle faces outward.
//! - Normals, texture coordinates and colors are derived from local
//!   positions, before any offset is applied.

mod capsule;
mod cone;
mod cuboid;
mod cylinder;
mod disk;
mod geosphere;
mod grid;
mod rectangle;
mod sphere;
mod torus;

pub use capsule::Capsule;
pub use cone::Cone;
pub use cuboid::Cuboid;
pub use cylinder::Cylinder;
pub use disk::Disk;
pub use geosphere::GeoSphere;
pub use grid::Grid;
pub use rectangle::Rectangle;
pub use sphere::{Hemisphere, Sphere};
pub use torus::Torus;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeometryConfig;
use crate::construct::{MeshConstruct, Topology};
use crate::convert::convert;
use crate::error::{GeometryError, Result};
use crate::request::GeometryRequest;

// ============================================================================
// Shape kinds and topology support
// ============================================================================

/// Every primitive the library can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Cuboid,
    Sphere,
    Hemisphere,
    Cylinder,
    Disk,
    Cone,
    Torus,
    Capsule,
    #[serde(rename = "geosphere")]
    GeoSphere,
    Grid,
    Rectangle,
}

/// How a shape reaches a topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologySupport {
    /// Emitted directly by the generator
    Native,
    /// Generated natively, then converted
    Converted,
    /// Meaningful for the shape but not wired up yet
    Planned,
    /// Never available for the shape
    Unsupported,
}

impl TopologySupport {
    /// True for topologies a caller can actually get
    pub fn is_available(self) -> bool {
        matches!(self, Self::Native | Self::Converted)
    }

    /// Single-letter code used by the support matrix printout
    pub fn code(self) -> char {
        match self {
            Self::Native => 'N',
            Self::Converted => 'C',
            Self::Planned => 'P',
            Self::Unsupported => 'U',
        }
    }
}

impl ShapeKind {
    /// All kinds in declaration order
    pub const ALL: [ShapeKind; 11] = [
        ShapeKind::Cuboid,
        ShapeKind::Sphere,
        ShapeKind::Hemisphere,
        ShapeKind::Cylinder,
        ShapeKind::Disk,
        ShapeKind::Cone,
        ShapeKind::Torus,
        ShapeKind::Capsule,
        ShapeKind::GeoSphere,
        ShapeKind::Grid,
        ShapeKind::Rectangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Cuboid => "cuboid",
            Self::Sphere => "sphere",
            Self::Hemisphere => "hemisphere",
            Self::Cylinder => "cylinder",
            Self::Disk => "disk",
            Self::Cone => "cone",
            Self::Torus => "torus",
            Self::Capsule => "capsule",
            Self::GeoSphere => "geosphere",
            Self::Grid => "grid",
            Self::Rectangle => "rectangle",
        }
    }

    /// The topology the generator samples into
    pub fn native_topology(self) -> Topology {
        match self {
            Self::Cuboid | Self::Disk | Self::Cone | Self::GeoSphere => Topology::TriangleList,
            Self::Rectangle => Topology::TriangleStrip,
            Self::Sphere
            | Self::Hemisphere
            | Self::Cylinder
            | Self::Torus
            | Self::Capsule
            | Self::Grid => Topology::IndexedTriangleStrip,
        }
    }

    /// How this shape reaches `topology`
    pub fn support(self, topology: Topology) -> TopologySupport {
        use Topology::*;
        use TopologySupport::*;

        match self {
            Self::Cuboid | Self::Cone => match topology {
                TriangleList => Native,
                _ => Unsupported,
            },
            Self::Disk => match topology {
                IndexedTriangleStrip => Unsupported,
                _ => Native,
            },
            Self::GeoSphere => match topology {
                TriangleList => Native,
                IndexedTriangleList | IndexedTriangleStrip => Planned,
                TriangleStrip => Unsupported,
            },
            Self::Rectangle => match topology {
                TriangleStrip => Native,
                TriangleList => Converted,
                _ => Unsupported,
            },
            Self::Sphere
            | Self::Hemisphere
            | Self::Cylinder
            | Self::Torus
            | Self::Capsule
            | Self::Grid => match topology {
                IndexedTriangleStrip => Native,
                _ => Converted,
            },
        }
    }

    /// Fail unless `topology` is available for this shape
    pub fn check_topology(self, topology: Topology) -> Result<()> {
        match self.support(topology) {
            TopologySupport::Native | TopologySupport::Converted => Ok(()),
            TopologySupport::Planned => Err(GeometryError::NotImplemented {
                shape: self,
                topology,
            }),
            TopologySupport::Unsupported => Err(GeometryError::UnsupportedTopology {
                shape: self,
                topology,
            }),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Shape trait
// ============================================================================

/// A parametric primitive
pub trait Shape {
    fn kind(&self) -> ShapeKind;

    /// Sample the shape in its native topology
    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct>;

    /// Produce the shape in an available topology.
    ///
    /// The default builds natively and converts. Shapes that can emit more
    /// than one topology directly override this.
    fn build_as(&self, topology: Topology, request: &GeometryRequest) -> Result<MeshConstruct> {
        let native = self.build(request)?;
        convert(&native, topology)
    }

    /// Topology-specific entry point
    fn generate(&self, topology: Topology, request: &GeometryRequest) -> Result<MeshConstruct> {
        let kind = self.kind();
        kind.check_topology(topology)?;

        let construct = self.build_as(topology, request)?;
        debug!(
            "generated {kind} as {topology}: {} vertices, {} indices, {} strips",
            construct.vertex_count(),
            construct.index_count(),
            construct.strip_count()
        );
        Ok(construct)
    }

    /// Generate in whichever topology `config` prefers for this shape
    fn create_geometry(
        &self,
        config: &GeometryConfig,
        request: &GeometryRequest,
    ) -> Result<MeshConstruct> {
        self.generate(config.preferred(self.kind()), request)
    }
}

/// Any shape, tagged by kind.
///
/// This is the serialized form used by manifests:
/// `kind = "sphere"` followed by the shape's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ShapeParams {
    Cuboid(Cuboid),
    Sphere(Sphere),
    Hemisphere(Hemisphere),
    Cylinder(Cylinder),
    Disk(Disk),
    Cone(Cone),
    Torus(Torus),
    Capsule(Capsule),
    #[serde(rename = "geosphere")]
    GeoSphere(GeoSphere),
    Grid(Grid),
    Rectangle(Rectangle),
}

impl ShapeParams {
    fn as_shape(&self) -> &dyn Shape {
        match self {
            Self::Cuboid(s) => s,
            Self::Sphere(s) => s,
            Self::Hemisphere(s) => s,
            Self::Cylinder(s) => s,
            Self::Disk(s) => s,
            Self::Cone(s) => s,
            Self::Torus(s) => s,
            Self::Capsule(s) => s,
            Self::GeoSphere(s) => s,
            Self::Grid(s) => s,
            Self::Rectangle(s) => s,
        }
    }
}

impl Shape for ShapeParams {
    fn kind(&self) -> ShapeKind {
        self.as_shape().kind()
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        self.as_shape().build(request)
    }

    fn build_as(&self, topology: Topology, request: &GeometryRequest) -> Result<MeshConstruct> {
        self.as_shape().build_as(topology, request)
    }
}

// ============================================================================
// Shared sampling helpers
// ============================================================================

/// Indexed strips over a row-major lattice of `bands + 1` rows with
/// `columns + 1` vertices each.
///
/// One strip per band, pairing each upper vertex `k` with `k + columns + 1`
/// below it. Returns `(indices, strip_lengths)`. The lattice size must
/// already have passed `check_lattice`.
pub(crate) fn band_strips(columns: u32, bands: u32) -> (Vec<u32>, Vec<u32>) {
    let row = columns + 1;
    let mut indices = Vec::with_capacity(2 * row as usize * bands as usize);
    let mut strip_lengths = Vec::with_capacity(bands as usize);

    for band in 0..bands {
        for i in 0..row {
            let k = band * row + i;
            indices.push(k);
            indices.push(k + row);
        }
        strip_lengths.push(2 * row);
    }

    (indices, strip_lengths)
}

/// `(cos θ, -sin θ)` for `θ = 2π i / slices`, `i = 0..=slices`
pub(crate) fn ring(slices: u32) -> Vec<(f32, f32)> {
    (0..=slices)
        .map(|i| {
            let theta = std::f32::consts::TAU * i as f32 / slices as f32;
            (theta.cos(), -theta.sin())
        })
        .collect()
}
