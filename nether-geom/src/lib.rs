//! Nethercore parametric geometry
//!
//! Primitive generators (boxes, spheres, cylinders, cones, tori, capsules,
//! geodesic spheres, grids, disks, rectangles), the neutral [`MeshConstruct`]
//! they produce, and the converters that move a construct between triangle
//! list, indexed list, strip, and indexed strip layouts.
//!
//! ```
//! use nether_geom::{GeometryRequest, Shape, Sphere, Topology};
//!
//! let sphere = Sphere::new(1.0, 16, 8)
//!     .generate(Topology::TriangleList, &GeometryRequest::textured())
//!     .unwrap();
//! assert_eq!(sphere.triangle_count(), 16 * 8 * 2);
//! ```

pub mod assemble;
pub mod attributes;
pub mod config;
pub mod construct;
pub mod convert;
pub mod error;
pub mod request;
pub mod shapes;
pub mod sink;

pub use config::GeometryConfig;
pub use construct::{Colors, MeshArrays, MeshConstruct, TexCoords, Topology};
pub use convert::{convert, drawn_triangles};
pub use error::{GeometryError, Result};
pub use request::{AppearanceHints, Features, GeometryRequest, TexCoordSize};
pub use shapes::{
    Capsule, Cone, Cuboid, Cylinder, Disk, GeoSphere, Grid, Hemisphere, Rectangle, Shape,
    ShapeKind, ShapeParams, Sphere, TopologySupport, Torus,
};
pub use sink::{GeometrySink, MeshSummary, SummarySink};
