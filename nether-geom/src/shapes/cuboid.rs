//! Axis-aligned box from an explicit 36-vertex table

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{Shape, ShapeKind};
use crate::attributes::Attributes;
use crate::construct::{MeshArrays, MeshConstruct, Topology};
use crate::error::{Result, check_positive};
use crate::request::GeometryRequest;

/// Box with full extents `width × height × depth`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cuboid {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Translation applied after every attribute is computed
    pub offset: Vec3,
}

impl Default for Cuboid {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            offset: Vec3::ZERO,
        }
    }
}

impl Cuboid {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
            offset: Vec3::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }
}

/// Face normal and its four corners in unit-cube coordinates, counter-clockwise
/// seen from outside. Each quad becomes triangles `(a, b, c)` and `(a, c, d)`.
const FACES: [(Vec3, [Vec3; 4]); 6] = [
    // Top
    (
        Vec3::Y,
        [
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ],
    ),
    // Bottom
    (
        Vec3::NEG_Y,
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ],
    ),
    // Front
    (
        Vec3::Z,
        [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ],
    ),
    // Back
    (
        Vec3::NEG_Z,
        [
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
        ],
    ),
    // Right
    (
        Vec3::X,
        [
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ],
    ),
    // Left
    (
        Vec3::NEG_X,
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ],
    ),
];

const QUAD_ST: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

impl Shape for Cuboid {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Cuboid
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        check_positive("width", self.width)?;
        check_positive("height", self.height)?;
        check_positive("depth", self.depth)?;

        let half = Vec3::new(self.width, self.height, self.depth) * 0.5;
        let mut positions = Vec::with_capacity(36);
        let mut normals = Vec::with_capacity(36);
        let mut st = Vec::with_capacity(36);

        for (normal, corners) in &FACES {
            for &corner in &QUAD_TRIANGLES {
                positions.push(corners[corner] * half);
                normals.push(*normal);
                st.push(QUAD_ST[corner]);
            }
        }

        let attrs = Attributes::select(request, &positions, || normals, || st);
        MeshConstruct::new(
            Topology::TriangleList,
            MeshArrays {
                positions: positions.into_iter().map(|p| p + self.offset).collect(),
                normals: attrs.normals,
                tex_coords: attrs.tex_coords,
                colors: attrs.colors,
                ..Default::default()
            },
        )
    }
}
