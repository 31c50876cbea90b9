//! Single quad in XY facing +Z, as one four-vertex strip

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{Shape, ShapeKind};
use crate::attributes::Attributes;
use crate::construct::{MeshArrays, MeshConstruct, Topology};
use crate::error::{Result, check_positive};
use crate::request::GeometryRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rectangle {
    pub width: f32,
    pub height: f32,
    pub offset: Vec3,
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            offset: Vec3::ZERO,
        }
    }
}

impl Rectangle {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: Vec3::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }
}

impl Shape for Rectangle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        check_positive("width", self.width)?;
        check_positive("height", self.height)?;

        let x = self.width * 0.5;
        let y = self.height * 0.5;
        // Top-left, bottom-left, top-right, bottom-right
        let positions = vec![
            Vec3::new(-x, y, 0.0),
            Vec3::new(-x, -y, 0.0),
            Vec3::new(x, y, 0.0),
            Vec3::new(x, -y, 0.0),
        ];
        let st = vec![
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];

        let attrs = Attributes::select(request, &positions, || vec![Vec3::Z; 4], || st);
        MeshConstruct::new(
            Topology::TriangleStrip,
            MeshArrays {
                positions: positions.into_iter().map(|p| p + self.offset).collect(),
                normals: attrs.normals,
                tex_coords: attrs.tex_coords,
                colors: attrs.colors,
                indices: Vec::new(),
                strip_lengths: vec![4],
            },
        )
    }
}
