//! Planar lattice in XY, facing +Z
//!
//! One indexed strip per row band. Odd bands run right to left with their
//! pairs flipped, so each band starts where the previous one ended and every
//! band keeps the same facing.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{Shape, ShapeKind};
use crate::attributes::Attributes;
use crate::construct::{MeshArrays, MeshConstruct, Topology};
use crate::error::{Result, check_lattice, check_positive, check_resolution};
use crate::request::GeometryRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grid {
    pub width: f32,
    pub height: f32,
    /// Cells along X (min 1)
    pub res_x: u32,
    /// Cells along Y (min 1)
    pub res_y: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            res_x: 8,
            res_y: 8,
        }
    }
}

impl Grid {
    pub fn new(width: f32, height: f32, res_x: u32, res_y: u32) -> Self {
        Self {
            width,
            height,
            res_x,
            res_y,
        }
    }
}

/// Boustrophedon strips over a `(res_x + 1) × (res_y + 1)` row-major lattice
fn serpentine_strips(res_x: u32, res_y: u32) -> (Vec<u32>, Vec<u32>) {
    let row = res_x + 1;
    let mut indices = Vec::with_capacity(2 * row as usize * res_y as usize);
    let mut strip_lengths = Vec::with_capacity(res_y as usize);

    for band in 0..res_y {
        let top = band * row;
        let bottom = top + row;
        if band % 2 == 0 {
            for i in 0..row {
                indices.extend_from_slice(&[top + i, bottom + i]);
            }
        } else {
            for i in (0..row).rev() {
                indices.extend_from_slice(&[bottom + i, top + i]);
            }
        }
        strip_lengths.push(2 * row);
    }

    (indices, strip_lengths)
}

impl Shape for Grid {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Grid
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        check_positive("width", self.width)?;
        check_positive("height", self.height)?;
        check_resolution("res_x", self.res_x, 1)?;
        check_resolution("res_y", self.res_y, 1)?;
        check_lattice(self.res_x, self.res_y)?;

        let count = (self.res_x as usize + 1) * (self.res_y as usize + 1);
        let mut positions = Vec::with_capacity(count);
        let mut st = Vec::with_capacity(count);

        for j in 0..=self.res_y {
            let v = j as f32 / self.res_y as f32;
            for i in 0..=self.res_x {
                let u = i as f32 / self.res_x as f32;
                positions.push(Vec3::new(
                    (u - 0.5) * self.width,
                    (0.5 - v) * self.height,
                    0.0,
                ));
                st.push(Vec2::new(u, 1.0 - v));
            }
        }

        let attrs = Attributes::select(request, &positions, || vec![Vec3::Z; count], || st);
        let (indices, strip_lengths) = serpentine_strips(self.res_x, self.res_y);

        MeshConstruct::new(
            Topology::IndexedTriangleStrip,
            MeshArrays {
                positions,
                normals: attrs.normals,
                tex_coords: attrs.tex_coords,
                colors: attrs.colors,
                indices,
                strip_lengths,
            },
        )
    }
}
