//! Torus around the Y axis

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{Shape, ShapeKind, band_strips, ring};
use crate::attributes::Attributes;
use crate::construct::{MeshArrays, MeshConstruct, Topology};
use crate::error::{GeometryError, Result, check_lattice, check_positive, check_resolution};
use crate::request::GeometryRequest;

/// Torus with ring radius `radius` and tube radius `alpha * radius`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Torus {
    /// Distance from the center to the middle of the tube
    pub radius: f32,
    /// Tube radius as a fraction of `radius`, in (0, 1]
    pub alpha: f32,
    /// Divisions around the tube cross-section (min 3)
    pub radial_slices: u32,
    /// Divisions around the Y axis (min 3)
    pub concentric_slices: u32,
}

impl Default for Torus {
    fn default() -> Self {
        Self {
            radius: 1.0,
            alpha: 0.25,
            radial_slices: 12,
            concentric_slices: 24,
        }
    }
}

impl Torus {
    pub fn new(radius: f32, alpha: f32, radial_slices: u32, concentric_slices: u32) -> Self {
        Self {
            radius,
            alpha,
            radial_slices,
            concentric_slices,
        }
    }

    pub fn tube_radius(&self) -> f32 {
        self.alpha * self.radius
    }
}

impl Shape for Torus {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Torus
    }

    /// One strip per tube band; columns walk around Y, rows walk the tube
    /// cross-section starting at its top.
    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        check_positive("radius", self.radius)?;
        check_positive("alpha", self.alpha)?;
        if self.alpha > 1.0 {
            return Err(GeometryError::InvalidParameter {
                parameter: "alpha",
                reason: format!("tube would self-intersect, got {}", self.alpha),
            });
        }
        check_resolution("radial_slices", self.radial_slices, 3)?;
        check_resolution("concentric_slices", self.concentric_slices, 3)?;
        check_lattice(self.concentric_slices, self.radial_slices)?;

        let slices = self.concentric_slices;
        let stacks = self.radial_slices;
        let tube = self.tube_radius();

        let columns = ring(slices);
        let count = columns.len() * (stacks as usize + 1);
        let mut positions = Vec::with_capacity(count);
        let mut normals = Vec::with_capacity(count);
        let mut st = Vec::with_capacity(count);

        for j in 0..=stacks {
            let v = j as f32 / stacks as f32;
            let psi = FRAC_PI_2 - TAU * v;
            let (sin_psi, cos_psi) = psi.sin_cos();
            let reach = self.radius + tube * cos_psi;

            for (i, &(cos_beta, neg_sin_beta)) in columns.iter().enumerate() {
                positions.push(Vec3::new(reach * cos_beta, tube * sin_psi, reach * neg_sin_beta));
                // Cross-section normal rotated about Y by the concentric angle
                normals.push(Vec3::new(cos_psi * cos_beta, sin_psi, cos_psi * neg_sin_beta));
                st.push(Vec2::new(i as f32 / slices as f32, 1.0 - v));
            }
        }

        let attrs = Attributes::select(request, &positions, || normals, || st);
        let (indices, strip_lengths) = band_strips(slices, stacks);

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
