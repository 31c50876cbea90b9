//! Cone along Y, apex up
//!
//! Emitted directly as a flat list: each slice owns its apex vertex so the
//! apex normal can follow the slice it belongs to.

use std::f32::consts::{PI, TAU};

use glam::{Affine3A, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{Disk, Shape, ShapeKind, ring};
use crate::assemble::combine_transformed;
use crate::attributes::Attributes;
use crate::construct::{MeshArrays, MeshConstruct, Topology};
use crate::error::{Result, check_positive, check_resolution};
use crate::request::GeometryRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cone {
    /// Base radius
    pub radius: f32,
    pub height: f32,
    /// Radial divisions (min 3)
    pub slices: u32,
    /// Add a disk under the base
    pub closed: bool,
}

impl Default for Cone {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 2.0,
            slices: 16,
            closed: true,
        }
    }
}

impl Cone {
    pub fn new(radius: f32, height: f32, slices: u32) -> Self {
        Self {
            radius,
            height,
            slices,
            closed: true,
        }
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    fn lateral(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        let slices = self.slices;
        let half = self.height * 0.5;
        let slant = (self.height * self.height + self.radius * self.radius).sqrt();
        let ny = self.radius / slant;
        let nr = self.height / slant;

        let slant_normal = |cos_theta: f32, neg_sin_theta: f32| {
            Vec3::new(nr * cos_theta, ny, nr * neg_sin_theta)
        };

        let rim = ring(slices);
        let count = 3 * slices as usize;
        let mut positions = Vec::with_capacity(count);
        let mut normals = Vec::with_capacity(count);
        let mut st = Vec::with_capacity(count);

        for (i, pair) in rim.windows(2).enumerate() {
            let (c0, s0) = pair[0];
            let (c1, s1) = pair[1];
            let mid = TAU * (i as f32 + 0.5) / slices as f32;

            positions.push(Vec3::new(0.0, half, 0.0));
            positions.push(Vec3::new(self.radius * c0, -half, self.radius * s0));
            positions.push(Vec3::new(self.radius * c1, -half, self.radius * s1));

            normals.push(slant_normal(mid.cos(), -mid.sin()));
            normals.push(slant_normal(c0, s0));
            normals.push(slant_normal(c1, s1));

            let s = i as f32 / slices as f32;
            let step = 1.0 / slices as f32;
            st.push(Vec2::new(s + 0.5 * step, 1.0));
            st.push(Vec2::new(s, 0.0));
            st.push(Vec2::new(s + step, 0.0));
        }

        let attrs = Attributes::select(request, &positions, || normals, || st);
        MeshConstruct::new(
            Topology::TriangleList,
            MeshArrays {
                positions,
                normals: attrs.normals,
                tex_coords: attrs.tex_coords,
                colors: attrs.colors,
                ..Default::default()
            },
        )
    }
}

impl Shape for Cone {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Cone
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        check_positive("radius", self.radius)?;
        check_positive("height", self.height)?;
        check_resolution("slices", self.slices, 3)?;

        let lateral = self.lateral(request)?;
        if !self.closed {
            return Ok(lateral);
        }

        let base = Disk::new(self.radius, self.slices).build(request)?;
        let flip_down = Affine3A::from_rotation_translation(
            Quat::from_rotation_x(PI),
            Vec3::new(0.0, -self.height * 0.5, 0.0),
        );

        let mut construct =
            combine_transformed(vec![(lateral, Affine3A::IDENTITY), (base, flip_down)])?;
        if request.wants_colors() {
            construct.recolor_from_positions(request.color_alpha);
        }
        Ok(construct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::request::Features;

    fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn test_open_cone_counts() {
        let cone = Cone::new(1.0, 2.0, 8)
            .closed(false)
            .build(&GeometryRequest::textured())
            .unwrap();

        assert_eq!(cone.topology(), Topology::TriangleList);
        assert_eq!(cone.vertex_count(), 24);
        assert_eq!(cone.normal_count(), 24);
        assert!(cone.positions().chunks(3).all(|tri| tri[0] == Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_closed_cone_adds_base() {
        let cone = Cone::new(1.0, 2.0, 8).build(&GeometryRequest::default()).unwrap();

        assert_eq!(cone.triangle_count(), 16);
        let base = &cone.positions()[24..];
        assert!(base.iter().all(|p| (p.y + 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_cone_faces_outward() {
        let cone = Cone::new(1.0, 1.5, 12).build(&GeometryRequest::default()).unwrap();
        let axis_center = Vec3::ZERO;

        for tri in cone.positions().chunks(3) {
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(face_normal(tri[0], tri[1], tri[2]).dot(centroid - axis_center) > 0.0);
        }
    }

    #[test]
    fn test_cone_slant_normals() {
        let cone = Cone::new(1.0, 1.0, 6)
            .closed(false)
            .build(&GeometryRequest::new(Features::NORMALS))
            .unwrap();

        let expected_y = 1.0 / 2.0_f32.sqrt();
        for n in cone.normals() {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((n.y - expected_y).abs() < 1e-5);
        }
        // Apex normal sits halfway between the two base normals of its slice
        let horizontal = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize();
        let tri = &cone.normals()[..3];
        assert!((horizontal(tri[0]) - horizontal(tri[1] + tri[2])).length() < 1e-5);
    }

    #[test]
    fn test_cone_only_as_list() {
        let request = GeometryRequest::default();
        assert!(matches!(
            Cone::default().generate(Topology::IndexedTriangleStrip, &request),
            Err(GeometryError::UnsupportedTopology { .. })
        ));
        assert!(Cone::new(1.0, 1.0, 2).build(&request).is_err());
    }
}
