//! Flat disk facing +Y
//!
//! A triangle fan unrolled into `(center, rim_i, rim_i+1)` triangles. Used on
//! its own and as the end caps of cylinders and cones.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{Shape, ShapeKind, ring};
use crate::attributes::Attributes;
use crate::construct::{MeshArrays, MeshConstruct, Topology};
use crate::error::{GeometryError, Result, check_positive, check_resolution};
use crate::request::GeometryRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Disk {
    pub radius: f32,
    /// Fan segments (min 3)
    pub slices: u32,
}

impl Default for Disk {
    fn default() -> Self {
        Self {
            radius: 1.0,
            slices: 16,
        }
    }
}

impl Disk {
    pub fn new(radius: f32, slices: u32) -> Self {
        Self { radius, slices }
    }

    fn validate(&self) -> Result<()> {
        check_positive("radius", self.radius)?;
        check_resolution("slices", self.slices, 3)
    }

    /// Center followed by `slices` rim vertices
    fn fan(&self) -> (Vec<Vec3>, Vec<Vec2>) {
        let rim = ring(self.slices);
        let mut positions = Vec::with_capacity(rim.len());
        let mut st = Vec::with_capacity(rim.len());

        positions.push(Vec3::ZERO);
        st.push(Vec2::splat(0.5));
        for &(cos_theta, neg_sin_theta) in &rim[..self.slices as usize] {
            positions.push(Vec3::new(
                self.radius * cos_theta,
                0.0,
                self.radius * neg_sin_theta,
            ));
            st.push(Vec2::new(0.5 + 0.5 * cos_theta, 0.5 - 0.5 * neg_sin_theta));
        }

        (positions, st)
    }

    /// Fan triangles as indices into [`Disk::fan`]
    fn fan_indices(&self) -> Vec<u32> {
        let slices = self.slices;
        (0..slices)
            .flat_map(|i| [0, 1 + i, 1 + (i + 1) % slices])
            .collect()
    }

    fn assemble(
        &self,
        topology: Topology,
        request: &GeometryRequest,
        indexed: bool,
    ) -> Result<MeshConstruct> {
        let (fan_positions, fan_st) = self.fan();
        let fan_indices = self.fan_indices();

        let (positions, st, indices) = if indexed {
            (fan_positions, fan_st, fan_indices)
        } else {
            (
                fan_indices.iter().map(|&i| fan_positions[i as usize]).collect(),
                fan_indices.iter().map(|&i| fan_st[i as usize]).collect(),
                Vec::new(),
            )
        };

        let count = positions.len();
        let attrs = Attributes::select(request, &positions, || vec![Vec3::Y; count], || st);
        let strip_lengths = if topology.is_strip() {
            vec![3; self.slices as usize]
        } else {
            Vec::new()
        };

        MeshConstruct::new(
            topology,
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

impl Shape for Disk {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Disk
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        self.build_as(Topology::TriangleList, request)
    }

    /// Every topology but the indexed strip is emitted directly
    fn build_as(&self, topology: Topology, request: &GeometryRequest) -> Result<MeshConstruct> {
        self.validate()?;

        match topology {
            Topology::TriangleList | Topology::TriangleStrip => {
                self.assemble(topology, request, false)
            }
            Topology::IndexedTriangleList => self.assemble(topology, request, true),
            Topology::IndexedTriangleStrip => Err(GeometryError::UnsupportedTopology {
                shape: ShapeKind::Disk,
                topology,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::TexCoords;
    use crate::request::Features;

    fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn test_disk_list() {
        let disk = Disk::new(1.0, 8).build(&GeometryRequest::textured()).unwrap();

        assert_eq!(disk.topology(), Topology::TriangleList);
        assert_eq!(disk.vertex_count(), 24);
        assert_eq!(disk.triangle_count(), 8);
        for tri in disk.positions().chunks(3) {
            assert_eq!(tri[0], Vec3::ZERO);
            assert!(face_normal(tri[0], tri[1], tri[2]).dot(Vec3::Y) > 0.999);
        }
        assert!(disk.normals().iter().all(|n| *n == Vec3::Y));
    }

    #[test]
    fn test_disk_indexed_list_shares_rim() {
        let disk = Disk::new(2.0, 6)
            .generate(Topology::IndexedTriangleList, &GeometryRequest::default())
            .unwrap();

        assert_eq!(disk.vertex_count(), 7);
        assert_eq!(disk.index_count(), 18);
        // Last triangle wraps back to the first rim vertex
        assert_eq!(&disk.indices()[15..], &[0, 6, 1]);
    }

    #[test]
    fn test_disk_strips_are_single_triangles() {
        let disk = Disk::new(1.0, 5)
            .generate(Topology::TriangleStrip, &GeometryRequest::default())
            .unwrap();

        assert_eq!(disk.strip_lengths(), &[3, 3, 3, 3, 3]);
        assert_eq!(disk.vertex_count(), 15);
    }

    #[test]
    fn test_disk_indexed_strip_unsupported() {
        assert!(matches!(
            Disk::default().generate(Topology::IndexedTriangleStrip, &GeometryRequest::default()),
            Err(GeometryError::UnsupportedTopology { .. })
        ));
    }

    #[test]
    fn test_disk_tex_coords_centered() {
        let disk = Disk::new(3.0, 4)
            .generate(
                Topology::IndexedTriangleList,
                &GeometryRequest::new(Features::TEXTURE_COORDINATES),
            )
            .unwrap();

        match disk.tex_coords() {
            TexCoords::Two(st) => {
                assert_eq!(st[0], Vec2::splat(0.5));
                assert_eq!(st[1], Vec2::new(1.0, 0.5));
                for c in st {
                    assert!((0.0..=1.0).contains(&c.x) && (0.0..=1.0).contains(&c.y));
                }
            }
            other => panic!("expected 2D coordinates, got {other:?}"),
        }
    }
}
