//! Capsule along Y: two hemispherical caps joined by an open cylinder
//!
//! Parts are assembled as indexed strips in the order top cap, body, bottom
//! cap. Texture `t` is split into bands proportional to each part's length
//! along Y so one texture wraps the whole capsule without a seam.

use std::f32::consts::PI;

use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::{Cylinder, Hemisphere, Shape, ShapeKind};
use crate::assemble::combine_transformed;
use crate::attributes::remap;
use crate::construct::MeshConstruct;
use crate::error::{Result, check_lattice, check_positive, check_resolution};
use crate::request::GeometryRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capsule {
    pub radius: f32,
    /// Body length between the two cap centers
    pub height: f32,
    /// Radial divisions (min 3)
    pub slices: u32,
    /// Latitude divisions per cap (min 1)
    pub stacks: u32,
}

impl Default for Capsule {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 1.0,
            slices: 16,
            stacks: 4,
        }
    }
}

impl Capsule {
    pub fn new(radius: f32, height: f32, slices: u32, stacks: u32) -> Self {
        Self {
            radius,
            height,
            slices,
            stacks,
        }
    }

    /// Share of the total length taken by one cap
    pub fn cap_fraction(&self) -> f32 {
        self.radius / (2.0 * self.radius + self.height)
    }
}

impl Shape for Capsule {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Capsule
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        check_positive("radius", self.radius)?;
        check_positive("height", self.height)?;
        check_resolution("slices", self.slices, 3)?;
        check_resolution("stacks", self.stacks, 1)?;
        // Two caps of stacks + 1 rings plus the two body rings
        check_lattice(self.slices, self.stacks.saturating_mul(2).saturating_add(3))?;

        let half = self.height * 0.5;
        let cap = self.cap_fraction();
        let hemisphere = Hemisphere::new(self.radius, self.slices, self.stacks);

        let mut top = hemisphere.build(request)?;
        top.remap_tex_t(|t| remap(t, 1.0 - cap, 1.0));

        let mut body = Cylinder::new(self.radius, self.height, self.slices).body(request)?;
        body.remap_tex_t(|t| remap(t, cap, 1.0 - cap));

        // Flipped cap: its pole (t = 1) ends up at the very bottom and its
        // longitude runs the other way round, so s is mirrored to meet the body
        let mut bottom = hemisphere.build(request)?;
        bottom.remap_tex_t(|t| remap(t, cap, 0.0));
        bottom.remap_tex_s(|s| 1.0 - s);

        let mut construct = combine_transformed(vec![
            (top, Affine3A::from_translation(Vec3::new(0.0, half, 0.0))),
            (body, Affine3A::IDENTITY),
            (
                bottom,
                Affine3A::from_rotation_translation(
                    Quat::from_rotation_x(PI),
                    Vec3::new(0.0, -half, 0.0),
                ),
            ),
        ])?;
        if request.wants_colors() {
            construct.recolor_from_positions(request.color_alpha);
        }
        Ok(construct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::max_ring_gap;
    use crate::construct::{TexCoords, Topology};
    use crate::request::Features;

    #[test]
    fn test_capsule_counts() {
        let (slices, stacks) = (8u32, 3u32);
        let capsule = Capsule::new(0.5, 2.0, slices, stacks)
            .build(&GeometryRequest::textured())
            .unwrap();

        let ring = (slices + 1) as usize;
        let cap_vertices = ring * (stacks as usize + 1);
        assert_eq!(capsule.topology(), Topology::IndexedTriangleStrip);
        assert_eq!(capsule.vertex_count(), 2 * cap_vertices + 2 * ring);
        assert_eq!(capsule.strip_count(), 2 * stacks as usize + 1);
    }

    #[test]
    fn test_capsule_seam() {
        let (slices, stacks) = (12u32, 4u32);
        let capsule = Capsule::new(0.75, 1.5, slices, stacks)
            .build(&GeometryRequest::default())
            .unwrap();

        let ring = (slices + 1) as usize;
        let cap_vertices = ring * (stacks as usize + 1);
        let positions = capsule.positions();
        let cap_equator = &positions[cap_vertices - ring..cap_vertices];
        let body_top = &positions[cap_vertices..cap_vertices + ring];

        assert!(max_ring_gap(cap_equator, body_top) < 1e-5);
    }

    #[test]
    fn test_capsule_extent() {
        let capsule = Capsule::new(0.5, 1.0, 8, 2)
            .build(&GeometryRequest::default())
            .unwrap();

        let (lo, hi) = capsule
            .positions()
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        assert!((hi - 1.0).abs() < 1e-5);
        assert!((lo + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_capsule_tex_bands() {
        let (slices, stacks) = (4u32, 2u32);
        let capsule = Capsule::new(1.0, 2.0, slices, stacks)
            .build(&GeometryRequest::new(Features::TEXTURE_COORDINATES))
            .unwrap();

        let ring = (slices + 1) as usize;
        let cap_vertices = ring * (stacks as usize + 1);
        // cap fraction = 1 / 4
        match capsule.tex_coords() {
            TexCoords::Two(st) => {
                assert!((st[0].y - 1.0).abs() < 1e-6);
                assert!((st[cap_vertices - 1].y - 0.75).abs() < 1e-6);
                assert!((st[cap_vertices].y - 0.75).abs() < 1e-6);
                assert!((st[cap_vertices + ring].y - 0.25).abs() < 1e-6);
                // Bottom cap: pole row first at 0, equator last at 0.25
                assert!((st[cap_vertices + 2 * ring].y - 0.0).abs() < 1e-6);
                assert!((st.last().map(|c| c.y).unwrap_or(1.0) - 0.25).abs() < 1e-6);
                assert!(st.iter().all(|c| (0.0..=1.0).contains(&c.y)));
            }
            other => panic!("expected 2D coordinates, got {other:?}"),
        }
    }

    #[test]
    fn test_capsule_tex_coords_meet_at_both_seams() {
        let (slices, stacks) = (8u32, 2u32);
        let capsule = Capsule::new(0.5, 1.0, slices, stacks)
            .build(&GeometryRequest::new(Features::TEXTURE_COORDINATES))
            .unwrap();
        let st = match capsule.tex_coords() {
            TexCoords::Two(st) => st,
            other => panic!("expected 2D coordinates, got {other:?}"),
        };
        let p = capsule.positions();

        let ring = (slices + 1) as usize;
        let cap_vertices = ring * (stacks as usize + 1);
        let body = cap_vertices..cap_vertices + 2 * ring;

        // Every body vertex has a cap vertex at the same spot with the same (s, t)
        for i in body.clone() {
            let gap = (0..p.len())
                .filter(|j| !body.contains(j) && p[*j].distance(p[i]) < 1e-5)
                .map(|j| st[j].distance(st[i]))
                .fold(f32::INFINITY, f32::min);
            assert!(gap < 1e-5, "body vertex {i}: {:?} off by {gap}", st[i]);
        }
    }

    #[test]
    fn test_capsule_normals_unit() {
        let capsule = Capsule::default()
            .build(&GeometryRequest::new(Features::NORMALS))
            .unwrap();

        for n in capsule.normals() {
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_capsule_rejects_bad_parameters() {
        let request = GeometryRequest::default();
        assert!(Capsule::new(0.0, 1.0, 8, 2).build(&request).is_err());
        assert!(Capsule::new(0.5, 1.0, 2, 2).build(&request).is_err());
        assert!(Capsule::new(0.5, 1.0, 8, 0).build(&request).is_err());
    }
}
