//! Tapered cylinder along Y, optionally capped

use std::f32::consts::PI;

use glam::{Affine3A, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{Disk, Shape, ShapeKind, band_strips, ring};
use crate::assemble::combine_transformed;
use crate::attributes::Attributes;
use crate::construct::{MeshArrays, MeshConstruct, Topology};
use crate::convert::convert;
use crate::error::{
    GeometryError, Result, check_lattice, check_non_negative, check_positive, check_resolution,
};
use crate::request::GeometryRequest;

/// Cylinder centered on the origin.
///
/// The bottom ring has `radius`, the top ring `radius * taper`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cylinder {
    pub radius: f32,
    pub height: f32,
    /// Top radius over bottom radius (>= 0)
    pub taper: f32,
    /// Radial divisions (min 3)
    pub slices: u32,
    /// Add disk caps at both ends
    pub closed: bool,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 2.0,
            taper: 1.0,
            slices: 16,
            closed: false,
        }
    }
}

impl Cylinder {
    pub fn new(radius: f32, height: f32, slices: u32) -> Self {
        Self {
            radius,
            height,
            slices,
            ..Default::default()
        }
    }

    pub fn with_taper(mut self, taper: f32) -> Self {
        self.taper = taper;
        self
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn top_radius(&self) -> f32 {
        self.radius * self.taper
    }

    fn validate(&self) -> Result<()> {
        check_positive("radius", self.radius)?;
        check_positive("height", self.height)?;
        check_non_negative("taper", self.taper)?;
        check_resolution("slices", self.slices, 3)?;
        check_lattice(self.slices, 1)
    }

    /// Open body: top ring then bottom ring, one indexed strip
    pub(crate) fn body(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        let slices = self.slices;
        let half = self.height * 0.5;
        let radius_bottom = self.radius;
        let radius_top = self.top_radius();

        // Slant normal, perpendicular to the tapered side
        let radius_diff = radius_bottom - radius_top;
        let slant = (self.height * self.height + radius_diff * radius_diff).sqrt();
        let ny = radius_diff / slant;
        let nr = self.height / slant;

        let columns = ring(slices);
        let mut positions = Vec::with_capacity(2 * columns.len());
        let mut normals = Vec::with_capacity(2 * columns.len());
        let mut st = Vec::with_capacity(2 * columns.len());

        for (y, r, t) in [(half, radius_top, 1.0), (-half, radius_bottom, 0.0)] {
            for (i, &(cos_theta, neg_sin_theta)) in columns.iter().enumerate() {
                positions.push(Vec3::new(r * cos_theta, y, r * neg_sin_theta));
                normals.push(Vec3::new(nr * cos_theta, ny, nr * neg_sin_theta));
                st.push(Vec2::new(i as f32 / slices as f32, t));
            }
        }

        let attrs = Attributes::select(request, &positions, || normals, || st);
        let (indices, strip_lengths) = band_strips(slices, 1);

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

    /// End caps in `topology`, each with the placement that moves it onto its end
    fn caps(
        &self,
        topology: Topology,
        request: &GeometryRequest,
    ) -> Result<Vec<(MeshConstruct, Affine3A)>> {
        let half = self.height * 0.5;
        let mut caps = Vec::with_capacity(2);

        // A fully tapered top has nothing to cap
        if self.top_radius() > 0.0 {
            let top = Disk::new(self.top_radius(), self.slices).build_as(topology, request)?;
            caps.push((top, Affine3A::from_translation(Vec3::new(0.0, half, 0.0))));
        }

        let bottom = Disk::new(self.radius, self.slices).build_as(topology, request)?;
        caps.push((
            bottom,
            Affine3A::from_rotation_translation(
                Quat::from_rotation_x(PI),
                Vec3::new(0.0, -half, 0.0),
            ),
        ));

        Ok(caps)
    }
}

impl Shape for Cylinder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Cylinder
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        self.validate()?;
        if self.closed {
            return Err(GeometryError::UnsupportedConfiguration {
                shape: ShapeKind::Cylinder,
                reason: "closed cylinders cannot be expressed as an indexed triangle strip".into(),
            });
        }
        self.body(request)
    }

    /// Open bodies convert; closed ones combine the converted body with caps
    fn build_as(&self, topology: Topology, request: &GeometryRequest) -> Result<MeshConstruct> {
        if topology == Topology::IndexedTriangleStrip || !self.closed {
            let native = self.build(request)?;
            return convert(&native, topology);
        }

        self.validate()?;
        let mut parts = vec![(convert(&self.body(request)?, topology)?, Affine3A::IDENTITY)];
        parts.extend(self.caps(topology, request)?);

        let mut construct = combine_transformed(parts)?;
        if request.wants_colors() {
            construct.recolor_from_positions(request.color_alpha);
        }
        Ok(construct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Features;

    fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn test_open_cylinder_counts() {
        let cyl = Cylinder::new(1.0, 2.0, 8)
            .build(&GeometryRequest::textured())
            .unwrap();

        assert_eq!(cyl.vertex_count(), 18);
        assert_eq!(cyl.strip_lengths(), &[18]);
        assert_eq!(cyl.triangle_count(), 16);
        // Top ring first
        assert!(cyl.positions()[..9].iter().all(|p| p.y == 1.0));
        assert!(cyl.positions()[9..].iter().all(|p| p.y == -1.0));
    }

    #[test]
    fn test_straight_body_normals_horizontal() {
        let cyl = Cylinder::new(2.0, 3.0, 12)
            .build(&GeometryRequest::new(Features::NORMALS))
            .unwrap();

        for (p, n) in cyl.positions().iter().zip(cyl.normals()) {
            assert!(n.y.abs() < 1e-6);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((Vec3::new(p.x, 0.0, p.z) / 2.0 - *n).length() < 1e-5);
        }
    }

    #[test]
    fn test_tapered_body_normals_tilt_up() {
        let cyl = Cylinder::new(1.0, 1.0, 8)
            .with_taper(0.0)
            .build(&GeometryRequest::new(Features::NORMALS))
            .unwrap();

        let expected_y = 1.0 / 2.0_f32.sqrt();
        for n in cyl.normals() {
            assert!((n.y - expected_y).abs() < 1e-5);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
        assert!(cyl.positions()[..9].iter().all(|p| p.x.abs() < 1e-6));
    }

    #[test]
    fn test_closed_cylinder_as_list() {
        let slices = 6;
        let cyl = Cylinder::new(1.0, 2.0, slices)
            .closed(true)
            .generate(Topology::TriangleList, &GeometryRequest::textured())
            .unwrap();

        assert_eq!(cyl.triangle_count(), (2 * slices + 2 * slices) as usize);
        assert_eq!(cyl.tex_coord_count(), cyl.vertex_count());
    }

    #[test]
    fn test_closed_cylinder_strip_faces_outward() {
        let cyl = Cylinder::new(1.0, 2.0, 6)
            .closed(true)
            .generate(Topology::TriangleStrip, &GeometryRequest::default())
            .unwrap();
        let p = cyl.positions();

        // Away from the axis on the body, out of the ends on the caps
        for [a, b, c] in crate::convert::drawn_triangles(&cyl) {
            let (a, b, c) = (p[a as usize], p[b as usize], p[c as usize]);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal(a, b, c).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_closed_cylinder_indexed_list_and_strip() {
        let cyl = Cylinder::new(1.0, 2.0, 6).closed(true);
        let request = GeometryRequest::default();

        let indexed = cyl.generate(Topology::IndexedTriangleList, &request).unwrap();
        assert_eq!(indexed.vertex_count(), 14 + 7 + 7);
        assert_eq!(indexed.triangle_count(), 24);

        let strip = cyl.generate(Topology::TriangleStrip, &request).unwrap();
        assert_eq!(strip.strip_count(), 1 + 6 + 6);
        assert_eq!(strip.triangle_count(), 24);
    }

    #[test]
    fn test_closed_cylinder_indexed_strip_fails() {
        let result = Cylinder::new(1.0, 2.0, 6)
            .closed(true)
            .generate(Topology::IndexedTriangleStrip, &GeometryRequest::default());

        assert!(matches!(
            result,
            Err(GeometryError::UnsupportedConfiguration {
                shape: ShapeKind::Cylinder,
                ..
            })
        ));
    }

    #[test]
    fn test_closed_cone_like_cylinder_skips_top_cap() {
        let cyl = Cylinder::new(1.0, 2.0, 6)
            .with_taper(0.0)
            .closed(true)
            .generate(Topology::TriangleList, &GeometryRequest::default())
            .unwrap();

        assert_eq!(cyl.triangle_count(), 12 + 6);
    }

    #[test]
    fn test_cylinder_colors_follow_final_positions() {
        let request = GeometryRequest::new(Features::COLORS).with_color_alpha(true);
        let cyl = Cylinder::new(1.0, 2.0, 4)
            .closed(true)
            .generate(Topology::TriangleList, &request)
            .unwrap();

        assert!(cyl.has_color_alpha());
        assert_eq!(cyl.color_count(), cyl.vertex_count());
    }

    #[test]
    fn test_cylinder_rejects_bad_parameters() {
        let request = GeometryRequest::default();
        assert!(Cylinder::new(0.0, 1.0, 8).build(&request).is_err());
        assert!(Cylinder::new(1.0, 0.0, 8).build(&request).is_err());
        assert!(Cylinder::new(1.0, 1.0, 8).with_taper(-0.5).build(&request).is_err());
        assert!(Cylinder::new(1.0, 1.0, 2).build(&request).is_err());
    }
}
