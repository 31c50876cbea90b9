//! Latitude/longitude spheres and hemispheres
//!
//! Both sample `x = cos θ cos φ, y = sin φ, z = -sin θ cos φ` over a
//! `(slices + 1) × (stacks + 1)` lattice, one indexed strip per latitude band.

use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{Shape, ShapeKind, band_strips, ring};
use crate::attributes::{Attributes, naive_normals};
use crate::construct::{MeshArrays, MeshConstruct, Topology};
use crate::error::{Result, check_lattice, check_positive, check_resolution};
use crate::request::GeometryRequest;

/// Full UV sphere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sphere {
    pub radius: f32,
    /// Longitude divisions (min 3)
    pub slices: u32,
    /// Latitude divisions (min 2)
    pub stacks: u32,
    pub center: Vec3,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            radius: 1.0,
            slices: 16,
            stacks: 8,
            center: Vec3::ZERO,
        }
    }
}

impl Sphere {
    pub fn new(radius: f32, slices: u32, stacks: u32) -> Self {
        Self {
            radius,
            slices,
            stacks,
            center: Vec3::ZERO,
        }
    }

    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }
}

impl Shape for Sphere {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Sphere
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        check_positive("radius", self.radius)?;
        check_resolution("slices", self.slices, 3)?;
        check_resolution("stacks", self.stacks, 2)?;

        latitude_bands(
            LatitudeRange {
                radius: self.radius,
                slices: self.slices,
                stacks: self.stacks,
                phi_top: FRAC_PI_2,
                phi_bottom: -FRAC_PI_2,
                center: self.center,
            },
            request,
        )
    }
}

/// Upper half of a UV sphere, open at the equator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hemisphere {
    pub radius: f32,
    /// Longitude divisions (min 3)
    pub slices: u32,
    /// Latitude divisions between pole and equator (min 1)
    pub stacks: u32,
    pub center: Vec3,
}

impl Default for Hemisphere {
    fn default() -> Self {
        Self {
            radius: 1.0,
            slices: 16,
            stacks: 4,
            center: Vec3::ZERO,
        }
    }
}

impl Hemisphere {
    pub fn new(radius: f32, slices: u32, stacks: u32) -> Self {
        Self {
            radius,
            slices,
            stacks,
            center: Vec3::ZERO,
        }
    }

    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }
}

impl Shape for Hemisphere {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Hemisphere
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        check_positive("radius", self.radius)?;
        check_resolution("slices", self.slices, 3)?;
        check_resolution("stacks", self.stacks, 1)?;

        latitude_bands(
            LatitudeRange {
                radius: self.radius,
                slices: self.slices,
                stacks: self.stacks,
                phi_top: FRAC_PI_2,
                phi_bottom: 0.0,
                center: self.center,
            },
            request,
        )
    }
}

struct LatitudeRange {
    radius: f32,
    slices: u32,
    stacks: u32,
    phi_top: f32,
    phi_bottom: f32,
    center: Vec3,
}

/// Sample latitudes from `phi_top` down to `phi_bottom`.
///
/// Texture `s` runs with longitude, `t` is 1 on the top row and 0 on the
/// bottom row.
fn latitude_bands(range: LatitudeRange, request: &GeometryRequest) -> Result<MeshConstruct> {
    let LatitudeRange {
        radius,
        slices,
        stacks,
        phi_top,
        phi_bottom,
        center,
    } = range;
    check_lattice(slices, stacks)?;

    let columns = ring(slices);
    let count = columns.len() * (stacks as usize + 1);
    let mut local = Vec::with_capacity(count);
    let mut st = Vec::with_capacity(count);

    for j in 0..=stacks {
        let v = j as f32 / stacks as f32;
        let phi = phi_top + (phi_bottom - phi_top) * v;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for (i, &(cos_theta, neg_sin_theta)) in columns.iter().enumerate() {
            local.push(Vec3::new(cos_theta * cos_phi, sin_phi, neg_sin_theta * cos_phi) * radius);
            st.push(Vec2::new(i as f32 / slices as f32, 1.0 - v));
        }
    }

    let attrs = Attributes::select(request, &local, || naive_normals(&local), || st);
    let (indices, strip_lengths) = band_strips(slices, stacks);

    MeshConstruct::new(
        Topology::IndexedTriangleStrip,
        MeshArrays {
            positions: local.into_iter().map(|p| p + center).collect(),
            normals: attrs.normals,
            tex_coords: attrs.tex_coords,
            colors: attrs.colors,
            indices,
            strip_lengths,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::{Colors, TexCoords};
    use crate::error::GeometryError;
    use crate::request::Features;

    fn all_features() -> GeometryRequest {
        GeometryRequest::new(Features::all())
    }

    #[test]
    fn test_sphere_counts() {
        let sphere = Sphere::new(1.0, 8, 4).build(&all_features()).unwrap();

        assert_eq!(sphere.vertex_count(), 9 * 5);
        assert_eq!(sphere.normal_count(), 9 * 5);
        assert_eq!(sphere.tex_coord_count(), 9 * 5);
        assert_eq!(sphere.strip_count(), 4);
        assert!(sphere.strip_lengths().iter().all(|&len| len == 18));
        assert_eq!(sphere.index_count(), 4 * 18);
    }

    #[test]
    fn test_sphere_minimum_resolution() {
        assert_eq!(
            Sphere::new(1.0, 2, 5).build(&GeometryRequest::default()),
            Err(GeometryError::InsufficientResolution {
                parameter: "slices",
                value: 2,
                minimum: 3,
            })
        );
        assert!(Sphere::new(1.0, 3, 2).build(&GeometryRequest::default()).is_ok());
        assert!(matches!(
            Sphere::new(1.0, 3, 1).build(&GeometryRequest::default()),
            Err(GeometryError::InsufficientResolution { parameter: "stacks", .. })
        ));
    }

    #[test]
    fn test_sphere_rejects_bad_radius() {
        assert!(matches!(
            Sphere::new(-1.0, 8, 4).build(&GeometryRequest::default()),
            Err(GeometryError::InvalidParameter { parameter: "radius", .. })
        ));
    }

    #[test]
    fn test_sphere_starts_at_north_pole() {
        let sphere = Sphere::new(2.0, 6, 3).build(&all_features()).unwrap();

        assert!((sphere.positions()[0] - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
        let last = *sphere.positions().last().unwrap();
        assert!((last - Vec3::new(0.0, -2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_sphere_normals_unit_and_radial() {
        let sphere = Sphere::new(3.0, 12, 6).build(&all_features()).unwrap();

        for (p, n) in sphere.positions().iter().zip(sphere.normals()) {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((*p / 3.0 - *n).length() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_center_offset_after_attributes() {
        let center = Vec3::new(5.0, 0.0, 0.0);
        let request = GeometryRequest::new(Features::NORMALS | Features::COLORS);
        let sphere = Sphere::new(1.0, 4, 2)
            .with_center(center)
            .build(&request)
            .unwrap();

        // Pole normal still points up, colors come from the local position
        assert!((sphere.positions()[0] - Vec3::new(5.0, 1.0, 0.0)).length() < 1e-6);
        assert!((sphere.normals()[0] - Vec3::Y).length() < 1e-6);
        match sphere.colors() {
            Colors::Rgb(c) => assert!((c[0] - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6),
            other => panic!("expected RGB colors, got {other:?}"),
        }
    }

    #[test]
    fn test_hemisphere_normals_ignore_center() {
        let center = Vec3::new(0.0, -3.0, 1.0);
        let hemi = Hemisphere::new(1.5, 8, 3)
            .with_center(center)
            .build(&GeometryRequest::new(Features::NORMALS))
            .unwrap();

        for (p, n) in hemi.positions().iter().zip(hemi.normals()) {
            assert!(((*p - center).normalize() - *n).length() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_tex_coords_grid() {
        let sphere = Sphere::new(1.0, 4, 2).build(&all_features()).unwrap();

        match sphere.tex_coords() {
            TexCoords::Two(st) => {
                assert_eq!(st[0], Vec2::new(0.0, 1.0));
                assert_eq!(st[4], Vec2::new(1.0, 1.0));
                assert_eq!(st[5 + 2], Vec2::new(0.5, 0.5));
                assert_eq!(st[14], Vec2::new(1.0, 0.0));
            }
            other => panic!("expected 2D coordinates, got {other:?}"),
        }
    }

    #[test]
    fn test_sphere_only_requested_attributes() {
        let sphere = Sphere::default().build(&GeometryRequest::coordinates()).unwrap();

        assert_eq!(sphere.calculate_feature_bits(), Features::COORDINATES);
    }

    #[test]
    fn test_hemisphere_counts_and_extent() {
        let hemi = Hemisphere::new(1.0, 8, 3).build(&all_features()).unwrap();

        assert_eq!(hemi.vertex_count(), 9 * 4);
        assert_eq!(hemi.strip_count(), 3);
        for p in hemi.positions() {
            assert!(p.y >= -1e-6);
        }
        // Last row is the equator
        for p in &hemi.positions()[27..] {
            assert!(p.y.abs() < 1e-6);
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_hemisphere_allows_single_stack() {
        assert!(Hemisphere::new(1.0, 3, 1).build(&GeometryRequest::default()).is_ok());
        assert!(Hemisphere::new(1.0, 3, 0).build(&GeometryRequest::default()).is_err());
    }
}
