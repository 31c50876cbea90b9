//! Geodesic sphere from a subdivided icosahedron
//!
//! The icosahedron is built pole-up: one vertex on each pole and two rings of
//! five. Every face is split into `subdivision²` triangles on a barycentric
//! lattice and the lattice points are pushed back onto the unit sphere.
//! The hemispherical variant keeps the ten faces above the equator: the top
//! cap and the upward-pointing half of the middle band.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{Shape, ShapeKind};
use crate::attributes::{Attributes, naive_normals, spherical_tex_coords};
use crate::construct::{MeshArrays, MeshConstruct, Topology};
use crate::error::{Result, check_positive, check_resolution};
use crate::request::GeometryRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoSphere {
    pub radius: f32,
    /// Edge divisions per icosahedron face (min 1)
    pub subdivision: u32,
    /// Keep only the ten upper faces
    pub hemisphere: bool,
    pub center: Vec3,
}

impl Default for GeoSphere {
    fn default() -> Self {
        Self {
            radius: 1.0,
            subdivision: 4,
            hemisphere: false,
            center: Vec3::ZERO,
        }
    }
}

impl GeoSphere {
    pub fn new(radius: f32, subdivision: u32) -> Self {
        Self {
            radius,
            subdivision,
            ..Default::default()
        }
    }

    pub fn hemisphere(mut self, hemisphere: bool) -> Self {
        self.hemisphere = hemisphere;
        self
    }

    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Triangles this configuration produces
    pub fn triangle_count(&self) -> usize {
        let faces = if self.hemisphere { 10 } else { 20 };
        faces * (self.subdivision as usize).pow(2)
    }
}

/// Icosahedron faces, outward counter-clockwise.
///
/// Order: top cap, upper band, lower band, bottom cap.
fn icosahedron() -> Vec<[Vec3; 3]> {
    let y = 1.0 / 5.0_f32.sqrt();
    let r = 2.0 * y;
    let upper: Vec<Vec3> = (0..5)
        .map(|k| {
            let theta = TAU * k as f32 / 5.0;
            Vec3::new(r * theta.cos(), y, -r * theta.sin())
        })
        .collect();
    let lower: Vec<Vec3> = (0..5)
        .map(|k| {
            let theta = TAU * k as f32 / 5.0 + PI / 5.0;
            Vec3::new(r * theta.cos(), -y, -r * theta.sin())
        })
        .collect();

    let mut faces = Vec::with_capacity(20);
    for k in 0..5 {
        faces.push([Vec3::Y, upper[k], upper[(k + 1) % 5]]);
    }
    for k in 0..5 {
        faces.push([upper[k], lower[k], upper[(k + 1) % 5]]);
    }
    for k in 0..5 {
        faces.push([upper[(k + 1) % 5], lower[k], lower[(k + 1) % 5]]);
    }
    for k in 0..5 {
        faces.push([Vec3::NEG_Y, lower[(k + 1) % 5], lower[k]]);
    }
    faces
}

/// Split one face into `n²` triangles on the unit sphere, appending to `out`
fn geodesate(face: [Vec3; 3], n: u32, out: &mut Vec<Vec3>) {
    let [a, b, c] = face;
    let step = 1.0 / n as f32;
    let point = |i: u32, j: u32| {
        (a + (b - a) * (i as f32 * step) + (c - a) * (j as f32 * step)).normalize()
    };

    for j in 0..n {
        for i in 0..n - j {
            out.extend_from_slice(&[point(i, j), point(i + 1, j), point(i, j + 1)]);
            if i + j + 2 <= n {
                out.extend_from_slice(&[point(i + 1, j), point(i + 1, j + 1), point(i, j + 1)]);
            }
        }
    }
}

impl Shape for GeoSphere {
    fn kind(&self) -> ShapeKind {
        ShapeKind::GeoSphere
    }

    fn build(&self, request: &GeometryRequest) -> Result<MeshConstruct> {
        check_positive("radius", self.radius)?;
        check_resolution("subdivision", self.subdivision, 1)?;

        let faces = icosahedron();
        let kept = if self.hemisphere { &faces[..10] } else { &faces[..] };

        let mut units = Vec::with_capacity(3 * self.triangle_count());
        for face in kept {
            geodesate(*face, self.subdivision, &mut units);
        }

        let local: Vec<Vec3> = units.iter().map(|u| *u * self.radius).collect();
        let attrs = Attributes::select(
            request,
            &local,
            || naive_normals(&local),
            || spherical_tex_coords(&units),
        );

        MeshConstruct::new(
            Topology::TriangleList,
            MeshArrays {
                positions: local.into_iter().map(|p| p + self.center).collect(),
                normals: attrs.normals,
                tex_coords: attrs.tex_coords,
                colors: attrs.colors,
                ..Default::default()
            },
        )
    }
}
