//! Attribute synthesis helpers
//!
//! Shared derivations of normals, texture coordinates and vertex colors from
//! positions. All of them read local positions, so callers must run them
//! before any offset translation is applied.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::construct::{Colors, TexCoords};
use crate::request::GeometryRequest;

/// Radial normals: each normal is the normalized position.
///
/// Positions at the origin fall back to +Y.
pub fn naive_normals(positions: &[Vec3]) -> Vec<Vec3> {
    positions.iter().map(|p| p.normalize_or(Vec3::Y)).collect()
}

/// Cylindrical unwrap around the Z axis.
///
/// `s = (atan2(y, x) + π) / 2π`, `t = (z - zmin) / (zmax - zmin)`. A flat
/// z-extent maps every `t` to 0.
pub fn cylindrical_tex_coords(positions: &[Vec3]) -> Vec<Vec2> {
    let (z_min, z_max) = positions
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.z), hi.max(p.z))
        });
    let extent = z_max - z_min;

    positions
        .iter()
        .map(|p| {
            let s = (p.y.atan2(p.x) + PI) / TAU;
            let t = if extent > 0.0 {
                (p.z - z_min) / extent
            } else {
                0.0
            };
            Vec2::new(s, t)
        })
        .collect()
}

/// Spherical unwrap of unit-sphere positions.
///
/// Longitude follows the `x = cos θ, z = -sin θ` sampling used by the
/// parametric shapes, latitude maps the north pole to `t = 1`.
pub fn spherical_tex_coords(positions: &[Vec3]) -> Vec<Vec2> {
    positions
        .iter()
        .map(|p| {
            let n = p.normalize_or(Vec3::Y);
            let theta = (-n.z).atan2(n.x);
            let s = (if theta < 0.0 { theta + TAU } else { theta }) / TAU;
            let t = n.y.clamp(-1.0, 1.0).asin() / PI + 0.5;
            Vec2::new(s, t)
        })
        .collect()
}

/// Debug color scheme: position components mapped straight into RGB, doubled.
///
/// With `alpha` the fourth channel is fixed at 0.
pub fn position_colors(positions: &[Vec3], alpha: bool) -> Colors {
    if alpha {
        Colors::Rgba(positions.iter().map(|p| (*p * 2.0).extend(0.0)).collect())
    } else {
        Colors::Rgb(positions.iter().map(|p| *p * 2.0).collect())
    }
}

/// Optional attributes of a generated vertex set, filled per request
#[derive(Debug, Clone, Default)]
pub(crate) struct Attributes {
    pub normals: Vec<Vec3>,
    pub tex_coords: TexCoords,
    pub colors: Colors,
}

impl Attributes {
    /// Keep only what the request asks for; colors come from `positions`.
    pub fn select(
        request: &GeometryRequest,
        positions: &[Vec3],
        normals: impl FnOnce() -> Vec<Vec3>,
        st: impl FnOnce() -> Vec<Vec2>,
    ) -> Self {
        Self {
            normals: if request.wants_normals() {
                normals()
            } else {
                Vec::new()
            },
            tex_coords: if request.wants_tex_coords() {
                TexCoords::from_st(st(), request.tex_coord_size)
            } else {
                TexCoords::None
            },
            colors: if request.wants_colors() {
                position_colors(positions, request.color_alpha)
            } else {
                Colors::None
            },
        }
    }
}

/// Rescale a coordinate into `[lo, hi]`
pub(crate) fn remap(t: f32, lo: f32, hi: f32) -> f32 {
    lo + t * (hi - lo)
}
