//! Multi-part assembly
//!
//! Capped cylinders and capsules are built from several generated parts that
//! are re-positioned and concatenated into one construct. Parts are moved in
//! and consumed.

use glam::{Affine3A, Vec3};
use tracing::{trace, warn};

use crate::attributes::cylindrical_tex_coords;
use crate::construct::{Colors, MeshArrays, MeshConstruct, TexCoords};
use crate::error::{GeometryError, Result};
use crate::request::TexCoordSize;

/// Apply an affine transform to a construct.
///
/// Positions take the full transform. Normals take the inverse-transpose of
/// its linear part and are re-normalized.
pub fn transform(mut construct: MeshConstruct, matrix: Affine3A) -> MeshConstruct {
    let normal_matrix = matrix.matrix3.inverse().transpose();
    let (positions, normals) = construct.vertices_mut();

    for p in positions.iter_mut() {
        *p = matrix.transform_point3(*p);
    }
    for n in normals.iter_mut() {
        *n = normal_matrix.mul_vec3(*n).normalize_or(*n);
    }

    construct
}

/// Concatenate parts that share one topology.
///
/// Indices are offset by the vertex count of the parts before them and strip
/// lengths are appended. Parts without texture coordinates get a cylindrical
/// unwrap when any other part carries them. Disagreement on normals, colors,
/// alpha or texture dimensionality is [`GeometryError::InvalidGeometry`].
pub fn combine(parts: Vec<MeshConstruct>) -> Result<MeshConstruct> {
    let Some(first) = parts.first() else {
        return Err(GeometryError::InvalidGeometry("nothing to combine".into()));
    };
    let topology = first.topology();

    if let Some(part) = parts.iter().find(|p| p.topology() != topology) {
        return Err(GeometryError::TopologyMismatch {
            expected: topology,
            found: part.topology(),
        });
    }

    let with_normals = first.normal_count() > 0;
    if parts.iter().any(|p| (p.normal_count() > 0) != with_normals) {
        return Err(GeometryError::InvalidGeometry(
            "parts disagree on normals".into(),
        ));
    }

    let color_layout = (first.color_count() > 0, first.has_color_alpha());
    if parts
        .iter()
        .any(|p| (p.color_count() > 0, p.has_color_alpha()) != color_layout)
    {
        return Err(GeometryError::InvalidGeometry(
            "parts disagree on vertex colors".into(),
        ));
    }

    let mut tex_size: Option<TexCoordSize> = None;
    for size in parts.iter().filter_map(|p| p.tex_coord_size()) {
        match tex_size {
            Some(existing) if existing != size => {
                return Err(GeometryError::InvalidGeometry(
                    "parts disagree on texture coordinate size".into(),
                ));
            }
            _ => tex_size = Some(size),
        }
    }

    let total_vertices: usize = parts.iter().map(|p| p.vertex_count()).sum();
    let total_indices: usize = parts.iter().map(|p| p.index_count()).sum();

    let mut out = MeshArrays {
        positions: Vec::with_capacity(total_vertices),
        indices: Vec::with_capacity(total_indices),
        tex_coords: match tex_size {
            None => TexCoords::None,
            Some(TexCoordSize::Two) => TexCoords::Two(Vec::with_capacity(total_vertices)),
            Some(TexCoordSize::Three) => TexCoords::Three(Vec::with_capacity(total_vertices)),
        },
        colors: match color_layout {
            (false, _) => Colors::None,
            (true, false) => Colors::Rgb(Vec::with_capacity(total_vertices)),
            (true, true) => Colors::Rgba(Vec::with_capacity(total_vertices)),
        },
        ..Default::default()
    };

    for (i, part) in parts.into_iter().enumerate() {
        let mut arrays = part.into_arrays();
        if out.positions.len() + arrays.positions.len() > u32::MAX as usize {
            return Err(GeometryError::InvalidGeometry(format!(
                "combined parts exceed {} vertices",
                u32::MAX
            )));
        }
        let base = out.positions.len() as u32;
        trace!(
            "combining part {i}: {} vertices at base {base}",
            arrays.positions.len()
        );

        if let Some(size) = tex_size {
            if arrays.tex_coords.is_empty() {
                warn!("part {i} has no texture coordinates, using cylindrical unwrap");
                arrays.tex_coords =
                    TexCoords::from_st(cylindrical_tex_coords(&arrays.positions), size);
            }
        }

        match (&mut out.tex_coords, arrays.tex_coords) {
            (TexCoords::Two(dst), TexCoords::Two(src)) => dst.extend(src),
            (TexCoords::Three(dst), TexCoords::Three(src)) => dst.extend(src),
            _ => {}
        }
        match (&mut out.colors, arrays.colors) {
            (Colors::Rgb(dst), Colors::Rgb(src)) => dst.extend(src),
            (Colors::Rgba(dst), Colors::Rgba(src)) => dst.extend(src),
            _ => {}
        }

        out.positions.extend(arrays.positions);
        out.normals.extend(arrays.normals);
        out.indices.extend(arrays.indices.iter().map(|&idx| idx + base));
        out.strip_lengths.extend(arrays.strip_lengths);
    }

    MeshConstruct::new(topology, out)
}

/// Transform each part, then [`combine`] them
pub fn combine_transformed(parts: Vec<(MeshConstruct, Affine3A)>) -> Result<MeshConstruct> {
    combine(
        parts
            .into_iter()
            .map(|(part, matrix)| transform(part, matrix))
            .collect(),
    )
}

/// Largest distance between matching positions of two equally long rings
pub fn max_ring_gap(a: &[Vec3], b: &[Vec3]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(p, q)| p.distance(*q))
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::Topology;
    use glam::{Quat, Vec2};
    use std::f32::consts::FRAC_PI_2;

    fn triangle(with_st: bool) -> MeshConstruct {
        MeshConstruct::new(
            Topology::IndexedTriangleStrip,
            MeshArrays {
                positions: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0), Vec3::Y],
                normals: vec![Vec3::Y; 3],
                tex_coords: if with_st {
                    TexCoords::Two(vec![Vec2::ZERO, Vec2::X, Vec2::Y])
                } else {
                    TexCoords::None
                },
                indices: vec![0, 1, 2],
                strip_lengths: vec![3],
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_combine_empty() {
        assert!(matches!(
            combine(Vec::new()),
            Err(GeometryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_combine_index_offset() {
        let combined = combine(vec![triangle(true), triangle(true)]).unwrap();

        assert_eq!(combined.vertex_count(), 6);
        assert_eq!(combined.indices(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(combined.strip_lengths(), &[3, 3]);
        for &idx in combined.indices() {
            assert!((idx as usize) < combined.vertex_count());
        }
    }

    #[test]
    fn test_combine_synthesizes_missing_tex_coords() {
        let combined = combine(vec![triangle(true), triangle(false)]).unwrap();

        match combined.tex_coords() {
            TexCoords::Two(st) => {
                assert_eq!(st.len(), 6);
                // Second part gets the z-extent unwrap: z = 0, 1, 0
                assert_eq!(st[3].y, 0.0);
                assert_eq!(st[4].y, 1.0);
            }
            other => panic!("expected 2D coordinates, got {other:?}"),
        }
    }

    #[test]
    fn test_combine_rejects_mixed_topology() {
        let list = crate::convert::indexed_strip_to_list(&triangle(false)).unwrap();
        assert!(matches!(
            combine(vec![triangle(false), list]),
            Err(GeometryError::TopologyMismatch { .. })
        ));
    }

    #[test]
    fn test_combine_rejects_mixed_normals() {
        let bare = MeshConstruct::new(
            Topology::IndexedTriangleStrip,
            MeshArrays {
                positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                indices: vec![0, 1, 2],
                strip_lengths: vec![3],
                ..Default::default()
            },
        )
        .unwrap();

        assert!(matches!(
            combine(vec![triangle(false), bare]),
            Err(GeometryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_transform_translation_keeps_normals() {
        let moved = transform(
            triangle(false),
            Affine3A::from_translation(Vec3::new(0.0, 2.0, 0.0)),
        );

        assert_eq!(moved.positions()[0], Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(moved.normals()[0], Vec3::Y);
    }

    #[test]
    fn test_transform_rotation_rotates_normals() {
        let rotated = transform(
            triangle(false),
            Affine3A::from_quat(Quat::from_rotation_x(FRAC_PI_2)),
        );

        for n in rotated.normals() {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_transform_non_uniform_scale_normals_stay_unit() {
        let scaled = transform(
            triangle(false),
            Affine3A::from_scale(Vec3::new(3.0, 0.5, 2.0)),
        );

        for n in scaled.normals() {
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_max_ring_gap() {
        let a = [Vec3::ZERO, Vec3::X];
        let b = [Vec3::ZERO, Vec3::new(1.0, 0.5, 0.0)];
        assert!((max_ring_gap(&a, &b) - 0.5).abs() < 1e-6);
    }
}
