//! Topology conversion
//!
//! Pure functions that re-express an already sampled [`MeshConstruct`] in
//! another topology. They never resample the surface and never synthesize an
//! attribute the input does not carry.
//!
//! Strips are unrolled into consecutive triples: triangle `k` of a strip is
//! `(e[k], e[k+1], e[k+2])`, with no winding correction. Generators put the
//! upper ring first in every strip, so even triangles of an unrolled strip
//! face outward and odd ones carry the reversed order a strip draw flips
//! back. [`drawn_triangles`] gives the order a strip draw rasterizes.

use tracing::debug;

use crate::construct::{MeshArrays, MeshConstruct, Topology};
use crate::error::{GeometryError, Result};

// ============================================================================
// Strip unrolling
// ============================================================================

/// Unroll strips over `elements` into consecutive triples
pub(crate) fn unroll_strips(elements: &[u32], strip_lengths: &[u32]) -> Vec<u32> {
    let triangles: usize = strip_lengths.iter().map(|&len| len as usize - 2).sum();
    let mut out = Vec::with_capacity(triangles * 3);

    let mut start = 0usize;
    for &len in strip_lengths {
        let strip = &elements[start..start + len as usize];
        for triple in strip.windows(3) {
            out.extend_from_slice(triple);
        }
        start += len as usize;
    }

    out
}

/// Vertex triples in the order and winding the construct is drawn with.
///
/// Lists are read as stored. Strips follow the rasterizer rule, which swaps
/// the first two vertices of every odd triangle of a strip, so every face
/// keeps the facing it has on screen.
pub fn drawn_triangles(construct: &MeshConstruct) -> Vec<[u32; 3]> {
    let sequence: Vec<u32>;
    let elements = if construct.topology().is_indexed() {
        construct.indices()
    } else {
        sequence = (0..construct.vertex_count() as u32).collect();
        &sequence
    };

    if !construct.topology().is_strip() {
        return elements
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();
    }

    let mut out = Vec::with_capacity(construct.triangle_count());
    let mut start = 0usize;
    for &len in construct.strip_lengths() {
        let strip = &elements[start..start + len as usize];
        for (k, tri) in strip.windows(3).enumerate() {
            if k % 2 == 0 {
                out.push([tri[0], tri[1], tri[2]]);
            } else {
                out.push([tri[1], tri[0], tri[2]]);
            }
        }
        start += len as usize;
    }
    out
}

fn expect_topology(src: &MeshConstruct, expected: Topology) -> Result<()> {
    if src.topology() != expected {
        return Err(GeometryError::TopologyMismatch {
            expected,
            found: src.topology(),
        });
    }
    Ok(())
}

fn finish(src: &MeshConstruct, topology: Topology, arrays: MeshArrays) -> Result<MeshConstruct> {
    let out = MeshConstruct::new(topology, arrays)?;
    debug!(
        "converted {} -> {}: {} vertices, {} indices, {} triangles",
        src.topology(),
        topology,
        out.vertex_count(),
        out.index_count(),
        out.triangle_count()
    );
    Ok(out)
}

// ============================================================================
// Converters
// ============================================================================

/// Indexed strip → indexed list. Vertex arrays are carried over unchanged.
pub fn indexed_strip_to_indexed_list(src: &MeshConstruct) -> Result<MeshConstruct> {
    expect_topology(src, Topology::IndexedTriangleStrip)?;

    let arrays = src.arrays();
    let out = MeshArrays {
        indices: unroll_strips(&arrays.indices, &arrays.strip_lengths),
        strip_lengths: Vec::new(),
        ..arrays.clone()
    };
    finish(src, Topology::IndexedTriangleList, out)
}

/// Indexed strip → non-indexed strip.
///
/// Every index occurrence becomes its own vertex copy; strip lengths are kept.
pub fn indexed_strip_to_strip(src: &MeshConstruct) -> Result<MeshConstruct> {
    expect_topology(src, Topology::IndexedTriangleStrip)?;

    let arrays = src.arrays();
    let mut out = arrays.gather(&arrays.indices);
    out.strip_lengths = arrays.strip_lengths.clone();
    finish(src, Topology::TriangleStrip, out)
}

/// Indexed strip → flat triangle list, three vertex copies per triangle
pub fn indexed_strip_to_list(src: &MeshConstruct) -> Result<MeshConstruct> {
    expect_topology(src, Topology::IndexedTriangleStrip)?;

    let arrays = src.arrays();
    let order = unroll_strips(&arrays.indices, &arrays.strip_lengths);
    finish(src, Topology::TriangleList, arrays.gather(&order))
}

/// Indexed list → flat triangle list
pub fn indexed_list_to_list(src: &MeshConstruct) -> Result<MeshConstruct> {
    expect_topology(src, Topology::IndexedTriangleList)?;

    let arrays = src.arrays();
    finish(src, Topology::TriangleList, arrays.gather(&arrays.indices))
}

/// Non-indexed strip → flat triangle list
pub fn strip_to_list(src: &MeshConstruct) -> Result<MeshConstruct> {
    expect_topology(src, Topology::TriangleStrip)?;

    let arrays = src.arrays();
    let sequence: Vec<u32> = (0..src.vertex_count() as u32).collect();
    let order = unroll_strips(&sequence, &arrays.strip_lengths);
    finish(src, Topology::TriangleList, arrays.gather(&order))
}

/// Convert `src` to `target` along whichever path exists.
///
/// Converting to the same topology returns a copy. Paths that would need
/// vertex welding or strip building fail with
/// [`GeometryError::UnsupportedConversion`].
pub fn convert(src: &MeshConstruct, target: Topology) -> Result<MeshConstruct> {
    use Topology::*;

    match (src.topology(), target) {
        (from, to) if from == to => Ok(src.clone()),
        (IndexedTriangleStrip, IndexedTriangleList) => indexed_strip_to_indexed_list(src),
        (IndexedTriangleStrip, TriangleStrip) => indexed_strip_to_strip(src),
        (IndexedTriangleStrip, TriangleList) => indexed_strip_to_list(src),
        (IndexedTriangleList, TriangleList) => indexed_list_to_list(src),
        (TriangleStrip, TriangleList) => strip_to_list(src),
        (from, to) => Err(GeometryError::UnsupportedConversion { from, to }),
    }
}

/// True if [`convert`] has a path from `from` to `to`
pub fn can_convert(from: Topology, to: Topology) -> bool {
    use Topology::*;

    from == to
        || matches!(
            (from, to),
            (IndexedTriangleStrip, _)
                | (IndexedTriangleList, TriangleList)
                | (TriangleStrip, TriangleList)
        )
}
