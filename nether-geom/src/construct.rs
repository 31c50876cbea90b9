//! Mesh construct
//!
//! The neutral intermediate representation every generator produces and every
//! converter consumes: parallel per-vertex arrays plus optional index and
//! strip-length buffers, tagged with the topology they are laid out for.
//!
//! A [`MeshConstruct`] is validated once at construction and is immutable
//! afterwards. Converters and assembly helpers always build a new construct.

use std::fmt;

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::request::{Features, TexCoordSize};

/// How vertices are assembled into triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topology {
    /// Every three vertices form a triangle
    TriangleList,
    /// Every three indices form a triangle
    IndexedTriangleList,
    /// Consecutive vertices form strips, split by strip lengths
    TriangleStrip,
    /// Consecutive indices form strips, split by strip lengths
    IndexedTriangleStrip,
}

impl Topology {
    /// All topologies in declaration order
    pub const ALL: [Topology; 4] = [
        Topology::TriangleList,
        Topology::IndexedTriangleList,
        Topology::TriangleStrip,
        Topology::IndexedTriangleStrip,
    ];

    /// True if the construct carries an index buffer
    pub fn is_indexed(self) -> bool {
        matches!(self, Self::IndexedTriangleList | Self::IndexedTriangleStrip)
    }

    /// True if the construct carries strip lengths
    pub fn is_strip(self) -> bool {
        matches!(self, Self::TriangleStrip | Self::IndexedTriangleStrip)
    }

    /// Stable kebab-case name (matches the config file format)
    pub fn name(self) -> &'static str {
        match self {
            Self::TriangleList => "triangle-list",
            Self::IndexedTriangleList => "indexed-triangle-list",
            Self::TriangleStrip => "triangle-strip",
            Self::IndexedTriangleStrip => "indexed-triangle-strip",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Texture coordinates; a construct carries 2D or 3D coordinates, never both
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TexCoords {
    #[default]
    None,
    Two(Vec<Vec2>),
    Three(Vec<Vec3>),
}

impl TexCoords {
    /// Build coordinates of the requested size from 2D grid coordinates.
    ///
    /// The third component of 3D coordinates is zero.
    pub fn from_st(st: Vec<Vec2>, size: TexCoordSize) -> Self {
        match size {
            TexCoordSize::Two => Self::Two(st),
            TexCoordSize::Three => Self::Three(st.into_iter().map(|c| c.extend(0.0)).collect()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Two(coords) => coords.len(),
            Self::Three(coords) => coords.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensionality, or `None` when no coordinates are present
    pub fn size(&self) -> Option<TexCoordSize> {
        match self {
            Self::None => None,
            Self::Two(_) => Some(TexCoordSize::Two),
            Self::Three(_) => Some(TexCoordSize::Three),
        }
    }

    /// Gather coordinates at the given vertex indices
    pub(crate) fn gather(&self, indices: impl Iterator<Item = usize>) -> Self {
        match self {
            Self::None => Self::None,
            Self::Two(coords) => Self::Two(indices.map(|i| coords[i]).collect()),
            Self::Three(coords) => Self::Three(indices.map(|i| coords[i]).collect()),
        }
    }

    /// Map the s component of every coordinate
    pub(crate) fn map_s(&mut self, f: impl Fn(f32) -> f32) {
        match self {
            Self::None => {}
            Self::Two(coords) => coords.iter_mut().for_each(|c| c.x = f(c.x)),
            Self::Three(coords) => coords.iter_mut().for_each(|c| c.x = f(c.x)),
        }
    }

    /// Map the t component of every coordinate
    pub(crate) fn map_t(&mut self, f: impl Fn(f32) -> f32) {
        match self {
            Self::None => {}
            Self::Two(coords) => coords.iter_mut().for_each(|c| c.y = f(c.y)),
            Self::Three(coords) => coords.iter_mut().for_each(|c| c.y = f(c.y)),
        }
    }
}

/// Vertex colors; alpha presence is shared by every color in a construct
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Colors {
    #[default]
    None,
    Rgb(Vec<Vec3>),
    Rgba(Vec<Vec4>),
}

impl Colors {
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Rgb(colors) => colors.len(),
            Self::Rgba(colors) => colors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba(_))
    }

    /// Gather colors at the given vertex indices
    pub(crate) fn gather(&self, indices: impl Iterator<Item = usize>) -> Self {
        match self {
            Self::None => Self::None,
            Self::Rgb(colors) => Self::Rgb(indices.map(|i| colors[i]).collect()),
            Self::Rgba(colors) => Self::Rgba(indices.map(|i| colors[i]).collect()),
        }
    }
}

/// Raw arrays handed to [`MeshConstruct::new`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshArrays {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: TexCoords,
    pub colors: Colors,
    pub indices: Vec<u32>,
    pub strip_lengths: Vec<u32>,
}

impl MeshArrays {
    /// Copy every per-vertex attribute at the given indices, in order
    pub(crate) fn gather(&self, indices: &[u32]) -> MeshArrays {
        let idx = || indices.iter().map(|&i| i as usize);
        MeshArrays {
            positions: idx().map(|i| self.positions[i]).collect(),
            normals: if self.normals.is_empty() {
                Vec::new()
            } else {
                idx().map(|i| self.normals[i]).collect()
            },
            tex_coords: self.tex_coords.gather(idx()),
            colors: self.colors.gather(idx()),
            indices: Vec::new(),
            strip_lengths: Vec::new(),
        }
    }
}

/// Validated mesh data in one topology
#[derive(Debug, Clone, PartialEq)]
pub struct MeshConstruct {
    topology: Topology,
    arrays: MeshArrays,
}

impl MeshConstruct {
    /// Validate the arrays against `topology` and wrap them.
    ///
    /// Fails with [`GeometryError::InvalidGeometry`] when attribute lengths
    /// disagree, indices are out of range, strip lengths do not add up, or a
    /// buffer is present that the topology does not use.
    pub fn new(topology: Topology, arrays: MeshArrays) -> Result<Self> {
        validate(topology, &arrays)?;
        Ok(Self { topology, arrays })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.arrays.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.arrays.normals
    }

    pub fn tex_coords(&self) -> &TexCoords {
        &self.arrays.tex_coords
    }

    pub fn colors(&self) -> &Colors {
        &self.arrays.colors
    }

    pub fn indices(&self) -> &[u32] {
        &self.arrays.indices
    }

    pub fn strip_lengths(&self) -> &[u32] {
        &self.arrays.strip_lengths
    }

    /// Access all arrays at once
    pub fn arrays(&self) -> &MeshArrays {
        &self.arrays
    }

    /// Consume the construct and take ownership of its arrays
    pub fn into_arrays(self) -> MeshArrays {
        self.arrays
    }

    pub fn vertex_count(&self) -> usize {
        self.arrays.positions.len()
    }

    pub fn normal_count(&self) -> usize {
        self.arrays.normals.len()
    }

    pub fn tex_coord_count(&self) -> usize {
        self.arrays.tex_coords.len()
    }

    pub fn color_count(&self) -> usize {
        self.arrays.colors.len()
    }

    pub fn index_count(&self) -> usize {
        self.arrays.indices.len()
    }

    pub fn strip_count(&self) -> usize {
        self.arrays.strip_lengths.len()
    }

    pub fn has_color_alpha(&self) -> bool {
        self.arrays.colors.has_alpha()
    }

    pub fn tex_coord_size(&self) -> Option<TexCoordSize> {
        self.arrays.tex_coords.size()
    }

    /// Positions and normals, mutable in place; lengths cannot change
    pub(crate) fn vertices_mut(&mut self) -> (&mut [Vec3], &mut [Vec3]) {
        (&mut self.arrays.positions, &mut self.arrays.normals)
    }

    /// Replace vertex colors with the position color scheme
    pub(crate) fn recolor_from_positions(&mut self, alpha: bool) {
        self.arrays.colors = crate::attributes::position_colors(&self.arrays.positions, alpha);
    }

    /// Remap the s component of every texture coordinate
    pub(crate) fn remap_tex_s(&mut self, f: impl Fn(f32) -> f32) {
        self.arrays.tex_coords.map_s(f);
    }

    /// Remap the t component of every texture coordinate
    pub(crate) fn remap_tex_t(&mut self, f: impl Fn(f32) -> f32) {
        self.arrays.tex_coords.map_t(f);
    }

    /// Number of triangles the construct describes
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::TriangleList => self.vertex_count() / 3,
            Topology::IndexedTriangleList => self.index_count() / 3,
            Topology::TriangleStrip | Topology::IndexedTriangleStrip => self
                .arrays
                .strip_lengths
                .iter()
                .map(|&len| len as usize - 2)
                .sum(),
        }
    }

    /// Re-derive the feature set from which arrays are populated
    pub fn calculate_feature_bits(&self) -> Features {
        let mut features = Features::empty();
        if !self.arrays.positions.is_empty() {
            features |= Features::COORDINATES;
        }
        if !self.arrays.normals.is_empty() {
            features |= Features::NORMALS;
        }
        if !self.arrays.tex_coords.is_empty() {
            features |= Features::TEXTURE_COORDINATES;
        }
        if !self.arrays.colors.is_empty() {
            features |= Features::COLORS;
        }
        features
    }
}

fn invalid(reason: impl Into<String>) -> GeometryError {
    GeometryError::InvalidGeometry(reason.into())
}

fn validate(topology: Topology, arrays: &MeshArrays) -> Result<()> {
    let vertex_count = arrays.positions.len();

    // Optional attributes are either absent or one per vertex
    let attributes = [
        ("normals", arrays.normals.len()),
        ("tex_coords", arrays.tex_coords.len()),
        ("colors", arrays.colors.len()),
    ];
    for (name, len) in attributes {
        if len != 0 && len != vertex_count {
            return Err(invalid(format!(
                "{name} has {len} entries, expected {vertex_count}"
            )));
        }
    }

    if topology.is_indexed() {
        if let Some(&bad) = arrays.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(invalid(format!(
                "index {bad} out of range for {vertex_count} vertices"
            )));
        }
    } else if !arrays.indices.is_empty() {
        return Err(invalid(format!("{topology} must not carry indices")));
    }

    // Elements are indices for indexed topologies, vertices otherwise
    let element_count = if topology.is_indexed() {
        arrays.indices.len()
    } else {
        vertex_count
    };

    if topology.is_strip() {
        if let Some(&short) = arrays.strip_lengths.iter().find(|&&len| len < 3) {
            return Err(invalid(format!("strip of length {short} (minimum 3)")));
        }
        let total: usize = arrays.strip_lengths.iter().map(|&len| len as usize).sum();
        if total != element_count {
            return Err(invalid(format!(
                "strip lengths sum to {total}, expected {element_count}"
            )));
        }
    } else {
        if !arrays.strip_lengths.is_empty() {
            return Err(invalid(format!("{topology} must not carry strip lengths")));
        }
        if element_count % 3 != 0 {
            return Err(invalid(format!(
                "{topology} needs a multiple of 3 elements, got {element_count}"
            )));
        }
    }

    Ok(())
}
