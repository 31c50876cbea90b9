//! Generation requests
//!
//! A [`GeometryRequest`] tells a generator which per-vertex attributes to fill
//! in. It is a pure per-call input; nothing here is persisted between calls.

use crate::error::{GeometryError, Result};

bitflags::bitflags! {
    /// Per-vertex attributes a generator should populate
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u8 {
        /// Vertex positions (always produced, kept for feature-set round trips)
        const COORDINATES = 0b0000_0001;
        /// Unit-length vertex normals
        const NORMALS = 0b0000_0010;
        /// 2D or 3D texture coordinates
        const TEXTURE_COORDINATES = 0b0000_0100;
        /// RGB or RGBA vertex colors
        const COLORS = 0b0000_1000;
    }
}

/// Texture coordinate dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TexCoordSize {
    /// (s, t)
    #[default]
    Two,
    /// (s, t, r)
    Three,
}

impl TexCoordSize {
    /// Map an integer dimensionality (2 or 3) to a size
    pub fn from_dimension(dimension: u32) -> Result<Self> {
        match dimension {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(GeometryError::InvalidParameter {
                parameter: "tex_coord_size",
                reason: format!("must be 2 or 3, got {other}"),
            }),
        }
    }

    /// Number of components per coordinate
    pub fn dimension(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

/// Summary of an appearance, as far as geometry generation cares.
///
/// Textures and colors belong to the material system; generators only need to
/// know whether they exist and what shape of coordinates they want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppearanceHints {
    /// Dimensionality of the bound texture, if any
    pub texture: Option<TexCoordSize>,
    /// Per-vertex colors are consumed by the material
    pub vertex_colors: bool,
    /// Vertex colors carry an alpha channel
    pub color_alpha: bool,
    /// The material is lit and therefore needs normals
    pub lit: bool,
}

/// Per-call feature request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryRequest {
    pub features: Features,
    pub color_alpha: bool,
    pub tex_coord_size: TexCoordSize,
}

impl GeometryRequest {
    /// Request the given features with RGB colors and 2D texture coordinates
    pub fn new(features: Features) -> Self {
        Self {
            features: features | Features::COORDINATES,
            color_alpha: false,
            tex_coord_size: TexCoordSize::Two,
        }
    }

    /// Positions only
    pub fn coordinates() -> Self {
        Self::new(Features::COORDINATES)
    }

    /// Positions, normals, and 2D texture coordinates
    pub fn textured() -> Self {
        Self::new(Features::NORMALS | Features::TEXTURE_COORDINATES)
    }

    /// Positions, normals, and RGB vertex colors
    pub fn colored() -> Self {
        Self::new(Features::NORMALS | Features::COLORS)
    }

    /// Derive the request from an appearance summary
    pub fn from_appearance(hints: &AppearanceHints) -> Self {
        let mut features = Features::COORDINATES;
        if hints.lit {
            features |= Features::NORMALS;
        }
        if hints.texture.is_some() {
            features |= Features::TEXTURE_COORDINATES;
        }
        if hints.vertex_colors {
            features |= Features::COLORS;
        }

        Self {
            features,
            color_alpha: hints.vertex_colors && hints.color_alpha,
            tex_coord_size: hints.texture.unwrap_or_default(),
        }
    }

    pub fn with_color_alpha(mut self, color_alpha: bool) -> Self {
        self.color_alpha = color_alpha;
        self
    }

    pub fn with_tex_coord_size(mut self, size: TexCoordSize) -> Self {
        self.tex_coord_size = size;
        self
    }

    pub fn wants_normals(&self) -> bool {
        self.features.contains(Features::NORMALS)
    }

    pub fn wants_tex_coords(&self) -> bool {
        self.features.contains(Features::TEXTURE_COORDINATES)
    }

    pub fn wants_colors(&self) -> bool {
        self.features.contains(Features::COLORS)
    }
}

impl Default for GeometryRequest {
    fn default() -> Self {
        Self::coordinates()
    }
}
