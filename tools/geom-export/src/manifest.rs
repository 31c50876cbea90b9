//! Manifest parsing and build orchestration
//!
//! Parses geometry.toml and drives shape generation into a sink.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use nether_geom::config::GeometryConfigFile;
use nether_geom::{
    Features, GeometryConfig, GeometryRequest, GeometrySink, MeshConstruct, MeshSummary, Shape,
    ShapeParams, SummarySink, TexCoordSize, Topology,
};

use crate::obj::ObjWriter;

/// Root manifest structure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
    #[serde(flatten)]
    pub config: GeometryConfigFile,
    #[serde(default)]
    pub shapes: Vec<ShapeEntry>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("meshes/")
}

/// One `[[shapes]]` table: shape parameters plus how to generate them
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShapeEntry {
    pub name: String,
    #[serde(flatten)]
    pub params: ShapeParams,
    /// Forces a topology instead of the configured preference
    #[serde(default)]
    pub topology: Option<Topology>,
    #[serde(default = "default_features")]
    pub features: Vec<FeatureName>,
    /// Colors carry an alpha channel
    #[serde(default)]
    pub color_alpha: bool,
    #[serde(default = "default_tex_coord_size")]
    pub tex_coord_size: u32,
}

fn default_features() -> Vec<FeatureName> {
    vec![FeatureName::Normals]
}

fn default_tex_coord_size() -> u32 {
    2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureName {
    Coordinates,
    Normals,
    #[serde(alias = "uv")]
    TextureCoordinates,
    Colors,
}

impl FeatureName {
    pub fn flag(self) -> Features {
        match self {
            FeatureName::Coordinates => Features::COORDINATES,
            FeatureName::Normals => Features::NORMALS,
            FeatureName::TextureCoordinates => Features::TEXTURE_COORDINATES,
            FeatureName::Colors => Features::COLORS,
        }
    }
}

impl ShapeEntry {
    pub fn request(&self) -> Result<GeometryRequest> {
        let features = self
            .features
            .iter()
            .fold(Features::COORDINATES, |acc, f| acc | f.flag());
        let size = TexCoordSize::from_dimension(self.tex_coord_size)
            .with_context(|| format!("Shape '{}' has an invalid tex-coord-size", self.name))?;

        Ok(GeometryRequest::new(features)
            .with_color_alpha(self.color_alpha)
            .with_tex_coord_size(size))
    }

    /// Generate the construct, honoring the entry's topology override
    pub fn generate(&self, config: &GeometryConfig) -> Result<(MeshConstruct, GeometryRequest)> {
        let request = self.request()?;
        let construct = match self.topology {
            Some(topology) => self.params.generate(topology, &request),
            None => self.params.create_geometry(config, &request),
        }
        .with_context(|| format!("Failed to generate shape '{}'", self.name))?;
        Ok((construct, request))
    }
}

impl Manifest {
    pub fn geometry_config(&self) -> Result<GeometryConfig> {
        GeometryConfig::from_file(&self.config).context("Invalid [preferred-topology] table")
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    Ok(manifest)
}

/// Names become file stems, so they must be unique and path-free
pub fn validate(manifest: &Manifest) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in &manifest.shapes {
        if entry.name.is_empty() || entry.name.contains(['/', '\\']) {
            anyhow::bail!("Invalid shape name: {:?}", entry.name);
        }
        if !seen.insert(entry.name.as_str()) {
            anyhow::bail!("Duplicate shape name: '{}'", entry.name);
        }
    }
    Ok(())
}

/// Feed every shape of the manifest to `sink`
pub fn generate_into<S>(manifest: &Manifest, sink: &mut S) -> Result<()>
where
    S: GeometrySink,
    anyhow::Error: From<S::Error>,
{
    validate(manifest)?;
    let config = manifest.geometry_config()?;

    for entry in &manifest.shapes {
        let (construct, request) = entry.generate(&config)?;
        tracing::debug!("{}: {}", entry.name, MeshSummary::of(&construct));
        sink.accept(&entry.name, construct, &request)?;
    }
    Ok(())
}

/// Generate everything without writing, returning per-shape counts
pub fn check(manifest: &Manifest) -> Result<Vec<(String, MeshSummary)>> {
    let mut sink = SummarySink::default();
    generate_into(manifest, &mut sink)?;
    for (name, summary) in &sink.entries {
        tracing::info!("{}: {}", name, summary);
    }
    Ok(sink.entries)
}

/// Build all shapes from a manifest, returning the written files
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<Vec<PathBuf>> {
    let output_dir = output_override.unwrap_or(&manifest.output);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut writer = ObjWriter::new(output_dir);
    generate_into(manifest, &mut writer)?;
    Ok(writer.into_written())
}
