//! Wavefront OBJ output
//!
//! Vertex arrays are written as stored, so indexed constructs keep their
//! shared vertices. Faces follow the order and winding each topology is
//! drawn with, which keeps strip triangles facing the way they render.
//! Vertex colors use the common `v x y z r g b` extension; alpha is dropped.

use anyhow::{Context, Result};
use glam::Vec3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use nether_geom::{
    Colors, GeometryRequest, GeometrySink, MeshConstruct, MeshSummary, TexCoords,
    drawn_triangles,
};

/// Sink writing one `<name>.obj` per construct into a directory
#[derive(Debug)]
pub struct ObjWriter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl ObjWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}

impl GeometrySink for ObjWriter {
    type Error = anyhow::Error;

    fn accept(
        &mut self,
        name: &str,
        construct: MeshConstruct,
        _request: &GeometryRequest,
    ) -> Result<()> {
        let path = self.dir.join(format!("{name}.obj"));
        tracing::info!("Writing mesh: {} -> {:?}", name, path);

        let file =
            File::create(&path).with_context(|| format!("Failed to create file: {:?}", path))?;
        let mut out = BufWriter::new(file);
        write_obj(&mut out, name, &construct)?;
        out.flush()
            .with_context(|| format!("Failed to write file: {:?}", path))?;

        self.written.push(path);
        Ok(())
    }
}

/// Write `mesh` as a single OBJ object
pub fn write_obj<W: Write>(out: &mut W, name: &str, mesh: &MeshConstruct) -> Result<()> {
    writeln!(out, "# {}", MeshSummary::of(mesh))?;
    writeln!(out, "o {name}")?;

    for (i, p) in mesh.positions().iter().enumerate() {
        match color_rgb(mesh.colors(), i) {
            Some(c) => writeln!(out, "v {} {} {} {} {} {}", p.x, p.y, p.z, c.x, c.y, c.z)?,
            None => writeln!(out, "v {} {} {}", p.x, p.y, p.z)?,
        }
    }
    match mesh.tex_coords() {
        TexCoords::None => {}
        TexCoords::Two(st) => {
            for t in st {
                writeln!(out, "vt {} {}", t.x, t.y)?;
            }
        }
        TexCoords::Three(coords) => {
            for t in coords {
                writeln!(out, "vt {} {} {}", t.x, t.y, t.z)?;
            }
        }
    }
    for n in mesh.normals() {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    let has_vt = !mesh.tex_coords().is_empty();
    let has_vn = !mesh.normals().is_empty();
    for tri in drawn_triangles(mesh) {
        writeln!(
            out,
            "f {} {} {}",
            face_vertex(tri[0], has_vt, has_vn),
            face_vertex(tri[1], has_vt, has_vn),
            face_vertex(tri[2], has_vt, has_vn)
        )?;
    }
    Ok(())
}

fn color_rgb(colors: &Colors, i: usize) -> Option<Vec3> {
    match colors {
        Colors::None => None,
        Colors::Rgb(c) => c.get(i).copied(),
        Colors::Rgba(c) => c.get(i).map(|c| c.truncate()),
    }
}

/// OBJ indices are 1-based
fn face_vertex(index: u32, has_vt: bool, has_vn: bool) -> String {
    let i = index + 1;
    match (has_vt, has_vn) {
        (true, true) => format!("{i}/{i}/{i}"),
        (true, false) => format!("{i}/{i}"),
        (false, true) => format!("{i}//{i}"),
        (false, false) => format!("{i}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nether_geom::{Cuboid, Disk, Features, Rectangle, Shape, Sphere, Topology};

    fn render(name: &str, construct: &MeshConstruct) -> String {
        let mut out = Vec::new();
        write_obj(&mut out, name, construct).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn count(text: &str, prefix: &str) -> usize {
        text.lines().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn test_face_vertex() {
        assert_eq!(face_vertex(0, true, true), "1/1/1");
        assert_eq!(face_vertex(4, false, true), "5//5");
        assert_eq!(face_vertex(4, true, false), "5/5");
        assert_eq!(face_vertex(9, false, false), "10");
    }

    #[test]
    fn test_cuboid_positions_only() {
        let cube = Cuboid::new(1.0, 1.0, 1.0)
            .build(&GeometryRequest::coordinates())
            .unwrap();
        let text = render("cube", &cube);

        assert!(text.contains("o cube"));
        assert_eq!(count(&text, "v "), 36);
        assert_eq!(count(&text, "vn "), 0);
        assert_eq!(count(&text, "f "), 12);
        assert!(text.lines().any(|l| l == "f 1 2 3"));
    }

    #[test]
    fn test_indexed_list_shares_vertices() {
        let disk = Disk::new(1.0, 8)
            .generate(Topology::IndexedTriangleList, &GeometryRequest::textured())
            .unwrap();
        let text = render("plate", &disk);

        assert_eq!(count(&text, "v "), 9);
        assert_eq!(count(&text, "vt "), 9);
        assert_eq!(count(&text, "vn "), 9);
        assert_eq!(count(&text, "f "), 8);
    }

    #[test]
    fn test_strips_keep_shared_vertices() {
        let sphere = Sphere::new(1.0, 4, 2)
            .build(&GeometryRequest::new(Features::NORMALS))
            .unwrap();
        let text = render("ball", &sphere);

        assert!(text.starts_with("# indexed-triangle-strip"));
        assert_eq!(count(&text, "v "), 15);
        assert_eq!(count(&text, "f "), 16);
    }

    #[test]
    fn test_strip_faces_use_draw_winding() {
        let quad = Rectangle::new(1.0, 1.0)
            .build(&GeometryRequest::coordinates())
            .unwrap();
        let text = render("quad", &quad);

        let faces: Vec<_> = text.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces, ["f 1 2 3", "f 3 2 4"]);
    }

    #[test]
    fn test_colors_written_inline() {
        let cube = Cuboid::new(1.0, 1.0, 1.0)
            .build(&GeometryRequest::new(Features::COLORS).with_color_alpha(true))
            .unwrap();
        let text = render("cube", &cube);

        let first = text.lines().find(|l| l.starts_with("v ")).unwrap();
        assert_eq!(first.split_whitespace().count(), 7);
    }
}
