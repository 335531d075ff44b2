//! `.vert` mesh loader
//!
//! Line oriented, one record per line:
//!
//! ```text
//! # comment
//! n <name>
//! v px py pz nx ny nz r g b u v
//! i a b c
//! ```
//!
//! Short or malformed records are skipped with a debug log; the loader never
//! fails on content, only on IO.

use super::mesh::{Mesh, Vertex};
use super::AssetError;
use crate::foundation::math::{Vec2, Vec3};
use std::path::Path;

/// Parser for the `.vert` format
pub struct VertLoader;

impl VertLoader {
    /// Load a `.vert` file; an `n` record overrides `fallback_name`
    pub fn load(path: impl AsRef<Path>, fallback_name: &str) -> Result<Mesh, AssetError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mesh = Self::parse(&contents, fallback_name);
        log::trace!(
            "Loaded mesh '{}' from {}: {} vertices, {} triangles",
            mesh.name,
            path.display(),
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    /// Parse `.vert` text
    pub fn parse(contents: &str, fallback_name: &str) -> Mesh {
        let mut name = fallback_name.to_string();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (line_number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(tag) = tokens.next() else { continue };
            let rest: Vec<&str> = tokens.collect();

            match tag {
                "n" => {
                    if let Some(declared) = rest.first() {
                        name = (*declared).to_string();
                    }
                }
                "v" => match parse_floats::<11>(&rest) {
                    Some(v) => vertices.push(Vertex {
                        position: Vec3::new(v[0], v[1], v[2]),
                        normal: Vec3::new(v[3], v[4], v[5]),
                        color: Vec3::new(v[6], v[7], v[8]),
                        tex_coords: Vec2::new(v[9], v[10]),
                    }),
                    None => log::debug!("Skipping malformed vertex on line {}", line_number + 1),
                },
                "i" => {
                    let triangle: Option<Vec<u32>> = rest.iter().take(3).map(|t| t.parse().ok()).collect();
                    match triangle {
                        Some(triangle) if triangle.len() == 3 => indices.extend(triangle),
                        _ => log::debug!("Skipping malformed index record on line {}", line_number + 1),
                    }
                }
                other => log::debug!("Unknown record '{}' on line {}", other, line_number + 1),
            }
        }

        Mesh::new(name, vertices, indices)
    }
}

fn parse_floats<const N: usize>(tokens: &[&str]) -> Option<[f32; N]> {
    if tokens.len() < N {
        return None;
    }
    let mut values = [0.0; N];
    for (value, token) in values.iter_mut().zip(tokens) {
        *value = token.parse().ok()?;
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TRIANGLE: &str = "\
# a single triangle
n tri
v -1 0 0  0 0 1  1 0 0  0 0
v  1 0 0  0 0 1  0 1 0  1 0
v  0 2 0  0 0 1  0 0 1  0.5 1
i 0 1 2
";

    #[test]
    fn parses_records_and_bounds() {
        let mesh = VertLoader::parse(TRIANGLE, "fallback");
        assert_eq!(mesh.name, "tri");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_relative_eq!(mesh.vertices[2].tex_coords, Vec2::new(0.5, 1.0));
        assert_relative_eq!(mesh.min_bounds, Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(mesh.max_bounds, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn skips_malformed_records() {
        let mesh = VertLoader::parse("v 1 2 3\ni 0 x 2\nq what\nv 0 0 0 0 1 0 1 1 1 0 0\n", "loose");
        assert_eq!(mesh.name, "loose");
        assert_eq!(mesh.vertices.len(), 1);
        assert!(mesh.indices.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let result = VertLoader::load("definitely/not/here.vert", "missing");
        assert!(matches!(result, Err(AssetError::Io { .. })));
    }
}
