//! Wavefront OBJ importer
//!
//! Handles `v`, `vt`, `vn`, `f` and `o`. Polygon faces are triangulated with a
//! fan, each `o` starts a new mesh, and material libraries are ignored since
//! the viewer binds its own diffuse texture.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{LoadError, MeshData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

/// Mesh under construction, deduplicating `v/vt/vn` triplets
#[derive(Default)]
struct MeshBuilder {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
    lookup: HashMap<VertexKey, u32>,
    has_uvs: bool,
    has_normals: bool,
}

impl MeshBuilder {
    fn vertex(&mut self, key: VertexKey, pos: &[[f32; 3]], tex: &[[f32; 2]], nor: &[[f32; 3]]) -> u32 {
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }

        let index = self.positions.len() as u32;
        self.positions.push(pos[key.position]);
        // OBJ texture space has a bottom-left origin
        self.uvs.push(key.uv.map(|i| [tex[i][0], 1.0 - tex[i][1]]).unwrap_or([0.0, 0.0]));
        self.normals.push(key.normal.map(|i| nor[i]).unwrap_or([0.0, 0.0, 0.0]));
        self.has_uvs |= key.uv.is_some();
        self.has_normals |= key.normal.is_some();
        self.lookup.insert(key, index);
        index
    }

    fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn finish(self) -> MeshData {
        MeshData {
            positions: self.positions,
            normals: self.has_normals.then_some(self.normals),
            uvs: self.has_uvs.then_some(self.uvs),
            colors: None,
            indices: Some(self.indices),
        }
    }
}

/// Resolve a 1-based (or negative, relative) OBJ index against the current list length
fn resolve_index(token: &str, len: usize) -> Option<usize> {
    let idx: i64 = token.parse().ok()?;
    let resolved = if idx > 0 {
        idx - 1
    } else if idx < 0 {
        len as i64 + idx
    } else {
        return None;
    };
    (0..len as i64).contains(&resolved).then_some(resolved as usize)
}

fn parse_floats<const N: usize>(it: &mut std::str::SplitWhitespace<'_>) -> [f32; N] {
    let mut out = [0.0; N];
    for value in out.iter_mut() {
        *value = it.next().and_then(|t| t.parse().ok()).unwrap_or(0.0);
    }
    out
}

pub fn read_obj(path: &Path) -> Result<Vec<MeshData>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let malformed = |line_no: usize, reason: String| LoadError::Malformed {
        format: "OBJ",
        path: path.to_path_buf(),
        reason: format!("line {}: {}", line_no, reason),
    };

    let file = File::open(path).map_err(io_err)?;
    let reader = BufReader::new(file);

    let mut pos: Vec<[f32; 3]> = Vec::new();
    let mut tex: Vec<[f32; 2]> = Vec::new();
    let mut nor: Vec<[f32; 3]> = Vec::new();

    let mut meshes = Vec::new();
    let mut current = MeshBuilder::default();

    for (line_idx, line) in reader.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = line.map_err(io_err)?;
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }

        let mut it = s.split_whitespace();
        let tag = it.next().unwrap_or("");
        match tag {
            "v" => pos.push(parse_floats::<3>(&mut it)),
            "vt" => tex.push(parse_floats::<2>(&mut it)),
            "vn" => nor.push(parse_floats::<3>(&mut it)),
            "o" => {
                if !current.is_empty() {
                    meshes.push(std::mem::take(&mut current).finish());
                }
            }
            "f" => {
                let mut face = Vec::with_capacity(4);
                for token in it {
                    let mut parts = token.split('/');
                    let position = parts
                        .next()
                        .and_then(|t| resolve_index(t, pos.len()))
                        .ok_or_else(|| malformed(line_no, format!("bad vertex reference '{}'", token)))?;
                    let uv = match parts.next() {
                        Some(t) if !t.is_empty() => Some(
                            resolve_index(t, tex.len())
                                .ok_or_else(|| malformed(line_no, format!("bad texcoord reference '{}'", token)))?,
                        ),
                        _ => None,
                    };
                    let normal = match parts.next() {
                        Some(t) if !t.is_empty() => Some(
                            resolve_index(t, nor.len())
                                .ok_or_else(|| malformed(line_no, format!("bad normal reference '{}'", token)))?,
                        ),
                        _ => None,
                    };
                    face.push(current.vertex(VertexKey { position, uv, normal }, &pos, &tex, &nor));
                }

                if face.len() < 3 {
                    return Err(malformed(line_no, format!("face with {} vertices", face.len())));
                }
                for i in 1..face.len() - 1 {
                    current.indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                }
            }
            // mtllib, usemtl, g, s and friends carry nothing the viewer uses
            _ => {}
        }
    }

    if !current.is_empty() {
        meshes.push(current.finish());
    }

    Ok(meshes)
}
