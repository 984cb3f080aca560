//! MagicaVoxel `.vox` importer
//!
//! Reads the first model's `SIZE`/`XYZI` chunks and the optional `RGBA`
//! palette, then emits a single mesh of unit cubes with faces between two
//! filled voxels culled. Voxel space is Z-up; the mesh is rotated to Y-up and
//! centred on the X/Z footprint.

use std::collections::HashMap;
use std::path::Path;

use super::{LoadError, MeshData};

const MAGIC: &[u8; 4] = b"VOX ";
/// Channel levels of the four ramps closing MagicaVoxel's default palette
const RAMP_LEVELS: [u8; 10] = [0xee, 0xdd, 0xbb, 0xaa, 0x88, 0x77, 0x55, 0x44, 0x22, 0x11];

/// Face normal plus the two edge vectors spanning it (u x v = normal), and the corner offset
struct Face {
    normal: [i32; 3],
    base: [f32; 3],
    u: [f32; 3],
    v: [f32; 3],
}

const FACES: [Face; 6] = [
    Face { normal: [1, 0, 0], base: [1.0, 0.0, 0.0], u: [0.0, 1.0, 0.0], v: [0.0, 0.0, 1.0] },
    Face { normal: [-1, 0, 0], base: [0.0, 0.0, 0.0], u: [0.0, 0.0, 1.0], v: [0.0, 1.0, 0.0] },
    Face { normal: [0, 1, 0], base: [0.0, 1.0, 0.0], u: [0.0, 0.0, 1.0], v: [1.0, 0.0, 0.0] },
    Face { normal: [0, -1, 0], base: [0.0, 0.0, 0.0], u: [1.0, 0.0, 0.0], v: [0.0, 0.0, 1.0] },
    Face { normal: [0, 0, 1], base: [0.0, 0.0, 1.0], u: [1.0, 0.0, 0.0], v: [0.0, 1.0, 0.0] },
    Face { normal: [0, 0, -1], base: [0.0, 0.0, 0.0], u: [0.0, 1.0, 0.0], v: [1.0, 0.0, 0.0] },
];

/// Little-endian cursor over the file bytes
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], String> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| format!("unexpected end of file at byte {}", self.offset))?;
        let slice = &self.data[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn u32(&mut self) -> Result<u32, String> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn tag(&mut self) -> Result<[u8; 4], String> {
        let bytes = self.take(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }
}

struct VoxModel {
    size: [u32; 3],
    voxels: Vec<([u8; 3], u8)>,
    palette: Option<Vec<[u8; 4]>>,
}

fn parse(data: &[u8]) -> Result<VoxModel, String> {
    let mut reader = Reader::new(data);
    if &reader.tag()? != MAGIC {
        return Err("missing 'VOX ' header".to_string());
    }
    let _version = reader.u32()?;

    if &reader.tag()? != b"MAIN" {
        return Err("missing MAIN chunk".to_string());
    }
    let main_content = reader.u32()? as usize;
    let _main_children = reader.u32()?;
    reader.take(main_content)?;

    let mut size = None;
    let mut voxels = None;
    let mut palette = None;

    while reader.remaining() >= 12 {
        let id = reader.tag()?;
        let content_len = reader.u32()? as usize;
        let children_len = reader.u32()? as usize;
        let mut content = Reader::new(reader.take(content_len)?);
        reader.take(children_len)?;

        match &id {
            b"SIZE" if size.is_none() => {
                size = Some([content.u32()?, content.u32()?, content.u32()?]);
            }
            // Only the first model is imported; later SIZE/XYZI pairs are other frames
            b"XYZI" if voxels.is_none() => {
                let count = content.u32()? as usize;
                let mut list = Vec::with_capacity(count.min(content.remaining() / 4));
                for _ in 0..count {
                    let v = content.take(4)?;
                    list.push(([v[0], v[1], v[2]], v[3]));
                }
                voxels = Some(list);
            }
            b"RGBA" => {
                let mut colors = Vec::with_capacity(256);
                for _ in 0..256 {
                    let c = content.take(4)?;
                    colors.push([c[0], c[1], c[2], c[3]]);
                }
                palette = Some(colors);
            }
            _ => {}
        }
    }

    Ok(VoxModel {
        size: size.ok_or("missing SIZE chunk")?,
        voxels: voxels.ok_or("missing XYZI chunk")?,
        palette,
    })
}

/// MagicaVoxel's built-in palette, used when a file has no `RGBA` chunk
///
/// Indices 1..=215 walk a 6x6x6 color cube from white (blue varies fastest,
/// black left out); 216..=255 are red, green, blue and gray ramps.
fn default_color(color_index: u8) -> [u8; 4] {
    match color_index {
        0 => [0, 0, 0, 0],
        1..=215 => {
            let step = color_index - 1;
            let level = |s: u8| 255 - 51 * s;
            [level(step / 36), level(step / 6 % 6), level(step % 6), 255]
        }
        _ => {
            let k = color_index - 216;
            let level = RAMP_LEVELS[usize::from(k % 10)];
            match k / 10 {
                0 => [level, 0, 0, 255],
                1 => [0, level, 0, 255],
                2 => [0, 0, level, 255],
                _ => [level, level, level, 255],
            }
        }
    }
}

fn color_for(palette: Option<&[[u8; 4]]>, color_index: u8) -> [f32; 4] {
    // Palette entry i holds color index i + 1
    let rgba = match palette {
        Some(p) => p
            .get(usize::from(color_index.saturating_sub(1)))
            .copied()
            .unwrap_or_else(|| default_color(color_index)),
        None => default_color(color_index),
    };
    rgba.map(|channel| channel as f32 / 255.0)
}

fn build_mesh(model: &VoxModel) -> MeshData {
    let occupied: HashMap<[i32; 3], u8> = model
        .voxels
        .iter()
        .map(|(p, c)| ([p[0] as i32, p[1] as i32, p[2] as i32], *c))
        .collect();

    let half_x = model.size[0] as f32 / 2.0;
    let half_y = model.size[1] as f32 / 2.0;
    // Z-up voxel space to Y-up: (x, y, z) -> (x, z, -y), a rotation so winding is kept
    let rotate = |p: [f32; 3]| [p[0], p[2], -p[1]];
    let to_world = |p: [f32; 3]| rotate([p[0] - half_x, p[1] - half_y, p[2]]);

    let mut mesh = MeshData {
        positions: Vec::new(),
        normals: Some(Vec::new()),
        uvs: None,
        colors: Some(Vec::new()),
        indices: Some(Vec::new()),
    };

    // Sort for deterministic output regardless of hash order
    let mut cells: Vec<(&[i32; 3], &u8)> = occupied.iter().collect();
    cells.sort();

    for (cell, &color_index) in cells {
        let color = color_for(model.palette.as_deref(), color_index);
        for face in &FACES {
            let neighbor = [
                cell[0] + face.normal[0],
                cell[1] + face.normal[1],
                cell[2] + face.normal[2],
            ];
            if occupied.contains_key(&neighbor) {
                continue;
            }

            let origin = [
                cell[0] as f32 + face.base[0],
                cell[1] as f32 + face.base[1],
                cell[2] as f32 + face.base[2],
            ];
            let corners = [
                origin,
                add(origin, face.u),
                add(add(origin, face.u), face.v),
                add(origin, face.v),
            ];
            let normal = rotate(face.normal.map(|n| n as f32));

            let start = mesh.positions.len() as u32;
            for corner in corners {
                mesh.positions.push(to_world(corner));
                if let Some(normals) = mesh.normals.as_mut() {
                    normals.push(normal);
                }
                if let Some(colors) = mesh.colors.as_mut() {
                    colors.push(color);
                }
            }
            if let Some(indices) = mesh.indices.as_mut() {
                indices.extend_from_slice(&[start, start + 1, start + 2, start, start + 2, start + 3]);
            }
        }
    }

    mesh
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn read_vox(path: &Path) -> Result<Vec<MeshData>, LoadError> {
    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let model = parse(&data).map_err(|reason| LoadError::Malformed {
        format: "VOX",
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(vec![build_mesh(&model)])
}
