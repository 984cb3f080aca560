//! Small in-memory asset files shared by the unit tests

use std::path::{Path, PathBuf};

/// Unit quad in the XY plane with texcoords and one shared normal
pub const QUAD_OBJ: &str = "\
# quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

/// Little-endian positions of the unit triangle (0,0,0), (1,0,0), (0,1,0)
fn triangle_bin() -> Vec<u8> {
    let mut bin = Vec::new();
    for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    bin
}

/// glTF JSON for the unit triangle mesh
///
/// `nodes` is the node array (scene 0 has node 0 as its only root) and
/// `extra` is appended as further top-level members, starting with a comma.
fn triangle_json(buffer_uri: Option<&str>, nodes: &str, extra: &str) -> String {
    let uri = buffer_uri
        .map(|uri| format!(r#","uri":"{}""#, uri))
        .unwrap_or_default();
    format!(
        concat!(
            r#"{{"asset":{{"version":"2.0"}},"#,
            r#""buffers":[{{"byteLength":36{uri}}}],"#,
            r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36}}],"#,
            r#""accessors":[{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}}],"#,
            r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}}}}]}}],"#,
            r#""nodes":{nodes},"scenes":[{{"nodes":[0]}}],"scene":0{extra}}}"#
        ),
        uri = uri,
        nodes = nodes,
        extra = extra
    )
}

/// Binary glTF with one non-indexed triangle: (0,0,0), (1,0,0), (0,1,0)
pub fn triangle_glb() -> Vec<u8> {
    let mut bin = triangle_bin();
    let mut json = triangle_json(None, r#"[{"mesh":0}]"#, "").into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(&bin);
    glb
}

/// Write `name` as a .gltf with an external `tri.bin` buffer next to it
pub fn write_triangle_gltf(dir: &Path, name: &str, nodes: &str, extra: &str) -> PathBuf {
    std::fs::write(dir.join("tri.bin"), triangle_bin()).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, triangle_json(Some("tri.bin"), nodes, extra)).unwrap();
    path
}

/// Write a PNG whose pixel (x, y) is `[x, y, 200, 128]`
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbaImage::from_fn(width, height, |x, y| image::Rgba([x as u8, y as u8, 200, 128]))
        .save(&path)
        .unwrap();
    path
}

/// Write a 1x1 24-bit uncompressed BMP holding one blue pixel
pub fn write_bmp(dir: &Path, name: &str) -> PathBuf {
    let mut bmp = Vec::with_capacity(58);
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&58u32.to_le_bytes());
    bmp.extend_from_slice(&0u32.to_le_bytes());
    bmp.extend_from_slice(&54u32.to_le_bytes());
    // BITMAPINFOHEADER
    bmp.extend_from_slice(&40u32.to_le_bytes());
    bmp.extend_from_slice(&1i32.to_le_bytes());
    bmp.extend_from_slice(&1i32.to_le_bytes());
    bmp.extend_from_slice(&1u16.to_le_bytes());
    bmp.extend_from_slice(&24u16.to_le_bytes());
    bmp.extend_from_slice(&0u32.to_le_bytes());
    bmp.extend_from_slice(&4u32.to_le_bytes());
    bmp.extend_from_slice(&[0; 16]);
    // BGR row padded to four bytes
    bmp.extend_from_slice(&[255, 0, 0, 0]);

    let path = dir.join(name);
    std::fs::write(&path, bmp).unwrap();
    path
}

/// MagicaVoxel file with a single model; the optional palette maps entry i to `(i, 0, 0, 255)`
pub fn vox_file(size: [u32; 3], voxels: &[([u8; 3], u8)], palette: bool) -> Vec<u8> {
    fn chunk(out: &mut Vec<u8>, id: &[u8; 4], content: &[u8]) {
        out.extend_from_slice(id);
        out.extend_from_slice(&(content.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(content);
    }

    let mut children = Vec::new();

    let size_content: Vec<u8> = size.iter().flat_map(|v| v.to_le_bytes()).collect();
    chunk(&mut children, b"SIZE", &size_content);

    let mut xyzi = (voxels.len() as u32).to_le_bytes().to_vec();
    for (p, color) in voxels {
        xyzi.extend_from_slice(&[p[0], p[1], p[2], *color]);
    }
    chunk(&mut children, b"XYZI", &xyzi);

    if palette {
        let rgba: Vec<u8> = (0..=255u8).flat_map(|i| [i, 0, 0, 255]).collect();
        chunk(&mut children, b"RGBA", &rgba);
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"VOX ");
    out.extend_from_slice(&150u32.to_le_bytes());
    out.extend_from_slice(b"MAIN");
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(children.len() as u32).to_le_bytes());
    out.extend_from_slice(&children);
    out
}
