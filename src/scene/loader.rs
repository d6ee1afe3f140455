//! Plain text scene formats.
//!
//! Mesh: a `<vertices> <triangles>` header, one `x y z` line per vertex, then one `i j k` line per
//! triangle with 1-based indices. Camera: six lines N, V, d, hx, hy, C. Lighting: eight lines
//! Iamb, Ka, Il, Pl, Kd, Od, Ks, eta. Camera and lighting lines may be labelled (`Ka = 0.2`).
//! Blank lines are ignored everywhere.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use super::{read_text, wavefront, LightingParams, Mesh};
use crate::camera::Camera;
use crate::util::Vector3f;

/// Non-empty line with its 1-based line number in the file.
struct Line<'a> {
    number: usize,
    text: &'a str,
}

fn content_lines(text: &str) -> Vec<Line<'_>> {
    return text
        .lines()
        .enumerate()
        .map(|(i, line)| Line { number: i + 1, text: line.trim() })
        .filter(|line| !line.text.is_empty())
        .collect();
}

/// Drops a `label =` prefix if there is one.
fn strip_label(text: &str) -> &str {
    return match text.split_once('=') {
        Some((_, value)) => value.trim(),
        None => text,
    };
}

fn parse_floats(line: &Line, what: &str) -> Result<Vec<f32>> {
    return strip_label(line.text)
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f32>()
                .with_context(|| format!("line {}: {} has invalid number '{}'", line.number, what, token))
        })
        .collect();
}

fn parse_vector(line: &Line, what: &str) -> Result<Vector3f> {
    let values = parse_floats(line, what)?;
    if values.len() != 3 {
        bail!("line {}: {} needs 3 components, got {}", line.number, what, values.len());
    }
    return Ok(Vector3f::new(values[0], values[1], values[2]));
}

fn parse_scalar(line: &Line, what: &str) -> Result<f32> {
    let values = parse_floats(line, what)?;
    if values.len() != 1 {
        bail!("line {}: {} needs a single value, got {}", line.number, what, values.len());
    }
    return Ok(values[0]);
}

fn parse_indices(line: &Line, vertex_count: usize) -> Result<[usize; 3]> {
    let values = line
        .text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .with_context(|| format!("line {}: invalid vertex index '{}'", line.number, token))
        })
        .collect::<Result<Vec<usize>>>()?;
    if values.len() != 3 {
        bail!("line {}: triangle needs 3 indices, got {}", line.number, values.len());
    }
    let mut triangle = [0; 3];
    for (i, index) in values.into_iter().enumerate() {
        // Indices in the file start at 1.
        if index == 0 || index > vertex_count {
            bail!(
                "line {}: vertex index {} out of range 1..={}",
                line.number,
                index,
                vertex_count
            );
        }
        triangle[i] = index - 1;
    }
    return Ok(triangle);
}

pub fn parse_mesh(text: &str) -> Result<Mesh> {
    let lines = content_lines(text);
    let header = lines.first().ok_or_else(|| anyhow!("mesh is empty"))?;
    let counts = header
        .text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .with_context(|| format!("line {}: invalid count '{}'", header.number, token))
        })
        .collect::<Result<Vec<usize>>>()?;
    if counts.len() != 2 {
        bail!("line {}: header needs vertex and triangle counts", header.number);
    }
    let (vertex_count, triangle_count) = (counts[0], counts[1]);
    let needed = 1usize
        .checked_add(vertex_count)
        .and_then(|n| n.checked_add(triangle_count))
        .ok_or_else(|| anyhow!("line {}: vertex and triangle counts are too large", header.number))?;
    if lines.len() < needed {
        bail!(
            "mesh declares {} vertices and {} triangles, but has only {} data lines",
            vertex_count,
            triangle_count,
            lines.len() - 1
        );
    }
    if lines.len() > needed {
        log::warn!("Ignoring {} trailing lines after the last triangle", lines.len() - needed);
    }

    let vertices = lines[1..1 + vertex_count]
        .iter()
        .map(|line| parse_vector(line, "vertex"))
        .collect::<Result<Vec<Vector3f>>>()?;
    let triangles = lines[1 + vertex_count..needed]
        .iter()
        .map(|line| parse_indices(line, vertex_count))
        .collect::<Result<Vec<[usize; 3]>>>()?;

    return Ok(Mesh::new(vertices, triangles));
}

pub fn parse_camera(text: &str) -> Result<Camera> {
    let lines = content_lines(text);
    if lines.len() != 6 {
        bail!("camera needs exactly 6 lines (N, V, d, hx, hy, C), got {}", lines.len());
    }
    let camera = Camera {
        n: parse_vector(&lines[0], "N")?,
        v: parse_vector(&lines[1], "V")?,
        d: parse_scalar(&lines[2], "d")?,
        hx: parse_scalar(&lines[3], "hx")?,
        hy: parse_scalar(&lines[4], "hy")?,
        c: parse_vector(&lines[5], "C")?,
    };
    if camera.is_degenerate() {
        bail!("camera N and V are parallel, no right axis");
    }
    if camera.hx == 0.0 || camera.hy == 0.0 {
        bail!("camera hx and hy must be non-zero");
    }
    return Ok(camera);
}

pub fn parse_lighting(text: &str) -> Result<LightingParams> {
    let lines = content_lines(text);
    if lines.len() != 8 {
        bail!(
            "lighting needs exactly 8 lines (Iamb, Ka, Il, Pl, Kd, Od, Ks, eta), got {}",
            lines.len()
        );
    }
    return Ok(LightingParams {
        iamb: parse_vector(&lines[0], "Iamb")?,
        ka: parse_scalar(&lines[1], "Ka")?,
        il: parse_vector(&lines[2], "Il")?,
        pl: parse_vector(&lines[3], "Pl")?,
        kd: parse_vector(&lines[4], "Kd")?,
        od: parse_vector(&lines[5], "Od")?,
        ks: parse_scalar(&lines[6], "Ks")?,
        eta: parse_scalar(&lines[7], "eta")?,
    });
}

/// Loads a mesh, `.obj` files through the Wavefront loader, anything else as the text format.
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    let is_obj = path
        .extension()
        .map_or(false, |extension| extension.eq_ignore_ascii_case("obj"));
    let mesh = if is_obj {
        wavefront::load_obj_mesh(path)?
    } else {
        parse_mesh(&read_text(path)?).with_context(|| format!("invalid mesh {}", path.display()))?
    };
    mesh.validate()
        .with_context(|| format!("invalid mesh {}", path.display()))?;
    log::info!("Number of vertices  - {}", mesh.vertices.len());
    log::info!("Number of triangles - {}", mesh.triangles.len());
    return Ok(mesh);
}

pub fn load_camera(path: &Path) -> Result<Camera> {
    return parse_camera(&read_text(path)?).with_context(|| format!("invalid camera {}", path.display()));
}

pub fn load_lighting(path: &Path) -> Result<LightingParams> {
    return parse_lighting(&read_text(path)?)
        .with_context(|| format!("invalid lighting {}", path.display()));
}
