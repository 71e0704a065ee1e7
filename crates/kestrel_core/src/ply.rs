//! ASCII PLY mesh loading.
//!
//! Supports `format ascii 1.0` with a `vertex` element carrying `x`, `y`,
//! `z` properties and a `face` element carrying a vertex index list.
//! Polygons are fan-triangulated. Other elements are read and discarded.

use std::path::Path;

use kestrel_math::Vec3;
use thiserror::Error;

use crate::mesh::MeshData;

/// Errors that can occur while loading a PLY file.
#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid PLY header at line {line}: {message}")]
    Header { line: usize, message: String },

    #[error("Unsupported PLY format: {0}")]
    Unsupported(String),

    #[error("PLY body ended early: expected {expected} {element} entries, found {found}")]
    Truncated {
        element: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid value at line {line}: {value:?}")]
    InvalidValue { line: usize, value: String },

    #[error("Face at line {line} references vertex {index}, but only {count} vertices exist")]
    IndexOutOfRange {
        line: usize,
        index: usize,
        count: usize,
    },
}

/// Result type for PLY operations.
pub type PlyResult<T> = Result<T, PlyError>;

#[derive(Debug)]
struct ElementHeader {
    name: String,
    count: usize,
    properties: Vec<String>,
}

/// Load a PLY file from disk.
pub fn load_ply(path: impl AsRef<Path>) -> PlyResult<MeshData> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mesh = parse_ply_str(&content)?;

    log::info!(
        "Loaded {:?}: {} vertices, {} triangles",
        path,
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

/// Parse ASCII PLY content.
pub fn parse_ply_str(content: &str) -> PlyResult<MeshData> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()));

    let elements = parse_header(&mut lines)?;

    let mut positions = Vec::new();
    let mut indices = Vec::new();
    let mut body = lines.filter(|(_, line)| !line.is_empty());

    for element in &elements {
        for found in 0..element.count {
            let (line_num, line) = body.next().ok_or_else(|| PlyError::Truncated {
                element: element.name.clone(),
                expected: element.count,
                found,
            })?;

            match element.name.as_str() {
                "vertex" => positions.push(parse_vertex(element, line_num, line)?),
                "face" => parse_face(line_num, line, &positions, &mut indices)?,
                _ => {}
            }
        }
    }

    Ok(MeshData::new(positions, indices))
}

fn parse_header<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> PlyResult<Vec<ElementHeader>> {
    match lines.next() {
        Some((_, "ply")) => {}
        other => {
            let line = other.map_or(1, |(line, _)| line);
            return Err(header_error(line, "missing 'ply' magic"));
        }
    }

    let mut elements: Vec<ElementHeader> = Vec::new();

    let mut last_line = 1;
    for (line_num, line) in lines {
        last_line = line_num;
        let mut words = line.split_whitespace();
        match words.next() {
            Some("end_header") => return validate_header(elements, line_num),
            Some("format") => match words.next() {
                Some("ascii") => {}
                Some(other) => return Err(PlyError::Unsupported(other.to_string())),
                None => return Err(header_error(line_num, "format line has no type")),
            },
            Some("element") => {
                let name = words
                    .next()
                    .ok_or_else(|| header_error(line_num, "element without a name"))?;
                let count = words
                    .next()
                    .and_then(|c| c.parse().ok())
                    .ok_or_else(|| header_error(line_num, "element without a valid count"))?;
                elements.push(ElementHeader {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            Some("property") => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| header_error(line_num, "property before any element"))?;
                let name = words
                    .last()
                    .ok_or_else(|| header_error(line_num, "property without a name"))?;
                element.properties.push(name.to_string());
            }
            Some("comment" | "obj_info") | None => {}
            Some(other) => {
                return Err(header_error(line_num, &format!("unknown keyword '{other}'")))
            }
        }
    }

    Err(header_error(last_line, "missing end_header"))
}

fn validate_header(elements: Vec<ElementHeader>, line: usize) -> PlyResult<Vec<ElementHeader>> {
    if let Some(vertex) = elements.iter().find(|e| e.name == "vertex") {
        for axis in ["x", "y", "z"] {
            if !vertex.properties.iter().any(|p| p == axis) {
                return Err(header_error(line, &format!("vertex element has no '{axis}' property")));
            }
        }
    }
    Ok(elements)
}

fn header_error(line: usize, message: &str) -> PlyError {
    PlyError::Header {
        line,
        message: message.to_string(),
    }
}

fn parse_vertex(element: &ElementHeader, line_num: usize, line: &str) -> PlyResult<Vec3> {
    let values = line
        .split_whitespace()
        .map(|v| {
            v.parse::<f32>().map_err(|_| PlyError::InvalidValue {
                line: line_num,
                value: v.to_string(),
            })
        })
        .collect::<PlyResult<Vec<f32>>>()?;

    let component = |axis: &str| -> PlyResult<f32> {
        element
            .properties
            .iter()
            .position(|p| p == axis)
            .and_then(|i| values.get(i).copied())
            .ok_or_else(|| PlyError::InvalidValue {
                line: line_num,
                value: line.to_string(),
            })
    };

    Ok(Vec3::new(component("x")?, component("y")?, component("z")?))
}

fn parse_face(
    line_num: usize,
    line: &str,
    positions: &[Vec3],
    indices: &mut Vec<u32>,
) -> PlyResult<()> {
    let values = line
        .split_whitespace()
        .map(|v| {
            v.parse::<usize>().map_err(|_| PlyError::InvalidValue {
                line: line_num,
                value: v.to_string(),
            })
        })
        .collect::<PlyResult<Vec<usize>>>()?;

    let Some((&count, rest)) = values.split_first() else {
        return Ok(());
    };
    let polygon = rest.get(..count).ok_or_else(|| PlyError::InvalidValue {
        line: line_num,
        value: line.to_string(),
    })?;

    if let Some(&index) = polygon.iter().find(|&&i| i >= positions.len()) {
        return Err(PlyError::IndexOutOfRange {
            line: line_num,
            index,
            count: positions.len(),
        });
    }

    // Fan triangulation: (0, i, i + 1)
    for i in 1..polygon.len().saturating_sub(1) {
        indices.extend_from_slice(&[polygon[0] as u32, polygon[i] as u32, polygon[i + 1] as u32]);
    }

    Ok(())
}
