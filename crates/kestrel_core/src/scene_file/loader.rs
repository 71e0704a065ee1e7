//! High-level scene file loading.
//!
//! Interprets the element tree from the reader as a [`SceneDescription`].

use std::path::{Path, PathBuf};

use kestrel_math::Vec3;

use crate::scene::{
    BsdfDescription, BsdfKind, CameraDescription, EmitterDescription, MeshTransform,
    SceneDescription, ShapeDescription,
};
use crate::scene_file::parser::{parse_elements, ParseError, ParseResult};
use crate::scene_file::types::Element;

/// Load a scene file from disk.
///
/// Relative mesh paths are resolved against the scene file's directory.
pub fn load_scene(path: impl AsRef<Path>) -> ParseResult<SceneDescription> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mut scene = parse_scene_str(&content)?;

    if let Some(dir) = path.parent() {
        scene.resolve_paths(dir);
    }
    scene.name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    log::info!(
        "Loaded scene '{}': {} bsdfs, {} shapes, {} emitters",
        scene.name,
        scene.bsdf_count(),
        scene.shape_count(),
        scene.emitter_count()
    );

    Ok(scene)
}

/// Parse scene file content.
pub fn parse_scene_str(content: &str) -> ParseResult<SceneDescription> {
    let root = parse_elements(content)?;
    if root.name != "scene" {
        return Err(ParseError::UnexpectedRoot(root.name));
    }

    let mut camera = None;
    let mut scene = SceneDescription::default();

    for child in &root.children {
        match child.name.as_str() {
            "camera" | "sensor" => {
                if camera.is_some() {
                    log::warn!("Line {}: more than one camera, using the last", child.line);
                }
                camera = Some(parse_camera(child)?);
            }
            "emitter" => {
                if let Some(emitter) = parse_emitter(child)? {
                    scene.emitters.push(emitter);
                }
            }
            "bsdf" => {
                if let Some(bsdf) = parse_bsdf(child)? {
                    scene.bsdfs.push(bsdf);
                }
            }
            "shape" => {
                if let Some(shape) = parse_shape(child, &mut scene.bsdfs)? {
                    scene.shapes.push(shape);
                }
            }
            other => log::warn!("Line {}: unknown element <{}>, skipping", child.line, other),
        }
    }

    scene.camera = camera.ok_or(ParseError::MissingCamera)?;
    Ok(scene)
}

fn parse_camera(element: &Element) -> ParseResult<CameraDescription> {
    if let Some(kind) = element.attr("type") {
        if kind != "perspective" {
            log::warn!(
                "Line {}: camera type '{}' is not supported, treating it as perspective",
                element.line,
                kind
            );
        }
    }

    let mut camera = CameraDescription::default();

    if let Some(fov) = element.property("fov") {
        camera.fov = float_value(fov)?;
    }
    if let Some(width) = element.property("width") {
        camera.width = integer_value(width)?;
    }
    if let Some(height) = element.property("height") {
        camera.height = integer_value(height)?;
    }
    if let Some(lookat) = element.find("lookat") {
        camera.origin = vector_attr(lookat, "origin")?;
        camera.target = vector_attr(lookat, "target")?;
        camera.up = match lookat.attr("up") {
            Some(up) => parse_vec3(up, lookat.line)?,
            None => Vec3::Y,
        };
    }

    Ok(camera)
}

fn parse_emitter(element: &Element) -> ParseResult<Option<EmitterDescription>> {
    match element.attr("type") {
        Some("point") => {}
        other => {
            log::warn!(
                "Line {}: emitter type {:?} is not supported, skipping",
                element.line,
                other.unwrap_or("")
            );
            return Ok(None);
        }
    }

    let mut emitter = EmitterDescription::default();
    if let Some(position) = element.property("position") {
        emitter.position = vector_value(position)?;
    }
    if let Some(intensity) = element.property("intensity") {
        emitter.intensity = vector_value(intensity)?;
    }

    Ok(Some(emitter))
}

fn parse_bsdf(element: &Element) -> ParseResult<Option<BsdfDescription>> {
    let id = element.attr("id").unwrap_or_default();

    let kind = match element.attr("type") {
        Some("lambertian" | "diffuse") => {
            let color = element
                .property("color")
                .or_else(|| element.property("reflectance"))
                .map(vector_value)
                .transpose()?
                .unwrap_or(Vec3::ZERO);
            BsdfKind::Lambertian { color }
        }
        Some("conductor") => {
            let eta = element
                .property("eta")
                .map(vector_value)
                .transpose()?
                .unwrap_or(Vec3::ONE);
            BsdfKind::Conductor { eta }
        }
        other => {
            log::warn!(
                "Line {}: bsdf type {:?} is not supported, skipping",
                element.line,
                other.unwrap_or("")
            );
            return Ok(None);
        }
    };

    Ok(Some(BsdfDescription::new(id, kind)))
}

/// Parse a shape. A `<bsdf>` nested in the shape is registered under a
/// generated id and referenced from the shape.
fn parse_shape(
    element: &Element,
    bsdfs: &mut Vec<BsdfDescription>,
) -> ParseResult<Option<ShapeDescription>> {
    let mut bsdf_ref = element
        .find("ref")
        .map(|r| {
            r.attr("id")
                .map(str::to_string)
                .ok_or_else(|| missing(r, "id"))
        })
        .transpose()?;

    if let Some(inline) = element.children.iter().find(|c| c.name == "bsdf") {
        if let Some(mut bsdf) = parse_bsdf(inline)? {
            if bsdf.id.is_empty() {
                bsdf.id = format!("__inline_line_{}", inline.line);
            }
            bsdf_ref.get_or_insert_with(|| bsdf.id.clone());
            bsdfs.push(bsdf);
        }
    }

    let shape = match element.attr("type") {
        Some("sphere") => {
            let center = element
                .property("center")
                .map(vector_value)
                .transpose()?
                .unwrap_or(Vec3::ZERO);
            let radius = element
                .property("radius")
                .map(float_value)
                .transpose()?
                .unwrap_or(1.0);
            ShapeDescription::Sphere {
                center,
                radius,
                bsdf_ref,
            }
        }
        Some("ply") => {
            let filename = match element.property("filename") {
                Some(f) => PathBuf::from(f.attr("value").ok_or_else(|| missing(f, "value"))?),
                None => {
                    log::error!("Line {}: ply shape has no filename, skipping", element.line);
                    return Ok(None);
                }
            };
            ShapeDescription::Ply {
                filename,
                bsdf_ref,
                transform: parse_mesh_transform(element)?,
            }
        }
        other => {
            log::warn!(
                "Line {}: shape type {:?} is not supported, skipping",
                element.line,
                other.unwrap_or("")
            );
            return Ok(None);
        }
    };

    Ok(Some(shape))
}

fn parse_mesh_transform(element: &Element) -> ParseResult<Option<MeshTransform>> {
    let scale = element.find("scale").map(|s| vector_attr(s, "value")).transpose()?;
    let translate = element
        .find("translate")
        .map(|t| vector_attr(t, "value"))
        .transpose()?;

    if scale.is_none() && translate.is_none() {
        return Ok(None);
    }

    Ok(Some(MeshTransform {
        scale: scale.unwrap_or(Vec3::ONE),
        translate: translate.unwrap_or(Vec3::ZERO),
    }))
}

fn missing(element: &Element, attribute: &str) -> ParseError {
    ParseError::MissingAttribute {
        element: element.name.clone(),
        attribute: attribute.to_string(),
        line: element.line,
    }
}

fn value_attr(element: &Element) -> ParseResult<&str> {
    element.attr("value").ok_or_else(|| missing(element, "value"))
}

fn float_value(element: &Element) -> ParseResult<f32> {
    let raw = value_attr(element)?;
    raw.trim().parse().map_err(|_| ParseError::InvalidNumber {
        value: raw.to_string(),
        line: element.line,
    })
}

fn integer_value(element: &Element) -> ParseResult<u32> {
    let raw = value_attr(element)?;
    raw.trim().parse().map_err(|_| ParseError::InvalidNumber {
        value: raw.to_string(),
        line: element.line,
    })
}

fn vector_value(element: &Element) -> ParseResult<Vec3> {
    parse_vec3(value_attr(element)?, element.line)
}

fn vector_attr(element: &Element, key: &str) -> ParseResult<Vec3> {
    let raw = element.attr(key).ok_or_else(|| missing(element, key))?;
    parse_vec3(raw, element.line)
}

/// Parse `"x, y, z"` (commas and/or whitespace). A single number is splatted.
pub fn parse_vec3(raw: &str, line: usize) -> ParseResult<Vec3> {
    let invalid = || ParseError::InvalidVector {
        value: raw.to_string(),
        line,
    };

    let parts = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f32>().map_err(|_| invalid()))
        .collect::<ParseResult<Vec<f32>>>()?;

    match parts.as_slice() {
        [v] => Ok(Vec3::splat(*v)),
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"<scene>
    <!-- Camera -->
    <camera type="perspective">
        <float name="fov" value="45"/>
        <integer name="width" value="320"/>
        <integer name="height" value="240"/>
        <transform name="toWorld">
            <lookat origin="0, 1, 5" target="0, 0, 0" up="0, 1, 0"/>
        </transform>
    </camera>

    <emitter type="point">
        <point name="position" value="2, 4, 1"/>
        <rgb name="intensity" value="10, 10, 10"/>
    </emitter>

    <bsdf type="lambertian" id="red">
        <rgb name="color" value="0.8, 0.1, 0.1"/>
    </bsdf>
    <bsdf type="conductor" id="mirror">
        <rgb name="eta" value="0.9, 0.9, 0.9"/>
    </bsdf>

    <shape type="sphere">
        <point name="center" value="0, 0, -1"/>
        <float name="radius" value="0.5"/>
        <ref id="red"/>
    </shape>

    <shape type="ply">
        <string name="filename" value="meshes/bunny.ply"/>
        <ref id="mirror"/>
        <transform name="toWorld">
            <scale value="2, 2, 2"/>
            <translate value="0, -1, 0"/>
        </transform>
    </shape>
</scene>"#;

    #[test]
    fn test_parse_full_scene() {
        let scene = parse_scene_str(SCENE).unwrap();

        assert_eq!(scene.camera.fov, 45.0);
        assert_eq!(scene.camera.width, 320);
        assert_eq!(scene.camera.height, 240);
        assert_eq!(scene.camera.origin, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(scene.camera.target, Vec3::ZERO);
        assert_eq!(scene.camera.up, Vec3::Y);

        assert_eq!(
            scene.emitters,
            vec![EmitterDescription {
                position: Vec3::new(2.0, 4.0, 1.0),
                intensity: Vec3::splat(10.0),
            }]
        );

        assert_eq!(scene.bsdf_count(), 2);
        assert_eq!(
            scene.find_bsdf("red").map(|b| &b.kind),
            Some(&BsdfKind::Lambertian {
                color: Vec3::new(0.8, 0.1, 0.1)
            })
        );
        assert_eq!(
            scene.find_bsdf("mirror").map(|b| &b.kind),
            Some(&BsdfKind::Conductor {
                eta: Vec3::splat(0.9)
            })
        );

        assert_eq!(scene.shape_count(), 2);
        assert_eq!(
            scene.shapes[0],
            ShapeDescription::Sphere {
                center: Vec3::new(0.0, 0.0, -1.0),
                radius: 0.5,
                bsdf_ref: Some("red".to_string()),
            }
        );
        assert_eq!(
            scene.shapes[1],
            ShapeDescription::Ply {
                filename: PathBuf::from("meshes/bunny.ply"),
                bsdf_ref: Some("mirror".to_string()),
                transform: Some(MeshTransform {
                    scale: Vec3::splat(2.0),
                    translate: Vec3::new(0.0, -1.0, 0.0),
                }),
            }
        );
    }

    #[test]
    fn test_nested_film_properties() {
        let scene = parse_scene_str(
            r#"<scene>
<sensor type="perspective">
    <float name="fov" value="30"/>
    <film type="hdrfilm">
        <integer name="width" value="64"/>
        <integer name="height" value="32"/>
    </film>
</sensor>
</scene>"#,
        )
        .unwrap();

        assert_eq!(scene.camera.width, 64);
        assert_eq!(scene.camera.height, 32);
        assert_eq!(scene.camera.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_missing_camera_is_an_error() {
        let err = parse_scene_str("<scene><emitter type=\"point\"/></scene>").unwrap_err();
        assert!(matches!(err, ParseError::MissingCamera));
    }

    #[test]
    fn test_wrong_root() {
        let err = parse_scene_str("<world/>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedRoot(ref name) if name == "world"));
    }

    #[test]
    fn test_emitter_defaults() {
        let scene =
            parse_scene_str("<scene><camera/><emitter type=\"point\"></emitter></scene>").unwrap();
        assert_eq!(scene.emitters, vec![EmitterDescription::default()]);
    }

    #[test]
    fn test_unknown_entries_are_skipped() {
        let scene = parse_scene_str(
            r#"<scene>
<camera/>
<integrator type="path"/>
<emitter type="area"/>
<bsdf type="dielectric" id="glass"/>
<shape type="cube"/>
<shape type="sphere"/>
</scene>"#,
        )
        .unwrap();

        assert!(scene.emitters.is_empty());
        assert!(scene.bsdfs.is_empty());
        assert_eq!(
            scene.shapes,
            vec![ShapeDescription::Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
                bsdf_ref: None,
            }]
        );
    }

    #[test]
    fn test_inline_bsdf_gets_generated_ref() {
        let scene = parse_scene_str(
            r#"<scene>
<camera/>
<shape type="sphere">
    <bsdf type="diffuse">
        <rgb name="reflectance" value="0.5"/>
    </bsdf>
</shape>
</scene>"#,
        )
        .unwrap();

        let bsdf_ref = scene.shapes[0].bsdf_ref().unwrap();
        assert_eq!(bsdf_ref, "__inline_line_4");
        assert_eq!(
            scene.find_bsdf(bsdf_ref).map(|b| &b.kind),
            Some(&BsdfKind::Lambertian {
                color: Vec3::splat(0.5)
            })
        );
    }

    #[test]
    fn test_invalid_number_reports_line() {
        let err = parse_scene_str(
            "<scene>\n<camera>\n<float name=\"fov\" value=\"wide\"/>\n</camera>\n</scene>",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 3, .. }));
    }

    #[test]
    fn test_ref_without_id() {
        let err = parse_scene_str("<scene><camera/><shape type=\"sphere\"><ref/></shape></scene>")
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingAttribute { ref attribute, .. } if attribute == "id"
        ));
    }

    #[test]
    fn test_parse_vec3_forms() {
        assert_eq!(parse_vec3("1, 2, 3", 1).unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(parse_vec3("1 2 3", 1).unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(parse_vec3(" 0.25 ", 1).unwrap(), Vec3::splat(0.25));
        assert!(matches!(
            parse_vec3("1, 2", 7),
            Err(ParseError::InvalidVector { line: 7, .. })
        ));
        assert!(parse_vec3("1, x, 3", 1).is_err());
    }

    #[test]
    fn test_load_scene_resolves_mesh_paths() {
        let dir = std::env::temp_dir().join(format!("kestrel_load_scene_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bunny_scene.xml");
        std::fs::write(&path, SCENE).unwrap();

        let scene = load_scene(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(scene.name, "bunny_scene");
        match &scene.shapes[1] {
            ShapeDescription::Ply { filename, .. } => {
                assert_eq!(filename, &dir.join("meshes/bunny.ply"))
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_load_scene_missing_file() {
        let err = load_scene("/definitely/not/here.xml").unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
