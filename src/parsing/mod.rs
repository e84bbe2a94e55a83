use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::camera::Camera;
use crate::geometry::{Primitive, Sphere, Triangle};
use crate::light::Light;
use crate::material::{ImageTexture, Material, Texture};
use crate::prelude::*;
use crate::scene::{CubeMap, Scene};

/// Every way scene loading can fail at the boundary. The driver reports
/// these through the log sink and drops the partial scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("couldn't read scene file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("syntax error in scene file: {0}")]
    Syntax(#[from] toml::de::Error),
    #[error("parser: fatal error: {0}")]
    Parser(String),
    #[error("texture mapping error: {0}")]
    TextureMapping(String),
}

#[derive(Deserialize, Clone, Debug)]
pub struct SceneData {
    pub camera: CameraData,
    #[serde(default)]
    pub ambient: [f64; 3],
    #[serde(default)]
    pub lights: Vec<LightData>,
    #[serde(default)]
    pub materials: HashMap<String, MaterialData>,
    #[serde(default)]
    pub objects: Vec<ObjectData>,
    pub cubemap: Option<CubeMapData>,
}

#[derive(Deserialize, Copy, Clone, Debug)]
pub struct CameraData {
    pub look_from: [f64; 3],
    pub look_at: [f64; 3],
    #[serde(default = "default_up")]
    pub up: [f64; 3],
    #[serde(default = "default_vfov")]
    pub vfov: f64,
}

fn default_up() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}

fn default_vfov() -> f64 {
    45.0
}

#[derive(Deserialize, Copy, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LightData {
    Directional {
        orientation: [f64; 3],
        color: [f64; 3],
    },
    Point {
        position: [f64; 3],
        color: [f64; 3],
        #[serde(default)]
        constant: f64,
        #[serde(default)]
        linear: f64,
        #[serde(default)]
        quadratic: f64,
    },
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct MaterialData {
    pub ke: [f64; 3],
    pub ka: [f64; 3],
    pub kd: [f64; 3],
    pub ks: [f64; 3],
    pub kr: [f64; 3],
    pub kt: [f64; 3],
    pub shininess: Option<f64>,
    pub index: Option<f64>,
    pub checker: Option<CheckerData>,
    pub texture: Option<String>,
}

#[derive(Deserialize, Copy, Clone, Debug)]
pub struct CheckerData {
    pub odd: [f64; 3],
    pub even: [f64; 3],
    pub scale: f64,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectData {
    Sphere {
        center: [f64; 3],
        radius: f64,
        material: String,
    },
    Triangle {
        vertices: [[f64; 3]; 3],
        uvs: Option<[[f64; 2]; 3]>,
        material: String,
    },
    /// four coplanar corners in winding order, lowered to two triangles
    Quad {
        corners: [[f64; 3]; 4],
        material: String,
    },
}

#[derive(Deserialize, Clone, Debug)]
pub struct CubeMapData {
    pub posx: String,
    pub negx: String,
    pub posy: String,
    pub negy: String,
    pub posz: String,
    pub negz: String,
}

pub fn load_scene(filepath: &str) -> Result<Scene, SceneError> {
    let mut input = String::new();
    File::open(filepath)
        .and_then(|mut f| f.read_to_string(&mut input))
        .map_err(|source| SceneError::Unreadable {
            path: filepath.to_string(),
            source,
        })?;

    // textures and cube map faces resolve relative to the scene file
    let base = Path::new(filepath).parent().unwrap_or(Path::new("."));
    let data: SceneData = toml::from_str(&input)?;
    construct_scene(data, base)
}

pub fn construct_scene(data: SceneData, base: &Path) -> Result<Scene, SceneError> {
    let mut names: Vec<&String> = data.materials.keys().collect();
    names.sort();
    let mut ids = HashMap::new();
    let mut materials = Vec::with_capacity(names.len());
    for name in names {
        ids.insert(name.clone(), materials.len());
        materials.push(build_material(&data.materials[name], base)?);
    }

    let resolve = |name: &str| {
        ids.get(name)
            .copied()
            .ok_or_else(|| SceneError::Parser(format!("unknown material '{}'", name)))
    };

    let mut objects = Vec::new();
    for object in &data.objects {
        match object {
            ObjectData::Sphere {
                center,
                radius,
                material,
            } => {
                if *radius <= 0.0 {
                    return Err(SceneError::Parser(format!(
                        "sphere radius must be positive, got {}",
                        radius
                    )));
                }
                objects.push(Primitive::from(Sphere::new(
                    Point3::from(*center),
                    *radius,
                    resolve(material)?,
                )));
            }
            ObjectData::Triangle {
                vertices,
                uvs,
                material,
            } => {
                let id = resolve(material)?;
                let vertices = vertices.map(Point3::from);
                objects.push(Primitive::from(match uvs {
                    Some(uvs) => {
                        Triangle::with_uvs(vertices, uvs.map(|uv| (uv[0], uv[1])), id)
                    }
                    None => Triangle::new(vertices, id),
                }));
            }
            ObjectData::Quad { corners, material } => {
                let id = resolve(material)?;
                let [a, b, c, d] = corners.map(Point3::from);
                objects.push(Primitive::from(Triangle::with_uvs(
                    [a, b, c],
                    [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
                    id,
                )));
                objects.push(Primitive::from(Triangle::with_uvs(
                    [a, c, d],
                    [(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
                    id,
                )));
            }
        }
    }

    let lights = data
        .lights
        .iter()
        .map(|light| match *light {
            LightData::Directional { orientation, color } => Light::Directional {
                orientation: Vec3::from(orientation).normalize(),
                color: Color::from(color),
            },
            LightData::Point {
                position,
                color,
                constant,
                linear,
                quadratic,
            } => Light::Point {
                position: Point3::from(position),
                color: Color::from(color),
                constant,
                linear,
                quadratic,
            },
        })
        .collect();

    let camera = Camera::new(
        Point3::from(data.camera.look_from),
        Point3::from(data.camera.look_at),
        Vec3::from(data.camera.up),
        data.camera.vfov,
        1.0,
    );

    let cubemap = match &data.cubemap {
        Some(faces) => Some(CubeMap::new([
            load_face(base, &faces.posx)?,
            load_face(base, &faces.negx)?,
            load_face(base, &faces.posy)?,
            load_face(base, &faces.negy)?,
            load_face(base, &faces.posz)?,
            load_face(base, &faces.negz)?,
        ])),
        None => None,
    };

    Ok(Scene::new(
        objects,
        materials,
        lights,
        camera,
        Color::from(data.ambient),
        cubemap,
    ))
}

fn build_material(data: &MaterialData, base: &Path) -> Result<Material, SceneError> {
    let diffuse = if let Some(path) = &data.texture {
        Texture::Image(load_image(base, path)?)
    } else if let Some(checker) = &data.checker {
        Texture::Checker {
            odd: Color::from(checker.odd),
            even: Color::from(checker.even),
            scale: checker.scale,
        }
    } else {
        Texture::Solid(Color::from(data.kd))
    };

    Ok(Material {
        ke: Color::from(data.ke),
        ka: Color::from(data.ka),
        diffuse,
        ks: Color::from(data.ks),
        kr: Color::from(data.kr),
        kt: Color::from(data.kt),
        shininess: data.shininess.unwrap_or(64.0),
        index: data.index.unwrap_or(1.0),
    })
}

fn load_face(base: &Path, path: &str) -> Result<ImageTexture, SceneError> {
    load_image(base, path)
}

fn load_image(base: &Path, path: &str) -> Result<ImageTexture, SceneError> {
    let full: PathBuf = base.join(path);
    let image = image::open(&full)
        .map_err(|e| {
            SceneError::TextureMapping(format!("{}: {}", full.to_string_lossy(), e))
        })?
        .into_rgb8();
    let (width, height) = (image.width() as usize, image.height() as usize);
    let data = image
        .pixels()
        .map(|p| {
            Color::new(
                p.0[0] as f64 / 255.0,
                p.0[1] as f64 / 255.0,
                p.0[2] as f64 / 255.0,
            )
        })
        .collect();
    info!("loaded texture {} ({}x{})", full.to_string_lossy(), width, height);
    Ok(ImageTexture {
        data,
        width,
        height,
    })
}
