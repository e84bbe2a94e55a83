use crate::hittable::Isect;
use crate::prelude::*;
use crate::scene::Scene;

pub type MaterialId = usize;

/// Diffuse color source, sampled by the hit's uv coordinates.
#[derive(Clone, Debug)]
pub enum Texture {
    Solid(Color),
    Checker { odd: Color, even: Color, scale: f64 },
    Image(ImageTexture),
}

impl Texture {
    pub fn sample(&self, uv: (f64, f64)) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker { odd, even, scale } => {
                let u = (uv.0 * scale).floor() as i64;
                let v = (uv.1 * scale).floor() as i64;
                if (u + v).rem_euclid(2) == 0 {
                    *even
                } else {
                    *odd
                }
            }
            Texture::Image(image) => image.sample(uv),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImageTexture {
    pub data: Vec<Color>,
    pub width: usize,
    pub height: usize,
}

impl ImageTexture {
    pub fn sample(&self, uv: (f64, f64)) -> Color {
        let u = uv.0.clamp(0.0, 1.0 - f64::EPSILON);
        let v = uv.1.clamp(0.0, 1.0 - f64::EPSILON);
        let x = (u * self.width as f64) as usize;
        let y = (v * self.height as f64) as usize;
        self.data[y * self.width + x]
    }
}

/// Phong material. Reflective and transmissive coefficients drive the
/// recursive contributions; the diffuse term may be texture mapped.
#[derive(Clone, Debug)]
pub struct Material {
    pub ke: Color,
    pub ka: Color,
    pub diffuse: Texture,
    pub ks: Color,
    pub kr: Color,
    pub kt: Color,
    pub shininess: f64,
    pub index: f64,
}

impl Material {
    pub fn diffuse(color: Color) -> Material {
        Material {
            ke: Color::ZERO,
            ka: Color::ZERO,
            diffuse: Texture::Solid(color),
            ks: Color::ZERO,
            kr: Color::ZERO,
            kt: Color::ZERO,
            shininess: 1.0,
            index: 1.0,
        }
    }

    pub fn refl(&self) -> bool {
        self.kr != Color::ZERO
    }

    pub fn trans(&self) -> bool {
        self.kt != Color::ZERO
    }

    pub fn kd(&self, i: &Isect) -> Color {
        self.diffuse.sample(i.uv)
    }

    /// Direct illumination: emissive + ambient plus, per light, the
    /// shadow- and distance-attenuated diffuse and specular terms.
    pub fn shade(&self, scene: &Scene, r: &Ray, i: &Isect) -> Color {
        let p = r.at(i.t);
        let n = i.normal.normalize();
        let v = -r.direction.normalize();

        let mut color = self.ke + self.ka * scene.ambient();

        for light in scene.lights() {
            let l = light.direction(p);
            let attenuation = light.distance_attenuation(p) * light.shadow_attenuation(scene, p);

            let diffuse = self.kd(i) * n.dot(l).max(0.0);
            let reflected = (2.0 * n.dot(l) * n - l).normalize();
            let specular = self.ks * v.dot(reflected).max(0.0).powf(self.shininess);

            color += attenuation * (diffuse + specular);
        }
        color
    }
}
