use crate::prelude::*;

/// Pinhole camera. `ray_through` maps normalized window coordinates in
/// [0,1]^2 (origin at the lower left) to a primary ray.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    pub eye: Point3,
    look: Vec3,
    u: Vec3,
    v: Vec3,
    vfov: f64,
    aspect_ratio: f64,
}

impl Camera {
    pub fn new(look_from: Point3, look_at: Point3, v_up: Vec3, vfov: f64, aspect_ratio: f64) -> Camera {
        let look = (look_at - look_from).normalize();
        let side = look.cross(v_up).normalize();
        let up = side.cross(look);

        // vfov is given in degrees
        let normalized_height = 2.0 * (vfov.to_radians() / 2.0).tan();
        Camera {
            eye: look_from,
            look,
            u: side * normalized_height * aspect_ratio,
            v: up * normalized_height,
            vfov,
            aspect_ratio,
        }
    }

    pub fn ray_through(&self, x: f64, y: f64) -> Ray {
        let direction = (self.look + (x - 0.5) * self.u + (y - 0.5) * self.v).normalize();
        Ray::new(self.eye, direction, Color::ONE, RayKind::Visibility)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn with_aspect_ratio(self, aspect_ratio: f64) -> Camera {
        let up = self.v.normalize();
        let normalized_height = 2.0 * (self.vfov.to_radians() / 2.0).tan();
        Camera {
            u: self.u.normalize() * normalized_height * aspect_ratio,
            v: up * normalized_height,
            aspect_ratio,
            ..self
        }
    }
}

impl Default for Camera {
    fn default() -> Camera {
        Camera::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::ZERO,
            Vec3::Y,
            45.0,
            1.0,
        )
    }
}
