use crate::aabb::{BoundingBox, HasBoundingBox};
use crate::hittable::{Hittable, Isect};
use crate::material::MaterialId;
use crate::prelude::*;

#[derive(Copy, Clone, Debug)]
pub struct Triangle {
    pub vertices: [Point3; 3],
    pub uvs: [(f64, f64); 3],
    pub material: MaterialId,
}

impl Triangle {
    pub fn new(vertices: [Point3; 3], material: MaterialId) -> Triangle {
        // barycentric uvs when the scene doesn't provide any
        Triangle {
            vertices,
            uvs: [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
            material,
        }
    }

    pub fn with_uvs(vertices: [Point3; 3], uvs: [(f64, f64); 3], material: MaterialId) -> Triangle {
        Triangle {
            vertices,
            uvs,
            material,
        }
    }

    pub fn face_normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a).normalize()
    }
}

impl HasBoundingBox for Triangle {
    fn bounding_box(&self) -> BoundingBox {
        let [a, b, c] = self.vertices;
        BoundingBox::new(a.min(b).min(c), a.max(b).max(c))
    }
}

impl Hittable for Triangle {
    // Moller-Trumbore
    fn intersect(&self, r: &Ray) -> Option<Isect> {
        let [a, b, c] = self.vertices;
        let edge1 = b - a;
        let edge2 = c - a;
        let pvec = r.direction.cross(edge2);
        let det = edge1.dot(pvec);
        if det.abs() < RAY_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = r.origin - a;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let qvec = tvec.cross(edge1);
        let v = r.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(qvec) * inv_det;
        if t <= RAY_EPSILON {
            return None;
        }

        let w = 1.0 - u - v;
        let uv = (
            w * self.uvs[0].0 + u * self.uvs[1].0 + v * self.uvs[2].0,
            w * self.uvs[0].1 + u * self.uvs[1].1 + v * self.uvs[2].1,
        );
        Some(Isect {
            t,
            normal: self.face_normal(),
            material: self.material,
            uv,
        })
    }
}
