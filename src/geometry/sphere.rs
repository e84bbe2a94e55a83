use crate::aabb::{BoundingBox, HasBoundingBox};
use crate::hittable::{Hittable, Isect};
use crate::material::MaterialId;
use crate::prelude::*;

#[derive(Copy, Clone, Debug)]
pub struct Sphere {
    pub origin: Point3,
    pub radius: f64,
    pub material: MaterialId,
}

impl Sphere {
    pub fn new(origin: Point3, radius: f64, material: MaterialId) -> Sphere {
        Sphere {
            origin,
            radius,
            material,
        }
    }

    fn isect_at(&self, r: &Ray, t: f64) -> Isect {
        let normal = (r.at(t) - self.origin) / self.radius;
        // spherical uv, poles on the y axis
        let u = 0.5 + normal.z.atan2(normal.x) / (2.0 * PI);
        let v = 0.5 - normal.y.clamp(-1.0, 1.0).asin() / PI;
        Isect {
            t,
            normal,
            material: self.material,
            uv: (u, v),
        }
    }
}

impl HasBoundingBox for Sphere {
    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.origin - Vec3::splat(self.radius),
            self.origin + Vec3::splat(self.radius),
        )
    }
}

impl Hittable for Sphere {
    fn intersect(&self, r: &Ray) -> Option<Isect> {
        let oc = r.origin - self.origin;
        let a = r.direction.dot(r.direction);
        let b = oc.dot(r.direction);
        let c = oc.dot(oc) - self.radius * self.radius;
        let discriminant = b * b - a * c;
        if discriminant <= 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();

        let t = (-b - sqrt_d) / a;
        if t > RAY_EPSILON {
            return Some(self.isect_at(r, t));
        }
        let t = (-b + sqrt_d) / a;
        if t > RAY_EPSILON {
            return Some(self.isect_at(r, t));
        }
        None
    }
}
