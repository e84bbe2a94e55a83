mod sphere;
mod triangle;

pub use sphere::Sphere;
pub use triangle::Triangle;

use crate::aabb::{BoundingBox, HasBoundingBox};
use crate::hittable::{Hittable, Isect};
use crate::math::{Ray, Vec3};

/// Closed set of primitives the scene can hold. Kd leaves refer to these by
/// arena index, so the enum stays cheap to move and needs no indirection.
#[derive(Copy, Clone, Debug)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
}

impl From<Sphere> for Primitive {
    fn from(data: Sphere) -> Self {
        Primitive::Sphere(data)
    }
}

impl From<Triangle> for Primitive {
    fn from(data: Triangle) -> Self {
        Primitive::Triangle(data)
    }
}

impl Primitive {
    /// Representative surface normal, consulted when routing an object whose
    /// bounding box has collapsed onto a split plane.
    pub fn normal(&self) -> Vec3 {
        match self {
            Primitive::Sphere(_) => Vec3::Z,
            Primitive::Triangle(triangle) => triangle.face_normal(),
        }
    }
}

impl HasBoundingBox for Primitive {
    fn bounding_box(&self) -> BoundingBox {
        match self {
            Primitive::Sphere(sphere) => sphere.bounding_box(),
            Primitive::Triangle(triangle) => triangle.bounding_box(),
        }
    }
}

impl Hittable for Primitive {
    fn intersect(&self, r: &Ray) -> Option<Isect> {
        match self {
            Primitive::Sphere(sphere) => sphere.intersect(r),
            Primitive::Triangle(triangle) => triangle.intersect(r),
        }
    }
}
