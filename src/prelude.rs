pub use crate::aabb::{BoundingBox, HasBoundingBox};
pub use crate::camera::Camera;
pub use crate::hittable::{Hittable, Isect};
pub use crate::material::{Material, MaterialId, Texture};
pub use crate::math::{Color, Point3, Ray, RayKind, Vec3};
pub use crate::{rgb_to_u32, PARALLEL_BIAS, RAY_EPSILON};

pub use std::f64::consts::PI;
pub use std::f64::INFINITY;
