use crate::math::{Ray, Vec3};

/// Record of the nearest surface hit along a ray. `t` is strictly positive
/// and `normal` is unit length and outward facing.
#[derive(Copy, Clone, Debug)]
pub struct Isect {
    pub t: f64,
    pub normal: Vec3,
    pub material: crate::material::MaterialId,
    pub uv: (f64, f64),
}

pub trait Hittable {
    fn intersect(&self, r: &Ray) -> Option<Isect>;
}
