pub use glam::DVec3;

pub type Vec3 = DVec3;
pub type Point3 = DVec3;
pub type Color = DVec3;

/// What a ray is being used for. Shadow rays and visibility rays behave the
/// same at intersection time; the tag exists so debugging output and future
/// per-kind statistics can tell them apart.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RayKind {
    Visibility,
    Reflection,
    Refraction,
    Shadow,
}

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
    pub attenuation: Color,
    pub kind: RayKind,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vec3, attenuation: Color, kind: RayKind) -> Self {
        Ray {
            origin,
            direction,
            attenuation,
            kind,
        }
    }

    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }
}
