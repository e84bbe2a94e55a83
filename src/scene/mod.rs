mod cubemap;

pub use cubemap::CubeMap;

use crate::accelerator::{Accelerator, KdTree};
use crate::camera::Camera;
use crate::geometry::Primitive;
use crate::hittable::Isect;
use crate::light::Light;
use crate::material::{Material, MaterialId};
use crate::prelude::*;

/// Owns the geometry arena, materials, lights and camera. Immutable once
/// handed to the tracer; the kd-tree (when built) indexes into the arena.
#[derive(Clone, Debug)]
pub struct Scene {
    objects: Vec<Primitive>,
    materials: Vec<Material>,
    lights: Vec<Light>,
    camera: Camera,
    ambient: Color,
    cubemap: Option<CubeMap>,
    accelerator: Accelerator,
}

impl Scene {
    pub fn new(
        objects: Vec<Primitive>,
        materials: Vec<Material>,
        lights: Vec<Light>,
        camera: Camera,
        ambient: Color,
        cubemap: Option<CubeMap>,
    ) -> Scene {
        Scene {
            objects,
            materials,
            lights,
            camera,
            ambient,
            cubemap,
            accelerator: Accelerator::List,
        }
    }

    /// Closest hit along the positive ray parameter, via the kd-tree when
    /// one has been built, else a linear scan.
    pub fn intersect(&self, r: &Ray) -> Option<Isect> {
        self.accelerator.intersect(&self.objects, r)
    }

    pub fn build_tree(&mut self, depth_limit: usize, leaf_size: usize) {
        if self.objects.is_empty() {
            return;
        }
        self.accelerator = Accelerator::KdTree(KdTree::build(
            &self.objects,
            depth_limit.max(1),
            leaf_size.max(1),
        ));
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id]
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }

    pub fn ambient(&self) -> Color {
        self.ambient
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera_aspect_ratio(&mut self, aspect_ratio: f64) {
        self.camera = self.camera.with_aspect_ratio(aspect_ratio);
    }

    pub fn cubemap(&self) -> Option<&CubeMap> {
        self.cubemap.as_ref()
    }
}
