mod kdtree;

pub use kdtree::KdTree;

use crate::geometry::Primitive;
use crate::hittable::{Hittable, Isect};
use crate::math::Ray;

/// How the scene resolves closest-hit queries over its primitive arena.
/// Linear scan until a kd-tree is built.
#[derive(Clone, Debug)]
pub enum Accelerator {
    List,
    KdTree(KdTree),
}

impl Accelerator {
    pub fn intersect(&self, objects: &[Primitive], r: &Ray) -> Option<Isect> {
        match self {
            Accelerator::List => {
                let mut best: Option<Isect> = None;
                for obj in objects {
                    if let Some(hit) = obj.intersect(r) {
                        if best.map_or(true, |b| hit.t < b.t) {
                            best = Some(hit);
                        }
                    }
                }
                best
            }
            Accelerator::KdTree(tree) => tree.intersect(objects, r),
        }
    }
}
