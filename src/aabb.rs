use crate::prelude::*;

pub trait HasBoundingBox {
    fn bounding_box(&self) -> BoundingBox;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    pub fn new(min: Point3, max: Point3) -> Self {
        BoundingBox {
            min: min.min(max),
            max: min.max(max),
        }
    }

    // empty box, expands to fit whatever it is unioned with
    pub fn empty() -> Self {
        BoundingBox {
            min: Point3::splat(INFINITY),
            max: Point3::splat(-INFINITY),
        }
    }

    pub fn expand(mut self, other: &BoundingBox) -> BoundingBox {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self
    }

    pub fn expand_mut(&mut self, other: &BoundingBox) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn contains(&self, point: Point3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Clip the box at `pos` along `axis`, keeping the lower half.
    pub fn clipped_below(mut self, axis: usize, pos: f64) -> BoundingBox {
        self.max[axis] = pos;
        self
    }

    /// Clip the box at `pos` along `axis`, keeping the upper half.
    pub fn clipped_above(mut self, axis: usize, pos: f64) -> BoundingBox {
        self.min[axis] = pos;
        self
    }

    pub fn area(&self) -> f64 {
        let e = self.max - self.min;
        2.0 * (e.x * e.y + e.y * e.z + e.x * e.z)
    }

    /// Slab-method clip of `r` against the box. On overlap, writes the
    /// parametric interval into `t_min`/`t_max` and returns true. A ray
    /// running parallel to an axis misses unless its origin lies between
    /// that axis' slabs. Returns false when the interval is inverted or
    /// entirely behind the origin, leaving `t_min`/`t_max` untouched.
    pub fn intersect(&self, r: &Ray, t_min: &mut f64, t_max: &mut f64) -> bool {
        let mut t_enter = -INFINITY;
        let mut t_exit = INFINITY;

        for axis in 0..3 {
            let d = r.direction[axis];
            let o = r.origin[axis];
            if d.abs() < RAY_EPSILON {
                if o < self.min[axis] || o > self.max[axis] {
                    return false;
                }
            } else {
                let t1 = (self.min[axis] - o) / d;
                let t2 = (self.max[axis] - o) / d;
                t_enter = t_enter.max(t1.min(t2));
                t_exit = t_exit.min(t1.max(t2));
            }
        }

        if t_exit < t_enter || t_exit < 0.0 {
            return false;
        }

        *t_min = t_enter;
        *t_max = t_exit;
        true
    }
}
