use crate::aabb::{BoundingBox, HasBoundingBox};
use crate::geometry::Primitive;
use crate::hittable::{Hittable, Isect};
use crate::prelude::*;

/// SAH kd-tree over the scene's primitive arena. Leaves hold arena indices,
/// so the tree owns no geometry and costs nothing to drop.
#[derive(Clone, Debug)]
pub struct KdTree {
    root: KdNode,
    bbox: BoundingBox,
}

#[derive(Clone, Debug)]
enum KdNode {
    Split {
        axis: usize,
        pos: f64,
        bbox: BoundingBox,
        left: Box<KdNode>,
        right: Box<KdNode>,
    },
    Leaf {
        objects: Vec<usize>,
    },
}

#[derive(Copy, Clone, Debug)]
struct Plane {
    axis: usize,
    position: f64,
    left_bbox: BoundingBox,
    right_bbox: BoundingBox,
}

impl KdTree {
    pub fn build(objects: &[Primitive], depth_limit: usize, leaf_size: usize) -> KdTree {
        let mut bbox = BoundingBox::empty();
        for obj in objects {
            bbox.expand_mut(&obj.bounding_box());
        }
        let indices: Vec<usize> = (0..objects.len()).collect();
        let root = build_node(objects, indices, bbox, depth_limit, leaf_size, 0);
        info!(
            "built kd-tree over {} objects, depth limit {}, leaf size {}",
            objects.len(),
            depth_limit,
            leaf_size
        );
        KdTree { root, bbox }
    }

    pub fn intersect(&self, objects: &[Primitive], r: &Ray) -> Option<Isect> {
        let (mut t_min, mut t_max) = (0.0, 0.0);
        if !self.bbox.intersect(r, &mut t_min, &mut t_max) {
            return None;
        }
        let mut best: Option<Isect> = None;
        self.root
            .find_intersection(objects, r, &mut best, t_min, t_max);
        best
    }

    #[cfg(test)]
    fn leaves(&self) -> Vec<&Vec<usize>> {
        fn walk<'a>(node: &'a KdNode, out: &mut Vec<&'a Vec<usize>>) {
            match node {
                KdNode::Split { left, right, .. } => {
                    walk(left, out);
                    walk(right, out);
                }
                KdNode::Leaf { objects } => out.push(objects),
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }
}

fn build_node(
    objects: &[Primitive],
    indices: Vec<usize>,
    bbox: BoundingBox,
    depth_limit: usize,
    leaf_size: usize,
    depth: usize,
) -> KdNode {
    if indices.len() <= leaf_size || depth + 1 >= depth_limit {
        return KdNode::Leaf { objects: indices };
    }

    let plane = match find_best_plane(objects, &indices, bbox) {
        Some(plane) => plane,
        None => return KdNode::Leaf { objects: indices },
    };

    let mut left_list = Vec::new();
    let mut right_list = Vec::new();
    for &idx in &indices {
        let obj_bbox = objects[idx].bounding_box();
        let min = obj_bbox.min[plane.axis];
        let max = obj_bbox.max[plane.axis];

        if min < plane.position {
            left_list.push(idx);
        }
        if max > plane.position {
            right_list.push(idx);
        }
        if min == plane.position && max == plane.position {
            // an object collapsed exactly onto the plane routes by normal
            // orientation; the length of a normal is never negative, so
            // these always land right
            if objects[idx].normal().length() < 0.0 {
                left_list.push(idx);
            } else {
                right_list.push(idx);
            }
        }
    }

    if left_list.is_empty() || right_list.is_empty() {
        return KdNode::Leaf { objects: indices };
    }

    KdNode::Split {
        axis: plane.axis,
        pos: plane.position,
        bbox,
        left: Box::new(build_node(
            objects,
            left_list,
            plane.left_bbox,
            depth_limit,
            leaf_size,
            depth + 1,
        )),
        right: Box::new(build_node(
            objects,
            right_list,
            plane.right_bbox,
            depth_limit,
            leaf_size,
            depth + 1,
        )),
    }
}

/// Surface-area-heuristic plane selection. Candidates are every object's
/// bbox extremes on every axis; the plane minimizing
/// (Nl * A(left) + Nr * A(right)) / A(parent) wins, first encountered on a
/// tie.
fn find_best_plane(objects: &[Primitive], indices: &[usize], bbox: BoundingBox) -> Option<Plane> {
    let mut candidates = Vec::with_capacity(indices.len() * 6);
    for axis in 0..3 {
        for &idx in indices {
            let obj_bbox = objects[idx].bounding_box();
            for position in [obj_bbox.min[axis], obj_bbox.max[axis]] {
                candidates.push(Plane {
                    axis,
                    position,
                    left_bbox: bbox.clipped_below(axis, position),
                    right_bbox: bbox.clipped_above(axis, position),
                });
            }
        }
    }

    let parent_area = bbox.area();
    let mut best: Option<Plane> = None;
    let mut min_cost = INFINITY;
    for plane in candidates {
        let mut left_count = 0usize;
        let mut right_count = 0usize;
        for &idx in indices {
            let obj_bbox = objects[idx].bounding_box();
            if obj_bbox.min[plane.axis] < plane.position {
                left_count += 1;
            }
            if obj_bbox.max[plane.axis] > plane.position {
                right_count += 1;
            }
        }
        let cost = (left_count as f64 * plane.left_bbox.area()
            + right_count as f64 * plane.right_bbox.area())
            / parent_area;
        if cost < min_cost {
            min_cost = cost;
            best = Some(plane);
        }
    }
    best
}

impl KdNode {
    /// Front-to-back descent over the ray's active interval. Both children
    /// are visited (left first) when the split position falls inside the
    /// interval; the closest hit accumulates in `best` so sibling order
    /// never changes the result.
    fn find_intersection(
        &self,
        objects: &[Primitive],
        r: &Ray,
        best: &mut Option<Isect>,
        mut t_min: f64,
        mut t_max: f64,
    ) {
        match self {
            KdNode::Split {
                axis,
                pos,
                bbox,
                left,
                right,
            } => {
                bbox.intersect(r, &mut t_min, &mut t_max);
                let mut p_min = r.at(t_min)[*axis];
                let mut p_max = r.at(t_max)[*axis];

                // a ray parallel to the split axis would see p_min == p_max
                // and could prune the side it actually passes through
                if r.direction[*axis].abs() < RAY_EPSILON {
                    p_min += PARALLEL_BIAS;
                    p_max += PARALLEL_BIAS;
                }

                if *pos > p_min && *pos > p_max {
                    left.find_intersection(objects, r, best, t_min, t_max);
                } else if *pos < p_min && *pos < p_max {
                    right.find_intersection(objects, r, best, t_min, t_max);
                } else {
                    left.find_intersection(objects, r, best, t_min, t_max);
                    right.find_intersection(objects, r, best, t_min, t_max);
                }
            }
            KdNode::Leaf { objects: members } => {
                for &idx in members {
                    let obj = &objects[idx];
                    let (mut obj_min, mut obj_max) = (t_min, t_max);
                    obj.bounding_box().intersect(r, &mut obj_min, &mut obj_max);
                    if let Some(hit) = obj.intersect(r) {
                        if hit.t >= obj_min
                            && hit.t <= obj_max
                            && best.map_or(true, |b| hit.t < b.t)
                        {
                            *best = Some(hit);
                        }
                    }
                }
            }
        }
    }
}
