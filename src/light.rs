use crate::prelude::*;
use crate::scene::Scene;

#[derive(Copy, Clone, Debug)]
pub enum Light {
    Directional {
        orientation: Vec3,
        color: Color,
    },
    Point {
        position: Point3,
        color: Color,
        constant: f64,
        linear: f64,
        quadratic: f64,
    },
}

impl Light {
    pub fn color(&self) -> Color {
        match self {
            Light::Directional { color, .. } | Light::Point { color, .. } => *color,
        }
    }

    /// Unit direction from `p` toward the light.
    pub fn direction(&self, p: Point3) -> Vec3 {
        match self {
            Light::Directional { orientation, .. } => -*orientation,
            Light::Point { position, .. } => (*position - p).normalize(),
        }
    }

    pub fn distance_attenuation(&self, p: Point3) -> f64 {
        match self {
            Light::Directional { .. } => 1.0,
            Light::Point {
                position,
                constant,
                linear,
                quadratic,
                ..
            } => {
                let d = position.distance(p);
                (1.0 / (constant + linear * d + quadratic * d * d)).min(1.0)
            }
        }
    }

    /// Cast a shadow ray from `p` toward the light. An unoccluded path (or,
    /// for a point light, an occluder past the light itself) passes the
    /// light color through unchanged; otherwise the first occluder's
    /// transmissive coefficient filters it. Occluders behind the first are
    /// not chained.
    pub fn shadow_attenuation(&self, scene: &Scene, p: Point3) -> Color {
        let direction = self.direction(p).normalize();
        let shadow = Ray::new(
            p + direction * RAY_EPSILON,
            direction,
            Color::ONE,
            RayKind::Shadow,
        );

        match scene.intersect(&shadow) {
            None => self.color(),
            Some(i) => match self {
                Light::Directional { .. } => scene.material(i.material).kt * self.color(),
                Light::Point { position, .. } => {
                    if i.t < position.distance(p) {
                        scene.material(i.material).kt * self.color()
                    } else {
                        self.color()
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_attenuation_clamps_to_one() {
        let light = Light::Point {
            position: Point3::ZERO,
            color: Color::ONE,
            constant: 0.0,
            linear: 0.0,
            quadratic: 1.0,
        };
        // closer than unit distance, raw attenuation exceeds 1
        assert_eq!(light.distance_attenuation(Point3::new(0.1, 0.0, 0.0)), 1.0);
        let d10 = light.distance_attenuation(Point3::new(10.0, 0.0, 0.0));
        assert!((d10 - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_directional_direction_is_reversed_orientation() {
        let light = Light::Directional {
            orientation: -Vec3::Z,
            color: Color::ONE,
        };
        assert_eq!(light.direction(Point3::new(5.0, 5.0, 5.0)), Vec3::Z);
        assert_eq!(light.distance_attenuation(Point3::ZERO), 1.0);
    }
}
