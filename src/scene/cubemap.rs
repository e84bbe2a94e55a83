use crate::material::ImageTexture;
use crate::prelude::*;

/// Environment oracle for missed rays: six face images indexed by the
/// dominant axis of the lookup direction, sampled bilinearly.
/// Face order: +x, -x, +y, -y, +z, -z.
#[derive(Clone, Debug)]
pub struct CubeMap {
    faces: [ImageTexture; 6],
}

impl CubeMap {
    pub fn new(faces: [ImageTexture; 6]) -> CubeMap {
        CubeMap { faces }
    }

    pub fn color(&self, direction: Vec3) -> Color {
        let abs = direction.abs();
        let (face, sc, tc, ma) = if abs.x >= abs.y && abs.x >= abs.z {
            if direction.x > 0.0 {
                (0, -direction.z, -direction.y, abs.x)
            } else {
                (1, direction.z, -direction.y, abs.x)
            }
        } else if abs.y >= abs.z {
            if direction.y > 0.0 {
                (2, direction.x, direction.z, abs.y)
            } else {
                (3, direction.x, -direction.z, abs.y)
            }
        } else if direction.z > 0.0 {
            (4, direction.x, -direction.y, abs.z)
        } else {
            (5, -direction.x, -direction.y, abs.z)
        };

        if ma == 0.0 {
            return Color::ZERO;
        }
        let u = 0.5 * (sc / ma + 1.0);
        let v = 0.5 * (tc / ma + 1.0);
        self.bilinear(face, u, v)
    }

    fn bilinear(&self, face: usize, u: f64, v: f64) -> Color {
        let image = &self.faces[face];
        let (w, h) = (image.width, image.height);

        let x = (u * (w - 1) as f64).clamp(0.0, (w - 1) as f64);
        let y = (v * (h - 1) as f64).clamp(0.0, (h - 1) as f64);
        let (x0, y0) = (x.floor() as usize, y.floor() as usize);
        let (x1, y1) = ((x0 + 1).min(w - 1), (y0 + 1).min(h - 1));
        let (fx, fy) = (x - x0 as f64, y - y0 as f64);

        let at = |x: usize, y: usize| image.data[y * w + x];
        let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
        let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_face(color: Color) -> ImageTexture {
        ImageTexture {
            data: vec![color; 4],
            width: 2,
            height: 2,
        }
    }

    #[test]
    fn test_dominant_axis_picks_face() {
        let map = CubeMap::new([
            solid_face(Color::X),
            solid_face(Color::Y),
            solid_face(Color::Z),
            solid_face(Color::ONE),
            solid_face(Color::ZERO),
            solid_face(Color::splat(0.5)),
        ]);
        assert_eq!(map.color(Vec3::X), Color::X);
        assert_eq!(map.color(-Vec3::X), Color::Y);
        assert_eq!(map.color(Vec3::Y), Color::Z);
        assert_eq!(map.color(-Vec3::Y), Color::ONE);
        assert_eq!(map.color(Vec3::Z), Color::ZERO);
        assert_eq!(map.color(-Vec3::Z), Color::splat(0.5));
    }
}
