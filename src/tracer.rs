use crate::config::TraceConfig;
use crate::prelude::*;
use crate::scene::Scene;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{unbounded, Receiver, Sender};

/// Shared rgb byte buffer. Each worker owns a disjoint set of pixel slots
/// per pass, so writes go through a raw pointer without locking; readers
/// polling mid-render see zero or stale pixels, never torn allocations.
pub struct RenderBuffer {
    // keeps the allocation alive; all access goes through `ptr`
    _storage: Vec<u8>,
    ptr: *mut u8,
    width: usize,
    height: usize,
}

unsafe impl Send for RenderBuffer {}
unsafe impl Sync for RenderBuffer {}

impl RenderBuffer {
    pub fn new(width: usize, height: usize) -> RenderBuffer {
        let mut storage = vec![0u8; width * height * 3];
        let ptr = storage.as_mut_ptr();
        RenderBuffer {
            _storage: storage,
            ptr,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_pixel(&self, i: usize, j: usize, color: Color) {
        debug_assert!(i < self.width && j < self.height);
        let c = color.clamp(Color::ZERO, Color::ONE);
        let offset = (i + j * self.width) * 3;
        unsafe {
            *self.ptr.add(offset) = (255.0 * c.x).round() as u8;
            *self.ptr.add(offset + 1) = (255.0 * c.y).round() as u8;
            *self.ptr.add(offset + 2) = (255.0 * c.z).round() as u8;
        }
    }

    pub fn get_pixel(&self, i: usize, j: usize) -> Color {
        debug_assert!(i < self.width && j < self.height);
        let offset = (i + j * self.width) * 3;
        unsafe {
            Color::new(
                *self.ptr.add(offset) as f64 / 255.0,
                *self.ptr.add(offset + 1) as f64 / 255.0,
                *self.ptr.add(offset + 2) as f64 / 255.0,
            )
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr, self.width * self.height * 3) }
    }
}

/// Per-pass snapshot of the knobs the workers read, taken by `trace_setup`
/// so mid-render config edits cannot skew a pass.
#[derive(Copy, Clone, Debug)]
struct PassSettings {
    depth: i32,
    threshold: f64,
    threads: usize,
    samples: usize,
    aa_threshold: f64,
}

impl PassSettings {
    fn snapshot(config: &TraceConfig) -> PassSettings {
        PassSettings {
            depth: config.depth,
            threshold: config.threshold,
            threads: config.thread_count(),
            samples: config.super_samples,
            aa_threshold: config.aa_threshold,
        }
    }
}

/// Refraction direction for incoming unit direction `d` at a surface with
/// outward unit normal `n` and material index `index`, against an exterior
/// index of 1. The sign of d.n decides entering vs exiting. Returns None on
/// total internal reflection.
pub fn refraction_direction(d: Vec3, n: Vec3, index: f64) -> Option<Vec3> {
    let (working_normal, n_current, n_other) = if d.dot(n) > 0.0 {
        (-n, index, 1.0)
    } else {
        (n, 1.0, index)
    };
    let eta = n_current / n_other;
    let cosd = working_normal.dot(d).abs();
    let w = eta * cosd;
    let k = 1.0 + (w - eta) * (w + eta);
    if k <= 0.0 {
        return None;
    }
    Some(((w - k.sqrt()) * working_normal + eta * d).normalize())
}

/// The recursive Whitted trace. Returns the accumulated color and the
/// parametric distance of the primary hit (0 when the ray escaped).
pub fn trace_ray(scene: &Scene, r: &Ray, thresh: Color, depth: i32, threshold: f64) -> (Color, f64) {
    if depth < 0 {
        return (Color::ZERO, 0.0);
    }
    if thresh.x < threshold && thresh.y < threshold && thresh.z < threshold {
        return (Color::ZERO, 0.0);
    }

    let i = match scene.intersect(r) {
        Some(i) => i,
        None => {
            let color = match scene.cubemap() {
                Some(map) => map.color(r.direction),
                None => Color::ZERO,
            };
            return (color, 0.0);
        }
    };

    let m = scene.material(i.material);
    let t = i.t;
    let mut color = m.shade(scene, r, &i);

    let position = r.at(i.t);
    let d = r.direction.normalize();
    let n = i.normal.normalize();

    if m.refl() {
        let direction = (d - 2.0 * d.dot(n) * n).normalize();
        let reflect = Ray::new(
            position + RAY_EPSILON * direction,
            direction,
            Color::ONE,
            RayKind::Reflection,
        );
        let (child, _) = trace_ray(scene, &reflect, m.kr * thresh, depth - 1, threshold);
        color += m.kr * child;
    }

    if m.trans() {
        if let Some(direction) = refraction_direction(d, n, m.index) {
            let refract = Ray::new(
                position + RAY_EPSILON * direction,
                direction,
                Color::ONE,
                RayKind::Refraction,
            );
            let (child, _) = trace_ray(scene, &refract, m.kt * thresh, depth - 1, threshold);
            color += m.kt * child;
        }
        // k <= 0 is total internal reflection, the transmitted term vanishes
    }

    (color, t)
}

/// Top of the recursion for one sample position: primary ray through
/// normalized window coordinates, full attenuation weight, clamped result.
pub fn trace(scene: &Scene, x: f64, y: f64, depth: i32, threshold: f64) -> Color {
    let r = scene.camera().ray_through(x, y);
    let (color, _) = trace_ray(scene, &r, Color::ONE, depth, threshold);
    color.clamp(Color::ZERO, Color::ONE)
}

fn trace_worker(
    id: usize,
    w: usize,
    h: usize,
    scene: Arc<Scene>,
    buffer: Arc<RenderBuffer>,
    settings: PassSettings,
    finished: Sender<usize>,
) {
    let mut p = id;
    while p < w * h {
        let i = p / h;
        let j = p % h;
        let color = trace(
            &scene,
            i as f64 / w as f64,
            j as f64 / h as f64,
            settings.depth,
            settings.threshold,
        );
        buffer.set_pixel(i, j, color);
        p += settings.threads;
    }
    let _ = finished.send(id);
}

fn aa_worker(
    id: usize,
    scene: Arc<Scene>,
    buffer: Arc<RenderBuffer>,
    settings: PassSettings,
    finished: Sender<usize>,
) {
    let (w, h) = (buffer.width(), buffer.height());
    let samples = settings.samples;
    let x_offset = 1.0 / (w * samples) as f64;
    let y_offset = 1.0 / (h * samples) as f64;

    let mut p = id;
    while p < w * h {
        let i = p / h;
        let j = p % h;
        let color = buffer.get_pixel(i, j);

        let mut on_boundary = false;
        'neighbors: for a in -1i64..2 {
            let ni = i as i64 + a;
            if ni < 0 || ni >= w as i64 {
                continue;
            }
            for b in -1i64..2 {
                if a == 0 && b == 0 {
                    continue;
                }
                let nj = j as i64 + b;
                if nj < 0 || nj >= h as i64 {
                    continue;
                }
                let diff = (buffer.get_pixel(ni as usize, nj as usize) - color).abs();
                if diff.x > settings.aa_threshold
                    || diff.y > settings.aa_threshold
                    || diff.z > settings.aa_threshold
                {
                    on_boundary = true;
                    break 'neighbors;
                }
            }
        }

        if on_boundary {
            let total = (samples * samples) as f64;
            let mut new_color = Color::ZERO;
            let x = (i as f64 - 0.5) / w as f64;
            let y = (j as f64 - 0.5) / h as f64;
            for a in 0..samples {
                let x_sample = x + a as f64 * x_offset;
                for b in 0..samples {
                    let y_sample = y + b as f64 * y_offset;
                    new_color +=
                        trace(&scene, x_sample, y_sample, settings.depth, settings.threshold)
                            / total;
                }
            }
            buffer.set_pixel(i, j, new_color);
        }

        p += settings.threads;
    }
    let _ = finished.send(id);
}

/// The image driver: owns the scene, the shared byte buffer and the worker
/// pool, and exposes the render / poll / join protocol the UI drives.
pub struct RayTracer {
    config: TraceConfig,
    scene: Option<Arc<Scene>>,
    buffer: Arc<RenderBuffer>,
    settings: PassSettings,
    workers: Vec<JoinHandle<()>>,
    finished_tx: Sender<usize>,
    finished_rx: Receiver<usize>,
    finished: Mutex<HashSet<usize>>,
}

impl RayTracer {
    pub fn new(config: TraceConfig) -> RayTracer {
        let (finished_tx, finished_rx) = unbounded();
        let settings = PassSettings::snapshot(&config);
        RayTracer {
            config,
            scene: None,
            buffer: Arc::new(RenderBuffer::new(0, 0)),
            settings,
            workers: Vec::new(),
            finished_tx,
            finished_rx,
            finished: Mutex::new(HashSet::new()),
        }
    }

    /// Parse a scene file. Failures are reported through the log sink and
    /// turn into `false`; no partial scene is retained.
    pub fn load_scene(&mut self, path: &str) -> bool {
        match crate::parsing::load_scene(path) {
            Ok(scene) => {
                info!(
                    "loaded scene {} ({} objects, {} lights)",
                    path,
                    scene.objects().len(),
                    scene.lights().len()
                );
                self.scene = Some(Arc::new(scene));
                true
            }
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    pub fn set_scene(&mut self, scene: Scene) {
        self.scene = Some(Arc::new(scene));
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_deref()
    }

    pub fn scene_loaded(&self) -> bool {
        self.scene.is_some()
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.scene
            .as_ref()
            .map_or(1.0, |scene| scene.camera().aspect_ratio())
    }

    /// Allocate and zero the buffer, snapshot the pass settings and, when
    /// enabled, build the kd-tree. Must precede any tracing pass.
    pub fn trace_setup(&mut self, w: usize, h: usize) {
        self.buffer = Arc::new(RenderBuffer::new(w, h));
        self.settings = PassSettings::snapshot(&self.config);
        debug!(
            "trace setup {}x{}: {} threads, block size {} recorded",
            w, h, self.settings.threads, self.config.block_size
        );

        if let Some(scene) = self.scene.as_mut() {
            // clone-on-write: workers from an earlier pass may still hold
            // the previous scene, and they keep rendering against it
            let scene = Arc::make_mut(scene);
            scene.set_camera_aspect_ratio(w as f64 / h as f64);
            if self.config.kd_switch {
                scene.build_tree(self.config.kd_max_depth, self.config.kd_leaf_size);
            }
        }
    }

    pub fn trace_pixel(&self, i: usize, j: usize) -> Color {
        let scene = match self.scene.as_deref() {
            Some(scene) => scene,
            None => return Color::ZERO,
        };
        let (w, h) = (self.buffer.width(), self.buffer.height());
        let color = trace(
            scene,
            i as f64 / w as f64,
            j as f64 / h as f64,
            self.settings.depth,
            self.settings.threshold,
        );
        self.buffer.set_pixel(i, j, color);
        color
    }

    /// Spawn the tracing workers and return immediately. Worker `id` strides
    /// over pixels `id, id + threads, ...`, deriving `i = p / h`,
    /// `j = p % h`; each pixel is written by exactly one worker.
    pub fn trace_image(&mut self, w: usize, h: usize) {
        assert!(
            self.buffer.width() == w && self.buffer.height() == h,
            "trace_setup must run before trace_image"
        );
        let scene = match self.scene.clone() {
            Some(scene) => scene,
            None => {
                // nothing to render; report every worker as done so the
                // poll protocol still completes
                warn!("trace_image called without a scene");
                for id in 0..self.settings.threads {
                    let _ = self.finished_tx.send(id);
                }
                return;
            }
        };

        for id in 0..self.settings.threads {
            let scene = Arc::clone(&scene);
            let buffer = Arc::clone(&self.buffer);
            let settings = self.settings;
            let tx = self.finished_tx.clone();
            self.workers.push(thread::spawn(move || {
                trace_worker(id, w, h, scene, buffer, settings, tx);
            }));
        }
    }

    /// Second wave: edge-detect against the 8-neighborhood and resample
    /// edge pixels on an s x s sub-grid. No-op when supersampling is off.
    pub fn aa_image(&mut self) {
        if self.settings.samples == 0 {
            return;
        }
        let scene = match self.scene.clone() {
            Some(scene) => scene,
            None => return,
        };

        for id in 0..self.settings.threads {
            let scene = Arc::clone(&scene);
            let buffer = Arc::clone(&self.buffer);
            let settings = self.settings;
            let tx = self.finished_tx.clone();
            self.workers.push(thread::spawn(move || {
                aa_worker(id, scene, buffer, settings, tx);
            }));
        }
    }

    /// True iff every worker of the current pass has reported completion.
    /// Clears the finished set on success so the next pass can re-arm it.
    /// Safe to poll from any thread.
    pub fn check_render(&self) -> bool {
        let mut finished = self.finished.lock().unwrap();
        for id in self.finished_rx.try_iter() {
            finished.insert(id);
        }
        if (0..self.settings.threads).all(|id| finished.contains(&id)) {
            finished.clear();
            true
        } else {
            false
        }
    }

    /// How many workers of the current pass have reported completion.
    /// Progress-display helper; does not re-arm the finished set.
    pub fn finished_workers(&self) -> usize {
        let mut finished = self.finished.lock().unwrap();
        for id in self.finished_rx.try_iter() {
            finished.insert(id);
        }
        finished.len()
    }

    /// Join every worker, then clear the finished set.
    pub fn wait_render(&mut self) {
        for handle in self.workers.drain(..) {
            if let Err(panic) = handle.join() {
                error!("render worker panicked: {:?}", panic);
            }
        }
        let mut finished = self.finished.lock().unwrap();
        for _ in self.finished_rx.try_iter() {}
        finished.clear();
    }

    pub fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    pub fn get_pixel(&self, i: usize, j: usize) -> Color {
        self.buffer.get_pixel(i, j)
    }

    pub fn set_pixel(&self, i: usize, j: usize, color: Color) {
        self.buffer.set_pixel(i, j, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::geometry::{Primitive, Sphere, Triangle};
    use crate::light::Light;
    use crate::material::{Material, Texture};

    use std::time::Duration;

    fn emissive(color: Color) -> Material {
        Material {
            ke: color,
            ..Material::diffuse(Color::ZERO)
        }
    }

    fn mirror(kr: Color) -> Material {
        Material {
            kr,
            ..Material::diffuse(Color::ZERO)
        }
    }

    fn glass(kt: Color, index: f64) -> Material {
        Material {
            kt,
            index,
            ..Material::diffuse(Color::ZERO)
        }
    }

    // four coplanar corners in winding order, lowered to two uv-mapped
    // triangles, the same way the parser lowers quads
    fn push_quad(objects: &mut Vec<Primitive>, corners: [Point3; 4], material: usize) {
        let [a, b, c, d] = corners;
        objects.push(Primitive::from(Triangle::with_uvs(
            [a, b, c],
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
            material,
        )));
        objects.push(Primitive::from(Triangle::with_uvs(
            [a, c, d],
            [(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            material,
        )));
    }

    fn scene_with(
        objects: Vec<Primitive>,
        materials: Vec<Material>,
        lights: Vec<Light>,
    ) -> Scene {
        Scene::new(
            objects,
            materials,
            lights,
            Camera::default(),
            Color::ZERO,
            None,
        )
    }

    fn test_config(threads: usize) -> TraceConfig {
        TraceConfig {
            depth: 1,
            threshold: 0.0,
            threads: Some(threads),
            kd_switch: false,
            super_samples: 0,
            ..TraceConfig::default()
        }
    }

    #[test]
    fn test_s1_empty_scene_is_black() {
        let scene = scene_with(vec![], vec![], vec![]);
        assert_eq!(trace(&scene, 0.3, 0.7, 3, 0.0), Color::ZERO);
        assert_eq!(trace(&scene, 0.5, 0.5, 3, 0.0), Color::ZERO);
    }

    #[test]
    fn test_s2_red_sphere_direct_shade() {
        let scene = scene_with(
            vec![Primitive::from(Sphere::new(Point3::ZERO, 1.0, 0))],
            vec![Material::diffuse(Color::X)],
            vec![Light::Directional {
                orientation: -Vec3::Z,
                color: Color::ONE,
            }],
        );
        let center = trace(&scene, 0.5, 0.5, 0, 0.0);
        assert!(center.x > 0.0);
        assert_eq!(center.y, 0.0);
        assert_eq!(center.z, 0.0);

        let corner = trace(&scene, 0.0, 0.0, 0, 0.0);
        assert_eq!(corner, Color::ZERO);
    }

    // a perfect mirror floor under an emissive red sphere: one bounce picks
    // up the red, zero bounces only the floor's own (black) shade
    fn mirror_scene(kr: Color) -> Scene {
        let mut objects = vec![Primitive::from(Sphere::new(
            Point3::new(-2.0, 2.0, 0.0),
            1.0,
            1,
        ))];
        push_quad(
            &mut objects,
            [
                Point3::new(-10.0, 0.0, 10.0),
                Point3::new(10.0, 0.0, 10.0),
                Point3::new(10.0, 0.0, -10.0),
                Point3::new(-10.0, 0.0, -10.0),
            ],
            0,
        );
        scene_with(objects, vec![mirror(kr), emissive(Color::X)], vec![])
    }

    fn mirror_probe() -> Ray {
        Ray::new(
            Point3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, 0.0).normalize(),
            Color::ONE,
            RayKind::Visibility,
        )
    }

    #[test]
    fn test_s3_mirror_reflects_at_depth_one_only() {
        let scene = mirror_scene(Color::ONE);
        let (with_bounce, t) = trace_ray(&scene, &mirror_probe(), Color::ONE, 1, 0.0);
        assert!((t - 2.0f64.sqrt()).abs() < 1e-9);
        assert!(with_bounce.x > 0.5);

        let (direct_only, _) = trace_ray(&scene, &mirror_probe(), Color::ONE, 0, 0.0);
        assert_eq!(direct_only, Color::ZERO);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let scene = mirror_scene(Color::splat(0.5));
        let mut previous = Color::splat(INFINITY);
        for threshold in [0.0, 0.3, 0.9] {
            let (color, _) = trace_ray(&scene, &mirror_probe(), Color::ONE, 3, threshold);
            assert!(color.cmple(previous).all());
            previous = color;
        }
        // past the cutoff the reflected term is gone entirely
        let (cut, _) = trace_ray(&scene, &mirror_probe(), Color::ONE, 3, 0.9);
        assert_eq!(cut, Color::ZERO);
    }

    fn checkerboard_scene(kt: Color) -> Scene {
        let mut objects = vec![Primitive::from(Sphere::new(
            Point3::new(0.0, 0.0, 2.0),
            1.0,
            0,
        ))];
        push_quad(
            &mut objects,
            [
                Point3::new(-8.0, -8.0, 0.0),
                Point3::new(8.0, -8.0, 0.0),
                Point3::new(8.0, 8.0, 0.0),
                Point3::new(-8.0, 8.0, 0.0),
            ],
            1,
        );
        let floor = Material {
            diffuse: Texture::Checker {
                odd: Color::ZERO,
                even: Color::ONE,
                scale: 4.0,
            },
            ..Material::diffuse(Color::ZERO)
        };
        scene_with(
            objects,
            vec![glass(kt, 1.5), floor],
            vec![Light::Directional {
                orientation: -Vec3::Z,
                color: Color::ONE,
            }],
        )
    }

    #[test]
    fn test_s4_transmission_changes_brightness() {
        let probe = Ray::new(
            Point3::new(0.0, 0.0, 5.0),
            -Vec3::Z,
            Color::ONE,
            RayKind::Visibility,
        );
        let (through_glass, _) = trace_ray(&checkerboard_scene(Color::ONE), &probe, Color::ONE, 3, 0.0);
        let (opaque, _) = trace_ray(&checkerboard_scene(Color::ZERO), &probe, Color::ONE, 3, 0.0);
        assert!((through_glass.x - opaque.x).abs() > 0.05);
    }

    // water surface at y = 0 with an emissive panel above it; a ray from
    // underwater past the critical angle must not reach the panel
    fn water_scene() -> Scene {
        let mut objects = Vec::new();
        push_quad(
            &mut objects,
            [
                Point3::new(-10.0, 0.0, 10.0),
                Point3::new(10.0, 0.0, 10.0),
                Point3::new(10.0, 0.0, -10.0),
                Point3::new(-10.0, 0.0, -10.0),
            ],
            0,
        );
        push_quad(
            &mut objects,
            [
                Point3::new(-10.0, 2.0, 10.0),
                Point3::new(10.0, 2.0, 10.0),
                Point3::new(10.0, 2.0, -10.0),
                Point3::new(-10.0, 2.0, -10.0),
            ],
            1,
        );
        scene_with(
            objects,
            vec![glass(Color::ONE, 1.33), emissive(Color::ONE)],
            vec![],
        )
    }

    #[test]
    fn test_total_internal_reflection() {
        let scene = water_scene();

        // 60 degrees from the normal, past water's ~48.8 degree critical angle
        let d = Vec3::new(60f64.to_radians().sin(), 60f64.to_radians().cos(), 0.0);
        let tir = Ray::new(Point3::ZERO - d, d, Color::ONE, RayKind::Visibility);
        let (color, _) = trace_ray(&scene, &tir, Color::ONE, 3, 0.0);
        assert_eq!(color, Color::ZERO);

        // 30 degrees refracts out and reaches the panel
        let d = Vec3::new(30f64.to_radians().sin(), 30f64.to_radians().cos(), 0.0);
        let pass = Ray::new(Point3::ZERO - d, d, Color::ONE, RayKind::Visibility);
        let (color, _) = trace_ray(&scene, &pass, Color::ONE, 3, 0.0);
        assert!(color.x > 0.5);
    }

    #[test]
    fn test_snell_slab_round_trip() {
        let incoming = Vec3::new(0.5, -0.866, 0.3).normalize();
        let inside = refraction_direction(incoming, Vec3::Y, 1.5).unwrap();
        // entering bends toward the normal
        assert!(inside.y < 0.0 && inside.x.abs() < incoming.x.abs());

        let outgoing = refraction_direction(inside, -Vec3::Y, 1.5).unwrap();
        assert!(outgoing.cross(incoming).length() < 1e-9);
        assert!(outgoing.dot(incoming) > 0.0);
    }

    fn patch_scene(distance: f64) -> Scene {
        let mut objects = Vec::new();
        push_quad(
            &mut objects,
            [
                Point3::new(-50.0, -50.0, -distance),
                Point3::new(50.0, -50.0, -distance),
                Point3::new(50.0, 50.0, -distance),
                Point3::new(-50.0, 50.0, -distance),
            ],
            0,
        );
        scene_with(
            objects,
            vec![Material::diffuse(Color::ONE)],
            vec![Light::Point {
                position: Point3::ZERO,
                color: Color::ONE,
                constant: 0.0,
                linear: 0.0,
                quadratic: 1.0,
            }],
        )
    }

    #[test]
    fn test_s6_point_light_inverse_square_falloff() {
        let probe = Ray::new(Point3::ZERO, -Vec3::Z, Color::ONE, RayKind::Visibility);
        let (near, _) = trace_ray(&patch_scene(1.0), &probe, Color::ONE, 0, 0.0);
        let (far, _) = trace_ray(&patch_scene(10.0), &probe, Color::ONE, 0, 0.0);
        let ratio = far.x / near.x;
        assert!((ratio - 0.01).abs() <= 0.0002, "ratio was {}", ratio);
    }

    fn full_screen_scene(material: Material) -> Scene {
        let mut objects = Vec::new();
        push_quad(
            &mut objects,
            [
                Point3::new(-10.0, -10.0, 0.0),
                Point3::new(10.0, -10.0, 0.0),
                Point3::new(10.0, 10.0, 0.0),
                Point3::new(-10.0, 10.0, 0.0),
            ],
            0,
        );
        scene_with(objects, vec![material], vec![])
    }

    #[test]
    fn test_overbright_colors_clamp_to_full_bytes() {
        let mut tracer = RayTracer::new(test_config(1));
        tracer.set_scene(full_screen_scene(emissive(Color::splat(5.0))));
        tracer.trace_setup(4, 4);
        for i in 0..4 {
            for j in 0..4 {
                let color = tracer.trace_pixel(i, j);
                assert_eq!(color, Color::ONE);
            }
        }
        assert!(tracer.buffer().as_bytes().iter().all(|&b| b == 255));
        assert_eq!(tracer.get_pixel(2, 2), Color::ONE);
    }

    #[test]
    fn test_trace_setup_is_idempotent() {
        let config = TraceConfig {
            kd_switch: true,
            ..test_config(2)
        };
        let mut tracer = RayTracer::new(config);
        tracer.set_scene(full_screen_scene(emissive(Color::ONE)));
        tracer.trace_setup(8, 6);
        tracer.set_pixel(2, 3, Color::ONE);
        tracer.trace_setup(8, 6);
        let bytes = tracer.buffer().as_bytes();
        assert_eq!(bytes.len(), 8 * 6 * 3);
        assert!(bytes.iter().all(|&b| b == 0));

        // setup again while the previous pass's workers are still live:
        // they keep their own scene and buffer, the new buffer starts zero
        tracer.trace_image(8, 6);
        tracer.trace_setup(8, 6);
        let bytes = tracer.buffer().as_bytes();
        assert_eq!(bytes.len(), 8 * 6 * 3);
        assert!(bytes.iter().all(|&b| b == 0));
        tracer.wait_render();
    }

    #[test]
    fn test_workers_cover_every_pixel_and_report_completion() {
        let mut tracer = RayTracer::new(test_config(3));
        tracer.set_scene(full_screen_scene(emissive(Color::X)));
        tracer.trace_setup(6, 5);
        assert!(!tracer.check_render());

        tracer.trace_image(6, 5);
        let mut completed = false;
        for _ in 0..10_000 {
            if tracer.check_render() {
                completed = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(completed, "workers never reported completion");
        // the finished set re-arms after a successful poll
        assert!(!tracer.check_render());

        tracer.wait_render();
        for i in 0..6 {
            for j in 0..5 {
                assert_eq!(tracer.get_pixel(i, j), Color::new(1.0, 0.0, 0.0));
            }
        }
    }

    #[test]
    fn test_s5_aa_resamples_only_the_silhouette() {
        // emissive half-plane whose silhouette falls inside pixel column 5
        // of a 9x9 image
        let mut objects = Vec::new();
        push_quad(
            &mut objects,
            [
                Point3::new(-10.0, -10.0, 0.0),
                Point3::new(0.08, -10.0, 0.0),
                Point3::new(0.08, 10.0, 0.0),
                Point3::new(-10.0, 10.0, 0.0),
            ],
            0,
        );
        let scene = scene_with(objects, vec![emissive(Color::ONE)], vec![]);

        let config = TraceConfig {
            super_samples: 3,
            aa_threshold: 0.1,
            ..test_config(2)
        };
        let mut tracer = RayTracer::new(config);
        tracer.set_scene(scene);
        tracer.trace_setup(9, 9);
        tracer.trace_image(9, 9);
        tracer.wait_render();
        let before = tracer.buffer().as_bytes().to_vec();

        tracer.aa_image();
        tracer.wait_render();
        let after = tracer.buffer().as_bytes().to_vec();

        assert_ne!(before, after, "aa pass changed nothing");
        let pixel = |bytes: &[u8], i: usize, j: usize| {
            let offset = (i + j * 9) * 3;
            [bytes[offset], bytes[offset + 1], bytes[offset + 2]]
        };
        for j in 0..9 {
            for i in [0, 1, 2, 3, 6, 7, 8] {
                assert_eq!(
                    pixel(&before, i, j),
                    pixel(&after, i, j),
                    "interior pixel ({}, {}) was resampled",
                    i,
                    j
                );
            }
        }
        assert!((0..9).any(|j| pixel(&before, 5, j) != pixel(&after, 5, j)));
    }
}
