extern crate rust_raytracer as root;

#[macro_use]
extern crate log;
extern crate simplelog;

use root::config::get_settings;
use root::tracer::RayTracer;

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, TermLogger, TerminalMode, WriteLogger};
use structopt::StructOpt;

use std::fs::File;
use std::time::{Duration, Instant};

#[derive(Debug, StructOpt)]
#[structopt(rename_all = "kebab-case")]
struct Opt {
    #[structopt(long)]
    pub scene_file: Option<String>,
    #[structopt(long, default_value = "data/config.toml")]
    pub config_file: String,
    #[structopt(short = "o", long)]
    pub output: Option<String>,
    #[structopt(short = "n", long)]
    pub dry_run: bool,
    #[structopt(short = "pll", long, default_value = "warn")]
    pub print_log_level: String,
    #[structopt(short = "wll", long, default_value = "info")]
    pub write_log_level: String,
}

fn parse_log_level(level: String, default: LevelFilter) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "trace" => LevelFilter::Trace,
        "error" => LevelFilter::Error,
        "debug" => LevelFilter::Debug,
        _ => default,
    }
}

/// Block until the current pass finishes, polling the tracer the way a GUI
/// would and feeding a progress bar with the finished-worker count.
#[cfg(not(feature = "preview"))]
fn watch_pass(tracer: &RayTracer, threads: usize) {
    let mut pb = pbr::ProgressBar::new(threads as u64);
    pb.show_speed = false;
    loop {
        pb.set(tracer.finished_workers() as u64);
        if tracer.check_render() {
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    pb.finish();
    println!();
}

/// Preview build: blit the in-flight buffer into a window while polling for
/// completion. Partially rendered pixels show up as they land.
#[cfg(feature = "preview")]
fn watch_pass(tracer: &RayTracer, _threads: usize) {
    use minifb::{Key, Window, WindowOptions};

    let buffer = tracer.buffer();
    let (w, h) = (buffer.width(), buffer.height());
    let mut window = Window::new("render", w, h, WindowOptions::default()).unwrap();
    window.limit_update_rate(Some(Duration::from_micros(16600)));

    let mut shown = vec![0u32; w * h];
    while window.is_open() && !window.is_key_down(Key::Escape) {
        let bytes = buffer.as_bytes();
        for j in 0..h {
            for i in 0..w {
                let offset = (i + j * w) * 3;
                // the buffer's row 0 is the bottom of the image
                shown[(h - 1 - j) * w + i] =
                    root::rgb_to_u32(bytes[offset], bytes[offset + 1], bytes[offset + 2]);
            }
        }
        window.update_with_buffer(&shown, w, h).unwrap();
        if tracer.check_render() {
            break;
        }
    }
}

fn save_image(tracer: &RayTracer, path: &str) {
    let buffer = tracer.buffer();
    let (w, h) = (buffer.width(), buffer.height());
    let bytes = buffer.as_bytes();
    let mut img: image::RgbImage = image::ImageBuffer::new(w as u32, h as u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        // flip vertically: buffer row 0 is the bottom scanline
        let j = h - 1 - y as usize;
        let offset = (x as usize + j * w) * 3;
        *pixel = image::Rgb([bytes[offset], bytes[offset + 1], bytes[offset + 2]]);
    }
    match img.save(path) {
        Ok(()) => info!("wrote {}", path),
        Err(e) => error!("couldn't write {}: {}", path, e),
    }
}

fn main() {
    let opts = Opt::from_args();
    let term_log_level = parse_log_level(opts.print_log_level, LevelFilter::Warn);
    let write_log_level = parse_log_level(opts.write_log_level, LevelFilter::Info);

    CombinedLogger::init(vec![
        TermLogger::new(
            term_log_level,
            simplelog::Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            write_log_level,
            simplelog::Config::default(),
            File::create("main.log").unwrap(),
        ),
    ])
    .unwrap();

    let config = match get_settings(&opts.config_file) {
        Ok(config) => config,
        Err(v) => {
            error!("couldn't read {}, {:?}", opts.config_file, v);
            return;
        }
    };

    let scene_file = match opts.scene_file.or_else(|| config.scene_file.clone()) {
        Some(path) => path,
        None => {
            error!("no scene file given on the command line or in the config");
            return;
        }
    };

    let threads = config.trace.thread_count();
    let mut tracer = RayTracer::new(config.trace);
    if !tracer.load_scene(&scene_file) {
        return;
    }
    if opts.dry_run {
        return;
    }

    let (w, h) = (config.width, config.height);
    info!("rendering {} at {}x{} on {} threads", scene_file, w, h, threads);

    let now = Instant::now();
    tracer.trace_setup(w, h);
    tracer.trace_image(w, h);
    watch_pass(&tracer, threads);
    tracer.wait_render();

    if config.trace.super_samples > 0 {
        tracer.aa_image();
        watch_pass(&tracer, threads);
        tracer.wait_render();
    }

    let elapsed = now.elapsed().as_millis() as f64 / 1000.0;
    info!("rendered {} pixels in {}s", w * h, elapsed);

    let output = opts
        .output
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| "render.png".to_string());
    save_image(&tracer, &output);
}
