#[macro_use]
extern crate log;

pub mod aabb;
pub mod accelerator;
pub mod camera;
pub mod config;
pub mod geometry;
pub mod hittable;
pub mod light;
pub mod material;
pub mod math;
pub mod parsing;
pub mod prelude;
pub mod scene;
pub mod tracer;

/// Offset applied to spawned rays to keep them off the surface they
/// originated from.
pub const RAY_EPSILON: f64 = 1.0e-12;

/// Parametric-position bias applied when a traversal ray runs parallel to a
/// kd split axis.
pub const PARALLEL_BIAS: f64 = 1.0e-6;

pub fn rgb_to_u32(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[cfg(test)]
pub fn log_test_setup() {
    use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

    let _ = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}
