use std::error::Error;
use std::fs::File;
use std::io::Read;

use serde::Deserialize;

/// The knobs the image driver snapshots at trace_setup time.
#[derive(Deserialize, Copy, Clone, Debug)]
#[serde(default)]
pub struct TraceConfig {
    /// maximum recursion depth
    pub depth: i32,
    /// attenuation cutoff: recursion stops once every component of the
    /// accumulated ray weight drops below this
    pub threshold: f64,
    /// worker count, defaults to the machine's logical cpus
    pub threads: Option<usize>,
    /// recorded for tiling strategies, unused by the pixel stride
    pub block_size: usize,
    /// supersampling grid dimension for the aa pass, 0 disables it
    pub super_samples: usize,
    /// per-channel edge detection threshold for the aa pass
    pub aa_threshold: f64,
    pub kd_switch: bool,
    pub kd_max_depth: usize,
    pub kd_leaf_size: usize,
}

impl Default for TraceConfig {
    fn default() -> TraceConfig {
        TraceConfig {
            depth: 5,
            threshold: 0.0,
            threads: None,
            block_size: 4,
            super_samples: 0,
            aa_threshold: 0.1,
            kd_switch: true,
            kd_max_depth: 15,
            kd_leaf_size: 10,
        }
    }
}

impl TraceConfig {
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub scene_file: Option<String>,
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    pub output: Option<String>,
    #[serde(default)]
    pub trace: TraceConfig,
}

fn default_width() -> usize {
    512
}

fn default_height() -> usize {
    512
}

pub fn get_settings(filepath: &str) -> Result<Config, Box<dyn Error>> {
    let mut input = String::new();
    File::open(filepath).and_then(|mut f| f.read_to_string(&mut input))?;
    let settings: Config = toml::from_str(&input)?;
    Ok(settings)
}
