pub mod config;
pub mod dsp;
pub mod io;
pub mod params; // Shared parameter storage and per-block snapshots
pub mod synth; // Voice orchestration and note events

pub use config::{ConfigError, EngineConfig};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;
