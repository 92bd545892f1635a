//! Scenario benchmarks: complete voices and the master bus.

mod voices;

pub use voices::bench_voices;
