pub mod config;
pub mod error;
pub mod grid;
pub mod partition;

// Serial and worker-pool max reductions
pub mod reduce;

// Fixture setup, timing and ground-truth checks shared by the CLI and benches
pub mod perf;
