//! Domain types for noise sweep analysis

pub mod dataset;
pub mod noise;
pub mod sample;

pub use dataset::{Dataset, DatasetHash};
pub use noise::NoiseLevel;
pub use sample::Sample;
