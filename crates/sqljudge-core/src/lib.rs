pub mod config;
pub mod engine;
pub mod errors;
pub mod fingerprint;
pub mod model;
pub mod normalize;
pub mod report;
pub mod sort;
pub mod validate;
