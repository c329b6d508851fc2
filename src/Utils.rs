//! different utility modules used throughout the project
/// tiny module to wire up logging and save sampled curves into file
pub mod logger;
/// plot renderers for the standard diagrams
pub mod plots;
