//! CLI errors

use std::path::PathBuf;

use gears_core::{ConfigError, GoldenError, StlError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("STL error: {0}")]
    Stl(#[from] StlError),
    #[error("Golden image error: {0}")]
    Golden(#[from] GoldenError),
    #[error("IO error: {0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("No captured frames in {}", .0.display())]
    NoCaptures(PathBuf),
}
