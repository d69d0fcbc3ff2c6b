//! Types, functions and constants that are globally relevant throughout the codebase.

mod args;
mod config;
mod context;

pub use args::*;
pub use config::*;
pub use context::*;

pub const CONFIG_FILENAME: &str = "mdpreview.toml";

/// Name of the per-project directory holding uploaded images.
pub const IMAGE_DIRECTORY: &str = "img";
