//! jsonblog: a static site generator for blogs described by a single JSON file
//!
//! The core entry point is [`generate`]: a [`Blog`] configuration and a base
//! directory in, an ordered list of [`GeneratedFile`]s out. Everything else
//! (the CLI commands and the development server) is built on top of it.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

pub use config::Blog;
pub use error::{ConfigError, ContentError, Error, Result};
pub use generator::{GeneratedFile, Generator};

use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG: &str = "blog.json";

/// Default output directory
pub const DEFAULT_OUTPUT: &str = "build";

/// Generate the whole site for `blog`, resolving local sources against `base_dir`
pub async fn generate<P: AsRef<Path>>(blog: &Blog, base_dir: P) -> Result<Vec<GeneratedFile>> {
    Generator::new(base_dir)?.generate(blog).await
}

/// The main application: where the config lives and where output goes
#[derive(Debug, Clone)]
pub struct JsonBlog {
    /// Configuration file
    pub config_path: PathBuf,
    /// Directory local sources resolve against (the config's directory)
    pub base_dir: PathBuf,
    /// Build output directory
    pub output_dir: PathBuf,
}

impl JsonBlog {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(config_path: P, output_dir: Q) -> Self {
        let config_path = config_path.as_ref().to_path_buf();
        let base_dir = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self {
            config_path,
            base_dir,
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Read and parse the configuration file
    pub fn load_blog(&self) -> std::result::Result<Blog, ConfigError> {
        Blog::load(&self.config_path)
    }

    /// Generate the site and write it to the output directory
    pub async fn build(&self) -> anyhow::Result<usize> {
        commands::build::run(self).await
    }

    /// Remove the output directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}
