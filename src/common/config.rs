use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::render::RenderOptions;

/// Represents the contents of `mdpreview.toml`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Public base URL of the server, used to absolutize relative image links.
    pub root_url: String,
    /// Directory holding one subdirectory per project. Relative paths are
    /// resolved against the directory containing the configuration file.
    pub data_dir: PathBuf,
    pub render: Render,
    pub serve: Serve,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root_url: "http://localhost:3000".to_string(),
            data_dir: PathBuf::from("data"),
            render: Render::default(),
            serve: Serve::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Render {
    /// Prepended to every generated heading ID.
    pub anchor_prefix: String,
    pub smart_punctuation: bool,
    pub lazy_images: bool,
    /// Heading text that triggers table of contents generation.
    pub toc_heading: String,
    pub toc_max_depth: u8,
}

impl Default for Render {
    fn default() -> Self {
        Render {
            anchor_prefix: String::new(),
            smart_punctuation: false,
            lazy_images: true,
            toc_heading: "目次".to_string(),
            toc_max_depth: 5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Serve {
    pub address: String,
    pub port: u16,
    /// Maximum accepted request body size in bytes (image uploads).
    pub upload_limit: usize,
}

impl Default for Serve {
    fn default() -> Self {
        Serve {
            address: "0.0.0.0".to_string(),
            port: 3000,
            upload_limit: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let toml_raw = match path.exists() {
            true => {
                std::fs::read_to_string(path)
                    .wrap_err("Could not read in configuration file.")
                    .suggestion("The configuration file was found, but couldn't be read - try checking your file permissions.")?
            },
            false => bail!("Configuration file not found.")
        };

        Self::from_toml(&toml_raw)
    }

    pub fn from_toml(toml_raw: &str) -> Result<Self> {
        toml::from_str(toml_raw)
            .wrap_err("Could not parse configuration file.")
            .suggestion("Check the file for TOML syntax errors and misspelled keys.")
    }

    /// Builds the render options for a document belonging to `project`.
    pub fn render_options(&self, project: &str) -> RenderOptions {
        RenderOptions {
            prefix: self.render.anchor_prefix.clone(),
            smart_punctuation: self.render.smart_punctuation,
            lazy_images: self.render.lazy_images,
            toc_heading: self.render.toc_heading.clone(),
            toc_max_depth: self.render.toc_max_depth,
            image_base: Some(image_base(&self.root_url, project)),
        }
    }
}

/// The URL relative image links in `project` are resolved against.
pub fn image_base(root_url: &str, project: &str) -> String {
    format!(
        "{}/projects/{}/",
        root_url.trim_end_matches('/'),
        urlencoding::encode(project)
    )
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn partial_config() {
        let config = Config::from_toml(indoc! {r#"
            root_url = "https://notes.example.com/"

            [render]
            anchor_prefix = "user-content-"

            [serve]
            port = 8080
        "#}).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.render.anchor_prefix, "user-content-");
        assert_eq!(config.render.toc_heading, "目次");
        assert_eq!(config.render.toc_max_depth, 5);
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.serve.address, "0.0.0.0");

        let options = config.render_options("my notes");
        assert_eq!(options.prefix, "user-content-");
        assert_eq!(
            options.image_base.as_deref(),
            Some("https://notes.example.com/projects/my%20notes/")
        );
    }

    #[test]
    fn malformed_config() {
        assert!(Config::from_toml("root_url = [").is_err());
        assert!(Config::from_toml("[serve]\nport = \"eighty\"").is_err());
    }
}
