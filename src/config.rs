//! Build configuration.
//!
//! Loaded from a `build.toml` (or constructed in code by the embedding
//! application). Only `build_dir` is required; everything else defaults.
//! Unknown keys are rejected to catch typos early.
//!
//! ```toml
//! build_dir = "dist"        # Output root — destroyed and recreated per build
//!
//! host = "example.com"      # Base host for absolute URL resolution
//! scheme = "https"          # "http" or "https"
//! sitemap = true            # Emit sitemap.xml after the build
//! expose = true             # Mirror copied assets before rendering
//! # max_pages = 10000       # Abort if discovery exceeds this many pages
//!
//! [[copy]]                  # Assets mirrored into the output tree
//! src = "public/assets"
//! dest = "assets"           # Defaults to the source's base name
//! fail_if_missing = false   # Missing source: error, or warn and continue
//! excludes = ["*.map"]      # gitignore-style patterns
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for one build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Output root. Cleared (destructively) at the start of every build.
    pub build_dir: PathBuf,
    /// Host used for absolute URL resolution.
    #[serde(default = "default_host")]
    pub host: String,
    /// Scheme used for absolute URL resolution.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Emit `sitemap.xml` listing every built page.
    #[serde(default = "default_true")]
    pub sitemap: bool,
    /// Run the asset mirror before rendering.
    #[serde(default = "default_true")]
    pub expose: bool,
    /// Hard cap on pages per build. Discovery past the cap aborts the build
    /// — the guard against unbounded dynamically-generated link graphs.
    /// `None` means unlimited; the caller then guarantees a finite graph.
    #[serde(default)]
    pub max_pages: Option<usize>,
    /// Assets mirrored into the output tree.
    #[serde(default, rename = "copy")]
    pub files_to_copy: Vec<CopySpec>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_true() -> bool {
    true
}

impl BuildConfig {
    /// Config with the given output root and defaults for everything else.
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            host: default_host(),
            scheme: default_scheme(),
            sitemap: true,
            expose: true,
            max_pages: None,
            files_to_copy: Vec::new(),
        }
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn sitemap(mut self, sitemap: bool) -> Self {
        self.sitemap = sitemap;
        self
    }

    pub fn expose(mut self, expose: bool) -> Self {
        self.expose = expose;
        self
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn copy(mut self, spec: CopySpec) -> Self {
        self.files_to_copy.push(spec);
        self
    }

    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("build_dir must not be empty".into()));
        }
        if self.host.is_empty() {
            return Err(ConfigError::Validation("host must not be empty".into()));
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(ConfigError::Validation(format!(
                "scheme must be \"http\" or \"https\", got \"{}\"",
                self.scheme
            )));
        }
        if self.max_pages == Some(0) {
            return Err(ConfigError::Validation(
                "max_pages must be at least 1 when set".into(),
            ));
        }
        for spec in &self.files_to_copy {
            if spec.src.as_os_str().is_empty() {
                return Err(ConfigError::Validation("copy.src must not be empty".into()));
            }
        }
        Ok(())
    }
}

/// One source path to mirror into the output tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopySpec {
    /// File or directory to copy.
    pub src: PathBuf,
    /// Name under the build dir. Defaults to the source's base name.
    #[serde(default)]
    pub dest: Option<String>,
    /// Treat a missing source as a build error instead of a warning.
    #[serde(default)]
    pub fail_if_missing: bool,
    /// gitignore-style patterns excluded from directory copies.
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl CopySpec {
    pub fn new(src: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dest: None,
            fail_if_missing: false,
            excludes: Vec::new(),
        }
    }

    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn fail_if_missing(mut self, fail: bool) -> Self {
        self.fail_if_missing = fail;
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    /// Destination name under the build dir: explicit `dest`, or the
    /// source's base name.
    pub fn dest_name(&self) -> String {
        match &self.dest {
            Some(dest) => dest.clone(),
            None => self
                .src
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}
