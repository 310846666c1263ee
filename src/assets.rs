//! Asset loading with embedded fallbacks
//!
//! HTML templates and the default config are compiled into the binary. Each
//! can be overridden from the filesystem:
//!
//! - If an env var is NOT set: use embedded assets only (no filesystem access)
//! - If an env var IS set and the path is empty/missing: seed with embedded assets, then use filesystem
//! - If an env var IS set and the path has files: use filesystem with embedded fallback

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded page templates
#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct EmbeddedTemplates;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Templates,
    Config,
}

/// Report of seeding operations
#[derive(Debug, Default)]
pub struct SeedReport {
    pub templates_seeded: Vec<String>,
    pub config_seeded: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.templates_seeded.is_empty() && !self.config_seeded
    }
}

/// Asset loader with merge behavior and optional filesystem override
pub struct AssetLoader {
    /// External templates directory (from TEMPLATES_DIR env var)
    templates_dir: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    /// If `None`, embedded assets are used exclusively.
    pub fn new(templates_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            templates_dir,
            config_file,
        }
    }

    /// Create a loader from `TEMPLATES_DIR` and `CONFIG_FILE`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("TEMPLATES_DIR").ok().map(PathBuf::from),
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
        )
    }

    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates_dir.as_deref()
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Whether templates may change on disk while the server runs.
    pub fn has_template_overrides(&self) -> bool {
        self.templates_dir.as_ref().is_some_and(|dir| dir.is_dir())
    }

    /// Read a template by file name
    ///
    /// If an external directory is configured, tries filesystem first, then falls back to embedded.
    pub fn read_template(&self, name: &str) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref dir) = self.templates_dir {
            let full_path = dir.join(name);
            if full_path.is_file() {
                tracing::trace!(path = %full_path.display(), "Loading template from filesystem");
                return Ok(Cow::Owned(fs::read(&full_path)?));
            }
        }

        EmbeddedTemplates::get(name)
            .map(|f| {
                tracing::trace!(template = %name, "Loading template from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Template not found: {name}"),
                )
            })
    }

    /// Read a template as a UTF-8 string
    pub fn read_template_string(&self, name: &str) -> io::Result<String> {
        let bytes = self.read_template(name)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// List all available templates (merged view of embedded + external)
    pub fn list_templates(&self) -> Vec<String> {
        let mut files: BTreeSet<String> =
            EmbeddedTemplates::iter().map(|s| s.to_string()).collect();

        if let Some(ref dir) = self.templates_dir {
            if let Ok(entries) = fs::read_dir(dir) {
                for entry in entries.flatten() {
                    if let Some(name) = entry.file_name().to_str() {
                        if name.ends_with(".html") {
                            files.insert(name.to_string());
                        }
                    }
                }
            }
        }

        files.into_iter().collect()
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Check if a directory exists and is empty (ignoring .gitkeep)
    fn is_empty_dir(path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }
        path.read_dir()
            .map(|mut entries| {
                entries.all(|e| {
                    e.map(|entry| entry.file_name() == ".gitkeep")
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// Seed empty/missing locations with embedded assets
    ///
    /// Only operates on paths that were configured (env var was set).
    pub fn seed_if_configured(&self) -> io::Result<SeedReport> {
        let mut report = SeedReport::default();

        if let Some(ref dir) = self.templates_dir {
            if !dir.exists() || Self::is_empty_dir(dir) {
                fs::create_dir_all(dir)?;
                for file in EmbeddedTemplates::iter() {
                    if let Some(data) = EmbeddedTemplates::get(&file) {
                        fs::write(dir.join(file.as_ref()), &*data.data)?;
                        report.templates_seeded.push(file.to_string());
                    }
                }
                if !report.templates_seeded.is_empty() {
                    tracing::info!(
                        dir = %dir.display(),
                        count = report.templates_seeded.len(),
                        "Seeded templates directory with embedded assets"
                    );
                }
            }
        }

        if let Some(ref path) = self.config_file {
            if !path.exists() {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                if let Some(data) = EmbeddedConfig::get("config.yaml") {
                    fs::write(path, &*data.data)?;
                    report.config_seeded = true;
                    tracing::info!(path = %path.display(), "Seeded config file with embedded default");
                }
            }
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Templates => EmbeddedTemplates::iter().map(|s| s.to_string()).collect(),
            AssetCategory::Config => vec!["config.yaml".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_templates_present() {
        let templates = AssetLoader::list_embedded(AssetCategory::Templates);
        for name in [
            "home.html",
            "upload.html",
            "results.html",
            "dashboard.html",
            "error.html",
        ] {
            assert!(
                templates.iter().any(|t| t == name),
                "missing embedded template {name}"
            );
        }
    }

    #[test]
    fn test_embedded_config_readable() {
        let loader = AssetLoader::new(None, None);
        let config = loader.read_config_string().unwrap();
        assert!(config.contains("analysis:"));
    }

    #[test]
    fn test_template_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("home.html"), "custom home").unwrap();

        let loader = AssetLoader::new(Some(dir.path().to_path_buf()), None);
        assert!(loader.has_template_overrides());
        assert_eq!(loader.read_template_string("home.html").unwrap(), "custom home");
        // Not overridden: embedded fallback
        assert!(loader
            .read_template_string("upload.html")
            .unwrap()
            .contains("<form"));
    }

    #[test]
    fn test_missing_template() {
        let loader = AssetLoader::new(None, None);
        let err = loader.read_template("nope.html").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_seed_empty_locations() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        let config = dir.path().join("etc").join("config.yaml");

        let loader = AssetLoader::new(Some(templates.clone()), Some(config.clone()));
        let report = loader.seed_if_configured().unwrap();

        assert!(report.config_seeded);
        assert!(config.exists());
        assert_eq!(
            report.templates_seeded.len(),
            AssetLoader::list_embedded(AssetCategory::Templates).len()
        );
        assert!(templates.join("results.html").exists());

        // Second run leaves existing files alone
        let report = loader.seed_if_configured().unwrap();
        assert!(report.is_empty());
    }
}
