use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of methods-section characters shown in the preview by default.
pub const DEFAULT_PREVIEW_CHARS: usize = 3000;

/// File name used when exporting without an explicit path.
pub const DEFAULT_EXPORT_FILE: &str = "review_findings.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub display: Option<DisplayConfig>,
    pub extraction: Option<ExtractionConfig>,
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub color: Option<bool>,
    pub preview_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub expand_ligatures: Option<bool>,
    /// Fraction of page height from the top to drop as running header.
    pub header_exclusion: Option<f32>,
    /// Fraction of page height from the bottom to drop as footer.
    pub footer_exclusion: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: Option<String>,
    pub path: Option<String>,
}

impl ConfigFile {
    pub fn color(&self) -> bool {
        self.display.as_ref().and_then(|d| d.color).unwrap_or(true)
    }

    pub fn preview_chars(&self) -> usize {
        self.display
            .as_ref()
            .and_then(|d| d.preview_chars)
            .unwrap_or(DEFAULT_PREVIEW_CHARS)
    }

    pub fn expand_ligatures(&self) -> bool {
        self.extraction
            .as_ref()
            .and_then(|e| e.expand_ligatures)
            .unwrap_or(true)
    }

    pub fn header_exclusion(&self) -> f32 {
        self.extraction
            .as_ref()
            .and_then(|e| e.header_exclusion)
            .unwrap_or(0.0)
    }

    pub fn footer_exclusion(&self) -> f32 {
        self.extraction
            .as_ref()
            .and_then(|e| e.footer_exclusion)
            .unwrap_or(0.0)
    }

    pub fn export_format(&self) -> Option<&str> {
        self.export.as_ref().and_then(|e| e.format.as_deref())
    }

    pub fn export_path(&self) -> Option<&str> {
        self.export.as_ref().and_then(|e| e.path.as_deref())
    }
}

/// Platform config directory path: `<config_dir>/assayer/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("assayer").join("config.toml"))
}

/// Load config by cascading CWD `.assayer.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".assayer.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    if !path.exists() {
        return None;
    }
    match read_config(path) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config file");
            None
        }
    }
}

/// Strict variant of [`load_from_path`] for a path the user asked for explicitly.
pub fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        display: Some(DisplayConfig {
            color: overlay
                .display
                .as_ref()
                .and_then(|d| d.color)
                .or_else(|| base.display.as_ref().and_then(|d| d.color)),
            preview_chars: overlay
                .display
                .as_ref()
                .and_then(|d| d.preview_chars)
                .or_else(|| base.display.as_ref().and_then(|d| d.preview_chars)),
        }),
        extraction: Some(ExtractionConfig {
            expand_ligatures: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.expand_ligatures)
                .or_else(|| base.extraction.as_ref().and_then(|e| e.expand_ligatures)),
            header_exclusion: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.header_exclusion)
                .or_else(|| base.extraction.as_ref().and_then(|e| e.header_exclusion)),
            footer_exclusion: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.footer_exclusion)
                .or_else(|| base.extraction.as_ref().and_then(|e| e.footer_exclusion)),
        }),
        export: Some(ExportConfig {
            format: overlay
                .export
                .as_ref()
                .and_then(|e| e.format.clone())
                .or_else(|| base.export.as_ref().and_then(|e| e.format.clone())),
            path: overlay
                .export
                .as_ref()
                .and_then(|e| e.path.clone())
                .or_else(|| base.export.as_ref().and_then(|e| e.path.clone())),
        }),
    }
}
