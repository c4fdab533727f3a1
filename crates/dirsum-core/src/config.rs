use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum::Algorithm;

/// Global configuration loaded from `~/.config/dirsum/config.toml`.
/// Every field may be omitted from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirsumConfig {
    /// Digest used when neither `--algorithm` nor the manifest extension picks one.
    pub algorithm: Algorithm,
    /// Follow symlinked directories when scanning and when searching for manifests.
    pub follow_symlinks: bool,
    /// Show per-file progress when stdout is a terminal.
    pub progress: bool,
    /// Colored output when stdout is a terminal.
    pub colors: bool,
}

impl Default for DirsumConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Md5,
            follow_symlinks: false,
            progress: true,
            colors: true,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dirsum")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the XDG config file, creating it with defaults if
/// it does not exist.
pub fn load_or_init() -> Result<DirsumConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit config file path.
pub fn load_or_init_at(path: &Path) -> Result<DirsumConfig> {
    if !path.exists() {
        let cfg = DirsumConfig::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        fs::write(path, toml::to_string_pretty(&cfg)?)
            .with_context(|| format!("write default config {}", path.display()))?;
        tracing::info!(path = %path.display(), "created default config");
        return Ok(cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: DirsumConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), algorithm = %cfg.algorithm, "loaded config");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = DirsumConfig::default();
        assert_eq!(cfg.algorithm, Algorithm::Md5);
        assert!(!cfg.follow_symlinks);
        assert!(cfg.progress);
        assert!(cfg.colors);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = DirsumConfig {
            algorithm: Algorithm::Sha256,
            follow_symlinks: true,
            progress: false,
            colors: true,
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: DirsumConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let cfg: DirsumConfig = toml::from_str(r#"algorithm = "sha256""#).unwrap();
        assert_eq!(cfg.algorithm, Algorithm::Sha256);
        assert!(!cfg.follow_symlinks);
        assert!(cfg.progress);

        let empty: DirsumConfig = toml::from_str("").unwrap();
        assert_eq!(empty, DirsumConfig::default());
    }

    #[test]
    fn config_toml_rejects_unknown_algorithm() {
        assert!(toml::from_str::<DirsumConfig>(r#"algorithm = "crc32""#).is_err());
    }

    #[test]
    fn load_or_init_at_writes_defaults_then_reads_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dirsum").join("config.toml");

        let created = load_or_init_at(&path).unwrap();
        assert_eq!(created, DirsumConfig::default());
        assert!(path.exists());

        fs::write(&path, "algorithm = \"sha256\"\nprogress = false\n").unwrap();
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.algorithm, Algorithm::Sha256);
        assert!(!loaded.progress);
        assert!(loaded.colors);
    }

    #[test]
    fn load_or_init_at_names_file_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "algorithm = [").unwrap();
        let err = load_or_init_at(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}
