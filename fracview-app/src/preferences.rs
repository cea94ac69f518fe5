use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use fracview_core::{RasterCache, WorldRect};

const FILE_NAME: &str = "preferences.json";

/// Startup settings for the shell and its navigation controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: i32,
    /// Region shown by the bottom view, before aspect correction.
    #[serde(default)]
    pub home: WorldRect,
    #[serde(default = "default_cache_capacity_mb")]
    pub cache_capacity_mb: usize,
    /// Where `save` writes PNGs. Empty means the data directory's `images/`.
    #[serde(default)]
    pub export_dir: String,
}

fn default_width() -> i32 {
    300
}
fn default_height() -> i32 {
    300
}
fn default_max_iterations() -> i32 {
    5000
}
fn default_cache_capacity_mb() -> usize {
    RasterCache::DEFAULT_CAPACITY_BYTES / (1024 * 1024)
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            max_iterations: default_max_iterations(),
            home: WorldRect::default(),
            cache_capacity_mb: default_cache_capacity_mb(),
            export_dir: String::new(),
        }
    }
}

impl Preferences {
    pub fn cache_capacity_bytes(&self) -> usize {
        self.cache_capacity_mb.saturating_mul(1024 * 1024)
    }

    /// Directory that receives exported images.
    pub fn export_directory(&self) -> PathBuf {
        if self.export_dir.is_empty() {
            data_directory().join("images")
        } else {
            PathBuf::from(&self.export_dir)
        }
    }

    /// Load from the platform config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Preferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    return prefs;
                }
                Err(e) => warn!("Failed to parse preferences: {e}"),
            },
            Err(e) => warn!("Failed to read preferences file: {e}"),
        }
        Self::default()
    }

    /// Persist to the platform config directory.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences to {}", path.display());
                }
            }
            Err(e) => warn!("Failed to serialize preferences: {e}"),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "fracview")
}

/// Directory containing the running executable, or the working directory.
fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(exe_directory)
        .join(FILE_NAME)
}

fn data_directory() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(exe_directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("fracview_prefs_{name}_{}", std::process::id()))
            .join(FILE_NAME)
    }

    #[test]
    fn defaults_match_classic_panel() {
        let prefs = Preferences::default();
        assert_eq!((prefs.width, prefs.height), (300, 300));
        assert_eq!(prefs.max_iterations, 5000);
        assert_eq!(prefs.home, WorldRect::new(2.0, -2.0, -2.0, 2.0));
        assert_eq!(prefs.cache_capacity_bytes(), RasterCache::DEFAULT_CAPACITY_BYTES);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{ "width": 640 }"#).unwrap();
        assert_eq!(prefs.width, 640);
        assert_eq!(prefs.height, 300);
        assert_eq!(prefs.max_iterations, 5000);
        assert!(prefs.export_dir.is_empty());
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip");
        let prefs = Preferences {
            width: 120,
            max_iterations: 800,
            export_dir: "/tmp/out".into(),
            ..Preferences::default()
        };
        prefs.save_to(&path);
        assert_eq!(Preferences::load_from(&path), prefs);
        assert_eq!(Preferences::load_from(&path).export_directory(), PathBuf::from("/tmp/out"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Preferences::load_from(&path), Preferences::default());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = temp_path("absent");
        assert_eq!(Preferences::load_from(&path), Preferences::default());
    }
}
