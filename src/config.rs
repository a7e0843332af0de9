//! Configuration loading and discovery for `qlens.toml`.
//!
//! ```toml
//! [collocation]
//! window = "distance"
//! distance = 2
//! distance_unit = "token"
//! min_frequency = 3
//! group_by = "lemma"
//!
//! [layout]
//! width = 1024
//! height = 1024
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{CollocationOptions, DistanceUnit, WindowType};
use crate::engine::collocation::{DEFAULT_MIN_FREQUENCY, DEFAULT_SAMPLE_CAP};
use crate::layout::LayoutConfig;
use crate::types::{LensError, LensResult, TermKind};

/// File name searched for during discovery.
pub const CONFIG_FILE: &str = "qlens.toml";

/// Default collocation parameters, `[collocation]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollocationDefaults {
    pub window: WindowType,
    pub distance: u32,
    pub distance_unit: DistanceUnit,
    pub min_frequency: u32,
    pub group_by: TermKind,
    pub sample_cap: usize,
}

impl Default for CollocationDefaults {
    fn default() -> Self {
        Self {
            window: WindowType::Ayah,
            distance: 3,
            distance_unit: DistanceUnit::Ayah,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            group_by: TermKind::Root,
            sample_cap: DEFAULT_SAMPLE_CAP,
        }
    }
}

/// Top-level `qlens.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub collocation: CollocationDefaults,
    pub layout: LayoutConfig,
}

impl LensConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> LensResult<Self> {
        let config: LensConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Report every problem at once.
    pub fn validate(&self) -> LensResult<()> {
        let mut problems = Vec::new();
        let c = &self.collocation;
        if c.distance < 1 {
            problems.push("collocation.distance must be at least 1".to_string());
        }
        if c.min_frequency < 1 {
            problems.push("collocation.min_frequency must be at least 1".to_string());
        }
        problems.extend(self.layout.problems().into_iter().map(|p| format!("layout: {p}")));

        if problems.is_empty() {
            Ok(())
        } else {
            Err(LensError::config(problems.join("; ")))
        }
    }

    /// Collocation options seeded from the `[collocation]` section. Query
    /// specific fields (POS filter, pair term) start unset.
    pub fn collocation_options(&self) -> CollocationOptions {
        let c = &self.collocation;
        CollocationOptions {
            window_type: c.window,
            distance: c.distance,
            distance_unit: c.distance_unit,
            min_frequency: c.min_frequency,
            group_by: c.group_by,
            pos_filter: None,
            pair_term: None,
            sample_cap: c.sample_cap,
        }
    }
}

/// Look for `qlens.toml` in the current directory, then in the user
/// config directory (`<config_dir>/qlens/qlens.toml`).
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_in(&cwd) {
            return Some(path);
        }
    }
    dirs::config_dir().and_then(|dir| find_config_in(&dir.join("qlens")))
}

/// `dir/qlens.toml` if it exists.
pub fn find_config_in(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Load configuration from `path`, or from the discovered file, or fall
/// back to defaults when none exists.
pub fn load_config(path: Option<&Path>) -> LensResult<LensConfig> {
    let found = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };
    match found {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            let text = fs::read_to_string(&p)?;
            LensConfig::from_toml_str(&text)
        }
        None => {
            log::debug!("no {CONFIG_FILE} found, using defaults");
            Ok(LensConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(LensConfig::from_toml_str("").unwrap(), LensConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let cfg = LensConfig::from_toml_str(
            "[collocation]\nwindow = \"distance\"\ndistance = 2\ndistance_unit = \"token\"\ngroup_by = \"lemma\"\n\n[layout]\nwidth = 1024.0\n",
        )
        .unwrap();
        assert_eq!(cfg.collocation.window, WindowType::Distance);
        assert_eq!(cfg.collocation.distance_unit, DistanceUnit::Token);
        assert_eq!(cfg.collocation.min_frequency, DEFAULT_MIN_FREQUENCY);
        assert_eq!(cfg.layout.width, 1024.0);
        assert_eq!(cfg.layout.height, LayoutConfig::default().height);

        let opts = cfg.collocation_options();
        assert_eq!(opts.group_by, TermKind::Lemma);
        assert_eq!(opts.distance, 2);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validation_collects_problems() {
        let err = LensConfig::from_toml_str(
            "[collocation]\ndistance = 0\nmin_frequency = 0\n[layout]\ninner_radius = 900.0\n",
        )
        .unwrap_err();
        assert!(err.is_configuration());
        let msg = err.to_string();
        assert!(msg.contains("distance"));
        assert!(msg.contains("min_frequency"));
        assert!(msg.contains("layout: inner_radius"));
    }

    #[test]
    fn test_unknown_collocation_key_rejected() {
        let err = LensConfig::from_toml_str("[collocation]\nwindw = \"ayah\"\n").unwrap_err();
        assert!(matches!(err, LensError::Toml(_)));
    }

    #[test]
    fn test_find_and_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_in(dir.path()).is_none());

        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[collocation]\nmin_frequency = 4\n").unwrap();
        assert_eq!(find_config_in(dir.path()), Some(path.clone()));

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.collocation.min_frequency, 4);
    }

    #[test]
    fn test_missing_explicit_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, LensError::Io(_)));
    }
}
