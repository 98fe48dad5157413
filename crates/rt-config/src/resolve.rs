//! Configuration resolution and path discovery.
//!
//! Resolution order: explicit path → environment variables → XDG paths → defaults.

use crate::analysis::AnalysisConfig;
use crate::validate::{validate_analysis, ValidationError, ValidationResult};
use std::path::{Path, PathBuf};

/// Discovered configuration file paths.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to analysis.json (or None if not found).
    pub analysis: Option<PathBuf>,

    /// Source of the analysis config (for diagnostics).
    pub analysis_source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided by the caller.
    Explicit,

    /// Set via environment variable.
    Environment,

    /// Found in the XDG/platform config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Explicit => write!(f, "explicit path"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
const ENV_ANALYSIS_PATH: &str = "RT_ANALYSIS_CONFIG";
const ENV_CONFIG_DIR: &str = "RT_CONFIG_DIR";

const ANALYSIS_FILENAME: &str = "analysis.json";

/// Application name for XDG directories.
const APP_NAME: &str = "rollertap";

/// Resolve the analysis config path.
///
/// 1. Explicit path (if provided and present)
/// 2. `RT_ANALYSIS_CONFIG`
/// 3. `RT_CONFIG_DIR` + analysis.json
/// 4. `$XDG_CONFIG_HOME/rollertap/analysis.json`, then the platform config dir
/// 5. Built-in defaults (None)
pub fn resolve_config(explicit: Option<&Path>) -> ConfigPaths {
    let mut paths = ConfigPaths::default();

    if let Some(path) = explicit {
        if path.exists() {
            paths.analysis = Some(path.to_path_buf());
            paths.analysis_source = ConfigSource::Explicit;
            return paths;
        }
    }

    if let Ok(env_path) = std::env::var(ENV_ANALYSIS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            paths.analysis = Some(path);
            paths.analysis_source = ConfigSource::Environment;
            return paths;
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(ANALYSIS_FILENAME);
        if path.exists() {
            paths.analysis = Some(path);
            paths.analysis_source = ConfigSource::Environment;
            return paths;
        }
    }

    let xdg = std::env::var("XDG_CONFIG_HOME").ok().map(PathBuf::from);
    for base in xdg.into_iter().chain(dirs::config_dir()) {
        let path = base.join(APP_NAME).join(ANALYSIS_FILENAME);
        if path.exists() {
            paths.analysis = Some(path);
            paths.analysis_source = ConfigSource::XdgConfig;
            return paths;
        }
    }

    paths
}

/// Load and validate the analysis config named by `paths`.
///
/// Falls back to [`AnalysisConfig::default`] when no file was found.
pub fn load_analysis(paths: &ConfigPaths) -> ValidationResult<AnalysisConfig> {
    let Some(path) = &paths.analysis else {
        return Ok(AnalysisConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .map_err(|e| ValidationError::IoError(format!("{}: {}", path.display(), e)))?;
    let cfg: AnalysisConfig = serde_json::from_str(&content)
        .map_err(|e| ValidationError::ParseError(format!("{}: {}", path.display(), e)))?;
    validate_analysis(&cfg)?;
    Ok(cfg)
}
