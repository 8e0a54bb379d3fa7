//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/ecstree/ecstree.toml`
//! 3. Local config: `<project_dir>/.ecstree.toml`
//! 4. Environment variables: `ECSTREE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};

/// Default label of the synthetic root in tree output.
pub const DEFAULT_ROOT_LABEL: &str = ".";

/// Unified configuration for ecstree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Reject dotted paths containing empty segments when loading input
    pub strict_segments: bool,
    /// Lines starting with this prefix are skipped by the loader
    pub comment_prefix: String,
    /// File extensions picked up when scanning a directory
    pub extensions: Vec<String>,
    /// Label of the synthetic root in tree output
    pub root_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strict_segments: false,
            comment_prefix: "#".into(),
            extensions: vec!["paths".into(), "txt".into()],
            root_label: DEFAULT_ROOT_LABEL.into(),
        }
    }
}

/// Raw settings for intermediate parsing.
///
/// Every field is optional so layered merging can tell "not specified"
/// apart from an explicit value.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub strict_segments: Option<bool>,
    pub comment_prefix: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub root_label: Option<String>,
}

/// Merge arrays with union semantics and negation support.
///
/// - Items from overlay are added to base
/// - Items prefixed with `!` remove the corresponding item from the result
/// - Duplicates are de-duplicated
///
/// # Examples
/// ```ignore
/// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
/// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
/// ```
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: HashSet<String> = base.iter().cloned().collect();

    for pattern in overlay {
        if let Some(negated) = pattern.strip_prefix('!') {
            result.remove(negated);
        } else {
            result.insert(pattern.clone());
        }
    }

    // Convert to sorted Vec for deterministic output
    let mut vec: Vec<String> = result.into_iter().collect();
    vec.sort();
    vec
}

/// Get the XDG config directory for ecstree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ecstree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("ecstree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".ecstree.toml")
}

fn config_err(e: ConfigError) -> TreeError {
    TreeError::Config(e.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> TreeResult<RawSettings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TreeError::Config(format!("read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| TreeError::Config(format!("parse {}: {}", path.display(), e)))
}

impl Settings {
    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Arrays: union merge with negation support (if overlay specified)
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            strict_segments: overlay.strict_segments.unwrap_or(self.strict_segments),
            comment_prefix: overlay
                .comment_prefix
                .clone()
                .unwrap_or_else(|| self.comment_prefix.clone()),
            extensions: overlay
                .extensions
                .as_ref()
                .map(|o| merge_array(&self.extensions, o))
                .unwrap_or_else(|| self.extensions.clone()),
            root_label: overlay
                .root_label
                .clone()
                .unwrap_or_else(|| self.root_label.clone()),
        }
    }

    /// Apply a global (or explicitly named) config onto self with REPLACE
    /// semantics for arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            strict_segments: global.strict_segments.unwrap_or(self.strict_segments),
            comment_prefix: global
                .comment_prefix
                .clone()
                .unwrap_or_else(|| self.comment_prefix.clone()),
            extensions: global
                .extensions
                .clone()
                .unwrap_or_else(|| self.extensions.clone()),
            root_label: global
                .root_label
                .clone()
                .unwrap_or_else(|| self.root_label.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with `!item` negation
    /// - Any → Env vars: REPLACE
    #[instrument(level = "debug")]
    pub fn load(project_dir: Option<&Path>) -> TreeResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Load defaults overlaid with a single config file, nothing else.
    pub fn from_file(path: &Path) -> TreeResult<Self> {
        if !path.exists() {
            return Err(TreeError::FileNotFound(path.to_path_buf()));
        }
        let raw = load_raw_settings(path)?;
        Ok(Self::default().apply_global(&raw))
    }

    /// Apply ECSTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> TreeResult<Self> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("ECSTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_bool("strict_segments") {
            settings.strict_segments = val;
        }
        if let Ok(val) = config.get_string("comment_prefix") {
            settings.comment_prefix = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("extensions") {
            settings.extensions = val;
        }
        if let Ok(val) = config.get_string("root_label") {
            settings.root_label = val;
        }

        Ok(settings)
    }

    pub fn to_toml(&self) -> TreeResult<String> {
        toml::to_string_pretty(self).map_err(|e| TreeError::Config(e.to_string()))
    }
}
