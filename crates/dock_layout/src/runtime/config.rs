//! Typed configuration loading and the layout configuration.

use crate::runtime::error::{DockError, DockResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Process whose presence gates the run and which is relaunched after saving.
pub const DEFAULT_PROCESS_NAME: &str = "Dock";
/// Preference domain holding the Dock configuration.
pub const DEFAULT_DOMAIN: &str = "com.apple.dock";
/// Seconds to wait for the Dock to appear.
pub const DEFAULT_MAX_WAIT_SECS: u64 = 300;
/// Pinned applications, left to right.
pub const DEFAULT_APPS: &[&str] = &[
    "/Applications/Google Chrome.app",
    "/Applications/Slack.app",
    "/Applications/zoom.us.app",
    "/Applications/1Password 7.app",
    "/Applications/Self Service.app",
    "/System/Applications/System Preferences.app",
];

/// Generic TOML-backed config loader.
///
/// `ConfigLoader<T>` handles only filesystem access and TOML deserialization. Callers are still
/// responsible for semantic validation after the typed value is loaded.
#[derive(Clone, Debug)]
pub struct ConfigLoader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: DeserializeOwned,
{
    /// Create a loader for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Load and deserialize the configuration file.
    ///
    /// Missing files, unreadable files, and TOML parse failures are all surfaced as
    /// [`DockErrorCategory::Config`](crate::runtime::error::DockErrorCategory::Config).
    pub fn load(&self) -> DockResult<T> {
        let body = fs::read_to_string(&self.path).map_err(|err| {
            DockError::config(format!("failed to read {}: {err}", self.path.display()))
        })?;
        toml::from_str(&body).map_err(|err| {
            DockError::config(format!("failed to parse {}: {err}", self.path.display()))
        })
    }
}

/// What to pin, where it is stored, and how long to wait for the Dock.
///
/// Every key is optional in the file; absent keys take the compiled-in defaults.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Exact process name the readiness gate waits for.
    pub process_name: String,
    /// Preference domain holding `persistent-apps`.
    pub domain: String,
    /// Maximum seconds to wait; `0` checks once.
    pub max_wait_secs: u64,
    /// Application bundle paths in Dock order.
    pub apps: Vec<String>,
    /// Directory of plist files to use instead of the `defaults` tool.
    pub prefs_dir: Option<PathBuf>,
    /// Directory receiving run manifests and event logs.
    pub log_dir: Option<PathBuf>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            max_wait_secs: DEFAULT_MAX_WAIT_SECS,
            apps: DEFAULT_APPS.iter().map(ToString::to_string).collect(),
            prefs_dir: None,
            log_dir: None,
        }
    }
}

impl LayoutConfig {
    /// Load a config file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> DockResult<Self> {
        match path {
            Some(path) => ConfigLoader::<Self>::new(path)
                .load()
                .map_err(|err| err.with_path(path)),
            None => Ok(Self::default()),
        }
    }

    /// Check the semantic constraints TOML cannot express.
    ///
    /// Application paths are not checked for existence, only for shape.
    pub fn validate(&self) -> DockResult<()> {
        if self.process_name.trim().is_empty() {
            return Err(DockError::config("`process_name` must not be empty"));
        }
        if self.domain.trim().is_empty() {
            return Err(DockError::config("`domain` must not be empty"));
        }
        for (index, app) in self.apps.iter().enumerate() {
            if app.trim().is_empty() {
                return Err(DockError::config(format!("`apps[{index}]` is empty")));
            }
            if !Path::new(app).is_absolute() {
                return Err(DockError::config(format!(
                    "`apps[{index}]` must be an absolute path, got `{app}`"
                ))
                .with_hint("use the full bundle path, e.g. /Applications/Safari.app"));
            }
        }
        Ok(())
    }
}
