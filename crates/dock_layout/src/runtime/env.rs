//! Environment lookup helpers.

use std::env;
use std::path::PathBuf;

/// Environment variable naming the layout config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "DOCK_LAYOUT_CONFIG";

/// Shared environment helper utilities.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvHelper;

impl EnvHelper {
    /// Normalize a raw path variable; unset and blank values mean "not configured".
    pub fn normalized_path(raw: Option<&str>) -> Option<PathBuf> {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
            _ => None,
        }
    }

    /// Config path from [`CONFIG_ENV_VAR`], if set.
    pub fn config_path(&self) -> Option<PathBuf> {
        Self::normalized_path(env::var(CONFIG_ENV_VAR).ok().as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_path_ignores_blank_values() {
        assert_eq!(EnvHelper::normalized_path(None), None);
        assert_eq!(EnvHelper::normalized_path(Some("")), None);
        assert_eq!(EnvHelper::normalized_path(Some("   ")), None);
        assert_eq!(
            EnvHelper::normalized_path(Some(" /etc/dock-layout.toml ")),
            Some(PathBuf::from("/etc/dock-layout.toml"))
        );
    }
}
