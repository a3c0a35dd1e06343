//! Shared command context passed into command families.

use crate::runtime::config::LayoutConfig;
use crate::runtime::defaults::DefaultsPrefsStore;
use crate::runtime::env::EnvHelper;
use crate::runtime::process::ProcessRunner;
use crate::runtime::workflow::WorkflowRecorder;
use dock_prefs::{PlistFilePrefsStore, PrefsDomainStore};
use std::path::PathBuf;

/// Shared execution context for command families.
#[derive(Clone, Debug, Default)]
pub struct CommandContext {
    env: EnvHelper,
    process: ProcessRunner,
    workflow: WorkflowRecorder,
}

impl CommandContext {
    /// Create a new command context.
    pub fn new() -> Self {
        Self {
            env: EnvHelper,
            process: ProcessRunner::new(),
            workflow: WorkflowRecorder::new(),
        }
    }

    /// Shared environment helper.
    pub fn env(&self) -> &EnvHelper {
        &self.env
    }

    /// Shared process runner.
    pub fn process(&self) -> &ProcessRunner {
        &self.process
    }

    /// Shared workflow recorder.
    pub fn workflow(&self) -> &WorkflowRecorder {
        &self.workflow
    }

    /// Resolve the config file: an explicit path wins over the environment.
    pub fn config_path(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| self.env.config_path())
    }

    /// Preference store selected by the config: a plist directory, or `defaults`.
    pub fn prefs_store(&self, config: &LayoutConfig) -> Box<dyn PrefsDomainStore> {
        match &config.prefs_dir {
            Some(dir) => Box::new(PlistFilePrefsStore::new(dir.clone())),
            None => Box::new(DefaultsPrefsStore::new(self.process)),
        }
    }
}
