//! Command families and their shared option handling.

pub mod apply;
pub mod show;
pub mod wait;

use crate::runtime::config::LayoutConfig;
use crate::runtime::context::CommandContext;
use crate::runtime::error::{DockError, DockResult};
use std::path::PathBuf;

/// Options shared by the command families; each family accepts a subset.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LayoutOptions {
    pub config: Option<PathBuf>,
    pub max_wait: Option<u64>,
    pub prefs_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub help: bool,
}

/// Option names understood by [`parse_layout_options`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OptionName {
    Config,
    MaxWait,
    PrefsDir,
    DryRun,
}

impl OptionName {
    fn flag(self) -> &'static str {
        match self {
            Self::Config => "--config",
            Self::MaxWait => "--max-wait",
            Self::PrefsDir => "--prefs-dir",
            Self::DryRun => "--dry-run",
        }
    }

    fn takes_value(self) -> bool {
        !matches!(self, Self::DryRun)
    }
}

/// Parse `--flag value` / `--flag=value` options, rejecting flags outside `allowed`.
pub(crate) fn parse_layout_options(
    command: &str,
    args: &[String],
    allowed: &[OptionName],
) -> DockResult<LayoutOptions> {
    let mut options = LayoutOptions::default();
    let mut i = 0usize;
    while i < args.len() {
        let arg = args[i].as_str();
        if matches!(arg, "help" | "--help" | "-h") {
            options.help = true;
            i += 1;
            continue;
        }

        let (flag, inline_value) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_string())),
            None => (arg, None),
        };
        let Some(name) = allowed.iter().copied().find(|name| name.flag() == flag) else {
            return Err(DockError::validation(format!(
                "unsupported `{command}` argument: {arg}"
            )));
        };

        if !name.takes_value() {
            if inline_value.is_some() {
                return Err(DockError::validation(format!("`{flag}` takes no value")));
            }
            options.dry_run = true;
            i += 1;
            continue;
        }

        let value = match inline_value {
            Some(value) => value,
            None => {
                i += 1;
                args.get(i).cloned().ok_or_else(|| {
                    DockError::validation(format!("`{flag}` requires a value"))
                })?
            }
        };
        match name {
            OptionName::Config => options.config = Some(PathBuf::from(value)),
            OptionName::PrefsDir => options.prefs_dir = Some(PathBuf::from(value)),
            OptionName::MaxWait => {
                let secs = value.parse::<u64>().map_err(|_| {
                    DockError::validation(format!(
                        "`--max-wait` expects a non-negative number of seconds, got `{value}`"
                    ))
                })?;
                options.max_wait = Some(secs);
            }
            OptionName::DryRun => {}
        }
        i += 1;
    }
    Ok(options)
}

/// Load the layout config and apply command-line overrides, then validate it.
pub(crate) fn resolve_config(
    ctx: &CommandContext,
    options: &LayoutOptions,
) -> DockResult<(LayoutConfig, Option<PathBuf>)> {
    let path = ctx.config_path(options.config.clone());
    let mut config = LayoutConfig::load(path.as_deref())?;
    if let Some(secs) = options.max_wait {
        config.max_wait_secs = secs;
    }
    if let Some(dir) = &options.prefs_dir {
        config.prefs_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok((config, path))
}

/// Label used for the config source in output and run logs.
pub(crate) fn config_label(path: Option<&PathBuf>) -> String {
    path.map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string())
}
