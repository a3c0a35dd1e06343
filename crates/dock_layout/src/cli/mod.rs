//! Top-level CLI parsing and help output.

use crate::runtime::error::{DockError, DockResult};

/// Top-level `dock-layout` command families.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TopLevelCommand {
    Apply(Vec<String>),
    Show(Vec<String>),
    Wait(Vec<String>),
    Help,
}

/// Parse raw command-line arguments into a top-level command selection.
///
/// With no command, or with options only, the run is an `apply`.
pub fn parse(args: Vec<String>) -> DockResult<TopLevelCommand> {
    let Some(cmd) = args.first().cloned() else {
        return Ok(TopLevelCommand::Apply(Vec::new()));
    };

    let rest = args[1..].to_vec();
    match cmd.as_str() {
        "apply" => Ok(TopLevelCommand::Apply(rest)),
        "show" => Ok(TopLevelCommand::Show(rest)),
        "wait" => Ok(TopLevelCommand::Wait(rest)),
        "help" | "--help" | "-h" => Ok(TopLevelCommand::Help),
        flag if flag.starts_with("--") => Ok(TopLevelCommand::Apply(args)),
        other => Err(DockError::validation(format!(
            "unknown dock-layout command: {other}"
        ))),
    }
}

/// Print the canonical top-level usage text.
pub fn print_usage() {
    eprintln!(
        "Usage: dock-layout [command] [options]\n\
         \n\
         Commands:\n\
           apply (default)     Wait for the Dock, replace its pinned apps, relaunch it\n\
           show                Print the currently pinned apps\n\
           wait                Only wait for the Dock process\n\
         \n\
         Options:\n\
           --config <path>     Layout config file (default: $DOCK_LAYOUT_CONFIG or built-in list)\n\
           --max-wait <secs>   Seconds to wait for the Dock (apply, wait)\n\
           --prefs-dir <dir>   Use <dir>/<domain>.plist instead of `defaults` (apply, show)\n\
           --dry-run           Print the layout apply would write, change nothing (apply)\n"
    );
}
