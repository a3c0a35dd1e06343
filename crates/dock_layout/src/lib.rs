//! Pin a fixed, ordered set of applications to the macOS Dock (`dock-layout`).
//!
//! A run waits for the Dock process ([`gate`]), then replaces the `persistent-apps` key of the
//! Dock preference domain and relaunches the Dock ([`writer`]). Command modules own argument
//! handling and output while [`runtime`] owns process execution, configuration, errors and run
//! recording.

pub mod cli;
pub mod commands;
pub mod gate;
pub mod runtime;
pub mod writer;

use crate::cli::TopLevelCommand;
use crate::commands::apply::ApplyCommand;
use crate::commands::show::ShowCommand;
use crate::commands::wait::WaitCommand;
use crate::runtime::context::CommandContext;
use crate::runtime::error::DockResult;

/// Shared command contract for top-level command families.
///
/// [`DockCommand::parse`] is a pure translation from raw arguments into typed options; side
/// effects belong in [`DockCommand::run`].
pub trait DockCommand {
    /// Typed options produced by CLI parsing for the command family.
    type Options;

    /// Parse command-line arguments into typed options.
    fn parse(args: &[String]) -> DockResult<Self::Options>;

    /// Execute the command family using the shared runtime context.
    fn run(ctx: &CommandContext, options: Self::Options) -> DockResult<()>;
}

/// Executes the `dock-layout` binary using the current process arguments.
pub fn execute_from_env() -> DockResult<()> {
    let parsed = cli::parse(std::env::args().skip(1).collect())?;
    let ctx = CommandContext::new();

    match parsed {
        TopLevelCommand::Apply(args) => ApplyCommand::run(&ctx, ApplyCommand::parse(&args)?),
        TopLevelCommand::Show(args) => ShowCommand::run(&ctx, ShowCommand::parse(&args)?),
        TopLevelCommand::Wait(args) => WaitCommand::run(&ctx, WaitCommand::parse(&args)?),
        TopLevelCommand::Help => {
            cli::print_usage();
            Ok(())
        }
    }
}

/// Converts a run result into a process exit code.
///
/// Every failure, including a readiness timeout, maps to exit code `1` after printing the
/// formatted [`DockError`](crate::runtime::error::DockError) to stderr.
pub fn exit_code(result: DockResult<()>) -> std::process::ExitCode {
    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::ExitCode::from(1)
        }
    }
}
