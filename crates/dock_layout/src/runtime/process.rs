//! Shared process execution helpers.

use crate::gate::ProcessTable;
use crate::runtime::error::{DockError, DockResult};
use crate::writer::Relauncher;
use std::io::Write as _;
use std::process::{Command, Stdio};

/// Shared process runner used by command modules.
///
/// This type centralizes subprocess style for dock-layout:
/// - print mutating commands in a stable `+ ...` format
/// - normalize error categorization into [`DockError`]
/// - answer process-table queries for the readiness gate
///
/// Probe commands (`pgrep`) are not echoed since the gate may issue one per second.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a process runner.
    pub fn new() -> Self {
        Self
    }

    /// Run a process, inheriting the terminal stdio streams.
    ///
    /// Non-zero exits are converted into [`DockError::process_exit`].
    pub fn run(&self, program: &str, args: &[&str]) -> DockResult<()> {
        self.print_command(program, args);
        let status = Command::new(program).args(args).status().map_err(|err| {
            DockError::process_launch(format!("failed to start `{program}`: {err}"))
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(DockError::process_exit(format!(
                "`{program}` exited with status {status}"
            )))
        }
    }

    /// Run a process and return its stdout.
    ///
    /// Stderr is captured and folded into the error message when the process fails.
    pub fn capture_stdout(&self, program: &str, args: &[&str]) -> DockResult<Vec<u8>> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| {
                DockError::process_launch(format!("failed to start `{program}`: {err}"))
            })?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(exit_error(program, &output.status, &output.stderr))
        }
    }

    /// Run a process with `input` written to its stdin.
    ///
    /// Stdin is fed from a scoped thread while stderr is drained, so a child that writes a lot
    /// before reading cannot stall the run. The child is always reaped, even when the write
    /// fails.
    pub fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> DockResult<()> {
        self.print_command(program, args);
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                DockError::process_launch(format!("failed to start `{program}`: {err}"))
            })?;

        let stdin = child.stdin.take();
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(input),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (writer.join(), output)
        });

        let output = output.map_err(|err| {
            DockError::process_launch(format!("failed to wait for `{program}`: {err}"))
        })?;
        if !output.status.success() {
            return Err(exit_error(program, &output.status, &output.stderr));
        }
        match written {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(DockError::io(format!(
                "failed to write stdin of `{program}`: {err}"
            ))),
            Err(_) => Err(DockError::io(format!(
                "stdin writer for `{program}` panicked"
            ))),
        }
    }

    /// Return whether a command succeeds with the provided arguments.
    ///
    /// Stdout and stderr are suppressed. Launch failures are surfaced so a missing probe binary
    /// is not mistaken for a negative answer.
    pub fn command_succeeds(&self, program: &str, args: &[&str]) -> DockResult<bool> {
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .map_err(|err| DockError::process_launch(format!("failed to start `{program}`: {err}")))
    }

    /// Print a process invocation in a stable format.
    pub fn print_command(&self, program: &str, args: &[&str]) {
        if args.is_empty() {
            println!("+ {program}");
        } else {
            println!("+ {program} {}", args.join(" "));
        }
    }
}

impl ProcessTable for ProcessRunner {
    /// Exact-name lookup through `pgrep -x`; any non-zero exit reads as "not running".
    fn is_running(&self, process_name: &str) -> DockResult<bool> {
        let pattern = literal_pattern(process_name);
        self.command_succeeds("pgrep", &["-x", pattern.as_str()])
    }
}

impl Relauncher for ProcessRunner {
    /// Terminates the launcher with `killall`; the session manager starts it again.
    fn relaunch(&self, process_name: &str) -> DockResult<()> {
        self.run("killall", &[process_name])
            .map_err(|err| err.with_operation(format!("relaunch {process_name}")))
    }
}

/// Escapes extended-regex metacharacters so `pgrep` matches `name` literally.
fn literal_pattern(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len());
    for ch in name.chars() {
        if matches!(
            ch,
            '^' | '$' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
        ) {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern
}

fn exit_error(program: &str, status: &std::process::ExitStatus, stderr: &[u8]) -> DockError {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        DockError::process_exit(format!("`{program}` exited with status {status}"))
    } else {
        DockError::process_exit(format!(
            "`{program}` exited with status {status}: {stderr}"
        ))
    }
}
