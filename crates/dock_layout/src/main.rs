//! `dock-layout` binary entrypoint.

fn main() -> std::process::ExitCode {
    dock_layout::exit_code(dock_layout::execute_from_env())
}
