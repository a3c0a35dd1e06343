//! `dock-layout wait`: run only the readiness gate.

use super::{config_label, parse_layout_options, resolve_config, LayoutOptions, OptionName};
use crate::gate::{wait_for_ready, ThreadSleeper};
use crate::runtime::context::CommandContext;
use crate::runtime::error::DockResult;
use crate::DockCommand;

/// `dock-layout wait ...`
pub struct WaitCommand;

impl DockCommand for WaitCommand {
    type Options = LayoutOptions;

    fn parse(args: &[String]) -> DockResult<Self::Options> {
        parse_layout_options("wait", args, &[OptionName::Config, OptionName::MaxWait])
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> DockResult<()> {
        if options.help {
            eprintln!(
                "Usage: dock-layout wait [--config <path>] [--max-wait <secs>]\n\
                 \n\
                 Exits 0 once the Dock process is running, 1 if it does not start in time.\n"
            );
            return Ok(());
        }

        let (config, path) = resolve_config(ctx, &options)?;
        ctx.workflow().with_workflow_run(
            "wait",
            Some(config_label(path.as_ref())),
            config.log_dir.as_deref(),
            || {
                ctx.workflow()
                    .run_timed_stage(&format!("Wait for {}", config.process_name), || {
                        let outcome = wait_for_ready(
                            ctx.process(),
                            &ThreadSleeper,
                            &config.process_name,
                            config.max_wait_secs,
                        )?;
                        println!(
                            "    {} running after {}s ({} checks)",
                            config.process_name, outcome.waited_secs, outcome.polls
                        );
                        Ok(())
                    })
            },
        )
    }
}
