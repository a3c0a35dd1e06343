//! `dock-layout apply`: gate on the Dock, then rewrite its pinned applications.

use super::{config_label, parse_layout_options, resolve_config, LayoutOptions, OptionName};
use crate::gate::{wait_for_ready, ProcessTable, Sleeper, ThreadSleeper};
use crate::runtime::config::LayoutConfig;
use crate::runtime::context::CommandContext;
use crate::runtime::error::DockResult;
use crate::runtime::workflow::WorkflowRecorder;
use crate::writer::{apply_dock_layout, preview_dock_layout, AppliedLayout, DockTarget, Relauncher};
use crate::DockCommand;
use dock_prefs::{DockEntry, DockTile, PrefsDomainStore};

/// `dock-layout apply ...`
pub struct ApplyCommand;

impl DockCommand for ApplyCommand {
    type Options = LayoutOptions;

    fn parse(args: &[String]) -> DockResult<Self::Options> {
        parse_layout_options(
            "apply",
            args,
            &[
                OptionName::Config,
                OptionName::MaxWait,
                OptionName::PrefsDir,
                OptionName::DryRun,
            ],
        )
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> DockResult<()> {
        if options.help {
            print_apply_usage();
            return Ok(());
        }

        let (config, path) = resolve_config(ctx, &options)?;
        let label = config_label(path.as_ref());
        let store = ctx.prefs_store(&config);
        if config.apps.is_empty() {
            ctx.workflow()
                .warn("no applications configured; the Dock will have no pinned apps");
        }

        if options.dry_run {
            println!("config: {label}");
            let preview = preview_dock_layout(store.as_ref(), &config.domain, &config.apps)?;
            println!("current {}:", dock_prefs::PERSISTENT_APPS_KEY);
            print_tiles(&preview.current);
            println!("would write:");
            print_entries(&preview.planned);
            return Ok(());
        }

        ctx.workflow()
            .with_workflow_run("apply", Some(label), config.log_dir.as_deref(), || {
                run_apply(
                    ctx.workflow(),
                    ctx.process(),
                    &ThreadSleeper,
                    store.as_ref(),
                    ctx.process(),
                    &config,
                )
            })
            .map(|_| ())
    }
}

/// Gate on the configured process, then write the layout.
///
/// The store is not touched unless the gate passes.
pub fn run_apply<P, S, St, R>(
    workflow: &WorkflowRecorder,
    table: &P,
    sleeper: &S,
    store: &St,
    relauncher: &R,
    config: &LayoutConfig,
) -> DockResult<AppliedLayout>
where
    P: ProcessTable + ?Sized,
    S: Sleeper + ?Sized,
    St: PrefsDomainStore + ?Sized,
    R: Relauncher + ?Sized,
{
    workflow.run_timed_stage(&format!("Wait for {}", config.process_name), || {
        let outcome = wait_for_ready(table, sleeper, &config.process_name, config.max_wait_secs)?;
        println!(
            "    {} running after {}s ({} checks)",
            config.process_name, outcome.waited_secs, outcome.polls
        );
        Ok(outcome)
    })?;

    let target = DockTarget {
        domain: &config.domain,
        process_name: &config.process_name,
    };
    workflow.run_timed_stage(
        &format!("Write {} and relaunch {}", dock_prefs::PERSISTENT_APPS_KEY, config.process_name),
        || {
            let applied = apply_dock_layout(store, relauncher, target, &config.apps)?;
            println!("    replaced {} tiles with:", applied.previous.len());
            print_entries(&applied.entries);
            Ok(applied)
        },
    )
}

fn print_entries(entries: &[DockEntry]) {
    for (index, entry) in entries.iter().enumerate() {
        println!("{}", entry_line(index, entry));
    }
}

fn entry_line(index: usize, entry: &DockEntry) -> String {
    format!(
        "    {index:>2}. {} ({}) <{}>",
        entry.label(),
        entry.path(),
        entry.url()
    )
}

pub(crate) fn print_tiles(tiles: &[DockTile]) {
    if tiles.is_empty() {
        println!("    (none)");
    }
    for (index, tile) in tiles.iter().enumerate() {
        match tile {
            DockTile::File {
                label,
                url: Some(url),
            } => println!("    {index:>2}. {label} <{url}>"),
            other => println!("    {index:>2}. {}", other.display_name()),
        }
    }
}

fn print_apply_usage() {
    eprintln!(
        "Usage: dock-layout apply [--config <path>] [--max-wait <secs>] [--prefs-dir <dir>] [--dry-run]\n\
         \n\
         Waits for the Dock process, replaces its pinned applications with the configured\n\
         list (left to right), saves the preference domain and relaunches the Dock.\n"
    );
}
