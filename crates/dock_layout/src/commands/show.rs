//! `dock-layout show`: print the pinned applications currently stored.

use super::apply::print_tiles;
use super::{parse_layout_options, resolve_config, LayoutOptions, OptionName};
use crate::runtime::context::CommandContext;
use crate::runtime::error::DockResult;
use crate::writer::current_dock_layout;
use crate::DockCommand;

/// `dock-layout show ...`
pub struct ShowCommand;

impl DockCommand for ShowCommand {
    type Options = LayoutOptions;

    fn parse(args: &[String]) -> DockResult<Self::Options> {
        parse_layout_options("show", args, &[OptionName::Config, OptionName::PrefsDir])
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> DockResult<()> {
        if options.help {
            eprintln!("Usage: dock-layout show [--config <path>] [--prefs-dir <dir>]\n");
            return Ok(());
        }

        let (config, _) = resolve_config(ctx, &options)?;
        let store = ctx.prefs_store(&config);
        let tiles = current_dock_layout(store.as_ref(), &config.domain)?;
        println!(
            "{} {} ({} tiles):",
            config.domain,
            dock_prefs::PERSISTENT_APPS_KEY,
            tiles.len()
        );
        print_tiles(&tiles);
        Ok(())
    }
}
