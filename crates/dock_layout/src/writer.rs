//! Dock list writer: replace `persistent-apps` and make the Dock pick it up.

use crate::runtime::error::{DockError, DockResult};
use dock_prefs::{DockEntry, DockPreferences, DockTile, PrefsDomainStore};

/// Makes the launcher reload its preferences.
pub trait Relauncher {
    /// Restart (or signal) the process named `process_name`.
    fn relaunch(&self, process_name: &str) -> DockResult<()>;
}

/// Where the layout is written and which process owns it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DockTarget<'a> {
    /// Preference domain holding `persistent-apps`.
    pub domain: &'a str,
    /// Process relaunched after saving.
    pub process_name: &'a str,
}

/// Summary of a completed write.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppliedLayout {
    /// Tiles present before the write.
    pub previous: Vec<DockTile>,
    /// Entries now stored, in Dock order.
    pub entries: Vec<DockEntry>,
}

/// What a write would change, without changing it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LayoutPreview {
    /// Tiles currently stored.
    pub current: Vec<DockTile>,
    /// Entries that would replace them.
    pub planned: Vec<DockEntry>,
}

/// Build one entry per path, preserving order and duplicates.
pub fn build_entries(app_paths: &[String]) -> DockResult<Vec<DockEntry>> {
    app_paths
        .iter()
        .map(|path| DockEntry::for_app(path).map_err(DockError::store))
        .collect()
}

/// Replace the Dock's pinned applications with `app_paths`, save, and relaunch the Dock.
///
/// Only `persistent-apps` changes; every other key of the domain is written back as loaded.
/// Nothing is saved if loading or entry construction fails.
///
/// # Errors
///
/// Store failures carry [`DockErrorCategory::Store`](crate::runtime::error::DockErrorCategory::Store);
/// relaunch failures carry the process categories.
pub fn apply_dock_layout<S, R>(
    store: &S,
    relauncher: &R,
    target: DockTarget<'_>,
    app_paths: &[String],
) -> DockResult<AppliedLayout>
where
    S: PrefsDomainStore + ?Sized,
    R: Relauncher + ?Sized,
{
    let mut prefs = open(store, target.domain)?;
    let previous = prefs.persistent_apps();
    let entries = build_entries(app_paths)?;
    prefs
        .replace_persistent_apps(&entries)
        .map_err(|err| store_error(err, "replace persistent-apps", target.domain))?;
    prefs
        .save()
        .map_err(|err| store_error(err, "save preferences", target.domain))?;
    relauncher.relaunch(target.process_name)?;

    Ok(AppliedLayout { previous, entries })
}

/// Load the domain and build the planned entries without saving anything.
pub fn preview_dock_layout<S>(
    store: &S,
    domain: &str,
    app_paths: &[String],
) -> DockResult<LayoutPreview>
where
    S: PrefsDomainStore + ?Sized,
{
    let prefs = open(store, domain)?;
    Ok(LayoutPreview {
        current: prefs.persistent_apps(),
        planned: build_entries(app_paths)?,
    })
}

/// Read the tiles currently pinned in `domain`.
pub fn current_dock_layout<S>(store: &S, domain: &str) -> DockResult<Vec<DockTile>>
where
    S: PrefsDomainStore + ?Sized,
{
    Ok(open(store, domain)?.persistent_apps())
}

fn open<'s, S>(store: &'s S, domain: &str) -> DockResult<DockPreferences<'s, S>>
where
    S: PrefsDomainStore + ?Sized,
{
    DockPreferences::open(store, domain).map_err(|err| store_error(err, "load preferences", domain))
}

fn store_error(message: String, operation: &str, domain: &str) -> DockError {
    DockError::store(message).with_operation(format!("{operation} ({domain})"))
}
