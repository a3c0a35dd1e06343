//! Dock preference-domain model and storage adapters.
//!
//! [`store`] defines the domain-level storage contract and its adapters, [`entry`] models the
//! tiles found in the Dock's `persistent-apps` list, and [`handle`] ties the two together into a
//! scoped handle that loads a domain, replaces one key and saves it back.

pub mod entry;
pub mod handle;
pub mod store;

pub use entry::{DockEntry, DockTile};
pub use handle::{DockPreferences, PERSISTENT_APPS_KEY};
pub use store::{MemoryPrefsStore, PlistFilePrefsStore, PrefsDomainStore};
