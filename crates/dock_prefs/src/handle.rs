//! Scoped handle over the Dock preference domain.

use plist::{Dictionary, Value};

use crate::entry::{DockEntry, DockTile};
use crate::store::PrefsDomainStore;

/// Key holding the pinned application tiles, in left-to-right order.
pub const PERSISTENT_APPS_KEY: &str = "persistent-apps";

/// In-memory copy of one preference domain, opened from and saved back to a store.
///
/// The handle only changes the keys it is asked to change; everything else loaded from the
/// store is written back untouched. Dropping a handle without calling [`save`](Self::save)
/// leaves the store as it was.
#[derive(Debug)]
pub struct DockPreferences<'s, S: PrefsDomainStore + ?Sized> {
    store: &'s S,
    domain: String,
    values: Dictionary,
}

impl<'s, S: PrefsDomainStore + ?Sized> DockPreferences<'s, S> {
    /// Loads `domain` from `store`.
    ///
    /// # Errors
    ///
    /// Returns the store error when the domain is missing or unreadable.
    pub fn open(store: &'s S, domain: &str) -> Result<Self, String> {
        let values = store.load_domain(domain)?;
        Ok(Self {
            store,
            domain: domain.to_string(),
            values,
        })
    }

    /// Tiles currently stored under `persistent-apps`.
    ///
    /// A missing key reads as an empty list; elements that are not tile dictionaries are
    /// skipped.
    pub fn persistent_apps(&self) -> Vec<DockTile> {
        self.values
            .get(PERSISTENT_APPS_KEY)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(DockTile::from_value).collect())
            .unwrap_or_default()
    }

    /// Replaces `persistent-apps` wholesale with `entries`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error when an entry cannot be serialized; the loaded values are unchanged
    /// in that case.
    pub fn replace_persistent_apps(&mut self, entries: &[DockEntry]) -> Result<(), String> {
        let tiles = entries
            .iter()
            .map(DockEntry::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.values
            .insert(PERSISTENT_APPS_KEY.to_string(), Value::Array(tiles));
        Ok(())
    }

    /// Writes the domain back to the store, consuming the handle.
    ///
    /// # Errors
    ///
    /// Returns the store error when the write fails.
    pub fn save(self) -> Result<(), String> {
        self.store.save_domain(&self.domain, &self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryPrefsStore;

    const DOMAIN: &str = "com.apple.dock";

    fn seeded_store() -> MemoryPrefsStore {
        let store = MemoryPrefsStore::default();
        let mut values = Dictionary::new();
        values.insert("tilesize".into(), Value::Integer(36i64.into()));
        values.insert("orientation".into(), Value::String("left".into()));
        values.insert(
            PERSISTENT_APPS_KEY.into(),
            Value::Array(vec![DockEntry::for_app("/Applications/Mail.app")
                .expect("entry")
                .to_value()
                .expect("value")]),
        );
        store.insert_domain(DOMAIN, values);
        store
    }

    #[cfg(unix)]
    #[test]
    fn open_reads_existing_persistent_apps() {
        let store = seeded_store();
        let prefs = DockPreferences::open(&store, DOMAIN).expect("open");
        let names: Vec<_> = prefs
            .persistent_apps()
            .iter()
            .map(|tile| tile.display_name().to_string())
            .collect();
        assert_eq!(names, vec!["Mail".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn replace_and_save_only_touch_persistent_apps() {
        let store = seeded_store();
        let before = store.domain(DOMAIN).expect("seeded");

        let mut prefs = DockPreferences::open(&store, DOMAIN).expect("open");
        let entries = vec![
            DockEntry::for_app("/Applications/Slack.app").expect("entry"),
            DockEntry::for_app("/Applications/Safari.app").expect("entry"),
        ];
        prefs.replace_persistent_apps(&entries).expect("replace");
        prefs.save().expect("save");

        let after = store.domain(DOMAIN).expect("saved");
        assert_eq!(after.get("tilesize"), before.get("tilesize"));
        assert_eq!(after.get("orientation"), before.get("orientation"));
        assert_eq!(after.len(), before.len());

        let reopened = DockPreferences::open(&store, DOMAIN).expect("reopen");
        let names: Vec<_> = reopened
            .persistent_apps()
            .iter()
            .map(|tile| tile.display_name().to_string())
            .collect();
        assert_eq!(names, vec!["Slack".to_string(), "Safari".to_string()]);
    }

    #[test]
    fn dropping_unsaved_handle_leaves_store_untouched() {
        let store = seeded_store();
        let before = store.domain(DOMAIN);
        {
            let mut prefs = DockPreferences::open(&store, DOMAIN).expect("open");
            prefs.replace_persistent_apps(&[]).expect("replace");
        }
        assert_eq!(store.domain(DOMAIN), before);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn missing_key_reads_as_empty_list() {
        let store = MemoryPrefsStore::default();
        store.insert_domain(DOMAIN, Dictionary::new());
        let prefs = DockPreferences::open(&store, DOMAIN).expect("open");
        assert!(prefs.persistent_apps().is_empty());
    }

    #[test]
    fn open_fails_for_missing_domain() {
        let store = MemoryPrefsStore::default();
        assert!(DockPreferences::open(&store, DOMAIN).is_err());
    }
}
