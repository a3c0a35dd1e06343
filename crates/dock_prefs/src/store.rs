//! Preference-domain storage contracts and adapters.

use std::{
    cell::RefCell,
    collections::HashMap,
    fs,
    io::Cursor,
    path::{Path, PathBuf},
    rc::Rc,
};

use plist::{Dictionary, Value};

/// Host service holding whole preference domains (one plist dictionary per domain).
pub trait PrefsDomainStore {
    /// Loads every key of a preference domain.
    fn load_domain(&self, domain: &str) -> Result<Dictionary, String>;

    /// Replaces the stored preference domain with `values`.
    fn save_domain(&self, domain: &str, values: &Dictionary) -> Result<(), String>;
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by domain.
///
/// Clones share the same backing map, so a test can keep one clone for inspection while handing
/// another to the code under test.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, Dictionary>>>,
    saves: Rc<RefCell<usize>>,
}

impl MemoryPrefsStore {
    /// Seeds or replaces a domain without counting as a save.
    pub fn insert_domain(&self, domain: &str, values: Dictionary) {
        self.inner.borrow_mut().insert(domain.to_string(), values);
    }

    /// Returns a copy of the stored domain, if any.
    pub fn domain(&self, domain: &str) -> Option<Dictionary> {
        self.inner.borrow().get(domain).cloned()
    }

    /// Number of successful [`PrefsDomainStore::save_domain`] calls.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl PrefsDomainStore for MemoryPrefsStore {
    fn load_domain(&self, domain: &str) -> Result<Dictionary, String> {
        self.inner
            .borrow()
            .get(domain)
            .cloned()
            .ok_or_else(|| format!("preference domain `{domain}` does not exist"))
    }

    fn save_domain(&self, domain: &str, values: &Dictionary) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(domain.to_string(), values.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

/// Preference store backed by `<dir>/<domain>.plist` files.
///
/// Files may be XML or binary on load; saves are written as binary plists to a sibling
/// temporary file and renamed into place.
#[derive(Debug, Clone)]
pub struct PlistFilePrefsStore {
    dir: PathBuf,
}

impl PlistFilePrefsStore {
    /// Creates a store rooted at `dir` (for example `~/Library/Preferences`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the plist file holding `domain`.
    pub fn path_for(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{domain}.plist"))
    }
}

impl PrefsDomainStore for PlistFilePrefsStore {
    fn load_domain(&self, domain: &str) -> Result<Dictionary, String> {
        let path = self.path_for(domain);
        let bytes = fs::read(&path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
        decode_domain(&bytes).map_err(|err| format!("{}: {err}", path.display()))
    }

    fn save_domain(&self, domain: &str, values: &Dictionary) -> Result<(), String> {
        let path = self.path_for(domain);
        let mut bytes = Vec::new();
        Value::Dictionary(values.clone())
            .to_writer_binary(&mut bytes)
            .map_err(|err| format!("failed to serialize {}: {err}", path.display()))?;
        replace_file(&path, &bytes)
    }
}

/// Parses a serialized preference domain (XML or binary plist).
///
/// # Errors
///
/// Returns an error when the bytes are not a plist or the root value is not a dictionary.
pub fn decode_domain(bytes: &[u8]) -> Result<Dictionary, String> {
    let value = Value::from_reader(Cursor::new(bytes))
        .map_err(|err| format!("malformed preference plist: {err}"))?;
    value
        .into_dictionary()
        .ok_or_else(|| "preference plist root is not a dictionary".to_string())
}

/// Serializes a preference domain as an XML plist.
///
/// # Errors
///
/// Returns an error when plist serialization fails.
pub fn encode_domain_xml(values: &Dictionary) -> Result<Vec<u8>, String> {
    let mut out = Vec::new();
    Value::Dictionary(values.clone())
        .to_writer_xml(&mut out)
        .map_err(|err| format!("failed to serialize preference plist: {err}"))?;
    Ok(out)
}

/// Writes `bytes` to a sibling staging file and renames it over `path`.
///
/// The staging file is removed whenever the replacement does not complete.
fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), String> {
    let staging = staging_path(path);
    let result = fs::write(&staging, bytes)
        .map_err(|err| format!("failed to write {}: {err}", staging.display()))
        .and_then(|()| {
            fs::rename(&staging, path)
                .map_err(|err| format!("failed to replace {}: {err}", path.display()))
        });
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_test_root() -> PathBuf {
        std::env::temp_dir().join(format!(
            "dock-prefs-store-test-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("time")
                .as_nanos()
        ))
    }

    fn sample_domain() -> Dictionary {
        let mut values = Dictionary::new();
        values.insert("tilesize".into(), Value::Integer(48i64.into()));
        values.insert("magnification".into(), Value::Boolean(true));
        values
    }

    #[test]
    fn memory_store_saves_and_counts() {
        let store = MemoryPrefsStore::default();
        let store_obj: &dyn PrefsDomainStore = &store;

        store_obj
            .save_domain("com.apple.dock", &sample_domain())
            .expect("save");
        assert_eq!(
            store_obj.load_domain("com.apple.dock").expect("load"),
            sample_domain()
        );
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn memory_store_reports_missing_domain() {
        let store = MemoryPrefsStore::default();
        let err = store.load_domain("com.apple.dock").expect_err("missing");
        assert!(err.contains("com.apple.dock"));
    }

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemoryPrefsStore::default();
        let observer = store.clone();
        store.insert_domain("com.apple.dock", sample_domain());
        assert_eq!(observer.domain("com.apple.dock"), Some(sample_domain()));
        assert_eq!(observer.save_count(), 0);
    }

    #[test]
    fn plist_file_store_writes_binary_and_reads_it_back() {
        let root = unique_test_root();
        fs::create_dir_all(&root).expect("create root");
        let store = PlistFilePrefsStore::new(&root);

        store
            .save_domain("com.apple.dock", &sample_domain())
            .expect("save");
        let bytes = fs::read(store.path_for("com.apple.dock")).expect("read file");
        assert!(bytes.starts_with(b"bplist00"));
        assert!(!staging_path(&store.path_for("com.apple.dock")).exists());
        assert_eq!(
            store.load_domain("com.apple.dock").expect("load"),
            sample_domain()
        );

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn plist_file_store_reads_xml_files() {
        let root = unique_test_root();
        fs::create_dir_all(&root).expect("create root");
        let store = PlistFilePrefsStore::new(&root);
        fs::write(
            store.path_for("com.apple.dock"),
            encode_domain_xml(&sample_domain()).expect("encode"),
        )
        .expect("write xml");

        assert_eq!(
            store.load_domain("com.apple.dock").expect("load"),
            sample_domain()
        );

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn plist_file_store_removes_staging_file_when_replace_fails() {
        let root = unique_test_root();
        let store = PlistFilePrefsStore::new(&root);
        let target = store.path_for("com.apple.dock");
        fs::create_dir_all(target.join("occupied")).expect("block target with a directory");

        let err = store
            .save_domain("com.apple.dock", &sample_domain())
            .expect_err("rename onto a non-empty directory");
        assert!(err.contains("failed to replace"));
        assert!(!staging_path(&target).exists());
        assert!(target.join("occupied").is_dir());

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn plist_file_store_fails_when_directory_is_missing() {
        let root = unique_test_root();
        let store = PlistFilePrefsStore::new(root.join("absent"));
        let err = store
            .save_domain("com.apple.dock", &sample_domain())
            .expect_err("no directory");
        assert!(err.contains("failed to write"));
        assert!(!staging_path(&store.path_for("com.apple.dock")).exists());
    }

    #[test]
    fn plist_file_store_fails_for_missing_domain() {
        let root = unique_test_root();
        let store = PlistFilePrefsStore::new(&root);
        let err = store.load_domain("com.apple.dock").expect_err("missing");
        assert!(err.contains("com.apple.dock.plist"));
    }

    #[test]
    fn decode_domain_rejects_non_dictionary_roots() {
        let mut out = Vec::new();
        Value::Array(vec![Value::Boolean(true)])
            .to_writer_xml(&mut out)
            .expect("encode");
        let err = decode_domain(&out).expect_err("array root");
        assert!(err.contains("not a dictionary"));
        assert!(decode_domain(b"not a plist").is_err());
    }
}
