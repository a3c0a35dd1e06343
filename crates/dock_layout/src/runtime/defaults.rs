//! Preference store backed by the macOS `defaults` tool.

use crate::runtime::process::ProcessRunner;
use dock_prefs::store::{decode_domain, encode_domain_xml};
use dock_prefs::PrefsDomainStore;
use plist::Dictionary;

/// Program used when no other is configured.
pub const DEFAULTS_PROGRAM: &str = "defaults";

/// Reads and writes whole domains through `defaults export` / `defaults import`.
///
/// Going through `defaults` keeps the preferences daemon's cache coherent with what is written,
/// which editing the plist file directly does not.
///
/// `defaults export` of a domain that was never written prints an empty dictionary and exits
/// successfully, so an empty export is reported as a missing domain.
#[derive(Clone, Debug)]
pub struct DefaultsPrefsStore {
    process: ProcessRunner,
    program: String,
}

impl DefaultsPrefsStore {
    /// Create a store that shells out to `defaults` through `process`.
    pub fn new(process: ProcessRunner) -> Self {
        Self::with_program(process, DEFAULTS_PROGRAM)
    }

    /// Create a store that runs `program` with the `defaults` argument shape.
    pub fn with_program(process: ProcessRunner, program: impl Into<String>) -> Self {
        Self {
            process,
            program: program.into(),
        }
    }
}

impl PrefsDomainStore for DefaultsPrefsStore {
    fn load_domain(&self, domain: &str) -> Result<Dictionary, String> {
        let xml = self
            .process
            .capture_stdout(&self.program, &["export", domain, "-"])
            .map_err(|err| err.to_string())?;
        let values = decode_domain(&xml)?;
        if values.is_empty() {
            return Err(format!("preference domain `{domain}` does not exist"));
        }
        Ok(values)
    }

    fn save_domain(&self, domain: &str, values: &Dictionary) -> Result<(), String> {
        let xml = encode_domain_xml(values)?;
        self.process
            .run_with_stdin(&self.program, &["import", domain, "-"], &xml)
            .map_err(|err| err.to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use dock_prefs::{DockEntry, DockPreferences};
    use plist::Value;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    const DOMAIN: &str = "com.apple.dock";

    fn unique_test_root() -> PathBuf {
        std::env::temp_dir().join(format!(
            "dock-layout-defaults-test-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("time")
                .as_nanos()
        ))
    }

    /// Stand-in for `defaults`: logs its arguments, exports `fixture.plist` (or an empty
    /// dictionary for `absent.domain`, or an error for `broken.domain`), and captures imports.
    fn fake_defaults(root: &Path) -> PathBuf {
        fs::create_dir_all(root).expect("create root");
        let mut fixture = Dictionary::new();
        fixture.insert("tilesize".into(), Value::Integer(48i64.into()));
        fixture.insert("orientation".into(), Value::String("bottom".into()));
        fs::write(
            root.join("fixture.plist"),
            encode_domain_xml(&fixture).expect("encode fixture"),
        )
        .expect("write fixture");
        fs::write(
            root.join("empty.plist"),
            encode_domain_xml(&Dictionary::new()).expect("encode empty"),
        )
        .expect("write empty");

        let dir = root.display();
        let script = root.join("defaults.sh");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 printf '%s\\n' \"$*\" >> '{dir}/args.log'\n\
                 case \"$1\" in\n\
                 export)\n\
                 \x20 case \"$2\" in\n\
                 \x20 absent.domain) cat '{dir}/empty.plist' ;;\n\
                 \x20 broken.domain) echo \"Domain $2 is unreadable\" >&2; exit 1 ;;\n\
                 \x20 *) cat '{dir}/fixture.plist' ;;\n\
                 \x20 esac ;;\n\
                 import) cat > '{dir}/imported.plist' ;;\n\
                 *) exit 64 ;;\n\
                 esac\n"
            ),
        )
        .expect("write script");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod script");
        script
    }

    fn store_for(script: &Path) -> DefaultsPrefsStore {
        DefaultsPrefsStore::with_program(ProcessRunner::new(), script.display().to_string())
    }

    #[test]
    fn domain_round_trips_through_export_and_import() {
        let root = unique_test_root();
        let store = store_for(&fake_defaults(&root));

        let mut prefs = DockPreferences::open(&store, DOMAIN).expect("export");
        prefs
            .replace_persistent_apps(&[DockEntry::for_app("/Applications/Slack.app").expect("entry")])
            .expect("replace");
        prefs.save().expect("import");

        let imported =
            decode_domain(&fs::read(root.join("imported.plist")).expect("imported")).expect("decode");
        assert_eq!(imported.get("tilesize"), Some(&Value::Integer(48i64.into())));
        assert_eq!(
            imported.get("orientation"),
            Some(&Value::String("bottom".into()))
        );
        let apps = imported
            .get(dock_prefs::PERSISTENT_APPS_KEY)
            .and_then(Value::as_array)
            .expect("persistent-apps");
        assert_eq!(apps.len(), 1);

        let args = fs::read_to_string(root.join("args.log")).expect("args log");
        assert_eq!(
            args.lines().collect::<Vec<_>>(),
            vec!["export com.apple.dock -", "import com.apple.dock -"]
        );

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn empty_export_reads_as_missing_domain() {
        let root = unique_test_root();
        let store = store_for(&fake_defaults(&root));

        let err = store.load_domain("absent.domain").expect_err("empty export");
        assert!(err.contains("absent.domain"));
        assert!(err.contains("does not exist"));
        assert!(!root.join("imported.plist").exists());

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn export_failures_carry_stderr() {
        let root = unique_test_root();
        let store = store_for(&fake_defaults(&root));

        let err = store.load_domain("broken.domain").expect_err("failing export");
        assert!(err.contains("broken.domain is unreadable"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_program_is_a_launch_error_message() {
        let store = DefaultsPrefsStore::with_program(
            ProcessRunner::new(),
            "definitely-not-a-real-defaults-binary",
        );
        let err = store.load_domain(DOMAIN).expect_err("missing program");
        assert!(err.contains("failed to start"));
    }
}
