//! Load order reconciliation
//!
//! Merges the persisted plugin order with what is actually in the data
//! directory. Entries from the order file keep their positions even when the
//! file they name is gone; plugins found on disk but absent from the order
//! file are appended in directory iteration order, which is not stable
//! across platforms.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::{error, warn};

use crate::engine::GameHandle;
use crate::error::Error;

/// First line written back to the order file after a successful sort.
pub const LOAD_ORDER_HEADER: &str = "# This file was automatically generated by loadstone.";

/// A plugin filename known from the order file, the filesystem, or both.
#[derive(Debug, Clone)]
pub struct PluginEntry {
    pub name: String,
    pub known_from_order_file: bool,
    pub exists_on_disk: bool,
}

/// Build the engine's input list from the persisted order file and the data
/// directory.
///
/// An unreadable order file is fatal; a plugin listed in it but missing from
/// disk is only a logged diagnostic, since the engine may still want the
/// name for metadata purposes.
pub fn reconcile_load_order(
    order_file: &Path,
    data_dir: &Path,
    handle: &dyn GameHandle,
) -> Result<Vec<PluginEntry>> {
    let content = fs::read_to_string(order_file).map_err(|source| Error::OrderFileUnreadable {
        path: order_file.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for line in content.lines() {
        let name = line.trim();
        if name.is_empty() || name.starts_with('#') {
            continue;
        }

        let exists_on_disk = data_dir.join(name).is_file();
        if !exists_on_disk {
            error!(
                "plugin {} is in the load order but missing from the data directory",
                name
            );
        }

        seen.insert(name.to_lowercase());
        entries.push(PluginEntry {
            name: name.to_string(),
            known_from_order_file: true,
            exists_on_disk,
        });
    }

    let dir = fs::read_dir(data_dir).map_err(|source| Error::FileAccess {
        path: data_dir.to_path_buf(),
        source,
    })?;

    for dir_entry in dir {
        let dir_entry = dir_entry.map_err(|source| Error::FileAccess {
            path: data_dir.to_path_buf(),
            source,
        })?;
        if !dir_entry.path().is_file() {
            continue;
        }

        let Some(name) = dir_entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if seen.contains(&name.to_lowercase()) || !handle.is_valid_plugin(&name) {
            continue;
        }

        warn!("found plugin {} not present in the load order", name);
        seen.insert(name.to_lowercase());
        entries.push(PluginEntry {
            name,
            known_from_order_file: false,
            exists_on_disk: true,
        });
    }

    Ok(entries)
}

/// Rewrite the order file with the sorted result.
pub fn write_load_order(order_file: &Path, plugins: &[String]) -> Result<()> {
    let mut content = String::from(LOAD_ORDER_HEADER);
    content.push('\n');
    for plugin in plugins {
        content.push_str(plugin);
        content.push('\n');
    }

    fs::write(order_file, content).map_err(|source| Error::FileAccess {
        path: order_file.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeHandle;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"plugin").unwrap();
    }

    #[test]
    fn test_disk_only_plugins_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.esp");
        touch(dir.path(), "b.esp");
        touch(dir.path(), "c.esp");
        let order = dir.path().join("loadorder.txt");
        fs::write(&order, "a.esp\nb.esp\n").unwrap();

        let handle = FakeHandle::default();
        let entries = reconcile_load_order(&order, dir.path(), &handle).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.esp", "b.esp", "c.esp"]);
        assert!(!entries[2].known_from_order_file);
    }

    #[test]
    fn test_missing_listed_plugin_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.esp");
        let order = dir.path().join("loadorder.txt");
        fs::write(&order, "a.esp\nd.esp\n").unwrap();

        let handle = FakeHandle::default();
        let entries = reconcile_load_order(&order, dir.path(), &handle).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.esp", "d.esp"]);
        assert!(!entries[1].exists_on_disk);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.esp");
        let order = dir.path().join("loadorder.txt");
        fs::write(&order, "# generated\n\n  a.esp  \n").unwrap();

        let handle = FakeHandle::default();
        let entries = reconcile_load_order(&order, dir.path(), &handle).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.esp");
    }

    #[test]
    fn test_non_plugin_files_are_not_appended() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.esp");
        touch(dir.path(), "readme.txt");
        let order = dir.path().join("loadorder.txt");
        fs::write(&order, "a.esp\n").unwrap();

        let handle = FakeHandle::default();
        let entries = reconcile_load_order(&order, dir.path(), &handle).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_unreadable_order_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let handle = FakeHandle::default();
        let err =
            reconcile_load_order(&dir.path().join("missing.txt"), dir.path(), &handle).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::OrderFileUnreadable { .. })
        ));
    }

    #[test]
    fn test_write_load_order_prepends_header() {
        let dir = tempfile::tempdir().unwrap();
        let order = dir.path().join("loadorder.txt");
        write_load_order(&order, &["a.esp".to_string(), "b.esp".to_string()]).unwrap();

        let content = fs::read_to_string(&order).unwrap();
        assert_eq!(content, format!("{}\na.esp\nb.esp\n", LOAD_ORDER_HEADER));
    }
}
