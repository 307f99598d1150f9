//! Masterlist update
//!
//! The masterlist source is either an http(s) URL or a local path. Either
//! way the destination is only replaced after the new content is fully on
//! disk; a failed download leaves the file from the previous successful run
//! untouched.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::error::Error;
use crate::fsutil;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Refresh the masterlist at `dest` from `source`.
pub fn update(dest: &Path, source: &str) -> Result<()> {
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch_remote(dest, source)
    } else {
        copy_local(dest, source)
    }
}

fn fetch_remote(dest: &Path, url: &str) -> Result<()> {
    debug!("downloading masterlist from {}", url);

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("loadstone/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| Error::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().map_err(|e| Error::Network {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Network {
            url: url.to_string(),
            reason: format!("HTTP status {}", status),
        }
        .into());
    }

    let bytes = response.bytes().map_err(|e| Error::Network {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    fsutil::write_atomic(dest, &bytes)?;
    info!("masterlist updated from {}", url);
    Ok(())
}

/// A local source is either the masterlist file itself or the directory
/// (typically a git checkout) that contains it.
fn copy_local(dest: &Path, source: &str) -> Result<()> {
    let source_path = Path::new(source);
    let file = if source_path.is_dir() {
        source_path.join("masterlist.yaml")
    } else {
        source_path.to_path_buf()
    };

    let bytes = fs::read(&file).map_err(|source| Error::FileAccess {
        path: file.clone(),
        source,
    })?;

    fsutil::write_atomic(dest, &bytes)?;
    info!("masterlist copied from {}", file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_file_source_is_copied() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("masterlist.yaml");
        fs::write(&source, "plugins: []").unwrap();
        let dest = dir.path().join("LOOT/Skyrim/masterlist.yaml");

        update(&dest, source.to_str().unwrap()).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "plugins: []");
    }

    #[test]
    fn test_local_directory_source_resolves_masterlist() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("checkout");
        fs::create_dir(&repo).unwrap();
        fs::write(repo.join("masterlist.yaml"), "plugins: []").unwrap();
        let dest = dir.path().join("masterlist.yaml");

        update(&dest, repo.to_str().unwrap()).unwrap();
        assert!(dest.is_file());
    }

    #[test]
    fn test_missing_local_source_does_not_clobber_previous_copy() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("masterlist.yaml");
        fs::write(&dest, "previous").unwrap();

        let missing = dir.path().join("nowhere");
        assert!(update(&dest, missing.to_str().unwrap()).is_err());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "previous");
    }
}
