//! Masterlist source migration
//!
//! Legacy settings documents recorded a masterlist location either as a
//! `(repo, branch)` git pair or as a direct source URL/path. Both forms
//! accumulated obsolete defaults over the years; the rules here rewrite them
//! to current locations without touching genuinely custom sources.

use std::fs;
use std::path::Path;

use regex_lite::Regex;
use tracing::warn;

use crate::games::{
    default_masterlist_url_for_slug, GameId, DEFAULT_MASTERLIST_BRANCH, OLD_DEFAULT_BRANCHES,
};

/// Upgrade a configured branch if it is one of the historical repository
/// defaults; any other branch is kept as-is.
pub fn migrate_branch(branch: &str) -> &str {
    if OLD_DEFAULT_BRANCHES.contains(&branch) {
        DEFAULT_MASTERLIST_BRANCH
    } else {
        branch
    }
}

/// Extract `(owner, repo)` from a GitHub repository URL.
///
/// Accepts `https://github.com/owner/repo`, with or without a `.git` suffix
/// or trailing slash. Anything else yields `None`.
pub fn github_repo(url: &str) -> Option<(String, String)> {
    let pattern = Regex::new(r"^https://github\.com/([^/]+)/([^/]+)$").ok()?;
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    let captures = pattern.captures(trimmed)?;
    let owner = captures.get(1)?.as_str().to_string();
    let repo = captures.get(2)?.as_str();
    let repo = repo.strip_suffix(".git").unwrap_or(repo).to_string();
    if repo.is_empty() {
        return None;
    }
    Some((owner, repo))
}

/// Swap an official repository slug for the target title's own slug when a
/// base/VR pair got mixed up. Early settings versions configured VR installs
/// with the flat-screen repository (and vice versa); the metadata diverged
/// enough that this matters.
pub fn substitute_vr_repo(target: GameId, owner: &str, repo: &str) -> String {
    if owner != "loot" {
        return repo.to_string();
    }

    let swapped = match (target, repo) {
        (GameId::SkyrimVR, "skyrimse") => "skyrimvr",
        (GameId::SkyrimSE, "skyrimvr") => "skyrimse",
        (GameId::Fallout4VR, "fallout4") => "fallout4vr",
        (GameId::Fallout4, "fallout4vr") => "fallout4",
        _ => repo,
    };
    swapped.to_string()
}

/// Resolve a `(repo, branch)` pair into a usable masterlist source.
///
/// A local non-bare git working directory is used in place; a GitHub
/// repository URL is rewritten to its raw masterlist URL. Anything else is
/// dropped with a warning and the catalog default stays in effect.
pub fn resolve_repo_source(target: GameId, url: &str, branch: &str) -> Option<String> {
    if is_local_repo(url) {
        verify_checked_out_branch(url, branch);
        return Some(url.to_string());
    }

    match github_repo(url) {
        Some((owner, repo)) => {
            let repo = substitute_vr_repo(target, &owner, &repo);
            Some(format!(
                "https://raw.githubusercontent.com/{}/{}/{}/masterlist.yaml",
                owner, repo, branch
            ))
        }
        None => {
            warn!(
                "masterlist repository \"{}\" is neither a local git checkout nor a GitHub URL, ignoring it",
                url
            );
            None
        }
    }
}

/// Rewrite a direct masterlist source if it exactly matches a historical
/// default URL (official slug crossed with an old default branch); custom
/// sources pass through verbatim. Idempotent.
pub fn migrate_masterlist_source(source: &str) -> String {
    for id in GameId::all() {
        let slug = id.masterlist_repo_slug();
        for branch in OLD_DEFAULT_BRANCHES {
            let old = format!(
                "https://raw.githubusercontent.com/loot/{}/{}/masterlist.yaml",
                slug, branch
            );
            if source == old {
                return default_masterlist_url_for_slug(slug);
            }
        }
    }
    source.to_string()
}

/// True iff the source is a local path holding a masterlist inside a
/// non-bare git working directory.
fn is_local_repo(url: &str) -> bool {
    if url.starts_with("http://") || url.starts_with("https://") {
        return false;
    }
    let path = Path::new(url);
    path.join("masterlist.yaml").is_file() && path.join(".git").join("HEAD").is_file()
}

/// Warn when a local repository has a different branch checked out than the
/// one configured. The path is still used as-is; the state is merely
/// surprising, not wrong.
fn verify_checked_out_branch(url: &str, branch: &str) {
    let head = Path::new(url).join(".git").join("HEAD");
    let contents = match fs::read_to_string(&head) {
        Ok(c) => c,
        Err(e) => {
            warn!(
                "cannot verify checked-out branch of {}: {}",
                head.display(),
                e
            );
            return;
        }
    };

    let expected = format!("ref: refs/heads/{}", branch);
    if contents.trim() != expected {
        warn!(
            "local masterlist repository {} does not have branch \"{}\" checked out",
            url, branch
        );
    }
}
