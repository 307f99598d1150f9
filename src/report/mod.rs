//! Structured run report
//!
//! Converts the engine's sorted order and per-plugin metadata into a nested
//! JSON document. Empty collections and unset flags are a presentation
//! concern: internal structures carry them freely, only the serialized form
//! elides them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::error;

use crate::engine::{CleaningData, EngineMessage, GameHandle, MessageKind};
use crate::fsutil;

/// Top-level report document.
#[derive(Debug, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<ReportMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginReport>,
    pub stats: RunStats,
}

/// A general or per-plugin message with its severity mapped to the fixed
/// `info`/`warn`/`error` vocabulary.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ReportMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Everything worth reporting about one plugin. A plugin with nothing beyond
/// its name is dropped from the document entirely.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginReport {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub incompatibilities: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<ReportMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dirty: Vec<DirtyReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clean: Vec<CleanReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_masters: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub loads_archive: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_master: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_light_plugin: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirtyReport {
    pub crc: u32,
    pub itm: u32,
    pub deleted_references: u32,
    pub deleted_navmeshes: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cleaning_utility: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    pub crc: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cleaning_utility: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

/// Run statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub elapsed_ms: u64,
    pub tool_version: String,
    pub engine_version: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Assemble the report for a sorted plugin set.
pub fn build_report(
    sorted: &[String],
    handle: &mut dyn GameHandle,
    language: &str,
    stats: RunStats,
) -> Result<Report> {
    let sorted_set: HashSet<String> = sorted.iter().map(|n| n.to_lowercase()).collect();

    let messages = handle
        .database()
        .general_messages()?
        .iter()
        .filter_map(|m| to_report_message(m, language))
        .collect();

    let mut plugins = Vec::new();
    for name in sorted {
        if let Some(entry) = build_plugin_report(name, handle, &sorted_set, language)? {
            plugins.push(entry);
        }
    }

    Ok(Report {
        messages,
        plugins,
        stats,
    })
}

fn build_plugin_report(
    name: &str,
    handle: &mut dyn GameHandle,
    sorted_set: &HashSet<String>,
    language: &str,
) -> Result<Option<PluginReport>> {
    let metadata = handle.database().plugin_metadata(name)?.unwrap_or_default();
    let plugin = handle.plugin(name).unwrap_or_default();

    // Incompatibilities that name a plugin outside the current sorted set
    // carry no actionable information and are dropped.
    let incompatibilities: Vec<String> = metadata
        .incompatibilities
        .iter()
        .filter(|other| sorted_set.contains(&other.to_lowercase()))
        .cloned()
        .collect();

    let messages: Vec<ReportMessage> = metadata
        .messages
        .iter()
        .filter_map(|m| to_report_message(m, language))
        .collect();

    let dirty: Vec<DirtyReport> = metadata
        .dirty
        .iter()
        .map(|d| DirtyReport {
            crc: d.crc,
            itm: d.itm_count,
            deleted_references: d.deleted_reference_count,
            deleted_navmeshes: d.deleted_navmesh_count,
            cleaning_utility: d.cleaning_utility.clone(),
            detail: format_dirty(d, language),
        })
        .collect();

    let clean: Vec<CleanReport> = metadata
        .clean
        .iter()
        .map(|c| CleanReport {
            crc: c.crc,
            cleaning_utility: c.cleaning_utility.clone(),
            detail: crate::engine::select_content(&c.detail, language)
                .map(|content| content.text.clone())
                .unwrap_or_default(),
        })
        .collect();

    let missing_masters: Vec<String> = plugin
        .masters
        .iter()
        .filter(|master| !sorted_set.contains(&master.to_lowercase()))
        .cloned()
        .collect();

    let entry = PluginReport {
        name: name.to_string(),
        incompatibilities,
        messages,
        dirty,
        clean,
        missing_masters,
        loads_archive: plugin.loads_archive,
        is_master: plugin.is_master,
        is_light_plugin: plugin.is_light_plugin,
    };

    if entry.incompatibilities.is_empty()
        && entry.messages.is_empty()
        && entry.dirty.is_empty()
        && entry.clean.is_empty()
        && entry.missing_masters.is_empty()
        && !entry.loads_archive
        && !entry.is_master
        && !entry.is_light_plugin
    {
        return Ok(None);
    }
    Ok(Some(entry))
}

/// Localize one engine message. Messages with no viable content for the
/// configured language are omitted; unknown severities are reported as
/// `unknown` and logged as an anomaly.
fn to_report_message(message: &EngineMessage, language: &str) -> Option<ReportMessage> {
    let text = message.text_for(language)?;

    let kind = match message.kind {
        MessageKind::Say => "info",
        MessageKind::Warn => "warn",
        MessageKind::Error => "error",
        MessageKind::Other(raw) => {
            error!("invalid message type {}", raw);
            "unknown"
        }
    };

    Some(ReportMessage {
        kind: kind.to_string(),
        text: text.to_string(),
    })
}

/// Compose the human-readable summary for a dirty-plugin entry, appending
/// any localized detail text the masterlist supplies.
fn format_dirty(data: &CleaningData, language: &str) -> String {
    let mut parts = Vec::new();
    if data.itm_count > 0 {
        parts.push(format!("{} ITM record(s)", data.itm_count));
    }
    if data.deleted_reference_count > 0 {
        parts.push(format!("{} deleted reference(s)", data.deleted_reference_count));
    }
    if data.deleted_navmesh_count > 0 {
        parts.push(format!("{} deleted navmesh(es)", data.deleted_navmesh_count));
    }

    let found = match parts.len() {
        0 => "dirty edits".to_string(),
        1 => parts.remove(0),
        n => format!("{} and {}", parts[..n - 1].join(", "), parts[n - 1]),
    };
    let summary = format!("{} found {}.", data.cleaning_utility, found);

    match crate::engine::select_content(&data.detail, language) {
        Some(content) => format!("{} {}", summary, content.text),
        None => summary,
    }
}

/// Serialize the report and write it atomically.
pub fn write_report(path: &Path, report: &Report) -> Result<()> {
    let json = serde_json::to_vec_pretty(report)?;
    fsutil::write_atomic(path, &json)?;
    Ok(())
}
