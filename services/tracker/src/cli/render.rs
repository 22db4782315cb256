//! services/tracker/src/cli/render.rs
//!
//! Plain-text rendering of users, documents and dashboards.

use chrono::{DateTime, Utc};
use doc_tracker_core::domain::{Document, DocumentStatus, SessionUser, Version, VersionStatus};
use doc_tracker_core::queries::{versions_newest_first, DashboardStats};
use std::fmt::Write;

fn date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

pub fn status_label(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Draft => "Draft",
        DocumentStatus::Review => "In review",
        DocumentStatus::Approved => "Approved",
        DocumentStatus::Archived => "Archived",
    }
}

pub fn category_label(category: &str) -> &str {
    match category {
        "thesis" => "Thesis",
        "paper" => "Paper",
        "proposal" => "Proposal",
        "report" => "Report",
        "other" => "Other",
        other => other,
    }
}

pub fn user(user: &SessionUser) -> String {
    let mut out = format!("{} <{}>\n", user.name, user.email);
    let profile = &user.profile;
    for (label, value) in [
        ("Institution", &profile.institution),
        ("Degree", &profile.degree),
        ("Field", &profile.field),
    ] {
        if !value.is_empty() {
            let _ = writeln!(out, "  {label}: {value}");
        }
    }
    out
}

/// One line per document, as in the list view.
pub fn document_row(doc: &Document) -> String {
    let mut row = format!(
        "{}  {}  v{}  [{}]  {}  updated {}",
        doc.id,
        doc.title,
        doc.current_version,
        status_label(doc.status),
        category_label(&doc.category),
        date(&doc.updated_at),
    );
    if !doc.tags.is_empty() {
        let _ = write!(row, "  #{}", doc.tags.join(" #"));
    }
    row
}

pub fn document_list(docs: &[&Document], filtered: bool) -> String {
    if docs.is_empty() {
        return if filtered {
            "No documents match the current filters.\n".to_string()
        } else {
            "No documents yet. Create one with `tracker create --title ...`.\n".to_string()
        };
    }
    let mut out = String::new();
    for doc in docs {
        let _ = writeln!(out, "{}", document_row(doc));
    }
    out
}

fn version_block(out: &mut String, version: &Version) {
    let marker = match version.status {
        VersionStatus::Current => " (current)",
        VersionStatus::Archived => "",
    };
    let _ = writeln!(
        out,
        "  v{}{}  {}  by {}",
        version.version,
        marker,
        date(&version.created_at),
        version.author
    );
    let _ = writeln!(out, "    {}", version.description);
    let _ = writeln!(out, "    Changes: {}", version.changes);
    if !version.file_name.is_empty() || !version.file_location.is_empty() {
        let _ = writeln!(out, "    File: {} {}", version.file_name, version.file_location);
    }
    for prompt in &version.prompts {
        let _ = writeln!(
            out,
            "    Prompt \"{}\" ({}, {}): {}",
            prompt.name,
            prompt.ai_used,
            date(&prompt.date),
            prompt.content
        );
        if !prompt.notes.is_empty() {
            let _ = writeln!(out, "      Notes: {}", prompt.notes);
        }
    }
    for related in &version.related_documents {
        let _ = writeln!(out, "    Related: {} -> {}", related.name, related.url);
    }
    for file in &version.attached_files {
        let _ = writeln!(
            out,
            "    Attached: {} [{}] {}  {}",
            file.name, file.file_type, file.size, file.description
        );
    }
}

/// The detail screen: document fields followed by the history, newest first.
pub fn document_detail(doc: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", doc.title);
    let _ = writeln!(out, "  id:        {}", doc.id);
    let _ = writeln!(out, "  status:    {}", status_label(doc.status));
    let _ = writeln!(out, "  category:  {}", category_label(&doc.category));
    let _ = writeln!(out, "  version:   {}", doc.current_version);
    let _ = writeln!(out, "  created:   {}", date(&doc.created_at));
    let _ = writeln!(out, "  updated:   {}", date(&doc.updated_at));
    if !doc.tags.is_empty() {
        let _ = writeln!(out, "  tags:      {}", doc.tags.join(", "));
    }
    if !doc.description.is_empty() {
        let _ = writeln!(out, "\n{}", doc.description);
    }
    let _ = writeln!(out, "\nVersion history ({}):", doc.versions.len());
    for version in versions_newest_first(doc) {
        version_block(&mut out, version);
    }
    out
}

pub fn dashboard(stats: &DashboardStats, recent: &[&Document]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Documents:       {}", stats.total_documents);
    let _ = writeln!(out, "Active:          {}", stats.active_documents);
    let _ = writeln!(out, "Versions:        {}", stats.total_versions);
    let _ = writeln!(out, "Updated (7d):    {}", stats.recent_updates);
    let _ = writeln!(out, "\nRecent documents:");
    out.push_str(&document_list(recent, false));
    out
}
