//! Report types.
//!
//! A report is a list of sections, each with an optional heading, its entry
//! lines and a count of entries cut by truncation. Rendering joins every
//! line with `\n`.

use crate::annotate::DEFAULT_WEB_BASE;
use crate::diff::{Differ, RawDiffRecord};
use crate::flatten::FlatValue;
use crate::model::SnapshotTree;
use crate::resolve::Breadcrumb;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_COMPONENT_LIMIT: usize = 10;
pub const DEFAULT_CHANGE_LIMIT: usize = 10;

/// Fields that differ on every publish and say nothing about the design.
pub const NOISE_FIELDS: &[&str] = &["lastModified", "version", "thumbnailUrl"];

pub const CREATED_HEADING: &str = "\n<b>Created components</b>\n";
pub const MODIFIED_HEADING: &str = "\n<b>Modified components</b>\n";
pub const CHANGES_HEADING: &str = "\n<b>Changes</b>\n";

/// True when a resolved breadcrumb names a noise field exactly.
pub fn is_noise_field(breadcrumb: &str) -> bool {
    NOISE_FIELDS.contains(&breadcrumb)
}

/// Overflow marker line for `n` dropped entries.
pub fn more_marker(n: usize) -> String {
    format!("<u>and {} more</u>", n)
}

/// Per-section entry limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLimits {
    /// Max entries in each of the created / modified sections
    pub component_limit: usize,
    /// Max lines in the changes section, counted after noise filtering
    pub change_limit: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            component_limit: DEFAULT_COMPONENT_LIMIT,
            change_limit: DEFAULT_CHANGE_LIMIT,
        }
    }
}

/// Static settings shared by every report the service compiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub web_base: String,
    pub limits: ReportLimits,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            web_base: DEFAULT_WEB_BASE.to_string(),
            limits: ReportLimits::default(),
        }
    }
}

/// The two snapshots of an event and the raw records between them.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryDiff {
    /// Older named version (left)
    pub before: SnapshotTree,
    /// Newer named version (right)
    pub after: SnapshotTree,
    pub records: Vec<RawDiffRecord>,
}

impl HistoryDiff {
    pub fn compute(before: SnapshotTree, after: SnapshotTree, differ: &dyn Differ) -> Self {
        let records = differ.diff(&before, &after);
        Self {
            before,
            after,
            records,
        }
    }
}

/// A raw record after path resolution and flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedChange {
    /// Value change: breadcrumb resolved against the before tree
    Change {
        path: Breadcrumb,
        old: String,
        new: String,
    },
    /// Map addition
    Add { path: Breadcrumb, value: FlatValue },
    /// Sequence addition
    Set { path: Breadcrumb, value: FlatValue },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Header,
    Description,
    Created,
    Modified,
    Changes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub heading: Option<String>,
    pub entries: Vec<String>,
    /// Entries cut by the section limit
    pub omitted: usize,
}

impl ReportSection {
    pub fn new(kind: SectionKind, heading: Option<&str>, entries: Vec<String>) -> Self {
        Self {
            kind,
            heading: heading.map(str::to_string),
            entries,
            omitted: 0,
        }
    }

    /// Keep the first `limit` entries; the heading always survives.
    pub fn truncated(
        kind: SectionKind,
        heading: Option<&str>,
        mut entries: Vec<String>,
        limit: usize,
    ) -> Self {
        let omitted = entries.len().saturating_sub(limit);
        entries.truncate(limit);
        Self {
            kind,
            heading: heading.map(str::to_string),
            entries,
            omitted,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 2);
        if let Some(heading) = &self.heading {
            lines.push(heading.clone());
        }
        lines.extend(self.entries.iter().cloned());
        if self.omitted > 0 {
            lines.push(more_marker(self.omitted));
        }
        lines
    }
}

/// Counters describing what happened to the raw records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    /// Change lines kept after truncation
    pub rendered_changes: usize,
    /// Value changes dropped as noise
    pub noise_dropped: usize,
    /// Removal records, which are not rendered
    pub deletions_skipped: usize,
    /// Records skipped for lacking a node identity
    pub records_skipped: usize,
    /// Identities recovered from the path text
    pub identity_fallbacks: usize,
    /// Breadcrumbs containing the ERROR marker
    pub degraded_paths: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    sections: Vec<ReportSection>,
    stats: ReportStats,
}

impl Report {
    pub fn new(sections: Vec<ReportSection>, stats: ReportStats) -> Self {
        Self { sections, stats }
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn stats(&self) -> &ReportStats {
        &self.stats
    }

    pub fn lines(&self) -> Vec<String> {
        self.sections.iter().flat_map(ReportSection::lines).collect()
    }

    /// Final report text.
    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
