//! Report compiler.
//!
//! Single pass per event:
//! 1. registry from created then modified components
//! 2. header and optional description
//! 3. created / modified sections, each cut at the component limit
//! 4. changes: resolve, flatten, drop noise, annotate, render, cut at the
//!    change limit

use crate::annotate::{annotate, escape_html, DocumentLinks};
use crate::core_types::schema::{
    EVENT_IDENTITY_FALLBACK, EVENT_RECORD_SKIPPED, EVENT_RESOLUTION_DEGRADED,
};
use crate::diff::RawDiffRecord;
use crate::errors::ExError;
use crate::flatten::{flatten, FlatValue};
use crate::model::{ComponentEntry, Path, PublishEvent, SnapshotTree};
use crate::registry::NodeRegistry;
use crate::report::model::{
    is_noise_field, HistoryDiff, Report, ReportLimits, ReportSection, ReportSettings,
    ReportStats, ResolvedChange, SectionKind, CHANGES_HEADING, CREATED_HEADING,
    MODIFIED_HEADING,
};
use crate::resolve::{resolve_breadcrumb, Breadcrumb};
use crate::{log_degraded, log_op_end, log_op_start};
use std::time::Instant;

/// Everything one report needs; built per event and dropped afterwards.
#[derive(Debug, Clone)]
pub struct ReportContext {
    file_key: String,
    links: DocumentLinks,
    registry: NodeRegistry,
    limits: ReportLimits,
}

impl ReportContext {
    pub fn new(
        event: &PublishEvent,
        created: &[ComponentEntry],
        modified: &[ComponentEntry],
        settings: &ReportSettings,
    ) -> Self {
        Self {
            file_key: event.file_key.clone(),
            links: DocumentLinks::new(settings.web_base.clone(), event.file_key.clone()),
            registry: NodeRegistry::from_components(created, modified),
            limits: settings.limits,
        }
    }

    pub fn file_key(&self) -> &str {
        &self.file_key
    }

    pub fn links(&self) -> &DocumentLinks {
        &self.links
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn limits(&self) -> ReportLimits {
        self.limits
    }
}

/// Compile the report for one publish event.
///
/// `history` is `None` when the snapshots could not be fetched; the report
/// then has no changes section at all.
pub fn compile_report(
    event: &PublishEvent,
    created: &[ComponentEntry],
    modified: &[ComponentEntry],
    history: Option<&HistoryDiff>,
    settings: &ReportSettings,
) -> Report {
    let started = Instant::now();
    let file_key = event.file_key.as_str();
    let record_count = history.map_or(0, |h| h.records.len());
    log_op_start!(
        "compile_report",
        file_key = file_key,
        component_count = created.len() + modified.len(),
        record_count = record_count,
    );

    let ctx = ReportContext::new(event, created, modified, settings);
    let mut stats = ReportStats::default();
    let mut sections = Vec::new();

    sections.push(ReportSection::new(
        SectionKind::Header,
        None,
        vec![header_line(event, &ctx)],
    ));

    if let Some(description) = event.description_text() {
        sections.push(ReportSection::new(
            SectionKind::Description,
            None,
            vec![format!("\n<blockquote>{}</blockquote>", escape_html(description))],
        ));
    }

    if !created.is_empty() {
        sections.push(component_section(SectionKind::Created, CREATED_HEADING, created, &ctx));
    }
    if !modified.is_empty() {
        sections.push(component_section(SectionKind::Modified, MODIFIED_HEADING, modified, &ctx));
    }

    if let Some(history) = history {
        let lines: Vec<String> = resolve_changes(history, &ctx, &mut stats)
            .iter()
            .map(|change| render_change(change, &ctx))
            .collect();
        let section = ReportSection::truncated(
            SectionKind::Changes,
            Some(CHANGES_HEADING),
            lines,
            ctx.limits.change_limit,
        );
        stats.rendered_changes = section.entries.len();
        sections.push(section);
    }

    log_op_end!(
        "compile_report",
        duration_ms = started.elapsed().as_millis() as u64,
        file_key = file_key,
        rendered_changes = stats.rendered_changes,
        noise_dropped = stats.noise_dropped,
        records_skipped = stats.records_skipped,
    );
    Report::new(sections, stats)
}

fn header_line(event: &PublishEvent, ctx: &ReportContext) -> String {
    format!(
        "🛍 {} published {}",
        escape_html(&event.triggered_by.handle),
        ctx.links.document_link(&event.file_name)
    )
}

fn component_section(
    kind: SectionKind,
    heading: &str,
    components: &[ComponentEntry],
    ctx: &ReportContext,
) -> ReportSection {
    let entries = components
        .iter()
        .map(|c| ctx.links.node_link(&c.node_id, &c.label))
        .collect();
    ReportSection::truncated(kind, Some(heading), entries, ctx.limits.component_limit)
}

/// Resolve every raw record; value changes first, then map additions, then
/// sequence additions, each in differ order.
pub fn resolve_changes(
    history: &HistoryDiff,
    ctx: &ReportContext,
    stats: &mut ReportStats,
) -> Vec<ResolvedChange> {
    let mut changes = Vec::new();
    let mut map_additions = Vec::new();
    let mut sequence_additions = Vec::new();

    for record in &history.records {
        match record {
            RawDiffRecord::ValueChange {
                left_path,
                old_value,
                new_value,
                ..
            } => {
                let path = breadcrumb(&history.before, left_path, ctx, stats);
                if is_noise_field(&path.text()) {
                    stats.noise_dropped += 1;
                    continue;
                }
                changes.push(ResolvedChange::Change {
                    path,
                    old: old_value.render_text(),
                    new: new_value.render_text(),
                });
            }
            RawDiffRecord::MapAddition {
                right_path,
                added_value,
            } => {
                if let Some((path, value)) = addition(history, right_path, added_value, ctx, stats) {
                    map_additions.push(ResolvedChange::Add { path, value });
                }
            }
            RawDiffRecord::SequenceAddition {
                right_path,
                added_value,
            } => {
                if let Some((path, value)) = addition(history, right_path, added_value, ctx, stats) {
                    sequence_additions.push(ResolvedChange::Set { path, value });
                }
            }
            RawDiffRecord::MapRemoval { left_path, .. }
            | RawDiffRecord::SequenceRemoval { left_path, .. } => {
                stats.deletions_skipped += 1;
                tracing::debug!(
                    file_key = ctx.file_key(),
                    path = %left_path,
                    kind = record.category().as_str(),
                    "removal not rendered"
                );
            }
        }
    }

    changes.extend(map_additions);
    changes.extend(sequence_additions);
    changes
}

fn breadcrumb(
    tree: &SnapshotTree,
    path: &Path,
    ctx: &ReportContext,
    stats: &mut ReportStats,
) -> Breadcrumb {
    let crumb = resolve_breadcrumb(tree, path);
    if crumb.is_degraded() {
        stats.degraded_paths += 1;
        let raw = path.to_string();
        log_degraded!(
            "resolve_path",
            EVENT_RESOLUTION_DEGRADED,
            file_key = ctx.file_key(),
            path = raw.as_str(),
        );
    }
    crumb
}

fn addition(
    history: &HistoryDiff,
    right_path: &Path,
    added_value: &SnapshotTree,
    ctx: &ReportContext,
    stats: &mut ReportStats,
) -> Option<(Breadcrumb, FlatValue)> {
    let flat = match flatten(added_value, right_path) {
        Ok(flat) => flat,
        Err(err) => {
            stats.records_skipped += 1;
            let err = ExError::from(err);
            let raw = right_path.to_string();
            log_degraded!(
                "flatten_value",
                EVENT_RECORD_SKIPPED,
                file_key = ctx.file_key(),
                path = raw.as_str(),
                err.code = err.code(),
            );
            return None;
        }
    };
    if flat.used_path_fallback() {
        stats.identity_fallbacks += 1;
        let raw = right_path.to_string();
        log_degraded!(
            "flatten_value",
            EVENT_IDENTITY_FALLBACK,
            file_key = ctx.file_key(),
            path = raw.as_str(),
        );
    }
    let path = breadcrumb(&history.after, right_path, ctx, stats);
    Some((path, flat.value))
}

/// Render one resolved change as a report line.
pub fn render_change(change: &ResolvedChange, ctx: &ReportContext) -> String {
    match change {
        ResolvedChange::Change { path, old, new } => format!(
            "Change {} from {} to {}",
            linked_path(path, ctx),
            escape_html(old),
            escape_html(new)
        ),
        ResolvedChange::Add { path, value } => format!(
            "Add {} on path {}",
            render_value(value, ctx),
            linked_path(path, ctx)
        ),
        ResolvedChange::Set { path, value } => format!(
            "Set {} on path {}",
            render_value(value, ctx),
            linked_path(path, ctx)
        ),
    }
}

fn linked_path(path: &Breadcrumb, ctx: &ReportContext) -> String {
    annotate(&path.escaped_text(), &ctx.registry, &ctx.links)
}

/// Registered nodes become links; anything else is plain text.
fn render_value(value: &FlatValue, ctx: &ReportContext) -> String {
    match value {
        FlatValue::Text(text) => escape_html(text),
        FlatValue::Node { id, label } => match ctx.registry.lookup(id.as_dash()) {
            Some(registered) => ctx
                .links
                .node_link(id, label.as_deref().unwrap_or(registered)),
            None => escape_html(label.as_deref().unwrap_or(id.as_dash())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_diff;
    use crate::model::NodeId;
    use serde_json::json;

    fn event() -> PublishEvent {
        serde_json::from_value(json!({
            "file_key": "FILE1",
            "file_name": "Design System",
            "description": "",
            "triggered_by": {"handle": "alex"}
        }))
        .unwrap()
    }

    fn ctx_with(created: &[ComponentEntry]) -> ReportContext {
        ReportContext::new(&event(), created, &[], &ReportSettings::default())
    }

    #[test]
    fn test_header_links_document() {
        let report = compile_report(&event(), &[], &[], None, &ReportSettings::default());
        assert_eq!(
            report.render(),
            "🛍 alex published <a href='https://www.figma.com/design/FILE1'>Design System</a>"
        );
    }

    #[test]
    fn test_value_change_line() {
        let before = SnapshotTree::from(json!({"opacity": 1}));
        let after = SnapshotTree::from(json!({"opacity": 0.5}));
        let history = HistoryDiff {
            records: compute_diff(&before, &after),
            before,
            after,
        };
        let ctx = ctx_with(&[]);
        let mut stats = ReportStats::default();
        let changes = resolve_changes(&history, &ctx, &mut stats);
        assert_eq!(render_change(&changes[0], &ctx), "Change opacity from 1 to 0.5");
    }

    #[test]
    fn test_registered_value_renders_as_link() {
        let ctx = ctx_with(&[ComponentEntry::new("5:6", "Icons, Icon")]);
        let linked = render_value(
            &FlatValue::Node {
                id: NodeId::new("5:6"),
                label: Some("Icon".into()),
            },
            &ctx,
        );
        assert_eq!(
            linked,
            "<a href='https://www.figma.com/design/FILE1?node-id=5-6'>Icon</a>"
        );

        let unlabeled = render_value(
            &FlatValue::Node {
                id: NodeId::new("5:6"),
                label: None,
            },
            &ctx,
        );
        assert!(unlabeled.ends_with(">Icons, Icon</a>"));
    }

    #[test]
    fn test_unregistered_value_renders_as_text() {
        let ctx = ctx_with(&[]);
        let text = render_value(
            &FlatValue::Node {
                id: NodeId::new("9:9"),
                label: None,
            },
            &ctx,
        );
        assert_eq!(text, "9-9");
    }

    #[test]
    fn test_category_order_is_changes_then_adds_then_sets() {
        let before = SnapshotTree::from(json!({"a": [1], "m": {}, "z": 1}));
        let after = SnapshotTree::from(json!({"a": [1, "x"], "m": {"k": "v"}, "z": 2}));
        let history = HistoryDiff {
            records: compute_diff(&before, &after),
            before,
            after,
        };
        let mut stats = ReportStats::default();
        let changes = resolve_changes(&history, &ctx_with(&[]), &mut stats);
        assert!(matches!(changes[0], ResolvedChange::Change { .. }));
        assert!(matches!(changes[1], ResolvedChange::Add { .. }));
        assert!(matches!(changes[2], ResolvedChange::Set { .. }));
    }
}
