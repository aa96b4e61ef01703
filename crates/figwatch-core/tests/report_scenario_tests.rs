//! End-to-end report scenarios: event + components + history → text.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use figwatch_core::diff::{compute_diff, RawDiffRecord};
use figwatch_core::model::{ComponentEntry, Path, PublishEvent, SnapshotTree};
use figwatch_core::report::{
    compile_report, HistoryDiff, ReportLimits, ReportSettings, SectionKind,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn event(description: &str) -> PublishEvent {
    serde_json::from_value(json!({
        "event_type": "LIBRARY_PUBLISH",
        "file_key": "FILE1",
        "file_name": "Design System",
        "description": description,
        "triggered_by": {"handle": "alex"}
    }))
    .unwrap()
}

fn settings(change_limit: usize) -> ReportSettings {
    ReportSettings {
        limits: ReportLimits {
            component_limit: 10,
            change_limit,
        },
        ..ReportSettings::default()
    }
}

fn history(before: serde_json::Value, after: serde_json::Value) -> HistoryDiff {
    let before = SnapshotTree::from(before);
    let after = SnapshotTree::from(after);
    HistoryDiff {
        records: compute_diff(&before, &after),
        before,
        after,
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_created_component_without_changes() {
    let created = vec![ComponentEntry::new("10-20", "Button")];
    let empty = history(json!({"a": 1}), json!({"a": 1}));

    let report = compile_report(&event(""), &created, &[], Some(&empty), &settings(10));

    let section = report.section(SectionKind::Created).unwrap();
    assert_eq!(
        section.entries,
        vec!["<a href='https://www.figma.com/design/FILE1?node-id=10-20'>Button</a>".to_string()]
    );
    let changes = report.section(SectionKind::Changes).unwrap();
    assert!(changes.entries.is_empty());
    assert_eq!(changes.omitted, 0);
    assert!(report.section(SectionKind::Modified).is_none());
    assert!(report.section(SectionKind::Description).is_none());
}

#[test]
fn test_map_addition_at_top_level_index() {
    let after = SnapshotTree::from(json!([{"id": "5:6", "name": "Icon"}]));
    let history = HistoryDiff {
        before: SnapshotTree::from(json!([])),
        records: vec![RawDiffRecord::MapAddition {
            right_path: Path::parse("[0]").unwrap(),
            added_value: after.at(0).cloned().unwrap(),
        }],
        after,
    };

    let report = compile_report(&event(""), &[], &[], Some(&history), &settings(10));

    let changes = report.section(SectionKind::Changes).unwrap();
    assert_eq!(changes.entries, vec!["Add Icon on path (Icon)".to_string()]);
}

#[test]
fn test_map_addition_under_children_keeps_key_segment() {
    let after = SnapshotTree::from(json!({"children": [{"id": "5:6", "name": "Icon"}]}));
    let history = HistoryDiff {
        before: SnapshotTree::from(json!({"children": []})),
        records: vec![RawDiffRecord::MapAddition {
            right_path: Path::parse("children->[0]").unwrap(),
            added_value: SnapshotTree::from(json!({"id": "5:6", "name": "Icon"})),
        }],
        after,
    };

    let report = compile_report(&event(""), &[], &[], Some(&history), &settings(10));

    assert_eq!(
        report.section(SectionKind::Changes).unwrap().entries,
        vec!["Add Icon on path children -> (Icon)".to_string()]
    );
}

#[test]
fn test_noise_fields_are_dropped_before_truncation() {
    let history = history(
        json!({"lastModified": "2024-01-01", "opacity": 1}),
        json!({"lastModified": "2024-02-01", "opacity": 0.5}),
    );

    let report = compile_report(&event(""), &[], &[], Some(&history), &settings(10));

    let changes = report.section(SectionKind::Changes).unwrap();
    assert_eq!(changes.entries, vec!["Change opacity from 1 to 0.5".to_string()]);
    assert_eq!(report.stats().noise_dropped, 1);
    assert!(!report.render().contains("lastModified"));
}

#[test]
fn test_changes_truncated_with_marker() {
    let before: serde_json::Map<String, serde_json::Value> =
        (0..15).map(|i| (format!("field{:02}", i), json!(i))).collect();
    let after: serde_json::Map<String, serde_json::Value> =
        (0..15).map(|i| (format!("field{:02}", i), json!(i + 100))).collect();
    let history = history(before.into(), after.into());

    let report = compile_report(&event(""), &[], &[], Some(&history), &settings(10));

    let changes = report.section(SectionKind::Changes).unwrap();
    assert_eq!(changes.entries.len(), 10);
    assert_eq!(changes.omitted, 5);
    assert_eq!(report.stats().rendered_changes, 10);
    assert!(report.render().ends_with("<u>and 5 more</u>"));
    assert_eq!(changes.entries[0], "Change field00 from 0 to 100");
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn test_full_layout() {
    let created = vec![ComponentEntry::new("1:2", "Buttons, Primary")];
    let modified = vec![ComponentEntry::new("3:4", "Cards, Card")];
    let history = history(
        json!({"nodes": {"3:4": {"document": {"name": "Card", "opacity": 1}}}}),
        json!({"nodes": {"3:4": {"document": {"name": "Card", "opacity": 0.8}}}}),
    );

    let report = compile_report(
        &event("New buttons"),
        &created,
        &modified,
        Some(&history),
        &settings(10),
    );

    let expected = [
        "🛍 alex published <a href='https://www.figma.com/design/FILE1'>Design System</a>",
        "\n<blockquote>New buttons</blockquote>",
        "\n<b>Created components</b>\n",
        "<a href='https://www.figma.com/design/FILE1?node-id=1-2'>Buttons, Primary</a>",
        "\n<b>Modified components</b>\n",
        "<a href='https://www.figma.com/design/FILE1?node-id=3-4'>Cards, Card</a>",
        "\n<b>Changes</b>\n",
        "Change nodes -> <a href='https://www.figma.com/design/FILE1?node-id=3-4'>Cards, Card</a> -> document -> opacity from 1 to 0.8",
    ]
    .join("\n");
    assert_eq!(report.render(), expected);
}

#[test]
fn test_component_sections_truncate() {
    let created: Vec<ComponentEntry> = (0..12)
        .map(|i| ComponentEntry::new(&format!("{}:1", i), format!("C{}", i)))
        .collect();
    let report = compile_report(&event(""), &created, &[], None, &settings(10));

    let section = report.section(SectionKind::Created).unwrap();
    assert_eq!(section.entries.len(), 10);
    assert_eq!(section.omitted, 2);
    assert!(report.render().ends_with("<u>and 2 more</u>"));
}

#[test]
fn test_degraded_report_has_no_changes_section() {
    let report = compile_report(&event(""), &[], &[], None, &settings(10));
    assert!(report.section(SectionKind::Changes).is_none());
    assert!(!report.render().contains("<b>Changes</b>"));
}

#[test]
fn test_empty_description_is_omitted() {
    let report = compile_report(&event(""), &[], &[], None, &settings(10));
    assert!(!report.render().contains("blockquote"));
    assert!(report.section(SectionKind::Description).is_none());
}

#[test]
fn test_whitespace_description_is_quoted() {
    let report = compile_report(&event(" "), &[], &[], None, &settings(10));
    assert!(report.render().contains("\n<blockquote> </blockquote>"));
}

#[test]
fn test_user_text_is_escaped() {
    let mut e = event("a < b & c");
    e.file_name = "<Kit>".to_string();
    let report = compile_report(&e, &[], &[], None, &settings(10));
    let text = report.render();
    assert!(text.contains(">&lt;Kit&gt;</a>"));
    assert!(text.contains("<blockquote>a &lt; b &amp; c</blockquote>"));
}

#[test]
fn test_modified_label_wins_in_annotation() {
    let created = vec![ComponentEntry::new("3:4", "Old")];
    let modified = vec![ComponentEntry::new("3-4", "New")];
    let history = history(
        json!({"nodes": {"3:4": {"opacity": 1}}}),
        json!({"nodes": {"3:4": {"opacity": 0}}}),
    );

    let report = compile_report(&event(""), &created, &modified, Some(&history), &settings(10));
    let line = &report.section(SectionKind::Changes).unwrap().entries[0];
    assert!(line.contains("node-id=3-4'>New</a>"));
}

// ---------------------------------------------------------------------------
// Degraded records
// ---------------------------------------------------------------------------

#[test]
fn test_record_without_identity_is_skipped() {
    let history = history(
        json!({"fills": []}),
        json!({"fills": [{"type": "SOLID"}], "opacity": 1}),
    );

    let report = compile_report(&event(""), &[], &[], Some(&history), &settings(10));

    let changes = report.section(SectionKind::Changes).unwrap();
    assert_eq!(changes.entries, vec!["Add 1 on path opacity".to_string()]);
    assert_eq!(report.stats().records_skipped, 1);
}

#[test]
fn test_removals_are_counted_not_rendered() {
    let history = history(json!({"a": 1, "b": [1, 2]}), json!({"b": [1]}));

    let report = compile_report(&event(""), &[], &[], Some(&history), &settings(10));

    assert!(report.section(SectionKind::Changes).unwrap().entries.is_empty());
    assert_eq!(report.stats().deletions_skipped, 2);
}

#[test]
fn test_unresolvable_path_is_rendered_with_marker() {
    let history = HistoryDiff {
        before: SnapshotTree::from(json!({})),
        after: SnapshotTree::from(json!({})),
        records: vec![RawDiffRecord::ValueChange {
            left_path: Path::parse("nodes->1:2->opacity").unwrap(),
            right_path: Path::parse("nodes->1:2->opacity").unwrap(),
            old_value: SnapshotTree::from(json!(1)),
            new_value: SnapshotTree::from(json!(0)),
        }],
    };

    let report = compile_report(&event(""), &[], &[], Some(&history), &settings(10));

    assert_eq!(
        report.section(SectionKind::Changes).unwrap().entries,
        vec!["Change ERROR from 1 to 0".to_string()]
    );
    assert_eq!(report.stats().degraded_paths, 1);
}

#[test]
fn test_compile_is_idempotent() {
    let created = vec![ComponentEntry::new("1:2", "Buttons, Primary")];
    let history = history(
        json!({"nodes": {"1:2": {"children": []}}}),
        json!({"nodes": {"1:2": {"children": [{"name": "Shadow"}]}}}),
    );

    let first = compile_report(&event("x"), &created, &[], Some(&history), &settings(10));
    let second = compile_report(&event("x"), &created, &[], Some(&history), &settings(10));
    assert_eq!(first, second);
    assert_eq!(first.render(), second.render());
}
