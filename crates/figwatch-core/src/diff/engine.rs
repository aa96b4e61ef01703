//! Structural diff between two snapshot trees.
//!
//! The report pipeline only depends on the [`Differ`] trait; the
//! [`StructuralDiffer`] here is the default implementation used by the
//! service and the CLI.

use crate::diff::model::RawDiffRecord;
use crate::model::{Path, SnapshotTree};
use std::collections::BTreeSet;

/// Produces raw diff records between a left ("before") and right ("after")
/// tree.
pub trait Differ: Send + Sync {
    fn diff(&self, left: &SnapshotTree, right: &SnapshotTree) -> Vec<RawDiffRecord>;
}

/// Key-by-key, position-by-position tree differ.
///
/// - maps: keys visited in sorted order; keys only on the right are additions,
///   keys only on the left are removals, shared keys recurse
/// - sequences: positions compared pairwise; extra right items are additions,
///   extra left items are removals
/// - anything else that differs (scalars, or a shape change) is a value change
///
/// Output order is fully determined by the inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralDiffer;

impl Differ for StructuralDiffer {
    fn diff(&self, left: &SnapshotTree, right: &SnapshotTree) -> Vec<RawDiffRecord> {
        let mut records = Vec::new();
        diff_node(left, right, &Path::root(), &Path::root(), &mut records);
        records
    }
}

/// Convenience wrapper around [`StructuralDiffer`].
pub fn compute_diff(left: &SnapshotTree, right: &SnapshotTree) -> Vec<RawDiffRecord> {
    StructuralDiffer.diff(left, right)
}

fn diff_node(
    left: &SnapshotTree,
    right: &SnapshotTree,
    left_path: &Path,
    right_path: &Path,
    out: &mut Vec<RawDiffRecord>,
) {
    if left == right {
        return;
    }
    match (left, right) {
        (SnapshotTree::Map(a), SnapshotTree::Map(b)) => {
            let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
            for key in keys {
                match (a.get(key), b.get(key)) {
                    (Some(av), Some(bv)) => {
                        diff_node(av, bv, &left_path.key(key), &right_path.key(key), out)
                    }
                    (None, Some(bv)) => out.push(RawDiffRecord::MapAddition {
                        right_path: right_path.key(key),
                        added_value: bv.clone(),
                    }),
                    (Some(av), None) => out.push(RawDiffRecord::MapRemoval {
                        left_path: left_path.key(key),
                        removed_value: av.clone(),
                    }),
                    (None, None) => {}
                }
            }
        }
        (SnapshotTree::Sequence(a), SnapshotTree::Sequence(b)) => {
            for i in 0..a.len().max(b.len()) {
                match (a.get(i), b.get(i)) {
                    (Some(av), Some(bv)) => {
                        diff_node(av, bv, &left_path.index(i), &right_path.index(i), out)
                    }
                    (None, Some(bv)) => out.push(RawDiffRecord::SequenceAddition {
                        right_path: right_path.index(i),
                        added_value: bv.clone(),
                    }),
                    (Some(av), None) => out.push(RawDiffRecord::SequenceRemoval {
                        left_path: left_path.index(i),
                        removed_value: av.clone(),
                    }),
                    (None, None) => {}
                }
            }
        }
        _ => out.push(RawDiffRecord::ValueChange {
            left_path: left_path.clone(),
            right_path: right_path.clone(),
            old_value: left.clone(),
            new_value: right.clone(),
        }),
    }
}
