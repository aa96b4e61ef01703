//! Raw diff record types.
//!
//! Records are expressed as paths into the two snapshots; nothing here is
//! resolved to names yet. Serialises with a `kind` tag for the `diff` CLI
//! command.

use crate::model::{Path, SnapshotTree};
use serde::{Deserialize, Serialize};

/// One atomic change between the "before" (left) and "after" (right) trees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawDiffRecord {
    /// A leaf value (or the shape) at a shared position changed
    ValueChange {
        left_path: Path,
        right_path: Path,
        old_value: SnapshotTree,
        new_value: SnapshotTree,
    },
    /// A key present only in the right map
    MapAddition {
        right_path: Path,
        added_value: SnapshotTree,
    },
    /// A position present only in the right sequence
    SequenceAddition {
        right_path: Path,
        added_value: SnapshotTree,
    },
    /// A key present only in the left map
    MapRemoval {
        left_path: Path,
        removed_value: SnapshotTree,
    },
    /// A position present only in the left sequence
    SequenceRemoval {
        left_path: Path,
        removed_value: SnapshotTree,
    },
}

/// Category tag of a record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    ValueChange,
    MapAddition,
    SequenceAddition,
    MapRemoval,
    SequenceRemoval,
}

impl ChangeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeCategory::ValueChange => "value_change",
            ChangeCategory::MapAddition => "map_addition",
            ChangeCategory::SequenceAddition => "sequence_addition",
            ChangeCategory::MapRemoval => "map_removal",
            ChangeCategory::SequenceRemoval => "sequence_removal",
        }
    }
}

impl RawDiffRecord {
    pub fn category(&self) -> ChangeCategory {
        match self {
            RawDiffRecord::ValueChange { .. } => ChangeCategory::ValueChange,
            RawDiffRecord::MapAddition { .. } => ChangeCategory::MapAddition,
            RawDiffRecord::SequenceAddition { .. } => ChangeCategory::SequenceAddition,
            RawDiffRecord::MapRemoval { .. } => ChangeCategory::MapRemoval,
            RawDiffRecord::SequenceRemoval { .. } => ChangeCategory::SequenceRemoval,
        }
    }

    pub fn is_deletion(&self) -> bool {
        matches!(
            self,
            RawDiffRecord::MapRemoval { .. } | RawDiffRecord::SequenceRemoval { .. }
        )
    }
}
