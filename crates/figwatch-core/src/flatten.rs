//! Value flattener: added subtree → `(node id, label)` or plain text.

use crate::errors::FigwatchError;
use crate::model::node_id::last_node_id_in;
use crate::model::{NodeId, Path, SnapshotTree};

pub const COMPONENT_SET_ID_FIELD: &str = "componentSetId";
pub const ID_FIELD: &str = "id";
pub const NAME_FIELD: &str = "name";

/// Canonical form of an added or changed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatValue {
    /// Non-map value, rendered as text
    Text(String),
    /// Map value identified as a design node
    Node { id: NodeId, label: Option<String> },
}

/// Which rule produced a node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    ComponentSetId,
    Id,
    /// Last node-id token of the originating path; heuristic
    PathFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened {
    pub value: FlatValue,
    /// `None` for text values
    pub identity: Option<IdentitySource>,
}

impl Flattened {
    pub fn used_path_fallback(&self) -> bool {
        self.identity == Some(IdentitySource::PathFallback)
    }
}

/// Flatten `value`, found at `originating_path`.
///
/// Map identity precedence: `componentSetId`, then `id`, then the last
/// node-id token in the path text. Items added to lists often carry no id of
/// their own, only the id of the node whose subtree contains them, so the
/// last rule is a best guess; callers should report when it fires.
///
/// # Errors
///
/// `MissingIdentity` when a map value yields no identity by any rule.
pub fn flatten(value: &SnapshotTree, originating_path: &Path) -> Result<Flattened, FigwatchError> {
    match value {
        SnapshotTree::Scalar(_) | SnapshotTree::Sequence(_) => Ok(Flattened {
            value: FlatValue::Text(value.render_text()),
            identity: None,
        }),
        SnapshotTree::Map(_) => {
            let path_text = originating_path.to_string();
            let (raw_id, source) = if let Some(id) = value.string_field(COMPONENT_SET_ID_FIELD) {
                (id.to_string(), IdentitySource::ComponentSetId)
            } else if let Some(id) = value.string_field(ID_FIELD) {
                (id.to_string(), IdentitySource::Id)
            } else if let Some(id) = last_node_id_in(&path_text) {
                (id.to_string(), IdentitySource::PathFallback)
            } else {
                return Err(FigwatchError::MissingIdentity { path: path_text });
            };

            Ok(Flattened {
                value: FlatValue::Node {
                    id: NodeId::new(&raw_id),
                    label: value.string_field(NAME_FIELD).map(str::to_string),
                },
                identity: Some(source),
            })
        }
    }
}
