pub mod event;
pub mod node_id;
pub mod path;
pub mod tree;

pub use event::{ComponentEntry, ComponentInfo, ComponentRef, PublishEvent, TriggeredBy};
pub use node_id::NodeId;
pub use path::{Path, PathStep};
pub use tree::{Scalar, SnapshotTree};
