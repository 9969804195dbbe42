use sha1::{Digest, Sha1};

use crate::element::element_model::ElementId;
use crate::wire::wire_model::{ChangeSet, WireElement, WireTree};

/// Outcome of comparing two tree snapshots element by element.
#[derive(Debug)]
pub struct TreeDiff {
    /// Added and changed IDs map to their full payload, removed IDs to
    /// the removal marker; unchanged elements are absent
    pub changes: ChangeSet,

    pub added: Vec<ElementId>,
    pub changed: Vec<ElementId>,
    pub removed: Vec<ElementId>,
}

/// Pure comparison of a pre-invocation snapshot against a post-invocation
/// one. No tree is mutated; capture happens elsewhere.
pub fn diff_trees(before: &WireTree, after: &WireTree) -> TreeDiff {
    let mut changes = ChangeSet::new();
    let mut added = Vec::new();
    let mut changed = Vec::new();
    let mut removed = Vec::new();

    for (id, payload) in after {
        match before.get(id) {
            None => {
                added.push(*id);
                changes.insert(*id, payload.clone());
            }
            Some(previous) if previous != payload => {
                changed.push(*id);
                changes.insert(*id, payload.clone());
            }
            Some(_) => {}
        }
    }

    for id in before.keys() {
        if !after.contains_key(id) {
            removed.push(*id);
            changes.insert_removed(*id);
        }
    }

    TreeDiff {
        changes,
        added,
        changed,
        removed,
    }
}

/// SHA-1 hex digest of a snapshot's canonical JSON encoding (map keys are
/// sorted), recorded in dispatch traces. Undigestable snapshots degrade
/// to a warning.
pub fn tree_digest(tree: &WireTree) -> Option<String> {
    match serde_json::to_string(tree) {
        Ok(json) => Some(hex_digest(&json)),
        Err(e) => {
            log::warn!("failed to encode tree for digest: {}", e);
            None
        }
    }
}

/// Digest of a single element payload.
pub fn payload_digest(element: &WireElement) -> Option<String> {
    match serde_json::to_string(element) {
        Ok(json) => Some(hex_digest(&json)),
        Err(e) => {
            log::warn!("failed to encode element for digest: {}", e);
            None
        }
    }
}

fn hex_digest(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
