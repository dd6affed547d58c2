//! Breadth-first traversal of the whole content tree.

use std::collections::VecDeque;

use super::{Pad, RecordId, RecordKind};
use crate::context;

/// Every record of `pad`, breadth-first from the root.
///
/// Hidden pages and all attachments are included. A page's child pages come
/// before its attachments. Dependency recording is suspended for the walk.
///
/// # Panics
///
/// When a build context is active: a full walk would otherwise make the
/// artifact being built depend on every record in the tree.
pub fn walk_records(pad: &Pad) -> Vec<RecordId> {
    assert!(
        context::current().is_none(),
        "walk_records called inside a build context"
    );
    let _recording = context::disable_dependency_recording();

    let mut order = Vec::new();
    let mut queue = VecDeque::from([pad.root().id()]);
    while let Some(id) = queue.pop_front() {
        let record = pad.record(id);
        if record.kind() == RecordKind::Page {
            queue.extend(record.children());
            queue.extend(record.attachments());
        }
        order.push(id);
    }
    order
}
