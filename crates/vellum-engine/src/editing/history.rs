use std::collections::VecDeque;

use crate::editing::snapshot::Snapshot;
use crate::editing::{EditTransaction, EditorContext};

/// Default bound for the undo and redo queues.
pub const DEFAULT_QUEUE_DEPTH: usize = 5;

/// A bounded stack: pushes past capacity evict the oldest entry, pops return
/// the newest. Depth 0 disables the queue entirely.
#[derive(Debug)]
pub struct SnapshotQueue {
    depth: usize,
    items: VecDeque<Snapshot>,
}

impl SnapshotQueue {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            items: VecDeque::with_capacity(depth),
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.depth == 0 {
            return;
        }
        if self.items.len() == self.depth {
            self.items.pop_front();
        }
        self.items.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.items.pop_back()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Bounded undo/redo history over whole-document snapshots.
///
/// The history never diffs. Each undo step restores a full snapshot by
/// rebuilding a fresh tree from its serialized form and asking the
/// transaction engine to swap it into the live post; document sizes are
/// editor-buffer scale, so a structural replace stays cheap and simple.
///
/// Edits coalesce through the single pending snapshot: it captures the state
/// as of the last committed boundary, and [`EditHistory::store_snapshot`]
/// commits it while opening the next boundary. The host decides where
/// boundaries fall (one per logically atomic edit batch, not one per
/// keystroke sub-step).
#[derive(Debug)]
pub struct EditHistory {
    undo_stack: SnapshotQueue,
    redo_stack: SnapshotQueue,
    pending: Option<Snapshot>,
}

impl EditHistory {
    pub fn new(depth: usize) -> Self {
        Self {
            undo_stack: SnapshotQueue::new(depth),
            redo_stack: SnapshotQueue::new(depth),
            pending: None,
        }
    }

    pub fn with_default_depth() -> Self {
        Self::new(DEFAULT_QUEUE_DEPTH)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn has_pending_snapshot(&self) -> bool {
        self.pending.is_some()
    }

    /// Refresh the pending snapshot's selection from the live document, so
    /// cursor movement since the boundary opened is not lost when the
    /// snapshot commits. No-op without a pending snapshot.
    pub fn snapshot(&mut self, editor: &impl EditorContext) {
        if let Some(pending) = &mut self.pending {
            pending.snapshot_range(editor);
        }
    }

    /// Commit the pending snapshot onto the undo stack (evicting the oldest
    /// entry at capacity) and invalidate all redo history, then open a new
    /// boundary by taking a fresh pending snapshot of the live document.
    ///
    /// This is the only operation that clears the redo stack, and it does so
    /// on every call: a boundary committed right after an undo diverges
    /// forward even though the undo discarded the pending snapshot, so the
    /// clear cannot be conditional on one existing.
    pub fn store_snapshot(&mut self, editor: &impl EditorContext) {
        if let Some(pending) = self.pending.take() {
            self.undo_stack.push(pending);
        }
        self.redo_stack.clear();
        self.pending = Some(Snapshot::new(editor));
    }

    /// Undo one committed boundary. Pending, uncommitted edits are abandoned,
    /// not pushed anywhere. The current state is pushed onto the redo stack
    /// first so a redo can return to it. No-op when the undo stack is empty.
    pub fn step_backward<H>(&mut self, host: &mut H)
    where
        H: EditorContext + EditTransaction,
    {
        self.pending = None;
        if let Some(snapshot) = self.undo_stack.pop() {
            self.redo_stack.push(Snapshot::new(host));
            self.restore_from_snapshot(&snapshot, host);
        }
    }

    /// Redo one undone boundary, pushing the current state onto the undo
    /// stack first. Whether or not a redo entry existed, the transaction is
    /// told to cancel any in-flight snapshot it was accumulating, so
    /// pending-edit bookkeeping cannot leak forward-history state into the
    /// restored document.
    pub fn step_forward<H>(&mut self, host: &mut H)
    where
        H: EditorContext + EditTransaction,
    {
        if let Some(snapshot) = self.redo_stack.pop() {
            self.undo_stack.push(Snapshot::new(host));
            self.restore_from_snapshot(&snapshot, host);
        }
        host.cancel_snapshot();
    }

    /// Rebuild the snapshot's document through the host's own builder and
    /// replace the live post's content with it, then restore the addressed
    /// selection resolved against the freshly migrated post.
    fn restore_from_snapshot<H>(&self, snapshot: &Snapshot, host: &mut H)
    where
        H: EditorContext + EditTransaction,
    {
        let rebuilt = host.deserialize_post(snapshot.serialized());
        host.remove_all_sections();
        host.migrate_sections_from_post(rebuilt);
        if let Some(range) = snapshot.get_range(host.post()) {
            host.set_range(range);
        }
    }
}
