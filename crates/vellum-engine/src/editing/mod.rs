//! Addressing and history: DOM-independent coordinates for cursor positions
//! and selections, point-in-time snapshots addressed by leaf-section index,
//! and the bounded undo/redo history that restores documents by destructive
//! rebuild.
//!
//! The rendering surface, input translation, and the mutation-transaction
//! engine live outside this crate. History consumes them through two narrow
//! contracts: [`EditorContext`] for reading the live document and
//! [`EditTransaction`] for mutating it. Everything here is synchronous and
//! single-writer; an operation runs to completion before the caller regains
//! control.

pub mod history;
pub mod position;
pub mod snapshot;

pub use history::{DEFAULT_QUEUE_DEPTH, EditHistory, SnapshotQueue};
pub use position::{Direction, Position, Range};
pub use snapshot::{AddressedRange, Snapshot};

use crate::models::Post;
use crate::serialization::SerializedPost;

/// Read access to the live editor state the history snapshots.
pub trait EditorContext {
    /// Serialize the live post. The format must be stable across versions of
    /// the same document: `deserialize_post(serialize_post())` has to yield
    /// an identical leaf-section structure.
    fn serialize_post(&self) -> SerializedPost;

    /// Rebuild a post from a serialized form using the live document's own
    /// builder, keeping markup identity within one builder lifetime.
    fn deserialize_post(&mut self, form: &SerializedPost) -> Post;

    fn post(&self) -> &Post;

    /// The active selection, if any.
    fn range(&self) -> Option<Range>;

    /// Whether an active cursor exists. Distinct from [`EditorContext::range`]:
    /// a host may report a cursor before it can produce a range, or a stale
    /// range after the cursor left the document.
    fn has_cursor(&self) -> bool;
}

/// Mutation interface of the editor's transaction engine.
///
/// All operations are synchronous and safe to call when there is nothing to
/// remove, migrate, or cancel.
pub trait EditTransaction {
    /// Remove every top-level section from the live post.
    fn remove_all_sections(&mut self);

    /// Move `post`'s sections into the live post, in order.
    fn migrate_sections_from_post(&mut self, post: Post);

    /// Make `range` the active selection.
    fn set_range(&mut self, range: Range);

    /// Discard any in-flight, not-yet-committed snapshot bookkeeping the
    /// transaction has accumulated.
    fn cancel_snapshot(&mut self);
}
