use crate::editing::EditorContext;
use crate::editing::position::{Position, Range};
use crate::models::Post;
use crate::serialization::SerializedPost;

/// A selection addressed by `(leaf section index, offset)` pairs.
///
/// Node identity does not survive a serialize/rebuild round trip; ordinal
/// position in the in-order leaf walk does. Addressing by leaf index is what
/// lets a restored document recover the selection of the document it was
/// rebuilt from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressedRange {
    pub head: (usize, usize),
    pub tail: (usize, usize),
}

/// A point-in-time capture of a document: its full serialized form plus,
/// when a live selection existed at capture time, an addressed range.
///
/// The addressed range is only meaningful against a post deserialized from
/// this snapshot's own serialized form (or a structurally identical one); it
/// is never resolved against the live, pre-edit post.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    serialized: SerializedPost,
    range: Option<AddressedRange>,
}

impl Snapshot {
    /// Capture `source`'s document and, if it has an active cursor and a
    /// non-blank range, the selection addressed against the source post.
    pub fn new(source: &impl EditorContext) -> Self {
        let mut snapshot = Self {
            serialized: source.serialize_post(),
            range: None,
        };
        snapshot.snapshot_range(source);
        snapshot
    }

    /// Re-derive the stored range from `source`'s current selection,
    /// overwriting what was captured before. A pending snapshot is refreshed
    /// this way just before commit, because the true selection endpoint is
    /// often only known then (read from a rendering surface rather than
    /// tracked incrementally).
    pub fn snapshot_range(&mut self, source: &impl EditorContext) {
        self.range = if source.has_cursor() {
            source
                .range()
                .and_then(|range| address_range(&range, source.post()))
        } else {
            None
        };
    }

    /// Resolve the stored range against `target`, a post deserialized from
    /// this snapshot's serialized form. Returns `None` when no range was
    /// captured, or when a stored leaf index is out of range in `target`
    /// (the range is dropped rather than silently mis-addressed). Offsets
    /// beyond the resolved section's length clamp to its tail.
    pub fn get_range(&self, target: &Post) -> Option<Range> {
        let addressed = self.range?;
        let head = resolve_position(addressed.head, target)?;
        let tail = resolve_position(addressed.tail, target)?;
        Some(Range::new(head, tail))
    }

    pub fn serialized(&self) -> &SerializedPost {
        &self.serialized
    }

    pub fn captured_range(&self) -> Option<AddressedRange> {
        self.range
    }
}

fn address_range(range: &Range, post: &Post) -> Option<AddressedRange> {
    if range.is_blank(post) {
        return None;
    }
    Some(AddressedRange {
        head: address_position(&range.head, post)?,
        tail: address_position(&range.tail, post)?,
    })
}

fn address_position(position: &Position, post: &Post) -> Option<(usize, usize)> {
    position
        .leaf_index(post)
        .map(|index| (index, position.offset))
}

fn resolve_position((index, offset): (usize, usize), target: &Post) -> Option<Position> {
    let section = target.find_leaf_section_at_index(index)?;
    let tail = target.tail_position(section);
    Some(Position::new(section, offset.min(tail.offset)))
}
