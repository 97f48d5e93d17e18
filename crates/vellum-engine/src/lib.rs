//! Core document engine for vellum: an in-memory model for formatted text
//! (posts, sections, markers, atoms, cards, interned markups), a
//! rendering-independent coordinate system for cursor positions and
//! selections, and a bounded undo/redo history that captures and restores
//! whole-document snapshots.
//!
//! The three pieces are deliberately coupled. History correctness depends on
//! addressing surviving a full serialize → rebuild round trip, and
//! addressing depends on the tree's leaf-section traversal order, so they
//! live together behind one crate boundary. Rendering, input translation,
//! and the mutation-transaction engine stay outside, consumed through the
//! [`editing::EditorContext`] and [`editing::EditTransaction`] traits.
//!
//! ```
//! use vellum_engine::{PostBuilder, serialization};
//!
//! let builder = PostBuilder::new();
//! let strong = builder.create_markup("strong", &[]).unwrap();
//! let section = builder
//!     .create_markup_section(
//!         None,
//!         vec![builder.create_marker("hello", vec![strong]).into()],
//!     )
//!     .unwrap();
//! let post = builder.create_post(vec![section]);
//!
//! // The wire form rebuilds into a structurally identical post, which is
//! // what lets snapshots address selections by leaf-section index.
//! let form = serialization::serialize(&post);
//! let rebuilt = serialization::deserialize(&builder, &form).unwrap();
//! assert_eq!(rebuilt.leaf_sections().len(), post.leaf_sections().len());
//! assert_eq!(
//!     rebuilt.section(rebuilt.leaf_sections()[0]).text(),
//!     "hello",
//! );
//! ```

pub mod editing;
pub mod models;
pub mod serialization;

// Re-export key types for easier usage
pub use editing::{
    AddressedRange, DEFAULT_QUEUE_DEPTH, Direction, EditHistory, EditTransaction, EditorContext,
    Position, Range, Snapshot, SnapshotQueue,
};
pub use models::{
    Atom, BuilderError, Inline, Marker, Markup, Post, PostBuilder, Section, SectionId, SectionKind,
    SplitEdit, TagNameError,
};
pub use serialization::{DeserializeError, SerializedPost};
