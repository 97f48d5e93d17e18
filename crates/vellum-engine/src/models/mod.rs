//! The document model: posts, sections, inline content, interned markups,
//! and the builder that constructs all of them.

pub mod builder;
pub mod marker;
pub mod markup;
pub mod post;
pub mod section;

pub use builder::{BuilderError, PostBuilder};
pub use marker::{ATOM_LENGTH, Atom, Inline, Marker};
pub use markup::{Markup, TagNameError, VALID_MARKUP_TAG_NAMES};
pub use post::{Post, SectionId, SiblingIter};
pub use section::{
    CardSection, ImageSection, ListItemSection, ListSection, MarkupSection, Section, SectionKind,
    SplitEdit,
};
