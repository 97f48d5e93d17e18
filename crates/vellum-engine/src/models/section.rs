use serde_json::Value;

use crate::models::marker::Inline;
use crate::models::markup::{TagNameError, normalize_tag_name};

/// Tag names accepted per section variant.
pub const VALID_MARKUP_SECTION_TAG_NAMES: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pull-quote", "aside",
];
pub const VALID_LIST_SECTION_TAG_NAMES: &[&str] = &["ul", "ol"];
pub const VALID_LIST_ITEM_TAG_NAMES: &[&str] = &["li"];
pub const VALID_IMAGE_SECTION_TAG_NAMES: &[&str] = &["img"];
pub const VALID_CARD_SECTION_TAG_NAMES: &[&str] = &["div"];

pub const DEFAULT_MARKUP_SECTION_TAG_NAME: &str = "p";
pub const DEFAULT_LIST_SECTION_TAG_NAME: &str = "ul";
pub const DEFAULT_LIST_ITEM_TAG_NAME: &str = "li";
pub const DEFAULT_IMAGE_SECTION_TAG_NAME: &str = "img";
pub const DEFAULT_CARD_SECTION_TAG_NAME: &str = "div";

/// Discriminator for the closed set of section variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Markup,
    List,
    ListItem,
    Image,
    Card,
}

/// Which inline entries a marker split added and removed, by index into the
/// section's marker list. Callers use this to reconcile state derived from
/// the markers (rendered nodes, cached lengths).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitEdit {
    pub added: Vec<usize>,
    pub removed: Vec<usize>,
}

fn validate_tag_name(
    tag: &str,
    whitelist: &[&str],
    context: &'static str,
) -> Result<String, TagNameError> {
    let normalized = normalize_tag_name(tag);
    if whitelist.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(TagNameError {
            tag: normalized,
            context,
        })
    }
}

fn text_of(markers: &[Inline]) -> String {
    markers
        .iter()
        .filter_map(Inline::as_marker)
        .map(|marker| marker.value.as_str())
        .collect()
}

fn text_len_of(markers: &[Inline]) -> usize {
    markers.iter().map(Inline::len).sum()
}

fn markers_blank(markers: &[Inline]) -> bool {
    markers.iter().all(Inline::is_blank)
}

/// Split the marker containing `offset` into two markers at that character
/// offset. Offsets on a boundary (including 0 and the section tail) are a
/// no-op; an offset addressing an atom never splits it.
fn split_markers_at(markers: &mut Vec<Inline>, offset: usize) -> SplitEdit {
    let mut start = 0;
    for index in 0..markers.len() {
        let end = start + markers[index].len();
        if offset <= start {
            break;
        }
        if offset < end {
            let Inline::Marker(marker) = &markers[index] else {
                return SplitEdit::default();
            };
            let (left, right) = marker.split_at(offset - start);
            markers.splice(
                index..index + 1,
                [Inline::Marker(left), Inline::Marker(right)],
            );
            return SplitEdit {
                added: vec![index, index + 1],
                removed: vec![index],
            };
        }
        start = end;
    }
    SplitEdit::default()
}

/// A paragraph or heading holding inline content.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupSection {
    tag_name: String,
    pub markers: Vec<Inline>,
    generated: bool,
}

impl MarkupSection {
    pub(crate) fn new(
        tag_name: &str,
        markers: Vec<Inline>,
        generated: bool,
    ) -> Result<Self, TagNameError> {
        Ok(Self {
            tag_name: validate_tag_name(tag_name, VALID_MARKUP_SECTION_TAG_NAMES, "markup section")?,
            markers,
            generated,
        })
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn set_tag_name(&mut self, tag: &str) -> Result<(), TagNameError> {
        self.tag_name = validate_tag_name(tag, VALID_MARKUP_SECTION_TAG_NAMES, "markup section")?;
        Ok(())
    }

    pub fn is_valid_tag_name(tag: &str) -> bool {
        VALID_MARKUP_SECTION_TAG_NAMES.contains(&normalize_tag_name(tag).as_str())
    }

    /// Synthesized placeholder sections (for example the empty paragraph a
    /// blank document renders) are marked generated; they serialize like any
    /// other section.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn text(&self) -> String {
        text_of(&self.markers)
    }

    pub fn text_len(&self) -> usize {
        text_len_of(&self.markers)
    }

    pub fn is_blank(&self) -> bool {
        markers_blank(&self.markers)
    }
}

/// A list item: markerable, always nested under a list section.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItemSection {
    tag_name: String,
    pub markers: Vec<Inline>,
}

impl ListItemSection {
    pub(crate) fn new(markers: Vec<Inline>) -> Self {
        Self {
            tag_name: DEFAULT_LIST_ITEM_TAG_NAME.to_string(),
            markers,
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn set_tag_name(&mut self, tag: &str) -> Result<(), TagNameError> {
        self.tag_name = validate_tag_name(tag, VALID_LIST_ITEM_TAG_NAMES, "list item")?;
        Ok(())
    }

    pub fn is_valid_tag_name(tag: &str) -> bool {
        VALID_LIST_ITEM_TAG_NAMES.contains(&normalize_tag_name(tag).as_str())
    }

    pub fn text(&self) -> String {
        text_of(&self.markers)
    }

    pub fn text_len(&self) -> usize {
        text_len_of(&self.markers)
    }

    pub fn is_blank(&self) -> bool {
        markers_blank(&self.markers)
    }
}

/// An ordered or unordered list of items.
///
/// Detached list sections own their items; attaching the list to a post
/// moves the items into the post's child chain, so `items` is empty while
/// the section is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSection {
    tag_name: String,
    pub items: Vec<ListItemSection>,
}

impl ListSection {
    pub(crate) fn new(tag_name: &str, items: Vec<ListItemSection>) -> Result<Self, TagNameError> {
        Ok(Self {
            tag_name: validate_tag_name(tag_name, VALID_LIST_SECTION_TAG_NAMES, "list section")?,
            items,
        })
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn set_tag_name(&mut self, tag: &str) -> Result<(), TagNameError> {
        self.tag_name = validate_tag_name(tag, VALID_LIST_SECTION_TAG_NAMES, "list section")?;
        Ok(())
    }

    pub fn is_valid_tag_name(tag: &str) -> bool {
        VALID_LIST_SECTION_TAG_NAMES.contains(&normalize_tag_name(tag).as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.items.iter().all(ListItemSection::is_blank)
    }
}

/// A leaf section holding a single image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSection {
    pub url: Option<String>,
}

impl ImageSection {
    pub(crate) fn new(url: Option<&str>) -> Self {
        Self {
            url: url.map(str::to_string),
        }
    }

    pub fn is_valid_tag_name(tag: &str) -> bool {
        VALID_IMAGE_SECTION_TAG_NAMES.contains(&normalize_tag_name(tag).as_str())
    }
}

/// A leaf section rendered by a named host-provided card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSection {
    pub name: String,
    pub payload: Value,
}

impl CardSection {
    pub(crate) fn new(name: &str, payload: Value) -> Self {
        Self {
            name: name.to_string(),
            payload,
        }
    }

    pub fn is_valid_tag_name(tag: &str) -> bool {
        VALID_CARD_SECTION_TAG_NAMES.contains(&normalize_tag_name(tag).as_str())
    }
}

/// A block-level structural unit of a post.
///
/// The variant set is closed; every shared capability (`can_join`, `join`,
/// `is_blank`, tag validation, marker splitting) has a per-variant
/// implementation, so an unsupported combination is unrepresentable rather
/// than a runtime assertion.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Markup(MarkupSection),
    List(ListSection),
    ListItem(ListItemSection),
    Image(ImageSection),
    Card(CardSection),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Markup(_) => SectionKind::Markup,
            Section::List(_) => SectionKind::List,
            Section::ListItem(_) => SectionKind::ListItem,
            Section::Image(_) => SectionKind::Image,
            Section::Card(_) => SectionKind::Card,
        }
    }

    pub fn tag_name(&self) -> &str {
        match self {
            Section::Markup(section) => section.tag_name(),
            Section::List(section) => section.tag_name(),
            Section::ListItem(section) => section.tag_name(),
            Section::Image(_) => DEFAULT_IMAGE_SECTION_TAG_NAME,
            Section::Card(_) => DEFAULT_CARD_SECTION_TAG_NAME,
        }
    }

    pub fn set_tag_name(&mut self, tag: &str) -> Result<(), TagNameError> {
        match self {
            Section::Markup(section) => section.set_tag_name(tag),
            Section::List(section) => section.set_tag_name(tag),
            Section::ListItem(section) => section.set_tag_name(tag),
            Section::Image(_) => {
                validate_tag_name(tag, VALID_IMAGE_SECTION_TAG_NAMES, "image section")?;
                Ok(())
            }
            Section::Card(_) => {
                validate_tag_name(tag, VALID_CARD_SECTION_TAG_NAMES, "card section")?;
                Ok(())
            }
        }
    }

    pub fn is_valid_tag_name(&self, tag: &str) -> bool {
        match self {
            Section::Markup(_) => MarkupSection::is_valid_tag_name(tag),
            Section::List(_) => ListSection::is_valid_tag_name(tag),
            Section::ListItem(_) => ListItemSection::is_valid_tag_name(tag),
            Section::Image(_) => ImageSection::is_valid_tag_name(tag),
            Section::Card(_) => CardSection::is_valid_tag_name(tag),
        }
    }

    /// Markerable sections own inline content directly.
    pub fn is_markerable(&self) -> bool {
        matches!(self, Section::Markup(_) | Section::ListItem(_))
    }

    /// Nested sections live under a parent and are never top-level.
    pub fn is_nested(&self) -> bool {
        matches!(self, Section::ListItem(_))
    }

    /// Leaf sections are the unit of leaf-section-index addressing; only
    /// list sections have nested children.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Section::List(_))
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Section::Markup(section) => section.is_blank(),
            Section::List(section) => section.is_blank(),
            Section::ListItem(section) => section.is_blank(),
            Section::Image(_) | Section::Card(_) => false,
        }
    }

    /// Content length in position-offset units: character count for
    /// markerable sections, 1 for atomic leaves. `None` for list sections,
    /// whose length is not defined.
    pub fn length(&self) -> Option<usize> {
        match self {
            Section::Markup(section) => Some(section.text_len()),
            Section::ListItem(section) => Some(section.text_len()),
            Section::Image(_) | Section::Card(_) => Some(1),
            Section::List(_) => None,
        }
    }

    /// Concatenated marker text; empty for non-markerable variants.
    pub fn text(&self) -> String {
        match self {
            Section::Markup(section) => section.text(),
            Section::ListItem(section) => section.text(),
            _ => String::new(),
        }
    }

    pub fn markers(&self) -> Option<&[Inline]> {
        match self {
            Section::Markup(section) => Some(&section.markers),
            Section::ListItem(section) => Some(&section.markers),
            _ => None,
        }
    }

    pub fn markers_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            Section::Markup(section) => Some(&mut section.markers),
            Section::ListItem(section) => Some(&mut section.markers),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListSection> {
        match self {
            Section::List(section) => Some(section),
            _ => None,
        }
    }

    /// Whether `other` can be merged into this section: matching variant and
    /// matching tag. Atomic leaves (image, card) have no mergeable content.
    pub fn can_join(&self, other: &Section) -> bool {
        match (self, other) {
            (Section::Markup(a), Section::Markup(b)) => a.tag_name() == b.tag_name(),
            (Section::List(a), Section::List(b)) => a.tag_name() == b.tag_name(),
            (Section::ListItem(_), Section::ListItem(_)) => true,
            _ => false,
        }
    }

    /// Merge `other`'s content into this section. Markups stay shared, so
    /// joined content keeps interned-markup identity.
    ///
    /// # Panics
    ///
    /// Panics when [`Section::can_join`] does not hold; joining incompatible
    /// sections is a programming-contract violation, not a runtime condition.
    pub fn join(&mut self, other: &Section) {
        if !self.can_join(other) {
            panic!(
                "cannot join a {:?} section into a {:?} section",
                other.kind(),
                self.kind()
            );
        }
        match (self, other) {
            (Section::Markup(a), Section::Markup(b)) => a.markers.extend(b.markers.iter().cloned()),
            (Section::ListItem(a), Section::ListItem(b)) => {
                a.markers.extend(b.markers.iter().cloned())
            }
            (Section::List(a), Section::List(b)) => a.items.extend(b.items.iter().cloned()),
            _ => unreachable!("can_join admitted an unjoinable pair"),
        }
    }

    /// Split the marker at a character offset into two markers; non-markerable
    /// variants return the empty edit record.
    pub fn split_marker_at_offset(&mut self, offset: usize) -> SplitEdit {
        match self.markers_mut() {
            Some(markers) => split_markers_at(markers, offset),
            None => SplitEdit::default(),
        }
    }
}
