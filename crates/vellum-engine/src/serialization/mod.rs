//! The serialized document form and its codec.
//!
//! A [`SerializedPost`] is the format-stable capture the edit history stores:
//! deserializing one through the live document's builder must reproduce a
//! post with the same in-order leaf-section structure and content as the
//! post it was serialized from. That round trip is the load-bearing
//! invariant behind leaf-section-index addressing; everything else about the
//! format is an implementation detail.

use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    Inline, Markup, MarkupSection, Post, PostBuilder, Section, SectionId, TagNameError,
};

/// Version tag written into every serialized post.
pub const SERIALIZATION_VERSION: &str = "vellum.1";

/// A serialized markup: one entry of the post's markup pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedMarkup {
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// Inline content; markups are indices into the pool, which preserves the
/// sharing that interning establishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SerializedInline {
    Marker {
        markups: Vec<usize>,
        value: String,
    },
    Atom {
        markups: Vec<usize>,
        name: String,
        text: String,
        payload: Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SerializedSection {
    Markup {
        tag_name: String,
        generated: bool,
        markers: Vec<SerializedInline>,
    },
    List {
        tag_name: String,
        items: Vec<Vec<SerializedInline>>,
    },
    Image {
        url: Option<String>,
    },
    Card {
        name: String,
        payload: Value,
    },
}

/// The full serialized form of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedPost {
    pub version: String,
    pub markups: Vec<SerializedMarkup>,
    pub sections: Vec<SerializedSection>,
}

/// A serialized post that cannot be rebuilt into a document.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("unsupported serialization version `{0}`")]
    UnsupportedVersion(String),
    #[error("markup index {index} out of range ({len} markups in pool)")]
    MarkupIndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    TagName(#[from] TagNameError),
}

/// Markup pool keyed by instance, so shared markups serialize to one entry.
#[derive(Default)]
struct MarkupPool {
    markups: Vec<Rc<Markup>>,
}

impl MarkupPool {
    fn index_of(&mut self, markup: &Rc<Markup>) -> usize {
        if let Some(index) = self
            .markups
            .iter()
            .position(|existing| Rc::ptr_eq(existing, markup))
        {
            return index;
        }
        self.markups.push(Rc::clone(markup));
        self.markups.len() - 1
    }
}

/// Serialize a post into its format-stable wire form.
pub fn serialize(post: &Post) -> SerializedPost {
    let mut pool = MarkupPool::default();
    let sections = post
        .sections()
        .map(|id| serialize_section(post, id, &mut pool))
        .collect();
    SerializedPost {
        version: SERIALIZATION_VERSION.to_string(),
        markups: pool
            .markups
            .iter()
            .map(|markup| SerializedMarkup {
                tag_name: markup.tag_name().to_string(),
                attributes: markup.attributes().clone(),
            })
            .collect(),
        sections,
    }
}

fn serialize_section(post: &Post, id: SectionId, pool: &mut MarkupPool) -> SerializedSection {
    match post.section(id) {
        Section::Markup(section) => SerializedSection::Markup {
            tag_name: section.tag_name().to_string(),
            generated: section.is_generated(),
            markers: serialize_inlines(&section.markers, pool),
        },
        Section::List(section) => SerializedSection::List {
            tag_name: section.tag_name().to_string(),
            items: post
                .items(id)
                .filter_map(|item| post.section(item).markers())
                .map(|markers| serialize_inlines(markers, pool))
                .collect(),
        },
        Section::Image(section) => SerializedSection::Image {
            url: section.url.clone(),
        },
        Section::Card(section) => SerializedSection::Card {
            name: section.name.clone(),
            payload: section.payload.clone(),
        },
        Section::ListItem(_) => unreachable!("list items are serialized through their list"),
    }
}

fn serialize_inlines(markers: &[Inline], pool: &mut MarkupPool) -> Vec<SerializedInline> {
    markers
        .iter()
        .map(|inline| {
            let markups = inline
                .markups()
                .iter()
                .map(|markup| pool.index_of(markup))
                .collect();
            match inline {
                Inline::Marker(marker) => SerializedInline::Marker {
                    markups,
                    value: marker.value.clone(),
                },
                Inline::Atom(atom) => SerializedInline::Atom {
                    markups,
                    name: atom.name.clone(),
                    text: atom.text.clone(),
                    payload: atom.payload.clone(),
                },
            }
        })
        .collect()
}

/// Rebuild a post from its serialized form through `builder`.
///
/// Markups are re-interned through the builder, so identity sharing holds in
/// the rebuilt post exactly as it did in the source, and a builder shared
/// with a live document keeps one markup cache across the rebuild.
pub fn deserialize(
    builder: &PostBuilder,
    form: &SerializedPost,
) -> Result<Post, DeserializeError> {
    if form.version != SERIALIZATION_VERSION {
        return Err(DeserializeError::UnsupportedVersion(form.version.clone()));
    }
    let pool: Vec<Rc<Markup>> = form
        .markups
        .iter()
        .map(|markup| {
            let attributes: Vec<(&str, &str)> = markup
                .attributes
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect();
            builder.create_markup(&markup.tag_name, &attributes)
        })
        .collect::<Result<_, _>>()?;

    let mut sections = Vec::with_capacity(form.sections.len());
    for section in &form.sections {
        sections.push(deserialize_section(builder, section, &pool)?);
    }
    Ok(builder.create_post(sections))
}

fn deserialize_section(
    builder: &PostBuilder,
    section: &SerializedSection,
    pool: &[Rc<Markup>],
) -> Result<Section, DeserializeError> {
    match section {
        SerializedSection::Markup {
            tag_name,
            generated,
            markers,
        } => {
            let markers = deserialize_inlines(builder, markers, pool)?;
            Ok(Section::Markup(MarkupSection::new(
                tag_name, markers, *generated,
            )?))
        }
        SerializedSection::List { tag_name, items } => {
            let items = items
                .iter()
                .map(|markers| {
                    deserialize_inlines(builder, markers, pool)
                        .map(|markers| builder.create_list_item(markers))
                })
                .collect::<Result<_, _>>()?;
            Ok(builder.create_list_section(Some(tag_name), items)?)
        }
        SerializedSection::Image { url } => Ok(builder.create_image_section(url.as_deref())),
        SerializedSection::Card { name, payload } => {
            Ok(builder.create_card_section(name, payload.clone()))
        }
    }
}

fn deserialize_inlines(
    builder: &PostBuilder,
    markers: &[SerializedInline],
    pool: &[Rc<Markup>],
) -> Result<Vec<Inline>, DeserializeError> {
    markers
        .iter()
        .map(|inline| {
            let indices = match inline {
                SerializedInline::Marker { markups, .. }
                | SerializedInline::Atom { markups, .. } => markups,
            };
            let markups = indices
                .iter()
                .map(|&index| {
                    pool.get(index)
                        .cloned()
                        .ok_or(DeserializeError::MarkupIndexOutOfRange {
                            index,
                            len: pool.len(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(match inline {
                SerializedInline::Marker { value, .. } => {
                    builder.create_marker(value, markups).into()
                }
                SerializedInline::Atom {
                    name,
                    text,
                    payload,
                    ..
                } => builder
                    .create_atom(name, text, payload.clone(), markups)
                    .into(),
            })
        })
        .collect()
}

/// JSON encoding of the wire form, for hosts that persist or transport it.
pub fn post_to_json(post: &Post) -> anyhow::Result<String> {
    serde_json::to_string(&serialize(post)).context("failed to encode serialized post as JSON")
}

/// Decode JSON produced by [`post_to_json`] and rebuild the post.
pub fn post_from_json(builder: &PostBuilder, json: &str) -> anyhow::Result<Post> {
    let form: SerializedPost =
        serde_json::from_str(json).context("failed to decode serialized post JSON")?;
    deserialize(builder, &form).context("failed to rebuild post from serialized form")
}
