use std::collections::BTreeMap;

/// Tag names accepted for inline markups.
pub const VALID_MARKUP_TAG_NAMES: &[&str] = &[
    "a", "b", "code", "em", "i", "s", "strong", "sub", "sup", "u",
];

/// A tag name was rejected by the whitelist of the node it was written to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{tag}` is not a valid {context} tag name")]
pub struct TagNameError {
    pub tag: String,
    pub context: &'static str,
}

/// Normalize a tag name for validation and cache lookup.
pub(crate) fn normalize_tag_name(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

/// An inline markup: a `(tag name, attributes)` pair such as `a href=…`
/// applied to markers and atoms.
///
/// Markups are interned per [`PostBuilder`](crate::models::PostBuilder):
/// within one builder, equal normalized tag + equal attribute set always
/// yields the same shared instance, so markup-toggle logic compares with
/// [`std::rc::Rc::ptr_eq`] instead of deep equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    tag_name: String,
    attributes: BTreeMap<String, String>,
}

impl Markup {
    pub(crate) fn new(
        tag_name: &str,
        attributes: BTreeMap<String, String>,
    ) -> Result<Self, TagNameError> {
        let tag_name = normalize_tag_name(tag_name);
        if !VALID_MARKUP_TAG_NAMES.contains(&tag_name.as_str()) {
            return Err(TagNameError {
                tag: tag_name,
                context: "markup",
            });
        }
        Ok(Self {
            tag_name,
            attributes,
        })
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Cache key for the builder's markup cache. `BTreeMap` iteration is
    /// sorted by key, so the key is independent of the order attributes were
    /// supplied in.
    pub(crate) fn cache_key(tag_name: &str, attributes: &BTreeMap<String, String>) -> String {
        let mut key = normalize_tag_name(tag_name);
        for (name, value) in attributes {
            key.push('\0');
            key.push_str(name);
            key.push('\0');
            key.push_str(value);
        }
        key
    }
}
