use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde_json::Value;

use crate::models::marker::{Atom, Inline, Marker};
use crate::models::markup::{Markup, TagNameError};
use crate::models::post::Post;
use crate::models::section::{
    CardSection, DEFAULT_LIST_SECTION_TAG_NAME, DEFAULT_MARKUP_SECTION_TAG_NAME, ImageSection,
    ListItemSection, ListSection, MarkupSection, Section, SectionKind,
};

/// Construction failures surfaced by [`PostBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    /// `create_markerable_section` was asked for a kind that carries no
    /// markers.
    #[error("unsupported section type: {0:?}")]
    UnsupportedSectionType(SectionKind),
    #[error(transparent)]
    TagName(#[from] TagNameError),
}

/// Factory for every node kind of one document.
///
/// One builder lives per post. It owns the markup cache, so within a single
/// document lifetime an equal `(tag, attributes)` request always returns the
/// same shared [`Markup`] instance and toggle logic can compare by identity.
/// The cache is deliberately instance-scoped, never process-wide.
#[derive(Debug, Default)]
pub struct PostBuilder {
    markup_cache: RefCell<HashMap<String, Rc<Markup>>>,
}

impl PostBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new post with `sections` appended in order.
    pub fn create_post(&self, sections: Vec<Section>) -> Post {
        let mut post = Post::new();
        for section in sections {
            post.append_section(section);
        }
        post
    }

    /// A paragraph or heading; `None` tag defaults to `p`.
    pub fn create_markup_section(
        &self,
        tag_name: Option<&str>,
        markers: Vec<Inline>,
    ) -> Result<Section, TagNameError> {
        let tag = tag_name.unwrap_or(DEFAULT_MARKUP_SECTION_TAG_NAME);
        Ok(Section::Markup(MarkupSection::new(tag, markers, false)?))
    }

    /// An empty placeholder section synthesized by the host rather than
    /// typed by a user.
    pub fn create_generated_markup_section(
        &self,
        tag_name: Option<&str>,
    ) -> Result<Section, TagNameError> {
        let tag = tag_name.unwrap_or(DEFAULT_MARKUP_SECTION_TAG_NAME);
        Ok(Section::Markup(MarkupSection::new(tag, Vec::new(), true)?))
    }

    /// A list section; `None` tag defaults to `ul`.
    pub fn create_list_section(
        &self,
        tag_name: Option<&str>,
        items: Vec<ListItemSection>,
    ) -> Result<Section, TagNameError> {
        let tag = tag_name.unwrap_or(DEFAULT_LIST_SECTION_TAG_NAME);
        Ok(Section::List(ListSection::new(tag, items)?))
    }

    pub fn create_list_item(&self, markers: Vec<Inline>) -> ListItemSection {
        ListItemSection::new(markers)
    }

    pub fn create_image_section(&self, url: Option<&str>) -> Section {
        Section::Image(ImageSection::new(url))
    }

    pub fn create_card_section(&self, name: &str, payload: Value) -> Section {
        Section::Card(CardSection::new(name, payload))
    }

    pub fn create_marker(&self, value: &str, markups: Vec<Rc<Markup>>) -> Marker {
        Marker::new(value, markups)
    }

    pub fn create_atom(
        &self,
        name: &str,
        text: &str,
        payload: Value,
        markups: Vec<Rc<Markup>>,
    ) -> Atom {
        Atom::new(name, text, payload, markups)
    }

    /// The interned markup for `(tag_name, attributes)`: a cached instance
    /// when one exists, otherwise a freshly constructed and cached one.
    /// Attribute order and tag-name case never affect which instance is
    /// returned.
    pub fn create_markup(
        &self,
        tag_name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<Rc<Markup>, TagNameError> {
        let attributes: BTreeMap<String, String> = attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let key = Markup::cache_key(tag_name, &attributes);
        if let Some(existing) = self.markup_cache.borrow().get(&key) {
            return Ok(Rc::clone(existing));
        }
        let markup = Rc::new(Markup::new(tag_name, attributes)?);
        self.markup_cache
            .borrow_mut()
            .insert(key, Rc::clone(&markup));
        Ok(markup)
    }

    /// Dispatch on kind for the markerable section variants; any other kind
    /// is an [`BuilderError::UnsupportedSectionType`] error.
    pub fn create_markerable_section(
        &self,
        kind: SectionKind,
        tag_name: Option<&str>,
        markers: Vec<Inline>,
    ) -> Result<Section, BuilderError> {
        match kind {
            SectionKind::Markup => Ok(self.create_markup_section(tag_name, markers)?),
            SectionKind::ListItem => Ok(Section::ListItem(self.create_list_item(markers))),
            other => Err(BuilderError::UnsupportedSectionType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_create_post_appends_sections_in_order() {
        let builder = PostBuilder::new();
        let post = builder.create_post(vec![
            builder.create_markup_section(Some("h1"), vec![]).unwrap(),
            builder.create_markup_section(None, vec![]).unwrap(),
        ]);
        let tags: Vec<&str> = post
            .sections()
            .map(|id| post.section(id).tag_name())
            .collect();
        assert_eq!(tags, vec!["h1", "p"]);
    }

    #[test]
    fn test_default_tag_names() {
        let builder = PostBuilder::new();
        let paragraph = builder.create_markup_section(None, vec![]).unwrap();
        assert_eq!(paragraph.tag_name(), "p");

        let list = builder.create_list_section(None, vec![]).unwrap();
        assert_eq!(list.tag_name(), "ul");

        let item = builder.create_list_item(vec![]);
        assert_eq!(item.tag_name(), "li");
    }

    #[test]
    fn test_generated_sections_are_flagged() {
        let builder = PostBuilder::new();
        let section = builder.create_generated_markup_section(None).unwrap();
        let Section::Markup(section) = section else {
            panic!("expected a markup section");
        };
        assert!(section.is_generated());
        assert!(section.is_blank());
    }

    #[test]
    fn test_markup_interning_returns_identical_instances() {
        let builder = PostBuilder::new();
        let first = builder
            .create_markup("a", &[("href", "http://x")])
            .unwrap();
        let second = builder
            .create_markup("a", &[("href", "http://x")])
            .unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        let different = builder
            .create_markup("a", &[("href", "http://y")])
            .unwrap();
        assert!(!Rc::ptr_eq(&first, &different));
    }

    #[rstest]
    #[case(&[("href", "http://x"), ("rel", "nofollow")], &[("rel", "nofollow"), ("href", "http://x")])]
    #[case(&[("a", "1"), ("b", "2"), ("c", "3")], &[("c", "3"), ("a", "1"), ("b", "2")])]
    fn test_markup_interning_ignores_attribute_order(
        #[case] forward: &[(&str, &str)],
        #[case] shuffled: &[(&str, &str)],
    ) {
        let builder = PostBuilder::new();
        let first = builder.create_markup("a", forward).unwrap();
        let second = builder.create_markup("a", shuffled).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_markup_interning_normalizes_tag_case() {
        let builder = PostBuilder::new();
        let lower = builder.create_markup("strong", &[]).unwrap();
        let upper = builder.create_markup("STRONG", &[]).unwrap();
        assert!(Rc::ptr_eq(&lower, &upper));
    }

    #[test]
    fn test_separate_builders_do_not_share_markups() {
        let one = PostBuilder::new();
        let two = PostBuilder::new();
        let a = one.create_markup("em", &[]).unwrap();
        let b = two.create_markup("em", &[]).unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(a, b, "equal content, distinct identity");
    }

    #[test]
    fn test_create_markerable_section_dispatches_by_kind() {
        let builder = PostBuilder::new();
        let markup = builder
            .create_markerable_section(SectionKind::Markup, Some("h3"), vec![])
            .unwrap();
        assert_eq!(markup.kind(), SectionKind::Markup);
        assert_eq!(markup.tag_name(), "h3");

        let item = builder
            .create_markerable_section(SectionKind::ListItem, None, vec![])
            .unwrap();
        assert_eq!(item.kind(), SectionKind::ListItem);
    }

    #[rstest]
    #[case(SectionKind::List)]
    #[case(SectionKind::Image)]
    #[case(SectionKind::Card)]
    fn test_create_markerable_section_rejects_non_markerable_kinds(#[case] kind: SectionKind) {
        let builder = PostBuilder::new();
        let err = builder
            .create_markerable_section(kind, None, vec![])
            .unwrap_err();
        assert_eq!(err, BuilderError::UnsupportedSectionType(kind));
    }

    #[test]
    fn test_invalid_tag_is_rejected_at_construction() {
        let builder = PostBuilder::new();
        assert!(builder.create_markup_section(Some("ul"), vec![]).is_err());
        assert!(builder.create_list_section(Some("p"), vec![]).is_err());
        assert!(builder.create_markup("p", &[]).is_err());
    }
}
