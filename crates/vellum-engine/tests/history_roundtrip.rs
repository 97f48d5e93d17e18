//! End-to-end history flow through a host editor: edit boundaries, undo and
//! redo with selection restore, across a document using every section kind.

use vellum_engine::serialization::{deserialize, serialize};
use vellum_engine::{
    EditHistory, EditTransaction, EditorContext, Position, Post, PostBuilder, Range, SectionKind,
    SerializedPost,
};

/// Host standing in for the editor plus its transaction engine. Mutations
/// apply directly to the owned post; the selection is plain state.
struct Host {
    builder: PostBuilder,
    post: Post,
    range: Option<Range>,
    cursor: bool,
}

impl Host {
    fn new() -> Self {
        let builder = PostBuilder::new();
        let post = builder.create_post(vec![]);
        Self {
            builder,
            post,
            range: None,
            cursor: false,
        }
    }

    /// `[heading, paragraph with markup + atom, list of two, image, card]`.
    fn load_fixture(&mut self) {
        let strong = self.builder.create_markup("strong", &[]).unwrap();
        let link = self
            .builder
            .create_markup("a", &[("href", "http://example.com")])
            .unwrap();

        let sections = vec![
            self.builder
                .create_markup_section(
                    Some("h1"),
                    vec![self.builder.create_marker("Title", vec![]).into()],
                )
                .unwrap(),
            self.builder
                .create_markup_section(
                    None,
                    vec![
                        self.builder.create_marker("hello ", vec![strong]).into(),
                        self.builder
                            .create_atom("mention", "@sam", serde_json::json!({"id": 1}), vec![])
                            .into(),
                        self.builder.create_marker(" world", vec![link]).into(),
                    ],
                )
                .unwrap(),
            self.builder
                .create_list_section(
                    None,
                    vec![
                        self.builder.create_list_item(vec![
                            self.builder.create_marker("one", vec![]).into(),
                        ]),
                        self.builder.create_list_item(vec![
                            self.builder.create_marker("two", vec![]).into(),
                        ]),
                    ],
                )
                .unwrap(),
            self.builder.create_image_section(Some("http://x/a.png")),
            self.builder
                .create_card_section("embed", serde_json::json!({"url": "http://y"})),
        ];
        for section in sections {
            self.post.append_section(section);
        }
    }

    fn append_paragraph(&mut self, value: &str) {
        let marker = self.builder.create_marker(value, vec![]).into();
        let section = self
            .builder
            .create_markup_section(None, vec![marker])
            .unwrap();
        self.post.append_section(section);
    }

    fn place_cursor(&mut self, leaf_index: usize, offset: usize) {
        let section = self.post.find_leaf_section_at_index(leaf_index).unwrap();
        self.range = Some(Range::collapsed(Position::new(section, offset)));
        self.cursor = true;
    }

    fn leaf_texts(&self) -> Vec<String> {
        self.post
            .leaf_sections()
            .into_iter()
            .map(|id| self.post.section(id).text())
            .collect()
    }
}

impl EditorContext for Host {
    fn serialize_post(&self) -> SerializedPost {
        serialize(&self.post)
    }

    fn deserialize_post(&mut self, form: &SerializedPost) -> Post {
        deserialize(&self.builder, form).expect("serialized form round-trips")
    }

    fn post(&self) -> &Post {
        &self.post
    }

    fn range(&self) -> Option<Range> {
        self.range
    }

    fn has_cursor(&self) -> bool {
        self.cursor
    }
}

impl EditTransaction for Host {
    fn remove_all_sections(&mut self) {
        self.post.take_sections();
    }

    fn migrate_sections_from_post(&mut self, mut post: Post) {
        for section in post.take_sections() {
            self.post.append_section(section);
        }
    }

    fn set_range(&mut self, range: Range) {
        self.range = Some(range);
        self.cursor = true;
    }

    fn cancel_snapshot(&mut self) {}
}

#[test]
fn full_document_round_trips_through_the_wire_form() {
    let mut host = Host::new();
    host.load_fixture();

    let rebuilt = deserialize(&host.builder, &serialize(&host.post)).unwrap();

    let kinds = |post: &Post| -> Vec<SectionKind> {
        post.leaf_sections()
            .into_iter()
            .map(|id| post.section(id).kind())
            .collect()
    };
    assert_eq!(kinds(&rebuilt), kinds(&host.post));
    assert_eq!(
        rebuilt
            .leaf_sections()
            .into_iter()
            .map(|id| rebuilt.section(id).text())
            .collect::<Vec<_>>(),
        host.leaf_texts()
    );
}

#[test]
fn undo_and_redo_walk_committed_boundaries() {
    let mut host = Host::new();
    host.load_fixture();
    let mut history = EditHistory::with_default_depth();
    history.store_snapshot(&host);

    let original = serialize(&host.post);
    host.append_paragraph("appended");
    history.store_snapshot(&host);
    let appended = serialize(&host.post);

    history.step_backward(&mut host);
    assert_eq!(serialize(&host.post), original);

    history.step_forward(&mut host);
    assert_eq!(serialize(&host.post), appended);
}

#[test]
fn undo_restores_the_selection_captured_at_the_boundary() {
    let mut host = Host::new();
    host.load_fixture();
    // Cursor at offset 3 of the second leaf (the marked-up paragraph).
    host.place_cursor(1, 3);

    let mut history = EditHistory::with_default_depth();
    history.store_snapshot(&host);

    host.append_paragraph("noise");
    host.place_cursor(6, 0);
    history.store_snapshot(&host);

    history.step_backward(&mut host);

    let range = host.range.expect("undo restores a selection");
    let expected_leaf = host.post.find_leaf_section_at_index(1).unwrap();
    assert_eq!(range.head, Position::new(expected_leaf, 3));
    assert!(range.is_collapsed());
    // The restored section is a rebuilt node, addressed purely by ordinal.
    // Atom display text is not marker text, so only the markers appear here.
    assert_eq!(host.post.section(expected_leaf).text(), "hello  world");
}

#[test]
fn a_new_boundary_after_undo_invalidates_redo() {
    let mut host = Host::new();
    host.load_fixture();
    let mut history = EditHistory::with_default_depth();
    history.store_snapshot(&host);

    host.append_paragraph("first");
    history.store_snapshot(&host);

    history.step_backward(&mut host);
    assert!(history.can_redo());

    host.append_paragraph("diverged");
    history.store_snapshot(&host);
    assert!(!history.can_redo());

    let frozen = serialize(&host.post);
    history.step_forward(&mut host);
    assert_eq!(serialize(&host.post), frozen);
}

#[test]
fn history_depth_bounds_the_number_of_undo_steps() {
    let depth = 2;
    let mut host = Host::new();
    let mut history = EditHistory::new(depth);
    history.store_snapshot(&host);

    for index in 0..4 {
        host.append_paragraph(&format!("edit {index}"));
        history.store_snapshot(&host);
    }

    let mut undone = 0;
    while history.can_undo() {
        history.step_backward(&mut host);
        undone += 1;
    }
    assert_eq!(undone, depth);
    // The earliest reachable state still contains the evicted edits.
    assert_eq!(host.leaf_texts(), vec!["edit 0", "edit 1"]);
}

#[test]
fn leaf_index_addressing_survives_rebuild_of_nested_lists() {
    let mut host = Host::new();
    host.load_fixture();
    // Leaf 3 is the second list item ("two"); select its tail.
    host.place_cursor(3, 3);

    let mut history = EditHistory::with_default_depth();
    history.store_snapshot(&host);

    host.append_paragraph("noise");
    history.store_snapshot(&host);
    history.step_backward(&mut host);

    let range = host.range.expect("selection restored");
    let leaf = host.post.find_leaf_section_at_index(3).unwrap();
    assert_eq!(range.head, Position::new(leaf, 3));
    assert_eq!(host.post.section(leaf).text(), "two");
    assert!(
        host.post.section(leaf).is_nested(),
        "the addressed leaf is a rebuilt list item"
    );
}
