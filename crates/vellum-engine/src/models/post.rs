use crate::models::section::{ListItemSection, Section, SectionKind};

/// Stable handle to a section attached to one [`Post`].
///
/// Ids are arena indices: they are only meaningful against the post that
/// issued them and are never reused within that post's lifetime (removed
/// slots are retired, not recycled). A position holding the id of a removed
/// section simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(u32);

#[derive(Debug, Clone)]
struct SectionNode {
    section: Section,
    prev: Option<SectionId>,
    next: Option<SectionId>,
    parent: Option<SectionId>,
    first_child: Option<SectionId>,
    last_child: Option<SectionId>,
}

/// Root of a document: an ordered sequence of sections.
///
/// Top-level sections form a doubly-linked sibling chain; list items hang off
/// their list through a child chain of the same shape, with a non-owning
/// parent handle for upward traversal. All nodes live in an arena owned by
/// the post, so the structure carries no owning cycles.
#[derive(Debug, Clone)]
pub struct Post {
    slots: Vec<Option<SectionNode>>,
    head: Option<SectionId>,
    tail: Option<SectionId>,
}

impl Post {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            tail: None,
        }
    }

    fn alloc(&mut self, section: Section) -> SectionId {
        let id = SectionId(self.slots.len() as u32);
        self.slots.push(Some(SectionNode {
            section,
            prev: None,
            next: None,
            parent: None,
            first_child: None,
            last_child: None,
        }));
        id
    }

    fn node(&self, id: SectionId) -> &SectionNode {
        self.slots
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .unwrap_or_else(|| panic!("section {id:?} is not attached to this post"))
    }

    fn node_mut(&mut self, id: SectionId) -> &mut SectionNode {
        self.slots
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("section {id:?} is not attached to this post"))
    }

    /// Whether `id` names a section currently attached to this post.
    pub fn contains(&self, id: SectionId) -> bool {
        matches!(self.slots.get(id.0 as usize), Some(Some(_)))
    }

    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.slots
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .map(|node| &node.section)
    }

    /// # Panics
    ///
    /// Panics when `id` is detached or belongs to another post.
    pub fn section(&self, id: SectionId) -> &Section {
        &self.node(id).section
    }

    pub fn section_mut(&mut self, id: SectionId) -> &mut Section {
        &mut self.node_mut(id).section
    }

    pub fn head(&self) -> Option<SectionId> {
        self.head
    }

    pub fn tail(&self) -> Option<SectionId> {
        self.tail
    }

    pub fn next_sibling(&self, id: SectionId) -> Option<SectionId> {
        self.node(id).next
    }

    pub fn prev_sibling(&self, id: SectionId) -> Option<SectionId> {
        self.node(id).prev
    }

    /// The owning list of a nested section; `None` for top-level sections.
    pub fn parent(&self, id: SectionId) -> Option<SectionId> {
        self.node(id).parent
    }

    /// Top-level sections in order.
    pub fn sections(&self) -> SiblingIter<'_> {
        SiblingIter {
            post: self,
            next: self.head,
        }
    }

    /// Items of a list section in order.
    pub fn items(&self, list: SectionId) -> SiblingIter<'_> {
        SiblingIter {
            post: self,
            next: self.node(list).first_child,
        }
    }

    pub fn section_count(&self) -> usize {
        self.sections().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Blank when the post has no sections or every section is blank.
    pub fn is_blank(&self) -> bool {
        self.sections().all(|id| self.section(id).is_blank())
    }

    /// Append a detached section at the end of the post.
    pub fn append_section(&mut self, section: Section) -> SectionId {
        self.insert_section(section, None)
    }

    /// Insert a detached section before an attached top-level section.
    pub fn insert_section_before(&mut self, section: Section, before: SectionId) -> SectionId {
        assert!(
            self.node(before).parent.is_none(),
            "insertion reference must be a top-level section"
        );
        self.insert_section(section, Some(before))
    }

    fn insert_section(&mut self, section: Section, before: Option<SectionId>) -> SectionId {
        assert!(
            !section.is_nested(),
            "nested sections are attached through their list section"
        );
        match section {
            Section::List(mut list) => {
                let items = std::mem::take(&mut list.items);
                let id = self.link_top_level(Section::List(list), before);
                for item in items {
                    self.append_item(id, item);
                }
                id
            }
            other => self.link_top_level(other, before),
        }
    }

    fn link_top_level(&mut self, section: Section, before: Option<SectionId>) -> SectionId {
        let id = self.alloc(section);
        match before {
            None => {
                let prev = self.tail;
                self.node_mut(id).prev = prev;
                if let Some(prev) = prev {
                    self.node_mut(prev).next = Some(id);
                } else {
                    self.head = Some(id);
                }
                self.tail = Some(id);
            }
            Some(before) => {
                let prev = self.node(before).prev;
                self.node_mut(id).prev = prev;
                self.node_mut(id).next = Some(before);
                self.node_mut(before).prev = Some(id);
                match prev {
                    Some(prev) => self.node_mut(prev).next = Some(id),
                    None => self.head = Some(id),
                }
            }
        }
        id
    }

    /// Append a detached list item under an attached list section.
    pub fn append_item(&mut self, list: SectionId, item: ListItemSection) -> SectionId {
        assert_eq!(
            self.section(list).kind(),
            SectionKind::List,
            "items can only be appended to a list section"
        );
        let id = self.alloc(Section::ListItem(item));
        let prev = self.node(list).last_child;
        self.node_mut(id).parent = Some(list);
        self.node_mut(id).prev = prev;
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(id),
            None => self.node_mut(list).first_child = Some(id),
        }
        self.node_mut(list).last_child = Some(id);
        id
    }

    /// Detach a section, returning its content as a detached value (a list
    /// section takes its items back with it). The id is retired.
    pub fn remove_section(&mut self, id: SectionId) -> Section {
        let (prev, next, parent, first_child) = {
            let node = self.node(id);
            (node.prev, node.next, node.parent, node.first_child)
        };

        // Unlink from the sibling chain this node lives in.
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => match parent {
                Some(parent) => self.node_mut(parent).first_child = next,
                None => self.head = next,
            },
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => match parent {
                Some(parent) => self.node_mut(parent).last_child = prev,
                None => self.tail = prev,
            },
        }

        match self.retire(id).section {
            Section::List(mut list) => {
                let mut child = first_child;
                while let Some(item) = child {
                    child = self.node(item).next;
                    if let Section::ListItem(item) = self.retire(item).section {
                        list.items.push(item);
                    }
                }
                Section::List(list)
            }
            other => other,
        }
    }

    fn retire(&mut self, id: SectionId) -> SectionNode {
        self.slots[id.0 as usize]
            .take()
            .unwrap_or_else(|| panic!("section {id:?} is not attached to this post"))
    }

    /// Detach every top-level section in order, leaving the post empty.
    pub fn take_sections(&mut self) -> Vec<Section> {
        let mut sections = Vec::new();
        while let Some(head) = self.head {
            sections.push(self.remove_section(head));
        }
        sections
    }

    /// Detached deep copy of a section: content preserved, markups still
    /// shared, no ties to this post.
    pub fn clone_section(&self, id: SectionId) -> Section {
        match self.section(id) {
            Section::List(list) => {
                let mut list = list.clone();
                list.items = self
                    .items(id)
                    .filter_map(|item| match self.section(item) {
                        Section::ListItem(item) => Some(item.clone()),
                        _ => None,
                    })
                    .collect();
                Section::List(list)
            }
            other => other.clone(),
        }
    }

    /// Leaf sections in document order: the traversal that defines
    /// leaf-section-index addressing. Stable for a structurally unchanged
    /// tree.
    pub fn leaf_sections(&self) -> Vec<SectionId> {
        let mut leaves = Vec::new();
        for id in self.sections() {
            if self.section(id).is_leaf() {
                leaves.push(id);
            } else {
                leaves.extend(self.items(id));
            }
        }
        leaves
    }

    /// The next leaf in document order: descends into an adjacent list's
    /// first item, ascends out of a list when its items are exhausted, and
    /// yields `None` at the end of the document.
    pub fn next_leaf_section(&self, id: SectionId) -> Option<SectionId> {
        let node = self.node(id);
        match node.next {
            Some(next) => {
                if self.section(next).is_leaf() {
                    Some(next)
                } else {
                    self.node(next).first_child
                }
            }
            None => self.next_leaf_section(node.parent?),
        }
    }

    /// Mirror of [`Post::next_leaf_section`].
    pub fn previous_leaf_section(&self, id: SectionId) -> Option<SectionId> {
        let node = self.node(id);
        match node.prev {
            Some(prev) => {
                if self.section(prev).is_leaf() {
                    Some(prev)
                } else {
                    self.node(prev).last_child
                }
            }
            None => self.previous_leaf_section(node.parent?),
        }
    }

    /// First markerable leaf at or after the leaf following `id`, skipping
    /// atomic leaves such as images and cards.
    pub fn immediately_next_markerable_section(&self, id: SectionId) -> Option<SectionId> {
        let mut current = self.next_leaf_section(id);
        while let Some(candidate) = current {
            if self.section(candidate).is_markerable() {
                return Some(candidate);
            }
            current = self.next_leaf_section(candidate);
        }
        None
    }
}

/// Iterator over one sibling chain (top-level sections or a list's items).
pub struct SiblingIter<'a> {
    post: &'a Post,
    next: Option<SectionId>,
}

impl Iterator for SiblingIter<'_> {
    type Item = SectionId;

    fn next(&mut self) -> Option<SectionId> {
        let id = self.next?;
        self.next = self.post.node(id).next;
        Some(id)
    }
}
