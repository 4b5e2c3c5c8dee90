//! Index-based document tree owned by the sanitizer
//!
//! Nodes live in one arena and refer to their children by index. Removing a
//! node only unlinks it from its parent's child list; the orphaned slot stays
//! in the arena until the tree is dropped.

/// Elements whose text content is serialized verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ContentNode {
    Document,
    Doctype(String),
    Element(String),
    Text(String),
}

#[derive(Debug)]
struct Slot {
    node: ContentNode,
    children: Vec<usize>,
}

/// Arena tree of sanitized content
#[derive(Debug)]
pub(crate) struct ContentTree {
    slots: Vec<Slot>,
}

impl ContentTree {
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                node: ContentNode::Document,
                children: Vec::new(),
            }],
        }
    }

    /// Appends a node as the last child of `parent` and returns its index
    pub fn append(&mut self, parent: usize, node: ContentNode) -> usize {
        let id = self.slots.len();
        self.slots.push(Slot {
            node,
            children: Vec::new(),
        });
        self.slots[parent].children.push(id);
        id
    }

    /// Unlinks `child` from `parent`
    pub fn remove_child(&mut self, parent: usize, child: usize) {
        self.slots[parent].children.retain(|&c| c != child);
    }

    pub fn has_children(&self, id: usize) -> bool {
        !self.slots[id].children.is_empty()
    }

    /// Serializes the tree back to HTML text
    ///
    /// Elements carry no attributes and every surviving element has at least
    /// one child, so no void-element handling is needed.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_children(Self::ROOT, &mut out, false);
        out
    }

    fn write_children(&self, id: usize, out: &mut String, raw_text: bool) {
        for &child in &self.slots[id].children {
            self.write_node(child, out, raw_text);
        }
    }

    fn write_node(&self, id: usize, out: &mut String, raw_text: bool) {
        match &self.slots[id].node {
            ContentNode::Document => self.write_children(id, out, false),
            ContentNode::Doctype(name) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            ContentNode::Element(name) => {
                out.push('<');
                out.push_str(name);
                out.push('>');
                self.write_children(id, out, RAW_TEXT_ELEMENTS.contains(&name.as_str()));
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            ContentNode::Text(text) if raw_text => out.push_str(text),
            ContentNode::Text(text) => escape_text(text, out),
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
