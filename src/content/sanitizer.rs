//! HTML content sanitizer
//!
//! Converts raw page markup into a comparison-stable content string:
//! - `<script>` and `<style>` subtrees and all comments are dropped
//! - every attribute is stripped from the remaining elements
//! - elements left without children, and whitespace-only text, are removed
//! - the result is serialized and every whitespace run collapses to one space

use super::tree::{ContentNode, ContentTree};
use super::SanitizeError;
use ego_tree::NodeRef;
use scraper::{Html, Node};

/// Elements removed together with their entire subtree
const STRIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Sanitizes an HTML document
///
/// The HTML parser recovers from malformed markup the way browsers do, so this
/// never fails; see [`sanitize_body`] for the fallible entry point used on
/// fetched responses.
///
/// # Example
///
/// ```
/// use sumi_harvest::content::sanitize;
///
/// let clean = sanitize("<html><body><script>alert(1)</script><p>Hi</p></body></html>");
/// assert_eq!(clean, "<html><body><p>Hi</p></body></html>");
/// ```
pub fn sanitize(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut tree = ContentTree::new();
    clean_children(document.tree.root(), &mut tree, ContentTree::ROOT);

    collapse_whitespace(&tree.to_html())
}

/// Sanitizes a fetched response body
///
/// # Arguments
///
/// * `body` - The decoded response body
/// * `content_type` - The response `Content-Type` header, if any
///
/// # Returns
///
/// * `Ok(String)` - The sanitized content
/// * `Err(SanitizeError::MalformedDocument)` - The body is declared as a
///   non-markup type (image, PDF, JSON, ...) and cannot be read as HTML
pub fn sanitize_body(body: &str, content_type: Option<&str>) -> Result<String, SanitizeError> {
    if let Some(content_type) = content_type {
        if !is_markup(content_type) {
            return Err(SanitizeError::MalformedDocument(format!(
                "expected an HTML document, got content type '{}'",
                content_type
            )));
        }
    }

    Ok(sanitize(body))
}

/// Returns true for content types the HTML parser can read
fn is_markup(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence.is_empty()
        || essence.starts_with("text/")
        || essence == "application/xhtml+xml"
        || essence == "application/xml"
}

/// Copies the cleaned children of `source` under `parent`, depth-first
///
/// A child element is fully processed before its own emptiness is checked, so
/// a parent whose children were all pruned is pruned in turn.
fn clean_children(source: NodeRef<'_, Node>, tree: &mut ContentTree, parent: usize) {
    for child in source.children() {
        match child.value() {
            Node::Element(element) if STRIPPED_ELEMENTS.contains(&element.name()) => {}
            Node::Comment(_) | Node::ProcessingInstruction(_) => {}
            Node::Element(element) => {
                // Only the tag name is carried over
                let id = tree.append(parent, ContentNode::Element(element.name().to_string()));
                clean_children(child, tree, id);

                if !tree.has_children(id) {
                    tree.remove_child(parent, id);
                }
            }
            Node::Text(text) => {
                let text: &str = text;
                if !text.trim().is_empty() {
                    tree.append(parent, ContentNode::Text(text.to_string()));
                }
            }
            Node::Doctype(doctype) => {
                tree.append(parent, ContentNode::Doctype(doctype.name().to_string()));
            }
            Node::Document | Node::Fragment => clean_children(child, tree, parent),
        }
    }
}

/// Collapses every maximal run of whitespace into a single ASCII space
fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut was_space = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !was_space {
                out.push(' ');
                was_space = true;
            }
        } else {
            out.push(c);
            was_space = false;
        }
    }

    out
}
