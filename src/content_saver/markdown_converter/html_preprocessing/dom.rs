//! Thin helpers over the kuchiki document tree.
//!
//! The preprocessing passes only need a handful of DOM operations:
//! parse, select-by-selector, find elements by tag, attribute access,
//! replace-with-text and serialize. They live here so each pass
//! reads as its transformation and nothing else.

use kuchiki::iter::NodeIterator;
use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

use crate::errors::{ConvertError, ConvertResult};

/// Parse an HTML string into a mutable document tree.
///
/// html5ever never fails: malformed markup yields some tree, possibly
/// just an empty `<html><head></head><body></body></html>`.
pub fn parse_document(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html)
}

/// Serialize a document tree back to an HTML string.
pub fn serialize_document(document: &NodeRef) -> ConvertResult<String> {
    let mut output = Vec::new();
    document
        .serialize(&mut output)
        .map_err(ConvertError::Serialize)?;
    Ok(String::from_utf8(output)?)
}

/// Select every element matching `selector`, collected up front.
///
/// Collecting before returning matters: callers detach nodes while
/// iterating, which would otherwise invalidate the live descendant walk.
pub fn select_all(node: &NodeRef, selector: &str) -> ConvertResult<Vec<NodeDataRef<ElementData>>> {
    let matches = node
        .select(selector)
        .map_err(|()| ConvertError::InvalidSelector(selector.to_string()))?;
    Ok(matches.collect())
}

/// Find every descendant element with the given local tag name, in document order.
///
/// Matches on the local name only, so MathML elements (which html5ever
/// places in the MathML namespace) are found the same way as HTML ones.
pub fn elements_by_tag(node: &NodeRef, tag: &str) -> Vec<NodeDataRef<ElementData>> {
    node.descendants()
        .elements()
        .filter(|element| &*element.name.local == tag)
        .collect()
}

/// Read an attribute value, if present.
pub fn attribute(element: &ElementData, name: &str) -> Option<String> {
    element.attributes.borrow().get(name).map(str::to_string)
}

/// Whether `node` is still reachable from a document root.
///
/// False for anything inside a subtree an earlier pass already detached.
pub fn is_attached(node: &NodeRef) -> bool {
    node.ancestors()
        .last()
        .is_some_and(|root| root.as_document().is_some())
}

/// Replace `node` with a literal text node holding `text`.
///
/// The text is inserted as a text node, not parsed as markup, so the
/// serializer escapes it like any other text and nothing is re-interpreted.
/// Returns the inserted node.
pub fn replace_with_text(node: &NodeRef, text: &str) -> NodeRef {
    let replacement = NodeRef::new_text(text);
    node.insert_before(replacement.clone());
    node.detach();
    replacement
}
