//! Read-only lookups in a built tree
//!
//! Extractors only reach into the tree through these functions.

use crate::error::NavigationError;
use crate::parser::tree::Node;

/// The value of the first direct child of `node` with the given key
pub fn get_child<'a>(node: &'a Node, key: &str) -> Option<&'a Node> {
    match node {
        Node::Object(content) => content.iter().find_map(|child| match child {
            Node::KeyValue(k, value) if k == key => Some(value.as_ref()),
            _ => None,
        }),
        _ => None,
    }
}

/// Follows a dot separated path of keys
///
/// Keys of the add-on databases may contain `@`, which is not a separator.
pub fn get_path<'a>(node: &'a Node, path: &str) -> Option<&'a Node> {
    path.split('.')
        .try_fold(node, |current, key| get_child(current, key))
}

fn expect_child<'a>(node: &'a Node, key: &str) -> Result<&'a Node, NavigationError> {
    match node {
        Node::Object(_) => {
            get_child(node, key).ok_or_else(|| NavigationError::MissingKey(key.to_string()))
        }
        _ => Err(NavigationError::NotAnObject(key.to_string())),
    }
}

pub fn expect_string<'a>(node: &'a Node, key: &str) -> Result<&'a str, NavigationError> {
    match expect_child(node, key)? {
        Node::Str(s) => Ok(s.as_str()),
        other => Err(wrong_type(key, "a string", other)),
    }
}

pub fn expect_object<'a>(node: &'a Node, key: &str) -> Result<&'a Node, NavigationError> {
    match expect_child(node, key)? {
        object @ Node::Object(_) => Ok(object),
        other => Err(wrong_type(key, "an object", other)),
    }
}

pub fn expect_number(node: &Node, key: &str) -> Result<f64, NavigationError> {
    match expect_child(node, key)? {
        Node::Num(n) => Ok(*n),
        other => Err(wrong_type(key, "a number", other)),
    }
}

/// The string elements of a list, other elements are ignored
pub fn list_strings(node: &Node) -> Vec<&str> {
    match node {
        Node::Object(content) => content
            .iter()
            .filter_map(|child| match child {
                Node::Str(s) => Some(s.as_str()),
                _ => None,
            })
            .collect(),
        _ => vec![],
    }
}

/// The keyed children of an object, in order
pub fn entries(node: &Node) -> Vec<(&str, &Node)> {
    match node {
        Node::Object(content) => content
            .iter()
            .filter_map(|child| match child {
                Node::KeyValue(k, value) => Some((k.as_str(), value.as_ref())),
                _ => None,
            })
            .collect(),
        _ => vec![],
    }
}

fn wrong_type(key: &str, expected: &'static str, found: &Node) -> NavigationError {
    NavigationError::WrongType {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
