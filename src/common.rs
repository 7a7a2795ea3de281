//! Common utilities for building DynamoDB expressions.
//!
//! This module provides the pieces shared by read and write operations:
//! key handling, condition expressions and the placeholder bookkeeping that
//! goes with them.

/// Condition expression building for key conditions, filters and conditional writes.
pub mod condition;

/// Key types for identifying items in DynamoDB tables.
pub mod key;

use aws_sdk_dynamodb::types;
use std::collections;

/// Separator for attribute path components.
pub(crate) const PATH_SEPARATOR: &str = ".";

/// Turn an attribute name into something usable inside a placeholder.
///
/// Placeholders only accept alphanumerics and underscores. Underscores are
/// doubled and any other character becomes `_<hex code point>_`, so two
/// distinct names never share a placeholder (`created-at` is `created_2d_at`,
/// `created_at` is `created__at`).
pub(crate) fn placeholder_token(name: &str) -> String {
    let mut token = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '_' => token.push_str("__"),
            c if c.is_ascii_alphanumeric() => token.push(c),
            c => token.push_str(&format!("_{:x}_", u32::from(c))),
        }
    }
    token
}

/// Name placeholder for an attribute, e.g. `#isDeleted`.
pub(crate) fn name_placeholder(name: &str) -> String {
    format!("#{}", placeholder_token(name))
}

pub(crate) fn add_placeholder(path: &[String], name: &str) -> (String, Vec<String>) {
    let placeholder = name_placeholder(name);
    let mut new_path = Vec::with_capacity(path.len() + 1);
    new_path.extend_from_slice(path);
    new_path.push(placeholder.clone());
    (placeholder, new_path)
}

fn join(left: String, operator: &str, right: String) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right,
        (_, true) => left,
        _ => format!("{left}{operator}{right}"),
    }
}

/// An expression string together with the placeholders it references.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Expression {
    pub(crate) text: String,
    pub(crate) names: collections::HashMap<String, String>,
    pub(crate) values: collections::HashMap<String, types::AttributeValue>,
}

impl Expression {
    pub(crate) fn merge(operator: &str, items: Vec<Self>) -> Self {
        items.into_iter().fold(Self::default(), |mut merged, item| {
            merged.names.extend(item.names);
            merged.values.extend(item.values);
            merged.text = join(merged.text, operator, item.text);
            merged
        })
    }

    /// Move the placeholders into the request maps and hand back the expression text.
    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, types::AttributeValue>>,
    ) -> String {
        if !self.names.is_empty() {
            names.get_or_insert_with(Default::default).extend(self.names);
        }
        if !self.values.is_empty() {
            values.get_or_insert_with(Default::default).extend(self.values);
        }
        self.text
    }
}
