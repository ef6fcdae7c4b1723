//! Deterministic traversal of raw content documents.
//!
//! Order: rows, then each row's columns, then per column its own elements
//! followed by its nested columns (and their elements). Everything is visited
//! in stored order. Nodes of the wrong JSON shape are still handed to the
//! visitor but not descended into.

use std::fmt;

use serde_json::Value;

/// Position inside a content document, e.g. `rows[0].columns[1].elements[2]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocPath(String);

impl DocPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, key: &str, index: usize) -> Self {
        if self.0.is_empty() {
            Self(format!("{key}[{index}]"))
        } else {
            Self(format!("{}.{key}[{index}]", self.0))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("(document)")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Callbacks for `walk`. All methods default to no-ops.
pub trait Visitor {
    fn row(&mut self, _path: &DocPath, _row: &Value) {}
    fn column(&mut self, _path: &DocPath, _column: &Value, _nested: bool) {}
    fn element(&mut self, _path: &DocPath, _element: &Value) {}
}

/// Walk a raw document in deterministic order.
pub fn walk(document: &Value, visitor: &mut impl Visitor) {
    let root = DocPath::root();
    for (i, row) in array_field(document, "rows").iter().enumerate() {
        let row_path = root.child("rows", i);
        visitor.row(&row_path, row);
        for (j, column) in array_field(row, "columns").iter().enumerate() {
            walk_column(&row_path.child("columns", j), column, false, visitor);
        }
    }
}

fn walk_column(path: &DocPath, column: &Value, nested: bool, visitor: &mut impl Visitor) {
    visitor.column(path, column, nested);
    for (k, element) in array_field(column, "elements").iter().enumerate() {
        visitor.element(&path.child("elements", k), element);
    }
    // Columns nest one level only
    if !nested {
        for (n, inner) in array_field(column, "columns").iter().enumerate() {
            walk_column(&path.child("columns", n), inner, true, visitor);
        }
    }
}

/// Visit every element mutably, in the same order as `walk`.
pub fn for_each_element_mut(document: &mut Value, mut f: impl FnMut(&DocPath, &mut Value)) {
    let root = DocPath::root();
    for (i, row) in array_field_mut(document, "rows").iter_mut().enumerate() {
        let row_path = root.child("rows", i);
        for (j, column) in array_field_mut(row, "columns").iter_mut().enumerate() {
            column_elements_mut(&row_path.child("columns", j), column, false, &mut f);
        }
    }
}

fn column_elements_mut(
    path: &DocPath,
    column: &mut Value,
    nested: bool,
    f: &mut impl FnMut(&DocPath, &mut Value),
) {
    for (k, element) in array_field_mut(column, "elements").iter_mut().enumerate() {
        f(&path.child("elements", k), element);
    }
    if !nested {
        for (n, inner) in array_field_mut(column, "columns").iter_mut().enumerate() {
            column_elements_mut(&path.child("columns", n), inner, true, f);
        }
    }
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn array_field_mut<'a>(value: &'a mut Value, key: &str) -> &'a mut [Value] {
    match value.get_mut(key).and_then(Value::as_array_mut) {
        Some(items) => items.as_mut_slice(),
        None => &mut [],
    }
}
