//! Schema validation of raw content documents

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::content::schema::{ElementKind, FieldType, MAX_WIDTH, MIN_WIDTH};
use crate::domain::content::walk::{walk, DocPath, Visitor};

/// One place where a document deviates from the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaViolation {
    /// Location of the offending row, column or element
    pub path: String,
    /// Field name on that node
    pub field: String,
    /// What the schema expects, e.g. `integer in 1..=12`
    pub expected_type: String,
    /// The stored value, None if the field is missing
    pub actual_value: Option<Value>,
}

impl SchemaViolation {
    fn new(path: &DocPath, field: &str, expected: FieldType, actual: Option<&Value>) -> Self {
        Self {
            path: path.to_string(),
            field: field.to_string(),
            expected_type: expected.to_string(),
            actual_value: actual.cloned(),
        }
    }

    /// True for the legacy defect of numbers stored as strings.
    pub fn is_numeric_string(&self) -> bool {
        self.expected_type.starts_with("integer")
            && matches!(&self.actual_value, Some(Value::String(s)) if s.trim().parse::<i64>().is_ok())
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.actual_value {
            Some(actual) => write!(
                f,
                "{}: field '{}' expected {}, found {}",
                self.path, self.field, self.expected_type, actual
            ),
            None => write!(
                f,
                "{}: missing field '{}' ({})",
                self.path, self.field, self.expected_type
            ),
        }
    }
}

/// Check every row, column and element; returns all violations in
/// traversal order. An empty list means the document is valid.
#[instrument(level = "debug", skip(document))]
pub fn validate(document: &Value) -> Vec<SchemaViolation> {
    let mut checker = Checker::default();
    let root = DocPath::root();

    match document.as_object() {
        None => checker.push(&root, "(document)", FieldType::Object, Some(document)),
        Some(map) => checker.require(&root, map, "rows", FieldType::Array),
    }

    walk(document, &mut checker);
    debug!("validation found {} violation(s)", checker.violations.len());
    checker.violations
}

#[derive(Default)]
struct Checker {
    violations: Vec<SchemaViolation>,
}

impl Checker {
    fn push(&mut self, path: &DocPath, field: &str, expected: FieldType, actual: Option<&Value>) {
        self.violations
            .push(SchemaViolation::new(path, field, expected, actual));
    }

    fn require(&mut self, path: &DocPath, map: &Map<String, Value>, field: &str, ty: FieldType) {
        match map.get(field) {
            None => self.push(path, field, ty, None),
            Some(value) if !ty.accepts(value) => self.push(path, field, ty, Some(value)),
            Some(_) => {}
        }
    }

    /// Optional fields may be absent or null.
    fn optional(&mut self, path: &DocPath, map: &Map<String, Value>, field: &str, ty: FieldType) {
        match map.get(field) {
            None | Some(Value::Null) => {}
            Some(value) if !ty.accepts(value) => self.push(path, field, ty, Some(value)),
            Some(_) => {}
        }
    }

    /// Shared `id` / `style` attributes of rows, columns and elements.
    fn common(&mut self, path: &DocPath, map: &Map<String, Value>) {
        self.optional(path, map, "id", FieldType::Str);
        self.optional(path, map, "style", FieldType::Object);
    }

    fn as_object<'a>(&mut self, path: &DocPath, value: &'a Value) -> Option<&'a Map<String, Value>> {
        let map = value.as_object();
        if map.is_none() {
            self.push(path, "(node)", FieldType::Object, Some(value));
        }
        map
    }
}

fn non_empty_array(map: &Map<String, Value>, field: &str) -> bool {
    map.get(field)
        .and_then(Value::as_array)
        .map(|items| !items.is_empty())
        .unwrap_or(false)
}

impl Visitor for Checker {
    fn row(&mut self, path: &DocPath, row: &Value) {
        let Some(map) = self.as_object(path, row) else {
            return;
        };
        self.common(path, map);
        self.require(path, map, "columns", FieldType::Array);
    }

    fn column(&mut self, path: &DocPath, column: &Value, nested: bool) {
        let Some(map) = self.as_object(path, column) else {
            return;
        };
        self.common(path, map);
        self.optional(
            path,
            map,
            "width",
            FieldType::Integer {
                min: MIN_WIDTH,
                max: Some(MAX_WIDTH),
            },
        );
        self.optional(path, map, "elements", FieldType::Array);

        let has_nested = map.get("columns").is_some_and(|v| !v.is_null());
        if nested && has_nested {
            // Nested columns may not nest again
            self.push(path, "columns", FieldType::Absent, map.get("columns"));
        } else if non_empty_array(map, "elements") && non_empty_array(map, "columns") {
            // A column holds either elements or nested columns
            self.push(path, "columns", FieldType::Absent, map.get("columns"));
        } else {
            self.optional(path, map, "columns", FieldType::Array);
        }
    }

    fn element(&mut self, path: &DocPath, element: &Value) {
        let Some(map) = self.as_object(path, element) else {
            return;
        };
        self.common(path, map);

        let kind = match map.get("type") {
            None => {
                self.push(path, "type", FieldType::Kind, None);
                return;
            }
            Some(value) => match value.as_str().and_then(|s| s.parse::<ElementKind>().ok()) {
                Some(kind) => kind,
                None => {
                    self.push(path, "type", FieldType::Kind, Some(value));
                    return;
                }
            },
        };

        for spec in kind.fields() {
            if spec.required {
                self.require(path, map, spec.name, spec.ty);
            } else {
                self.optional(path, map, spec.name, spec.ty);
            }
        }
    }
}
