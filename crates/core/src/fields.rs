//! Static field descriptors and client-facing metadata generation.
//!
//! Each resource declares its writable fields as a `&'static` descriptor
//! list built at startup, not reflected at request time. From these the
//! API derives the create/update form metadata; table columns come from
//! the read representation's field names unless the resource declares an
//! explicit column set.

use serde::Serialize;
use serde_json::{json, Value};

/// The wire type of a writable field, used by clients to pick a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Integer,
    Boolean,
    Timestamp,
    Uuid,
    Select,
}

/// A writable field of a resource.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Explicit display label; auto-derived from `name` when `None`.
    pub label: Option<&'static str>,
    pub kind: FieldKind,
    pub required: bool,
    /// Choice list for [`FieldKind::Select`] fields: `(value, label)`.
    pub options: Option<&'static [(&'static str, &'static str)]>,
}

impl FieldDescriptor {
    /// A required field with an auto-derived label and no options.
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        FieldDescriptor {
            name,
            label: None,
            kind,
            required: true,
            options: None,
        }
    }

    /// An optional field with an auto-derived label and no options.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        FieldDescriptor {
            name,
            label: None,
            kind,
            required: false,
            options: None,
        }
    }

    fn display_label(&self) -> String {
        match self.label {
            Some(label) => label.to_string(),
            None => display_label(self.name),
        }
    }
}

/// Derive a display label from a field identifier: separators become
/// spaces and each word is capitalized (`first_name` -> `First Name`).
pub fn display_label(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Table-column metadata: a mapping of column id to display label.
///
/// An explicit declaration wins; otherwise labels are auto-derived from
/// the read representation's field names.
pub fn table_columns(
    explicit: &[(&str, &str)],
    list_fields: &[&str],
) -> serde_json::Map<String, Value> {
    let mut columns = serde_json::Map::new();
    if explicit.is_empty() {
        for field in list_fields {
            columns.insert(field.to_string(), Value::String(display_label(field)));
        }
    } else {
        for (field, label) in explicit {
            columns.insert(field.to_string(), Value::String(label.to_string()));
        }
    }
    columns
}

fn field_meta(field: &FieldDescriptor, default: Option<&Value>) -> Value {
    let mut meta = json!({
        "name": field.name,
        "label": field.display_label(),
        "kind": field.kind,
        "required": field.required,
    });
    if let Some(options) = field.options {
        let choices: Vec<Value> = options
            .iter()
            .map(|(value, label)| json!({ "id": value, "label": label }))
            .collect();
        meta["options"] = Value::Array(choices);
    }
    if let Some(default) = default {
        meta["default"] = default.clone();
    }
    meta
}

/// Form metadata for object creation. Requires no instance.
pub fn create_meta(fields: &[FieldDescriptor]) -> Value {
    let fields: Vec<Value> = fields.iter().map(|f| field_meta(f, None)).collect();
    json!({ "fields": fields })
}

/// Form metadata for updating an existing object.
///
/// The current instance's serialized values become per-field defaults so
/// clients can pre-populate the form.
pub fn update_meta(fields: &[FieldDescriptor], instance: &Value) -> Value {
    let fields: Vec<Value> = fields
        .iter()
        .map(|f| field_meta(f, instance.get(f.name)))
        .collect();
    json!({ "fields": fields })
}
