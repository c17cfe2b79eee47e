//! Collection schema: typed field descriptors and write-boundary validation.
//!
//! # Responsibility
//! - Declare the ordered, typed field set of one collection up front.
//! - Reject unknown fields and type mismatches before persistence runs.
//!
//! # Invariants
//! - The identifier field is owned by the store; callers cannot write it.
//! - Validation never mutates the record it inspects.

use crate::model::record::Record;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Value type expected for one schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string, including opaque foreign-key-like references.
    String,
    /// JSON number, integer or float.
    Number,
    /// JSON boolean.
    Bool,
    /// Any JSON value; opts a field out of type checking.
    Any,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Any => true,
        }
    }

    fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Bool => "bool",
            FieldKind::Any => "any",
        }
    }
}

/// Identifier generation strategy for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Monotonic integers: one greater than the largest existing id.
    Serial,
    /// Random v4 uuid strings.
    Uuid,
}

/// One named, typed field of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// Required fields must be present and non-null on create.
    pub required: bool,
}

/// Validation error raised before any write reaches persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    UnknownField(String),
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
    MissingRequired(String),
    IdReadOnly(String),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(name) => write!(f, "unknown field `{name}`"),
            Self::TypeMismatch { field, expected } => {
                write!(f, "field `{field}` must be a {expected}")
            }
            Self::MissingRequired(name) => write!(f, "required field `{name}` is missing"),
            Self::IdReadOnly(name) => {
                write!(f, "identifier field `{name}` is assigned by the store")
            }
        }
    }
}

impl Error for SchemaError {}

/// Ordered, typed description of one collection's record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    id_field: String,
    id_kind: IdKind,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Creates a schema with the given identifier field and generation strategy.
    pub fn new(id_field: impl Into<String>, id_kind: IdKind) -> Self {
        Self {
            id_field: id_field.into(),
            id_kind,
            fields: Vec::new(),
        }
    }

    /// Appends an optional field.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }

    /// Appends a field that must be present and non-null on create.
    pub fn required(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    /// Name of the identifier field.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Identifier generation strategy.
    pub fn id_kind(&self) -> IdKind {
        self.id_kind
    }

    /// Declared fields in declaration order, identifier excluded.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks a partial record as submitted to `create`.
    ///
    /// Present fields must be declared and well-typed, every required field
    /// must be present and non-null, and the identifier must not be supplied.
    pub fn validate_create(&self, partial: &Record) -> Result<(), SchemaError> {
        self.validate_partial(partial)?;
        for field in &self.fields {
            if !field.required {
                continue;
            }
            match partial.get(&field.name) {
                Some(value) if !value.is_null() => {}
                _ => return Err(SchemaError::MissingRequired(field.name.clone())),
            }
        }
        Ok(())
    }

    /// Checks a partial record as submitted to `update`.
    ///
    /// Only fields present in the partial are inspected; required fields may
    /// be absent because the merge preserves the stored value.
    pub fn validate_partial(&self, partial: &Record) -> Result<(), SchemaError> {
        for (name, value) in partial.iter() {
            if name == &self.id_field {
                return Err(SchemaError::IdReadOnly(name.clone()));
            }
            let field = self
                .descriptor(name)
                .ok_or_else(|| SchemaError::UnknownField(name.clone()))?;
            if value.is_null() {
                if field.required {
                    return Err(SchemaError::MissingRequired(name.clone()));
                }
                continue;
            }
            if !field.kind.accepts(value) {
                return Err(SchemaError::TypeMismatch {
                    field: name.clone(),
                    expected: field.kind.name(),
                });
            }
        }
        Ok(())
    }
}
