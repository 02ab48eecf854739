//! Annotations attached to classes and fields, and the typed accessors used to
//! read their properties.
//!
//! The scanner only relies on the `read_*` contract below; it never inspects
//! [`AnnotationValue`] directly.

use crate::error::AnnotationError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of the annotation that carries schema overrides.
pub const SCHEMA_ANNOTATION: &str = "schema";

/// A single property value on an annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    StringList(Vec<String>),
}

impl AnnotationValue {
    fn kind_name(&self) -> &'static str {
        match self {
            AnnotationValue::Bool(_) => "bool",
            AnnotationValue::Int(_) => "int",
            AnnotationValue::Double(_) => "double",
            AnnotationValue::String(_) => "string",
            AnnotationValue::StringList(_) => "string list",
        }
    }
}

/// An annotation instance attached to a class or field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub values: IndexMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    /// Builder-style property setter
    pub fn with(mut self, property: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.insert(property.into(), value);
        self
    }

    pub fn is_schema(&self) -> bool {
        self.name == SCHEMA_ANNOTATION
    }

    pub fn read_string(&self, property: &str) -> Result<Option<String>, AnnotationError> {
        match self.values.get(property) {
            None => Ok(None),
            Some(AnnotationValue::String(value)) => Ok(Some(value.clone())),
            Some(other) => Err(self.wrong_kind(property, "string", other)),
        }
    }

    pub fn read_bool(&self, property: &str) -> Result<Option<bool>, AnnotationError> {
        match self.values.get(property) {
            None => Ok(None),
            Some(AnnotationValue::Bool(value)) => Ok(Some(*value)),
            Some(other) => Err(self.wrong_kind(property, "bool", other)),
        }
    }

    /// Reads a boolean, treating an absent property as `false`.
    pub fn read_bool_or_false(&self, property: &str) -> Result<bool, AnnotationError> {
        Ok(self.read_bool(property)?.unwrap_or(false))
    }

    pub fn read_int(&self, property: &str) -> Result<Option<i64>, AnnotationError> {
        match self.values.get(property) {
            None => Ok(None),
            Some(AnnotationValue::Int(value)) => Ok(Some(*value)),
            Some(other) => Err(self.wrong_kind(property, "int", other)),
        }
    }

    /// Reads a number. Integers are widened and numeric strings are parsed.
    pub fn read_f64(&self, property: &str) -> Result<Option<f64>, AnnotationError> {
        match self.values.get(property) {
            None => Ok(None),
            Some(AnnotationValue::Double(value)) => Ok(Some(*value)),
            Some(AnnotationValue::Int(value)) => Ok(Some(*value as f64)),
            Some(AnnotationValue::String(text)) => text
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.invalid_value(property, text, "number")),
            Some(other) => Err(self.wrong_kind(property, "double or string", other)),
        }
    }

    pub fn read_string_list(&self, property: &str) -> Result<Option<Vec<String>>, AnnotationError> {
        match self.values.get(property) {
            None => Ok(None),
            Some(AnnotationValue::StringList(values)) => Ok(Some(values.clone())),
            Some(other) => Err(self.wrong_kind(property, "string list", other)),
        }
    }

    /// Reads a string property and parses it into an enum-like value.
    pub fn read_enum<T: FromStr>(&self, property: &str) -> Result<Option<T>, AnnotationError> {
        match self.read_string(property)? {
            None => Ok(None),
            Some(text) => text
                .parse::<T>()
                .map(Some)
                .map_err(|_| self.invalid_value(property, &text, "enumerated value")),
        }
    }

    fn wrong_kind(&self, property: &str, expected: &'static str, found: &AnnotationValue) -> AnnotationError {
        AnnotationError::WrongKind {
            annotation: self.name.clone(),
            property: property.to_string(),
            expected,
            found: found.kind_name(),
        }
    }

    fn invalid_value(&self, property: &str, value: &str, expected: &'static str) -> AnnotationError {
        AnnotationError::InvalidValue {
            annotation: self.name.clone(),
            property: property.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

/// Finds the schema annotation in a list of annotations.
pub fn find_schema_annotation(annotations: &[Annotation]) -> Option<&Annotation> {
    annotations.iter().find(|annotation| annotation.is_schema())
}
