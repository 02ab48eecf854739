//! Explicit schema overrides read from `schema` annotations.
//!
//! Overrides are parsed in full before anything is applied, so a malformed
//! property leaves the target node untouched and the caller can fall back to
//! inferred values.

use crate::annotation::Annotation;
use crate::classifier::TypeFormat;
use crate::error::AnnotationError;
use crate::schema::{SchemaNode, SchemaType};

pub const PROP_HIDDEN: &str = "hidden";
pub const PROP_REQUIRED: &str = "required";
pub const PROP_TYPE: &str = "type";
pub const PROP_FORMAT: &str = "format";
pub const PROP_TITLE: &str = "title";
pub const PROP_DESCRIPTION: &str = "description";
pub const PROP_EXAMPLE: &str = "example";
pub const PROP_DEFAULT_VALUE: &str = "default_value";
pub const PROP_ENUMERATION: &str = "enumeration";
pub const PROP_IMPLEMENTATION: &str = "implementation";
pub const PROP_REF: &str = "ref";
pub const PROP_NULLABLE: &str = "nullable";
pub const PROP_READ_ONLY: &str = "read_only";
pub const PROP_WRITE_ONLY: &str = "write_only";
pub const PROP_DEPRECATED: &str = "deprecated";
pub const PROP_MINIMUM: &str = "minimum";
pub const PROP_MAXIMUM: &str = "maximum";
pub const PROP_MULTIPLE_OF: &str = "multiple_of";
pub const PROP_MIN_LENGTH: &str = "min_length";
pub const PROP_MAX_LENGTH: &str = "max_length";
pub const PROP_PATTERN: &str = "pattern";
pub const PROP_MIN_ITEMS: &str = "min_items";
pub const PROP_MAX_ITEMS: &str = "max_items";
pub const PROP_UNIQUE_ITEMS: &str = "unique_items";

const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// What happened to the node an override was applied to.
///
/// Callers must rebind to the replacement when one is returned; the original
/// node is no longer part of the result.
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    InPlace,
    Replaced(SchemaNode),
}

/// The explicit attributes of one schema annotation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaOverride {
    pub hidden: bool,
    pub required: bool,
    pub schema_type: Option<SchemaType>,
    pub format: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub example: Option<String>,
    pub default_value: Option<String>,
    pub enumeration: Option<Vec<String>>,
    /// Class whose schema replaces the annotated element's
    pub implementation: Option<String>,
    pub reference: Option<String>,
    pub nullable: Option<bool>,
    pub read_only: Option<bool>,
    pub write_only: Option<bool>,
    pub deprecated: Option<bool>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub multiple_of: Option<f64>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: Option<bool>,
}

impl SchemaOverride {
    pub fn from_annotation(annotation: &Annotation) -> Result<Self, AnnotationError> {
        Ok(Self {
            hidden: annotation.read_bool_or_false(PROP_HIDDEN)?,
            required: annotation.read_bool_or_false(PROP_REQUIRED)?,
            schema_type: annotation.read_enum::<SchemaType>(PROP_TYPE)?,
            format: annotation.read_string(PROP_FORMAT)?,
            title: annotation.read_string(PROP_TITLE)?,
            description: annotation.read_string(PROP_DESCRIPTION)?,
            example: annotation.read_string(PROP_EXAMPLE)?,
            default_value: annotation.read_string(PROP_DEFAULT_VALUE)?,
            enumeration: annotation.read_string_list(PROP_ENUMERATION)?,
            implementation: annotation.read_string(PROP_IMPLEMENTATION)?,
            reference: annotation.read_string(PROP_REF)?,
            nullable: annotation.read_bool(PROP_NULLABLE)?,
            read_only: annotation.read_bool(PROP_READ_ONLY)?,
            write_only: annotation.read_bool(PROP_WRITE_ONLY)?,
            deprecated: annotation.read_bool(PROP_DEPRECATED)?,
            minimum: annotation.read_f64(PROP_MINIMUM)?,
            maximum: annotation.read_f64(PROP_MAXIMUM)?,
            multiple_of: annotation.read_f64(PROP_MULTIPLE_OF)?,
            min_length: read_count(annotation, PROP_MIN_LENGTH)?,
            max_length: read_count(annotation, PROP_MAX_LENGTH)?,
            pattern: annotation.read_string(PROP_PATTERN)?,
            min_items: read_count(annotation, PROP_MIN_ITEMS)?,
            max_items: read_count(annotation, PROP_MAX_ITEMS)?,
            unique_items: annotation.read_bool(PROP_UNIQUE_ITEMS)?,
        })
    }

    /// Applies the override on top of `defaults`.
    ///
    /// A `ref` replaces the node with a bare reference. A resolved
    /// `implementation` schema replaces the node, with the explicit
    /// attributes merged onto it. Otherwise the node is updated in place.
    pub fn apply(
        &self,
        node: &mut SchemaNode,
        defaults: Option<TypeFormat>,
        implementation: Option<SchemaNode>,
    ) -> Substitution {
        if let Some(reference) = &self.reference {
            return Substitution::Replaced(SchemaNode::reference(reference_path(reference)));
        }
        if let Some(mut substitute) = implementation {
            self.merge_into(&mut substitute, None);
            return Substitution::Replaced(substitute);
        }
        self.merge_into(node, defaults);
        Substitution::InPlace
    }

    fn merge_into(&self, node: &mut SchemaNode, defaults: Option<TypeFormat>) {
        let inferred_kind = defaults.map(|d| d.kind);
        // A format already on the node belongs to its previous type.
        if self.schema_type.is_some() && self.schema_type != inferred_kind.or(node.schema_type) {
            node.format = None;
        }
        let schema_type = self.schema_type.or(inferred_kind).or(node.schema_type);
        node.schema_type = schema_type;

        // An inferred format only makes sense alongside the inferred type.
        let inferred_format = defaults
            .filter(|d| Some(d.kind) == schema_type)
            .and_then(|d| d.format)
            .map(str::to_string);
        if let Some(format) = self.format.clone().or(inferred_format) {
            node.format = Some(format);
        }

        overlay(&mut node.title, &self.title);
        overlay(&mut node.description, &self.description);
        overlay(&mut node.example, &self.example);
        overlay(&mut node.default_value, &self.default_value);
        overlay(&mut node.pattern, &self.pattern);
        overlay(&mut node.nullable, &self.nullable);
        overlay(&mut node.read_only, &self.read_only);
        overlay(&mut node.write_only, &self.write_only);
        overlay(&mut node.deprecated, &self.deprecated);
        overlay(&mut node.unique_items, &self.unique_items);
        overlay(&mut node.minimum, &self.minimum);
        overlay(&mut node.maximum, &self.maximum);
        overlay(&mut node.multiple_of, &self.multiple_of);
        overlay(&mut node.min_length, &self.min_length);
        overlay(&mut node.max_length, &self.max_length);
        overlay(&mut node.min_items, &self.min_items);
        overlay(&mut node.max_items, &self.max_items);
        if let Some(values) = &self.enumeration {
            node.enumeration = values.clone();
        }
    }
}

fn overlay<T: Clone>(target: &mut Option<T>, explicit: &Option<T>) {
    if explicit.is_some() {
        *target = explicit.clone();
    }
}

fn read_count(annotation: &Annotation, property: &str) -> Result<Option<u64>, AnnotationError> {
    match annotation.read_int(property)? {
        None => Ok(None),
        Some(value) => u64::try_from(value).map(Some).map_err(|_| AnnotationError::InvalidValue {
            annotation: annotation.name.clone(),
            property: property.to_string(),
            value: value.to_string(),
            expected: "non-negative count",
        }),
    }
}

/// Expands a bare schema name into a components reference.
pub fn reference_path(reference: &str) -> String {
    if reference.contains('#') || reference.contains('/') {
        reference.to_string()
    } else {
        format!("{}{}", COMPONENTS_PREFIX, reference)
    }
}
