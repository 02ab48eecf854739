use crate::catalog::TypeCatalog;
use crate::config::ScanConfig;
use crate::data_object_scanner::DataObjectScanner;
use crate::error::Result;
use crate::schema::SchemaNode;
use crate::type_ref::{simple_name, TypeRef};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const OPENAPI_VERSION: &str = "3.0.0";

/// Post-processing applied to every component schema when the document is built.
pub trait SchemaFilter {
    fn filter(&self, schema: &mut SchemaNode);
}

/// Drops hidden properties, recursively.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenFilter;

impl SchemaFilter for HiddenFilter {
    fn filter(&self, schema: &mut SchemaNode) {
        schema.prune_hidden();
    }
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI Components object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions, in insertion order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaNode>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    /// Carried through untouched from a base document
    #[serde(default)]
    pub paths: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub components: Components,
}

/// Assembles scanned schemas into an OpenAPI document.
pub struct OpenApiBuilder {
    document: OpenApiDocument,
    filters: Vec<Box<dyn SchemaFilter>>,
}

impl OpenApiBuilder {
    pub fn new() -> Self {
        Self {
            document: OpenApiDocument {
                openapi: OPENAPI_VERSION.to_string(),
                info: Info {
                    title: "API Documentation".to_string(),
                    version: "1.0.0".to_string(),
                    description: None,
                },
                paths: IndexMap::new(),
                components: Components::default(),
            },
            filters: Vec::new(),
        }
    }

    pub fn with_info(mut self, title: String, version: String, description: Option<String>) -> Self {
        self.document.info = Info {
            title,
            version,
            description,
        };
        self
    }

    /// Starts from an existing document; scanned schemas are added to its components.
    pub fn with_base_document(mut self, document: OpenApiDocument) -> Self {
        debug!(
            "Using base document with {} paths and {} schemas",
            document.paths.len(),
            document.components.schemas.len()
        );
        self.document = document;
        self
    }

    pub fn with_filter(mut self, filter: impl SchemaFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Adds or replaces a named component schema
    pub fn add_schema(&mut self, name: impl Into<String>, schema: SchemaNode) {
        let name = name.into();
        if self.document.components.schemas.insert(name.clone(), schema).is_some() {
            debug!("Replacing existing schema {}", name);
        }
    }

    /// Scans each root and registers the result as a component schema.
    ///
    /// Roots the catalog does not know are skipped with a warning. Returns
    /// the number of schemas added.
    ///
    /// # Errors
    ///
    /// Returns an error if a root is not a concrete type.
    pub fn scan_roots(&mut self, catalog: &TypeCatalog, roots: &[TypeRef], config: ScanConfig) -> Result<usize> {
        let mut added = 0;
        for root in roots {
            match DataObjectScanner::new(catalog, root.clone(), config).process()? {
                Some(schema) => {
                    self.add_schema(component_name(root), schema);
                    added += 1;
                }
                None => warn!("Type {} is not in the catalog; no schema generated", root),
            }
        }
        info!("Generated {} of {} requested schemas", added, roots.len());
        Ok(added)
    }

    /// Applies the filters and returns the finished document.
    pub fn build(mut self) -> OpenApiDocument {
        for schema in self.document.components.schemas.values_mut() {
            for filter in &self.filters {
                filter.filter(schema);
            }
        }
        self.document
    }
}

impl Default for OpenApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Component key for a root type. Keys may only hold `[A-Za-z0-9._-]`, so
/// generic arguments are joined with underscores: `Page<User>` -> `Page_User`.
pub fn component_name(root: &TypeRef) -> String {
    match root {
        TypeRef::Parameterized { raw, arguments } => {
            let mut name = simple_name(raw).to_string();
            for argument in arguments {
                name.push('_');
                name.push_str(&component_name(argument));
            }
            name
        }
        TypeRef::Array(component) => format!("{}Array", component_name(component)),
        TypeRef::Class(name) => simple_name(name).to_string(),
        other => other.to_string(),
    }
}
