//! OpenAPI Type Scanner - OpenAPI component schemas from statically scanned type graphs.
//!
//! Given a root type, the scanner walks the graph of types reachable through
//! its fields and produces an OpenAPI Schema tree. Generic parameters are
//! bound per use site, collections become arrays, maps become objects with
//! `additionalProperties`, enums become string enumerations and cyclic
//! references collapse instead of looping.
//!
//! # Architecture
//!
//! 1. [`type_ref`] - References to types at their use sites
//! 2. [`catalog`] - Read-only index of class structure
//! 3. [`source_loader`] - Builds a catalog from Rust sources
//! 4. [`classifier`] - Maps types to schema type and format
//! 5. [`generics`] - Per-frame type-parameter bindings
//! 6. [`annotation`] and [`overrides`] - Explicit `#[schema(...)]` overrides
//! 7. [`data_object_scanner`] - The traversal that builds [`schema::SchemaNode`] trees
//! 8. [`openapi_builder`] - Collects schemas into an OpenAPI document
//! 9. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_type_scanner::{
//!     config::ScanConfig,
//!     data_object_scanner::scan_named,
//!     openapi_builder::{HiddenFilter, OpenApiBuilder},
//!     serializer::serialize_yaml,
//!     source_loader::SourceLoader,
//! };
//! use std::path::PathBuf;
//!
//! let loaded = SourceLoader::new(PathBuf::from("./my-project")).load().unwrap();
//! let schema = scan_named(&loaded.catalog, "Page<User>", ScanConfig::from_env())
//!     .unwrap()
//!     .expect("Page is defined in the project");
//!
//! let mut builder = OpenApiBuilder::new().with_filter(HiddenFilter);
//! builder.add_schema("Page_User", schema);
//! println!("{}", serialize_yaml(&builder.build()).unwrap());
//! ```
//!
//! For command-line usage, see the [`cli`] module.

pub mod annotation;
pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod data_object_scanner;
pub mod error;
pub mod generics;
pub mod openapi_builder;
pub mod overrides;
pub mod schema;
pub mod serializer;
pub mod source_loader;
pub mod type_ref;
