use crate::catalog::{ClassKind, TypeCatalog};
use crate::config::ScanConfig;
use crate::data_object_scanner::parse_root;
use crate::openapi_builder::{HiddenFilter, OpenApiBuilder};
use crate::serializer::{read_document, serialize, write_to_file, OutputFormat};
use crate::source_loader::SourceLoader;
use crate::type_ref::TypeRef;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

/// OpenAPI Type Scanner - Generate OpenAPI component schemas from the data types of a Rust project
#[derive(Parser, Debug)]
#[command(name = "openapi-type-scanner")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// JSON or YAML type catalog merged over the types found in sources
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalog_path: Option<PathBuf>,

    /// Root type to scan, e.g. `User` or `Page<User>` (repeatable; defaults to every non-enum type)
    #[arg(short = 'r', long = "root", value_name = "TYPE")]
    pub roots: Vec<String>,

    /// Existing OpenAPI document to add the schemas to
    #[arg(long = "base", value_name = "FILE")]
    pub base_document: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Do not infer type and format for fields without a #[schema] attribute
    #[arg(long = "no-infer")]
    pub no_infer: bool,

    /// Keep properties marked hidden in the output
    #[arg(long = "keep-hidden")]
    pub keep_hidden: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!("Project path does not exist: {}", args.project_path.display());
    }
    if let Some(catalog) = &args.catalog_path {
        if !catalog.is_file() {
            anyhow::bail!("Catalog file does not exist: {}", catalog.display());
        }
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Loading types from {}", args.project_path.display());
    let loaded = SourceLoader::new(args.project_path.clone()).load()?;
    let mut catalog = loaded.catalog;

    if let Some(path) = &args.catalog_path {
        let extra = TypeCatalog::from_file(path)
            .with_context(|| format!("Failed to load type catalog: {}", path.display()))?;
        info!("Merging {} catalogued types from {}", extra.len(), path.display());
        catalog.merge(extra);
    }

    if catalog.is_empty() {
        anyhow::bail!("No data types found in {}", args.project_path.display());
    }

    let roots = select_roots(&args.roots, &catalog)?;
    info!("Scanning {} root types", roots.len());

    let config = ScanConfig::from_env();
    let config = if args.no_infer { config.with_inference(false) } else { config };

    let mut builder = OpenApiBuilder::new();
    if let Some(path) = &args.base_document {
        builder = builder.with_base_document(read_document(path)?);
    }
    if !args.keep_hidden {
        builder = builder.with_filter(HiddenFilter);
    }

    let generated = builder.scan_roots(&catalog, &roots, config)?;
    if generated == 0 {
        warn!("No schemas were generated");
    }
    let document = builder.build();

    let content = serialize(&document, args.output_format)?;
    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Successfully wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Summary:");
    info!("  - Files parsed: {}", loaded.files_parsed);
    info!("  - Types catalogued: {}", catalog.len());
    info!("  - Schemas generated: {}", generated);
    info!("  - Warnings: {}", loaded.warnings.len());

    Ok(())
}

/// Parses the requested roots, or picks every catalogued non-enum class.
pub fn select_roots(requested: &[String], catalog: &TypeCatalog) -> Result<Vec<TypeRef>> {
    if requested.is_empty() {
        return Ok(catalog
            .class_names()
            .into_iter()
            .filter(|name| {
                catalog
                    .lookup_class(name)
                    .is_some_and(|class| class.kind != ClassKind::Enum && class.type_params.is_empty())
            })
            .map(TypeRef::class)
            .collect());
    }

    requested
        .iter()
        .map(|root| parse_root(root).with_context(|| format!("Invalid root type: {}", root)))
        .collect()
}
