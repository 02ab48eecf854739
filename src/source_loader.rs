//! Builds a [`TypeCatalog`] by statically reading Rust sources.
//!
//! Every `struct` with named fields becomes a class and every `enum` becomes
//! an enum class whose constants are its variants. Serde attributes shape the
//! wire names the same way serde would, and `#[schema(...)]` attributes are
//! carried through as annotations.

use crate::annotation::{Annotation, AnnotationValue, SCHEMA_ANNOTATION};
use crate::catalog::{is_builtin_map, ClassDescriptor, ClassKind, FieldDescriptor, TypeCatalog};
use crate::type_ref::TypeRef;
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use syn::meta::ParseNestedMeta;
use syn::visit::Visit;
use walkdir::WalkDir;

/// Loads every Rust source file under a project directory into a catalog.
///
/// Directories named `target` and hidden directories are skipped. Files that
/// fail to read or parse are reported as warnings and left out.
///
/// # Example
///
/// ```no_run
/// use openapi_type_scanner::source_loader::SourceLoader;
/// use std::path::PathBuf;
///
/// let loaded = SourceLoader::new(PathBuf::from("./my-project")).load().unwrap();
/// println!("Catalogued {} types", loaded.catalog.len());
/// ```
pub struct SourceLoader {
    root_path: PathBuf,
}

/// Outcome of loading a project
pub struct LoadResult {
    pub catalog: TypeCatalog,
    /// Number of files that parsed successfully
    pub files_parsed: usize,
    /// Problems encountered along the way (unreadable paths, syntax errors)
    pub warnings: Vec<String>,
}

impl SourceLoader {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Walks the project and catalogues every type it finds.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path does not exist.
    pub fn load(&self) -> Result<LoadResult> {
        if !self.root_path.exists() {
            bail!("Project path does not exist: {}", self.root_path.display());
        }

        let (files, mut warnings) = self.rust_files();
        debug!("Found {} Rust files under {}", files.len(), self.root_path.display());

        let mut catalog = TypeCatalog::new();
        let mut files_parsed = 0;
        for path in &files {
            match Self::load_file(path) {
                Ok(classes) => {
                    files_parsed += 1;
                    for class in classes {
                        catalog.insert(class);
                    }
                }
                Err(e) => {
                    let warning = format!("Skipping {}: {:#}", path.display(), e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        info!("Catalogued {} types from {} files", catalog.len(), files_parsed);
        Ok(LoadResult {
            catalog,
            files_parsed,
            warnings,
        })
    }

    /// Reads and parses a single source file.
    pub fn load_file(path: &Path) -> Result<Vec<ClassDescriptor>> {
        debug!("Parsing file: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        parse_source(&content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))
    }

    fn rust_files(&self) -> (Vec<PathBuf>, Vec<String>) {
        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path).into_iter().filter_entry(|e| {
            if e.path() == self.root_path {
                return true;
            }
            let file_name = e.file_name().to_string_lossy();
            !file_name.starts_with('.') && file_name != "target"
        }) {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        rust_files.sort();
        (rust_files, warnings)
    }
}

/// Extracts class descriptors from Rust source text.
pub fn parse_source(source: &str) -> syn::Result<Vec<ClassDescriptor>> {
    let file = syn::parse_file(source)?;
    let mut visitor = TypeVisitor::default();
    visitor.visit_file(&file);
    Ok(visitor.classes)
}

/// Collects type declarations, including those in inline modules
#[derive(Default)]
struct TypeVisitor {
    classes: Vec<ClassDescriptor>,
}

impl<'ast> Visit<'ast> for TypeVisitor {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        if let Some(class) = class_from_struct(node) {
            self.classes.push(class);
        }
        syn::visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.classes.push(class_from_enum(node));
        syn::visit::visit_item_enum(self, node);
    }

    // Items local to function bodies are not reachable by name.
    fn visit_item_fn(&mut self, _node: &'ast syn::ItemFn) {}
}

fn class_from_struct(item: &syn::ItemStruct) -> Option<ClassDescriptor> {
    let name = item.ident.to_string();
    let syn::Fields::Named(named) = &item.fields else {
        debug!("Skipping struct {}: no named fields", name);
        return None;
    };
    debug!("Parsing struct definition: {}", name);

    let type_params: Vec<String> = item.generics.type_params().map(|p| p.ident.to_string()).collect();
    let container = SerdeAttributes::parse(&item.attrs);

    let mut class = ClassDescriptor::new(name.clone());
    class.type_params = type_params.clone();
    class.annotations.extend(schema_annotation(&item.attrs, &name));

    for field in &named.named {
        let Some(ident) = &field.ident else { continue };
        let field_name = ident.to_string().trim_start_matches("r#").to_string();
        let serde_attrs = SerdeAttributes::parse(&field.attrs);

        if serde_attrs.skip {
            debug!("Skipping {}.{}: serde skip", name, field_name);
            continue;
        }

        let type_ref = TypeRef::from_syn(&field.ty, &type_params);

        if serde_attrs.flatten {
            match type_ref.name() {
                Some(flattened) if !is_builtin_map(flattened) => {
                    debug!("Flattening {} into {}", flattened, name);
                    class.supertypes.push(flattened.to_string());
                }
                _ => debug!("Skipping {}.{}: flattened map has no fixed properties", name, field_name),
            }
            continue;
        }

        let wire_name = serde_attrs
            .rename
            .or_else(|| container.rename_all.map(|rule| rule.apply_to_field(&field_name)))
            .unwrap_or_else(|| field_name.clone());

        let mut descriptor = FieldDescriptor::new(wire_name, type_ref);
        let owner = format!("{}.{}", name, field_name);
        descriptor.annotations.extend(schema_annotation(&field.attrs, &owner));
        class.fields.push(descriptor);
    }

    debug!("Parsed {} fields", class.fields.len());
    Some(class)
}

fn class_from_enum(item: &syn::ItemEnum) -> ClassDescriptor {
    let name = item.ident.to_string();
    debug!("Parsing enum definition: {}", name);
    let container = SerdeAttributes::parse(&item.attrs);

    let mut class = ClassDescriptor::new(name.clone());
    class.kind = ClassKind::Enum;
    class.annotations.extend(schema_annotation(&item.attrs, &name));

    for variant in &item.variants {
        let serde_attrs = SerdeAttributes::parse(&variant.attrs);
        if serde_attrs.skip {
            continue;
        }
        let variant_name = variant.ident.to_string();
        let constant = serde_attrs
            .rename
            .or_else(|| container.rename_all.map(|rule| rule.apply_to_variant(&variant_name)))
            .unwrap_or(variant_name);
        class
            .fields
            .push(FieldDescriptor::new(constant, TypeRef::class(name.clone())).into_static());
    }

    debug!("Parsed {} variants", class.fields.len());
    class
}

/// The serde attributes that change a type's wire shape
#[derive(Debug, Default)]
struct SerdeAttributes {
    rename: Option<String>,
    rename_all: Option<RenameRule>,
    skip: bool,
    flatten: bool,
}

impl SerdeAttributes {
    fn parse(attrs: &[syn::Attribute]) -> Self {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            if let Err(e) = attr.parse_nested_meta(|meta| parsed.read(meta)) {
                warn!("Ignoring unreadable serde attribute: {}", e);
            }
        }
        parsed
    }

    fn read(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
            self.rename = Some(meta.value()?.parse::<syn::LitStr>()?.value());
        } else if meta.path.is_ident("rename_all") && meta.input.peek(syn::Token![=]) {
            let rule = meta.value()?.parse::<syn::LitStr>()?.value();
            self.rename_all = RenameRule::from_name(&rule);
            if self.rename_all.is_none() {
                warn!("Unknown serde rename_all rule: {}", rule);
            }
        } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
            self.skip = true;
        } else if meta.path.is_ident("flatten") {
            self.flatten = true;
        } else {
            skip_value(&meta)?;
        }
        Ok(())
    }
}

/// Consumes whatever follows a meta path we do not care about.
fn skip_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_value(&nested))?;
    }
    Ok(())
}

/// Serde's `rename_all` conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "lowercase" => Some(RenameRule::Lower),
            "UPPERCASE" => Some(RenameRule::Upper),
            "PascalCase" => Some(RenameRule::Pascal),
            "camelCase" => Some(RenameRule::Camel),
            "snake_case" => Some(RenameRule::Snake),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnake),
            "kebab-case" => Some(RenameRule::Kebab),
            "SCREAMING-KEBAB-CASE" => Some(RenameRule::ScreamingKebab),
            _ => None,
        }
    }

    /// Renames a snake_case field
    fn apply_to_field(self, field: &str) -> String {
        match self {
            RenameRule::Lower | RenameRule::Snake => field.to_string(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => field.split('_').map(capitalize).collect(),
            RenameRule::Camel => {
                let pascal: String = field.split('_').map(capitalize).collect();
                lowercase_first(&pascal)
            }
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => field.replace('_', "-").to_ascii_uppercase(),
        }
    }

    /// Renames a PascalCase variant
    fn apply_to_variant(self, variant: &str) -> String {
        match self {
            RenameRule::Pascal => variant.to_string(),
            RenameRule::Lower => variant.to_ascii_lowercase(),
            RenameRule::Upper => variant.to_ascii_uppercase(),
            RenameRule::Camel => lowercase_first(variant),
            RenameRule::Snake => pascal_to_snake(variant),
            RenameRule::ScreamingSnake => pascal_to_snake(variant).to_ascii_uppercase(),
            RenameRule::Kebab => pascal_to_snake(variant).replace('_', "-"),
            RenameRule::ScreamingKebab => pascal_to_snake(variant).replace('_', "-").to_ascii_uppercase(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn pascal_to_snake(word: &str) -> String {
    let mut snake = String::new();
    for (i, ch) in word.char_indices() {
        if i > 0 && ch.is_uppercase() {
            snake.push('_');
        }
        snake.extend(ch.to_lowercase());
    }
    snake
}

/// Reads the `#[schema(...)]` attribute, if any. An unreadable attribute is
/// reported and dropped so the element falls back to inferred values.
fn schema_annotation(attrs: &[syn::Attribute], owner: &str) -> Option<Annotation> {
    let attr = attrs.iter().find(|attr| attr.path().is_ident(SCHEMA_ANNOTATION))?;
    match parse_schema_attribute(attr) {
        Ok(annotation) => Some(annotation),
        Err(e) => {
            warn!("Ignoring unreadable #[schema] attribute on {}: {}", owner, e);
            None
        }
    }
}

fn parse_schema_attribute(attr: &syn::Attribute) -> syn::Result<Annotation> {
    let mut annotation = Annotation::new(SCHEMA_ANNOTATION);
    if let syn::Meta::Path(_) = attr.meta {
        return Ok(annotation);
    }

    attr.parse_nested_meta(|meta| {
        let property = meta
            .path
            .get_ident()
            .map(ToString::to_string)
            .ok_or_else(|| meta.error("expected a property name"))?;
        let value = if meta.input.peek(syn::Token![=]) {
            annotation_value(&meta.value()?.parse::<syn::Expr>()?)?
        } else {
            // A bare flag such as `required`
            AnnotationValue::Bool(true)
        };
        annotation.values.insert(property, value);
        Ok(())
    })?;

    Ok(annotation)
}

fn annotation_value(expr: &syn::Expr) -> syn::Result<AnnotationValue> {
    match expr {
        syn::Expr::Lit(expr_lit) => literal_value(&expr_lit.lit, false),
        syn::Expr::Unary(syn::ExprUnary {
            op: syn::UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            syn::Expr::Lit(expr_lit) => literal_value(&expr_lit.lit, true),
            other => Err(syn::Error::new_spanned(other, "expected a numeric literal")),
        },
        syn::Expr::Array(array) => array
            .elems
            .iter()
            .map(|elem| match elem {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(text),
                    ..
                }) => Ok(text.value()),
                other => Err(syn::Error::new_spanned(other, "expected a string literal")),
            })
            .collect::<syn::Result<Vec<_>>>()
            .map(AnnotationValue::StringList),
        other => Err(syn::Error::new_spanned(other, "unsupported schema attribute value")),
    }
}

fn literal_value(lit: &syn::Lit, negative: bool) -> syn::Result<AnnotationValue> {
    match lit {
        syn::Lit::Str(text) if !negative => Ok(AnnotationValue::String(text.value())),
        syn::Lit::Bool(flag) if !negative => Ok(AnnotationValue::Bool(flag.value)),
        syn::Lit::Int(int) => {
            let value = int.base10_parse::<i64>()?;
            Ok(AnnotationValue::Int(if negative { -value } else { value }))
        }
        syn::Lit::Float(float) => {
            let value = float.base10_parse::<f64>()?;
            Ok(AnnotationValue::Double(if negative { -value } else { value }))
        }
        other => Err(syn::Error::new_spanned(other, "unsupported literal")),
    }
}
