//! Converts a class graph into a [`SchemaNode`] tree.
//!
//! The scan is a depth-first walk over *types*, driven by an explicit work
//! stack. Each unit of pending work is a frame pairing a class with the node
//! it writes into and the generic bindings in effect. Frames live in an arena
//! and point at their parent by index, so the cycle guard is a walk up the
//! ancestor chain rather than a lookup in the live stack.
//!
//! Output nodes live in a second arena and are linked by id while the scan is
//! running; the owned tree is assembled once the stack drains.

use crate::annotation::{find_schema_annotation, Annotation};
use crate::catalog::{ClassDescriptor, FieldDescriptor, TypeCatalog};
use crate::classifier::{classify, is_terminal, TypeFormat};
use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::generics::{self, build_bindings, Bindings};
use crate::overrides::{SchemaOverride, Substitution};
use crate::schema::{SchemaNode, SchemaType};
use crate::type_ref::TypeRef;
use indexmap::IndexMap;
use log::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameId(usize);

/// Where a node hangs in the tree
#[derive(Debug, Clone, Default)]
enum Attachment {
    Root,
    Property(NodeId, String),
    Items(NodeId),
    AdditionalProperties(NodeId),
    #[default]
    Detached,
}

#[derive(Debug, Default)]
struct ArenaNode {
    data: SchemaNode,
    attachment: Attachment,
    properties: IndexMap<String, NodeId>,
    items: Option<NodeId>,
    additional_properties: Option<NodeId>,
}

/// Schema nodes under construction
#[derive(Debug)]
struct SchemaArena {
    nodes: Vec<ArenaNode>,
    root: NodeId,
}

impl SchemaArena {
    fn new() -> Self {
        let root = ArenaNode {
            attachment: Attachment::Root,
            ..ArenaNode::default()
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    fn alloc(&mut self, data: SchemaNode, attachment: Attachment) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ArenaNode {
            data,
            attachment,
            ..ArenaNode::default()
        });
        id
    }

    fn node_mut(&mut self, id: NodeId) -> &mut SchemaNode {
        &mut self.nodes[id.0].data
    }

    fn detach(&mut self, id: Option<NodeId>) {
        if let Some(id) = id {
            self.nodes[id.0].attachment = Attachment::Detached;
        }
    }

    /// Attaches a fresh, empty property node under `parent`.
    fn add_property(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.alloc(SchemaNode::new(), Attachment::Property(parent, name.to_string()));
        let previous = self.nodes[parent.0].properties.insert(name.to_string(), id);
        self.detach(previous);
        id
    }

    fn new_items(&mut self, parent: NodeId) -> NodeId {
        let id = self.alloc(SchemaNode::new(), Attachment::Items(parent));
        let previous = self.nodes[parent.0].items.replace(id);
        self.detach(previous);
        id
    }

    fn new_additional_properties(&mut self, parent: NodeId) -> NodeId {
        let id = self.alloc(SchemaNode::new(), Attachment::AdditionalProperties(parent));
        let previous = self.nodes[parent.0].additional_properties.replace(id);
        self.detach(previous);
        id
    }

    /// Puts `data` where `old` hangs and returns the new node's id.
    ///
    /// If `old` has already been displaced the replacement stays detached.
    fn replace(&mut self, old: NodeId, data: SchemaNode) -> NodeId {
        let attachment = self.nodes[old.0].attachment.clone();
        let new = self.alloc(data, Attachment::Detached);
        let linked = match &attachment {
            Attachment::Root => swap_if(&mut self.root, old, new),
            Attachment::Property(parent, name) => match self.nodes[parent.0].properties.get_mut(name) {
                Some(slot) => swap_if(slot, old, new),
                None => false,
            },
            Attachment::Items(parent) => match self.nodes[parent.0].items.as_mut() {
                Some(slot) => swap_if(slot, old, new),
                None => false,
            },
            Attachment::AdditionalProperties(parent) => {
                match self.nodes[parent.0].additional_properties.as_mut() {
                    Some(slot) => swap_if(slot, old, new),
                    None => false,
                }
            }
            Attachment::Detached => false,
        };
        if linked {
            self.nodes[new.0].attachment = attachment;
            self.nodes[old.0].attachment = Attachment::Detached;
        } else {
            trace!("Replacement for a detached node stays detached");
        }
        new
    }

    fn into_tree(mut self) -> SchemaNode {
        let root = self.root;
        self.assemble(root)
    }

    fn assemble(&mut self, id: NodeId) -> SchemaNode {
        let entry = std::mem::take(&mut self.nodes[id.0]);
        let mut data = entry.data;
        for (name, child) in entry.properties {
            let child = self.assemble(child);
            data.properties.insert(name, child);
        }
        if let Some(items) = entry.items {
            data.items = Some(Box::new(self.assemble(items)));
        }
        if let Some(additional) = entry.additional_properties {
            data.additional_properties = Some(Box::new(self.assemble(additional)));
        }
        data
    }
}

fn swap_if(slot: &mut NodeId, old: NodeId, new: NodeId) -> bool {
    if *slot == old {
        *slot = new;
        true
    } else {
        false
    }
}

/// One unit of pending expansion
#[derive(Debug)]
struct Frame<'c> {
    class: &'c ClassDescriptor,
    node: NodeId,
    bindings: Bindings,
    parent: Option<FrameId>,
}

/// Scans a single root type against a catalog.
///
/// A scanner is cheap to build; each call to [`DataObjectScanner::process`]
/// runs an independent traversal with its own stack and output tree.
pub struct DataObjectScanner<'c> {
    catalog: &'c TypeCatalog,
    root: TypeRef,
    config: ScanConfig,
    /// Implementation classes being substituted by enclosing scans
    substituting: Vec<String>,
}

impl<'c> DataObjectScanner<'c> {
    pub fn new(catalog: &'c TypeCatalog, root: TypeRef, config: ScanConfig) -> Self {
        Self {
            catalog,
            root,
            config,
            substituting: Vec::new(),
        }
    }

    /// Runs the scan.
    ///
    /// Returns `Ok(None)` when the root class is not in the catalog, and an
    /// error when the root is not a concrete type.
    pub fn process(&self) -> Result<Option<SchemaNode>> {
        debug!("Starting processing with root type: {}", self.root);

        if matches!(self.root, TypeRef::TypeVariable(_) | TypeRef::Wildcard(_)) {
            return Err(Error::InvalidArgument(format!(
                "cannot scan non-concrete root type `{}`",
                self.root
            )));
        }

        let root_format = classify(&self.root);
        if root_format.is_terminal() {
            return Ok(Some(SchemaNode::typed(root_format.kind, root_format.format)));
        }

        let mut traversal = Traversal::new(self);
        if !traversal.start(&self.root) {
            return Ok(None);
        }
        traversal.run();
        Ok(Some(traversal.finish()))
    }

    fn nested(&self, implementation: &str) -> DataObjectScanner<'c> {
        let mut substituting = self.substituting.clone();
        substituting.push(implementation.to_string());
        DataObjectScanner {
            catalog: self.catalog,
            root: TypeRef::class(implementation),
            config: self.config,
            substituting,
        }
    }
}

/// Scans `root` with a fresh scanner.
pub fn scan(catalog: &TypeCatalog, root: &TypeRef, config: ScanConfig) -> Result<Option<SchemaNode>> {
    DataObjectScanner::new(catalog, root.clone(), config).process()
}

/// Scans a root given as text; see [`parse_root`].
pub fn scan_named(catalog: &TypeCatalog, root: &str, config: ScanConfig) -> Result<Option<SchemaNode>> {
    scan(catalog, &parse_root(root)?, config)
}

/// Parses a root type written as Rust type syntax (`Page<User>`) or as a
/// dotted class name (`com.example.User`).
pub fn parse_root(text: &str) -> Result<TypeRef> {
    let trimmed = text.trim();
    if trimmed.contains('.') && !trimmed.contains('<') {
        Ok(TypeRef::class(trimmed))
    } else {
        TypeRef::parse(trimmed)
    }
}

/// Per-scan mutable state
struct Traversal<'a, 'c> {
    scanner: &'a DataObjectScanner<'c>,
    arena: SchemaArena,
    frames: Vec<Frame<'c>>,
    stack: Vec<FrameId>,
}

impl<'a, 'c> Traversal<'a, 'c> {
    fn new(scanner: &'a DataObjectScanner<'c>) -> Self {
        Self {
            scanner,
            arena: SchemaArena::new(),
            frames: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Seeds the stack. Returns false when the root cannot be introspected.
    fn start(&mut self, root: &TypeRef) -> bool {
        let root_node = self.arena.root;

        if self.is_structural(root) {
            let logical = self.resolve_type(root, root_node, None);
            self.set_type(root_node, classify(&logical));
            return true;
        }

        let catalog = self.scanner.catalog;
        let Some(class) = root.name().and_then(|name| catalog.lookup_class(name)) else {
            debug!("Root type {} is not in the catalog", root);
            return false;
        };

        let bindings = match root {
            TypeRef::Parameterized { arguments, .. } => build_bindings(class, arguments),
            _ => Bindings::new(),
        };
        self.arena.node_mut(root_node).schema_type = Some(SchemaType::Object);
        self.push(class, root_node, bindings, None);
        true
    }

    fn run(&mut self) {
        let mut expanded = 0usize;
        while let Some(frame) = self.stack.pop() {
            self.expand(frame);
            expanded += 1;
        }
        debug!("Scan finished after expanding {} frames", expanded);
    }

    fn finish(self) -> SchemaNode {
        self.arena.into_tree()
    }

    fn expand(&mut self, frame: FrameId) {
        let class = self.frames[frame.0].class;
        let catalog = self.scanner.catalog;
        trace!("Expanding {}", class.name);

        // Class annotations first; they may substitute the frame's node.
        let node = match find_schema_annotation(&class.annotations) {
            Some(annotation) => self.read_class_annotation(frame, annotation),
            None => self.frames[frame.0].node,
        };

        for field in catalog.all_fields(class) {
            trace!("Iterating field {}.{}", class.name, field.name);
            self.process_field(field, node, frame);
        }
    }

    fn read_class_annotation(&mut self, frame: FrameId, annotation: &Annotation) -> NodeId {
        let class = self.frames[frame.0].class;
        let node = self.frames[frame.0].node;

        let schema_override = match SchemaOverride::from_annotation(annotation) {
            Ok(schema_override) => schema_override,
            Err(e) => {
                warn!("Ignoring malformed schema annotation on class {}: {}", class.name, e);
                return node;
            }
        };
        debug!("Processing schema annotation on class {}", class.name);

        if schema_override.hidden {
            self.arena.node_mut(node).hidden = true;
            return node;
        }

        let implementation = self.implementation_schema(&schema_override);
        match schema_override.apply(self.arena.node_mut(node), None, implementation) {
            Substitution::InPlace => node,
            Substitution::Replaced(replacement) => {
                let replaced = self.arena.replace(node, replacement);
                self.frames[frame.0].node = replaced;
                replaced
            }
        }
    }

    fn process_field(&mut self, field: &FieldDescriptor, parent: NodeId, frame: FrameId) {
        let property = self.arena.add_property(parent, &field.name);

        match find_schema_annotation(&field.annotations) {
            Some(annotation) => self.read_annotated_field(field, annotation, parent, property, frame),
            None => self.read_unannotated_field(field, property, frame),
        }
    }

    fn read_annotated_field(
        &mut self,
        field: &FieldDescriptor,
        annotation: &Annotation,
        parent: NodeId,
        property: NodeId,
        frame: FrameId,
    ) {
        let schema_override = match SchemaOverride::from_annotation(annotation) {
            Ok(schema_override) => schema_override,
            Err(e) => {
                warn!(
                    "Ignoring malformed schema annotation on field {}.{}: {}",
                    self.frames[frame.0].class.name, field.name, e
                );
                self.infer_field(field, property, frame);
                return;
            }
        };
        debug!("Processing schema annotation on field {}", field.name);

        // Hidden fields keep their placeholder, flagged for later filtering.
        if schema_override.hidden {
            self.arena.node_mut(property).hidden = true;
            return;
        }

        // Required belongs to the parent schema.
        if schema_override.required {
            self.arena.node_mut(parent).required.insert(field.name.clone());
        }

        let implementation = if schema_override.reference.is_some() {
            None
        } else {
            self.implementation_schema(&schema_override)
        };

        // A replaced property is detached, so its declared type is not expanded.
        let defaults = if schema_override.reference.is_some() || implementation.is_some() {
            classify(&field.type_ref)
        } else {
            // The type may be replaced (e.g. generics).
            let logical = self.resolve_type(&field.type_ref, property, Some(frame));
            classify(&logical)
        };

        if let Substitution::Replaced(replacement) =
            schema_override.apply(self.arena.node_mut(property), Some(defaults), implementation)
        {
            self.arena.replace(property, replacement);
        }
    }

    fn read_unannotated_field(&mut self, field: &FieldDescriptor, property: NodeId, frame: FrameId) {
        if !self.scanner.config.infer_unannotated_fields {
            return;
        }
        trace!("Processing unannotated field {}", field.name);
        self.infer_field(field, property, frame);
    }

    fn infer_field(&mut self, field: &FieldDescriptor, property: NodeId, frame: FrameId) {
        let logical = self.resolve_type(&field.type_ref, property, Some(frame));
        let inferred = classify(&logical);
        let node = self.arena.node_mut(property);
        node.schema_type = Some(inferred.kind);
        if let Some(format) = inferred.format {
            node.format = Some(format.to_string());
        }
    }

    /// Scans the override's implementation class on its own stack.
    fn implementation_schema(&self, schema_override: &SchemaOverride) -> Option<SchemaNode> {
        let name = schema_override.implementation.as_deref()?;
        if self.scanner.substituting.iter().any(|active| active == name) {
            debug!("Implementation {} is already being substituted; not substituting again", name);
            return None;
        }

        match self.scanner.nested(name).process() {
            Ok(Some(schema)) => Some(schema),
            Ok(None) => {
                debug!("Implementation class {} is not in the catalog", name);
                None
            }
            Err(e) => {
                warn!("Could not scan implementation class {}: {}", name, e);
                None
            }
        }
    }

    /// Resolves a field's declared type, writing structural information into
    /// `node` and pushing frames for anything that needs expanding.
    ///
    /// Returns the logical type whose classification describes `node`.
    fn resolve_type(&mut self, type_ref: &TypeRef, node: NodeId, frame: Option<FrameId>) -> TypeRef {
        if is_terminal(type_ref) {
            return type_ref.clone();
        }

        match type_ref {
            TypeRef::Class(name) if self.scanner.catalog.is_enum(name) => self.read_enum(name, node),
            TypeRef::Class(name) => {
                self.push_class(name, node, frame);
                type_ref.clone()
            }
            TypeRef::Parameterized { raw, arguments } => {
                self.read_parameterized(raw, arguments, node, frame)
            }
            TypeRef::Array(component) => self.read_array(component, node, frame),
            TypeRef::TypeVariable(name) => self.read_type_variable(name, node, frame),
            TypeRef::Wildcard(bound) => {
                let bound = bound.as_deref().cloned().unwrap_or_else(TypeRef::object);
                self.resolve_type(&bound, node, frame)
            }
            TypeRef::Primitive(_) => type_ref.clone(),
        }
    }

    /// Resolves `type_ref` into `target` and types the target from the result.
    fn resolve_into(&mut self, type_ref: &TypeRef, target: NodeId, frame: Option<FrameId>) {
        let logical = self.resolve_type(type_ref, target, frame);
        self.set_type(target, classify(&logical));
    }

    fn read_enum(&mut self, name: &str, node: NodeId) -> TypeRef {
        debug!("Processing an enum {}", name);
        let catalog = self.scanner.catalog;
        if let Some(class) = catalog.lookup_class(name) {
            // Constants are the fields typed as the enum itself.
            let constants = class.fields.iter().filter(|field| {
                field.name != "$VALUES" && field.type_ref == TypeRef::Class(class.name.clone())
            });
            let schema = self.arena.node_mut(node);
            for constant in constants {
                schema.enumeration.push(constant.name.clone());
            }
        }
        TypeRef::string()
    }

    fn read_parameterized(
        &mut self,
        raw: &str,
        arguments: &[TypeRef],
        node: NodeId,
        frame: Option<FrameId>,
    ) -> TypeRef {
        let catalog = self.scanner.catalog;
        let arguments: Vec<TypeRef> = arguments.iter().map(|arg| self.substitute(arg, frame)).collect();
        debug!("Processing parameterized type {}<{} arguments>", raw, arguments.len());

        if catalog.is_collection(raw) {
            debug!("Processing collection {}. Will treat as an array.", raw);
            self.arena.node_mut(node).schema_type = Some(SchemaType::Array);
            let items = self.arena.new_items(node);
            for argument in &arguments {
                self.resolve_into(argument, items, frame);
            }
            return TypeRef::array(TypeRef::object());
        }

        if catalog.is_map(raw) {
            debug!("Processing map {}. Will treat as an object.", raw);
            self.arena.node_mut(node).schema_type = Some(SchemaType::Object);
            if let [_, value] = arguments.as_slice() {
                let additional = self.arena.new_additional_properties(node);
                self.resolve_into(value, additional, frame);
            }
            return TypeRef::object();
        }

        match catalog.lookup_class(raw) {
            Some(class) => {
                let bindings = build_bindings(class, &arguments);
                self.push(class, node, bindings, frame);
            }
            None => debug!("Class {} is not in the catalog; leaving it unexpanded", raw),
        }
        TypeRef::parameterized(raw, arguments)
    }

    fn read_array(&mut self, component: &TypeRef, node: NodeId, frame: Option<FrameId>) -> TypeRef {
        let component = self.substitute(component, frame);
        debug!("Processing an array of {}", component);
        self.arena.node_mut(node).schema_type = Some(SchemaType::Array);
        let items = self.arena.new_items(node);
        self.resolve_into(&component, items, frame);
        TypeRef::array(component)
    }

    fn read_type_variable(&mut self, name: &str, node: NodeId, frame: Option<FrameId>) -> TypeRef {
        let resolved = match frame {
            Some(frame) => generics::resolve(name, &self.frames[frame.0].bindings),
            None => TypeRef::object(),
        };
        debug!("Resolved type variable {} -> {}", name, resolved);

        let absent = resolved
            .name()
            .map_or(true, |class| self.scanner.catalog.lookup_class(class).is_none());
        if !self.is_structural(&resolved) && (is_terminal(&resolved) || absent) {
            trace!("Is a terminal type {}", resolved);
            self.set_type(node, classify(&resolved));
            return resolved;
        }

        debug!("Attempting type variable substitution: {} -> {}", name, resolved);
        self.resolve_type(&resolved, node, frame)
    }

    fn push_class(&mut self, name: &str, node: NodeId, frame: Option<FrameId>) {
        let catalog = self.scanner.catalog;
        match catalog.lookup_class(name) {
            Some(class) => self.push(class, node, Bindings::new(), frame),
            None => debug!("Class {} is not in the catalog; leaving it unexpanded", name),
        }
    }

    /// Queues `class` for expansion into `node` unless it would close a cycle.
    fn push(&mut self, class: &'c ClassDescriptor, node: NodeId, bindings: Bindings, parent: Option<FrameId>) {
        if let Some(parent) = parent {
            if self.has_ancestor(parent, &class.name) {
                debug!("Possible cycle was detected in: {}. Will not search further.", class.name);
                trace!("Path: {}", self.describe_path(parent));
                return;
            }
        }

        debug!("Adding child node to path: {}", class.name);
        let id = FrameId(self.frames.len());
        self.frames.push(Frame {
            class,
            node,
            bindings,
            parent,
        });
        self.stack.push(id);
    }

    /// Walks the ancestor chain starting at `frame`, comparing class identity only.
    fn has_ancestor(&self, frame: FrameId, class_name: &str) -> bool {
        let mut current = Some(frame);
        while let Some(id) = current {
            let entry = &self.frames[id.0];
            if entry.class.name == class_name {
                return true;
            }
            current = entry.parent;
        }
        false
    }

    fn describe_path(&self, frame: FrameId) -> String {
        let mut names = Vec::new();
        let mut current = Some(frame);
        while let Some(id) = current {
            names.push(self.frames[id.0].class.name.as_str());
            current = self.frames[id.0].parent;
        }
        names.reverse();
        names.join(" -> ")
    }

    /// Types that are expanded through a dedicated branch rather than by
    /// looking their own class up in the catalog.
    fn is_structural(&self, type_ref: &TypeRef) -> bool {
        let catalog = self.scanner.catalog;
        match type_ref {
            TypeRef::Array(_) => !is_terminal(type_ref),
            TypeRef::Parameterized { raw, .. } => catalog.is_collection(raw) || catalog.is_map(raw),
            TypeRef::Class(name) => catalog.is_enum(name),
            _ => false,
        }
    }

    fn substitute(&self, type_ref: &TypeRef, frame: Option<FrameId>) -> TypeRef {
        match frame {
            Some(frame) => generics::substitute(type_ref, &self.frames[frame.0].bindings),
            None => type_ref.clone(),
        }
    }

    fn set_type(&mut self, node: NodeId, format: TypeFormat) {
        let schema = self.arena.node_mut(node);
        schema.schema_type = Some(format.kind);
        schema.format = format.format.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationValue, SCHEMA_ANNOTATION};
    use crate::catalog::ClassDescriptor;
    use crate::type_ref::PrimitiveType;

    fn schema_annotation(values: &[(&str, AnnotationValue)]) -> Annotation {
        values.iter().fold(Annotation::new(SCHEMA_ANNOTATION), |annotation, (key, value)| {
            annotation.with(*key, value.clone())
        })
    }

    fn field(name: &str, ty: TypeRef) -> FieldDescriptor {
        FieldDescriptor::new(name, ty)
    }

    fn list_of(ty: TypeRef) -> TypeRef {
        TypeRef::parameterized("java.util.List", vec![ty])
    }

    fn process(catalog: &TypeCatalog, root: TypeRef) -> SchemaNode {
        DataObjectScanner::new(catalog, root, ScanConfig::default())
            .process()
            .unwrap()
            .expect("root should be introspectable")
    }

    #[test]
    fn test_terminal_root_yields_single_node() {
        let schema = process(&TypeCatalog::new(), TypeRef::Primitive(PrimitiveType::I64));
        assert_eq!(schema, SchemaNode::typed(SchemaType::Integer, Some("int64")));
    }

    #[test]
    fn test_absent_root_yields_none() {
        let result = scan(&TypeCatalog::new(), &TypeRef::class("Missing"), ScanConfig::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_non_concrete_root_is_rejected() {
        let result = scan(&TypeCatalog::new(), &TypeRef::type_variable("T"), ScanConfig::default());
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        let result = scan_named(&TypeCatalog::new(), "   ", ScanConfig::default());
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_simple_class() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("User")
                .with_field(field("id", TypeRef::Primitive(PrimitiveType::I64)))
                .with_field(field("name", TypeRef::string()))
                .with_field(field("active", TypeRef::class("java.lang.Boolean")))
                .with_field(field("created", TypeRef::class("java.time.OffsetDateTime"))),
        );
        let schema = process(&catalog, TypeRef::class("User"));

        assert_eq!(schema.schema_type, Some(SchemaType::Object));
        let names: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "name", "active", "created"]);
        assert_eq!(schema.property("id").unwrap().format.as_deref(), Some("int64"));
        assert_eq!(schema.property("name").unwrap().schema_type, Some(SchemaType::String));
        assert_eq!(schema.property("active").unwrap().schema_type, Some(SchemaType::Boolean));
        assert_eq!(schema.property("created").unwrap().format.as_deref(), Some("date-time"));
    }

    #[test]
    fn test_nested_object_is_expanded() {
        let catalog = TypeCatalog::new()
            .with_class(ClassDescriptor::new("User").with_field(field("address", TypeRef::class("Address"))))
            .with_class(ClassDescriptor::new("Address").with_field(field("city", TypeRef::string())));
        let schema = process(&catalog, TypeRef::class("User"));

        let address = schema.property("address").unwrap();
        assert_eq!(address.schema_type, Some(SchemaType::Object));
        assert_eq!(address.property("city").unwrap().schema_type, Some(SchemaType::String));
    }

    #[test]
    fn test_collection_of_strings() {
        let catalog = TypeCatalog::new()
            .with_class(ClassDescriptor::new("Post").with_field(field("tags", list_of(TypeRef::string()))));
        let schema = process(&catalog, TypeRef::class("Post"));

        let tags = schema.property("tags").unwrap();
        assert_eq!(tags.schema_type, Some(SchemaType::Array));
        assert_eq!(tags.items.as_ref().unwrap().schema_type, Some(SchemaType::String));
    }

    #[test]
    fn test_map_of_integers() {
        let catalog = TypeCatalog::new().with_class(ClassDescriptor::new("Scores").with_field(field(
            "byName",
            TypeRef::parameterized("java.util.Map", vec![TypeRef::string(), TypeRef::class("Integer")]),
        )));
        let schema = process(&catalog, TypeRef::class("Scores"));

        let by_name = schema.property("byName").unwrap();
        assert_eq!(by_name.schema_type, Some(SchemaType::Object));
        let additional = by_name.additional_properties.as_ref().unwrap();
        assert_eq!(additional.schema_type, Some(SchemaType::Integer));
        assert_eq!(additional.format.as_deref(), Some("int32"));
    }

    #[test]
    fn test_map_of_objects_is_expanded_into_additional_properties() {
        let catalog = TypeCatalog::new()
            .with_class(ClassDescriptor::new("Index").with_field(field(
                "entries",
                TypeRef::parameterized("HashMap", vec![TypeRef::string(), TypeRef::class("Entry")]),
            )))
            .with_class(ClassDescriptor::new("Entry").with_field(field("hits", TypeRef::class("Long"))));
        let schema = process(&catalog, TypeRef::class("Index"));

        let additional = schema.property("entries").unwrap().additional_properties.as_ref().unwrap();
        assert_eq!(additional.schema_type, Some(SchemaType::Object));
        assert_eq!(additional.property("hits").unwrap().format.as_deref(), Some("int64"));
    }

    #[test]
    fn test_map_without_two_arguments_has_no_value_schema() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("Odd")
                .with_field(field(
                    "single",
                    TypeRef::parameterized("java.util.Map", vec![TypeRef::class("Integer")]),
                ))
                .with_field(field(
                    "triple",
                    TypeRef::parameterized(
                        "java.util.Map",
                        vec![TypeRef::string(), TypeRef::string(), TypeRef::class("Integer")],
                    ),
                )),
        );
        let schema = process(&catalog, TypeRef::class("Odd"));

        for name in ["single", "triple"] {
            let map = schema.property(name).unwrap();
            assert_eq!(map.schema_type, Some(SchemaType::Object), "type of {}", name);
            assert!(map.additional_properties.is_none(), "additionalProperties of {}", name);
            assert!(map.properties.is_empty());
        }
    }

    #[test]
    fn test_enum_constants() {
        let mut status = ClassDescriptor::new_enum("Status", &["A", "B"]);
        status.fields.push(
            field("$VALUES", TypeRef::array(TypeRef::class("Status"))).into_static(),
        );
        status.fields.push(field("label", TypeRef::string()));
        let catalog = TypeCatalog::new()
            .with_class(status)
            .with_class(ClassDescriptor::new("Task").with_field(field("status", TypeRef::class("Status"))));
        let schema = process(&catalog, TypeRef::class("Task"));

        let status = schema.property("status").unwrap();
        assert_eq!(status.schema_type, Some(SchemaType::String));
        assert_eq!(status.enumeration, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_self_referential_collection_collapses() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("Node")
                .with_field(field("name", TypeRef::string()))
                .with_field(field("children", list_of(TypeRef::class("Node")))),
        );
        let schema = process(&catalog, TypeRef::class("Node"));

        assert_eq!(schema.property("name").unwrap().schema_type, Some(SchemaType::String));
        let children = schema.property("children").unwrap();
        assert_eq!(children.schema_type, Some(SchemaType::Array));
        let items = children.items.as_ref().unwrap();
        assert_eq!(items.schema_type, Some(SchemaType::Object));
        assert!(items.properties.is_empty());
    }

    #[test]
    fn test_mutual_recursion_terminates() {
        let catalog = TypeCatalog::new()
            .with_class(ClassDescriptor::new("Author").with_field(field("books", list_of(TypeRef::class("Book")))))
            .with_class(ClassDescriptor::new("Book").with_field(field("author", TypeRef::class("Author"))));
        let schema = process(&catalog, TypeRef::class("Author"));

        let book = schema.property("books").unwrap().items.as_ref().unwrap();
        let author = book.property("author").unwrap();
        assert_eq!(author.schema_type, Some(SchemaType::Object));
        assert!(author.properties.is_empty());
    }

    #[test]
    fn test_sibling_branches_expand_the_same_class() {
        let catalog = TypeCatalog::new()
            .with_class(
                ClassDescriptor::new("Order")
                    .with_field(field("billing", TypeRef::class("Address")))
                    .with_field(field("shipping", TypeRef::class("Address"))),
            )
            .with_class(ClassDescriptor::new("Address").with_field(field("city", TypeRef::string())));
        let schema = process(&catalog, TypeRef::class("Order"));

        assert!(schema.property("billing").unwrap().property("city").is_some());
        assert!(schema.property("shipping").unwrap().property("city").is_some());
    }

    #[test]
    fn test_generic_substitution() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("Wrapper")
                .with_type_params(&["T"])
                .with_field(field("value", TypeRef::type_variable("T"))),
        );
        let schema = process(&catalog, TypeRef::parameterized("Wrapper", vec![TypeRef::string()]));

        assert_eq!(schema.property("value").unwrap().schema_type, Some(SchemaType::String));
    }

    #[test]
    fn test_nested_generic_bindings_are_rebuilt_per_frame() {
        let catalog = TypeCatalog::new()
            .with_class(
                ClassDescriptor::new("Envelope")
                    .with_type_params(&["T"])
                    .with_field(field(
                        "page",
                        TypeRef::parameterized("Page", vec![TypeRef::type_variable("T")]),
                    )),
            )
            .with_class(
                ClassDescriptor::new("Page")
                    .with_type_params(&["E"])
                    .with_field(field("first", TypeRef::type_variable("E")))
                    .with_field(field("content", list_of(TypeRef::type_variable("E")))),
            )
            .with_class(ClassDescriptor::new("User").with_field(field("email", TypeRef::string())));
        let schema = process(&catalog, TypeRef::parameterized("Envelope", vec![TypeRef::class("User")]));

        let page = schema.property("page").unwrap();
        let first = page.property("first").unwrap();
        assert_eq!(first.schema_type, Some(SchemaType::Object));
        assert!(first.property("email").is_some());
        let items = page.property("content").unwrap().items.as_ref().unwrap();
        assert!(items.property("email").is_some());
    }

    #[test]
    fn test_type_variable_bound_to_collection() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("Wrapper")
                .with_type_params(&["T"])
                .with_field(field("value", TypeRef::type_variable("T"))),
        );
        let schema = process(
            &catalog,
            TypeRef::parameterized("Wrapper", vec![list_of(TypeRef::class("Integer"))]),
        );

        let value = schema.property("value").unwrap();
        assert_eq!(value.schema_type, Some(SchemaType::Array));
        assert_eq!(value.items.as_ref().unwrap().schema_type, Some(SchemaType::Integer));
    }

    #[test]
    fn test_type_parameter_mismatch_defaults_to_object() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("Pair")
                .with_type_params(&["A", "B"])
                .with_field(field("left", TypeRef::type_variable("A")))
                .with_field(field("right", TypeRef::type_variable("B"))),
        );
        let schema = process(&catalog, TypeRef::parameterized("Pair", vec![TypeRef::string()]));

        assert_eq!(schema.property("left").unwrap().schema_type, Some(SchemaType::String));
        assert_eq!(schema.property("right").unwrap().schema_type, Some(SchemaType::Object));
    }

    #[test]
    fn test_wildcard_binding_uses_upper_bound() {
        let catalog = TypeCatalog::new()
            .with_class(
                ClassDescriptor::new("Holder")
                    .with_type_params(&["T"])
                    .with_field(field("value", TypeRef::type_variable("T"))),
            )
            .with_class(ClassDescriptor::new("Zoo").with_field(field(
                "keeper",
                TypeRef::parameterized(
                    "Holder",
                    vec![TypeRef::Wildcard(Some(Box::new(TypeRef::class("Animal"))))],
                ),
            )))
            .with_class(ClassDescriptor::new("Animal").with_field(field("legs", TypeRef::class("Integer"))));
        let schema = process(&catalog, TypeRef::class("Zoo"));

        let value = schema.property("keeper").unwrap().property("value").unwrap();
        assert_eq!(value.property("legs").unwrap().schema_type, Some(SchemaType::Integer));
    }

    #[test]
    fn test_same_generic_class_on_one_chain_is_a_cycle() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("Box")
                .with_type_params(&["T"])
                .with_field(field("value", TypeRef::type_variable("T")))
                .with_field(field(
                    "next",
                    TypeRef::parameterized("Box", vec![TypeRef::class("Integer")]),
                )),
        );
        let schema = process(&catalog, TypeRef::parameterized("Box", vec![TypeRef::string()]));

        assert_eq!(schema.property("value").unwrap().schema_type, Some(SchemaType::String));
        let next = schema.property("next").unwrap();
        assert_eq!(next.schema_type, Some(SchemaType::Object));
        assert!(next.properties.is_empty());
    }

    #[test]
    fn test_arrays() {
        let catalog = TypeCatalog::new()
            .with_class(
                ClassDescriptor::new("Blob")
                    .with_field(field("data", TypeRef::array(TypeRef::Primitive(PrimitiveType::I8))))
                    .with_field(field("sizes", TypeRef::array(TypeRef::Primitive(PrimitiveType::I32))))
                    .with_field(field("parts", TypeRef::array(TypeRef::class("Part")))),
            )
            .with_class(ClassDescriptor::new("Part").with_field(field("offset", TypeRef::class("Long"))));
        let schema = process(&catalog, TypeRef::class("Blob"));

        let data = schema.property("data").unwrap();
        assert_eq!(data.schema_type, Some(SchemaType::String));
        assert_eq!(data.format.as_deref(), Some("byte"));

        let sizes = schema.property("sizes").unwrap();
        assert_eq!(sizes.schema_type, Some(SchemaType::Array));
        assert_eq!(sizes.items.as_ref().unwrap().format.as_deref(), Some("int32"));

        let parts = schema.property("parts").unwrap().items.as_ref().unwrap();
        assert!(parts.property("offset").is_some());
    }

    #[test]
    fn test_inherited_fields_and_static_fields() {
        let catalog = TypeCatalog::new()
            .with_class(ClassDescriptor::new("Base").with_field(field("id", TypeRef::class("Long"))))
            .with_class(
                ClassDescriptor::new("Derived")
                    .with_supertype("Base")
                    .with_field(field("VERSION", TypeRef::string()).into_static())
                    .with_field(field("label", TypeRef::string())),
            );
        let schema = process(&catalog, TypeRef::class("Derived"));

        let names: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "label"]);
    }

    #[test]
    fn test_absent_field_class_is_left_as_object_placeholder() {
        let catalog = TypeCatalog::new()
            .with_class(ClassDescriptor::new("Event").with_field(field("payload", TypeRef::class("Opaque"))));
        let schema = process(&catalog, TypeRef::class("Event"));

        let payload = schema.property("payload").unwrap();
        assert_eq!(payload.schema_type, Some(SchemaType::Object));
        assert!(payload.properties.is_empty());
    }

    #[test]
    fn test_required_goes_to_parent() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("User")
                .with_field(
                    field("email", TypeRef::string())
                        .with_annotation(schema_annotation(&[("required", AnnotationValue::Bool(true))])),
                )
                .with_field(field("nickname", TypeRef::string())),
        );
        let schema = process(&catalog, TypeRef::class("User"));

        assert!(schema.is_required("email"));
        assert!(!schema.is_required("nickname"));
        let email = schema.property("email").unwrap();
        assert!(email.required.is_empty());
        assert_eq!(email.schema_type, Some(SchemaType::String));
    }

    #[test]
    fn test_explicit_type_overrides_inferred_type() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("Account").with_field(
                field("balance", TypeRef::class("java.math.BigDecimal")).with_annotation(schema_annotation(&[
                    ("type", AnnotationValue::String("string".to_string())),
                    ("description", AnnotationValue::String("Decimal as text".to_string())),
                ])),
            ),
        );
        let schema = process(&catalog, TypeRef::class("Account"));

        let balance = schema.property("balance").unwrap();
        assert_eq!(balance.schema_type, Some(SchemaType::String));
        assert_eq!(balance.description.as_deref(), Some("Decimal as text"));
    }

    #[test]
    fn test_hidden_field_keeps_flagged_placeholder() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("User").with_field(
                field("password", TypeRef::string()).with_annotation(schema_annotation(&[
                    ("hidden", AnnotationValue::Bool(true)),
                    ("required", AnnotationValue::Bool(true)),
                ])),
            ),
        );
        let mut schema = process(&catalog, TypeRef::class("User"));

        let password = schema.property("password").unwrap();
        assert!(password.hidden);
        assert_eq!(password.schema_type, None);
        assert!(!schema.is_required("password"));

        schema.prune_hidden();
        assert!(schema.property("password").is_none());
    }

    #[test]
    fn test_inference_disabled_leaves_unannotated_fields_empty() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("User")
                .with_field(field("id", TypeRef::class("Long")))
                .with_field(field("address", TypeRef::class("Address")))
                .with_field(
                    field("email", TypeRef::string())
                        .with_annotation(schema_annotation(&[("format", AnnotationValue::String("email".to_string()))])),
                ),
        )
        .with_class(ClassDescriptor::new("Address").with_field(field("city", TypeRef::string())));
        let config = ScanConfig::default().with_inference(false);
        let schema = DataObjectScanner::new(&catalog, TypeRef::class("User"), config)
            .process()
            .unwrap()
            .unwrap();

        assert_eq!(schema.property("id").unwrap(), &SchemaNode::new());
        assert_eq!(schema.property("address").unwrap(), &SchemaNode::new());
        let email = schema.property("email").unwrap();
        assert_eq!(email.schema_type, Some(SchemaType::String));
        assert_eq!(email.format.as_deref(), Some("email"));
    }

    #[test]
    fn test_malformed_annotation_degrades_to_inference() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("User").with_field(
                field("age", TypeRef::class("Integer"))
                    .with_annotation(schema_annotation(&[("required", AnnotationValue::String("yes".to_string()))])),
            ),
        );
        let schema = process(&catalog, TypeRef::class("User"));

        let age = schema.property("age").unwrap();
        assert_eq!(age.schema_type, Some(SchemaType::Integer));
        assert!(!schema.is_required("age"));
    }

    #[test]
    fn test_field_reference_replaces_property() {
        let catalog = TypeCatalog::new()
            .with_class(
                ClassDescriptor::new("Order").with_field(
                    field("customer", TypeRef::class("Customer"))
                        .with_annotation(schema_annotation(&[("ref", AnnotationValue::String("Customer".to_string()))])),
                ),
            )
            .with_class(ClassDescriptor::new("Customer").with_field(field("name", TypeRef::string())));
        let schema = process(&catalog, TypeRef::class("Order"));

        let customer = schema.property("customer").unwrap();
        assert_eq!(customer.reference.as_deref(), Some("#/components/schemas/Customer"));
        assert!(customer.properties.is_empty());
        assert_eq!(customer.schema_type, None);
    }

    #[test]
    fn test_field_implementation_substitution() {
        let catalog = TypeCatalog::new()
            .with_class(
                ClassDescriptor::new("Owner").with_field(
                    field("pet", TypeRef::class("Pet")).with_annotation(schema_annotation(&[
                        ("implementation", AnnotationValue::String("Dog".to_string())),
                        ("description", AnnotationValue::String("The pet".to_string())),
                    ])),
                ),
            )
            .with_class(ClassDescriptor::new("Pet").with_field(field("name", TypeRef::string())))
            .with_class(ClassDescriptor::new("Dog").with_field(field("bark", TypeRef::string())));
        let schema = process(&catalog, TypeRef::class("Owner"));

        let pet = schema.property("pet").unwrap();
        assert!(pet.property("bark").is_some());
        assert!(pet.property("name").is_none());
        assert_eq!(pet.description.as_deref(), Some("The pet"));
    }

    #[test]
    fn test_self_implementation_terminates() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("Chain")
                .with_field(field("label", TypeRef::string()))
                .with_field(
                    field("next", TypeRef::class("Chain"))
                        .with_annotation(schema_annotation(&[("implementation", AnnotationValue::String("Chain".to_string()))])),
                ),
        );
        let schema = process(&catalog, TypeRef::class("Chain"));

        let next = schema.property("next").unwrap();
        assert!(next.property("label").is_some());
    }

    #[test]
    fn test_class_annotation_applies_to_node() {
        let catalog = TypeCatalog::new()
            .with_class(ClassDescriptor::new("User").with_field(field("address", TypeRef::class("Address"))))
            .with_class(
                ClassDescriptor::new("Address")
                    .with_annotation(schema_annotation(&[
                        ("description", AnnotationValue::String("Postal address".to_string())),
                        ("title", AnnotationValue::String("Address".to_string())),
                    ]))
                    .with_field(field("city", TypeRef::string())),
            );
        let schema = process(&catalog, TypeRef::class("User"));

        let address = schema.property("address").unwrap();
        assert_eq!(address.description.as_deref(), Some("Postal address"));
        assert_eq!(address.title.as_deref(), Some("Address"));
        assert!(address.property("city").is_some());
    }

    #[test]
    fn test_class_level_substitution_replaces_root() {
        let catalog = TypeCatalog::new()
            .with_class(
                ClassDescriptor::new("Shape")
                    .with_annotation(schema_annotation(&[("implementation", AnnotationValue::String("Circle".to_string()))]))
                    .with_field(field("name", TypeRef::string())),
            )
            .with_class(ClassDescriptor::new("Circle").with_field(field("radius", TypeRef::class("Double"))));
        let schema = process(&catalog, TypeRef::class("Shape"));

        assert_eq!(schema.property("radius").unwrap().format.as_deref(), Some("double"));
        assert!(schema.property("name").is_some());
    }

    #[test]
    fn test_collection_root_is_dispatched() {
        let catalog = TypeCatalog::new()
            .with_class(ClassDescriptor::new("User").with_field(field("name", TypeRef::string())));
        let schema = process(&catalog, TypeRef::parameterized("Vec", vec![TypeRef::class("User")]));

        assert_eq!(schema.schema_type, Some(SchemaType::Array));
        assert!(schema.items.as_ref().unwrap().property("name").is_some());
    }

    #[test]
    fn test_enum_root() {
        let catalog = TypeCatalog::new().with_class(ClassDescriptor::new_enum("Color", &["Red", "Green"]));
        let schema = process(&catalog, TypeRef::class("Color"));

        assert_eq!(schema.schema_type, Some(SchemaType::String));
        assert_eq!(schema.enumeration, vec!["Red".to_string(), "Green".to_string()]);
    }

    #[test]
    fn test_scan_named_accepts_rust_and_dotted_names() {
        let catalog = TypeCatalog::new()
            .with_class(
                ClassDescriptor::new("Wrapper")
                    .with_type_params(&["T"])
                    .with_field(field("value", TypeRef::type_variable("T"))),
            )
            .with_class(ClassDescriptor::new("com.example.Item").with_field(field("sku", TypeRef::string())));

        let wrapper = scan_named(&catalog, "Wrapper<i32>", ScanConfig::default()).unwrap().unwrap();
        assert_eq!(wrapper.property("value").unwrap().format.as_deref(), Some("int32"));

        let item = scan_named(&catalog, "com.example.Item", ScanConfig::default()).unwrap().unwrap();
        assert!(item.property("sku").is_some());
    }

    #[test]
    fn test_user_class_named_like_a_library_type_is_expanded() {
        let catalog = TypeCatalog::new()
            .with_class(
                ClassDescriptor::new("Event")
                    .with_field(field("when", TypeRef::class("com.acme.Date")))
                    .with_field(field(
                        "queue",
                        TypeRef::parameterized("com.acme.List", vec![TypeRef::string()]),
                    )),
            )
            .with_class(
                ClassDescriptor::new("com.acme.Date")
                    .with_field(field("year", TypeRef::Primitive(PrimitiveType::I32)))
                    .with_field(field("calendar", TypeRef::string())),
            )
            .with_class(
                ClassDescriptor::new("com.acme.List")
                    .with_type_params(&["T"])
                    .with_field(field("head", TypeRef::type_variable("T"))),
            );
        let schema = process(&catalog, TypeRef::class("Event"));

        let when = schema.property("when").unwrap();
        assert_eq!(when.schema_type, Some(SchemaType::Object));
        assert_eq!(when.format, None);
        assert_eq!(when.property("year").unwrap().format.as_deref(), Some("int32"));
        assert!(when.property("calendar").is_some());

        let queue = schema.property("queue").unwrap();
        assert_eq!(queue.schema_type, Some(SchemaType::Object));
        assert!(queue.items.is_none());
        assert_eq!(queue.property("head").unwrap().schema_type, Some(SchemaType::String));
    }

    #[test]
    fn test_explicit_type_on_type_variable_field_drops_bound_format() {
        let catalog = TypeCatalog::new().with_class(
            ClassDescriptor::new("Wrapper").with_type_params(&["T"]).with_field(
                field("value", TypeRef::type_variable("T"))
                    .with_annotation(schema_annotation(&[("type", AnnotationValue::String("string".to_string()))])),
            ),
        );
        let schema = process(&catalog, TypeRef::parameterized("Wrapper", vec![TypeRef::class("Long")]));

        let value = schema.property("value").unwrap();
        assert_eq!(value.schema_type, Some(SchemaType::String));
        assert_eq!(value.format, None);
    }

    #[test]
    fn test_replaced_fields_do_not_expand_declared_class() {
        let catalog = TypeCatalog::new()
            .with_class(
                ClassDescriptor::new("Owner")
                    .with_field(
                        field("customer", TypeRef::class("Customer"))
                            .with_annotation(schema_annotation(&[("ref", AnnotationValue::String("Customer".to_string()))])),
                    )
                    .with_field(
                        field("pet", TypeRef::class("Pet"))
                            .with_annotation(schema_annotation(&[("implementation", AnnotationValue::String("Dog".to_string()))])),
                    ),
            )
            .with_class(ClassDescriptor::new("Customer").with_field(field("name", TypeRef::string())))
            .with_class(ClassDescriptor::new("Pet").with_field(field("name", TypeRef::string())))
            .with_class(ClassDescriptor::new("Dog").with_field(field("bark", TypeRef::string())));
        let root = TypeRef::class("Owner");
        let scanner = DataObjectScanner::new(&catalog, root.clone(), ScanConfig::default());

        let mut traversal = Traversal::new(&scanner);
        assert!(traversal.start(&root));
        traversal.run();
        let expanded: Vec<&str> = traversal.frames.iter().map(|frame| frame.class.name.as_str()).collect();
        assert_eq!(expanded, vec!["Owner"]);

        let schema = traversal.finish();
        assert!(schema.property("pet").unwrap().property("bark").is_some());
        assert!(schema.property("customer").unwrap().reference.is_some());
    }

    #[test]
    fn test_independent_scans_share_catalog() {
        let catalog = TypeCatalog::new()
            .with_class(ClassDescriptor::new("A").with_field(field("b", TypeRef::class("B"))))
            .with_class(ClassDescriptor::new("B").with_field(field("a", TypeRef::class("A"))));

        let (a, b) = std::thread::scope(|scope| {
            let a = scope.spawn(|| process(&catalog, TypeRef::class("A")));
            let b = scope.spawn(|| process(&catalog, TypeRef::class("B")));
            (a.join().unwrap(), b.join().unwrap())
        });

        assert!(a.property("b").unwrap().property("a").is_some());
        assert!(b.property("a").unwrap().property("b").is_some());
    }
}
