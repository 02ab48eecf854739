//! The type catalog: a read-only index from class name to class structure.

use crate::annotation::Annotation;
use crate::error::{Error, Result};
use crate::type_ref::{library_name, TypeRef};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Names treated as collection-like wherever they appear in a type hierarchy.
const COLLECTION_NAMES: &[&str] = &[
    "Vec", "VecDeque", "LinkedList", "HashSet", "BTreeSet", "IndexSet", "BinaryHeap", "Collection",
    "List", "Set", "ArrayList", "TreeSet", "SortedSet", "Queue", "Deque", "Iterable",
];

/// Names treated as map-like wherever they appear in a type hierarchy.
const MAP_NAMES: &[&str] = &[
    "HashMap", "BTreeMap", "IndexMap", "Map", "TreeMap", "LinkedHashMap", "SortedMap",
    "ConcurrentHashMap",
];

const ENUM_NAMES: &[&str] = &["Enum"];

/// True for the well-known map names, without consulting any catalog.
pub fn is_builtin_map(name: &str) -> bool {
    library_name(name).is_some_and(|name| MAP_NAMES.contains(&name))
}

/// What sort of declaration a class came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Enum,
    Interface,
}

/// A field declared on a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            is_static: false,
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Structural description of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    /// Fields declared on this class itself, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Declared generic type-parameter names, in order
    #[serde(default)]
    pub type_params: Vec<String>,
    /// Superclass and implemented interfaces, in order
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            fields: Vec::new(),
            type_params: Vec::new(),
            supertypes: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// An enum whose constants are static fields of the enum's own type.
    pub fn new_enum(name: impl Into<String>, constants: &[&str]) -> Self {
        let name = name.into();
        let fields = constants
            .iter()
            .map(|constant| FieldDescriptor::new(*constant, TypeRef::class(name.clone())).into_static())
            .collect();
        Self {
            kind: ClassKind::Enum,
            fields,
            ..Self::new(name)
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_type_params(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.push(name.into());
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    classes: Vec<ClassDescriptor>,
}

/// Read-only index of class descriptors, shared by any number of scans.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    classes: HashMap<String, ClassDescriptor>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a class
    pub fn insert(&mut self, class: ClassDescriptor) {
        trace!("Cataloguing class {}", class.name);
        if let Some(previous) = self.classes.insert(class.name.clone(), class) {
            debug!("Class {} defined more than once; keeping the last definition", previous.name);
        }
    }

    pub fn with_class(mut self, class: ClassDescriptor) -> Self {
        self.insert(class);
        self
    }

    /// Absorbs every class of `other`, replacing same-named entries.
    pub fn merge(&mut self, other: TypeCatalog) {
        for (_, class) in other.classes {
            self.insert(class);
        }
    }

    pub fn lookup_class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class names in sorted order
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All non-static fields of a class, inherited ones first.
    ///
    /// Supertypes are walked depth first in declaration order; each is visited
    /// once, so diamond or cyclic hierarchies contribute their fields once.
    pub fn all_fields<'a>(&'a self, class: &'a ClassDescriptor) -> Vec<&'a FieldDescriptor> {
        let mut fields = Vec::new();
        let mut visited = HashSet::new();
        self.collect_fields(class, &mut visited, &mut fields);
        fields
    }

    fn collect_fields<'a>(
        &'a self,
        class: &'a ClassDescriptor,
        visited: &mut HashSet<&'a str>,
        fields: &mut Vec<&'a FieldDescriptor>,
    ) {
        if !visited.insert(class.name.as_str()) {
            return;
        }
        for supertype in &class.supertypes {
            if let Some(parent) = self.lookup_class(supertype) {
                self.collect_fields(parent, visited, fields);
            }
        }
        fields.extend(class.fields.iter().filter(|field| !field.is_static));
    }

    /// True if the named class is, or descends from, a collection type.
    pub fn is_collection(&self, name: &str) -> bool {
        self.is_a(name, COLLECTION_NAMES)
    }

    /// True if the named class is, or descends from, a map type.
    pub fn is_map(&self, name: &str) -> bool {
        self.is_a(name, MAP_NAMES)
    }

    /// True if the named class is a catalogued enum.
    pub fn is_enum(&self, name: &str) -> bool {
        match self.lookup_class(name) {
            Some(class) => class.kind == ClassKind::Enum || self.is_a(name, ENUM_NAMES),
            None => false,
        }
    }

    fn is_a(&self, name: &str, targets: &[&str]) -> bool {
        let mut pending = vec![name];
        let mut visited = HashSet::new();
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            if library_name(current).is_some_and(|simple| targets.contains(&simple)) {
                return true;
            }
            if let Some(class) = self.lookup_class(current) {
                pending.extend(class.supertypes.iter().map(String::as_str));
            }
        }
        false
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(text)?;
        Ok(Self::from_classes(file.classes))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(text)?;
        Ok(Self::from_classes(file.classes))
    }

    /// Loads a catalog file, choosing YAML for `.yaml`/`.yml` and JSON otherwise.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading type catalog from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let catalog = if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_json_str(&text)
        };
        catalog.map_err(|e| Error::Parse {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn from_classes(classes: Vec<ClassDescriptor>) -> Self {
        let mut catalog = Self::new();
        for class in classes {
            catalog.insert(class);
        }
        debug!("Loaded {} classes", catalog.len());
        catalog
    }
}
