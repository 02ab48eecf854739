//! Type references as they appear on fields and at scan roots.
//!
//! A [`TypeRef`] describes a *use* of a type (the declared type of a field,
//! a generic argument, a root passed to the scanner). It never owns the
//! structure of a class; that lives in the [`crate::catalog`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the universal type every unresolved reference falls back to.
pub const OBJECT_TYPE_NAME: &str = "Object";

/// Wrapper types that do not change the serialized shape of their content.
const TRANSPARENT_WRAPPERS: &[&str] = &["Option", "Box", "Rc", "Arc", "Cow", "RefCell", "Cell"];

/// Built-in scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    #[serde(alias = "String")]
    String,
    #[serde(alias = "boolean")]
    Bool,
    Char,
    #[serde(alias = "byte")]
    I8,
    #[serde(alias = "short")]
    I16,
    #[serde(alias = "int")]
    I32,
    #[serde(alias = "long")]
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    Isize,
    Usize,
    #[serde(alias = "float")]
    F32,
    #[serde(alias = "double")]
    F64,
}

impl PrimitiveType {
    /// Parse a primitive type name as written in Rust source
    pub fn from_name(type_name: &str) -> Option<Self> {
        match type_name {
            "String" | "str" => Some(PrimitiveType::String),
            "bool" => Some(PrimitiveType::Bool),
            "char" => Some(PrimitiveType::Char),
            "i8" => Some(PrimitiveType::I8),
            "i16" => Some(PrimitiveType::I16),
            "i32" => Some(PrimitiveType::I32),
            "i64" => Some(PrimitiveType::I64),
            "i128" => Some(PrimitiveType::I128),
            "u8" => Some(PrimitiveType::U8),
            "u16" => Some(PrimitiveType::U16),
            "u32" => Some(PrimitiveType::U32),
            "u64" => Some(PrimitiveType::U64),
            "u128" => Some(PrimitiveType::U128),
            "isize" => Some(PrimitiveType::Isize),
            "usize" => Some(PrimitiveType::Usize),
            "f32" => Some(PrimitiveType::F32),
            "f64" => Some(PrimitiveType::F64),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Char => "char",
            PrimitiveType::I8 => "i8",
            PrimitiveType::I16 => "i16",
            PrimitiveType::I32 => "i32",
            PrimitiveType::I64 => "i64",
            PrimitiveType::I128 => "i128",
            PrimitiveType::U8 => "u8",
            PrimitiveType::U16 => "u16",
            PrimitiveType::U32 => "u32",
            PrimitiveType::U64 => "u64",
            PrimitiveType::U128 => "u128",
            PrimitiveType::Isize => "isize",
            PrimitiveType::Usize => "usize",
            PrimitiveType::F32 => "f32",
            PrimitiveType::F64 => "f64",
        }
    }
}

/// A reference to a type at a particular use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// A built-in scalar
    Primitive(PrimitiveType),
    /// A bare (non-generic) class
    Class(String),
    /// An array of the component type
    Array(Box<TypeRef>),
    /// A generic class applied to arguments, e.g. `Page<User>`
    Parameterized { raw: String, arguments: Vec<TypeRef> },
    /// A declared type parameter of the enclosing class, e.g. `T`
    TypeVariable(String),
    /// An unknown argument, optionally bounded above
    Wildcard(Option<Box<TypeRef>>),
}

impl TypeRef {
    pub fn object() -> Self {
        TypeRef::Class(OBJECT_TYPE_NAME.to_string())
    }

    pub fn string() -> Self {
        TypeRef::Primitive(PrimitiveType::String)
    }

    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    pub fn array(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    pub fn parameterized(raw: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        TypeRef::Parameterized {
            raw: raw.into(),
            arguments,
        }
    }

    pub fn type_variable(name: impl Into<String>) -> Self {
        TypeRef::TypeVariable(name.into())
    }

    /// The class name used to look this type up in a catalog.
    ///
    /// Arrays report their component's name; primitives, type variables and
    /// wildcards have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Class(name) => Some(name),
            TypeRef::Parameterized { raw, .. } => Some(raw),
            TypeRef::Array(component) => component.name(),
            _ => None,
        }
    }

    /// Parse Rust type syntax such as `Wrapper<String>` or `Vec<Node>`.
    pub fn parse(text: &str) -> Result<TypeRef> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("type name must not be empty".to_string()));
        }
        let ty = syn::parse_str::<syn::Type>(trimmed)
            .map_err(|e| Error::InvalidArgument(format!("cannot parse type `{}`: {}", trimmed, e)))?;
        Ok(Self::from_syn(&ty, &[]))
    }

    /// Convert a `syn` type, treating any name in `type_params` as a type variable.
    pub fn from_syn(ty: &syn::Type, type_params: &[String]) -> TypeRef {
        match ty {
            syn::Type::Path(type_path) => Self::from_syn_path(&type_path.path, type_params),
            syn::Type::Reference(reference) => Self::from_syn(&reference.elem, type_params),
            syn::Type::Array(array) => TypeRef::array(Self::from_syn(&array.elem, type_params)),
            syn::Type::Slice(slice) => TypeRef::array(Self::from_syn(&slice.elem, type_params)),
            syn::Type::Paren(paren) => Self::from_syn(&paren.elem, type_params),
            syn::Type::Group(group) => Self::from_syn(&group.elem, type_params),
            syn::Type::Infer(_) => TypeRef::Wildcard(None),
            _ => TypeRef::object(),
        }
    }

    fn from_syn_path(path: &syn::Path, type_params: &[String]) -> TypeRef {
        let Some(segment) = path.segments.last() else {
            return TypeRef::object();
        };
        let type_name = segment.ident.to_string();

        let arguments: Vec<TypeRef> = match &segment.arguments {
            syn::PathArguments::AngleBracketed(args) => args
                .args
                .iter()
                .filter_map(|arg| match arg {
                    syn::GenericArgument::Type(inner) => Some(Self::from_syn(inner, type_params)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        if TRANSPARENT_WRAPPERS.contains(&type_name.as_str()) {
            if let Some(inner) = arguments.into_iter().next() {
                return inner;
            }
            return TypeRef::object();
        }

        if arguments.is_empty() {
            if path.segments.len() == 1 && type_params.contains(&type_name) {
                return TypeRef::TypeVariable(type_name);
            }
            if let Some(primitive) = PrimitiveType::from_name(&type_name) {
                return TypeRef::Primitive(primitive);
            }
            return TypeRef::Class(type_name);
        }

        TypeRef::Parameterized {
            raw: type_name,
            arguments,
        }
    }
}

/// The last segment of a dotted (`java.util.List`) or path (`std::vec::Vec`) name.
pub fn simple_name(name: &str) -> &str {
    let after_path = name.rsplit("::").next().unwrap_or(name);
    after_path.rsplit('.').next().unwrap_or(after_path)
}

/// Packages whose classes are recognised by simple name.
const LIBRARY_PREFIXES: &[&str] = &[
    "java.lang.",
    "java.util.",
    "java.time.",
    "java.math.",
    "java.net.",
    "std::",
    "alloc::",
    "core::",
    "chrono::",
    "uuid::",
    "url::",
    "rust_decimal::",
    "indexmap::",
];

/// The name to match against well-known scalar and container names.
///
/// Unqualified names and names in a known library package yield their simple
/// name; any other qualified name belongs to user code and yields `None`, so
/// `com.acme.Date` is never mistaken for `java.util.Date`.
pub fn library_name(name: &str) -> Option<&str> {
    let qualified = name.contains('.') || name.contains("::");
    if !qualified || LIBRARY_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        Some(simple_name(name))
    } else {
        None
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(primitive) => write!(f, "{}", primitive.as_str()),
            TypeRef::Class(name) | TypeRef::TypeVariable(name) => write!(f, "{}", name),
            TypeRef::Array(component) => write!(f, "[{}]", component),
            TypeRef::Parameterized { raw, arguments } => {
                write!(f, "{}<", raw)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ">")
            }
            TypeRef::Wildcard(None) => write!(f, "?"),
            TypeRef::Wildcard(Some(bound)) => write!(f, "? extends {}", bound),
        }
    }
}
