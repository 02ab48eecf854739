//! Generic type-parameter bindings.
//!
//! Every traversal frame owns a [`Bindings`] table covering exactly the type
//! parameters its own class declares. Tables are built fresh at each
//! parameterized use site and never inherited by nested frames.

use crate::catalog::ClassDescriptor;
use crate::type_ref::TypeRef;
use indexmap::IndexMap;
use log::{trace, warn};

/// Declared type-parameter name -> actual type argument
pub type Bindings = IndexMap<String, TypeRef>;

/// Zips a class's declared type parameters with the arguments of a use site.
///
/// A count mismatch is reported and the shorter length is used; parameters
/// left without an argument later resolve to the universal object type.
pub fn build_bindings(class: &ClassDescriptor, arguments: &[TypeRef]) -> Bindings {
    if class.type_params.len() != arguments.len() {
        warn!(
            "Mismatch between type arguments and type parameters of {}: arguments {:?}, parameters {:?}",
            class.name, arguments, class.type_params
        );
    }

    class
        .type_params
        .iter()
        .zip(arguments)
        .map(|(param, argument)| (param.clone(), argument.clone()))
        .collect()
}

/// Resolves a type variable against a binding table.
///
/// Wildcards resolve to their upper bound, or to the object type when
/// unbounded; unbound names also resolve to the object type.
pub fn resolve(name: &str, bindings: &Bindings) -> TypeRef {
    let resolved = match bindings.get(name) {
        Some(TypeRef::Wildcard(bound)) => resolve_wildcard(bound.as_deref()),
        Some(bound) => bound.clone(),
        None => {
            trace!("Type variable {} has no binding", name);
            TypeRef::object()
        }
    };
    trace!("Resolved type variable {} -> {}", name, resolved);
    resolved
}

fn resolve_wildcard(bound: Option<&TypeRef>) -> TypeRef {
    match bound {
        Some(bound) => bound.clone(),
        None => TypeRef::object(),
    }
}

/// Replaces type variables anywhere inside `type_ref` using `bindings`.
///
/// Used on the arguments of a nested parameterized reference before its own
/// binding table is built, so that `Page<T>` inside `Envelope<T>` carries the
/// envelope's concrete argument rather than a dangling `T`.
pub fn substitute(type_ref: &TypeRef, bindings: &Bindings) -> TypeRef {
    match type_ref {
        TypeRef::TypeVariable(name) => resolve(name, bindings),
        TypeRef::Array(component) => TypeRef::array(substitute(component, bindings)),
        TypeRef::Parameterized { raw, arguments } => TypeRef::Parameterized {
            raw: raw.clone(),
            arguments: arguments.iter().map(|arg| substitute(arg, bindings)).collect(),
        },
        TypeRef::Wildcard(Some(bound)) => TypeRef::Wildcard(Some(Box::new(substitute(bound, bindings)))),
        other => other.clone(),
    }
}
