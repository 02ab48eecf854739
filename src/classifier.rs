//! Maps type references to OpenAPI schema types and formats.

use crate::schema::SchemaType;
use crate::type_ref::{library_name, PrimitiveType, TypeRef};

/// A schema type paired with its optional format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeFormat {
    pub kind: SchemaType,
    pub format: Option<&'static str>,
}

impl TypeFormat {
    const fn new(kind: SchemaType, format: Option<&'static str>) -> Self {
        Self { kind, format }
    }

    const OBJECT: TypeFormat = TypeFormat::new(SchemaType::Object, None);
    const ARRAY: TypeFormat = TypeFormat::new(SchemaType::Array, None);
    const STRING: TypeFormat = TypeFormat::new(SchemaType::String, None);
    const BOOLEAN: TypeFormat = TypeFormat::new(SchemaType::Boolean, None);
    const INT32: TypeFormat = TypeFormat::new(SchemaType::Integer, Some("int32"));
    const INT64: TypeFormat = TypeFormat::new(SchemaType::Integer, Some("int64"));
    const FLOAT: TypeFormat = TypeFormat::new(SchemaType::Number, Some("float"));
    const DOUBLE: TypeFormat = TypeFormat::new(SchemaType::Number, Some("double"));

    /// True for anything that is not an object or an array
    pub fn is_terminal(&self) -> bool {
        !matches!(self.kind, SchemaType::Object | SchemaType::Array)
    }
}

/// Classifies a type reference. Pure: the same reference always yields the
/// same result.
pub fn classify(type_ref: &TypeRef) -> TypeFormat {
    match type_ref {
        TypeRef::Primitive(primitive) => classify_primitive(*primitive),
        TypeRef::Class(name) => classify_class_name(name),
        TypeRef::Parameterized { raw, .. } => classify_class_name(raw),
        TypeRef::Array(component) => match component.as_ref() {
            TypeRef::Primitive(PrimitiveType::I8 | PrimitiveType::U8) => {
                TypeFormat::new(SchemaType::String, Some("byte"))
            }
            _ => TypeFormat::ARRAY,
        },
        TypeRef::TypeVariable(_) => TypeFormat::OBJECT,
        TypeRef::Wildcard(Some(bound)) => classify(bound),
        TypeRef::Wildcard(None) => TypeFormat::OBJECT,
    }
}

/// True iff the type classifies as neither object nor array.
pub fn is_terminal(type_ref: &TypeRef) -> bool {
    classify(type_ref).is_terminal()
}

fn classify_primitive(primitive: PrimitiveType) -> TypeFormat {
    match primitive {
        PrimitiveType::String | PrimitiveType::Char => TypeFormat::STRING,
        PrimitiveType::Bool => TypeFormat::BOOLEAN,
        PrimitiveType::I8
        | PrimitiveType::I16
        | PrimitiveType::I32
        | PrimitiveType::U8
        | PrimitiveType::U16
        | PrimitiveType::U32 => TypeFormat::INT32,
        PrimitiveType::I64
        | PrimitiveType::I128
        | PrimitiveType::U64
        | PrimitiveType::U128
        | PrimitiveType::Isize
        | PrimitiveType::Usize => TypeFormat::INT64,
        PrimitiveType::F32 => TypeFormat::FLOAT,
        PrimitiveType::F64 => TypeFormat::DOUBLE,
    }
}

fn classify_class_name(name: &str) -> TypeFormat {
    if let Some(primitive) = PrimitiveType::from_name(name) {
        return classify_primitive(primitive);
    }
    let Some(name) = library_name(name) else {
        return TypeFormat::OBJECT;
    };
    match name {
        "String" | "str" | "char" | "Character" | "Cow" => TypeFormat::STRING,
        "Boolean" => TypeFormat::BOOLEAN,
        "Byte" | "Short" | "Integer" => TypeFormat::INT32,
        "Long" => TypeFormat::INT64,
        "BigInteger" => TypeFormat::new(SchemaType::Integer, None),
        "Float" => TypeFormat::FLOAT,
        "Double" => TypeFormat::DOUBLE,
        "BigDecimal" | "Decimal" => TypeFormat::new(SchemaType::Number, None),
        "Date" | "LocalDate" | "NaiveDate" => TypeFormat::new(SchemaType::String, Some("date")),
        "LocalDateTime" | "OffsetDateTime" | "ZonedDateTime" | "Instant" | "DateTime"
        | "NaiveDateTime" | "SystemTime" => TypeFormat::new(SchemaType::String, Some("date-time")),
        "UUID" | "Uuid" => TypeFormat::new(SchemaType::String, Some("uuid")),
        "URL" | "Url" => TypeFormat::new(SchemaType::String, Some("url")),
        "URI" | "Uri" => TypeFormat::new(SchemaType::String, Some("uri")),
        _ => TypeFormat::OBJECT,
    }
}
