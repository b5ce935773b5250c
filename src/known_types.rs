//! Known types module - centralized list of known primitive type names and their TypeScript mappings
//!
//! Language scalars are fixed when an annotation is parsed. Library type
//! names (`String`, `Date`, `Uuid`, ...) only apply once reference
//! resolution finds no declaration with that name.

use crate::models::Primitive;

/// Types that serialize to plain strings
pub const STRING_TYPES: &[&str] = &["String", "str", "char"];

/// Signed integer types
pub const SIGNED_INTEGER_TYPES: &[&str] = &["i8", "i16", "i32", "i64", "i128", "isize"];

/// Unsigned integer types
pub const UNSIGNED_INTEGER_TYPES: &[&str] = &["u8", "u16", "u32", "u64", "u128", "usize"];

/// Floating point types
pub const FLOAT_TYPES: &[&str] = &["f32", "f64"];

/// Boolean type
pub const BOOL_TYPE: &str = "bool";

/// Timestamp types (chrono, time)
pub const DATETIME_TYPES: &[&str] = &[
    "DateTime",
    "NaiveDateTime",
    "OffsetDateTime",
    "PrimitiveDateTime",
    "SystemTime",
];

/// Calendar date types
pub const DATE_TYPES: &[&str] = &["NaiveDate", "Date"];

/// Time-of-day types
pub const TIME_TYPES: &[&str] = &["NaiveTime", "Time"];

/// UUID types
pub const UUID_TYPES: &[&str] = &["Uuid"];

/// Binary payloads, uploaded as blobs
pub const BINARY_TYPES: &[&str] = &["Bytes", "File", "UploadFile", "Blob"];

/// Explicit "no value" markers
pub const NONE_TYPES: &[&str] = &["None", "NoneType"];

/// Values of any shape
pub const ANY_TYPES: &[&str] = &["Any", "Value"];

/// Framework base classes that never appear in generated output.
/// Controllers and models may list them in `extends`; they are skipped.
pub const FRAMEWORK_BASES: &[&str] = &[
    "ControllerBase",
    "LayoutControllerBase",
    "RenderBase",
    "BaseModel",
];

/// Classify a primitive type name
pub fn primitive_from_name(name: &str) -> Option<Primitive> {
    if STRING_TYPES.contains(&name) {
        return Some(Primitive::String);
    }
    if SIGNED_INTEGER_TYPES.contains(&name) || UNSIGNED_INTEGER_TYPES.contains(&name) {
        return Some(Primitive::Integer);
    }
    if FLOAT_TYPES.contains(&name) {
        return Some(Primitive::Float);
    }
    if name == BOOL_TYPE {
        return Some(Primitive::Boolean);
    }
    if DATETIME_TYPES.contains(&name) {
        return Some(Primitive::DateTime);
    }
    if DATE_TYPES.contains(&name) {
        return Some(Primitive::Date);
    }
    if TIME_TYPES.contains(&name) {
        return Some(Primitive::Time);
    }
    if UUID_TYPES.contains(&name) {
        return Some(Primitive::Uuid);
    }
    if BINARY_TYPES.contains(&name) {
        return Some(Primitive::Binary);
    }
    if NONE_TYPES.contains(&name) {
        return Some(Primitive::None);
    }
    if ANY_TYPES.contains(&name) {
        return Some(Primitive::Any);
    }
    None
}

/// Classify a language scalar or `None`. No declaration can shadow these.
pub fn builtin_primitive(name: &str) -> Option<Primitive> {
    let builtin = matches!(name, "str" | "char" | "bool")
        || SIGNED_INTEGER_TYPES.contains(&name)
        || UNSIGNED_INTEGER_TYPES.contains(&name)
        || FLOAT_TYPES.contains(&name)
        || NONE_TYPES.contains(&name);
    if builtin {
        primitive_from_name(name)
    } else {
        None
    }
}

/// Get the TypeScript type for a primitive
pub fn primitive_to_typescript(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::String => "string",
        Primitive::Integer | Primitive::Float => "number",
        Primitive::Boolean => "boolean",
        Primitive::DateTime | Primitive::Date | Primitive::Time | Primitive::Uuid => "string",
        Primitive::Binary => "Blob",
        Primitive::None => "null",
        Primitive::Any => "any",
    }
}

/// Check if an `extends` entry names a framework base class
pub fn is_framework_base(name: &str) -> bool {
    FRAMEWORK_BASES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_from_name() {
        assert_eq!(primitive_from_name("String"), Some(Primitive::String));
        assert_eq!(primitive_from_name("str"), Some(Primitive::String));
        assert_eq!(primitive_from_name("i32"), Some(Primitive::Integer));
        assert_eq!(primitive_from_name("u64"), Some(Primitive::Integer));
        assert_eq!(primitive_from_name("f64"), Some(Primitive::Float));
        assert_eq!(primitive_from_name("bool"), Some(Primitive::Boolean));
        assert_eq!(primitive_from_name("NaiveDate"), Some(Primitive::Date));
        assert_eq!(primitive_from_name("Uuid"), Some(Primitive::Uuid));
        assert_eq!(primitive_from_name("Bytes"), Some(Primitive::Binary));
        assert_eq!(primitive_from_name("None"), Some(Primitive::None));
        assert_eq!(primitive_from_name("Value"), Some(Primitive::Any));
        assert_eq!(primitive_from_name("User"), None);
    }

    #[test]
    fn test_builtin_primitive() {
        assert_eq!(builtin_primitive("str"), Some(Primitive::String));
        assert_eq!(builtin_primitive("usize"), Some(Primitive::Integer));
        assert_eq!(builtin_primitive("f32"), Some(Primitive::Float));
        assert_eq!(builtin_primitive("None"), Some(Primitive::None));
        assert_eq!(builtin_primitive("String"), None);
        assert_eq!(builtin_primitive("Date"), None);
        assert_eq!(builtin_primitive("Value"), None);
    }

    #[test]
    fn test_primitive_to_typescript() {
        assert_eq!(primitive_to_typescript(Primitive::String), "string");
        assert_eq!(primitive_to_typescript(Primitive::Integer), "number");
        assert_eq!(primitive_to_typescript(Primitive::Float), "number");
        assert_eq!(primitive_to_typescript(Primitive::Boolean), "boolean");
        assert_eq!(primitive_to_typescript(Primitive::DateTime), "string");
        assert_eq!(primitive_to_typescript(Primitive::Date), "string");
        assert_eq!(primitive_to_typescript(Primitive::Time), "string");
        assert_eq!(primitive_to_typescript(Primitive::Uuid), "string");
        assert_eq!(primitive_to_typescript(Primitive::Binary), "Blob");
        assert_eq!(primitive_to_typescript(Primitive::None), "null");
        assert_eq!(primitive_to_typescript(Primitive::Any), "any");
    }

    #[test]
    fn test_framework_bases() {
        assert!(is_framework_base("ControllerBase"));
        assert!(is_framework_base("LayoutControllerBase"));
        assert!(!is_framework_base("UserController"));
    }
}
