use serde::{Deserialize, Serialize};

use super::{EnumId, ModelId};

/// Leaf types with a fixed TypeScript mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    Date,
    Time,
    Uuid,
    Binary,
    /// The `None` marker inside unions, and unit `()`
    None,
    /// Unknown or untyped values
    Any,
}

impl Primitive {
    /// PascalCase name used in identity keys and specialization suffixes
    pub fn name(self) -> &'static str {
        match self {
            Primitive::String => "String",
            Primitive::Integer => "Int",
            Primitive::Float => "Float",
            Primitive::Boolean => "Bool",
            Primitive::DateTime => "DateTime",
            Primitive::Date => "Date",
            Primitive::Time => "Time",
            Primitive::Uuid => "Uuid",
            Primitive::Binary => "Binary",
            Primitive::None => "None",
            Primitive::Any => "Any",
        }
    }
}

/// A literal value, as found in enum members and `Literal<...>` annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl LiteralValue {
    pub fn is_string(&self) -> bool {
        matches!(self, LiteralValue::Str(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, LiteralValue::Int(_) | LiteralValue::Float(_))
    }
}

/// A named type that has not been resolved yet (`Status`, `auth::Status`, `Page<User>`)
#[derive(Debug, Clone, PartialEq)]
pub struct TypeReference {
    pub path: Vec<String>,
    pub args: Vec<FieldValue>,
}

impl TypeReference {
    pub fn display_path(&self) -> String {
        self.path.join("::")
    }
}

/// Placeholder for a field whose type is the model currently being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfReference {
    pub model: ModelId,
}

/// The value slot of a field, parameter or type-definition child.
///
/// The type parser produces `Primitive`, `Generic`, `Reference` and
/// `Definition`; children resolution replaces every `Generic` and
/// `Reference` with `Model`, `Enum` or `SelfReference`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Primitive(Primitive),
    Generic(String),
    Reference(TypeReference),
    Model(ModelId),
    Enum(EnumId),
    SelfReference(SelfReference),
    Definition(Box<TypeDefinition>),
}

impl FieldValue {
    pub fn none() -> Self {
        FieldValue::Primitive(Primitive::None)
    }

    pub fn any() -> Self {
        FieldValue::Primitive(Primitive::Any)
    }

    pub fn definition(definition: TypeDefinition) -> Self {
        FieldValue::Definition(Box::new(definition))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FieldValue::Primitive(Primitive::None))
    }

    /// Whether unresolved slots remain anywhere in this value
    pub fn is_resolved(&self) -> bool {
        let mut resolved = true;
        self.walk(&mut |value| {
            if matches!(value, FieldValue::Generic(_) | FieldValue::Reference(_)) {
                resolved = false;
            }
        });
        resolved
    }

    /// Visit this value and every nested child, parents first
    pub fn walk(&self, visit: &mut impl FnMut(&FieldValue)) {
        visit(self);
        match self {
            FieldValue::Definition(definition) => {
                for child in definition.children() {
                    child.walk(visit);
                }
            }
            FieldValue::Reference(reference) => {
                for arg in &reference.args {
                    arg.walk(visit);
                }
            }
            _ => {}
        }
    }
}

/// Compound type expressions
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Or(Vec<FieldValue>),
    ListOf(FieldValue),
    SetOf(FieldValue),
    TupleOf(Vec<FieldValue>),
    DictOf { key: FieldValue, value: FieldValue },
    LiteralOf(Vec<LiteralValue>),
}

impl TypeDefinition {
    pub fn children(&self) -> Vec<&FieldValue> {
        match self {
            TypeDefinition::Or(members) | TypeDefinition::TupleOf(members) => {
                members.iter().collect()
            }
            TypeDefinition::ListOf(inner) | TypeDefinition::SetOf(inner) => vec![inner],
            TypeDefinition::DictOf { key, value } => vec![key, value],
            TypeDefinition::LiteralOf(_) => Vec::new(),
        }
    }

    /// Mutable child slots, for replacing children in place
    pub fn children_mut(&mut self) -> Vec<&mut FieldValue> {
        match self {
            TypeDefinition::Or(members) | TypeDefinition::TupleOf(members) => {
                members.iter_mut().collect()
            }
            TypeDefinition::ListOf(inner) | TypeDefinition::SetOf(inner) => vec![inner],
            TypeDefinition::DictOf { key, value } => vec![key, value],
            TypeDefinition::LiteralOf(_) => Vec::new(),
        }
    }
}
