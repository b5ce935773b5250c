use tracing::debug;

use super::value_formatter::format_literal;
use super::GeneratorContext;
use crate::error::{CodegenError, Result};
use crate::known_types;
use crate::models::{FieldValue, FieldWrapper, Primitive, TypeDefinition, WrapperRef};
use crate::utils::quote_if_needed;

/// Convert a resolved field value to its TypeScript equivalent
pub fn format_value(value: &FieldValue, ctx: &GeneratorContext) -> Result<String> {
    match value {
        FieldValue::Primitive(primitive) => {
            if *primitive == Primitive::Any {
                debug!("Rendering untyped value as `any`");
            }
            Ok(known_types::primitive_to_typescript(*primitive).to_string())
        }

        FieldValue::Model(id) => Ok(ctx.type_name(WrapperRef::Model(*id)).to_string()),
        FieldValue::SelfReference(self_ref) => {
            Ok(ctx.type_name(WrapperRef::Model(self_ref.model)).to_string())
        }
        FieldValue::Enum(id) => Ok(ctx.type_name(WrapperRef::Enum(*id)).to_string()),

        FieldValue::Definition(definition) => format_definition(definition, ctx),

        FieldValue::Generic(name) => Err(CodegenError::internal(format!(
            "generic parameter `{name}` reached the formatter unbound"
        ))),
        FieldValue::Reference(reference) => Err(CodegenError::internal(format!(
            "reference `{}` reached the formatter unresolved",
            reference.display_path()
        ))),
    }
}

fn format_definition(definition: &TypeDefinition, ctx: &GeneratorContext) -> Result<String> {
    match definition {
        TypeDefinition::ListOf(inner) => {
            let inner_ts = format_value(inner, ctx)?;
            // Wrap in parentheses if it's a union type
            if is_union(inner) {
                Ok(format!("({})[]", inner_ts))
            } else {
                Ok(format!("{}[]", inner_ts))
            }
        }

        TypeDefinition::SetOf(inner) => Ok(format!("Set<{}>", format_value(inner, ctx)?)),

        TypeDefinition::TupleOf(members) => {
            let members = members
                .iter()
                .map(|m| format_value(m, ctx))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("[{}]", members.join(", ")))
        }

        TypeDefinition::DictOf { key, value } => Ok(format!(
            "Record<{}, {}>",
            format_value(key, ctx)?,
            format_value(value, ctx)?
        )),

        TypeDefinition::Or(members) => format_union(members.iter(), ctx),

        TypeDefinition::LiteralOf(values) => {
            let values: Vec<String> = values.iter().map(format_literal).collect();
            Ok(dedup(values).join(" | "))
        }
    }
}

fn format_union<'v>(
    members: impl Iterator<Item = &'v FieldValue>,
    ctx: &GeneratorContext,
) -> Result<String> {
    let members = members
        .map(|m| format_value(m, ctx))
        .collect::<Result<Vec<_>>>()?;
    Ok(dedup(members).join(" | "))
}

/// Render one property: `name: T`, or `name?: T` when not required.
/// An optional property already admits `undefined`, so `None` is dropped
/// from its union.
pub fn format_field(field: &FieldWrapper, ctx: &GeneratorContext) -> Result<String> {
    let key = quote_if_needed(&field.name);
    if field.required {
        return Ok(format!("{}: {}", key, format_value(&field.value, ctx)?));
    }

    let ty = match &field.value {
        FieldValue::Definition(definition) => match definition.as_ref() {
            TypeDefinition::Or(members) if members.iter().any(|m| !m.is_none()) => {
                format_union(members.iter().filter(|m| !m.is_none()), ctx)?
            }
            _ => format_value(&field.value, ctx)?,
        },
        other => format_value(other, ctx)?,
    };
    Ok(format!("{}?: {}", key, ty))
}

fn is_union(value: &FieldValue) -> bool {
    match value {
        FieldValue::Definition(definition) => match definition.as_ref() {
            TypeDefinition::Or(members) => members.len() > 1,
            TypeDefinition::LiteralOf(values) => values.len() > 1,
            _ => false,
        },
        _ => false,
    }
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}
