//! Pre-render checks on the resolved wrapper graph.

use crate::error::{CodegenError, Result};
use crate::models::{FieldValue, FieldWrapper, Primitive, TypeDefinition, WrapperArena};

/// Every dictionary key must serialize to a string, since JSON object keys are strings
pub fn validate_dict_keys(arena: &WrapperArena) -> Result<()> {
    for model in arena.models() {
        check_fields(arena, &format!("model `{}`", model.key), &model.value_models)?;
    }
    for exception in arena.exceptions() {
        check_fields(
            arena,
            &format!("exception `{}`", exception.key),
            &exception.value_models,
        )?;
    }
    for action in arena.actions() {
        let owner = &arena.controller(action.owner).raw_name;
        let context = format!("action `{}.{}`", owner, action.name);
        check_fields(arena, &context, &action.params)?;
        check_fields(arena, &context, &action.headers)?;
    }
    for controller in arena.controllers() {
        check_fields(
            arena,
            &format!("controller `{}` render", controller.key),
            &controller.render_params,
        )?;
    }
    Ok(())
}

fn check_fields(arena: &WrapperArena, context: &str, fields: &[FieldWrapper]) -> Result<()> {
    for field in fields {
        let mut failure = None;
        field.value.walk(&mut |value| {
            if failure.is_some() {
                return;
            }
            if let FieldValue::Definition(definition) = value {
                if let TypeDefinition::DictOf { key, .. } = definition.as_ref() {
                    if !is_string_key(arena, key) {
                        failure = Some(describe(arena, key));
                    }
                }
            }
        });
        if let Some(key) = failure {
            return Err(CodegenError::NonStringDictKey {
                context: format!("{context} field `{}`", field.name),
                key,
            });
        }
    }
    Ok(())
}

fn is_string_key(arena: &WrapperArena, key: &FieldValue) -> bool {
    match key {
        FieldValue::Primitive(primitive) => matches!(
            primitive,
            Primitive::String
                | Primitive::DateTime
                | Primitive::Date
                | Primitive::Time
                | Primitive::Uuid
                | Primitive::Any
        ),
        FieldValue::Generic(_) => true,
        FieldValue::Enum(id) => arena.enum_(*id).is_string_valued(),
        FieldValue::Definition(definition) => match definition.as_ref() {
            TypeDefinition::LiteralOf(values) => values.iter().all(|v| v.is_string()),
            TypeDefinition::Or(members) => members.iter().all(|m| is_string_key(arena, m)),
            _ => false,
        },
        FieldValue::Reference(_) | FieldValue::Model(_) | FieldValue::SelfReference(_) => false,
    }
}

fn describe(arena: &WrapperArena, value: &FieldValue) -> String {
    match value {
        FieldValue::Primitive(primitive) => primitive.name().to_string(),
        FieldValue::Generic(name) => name.clone(),
        FieldValue::Reference(reference) => reference.display_path(),
        FieldValue::Model(id) => arena.model(*id).key.clone(),
        FieldValue::SelfReference(r) => arena.model(r.model).key.clone(),
        FieldValue::Enum(id) => arena.enum_(*id).key.clone(),
        FieldValue::Definition(definition) => match definition.as_ref() {
            TypeDefinition::Or(_) => "union".to_string(),
            TypeDefinition::ListOf(_) => "list".to_string(),
            TypeDefinition::SetOf(_) => "set".to_string(),
            TypeDefinition::TupleOf(_) => "tuple".to_string(),
            TypeDefinition::DictOf { .. } => "dictionary".to_string(),
            TypeDefinition::LiteralOf(_) => "literal".to_string(),
        },
    }
}
