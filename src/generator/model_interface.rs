use super::type_mapper::format_field;
use super::{GeneratorContext, Interface};
use crate::error::Result;
use crate::models::{FieldWrapper, ModelWrapper, WrapperRef};

/// Structural record type for a model or specialization
pub struct ModelInterface<'a> {
    ctx: GeneratorContext<'a>,
    model: &'a ModelWrapper,
}

impl<'a> ModelInterface<'a> {
    pub fn new(ctx: GeneratorContext<'a>, model: &'a ModelWrapper) -> Self {
        Self { ctx, model }
    }
}

impl Interface for ModelInterface<'_> {
    fn to_ts(&self) -> Result<String> {
        let name = self.ctx.type_name(WrapperRef::Model(self.model.id));
        let parents: Vec<&str> = self
            .model
            .superclasses
            .iter()
            .map(|&s| self.ctx.type_name(WrapperRef::Model(s)))
            .collect();
        render_record(&self.ctx, name, &parents, &self.model.value_models)
    }
}

/// `export interface Name extends A, B { ... }` with one property per field
pub(super) fn render_record(
    ctx: &GeneratorContext,
    name: &str,
    parents: &[&str],
    fields: &[FieldWrapper],
) -> Result<String> {
    let mut output = format!("export interface {}", name);
    if !parents.is_empty() {
        output.push_str(&format!(" extends {}", parents.join(", ")));
    }

    if fields.is_empty() {
        output.push_str(" {}\n");
        return Ok(output);
    }

    output.push_str(" {\n");
    for field in fields {
        output.push_str(&format!("  {};\n", format_field(field, ctx)?));
    }
    output.push_str("}\n");
    Ok(output)
}
