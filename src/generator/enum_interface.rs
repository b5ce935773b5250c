use super::value_formatter::{format_literal, TsValue};
use super::{GeneratorContext, Interface};
use crate::error::Result;
use crate::models::{EnumWrapper, WrapperRef};
use crate::utils::quote_if_needed;

/// An enum with its members in declared order.
///
/// String and numeric enums become a TypeScript `enum`. Members holding
/// booleans or `null` cannot live in one, so those render as a frozen
/// object plus a union of its values under the same name.
pub struct EnumInterface<'a> {
    ctx: GeneratorContext<'a>,
    wrapper: &'a EnumWrapper,
}

impl<'a> EnumInterface<'a> {
    pub fn new(ctx: GeneratorContext<'a>, wrapper: &'a EnumWrapper) -> Self {
        Self { ctx, wrapper }
    }

    fn render_enum(&self, name: &str) -> String {
        if self.wrapper.members.is_empty() {
            return format!("export enum {} {{}}\n", name);
        }

        let mut output = format!("export enum {} {{\n", name);
        for member in &self.wrapper.members {
            output.push_str(&format!(
                "  {} = {},\n",
                quote_if_needed(&member.name),
                format_literal(&member.value)
            ));
        }
        output.push_str("}\n");
        output
    }

    fn render_const(&self, name: &str) -> String {
        let object = TsValue::Object(
            self.wrapper
                .members
                .iter()
                .map(|m| (m.name.clone(), TsValue::Literal(m.value.clone())))
                .collect(),
        );
        format!(
            "export const {name} = {} as const;\nexport type {name} = (typeof {name})[keyof typeof {name}];\n",
            object.to_ts_block(0)
        )
    }
}

impl Interface for EnumInterface<'_> {
    fn to_ts(&self) -> Result<String> {
        let name = self.ctx.type_name(WrapperRef::Enum(self.wrapper.id));
        if self.wrapper.is_plain() {
            Ok(self.render_enum(name))
        } else {
            Ok(self.render_const(name))
        }
    }
}
