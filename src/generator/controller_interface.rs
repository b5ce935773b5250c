use super::action_interface::ActionInterface;
use super::{GeneratorContext, Interface};
use crate::error::Result;
use crate::models::{ControllerWrapper, WrapperRef};

/// Method signatures for the actions a controller declares itself.
/// Inherited actions arrive through `extends`.
pub struct ControllerInterface<'a> {
    ctx: GeneratorContext<'a>,
    controller: &'a ControllerWrapper,
}

impl<'a> ControllerInterface<'a> {
    pub fn new(ctx: GeneratorContext<'a>, controller: &'a ControllerWrapper) -> Self {
        Self { ctx, controller }
    }
}

impl Interface for ControllerInterface<'_> {
    fn to_ts(&self) -> Result<String> {
        let name = self.ctx.type_name(WrapperRef::Controller(self.controller.id));
        let mut output = format!("export interface {}", name);

        let parents: Vec<&str> = self
            .controller
            .superclasses
            .iter()
            .map(|&s| self.ctx.type_name(WrapperRef::Controller(s)))
            .collect();
        if !parents.is_empty() {
            output.push_str(&format!(" extends {}", parents.join(", ")));
        }

        if self.controller.actions.is_empty() {
            output.push_str(" {}\n");
            return Ok(output);
        }

        output.push_str(" {\n");
        for &action in self.controller.actions.values() {
            let action = ActionInterface::new(self.ctx, self.ctx.arena.action(action), None);
            output.push_str(&format!("  {};\n", action.to_signature()?));
        }
        output.push_str("}\n");
        Ok(output)
    }
}
