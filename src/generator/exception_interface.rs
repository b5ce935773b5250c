use super::model_interface::render_record;
use super::{GeneratorContext, Interface};
use crate::error::Result;
use crate::models::{ExceptionWrapper, WrapperRef};

/// Error payload record for an exception
pub struct ExceptionInterface<'a> {
    ctx: GeneratorContext<'a>,
    exception: &'a ExceptionWrapper,
}

impl<'a> ExceptionInterface<'a> {
    pub fn new(ctx: GeneratorContext<'a>, exception: &'a ExceptionWrapper) -> Self {
        Self { ctx, exception }
    }
}

impl Interface for ExceptionInterface<'_> {
    fn to_ts(&self) -> Result<String> {
        let name = self.ctx.type_name(WrapperRef::Exception(self.exception.id));
        render_record(&self.ctx, name, &[], &self.exception.value_models)
    }
}
