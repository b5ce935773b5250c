pub mod action_interface;
pub mod controller_interface;
pub mod enum_interface;
pub mod exception_interface;
pub mod files;
pub mod link_interface;
pub mod model_interface;
pub mod type_mapper;
pub mod value_formatter;

pub use action_interface::ActionInterface;
pub use controller_interface::ControllerInterface;
pub use enum_interface::EnumInterface;
pub use exception_interface::ExceptionInterface;
pub use files::{generate_files, GeneratedFile, HEADER};
pub use link_interface::LinkInterface;
pub use model_interface::ModelInterface;

use crate::alias_manager::NameTable;
use crate::config::NamingConfig;
use crate::error::Result;
use crate::models::{ControllerId, WrapperArena, WrapperRef};
use crate::utils::{sanitize_identifier, to_camel_case};

/// A renderer for one wrapper
pub trait Interface {
    /// Render the declaration as TypeScript source
    fn to_ts(&self) -> Result<String>;
}

/// Context for code generation
#[derive(Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub arena: &'a WrapperArena,
    pub names: &'a NameTable,
    /// Naming configuration
    pub naming: &'a NamingConfig,
    /// Controller whose local aliases replace global names, if any
    pub local: Option<ControllerId>,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(arena: &'a WrapperArena, names: &'a NameTable, naming: &'a NamingConfig) -> Self {
        Self {
            arena,
            names,
            naming,
            local: None,
        }
    }

    /// Same context, but naming symbols by their aliases in `controller`'s scope
    pub fn local_to(self, controller: ControllerId) -> Self {
        Self {
            local: Some(controller),
            ..self
        }
    }

    /// Display name of a wrapper in this context
    pub fn type_name(&self, wrapper: WrapperRef) -> &'a str {
        if let Some(controller) = self.local {
            if let Some(local) = self.names.local_scope(controller).local_name(wrapper) {
                return local;
            }
        }
        self.names.global(wrapper)
    }

    /// Apply naming configuration to a function name
    pub fn format_function_name(&self, name: &str) -> String {
        sanitize_identifier(&format!(
            "{}{}{}",
            self.naming.function_prefix,
            to_camel_case(name),
            self.naming.function_suffix
        ))
    }
}
