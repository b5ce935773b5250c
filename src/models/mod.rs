mod arena;
mod schema;
mod type_definition;
mod wrappers;

pub use arena::{ActionId, ControllerId, EnumId, ExceptionId, ModelId, WrapperArena, WrapperRef};
pub use schema::{
    ActionDecl, ControllerDecl, EnumDecl, EnumMemberDecl, ExceptionDecl, FieldDecl, ModelDecl,
    RenderDecl, SchemaFile,
};
pub use type_definition::{
    FieldValue, LiteralValue, Primitive, SelfReference, TypeDefinition, TypeReference,
};
pub use wrappers::{
    ActionType, ActionWrapper, ControllerWrapper, EnumMember, EnumWrapper, ExceptionWrapper,
    FieldWrapper, ModelOrigin, ModelWrapper,
};
