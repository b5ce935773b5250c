use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ActionId, ControllerId, EnumId, ExceptionId, FieldValue, LiteralValue, ModelId};
use crate::utils::route_placeholders;

/// One model field, action parameter or header
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWrapper {
    pub name: String,
    pub value: FieldValue,
    pub required: bool,
}

/// Where a model wrapper came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelOrigin {
    /// Declared in a schema file
    Declared,
    /// Synthesized envelope for an action response. `controller` is set
    /// for side-effect actions, whose envelope depends on the mounting
    /// controller's render model.
    ActionResponse {
        action: ActionId,
        controller: Option<ControllerId>,
    },
}

#[derive(Debug, Clone)]
pub struct ModelWrapper {
    pub id: ModelId,
    /// Identity key: qualified path plus canonical generic arguments
    pub key: String,
    pub raw_name: String,
    pub module: Vec<String>,
    /// Resolved arguments when this wrapper is a generic specialization
    pub generic_args: Vec<FieldValue>,
    /// Direct parents, in declared order
    pub superclasses: Vec<ModelId>,
    /// Fields declared on this model itself (the isolated model);
    /// inherited fields live on the superclass wrappers
    pub value_models: Vec<FieldWrapper>,
    pub origin: ModelOrigin,
}

impl ModelWrapper {
    pub fn is_specialization(&self) -> bool {
        !self.generic_args.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: LiteralValue,
}

#[derive(Debug, Clone)]
pub struct EnumWrapper {
    pub id: EnumId,
    pub key: String,
    pub raw_name: String,
    pub module: Vec<String>,
    pub members: Vec<EnumMember>,
}

impl EnumWrapper {
    /// Every member value is a string, so the enum is usable as a record key
    pub fn is_string_valued(&self) -> bool {
        self.members.iter().all(|m| m.value.is_string())
    }

    /// Every member value fits a TypeScript `enum` (strings and numbers only)
    pub fn is_plain(&self) -> bool {
        self.members
            .iter()
            .all(|m| m.value.is_string() || m.value.is_number())
    }
}

#[derive(Debug, Clone)]
pub struct ExceptionWrapper {
    pub id: ExceptionId,
    pub key: String,
    pub raw_name: String,
    pub module: Vec<String>,
    pub status_code: u16,
    pub value_models: Vec<FieldWrapper>,
}

/// Whether an action only returns data or also mutates server state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    #[default]
    Passthrough,
    Sideeffect,
}

#[derive(Debug, Clone)]
pub struct ActionWrapper {
    pub id: ActionId,
    pub name: String,
    /// Controller that declares the action
    pub owner: ControllerId,
    pub url: String,
    pub method: String,
    /// Path and query parameters
    pub params: Vec<FieldWrapper>,
    pub headers: Vec<FieldWrapper>,
    pub request_body: Option<ModelId>,
    /// Declared response payload, before wrapping in a response envelope
    pub passthrough_model: Option<ModelId>,
    /// Response envelope per mounting controller; `None` renders as `void`
    pub response_bodies: BTreeMap<ControllerId, Option<ModelId>>,
    pub action_type: ActionType,
    pub is_raw_response: bool,
    pub is_streaming_response: bool,
    pub exceptions: Vec<ExceptionId>,
}

impl ActionWrapper {
    /// Parameters substituted into the URL
    pub fn path_params(&self) -> Vec<&FieldWrapper> {
        let placeholders = route_placeholders(&self.url);
        self.params
            .iter()
            .filter(|p| placeholders.contains(&p.name))
            .collect()
    }

    /// Parameters sent in the query string
    pub fn query_params(&self) -> Vec<&FieldWrapper> {
        let placeholders = route_placeholders(&self.url);
        self.params
            .iter()
            .filter(|p| !placeholders.contains(&p.name))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ControllerWrapper {
    pub id: ControllerId,
    pub key: String,
    pub raw_name: String,
    pub module: Vec<String>,
    pub url: String,
    /// Direct parents, in declared order, framework bases excluded
    pub superclasses: Vec<ControllerId>,
    /// Actions declared directly on this controller
    pub actions: IndexMap<String, ActionId>,
    /// Return type of the render function
    pub render: Option<ModelId>,
    /// Path and query parameters of the render route
    pub render_params: Vec<FieldWrapper>,
}
