//! Session-scoped arena owning every wrapper created during one parse.
//!
//! Wrappers refer to each other through the copyable ids below, never
//! through references, so self-referencing models and controller
//! hierarchies need no shared ownership.

use indexmap::IndexMap;
use std::collections::HashSet;

use super::{ActionWrapper, ControllerWrapper, EnumWrapper, ExceptionWrapper, ModelWrapper};

macro_rules! wrapper_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

wrapper_id!(
    /// Handle to a [`ModelWrapper`]
    ModelId
);
wrapper_id!(
    /// Handle to an [`EnumWrapper`]
    EnumId
);
wrapper_id!(
    /// Handle to an [`ExceptionWrapper`]
    ExceptionId
);
wrapper_id!(
    /// Handle to an [`ActionWrapper`]
    ActionId
);
wrapper_id!(
    /// Handle to a [`ControllerWrapper`]
    ControllerId
);

/// Any wrapper that receives a display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WrapperRef {
    Model(ModelId),
    Enum(EnumId),
    Exception(ExceptionId),
    Controller(ControllerId),
}

#[derive(Debug, Default)]
pub struct WrapperArena {
    models: Vec<ModelWrapper>,
    enums: Vec<EnumWrapper>,
    exceptions: Vec<ExceptionWrapper>,
    actions: Vec<ActionWrapper>,
    controllers: Vec<ControllerWrapper>,
}

impl WrapperArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, build: impl FnOnce(ModelId) -> ModelWrapper) -> ModelId {
        let id = ModelId(self.models.len());
        self.models.push(build(id));
        id
    }

    pub fn add_enum(&mut self, build: impl FnOnce(EnumId) -> EnumWrapper) -> EnumId {
        let id = EnumId(self.enums.len());
        self.enums.push(build(id));
        id
    }

    pub fn add_exception(
        &mut self,
        build: impl FnOnce(ExceptionId) -> ExceptionWrapper,
    ) -> ExceptionId {
        let id = ExceptionId(self.exceptions.len());
        self.exceptions.push(build(id));
        id
    }

    pub fn add_action(&mut self, build: impl FnOnce(ActionId) -> ActionWrapper) -> ActionId {
        let id = ActionId(self.actions.len());
        self.actions.push(build(id));
        id
    }

    pub fn add_controller(
        &mut self,
        build: impl FnOnce(ControllerId) -> ControllerWrapper,
    ) -> ControllerId {
        let id = ControllerId(self.controllers.len());
        self.controllers.push(build(id));
        id
    }

    pub fn model(&self, id: ModelId) -> &ModelWrapper {
        &self.models[id.0]
    }

    pub fn model_mut(&mut self, id: ModelId) -> &mut ModelWrapper {
        &mut self.models[id.0]
    }

    pub fn enum_(&self, id: EnumId) -> &EnumWrapper {
        &self.enums[id.0]
    }

    pub fn exception(&self, id: ExceptionId) -> &ExceptionWrapper {
        &self.exceptions[id.0]
    }

    pub fn action(&self, id: ActionId) -> &ActionWrapper {
        &self.actions[id.0]
    }

    pub fn action_mut(&mut self, id: ActionId) -> &mut ActionWrapper {
        &mut self.actions[id.0]
    }

    pub fn controller(&self, id: ControllerId) -> &ControllerWrapper {
        &self.controllers[id.0]
    }

    pub fn controller_mut(&mut self, id: ControllerId) -> &mut ControllerWrapper {
        &mut self.controllers[id.0]
    }

    pub fn models(&self) -> &[ModelWrapper] {
        &self.models
    }

    pub fn enums(&self) -> &[EnumWrapper] {
        &self.enums
    }

    pub fn exceptions(&self) -> &[ExceptionWrapper] {
        &self.exceptions
    }

    pub fn actions(&self) -> &[ActionWrapper] {
        &self.actions
    }

    pub fn controllers(&self) -> &[ControllerWrapper] {
        &self.controllers
    }

    /// Every nameable wrapper, in arena order
    pub fn wrapper_refs(&self) -> Vec<WrapperRef> {
        let mut refs = Vec::new();
        refs.extend(self.models.iter().map(|m| WrapperRef::Model(m.id)));
        refs.extend(self.enums.iter().map(|e| WrapperRef::Enum(e.id)));
        refs.extend(self.exceptions.iter().map(|e| WrapperRef::Exception(e.id)));
        refs.extend(self.controllers.iter().map(|c| WrapperRef::Controller(c.id)));
        refs
    }

    /// Raw (pre-alias) name of a wrapper
    pub fn raw_name(&self, wrapper: WrapperRef) -> &str {
        match wrapper {
            WrapperRef::Model(id) => &self.model(id).raw_name,
            WrapperRef::Enum(id) => &self.enum_(id).raw_name,
            WrapperRef::Exception(id) => &self.exception(id).raw_name,
            WrapperRef::Controller(id) => &self.controller(id).raw_name,
        }
    }

    /// Defining module of a wrapper
    pub fn module(&self, wrapper: WrapperRef) -> &[String] {
        match wrapper {
            WrapperRef::Model(id) => &self.model(id).module,
            WrapperRef::Enum(id) => &self.enum_(id).module,
            WrapperRef::Exception(id) => &self.exception(id).module,
            WrapperRef::Controller(id) => &self.controller(id).module,
        }
    }

    /// Identity key of a wrapper
    pub fn key(&self, wrapper: WrapperRef) -> &str {
        match wrapper {
            WrapperRef::Model(id) => &self.model(id).key,
            WrapperRef::Enum(id) => &self.enum_(id).key,
            WrapperRef::Exception(id) => &self.exception(id).key,
            WrapperRef::Controller(id) => &self.controller(id).key,
        }
    }

    /// Linearized controller hierarchy: each declared superclass is
    /// expanded depth-first in declared order before the controller itself
    /// is appended. Bases come first, `controller` is last.
    pub fn linearize(&self, controller: ControllerId) -> Vec<ControllerId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        self.linearize_into(controller, &mut seen, &mut order);
        order
    }

    fn linearize_into(
        &self,
        controller: ControllerId,
        seen: &mut HashSet<ControllerId>,
        order: &mut Vec<ControllerId>,
    ) {
        if !seen.insert(controller) {
            return;
        }
        for &parent in &self.controller(controller).superclasses {
            self.linearize_into(parent, seen, order);
        }
        order.push(controller);
    }

    /// Own actions plus every inherited action, superclass actions first.
    /// A redeclared action keeps its first position but the most derived
    /// declaration wins.
    pub fn all_actions(&self, controller: ControllerId) -> IndexMap<String, ActionId> {
        let mut actions = IndexMap::new();
        for ancestor in self.linearize(controller) {
            for (name, &action) in &self.controller(ancestor).actions {
                actions.insert(name.clone(), action);
            }
        }
        actions
    }

    /// Controllers whose full action set includes `action`
    pub fn mounting_controllers(&self, action: ActionId) -> Vec<ControllerId> {
        self.controllers
            .iter()
            .filter(|c| self.all_actions(c.id).values().any(|&a| a == action))
            .map(|c| c.id)
            .collect()
    }
}
