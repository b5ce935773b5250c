//! Builds the wrapper graph from resolved schema declarations.
//!
//! Parsing starts at the controllers and follows every annotation, so the
//! arena only ever holds entities reachable from a controller. Each entity
//! is memoized by its identity key; models are reserved in the arena before
//! their fields are parsed, which lets recursive structures terminate.

use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

use super::type_parser::parse_type;
use crate::error::{CodegenError, Result};
use crate::known_types::{is_framework_base, primitive_from_name};
use crate::models::{
    ActionDecl, ActionId, ActionType, ActionWrapper, ControllerDecl, ControllerId,
    ControllerWrapper, EnumId, EnumMember, EnumWrapper, ExceptionId, ExceptionWrapper, FieldDecl,
    FieldValue, FieldWrapper, LiteralValue, ModelDecl, ModelId, ModelOrigin, ModelWrapper,
    Primitive, SelfReference, TypeDefinition, TypeReference, WrapperArena,
};
use crate::resolver::{Declaration, ModuleResolver};
use crate::utils::{split_module_path, to_pascal_case, to_snake_case};

/// Parse every controller known to the resolver into a finished arena
pub fn parse_all(resolver: &ModuleResolver) -> Result<WrapperArena> {
    let mut parser = ControllerParser::new(resolver);
    for key in resolver.controller_keys() {
        parser.parse_controller(&key)?;
    }
    Ok(parser.finish())
}

/// Name scope used while resolving the annotations of one declaration
struct Scope {
    module: Vec<String>,
    /// Generic parameter names recognized by the type parser
    generics: HashSet<String>,
    /// Generic parameter -> resolved argument
    bindings: HashMap<String, FieldValue>,
    /// Model whose fields are being parsed: (specialization key, id)
    current: Option<(String, ModelId)>,
    context: String,
}

impl Scope {
    fn plain(module: &[String], context: String) -> Self {
        Scope {
            module: module.to_vec(),
            generics: HashSet::new(),
            bindings: HashMap::new(),
            current: None,
            context,
        }
    }

    fn nested(&self, context: String) -> Self {
        Scope {
            module: self.module.clone(),
            generics: self.generics.clone(),
            bindings: self.bindings.clone(),
            current: self.current.clone(),
            context,
        }
    }
}

/// One parse session
pub struct ControllerParser<'a> {
    resolver: &'a ModuleResolver,
    arena: WrapperArena,
    models: HashMap<String, ModelId>,
    enums: HashMap<String, EnumId>,
    exceptions: HashMap<String, ExceptionId>,
    controllers: HashMap<String, ControllerId>,
    /// Models whose superclasses are being resolved
    model_stack: Vec<String>,
    /// Controllers whose superclasses are being resolved
    controller_stack: Vec<String>,
}

impl<'a> ControllerParser<'a> {
    pub fn new(resolver: &'a ModuleResolver) -> Self {
        Self {
            resolver,
            arena: WrapperArena::new(),
            models: HashMap::new(),
            enums: HashMap::new(),
            exceptions: HashMap::new(),
            controllers: HashMap::new(),
            model_stack: Vec::new(),
            controller_stack: Vec::new(),
        }
    }

    /// Parse a controller and, recursively, its superclasses, render model
    /// and own actions. Idempotent per key.
    pub fn parse_controller(&mut self, key: &str) -> Result<ControllerId> {
        if let Some(&id) = self.controllers.get(key) {
            return Ok(id);
        }
        if self.controller_stack.iter().any(|k| k == key) {
            let mut cycle = self.controller_stack.clone();
            cycle.push(key.to_string());
            return Err(CodegenError::InheritanceCycle(cycle));
        }

        let resolver = self.resolver;
        let entry = resolver
            .get(key)
            .ok_or_else(|| CodegenError::internal(format!("controller `{key}` vanished")))?;
        let Declaration::Controller(decl) = &entry.declaration else {
            return Err(CodegenError::WrongKind {
                context: "controller list".to_string(),
                name: key.to_string(),
                expected: "controller",
                found: entry.declaration.kind(),
            });
        };
        let module = &entry.module;
        let context = format!("controller `{key}`");

        self.controller_stack.push(key.to_string());
        let mut superclasses = Vec::new();
        for parent in &decl.extends {
            let path = split_module_path(parent);
            if path.last().is_some_and(|name| is_framework_base(name)) {
                continue;
            }
            let parent_key = resolver
                .resolve_type(&path, module, &context)?
                .ok_or_else(|| CodegenError::UnknownDeclaration {
                    context: context.clone(),
                    kind: "controller",
                    name: parent.clone(),
                })?;
            superclasses.push(self.parse_controller(&parent_key)?);
        }
        self.controller_stack.pop();

        let id = self.arena.add_controller(|id| ControllerWrapper {
            id,
            key: key.to_string(),
            raw_name: decl.name.clone(),
            module: module.clone(),
            url: decl.url.clone(),
            superclasses,
            actions: Default::default(),
            render: None,
            render_params: Vec::new(),
        });
        self.controllers.insert(key.to_string(), id);

        if let Some(render) = &decl.render {
            let scope = Scope::plain(module, format!("{context} render"));
            let render_model = match &render.returns {
                Some(annotation) => self.parse_model_annotation(annotation, &scope)?,
                None => None,
            };
            let render_params = self.parse_fields(&render.params, &scope)?;
            let controller = self.arena.controller_mut(id);
            controller.render = render_model;
            controller.render_params = render_params;
        }

        for action in &decl.actions {
            let action_id = self.parse_action(action, decl, id, module)?;
            self.arena
                .controller_mut(id)
                .actions
                .insert(action.name.clone(), action_id);
        }

        debug!(
            controller = %key,
            actions = decl.actions.len(),
            "Parsed controller"
        );
        Ok(id)
    }

    fn parse_action(
        &mut self,
        decl: &ActionDecl,
        controller: &ControllerDecl,
        owner: ControllerId,
        module: &[String],
    ) -> Result<ActionId> {
        let context = format!("action `{}.{}`", controller.name, decl.name);
        let scope = Scope::plain(module, context.clone());

        let params = self.parse_fields(&decl.params, &scope)?;
        let headers = self.parse_fields(&decl.headers, &scope)?;

        let request_body = match &decl.request_body {
            Some(annotation) => {
                let scope = scope.nested(format!("{context} request body"));
                self.parse_model_annotation(annotation, &scope)?
            }
            None => None,
        };
        let passthrough_model = match &decl.response {
            Some(annotation) => {
                let scope = scope.nested(format!("{context} response"));
                self.parse_model_annotation(annotation, &scope)?
            }
            None => None,
        };

        let mut exceptions = Vec::new();
        for name in &decl.exceptions {
            let key = self
                .resolver
                .resolve_type(&split_module_path(name), module, &context)?
                .ok_or_else(|| CodegenError::UnknownDeclaration {
                    context: context.clone(),
                    kind: "exception",
                    name: name.clone(),
                })?;
            exceptions.push(self.parse_exception(&key, &context)?);
        }

        let url = decl.url.clone().unwrap_or_else(|| {
            format!(
                "/internal/api/{}/{}",
                to_snake_case(controller_stem(&controller.name)),
                decl.name
            )
        });

        Ok(self.arena.add_action(|id| ActionWrapper {
            id,
            name: decl.name.clone(),
            owner,
            url,
            method: decl.method.to_uppercase(),
            params,
            headers,
            request_body,
            passthrough_model,
            response_bodies: BTreeMap::new(),
            action_type: decl.kind,
            is_raw_response: decl.raw_response,
            is_streaming_response: decl.streaming,
            exceptions,
        }))
    }

    /// Parse an annotation that must name a model. `None` and `()` mean no model.
    fn parse_model_annotation(
        &mut self,
        annotation: &str,
        scope: &Scope,
    ) -> Result<Option<ModelId>> {
        let parsed = parse_type(annotation, &scope.generics, &scope.context)?;
        if parsed.is_none() {
            return Ok(None);
        }
        match self.resolve_value(parsed, scope)? {
            FieldValue::Model(id) => Ok(Some(id)),
            other => Err(CodegenError::WrongKind {
                context: scope.context.clone(),
                name: annotation.to_string(),
                expected: "model",
                found: value_kind(&other),
            }),
        }
    }

    fn parse_fields(&mut self, fields: &[FieldDecl], scope: &Scope) -> Result<Vec<FieldWrapper>> {
        fields
            .iter()
            .map(|field| {
                let scope = scope.nested(format!("{} field `{}`", scope.context, field.name));
                let parsed = parse_type(&field.ty, &scope.generics, &scope.context)?;
                let value = self.resolve_value(parsed, &scope)?;
                if !value.is_resolved() {
                    return Err(CodegenError::internal(format!(
                        "{}: unresolved slots remain",
                        scope.context
                    )));
                }
                Ok(FieldWrapper {
                    name: field.name.clone(),
                    value,
                    required: field.required,
                })
            })
            .collect()
    }

    /// Replace every generic and reference slot with a resolved wrapper
    fn resolve_value(&mut self, value: FieldValue, scope: &Scope) -> Result<FieldValue> {
        match value {
            FieldValue::Generic(name) => scope.bindings.get(&name).cloned().ok_or_else(|| {
                CodegenError::internal(format!("{}: unbound generic `{name}`", scope.context))
            }),
            FieldValue::Reference(reference) => self.resolve_reference(reference, scope, false),
            FieldValue::Definition(mut definition) => {
                for child in definition.children_mut() {
                    let taken = std::mem::replace(child, FieldValue::any());
                    *child = self.resolve_value(taken, scope)?;
                }
                // `Union<String, str>` only collapses once both sides are primitives
                if let TypeDefinition::Or(members) = definition.as_mut() {
                    let mut unique: Vec<FieldValue> = Vec::with_capacity(members.len());
                    for member in members.drain(..) {
                        if !unique.contains(&member) {
                            unique.push(member);
                        }
                    }
                    *members = unique;
                }
                Ok(FieldValue::Definition(definition))
            }
            resolved => Ok(resolved),
        }
    }

    fn resolve_reference(
        &mut self,
        reference: TypeReference,
        scope: &Scope,
        as_superclass: bool,
    ) -> Result<FieldValue> {
        let resolver = self.resolver;
        let Some(key) = resolver.resolve_type(&reference.path, &scope.module, &scope.context)?
        else {
            let library = reference.path.last().and_then(|n| primitive_from_name(n));
            if let (Some(primitive), false) = (library, as_superclass) {
                return Ok(FieldValue::Primitive(primitive));
            }
            if as_superclass {
                return Err(CodegenError::UnknownDeclaration {
                    context: scope.context.clone(),
                    kind: "model",
                    name: reference.display_path(),
                });
            }
            if !reference.args.is_empty() {
                return Err(CodegenError::UnsupportedType {
                    context: scope.context.clone(),
                    annotation: reference.display_path(),
                    reason: "generic arguments on a type that is not a declared model".to_string(),
                });
            }
            warn!(
                context = %scope.context,
                "Unknown type `{}`, falling back to any",
                reference.display_path()
            );
            return Ok(FieldValue::any());
        };

        let entry = resolver
            .get(&key)
            .ok_or_else(|| CodegenError::internal(format!("declaration `{key}` vanished")))?;
        match &entry.declaration {
            Declaration::Model(decl) => {
                let args = reference
                    .args
                    .into_iter()
                    .map(|arg| self.resolve_value(arg, scope))
                    .collect::<Result<Vec<_>>>()?;
                let (spec_key, args) = self.specialization(&key, decl, args, &scope.context)?;

                if as_superclass && self.model_stack.contains(&spec_key) {
                    let mut cycle = self.model_stack.clone();
                    cycle.push(spec_key);
                    return Err(CodegenError::InheritanceCycle(cycle));
                }
                if let Some((current_key, current_id)) = &scope.current {
                    if *current_key == spec_key {
                        return Ok(FieldValue::SelfReference(SelfReference {
                            model: *current_id,
                        }));
                    }
                }
                Ok(FieldValue::Model(self.parse_model(
                    &key,
                    spec_key,
                    decl,
                    &entry.module,
                    args,
                )?))
            }
            Declaration::Enum(_) if as_superclass => Err(CodegenError::WrongKind {
                context: scope.context.clone(),
                name: key,
                expected: "model",
                found: "enum",
            }),
            Declaration::Enum(_) => {
                if !reference.args.is_empty() {
                    return Err(CodegenError::GenericArity {
                        context: scope.context.clone(),
                        name: key,
                        expected: 0,
                        found: reference.args.len(),
                    });
                }
                Ok(FieldValue::Enum(self.parse_enum(&key)?))
            }
            other => Err(CodegenError::WrongKind {
                context: scope.context.clone(),
                name: key.clone(),
                expected: if as_superclass { "model" } else { "model or enum" },
                found: other.kind(),
            }),
        }
    }

    /// Validate generic arguments and compute the specialization key.
    /// A generic model used without arguments is specialized with `Any`.
    fn specialization(
        &self,
        key: &str,
        decl: &ModelDecl,
        args: Vec<FieldValue>,
        context: &str,
    ) -> Result<(String, Vec<FieldValue>)> {
        let args = if args.is_empty() {
            vec![FieldValue::any(); decl.generics.len()]
        } else if args.len() != decl.generics.len() {
            return Err(CodegenError::GenericArity {
                context: context.to_string(),
                name: key.to_string(),
                expected: decl.generics.len(),
                found: args.len(),
            });
        } else {
            args
        };

        if args.is_empty() {
            return Ok((key.to_string(), args));
        }
        let arg_keys: Vec<String> = args.iter().map(|arg| self.value_key(arg)).collect();
        Ok((format!("{key}<{}>", arg_keys.join(", ")), args))
    }

    /// Parse a model (or one specialization of a generic model)
    fn parse_model(
        &mut self,
        key: &str,
        spec_key: String,
        decl: &ModelDecl,
        module: &[String],
        args: Vec<FieldValue>,
    ) -> Result<ModelId> {
        if let Some(&id) = self.models.get(&spec_key) {
            return Ok(id);
        }

        let id = self.arena.add_model(|id| ModelWrapper {
            id,
            key: spec_key.clone(),
            raw_name: decl.name.clone(),
            module: module.to_vec(),
            generic_args: args.clone(),
            superclasses: Vec::new(),
            value_models: Vec::new(),
            origin: ModelOrigin::Declared,
        });
        self.models.insert(spec_key.clone(), id);

        let scope = Scope {
            module: module.to_vec(),
            generics: decl.generics.iter().cloned().collect(),
            bindings: decl.generics.iter().cloned().zip(args).collect(),
            current: Some((spec_key.clone(), id)),
            context: format!("model `{key}`"),
        };

        // Superclasses first
        self.model_stack.push(spec_key);
        let mut superclasses = Vec::new();
        for parent in &decl.extends {
            let parent_scope = scope.nested(format!("{} superclass `{parent}`", scope.context));
            let parsed = parse_type(parent, &scope.generics, &parent_scope.context)?;
            let FieldValue::Reference(reference) = parsed else {
                return Err(CodegenError::UnsupportedType {
                    context: parent_scope.context,
                    annotation: parent.clone(),
                    reason: "superclasses must name a model".to_string(),
                });
            };
            if reference.path.last().is_some_and(|name| is_framework_base(name)) {
                continue;
            }
            match self.resolve_reference(reference, &parent_scope, true)? {
                FieldValue::Model(parent_id) => superclasses.push(parent_id),
                other => {
                    return Err(CodegenError::WrongKind {
                        context: parent_scope.context,
                        name: parent.clone(),
                        expected: "model",
                        found: value_kind(&other),
                    })
                }
            }
        }
        self.model_stack.pop();

        let fields = self.parse_fields(&decl.fields, &scope)?;
        debug!(model = %self.arena.model(id).key, fields = fields.len(), "Parsed model");

        let model = self.arena.model_mut(id);
        model.superclasses = superclasses;
        model.value_models = fields;
        Ok(id)
    }

    fn parse_enum(&mut self, key: &str) -> Result<EnumId> {
        if let Some(&id) = self.enums.get(key) {
            return Ok(id);
        }
        let entry = self
            .resolver
            .get(key)
            .ok_or_else(|| CodegenError::internal(format!("enum `{key}` vanished")))?;
        let Declaration::Enum(decl) = &entry.declaration else {
            return Err(CodegenError::internal(format!("`{key}` is not an enum")));
        };

        let members = decl
            .members
            .iter()
            .map(|member| EnumMember {
                name: member.name.clone(),
                value: member.value.clone().unwrap_or(LiteralValue::Null),
            })
            .collect();
        let id = self.arena.add_enum(|id| EnumWrapper {
            id,
            key: key.to_string(),
            raw_name: decl.name.clone(),
            module: entry.module.clone(),
            members,
        });
        self.enums.insert(key.to_string(), id);
        Ok(id)
    }

    fn parse_exception(&mut self, key: &str, context: &str) -> Result<ExceptionId> {
        if let Some(&id) = self.exceptions.get(key) {
            return Ok(id);
        }
        let resolver = self.resolver;
        let entry = resolver
            .get(key)
            .ok_or_else(|| CodegenError::internal(format!("exception `{key}` vanished")))?;
        let Declaration::Exception(decl) = &entry.declaration else {
            return Err(CodegenError::WrongKind {
                context: context.to_string(),
                name: key.to_string(),
                expected: "exception",
                found: entry.declaration.kind(),
            });
        };

        let scope = Scope::plain(&entry.module, format!("exception `{key}`"));
        let value_models = self.parse_fields(&decl.fields, &scope)?;
        let id = self.arena.add_exception(|id| ExceptionWrapper {
            id,
            key: key.to_string(),
            raw_name: decl.name.clone(),
            module: entry.module.clone(),
            status_code: decl.status_code,
            value_models,
        });
        self.exceptions.insert(key.to_string(), id);
        Ok(id)
    }

    /// Identity key of a resolved value, used for specialization keys
    fn value_key(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Primitive(p) => p.name().to_string(),
            FieldValue::Generic(name) => name.clone(),
            FieldValue::Reference(reference) => reference.display_path(),
            FieldValue::Model(id) => self.arena.model(*id).key.clone(),
            FieldValue::SelfReference(r) => self.arena.model(r.model).key.clone(),
            FieldValue::Enum(id) => self.arena.enum_(*id).key.clone(),
            FieldValue::Definition(definition) => {
                let children: Vec<String> = definition
                    .children()
                    .into_iter()
                    .map(|child| self.value_key(child))
                    .collect();
                let children = children.join(", ");
                match definition.as_ref() {
                    TypeDefinition::Or(_) => format!("Union<{children}>"),
                    TypeDefinition::ListOf(_) => format!("Vec<{children}>"),
                    TypeDefinition::SetOf(_) => format!("HashSet<{children}>"),
                    TypeDefinition::TupleOf(_) => format!("({children})"),
                    TypeDefinition::DictOf { .. } => format!("HashMap<{children}>"),
                    TypeDefinition::LiteralOf(values) => format!("Literal{values:?}"),
                }
            }
        }
    }

    /// Synthesize the response envelopes of every action and hand over the arena
    pub fn finish(mut self) -> WrapperArena {
        let action_ids: Vec<ActionId> = self.arena.actions().iter().map(|a| a.id).collect();
        for action_id in action_ids {
            let mounting = self.arena.mounting_controllers(action_id);
            let action = self.arena.action(action_id);
            let (name, owner, passthrough, action_type, is_raw) = (
                action.name.clone(),
                action.owner,
                action.passthrough_model,
                action.action_type,
                action.is_raw_response,
            );

            let mut bodies = BTreeMap::new();
            if is_raw {
                bodies.extend(mounting.iter().map(|&c| (c, None)));
            } else {
                match action_type {
                    ActionType::Passthrough => {
                        let envelope = passthrough.map(|model| {
                            let fields = vec![FieldWrapper {
                                name: "passthrough".to_string(),
                                value: FieldValue::Model(model),
                                required: true,
                            }];
                            self.add_envelope(action_id, &name, owner, None, fields)
                        });
                        bodies.extend(mounting.iter().map(|&c| (c, envelope)));
                    }
                    ActionType::Sideeffect => {
                        for &controller in &mounting {
                            let render = self
                                .arena
                                .controller(controller)
                                .render
                                .map(FieldValue::Model)
                                .unwrap_or_else(FieldValue::none);
                            let mut fields = vec![FieldWrapper {
                                name: "sideeffect".to_string(),
                                value: render,
                                required: true,
                            }];
                            if let Some(model) = passthrough {
                                fields.push(FieldWrapper {
                                    name: "passthrough".to_string(),
                                    value: FieldValue::Model(model),
                                    required: false,
                                });
                            }
                            let envelope = self.add_envelope(
                                action_id,
                                &name,
                                controller,
                                Some(controller),
                                fields,
                            );
                            bodies.insert(controller, Some(envelope));
                        }
                    }
                }
            }
            self.arena.action_mut(action_id).response_bodies = bodies;
        }
        self.arena
    }

    fn add_envelope(
        &mut self,
        action: ActionId,
        action_name: &str,
        named_after: ControllerId,
        controller: Option<ControllerId>,
        fields: Vec<FieldWrapper>,
    ) -> ModelId {
        let base = self.arena.controller(named_after);
        let raw_name = format!(
            "{}{}Response",
            controller_stem(&base.raw_name),
            to_pascal_case(action_name)
        );
        let key = format!("{}.{}::Response", base.key, action_name);
        let module = base.module.clone();
        self.arena.add_model(|id| ModelWrapper {
            id,
            key,
            raw_name,
            module,
            generic_args: Vec::new(),
            superclasses: Vec::new(),
            value_models: fields,
            origin: ModelOrigin::ActionResponse { action, controller },
        })
    }
}

/// Controller name without a trailing `Controller`
pub fn controller_stem(name: &str) -> &str {
    match name.strip_suffix("Controller") {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    }
}

fn value_kind(value: &FieldValue) -> &'static str {
    match value {
        FieldValue::Primitive(Primitive::Any) => "unknown type",
        FieldValue::Primitive(_) => "primitive",
        FieldValue::Generic(_) => "generic parameter",
        FieldValue::Reference(_) => "reference",
        FieldValue::Model(_) | FieldValue::SelfReference(_) => "model",
        FieldValue::Enum(_) => "enum",
        FieldValue::Definition(_) => "type expression",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SchemaFile;

    fn resolver(files: &[(&str, &str)]) -> ModuleResolver {
        let mut resolver = ModuleResolver::new();
        for (module, content) in files {
            resolver
                .add_file(split_module_path(module), SchemaFile::parse(content).unwrap())
                .unwrap();
        }
        resolver
    }

    fn model_named<'w>(arena: &'w WrapperArena, key: &str) -> &'w ModelWrapper {
        arena
            .models()
            .iter()
            .find(|m| m.key == key)
            .unwrap_or_else(|| panic!("model {key} not parsed"))
    }

    #[test]
    fn test_self_reference_terminates() {
        let resolver = resolver(&[(
            "tree",
            r#"
[[models]]
name = "Node"
fields = [
    { name = "parent", type = "Option<Node>", required = false },
    { name = "children", type = "Vec<Node>" },
]

[[controllers]]
name = "TreeController"
[controllers.render]
returns = "Node"
"#,
        )]);
        let arena = parse_all(&resolver).unwrap();
        assert_eq!(arena.models().len(), 1);

        let node = model_named(&arena, "tree::Node");
        match &node.value_models[0].value {
            FieldValue::Definition(definition) => match definition.as_ref() {
                TypeDefinition::Or(members) => {
                    assert_eq!(
                        members[0],
                        FieldValue::SelfReference(SelfReference { model: node.id })
                    );
                    assert!(members[1].is_none());
                }
                other => panic!("Expected Or, got {:?}", other),
            },
            other => panic!("Expected definition, got {:?}", other),
        }
        assert!(!node.value_models[0].required);
    }

    #[test]
    fn test_models_are_memoized() {
        let resolver = resolver(&[(
            "app",
            r#"
[[models]]
name = "User"
fields = [{ name = "id", type = "i64" }]

[[models]]
name = "Team"
fields = [
    { name = "owner", type = "User" },
    { name = "members", type = "Vec<User>" },
]

[[controllers]]
name = "TeamController"
[controllers.render]
returns = "Team"
[[controllers.actions]]
name = "get_owner"
response = "User"
"#,
        )]);
        let arena = parse_all(&resolver).unwrap();
        let users: Vec<_> = arena.models().iter().filter(|m| m.raw_name == "User").collect();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_isolated_fields_and_superclasses() {
        let resolver = resolver(&[(
            "app",
            r#"
[[models]]
name = "ParentA"
fields = [{ name = "a", type = "String" }]

[[models]]
name = "ParentB"
fields = [{ name = "b", type = "String" }]

[[models]]
name = "Child"
extends = ["ParentA", "ParentB", "BaseModel"]
fields = [{ name = "c", type = "String" }]

[[controllers]]
name = "Home"
[controllers.render]
returns = "Child"
"#,
        )]);
        let arena = parse_all(&resolver).unwrap();
        let child = model_named(&arena, "app::Child");
        let parents: Vec<_> = child
            .superclasses
            .iter()
            .map(|&id| arena.model(id).raw_name.as_str())
            .collect();
        assert_eq!(parents, vec!["ParentA", "ParentB"]);
        assert_eq!(child.value_models.len(), 1);
        assert_eq!(child.value_models[0].name, "c");
    }

    #[test]
    fn test_inheritance_cycle() {
        let resolver = resolver(&[(
            "app",
            r#"
[[models]]
name = "A"
extends = ["B"]

[[models]]
name = "B"
extends = ["A"]

[[controllers]]
name = "Home"
[controllers.render]
returns = "A"
"#,
        )]);
        let err = parse_all(&resolver).unwrap_err();
        assert!(matches!(err, CodegenError::InheritanceCycle(_)));
        assert_eq!(err.to_string(), "inheritance cycle: app::A -> app::B -> app::A");
    }

    #[test]
    fn test_generic_specializations() {
        let resolver = resolver(&[(
            "app",
            r#"
[[models]]
name = "Page"
generics = ["T"]
fields = [{ name = "items", type = "Vec<T>" }]

[[models]]
name = "User"

[[models]]
name = "Listing"
fields = [
    { name = "users", type = "Page<User>" },
    { name = "numbers", type = "Page<i32>" },
    { name = "more_users", type = "Page<User>" },
    { name = "anything", type = "Page" },
]

[[controllers]]
name = "Home"
[controllers.render]
returns = "Listing"
"#,
        )]);
        let arena = parse_all(&resolver).unwrap();
        let pages: Vec<_> = arena
            .models()
            .iter()
            .filter(|m| m.raw_name == "Page")
            .map(|m| m.key.as_str())
            .collect();
        assert_eq!(
            pages,
            vec!["app::Page<app::User>", "app::Page<Int>", "app::Page<Any>"]
        );

        let numbers = model_named(&arena, "app::Page<Int>");
        assert_eq!(
            numbers.value_models[0].value,
            FieldValue::definition(TypeDefinition::ListOf(FieldValue::Primitive(
                Primitive::Integer
            )))
        );
    }

    #[test]
    fn test_generic_arity_mismatch() {
        let resolver = resolver(&[(
            "app",
            r#"
[[models]]
name = "Pair"
generics = ["A", "B"]

[[models]]
name = "Holder"
fields = [{ name = "pair", type = "Pair<i32>" }]

[[controllers]]
name = "Home"
[controllers.render]
returns = "Holder"
"#,
        )]);
        let err = parse_all(&resolver).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::GenericArity {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_type_falls_back_to_any() {
        let resolver = resolver(&[(
            "app",
            r#"
[[models]]
name = "Holder"
fields = [{ name = "mystery", type = "Mystery" }]

[[controllers]]
name = "Home"
[controllers.render]
returns = "Holder"
"#,
        )]);
        let arena = parse_all(&resolver).unwrap();
        let holder = model_named(&arena, "app::Holder");
        assert_eq!(holder.value_models[0].value, FieldValue::any());
    }

    #[test]
    fn test_declarations_shadow_library_type_names() {
        let resolver = resolver(&[(
            "app",
            r#"
[[models]]
name = "Date"
fields = [{ name = "day", type = "u8" }]

[[models]]
name = "Holder"
fields = [
    { name = "when", type = "Date" },
    { name = "created", type = "DateTime<Utc>" },
    { name = "label", type = "Union<String, str>" },
]

[[controllers]]
name = "Home"
[controllers.render]
returns = "Holder"
"#,
        )]);
        let arena = parse_all(&resolver).unwrap();
        let date = model_named(&arena, "app::Date");
        let holder = model_named(&arena, "app::Holder");

        assert_eq!(holder.value_models[0].value, FieldValue::Model(date.id));
        assert_eq!(
            holder.value_models[1].value,
            FieldValue::Primitive(Primitive::DateTime)
        );
        assert_eq!(
            holder.value_models[2].value,
            FieldValue::definition(TypeDefinition::Or(vec![FieldValue::Primitive(
                Primitive::String
            )]))
        );
    }

    #[test]
    fn test_request_body_must_be_model() {
        let resolver = resolver(&[(
            "app",
            r#"
[[enums]]
name = "Mode"
members = [{ name = "On", value = "on" }]

[[controllers]]
name = "HomeController"
[[controllers.actions]]
name = "save"
request_body = "Mode"
"#,
        )]);
        let err = parse_all(&resolver).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::WrongKind {
                expected: "model",
                found: "enum",
                ..
            }
        ));
        assert!(err.to_string().contains("HomeController.save"));
    }

    #[test]
    fn test_controller_hierarchy_and_default_url() {
        let resolver = resolver(&[(
            "app",
            r#"
[[controllers]]
name = "BaseController"
extends = ["ControllerBase"]
[[controllers.actions]]
name = "ping"

[[controllers]]
name = "UserDetailController"
extends = ["BaseController"]
url = "/users/{user_id}"
[[controllers.actions]]
name = "save"
method = "put"
"#,
        )]);
        let arena = parse_all(&resolver).unwrap();
        assert_eq!(arena.controllers().len(), 2);

        let detail = arena
            .controllers()
            .iter()
            .find(|c| c.raw_name == "UserDetailController")
            .unwrap();
        assert_eq!(detail.superclasses.len(), 1);

        let actions = arena.all_actions(detail.id);
        let names: Vec<_> = actions.keys().cloned().collect();
        assert_eq!(names, vec!["ping", "save"]);

        let save = arena.action(actions["save"]);
        assert_eq!(save.url, "/internal/api/user_detail/save");
        assert_eq!(save.method, "PUT");
        assert_eq!(arena.action(actions["ping"]).url, "/internal/api/base/ping");
    }

    #[test]
    fn test_response_envelopes() {
        let resolver = resolver(&[(
            "app",
            r#"
[[models]]
name = "Result"
[[models]]
name = "BaseRender"
[[models]]
name = "ChildRender"

[[controllers]]
name = "BaseController"
[controllers.render]
returns = "BaseRender"
[[controllers.actions]]
name = "fetch"
response = "Result"
[[controllers.actions]]
name = "update"
kind = "sideeffect"
response = "Result"
[[controllers.actions]]
name = "download"
raw_response = true

[[controllers]]
name = "ChildController"
extends = ["BaseController"]
[controllers.render]
returns = "ChildRender"
"#,
        )]);
        let arena = parse_all(&resolver).unwrap();
        let base = arena.controllers()[0].id;
        let child = arena.controllers()[1].id;
        let actions = arena.all_actions(child);

        let fetch = arena.action(actions["fetch"]);
        let shared = fetch.response_bodies[&base].unwrap();
        assert_eq!(fetch.response_bodies[&child], Some(shared));
        assert_eq!(arena.model(shared).raw_name, "BaseFetchResponse");

        let update = arena.action(actions["update"]);
        let base_envelope = arena.model(update.response_bodies[&base].unwrap());
        let child_envelope = arena.model(update.response_bodies[&child].unwrap());
        assert_eq!(base_envelope.raw_name, "BaseUpdateResponse");
        assert_eq!(child_envelope.raw_name, "ChildUpdateResponse");
        let render = arena.controller(child).render.unwrap();
        assert_eq!(child_envelope.value_models[0].value, FieldValue::Model(render));
        assert!(!child_envelope.value_models[1].required);

        let download = arena.action(actions["download"]);
        assert_eq!(download.response_bodies[&child], None);
    }

    #[test]
    fn test_unknown_exception() {
        let resolver = resolver(&[(
            "app",
            r#"
[[controllers]]
name = "Home"
[[controllers.actions]]
name = "go"
exceptions = ["Missing"]
"#,
        )]);
        let err = parse_all(&resolver).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnknownDeclaration {
                kind: "exception",
                ..
            }
        ));
    }

    #[test]
    fn test_controller_stem() {
        assert_eq!(controller_stem("UserController"), "User");
        assert_eq!(controller_stem("Controller"), "Controller");
        assert_eq!(controller_stem("Home"), "Home");
    }
}
