//! Display names for every wrapper.
//!
//! Names are assigned in one pass over the finished arena and returned as a
//! separate [`NameTable`]; wrappers themselves never change. Global names
//! are unique across the generated output. Each controller additionally
//! gets a [`LocalScope`] mapping the symbols it uses to short aliases.

use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::config::NamingConfig;
use crate::error::{CodegenError, Result};
use crate::models::{
    ControllerId, FieldValue, FieldWrapper, LiteralValue, ModelId, TypeDefinition, WrapperArena,
    WrapperRef,
};
use crate::utils::to_pascal_case;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperName {
    pub raw_name: String,
    pub global_name: String,
}

/// Local aliases of the symbols one controller uses, ordered by global name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalScope {
    names: IndexMap<WrapperRef, String>,
}

impl LocalScope {
    pub fn local_name(&self, wrapper: WrapperRef) -> Option<&str> {
        self.names.get(&wrapper).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WrapperRef, &str)> {
        self.names.iter().map(|(&w, name)| (w, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    names: HashMap<WrapperRef, WrapperName>,
    locals: HashMap<ControllerId, LocalScope>,
}

impl NameTable {
    pub fn get(&self, wrapper: WrapperRef) -> &WrapperName {
        &self.names[&wrapper]
    }

    pub fn global(&self, wrapper: WrapperRef) -> &str {
        &self.get(wrapper).global_name
    }

    pub fn model(&self, id: ModelId) -> &str {
        self.global(WrapperRef::Model(id))
    }

    pub fn controller(&self, id: ControllerId) -> &str {
        self.global(WrapperRef::Controller(id))
    }

    pub fn local_scope(&self, controller: ControllerId) -> &LocalScope {
        &self.locals[&controller]
    }
}

pub struct AliasManager<'a> {
    arena: &'a WrapperArena,
    naming: &'a NamingConfig,
}

impl<'a> AliasManager<'a> {
    pub fn new(arena: &'a WrapperArena, naming: &'a NamingConfig) -> Self {
        Self { arena, naming }
    }

    /// Assign global and local names. Pure: the same arena always yields
    /// the same table.
    pub fn assign(&self) -> Result<NameTable> {
        let refs = self.arena.wrapper_refs();
        let (plain, specialized): (Vec<WrapperRef>, Vec<WrapperRef>) =
            refs.iter().copied().partition(|w| !self.is_specialization(*w));

        // Plain declarations: normalize, then prefix colliding names with their module
        let mut cores: HashMap<WrapperRef, String> = plain
            .iter()
            .map(|&w| (w, normalize(self.arena.raw_name(w))))
            .collect();
        let counts = count(plain.iter().map(|w| cores[w].as_str()));
        for &wrapper in &plain {
            if counts[cores[&wrapper].as_str()] > 1 {
                let prefixed = self.module_prefixed(wrapper, &cores[&wrapper]);
                cores.insert(wrapper, prefixed);
            }
        }

        // Specializations: base name plus argument names, innermost first.
        // Each depth settles its collisions before the next one reads its names.
        let mut depths: HashMap<ModelId, usize> = HashMap::new();
        let mut by_depth: BTreeMap<usize, Vec<WrapperRef>> = BTreeMap::new();
        for &wrapper in &specialized {
            if let WrapperRef::Model(id) = wrapper {
                let depth = self.specialization_depth(id, &mut depths);
                by_depth.entry(depth).or_default().push(wrapper);
            }
        }
        for level in by_depth.values() {
            for &wrapper in level {
                let core = self.specialization_name(wrapper, &cores);
                cores.insert(wrapper, core);
            }
            let counts = count(cores.values().map(String::as_str));
            let colliding: Vec<WrapperRef> = level
                .iter()
                .copied()
                .filter(|w| counts[cores[w].as_str()] > 1)
                .collect();
            for wrapper in colliding {
                let prefixed = self.module_prefixed(wrapper, &cores[&wrapper]);
                cores.insert(wrapper, prefixed);
            }
        }

        self.check_unique(&refs, &cores)?;

        let names: HashMap<WrapperRef, WrapperName> = refs
            .iter()
            .map(|&w| {
                let name = WrapperName {
                    raw_name: self.arena.raw_name(w).to_string(),
                    global_name: self.decorate(&cores[&w]),
                };
                (w, name)
            })
            .collect();

        let locals = self
            .arena
            .controllers()
            .iter()
            .map(|c| (c.id, self.local_scope(c.id, &names)))
            .collect();

        debug!(names = names.len(), "Assigned display names");
        Ok(NameTable { names, locals })
    }

    fn is_specialization(&self, wrapper: WrapperRef) -> bool {
        matches!(wrapper, WrapperRef::Model(id) if self.arena.model(id).is_specialization())
    }

    fn decorate(&self, core: &str) -> String {
        format!(
            "{}{}{}",
            self.naming.type_prefix, core, self.naming.type_suffix
        )
    }

    fn module_prefixed(&self, wrapper: WrapperRef, core: &str) -> String {
        let prefix: String = self
            .arena
            .module(wrapper)
            .iter()
            .map(|segment| to_pascal_case(segment))
            .collect();
        if prefix.is_empty() {
            core.to_string()
        } else {
            format!("{prefix}_{core}")
        }
    }

    /// How many specializations are nested inside this one's arguments
    fn specialization_depth(&self, id: ModelId, depths: &mut HashMap<ModelId, usize>) -> usize {
        if let Some(&depth) = depths.get(&id) {
            return depth;
        }
        let mut inner = Vec::new();
        for arg in &self.arena.model(id).generic_args {
            arg.walk(&mut |value| {
                if let FieldValue::Model(nested) = value {
                    if *nested != id && self.arena.model(*nested).is_specialization() {
                        inner.push(*nested);
                    }
                }
            });
        }
        let depth = inner
            .into_iter()
            .map(|nested| self.specialization_depth(nested, depths) + 1)
            .max()
            .unwrap_or(0);
        depths.insert(id, depth);
        depth
    }

    fn specialization_name(&self, wrapper: WrapperRef, cores: &HashMap<WrapperRef, String>) -> String {
        let WrapperRef::Model(id) = wrapper else {
            return normalize(self.arena.raw_name(wrapper));
        };
        let model = self.arena.model(id);
        let mut name = normalize(&model.raw_name);
        for arg in &model.generic_args {
            name.push_str(&self.argument_name(arg, cores));
        }
        name
    }

    fn argument_name(&self, value: &FieldValue, cores: &HashMap<WrapperRef, String>) -> String {
        let wrapper_name = |w: WrapperRef| {
            cores
                .get(&w)
                .cloned()
                .unwrap_or_else(|| normalize(self.arena.raw_name(w)))
        };
        match value {
            FieldValue::Primitive(p) => p.name().to_string(),
            FieldValue::Generic(name) => normalize(name),
            FieldValue::Reference(reference) => normalize(&reference.path.join("")),
            FieldValue::Model(id) => wrapper_name(WrapperRef::Model(*id)),
            FieldValue::SelfReference(r) => wrapper_name(WrapperRef::Model(r.model)),
            FieldValue::Enum(id) => wrapper_name(WrapperRef::Enum(*id)),
            FieldValue::Definition(definition) => {
                let parts: Vec<String> = definition
                    .children()
                    .into_iter()
                    .map(|child| self.argument_name(child, cores))
                    .collect();
                match definition.as_ref() {
                    TypeDefinition::Or(_) => parts.join("Or"),
                    TypeDefinition::ListOf(_) => format!("List{}", parts.concat()),
                    TypeDefinition::SetOf(_) => format!("Set{}", parts.concat()),
                    TypeDefinition::TupleOf(_) => format!("Tuple{}", parts.concat()),
                    TypeDefinition::DictOf { .. } => format!("Dict{}", parts.concat()),
                    TypeDefinition::LiteralOf(values) => {
                        let values: String = values.iter().map(literal_name).collect();
                        format!("Literal{values}")
                    }
                }
            }
        }
    }

    fn check_unique(&self, refs: &[WrapperRef], cores: &HashMap<WrapperRef, String>) -> Result<()> {
        let mut owners: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for &wrapper in refs {
            owners
                .entry(cores[&wrapper].as_str())
                .or_default()
                .push(self.arena.key(wrapper).to_string());
        }
        match owners.into_iter().find(|(_, keys)| keys.len() > 1) {
            Some((name, mut keys)) => {
                keys.sort();
                Err(CodegenError::UnresolvedNameCollision {
                    name: name.to_string(),
                    owners: keys,
                })
            }
            None => Ok(()),
        }
    }

    /// Short aliases for the symbols a controller uses. A symbol keeps its
    /// normalized raw name unless another symbol in the same scope wants it.
    fn local_scope(
        &self,
        controller: ControllerId,
        names: &HashMap<WrapperRef, WrapperName>,
    ) -> LocalScope {
        let mut symbols: Vec<WrapperRef> = controller_symbols(self.arena, controller)
            .into_iter()
            .collect();
        symbols.sort_by(|a, b| names[a].global_name.cmp(&names[b].global_name));

        let mut local: IndexMap<WrapperRef, String> = symbols
            .iter()
            .map(|&w| (w, self.decorate(&normalize(self.arena.raw_name(w)))))
            .collect();

        // Fall back to global names until every alias is unique; global
        // names are unique so this settles
        loop {
            let counts = count(local.values().map(String::as_str));
            let colliding: Vec<WrapperRef> = local
                .iter()
                .filter(|(w, name)| counts[name.as_str()] > 1 && **name != names[*w].global_name)
                .map(|(&w, _)| w)
                .collect();
            if colliding.is_empty() {
                break;
            }
            for wrapper in colliding {
                local.insert(wrapper, names[&wrapper].global_name.clone());
            }
        }

        LocalScope { names: local }
    }
}

/// Every model, enum and exception a controller's generated files refer to,
/// including everything those reference in turn
pub fn controller_symbols(arena: &WrapperArena, controller: ControllerId) -> IndexSet<WrapperRef> {
    let mut symbols = IndexSet::new();
    let mut pending: Vec<WrapperRef> = Vec::new();

    let wrapper = arena.controller(controller);
    pending.extend(wrapper.render.map(WrapperRef::Model));
    collect_fields(&wrapper.render_params, &mut pending);

    for &action_id in arena.all_actions(controller).values() {
        let action = arena.action(action_id);
        collect_fields(&action.params, &mut pending);
        collect_fields(&action.headers, &mut pending);
        pending.extend(action.request_body.map(WrapperRef::Model));
        if let Some(Some(body)) = action.response_bodies.get(&controller) {
            pending.push(WrapperRef::Model(*body));
        }
        pending.extend(action.exceptions.iter().map(|&e| WrapperRef::Exception(e)));
    }

    while let Some(symbol) = pending.pop() {
        if !symbols.insert(symbol) {
            continue;
        }
        match symbol {
            WrapperRef::Model(id) => {
                let model = arena.model(id);
                pending.extend(model.superclasses.iter().map(|&s| WrapperRef::Model(s)));
                collect_fields(&model.value_models, &mut pending);
            }
            WrapperRef::Exception(id) => {
                collect_fields(&arena.exception(id).value_models, &mut pending);
            }
            WrapperRef::Enum(_) | WrapperRef::Controller(_) => {}
        }
    }
    symbols
}

fn collect_fields(fields: &[FieldWrapper], pending: &mut Vec<WrapperRef>) {
    for field in fields {
        field.value.walk(&mut |value| match value {
            FieldValue::Model(id) => pending.push(WrapperRef::Model(*id)),
            FieldValue::Enum(id) => pending.push(WrapperRef::Enum(*id)),
            _ => {}
        });
    }
}

/// Turn a raw name into a valid TypeScript type identifier
pub fn normalize(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        return "_".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => name,
    }
}

/// Name fragment for one literal value: `"draft"` gives `Draft`, `-1` gives `Neg1`
fn literal_name(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Str(s) => normalize(s),
        LiteralValue::Int(i) if *i < 0 => format!("Neg{}", i.unsigned_abs()),
        LiteralValue::Int(i) => i.to_string(),
        LiteralValue::Float(f) => {
            let text = f.abs().to_string().replace('.', "_");
            if f.is_sign_negative() {
                format!("Neg{text}")
            } else {
                text
            }
        }
        LiteralValue::Bool(true) => "True".to_string(),
        LiteralValue::Bool(false) => "False".to_string(),
        LiteralValue::Null => "Null".to_string(),
    }
}

fn count<'n>(names: impl Iterator<Item = &'n str>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for name in names {
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnumWrapper, ModelOrigin, ModelWrapper, Primitive};

    fn module(path: &str) -> Vec<String> {
        crate::utils::split_module_path(path)
    }

    fn add_model(arena: &mut WrapperArena, module_path: &str, name: &str) -> ModelId {
        add_specialization(arena, module_path, name, Vec::new())
    }

    fn add_specialization(
        arena: &mut WrapperArena,
        module_path: &str,
        name: &str,
        generic_args: Vec<FieldValue>,
    ) -> ModelId {
        arena.add_model(|id| ModelWrapper {
            id,
            key: format!("{module_path}::{name}#{}", id.index()),
            raw_name: name.to_string(),
            module: module(module_path),
            generic_args,
            superclasses: Vec::new(),
            value_models: Vec::new(),
            origin: ModelOrigin::Declared,
        })
    }

    fn assign(arena: &WrapperArena) -> Result<NameTable> {
        AliasManager::new(arena, &NamingConfig::default()).assign()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("user-profile"), "Userprofile");
        assert_eq!(normalize("2fa"), "_2fa");
        assert_eq!(normalize("status"), "Status");
        assert_eq!(normalize("My_Model"), "My_Model");
        assert_eq!(normalize("!!"), "_");
    }

    #[test]
    fn test_colliding_names_get_module_prefix() {
        let mut arena = WrapperArena::new();
        let users = add_model(&mut arena, "users::models", "Status");
        let auth = add_model(&mut arena, "auth::models", "Status");
        let unique = add_model(&mut arena, "users::models", "User");

        let names = assign(&arena).unwrap();
        assert_eq!(names.model(users), "UsersModels_Status");
        assert_eq!(names.model(auth), "AuthModels_Status");
        assert_eq!(names.model(unique), "User");
        assert_eq!(names.get(WrapperRef::Model(users)).raw_name, "Status");
    }

    #[test]
    fn test_collisions_span_kinds() {
        let mut arena = WrapperArena::new();
        let model = add_model(&mut arena, "a", "Status");
        let status_enum = arena.add_enum(|id| EnumWrapper {
            id,
            key: "b::Status".to_string(),
            raw_name: "Status".to_string(),
            module: module("b"),
            members: Vec::new(),
        });

        let names = assign(&arena).unwrap();
        assert_eq!(names.model(model), "A_Status");
        assert_eq!(names.global(WrapperRef::Enum(status_enum)), "B_Status");
    }

    #[test]
    fn test_unresolvable_collision() {
        let mut arena = WrapperArena::new();
        add_model(&mut arena, "", "Status");
        add_model(&mut arena, "", "Status");

        let err = assign(&arena).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnresolvedNameCollision { ref name, .. } if name == "Status"
        ));
    }

    #[test]
    fn test_assignment_is_idempotent() {
        let mut arena = WrapperArena::new();
        add_model(&mut arena, "users::models", "Status");
        add_model(&mut arena, "auth::models", "Status");
        add_model(&mut arena, "x", "Other");

        assert_eq!(assign(&arena).unwrap(), assign(&arena).unwrap());
    }

    #[test]
    fn test_specialization_names_use_argument_names() {
        let mut arena = WrapperArena::new();
        let users_status = add_model(&mut arena, "users", "Status");
        let auth_status = add_model(&mut arena, "auth", "Status");
        let page_int = add_specialization(
            &mut arena,
            "app",
            "Page",
            vec![FieldValue::Primitive(Primitive::Integer)],
        );
        let page_users = add_specialization(
            &mut arena,
            "app",
            "Page",
            vec![FieldValue::Model(users_status)],
        );
        let page_auth = add_specialization(
            &mut arena,
            "app",
            "Page",
            vec![FieldValue::Model(auth_status)],
        );

        let names = assign(&arena).unwrap();
        assert_eq!(names.model(page_int), "PageInt");
        assert_eq!(names.model(page_users), "PageUsers_Status");
        assert_eq!(names.model(page_auth), "PageAuth_Status");
    }

    #[test]
    fn test_specialization_colliding_with_declared_model() {
        let mut arena = WrapperArena::new();
        let declared = add_model(&mut arena, "app", "PageInt");
        let page_int = add_specialization(
            &mut arena,
            "generic",
            "Page",
            vec![FieldValue::Primitive(Primitive::Integer)],
        );

        let names = assign(&arena).unwrap();
        assert_eq!(names.model(declared), "PageInt");
        assert_eq!(names.model(page_int), "Generic_PageInt");
    }

    #[test]
    fn test_literal_arguments_name_their_values() {
        let mut arena = WrapperArena::new();
        let literal = |values: Vec<LiteralValue>| {
            FieldValue::definition(TypeDefinition::LiteralOf(values))
        };
        let tagged_a = add_specialization(
            &mut arena,
            "app",
            "Tagged",
            vec![literal(vec![LiteralValue::Str("a".to_string())])],
        );
        let tagged_b = add_specialization(
            &mut arena,
            "app",
            "Tagged",
            vec![literal(vec![LiteralValue::Str("b".to_string())])],
        );
        let tagged_mixed = add_specialization(
            &mut arena,
            "app",
            "Tagged",
            vec![literal(vec![
                LiteralValue::Int(-1),
                LiteralValue::Bool(true),
                LiteralValue::Null,
            ])],
        );

        let names = assign(&arena).unwrap();
        assert_eq!(names.model(tagged_a), "TaggedLiteralA");
        assert_eq!(names.model(tagged_b), "TaggedLiteralB");
        assert_eq!(names.model(tagged_mixed), "TaggedLiteralNeg1TrueNull");
    }

    #[test]
    fn test_outer_specialization_uses_prefixed_inner_name() {
        let mut arena = WrapperArena::new();
        let declared = add_model(&mut arena, "app", "PageInt");
        let page_int = add_specialization(
            &mut arena,
            "generic",
            "Page",
            vec![FieldValue::Primitive(Primitive::Integer)],
        );
        let wrapper = add_specialization(
            &mut arena,
            "app",
            "Wrapper",
            vec![FieldValue::Model(page_int)],
        );

        let names = assign(&arena).unwrap();
        assert_eq!(names.model(declared), "PageInt");
        assert_eq!(names.model(page_int), "Generic_PageInt");
        assert_eq!(names.model(wrapper), "WrapperGeneric_PageInt");
    }

    #[test]
    fn test_naming_prefix_and_suffix() {
        let mut arena = WrapperArena::new();
        let user = add_model(&mut arena, "app", "User");
        let naming = NamingConfig {
            type_prefix: "I".to_string(),
            type_suffix: "DTO".to_string(),
            ..Default::default()
        };

        let names = AliasManager::new(&arena, &naming).assign().unwrap();
        assert_eq!(names.model(user), "IUserDTO");
    }
}
