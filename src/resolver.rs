//! Module resolver - tracks schema declarations per module and resolves
//! type references based on imports and module structure

use anyhow::{Context, Result as AnyResult};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use syn::UseTree;
use tracing::debug;

use crate::error::{CodegenError, Result};
use crate::models::{ControllerDecl, EnumDecl, ExceptionDecl, ModelDecl, SchemaFile};
use crate::utils::{qualified_key, split_module_path};

/// Names visible inside one module
#[derive(Debug, Default)]
pub struct ModuleScope {
    pub module_path: Vec<String>,
    /// Declarations made in this module
    pub local_types: HashSet<String>,
    /// Imports: local name -> full path
    pub imports: HashMap<String, Vec<String>>,
    /// Wildcard imports (`shared::*`)
    pub wildcard_imports: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub enum Declaration {
    Model(ModelDecl),
    Enum(EnumDecl),
    Exception(ExceptionDecl),
    Controller(ControllerDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Model(d) => &d.name,
            Declaration::Enum(d) => &d.name,
            Declaration::Exception(d) => &d.name,
            Declaration::Controller(d) => &d.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Declaration::Model(_) => "model",
            Declaration::Enum(_) => "enum",
            Declaration::Exception(_) => "exception",
            Declaration::Controller(_) => "controller",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub module: Vec<String>,
    pub declaration: Declaration,
}

/// Every declaration of every schema file, keyed by qualified name
#[derive(Debug, Default)]
pub struct ModuleResolver {
    pub modules: HashMap<Vec<String>, ModuleScope>,
    /// Qualified key (`users::models::User`) -> declaration, in load order
    pub declarations: IndexMap<String, Entry>,
    /// Simple name -> qualified keys that declare it
    pub type_locations: HashMap<String, Vec<String>>,
}

impl ModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a schema file and register its declarations
    pub fn parse_file(&mut self, path: &Path, content: &str, base_path: &Path) -> AnyResult<()> {
        let file = SchemaFile::parse(content)
            .with_context(|| format!("Failed to parse schema file: {}", path.display()))?;

        let module = match &file.module {
            Some(module) => split_module_path(module),
            None => path_to_module(path, base_path),
        };
        debug!(path = %path.display(), module = %module.join("::"), "Loaded schema file");

        self.add_file(module, file)
            .with_context(|| format!("Invalid schema file: {}", path.display()))
    }

    /// Register the declarations of one module
    pub fn add_file(&mut self, module: Vec<String>, file: SchemaFile) -> Result<()> {
        let mut scope = self.modules.remove(&module).unwrap_or_else(|| ModuleScope {
            module_path: module.clone(),
            ..Default::default()
        });

        for import in &file.imports {
            let tree: UseTree =
                syn::parse_str(import).map_err(|source| CodegenError::InvalidAnnotation {
                    context: format!("imports of module `{}`", module.join("::")),
                    annotation: import.clone(),
                    source,
                })?;
            parse_use_tree(&tree, &mut scope, Vec::new());
        }

        let declarations = file
            .models
            .into_iter()
            .map(Declaration::Model)
            .chain(file.enums.into_iter().map(Declaration::Enum))
            .chain(file.exceptions.into_iter().map(Declaration::Exception))
            .chain(file.controllers.into_iter().map(Declaration::Controller));

        for declaration in declarations {
            let name = declaration.name().to_string();
            let key = qualified_key(&module, &name);
            if self.declarations.contains_key(&key) {
                return Err(CodegenError::DuplicateDeclaration(key));
            }
            scope.local_types.insert(name.clone());
            self.type_locations.entry(name).or_default().push(key.clone());
            self.declarations.insert(
                key,
                Entry {
                    module: module.clone(),
                    declaration,
                },
            );
        }

        self.modules.insert(module, scope);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.declarations.get(key)
    }

    /// Keys of every declared controller, in load order
    pub fn controller_keys(&self) -> Vec<String> {
        self.declarations
            .iter()
            .filter(|(_, entry)| matches!(entry.declaration, Declaration::Controller(_)))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Resolve a type path as seen from `from_module` to a declaration key.
    ///
    /// `Ok(None)` means nothing matched; several equally good matches are an
    /// ambiguity error.
    pub fn resolve_type(
        &self,
        path: &[String],
        from_module: &[String],
        context: &str,
    ) -> Result<Option<String>> {
        let Some(type_name) = path.last() else {
            return Ok(None);
        };
        let scope = self.modules.get(from_module);

        if path.len() == 1 {
            // 1. Local declaration
            if scope.is_some_and(|s| s.local_types.contains(type_name)) {
                return Ok(Some(qualified_key(from_module, type_name)));
            }

            // 2. Explicit import
            if let Some(imported) = scope.and_then(|s| s.imports.get(type_name)) {
                if let Some(key) = self.find_by_path(imported, from_module) {
                    return Ok(Some(key));
                }
            }

            // 3. Wildcard imports
            if let Some(scope) = scope {
                let matches: Vec<String> = scope
                    .wildcard_imports
                    .iter()
                    .filter_map(|prefix| {
                        let mut full = prefix.clone();
                        full.push(type_name.clone());
                        self.find_by_path(&full, from_module)
                    })
                    .collect::<Vec<_>>();
                match matches.as_slice() {
                    [] => {}
                    [single] => return Ok(Some(single.clone())),
                    _ => {
                        return Err(CodegenError::AmbiguousReference {
                            context: context.to_string(),
                            name: type_name.clone(),
                            candidates: matches,
                        })
                    }
                }
            }
        } else if let Some(key) = self.find_by_path(path, from_module) {
            // 4./5. Absolute or module-relative path
            return Ok(Some(key));
        }

        // 6. Fallback: a unique declaration whose key ends with the path
        let suffix = path.join("::");
        let candidates: Vec<String> = self
            .type_locations
            .get(type_name)
            .map(|keys| {
                keys.iter()
                    .filter(|k| **k == suffix || k.ends_with(&format!("::{suffix}")))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        match candidates.len() {
            0 => Ok(None),
            1 => Ok(candidates.into_iter().next()),
            _ => Err(CodegenError::AmbiguousReference {
                context: context.to_string(),
                name: suffix,
                candidates,
            }),
        }
    }

    /// Find a declaration by absolute path, then relative to `from_module`
    fn find_by_path(&self, path: &[String], from_module: &[String]) -> Option<String> {
        let absolute = path.join("::");
        if self.declarations.contains_key(&absolute) {
            return Some(absolute);
        }
        let relative = qualified_key(from_module, &absolute);
        if self.declarations.contains_key(&relative) {
            return Some(relative);
        }
        None
    }
}

/// Parse use tree recursively
fn parse_use_tree(tree: &UseTree, scope: &mut ModuleScope, mut prefix: Vec<String>) {
    match tree {
        UseTree::Path(path) => {
            let segment = path.ident.to_string();
            if segment != "crate" {
                prefix.push(segment);
            }
            parse_use_tree(&path.tree, scope, prefix);
        }
        UseTree::Name(name) => {
            let type_name = name.ident.to_string();
            prefix.push(type_name.clone());
            scope.imports.insert(type_name, prefix);
        }
        UseTree::Rename(rename) => {
            let original_name = rename.ident.to_string();
            let alias = rename.rename.to_string();
            prefix.push(original_name);
            scope.imports.insert(alias, prefix);
        }
        UseTree::Glob(_) => {
            scope.wildcard_imports.push(prefix);
        }
        UseTree::Group(group) => {
            for item in &group.items {
                parse_use_tree(item, scope, prefix.clone());
            }
        }
    }
}

/// Convert a schema file path to its module path
pub fn path_to_module(path: &Path, base_path: &Path) -> Vec<String> {
    let relative = path.strip_prefix(base_path).unwrap_or(path);
    let mut parts: Vec<String> = Vec::new();

    for component in relative.components() {
        if let std::path::Component::Normal(s) = component {
            let s = s.to_string_lossy();
            if s == "mod.toml" {
                continue;
            }
            let name = s.trim_end_matches(".toml");
            parts.push(name.to_string());
        }
    }

    parts
}
