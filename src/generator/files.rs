//! Output file layout.
//!
//! Everything is rendered into memory first; paths are relative to the
//! configured output directory and the caller writes them once the whole
//! run has succeeded.

use indexmap::{IndexMap, IndexSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{
    ActionInterface, ControllerInterface, EnumInterface, ExceptionInterface, GeneratorContext,
    Interface, LinkInterface, ModelInterface,
};
use crate::alias_manager::NameTable;
use crate::config::{NamingConfig, OutputConfig};
use crate::dependency::{controller_order, model_order};
use crate::error::{CodegenError, Result};
use crate::models::{ActionId, ControllerId, FieldValue, FieldWrapper, WrapperArena, WrapperRef};
use crate::utils::{relative_import, to_camel_case, to_snake_case};

pub const HEADER: &str =
    "// This file is auto-generated by ts-client-codegen. Do not edit manually.\n";

/// A rendered file, relative to the output directory
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

impl GeneratedFile {
    fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }
}

/// Render the global models and links files plus one directory per controller
pub fn generate_files(
    arena: &WrapperArena,
    names: &NameTable,
    output: &OutputConfig,
    naming: &NamingConfig,
) -> Result<Vec<GeneratedFile>> {
    let ctx = GeneratorContext::new(arena, names, naming);
    let models = model_order(arena, names)?;
    let controllers = controller_order(arena, names)?;

    let directories = controller_directories(arena, names, &controllers)?;

    let mut files = vec![
        GeneratedFile::new(
            &output.models_file,
            render_models_file(ctx, &models, &controllers)?,
        ),
        GeneratedFile::new(
            &output.links_file,
            render_links_index(names, &output.links_file, &directories),
        ),
    ];

    for (&controller, directory) in &directories {
        let local = ctx.local_to(controller);
        debug!(
            "Rendering controller {} into {}/",
            names.controller(controller),
            directory.display()
        );

        let models_path = directory.join("models.ts");
        files.push(GeneratedFile::new(
            &models_path,
            render_local_models(local, controller, &models_path, &output.models_file),
        ));

        files.push(GeneratedFile::new(
            directory.join("actions.ts"),
            render_actions(local, controller, &output.runtime_module)?,
        ));

        files.push(GeneratedFile::new(
            directory.join("links.ts"),
            render_links(local, controller)?,
        ));

        let controller_path = directory.join("controller.ts");
        files.push(GeneratedFile::new(
            &controller_path,
            render_controller(ctx, controller, &controller_path, &output.models_file),
        ));
    }

    Ok(files)
}

/// Output directory per controller, keyed in controller order
fn controller_directories(
    arena: &WrapperArena,
    names: &NameTable,
    controllers: &[WrapperRef],
) -> Result<IndexMap<ControllerId, PathBuf>> {
    let mut directories: IndexMap<ControllerId, PathBuf> = IndexMap::new();
    let mut owners: IndexMap<String, ControllerId> = IndexMap::new();

    for &wrapper in controllers {
        let WrapperRef::Controller(id) = wrapper else {
            continue;
        };
        let directory = to_snake_case(names.controller(id));
        if let Some(&previous) = owners.get(&directory) {
            return Err(CodegenError::OutputCollision {
                directory,
                owners: vec![
                    arena.controller(previous).key.clone(),
                    arena.controller(id).key.clone(),
                ],
            });
        }
        owners.insert(directory.clone(), id);
        directories.insert(id, PathBuf::from(directory));
    }
    Ok(directories)
}

fn render_models_file(
    ctx: GeneratorContext,
    models: &[WrapperRef],
    controllers: &[WrapperRef],
) -> Result<String> {
    let mut blocks = Vec::with_capacity(models.len() + controllers.len());
    for &wrapper in models.iter().chain(controllers) {
        let block = match wrapper {
            WrapperRef::Model(id) => ModelInterface::new(ctx, ctx.arena.model(id)).to_ts()?,
            WrapperRef::Enum(id) => EnumInterface::new(ctx, ctx.arena.enum_(id)).to_ts()?,
            WrapperRef::Exception(id) => {
                ExceptionInterface::new(ctx, ctx.arena.exception(id)).to_ts()?
            }
            WrapperRef::Controller(id) => {
                ControllerInterface::new(ctx, ctx.arena.controller(id)).to_ts()?
            }
        };
        blocks.push(block);
    }

    let mut output = String::from(HEADER);
    for block in blocks {
        output.push('\n');
        output.push_str(&block);
    }
    Ok(output)
}

fn render_links_index(
    names: &NameTable,
    links_file: &Path,
    directories: &IndexMap<ControllerId, PathBuf>,
) -> String {
    let mut output = String::from(HEADER);
    if !directories.is_empty() {
        output.push('\n');
    }
    for (&controller, directory) in directories {
        output.push_str(&format!(
            "export {{ getLink as {}GetLink }} from \"{}\";\n",
            to_camel_case(names.controller(controller)),
            relative_import(links_file, &directory.join("links.ts"))
        ));
    }
    output
}

/// Re-export every symbol the controller uses under its local alias
fn render_local_models(
    ctx: GeneratorContext,
    controller: ControllerId,
    path: &Path,
    models_file: &Path,
) -> String {
    let mut types = Vec::new();
    let mut values = Vec::new();
    for (wrapper, local) in ctx.names.local_scope(controller).iter() {
        let global = ctx.names.global(wrapper);
        let specifier = if global == local {
            global.to_string()
        } else {
            format!("{} as {}", global, local)
        };
        match wrapper {
            WrapperRef::Enum(_) => values.push(specifier),
            _ => types.push(specifier),
        }
    }

    let mut output = String::from(HEADER);
    output.push('\n');
    if types.is_empty() && values.is_empty() {
        output.push_str("export {};\n");
        return output;
    }

    let source = relative_import(path, models_file);
    if !types.is_empty() {
        output.push_str(&format!(
            "export type {{ {} }} from \"{}\";\n",
            types.join(", "),
            source
        ));
    }
    if !values.is_empty() {
        output.push_str(&format!(
            "export {{ {} }} from \"{}\";\n",
            values.join(", "),
            source
        ));
    }
    output
}

fn render_actions(
    ctx: GeneratorContext,
    controller: ControllerId,
    runtime_module: &str,
) -> Result<String> {
    let actions = ctx.arena.all_actions(controller);

    let mut symbols = IndexSet::new();
    for &action in actions.values() {
        collect_action_symbols(ctx.arena, action, controller, &mut symbols);
    }

    let mut output = String::from(HEADER);
    output.push('\n');
    output.push_str(&format!(
        "import {{ __request }} from \"{}\";\n",
        runtime_module
    ));
    output.push_str(&local_type_import(ctx, controller, &symbols));

    for &action in actions.values() {
        let interface = ActionInterface::new(ctx, ctx.arena.action(action), Some(controller));
        output.push('\n');
        output.push_str(&interface.to_ts()?);
    }
    Ok(output)
}

fn render_links(ctx: GeneratorContext, controller: ControllerId) -> Result<String> {
    let wrapper = ctx.arena.controller(controller);
    let mut symbols = IndexSet::new();
    collect_field_symbols(&wrapper.render_params, &mut symbols);

    let mut output = String::from(HEADER);
    let imports = local_type_import(ctx, controller, &symbols);
    if !imports.is_empty() {
        output.push('\n');
        output.push_str(&imports);
    }
    output.push('\n');
    output.push_str(&LinkInterface::new(ctx, wrapper).to_ts()?);
    Ok(output)
}

fn render_controller(
    ctx: GeneratorContext,
    controller: ControllerId,
    path: &Path,
    models_file: &Path,
) -> String {
    let name = ctx.names.controller(controller);
    let render = ctx
        .arena
        .controller(controller)
        .render
        .map(|model| ctx.names.model(model));

    let mut imported = vec![name];
    imported.extend(render);

    let mut output = String::from(HEADER);
    output.push('\n');
    output.push_str(&format!(
        "import type {{ {} }} from \"{}\";\n\n",
        imported.join(", "),
        relative_import(path, models_file)
    ));
    output.push_str(&format!("export type {{ {} }};\n\n", name));
    match render {
        Some(render) => output.push_str(&format!(
            "export type ServerState = {} & {};\n",
            render, name
        )),
        None => output.push_str(&format!("export type ServerState = {};\n", name)),
    }
    output
}

/// `import type { ... } from "./models";` for the given symbols, in local scope order
fn local_type_import(
    ctx: GeneratorContext,
    controller: ControllerId,
    symbols: &IndexSet<WrapperRef>,
) -> String {
    let names: Vec<&str> = ctx
        .names
        .local_scope(controller)
        .iter()
        .filter(|(wrapper, _)| symbols.contains(wrapper))
        .map(|(_, local)| local)
        .collect();
    if names.is_empty() {
        return String::new();
    }
    format!("import type {{ {} }} from \"./models\";\n", names.join(", "))
}

/// Types an action's signature names directly
fn collect_action_symbols(
    arena: &WrapperArena,
    action: ActionId,
    controller: ControllerId,
    symbols: &mut IndexSet<WrapperRef>,
) {
    let action = arena.action(action);
    collect_field_symbols(&action.params, symbols);
    collect_field_symbols(&action.headers, symbols);
    symbols.extend(action.request_body.map(WrapperRef::Model));
    if !action.is_raw_response {
        if let Some(Some(body)) = action.response_bodies.get(&controller) {
            symbols.insert(WrapperRef::Model(*body));
        }
    }
}

fn collect_field_symbols(fields: &[FieldWrapper], symbols: &mut IndexSet<WrapperRef>) {
    for field in fields {
        field.value.walk(&mut |value| match value {
            FieldValue::Model(id) => {
                symbols.insert(WrapperRef::Model(*id));
            }
            FieldValue::SelfReference(self_ref) => {
                symbols.insert(WrapperRef::Model(self_ref.model));
            }
            FieldValue::Enum(id) => {
                symbols.insert(WrapperRef::Enum(*id));
            }
            _ => {}
        });
    }
}
