use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::alias_manager::AliasManager;
use crate::config::{Config, NamingConfig, OutputConfig};
use crate::error::Result as CodegenResult;
use crate::generator::{generate_files, GeneratedFile};
use crate::parser::parse_all;
use crate::resolver::ModuleResolver;
use crate::scanner::Scanner;
use crate::validation::validate_dict_keys;

/// Main pipeline for generating TypeScript client code
pub struct Pipeline {
    verbose: bool,
}

impl Pipeline {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Run the full generation pipeline
    pub fn run(&self, config: &Config) -> Result<()> {
        let resolver = self.load_schemas(config)?;

        let files = generate(&resolver, &config.output, &config.naming)
            .context("Failed to generate TypeScript client")?;

        write_files(&config.output.output_dir, &files, self.verbose)?;
        info!(
            "Generated {} files in {}",
            files.len(),
            config.output.output_dir.display()
        );
        Ok(())
    }

    /// Step 1: scan the schema directory and register every declaration
    fn load_schemas(&self, config: &Config) -> Result<ModuleResolver> {
        let scanner = Scanner::new(
            config.input.schema_dir.clone(),
            config.input.exclude.clone(),
        );
        let paths = scanner.scan()?;
        info!(
            "Found {} schema files in {}",
            paths.len(),
            config.input.schema_dir.display()
        );
        if paths.is_empty() {
            warn!("No schema files found; only empty index files will be generated");
        }

        let mut resolver = ModuleResolver::new();
        for path in &paths {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
            resolver.parse_file(path, &content, &config.input.schema_dir)?;
        }
        Ok(resolver)
    }
}

/// Steps 2-6: parse controllers, validate, name, order and render.
/// Pure: nothing touches the filesystem, so a failure leaves no partial output.
pub fn generate(
    resolver: &ModuleResolver,
    output: &OutputConfig,
    naming: &NamingConfig,
) -> CodegenResult<Vec<GeneratedFile>> {
    let arena = parse_all(resolver)?;
    info!(
        controllers = arena.controllers().len(),
        actions = arena.actions().len(),
        models = arena.models().len(),
        enums = arena.enums().len(),
        exceptions = arena.exceptions().len(),
        "Parsed controllers"
    );

    validate_dict_keys(&arena)?;

    let names = AliasManager::new(&arena, naming).assign()?;

    generate_files(&arena, &names, output, naming)
}

/// Write rendered files below `output_dir`
fn write_files(output_dir: &Path, files: &[GeneratedFile], verbose: bool) -> Result<()> {
    for file in files {
        let path = output_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;

        if verbose {
            info!("Wrote {}", path.display());
        } else {
            debug!("Wrote {}", path.display());
        }
    }
    Ok(())
}
