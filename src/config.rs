use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `ts-codegen.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub naming: NamingConfig,
}

/// Input configuration - where to find schema files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory to scan for `.toml` schema files
    pub schema_dir: PathBuf,
    /// Directories or files to exclude from scanning
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Output configuration - where to write generated TypeScript files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory of the generated client
    pub output_dir: PathBuf,
    /// Global models file, relative to `output_dir`
    #[serde(default = "default_models_file")]
    pub models_file: PathBuf,
    /// Aggregated link generators, relative to `output_dir`
    #[serde(default = "default_links_file")]
    pub links_file: PathBuf,
    /// Module providing `__request`
    #[serde(default = "default_runtime_module")]
    pub runtime_module: String,
}

/// Decorations applied to every generated name
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NamingConfig {
    /// Prepended to every exported type name
    #[serde(default)]
    pub type_prefix: String,
    /// Appended after the type prefix and global name
    #[serde(default)]
    pub type_suffix: String,
    /// Prepended to action function names (`getUser`)
    #[serde(default)]
    pub function_prefix: String,
    #[serde(default)]
    pub function_suffix: String,
}

fn default_models_file() -> PathBuf {
    PathBuf::from("models.ts")
}

fn default_links_file() -> PathBuf {
    PathBuf::from("links.ts")
}

fn default_runtime_module() -> String {
    "@/lib/runtime".to_string()
}

impl OutputConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            models_file: default_models_file(),
            links_file: default_links_file(),
            runtime_module: default_runtime_module(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if !self.input.schema_dir.exists() {
            anyhow::bail!(
                "Schema directory does not exist: {}",
                self.input.schema_dir.display()
            );
        }

        for file in [&self.output.models_file, &self.output.links_file] {
            if file.is_absolute() || file.extension().map_or(true, |ext| ext != "ts") {
                anyhow::bail!(
                    "Output files must be relative `.ts` paths: {}",
                    file.display()
                );
            }
        }

        // Ensure the output directory exists or can be created
        let output_dir = &self.output.output_dir;
        if !output_dir.exists() && !output_dir.as_os_str().is_empty() {
            fs::create_dir_all(output_dir).with_context(|| {
                format!("Failed to create output directory: {}", output_dir.display())
            })?;
        }

        Ok(())
    }

    /// Generate a default configuration
    pub fn default_config() -> Self {
        Config {
            input: InputConfig {
                schema_dir: PathBuf::from("schemas"),
                exclude: vec!["drafts".to_string()],
            },
            output: OutputConfig::new("frontend/_server"),
            naming: NamingConfig::default(),
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}
