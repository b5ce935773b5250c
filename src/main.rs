use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ts_client_codegen::cli::{Cli, Commands};
use ts_client_codegen::config::Config;
use ts_client_codegen::pipeline::Pipeline;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Generate { config, verbose } => {
            init_logging(verbose);
            run_generate(&config, verbose)?;
        }
        Commands::Init { output, force } => {
            init_logging(false);
            run_init(&output, force)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Run the generate command
fn run_generate(config_path: &std::path::Path, verbose: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    info!("Loaded configuration from: {}", config_path.display());

    let pipeline = Pipeline::new(verbose);
    pipeline.run(&config)
}

/// Run the init command
fn run_init(output_path: &std::path::Path, force: bool) -> Result<()> {
    if output_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    let config = Config::default_config();
    config.save(output_path)?;

    info!("Created configuration file: {}", output_path.display());
    println!("\nEdit the file to configure:");
    println!("  - schema_dir: Directory of .toml schema files");
    println!("  - exclude: Directories to skip during scanning");
    println!("  - output_dir: Root of the generated TypeScript client");
    println!("  - runtime_module: Module exporting `__request`");

    Ok(())
}
