//! The `dropboard config` command: inspect, check and create the config file.

use std::path::Path;

use clap::{Args, Subcommand};
use dropboard_core::{AcceptFilter, Config};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file path
    Path,

    /// Validate the config file and summarize what a drop will accept
    Check,

    /// Write a config file with defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let path = Config::default_path();
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", source_line(&path));
            println!("{}", config.to_toml()?);
        }
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Check => {
            let config = Config::load()?;
            println!("{}", source_line(&path));
            println!("{}", summarize(&config));
        }
        ConfigCommand::Init { force } => {
            write_defaults(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }
    Ok(())
}

/// Comment line naming where the effective config comes from.
fn source_line(path: &Path) -> String {
    if path.exists() {
        format!("# config: {}", path.display())
    } else {
        format!("# config: built-in defaults ({} not found)", path.display())
    }
}

/// Human-readable summary of the settings that shape a drop.
fn summarize(config: &Config) -> String {
    let accept = AcceptFilter::parse(&config.ingest.accept);
    let thumbnails = if config.thumbnail.enabled {
        format!("{}px WebP", config.thumbnail.size)
    } else {
        "off".to_string()
    };
    let output = config
        .output_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());

    [
        "Configuration is valid.".to_string(),
        format!("  accept:        {accept}"),
        format!("  decodes:       {} at once", config.ingest.max_concurrent_decodes),
        format!(
            "  limits:        {} MB per file, {} px per side",
            config.limits.max_file_size_mb, config.limits.max_image_dimension
        ),
        format!("  thumbnails:    {thumbnails}"),
        format!("  output:        {} -> {}", config.output.format, output),
    ]
    .join("\n")
}

/// Write the default config to `path`, refusing to clobber an existing file.
fn write_defaults(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}
