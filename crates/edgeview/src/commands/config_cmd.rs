//! Config subcommand handlers.

use std::path::Path;

use edgeview_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Write a default config to `path`, refusing to clobber unless `force`.
fn init_at(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::ConfigExists {
            path: path.display().to_string(),
        });
    }
    config::save_config_to(&Config::default(), path)?;
    Ok(())
}

/// TOML for table/plain output, serde formats otherwise.
fn render_config(cfg: &Config, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Table | OutputFormat::Plain => Ok(toml::to_string_pretty(cfg)?),
        OutputFormat::Json => output::render_json(cfg, false),
        OutputFormat::JsonCompact => output::render_json(cfg, true),
        OutputFormat::Yaml => output::render_yaml(cfg),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { force } => {
            let path = config::config_path();
            init_at(&path, force)?;
            if !global.quiet {
                eprintln!("Wrote default configuration to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            // Shown as loaded: file + environment, without CLI flag overrides.
            let cfg = config::load_config()?;
            let rendered = render_config(&cfg, global.output.unwrap_or(OutputFormat::Table))?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
