pub mod convert;
pub mod get;
pub mod set;

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use loadstructure::{ConfigManager, ConfigNode, Format, Schema, load_plain};

use crate::ux_error;

#[derive(Parser)]
#[command(
    name = "loadstructure",
    author,
    version,
    about = "Powerful configuration loader CLI",
    long_about = "Load, inspect, edit and convert configuration documents.\n\nJSON, YAML, TOML \
                  and XML are detected from the file extension. Pass --schema to validate documents \
                  against a schema description file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Convert config format (Usage: loadstructure convert <source> <destination>)"
    )]
    Convert(convert::ConvertArgs),

    #[command(about = "Print the value at a dotted path")]
    Get(get::GetArgs),

    #[command(about = "Set the value at a dotted path and save the file")]
    Set(set::SetArgs)
}

/// Manager for `file`, bound to the schema in `schema_file` when given.
pub(crate) fn open_manager(file: &Path, schema_file: Option<&Path>) -> Result<ConfigManager> {
    let manager = ConfigManager::new(file);
    match schema_file {
        Some(schema_file) => Ok(manager.with_schema(load_schema(schema_file)?)),
        None => Ok(manager)
    }
}

/// Load the managed document, rendering failures for the user.
pub(crate) fn load_root<'m>(manager: &'m mut ConfigManager, file: &Path) -> Result<&'m mut ConfigNode> {
    match manager.load() {
        Ok(root) => Ok(root),
        Err(e) => {
            ux_error::load_failed(&file.display().to_string(), &e.to_string()).display();
            Err(anyhow::anyhow!("Failed to load config"))
        }
    }
}

fn load_schema(path: &Path) -> Result<Schema> {
    let parsed = Format::from_path(path)
        .and_then(|format| load_plain(path, format))
        .map_err(|e| e.to_string())
        .and_then(|plain| Schema::from_plain(&plain).map_err(|e| e.to_string()));

    match parsed {
        Ok(schema) => {
            tracing::debug!("Loaded schema with {} keys from {:?}", schema.len(), path);
            Ok(schema)
        }
        Err(reason) => {
            ux_error::invalid_schema_file(&path.display().to_string(), &reason).display();
            Err(anyhow::anyhow!("Invalid schema file"))
        }
    }
}
