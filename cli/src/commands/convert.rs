use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::open_manager;
use crate::{output, ux_error};

#[derive(Args)]
pub struct ConvertArgs {
    #[arg(help = "Path to the source configuration file (e.g., config.json)")]
    pub source: PathBuf,

    #[arg(help = "Path for the destination configuration file (e.g., config.yaml)")]
    pub destination: PathBuf,

    #[arg(long, help = "Schema file the source must satisfy")]
    pub schema: Option<PathBuf>
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let source = args.source.display().to_string();
    let destination = args.destination.display().to_string();

    if !args.source.exists() {
        ux_error::source_not_found(&source).display();
        return Err(anyhow::anyhow!("Source file not found"));
    }

    let mut manager = open_manager(&args.source, args.schema.as_deref())?;

    let converted = manager
        .load()
        .map(|_| ())
        .and_then(|()| manager.save_to(&args.destination));

    if let Err(e) = converted {
        ux_error::conversion_failed(&source, &destination, &e.to_string()).display();
        return Err(anyhow::anyhow!("Conversion failed"));
    }

    output::success(&format!("Converted successfully: {source} → {destination}"));
    Ok(())
}
