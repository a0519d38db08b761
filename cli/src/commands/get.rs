use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use loadstructure::Value;

use super::{load_root, open_manager};
use crate::ux_error;

#[derive(Args)]
pub struct GetArgs {
    #[arg(help = "Configuration file to read")]
    pub file: PathBuf,

    #[arg(help = "Dotted path of the value (e.g., editor.font.size)")]
    pub path: String,

    #[arg(long, help = "Schema file the document must satisfy")]
    pub schema: Option<PathBuf>,

    #[arg(long, help = "Print strings without JSON quoting")]
    pub raw: bool
}

pub fn run(args: GetArgs) -> Result<()> {
    let file = args.file.display().to_string();
    if !args.file.exists() {
        ux_error::source_not_found(&file).display();
        return Err(anyhow::anyhow!("Source file not found"));
    }

    let mut manager = open_manager(&args.file, args.schema.as_deref())?;
    let root = load_root(&mut manager, &args.file)?;

    match root.resolve_path(&args.path) {
        Ok(Some(Value::String(s))) if args.raw => println!("{s}"),
        Ok(Some(value)) => println!("{}", serde_json::to_string_pretty(&value.to_plain())?),
        Err(e) => {
            ux_error::schema_violation(&e).display();
            return Err(anyhow::anyhow!("Invalid path: {}", args.path));
        }
        Ok(None) => {
            ux_error::key_not_found(&args.path, &file).display();
            return Err(anyhow::anyhow!("Key not found: {}", args.path));
        }
    }

    Ok(())
}
