use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use loadstructure::Value;
use serde_json::Value as JsonValue;

use super::{load_root, open_manager};
use crate::{output, ux_error};

#[derive(Args)]
pub struct SetArgs {
    #[arg(help = "Configuration file to edit (created if missing)")]
    pub file: PathBuf,

    #[arg(help = "Dotted path of the value (e.g., editor.font.size)")]
    pub path: String,

    #[arg(help = "New value, parsed as JSON and otherwise taken as a string")]
    pub value: String,

    #[arg(long, help = "Schema file the document must satisfy")]
    pub schema: Option<PathBuf>
}

pub fn run(args: SetArgs) -> Result<()> {
    let mut manager = open_manager(&args.file, args.schema.as_deref())?;
    let root = load_root(&mut manager, &args.file)?;

    let value = parse_value(&args.value);
    if let Err(e) = root.set_path(&args.path, value) {
        ux_error::schema_violation(&e).display();
        return Err(anyhow::anyhow!("Invalid value for {}", args.path));
    }

    manager.save()?;
    output::success(&format!("{} updated in {}", args.path, args.file.display()));
    Ok(())
}

/// `14` is an int, `"14"` and `fourteen` are strings, `{"a": 1}` a mapping.
fn parse_value(raw: &str) -> Value {
    let plain = serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()));
    Value::from(plain)
}
