use colored::Colorize;
use loadstructure::SchemaError;

#[derive(Debug)]
pub struct UxError {
    pub what: String,
    pub why: Option<String>,
    pub how_to_fix: Vec<String>,
    pub suggested_command: Option<String>,
}

impl UxError {
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            why: None,
            how_to_fix: Vec::new(),
            suggested_command: None,
        }
    }

    pub fn why(mut self, reason: impl Into<String>) -> Self {
        self.why = Some(reason.into());
        self
    }

    pub fn fix(mut self, suggestion: impl Into<String>) -> Self {
        self.how_to_fix.push(suggestion.into());
        self
    }

    pub fn suggest(mut self, cmd: impl Into<String>) -> Self {
        self.suggested_command = Some(cmd.into());
        self
    }

    pub fn display(&self) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), self.what.white().bold());

        if let Some(why) = &self.why {
            eprintln!("       {}", why.dimmed());
        }

        if !self.how_to_fix.is_empty() {
            eprintln!();
            eprintln!("{}", "How to fix:".yellow().bold());
            for (i, fix) in self.how_to_fix.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, fix);
            }
        }

        if let Some(cmd) = &self.suggested_command {
            eprintln!();
            eprintln!("{}", "Try this:".green().bold());
            eprintln!("  $ {}", cmd.cyan());
        }
        eprintln!();
    }
}

impl std::fmt::Display for UxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.what)
    }
}

impl std::error::Error for UxError {}

pub fn source_not_found(path: &str) -> UxError {
    UxError::new(format!("Source file not found: {}", path))
        .why("The configuration document to read does not exist")
        .fix("Check the path for typos")
        .fix("Create the file first, e.g. by setting a value into it")
        .suggest(format!("loadstructure set {} <key> <value>", path))
}

pub fn conversion_failed(source: &str, destination: &str, reason: &str) -> UxError {
    UxError::new(format!("Conversion failed: {} → {}", source, destination))
        .why(reason.to_string())
        .fix("Make sure the source parses in the format its extension names")
        .fix("Use a .json, .yaml, .yml, .toml or .xml extension for the destination")
        .fix("TOML cannot store null values; convert such documents to JSON or YAML")
}

pub fn load_failed(file: &str, reason: &str) -> UxError {
    UxError::new(format!("Failed to load config: {}", file))
        .why(reason.to_string())
        .fix("Make sure the file parses in the format its extension names")
        .fix("If a schema was given, check the file's keys and value types against it")
}

pub fn key_not_found(path: &str, file: &str) -> UxError {
    UxError::new(format!("Key not found: '{}'", path))
        .why(format!("No value exists at this dotted path in {}", file))
        .fix("Check each segment of the path")
        .suggest(format!("loadstructure set {} {} <value>", file, path))
}

pub fn schema_violation(err: &SchemaError) -> UxError {
    let why = match err {
        SchemaError::UnknownKey { .. } => "The schema does not declare this key",
        SchemaError::TypeMismatch { .. } => "The value does not have the type the schema requires",
        SchemaError::CannotAutoCreate { .. } => {
            "Only mappings can be created on the way to a nested key"
        }
        SchemaError::InvalidPath { .. } => "Dotted paths cannot contain empty segments",
        SchemaError::InvalidRule { .. } => "The schema file names a rule that does not exist",
    };
    UxError::new(err.to_string())
        .why(why)
        .fix("Compare the path and value with the schema file")
        .fix("Quote strings that look like numbers, e.g. '\"21\"'")
}

pub fn invalid_schema_file(path: &str, reason: &str) -> UxError {
    UxError::new(format!("Invalid schema file: {}", path))
        .why(reason.to_string())
        .fix("Use rule names: bool, int, float, string, dict, list")
        .fix("Describe nested schemas as nested mappings")
}
