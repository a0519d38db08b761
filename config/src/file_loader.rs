//! # Configuration File Loading
//!
//! Converts configuration documents between files and the plain nested
//! structure (`serde_json::Value`) exchanged with the configuration tree.
//!
//! Supports automatic format detection based on file extension.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use errors::SchemaError;
use serde_json::{Map, Value as JsonValue};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::xml;

/// Configuration file loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse {format}: {reason}")]
    Parse { format: Format, reason: String },

    #[error("Failed to serialize {format}: {reason}")]
    Serialize { format: Format, reason: String },

    #[error("Config document must be a mapping, got {0}")]
    NotAMapping(String),

    #[error("Schema violation: {0}")]
    Schema(#[from] SchemaError),
}

/// Document formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Toml,
    Xml,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
            Self::Xml => "XML",
        }
    }

    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigFileError> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or(ConfigFileError::NoExtension)?;
        extension.parse()
    }
}

impl FromStr for Format {
    type Err = ConfigFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "xml" => Ok(Self::Xml),
            other => Err(ConfigFileError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse document text. Blank text is an empty mapping.
pub fn parse_str(format: Format, text: &str) -> Result<JsonValue, ConfigFileError> {
    if text.trim().is_empty() {
        return Ok(JsonValue::Object(Map::new()));
    }

    let parse_error = |reason: String| ConfigFileError::Parse { format, reason };
    match format {
        Format::Json => serde_json::from_str(text).map_err(|e| parse_error(e.to_string())),
        Format::Yaml => serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(text).map_err(|e| parse_error(e.to_string())),
        Format::Xml => xml::from_xml_str(text).map_err(parse_error),
    }
}

/// Render a plain document in `format`.
pub fn to_string(format: Format, plain: &JsonValue) -> Result<String, ConfigFileError> {
    let serialize_error = |reason: String| ConfigFileError::Serialize { format, reason };
    match format {
        Format::Json => serde_json::to_string_pretty(plain)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| serialize_error(e.to_string())),
        Format::Yaml => serde_yaml::to_string(plain).map_err(|e| serialize_error(e.to_string())),
        Format::Toml => toml::to_string_pretty(plain).map_err(|e| serialize_error(e.to_string())),
        Format::Xml => xml::to_xml_string(plain).map_err(serialize_error),
    }
}

/// Load a plain document from file.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Reads a configuration document in the given format.
///
/// ## Usage
/// ```rust,no_run
/// use loadstructure::{Format, load_plain};
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let plain = load_plain(Path::new("config.yaml"), Format::Yaml)?;
///     println!("{plain}");
///     Ok(())
/// }
/// ```
///
/// ## Error Handling
/// Returns `ConfigFileError` for:
/// - File not found
/// - Other read failures
/// - Invalid syntax for the format
pub fn load_plain(path: &Path, format: Format) -> Result<JsonValue, ConfigFileError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigFileError::FileNotFound(path.display().to_string())
        } else {
            ConfigFileError::Io(e)
        }
    })?;
    debug!("Read {} bytes of {} from {:?}", contents.len(), format, path);
    parse_str(format, &contents)
}

/// Save a plain document to file.
///
/// The document is written to a temporary file next to `path` and renamed
/// into place, so readers never observe a half-written file. Missing parent
/// directories are created.
pub fn save_plain(path: &Path, format: Format, plain: &JsonValue) -> Result<(), ConfigFileError> {
    let rendered = to_string(format, plain)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(rendered.as_bytes())?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| ConfigFileError::Io(e.error))?;

    debug!("Wrote {} bytes of {} to {:?}", rendered.len(), format, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(Format::from_path(Path::new("a.Xml")).unwrap(), Format::Xml);
    }

    #[test]
    fn test_format_detection_unsupported() {
        let result = Format::from_path(Path::new("data.ini"));
        assert!(matches!(result, Err(ConfigFileError::UnsupportedFormat(ext)) if ext == "ini"));
    }

    #[test]
    fn test_format_detection_no_extension() {
        let result = Format::from_path(Path::new("config"));
        assert!(matches!(result, Err(ConfigFileError::NoExtension)));
    }

    #[test]
    fn test_parse_blank_is_empty_mapping() {
        for format in [Format::Json, Format::Yaml, Format::Toml, Format::Xml] {
            assert_eq!(parse_str(format, "  \n").unwrap(), json!({}));
        }
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
database:
  host: localhost
  port: 3306
  enabled: true
skills:
  - python
  - c++
version: 1.0
"#;
        assert_eq!(
            parse_str(Format::Yaml, yaml).unwrap(),
            json!({
                "database": {"host": "localhost", "port": 3306, "enabled": true},
                "skills": ["python", "c++"],
                "version": 1.0
            })
        );
    }

    #[test]
    fn test_parse_toml() {
        let toml_content = r#"
name = "Anmol"

[editor.font]
size = 14
family = "Consolas"
"#;
        assert_eq!(
            parse_str(Format::Toml, toml_content).unwrap(),
            json!({"name": "Anmol", "editor": {"font": {"size": 14, "family": "Consolas"}}})
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            parse_str(Format::Json, "{\"a\": "),
            Err(ConfigFileError::Parse { format: Format::Json, .. })
        ));
        assert!(matches!(
            parse_str(Format::Yaml, "invalid: [unmatched"),
            Err(ConfigFileError::Parse { format: Format::Yaml, .. })
        ));
        assert!(matches!(
            parse_str(Format::Toml, "[invalid"),
            Err(ConfigFileError::Parse { format: Format::Toml, .. })
        ));
        assert!(matches!(
            parse_str(Format::Xml, "<config><a></b></config>"),
            Err(ConfigFileError::Parse { format: Format::Xml, .. })
        ));
    }

    #[test]
    fn test_toml_cannot_hold_null() {
        let result = to_string(Format::Toml, &json!({"a": null}));
        assert!(matches!(result, Err(ConfigFileError::Serialize { format: Format::Toml, .. })));
    }

    #[test]
    fn test_save_and_load_every_format() {
        let dir = TempDir::new().unwrap();
        let plain = json!({
            "name": "Anmol",
            "age": 21,
            "version": 1.5,
            "skill": {"language": ["python", "c++"], "experience": {"years": 3}}
        });

        for (file, format) in [
            ("cfg.json", Format::Json),
            ("cfg.yaml", Format::Yaml),
            ("cfg.toml", Format::Toml),
            ("cfg.xml", Format::Xml),
        ] {
            let path = dir.path().join(file);
            save_plain(&path, format, &plain).unwrap();
            assert_eq!(load_plain(&path, format).unwrap(), plain, "{file}");
        }
    }

    #[test]
    fn test_xml_rejects_keys_that_are_not_element_names() {
        let result = to_string(Format::Xml, &json!({"c++": true}));
        assert!(matches!(result, Err(ConfigFileError::Serialize { format: Format::Xml, .. })));
    }

    #[test]
    fn test_large_integers_survive_files() {
        let dir = TempDir::new().unwrap();
        let plain = json!({"id": u64::MAX});

        for (file, format) in [
            ("big.json", Format::Json),
            ("big.yaml", Format::Yaml),
            ("big.xml", Format::Xml),
        ] {
            let path = dir.path().join(file);
            save_plain(&path, format, &plain).unwrap();
            assert_eq!(load_plain(&path, format).unwrap(), plain, "{file}");
        }
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("cfg.json");
        save_plain(&path, Format::Json, &json!({"a": 1})).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        assert!(text.contains("\"a\": 1"));
    }

    #[test]
    fn test_load_not_found() {
        let path = Path::new("/nonexistent/path/config.json");
        let result = load_plain(path, Format::Json);
        assert!(matches!(result, Err(ConfigFileError::FileNotFound(_))));
    }
}
