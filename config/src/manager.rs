//! # Configuration Manager
//!
//! Owns one root [`ConfigNode`] and the file it is persisted to. Loading turns
//! the document into a tree (validated against the schema when one is set);
//! saving writes the tree back through the format adapters.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};
use tracing::info;

use crate::file_loader::{ConfigFileError, Format, load_plain, save_plain};
use crate::node::ConfigNode;
use crate::schema::Schema;
use crate::value::ValueKind;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
    format: Option<Format>,
    schema: Option<Schema>,
    root: ConfigNode,
}

impl ConfigManager {
    /// Manager for the document at `path`. Nothing is read until
    /// [`ConfigManager::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            schema: None,
            root: ConfigNode::new(),
        }
    }

    /// Bind the root node to `schema`.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.root = ConfigNode::with_schema(schema.clone());
        self.schema = Some(schema);
        self
    }

    /// Use `format` instead of detecting it from the file extension.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn format(&self) -> Result<Format, ConfigFileError> {
        match self.format {
            Some(format) => Ok(format),
            None => Format::from_path(&self.path),
        }
    }

    /// Load the document into the root node.
    ///
    /// # M-CANONICAL-DOCS
    ///
    /// ## Purpose
    /// Parses the source document and rebuilds the root with the same
    /// validation as [`ConfigNode::replace`]. An absent source yields an
    /// empty root, and an empty document is written so the file exists
    /// afterwards.
    ///
    /// ## Usage
    /// ```rust,no_run
    /// use loadstructure::ConfigManager;
    ///
    /// fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let mut manager = ConfigManager::new("settings.json");
    ///     let cfg = manager.load()?;
    ///     cfg.set_path("editor.font.size", 14)?;
    ///     manager.save()?;
    ///     Ok(())
    /// }
    /// ```
    ///
    /// ## Error Handling
    /// Returns `ConfigFileError` for:
    /// - Unknown or missing file extension (without an explicit format)
    /// - Read failures and invalid syntax
    /// - A document whose top level is not a mapping
    /// - Schema violations (`ConfigFileError::Schema`)
    ///
    /// On error the previously loaded root is kept.
    pub fn load(&mut self) -> Result<&mut ConfigNode, ConfigFileError> {
        let format = self.format()?;

        let plain = if self.path.exists() {
            load_plain(&self.path, format)?
        } else {
            info!("Config file {:?} not found, creating empty {} document", self.path, format);
            let empty = JsonValue::Object(Map::new());
            save_plain(&self.path, format, &empty)?;
            empty
        };

        if !plain.is_object() {
            return Err(ConfigFileError::NotAMapping(
                ValueKind::of_plain(&plain).name().to_string(),
            ));
        }

        let root = ConfigNode::from_plain(plain, self.schema.clone())?;
        info!("Loaded {} top-level keys from {:?}", root.len(), self.path);
        self.root = root;
        Ok(&mut self.root)
    }

    /// Write the root node back to the source path.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let format = self.format()?;
        save_plain(&self.path, format, &self.root.to_plain())?;
        info!("Saved config to {:?}", self.path);
        Ok(())
    }

    /// Write the root node to `destination`, detecting the format from its
    /// extension. Together with [`ConfigManager::load`] this converts a
    /// document between formats.
    pub fn save_to(&self, destination: &Path) -> Result<(), ConfigFileError> {
        let format = Format::from_path(destination)?;
        save_plain(destination, format, &self.root.to_plain())?;
        info!("Saved config to {:?} as {}", destination, format);
        Ok(())
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut ConfigNode {
        &mut self.root
    }

    pub fn to_plain(&self) -> JsonValue {
        self.root.to_plain()
    }
}
