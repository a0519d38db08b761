//! # Loadstructure
//!
//! Schema-constrained, lazily-materializing configuration trees.
//!
//! This crate provides:
//! - [`ConfigNode`]: a tree of configuration values with auto-creation of
//!   missing container keys
//! - [`Schema`] and [`Rule`]: optional per-key constraints (strict mode)
//! - Dotted-path reads and writes (`"editor.font.size"`)
//! - [`ConfigManager`]: loading and saving JSON, YAML, TOML and XML documents
//!
//! # Example
//!
//! ```rust
//! use loadstructure::{ConfigNode, PrimitiveType, Rule, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .field(
//!         "user",
//!         Schema::new()
//!             .field("name", PrimitiveType::String)
//!             .field("age", PrimitiveType::Int),
//!     )
//!     .field("skills", Rule::AnyList);
//!
//! let mut cfg = ConfigNode::with_schema(schema);
//! cfg.child_node("user").unwrap().set_child("name", "A").unwrap();
//! cfg.set_path("user.age", 21).unwrap();
//! cfg.set_child("skills", vec!["x", "y"]).unwrap();
//!
//! assert!(cfg.set_path("user.age", "21").is_err());
//! assert_eq!(
//!     cfg.to_plain(),
//!     json!({"user": {"name": "A", "age": 21}, "skills": ["x", "y"]})
//! );
//! ```
//!
//! # Threading
//!
//! Everything here is synchronous and unlocked. Guard a shared tree yourself.

pub mod file_loader;
pub mod manager;
pub mod node;
pub mod path;
pub mod schema;
pub mod validator;
pub mod value;
mod xml;

pub use errors::{ROOT_PATH, SchemaError, SchemaResult};
pub use file_loader::{
    ConfigFileError, Format, load_plain, parse_str, save_plain, to_string,
};
pub use manager::ConfigManager;
pub use node::ConfigNode;
pub use path::split_path;
pub use schema::{PrimitiveType, Rule, Schema};
pub use validator::validate;
pub use value::{Value, ValueKind};
