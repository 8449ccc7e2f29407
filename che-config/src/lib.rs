//! Configuration layer for the che directory tool.
//!
//! Holds the typed configuration tree populated from a `Chefile`, the
//! sandboxed assignment interpreter that evaluates it, and the on-disk
//! layout of the hidden `.che` instance directory.

pub mod model;
pub mod parser;
pub mod paths;
pub mod template;

pub use model::{
    CommandConfig, LoadAction, ProjectSource, ProjectSpec, RuntimeRecipeSpec, ServerConfig,
    ServerType, WorkspaceConfig,
};
pub use parser::parse_chefile;
pub use paths::DirLayout;
