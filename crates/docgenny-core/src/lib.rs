//! Core types, configuration, and error handling for docgenny.
//!
//! This crate provides the shared foundation used by the scanner and the CLI:
//! - [`DocgenError`]: unified error type using `thiserror`
//! - [`DocgenConfig`]: configuration loaded from `.docgenny.toml`
//! - Extracted entities: [`Model`], [`ModelField`], [`Function`], collected
//!   into an [`Extraction`]

mod config;
mod error;
mod types;

pub use config::{
    split_patterns, DocgenConfig, CONFIG_FILE_NAME, DEFAULT_IGNORE_PATTERNS,
    DEFAULT_IMPORTANT_PATTERNS, DEFAULT_OUTPUT_FILE,
};
pub use error::DocgenError;
pub use types::{Extraction, Function, Model, ModelField, NestedFunctionPolicy, OutputFormat};

/// A convenience `Result` type for docgenny operations.
pub type Result<T> = std::result::Result<T, DocgenError>;
