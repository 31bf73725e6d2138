//! # covidash config
//!
//! Type-safe configuration management for covidash.
//!
//! This crate provides the configuration schema, its defaults, loading from
//! TOML or YAML files, and validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
