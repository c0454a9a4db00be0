//! Core types and configuration for eevoo.
//!
//! This crate defines the `eevoo.toml` schema ([`EevooConfig`]),
//! Node.js project detection ([`NodeProject`]), the image tag rules
//! ([`tags`]), and shared error types.

pub mod config;
pub mod error;
pub mod project;
pub mod tags;

pub use config::{BuildEnv, DockerConfig, EevooConfig, ImageConfig};
pub use error::{Error, Result};
pub use project::{NodeProject, normalize_node_version};
