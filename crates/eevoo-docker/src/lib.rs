//! Thin, mockable wrapper around the Docker CLI.
//!
//! Every operation is a single `docker` subprocess awaited to completion.
//! A non-zero exit becomes [`DockerError::CommandFailed`] carrying the
//! captured output; a missing binary becomes [`DockerError::NotFound`].

pub mod client;
pub mod error;
pub mod executor;

pub use client::DockerClient;
pub use error::DockerError;
pub use executor::{DockerExecutor, RealExecutor};
