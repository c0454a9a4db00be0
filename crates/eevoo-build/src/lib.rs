//! Dockerfile templates, build contexts, and generated project files for eevoo.
//!
//! # App build
//!
//! ```text
//! eevoo app
//!   1. Context     ── git ls-files → temp dir (BuildContext::create)
//!   2. Production  ── DockerfileGenerator::render(Production) → docker image build
//!   3. Development ── DockerfileGenerator::render(Development) → docker image build
//!   4. --gen       ── generate() writes Dockerfile + .dockerignore to the project
//! ```
//!
//! Both app images are built from the same context; only the `Dockerfile`
//! is replaced between the two builds.
//!
//! # Base image
//!
//! `eevoo node` builds from a context that holds nothing but the
//! [`BaseImageDockerfile`] (see [`BuildContext::with_dockerfile`]).

pub mod context;
pub mod dockerfile;
pub mod generate;

pub use context::{BuildContext, ContextError};
pub use dockerfile::{BaseImageDockerfile, DockerfileGenerator, DockerfileTemplate};
pub use generate::{GenerateError, GeneratedFile, GeneratedFiles, WriteAction, generate};
