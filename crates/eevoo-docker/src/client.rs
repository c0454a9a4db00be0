use crate::error::DockerError;
use crate::executor::{DockerExecutor, RealExecutor};
use std::path::Path;

/// Docker CLI operations, parameterized over the executor for testability.
pub struct DockerClient<E: DockerExecutor = RealExecutor> {
    executor: E,
}

impl DockerClient<RealExecutor> {
    /// Client for the given engine binary (`docker`, `podman`, a full path...).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            executor: RealExecutor::new(program),
        }
    }
}

impl Default for DockerClient<RealExecutor> {
    fn default() -> Self {
        Self {
            executor: RealExecutor::default(),
        }
    }
}

impl<E: DockerExecutor> DockerClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Engine ──

    /// Server version of the engine.
    pub async fn version(&self) -> Result<String, DockerError> {
        let out = self
            .executor
            .exec(&args(["version", "--format", "{{.Server.Version}}"]))
            .await?;
        Ok(out.trim().to_owned())
    }

    // ── Images ──

    /// Build the image described by `<context>/Dockerfile` and return its ID.
    ///
    /// The engine writes the ID to an iidfile in a private temp directory,
    /// so concurrent builds never read each other's result.
    pub async fn build_image(&self, context: &Path) -> Result<String, DockerError> {
        if !context.join("Dockerfile").is_file() {
            return Err(DockerError::MissingDockerfile(context.to_path_buf()));
        }

        let iid_dir = tempfile::tempdir().map_err(|e| DockerError::IidFile { source: e })?;
        let iid_path = iid_dir.path().join("iid");

        let iid_str = iid_path.to_string_lossy();
        let context_str = context.to_string_lossy();
        self.executor
            .exec(&args([
                "image",
                "build",
                "--iidfile",
                &iid_str,
                &context_str,
            ]))
            .await?;

        let image_id = match tokio::fs::read_to_string(&iid_path).await {
            Ok(id) => id.trim().to_owned(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(DockerError::IidFile { source: e }),
        };

        if image_id.is_empty() {
            return Err(DockerError::MissingImageId(iid_path));
        }

        tracing::debug!(image_id = %image_id, context = %context.display(), "image built");
        Ok(image_id)
    }

    /// Size of an image in bytes.
    pub async fn image_size(&self, image_id: &str) -> Result<u64, DockerError> {
        let out = self
            .executor
            .exec(&args([
                "image",
                "inspect",
                image_id,
                "--format={{.Size}}",
            ]))
            .await?;

        let trimmed = out.trim();
        trimmed
            .parse()
            .map_err(|e| DockerError::InvalidImageSize {
                output: trimmed.to_owned(),
                source: e,
            })
    }

    /// Run `command` in a throwaway container of `image_id` and return its stdout.
    pub async fn run(&self, image_id: &str, command: &[&str]) -> Result<String, DockerError> {
        let mut cmd = vec!["run".to_owned(), "--rm".to_owned(), image_id.to_owned()];
        cmd.extend(command.iter().map(|s| (*s).to_owned()));

        let out = self.executor.exec(&cmd).await?;
        Ok(out.trim().to_owned())
    }

    pub async fn tag_image(&self, image_id: &str, tag: &str) -> Result<(), DockerError> {
        self.executor
            .exec(&args(["image", "tag", image_id, tag]))
            .await?;
        Ok(())
    }

    /// Push a tag to its registry, streaming progress to the terminal.
    pub async fn push(&self, tag: &str) -> Result<(), DockerError> {
        self.executor.exec_streaming(&args(["push", tag])).await
    }
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
