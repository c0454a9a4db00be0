use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    #[error("executable not found \"{program}\"; install Docker: https://docs.docker.com/get-docker/")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("failed when executing command: {program} {}\n{status}\n{}", args.join(" "), captured(stdout, stderr))]
    CommandFailed {
        program: String,
        args: Vec<String>,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("{program} output was not valid UTF-8")]
    InvalidUtf8 {
        program: String,
        source: std::string::FromUtf8Error,
    },

    #[error("no Dockerfile in build context {0}")]
    MissingDockerfile(PathBuf),

    #[error("failed to prepare image id file")]
    IidFile { source: std::io::Error },

    #[error("build finished but no image id was written to {0}")]
    MissingImageId(PathBuf),

    #[error("unexpected image size {output:?} from docker image inspect")]
    InvalidImageSize {
        output: String,
        source: std::num::ParseIntError,
    },
}

impl DockerError {
    /// Captured stdout of a failed command, if any.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stdout, .. } => Some(stdout),
            _ => None,
        }
    }

    /// Captured stderr of a failed command, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

fn captured(stdout: &str, stderr: &str) -> String {
    [stdout.trim(), stderr.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
