use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Node.js project detection ──
    #[error("{dir} is not a Node.js project (no package.json found)")]
    NotNodeProject { dir: PathBuf },

    #[error("failed to read {path}")]
    PackageJsonRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    PackageJsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("missing \"name\" field in {0}; the project name is read from package.json")]
    MissingPackageName(PathBuf),

    // ── Tags ──
    #[error("unexpected `node -v` output {output:?}: expected vMAJOR.MINOR.PATCH")]
    InvalidNodeVersion {
        output: String,
        source: semver::Error,
    },
}
