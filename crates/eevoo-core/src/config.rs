use serde::{Deserialize, Serialize};

/// File name of the optional per-project configuration.
pub const CONFIG_FILE: &str = "eevoo.toml";

/// eevoo.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EevooConfig {
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub docker: DockerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Repository of the shared Node.js base image (app images build `FROM` it)
    #[serde(default = "default_base_image")]
    pub base_image: String,
    /// Node.js version used when package.json declares none
    #[serde(default = "default_node_version")]
    pub default_node_version: String,
    /// Upstream image the base image is built from
    #[serde(default = "default_node_image")]
    pub node_image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerConfig {
    /// Container engine executable
    #[serde(default = "default_docker_binary")]
    pub binary: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_image: default_base_image(),
            default_node_version: default_node_version(),
            node_image: default_node_image(),
        }
    }
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            binary: default_docker_binary(),
        }
    }
}

impl EevooConfig {
    /// Load from eevoo.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config");
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Engine binary to run: an explicit override (`--docker`, `EEVOO_DOCKER`)
    /// wins over `[docker] binary`.
    pub fn docker_binary(&self, override_binary: Option<String>) -> String {
        match override_binary {
            Some(binary) => binary,
            None => self.docker.binary.clone(),
        }
    }

    /// `<base_image>:<node_version>`, the reference app Dockerfiles start from.
    pub fn base_image_ref(&self, node_version: &str) -> String {
        format!("{}:{node_version}", self.image.base_image)
    }
}

/// CI metadata that adds extra tags to app images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    /// `GIT_LOCAL_BRANCH`
    pub git_local_branch: Option<String>,
    /// `BUILD_NUMBER`
    pub build_number: Option<String>,
}

impl BuildEnv {
    pub const GIT_LOCAL_BRANCH: &'static str = "GIT_LOCAL_BRANCH";
    pub const BUILD_NUMBER: &'static str = "BUILD_NUMBER";

    /// Read from the process environment. Empty values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            git_local_branch: get(Self::GIT_LOCAL_BRANCH),
            build_number: get(Self::BUILD_NUMBER),
        }
    }
}

fn default_base_image() -> String {
    "kthse/nodejs-echo".to_owned()
}

fn default_node_version() -> String {
    "12".to_owned()
}

fn default_node_image() -> String {
    "node".to_owned()
}

fn default_docker_binary() -> String {
    "docker".to_owned()
}
