use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A Node.js project detected from its `package.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeProject {
    /// Project root (directory holding `package.json`)
    pub dir: PathBuf,
    /// `name` from package.json
    pub name: String,
    /// Normalized `engines.node`, if the project declares one
    pub node_version: Option<String>,
}

#[derive(Deserialize)]
struct PackageJson {
    name: Option<String>,
    engines: Option<Engines>,
    /// Older KTH projects used the non-standard singular key.
    engine: Option<Engines>,
}

#[derive(Deserialize)]
struct Engines {
    node: Option<String>,
}

impl NodeProject {
    pub const MANIFEST: &'static str = "package.json";

    /// Detect a Node.js project in `dir`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotNodeProject`](crate::Error::NotNodeProject) if `dir` has no package.json
    /// - [`Error::PackageJsonParse`](crate::Error::PackageJsonParse) if it is not valid JSON
    /// - [`Error::MissingPackageName`](crate::Error::MissingPackageName) if `name` is absent or empty
    pub fn detect(dir: &Path) -> crate::Result<Self> {
        let manifest = dir.join(Self::MANIFEST);
        if !manifest.is_file() {
            tracing::debug!(dir = %dir.display(), "no package.json found");
            return Err(crate::Error::NotNodeProject {
                dir: dir.to_path_buf(),
            });
        }
        tracing::debug!(path = %manifest.display(), "found package.json");

        let content =
            std::fs::read_to_string(&manifest).map_err(|e| crate::Error::PackageJsonRead {
                path: manifest.clone(),
                source: e,
            })?;

        let parsed: PackageJson =
            serde_json::from_str(&content).map_err(|e| crate::Error::PackageJsonParse {
                path: manifest.clone(),
                source: e,
            })?;

        let name = parsed
            .name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| crate::Error::MissingPackageName(manifest.clone()))?;

        let declared = parsed
            .engines
            .and_then(|e| e.node)
            .or_else(|| parsed.engine.and_then(|e| e.node));

        let node_version = declared.as_deref().and_then(normalize_node_version);
        if let Some(raw) = &declared
            && node_version.is_none()
        {
            tracing::warn!(range = %raw, "cannot pin a Node.js version from engines.node");
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            name,
            node_version,
        })
    }

    /// The declared Node.js version, or `default` when none is declared.
    pub fn node_version_or<'a>(&'a self, default: &'a str) -> &'a str {
        match &self.node_version {
            Some(version) => version,
            None => default,
        }
    }
}

/// Reduce an npm semver range to the first concrete version it names.
///
/// `">=12"` → `12`, `"^14.17.0"` → `14.17.0`, `"12.x"` → `12`,
/// `">=10 <14"` → `10`, `"10 || 12"` → `10`. Ranges without any
/// version number (`"*"`, `"latest"`) give `None`.
pub fn normalize_node_version(range: &str) -> Option<String> {
    let first_alternative = range.split("||").next()?;
    let token = first_alternative
        .split_whitespace()
        .find(|t| t.chars().any(|c| c.is_ascii_digit()))?;

    let version: String = token
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let version = version.trim_end_matches('.');

    if version.is_empty() {
        None
    } else {
        Some(version.to_owned())
    }
}
