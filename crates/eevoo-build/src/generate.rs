use std::path::{Path, PathBuf};

/// First line of every generated `.dockerignore`; the rest is `.gitignore`.
pub const DOCKERIGNORE_HEADER: &str = "*.git\n";

/// What happened to a file written into the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Created,
    Overwritten,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub action: WriteAction,
}

impl GeneratedFile {
    /// File name for display (`Dockerfile`, `.dockerignore`).
    pub fn name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.display().to_string(),
        }
    }
}

/// Files written by [`generate`].
#[derive(Debug, Clone)]
pub struct GeneratedFiles {
    pub dockerfile: GeneratedFile,
    pub dockerignore: GeneratedFile,
}

/// Write the Dockerfile used to build the image, plus a `.dockerignore`
/// derived from `.gitignore`, into `project_dir`.
///
/// Existing files are overwritten; the returned report says which ones.
pub fn generate(
    project_dir: &Path,
    dockerfile_content: &str,
) -> Result<GeneratedFiles, GenerateError> {
    let dockerfile = write_file(&project_dir.join("Dockerfile"), dockerfile_content)?;
    let dockerignore = write_file(
        &project_dir.join(".dockerignore"),
        &dockerignore_content(project_dir)?,
    )?;

    Ok(GeneratedFiles {
        dockerfile,
        dockerignore,
    })
}

/// `.dockerignore` content for `project_dir`: the header followed by its
/// `.gitignore`, if there is one.
pub fn dockerignore_content(project_dir: &Path) -> Result<String, GenerateError> {
    let gitignore_path = project_dir.join(".gitignore");
    let gitignore = match std::fs::read_to_string(&gitignore_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no .gitignore; .dockerignore only excludes git metadata");
            String::new()
        }
        Err(e) => {
            return Err(GenerateError::Read {
                path: gitignore_path,
                source: e,
            });
        }
    };

    Ok(format!("{DOCKERIGNORE_HEADER}{gitignore}"))
}

fn write_file(path: &Path, content: &str) -> Result<GeneratedFile, GenerateError> {
    let action = if path.exists() {
        WriteAction::Overwritten
    } else {
        WriteAction::Created
    };

    std::fs::write(path, content).map_err(|e| GenerateError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), ?action, "wrote file");
    Ok(GeneratedFile {
        path: path.to_path_buf(),
        action,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("failed to write {path}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {path}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
