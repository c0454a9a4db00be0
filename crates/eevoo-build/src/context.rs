use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Paths never copied into a build context, whatever .gitignore says.
const ALWAYS_EXCLUDED: &[&str] = &[".git"];

/// Also skipped when the project is not a git work tree and .gitignore
/// cannot be applied.
const WALK_EXCLUDED: &[&str] = &[".git", "node_modules"];

/// A throwaway Docker build context.
///
/// The directory lives under the system temp dir and is removed when the
/// context is dropped.
#[derive(Debug)]
pub struct BuildContext {
    dir: TempDir,
    files: usize,
}

impl BuildContext {
    /// Copy the project at `project_dir` into a fresh build context.
    ///
    /// Inside a git work tree the file list comes from `git ls-files`, so
    /// `.gitignore`d paths are left out. Elsewhere every file is copied
    /// except `.git/` and `node_modules/`.
    pub fn create(project_dir: &Path) -> Result<Self, ContextError> {
        let dir = new_temp_dir()?;

        let files = if is_git_work_tree(project_dir) {
            git_ls_files(project_dir)?
        } else {
            tracing::warn!(
                dir = %project_dir.display(),
                "not a git work tree; .gitignore is not applied to the build context"
            );
            walk_files(project_dir)?
        };

        let mut copied = 0;
        for relative_path in &files {
            if relative_path
                .components()
                .any(|c| ALWAYS_EXCLUDED.iter().any(|ex| c.as_os_str() == *ex))
            {
                continue;
            }

            let src = project_dir.join(relative_path);
            // Tracked-but-deleted files and submodule entries are not regular files.
            if !src.is_file() {
                tracing::debug!(path = %src.display(), "skipping non-file entry");
                continue;
            }

            let dst = dir.path().join(relative_path);
            if let Some(parent) = dst.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ContextError::Create {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            std::fs::copy(&src, &dst).map_err(|e| ContextError::CopyFile {
                path: src,
                source: e,
            })?;
            copied += 1;
        }

        tracing::debug!(
            files = copied,
            context = %dir.path().display(),
            "project copied to build context"
        );

        Ok(Self { dir, files: copied })
    }

    /// A context that holds nothing but the given Dockerfile.
    pub fn with_dockerfile(content: &str) -> Result<Self, ContextError> {
        let ctx = Self {
            dir: new_temp_dir()?,
            files: 0,
        };
        ctx.write_dockerfile(content)?;
        Ok(ctx)
    }

    /// Write (or replace) the context's `Dockerfile`.
    pub fn write_dockerfile(&self, content: &str) -> Result<PathBuf, ContextError> {
        let path = self.dir.path().join("Dockerfile");
        std::fs::write(&path, content).map_err(|e| ContextError::WriteDockerfile {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Number of project files copied in.
    pub fn file_count(&self) -> usize {
        self.files
    }
}

fn new_temp_dir() -> Result<TempDir, ContextError> {
    tempfile::Builder::new()
        .prefix("eevoo-")
        .tempdir()
        .map_err(|e| ContextError::TempDir { source: e })
}

fn is_git_work_tree(project_dir: &Path) -> bool {
    match Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(project_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::warn!(error = %e, "git is not available");
            false
        }
    }
}

/// Returns the list of files git considers part of the project:
/// tracked files + untracked files that are not .gitignored.
///
/// NUL-separated (`-z`) so names with quotes, backslashes, tabs or
/// newlines come back verbatim instead of C-quoted.
fn git_ls_files(project_dir: &Path) -> Result<Vec<PathBuf>, ContextError> {
    let output = Command::new("git")
        .args([
            "-c",
            "core.quotepath=off",
            "ls-files",
            "-z",
            "--cached",
            "--others",
            "--exclude-standard",
        ])
        .current_dir(project_dir)
        .output()
        .map_err(|e| ContextError::GitCommand {
            detail: "failed to execute git ls-files".to_owned(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ContextError::GitFailed {
            detail: format!(
                "git ls-files exited with {}: {}",
                output.status,
                stderr.trim()
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let files: Vec<PathBuf> = stdout
        .split('\0')
        .filter(|name| !name.is_empty())
        .map(PathBuf::from)
        .collect();

    Ok(files)
}

fn walk_files(project_dir: &Path) -> Result<Vec<PathBuf>, ContextError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(project_dir).into_iter().filter_entry(|e| {
        e.depth() == 0
            || !WALK_EXCLUDED
                .iter()
                .any(|ex| e.file_name() == std::ffi::OsStr::new(ex))
    });

    for entry in walker {
        let entry = entry.map_err(|e| ContextError::Walk { source: e })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(project_dir)
            .map_err(|e| ContextError::OutsideProject {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
        files.push(relative.to_path_buf());
    }

    Ok(files)
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to create temporary build context")]
    TempDir { source: std::io::Error },
    #[error("failed to create directory {path}")]
    Create {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy file {path}")]
    CopyFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write Dockerfile at {path}")]
    WriteDockerfile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("git command failed: {detail}")]
    GitCommand {
        detail: String,
        source: std::io::Error,
    },
    #[error("git failed: {detail}")]
    GitFailed { detail: String },
    #[error("failed to walk project directory")]
    Walk { source: walkdir::Error },
    #[error("{path} is outside the project directory")]
    OutsideProject {
        path: std::path::PathBuf,
        source: std::path::StripPrefixError,
    },
}
