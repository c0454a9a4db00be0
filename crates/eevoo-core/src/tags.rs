//! Image tag rules.
//!
//! App images are tagged after the package name:
//!
//! ```text
//! <name>:latest                      always
//! <name>:latest-<GIT_LOCAL_BRANCH>   when the branch is known
//! <name>:<BUILD_NUMBER>              when the build number is known
//! ```
//!
//! Base images are tagged with every prefix of the Node.js version they
//! ship (`12`, `12.16`, `12.16.1`).

use crate::config::BuildEnv;

const MAX_TAG_LEN: usize = 128;

/// Tags for an app image built from the package `project_name`.
pub fn app_tags(project_name: &str, env: &BuildEnv) -> Vec<String> {
    let repo = repository_name(project_name);
    let mut tags = vec![format!("{repo}:latest")];

    if let Some(branch) = &env.git_local_branch {
        tags.push(format!("{repo}:{}", sanitize_tag(&format!("latest-{branch}"))));
    }

    if let Some(build) = &env.build_number {
        tags.push(format!("{repo}:{}", sanitize_tag(build)));
    }

    tags
}

/// Tags for a base image, given the output of `node -v` inside it.
///
/// # Errors
///
/// [`Error::InvalidNodeVersion`](crate::Error::InvalidNodeVersion) if the
/// output is not `vMAJOR.MINOR.PATCH`.
pub fn base_image_tags(base_image: &str, node_version_output: &str) -> crate::Result<Vec<String>> {
    let raw = node_version_output.trim();
    let unprefixed = match raw.strip_prefix('v') {
        Some(rest) => rest,
        None => raw,
    };
    let version = semver::Version::parse(unprefixed).map_err(|e| {
        crate::Error::InvalidNodeVersion {
            output: raw.to_owned(),
            source: e,
        }
    })?;

    Ok(vec![
        format!("{base_image}:{}", version.major),
        format!("{base_image}:{}.{}", version.major, version.minor),
        format!(
            "{base_image}:{}.{}.{}",
            version.major, version.minor, version.patch
        ),
    ])
}

/// Docker repository name for an npm package name.
///
/// Scoped packages drop the `@` (`@kth/app` → `kth/app`); the rest is
/// lowercased and anything outside `[a-z0-9._/-]` becomes `-`.
pub fn repository_name(package_name: &str) -> String {
    package_name
        .trim()
        .trim_start_matches('@')
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '.' | '_' | '/' | '-' => c,
            _ => '-',
        })
        .collect()
}

/// Force `raw` into Docker's tag alphabet: `[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}`.
pub fn sanitize_tag(raw: &str) -> String {
    let mut tag: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '-'
            }
        })
        .take(MAX_TAG_LEN)
        .collect();

    if tag.starts_with(['.', '-']) {
        tag.replace_range(..1, "_");
    }
    if tag.is_empty() {
        tag.push('_');
    }
    tag
}
