//! Locating the `resources` directory
//!
//! The working directory is tried first, then the executable's directory and
//! up to three of its ancestors, so the viewer finds its assets both when
//! launched from the repository root and from `target/<profile>/`.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Levels above the executable's directory that are searched
const MAX_PARENT_LEVELS: usize = 3;

/// Candidate locations for `name`, in search order
pub fn candidate_dirs(name: &str, working_dir: &Path, app_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![working_dir.join(name)];
    if let Some(app_dir) = app_dir {
        candidates.extend(
            app_dir
                .ancestors()
                .take(MAX_PARENT_LEVELS + 1)
                .map(|dir| dir.join(name)),
        );
    }
    candidates
}

/// First existing directory among the candidates
pub fn search_resource_dir(name: &str, working_dir: &Path, app_dir: Option<&Path>) -> Option<PathBuf> {
    candidate_dirs(name, working_dir, app_dir)
        .into_iter()
        .find(|candidate| candidate.is_dir())
}

/// Resolve the resource directory for this process
///
/// Falls back to the bare relative name when nothing is found, so later file
/// errors name the path that was expected.
pub fn resolve_resource_dir(name: &str) -> PathBuf {
    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let exe = std::env::current_exe().ok();
    let app_dir = exe.as_deref().and_then(Path::parent);

    match search_resource_dir(name, &working_dir, app_dir) {
        Some(dir) => {
            debug!(path = %dir.display(), "Found resource directory");
            dir
        }
        None => {
            warn!(name, "Resource directory not found, using relative path");
            PathBuf::from(name)
        }
    }
}
