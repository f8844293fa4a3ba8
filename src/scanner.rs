//! Deterministic walk of the served root.

use std::fs::File;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::filter::{mime_hint, Classification, FilterEngine};

/// Kind of an eligible resource. Skipped files never become descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Text,
}

/// One eligible file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// `file:///<relative path>`, `/`-separated.
    pub id: String,
    /// Root-relative path, `/`-separated.
    pub name: String,
    /// Absolute path on disk. Never sent over the wire.
    pub path: PathBuf,
    pub size: u64,
    pub kind: ResourceKind,
    pub mime_hint: String,
}

/// Result of one full walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub resources: Vec<ResourceDescriptor>,
    /// More eligible files existed than `max_files_scanned`.
    pub truncated: bool,
}

/// Build the resource id for a root-relative path.
pub fn resource_id(relative: &str) -> String {
    format!("file:///{relative}")
}

/// Walk `root` in lexicographic order, collecting eligible files.
///
/// Ignored directories are pruned without descending. Symlinks are never
/// followed; a symlinked file is kept only if it resolves inside `root`.
/// Per-entry I/O errors are logged and skipped.
pub fn scan(root: &Path, engine: &FilterEngine) -> ScanOutcome {
    let config = engine.config();
    let mut outcome = ScanOutcome::default();
    let mut skipped = 0usize;

    let canonical_root = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "scan root not accessible");
            return outcome;
        }
    };

    tracing::debug!(root = %canonical_root.display(), "scan started");

    let mut walker = WalkDir::new(&canonical_root)
        .follow_links(false)
        .min_depth(1)
        .max_depth(config.max_depth)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                skipped += 1;
                continue;
            }
        };

        let relative = match entry.path().strip_prefix(&canonical_root) {
            Ok(r) => r.to_path_buf(),
            Err(_) => continue,
        };

        if entry.file_type().is_dir() {
            if engine.classify_dir(&relative) == Classification::ExcludePattern {
                tracing::debug!(path = %relative.display(), "pruning ignored directory");
                walker.skip_current_dir();
            }
            continue;
        }

        let Some(descriptor) = consider_file(&canonical_root, &relative, &entry, engine) else {
            skipped += 1;
            continue;
        };

        if outcome.resources.len() >= config.max_files_scanned {
            outcome.truncated = true;
            break;
        }
        outcome.resources.push(descriptor);
    }

    tracing::info!(
        root = %canonical_root.display(),
        resources = outcome.resources.len(),
        skipped,
        truncated = outcome.truncated,
        "scan finished"
    );

    outcome
}

fn consider_file(
    root: &Path,
    relative: &Path,
    entry: &DirEntry,
    engine: &FilterEngine,
) -> Option<ResourceDescriptor> {
    let Some(name) = relative_name(relative) else {
        tracing::warn!(path = %relative.display(), "skipping non UTF-8 path");
        return None;
    };

    let metadata = if entry.path_is_symlink() {
        match entry.path().canonicalize() {
            Ok(target) if target.starts_with(root) => match std::fs::metadata(&target) {
                Ok(m) if m.is_file() => m,
                Ok(_) => {
                    tracing::debug!(path = %name, "skipping symlink to non-file");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(path = %name, error = %e, "cannot stat symlink target");
                    return None;
                }
            },
            Ok(_) => {
                tracing::debug!(path = %name, "skipping symlink that escapes root");
                return None;
            }
            Err(e) => {
                tracing::debug!(path = %name, error = %e, "skipping dangling symlink");
                return None;
            }
        }
    } else if entry.file_type().is_file() {
        match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %name, error = %e, "cannot stat file");
                return None;
            }
        }
    } else {
        return None;
    };

    let size = metadata.len();
    let classification = match engine.classify(relative, size, || File::open(entry.path())) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(path = %name, error = %e, "cannot read file head");
            return None;
        }
    };

    if classification != Classification::Include {
        tracing::debug!(path = %name, reason = classification.reason(), "skipping file");
        return None;
    }

    Some(ResourceDescriptor {
        id: resource_id(&name),
        mime_hint: mime_hint(relative),
        name,
        path: entry.path().to_path_buf(),
        size,
        kind: ResourceKind::Text,
    })
}

/// `/`-joined relative path, or `None` if any segment is not UTF-8.
fn relative_name(relative: &Path) -> Option<String> {
    let segments: Option<Vec<&str>> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect();
    segments.map(|s| s.join("/"))
}
