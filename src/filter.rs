//! Include/exclude decisions for individual paths.
//!
//! The engine is built once from a [`FilterConfig`] and holds no other
//! state. Checks run in a fixed order: ignore patterns, size threshold,
//! extension allow-list, then a content sniff over the first
//! [`SNIFF_WINDOW_BYTES`] of the file.

use std::io::{self, Read};
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use mime_guess::mime::{self, Mime};

use crate::config::{ConfigError, FilterConfig};

/// Bytes inspected by the binary-content sniff.
pub const SNIFF_WINDOW_BYTES: u64 = 8192;

/// Outcome of classifying a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Include,
    ExcludeBinary,
    ExcludeSize,
    ExcludePattern,
}

impl Classification {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Include => "included",
            Self::ExcludeBinary => "binary content",
            Self::ExcludeSize => "exceeds size limit",
            Self::ExcludePattern => "ignored by pattern or extension",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterEngine {
    config: FilterConfig,
    ignore: GlobSet,
}

impl FilterEngine {
    /// Compile the ignore patterns. Patterns never match across `/`.
    pub fn new(config: FilterConfig) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.ignore_patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }
        let ignore = builder.build().map_err(|source| ConfigError::InvalidPattern {
            pattern: config.ignore_patterns.join(","),
            source,
        })?;

        Ok(Self { config, ignore })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// True when any segment of `relative_path`, or the path as a whole,
    /// matches an ignore pattern.
    pub fn is_ignored(&self, relative_path: &Path) -> bool {
        if self.ignore.is_empty() {
            return false;
        }
        if self.ignore.is_match(relative_path) {
            return true;
        }
        relative_path
            .components()
            .any(|segment| self.ignore.is_match(Path::new(segment.as_os_str())))
    }

    /// Classify a directory. Only patterns apply; an excluded directory is
    /// pruned along with its whole subtree.
    pub fn classify_dir(&self, relative_path: &Path) -> Classification {
        if self.is_ignored(relative_path) {
            Classification::ExcludePattern
        } else {
            Classification::Include
        }
    }

    /// Classify a regular file of `size_bytes`.
    ///
    /// `open` is only called once every metadata check has passed, and at
    /// most [`SNIFF_WINDOW_BYTES`] are read from what it returns.
    pub fn classify<R, F>(
        &self,
        relative_path: &Path,
        size_bytes: u64,
        open: F,
    ) -> io::Result<Classification>
    where
        R: Read,
        F: FnOnce() -> io::Result<R>,
    {
        if self.is_ignored(relative_path) {
            return Ok(Classification::ExcludePattern);
        }

        if size_bytes > self.config.max_file_size_bytes {
            return Ok(Classification::ExcludeSize);
        }

        if !self.extension_allowed(relative_path) {
            return Ok(Classification::ExcludePattern);
        }

        let mut head = Vec::with_capacity(SNIFF_WINDOW_BYTES.min(size_bytes) as usize);
        open()?.take(SNIFF_WINDOW_BYTES).read_to_end(&mut head)?;

        if looks_binary(&head) {
            return Ok(Classification::ExcludeBinary);
        }

        Ok(Classification::Include)
    }

    /// Extension check, case-insensitive. Files without an extension are
    /// matched on their full lowercased name (`Makefile` → `makefile`).
    pub fn extension_allowed(&self, relative_path: &Path) -> bool {
        if self.config.allowed_extensions.is_empty() {
            return true;
        }
        let key = relative_path
            .extension()
            .or_else(|| relative_path.file_name())
            .and_then(|s| s.to_str())
            .map(str::to_lowercase);

        match key {
            Some(key) => self.config.allowed_extensions.contains(&key),
            None => false,
        }
    }
}

/// Null bytes or invalid UTF-8 mark the content as binary. A multi-byte
/// sequence cut off by the end of the window is not an error.
pub fn looks_binary(bytes: &[u8]) -> bool {
    if bytes.contains(&0) {
        return true;
    }
    match std::str::from_utf8(bytes) {
        Ok(_) => false,
        Err(e) => e.error_len().is_some(),
    }
}

/// Fallback hint for text files with no recognizable text type.
pub const DEFAULT_MIME_HINT: &str = "text/plain";

/// Advisory content type derived from the extension. Non-text guesses
/// (`.ts` is `video/mp2t` to the registry) fall back to
/// [`DEFAULT_MIME_HINT`].
pub fn mime_hint(path: &Path) -> String {
    mime_guess::from_path(path)
        .iter()
        .find(is_text_like)
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME_HINT.to_string())
}

fn is_text_like(m: &Mime) -> bool {
    if m.type_() == mime::TEXT {
        return true;
    }
    m.type_() == mime::APPLICATION
        && matches!(
            m.subtype().as_str(),
            "json" | "xml" | "javascript" | "toml" | "yaml" | "x-yaml" | "sql" | "x-sh"
                | "x-httpd-php" | "x-tex" | "x-latex"
        )
}
