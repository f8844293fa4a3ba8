use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Default per-file size threshold (1 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 1024 * 1024;

/// Default cap on the number of resources in one catalog.
pub const DEFAULT_MAX_FILES_SCANNED: usize = 1000;

/// Default recursion depth below the root.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Ignore patterns applied unless `--no-default-ignores` is given.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "*.pyc", "__pycache__", ".git", ".gitignore", "node_modules", ".vscode", ".idea", "*.log",
    "*.tmp", ".DS_Store", "venv", ".env", "target", "*.so", "*.dll", "*.exe", "*.bin", "*.zip",
    "*.tar.gz", "*.jpg", "*.jpeg", "*.png", "*.gif", "*.bmp", "*.ico", "*.svg", "*.mp3", "*.mp4",
    "*.avi", "*.mov", "*.wav", "*.pdf",
];

/// Extensions served unless the allow-list is replaced or disabled.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "html", "css", "scss", "json", "xml", "yaml", "yml", "md",
    "txt", "ini", "cfg", "conf", "sh", "bat", "ps1", "sql", "r", "cpp", "c", "h", "hpp", "java",
    "go", "rs", "php", "rb", "swift", "kt", "scala", "clj", "hs", "elm", "dart", "vue", "svelte",
    "astro", "dockerfile", "makefile", "toml",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("root directory {path} is not accessible: {source}")]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("root path {0} is not a directory")]
    RootNotDirectory(PathBuf),
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Filtering and scan limits. Fixed for the lifetime of a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Files strictly larger than this are excluded.
    pub max_file_size_bytes: u64,
    /// Lowercase extensions without the leading dot. Empty disables the check.
    pub allowed_extensions: BTreeSet<String>,
    /// Glob patterns, matched against each path segment and the full relative path.
    pub ignore_patterns: Vec<String>,
    pub max_files_scanned: usize,
    pub max_depth: usize,
}

impl FilterConfig {
    /// Normalize a user-supplied extension: strip a leading dot, lowercase.
    pub fn normalize_extension(ext: &str) -> String {
        ext.trim().trim_start_matches('.').to_lowercase()
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|e| Self::normalize_extension(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            ignore_patterns: DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            max_files_scanned: DEFAULT_MAX_FILES_SCANNED,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Server configuration: the served root plus its filter settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Canonical root directory.
    pub root: PathBuf,
    pub filter: FilterConfig,
}

impl ServerConfig {
    /// Validate and canonicalize `root`.
    ///
    /// Fails when the root does not exist, cannot be resolved, or is not a
    /// directory. These are the only fatal errors of the server.
    pub fn new(root: impl AsRef<Path>, filter: FilterConfig) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|source| ConfigError::RootInaccessible {
            path: root.to_path_buf(),
            source,
        })?;

        if !canonical.is_dir() {
            return Err(ConfigError::RootNotDirectory(canonical));
        }

        Ok(Self {
            root: canonical,
            filter,
        })
    }
}
