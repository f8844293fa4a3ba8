use std::path::PathBuf;

use clap::Parser;

use mcp_resource_server::config::{
    FilterConfig, ServerConfig, DEFAULT_IGNORE_PATTERNS, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_FILES_SCANNED, DEFAULT_MAX_FILE_SIZE_BYTES,
};
use mcp_resource_server::logging;
use mcp_resource_server::server::McpServer;

#[derive(Parser, Debug)]
#[command(name = "mcp-resource-server")]
#[command(about = "Serve a directory's text files as MCP resources over stdio", long_about = None)]
struct Args {
    /// Root directory to serve (default: current directory)
    #[arg(long, env = "MCP_RESOURCES_ROOT")]
    root: Option<PathBuf>,

    /// Files larger than this many bytes are not served
    #[arg(long, env = "MCP_RESOURCES_MAX_FILE_SIZE", default_value_t = DEFAULT_MAX_FILE_SIZE_BYTES)]
    max_file_size: u64,

    /// Maximum number of resources in one listing
    #[arg(long, env = "MCP_RESOURCES_MAX_FILES", default_value_t = DEFAULT_MAX_FILES_SCANNED)]
    max_files: usize,

    /// Maximum directory depth below the root
    #[arg(long, env = "MCP_RESOURCES_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Allowed extensions, replacing the built-in list
    #[arg(long = "extension", value_delimiter = ',')]
    extensions: Vec<String>,

    /// Serve files of any extension
    #[arg(long, conflicts_with = "extensions")]
    any_extension: bool,

    /// Extra ignore patterns
    #[arg(long = "ignore", value_delimiter = ',')]
    ignore: Vec<String>,

    /// Drop the built-in ignore patterns
    #[arg(long)]
    no_default_ignores: bool,

    /// Also append logs to this file
    #[arg(long, env = "MCP_RESOURCES_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn filter_config(&self) -> FilterConfig {
        let mut filter = FilterConfig {
            max_file_size_bytes: self.max_file_size,
            max_files_scanned: self.max_files,
            max_depth: self.max_depth,
            ..FilterConfig::default()
        };

        if self.any_extension {
            filter = filter.with_allowed_extensions(Vec::<String>::new());
        } else if !self.extensions.is_empty() {
            filter = filter.with_allowed_extensions(&self.extensions);
        }

        let defaults: &[&str] = if self.no_default_ignores {
            &[]
        } else {
            DEFAULT_IGNORE_PATTERNS
        };
        let patterns: Vec<String> = defaults
            .iter()
            .map(|p| p.to_string())
            .chain(self.ignore.iter().cloned())
            .collect();
        filter.with_ignore_patterns(patterns)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_file.as_deref()) {
        eprintln!("mcp-resource-server: configuration error: {e}");
        std::process::exit(1);
    }

    let root = match args.root.clone() {
        Some(r) => r,
        None => match std::env::current_dir() {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "cannot determine current directory");
                std::process::exit(1);
            }
        },
    };

    let config = match ServerConfig::new(&root, args.filter_config()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    tracing::info!(root = %config.root.display(), "starting mcp-resource-server");

    let mut server = match McpServer::new(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "fatal I/O error");
        std::process::exit(1);
    }
}
