use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::catalog::Catalog;
use crate::filter::looks_binary;
use crate::protocol::{ReadResourceParams, ReadResourceResult, ResourceError};
use crate::scanner::ResourceDescriptor;

/// Handle a `resources/read` request.
///
/// Unknown ids get one catalog rebuild before `NotFound` is returned. The
/// file is re-checked at read time: it must still resolve inside the root
/// and still fit under the size limit.
pub async fn handle(
    params: ReadResourceParams,
    catalog: &mut Catalog,
) -> Result<ReadResourceResult, ResourceError> {
    if params.id.is_empty() {
        return Err(ResourceError::invalid_params("Resource id must not be empty"));
    }

    let descriptor = catalog
        .get_or_rebuild(&params.id)
        .cloned()
        .ok_or_else(|| ResourceError::not_found(&params.id))?;

    let root = catalog.root().canonicalize().map_err(|e| {
        tracing::error!(error = %e, "served root not accessible");
        ResourceError::io("Served root is not accessible")
    })?;
    let limit = catalog.engine().config().max_file_size_bytes;

    read_verified(&root, &descriptor, limit)
}

fn read_verified(
    root: &Path,
    descriptor: &ResourceDescriptor,
    limit: u64,
) -> Result<ReadResourceResult, ResourceError> {
    let id = descriptor.id.as_str();
    let io_failure = |e: std::io::Error| {
        if e.kind() == ErrorKind::NotFound {
            ResourceError::not_found(id)
        } else {
            tracing::warn!(id, error = %e, "resource read failed");
            ResourceError::io(format!("Cannot read {id}: {e}"))
        }
    };

    let canonical = descriptor.path.canonicalize().map_err(io_failure)?;
    if !canonical.starts_with(root) {
        tracing::warn!(id, "resource now resolves outside the root");
        return Err(ResourceError::not_found(id));
    }

    let file = File::open(&canonical).map_err(io_failure)?;
    let metadata = file.metadata().map_err(io_failure)?;
    if !metadata.is_file() {
        return Err(ResourceError::not_found(id));
    }
    if metadata.len() > limit {
        return Err(ResourceError::size_exceeded(id, metadata.len(), limit));
    }

    // Bounded by limit + 1 so growth after the stat is still detected.
    let mut bytes = Vec::with_capacity(metadata.len() as usize);
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(io_failure)?;
    if bytes.len() as u64 > limit {
        return Err(ResourceError::size_exceeded(id, bytes.len() as u64, limit));
    }

    if looks_binary(&bytes) {
        tracing::warn!(id, "resource content is now binary");
        return Err(ResourceError::io(format!("Resource {id} is no longer text")));
    }

    let content = String::from_utf8(bytes).map_err(|_| {
        tracing::warn!(id, "resource content is no longer valid UTF-8");
        ResourceError::io(format!("Resource {id} is not valid UTF-8 text"))
    })?;

    Ok(ReadResourceResult::new(
        descriptor.id.clone(),
        content,
        &descriptor.mime_hint,
    ))
}
