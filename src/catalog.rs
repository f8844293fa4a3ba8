use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::filter::FilterEngine;
use crate::scanner::{self, ResourceDescriptor, ScanOutcome};

/// In-memory index of the eligible files under one root.
///
/// Every rebuild is a full rescan. The new descriptor set is built off to
/// the side and swapped in whole, bumping `generation`.
#[derive(Debug)]
pub struct Catalog {
    root: PathBuf,
    engine: FilterEngine,
    snapshot: Snapshot,
    generation: u64,
}

#[derive(Debug, Default)]
struct Snapshot {
    outcome: ScanOutcome,
    by_id: HashMap<String, usize>,
}

impl Snapshot {
    fn new(outcome: ScanOutcome) -> Self {
        let by_id = outcome
            .resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self { outcome, by_id }
    }
}

impl Catalog {
    /// Create an empty catalog. Call [`Catalog::rebuild`] to populate it.
    pub fn new(root: impl Into<PathBuf>, engine: FilterEngine) -> Self {
        Self {
            root: root.into(),
            engine,
            snapshot: Snapshot::default(),
            generation: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    /// Rescan the root and replace the current descriptor set.
    pub fn rebuild(&mut self) -> u64 {
        let outcome = scanner::scan(&self.root, &self.engine);
        self.snapshot = Snapshot::new(outcome);
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            resources = self.snapshot.outcome.resources.len(),
            "catalog rebuilt"
        );
        self.generation
    }

    pub fn get(&self, id: &str) -> Option<&ResourceDescriptor> {
        self.snapshot
            .by_id
            .get(id)
            .map(|&i| &self.snapshot.outcome.resources[i])
    }

    /// Look up `id`, rebuilding once on a miss. A second miss is final.
    pub fn get_or_rebuild(&mut self, id: &str) -> Option<&ResourceDescriptor> {
        if !self.snapshot.by_id.contains_key(id) {
            tracing::debug!(id, "catalog miss, rebuilding");
            self.rebuild();
        }
        self.get(id)
    }

    pub fn list(&self) -> &[ResourceDescriptor] {
        &self.snapshot.outcome.resources
    }

    pub fn truncated(&self) -> bool {
        self.snapshot.outcome.truncated
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
