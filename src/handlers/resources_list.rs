use crate::catalog::Catalog;
use crate::protocol::{ListResourcesResult, ResourceEntry};

/// Handle a `resources/list` request.
///
/// Always rescans the root first so the listing reflects the filesystem as
/// it is now. Entries keep walk order, which is stable for an unchanged tree.
pub async fn handle(catalog: &mut Catalog) -> ListResourcesResult {
    let generation = catalog.rebuild();

    ListResourcesResult {
        resources: catalog.list().iter().map(ResourceEntry::from).collect(),
        truncated: catalog.truncated(),
        generation,
    }
}
