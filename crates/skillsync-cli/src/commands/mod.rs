//! Command implementations

mod diff;
mod list;
mod status;
mod sync;

pub use diff::run_diff;
pub use list::{run_list_categories, run_list_external, run_list_local};
pub use status::run_status;
pub use sync::{run_sync, run_update};

use std::path::Path;

use skillsync_core::{CatalogLayout, SyncEngine};
use skillsync_git::{SourceCache, SourceCacheOptions};

/// Build the mirror cache for a catalog, honoring `--full-history`.
pub(crate) fn source_cache(layout: &CatalogLayout, full_history: bool) -> SourceCache {
    let options = SourceCacheOptions {
        depth: if full_history { None } else { Some(1) },
    };
    SourceCache::with_options(layout.sources_dir(), options)
}

/// Build a sync engine rooted at `catalog`.
pub(crate) fn engine_for(catalog: &Path, full_history: bool) -> SyncEngine {
    let layout = CatalogLayout::new(catalog);
    let cache = source_cache(&layout, full_history);
    SyncEngine::with_cache(layout, cache)
}
