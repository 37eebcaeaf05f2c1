//! Per-source local mirrors
//!
//! Each declared source gets one mirror directory under the cache root.
//! Mirror maintenance is fetch-then-checkout, never a destructive reset:
//! a failed fetch leaves the previous mirror state intact, and an
//! interrupted run leaves a valid-but-stale mirror that the next run
//! resumes from.

use std::fs;
use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{FetchOptions, Oid, Repository};

use crate::export::export_subtree;
use crate::{Error, Result};

/// Options controlling mirror fetches.
#[derive(Debug, Clone)]
pub struct SourceCacheOptions {
    /// Shallow-fetch depth for tracked refs. `None` fetches full history;
    /// the default of 1 bounds bandwidth on large upstreams. Local-path
    /// transports do not reliably serve shallow packs, so tests use `None`.
    pub depth: Option<i32>,
}

impl Default for SourceCacheOptions {
    fn default() -> Self {
        Self { depth: Some(1) }
    }
}

/// Handle to one source's mirror after a successful `ensure`.
#[derive(Debug, Clone)]
pub struct MirrorHandle {
    pub source_id: String,
    pub path: PathBuf,
    head: String,
}

impl MirrorHandle {
    /// The mirror's current tracked commit, used to stamp floating-ref
    /// skills in the sync state.
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Directory of the checked-out subpath inside the mirror working tree.
    pub fn subpath_dir(&self, subpath: &str) -> PathBuf {
        let subpath = subpath.trim_matches('/');
        if subpath.is_empty() {
            self.path.clone()
        } else {
            self.path.join(subpath)
        }
    }
}

/// Maintains one local, sparse, shallow mirror per declared source.
pub struct SourceCache {
    root: PathBuf,
    options: SourceCacheOptions,
}

impl SourceCache {
    /// Create a cache rooted at `root` with default (shallow) options.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: SourceCacheOptions::default(),
        }
    }

    /// Create a cache with explicit fetch options.
    pub fn with_options(root: impl Into<PathBuf>, options: SourceCacheOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Directory of a source's mirror (whether or not it exists yet).
    pub fn mirror_dir(&self, source_id: &str) -> PathBuf {
        self.root.join(source_id)
    }

    /// Ensure a source's mirror exists and tracks `track_ref` at the
    /// upstream head, with the working tree scoped to `subpath`.
    ///
    /// Creates the mirror on first use; afterwards performs a fetch and
    /// re-applies the sparse scope, which also absorbs upstream subpath
    /// changes. Returns a handle carrying the resolved head commit.
    ///
    /// # Errors
    ///
    /// Fetch and clone failures are reported as `Error::FetchFailed` for
    /// the caller to treat as a recoverable per-source condition.
    pub fn ensure(
        &self,
        source_id: &str,
        repository_url: &str,
        subpath: &str,
        track_ref: &str,
    ) -> Result<MirrorHandle> {
        let dir = self.mirror_dir(source_id);
        let repo = self.open_or_init(&dir)?;
        self.configure_origin(&repo, repository_url)?;

        let refspec = format!("+refs/heads/{}:refs/remotes/origin/{}", track_ref, track_ref);
        self.fetch(&repo, source_id, &[refspec.as_str()])?;

        let fetch_head = repo
            .find_reference("FETCH_HEAD")
            .and_then(|r| r.peel_to_commit())
            .map_err(|e| Error::FetchFailed {
                source_id: source_id.to_string(),
                message: format!("could not resolve FETCH_HEAD: {}", e.message()),
            })?;

        // Sparse scope: only the declared subpath is materialized in the
        // working tree. Fetch-then-checkout, never reset.
        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        let subpath = subpath.trim_matches('/');
        if !subpath.is_empty() {
            checkout.path(subpath);
        }
        repo.checkout_tree(fetch_head.as_object(), Some(&mut checkout))?;
        repo.set_head_detached(fetch_head.id())?;

        tracing::debug!(
            source = source_id,
            head = %fetch_head.id(),
            subpath,
            "mirror ensured"
        );

        Ok(MirrorHandle {
            source_id: source_id.to_string(),
            path: dir,
            head: fetch_head.id().to_string(),
        })
    }

    /// Export the subtree at `source_relative_path` of an exact commit
    /// into `dest`, reading straight from the mirror's object database.
    ///
    /// For pinned skills the commit is fetched on demand when the object
    /// database does not already contain it. The mirror's working tree and
    /// tracked ref are untouched, so pinned and floating skills sharing a
    /// source never interfere.
    pub fn export_commit(
        &self,
        source_id: &str,
        commit: &str,
        source_relative_path: &str,
        dest: &Path,
    ) -> Result<()> {
        let dir = self.mirror_dir(source_id);
        if !dir.exists() {
            return Err(Error::MirrorNotFound {
                source_id: source_id.to_string(),
                path: dir,
            });
        }
        let repo = Repository::open(&dir)?;

        let oid = Oid::from_str(commit).map_err(|_| Error::CommitNotFound {
            source_id: source_id.to_string(),
            commit: commit.to_string(),
        })?;

        if !repo.odb()?.exists(oid) {
            tracing::debug!(source = source_id, commit, "pinned commit absent, fetching");
            self.fetch(&repo, source_id, &[commit])?;
        }

        let commit_obj = repo.find_commit(oid).map_err(|_| Error::CommitNotFound {
            source_id: source_id.to_string(),
            commit: commit.to_string(),
        })?;

        export_subtree(&repo, &commit_obj, source_relative_path, dest)
    }

    fn open_or_init(&self, dir: &Path) -> Result<Repository> {
        if dir.exists() {
            Ok(Repository::open(dir)?)
        } else {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
            Ok(Repository::init(dir)?)
        }
    }

    /// Point `origin` at the declared URL, correcting a changed upstream.
    fn configure_origin(&self, repo: &Repository, url: &str) -> Result<()> {
        match repo.find_remote("origin") {
            Ok(remote) => {
                if remote.url() != Some(url) {
                    repo.remote_set_url("origin", url)?;
                }
            }
            Err(_) => {
                repo.remote("origin", url)?;
            }
        }
        Ok(())
    }

    fn fetch(&self, repo: &Repository, source_id: &str, refspecs: &[&str]) -> Result<()> {
        let mut remote = repo.find_remote("origin")?;
        let mut opts = FetchOptions::new();
        if let Some(depth) = self.options.depth {
            opts.depth(depth);
        }
        remote
            .fetch(refspecs, Some(&mut opts), None)
            .map_err(|e| Error::FetchFailed {
                source_id: source_id.to_string(),
                message: e.message().to_string(),
            })
    }
}
