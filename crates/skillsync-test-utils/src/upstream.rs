//! Upstream repository fixture
//!
//! Builds a real local git repository holding a skills tree, for tests
//! that exercise mirror/fetch/export paths without network access.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

/// A throwaway upstream repository with a `main` branch and a skills tree.
///
/// # Panics
///
/// All methods panic on failure; this is test-only code.
pub struct UpstreamRepo {
    dir: TempDir,
    repo: Repository,
}

impl UpstreamRepo {
    /// Initialise an empty upstream with `main` as the initial branch.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create upstream tempdir");
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("refs/heads/main");
        let repo = Repository::init_opts(dir.path(), &opts).expect("init upstream repo");
        Self { dir, repo }
    }

    /// Filesystem path of the upstream; usable directly as a remote URL.
    pub fn url(&self) -> String {
        self.dir.path().to_string_lossy().to_string()
    }

    /// Path to the upstream working tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write (or overwrite) files for a skill under `<subpath>/<name>/`.
    ///
    /// Paths in `files` are relative to the skill directory.
    pub fn write_skill(&self, subpath: &str, name: &str, files: &[(&str, &str)]) {
        let skill_dir = self.skill_dir(subpath, name);
        for (rel, content) in files {
            let path = skill_dir.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create skill subdir");
            }
            fs::write(&path, content).expect("write skill file");
        }
    }

    /// Remove a skill directory entirely (simulates upstream deletion).
    pub fn remove_skill(&self, subpath: &str, name: &str) {
        let skill_dir = self.skill_dir(subpath, name);
        if skill_dir.exists() {
            fs::remove_dir_all(&skill_dir).expect("remove skill dir");
        }
    }

    /// Stage everything and commit on `main`, returning the commit sha.
    pub fn commit(&self, message: &str) -> String {
        let mut index = self.repo.index().expect("open index");
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .expect("stage files");
        // Deletions are not covered by add_all; update_all picks them up.
        index
            .update_all(["*"].iter(), None)
            .expect("stage deletions");
        index.write().expect("write index");

        let tree_id = index.write_tree().expect("write tree");
        let tree = self.repo.find_tree(tree_id).expect("find tree");
        let sig = Signature::now("Fixture", "fixture@example.com").expect("signature");

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("commit");
        oid.to_string()
    }

    /// Create branch `name` at the current head and switch HEAD to it.
    pub fn branch(&self, name: &str) {
        let head = self
            .repo
            .head()
            .expect("head")
            .peel_to_commit()
            .expect("peel head");
        self.repo.branch(name, &head, false).expect("create branch");
        self.repo
            .set_head(&format!("refs/heads/{}", name))
            .expect("switch head");
    }

    /// Stage everything and commit on `branch`, returning the commit sha.
    pub fn commit_on(&self, branch: &str, message: &str) -> String {
        self.repo
            .set_head(&format!("refs/heads/{}", branch))
            .expect("switch head");
        self.commit(message)
    }

    /// Current head commit sha of `main`.
    pub fn head(&self) -> String {
        self.repo
            .head()
            .expect("head")
            .peel_to_commit()
            .expect("peel head")
            .id()
            .to_string()
    }

    fn skill_dir(&self, subpath: &str, name: &str) -> PathBuf {
        let subpath = subpath.trim_matches('/');
        if subpath.is_empty() {
            self.dir.path().join(name)
        } else {
            self.dir.path().join(subpath).join(name)
        }
    }
}

impl Default for UpstreamRepo {
    fn default() -> Self {
        Self::new()
    }
}
