//! Longer catalog lifecycle scenarios
//!
//! Multi-source catalogs, pin/unpin transitions, and state persistence
//! across engine instances.

use std::fs;

use tempfile::TempDir;

use skillsync_core::{CatalogLayout, ChangeClass, SyncEngine, SyncFilter, SyncOptions};
use skillsync_git::{SourceCache, SourceCacheOptions};
use skillsync_manifest::Manifest;
use skillsync_test_utils::UpstreamRepo;

fn engine(catalog: &TempDir) -> SyncEngine {
    let layout = CatalogLayout::new(catalog.path());
    let cache = SourceCache::with_options(
        layout.sources_dir(),
        SourceCacheOptions { depth: None },
    );
    SyncEngine::with_cache(layout, cache)
}

fn sync_all(engine: &SyncEngine, manifest: &Manifest) -> skillsync_core::SyncReport {
    engine
        .sync(manifest, &SyncFilter::default(), &SyncOptions::default())
        .unwrap()
}

#[test]
fn two_sources_sync_independently() {
    let alpha = UpstreamRepo::new();
    alpha.write_skill("skills", "alpha-skill", &[("SKILL.md", "alpha\n")]);
    alpha.commit("seed alpha");

    let beta = UpstreamRepo::new();
    beta.write_skill("bundles", "beta-skill", &[("SKILL.md", "beta\n")]);
    beta.commit("seed beta");

    let catalog = TempDir::new().unwrap();
    let doc = format!(
        concat!(
            "sources:\n",
            "  alpha:\n    repository: {}\n    subpath: skills\n",
            "  beta:\n    repository: {}\n    subpath: bundles\n",
            "skills:\n",
            "  alpha-skill:\n    source: alpha\n",
            "  beta-skill:\n    source: beta\n",
        ),
        alpha.url(),
        beta.url()
    );
    fs::write(catalog.path().join("skillsync.yaml"), doc).unwrap();

    let engine = engine(&catalog);
    let manifest = Manifest::load(&engine.layout().manifest_path()).unwrap();
    let report = sync_all(&engine, &manifest);

    assert!(report.is_success());
    assert_eq!(
        fs::read_to_string(catalog.path().join("skills/alpha-skill/SKILL.md")).unwrap(),
        "alpha\n"
    );
    assert_eq!(
        fs::read_to_string(catalog.path().join("skills/beta-skill/SKILL.md")).unwrap(),
        "beta\n"
    );

    // One mirror per source under .sources/.
    assert!(catalog.path().join(".sources/alpha").is_dir());
    assert!(catalog.path().join(".sources/beta").is_dir());
}

#[test]
fn pin_then_unpin_catches_back_up() {
    let upstream = UpstreamRepo::new();
    upstream.write_skill("skills", "tool", &[("SKILL.md", "v1\n")]);
    let v1 = upstream.commit("v1");
    upstream.write_skill("skills", "tool", &[("SKILL.md", "v2\n")]);
    upstream.commit("v2");

    let catalog = TempDir::new().unwrap();
    let pinned_doc = format!(
        "sources:\n  up:\n    repository: {}\n    subpath: skills\nskills:\n  tool:\n    source: up\n    pinned_commit: {}\n",
        upstream.url(),
        v1
    );
    fs::write(catalog.path().join("skillsync.yaml"), &pinned_doc).unwrap();

    let engine = engine(&catalog);
    let manifest = Manifest::load(&engine.layout().manifest_path()).unwrap();
    sync_all(&engine, &manifest);
    assert_eq!(
        fs::read_to_string(catalog.path().join("skills/tool/SKILL.md")).unwrap(),
        "v1\n"
    );

    // Drop the pin: the skill tracks the ref head again.
    let floating_doc = format!(
        "sources:\n  up:\n    repository: {}\n    subpath: skills\nskills:\n  tool:\n    source: up\n",
        upstream.url()
    );
    fs::write(catalog.path().join("skillsync.yaml"), &floating_doc).unwrap();
    let manifest = Manifest::load(&engine.layout().manifest_path()).unwrap();

    let report = sync_all(&engine, &manifest);
    assert_eq!(report.outcomes[0].class, Some(ChangeClass::Updated));
    assert_eq!(
        fs::read_to_string(catalog.path().join("skills/tool/SKILL.md")).unwrap(),
        "v2\n"
    );
}

#[test]
fn state_survives_engine_recreation() {
    let upstream = UpstreamRepo::new();
    upstream.write_skill("skills", "tool", &[("SKILL.md", "v1\n")]);
    let head = upstream.commit("v1");

    let catalog = TempDir::new().unwrap();
    let doc = format!(
        "sources:\n  up:\n    repository: {}\n    subpath: skills\nskills:\n  tool:\n    source: up\n",
        upstream.url()
    );
    fs::write(catalog.path().join("skillsync.yaml"), doc).unwrap();

    {
        let engine = engine(&catalog);
        let manifest = Manifest::load(&engine.layout().manifest_path()).unwrap();
        sync_all(&engine, &manifest);
    }

    // A fresh engine over the same catalog sees the record and classifies
    // the unchanged skill without re-copying.
    let engine = engine(&catalog);
    let manifest = Manifest::load(&engine.layout().manifest_path()).unwrap();
    let record = engine.state().last_known("tool").unwrap().unwrap();
    assert_eq!(record.resolved_commit, head);

    let report = sync_all(&engine, &manifest);
    assert_eq!(report.outcomes[0].class, Some(ChangeClass::Unchanged));
}

#[test]
fn nested_ref_tracking_follows_non_default_branch() {
    let upstream = UpstreamRepo::new();
    upstream.write_skill("skills", "tool", &[("SKILL.md", "main\n")]);
    upstream.commit("main content");
    upstream.branch("release");
    upstream.write_skill("skills", "tool", &[("SKILL.md", "release\n")]);
    upstream.commit_on("release", "release content");

    let catalog = TempDir::new().unwrap();
    let doc = format!(
        "sources:\n  up:\n    repository: {}\n    subpath: skills\nskills:\n  tool:\n    source: up\n    ref: release\n",
        upstream.url()
    );
    fs::write(catalog.path().join("skillsync.yaml"), doc).unwrap();

    let engine = engine(&catalog);
    let manifest = Manifest::load(&engine.layout().manifest_path()).unwrap();
    let report = sync_all(&engine, &manifest);

    assert!(report.is_success());
    assert_eq!(
        fs::read_to_string(catalog.path().join("skills/tool/SKILL.md")).unwrap(),
        "release\n"
    );
}
