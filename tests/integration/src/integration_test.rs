//! End-to-end integration test for the vertical slice
//!
//! Exercises the complete flow: manifest parsing -> mirror fetch ->
//! staged export -> override layering -> catalog copy -> state record.

use std::fs;

use tempfile::TempDir;

use skillsync_core::{CatalogLayout, ChangeClass, SyncEngine, SyncFilter, SyncOptions};
use skillsync_git::{SourceCache, SourceCacheOptions};
use skillsync_manifest::Manifest;
use skillsync_test_utils::UpstreamRepo;

/// Set up a catalog with a manifest declaring skills from `upstream`.
fn setup_catalog(upstream: &UpstreamRepo, skills_yaml: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let doc = format!(
        "sources:\n  upstream-a:\n    repository: {}\n    subpath: skills\nskills:\n{}",
        upstream.url(),
        skills_yaml
    );
    fs::write(temp.path().join("skillsync.yaml"), doc).unwrap();
    temp
}

fn engine(catalog: &TempDir) -> SyncEngine {
    let layout = CatalogLayout::new(catalog.path());
    let cache = SourceCache::with_options(
        layout.sources_dir(),
        SourceCacheOptions { depth: None },
    );
    SyncEngine::with_cache(layout, cache)
}

#[test]
fn full_sync_flow_from_manifest_to_state() {
    let upstream = UpstreamRepo::new();
    upstream.write_skill(
        "skills",
        "code-review",
        &[
            ("SKILL.md", "# Code Review\n\nChecklist driven.\n"),
            ("scripts/lint.sh", "#!/bin/sh\nexit 0\n"),
        ],
    );
    upstream.write_skill("skills", "release-notes", &[("SKILL.md", "# Release Notes\n")]);
    let head = upstream.commit("seed skills");

    let catalog = setup_catalog(
        &upstream,
        concat!(
            "  code-review:\n    source: upstream-a\n",
            "  release-notes:\n    source: upstream-a\n    tier: 2\n",
        ),
    );
    let engine = engine(&catalog);
    let manifest = Manifest::load(&engine.layout().manifest_path()).unwrap();

    let report = engine
        .sync(&manifest, &SyncFilter::default(), &SyncOptions::default())
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.succeeded(), 2);

    // Catalog copies exist, nested files included.
    assert!(catalog.path().join("skills/code-review/scripts/lint.sh").exists());
    assert!(catalog.path().join("skills/release-notes/SKILL.md").exists());

    // State document records provenance for both skills.
    let state = engine.state().read().unwrap();
    assert_eq!(state.skills.len(), 2);
    assert_eq!(state.skills["code-review"].resolved_commit, head);
    assert_eq!(state.skills["code-review"].source, "upstream-a");

    // The state document on disk is well-formed JSON.
    let raw = fs::read_to_string(catalog.path().join(".sync-state.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(parsed["last_synced_at"].is_string());
}

#[test]
fn sync_with_overrides_is_stable_over_many_runs() {
    let upstream = UpstreamRepo::new();
    upstream.write_skill("skills", "code-review", &[("SKILL.md", "# Code Review\n")]);
    upstream.commit("seed");

    let catalog = setup_catalog(&upstream, "  code-review:\n    source: upstream-a\n");
    fs::create_dir_all(catalog.path().join("overrides/code-review")).unwrap();
    fs::write(
        catalog.path().join("overrides/code-review/team.md"),
        "team conventions\n",
    )
    .unwrap();
    fs::write(
        catalog.path().join("overrides/code-review.patch.yaml"),
        "sections:\n  House Rules: Two approvals before merge.\n",
    )
    .unwrap();

    let engine = engine(&catalog);
    let manifest = Manifest::load(&engine.layout().manifest_path()).unwrap();

    let mut checksums = Vec::new();
    for run in 0..3 {
        let report = engine
            .sync(&manifest, &SyncFilter::default(), &SyncOptions::default())
            .unwrap();
        let expected = if run == 0 {
            ChangeClass::New
        } else {
            ChangeClass::Unchanged
        };
        assert_eq!(report.outcomes[0].class, Some(expected));
        checksums.push(
            skillsync_fs::compute_dir_checksum(&catalog.path().join("skills/code-review"))
                .unwrap(),
        );
    }
    assert_eq!(checksums[0], checksums[1]);
    assert_eq!(checksums[1], checksums[2]);

    let doc = fs::read_to_string(catalog.path().join("skills/code-review/SKILL.md")).unwrap();
    assert_eq!(
        doc.lines().filter(|l| l.trim() == "## House Rules").count(),
        1
    );
    assert!(catalog.path().join("skills/code-review/team.md").exists());
}

#[test]
fn upstream_removal_then_redeclare_round_trip() {
    let upstream = UpstreamRepo::new();
    upstream.write_skill("skills", "ephemeral", &[("SKILL.md", "v1\n")]);
    upstream.commit("add");

    let catalog = setup_catalog(&upstream, "  ephemeral:\n    source: upstream-a\n");
    let engine = engine(&catalog);
    let manifest = Manifest::load(&engine.layout().manifest_path()).unwrap();

    engine
        .sync(&manifest, &SyncFilter::default(), &SyncOptions::default())
        .unwrap();

    // Upstream deletes the skill: the next sync fails for it but keeps the
    // last good catalog copy in place.
    upstream.remove_skill("skills", "ephemeral");
    upstream.commit("remove");

    let report = engine
        .sync(&manifest, &SyncFilter::default(), &SyncOptions::default())
        .unwrap();
    assert_eq!(report.failed(), 1);
    assert!(catalog.path().join("skills/ephemeral/SKILL.md").exists());
}
