//! SyncEngine implementation
//!
//! The SyncEngine coordinates state between the manifest (declared
//! skills), the per-source mirrors (upstream content), and the catalog
//! (synchronized copies). Each skill moves through
//! PENDING -> FETCHING -> COPYING -> OVERRIDDEN -> RECORDED, or to FAILED
//! from any of the first three phases; one skill's failure never aborts
//! the batch.

use std::collections::BTreeMap;
use std::fs;

use skillsync_fs::{SyncLock, compute_dir_checksum, replace_dir};
use skillsync_git::{MirrorHandle, SourceCache};
use skillsync_manifest::{DesiredVersion, Manifest, SkillSpec, resolve};

use crate::overrides::OverrideSpec;
use crate::state::SyncStateStore;
use crate::validate::{ValidationGateway, Verdict};
use crate::{CatalogLayout, Error, Result};

use super::report::{ChangeClass, SyncOutcome, SyncPhase, SyncReport};

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, classify every skill without touching the catalog,
    /// overrides, or sync state.
    pub dry_run: bool,
}

/// Optional tier/category restriction of the work list.
#[derive(Debug, Clone, Default)]
pub struct SyncFilter {
    pub tier: Option<u8>,
    pub category: Option<String>,
}

impl SyncFilter {
    pub fn matches(&self, spec: &SkillSpec) -> bool {
        self.tier.is_none_or(|tier| spec.tier == tier)
            && self
                .category
                .as_deref()
                .is_none_or(|category| spec.category == category)
    }
}

/// Mirror results keyed by (source id, tracked ref). A source that failed
/// to fetch keeps its error message so every dependent skill reports it.
type MirrorMap = BTreeMap<(String, String), std::result::Result<MirrorHandle, String>>;

/// Engine for synchronizing the skills catalog against upstream sources.
pub struct SyncEngine {
    layout: CatalogLayout,
    cache: SourceCache,
    state: SyncStateStore,
    gateway: Option<Box<dyn ValidationGateway>>,
    validation_profile: String,
}

impl SyncEngine {
    /// Create an engine with the default (shallow-fetch) source cache.
    pub fn new(layout: CatalogLayout) -> Self {
        let cache = SourceCache::new(layout.sources_dir());
        Self::with_cache(layout, cache)
    }

    /// Create an engine with an explicitly configured source cache.
    pub fn with_cache(layout: CatalogLayout, cache: SourceCache) -> Self {
        let state = SyncStateStore::new(layout.state_path());
        Self {
            layout,
            cache,
            state,
            gateway: None,
            validation_profile: "default".to_string(),
        }
    }

    /// Attach a validation gateway, invoked advisorily after a successful
    /// batch.
    pub fn with_gateway(mut self, gateway: Box<dyn ValidationGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_validation_profile(mut self, profile: impl Into<String>) -> Self {
        self.validation_profile = profile.into();
        self
    }

    pub fn layout(&self) -> &CatalogLayout {
        &self.layout
    }

    pub fn state(&self) -> &SyncStateStore {
        &self.state
    }

    /// Synchronize every external skill matching `filter`.
    ///
    /// # Errors
    ///
    /// Fatal errors only: lock held by a live process, or state/staging
    /// setup failures. Per-skill errors land in the report.
    pub fn sync(
        &self,
        manifest: &Manifest,
        filter: &SyncFilter,
        options: &SyncOptions,
    ) -> Result<SyncReport> {
        let work: Vec<(&str, &SkillSpec)> = manifest
            .external_skills()
            .filter(|(_, spec)| filter.matches(spec))
            .map(|(name, spec)| (name.as_str(), spec))
            .collect();
        self.run(manifest, &work, options)
    }

    /// Classify every matching skill without mutating the catalog.
    pub fn dry_run(&self, manifest: &Manifest, filter: &SyncFilter) -> Result<SyncReport> {
        self.sync(manifest, filter, &SyncOptions { dry_run: true })
    }

    /// Re-sync one skill through the same pipeline as a batch sync.
    ///
    /// # Errors
    ///
    /// Fatal for unknown skills and for local skills; local skills are
    /// rejected with a clear error rather than silently skipped.
    pub fn update(&self, manifest: &Manifest, name: &str) -> Result<SyncReport> {
        let spec = manifest
            .skill(name)
            .ok_or_else(|| skillsync_manifest::Error::SkillNotFound {
                name: name.to_string(),
            })?;
        if spec.local {
            return Err(skillsync_manifest::Error::LocalSkill {
                name: name.to_string(),
            }
            .into());
        }
        self.run(manifest, &[(name, spec)], &SyncOptions::default())
    }

    fn run(
        &self,
        manifest: &Manifest,
        work: &[(&str, &SkillSpec)],
        options: &SyncOptions,
    ) -> Result<SyncReport> {
        // Held for the whole run; released on every exit path via Drop.
        let _lock = SyncLock::acquire(&self.layout.lock_path())?;

        fs::create_dir_all(self.layout.staging_dir())?;
        if !options.dry_run {
            fs::create_dir_all(self.layout.skills_dir())?;
        }

        let mirrors = self.prepare_mirrors(manifest, work);

        let mut report = SyncReport::default();
        for (name, spec) in work {
            let outcome = self.sync_one(manifest, name, spec, &mirrors, options);
            if let Some(class) = outcome.class {
                tracing::debug!(skill = name, %class, "classified");
            }
            report.outcomes.push(outcome);
        }

        if !options.dry_run {
            self.run_validation(&mut report);
        }

        tracing::debug!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            unchanged = report.unchanged(),
            dry_run = options.dry_run,
            "batch finished"
        );
        Ok(report)
    }

    /// Fetch each distinct (source, ref) pair once. Failures are captured
    /// per source so the batch can keep going for the other sources.
    fn prepare_mirrors(&self, manifest: &Manifest, work: &[(&str, &SkillSpec)]) -> MirrorMap {
        let mut mirrors = MirrorMap::new();
        for (_, spec) in work {
            let key = (spec.source.clone(), spec.track_ref.clone());
            if mirrors.contains_key(&key) {
                continue;
            }
            let Some(source) = manifest.source(&spec.source) else {
                // Unreachable after parse-time validation; recorded anyway.
                mirrors.insert(key, Err("source not declared".to_string()));
                continue;
            };
            let result = self
                .cache
                .ensure(&spec.source, &source.repository, &source.subpath, &spec.track_ref)
                .map_err(|e| e.to_string());
            if let Err(message) = &result {
                tracing::warn!(source = %spec.source, %message, "mirror unavailable");
            }
            mirrors.insert(key, result);
        }
        mirrors
    }

    fn sync_one(
        &self,
        manifest: &Manifest,
        name: &str,
        spec: &SkillSpec,
        mirrors: &MirrorMap,
        options: &SyncOptions,
    ) -> SyncOutcome {
        let mut phase = SyncPhase::Pending;
        match self.try_sync_one(manifest, name, spec, mirrors, options, &mut phase) {
            Ok(class) => SyncOutcome {
                skill: name.to_string(),
                phase,
                class: Some(class),
                detail: None,
            },
            Err(e) => {
                tracing::warn!(skill = name, error = %e, "skill sync failed");
                SyncOutcome {
                    skill: name.to_string(),
                    phase: SyncPhase::Failed,
                    class: None,
                    detail: Some(format!("failed while {}: {}", phase.verb(), e)),
                }
            }
        }
    }

    fn try_sync_one(
        &self,
        manifest: &Manifest,
        name: &str,
        spec: &SkillSpec,
        mirrors: &MirrorMap,
        options: &SyncOptions,
        phase: &mut SyncPhase,
    ) -> Result<ChangeClass> {
        let resolved = resolve(manifest, name)?;

        *phase = SyncPhase::Fetching;
        let commit = match &resolved.version {
            // Pins resolve to their exact commit regardless of ref drift,
            // and regardless of whether this run's fetch succeeded.
            DesiredVersion::Pinned(commit) => commit.clone(),
            DesiredVersion::Ref(_) => {
                let key = (spec.source.clone(), spec.track_ref.clone());
                match mirrors.get(&key) {
                    Some(Ok(handle)) => handle.head().to_string(),
                    Some(Err(message)) => {
                        return Err(Error::SourceUnavailable {
                            source_id: resolved.source_id.clone(),
                            message: message.clone(),
                        });
                    }
                    None => {
                        return Err(Error::SourceUnavailable {
                            source_id: resolved.source_id.clone(),
                            message: "mirror was not prepared".to_string(),
                        });
                    }
                }
            }
        };

        let staging = tempfile::Builder::new()
            .prefix(name)
            .tempdir_in(self.layout.staging_dir())?;

        match self.cache.export_commit(
            &resolved.source_id,
            &commit,
            &resolved.source_relative_path,
            staging.path(),
        ) {
            Ok(()) => {}
            // Declared upstream but absent at the resolved commit: a
            // data-integrity warning in a dry run, a failure in a real one.
            Err(skillsync_git::Error::SubtreeNotFound { .. }) if options.dry_run => {
                return Ok(ChangeClass::Missing);
            }
            Err(e) => return Err(e.into()),
        }

        // Layer overrides onto the staged tree before comparing, so the
        // comparison sees exactly what a real sync would leave behind.
        let overrides = OverrideSpec::discover(&self.layout, name)?;
        overrides.apply(staging.path())?;

        let target = self.layout.skill_dir(name);
        let class = if !target.exists() {
            ChangeClass::New
        } else if compute_dir_checksum(staging.path())? == compute_dir_checksum(&target)? {
            ChangeClass::Unchanged
        } else {
            ChangeClass::Updated
        };

        if options.dry_run {
            return Ok(class);
        }

        if class != ChangeClass::Unchanged {
            *phase = SyncPhase::Copying;
            replace_dir(staging.path(), &target)?;
            *phase = SyncPhase::Overridden;
        }

        // Unchanged skills still refresh their provenance timestamp.
        self.state.record(name, &resolved.source_id, &commit)?;
        *phase = SyncPhase::Recorded;
        Ok(class)
    }

    fn run_validation(&self, report: &mut SyncReport) {
        let Some(gateway) = &self.gateway else {
            return;
        };
        for outcome in report.outcomes.iter().filter(|o| o.succeeded()) {
            let skill_dir = self.layout.skill_dir(&outcome.skill);
            match gateway.validate(&skill_dir, &self.validation_profile) {
                Ok(Verdict::Pass) => {}
                Ok(Verdict::Fail { detail }) => {
                    report
                        .validation_failures
                        .push(format!("{}: {}", outcome.skill, detail));
                }
                Err(e) => {
                    report
                        .validation_failures
                        .push(format!("{}: {}", outcome.skill, e));
                }
            }
        }
        if !report.validation_failures.is_empty() {
            tracing::warn!(
                failures = report.validation_failures.len(),
                "validation reported failures (sync not rolled back)"
            );
        }
    }
}
