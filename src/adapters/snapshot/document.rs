//! In-memory document backed by a JSON snapshot
//!
//! Transaction groups and nested transactions are implemented with state
//! checkpoints. Committing a transaction runs validation passes for the
//! scripted failures it triggers, handing each pass to the registered
//! [`FailuresProcessor`] until no failure is left, the processor rolls back,
//! or the pass bound is reached.

use super::model::{DocumentSnapshot, ScriptedFailure};
use crate::adapters::host::{CommitStatus, FailureAccessor, FailuresProcessor, HostDocument};
use crate::domain::{
    DisplayStyle, DwgBatchError, ElementId, ExportSettings, FailureKey, FailureRecord,
    ResolutionType, ResolutionVerdict, Result, Severity, ViewId, ViewInfo,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Validation passes run per commit before the host gives up and rolls back
pub const DEFAULT_MAX_PASSES: usize = 16;

/// Mutable part of the document, restored on rollback
#[derive(Debug, Clone, PartialEq, Eq)]
struct DocState {
    views: Vec<ViewInfo>,
    settings: Vec<ExportSettings>,
    active_settings: Option<String>,
    elements: BTreeSet<ElementId>,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    name: String,
    state: DocState,
}

/// Failure raised in the current commit
#[derive(Debug, Clone)]
struct ActiveFailure {
    record: FailureRecord,
    stubborn: bool,
}

/// Snapshot-backed [`HostDocument`]
#[derive(Debug, Clone)]
pub struct SnapshotDocument {
    title: String,
    path: Option<PathBuf>,
    view_sets: BTreeMap<String, Vec<ViewId>>,
    state: DocState,
    scripts: Vec<ScriptedFailure>,
    group: Option<Checkpoint>,
    transaction: Option<Checkpoint>,
    max_passes: usize,
    commit_log: Vec<String>,
}

impl SnapshotDocument {
    /// Creates a document from a snapshot
    pub fn new(snapshot: DocumentSnapshot) -> Self {
        Self {
            title: snapshot.title,
            path: snapshot.path,
            view_sets: snapshot.view_sets,
            state: DocState {
                views: snapshot.views,
                settings: snapshot.export_settings,
                active_settings: snapshot.active_settings,
                elements: snapshot.elements.into_iter().collect(),
            },
            scripts: snapshot.scripted_failures,
            group: None,
            transaction: None,
            max_passes: DEFAULT_MAX_PASSES,
            commit_log: Vec::new(),
        }
    }

    /// Starts building a document in code
    pub fn builder(title: impl Into<String>) -> SnapshotBuilder {
        SnapshotBuilder::new(title)
    }

    /// Parses a snapshot from JSON text
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: DocumentSnapshot = serde_json::from_str(json)?;
        Ok(Self::new(snapshot))
    }

    /// Loads a snapshot file
    ///
    /// A snapshot without `path` takes the file's own location, so relative
    /// override files resolve next to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DwgBatchError::Configuration(format!(
                "Document snapshot not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let mut snapshot: DocumentSnapshot = serde_json::from_str(&contents).map_err(|e| {
            DwgBatchError::Configuration(format!(
                "Invalid document snapshot {}: {}",
                path.display(),
                e
            ))
        })?;

        if snapshot.path.is_none() {
            snapshot.path = Some(path.to_path_buf());
        }

        tracing::debug!(
            path = %path.display(),
            views = snapshot.views.len(),
            scripted_failures = snapshot.scripted_failures.len(),
            "Loaded document snapshot"
        );

        Ok(Self::new(snapshot))
    }

    /// Changes the bound on validation passes per commit
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Names of the transactions committed so far, in order
    pub fn commit_log(&self) -> &[String] {
        &self.commit_log
    }

    /// Whether the element is still in the document
    pub fn contains_element(&self, element: ElementId) -> bool {
        self.state.elements.contains(&element)
    }

    /// Whether a transaction group is open
    pub fn is_group_open(&self) -> bool {
        self.group.is_some()
    }

    /// Scripted failures that have not fired yet
    pub fn pending_scripts(&self) -> usize {
        self.scripts.len()
    }

    fn require_transaction(&self, operation: &str) -> Result<()> {
        if self.transaction.is_none() {
            return Err(DwgBatchError::Host(format!(
                "{operation} requires an open transaction"
            )));
        }
        Ok(())
    }

    fn take_scripts(&mut self, transaction: &str) -> Vec<ActiveFailure> {
        let (fired, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scripts)
            .into_iter()
            .partition(|script| script.transaction == transaction);
        self.scripts = remaining;

        fired
            .into_iter()
            .map(|script| ActiveFailure {
                record: script.failure,
                stubborn: script.stubborn,
            })
            .collect()
    }

    /// Runs validation passes until the failures are cleared or the processor gives up
    fn run_passes(
        &mut self,
        name: &str,
        mut active: Vec<ActiveFailure>,
        processor: &mut dyn FailuresProcessor,
    ) -> bool {
        for pass in 1..=self.max_passes {
            if active.is_empty() {
                return true;
            }

            let mut accessor = PassAccessor {
                active: &mut active,
                elements: &mut self.state.elements,
                resolved: BTreeSet::new(),
            };
            let verdict = processor.process_failures(&mut accessor);

            tracing::debug!(
                transaction = name,
                pass,
                verdict = %verdict,
                remaining = active.len(),
                "Validation pass finished"
            );

            match verdict {
                ResolutionVerdict::ProceedWithRollback => return false,
                ResolutionVerdict::ProceedWithCommit => continue,
                ResolutionVerdict::Continue => {
                    // Warnings left alone do not block a commit
                    return !active.iter().any(|f| f.record.severity == Severity::Error);
                }
            }
        }

        tracing::warn!(
            transaction = name,
            max_passes = self.max_passes,
            "Failures did not converge, rolling back"
        );
        active.is_empty()
    }
}

impl HostDocument for SnapshotDocument {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn view(&self, id: &ViewId) -> Option<ViewInfo> {
        self.state.views.iter().find(|v| &v.id == id).cloned()
    }

    fn views(&self) -> Vec<ViewInfo> {
        self.state.views.clone()
    }

    fn view_set(&self, name: &str) -> Option<Vec<ViewId>> {
        self.view_sets.get(name).cloned()
    }

    fn find_export_settings(&self, name: &str) -> Option<ExportSettings> {
        self.state.settings.iter().find(|s| s.name == name).cloned()
    }

    fn active_export_settings(&self) -> Option<ExportSettings> {
        self.state
            .active_settings
            .as_deref()
            .and_then(|name| self.find_export_settings(name))
    }

    fn create_export_settings(&mut self, name: &str) -> Result<ExportSettings> {
        self.require_transaction("Creating export settings")?;

        if self.find_export_settings(name).is_some() {
            return Err(DwgBatchError::Host(format!(
                "Export settings `{name}` already exist"
            )));
        }

        let settings = ExportSettings::with_defaults(name);
        self.state.settings.push(settings.clone());
        Ok(settings)
    }

    fn set_display_style(&mut self, view: &ViewId, style: DisplayStyle) -> Result<()> {
        self.require_transaction("Changing the display style")?;

        let target = self
            .state
            .views
            .iter_mut()
            .find(|v| &v.id == view)
            .ok_or_else(|| DwgBatchError::Host(format!("View `{view}` not found")))?;
        target.display_style = Some(style);
        Ok(())
    }

    fn start_group(&mut self, name: &str) -> Result<()> {
        if let Some(open) = &self.group {
            return Err(DwgBatchError::Host(format!(
                "Transaction group `{}` is already open",
                open.name
            )));
        }

        self.group = Some(Checkpoint {
            name: name.to_string(),
            state: self.state.clone(),
        });
        Ok(())
    }

    fn rollback_group(&mut self) -> Result<()> {
        let group = self
            .group
            .take()
            .ok_or_else(|| DwgBatchError::Host("No transaction group is open".to_string()))?;

        self.transaction = None;
        self.state = group.state;
        tracing::debug!(group = %group.name, "Transaction group rolled back");
        Ok(())
    }

    fn start_transaction(&mut self, name: &str) -> Result<()> {
        if let Some(open) = &self.transaction {
            return Err(DwgBatchError::Host(format!(
                "Transaction `{}` is already open",
                open.name
            )));
        }

        self.transaction = Some(Checkpoint {
            name: name.to_string(),
            state: self.state.clone(),
        });
        Ok(())
    }

    fn commit_transaction(
        &mut self,
        processor: &mut dyn FailuresProcessor,
    ) -> Result<CommitStatus> {
        let checkpoint = self
            .transaction
            .take()
            .ok_or_else(|| DwgBatchError::Host("No transaction is open".to_string()))?;

        let active = self.take_scripts(&checkpoint.name);
        if self.run_passes(&checkpoint.name, active, processor) {
            self.commit_log.push(checkpoint.name);
            Ok(CommitStatus::Committed)
        } else {
            self.state = checkpoint.state;
            Ok(CommitStatus::RolledBack)
        }
    }

    fn rollback_transaction(&mut self) -> Result<()> {
        let checkpoint = self
            .transaction
            .take()
            .ok_or_else(|| DwgBatchError::Host("No transaction is open".to_string()))?;

        self.state = checkpoint.state;
        Ok(())
    }
}

/// Failure accessor for one validation pass
struct PassAccessor<'p> {
    active: &'p mut Vec<ActiveFailure>,
    elements: &'p mut BTreeSet<ElementId>,
    /// Failures cleared earlier in this pass
    resolved: BTreeSet<FailureKey>,
}

impl PassAccessor<'_> {
    fn position(&self, failure: &FailureRecord) -> Result<usize> {
        let key = failure.key();
        self.active
            .iter()
            .position(|f| f.record.key() == key)
            .ok_or_else(|| {
                DwgBatchError::Host(format!("Failure `{key}` is not part of this pass"))
            })
    }
}

impl FailureAccessor for PassAccessor<'_> {
    fn failures(&self) -> Vec<FailureRecord> {
        self.active.iter().map(|f| f.record.clone()).collect()
    }

    fn resolve_failure(
        &mut self,
        failure: &FailureRecord,
        resolution: ResolutionType,
    ) -> Result<()> {
        // Resolving a failure already cleared in this pass is a no-op
        if self.resolved.contains(&failure.key()) {
            return Ok(());
        }

        let index = self.position(failure)?;

        if resolution == ResolutionType::DeleteElements {
            let entry = self.active.remove(index);
            self.resolved.insert(entry.record.key());
            if entry.record.elements.is_empty() {
                return Err(DwgBatchError::Host(format!(
                    "Failure `{}` implicates no elements to delete",
                    entry.record.description
                )));
            }
            for element in &entry.record.elements {
                self.elements.remove(element);
            }
            return Ok(());
        }

        let entry = &mut self.active[index];
        let offered = entry.record.has_resolution_of_type(resolution)
            || (resolution == ResolutionType::Default
                && entry.record.available_resolutions.is_empty());
        if !offered {
            return Err(DwgBatchError::Host(format!(
                "Resolution {resolution} is not offered for `{}`",
                entry.record.description
            )));
        }

        if !entry.stubborn {
            let cleared = self.active.remove(index);
            self.resolved.insert(cleared.record.key());
            return Ok(());
        }

        // The failure survives; the host proposes the next untried strategy
        let record = &mut entry.record;
        if !record.attempted.contains(&resolution) {
            record.attempted.push(resolution);
        }
        let next = record
            .available_resolutions
            .iter()
            .copied()
            .find(|r| !record.attempted.contains(r))
            .unwrap_or(resolution);
        record.current_resolution = Some(next);
        Ok(())
    }

    fn delete_warning(&mut self, failure: &FailureRecord) -> Result<()> {
        let index = self.position(failure)?;
        if self.active[index].record.severity != Severity::Warning {
            return Err(DwgBatchError::Host(format!(
                "Failure `{}` is not a warning",
                failure.description
            )));
        }
        self.active.remove(index);
        Ok(())
    }
}

/// Builds a [`SnapshotDocument`] in code
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    snapshot: DocumentSnapshot,
    max_passes: Option<usize>,
}

impl SnapshotBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            snapshot: DocumentSnapshot {
                title: title.into(),
                ..Default::default()
            },
            max_passes: None,
        }
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot.path = Some(path.into());
        self
    }

    pub fn view(mut self, view: ViewInfo) -> Self {
        self.snapshot.views.push(view);
        self
    }

    pub fn view_set(mut self, name: impl Into<String>, views: Vec<ViewId>) -> Self {
        self.snapshot.view_sets.insert(name.into(), views);
        self
    }

    pub fn settings(mut self, settings: ExportSettings) -> Self {
        self.snapshot.export_settings.push(settings);
        self
    }

    pub fn active_settings(mut self, name: impl Into<String>) -> Self {
        self.snapshot.active_settings = Some(name.into());
        self
    }

    pub fn elements(mut self, elements: impl IntoIterator<Item = ElementId>) -> Self {
        self.snapshot.elements.extend(elements);
        self
    }

    /// Raises `failure` when `transaction` is committed
    pub fn failure_on(mut self, transaction: impl Into<String>, failure: FailureRecord) -> Self {
        self.snapshot.scripted_failures.push(ScriptedFailure {
            transaction: transaction.into(),
            failure,
            stubborn: false,
        });
        self
    }

    /// Raises a failure that no resolution other than element deletion clears
    pub fn stubborn_failure_on(
        mut self,
        transaction: impl Into<String>,
        failure: FailureRecord,
    ) -> Self {
        self.snapshot.scripted_failures.push(ScriptedFailure {
            transaction: transaction.into(),
            failure,
            stubborn: true,
        });
        self
    }

    pub fn max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    pub fn build(self) -> SnapshotDocument {
        let document = SnapshotDocument::new(self.snapshot);
        match self.max_passes {
            Some(max_passes) => document.with_max_passes(max_passes),
            None => document,
        }
    }
}
