//! Failure resolution engine
//!
//! Decides, for one validation pass, whether failing elements are deleted,
//! warnings dismissed, the transaction rolled back, or the pass left to the
//! host. The decision ([`ResolutionEngine::decide`]) is a pure function of the
//! reported failures and their attempt history; [`ResolutionEngine::resolve`]
//! applies it through the host's [`FailureAccessor`].
//!
//! Failures are examined in the order reported:
//!
//! 1. A failure whose distinct attempted strategies reach the ceiling rolls
//!    the whole pass back, whatever else the pass contains.
//! 2. An error implicating elements is resolved. When the host offers to
//!    detach the elements, the engine deletes them instead. The corrupt nested
//!    component case is resolved once more before the regular resolution.
//! 3. A warning is dismissed.
//! 4. The first failure that led to an action ends the pass with
//!    `ProceedWithCommit`; later failures are not inspected.
//! 5. A pass with nothing actionable returns `Continue`.

use super::classifier::{classify, Disposition};
use super::tracker::{AttemptHistory, AttemptTracker};
use crate::adapters::host::{FailureAccessor, FailuresProcessor};
use crate::domain::{FailureRecord, ResolutionType, ResolutionVerdict};
use crate::logging::TraceSink;

/// Command the engine issues for one failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureAction {
    /// Resolve the failure with the given strategy
    Resolve {
        failure: FailureRecord,
        resolution: ResolutionType,
    },
    /// Dismiss the warning
    DismissWarning { failure: FailureRecord },
}

/// Outcome of deciding one validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassDecision {
    /// Actions to apply, in order
    pub actions: Vec<FailureAction>,
    /// Verdict returned to the host
    pub verdict: ResolutionVerdict,
    /// Trace lines describing the decision
    pub trace: Vec<String>,
}

impl PassDecision {
    fn new() -> Self {
        Self {
            actions: Vec::new(),
            verdict: ResolutionVerdict::Continue,
            trace: Vec::new(),
        }
    }

    fn finish(mut self, verdict: ResolutionVerdict) -> Self {
        self.verdict = verdict;
        self
    }

    /// Strategy applied last to `failure`, if any
    pub fn resolution_for(&self, failure: &FailureRecord) -> Option<ResolutionType> {
        self.actions.iter().rev().find_map(|action| match action {
            FailureAction::Resolve {
                failure: f,
                resolution,
            } if f == failure => Some(*resolution),
            _ => None,
        })
    }
}

/// Failure resolution engine
///
/// Holds the attempt history for one transaction group. Create a new engine
/// per export job.
pub struct ResolutionEngine<'a> {
    tracker: AttemptTracker,
    sink: &'a dyn TraceSink,
}

impl<'a> ResolutionEngine<'a> {
    /// Creates an engine with the default attempt ceiling
    pub fn new(sink: &'a dyn TraceSink) -> Self {
        Self::with_tracker(AttemptTracker::new(), sink)
    }

    /// Creates an engine around an existing tracker
    pub fn with_tracker(tracker: AttemptTracker, sink: &'a dyn TraceSink) -> Self {
        Self { tracker, sink }
    }

    /// Attempt history accumulated so far
    pub fn tracker(&self) -> &AttemptTracker {
        &self.tracker
    }

    /// Decides one pass without side effects
    pub fn decide(
        &self,
        failures: &[FailureRecord],
        history: &dyn AttemptHistory,
    ) -> PassDecision {
        let ceiling = self.tracker.ceiling();
        let mut decision = PassDecision::new();
        let mut has_error = false;
        let mut has_warning = false;

        for failure in failures {
            let attempted = history.attempted(failure);
            if attempted.len() >= ceiling {
                let last = attempted
                    .last()
                    .copied()
                    .unwrap_or_else(|| failure.default_resolution());
                decision.trace.push(format!(
                    "Failure: Attempted to resolve the failure {} {} times with resolution {}. Rolling back transaction.",
                    failure.description,
                    attempted.len(),
                    last
                ));
                return decision.finish(ResolutionVerdict::ProceedWithRollback);
            }

            let class = classify(failure);
            match class.disposition {
                Disposition::Resolve => {
                    let mut resolution = failure.default_resolution();

                    if class.detach_available {
                        let ids: Vec<String> =
                            failure.elements.iter().map(ToString::to_string).collect();
                        decision.trace.push(
                            "FailureInstruction `Delete Element(s)` found. It will delete failing elements to resolve the failure.".to_string(),
                        );
                        decision
                            .trace
                            .push(format!("Following elements will be deleted: {}", ids.join(",")));
                        resolution = ResolutionType::DeleteElements;
                    }

                    if class.unrecoverable_corruption {
                        decision.trace.push(format!(
                            "Corrupt nested component reported: {}. Resolving immediately.",
                            failure.description
                        ));
                        decision.actions.push(FailureAction::Resolve {
                            failure: failure.clone(),
                            resolution,
                        });
                    }

                    has_error = true;
                    decision.trace.push(format!(
                        "Resolving error `{}` with resolution {}.",
                        failure.description, resolution
                    ));
                    decision.actions.push(FailureAction::Resolve {
                        failure: failure.clone(),
                        resolution,
                    });
                }
                Disposition::Dismiss => {
                    has_warning = true;
                    decision
                        .trace
                        .push(format!("Dismissing warning `{}`.", failure.description));
                    decision.actions.push(FailureAction::DismissWarning {
                        failure: failure.clone(),
                    });
                }
                Disposition::Terminal => {
                    decision.trace.push(format!(
                        "Error `{}` implicates no elements, leaving it to the host.",
                        failure.description
                    ));
                }
            }

            if has_error || has_warning {
                decision
                    .trace
                    .push(format!("Verdict: {}.", ResolutionVerdict::ProceedWithCommit));
                return decision.finish(ResolutionVerdict::ProceedWithCommit);
            }
        }

        decision.trace.push("Attempting to continue.".to_string());
        decision.finish(ResolutionVerdict::Continue)
    }

    /// Handles one validation pass through the host accessor
    ///
    /// Applies the decided actions, records every applied strategy and writes
    /// the decision to the trace sink. If the host rejects an action the pass
    /// is rolled back.
    pub fn resolve(&mut self, accessor: &mut dyn FailureAccessor) -> ResolutionVerdict {
        let failures = accessor.failures();
        for failure in &failures {
            self.tracker.observe(failure);
        }

        let decision = self.decide(&failures, &self.tracker);

        // A commit verdict is the last trace line; it is written once the
        // actions have been applied
        let deferred = usize::from(decision.verdict == ResolutionVerdict::ProceedWithCommit);
        let (steps, verdict_line) = decision.trace.split_at(decision.trace.len() - deferred);
        for line in steps {
            self.sink.trace(line);
        }

        for action in &decision.actions {
            let applied = match action {
                FailureAction::Resolve {
                    failure,
                    resolution,
                } => {
                    self.tracker.record(failure, *resolution);
                    accessor.resolve_failure(failure, *resolution)
                }
                FailureAction::DismissWarning { failure } => accessor.delete_warning(failure),
            };

            if let Err(e) = applied {
                self.sink.trace(&format!(
                    "Failure: Host rejected the resolution: {e}. Rolling back transaction."
                ));
                return ResolutionVerdict::ProceedWithRollback;
            }
        }

        for line in verdict_line {
            self.sink.trace(line);
        }
        decision.verdict
    }
}

impl FailuresProcessor for ResolutionEngine<'_> {
    fn process_failures(&mut self, accessor: &mut dyn FailureAccessor) -> ResolutionVerdict {
        self.resolve(accessor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::failures::tracker::ReportedHistory;
    use crate::domain::{DwgBatchError, ElementId, FailureKindId, Result, FAMILY_IS_CORRUPT};
    use crate::logging::MemorySink;

    fn kind(s: &str) -> FailureKindId {
        FailureKindId::new(s).unwrap()
    }

    fn detachable_error() -> FailureRecord {
        FailureRecord::error(kind("JoinFailed"), "Cannot keep elements joined")
            .with_elements([ElementId::new(11), ElementId::new(12)])
            .with_resolutions([ResolutionType::DetachElements])
    }

    fn warning() -> FailureRecord {
        FailureRecord::warning(kind("LinesOverlap"), "Lines overlap")
    }

    /// Accessor recording every command it receives
    #[derive(Default)]
    struct RecordingAccessor {
        failures: Vec<FailureRecord>,
        resolved: Vec<(FailureRecord, ResolutionType)>,
        dismissed: Vec<FailureRecord>,
        reject: bool,
    }

    impl FailureAccessor for RecordingAccessor {
        fn failures(&self) -> Vec<FailureRecord> {
            self.failures.clone()
        }

        fn resolve_failure(
            &mut self,
            failure: &FailureRecord,
            resolution: ResolutionType,
        ) -> Result<()> {
            if self.reject {
                return Err(DwgBatchError::Host("resolution refused".to_string()));
            }
            self.resolved.push((failure.clone(), resolution));
            Ok(())
        }

        fn delete_warning(&mut self, failure: &FailureRecord) -> Result<()> {
            self.dismissed.push(failure.clone());
            Ok(())
        }
    }

    #[test]
    fn test_ceiling_rolls_back_regardless_of_severity() {
        let sink = MemorySink::new();
        let engine = ResolutionEngine::new(&sink);
        let exhausted = warning().with_attempted([
            ResolutionType::DeleteElements,
            ResolutionType::MoveElements,
            ResolutionType::SkipElements,
        ]);

        let decision = engine.decide(&[exhausted], &ReportedHistory);
        assert_eq!(decision.verdict, ResolutionVerdict::ProceedWithRollback);
        assert!(decision.actions.is_empty());
        assert!(decision.trace[0].contains("3 times with resolution SkipElements"));
    }

    #[test]
    fn test_ceiling_trips_even_when_others_would_resolve() {
        let sink = MemorySink::new();
        let engine = ResolutionEngine::new(&sink);
        let oscillating = detachable_error().with_attempted([
            ResolutionType::DetachElements,
            ResolutionType::DeleteElements,
            ResolutionType::FixElements,
        ]);
        let clean = FailureRecord::error(kind("Other"), "other")
            .with_elements([ElementId::new(99)]);

        let decision = engine.decide(&[oscillating, clean], &ReportedHistory);
        assert_eq!(decision.verdict, ResolutionVerdict::ProceedWithRollback);
    }

    #[test]
    fn test_two_attempts_do_not_trip() {
        let sink = MemorySink::new();
        let engine = ResolutionEngine::new(&sink);
        let f = detachable_error()
            .with_attempted([ResolutionType::DetachElements, ResolutionType::DeleteElements]);

        let decision = engine.decide(&[f], &ReportedHistory);
        assert_eq!(decision.verdict, ResolutionVerdict::ProceedWithCommit);
    }

    #[test]
    fn test_single_warning_is_dismissed_and_committed() {
        let sink = MemorySink::new();
        let engine = ResolutionEngine::new(&sink);

        let decision = engine.decide(&[warning()], &ReportedHistory);
        assert_eq!(decision.verdict, ResolutionVerdict::ProceedWithCommit);
        assert_eq!(
            decision.actions,
            vec![FailureAction::DismissWarning { failure: warning() }]
        );
    }

    #[test]
    fn test_detach_is_reclassified_as_delete() {
        let sink = MemorySink::new();
        let engine = ResolutionEngine::new(&sink);
        let f = detachable_error();

        let decision = engine.decide(std::slice::from_ref(&f), &ReportedHistory);
        assert_eq!(decision.verdict, ResolutionVerdict::ProceedWithCommit);
        assert_eq!(
            decision.resolution_for(&f),
            Some(ResolutionType::DeleteElements)
        );
        assert!(decision
            .trace
            .iter()
            .any(|l| l == "Following elements will be deleted: 11,12"));
    }

    #[test]
    fn test_error_without_detach_keeps_current_resolution() {
        let sink = MemorySink::new();
        let engine = ResolutionEngine::new(&sink);
        let f = FailureRecord::error(kind("Overlap"), "overlap")
            .with_elements([ElementId::new(5)])
            .with_resolutions([ResolutionType::MoveElements]);

        let decision = engine.decide(std::slice::from_ref(&f), &ReportedHistory);
        assert_eq!(decision.resolution_for(&f), Some(ResolutionType::MoveElements));
    }

    #[test]
    fn test_corruption_is_resolved_twice() {
        let sink = MemorySink::new();
        let engine = ResolutionEngine::new(&sink);
        let f = FailureRecord::error(kind(FAMILY_IS_CORRUPT), "Family is corrupt")
            .with_elements([ElementId::new(3)])
            .with_resolutions([ResolutionType::DeleteElements]);

        let decision = engine.decide(&[f], &ReportedHistory);
        let resolves = decision
            .actions
            .iter()
            .filter(|a| matches!(a, FailureAction::Resolve { .. }))
            .count();
        assert_eq!(resolves, 2);
        assert_eq!(decision.verdict, ResolutionVerdict::ProceedWithCommit);
    }

    #[test]
    fn test_no_actionable_failures_continue() {
        let sink = MemorySink::new();
        let engine = ResolutionEngine::new(&sink);
        let terminal = FailureRecord::error(kind("Unjoinable"), "no elements");

        assert_eq!(
            engine.decide(&[], &ReportedHistory).verdict,
            ResolutionVerdict::Continue
        );
        let decision = engine.decide(&[terminal], &ReportedHistory);
        assert_eq!(decision.verdict, ResolutionVerdict::Continue);
        assert!(decision.actions.is_empty());
        assert_eq!(decision.trace.last().unwrap(), "Attempting to continue.");
    }

    #[test]
    fn test_first_actionable_failure_short_circuits() {
        let sink = MemorySink::new();
        let engine = ResolutionEngine::new(&sink);
        let terminal = FailureRecord::error(kind("Unjoinable"), "no elements");
        let second_warning = FailureRecord::warning(kind("Other"), "second");

        let decision = engine.decide(&[terminal, warning(), second_warning], &ReportedHistory);
        assert_eq!(decision.verdict, ResolutionVerdict::ProceedWithCommit);
        assert_eq!(decision.actions.len(), 1);
    }

    #[test]
    fn test_resolve_applies_and_records() {
        let sink = MemorySink::new();
        let mut engine = ResolutionEngine::new(&sink);
        let f = detachable_error();
        let mut accessor = RecordingAccessor {
            failures: vec![f.clone()],
            ..Default::default()
        };

        let verdict = engine.resolve(&mut accessor);
        assert_eq!(verdict, ResolutionVerdict::ProceedWithCommit);
        assert_eq!(
            accessor.resolved,
            vec![(f.clone(), ResolutionType::DeleteElements)]
        );
        assert_eq!(
            engine.tracker().attempts(&f),
            vec![ResolutionType::DeleteElements]
        );
        assert!(sink.contains("Verdict: ProceedWithCommit."));
    }

    #[test]
    fn test_resolve_accumulates_attempts_across_passes() {
        let sink = MemorySink::new();
        let mut engine = ResolutionEngine::new(&sink);
        let base = FailureRecord::error(kind("Overlap"), "overlap")
            .with_elements([ElementId::new(5)]);

        // The host cycles the current resolution each time the failure survives
        for current in [
            ResolutionType::MoveElements,
            ResolutionType::FixElements,
            ResolutionType::SkipElements,
        ] {
            let mut accessor = RecordingAccessor {
                failures: vec![base.clone().with_resolutions([current])],
                ..Default::default()
            };
            assert_eq!(
                engine.resolve(&mut accessor),
                ResolutionVerdict::ProceedWithCommit
            );
        }

        let mut accessor = RecordingAccessor {
            failures: vec![base.with_resolutions([ResolutionType::DeleteElements])],
            ..Default::default()
        };
        assert_eq!(
            engine.resolve(&mut accessor),
            ResolutionVerdict::ProceedWithRollback
        );
        assert!(accessor.resolved.is_empty());
        assert!(sink.contains("Rolling back transaction."));
    }

    #[test]
    fn test_resolve_rolls_back_when_host_rejects() {
        let sink = MemorySink::new();
        let mut engine = ResolutionEngine::new(&sink);
        let mut accessor = RecordingAccessor {
            failures: vec![detachable_error()],
            reject: true,
            ..Default::default()
        };

        assert_eq!(
            engine.resolve(&mut accessor),
            ResolutionVerdict::ProceedWithRollback
        );
        assert!(sink.contains("Host rejected the resolution"));
        assert!(!sink.contains("Verdict: ProceedWithCommit."));
    }

    #[test]
    fn test_engine_as_failures_processor() {
        let sink = MemorySink::new();
        let mut engine = ResolutionEngine::new(&sink);
        let processor: &mut dyn FailuresProcessor = &mut engine;
        let mut accessor = RecordingAccessor {
            failures: vec![warning()],
            ..Default::default()
        };

        assert_eq!(
            processor.process_failures(&mut accessor),
            ResolutionVerdict::ProceedWithCommit
        );
        assert_eq!(accessor.dismissed.len(), 1);
    }
}
