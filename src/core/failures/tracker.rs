//! Resolution attempt tracking
//!
//! Counts the distinct resolution strategies tried against each failure so
//! the engine can stop resolution that does not converge.

use crate::domain::{FailureKey, FailureRecord, ResolutionType};
use std::collections::HashMap;

/// Distinct resolution strategies tolerated per failure before rolling back
pub const MAX_RESOLUTION_ATTEMPTS: usize = 3;

/// Lookup of the resolution strategies already attempted for a failure
pub trait AttemptHistory {
    /// Distinct strategies attempted for `failure`, oldest first
    fn attempted(&self, failure: &FailureRecord) -> Vec<ResolutionType>;
}

/// History exactly as reported by the host on each record
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportedHistory;

impl AttemptHistory for ReportedHistory {
    fn attempted(&self, failure: &FailureRecord) -> Vec<ResolutionType> {
        let mut distinct = Vec::new();
        append_distinct(&mut distinct, &failure.attempted);
        distinct
    }
}

/// Attempt history accumulated across the passes of one transaction group
///
/// Entries are only ever appended, so re-evaluating a failure never loses an
/// attempt that was seen earlier in the group.
#[derive(Debug, Clone)]
pub struct AttemptTracker {
    ceiling: usize,
    history: HashMap<FailureKey, Vec<ResolutionType>>,
}

impl AttemptTracker {
    /// Creates a tracker with the default ceiling
    pub fn new() -> Self {
        Self::with_ceiling(MAX_RESOLUTION_ATTEMPTS)
    }

    /// Creates a tracker with a custom ceiling
    pub fn with_ceiling(ceiling: usize) -> Self {
        Self {
            ceiling,
            history: HashMap::new(),
        }
    }

    /// Ceiling of distinct attempts
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Merges the host-reported attempts of `failure` into the tracker
    pub fn observe(&mut self, failure: &FailureRecord) {
        let entry = self.history.entry(failure.key()).or_default();
        append_distinct(entry, &failure.attempted);
    }

    /// Records that `resolution` was applied to `failure`
    pub fn record(&mut self, failure: &FailureRecord, resolution: ResolutionType) {
        let entry = self.history.entry(failure.key()).or_default();
        append_distinct(entry, &[resolution]);
    }

    /// Known attempts for `failure`, including those reported on the record
    pub fn attempts(&self, failure: &FailureRecord) -> Vec<ResolutionType> {
        let mut attempts = self
            .history
            .get(&failure.key())
            .cloned()
            .unwrap_or_default();
        append_distinct(&mut attempts, &failure.attempted);
        attempts
    }

    /// Number of distinct strategies attempted for `failure`
    pub fn distinct_attempts(&self, failure: &FailureRecord) -> usize {
        self.attempts(failure).len()
    }

    /// Most recent attempt for `failure`
    pub fn last_attempt(&self, failure: &FailureRecord) -> Option<ResolutionType> {
        self.attempts(failure).last().copied()
    }

    /// Returns true when the ceiling is reached for `failure`
    pub fn is_exhausted(&self, failure: &FailureRecord) -> bool {
        self.distinct_attempts(failure) >= self.ceiling
    }

    /// Number of failures with at least one recorded attempt
    pub fn tracked_failures(&self) -> usize {
        self.history.values().filter(|v| !v.is_empty()).count()
    }
}

impl Default for AttemptTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptHistory for AttemptTracker {
    fn attempted(&self, failure: &FailureRecord) -> Vec<ResolutionType> {
        self.attempts(failure)
    }
}

fn append_distinct(target: &mut Vec<ResolutionType>, items: &[ResolutionType]) {
    for item in items {
        if !target.contains(item) {
            target.push(*item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ElementId, FailureKindId};

    fn failure() -> FailureRecord {
        FailureRecord::error(FailureKindId::new("JoinFailed").unwrap(), "join")
            .with_elements([ElementId::new(1), ElementId::new(2)])
    }

    #[test]
    fn test_record_counts_distinct() {
        let mut tracker = AttemptTracker::new();
        let f = failure();

        tracker.record(&f, ResolutionType::DeleteElements);
        tracker.record(&f, ResolutionType::DeleteElements);
        assert_eq!(tracker.distinct_attempts(&f), 1);

        tracker.record(&f, ResolutionType::MoveElements);
        assert_eq!(tracker.distinct_attempts(&f), 2);
        assert!(!tracker.is_exhausted(&f));

        tracker.record(&f, ResolutionType::SkipElements);
        assert!(tracker.is_exhausted(&f));
        assert_eq!(tracker.last_attempt(&f), Some(ResolutionType::SkipElements));
    }

    #[test]
    fn test_observe_never_loses_entries() {
        let mut tracker = AttemptTracker::new();
        tracker.observe(&failure().with_attempted([
            ResolutionType::DetachElements,
            ResolutionType::DeleteElements,
        ]));

        // A later pass reports a shorter history; earlier entries are kept
        let later = failure().with_attempted([ResolutionType::MoveElements]);
        tracker.observe(&later);

        assert_eq!(
            tracker.attempts(&later),
            vec![
                ResolutionType::DetachElements,
                ResolutionType::DeleteElements,
                ResolutionType::MoveElements,
            ]
        );
    }

    #[test]
    fn test_attempts_include_unobserved_record_history() {
        let tracker = AttemptTracker::new();
        let f = failure().with_attempted([ResolutionType::FixElements]);
        assert_eq!(tracker.attempts(&f), vec![ResolutionType::FixElements]);
        assert_eq!(tracker.tracked_failures(), 0);
    }

    #[test]
    fn test_keys_separate_failures() {
        let mut tracker = AttemptTracker::new();
        let a = failure();
        let b = FailureRecord::error(FailureKindId::new("JoinFailed").unwrap(), "join")
            .with_elements([ElementId::new(3)]);

        tracker.record(&a, ResolutionType::DeleteElements);
        assert_eq!(tracker.distinct_attempts(&b), 0);
    }

    #[test]
    fn test_reported_history_dedups() {
        let f = failure().with_attempted([
            ResolutionType::DeleteElements,
            ResolutionType::DeleteElements,
        ]);
        assert_eq!(ReportedHistory.attempted(&f).len(), 1);
    }

    #[test]
    fn test_custom_ceiling() {
        let mut tracker = AttemptTracker::with_ceiling(1);
        let f = failure();
        assert!(!tracker.is_exhausted(&f));
        tracker.record(&f, ResolutionType::DeleteElements);
        assert!(tracker.is_exhausted(&f));
        assert_eq!(tracker.ceiling(), 1);
    }
}
