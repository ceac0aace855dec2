//! Transaction scopes
//!
//! An export job runs inside one outer transaction group. Every document
//! mutation made to enable export happens in its own nested transaction that
//! is committed immediately, so the following export call sees it. The group
//! is always rolled back at the end, which undoes all nested commits together.
//! Files written by the codec are outside this boundary.

use crate::adapters::host::{CommitStatus, FailuresProcessor, HostDocument};
use crate::domain::{DwgBatchError, Result};

/// Runs `mutation` in a nested transaction and commits it
///
/// Validation failures raised on commit are handed to `processor`.
///
/// # Errors
///
/// Returns the mutation's error (after rolling the transaction back), or a
/// validation error if failure processing rolled the transaction back.
pub fn commit_in_transaction<D, T, F>(
    document: &mut D,
    processor: &mut dyn FailuresProcessor,
    name: &str,
    mutation: F,
) -> Result<T>
where
    D: HostDocument + ?Sized,
    F: FnOnce(&mut D) -> Result<T>,
{
    document.start_transaction(name)?;

    let value = match mutation(document) {
        Ok(value) => value,
        Err(e) => {
            if let Err(rollback_err) = document.rollback_transaction() {
                tracing::warn!(
                    transaction = name,
                    error = %rollback_err,
                    "Failed to roll back transaction after mutation error"
                );
            }
            return Err(e);
        }
    };

    match document.commit_transaction(processor)? {
        CommitStatus::Committed => Ok(value),
        CommitStatus::RolledBack => Err(DwgBatchError::Validation(format!(
            "Transaction `{name}` was rolled back while resolving failures"
        ))),
    }
}

/// Outer transaction group of an export job
///
/// Dropping an open group rolls it back.
pub struct TransactionGroup<'d, D: HostDocument + ?Sized> {
    document: &'d mut D,
    name: String,
    committed: Vec<String>,
    open: bool,
}

impl<'d, D: HostDocument + ?Sized> TransactionGroup<'d, D> {
    /// Starts the group on `document`
    ///
    /// # Errors
    ///
    /// Returns the host error if the group cannot be started.
    pub fn start(document: &'d mut D, name: &str) -> Result<Self> {
        document.start_group(name)?;
        Ok(Self {
            document,
            name: name.to_string(),
            committed: Vec::new(),
            open: true,
        })
    }

    /// Read access to the document
    pub fn document(&self) -> &D {
        self.document
    }

    /// Commits a nested transaction inside the group
    ///
    /// # Errors
    ///
    /// See [`commit_in_transaction`].
    pub fn commit<T, F>(
        &mut self,
        processor: &mut dyn FailuresProcessor,
        name: &str,
        mutation: F,
    ) -> Result<T>
    where
        F: FnOnce(&mut D) -> Result<T>,
    {
        let value = commit_in_transaction(self.document, processor, name, mutation)?;
        self.committed.push(name.to_string());
        Ok(value)
    }

    /// Names of the nested transactions committed so far
    pub fn committed(&self) -> &[String] {
        &self.committed
    }

    /// Rolls back the group, undoing every nested commit
    ///
    /// Returns the names of the transactions that were undone.
    ///
    /// # Errors
    ///
    /// Returns the host error if the rollback is refused.
    pub fn rollback(mut self) -> Result<Vec<String>> {
        self.open = false;
        self.document.rollback_group()?;
        Ok(std::mem::take(&mut self.committed))
    }
}

impl<D: HostDocument + ?Sized> Drop for TransactionGroup<'_, D> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.document.rollback_group() {
                tracing::error!(group = %self.name, error = %e, "Failed to roll back transaction group");
            }
        }
    }
}
