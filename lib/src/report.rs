use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// What to do when one unit of work (a page, an image) fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Abort the whole run.
    #[default]
    FailFast,
    /// Log the failure, record it, and move on to the next unit.
    KeepGoing,
}

/// Units of work finished and failed during a run.
#[derive(Debug, Default)]
pub struct Report {
    pub completed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, Error)>,
}

impl Report {
    /// Passes `Ok` values through. On failure, returns the error under
    /// [`Policy::FailFast`] and records it under [`Policy::KeepGoing`].
    pub fn attempt<T>(&mut self, policy: Policy, unit: &Path, result: Result<T>) -> Result<Option<T>> {
        match (result, policy) {
            (Ok(value), _) => Ok(Some(value)),
            (Err(e), Policy::FailFast) => Err(e),
            (Err(e), Policy::KeepGoing) => {
                tracing::warn!("{} failed, continuing:\n{e}", unit.display());
                self.failed.push((unit.to_path_buf(), e));
                Ok(None)
            }
        }
    }

    pub fn complete<P: Into<PathBuf>>(&mut self, unit: P) {
        self.completed.push(unit.into());
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} completed, {} failed", self.completed.len(), self.failed.len())?;
        for (unit, _) in &self.failed {
            write!(f, "\n  failed: {}", unit.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_follows_policy() {
        let mut report = Report::default();
        let unit = Path::new("build/a.html");

        assert_eq!(report.attempt(Policy::FailFast, unit, Ok(1)).unwrap(), Some(1));
        assert!(report.attempt::<()>(Policy::FailFast, unit, err!("boom")).is_err());
        assert!(report.failed.is_empty());

        assert_eq!(report.attempt::<()>(Policy::KeepGoing, unit, err!("boom")).unwrap(), None);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_success());
        assert!(report.to_string().contains("failed: build/a.html"));
    }
}
