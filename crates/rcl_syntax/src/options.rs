//! Parse configuration: error policy and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// What the parser does after the first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first diagnostic and return no tree.
    #[default]
    FailFast,
    /// Record the diagnostic, skip to the next newline or block end, and keep going.
    Batch,
}

/// Shared flag a caller can set from another thread to abort a running parse.
///
/// The parser checks it between tokens. A cancelled parse returns no tree.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Options for a single parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub error_policy: ErrorPolicy,
    pub cancellation: Option<CancellationToken>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for batch recovery.
    pub fn batch() -> Self {
        Self::default().with_error_policy(ErrorPolicy::Batch)
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_fail_fast() {
        assert_eq!(ParseOptions::default().error_policy, ErrorPolicy::FailFast);
        assert_eq!(ParseOptions::batch().error_policy, ErrorPolicy::Batch);
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let token = CancellationToken::new();
        let options = ParseOptions::new().with_cancellation(token.clone());
        assert!(!options.is_cancelled());
        token.cancel();
        assert!(options.is_cancelled());
    }
}
