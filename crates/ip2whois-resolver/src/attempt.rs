//! Per-provider attempt log of a resolution.

use ip2whois_core::{AdapterFailure, CanonicalRecord};
use std::time::Duration;

/// One provider call made while resolving a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Provider name
    pub provider: &'static str,
    /// Wall time spent on the call
    pub elapsed: Duration,
    /// Why the call failed; `None` if it produced the record
    pub failure: Option<AdapterFailure>,
}

impl Attempt {
    pub(crate) const fn succeeded(provider: &'static str, elapsed: Duration) -> Self {
        Self {
            provider,
            elapsed,
            failure: None,
        }
    }

    pub(crate) const fn failed(
        provider: &'static str,
        elapsed: Duration,
        failure: AdapterFailure,
    ) -> Self {
        Self {
            provider,
            elapsed,
            failure: Some(failure),
        }
    }

    /// Returns true if this attempt produced the record
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.failure {
            None => write!(f, "{}: ok ({}ms)", self.provider, self.elapsed.as_millis()),
            Some(failure) => write!(
                f,
                "{}: {} ({}ms)",
                self.provider,
                failure,
                self.elapsed.as_millis()
            ),
        }
    }
}

/// The record a resolution produced, plus how it got there
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Record returned to the caller
    pub record: CanonicalRecord,
    /// Provider calls in the order they were made
    pub attempts: Vec<Attempt>,
}

impl Resolution {
    /// Returns true if every provider failed and the record was built locally
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.record.is_degraded()
    }

    /// Attempts that failed
    pub fn failures(&self) -> impl Iterator<Item = &Attempt> {
        self.attempts.iter().filter(|a| !a.is_success())
    }
}
