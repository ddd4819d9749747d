//! Degrade-gracefully lawyer lookup.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::lawyers::directory::{FallbackDirectory, LawyerDirectory};
use crate::lawyers::{Lawyer, LawyerQuery};

/// Default bound on a remote lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the lawyers of an outcome came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupSource {
    /// The remote directory returned results.
    Remote,
    /// Fallback entries matching both specialization and location.
    FallbackExact,
    /// Fallback entries matching specialization or location.
    FallbackRelaxed,
    /// Nothing matched anywhere.
    NotFound,
}

/// Resolved lookup; always has a reply, never an error.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LookupOutcome {
    /// Which stage produced `lawyers`.
    pub source: LookupSource,
    /// Lawyers to present, possibly empty.
    pub lawyers: Vec<Lawyer>,
}

impl LookupOutcome {
    /// Outcome with no lawyers.
    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            source: LookupSource::NotFound,
            lawyers: Vec::new(),
        }
    }

    /// Format the assistant reply for this outcome.
    #[must_use]
    pub fn reply(&self, query: &LawyerQuery) -> String {
        if self.lawyers.is_empty() {
            return format!(
                "Sorry, I couldn't find any lawyers in {} who specialize in {}.",
                query.location, query.specialization
            );
        }

        let entries: Vec<String> = self
            .lawyers
            .iter()
            .enumerate()
            .map(|(idx, lawyer)| {
                format!(
                    "{}. {}\n   Phone: {}\n   Email: {}\n   Specializes in: {}\n",
                    idx + 1,
                    lawyer.name,
                    lawyer.phone,
                    lawyer.email,
                    lawyer.specialization
                )
            })
            .collect();

        let mut reply = format!(
            "I've found the following lawyers in {} who specialize in {}:\n\n",
            query.location, query.specialization
        );
        reply.push_str(&entries.join("\n"));
        reply.push_str(
            "\nWould you like me to help you prepare for your consultation with any of these lawyers?",
        );
        reply
    }
}

/// Remote-first lawyer lookup with a fixed fallback directory.
#[derive(Clone)]
pub struct LawyerLookup {
    remote: Option<Arc<dyn LawyerDirectory>>,
    fallback: FallbackDirectory,
    timeout: Duration,
}

impl Default for LawyerLookup {
    fn default() -> Self {
        Self::fallback_only()
    }
}

impl LawyerLookup {
    /// Lookup that tries `remote` first.
    #[must_use]
    pub fn new(remote: Arc<dyn LawyerDirectory>) -> Self {
        Self {
            remote: Some(remote),
            fallback: FallbackDirectory::default(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Lookup with no remote directory configured.
    #[must_use]
    pub fn fallback_only() -> Self {
        Self {
            remote: None,
            fallback: FallbackDirectory::default(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Set the remote lookup timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve a query. Remote failures, timeouts and empty answers fall back
    /// to the in-memory directory, exact match first, then relaxed.
    pub async fn resolve(&self, query: &LawyerQuery) -> LookupOutcome {
        if let Some(remote) = &self.remote {
            match tokio::time::timeout(self.timeout, remote.find(query)).await {
                Ok(Ok(lawyers)) if !lawyers.is_empty() => {
                    debug!(count = lawyers.len(), "remote directory answered");
                    return LookupOutcome {
                        source: LookupSource::Remote,
                        lawyers,
                    };
                }
                Ok(Ok(_)) => debug!("remote directory returned no lawyers"),
                Ok(Err(e)) => warn!("lawyer directory lookup failed: {e}"),
                Err(_) => warn!(timeout = ?self.timeout, "lawyer directory lookup timed out"),
            }
        }

        self.resolve_fallback(query)
    }

    fn resolve_fallback(&self, query: &LawyerQuery) -> LookupOutcome {
        let exact = self.fallback.exact(query);
        if !exact.is_empty() {
            return LookupOutcome {
                source: LookupSource::FallbackExact,
                lawyers: exact,
            };
        }

        let relaxed = self.fallback.relaxed(query);
        if !relaxed.is_empty() {
            return LookupOutcome {
                source: LookupSource::FallbackRelaxed,
                lawyers: relaxed,
            };
        }

        LookupOutcome::not_found()
    }
}
