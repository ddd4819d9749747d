//! Complaint records and per-user complaint history.
//!
//! Records are kept newest first by their ISO `date`. Ids are not
//! deduplicated: adding the same record twice keeps both copies.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::identity::UserId;

/// A complaint filed or drafted by a user.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    /// Record identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Display-only status, e.g. `In Progress`.
    pub status: String,
    /// ISO date or date-time string.
    pub date: String,
}

impl ComplaintRecord {
    /// Build a record with a fresh id.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            status: status.into(),
            date: date.into(),
        }
    }

    /// Parsed `date`, as a naive timestamp. `None` if it is not ISO.
    #[must_use]
    pub fn sort_key(&self) -> Option<NaiveDateTime> {
        parse_iso(&self.date)
    }
}

fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Complaints of one user, newest first.
#[derive(Clone, Debug, Default)]
pub struct ComplaintStore {
    records: Vec<ComplaintRecord>,
}

impl ComplaintStore {
    /// Empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Insert a record and restore descending date order.
    ///
    /// The new record goes in front before the stable sort, so it precedes
    /// older entries that share its date. Unparseable dates sort last.
    pub fn add(&mut self, record: ComplaintRecord) {
        self.records.insert(0, record);
        self.records
            .sort_by_key(|record| record.sort_key().map_or((1, None), |key| (0, Some(Reverse(key)))));
    }

    /// Records, newest first.
    #[must_use]
    pub fn records(&self) -> &[ComplaintRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Complaint history of every user, keyed by the identity backend's user id.
#[derive(Debug, Default)]
pub struct ComplaintHistory {
    by_user: DashMap<UserId, ComplaintStore>,
}

impl ComplaintHistory {
    /// Empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// History preloaded with two demonstration users.
    #[must_use]
    pub fn with_demo_records() -> Self {
        let history = Self::new();
        history.add(
            &UserId::new("user123"),
            ComplaintRecord {
                id: "complaint1".to_string(),
                title: "Harassment at Workplace".to_string(),
                description: "Filed a complaint about workplace harassment.".to_string(),
                status: "In Progress".to_string(),
                date: "2025-04-17".to_string(),
            },
        );
        history.add(
            &UserId::new("user456"),
            ComplaintRecord {
                id: "complaint2".to_string(),
                title: "Stalking Incident".to_string(),
                description: "Reported a stalking incident.".to_string(),
                status: "Resolved".to_string(),
                date: "2025-04-10".to_string(),
            },
        );
        history
    }

    /// Attribute a record to `user`.
    pub fn add(&self, user: &UserId, record: ComplaintRecord) {
        debug!(user = %user, id = %record.id, "recording complaint");
        self.by_user.entry(user.clone()).or_default().add(record);
    }

    /// Snapshot of a user's complaints, newest first. Unknown users have none.
    #[must_use]
    pub fn for_user(&self, user: &UserId) -> Vec<ComplaintRecord> {
        self.by_user
            .get(user)
            .map(|store| store.records().to_vec())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(date: &str) -> ComplaintRecord {
        ComplaintRecord::new("t", "d", "Open", date)
    }

    fn dates(store: &ComplaintStore) -> Vec<&str> {
        store.records().iter().map(|r| r.date.as_str()).collect()
    }

    #[test]
    fn test_sorted_descending_after_each_insert() {
        let mut store = ComplaintStore::new();
        store.add(dated("2025-01-01"));
        store.add(dated("2025-06-01"));
        store.add(dated("2025-03-01"));
        assert_eq!(dates(&store), vec!["2025-06-01", "2025-03-01", "2025-01-01"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut store = ComplaintStore::new();
        let record = dated("2025-02-02");
        store.add(record.clone());
        store.add(record);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_newest_insert_leads_ties() {
        let mut store = ComplaintStore::new();
        let first = dated("2025-02-02");
        let second = dated("2025-02-02");
        let second_id = second.id.clone();
        store.add(first);
        store.add(second);
        assert_eq!(store.records()[0].id, second_id);
    }

    #[test]
    fn test_mixed_formats_and_invalid_dates() {
        let mut store = ComplaintStore::new();
        store.add(dated("not a date"));
        store.add(dated("2025-03-01T10:00:00Z"));
        store.add(dated("2025-03-01"));
        assert_eq!(
            dates(&store),
            vec!["2025-03-01T10:00:00Z", "2025-03-01", "not a date"]
        );
    }

    #[test]
    fn test_history_per_user() {
        let history = ComplaintHistory::with_demo_records();
        let known = history.for_user(&UserId::new("user123"));
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].title, "Harassment at Workplace");
        assert!(history.for_user(&UserId::new("nobody")).is_empty());

        history.add(&UserId::new("user123"), dated("2025-05-01"));
        let updated = history.for_user(&UserId::new("user123"));
        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].date, "2025-05-01");
    }
}
