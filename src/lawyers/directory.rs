//! Directory abstraction and the fixed fallback directory.

use std::future::Future;
use std::pin::Pin;

use crate::lawyers::error::DirectoryResult;
use crate::lawyers::{Lawyer, LawyerQuery};

/// Boxed future type for directory operations.
pub type DirectoryFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A source of lawyers that can be searched by specialization and location.
pub trait LawyerDirectory: Send + Sync {
    /// Find lawyers matching the query.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be reached or answers badly.
    fn find<'a>(&'a self, query: &'a LawyerQuery) -> DirectoryFuture<'a, DirectoryResult<Vec<Lawyer>>>;
}

/// In-memory directory used when the remote one cannot answer.
#[derive(Clone, Debug)]
pub struct FallbackDirectory {
    entries: Vec<Lawyer>,
}

impl Default for FallbackDirectory {
    fn default() -> Self {
        Self::new(vec![
            Lawyer::new("Aditi Sharma", "harassment", "pune", "(555) 111-2222", "aditi.sharma@lawhelp.com"),
            Lawyer::new("Rahul Mehra", "domestic_violence", "mumbai", "(555) 333-4444", "rahul.mehra@legalfirm.com"),
            Lawyer::new("Priya Verma", "workplace_discrimination", "pune", "(555) 555-6666", "priya.verma@lawyer.com"),
            Lawyer::new("Sanjay Singh", "sexual_assault", "delhi", "(555) 777-8888", "sanjay.singh@justice.com"),
            Lawyer::new("Nisha Patel", "family_law", "pune", "(555) 999-0000", "nisha.patel@familylaw.com"),
            Lawyer::new("Arjun Rao", "restraining_orders", "mumbai", "(555) 222-3333", "arjun.rao@protection.com"),
            Lawyer::new("Rohit Deshmukh", "workplace_discrimination", "mumbai", "(555) 123-4567", "rohit.deshmukh@lawhelp.com"),
        ])
    }
}

impl FallbackDirectory {
    /// Build a fallback directory over the given entries.
    #[must_use]
    pub const fn new(entries: Vec<Lawyer>) -> Self {
        Self { entries }
    }

    /// Entries matching both specialization and location.
    #[must_use]
    pub fn exact(&self, query: &LawyerQuery) -> Vec<Lawyer> {
        self.filter(|lawyer| {
            specialization_matches(lawyer, query) && location_matches(lawyer, query)
        })
    }

    /// Entries matching either specialization or location.
    #[must_use]
    pub fn relaxed(&self, query: &LawyerQuery) -> Vec<Lawyer> {
        self.filter(|lawyer| {
            specialization_matches(lawyer, query) || location_matches(lawyer, query)
        })
    }

    fn filter(&self, predicate: impl Fn(&Lawyer) -> bool) -> Vec<Lawyer> {
        self.entries
            .iter()
            .filter(|lawyer| predicate(lawyer))
            .cloned()
            .collect()
    }
}

// Specialization is a form key, compared as-is; locations are typed free-form.
fn specialization_matches(lawyer: &Lawyer, query: &LawyerQuery) -> bool {
    lawyer.specialization == query.specialization
}

fn location_matches(lawyer: &Lawyer, query: &LawyerQuery) -> bool {
    lawyer.location.eq_ignore_ascii_case(&query.location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(lawyers: &[Lawyer]) -> Vec<&str> {
        lawyers.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn test_exact_match() {
        let directory = FallbackDirectory::default();
        let found = directory.exact(&LawyerQuery::new("harassment", "Pune"));
        assert_eq!(names(&found), vec!["Aditi Sharma"]);
    }

    #[test]
    fn test_relaxed_match_by_location() {
        let directory = FallbackDirectory::default();
        let query = LawyerQuery::new("unknown_spec", "pune");
        assert!(directory.exact(&query).is_empty());
        assert_eq!(
            names(&directory.relaxed(&query)),
            vec!["Aditi Sharma", "Priya Verma", "Nisha Patel"]
        );
    }

    #[test]
    fn test_relaxed_match_by_specialization() {
        let directory = FallbackDirectory::default();
        let query = LawyerQuery::new("workplace_discrimination", "chennai");
        assert_eq!(
            names(&directory.relaxed(&query)),
            vec!["Priya Verma", "Rohit Deshmukh"]
        );
    }

    #[test]
    fn test_specialization_is_case_sensitive() {
        let directory = FallbackDirectory::default();
        assert!(directory.exact(&LawyerQuery::new("Harassment", "pune")).is_empty());
    }
}
