//! Lawyer lookup for the "connect with a lawyer" feature.
//!
//! A remote directory is queried first; when it is missing, slow, failing or
//! empty, the fixed in-memory directory answers instead, so a lookup always
//! resolves to an assistant reply.

pub mod client;
pub mod directory;
pub mod error;
pub mod lookup;

pub use client::RemoteDirectory;
pub use directory::{DirectoryFuture, FallbackDirectory, LawyerDirectory};
pub use error::{DirectoryError, DirectoryResult};
pub use lookup::{LawyerLookup, LookupOutcome, LookupSource};

use serde::{Deserialize, Serialize};

/// A lawyer listed by a directory.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Lawyer {
    /// Full name.
    pub name: String,
    /// Area of practice, e.g. `harassment`.
    pub specialization: String,
    /// City.
    pub location: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
}

impl Lawyer {
    /// Build a directory entry.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        specialization: impl Into<String>,
        location: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            specialization: specialization.into(),
            location: location.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }
}

/// What the user asked the lawyer-connect form for.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LawyerQuery {
    /// Requested specialization.
    pub specialization: String,
    /// Requested location.
    pub location: String,
}

impl LawyerQuery {
    /// Create a query.
    #[must_use]
    pub fn new(specialization: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            specialization: specialization.into(),
            location: location.into(),
        }
    }
}
