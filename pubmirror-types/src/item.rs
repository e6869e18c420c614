//! Items and the repositories that own them.

use crate::{ItemUri, RepositoryId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named container of content items. Repositories form a flat
/// addressable space; the mirror models no hierarchy between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// The repository's identifier.
    pub id: RepositoryId,
    /// The repository's display title.
    pub title: String,
}

impl Repository {
    /// Creates a repository handle.
    #[must_use]
    pub fn new(id: RepositoryId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Whether a configured identifier denotes this repository.
    ///
    /// Identifiers match by exact equality against either the title or the
    /// id string. A title that collides with another repository's id string
    /// is ambiguous; both repositories will match.
    #[must_use]
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        identifier == self.title || identifier == self.id.to_string()
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}

/// An addressable content object (page, component, category, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The item's full address, including its owning repository.
    pub uri: ItemUri,
    /// The item's display title.
    pub title: String,
}

impl Item {
    /// Creates an item handle.
    #[must_use]
    pub fn new(uri: ItemUri, title: impl Into<String>) -> Self {
        Self {
            uri,
            title: title.into(),
        }
    }

    /// The repository this item lives in.
    #[must_use]
    pub fn repository(&self) -> RepositoryId {
        self.uri.repository
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.uri)
    }
}
