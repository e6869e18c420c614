//! Identifier types used throughout the publish mirror.
//!
//! A content item's full address is the triple (repository, item, kind).
//! The same (item, kind) pair is reused verbatim across sibling
//! repositories to denote "the corresponding item" — re-addressing an item
//! into another repository is a matter of swapping the repository
//! component. That assumption is what makes mirroring resolvable at all,
//! and it is the most fragile invariant in the system.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a repository (publication).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryId(u32);

impl RepositoryId {
    /// Creates a repository ID from a raw numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RepositoryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Repository-independent part of an item's identity. The same item ID
/// denotes the corresponding item in every sibling repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates an item ID from a raw numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a delivery target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(u32);

impl TargetId {
    /// Creates a target ID from a raw numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminator for the kind of content item being addressed.
///
/// The numeric codes appear in the textual URI form and must stay stable;
/// they are part of the item's identity across repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A reusable content component.
    Component,
    /// A renderable page.
    Page,
    /// A structural container of pages.
    StructureGroup,
    /// A classification category.
    Category,
    /// A keyword within a category.
    Keyword,
}

impl ItemKind {
    /// Returns the numeric code used in the textual URI form.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            ItemKind::StructureGroup => 4,
            ItemKind::Component => 16,
            ItemKind::Page => 64,
            ItemKind::Category => 512,
            ItemKind::Keyword => 1024,
        }
    }

    /// Looks up a kind by its numeric code.
    pub fn from_code(code: u16) -> crate::Result<Self> {
        match code {
            4 => Ok(ItemKind::StructureGroup),
            16 => Ok(ItemKind::Component),
            64 => Ok(ItemKind::Page),
            512 => Ok(ItemKind::Category),
            1024 => Ok(ItemKind::Keyword),
            other => Err(Error::UnknownKind(other)),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Component => "component",
            ItemKind::Page => "page",
            ItemKind::StructureGroup => "structure-group",
            ItemKind::Category => "category",
            ItemKind::Keyword => "keyword",
        };
        write!(f, "{name}")
    }
}

/// Full address of a content item: repository, item, kind.
///
/// Textual form is `cm:<repository>-<item>-<kind code>`; the kind code is
/// omitted for components, which are the default kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemUri {
    /// The repository the address points into.
    pub repository: RepositoryId,
    /// The repository-independent item identifier.
    pub item: ItemId,
    /// The item kind discriminator.
    pub kind: ItemKind,
}

impl ItemUri {
    /// Creates an item URI from its components.
    #[must_use]
    pub const fn new(repository: RepositoryId, item: ItemId, kind: ItemKind) -> Self {
        Self { repository, item, kind }
    }

    /// Re-addresses this item into another repository, keeping the item ID
    /// and kind. The result is a candidate address only — whether an object
    /// actually exists there is for the host to answer.
    #[must_use]
    pub const fn in_repository(&self, repository: RepositoryId) -> Self {
        Self {
            repository,
            item: self.item,
            kind: self.kind,
        }
    }
}

impl fmt::Display for ItemUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == ItemKind::Component {
            write!(f, "cm:{}-{}", self.repository, self.item)
        } else {
            write!(f, "cm:{}-{}-{}", self.repository, self.item, self.kind.code())
        }
    }
}

impl FromStr for ItemUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("cm:")
            .ok_or_else(|| Error::InvalidUri(s.to_string()))?;

        let mut parts = body.split('-');
        let repository = parts
            .next()
            .and_then(|p| p.parse().ok())
            .map(RepositoryId::new)
            .ok_or_else(|| Error::InvalidUri(s.to_string()))?;
        let item = parts
            .next()
            .and_then(|p| p.parse().ok())
            .map(ItemId::new)
            .ok_or_else(|| Error::InvalidUri(s.to_string()))?;
        let kind = match parts.next() {
            Some(code) => {
                let code: u16 = code.parse().map_err(|_| Error::InvalidUri(s.to_string()))?;
                ItemKind::from_code(code)?
            }
            None => ItemKind::Component,
        };

        if parts.next().is_some() {
            return Err(Error::InvalidUri(s.to_string()));
        }

        Ok(Self { repository, item, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_display_component_omits_kind() {
        let uri = ItemUri::new(RepositoryId::new(5), ItemId::new(100), ItemKind::Component);
        assert_eq!(uri.to_string(), "cm:5-100");
    }

    #[test]
    fn uri_display_page_includes_kind() {
        let uri = ItemUri::new(RepositoryId::new(5), ItemId::new(100), ItemKind::Page);
        assert_eq!(uri.to_string(), "cm:5-100-64");
    }

    #[test]
    fn uri_roundtrip() {
        for kind in [
            ItemKind::Component,
            ItemKind::Page,
            ItemKind::StructureGroup,
            ItemKind::Category,
            ItemKind::Keyword,
        ] {
            let uri = ItemUri::new(RepositoryId::new(7), ItemId::new(42), kind);
            let parsed: ItemUri = uri.to_string().parse().unwrap();
            assert_eq!(parsed, uri);
        }
    }

    #[test]
    fn uri_parse_rejects_garbage() {
        assert!("".parse::<ItemUri>().is_err());
        assert!("cm:".parse::<ItemUri>().is_err());
        assert!("cm:5".parse::<ItemUri>().is_err());
        assert!("cm:5-100-7".parse::<ItemUri>().is_err());
        assert!("cm:5-100-64-1".parse::<ItemUri>().is_err());
        assert!("tcm:5-100".parse::<ItemUri>().is_err());
    }

    #[test]
    fn in_repository_swaps_only_the_repository() {
        let uri = ItemUri::new(RepositoryId::new(5), ItemId::new(100), ItemKind::Page);
        let moved = uri.in_repository(RepositoryId::new(9));
        assert_eq!(moved.repository, RepositoryId::new(9));
        assert_eq!(moved.item, uri.item);
        assert_eq!(moved.kind, uri.kind);
    }
}
