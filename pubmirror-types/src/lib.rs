//! Core type definitions for the publish mirror.
//!
//! This crate defines the fundamental, host-agnostic types shared by the
//! mirroring engine and any host binding:
//! - Repository, item and delivery-target identifiers
//! - The composite item address (`ItemUri`) whose repository component can
//!   be substituted to re-address an item into a sibling repository
//! - Publish/unpublish transactions as observed at commit time, including
//!   their resolve instructions
//!
//! Anything that talks to a concrete content-management runtime (lookups,
//! directory listings, the publish dispatch itself) belongs in the engine
//! crate, not here.

mod ids;
mod item;
mod transaction;

pub use ids::{ItemId, ItemKind, ItemUri, RepositoryId, TargetId};
pub use item::{Item, Repository};
pub use transaction::{
    DeliveryTarget, Initiator, MirrorInstruction, PublishInstruction, PublishPriority,
    TargetType, Transaction, TransactionKind, UnpublishInstruction,
};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid item uri: {0}")]
    InvalidUri(String),

    #[error("unknown item kind code: {0}")]
    UnknownKind(u16),
}
