//! Publish mirroring engine.
//!
//! Mirrors publish and unpublish transactions committed in a configured
//! set of source repositories onto the corresponding items in a configured
//! set of target repositories. Useful where content is published to
//! multiple language or variant repositories by rule.
//!
//! # Architecture
//!
//! - **Host seams**: narrow capability traits over the content-management
//!   runtime (item lookups, repository listing, publish dispatch, the
//!   committed-transaction stream)
//! - **IdentityMapper**: re-addresses the published item into each target
//!   repository and resolves it against the host
//! - **RepositoryResolver**: matches configured identifiers against the
//!   host's repository listing
//! - **Instruction derivation**: applies configured on-only overrides to a
//!   copy of the original instruction
//! - **MirrorEngine**: the per-notification orchestrator
//!
//! # Handling one notification
//!
//! 1. **Filter**: the owning repository must be a configured source
//! 2. **Resolve**: target repositories, then counterpart items
//! 3. **Guard**: derive the mirrored instruction, check child propagation
//! 4. **Dispatch**: one low-priority publish/unpublish covering all
//!    resolved items and the original delivery targets
//!
//! A mirroring failure is logged and contained — it never fails or rolls
//! back the original transaction.
//!
//! # Example
//!
//! ```no_run
//! use pubmirror_engine::{MirrorConfig, MirrorEngine};
//! use pubmirror_engine::host::mock::{MockHost, MockPublishService};
//! use std::sync::Arc;
//!
//! let config = MirrorConfig::load("pubmirror.json").unwrap().install();
//! let host = Arc::new(MockHost::new());
//! let publisher = Arc::new(MockPublishService::new());
//! let engine = MirrorEngine::new(config, host.clone(), host, publisher);
//! ```

pub mod host;
pub mod instruction;

mod config;
mod engine;
mod error;
mod fmt;
mod identity;
mod resolver;
mod settings;

pub use config::MirrorConfig;
pub use engine::{MirrorEngine, MirrorOutcome, SkipReason};
pub use error::{MirrorError, MirrorResult};
pub use fmt::comma_list;
pub use host::{EventSubscription, ItemDirectory, PublishService, RepositoryDirectory};
pub use identity::IdentityMapper;
pub use resolver::RepositoryResolver;
pub use settings::{keys, Settings};
