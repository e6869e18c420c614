//! Instruction derivation for mirrored dispatches.
//!
//! The mirrored call never reuses the original instruction as-is: override
//! flags from the configuration are applied on top of a copy. Overrides
//! only ever turn a flag on, never off, so derivation is idempotent. The
//! version inclusion flags exist on publish instructions only; an
//! unpublish derives nothing beyond child propagation.

use crate::config::MirrorConfig;
use pubmirror_types::MirrorInstruction;

/// Derives the instruction to use for the mirrored call.
#[must_use]
pub fn derive(original: &MirrorInstruction, config: &MirrorConfig) -> MirrorInstruction {
    match original {
        MirrorInstruction::Publish(publish) => {
            let mut derived = *publish;
            if config.force_include_children {
                derived.include_child_repositories = true;
            }
            if config.force_include_minor_version {
                derived.include_dynamic_version = true;
            }
            if config.force_include_workflow_version {
                derived.include_workflow_version = true;
            }
            MirrorInstruction::Publish(derived)
        }
        MirrorInstruction::Unpublish(unpublish) => {
            let mut derived = *unpublish;
            if config.force_include_children {
                derived.include_child_repositories = true;
            }
            MirrorInstruction::Unpublish(derived)
        }
    }
}

/// The child-propagation guard, evaluated on the *derived* instruction:
/// when the configuration requires child propagation and the derived
/// instruction does not have it, mirroring is aborted for the transaction.
#[must_use]
pub fn propagation_guard_trips(derived: &MirrorInstruction, config: &MirrorConfig) -> bool {
    config.only_mirror_if_child_propagation && !derived.include_child_repositories()
}
