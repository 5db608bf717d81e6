//! Forwarding stubs.
//!
//! A stub is a synthesized member owned by the implementing type. It has the
//! interface member's exact signature, annotations included, and a body that
//! forwards its parameters 1:1 to `target` and returns the result unchanged.
//! Stubs never enter the type's member list, so name lookup and later
//! matching never see them.

use crate::implementation_map::InterfaceSlot;
use iface_solver::{MemberId, Program, Signature, TypeFormatter, TypeId};
use tracing::debug;

/// Why a stub had to be synthesized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StubReason {
    /// The winner matches the slot only once annotations are ignored.
    AnnotationMismatch,
    /// The winner is a non-virtual or static member of a base class and the
    /// implementing type re-declares the interface.
    Locality,
}

impl StubReason {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::AnnotationMismatch => "annotation mismatch",
            Self::Locality => "inherited implementation",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardingStub {
    /// The implementing type that owns the stub.
    pub owner: TypeId,
    pub slot: InterfaceSlot,
    /// The member the stub forwards to.
    pub target: MemberId,
    /// The level of the owner's base chain `target` was found on.
    pub target_declared_in: TypeId,
    /// The slot's signature through the instantiated interface, annotations
    /// preserved.
    pub signature: Signature,
    /// Qualified metadata name, `I<int>.M`.
    pub name: String,
    pub reason: StubReason,
}

/// Build the stub forwarding `slot` to `target` for `owner`.
pub fn synthesize_stub(
    program: &Program,
    owner: TypeId,
    slot: InterfaceSlot,
    target: MemberId,
    target_declared_in: TypeId,
    reason: StubReason,
) -> ForwardingStub {
    let signature = program.slot_signature(slot.interface, slot.member, slot.member);
    let name = format!(
        "{}.{}",
        TypeFormatter::new(program).format(slot.interface),
        program.member(slot.member).name
    );
    debug!(
        owner = owner.0,
        slot = slot.member.0,
        target = target.0,
        reason = reason.describe(),
        "synthesize_stub"
    );
    ForwardingStub {
        owner,
        slot,
        target,
        target_declared_in,
        signature,
        name,
        reason,
    }
}
