//! Implementation maps.
//!
//! An `ImplementationMap` records, for one implementing type, what every
//! interface slot of every interface it implements resolves to. Maps are
//! built once in full by the matching engine and never mutated afterwards.

use crate::stubs::ForwardingStub;
use iface_solver::{DiagnosticArg, MemberId, PendingDiagnostic, TypeId, codes};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;

/// An interface member viewed through one instantiation of its interface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceSlot {
    pub interface: TypeId,
    pub member: MemberId,
}

impl InterfaceSlot {
    pub const fn new(interface: TypeId, member: MemberId) -> Self {
        Self { interface, member }
    }

    pub fn to_arg(self) -> DiagnosticArg {
        DiagnosticArg::Slot {
            interface: self.interface,
            member: self.member,
        }
    }
}

/// How the implementation was found.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImplementationVia {
    /// An explicit implementation somewhere in the base chain.
    Explicit,
    /// A public member matched by name and signature.
    Implicit,
    /// A default interface implementation.
    Default,
    /// Taken from the base type's map; the type does not re-declare the
    /// interface.
    Inherited,
}

impl ImplementationVia {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Implicit => "implicit",
            Self::Default => "default",
            Self::Inherited => "inherited",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Implementation {
    pub member: MemberId,
    /// The base-chain level (or interface, for defaults) `member` was found on.
    pub declared_in: TypeId,
    pub via: ImplementationVia,
}

/// Why a slot has no implementation. At most one criterion is reported,
/// checked in declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnimplementedKind {
    Missing,
    /// The candidate is an instance member; the slot is static.
    NotStatic,
    /// The candidate is static; the slot is an instance member.
    IsStatic,
    NotPublic,
    WrongReturnType,
}

impl UnimplementedKind {
    pub const fn code(self) -> u32 {
        match self {
            Self::Missing => codes::NOT_IMPLEMENTED,
            Self::NotStatic => codes::IMPLEMENTATION_NOT_STATIC,
            Self::IsStatic => codes::IMPLEMENTATION_IS_STATIC,
            Self::NotPublic => codes::IMPLEMENTATION_NOT_PUBLIC,
            Self::WrongReturnType => codes::IMPLEMENTATION_WRONG_RETURN_TYPE,
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::NotStatic => "not static",
            Self::IsStatic => "static",
            Self::NotPublic => "not public",
            Self::WrongReturnType => "wrong return type",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Unimplemented {
    pub kind: UnimplementedKind,
    /// The member that came closest, for every kind except `Missing`.
    pub closest: Option<MemberId>,
}

impl Unimplemented {
    pub const fn missing() -> Self {
        Self {
            kind: UnimplementedKind::Missing,
            closest: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    Resolved(Implementation),
    Unresolved(Unimplemented),
    /// A property or event slot whose accessors resolved to accessors of
    /// different owners. Query the accessor slots individually.
    SplitAccessors,
}

impl Resolution {
    pub const fn implementation(&self) -> Option<&Implementation> {
        match self {
            Self::Resolved(implementation) => Some(implementation),
            _ => None,
        }
    }

    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// What emission must bind a slot to in the implementing type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmittedImplementation {
    Member(MemberId),
    Stub(Arc<ForwardingStub>),
}

impl EmittedImplementation {
    pub fn stub(&self) -> Option<&ForwardingStub> {
        match self {
            Self::Stub(stub) => Some(stub),
            Self::Member(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapEntry {
    /// The semantic answer: the member that implements the slot.
    pub resolution: Resolution,
    /// The emission answer. `None` for unresolved slots and for slots
    /// inherited from the base type, which emission of this type skips.
    pub emitted: Option<EmittedImplementation>,
}

#[derive(Clone, Debug)]
pub struct ImplementationMap {
    ty: TypeId,
    entries: IndexMap<InterfaceSlot, MapEntry, FxBuildHasher>,
    diagnostics: Vec<PendingDiagnostic>,
}

impl ImplementationMap {
    pub(crate) fn new(ty: TypeId) -> Self {
        Self {
            ty,
            entries: IndexMap::default(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, slot: InterfaceSlot, entry: MapEntry) {
        self.entries.insert(slot, entry);
    }

    pub(crate) fn push_diagnostic(&mut self, diag: PendingDiagnostic) {
        self.diagnostics.push(diag);
    }

    /// The implementing type this map belongs to.
    pub const fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn get(&self, slot: InterfaceSlot) -> Option<&MapEntry> {
        self.entries.get(&slot)
    }

    pub fn resolution(&self, slot: InterfaceSlot) -> Option<Resolution> {
        self.get(slot).map(|entry| entry.resolution)
    }

    pub fn emitted(&self, slot: InterfaceSlot) -> Option<&EmittedImplementation> {
        self.get(slot).and_then(|entry| entry.emitted.as_ref())
    }

    /// Every slot in interface order, then slot declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (InterfaceSlot, &MapEntry)> {
        self.entries.iter().map(|(&slot, entry)| (slot, entry))
    }

    /// The emission-facing list: slots this type must bind itself.
    pub fn emission_entries(&self) -> impl Iterator<Item = (InterfaceSlot, &EmittedImplementation)> {
        self.entries
            .iter()
            .filter_map(|(&slot, entry)| entry.emitted.as_ref().map(|emitted| (slot, emitted)))
    }

    pub fn stubs(&self) -> impl Iterator<Item = &ForwardingStub> {
        self.entries
            .values()
            .filter_map(|entry| entry.emitted.as_ref().and_then(EmittedImplementation::stub))
    }

    /// Unimplemented-member diagnostics (2001-2005) raised for this type.
    pub fn diagnostics(&self) -> &[PendingDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
