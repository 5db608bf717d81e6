//! Member matching engine.
//!
//! Builds the implementation map of one type. For each interface the type
//! re-declares, every slot is searched for level by level along the base
//! chain, most derived first:
//!
//! 1. an explicit implementation declared at that level wins outright;
//! 2. otherwise the first lookup-visible member with the slot's name and
//!    parameter signature ends the search, whether or not it is compatible
//!    (a hiding member that fails the modifier checks does not fall back to
//!    the member it hides);
//! 3. with nothing found anywhere, a default interface implementation is
//!    tried when the runtime supports it.
//!
//! Interfaces inherited only through the base class are copied from the
//! base type's map, except that a concrete type searches its own chain for
//! any slot its base left unresolved. Accessor slots are resolved on their own and their
//! owning property/event entries are regrouped afterwards.

use crate::implementation_map::{
    EmittedImplementation, Implementation, ImplementationMap, ImplementationVia, InterfaceSlot,
    MapEntry, Resolution, Unimplemented, UnimplementedKind,
};
use crate::stubs::{StubReason, synthesize_stub};
use iface_common::{Capabilities, LanguageFeature};
use iface_solver::{
    AccessorKind, DiagnosticArg, MemberId, MemberKind, Modifiers, PartialPart, PendingDiagnostic,
    Program, Signature, SlotKind, TypeDefinition, TypeId, canonicalize, codes, parameters_match,
    signatures_identical_including_annotations,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of searching the base chain for one slot.
enum Search {
    Found {
        member: MemberId,
        level: TypeId,
        via: ImplementationVia,
    },
    Rejected(Unimplemented),
    NotFound,
}

pub(crate) struct MapBuilder<'a> {
    program: &'a Program,
    capabilities: Capabilities,
    ty: TypeId,
    def: &'a TypeDefinition,
    /// `ty` followed by its base classes.
    chain: Vec<TypeId>,
    declared: FxHashSet<TypeId>,
    base_map: Option<Arc<ImplementationMap>>,
    map: ImplementationMap,
}

impl<'a> MapBuilder<'a> {
    pub(crate) fn new(
        program: &'a Program,
        capabilities: Capabilities,
        def: &'a TypeDefinition,
        ty: TypeId,
        chain: Vec<TypeId>,
        base_map: Option<Arc<ImplementationMap>>,
    ) -> Self {
        let declared = program.declared_interface_closure(ty).into_iter().collect();
        Self {
            program,
            capabilities,
            ty,
            def,
            chain,
            declared,
            base_map,
            map: ImplementationMap::new(ty),
        }
    }

    pub(crate) fn build(mut self) -> ImplementationMap {
        for iface in self.program.all_interfaces(self.ty) {
            let slots = self.program.interface_slots(iface);
            if self.declared.contains(&iface) {
                self.resolve_interface(iface, &slots);
            } else {
                self.inherit_interface(iface, &slots);
            }
        }
        debug!(
            ty = self.ty.0,
            entries = self.map.len(),
            diagnostics = self.map.diagnostics().len(),
            "implementation map built"
        );
        self.map
    }

    fn is_interface(&self) -> bool {
        self.def.is_interface()
    }

    // =========================================================================
    // Per-interface passes
    // =========================================================================

    /// Slots the base resolved are inherited as-is. A concrete type searches
    /// its own chain for the slots its base leaves unresolved.
    fn inherit_interface(&mut self, iface: TypeId, slots: &[MemberId]) {
        trace!(ty = self.ty.0, iface = iface.0, "inherit_interface");
        let mut entries: FxHashMap<MemberId, MapEntry> = FxHashMap::default();
        let mut pending: SmallVec<[MemberId; 4]> = SmallVec::new();
        for &member in slots {
            let slot = InterfaceSlot::new(iface, member);
            let inherited = self
                .base_map
                .as_ref()
                .and_then(|base| base.resolution(slot));
            let resolution = match inherited {
                Some(Resolution::Resolved(implementation)) => Resolution::Resolved(Implementation {
                    via: ImplementationVia::Inherited,
                    ..implementation
                }),
                _ if !self.def.may_leave_unimplemented() => {
                    pending.push(member);
                    continue;
                }
                Some(other) => other,
                None => Resolution::Unresolved(Unimplemented::missing()),
            };
            entries.insert(
                member,
                MapEntry {
                    resolution,
                    emitted: None,
                },
            );
        }

        if !pending.is_empty() {
            debug!(
                ty = self.ty.0,
                iface = iface.0,
                slots = pending.len(),
                "base leaves slots unresolved"
            );
            // An owner is regrouped from its accessors, so they are searched with it.
            let program = self.program;
            let accessors: SmallVec<[MemberId; 4]> = pending
                .iter()
                .flat_map(|&owner| program.member(owner).accessors.iter().copied())
                .filter(|accessor| !pending.contains(accessor))
                .collect();
            pending.extend(accessors);
            entries.extend(self.resolve_entries(iface, &pending));
        }

        for &member in slots {
            if let Some(entry) = entries.remove(&member) {
                self.map.insert(InterfaceSlot::new(iface, member), entry);
            }
        }
    }

    fn resolve_interface(&mut self, iface: TypeId, slots: &[MemberId]) {
        trace!(ty = self.ty.0, iface = iface.0, slots = slots.len(), "resolve_interface");
        let mut entries = self.resolve_entries(iface, slots);
        for &member in slots {
            if let Some(entry) = entries.remove(&member) {
                self.map.insert(InterfaceSlot::new(iface, member), entry);
            }
        }
    }

    /// Resolve `slots` of `iface`; property/event owners are regrouped from
    /// their accessor entries.
    fn resolve_entries(
        &mut self,
        iface: TypeId,
        slots: &[MemberId],
    ) -> FxHashMap<MemberId, MapEntry> {
        let mut resolved: FxHashMap<MemberId, MapEntry> = FxHashMap::default();
        for &member in slots {
            if self.program.member(member).kind.has_accessors() {
                continue;
            }
            let entry = self.resolve_slot(InterfaceSlot::new(iface, member));
            resolved.insert(member, entry);
        }
        for &member in slots {
            if self.program.member(member).kind.has_accessors() {
                let entry = self.regroup_owner(member, &resolved);
                resolved.insert(member, entry);
            }
        }
        resolved
    }

    /// Rebuild a property/event entry from its accessor entries.
    fn regroup_owner(
        &self,
        owner: MemberId,
        accessors: &FxHashMap<MemberId, MapEntry>,
    ) -> MapEntry {
        let program = self.program;
        let owner_of = |id: MemberId| program.member(id).owner.unwrap_or(id);
        let mut owners: SmallVec<[Implementation; 2]> = SmallVec::new();
        for &accessor in &program.member(owner).accessors {
            match accessors.get(&accessor).map(|entry| entry.resolution) {
                Some(Resolution::Resolved(implementation)) => owners.push(Implementation {
                    member: owner_of(implementation.member),
                    ..implementation
                }),
                Some(Resolution::Unresolved(unimplemented)) => {
                    return MapEntry {
                        resolution: Resolution::Unresolved(Unimplemented {
                            kind: unimplemented.kind,
                            closest: unimplemented.closest.map(owner_of),
                        }),
                        emitted: None,
                    };
                }
                Some(Resolution::SplitAccessors) | None => {
                    return MapEntry {
                        resolution: Resolution::Unresolved(Unimplemented::missing()),
                        emitted: None,
                    };
                }
            }
        }
        let Some(first) = owners.first().copied() else {
            return MapEntry {
                resolution: Resolution::Unresolved(Unimplemented::missing()),
                emitted: None,
            };
        };
        if owners.iter().all(|other| other.member == first.member) {
            MapEntry {
                resolution: Resolution::Resolved(first),
                emitted: Some(EmittedImplementation::Member(first.member)),
            }
        } else {
            trace!(ty = self.ty.0, owner = owner.0, "accessors resolve to different owners");
            MapEntry {
                resolution: Resolution::SplitAccessors,
                emitted: None,
            }
        }
    }

    // =========================================================================
    // Slot resolution
    // =========================================================================

    fn resolve_slot(&mut self, slot: InterfaceSlot) -> MapEntry {
        let search = match self.program.member(slot.member).kind {
            MemberKind::Accessor(kind) => self.search_accessor(slot, kind),
            _ => self.search(slot),
        };
        let search = match search {
            Search::NotFound => self.default_implementation(slot),
            other => other,
        };
        match search {
            Search::Found { member, level, via } => {
                let emitted = self.emitted(slot, member, level, via);
                MapEntry {
                    resolution: Resolution::Resolved(Implementation {
                        member,
                        declared_in: level,
                        via,
                    }),
                    emitted: Some(emitted),
                }
            }
            Search::Rejected(unimplemented) => self.unresolved(slot, unimplemented),
            Search::NotFound => self.unresolved(slot, Unimplemented::missing()),
        }
    }

    fn search(&self, slot: InterfaceSlot) -> Search {
        for &level in &self.chain {
            let Some(level_def) = self.program.def_of(level) else {
                break;
            };
            trace!(slot = slot.member.0, level = level.0, "search level");
            if let Some(member) = self.explicit_at(level_def, level, slot) {
                return Search::Found {
                    member,
                    level,
                    via: ImplementationVia::Explicit,
                };
            }
            if self.is_interface() {
                continue;
            }
            if let Some(candidate) = self.implicit_candidate(level_def, level, slot) {
                return match self.incompatibility(slot, candidate, slot.member, candidate, level) {
                    None => Search::Found {
                        member: candidate,
                        level,
                        via: ImplementationVia::Implicit,
                    },
                    Some(kind) => Search::Rejected(Unimplemented {
                        kind,
                        closest: Some(candidate),
                    }),
                };
            }
        }
        Search::NotFound
    }

    /// Accessors are matched through their owners: a level whose matching
    /// property/event lacks the accessor is skipped.
    fn search_accessor(&self, slot: InterfaceSlot, kind: AccessorKind) -> Search {
        let Some(owner_slot) = self.program.member(slot.member).owner else {
            return Search::NotFound;
        };
        let owner = InterfaceSlot::new(slot.interface, owner_slot);
        for &level in &self.chain {
            let Some(level_def) = self.program.def_of(level) else {
                break;
            };
            if let Some(member) = self.explicit_at(level_def, level, slot) {
                return Search::Found {
                    member,
                    level,
                    via: ImplementationVia::Explicit,
                };
            }
            if self.is_interface() {
                continue;
            }
            let Some(candidate_owner) = self.implicit_candidate(level_def, level, owner) else {
                continue;
            };
            let Some(candidate) = self.program.accessor_of(candidate_owner, kind) else {
                trace!(level = level.0, owner = candidate_owner.0, "owner lacks accessor");
                continue;
            };
            return match self.incompatibility(slot, candidate, owner_slot, candidate_owner, level) {
                None => Search::Found {
                    member: candidate,
                    level,
                    via: ImplementationVia::Implicit,
                },
                Some(kind) => Search::Rejected(Unimplemented {
                    kind,
                    closest: Some(candidate),
                }),
            };
        }
        Search::NotFound
    }

    /// An explicit implementation of `slot` declared on `level`.
    fn explicit_at(
        &self,
        level_def: &TypeDefinition,
        level: TypeId,
        slot: InterfaceSlot,
    ) -> Option<MemberId> {
        let program = self.program;
        let subst = program.substitution_of(level);
        level_def.members.iter().copied().find(|&id| {
            program.member(id).explicit_target.as_ref().is_some_and(|target| {
                target.slot == Some(slot.member)
                    && program.instantiate(target.interface, &subst) == slot.interface
            })
        })
    }

    /// The first member on `level` hiding by name and parameter signature.
    fn implicit_candidate(
        &self,
        level_def: &TypeDefinition,
        level: TypeId,
        slot: InterfaceSlot,
    ) -> Option<MemberId> {
        let program = self.program;
        let wanted = program.member(slot.member);
        level_def.members.iter().copied().find(|&id| {
            let candidate = program.member(id);
            candidate.name == wanted.name
                && candidate.kind == wanted.kind
                && !candidate.is_explicit()
                && candidate.is_lookup_visible()
                && parameters_match(
                    &program.slot_signature(slot.interface, slot.member, id),
                    &self.level_signature(id, level),
                )
        })
    }

    /// Staticness and accessibility come from `member`/`candidate`; the
    /// return type from `shape_member`/`shape_candidate` (the owners, for
    /// accessors).
    fn incompatibility(
        &self,
        slot: InterfaceSlot,
        candidate: MemberId,
        shape_member: MemberId,
        shape_candidate: MemberId,
        level: TypeId,
    ) -> Option<UnimplementedKind> {
        let program = self.program;
        let wanted = program.member(slot.member);
        let found = program.member(candidate);
        if wanted.is_static() && !found.is_static() {
            return Some(UnimplementedKind::NotStatic);
        }
        if !wanted.is_static() && found.is_static() {
            return Some(UnimplementedKind::IsStatic);
        }
        if !found.is_public() {
            return Some(UnimplementedKind::NotPublic);
        }
        let expected = program.slot_signature(slot.interface, shape_member, shape_candidate);
        if expected.ret.ty != self.level_signature(shape_candidate, level).ret.ty {
            return Some(UnimplementedKind::WrongReturnType);
        }
        None
    }

    fn level_signature(&self, member: MemberId, level: TypeId) -> Signature {
        let program = self.program;
        canonicalize(
            &program.interner,
            &program.member(member).signature,
            &program.substitution_of(level),
        )
    }

    // =========================================================================
    // Default interface implementations
    // =========================================================================

    /// The most specific bodied implementation among the slot itself and
    /// explicit overrides in the interfaces `ty` implements. A most specific
    /// re-abstraction, or no unique most specific candidate, yields nothing.
    fn default_implementation(&self, slot: InterfaceSlot) -> Search {
        let program = self.program;
        let wanted = program.member(slot.member);
        let feature = if wanted.is_static() {
            LanguageFeature::StaticAbstractMembersInInterfaces
        } else {
            LanguageFeature::DefaultInterfaceImplementation
        };
        if !self.capabilities.runtime_supports(feature) {
            return Search::NotFound;
        }

        let mut candidates: SmallVec<[(TypeId, MemberId); 2]> = SmallVec::new();
        if wanted.has_body && !wanted.modifiers.contains(Modifiers::ABSTRACT) {
            candidates.push((slot.interface, slot.member));
        }
        let mut scope = program.all_interfaces(self.ty);
        if self.is_interface() {
            scope.insert(0, self.ty);
        }
        for iface in scope {
            let Some(iface_def) = program.def_of(iface) else {
                continue;
            };
            if let Some(member) = self.explicit_at(iface_def, iface, slot) {
                candidates.push((iface, member));
            }
        }

        let most_specific: SmallVec<[(TypeId, MemberId); 1]> = candidates
            .iter()
            .copied()
            .filter(|&(iface, _)| {
                candidates
                    .iter()
                    .all(|&(other, _)| other == iface || program.declares_interface(iface, other))
            })
            .collect();
        let [(iface, member)] = most_specific.as_slice() else {
            trace!(slot = slot.member.0, candidates = candidates.len(), "no most specific default");
            return Search::NotFound;
        };
        let chosen = program.member(*member);
        if !chosen.has_body || chosen.modifiers.contains(Modifiers::ABSTRACT) {
            trace!(slot = slot.member.0, member = member.0, "most specific default is re-abstracted");
            return Search::NotFound;
        }
        Search::Found {
            member: *member,
            level: *iface,
            via: ImplementationVia::Default,
        }
    }

    // =========================================================================
    // Emission and diagnostics
    // =========================================================================

    fn emitted(
        &self,
        slot: InterfaceSlot,
        member: MemberId,
        level: TypeId,
        via: ImplementationVia,
    ) -> EmittedImplementation {
        let program = self.program;
        let found = program.member(member);
        let reason = if via == ImplementationVia::Default {
            None
        } else if !signatures_identical_including_annotations(
            &program.slot_signature(slot.interface, slot.member, member),
            &self.level_signature(member, level),
        ) {
            Some(StubReason::AnnotationMismatch)
        } else if level != self.ty
            && self.declared.contains(&slot.interface)
            && (found.is_static() || found.slot == SlotKind::NonDispatching)
        {
            Some(StubReason::Locality)
        } else {
            None
        };
        match reason {
            Some(reason) => EmittedImplementation::Stub(Arc::new(synthesize_stub(
                program, self.ty, slot, member, level, reason,
            ))),
            None => match found.partial {
                Some(PartialPart::Definition {
                    implementation: Some(implementation),
                }) => EmittedImplementation::Member(implementation),
                _ => EmittedImplementation::Member(member),
            },
        }
    }

    fn unresolved(&mut self, slot: InterfaceSlot, unimplemented: Unimplemented) -> MapEntry {
        if !self.def.may_leave_unimplemented() {
            let diag = self.unimplemented_diagnostic(slot, unimplemented);
            self.map.push_diagnostic(diag);
        }
        debug!(
            ty = self.ty.0,
            slot = slot.member.0,
            kind = unimplemented.kind.describe(),
            "slot unresolved"
        );
        MapEntry {
            resolution: Resolution::Unresolved(unimplemented),
            emitted: None,
        }
    }

    fn unimplemented_diagnostic(
        &self,
        slot: InterfaceSlot,
        unimplemented: Unimplemented,
    ) -> PendingDiagnostic {
        let program = self.program;
        let mut args: Vec<DiagnosticArg> = vec![self.ty.into(), slot.to_arg()];
        if let Some(closest) = unimplemented.closest {
            args.push(closest.into());
        }
        if unimplemented.kind == UnimplementedKind::WrongReturnType {
            let shape = program.member(slot.member).owner.unwrap_or(slot.member);
            let expected = program.slot_signature(slot.interface, shape, shape);
            args.push(expected.ret.ty.into());
        }
        let mut diag = PendingDiagnostic::error(unimplemented.kind.code(), args).at_def(self.def.id);
        if let Some(closest) = unimplemented.closest {
            diag = diag.with_related(
                PendingDiagnostic::error(codes::CLOSEST_CANDIDATE, vec![closest.into()])
                    .at_member(closest),
            );
        }
        diag
    }
}
