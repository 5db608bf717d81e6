//! Binder members: signatures, accessors, partial linkage, modifier
//! validation and explicit implementation targets.

use crate::declarations::{
    AccessorDeclaration, AccessorToken, AnnotationDecl, MemberDeclKind, MemberDeclaration,
    ModifierToken, ParamDeclaration, TypeDeclaration,
};
use crate::modifiers::{MemberShape, PartialRole, accessor_modifiers, validate};
use iface_solver::{
    AccessorKind, Annotation, DefId, DefKind, DiagnosticArg, DiagnosticLocation, ExplicitTarget,
    Member, MemberId, MemberKind, Modifiers, OperatorToken, Param, PartialPart, RefKind,
    Signature, SlotKind, TypeId, TypeOccurrence, TypeParamInfo, TypeParamOwner, Variance, codes,
    signatures_equal,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::state::{BinderState, BoundMember};

fn member_kind_of(decl: &MemberDeclaration) -> Option<MemberKind> {
    Some(match decl.kind {
        MemberDeclKind::Method => MemberKind::Method,
        MemberDeclKind::Property | MemberDeclKind::Indexer => MemberKind::Property,
        MemberDeclKind::Event => MemberKind::Event,
        MemberDeclKind::Constructor => MemberKind::Constructor,
        MemberDeclKind::Field => MemberKind::Field,
        MemberDeclKind::Operator => MemberKind::Operator(OperatorToken::from_token(&decl.name)?),
    })
}

fn token_flags<'a>(tokens: impl IntoIterator<Item = &'a ModifierToken>) -> SmallVec<[Modifiers; 4]> {
    tokens.into_iter().map(|token| token.to_modifiers()).collect()
}

impl BinderState {
    pub(crate) fn bind_members(&mut self, decl: &TypeDeclaration, def: DefId) {
        self.enter_type(def);
        for member in &decl.members {
            self.bind_member(def, member);
        }
        self.method_scope.clear();
    }

    fn bind_member(&mut self, def: DefId, decl: &MemberDeclaration) {
        let container = self.program.def(def).kind;
        let Some(kind) = member_kind_of(decl) else {
            self.location = Some(DiagnosticLocation::Def(def));
            self.report(codes::UNKNOWN_OPERATOR, vec![decl.name.as_str().into()]);
            return;
        };
        let name = match (decl.kind, kind) {
            (_, MemberKind::Operator(op)) => op.metadata_name(decl.params.len()).to_string(),
            (MemberDeclKind::Indexer, _) => "Item".to_string(),
            _ => decl.name.clone(),
        };
        let placeholder = Signature::new(kind, Vec::new(), TypeId::VOID);
        let id = self
            .program
            .add_member(Member::new(name.clone(), kind, def, container, placeholder));
        self.location = Some(DiagnosticLocation::Member(id));

        // Method type parameters are in scope for the member's own signature.
        self.method_scope.clear();
        for (ordinal, param) in decl.type_params.iter().enumerate() {
            if param.variance.is_some() {
                self.report(codes::VARIANCE_ON_NON_INTERFACE, vec![param.name.as_str().into()]);
            }
            let tp = self.program.add_type_param(TypeParamInfo {
                name: param.name.clone(),
                owner: TypeParamOwner::Member(id),
                ordinal: ordinal as u32,
                variance: Variance::Invariant,
                constraints: Vec::new(),
            });
            self.program.member_mut(id).type_params.push(tp);
            self.method_scope.push(tp);
        }
        let method_params = self.method_scope.clone();
        for (tp, param) in method_params.into_iter().zip(&decl.type_params) {
            for text in &param.constraints {
                let constraint = self.resolve_type_text(text);
                if constraint != TypeId::ERROR {
                    self.program.type_param_mut(tp).constraints.push(constraint);
                }
            }
        }

        let mut params = Vec::with_capacity(decl.params.len());
        for param in &decl.params {
            params.push(self.bind_param(param));
        }
        let ret = self.bind_occurrence(&decl.return_type, &decl.return_annotations);
        let mut signature = Signature::new(kind, params, ret);
        signature.type_param_count = decl.type_params.len() as u32;

        let explicit_target = match &decl.explicit_interface {
            Some(text) => Some(ExplicitTarget {
                interface: self.resolve_type_text(text),
                member_name: name.clone(),
                slot: None,
            }),
            None => None,
        };
        let tokens = token_flags(&decl.modifiers);
        let declared = tokens.iter().fold(Modifiers::empty(), |acc, &flag| acc | flag);
        let has_body =
            decl.has_body || decl.accessors.iter().any(|accessor| accessor.has_body);

        let member = self.program.member_mut(id);
        member.signature = signature;
        member.has_body = has_body;
        member.declared_modifiers = declared;
        member.modifiers = declared;
        member.explicit_target = explicit_target;

        let mut accessors = SmallVec::new();
        if kind.has_accessors() {
            let decls: Vec<AccessorDeclaration> =
                if decl.accessors.is_empty() && matches!(kind, MemberKind::Event) {
                    vec![
                        AccessorDeclaration::new(AccessorToken::Add),
                        AccessorDeclaration::new(AccessorToken::Remove),
                    ]
                } else {
                    decl.accessors.clone()
                };
            for accessor in &decls {
                let accessor_id = self.bind_accessor(id, accessor, declared);
                accessors.push((accessor_id, token_flags(&accessor.modifiers)));
            }
            self.location = Some(DiagnosticLocation::Member(id));
        }
        trace!(member = id.0, name = %name, kind = kind.describe(), "bind_member");
        self.reject_explicit_non_implementable(id);
        self.bound.push(BoundMember {
            id,
            tokens,
            accessors,
        });
        self.method_scope.clear();
    }

    /// Constructors and fields cannot implement anything.
    fn reject_explicit_non_implementable(&mut self, id: MemberId) {
        let member = self.program.member(id);
        if member.explicit_target.is_some() && !member.kind.is_implementable() {
            self.report(codes::EXPLICIT_IMPL_NOT_FOUND, vec![id.into()]);
            self.program.member_mut(id).explicit_target = None;
        }
    }

    fn bind_param(&mut self, decl: &ParamDeclaration) -> Param {
        let ty = self.bind_occurrence(&decl.ty, &decl.annotations);
        let mut param = Param::new(decl.name.clone(), ty);
        param.ref_kind = decl.ref_kind.map(RefKind::from).unwrap_or_default();
        param
    }

    fn bind_occurrence(&mut self, text: &str, annotations: &[AnnotationDecl]) -> TypeOccurrence {
        let ty = self.resolve_type_text(text);
        let mut resolved = SmallVec::<[Annotation; 1]>::new();
        for annotation in annotations {
            let modifier = self.resolve_type_text(&annotation.modifier);
            if modifier != TypeId::ERROR {
                resolved.push(Annotation {
                    required: annotation.required,
                    modifier,
                });
            }
        }
        TypeOccurrence::annotated(ty, resolved)
    }

    /// Accessor signatures: `get` takes the index parameters and returns the
    /// property type, `set` adds a trailing `value`, `add`/`remove` take the
    /// event type.
    fn bind_accessor(
        &mut self,
        owner: MemberId,
        decl: &AccessorDeclaration,
        owner_declared: Modifiers,
    ) -> MemberId {
        let kind = AccessorKind::from(decl.kind);
        let owner_member = self.program.member(owner);
        let name = format!("{}_{}", kind.keyword(), owner_member.name);
        let value = owner_member.signature.ret.clone();
        let index: Vec<Param> = owner_member.signature.params.clone();
        let (params, ret) = match kind {
            AccessorKind::Get => (index, value),
            AccessorKind::Set => {
                let mut params = index;
                params.push(Param::new("value", value));
                (params, TypeOccurrence::plain(TypeId::VOID))
            }
            AccessorKind::Add | AccessorKind::Remove => {
                (vec![Param::new("value", value)], TypeOccurrence::plain(TypeId::VOID))
            }
        };
        let in_interface = matches!(owner_member.container, DefKind::Interface);
        let has_body = decl.has_body
            || (!in_interface
                && !owner_declared.intersects(Modifiers::ABSTRACT | Modifiers::EXTERN));
        let explicit_target = owner_member.explicit_target.as_ref().map(|target| ExplicitTarget {
            interface: target.interface,
            member_name: name.clone(),
            slot: None,
        });
        let mut member = Member::new(
            name,
            MemberKind::Accessor(kind),
            owner_member.declaring,
            owner_member.container,
            Signature::new(MemberKind::Accessor(kind), params, ret),
        );
        member.owner = Some(owner);
        member.has_body = has_body;
        member.explicit_target = explicit_target;
        let id = self.program.add_member(member);
        self.program.member_mut(owner).accessors.push(id);
        id
    }

    // =========================================================================
    // Partial members
    // =========================================================================

    /// Pair body-less `partial` definitions with bodied implementations of
    /// the same name and signature in the same type.
    pub(crate) fn link_partials(&mut self) {
        let mut groups: FxHashMap<(DefId, String), Vec<MemberId>> = FxHashMap::default();
        for bound in &self.bound {
            let member = self.program.member(bound.id);
            if member.declared_modifiers.contains(Modifiers::PARTIAL)
                && matches!(member.kind, MemberKind::Method)
            {
                groups
                    .entry((member.declaring, member.name.clone()))
                    .or_default()
                    .push(bound.id);
            }
        }
        let mut groups: Vec<_> = groups.into_values().collect();
        groups.sort_by_key(|ids| ids.first().copied());
        for ids in groups {
            let mut remaining = ids;
            while let Some(first) = remaining.first().copied() {
                let self_type = self.program.def(self.program.member(first).declaring).self_type;
                let (same, rest): (Vec<MemberId>, Vec<MemberId>) =
                    remaining.into_iter().partition(|&id| {
                        id == first
                            || signatures_equal(
                                &self.program.slot_signature(self_type, first, id),
                                &self.program.member(id).signature,
                            )
                    });
                remaining = rest;
                self.link_partial_group(&same);
            }
        }
    }

    fn link_partial_group(&mut self, ids: &[MemberId]) {
        let (definitions, implementations): (Vec<MemberId>, Vec<MemberId>) = ids
            .iter()
            .copied()
            .partition(|&id| !self.program.member(id).has_body);
        for &extra in definitions.iter().skip(1).chain(implementations.iter().skip(1)) {
            self.location = Some(DiagnosticLocation::Member(extra));
            self.report(codes::PARTIAL_MULTIPLE_DEFINITIONS, vec![extra.into()]);
        }
        let Some(&definition) = definitions.first() else {
            return;
        };
        let implementation = implementations.first().copied();
        self.program.member_mut(definition).partial = Some(PartialPart::Definition { implementation });
        if let Some(implementation) = implementation {
            self.program.member_mut(implementation).partial =
                Some(PartialPart::Implementation { definition });
        }
    }

    // =========================================================================
    // Modifiers
    // =========================================================================

    pub(crate) fn validate_modifiers(&mut self) {
        let bound = std::mem::take(&mut self.bound);
        for entry in &bound {
            let member = self.program.member(entry.id);
            let def = self.program.def(member.declaring);
            let partial = match member.partial {
                Some(PartialPart::Definition { implementation }) => Some(PartialRole::Definition {
                    implementation_ok: implementation.is_some_and(|id| {
                        let part = self.program.member(id);
                        part.has_body && !part.declared_modifiers.contains(Modifiers::ABSTRACT)
                    }),
                }),
                Some(PartialPart::Implementation { .. }) => Some(PartialRole::Implementation),
                None => None,
            };
            let shape = MemberShape {
                kind: member.kind,
                container: def.kind,
                container_modifiers: def.modifiers,
                has_body: member.has_body,
                is_explicit: member.is_explicit(),
                partial,
            };
            let container = def.id;
            let outcome = validate(&shape, &entry.tokens, self.capabilities);
            for conflict in &outcome.conflicts {
                self.diagnostics
                    .push(conflict.to_diagnostic(entry.id, container, self.capabilities));
            }
            let member = self.program.member_mut(entry.id);
            member.modifiers = outcome.effective;
            member.slot = outcome.slot;

            for (accessor, tokens) in &entry.accessors {
                let (effective, conflicts) = accessor_modifiers(outcome.effective, tokens);
                let accessor_member = self.program.member_mut(*accessor);
                accessor_member.declared_modifiers =
                    tokens.iter().fold(Modifiers::empty(), |acc, &flag| acc | flag);
                accessor_member.modifiers = effective;
                accessor_member.slot =
                    SlotKind::from_modifiers(effective, accessor_member.is_explicit());
                for conflict in &conflicts {
                    self.diagnostics
                        .push(conflict.to_diagnostic(*accessor, container, self.capabilities));
                }
            }
        }
        self.bound = bound;
    }

    // =========================================================================
    // Explicit implementations
    // =========================================================================

    /// Resolve each explicit implementation to the interface member it
    /// implements. The first claim on a slot wins; later ones are reported.
    pub(crate) fn bind_explicit_targets(&mut self) {
        let mut claimed: FxHashMap<(DefId, TypeId, MemberId), MemberId> = FxHashMap::default();
        let ids: Vec<MemberId> = self.bound.iter().map(|bound| bound.id).collect();
        for id in ids {
            let member = self.program.member(id);
            let Some(target) = member.explicit_target.clone() else {
                continue;
            };
            let declaring = member.declaring;
            self.location = Some(DiagnosticLocation::Member(id));
            if target.interface == TypeId::ERROR {
                continue;
            }
            if !self.program.is_interface_type(target.interface) {
                self.report(
                    codes::NOT_AN_INTERFACE,
                    vec![declaring.into(), target.interface.into()],
                );
                continue;
            }
            let self_type = self.program.def(declaring).self_type;
            if !self
                .program
                .declared_interface_closure(self_type)
                .contains(&target.interface)
            {
                self.report(
                    codes::EXPLICIT_IMPL_INTERFACE_NOT_DECLARED,
                    vec![id.into(), target.interface.into()],
                );
                continue;
            }
            let Some(slot) = self.find_explicit_slot(id, target.interface) else {
                self.report(codes::EXPLICIT_IMPL_NOT_FOUND, vec![id.into()]);
                continue;
            };
            if claimed.contains_key(&(declaring, target.interface, slot)) {
                self.report(
                    codes::DUPLICATE_EXPLICIT_IMPL,
                    vec![
                        declaring.into(),
                        DiagnosticArg::Slot {
                            interface: target.interface,
                            member: slot,
                        },
                    ],
                );
                continue;
            }
            claimed.insert((declaring, target.interface, slot), id);
            self.set_explicit_slot(id, slot);
            debug!(member = id.0, slot = slot.0, "explicit implementation bound");
        }
    }

    fn find_explicit_slot(&self, id: MemberId, interface: TypeId) -> Option<MemberId> {
        let program = &self.program;
        let member = program.member(id);
        let def = program.def_of(interface)?;
        def.members.iter().copied().find(|&slot| {
            let candidate = program.member(slot);
            candidate.name == member.name
                && candidate.kind == member.kind
                && candidate.is_interface_slot()
                && candidate.is_static() == member.is_static()
                && signatures_equal(
                    &program.slot_signature(interface, slot, id),
                    &member.signature,
                )
        })
    }

    fn set_explicit_slot(&mut self, id: MemberId, slot: MemberId) {
        if let Some(target) = self.program.member_mut(id).explicit_target.as_mut() {
            target.slot = Some(slot);
        }
        let accessors = self.program.member(id).accessors.clone();
        for accessor in accessors {
            let MemberKind::Accessor(kind) = self.program.member(accessor).kind else {
                continue;
            };
            match self.program.accessor_of(slot, kind) {
                Some(target_accessor) => {
                    if let Some(target) = self.program.member_mut(accessor).explicit_target.as_mut() {
                        target.slot = Some(target_accessor);
                    }
                }
                None => {
                    self.location = Some(DiagnosticLocation::Member(accessor));
                    self.report(codes::EXPLICIT_IMPL_NOT_FOUND, vec![accessor.into()]);
                }
            }
        }
    }
}
