//! Modifier validation.
//!
//! The legal (member kind x container kind x modifier set) space is a small
//! rule table evaluated in a fixed order. Conflicts drop the offending
//! modifier from the effective set, so later phases never see, say, a member
//! that is both abstract and bodied. Capability gates are the exception:
//! the gated modifier stays so downstream reasoning sees the intended shape.

use iface_common::{Capabilities, LanguageFeature};
use iface_solver::{
    DefId, DefKind, DiagnosticArg, MemberId, MemberKind, Modifiers, PendingDiagnostic, SlotKind,
    TypeModifiers, codes,
};
use smallvec::SmallVec;

/// Role of a member in a partial pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PartialRole {
    /// The body-less defining part. `implementation_ok` is `true` when an
    /// implementing part exists, is not abstract and has a body.
    Definition { implementation_ok: bool },
    Implementation,
}

/// Everything the validator needs to know about one member.
#[derive(Clone, Debug)]
pub struct MemberShape {
    pub kind: MemberKind,
    pub container: DefKind,
    pub container_modifiers: TypeModifiers,
    pub has_body: bool,
    pub is_explicit: bool,
    pub partial: Option<PartialRole>,
}

/// One rejected modifier or gate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ModifierConflict {
    pub code: u32,
    /// The offending modifier (empty for body and containment rules).
    pub modifier: Modifiers,
    /// The gated feature for capability conflicts.
    pub feature: Option<LanguageFeature>,
}

impl ModifierConflict {
    const fn new(code: u32, modifier: Modifiers) -> Self {
        Self {
            code,
            modifier,
            feature: None,
        }
    }

    pub fn to_diagnostic(
        &self,
        member: MemberId,
        container: DefId,
        capabilities: Capabilities,
    ) -> PendingDiagnostic {
        let args: Vec<DiagnosticArg> = match self.code {
            codes::MODIFIER_NOT_VALID | codes::STATIC_MEMBER_CANNOT_BE_MARKED => {
                vec![member.into(), self.modifier.into()]
            }
            codes::ABSTRACT_IN_NON_ABSTRACT_TYPE => vec![member.into(), container.into()],
            codes::FEATURE_NOT_AVAILABLE => match self.feature {
                Some(feature) => vec![
                    feature.into(),
                    capabilities.language_version.into(),
                    feature.required_version().into(),
                ],
                None => vec![member.into()],
            },
            codes::RUNTIME_NOT_SUPPORTED => match self.feature {
                Some(feature) => vec![feature.into(), member.into()],
                None => vec![member.into()],
            },
            _ => vec![member.into()],
        };
        PendingDiagnostic::error(self.code, args).at_member(member)
    }
}

/// Result of validating one member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifierOutcome {
    /// Declared modifiers after conflict recovery plus implied defaults.
    pub effective: Modifiers,
    pub slot: SlotKind,
    pub conflicts: SmallVec<[ModifierConflict; 2]>,
}

const CLASS_DISPATCH: Modifiers = Modifiers::DISPATCH.union(Modifiers::SEALED);

/// Modifiers a member may carry at all, before pairwise rules.
fn allowed(shape: &MemberShape) -> Modifiers {
    let interface = matches!(shape.container, DefKind::Interface);
    if shape.is_explicit {
        return if interface {
            Modifiers::STATIC | Modifiers::EXTERN | Modifiers::ABSTRACT
        } else {
            Modifiers::STATIC | Modifiers::EXTERN
        };
    }
    match shape.kind {
        MemberKind::Field => {
            Modifiers::ACCESS
                | Modifiers::NEW
                | Modifiers::STATIC
                | Modifiers::READONLY
                | Modifiers::ABSTRACT
        }
        MemberKind::Constructor => Modifiers::ACCESS | Modifiers::STATIC | Modifiers::EXTERN,
        MemberKind::Operator(_) if interface => {
            Modifiers::ACCESS
                | Modifiers::STATIC
                | Modifiers::EXTERN
                | Modifiers::ABSTRACT
                | Modifiers::VIRTUAL
                | Modifiers::SEALED
        }
        MemberKind::Operator(_) => Modifiers::ACCESS | Modifiers::STATIC | Modifiers::EXTERN,
        MemberKind::Accessor(_) => Modifiers::ACCESS,
        MemberKind::Method | MemberKind::Property | MemberKind::Event => {
            let partial = if matches!(shape.kind, MemberKind::Method) {
                Modifiers::PARTIAL
            } else {
                Modifiers::empty()
            };
            let base = Modifiers::ACCESS | Modifiers::NEW | Modifiers::STATIC | Modifiers::EXTERN;
            match shape.container {
                DefKind::Interface => {
                    base | Modifiers::ABSTRACT | Modifiers::VIRTUAL | Modifiers::SEALED | partial
                }
                DefKind::Class => base | CLASS_DISPATCH | partial,
                DefKind::Struct => base | Modifiers::OVERRIDE | Modifiers::READONLY | partial,
            }
        }
    }
}

/// `protected internal` and `private protected` are the only legal pairs.
fn access_is_valid(access: &[Modifiers]) -> bool {
    match access {
        [] | [_] => true,
        [a, b] => {
            let pair = *a | *b;
            pair == Modifiers::PROTECTED | Modifiers::INTERNAL
                || pair == Modifiers::PRIVATE | Modifiers::PROTECTED
        }
        _ => false,
    }
}

/// Validate a member's written modifiers.
///
/// `tokens` is the list as written, one flag per token. The returned
/// effective set includes implied defaults: interface members are public and
/// class and struct members private; a body-less interface member with no
/// `static`, `virtual`, `sealed`, `private` or `extern` is abstract, and a
/// bodied instance interface member is virtual.
pub fn validate(shape: &MemberShape, tokens: &[Modifiers], capabilities: Capabilities) -> ModifierOutcome {
    let mut conflicts: SmallVec<[ModifierConflict; 2]> = SmallVec::new();
    let mut effective = Modifiers::empty();
    let permitted = allowed(shape);
    let mut access: SmallVec<[Modifiers; 2]> = SmallVec::new();
    for &token in tokens {
        if !permitted.contains(token) {
            conflicts.push(ModifierConflict::new(codes::MODIFIER_NOT_VALID, token));
            continue;
        }
        if Modifiers::ACCESS.contains(token) {
            access.push(token);
        }
        effective |= token;
    }
    if !access_is_valid(&access) {
        conflicts.push(ModifierConflict::new(codes::MULTIPLE_ACCESS_MODIFIERS, Modifiers::empty()));
        effective.remove(Modifiers::ACCESS);
        if let Some(&first) = access.first() {
            effective |= first;
        }
    }
    let declared = effective;

    let interface = matches!(shape.container, DefKind::Interface);
    // The implied access level takes part in the pairwise rules below.
    if effective.access().is_empty() {
        effective |= if interface && !shape.is_explicit {
            Modifiers::PUBLIC
        } else {
            Modifiers::PRIVATE
        };
    }
    let mut strip = |effective: &mut Modifiers, code: u32, modifier: Modifiers| {
        conflicts.push(ModifierConflict::new(code, modifier));
        effective.remove(modifier);
    };

    if !interface && effective.contains(Modifiers::STATIC) {
        for flag in [
            Modifiers::ABSTRACT,
            Modifiers::VIRTUAL,
            Modifiers::OVERRIDE,
            Modifiers::SEALED,
        ] {
            if effective.contains(flag) {
                strip(&mut effective, codes::STATIC_MEMBER_CANNOT_BE_MARKED, flag);
            }
        }
    }
    if effective.contains(Modifiers::ABSTRACT | Modifiers::VIRTUAL) {
        strip(&mut effective, codes::ABSTRACT_AND_VIRTUAL, Modifiers::VIRTUAL);
    }
    if effective.contains(Modifiers::ABSTRACT | Modifiers::SEALED) {
        strip(&mut effective, codes::ABSTRACT_AND_SEALED, Modifiers::SEALED);
    }
    if !interface && effective.contains(Modifiers::SEALED) && !effective.contains(Modifiers::OVERRIDE) {
        strip(&mut effective, codes::SEALED_NON_OVERRIDE, Modifiers::SEALED);
    }
    if effective.contains(Modifiers::OVERRIDE) {
        for flag in [Modifiers::NEW, Modifiers::VIRTUAL] {
            if effective.contains(flag) {
                strip(&mut effective, codes::OVERRIDE_WITH_NEW_OR_VIRTUAL, flag);
            }
        }
    }
    if effective.contains(Modifiers::ABSTRACT) && shape.has_body {
        strip(&mut effective, codes::ABSTRACT_HAS_BODY, Modifiers::ABSTRACT);
    }
    if effective.contains(Modifiers::EXTERN | Modifiers::ABSTRACT) {
        strip(&mut effective, codes::EXTERN_AND_ABSTRACT, Modifiers::ABSTRACT);
    }
    if effective.contains(Modifiers::EXTERN) && shape.has_body {
        strip(&mut effective, codes::EXTERN_HAS_BODY, Modifiers::EXTERN);
    }
    if !shape.is_explicit
        && effective.contains(Modifiers::PRIVATE)
        && !effective.contains(Modifiers::PROTECTED)
    {
        for flag in [Modifiers::ABSTRACT, Modifiers::VIRTUAL] {
            if effective.contains(flag) {
                strip(&mut effective, codes::VIRTUAL_OR_ABSTRACT_PRIVATE, flag);
            }
        }
    }
    if matches!(shape.kind, MemberKind::Field) && effective.contains(Modifiers::ABSTRACT) {
        strip(&mut effective, codes::ABSTRACT_FIELD, Modifiers::ABSTRACT);
    }
    match shape.partial {
        Some(PartialRole::Implementation) if effective.contains(Modifiers::ABSTRACT) => {
            strip(&mut effective, codes::PARTIAL_IMPLEMENTATION_ABSTRACT, Modifiers::ABSTRACT);
        }
        Some(PartialRole::Definition { implementation_ok: false })
            if effective.contains(Modifiers::ABSTRACT) =>
        {
            strip(&mut effective, codes::PARTIAL_DEFINITION_ABSTRACT, Modifiers::ABSTRACT);
        }
        _ => {}
    }
    if matches!(shape.container, DefKind::Class)
        && effective.contains(Modifiers::ABSTRACT)
        && !shape.container_modifiers.contains(TypeModifiers::ABSTRACT)
    {
        strip(&mut effective, codes::ABSTRACT_IN_NON_ABSTRACT_TYPE, Modifiers::ABSTRACT);
    }

    // A body-less interface member is implicitly abstract unless something
    // written rules that out.
    let implementable = shape.kind.is_implementable() && !matches!(shape.kind, MemberKind::Accessor(_));
    let implied_abstract = interface
        && !shape.is_explicit
        && implementable
        && !shape.has_body
        && !effective.intersects(
            Modifiers::EXTERN
                | Modifiers::SEALED
                | Modifiers::VIRTUAL
                | Modifiers::PRIVATE
                | Modifiers::STATIC,
        );

    // Body and containment rules.
    let requires_body = matches!(
        shape.kind,
        MemberKind::Method | MemberKind::Operator(_) | MemberKind::Constructor
    );
    if requires_body
        && !shape.has_body
        && !implied_abstract
        && !effective.intersects(Modifiers::ABSTRACT | Modifiers::EXTERN | Modifiers::PARTIAL)
    {
        conflicts.push(ModifierConflict::new(codes::MISSING_BODY, Modifiers::empty()));
    }
    if interface && !effective.contains(Modifiers::STATIC) {
        match shape.kind {
            MemberKind::Field => conflicts.push(ModifierConflict::new(
                codes::INTERFACE_INSTANCE_FIELD,
                Modifiers::empty(),
            )),
            MemberKind::Constructor => conflicts.push(ModifierConflict::new(
                codes::INTERFACE_INSTANCE_CONSTRUCTOR,
                Modifiers::empty(),
            )),
            _ => {}
        }
    }
    if shape.container_modifiers.contains(TypeModifiers::STATIC)
        && !effective.contains(Modifiers::STATIC)
        && !matches!(shape.kind, MemberKind::Accessor(_))
    {
        conflicts.push(ModifierConflict::new(
            codes::INSTANCE_MEMBER_IN_STATIC_TYPE,
            Modifiers::empty(),
        ));
    }

    // Implied dispatch modifiers.
    if implied_abstract {
        effective |= Modifiers::ABSTRACT;
    } else if interface
        && !shape.is_explicit
        && implementable
        && shape.has_body
        && !effective.intersects(
            Modifiers::STATIC | Modifiers::SEALED | Modifiers::PRIVATE | Modifiers::ABSTRACT,
        )
    {
        effective |= Modifiers::VIRTUAL;
    }

    // Capability gates keep the gated modifier.
    if interface {
        let static_contract = effective.contains(Modifiers::STATIC)
            && effective.intersects(Modifiers::ABSTRACT | Modifiers::VIRTUAL)
            && implementable;
        let feature = if static_contract {
            Some(LanguageFeature::StaticAbstractMembersInInterfaces)
        } else if shape.has_body || !declared.difference(Modifiers::NEW).is_empty() {
            Some(LanguageFeature::DefaultInterfaceImplementation)
        } else {
            None
        };
        if let Some(feature) = feature {
            if !capabilities.language_version.supports(feature) {
                conflicts.push(ModifierConflict {
                    code: codes::FEATURE_NOT_AVAILABLE,
                    modifier: Modifiers::empty(),
                    feature: Some(feature),
                });
            }
            if !capabilities.runtime_supports(feature) {
                conflicts.push(ModifierConflict {
                    code: codes::RUNTIME_NOT_SUPPORTED,
                    modifier: Modifiers::empty(),
                    feature: Some(feature),
                });
            }
        }
    }

    ModifierOutcome {
        effective,
        slot: SlotKind::from_modifiers(effective, shape.is_explicit),
        conflicts,
    }
}

/// Accessors take their owner's effective modifiers, with the access level
/// replaced when the accessor declares its own.
pub fn accessor_modifiers(
    owner: Modifiers,
    tokens: &[Modifiers],
) -> (Modifiers, SmallVec<[ModifierConflict; 2]>) {
    let mut conflicts = SmallVec::new();
    let mut access = Modifiers::empty();
    for &token in tokens {
        if Modifiers::ACCESS.contains(token) {
            access |= token;
        } else {
            conflicts.push(ModifierConflict::new(codes::MODIFIER_NOT_VALID, token));
        }
    }
    let effective = if access.is_empty() {
        owner
    } else {
        owner.difference(Modifiers::ACCESS) | access
    };
    (effective, conflicts)
}

#[cfg(test)]
#[path = "tests/modifiers_tests.rs"]
mod tests;
