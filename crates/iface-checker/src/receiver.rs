//! Receiver usability: whether a member reference is valid in the syntactic
//! position the expression binder found it in.

use iface_solver::{
    DefKind, DiagnosticArg, MemberId, Modifiers, PendingDiagnostic, Program, TypeId, TypeParamId,
    codes,
};
use tracing::trace;

/// What a member access is qualified with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReceiverContext {
    /// An expression of the given static type: `x.M()`.
    Instance(TypeId),
    /// A type name: `C.M()`, `I.M()`.
    TypeName(TypeId),
    /// A type parameter: `T.M()`.
    TypeParameter(TypeParamId),
}

/// Static interface members that dispatch through the constraint path.
fn dispatches_through_constraint(program: &Program, member: MemberId) -> bool {
    let member = program.member(member);
    matches!(member.container, DefKind::Interface)
        && member.is_static()
        && (member.has_static_contract() || member.modifiers.contains(Modifiers::VIRTUAL))
}

pub fn is_usable_as_receiver(
    program: &Program,
    member: MemberId,
    context: ReceiverContext,
) -> Result<(), PendingDiagnostic> {
    let declared = program.member(member);
    let result = if dispatches_through_constraint(program, member) {
        match context {
            ReceiverContext::TypeParameter(param) => {
                let interface = declared.declaring;
                let constrained = program
                    .constraint_closure(param)
                    .into_iter()
                    .any(|ty| program.def_of(ty).is_some_and(|def| def.id == interface));
                if constrained {
                    Ok(())
                } else {
                    Err(PendingDiagnostic::error(
                        codes::TYPE_PARAMETER_NOT_CONSTRAINED_TO_INTERFACE,
                        vec![member.into(), param.into(), DiagnosticArg::Def(interface)],
                    ))
                }
            }
            ReceiverContext::Instance(_) | ReceiverContext::TypeName(_) => Err(
                PendingDiagnostic::error(
                    codes::STATIC_CONTRACT_ACCESS_REQUIRES_TYPE_PARAMETER,
                    vec![member.into()],
                ),
            ),
        }
    } else if declared.is_static() {
        match context {
            ReceiverContext::TypeName(_) => Ok(()),
            ReceiverContext::Instance(_) => Err(PendingDiagnostic::error(
                codes::STATIC_MEMBER_THROUGH_INSTANCE,
                vec![member.into()],
            )),
            ReceiverContext::TypeParameter(param) => Err(PendingDiagnostic::error(
                codes::NON_VIRTUAL_STATIC_THROUGH_TYPE_PARAMETER,
                vec![member.into(), param.into()],
            )),
        }
    } else {
        match context {
            ReceiverContext::Instance(_) => Ok(()),
            ReceiverContext::TypeName(_) | ReceiverContext::TypeParameter(_) => {
                Err(PendingDiagnostic::error(
                    codes::INSTANCE_MEMBER_WITHOUT_INSTANCE,
                    vec![member.into()],
                ))
            }
        }
    };
    if let Err(diag) = &result {
        trace!(member = member.0, ?context, code = diag.code, "receiver rejected");
    }
    result
}

#[cfg(test)]
#[path = "tests/receiver_tests.rs"]
mod tests;
