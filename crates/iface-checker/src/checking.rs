//! Whole-compilation check pass.
//!
//! Runs every declaration-level validator over every type and collects the
//! results. Non-fatal diagnostics accumulate; a malformed hierarchy stops
//! map construction for the affected type only.

use crate::context::Compilation;
use crate::operators::{ShortCircuitAdvisory, check_operators, short_circuit_advisories};
use iface_solver::{HierarchyFault, PendingDiagnostic, codes, check_interface_variance};
use tracing::{debug, trace};

#[derive(Clone, Debug, Default)]
pub struct CheckOutput {
    /// Binder diagnostics first, then per-type diagnostics in declaration
    /// order.
    pub diagnostics: Vec<PendingDiagnostic>,
    pub advisories: Vec<ShortCircuitAdvisory>,
}

impl CheckOutput {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|diag| diag.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(PendingDiagnostic::is_error)
    }
}

pub fn check_compilation(compilation: &Compilation) -> CheckOutput {
    let program = compilation.program();
    let gate = compilation.constraint_gate();
    let mut output = CheckOutput {
        diagnostics: compilation.bind_diagnostics().to_vec(),
        advisories: Vec::new(),
    };

    for decl in program.defs() {
        let def = decl.id;
        trace!(def = def.0, name = %decl.name, "check_compilation: type");

        let interface_cycle = program.has_interface_cycle(def);
        if interface_cycle {
            output.diagnostics.push(
                PendingDiagnostic::error(codes::MALFORMED_HIERARCHY, vec![decl.self_type.into()])
                    .at_def(def),
            );
        }

        output.diagnostics.extend(check_operators(program, def));
        if decl.is_interface() {
            output
                .diagnostics
                .extend(check_interface_variance(program, def));
        }
        output.diagnostics.extend(gate.check_declaration(def));

        match compilation.implementation_map_for_def(def) {
            Ok(map) => output.diagnostics.extend(map.diagnostics().iter().cloned()),
            Err(malformed) => {
                debug!(def = def.0, fault = ?malformed.fault, "check_compilation: malformed hierarchy");
                // A cyclic interface list was already reported above.
                if !(interface_cycle && malformed.fault == HierarchyFault::Cycle) {
                    output.diagnostics.push(
                        PendingDiagnostic::error(
                            codes::MALFORMED_HIERARCHY,
                            vec![decl.self_type.into()],
                        )
                        .at_def(def),
                    );
                }
            }
        }

        output.advisories.extend(short_circuit_advisories(program, def));
    }

    debug!(
        types = program.defs().len(),
        diagnostics = output.diagnostics.len(),
        advisories = output.advisories.len(),
        "check_compilation: done"
    );
    output
}
