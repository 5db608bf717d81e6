//! Loading a compilation unit and running the check pass over it.

use anyhow::{Context, Result};
use iface_binder::CompilationUnit;
use iface_checker::{
    CheckOutput, Compilation, EmittedImplementation, ImplementationMap, Resolution,
    check_compilation,
};
use iface_common::{Capabilities, RuntimeFeatures};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info_span};

use crate::args::CheckArgs;

/// Everything one `iface check` invocation produced.
pub struct CheckRun {
    pub compilation: Compilation,
    pub output: CheckOutput,
}

pub fn load_unit(path: &Path) -> Result<CompilationUnit> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    CompilationUnit::from_json(&text)
        .with_context(|| format!("failed to parse compilation unit {}", path.display()))
}

/// The unit's own options with command-line overrides applied on top.
pub fn resolve_capabilities(unit: &CompilationUnit, args: &CheckArgs) -> Capabilities {
    let mut capabilities = unit.options.unwrap_or_default();
    if let Some(version) = args.lang_version {
        capabilities.language_version = version;
    }
    if args.no_runtime_features || !args.runtime_features.is_empty() {
        capabilities.runtime_features = args
            .runtime_features
            .iter()
            .fold(RuntimeFeatures::empty(), |acc, &feature| acc | feature);
    }
    capabilities
}

pub fn check(unit: &CompilationUnit, capabilities: Capabilities) -> CheckRun {
    let _span = info_span!("check", types = unit.types.len()).entered();
    let compilation = Compilation::with_capabilities(unit, capabilities);
    let output = check_compilation(&compilation);
    debug!(
        diagnostics = output.diagnostics.len(),
        errors = output.error_count(),
        "check finished"
    );
    CheckRun {
        compilation,
        output,
    }
}

pub fn run_check(args: &CheckArgs) -> Result<CheckRun> {
    let unit = load_unit(&args.unit)?;
    let capabilities = resolve_capabilities(&unit, args);
    debug!(
        version = %capabilities.language_version,
        runtime = ?capabilities.runtime_features,
        "capabilities"
    );
    Ok(check(&unit, capabilities))
}

// =============================================================================
// Implementation map views
// =============================================================================

/// One implementing type's map, formatted for output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub malformed: Option<String>,
    pub slots: Vec<SlotView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub slot: String,
    pub resolution: ResolutionView,
    /// What emission binds the slot to; absent for inherited and
    /// unresolved slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emitted: Option<EmittedView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResolutionView {
    Resolved {
        member: String,
        via: &'static str,
    },
    Unresolved {
        reason: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        closest: Option<String>,
    },
    SplitAccessors,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EmittedView {
    Member {
        member: String,
    },
    Stub {
        name: String,
        target: String,
        reason: &'static str,
    },
}

/// Maps for every class and struct in declaration order. Interfaces have
/// nothing to emit and are skipped.
pub fn map_views(compilation: &Compilation) -> Vec<MapView> {
    let program = compilation.program();
    let formatter = compilation.formatter();
    let types = formatter.types();
    program
        .defs()
        .iter()
        .filter(|def| !def.is_interface())
        .map(|def| {
            let type_name = types.format_def(def.id);
            match compilation.implementation_map_for_def(def.id) {
                Ok(map) => MapView {
                    type_name,
                    malformed: None,
                    slots: slot_views(compilation, &map),
                },
                Err(malformed) => MapView {
                    type_name,
                    malformed: Some(malformed.to_string()),
                    slots: Vec::new(),
                },
            }
        })
        .collect()
}

fn slot_views(compilation: &Compilation, map: &ImplementationMap) -> Vec<SlotView> {
    let formatter = compilation.formatter();
    let types = formatter.types();
    map.entries()
        .map(|(slot, entry)| {
            let resolution = match entry.resolution {
                Resolution::Resolved(implementation) => ResolutionView::Resolved {
                    member: types.format_member(implementation.member),
                    via: implementation.via.describe(),
                },
                Resolution::Unresolved(unimplemented) => ResolutionView::Unresolved {
                    reason: unimplemented.kind.describe(),
                    closest: unimplemented.closest.map(|id| types.format_member(id)),
                },
                Resolution::SplitAccessors => ResolutionView::SplitAccessors,
            };
            let emitted = entry.emitted.as_ref().map(|emitted| match emitted {
                EmittedImplementation::Member(id) => EmittedView::Member {
                    member: types.format_member(*id),
                },
                EmittedImplementation::Stub(stub) => EmittedView::Stub {
                    name: stub.name.clone(),
                    target: types.format_member(stub.target),
                    reason: stub.reason.describe(),
                },
            });
            SlotView {
                slot: types.format_slot(slot.interface, slot.member),
                resolution,
                emitted,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;
