use anyhow::Result;
use colored::Colorize;
use iface_checker::{CheckOutput, Compilation, ShortCircuitAdvisory};
use iface_common::{Capabilities, Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};
use serde::Serialize;
use std::io::Write;

use crate::args::{CheckArgs, OutputFormat};
use crate::driver::{CheckRun, EmittedView, MapView, ResolutionView, SlotView, map_views};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    /// `C.M - error IF2004: message`, followed by one indented line per
    /// related entry.
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        output.push_str(&self.format_location(&diagnostic.location));
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic.code));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    fn format_related(&self, related: &DiagnosticRelatedInformation) -> String {
        format!(
            "  {} - {}",
            self.format_location(&related.location),
            related.message_text
        )
    }

    fn format_location(&self, location: &str) -> String {
        let location = if location.is_empty() {
            "<unit>"
        } else {
            location
        };
        if self.color {
            location.cyan().to_string()
        } else {
            location.to_string()
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion | DiagnosticCategory::Message => {
                label.blue().to_string()
            }
        }
    }

    fn format_code(&self, code: u32) -> String {
        let code = format!("IF{code}");
        if self.color {
            code.dimmed().to_string()
        } else {
            code
        }
    }

    pub fn format_advisory(
        &self,
        compilation: &Compilation,
        advisory: &ShortCircuitAdvisory,
    ) -> String {
        let (location, message) = advisory_text(compilation, advisory);
        let note = if self.color {
            "note".blue().to_string()
        } else {
            "note".to_string()
        };
        format!("{} - {note}: {message}", self.format_location(&location))
    }

    pub fn render_maps(&self, maps: &[MapView]) -> String {
        let mut out = String::new();
        for (index, map) in maps.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let header = if self.color {
                map.type_name.bold().to_string()
            } else {
                map.type_name.clone()
            };
            out.push_str(&header);
            if let Some(malformed) = &map.malformed {
                out.push_str(&format!(" (malformed: {malformed})"));
            } else if map.slots.is_empty() {
                out.push_str(" (no interface slots)");
            }
            for slot in &map.slots {
                out.push('\n');
                out.push_str(&self.format_slot(slot));
            }
        }
        out
    }

    fn format_slot(&self, slot: &SlotView) -> String {
        let target = match (&slot.resolution, &slot.emitted) {
            (_, Some(EmittedView::Stub { name, target, reason })) => {
                let marker = format!("stub {name}");
                let marker = if self.color {
                    marker.magenta().to_string()
                } else {
                    marker
                };
                format!("{marker} -> {target} [{reason}]")
            }
            (ResolutionView::Resolved { via, .. }, Some(EmittedView::Member { member })) => {
                format!("{member} [{via}]")
            }
            (ResolutionView::Resolved { member, via }, None) => {
                format!("{member} [{via}, not emitted]")
            }
            (ResolutionView::Unresolved { reason, closest }, _) => {
                let text = match closest {
                    Some(closest) => format!("unimplemented ({reason}, closest {closest})"),
                    None => format!("unimplemented ({reason})"),
                };
                if self.color {
                    text.red().to_string()
                } else {
                    text
                }
            }
            (ResolutionView::SplitAccessors, _) => "accessors split across owners".to_string(),
        };
        format!("  {} => {target}", slot.slot)
    }

    pub fn summary(&self, output: &CheckOutput) -> String {
        match output.error_count() {
            0 => String::new(),
            1 => "Found 1 error.".to_string(),
            n => format!("Found {n} errors."),
        }
    }
}

fn advisory_text(compilation: &Compilation, advisory: &ShortCircuitAdvisory) -> (String, String) {
    let formatter = compilation.formatter();
    let types = formatter.types();
    let interface = types.format_def(advisory.interface);
    let operator = types.format_member(advisory.operator);
    (
        interface.clone(),
        format!(
            "'{operator}' cannot be used in '&&' or '||' because '{interface}' declares neither 'true' nor 'false'."
        ),
    )
}

// =============================================================================
// JSON
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    capabilities: Capabilities,
    error_count: usize,
    diagnostics: &'a [Diagnostic],
    advisories: Vec<JsonAdvisory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maps: Option<&'a [MapView]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonAdvisory {
    location: String,
    message_text: String,
}

pub fn render_json(
    compilation: &Compilation,
    output: &CheckOutput,
    diagnostics: &[Diagnostic],
    maps: Option<&[MapView]>,
) -> Result<String, serde_json::Error> {
    let advisories = output
        .advisories
        .iter()
        .map(|advisory| {
            let (location, message_text) = advisory_text(compilation, advisory);
            JsonAdvisory {
                location,
                message_text,
            }
        })
        .collect();
    let report = JsonReport {
        capabilities: compilation.capabilities(),
        error_count: output.error_count(),
        diagnostics,
        advisories,
        maps,
    };
    serde_json::to_string_pretty(&report)
}

/// Write the full report for `run` in the format `args` asks for.
pub fn write_report(
    run: &CheckRun,
    args: &CheckArgs,
    color: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let diagnostics = run.compilation.formatter().render_all(&run.output.diagnostics);
    let maps = args.emit_map.then(|| map_views(&run.compilation));

    match args.format {
        OutputFormat::Json => {
            let json = render_json(&run.compilation, &run.output, &diagnostics, maps.as_deref())?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Text => {
            let reporter = Reporter::new(color);
            if !diagnostics.is_empty() {
                writeln!(out, "{}", reporter.render(&diagnostics))?;
            }
            for advisory in &run.output.advisories {
                writeln!(out, "{}", reporter.format_advisory(&run.compilation, advisory))?;
            }
            if let Some(maps) = &maps {
                if !diagnostics.is_empty() || !run.output.advisories.is_empty() {
                    writeln!(out)?;
                }
                writeln!(out, "{}", reporter.render_maps(maps))?;
            }
            let summary = reporter.summary(&run.output);
            if !summary.is_empty() {
                writeln!(out, "\n{summary}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod tests;
