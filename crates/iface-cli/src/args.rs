use clap::{Args, Parser, Subcommand, ValueEnum};
use iface_common::{LanguageVersion, RuntimeFeatures};
use std::path::PathBuf;

/// CLI arguments for the iface binary.
#[derive(Parser, Debug)]
#[command(
    name = "iface",
    version,
    about = "Interface member contracts and implementation resolution"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bind a JSON compilation unit, check it and report diagnostics.
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the compilation unit (JSON declaration records).
    pub unit: PathBuf,

    // ==================== Capabilities ====================
    /// Language version to check against (7.3, 8, 9, 10, 11, preview or latest).
    /// Overrides `options.languageVersion` in the unit.
    #[arg(long = "lang-version", alias = "langversion")]
    pub lang_version: Option<LanguageVersion>,

    /// Runtime feature the target supports. Repeatable; when given, replaces
    /// the unit's runtime feature set.
    #[arg(long = "runtime-feature", value_parser = parse_runtime_feature)]
    pub runtime_features: Vec<RuntimeFeatures>,

    /// Target a runtime with no optional features.
    #[arg(long = "no-runtime-features")]
    pub no_runtime_features: bool,

    // ==================== Output ====================
    /// Output format for diagnostics and maps.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// Also print every type's implementation map as emission sees it.
    #[arg(long = "emit-map")]
    pub emit_map: bool,

    /// Color text output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn parse_runtime_feature(value: &str) -> Result<RuntimeFeatures, String> {
    RuntimeFeatures::from_feature_name(value).ok_or_else(|| {
        format!(
            "unknown runtime feature '{value}' (expected default-interface-implementation or static-abstract-members)"
        )
    })
}

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod tests;
