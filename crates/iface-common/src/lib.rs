//! Common types and utilities for the iface interface-resolution engine.
//!
//! This crate provides foundational types used across all iface crates:
//! - Diagnostic codes, message templates and the rendered `Diagnostic`
//! - Language and runtime capability levels (`LanguageVersion`, `RuntimeFeatures`)
//! - Centralized limits for recursive walks over type hierarchies

// Capability snapshot - language version and runtime features
pub mod capabilities;
pub use capabilities::{Capabilities, LanguageFeature, LanguageVersion, RuntimeFeatures};

// Centralized limits and thresholds
pub mod limits;

// Diagnostic data tables and rendered diagnostics
pub mod diagnostics;
pub use diagnostics::{
    DIAGNOSTIC_MESSAGES, Diagnostic, DiagnosticCategory, DiagnosticMessage,
    DiagnosticRelatedInformation, diagnostic_codes, diagnostic_messages, format_message,
    get_message_template,
};
