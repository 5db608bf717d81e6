//! Language and runtime capability levels.
//!
//! A [`Capabilities`] value is the snapshot every validator and every
//! implementation-map cache entry is keyed by. Language features map to the
//! minimum [`LanguageVersion`] that enables them; runtime features are an
//! independent bit set describing what the target runtime can dispatch.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language version, ordered from oldest to newest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageVersion {
    #[serde(rename = "7.3")]
    V7_3,
    #[serde(rename = "8")]
    V8,
    #[serde(rename = "9")]
    V9,
    #[serde(rename = "10")]
    V10,
    #[serde(rename = "11")]
    V11,
    #[serde(rename = "preview")]
    Preview,
}

impl LanguageVersion {
    pub const LATEST: Self = Self::V11;

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V7_3 => "7.3",
            Self::V8 => "8",
            Self::V9 => "9",
            Self::V10 => "10",
            Self::V11 => "11",
            Self::Preview => "preview",
        }
    }

    /// Returns `true` if `feature` is available at this version.
    pub fn supports(self, feature: LanguageFeature) -> bool {
        self >= feature.required_version()
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a language version string is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownLanguageVersion(pub String);

impl fmt::Display for UnknownLanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language version '{}'", self.0)
    }
}

impl std::error::Error for UnknownLanguageVersion {}

impl FromStr for LanguageVersion {
    type Err = UnknownLanguageVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7.3" => Ok(Self::V7_3),
            "8" | "8.0" => Ok(Self::V8),
            "9" | "9.0" => Ok(Self::V9),
            "10" | "10.0" => Ok(Self::V10),
            "11" | "11.0" | "latest" => Ok(Self::V11),
            "preview" => Ok(Self::Preview),
            other => Err(UnknownLanguageVersion(other.to_string())),
        }
    }
}

/// Language features gated by a minimum [`LanguageVersion`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageFeature {
    /// Bodies, explicit `abstract`/`virtual`/`sealed` and non-public access on
    /// interface members.
    DefaultInterfaceImplementation,
    /// `static abstract` / `static virtual` interface members.
    StaticAbstractMembersInInterfaces,
}

impl LanguageFeature {
    pub const fn required_version(self) -> LanguageVersion {
        match self {
            Self::DefaultInterfaceImplementation => LanguageVersion::V8,
            Self::StaticAbstractMembersInInterfaces => LanguageVersion::V11,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::DefaultInterfaceImplementation => "default interface implementation",
            Self::StaticAbstractMembersInInterfaces => "static abstract members in interfaces",
        }
    }

    /// The runtime capability the feature additionally needs, if any.
    pub const fn runtime_requirement(self) -> RuntimeFeatures {
        match self {
            Self::DefaultInterfaceImplementation => RuntimeFeatures::DEFAULT_INTERFACE_IMPLEMENTATION,
            Self::StaticAbstractMembersInInterfaces => {
                RuntimeFeatures::STATIC_ABSTRACT_MEMBERS_IN_INTERFACES
            }
        }
    }
}

impl fmt::Display for LanguageFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

bitflags! {
    /// Dispatch capabilities of the target runtime.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RuntimeFeatures: u32 {
        const DEFAULT_INTERFACE_IMPLEMENTATION = 1 << 0;
        const STATIC_ABSTRACT_MEMBERS_IN_INTERFACES = 1 << 1;
    }
}

impl RuntimeFeatures {
    /// Parse a single feature name as written on the command line or in an
    /// options file (`default-interface-implementation`, `static-abstract-members`).
    pub fn from_feature_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "default-interface-implementation" | "dim" => {
                Some(Self::DEFAULT_INTERFACE_IMPLEMENTATION)
            }
            "static-abstract-members" | "static-abstract-members-in-interfaces" => {
                Some(Self::STATIC_ABSTRACT_MEMBERS_IN_INTERFACES)
            }
            _ => None,
        }
    }
}

impl Default for RuntimeFeatures {
    fn default() -> Self {
        Self::all()
    }
}

/// Capability snapshot for one compilation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[serde(default)]
    pub language_version: LanguageVersion,
    #[serde(default)]
    pub runtime_features: RuntimeFeatures,
}

impl Capabilities {
    pub const fn new(language_version: LanguageVersion, runtime_features: RuntimeFeatures) -> Self {
        Self {
            language_version,
            runtime_features,
        }
    }

    /// Returns `true` when both the language version and the runtime support `feature`.
    pub fn allows(self, feature: LanguageFeature) -> bool {
        self.language_version.supports(feature)
            && self.runtime_features.contains(feature.runtime_requirement())
    }

    pub fn runtime_supports(self, feature: LanguageFeature) -> bool {
        self.runtime_features.contains(feature.runtime_requirement())
    }
}

#[cfg(test)]
#[path = "tests/capabilities_tests.rs"]
mod tests;
