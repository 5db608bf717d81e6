//! Centralized limits and thresholds for hierarchy walks.
//!
//! Every recursive walk in the engine (base-class chains, interface closures,
//! type-parameter constraint chains) is bounded by one of these constants in
//! addition to its cycle detection. Well-formed programs never get close to
//! them; hitting one means the input hierarchy is malformed.

/// Maximum number of base-class levels walked from an implementing type.
///
/// Exceeding this depth is reported the same way as a base-type cycle: as a
/// malformed hierarchy for the affected type only.
pub const MAX_BASE_CHAIN_DEPTH: u32 = 256;

/// Maximum nesting depth when collecting the transitive interface set of a type.
pub const MAX_INTERFACE_CLOSURE_DEPTH: u32 = 128;

/// Maximum depth when following `T : U`, `U : I<...>` constraint chains.
pub const MAX_CONSTRAINT_CHAIN_DEPTH: u32 = 64;

/// Maximum depth when walking nested generic arguments of a single type occurrence.
///
/// Used by the variance checker and by type substitution.
pub const MAX_TYPE_NESTING_DEPTH: u32 = 100;

/// Total enter attempts allowed for one guarded walk.
pub const MAX_WALK_ITERATIONS: u32 = 100_000;
