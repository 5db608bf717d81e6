//! Interface implementation checking.
//!
//! - `operators`: shape rules for user-defined operators
//! - `matching` (internal): the member matching engine that fills an
//!   [`ImplementationMap`] for one implementing type
//! - `stubs`: forwarding stubs for annotation and locality mismatches
//! - `context`: [`Compilation`], which owns the bound program and memoizes
//!   implementation maps per `(type, capabilities)`
//! - `receiver`: whether a member reference is usable in its syntactic
//!   position
//! - `checking`: the whole-compilation pass that collects every diagnostic

pub mod checking;
pub mod context;
pub mod implementation_map;
mod matching;
pub mod operators;
pub mod receiver;
pub mod stubs;

pub use checking::{CheckOutput, check_compilation};
pub use context::{Compilation, MapResult};
pub use implementation_map::{
    EmittedImplementation, Implementation, ImplementationMap, ImplementationVia, InterfaceSlot,
    MapEntry, Resolution, Unimplemented, UnimplementedKind,
};
pub use operators::{ShortCircuitAdvisory, check_operator, check_operators, short_circuit_advisories};
pub use receiver::{ReceiverContext, is_usable_as_receiver};
pub use stubs::{ForwardingStub, StubReason, synthesize_stub};
