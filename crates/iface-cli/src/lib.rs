//! The `iface` command-line driver.
//!
//! `iface check <unit.json>` binds a JSON compilation unit under the
//! capabilities its `options` and the command line select, runs the whole
//! check pass and prints diagnostics as text or JSON. `--emit-map` adds each
//! class and struct's implementation map with forwarding stubs marked.

pub mod args;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
