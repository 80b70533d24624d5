//! objrest: object rest/spread lowering with an ESTree command-line driver.
//!
//! The pass itself lives in [`objrest_transform`]; this crate wires it to
//! ESTree JSON input, JavaScript output and the `objrest` binary.

pub use objrest_ast as ast;
pub use objrest_common as common;
pub use objrest_transform as transform;

#[cfg(feature = "cli")]
pub mod cli;
pub mod tracing_config;
