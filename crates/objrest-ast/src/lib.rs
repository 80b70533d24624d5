//! Arena syntax tree for the objrest workspace.
//!
//! This crate provides:
//! - `Node` / `NodeKind` - the closed set of JavaScript node shapes the pass touches
//! - `NodeArena` - index-based storage with parent links and in-place rewriting
//! - Factory helpers on `NodeArena` for building trees bottom-up
//! - `UniqueNames` - fresh `_ref`-style binding names
//! - `Printer` - JavaScript text output
//! - `estree` - loading ESTree JSON documents

pub mod node;
pub use node::{DeclarationKind, FunctionData, FunctionKind, Node, NodeIndex, NodeKind, PropertyData};

pub mod arena;
pub use arena::NodeArena;

mod factory;

pub mod names;
pub use names::UniqueNames;

pub mod printer;
pub use printer::Printer;

pub mod estree;
pub use estree::{EstreeError, load_program, load_program_value};
