//! Common types and utilities for the objrest workspace.
//!
//! This crate provides foundational types used across all objrest crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, numbered message templates)
//! - Centralized limits for traversal and recursion

// Diagnostic model shared by the transform and the CLI reporter
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, diagnostic_codes, diagnostic_messages,
    format_message,
};

// Centralized limits and thresholds
pub mod limits;
