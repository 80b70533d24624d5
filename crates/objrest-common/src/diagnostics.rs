//! Diagnostic Infrastructure
//!
//! Numbered diagnostics reported by the object rest/spread pass. Library code
//! never prints; it returns errors that convert into a [`Diagnostic`], and the
//! command-line reporter decides how to render them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl DiagnosticCategory {
    /// Get the category name for display.
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Message => "message",
        }
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const USE_BUILT_INS_MUST_BE_BOOLEAN: u32 = 9001;
    pub const PLUGIN_OPTIONS_MUST_BE_AN_OBJECT: u32 = 9002;
    pub const REST_ELEMENT_MUST_BE_LAST: u32 = 9101;
    pub const ONLY_ONE_REST_ELEMENT_PER_PATTERN: u32 = 9102;
    pub const TRAVERSAL_DID_NOT_CONVERGE: u32 = 9201;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const USE_BUILT_INS_MUST_BE_BOOLEAN: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::USE_BUILT_INS_MUST_BE_BOOLEAN,
        category: DiagnosticCategory::Error,
        message: "transform-object-rest-spread only accepts a boolean for '{0}' (defaults to false), found {1}.",
    };

    pub const PLUGIN_OPTIONS_MUST_BE_AN_OBJECT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::PLUGIN_OPTIONS_MUST_BE_AN_OBJECT,
        category: DiagnosticCategory::Error,
        message: "transform-object-rest-spread options must be an object, found {0}.",
    };

    pub const REST_ELEMENT_MUST_BE_LAST: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::REST_ELEMENT_MUST_BE_LAST,
        category: DiagnosticCategory::Error,
        message: "A rest element must be last in an object pattern (node {0}).",
    };

    pub const ONLY_ONE_REST_ELEMENT_PER_PATTERN: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::ONLY_ONE_REST_ELEMENT_PER_PATTERN,
        category: DiagnosticCategory::Error,
        message: "An object pattern may contain at most one rest element (node {0}).",
    };

    pub const TRAVERSAL_DID_NOT_CONVERGE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TRAVERSAL_DID_NOT_CONVERGE,
        category: DiagnosticCategory::Error,
        message: "Object rest/spread lowering did not reach a fixed point after {0} visits.",
    };

    pub const ALL: &[DiagnosticMessage] = &[
        USE_BUILT_INS_MUST_BE_BOOLEAN,
        PLUGIN_OPTIONS_MUST_BE_AN_OBJECT,
        REST_ELEMENT_MUST_BE_LAST,
        ONLY_ONE_REST_ELEMENT_PER_PATTERN,
        TRAVERSAL_DID_NOT_CONVERGE,
    ];
}

/// A diagnostic message with severity and error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            message_text: message.into(),
        }
    }

    /// Instantiate a message template with positional arguments.
    pub fn from_message(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            category: message.category,
            code: message.code,
            message_text: format_message(message.message, args),
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} OR{}: {}", self.category, self.code, self.message_text)
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    diagnostic_messages::ALL
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
