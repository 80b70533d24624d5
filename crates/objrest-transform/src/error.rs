//! Errors raised by the object rest/spread pass.

use objrest_ast::NodeIndex;
use objrest_common::{Diagnostic, diagnostic_codes, diagnostic_messages};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// `useBuiltIns` was present but not a boolean.
    InvalidOption { option: String, found: String },
    /// The plugin options value was not a JSON object.
    InvalidOptions { found: String },
    /// A rest element that is not the final entry of its object pattern.
    MisplacedRestElement { rest: NodeIndex },
    /// More than one rest element in a single object pattern.
    DuplicateRestElement { pattern: NodeIndex },
    /// The traversal worklist kept growing past the visit limit.
    DidNotConverge { visits: usize },
}

impl TransformError {
    pub fn code(&self) -> u32 {
        match self {
            TransformError::InvalidOption { .. } => diagnostic_codes::USE_BUILT_INS_MUST_BE_BOOLEAN,
            TransformError::InvalidOptions { .. } => {
                diagnostic_codes::PLUGIN_OPTIONS_MUST_BE_AN_OBJECT
            }
            TransformError::MisplacedRestElement { .. } => {
                diagnostic_codes::REST_ELEMENT_MUST_BE_LAST
            }
            TransformError::DuplicateRestElement { .. } => {
                diagnostic_codes::ONLY_ONE_REST_ELEMENT_PER_PATTERN
            }
            TransformError::DidNotConverge { .. } => diagnostic_codes::TRAVERSAL_DID_NOT_CONVERGE,
        }
    }

    /// Configuration errors are caused by the caller; everything else is a
    /// broken structural assumption about the input tree.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TransformError::InvalidOption { .. } | TransformError::InvalidOptions { .. }
        )
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            TransformError::InvalidOption { option, found } => Diagnostic::from_message(
                &diagnostic_messages::USE_BUILT_INS_MUST_BE_BOOLEAN,
                &[option.as_str(), found.as_str()],
            ),
            TransformError::InvalidOptions { found } => Diagnostic::from_message(
                &diagnostic_messages::PLUGIN_OPTIONS_MUST_BE_AN_OBJECT,
                &[found.as_str()],
            ),
            TransformError::MisplacedRestElement { rest } => Diagnostic::from_message(
                &diagnostic_messages::REST_ELEMENT_MUST_BE_LAST,
                &[rest.to_string().as_str()],
            ),
            TransformError::DuplicateRestElement { pattern } => Diagnostic::from_message(
                &diagnostic_messages::ONLY_ONE_REST_ELEMENT_PER_PATTERN,
                &[pattern.to_string().as_str()],
            ),
            TransformError::DidNotConverge { visits } => Diagnostic::from_message(
                &diagnostic_messages::TRAVERSAL_DID_NOT_CONVERGE,
                &[visits.to_string().as_str()],
            ),
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_diagnostic().message_text)
    }
}

impl std::error::Error for TransformError {}
