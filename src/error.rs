// Kernel Errors - the two failure kinds every identifier can raise
//
// Required: a mandatory component is missing (blank string, absent value)
// Format:   a component is present but breaks a grammar, range or vocabulary

use thiserror::Error;

/// Validation failure raised while constructing or parsing a kernel value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// A required component is absent or blank.
    #[error("{field} cannot be null or blank")]
    Required { field: &'static str },

    /// A component is present but malformed.
    #[error("{0}")]
    Format(String),
}

impl KernelError {
    pub(crate) fn required(field: &'static str) -> Self {
        KernelError::Required { field }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        KernelError::Format(message.into())
    }

    /// True for the "required value absent" kind.
    pub fn is_required(&self) -> bool {
        matches!(self, KernelError::Required { .. })
    }
}

pub type Result<T> = std::result::Result<T, KernelError>;
