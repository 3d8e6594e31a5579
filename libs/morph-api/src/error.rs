use std::fmt;

use crate::descriptor::TypeDescriptor;

/// Error produced by a conversion function itself (rule, catalog entry, upcast).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error kind for conversion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing in the converter chain handles the type pair.
    NoApplicableConversion,
    /// A matched function failed when applied.
    FunctionFailure,
    /// Rule rejected at construction time.
    AmbiguousRule,
    /// No source value and no default value.
    MissingValue,
    /// A converter produced a value of an unexpected type.
    TypeMismatch,
    /// Invalid configuration.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NoApplicableConversion => f.write_str("no applicable conversion"),
            ErrorKind::FunctionFailure => f.write_str("function failure"),
            ErrorKind::AmbiguousRule => f.write_str("ambiguous rule"),
            ErrorKind::MissingValue => f.write_str("missing value"),
            ErrorKind::TypeMismatch => f.write_str("type mismatch"),
            ErrorKind::Config => f.write_str("config"),
        }
    }
}

/// Conversion error returned by every `Convert` implementation.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("no applicable conversion from {from} to {to}")]
    NoApplicableConversion {
        from: TypeDescriptor,
        to: TypeDescriptor,
    },

    #[error("conversion from {from} to {to} failed: {cause}")]
    FunctionFailure {
        from: TypeDescriptor,
        to: TypeDescriptor,
        #[source]
        cause: BoxError,
    },

    #[error("ambiguous rule: {0}")]
    AmbiguousRule(String),

    #[error("no value to convert to {to} and no default value given")]
    MissingValue { to: TypeDescriptor },

    #[error("converter returned {actual} where {expected} was requested")]
    TypeMismatch {
        expected: TypeDescriptor,
        actual: TypeDescriptor,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl ConvertError {
    pub fn no_conversion(from: TypeDescriptor, to: TypeDescriptor) -> Self {
        ConvertError::NoApplicableConversion { from, to }
    }

    pub fn failure(from: TypeDescriptor, to: TypeDescriptor, cause: impl Into<BoxError>) -> Self {
        ConvertError::FunctionFailure {
            from,
            to,
            cause: cause.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::NoApplicableConversion { .. } => ErrorKind::NoApplicableConversion,
            ConvertError::FunctionFailure { .. } => ErrorKind::FunctionFailure,
            ConvertError::AmbiguousRule(_) => ErrorKind::AmbiguousRule,
            ConvertError::MissingValue { .. } => ErrorKind::MissingValue,
            ConvertError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ConvertError::Config(_) => ErrorKind::Config,
        }
    }

    /// Add context to the error.
    ///
    /// Only message-carrying variants change; typed variants keep their pair
    /// so callers can still match on it.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        match self {
            ConvertError::Config(msg) => ConvertError::Config(format!("{ctx}: {msg}")),
            ConvertError::AmbiguousRule(msg) => ConvertError::AmbiguousRule(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
