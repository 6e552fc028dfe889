//! Error types for catalog building and value coercion

use std::num::{ParseFloatError, ParseIntError};

use crate::types::DeclaredType;

/// Errors raised while building a catalog or coercing a value into a field.
///
/// Three variants are classified failures that carry context about what went
/// wrong. [`Error::Parse`] is the odd one out: it forwards the underlying
/// literal parser's message untouched, so its `Display` output is exactly what
/// the parser reported.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The root (or a nested value) is not a struct where one is required.
    #[error("invalid config: `{type_name}` is not a struct")]
    InvalidConfig {
        /// Declared type that was found instead of a struct
        type_name: String,
    },

    /// A directive in a field's tag was given an empty explicit value.
    #[error("invalid tag format on field `{field}`: either `{directive}` or `{directive}={expected}` is valid")]
    InvalidTagFormat {
        /// Declared name of the field carrying the bad tag
        field: String,
        /// Directive family (`env`, `flag` or `default`)
        directive: &'static str,
        /// Placeholder shown for the explicit form
        expected: &'static str,
    },

    /// No coercion rule exists for the declared type.
    #[error("{operation}: unsupported type [{kind}]")]
    UnsupportedType {
        /// Operation that rejected the type
        operation: &'static str,
        /// Declared kind that was rejected
        kind: String,
    },

    /// A raw literal could not be parsed into the target type.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidConfig,
    InvalidTagFormat,
    UnsupportedType,
    Parse,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::InvalidTagFormat { .. } => ErrorKind::InvalidTagFormat,
            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Self::Parse(_) => ErrorKind::Parse,
        }
    }

    pub(crate) fn invalid_config(declared: &DeclaredType) -> Self {
        Self::InvalidConfig {
            type_name: declared.to_string(),
        }
    }

    /// Create an unsupported type error (also used by macro-generated code)
    #[doc(hidden)]
    pub fn unsupported(operation: &'static str, declared: &DeclaredType) -> Self {
        Self::UnsupportedType {
            operation,
            kind: declared.to_string(),
        }
    }
}

/// Failures reported by the literal parsers.
///
/// Messages are passed through from `std`, `humantime` and `chrono` as-is.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid boolean literal '{literal}'")]
    Bool { literal: String },

    #[error(transparent)]
    Int(#[from] ParseIntError),

    #[error(transparent)]
    Float(#[from] ParseFloatError),

    #[error(transparent)]
    Duration(#[from] humantime::DurationError),

    #[error(transparent)]
    Timestamp(#[from] chrono::ParseError),

    #[error("misplaced sign in integer literal '{literal}'")]
    Sign { literal: String },

    #[error("value {literal} out of range for {target}")]
    OutOfRange { literal: String, target: String },
}

impl ParseError {
    pub(crate) fn out_of_range(literal: impl ToString, target: &DeclaredType) -> Self {
        Self::OutOfRange {
            literal: literal.to_string(),
            target: target.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_tag_format_names_both_forms() {
        let err = Error::InvalidTagFormat {
            field: "port".into(),
            directive: "env",
            expected: "ENV_KEY",
        };
        let msg = err.to_string();
        assert!(msg.contains("port"));
        assert!(msg.contains("either `env` or `env=ENV_KEY` is valid"));
        assert_eq!(err.kind(), ErrorKind::InvalidTagFormat);
    }

    #[test]
    fn unsupported_names_kind() {
        let err = Error::unsupported("coerce", &DeclaredType::Struct("Database"));
        assert_eq!(err.to_string(), "coerce: unsupported type [struct Database]");
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }

    #[test]
    fn parse_error_is_transparent() {
        let source = "x1".parse::<i64>().unwrap_err();
        let expected = source.to_string();
        let err = Error::from(ParseError::from(source));
        assert_eq!(err.to_string(), expected);
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
