//! Parse-time and registration-time failure taxonomies.
//!
//! Bad input produces a [`ParseError`] value; a misdeclared option registry
//! is a programmer error and panics at registration time with a message
//! formatted from [`RegistryViolation`]. The two never mix: nothing a user
//! types at a prompt can trigger a registry panic, and no static
//! misconfiguration survives until parse time.

use thiserror::Error;

/// Errors produced while scanning a token sequence.
///
/// Every variant carries the offending token(s). All variants are terminal
/// for the current [`Parser::parse`](crate::Parser::parse) call: the scan
/// stops at the first failure and no partial result is returned.
///
/// # Examples
///
/// ```
/// use declarg_core::{Parser, ParseError};
///
/// #[derive(Debug, Default)]
/// struct Args;
///
/// let parser = Parser::<Args>::new("tool", "does nothing");
/// let error = parser.parse(["--bogus"]).unwrap_err();
/// assert_eq!(error, ParseError::UnknownOption("--bogus".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A value-requiring option was the last token of the sequence.
    #[error("option '{0}' requires a value")]
    NoRequiredValue(String),
    /// A `-`-prefixed token matched no registered name or alias.
    #[error("unknown option: '{0}'")]
    UnknownOption(String),
    /// A bare token was encountered but no positional mode is configured.
    #[error("unexpected positional input: '{0}'")]
    UnallowedPositionalInput(String),
    /// A second bare token arrived in single-positional mode.
    #[error("extra positional input: '{0}'")]
    ExtraPositionalInput(String),
    /// The subcommand-name token matched no known command.
    #[error("invalid subcommand: '{0}'")]
    InvalidSubcommand(String),
    /// A strict-mode subcommand received trailing tokens.
    #[error("subcommand takes no arguments, got: {0:?}")]
    UnexpectedSubcommandArguments(Vec<String>),
    /// Value coercion failed for a bound option.
    #[error("invalid value '{token}' (expected {expected})")]
    InvalidOptionValue {
        /// The token that failed to coerce.
        token: String,
        /// Short label of the expected type.
        expected: String,
    },
}

/// Structural problems in option declarations.
///
/// These reflect a static misconfiguration of the tool, not bad input, so
/// registration methods format them into a panic message instead of
/// returning them: a misdeclared tool fails on startup, never at parse
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryViolation {
    /// An option name or alias is the empty string.
    #[error("option name cannot be empty")]
    EmptyName,
    /// An option name or alias does not start with `-`.
    #[error("option name '{0}' must start with '-'")]
    MissingPrefix(String),
    /// A name or alias is already registered.
    #[error("duplicate option name: '{0}'")]
    DuplicateName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_messages_carry_the_offending_token() {
        let error = ParseError::NoRequiredValue("-c".to_string());
        assert_eq!(error.to_string(), "option '-c' requires a value");

        let error = ParseError::InvalidOptionValue {
            token: "ten".to_string(),
            expected: "u32".to_string(),
        };
        assert_eq!(error.to_string(), "invalid value 'ten' (expected u32)");
    }

    #[test]
    fn test_registry_violation_messages() {
        assert_eq!(
            RegistryViolation::DuplicateName("-v".to_string()).to_string(),
            "duplicate option name: '-v'"
        );
        assert_eq!(
            RegistryViolation::MissingPrefix("verbose".to_string()).to_string(),
            "option name 'verbose' must start with '-'"
        );
    }
}
