//! Error types for tokenizing and dispatching console input.
//!
//! Every failure is recoverable and reported to the caller of dispatch.
//! Nothing here aborts the process.

use std::fmt;

/// Tokenize error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// Empty input string.
    EmptyInput,
    /// Input line is longer than the accepted bound.
    InputTooLong { len: usize, max: usize },
    /// Quoted string never closed. `position` is the index of the token that opened it.
    UnterminatedString { position: usize },
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::EmptyInput => write!(f, "empty input"),
            TokenizeError::InputTooLong { len, max } => {
                write!(f, "input is too long ({} bytes, max {})", len, max)
            }
            TokenizeError::UnterminatedString { position } => {
                write!(f, "unterminated string starting at token {}", position)
            }
        }
    }
}

impl std::error::Error for TokenizeError {}

/// Errors produced while resolving and executing a console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// The line could not be tokenized.
    Tokenize(TokenizeError),
    /// Neither a variable nor a command has this name.
    NotFound(String),
    /// Write attempted on a read-only variable.
    ReadOnly(String),
    /// Write attempted on a developer variable while developer mode is off.
    DeveloperOnly(String),
    /// More than one argument given to a variable with no command of the same name.
    TooManyArguments { name: String, argc: usize },
    /// Typed access requested a different type than the one registered.
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// The token could not be converted into the variable's type.
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },
    /// A command handler reported a failure.
    CommandFailure { name: String, message: String },
    /// The variable was written but its update hook panicked. The new value stays.
    UpdateHookFailure { name: String, message: String },
}

impl ConsoleError {
    /// Build a command failure for `name`.
    pub fn command(name: impl Into<String>, message: impl Into<String>) -> Self {
        ConsoleError::CommandFailure {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Tokenize(e) => write!(f, "parse error: {}", e),
            ConsoleError::NotFound(name) => {
                write!(f, "no variable or command found: '{}'", name)
            }
            ConsoleError::ReadOnly(name) => {
                write!(f, "cannot write to read-only variable '{}'", name)
            }
            ConsoleError::DeveloperOnly(name) => {
                write!(f, "'{}' can only be changed in developer mode", name)
            }
            ConsoleError::TooManyArguments { name, argc } => {
                write!(f, "too many arguments for variable '{}' ({} given, max 1)", name, argc)
            }
            ConsoleError::TypeMismatch { name, expected, actual } => {
                write!(f, "'{}' holds {}, not {}", name, actual, expected)
            }
            ConsoleError::InvalidValue { name, value, expected } => {
                write!(f, "cannot set '{}' to \"{}\": expected {}", name, value, expected)
            }
            ConsoleError::CommandFailure { name, message } => write!(f, "{}: {}", name, message),
            ConsoleError::UpdateHookFailure { name, message } => {
                write!(f, "'{}' was set but its update hook panicked: {}", name, message)
            }
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConsoleError::Tokenize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TokenizeError> for ConsoleError {
    fn from(e: TokenizeError) -> Self {
        ConsoleError::Tokenize(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_error_converts() {
        let err: ConsoleError = TokenizeError::EmptyInput.into();
        assert_eq!(err, ConsoleError::Tokenize(TokenizeError::EmptyInput));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_messages() {
        let err = ConsoleError::NotFound("sv_gravity".into());
        assert_eq!(err.to_string(), "no variable or command found: 'sv_gravity'");

        let err = ConsoleError::command("add", "requires more than 1 argument");
        assert_eq!(err.to_string(), "add: requires more than 1 argument");

        let err = ConsoleError::UpdateHookFailure {
            name: "sv_gravity".into(),
            message: "boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "'sv_gravity' was set but its update hook panicked: boom"
        );

        let err = TokenizeError::InputTooLong { len: 300, max: 255 };
        assert_eq!(err.to_string(), "input is too long (300 bytes, max 255)");
    }
}
