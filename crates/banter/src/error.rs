use std::fmt;

use crate::value::Kind;

/// Result type alias for operations that can fail during evaluation.
pub(crate) type EvalResult<T> = Result<T, EvalError>;

/// Errors raised by the scanner while producing tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A string literal was still open when the input ended.
    UnterminatedString {
        /// Byte offset of the opening quote.
        start: usize,
    },
    /// The input ended in the middle of a token that required more runes.
    UnexpectedEof {
        /// Byte offset one past the last rune.
        position: usize,
    },
    /// A rune outside the classification table was encountered.
    UnexpectedCharacter {
        character: char,
        /// Byte offset of the offending rune.
        position: usize,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString { start } => {
                write!(f, "unterminated string literal starting at offset {start}")
            }
            Self::UnexpectedEof { position } => {
                write!(f, "unexpected end of input at offset {position}")
            }
            Self::UnexpectedCharacter { character, position } => {
                write!(f, "unexpected character {character:?} at offset {position}")
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// Errors raised by the parser while building the AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The current token cannot start or continue the production being parsed.
    UnexpectedToken {
        /// What the parser was looking for, e.g. `"]"` or `"an expression"`.
        expected: &'static str,
        /// Human-readable description of the token actually found.
        found: String,
        /// Byte offset of the offending token.
        position: usize,
    },
    /// A cascade part was not a keyword or binary message.
    MessageExpected {
        /// Byte offset where the message was expected.
        position: usize,
    },
    /// The construct is valid Smalltalk but outside the supported subset.
    NotImplemented {
        construct: &'static str,
        /// Byte offset of the construct.
        position: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                expected,
                found,
                position,
            } => {
                write!(f, "expected {expected}, found {found} at offset {position}")
            }
            Self::MessageExpected { position } => {
                write!(f, "expected a keyword or binary message after ';' at offset {position}")
            }
            Self::NotImplemented { construct, position } => {
                write!(f, "{construct} is not supported at offset {position}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors raised while evaluating a parsed program.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A variable was read but is bound in no scope on the chain.
    UnboundVariable { name: String },
    /// The receiver's selector table has no entry for the selector.
    DoesNotUnderstand { kind: Kind, selector: String },
    /// A block was invoked with the wrong number of arguments.
    WrongArity {
        selector: String,
        parameters: usize,
        arguments: usize,
    },
    /// A message argument or receiver had the wrong kind.
    TypeMismatch {
        selector: String,
        expected: Kind,
        found: Kind,
    },
    /// An `at:` index fell outside the 1-based bounds of the array.
    IndexOutOfRange { index: f64, length: usize },
    /// A number literal's lexeme failed to parse as a 64-bit float.
    InvalidNumber { lexeme: String },
    /// A typed result accessor was called on a result of another kind.
    WrongResultKind { expected: Kind, found: Kind },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundVariable { name } => {
                write!(f, "undeclared variable '{name}'")
            }
            Self::DoesNotUnderstand { kind, selector } => {
                write!(f, "{kind} does not understand #{selector}")
            }
            Self::WrongArity {
                selector,
                parameters,
                arguments,
            } => {
                write!(
                    f,
                    "#{selector}: block expects {parameters} argument(s) but received {arguments}"
                )
            }
            Self::TypeMismatch {
                selector,
                expected,
                found,
            } => {
                write!(f, "#{selector}: expected {expected}, found {found}")
            }
            Self::IndexOutOfRange { index, length } => {
                write!(f, "#at:: index {index} is out of range for an array of {length} element(s)")
            }
            Self::InvalidNumber { lexeme } => {
                write!(f, "'{lexeme}' is not a valid number literal")
            }
            Self::WrongResultKind { expected, found } => {
                write!(f, "expected a {expected} result, found {found}")
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Error type for the full pipeline, separating failures by stage.
///
/// Keeping scan/parse/eval failures distinct lets embedders handle user
/// feedback and recovery policies accurately without string matching.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Tokenizing the source failed.
    Scan(ScanError),
    /// The token stream did not form a valid program.
    Parse(ParseError),
    /// The program failed while executing.
    Eval(EvalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan(error) => write!(f, "scan error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
            Self::Eval(error) => write!(f, "eval error: {error}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ScanError> for Error {
    fn from(error: ScanError) -> Self {
        Self::Scan(error)
    }
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<EvalError> for Error {
    fn from(error: EvalError) -> Self {
        Self::Eval(error)
    }
}
