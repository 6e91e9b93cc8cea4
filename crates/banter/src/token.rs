//! Tagged token records produced by the scanner.

use strum::{Display, IntoStaticStr};

/// Discriminator for the closed set of token shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum TokenKind {
    Eof,
    Identifier,
    /// A single colon-terminated keyword selector part, e.g. `at:`.
    Keyword,
    /// A numeric literal; the lexeme is the resolved value in shortest
    /// round-trip float form.
    Number,
    /// A string literal; the lexeme is the unquoted content.
    Str,
    /// `true` or `false`.
    Boolean,
    /// The reserved word `nil`.
    Nil,
    /// A one- or two-rune binary selector, e.g. `+`, `//`, `\\`.
    BinarySelector,
    /// A single structural rune: one of `( ) . : ; [ ] ^`.
    Special,
    /// The two-rune assignment operator `:=`.
    Assignment,
    /// `#(` or `#[`; the lexeme distinguishes the byte-array form.
    LiteralArrayOpener,
    /// A multi-part keyword run used as a literal, e.g. `#at:put:`.
    MultiKeywordLiteral,
}

/// One scanned token.
///
/// Tokens are immutable once emitted, with a single exception: the parser
/// rewrites a negative number literal into a binary `-` plus a positive
/// literal when the surrounding position expects an operator (see
/// `parse::Parser::patch_negative_literal`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first rune of the token.
    pub start: usize,
    /// Byte offset of the last rune of the token.
    pub stop: usize,
    /// The lexeme for value-bearing kinds; empty for `Eof`.
    pub text: String,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, start: usize, stop: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            start,
            stop,
            text: text.into(),
        }
    }

    pub(crate) fn eof(position: usize) -> Self {
        Self::new(TokenKind::Eof, position, position, "")
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    pub fn is_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword
    }

    pub fn is_binary(&self) -> bool {
        self.kind == TokenKind::BinarySelector
    }

    pub fn is_assignment(&self) -> bool {
        self.kind == TokenKind::Assignment
    }

    /// True for the single-rune structural tokens.
    pub fn is_special(&self, rune: char) -> bool {
        self.kind == TokenKind::Special && self.text.chars().next() == Some(rune)
    }

    /// True for literal-value tokens: numbers, strings, booleans, and nil.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number | TokenKind::Str | TokenKind::Boolean | TokenKind::Nil
        )
    }

    pub fn is_literal_array_opener(&self) -> bool {
        self.kind == TokenKind::LiteralArrayOpener
    }

    /// True when the opener was `#[`, introducing an (unsupported) byte array.
    pub fn is_for_byte_array(&self) -> bool {
        self.kind == TokenKind::LiteralArrayOpener && self.text.ends_with('[')
    }

    /// Human-readable description used in parse error messages.
    pub(crate) fn describe(&self) -> String {
        if self.is_eof() {
            "end of input".to_owned()
        } else {
            format!("'{}'", self.text)
        }
    }
}
