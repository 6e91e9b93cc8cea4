//! On-demand tokenizer for the Smalltalk expression grammar.
//!
//! The scanner classifies runes into alphabetic, digit, binary, special, and
//! separator classes, and produces one token per `next` call. Number
//! literals are resolved to their numeric value while scanning and carried
//! as shortest round-trip float lexemes, so the scanner and the evaluator
//! always agree on representation.

use crate::{
    error::ScanError,
    reader::Reader,
    token::{Token, TokenKind},
    value::format_number,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Alphabetic,
    Digit,
    Binary,
    Special,
    Separator,
    /// Runes outside the classification table; `'` and `#` land here and
    /// are recognized by rune in `scan_token`.
    Unknown,
}

fn classify(character: char) -> CharClass {
    match character {
        '_' => CharClass::Alphabetic,
        // the ASCII binary runes plus the four Latin-1 math symbols
        '!' | '%' | '&' | '*' | '+' | ',' | '-' | '/' | '<' | '=' | '>' | '?' | '@' | '\\' | '~'
        | '|' | '±' | '·' | '×' | '÷' => CharClass::Binary,
        '(' | ')' | '.' | ':' | ';' | '[' | ']' | '^' => CharClass::Special,
        c if c.is_ascii_digit() => CharClass::Digit,
        c if c.is_alphabetic() => CharClass::Alphabetic,
        c if c.is_whitespace() => CharClass::Separator,
        _ => CharClass::Unknown,
    }
}

/// Produces tokens on demand from a source string.
#[derive(Debug)]
pub(crate) struct Scanner<'src> {
    reader: Reader<'src>,
    buffer: String,
    /// The rune most recently consumed from the reader; `None` at end of input.
    current: Option<char>,
    current_class: CharClass,
    /// Byte offset of `current` in the source.
    current_start: usize,
    /// Byte offset where the token being scanned began.
    token_start: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut scanner = Self {
            reader: Reader::new(source),
            buffer: String::with_capacity(60),
            current: None,
            current_class: CharClass::Separator,
            current_start: 0,
            token_start: 0,
        };
        scanner.step();
        scanner.strip_separators();
        scanner
    }

    /// Scans and returns the next token, stripping trailing separators.
    pub fn next(&mut self) -> Result<Token, ScanError> {
        self.buffer.clear();
        self.token_start = self.current_start;
        let token = if self.current.is_none() {
            Token::eof(self.reader.len())
        } else {
            self.scan_token()?
        };
        self.strip_separators();
        Ok(token)
    }

    fn step(&mut self) {
        self.current_start = self.reader.position();
        match self.reader.read() {
            Some(character) => {
                self.current = Some(character);
                self.current_class = classify(character);
            }
            None => {
                self.current = None;
                self.current_class = CharClass::Separator;
            }
        }
    }

    fn strip_separators(&mut self) {
        while self.current.is_some() && self.current_class == CharClass::Separator {
            self.step();
        }
    }

    /// Byte offset of the last rune consumed into the token being scanned.
    ///
    /// `current` always holds the first rune *after* that token, so the
    /// previous rune ends one byte before `current` starts.
    fn previous_stop(&self) -> usize {
        self.current_start.saturating_sub(1)
    }

    fn scan_token(&mut self) -> Result<Token, ScanError> {
        if self.current_class == CharClass::Alphabetic {
            return Ok(self.scan_identifier_or_keyword());
        }
        if self.current_class == CharClass::Digit
            || (self.current == Some('-') && self.reader.peek().is_some_and(|c| c.is_ascii_digit()))
        {
            return Ok(self.scan_number());
        }
        if self.current_class == CharClass::Binary {
            return Ok(self.scan_binary_selector());
        }
        if self.current_class == CharClass::Special {
            return Ok(self.scan_special());
        }
        if self.current == Some('\'') {
            return self.scan_string();
        }
        if self.current == Some('#') {
            return self.scan_hash_literal();
        }
        Err(ScanError::UnexpectedCharacter {
            character: self.current.unwrap_or('\0'),
            position: self.current_start,
        })
    }

    fn scan_name(&mut self) {
        while matches!(self.current_class, CharClass::Alphabetic | CharClass::Digit) {
            if let Some(character) = self.current {
                self.buffer.push(character);
            }
            self.step();
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        self.scan_name();
        if self.current == Some(':') && self.reader.peek() != Some('=') {
            return self.scan_keyword();
        }
        let stop = self.previous_stop();
        let name = self.buffer.as_str();
        match name {
            "true" | "false" => Token::new(TokenKind::Boolean, self.token_start, stop, name),
            "nil" => Token::new(TokenKind::Nil, self.token_start, stop, name),
            _ => Token::new(TokenKind::Identifier, self.token_start, stop, name),
        }
    }

    /// Extends the buffered name across consecutive `identifier:` runs,
    /// backing up to the last well-formed colon so a trailing bare
    /// identifier is left for the next token.
    fn scan_keyword_run(&mut self) {
        let mut buffer_mark = self.buffer.len();
        let mut input_mark = self.reader.position();
        while self.current == Some(':') {
            self.buffer.push(':');
            buffer_mark = self.buffer.len();
            input_mark = self.reader.position();
            self.step();
            self.scan_name();
        }
        self.buffer.truncate(buffer_mark);
        self.reader.seek(input_mark);
        self.step();
    }

    fn scan_keyword(&mut self) -> Token {
        self.scan_keyword_run();
        let name = self.buffer.as_str();
        let stop = self.previous_stop();
        if name.bytes().filter(|b| *b == b':').count() == 1 {
            Token::new(TokenKind::Keyword, self.token_start, stop, name)
        } else {
            Token::new(TokenKind::MultiKeywordLiteral, self.token_start, stop, format!("#{name}"))
        }
    }

    fn scan_number(&mut self) -> Token {
        // rewind so the whole literal, current rune included, is read off
        // the stream by the value parser below
        self.reader.seek(self.current_start);
        let value = self.read_number_value();
        self.step();
        Token::new(
            TokenKind::Number,
            self.token_start,
            self.previous_stop(),
            format_number(value),
        )
    }

    /// Reads `-? digits (.digits)? ((e|d) -? digits)?` off the reader and
    /// resolves it to its numeric value.
    ///
    /// A `.` not followed by a digit is put back (it is a statement
    /// period). An `e`/`d` marker stays consumed even when no exponent
    /// digits follow, matching the classic VisualWorks reader.
    fn read_number_value(&mut self) -> f64 {
        let negative = self.reader.peek_for('-');
        let mut value = self.read_integer();

        if self.reader.peek_for('.') {
            if self.reader.peek().is_some_and(|c| c.is_ascii_digit()) {
                let mut numerator = 0.0;
                let mut precision = 0;
                while let Some(digit) = self.reader.peek().and_then(|c| c.to_digit(10)) {
                    self.reader.read();
                    numerator = numerator * 10.0 + f64::from(digit);
                    precision += 1;
                }
                value += numerator / 10f64.powi(precision);
            } else {
                self.reader.skip(-1);
            }
        }

        if matches!(self.reader.peek(), Some('e' | 'd')) {
            self.reader.read();
            let end_of_number = self.reader.position();
            let negative_exponent = self.reader.peek_for('-');
            if self.reader.peek().is_some_and(|c| c.is_ascii_digit()) {
                let exponent = self.read_integer() as i32;
                value *= 10f64.powi(if negative_exponent { -exponent } else { exponent });
            } else {
                self.reader.seek(end_of_number);
            }
        }

        if negative { -value } else { value }
    }

    fn read_integer(&mut self) -> f64 {
        let mut value = 0.0;
        while let Some(digit) = self.reader.peek().and_then(|c| c.to_digit(10)) {
            self.reader.read();
            value = value * 10.0 + f64::from(digit);
        }
        value
    }

    /// One binary rune, optionally followed by a second that is not `-`,
    /// so that `-5` after an operator still scans as a negative literal.
    fn scan_binary_selector(&mut self) -> Token {
        if let Some(character) = self.current {
            self.buffer.push(character);
        }
        self.step();
        if self.current_class == CharClass::Binary && self.current != Some('-') {
            if let Some(character) = self.current {
                self.buffer.push(character);
            }
            self.step();
        }
        Token::new(
            TokenKind::BinarySelector,
            self.token_start,
            self.previous_stop(),
            self.buffer.as_str(),
        )
    }

    fn scan_special(&mut self) -> Token {
        let start = self.token_start;
        if self.current == Some(':') {
            self.step();
            if self.current == Some('=') {
                self.step();
                return Token::new(TokenKind::Assignment, start, start + 1, ":=");
            }
            return Token::new(TokenKind::Special, start, start, ":");
        }
        let character = self.current.unwrap_or('\0');
        self.step();
        Token::new(TokenKind::Special, start, start, character.to_string())
    }

    /// Single-quoted string; no escaping, a quote always terminates.
    fn scan_string(&mut self) -> Result<Token, ScanError> {
        loop {
            self.step();
            match self.current {
                None => {
                    return Err(ScanError::UnterminatedString {
                        start: self.token_start,
                    });
                }
                Some('\'') => {
                    self.step();
                    break;
                }
                Some(character) => self.buffer.push(character),
            }
        }
        Ok(Token::new(
            TokenKind::Str,
            self.token_start,
            self.previous_stop(),
            self.buffer.as_str(),
        ))
    }

    /// `#(` and `#[` open literal arrays; `#'…'`, `#binary`, `#name`, and
    /// `#key:word:` runs are symbol-like literals carried as strings.
    fn scan_hash_literal(&mut self) -> Result<Token, ScanError> {
        self.step();
        match self.current {
            None => Err(ScanError::UnexpectedEof {
                position: self.reader.len(),
            }),
            Some('\'') => self.scan_string(),
            Some(opener @ ('(' | '[')) => {
                self.step();
                Ok(Token::new(
                    TokenKind::LiteralArrayOpener,
                    self.token_start,
                    self.token_start + 1,
                    format!("#{opener}"),
                ))
            }
            _ if self.current_class == CharClass::Binary => Ok(self.scan_binary_in_literal()),
            _ if self.current_class == CharClass::Alphabetic => Ok(self.scan_symbol_name()),
            Some(character) => Err(ScanError::UnexpectedCharacter {
                character,
                position: self.current_start,
            }),
        }
    }

    fn scan_binary_in_literal(&mut self) -> Token {
        if let Some(character) = self.current {
            self.buffer.push(character);
        }
        self.step();
        if self.current_class == CharClass::Binary && self.current != Some('-') {
            if let Some(character) = self.current {
                self.buffer.push(character);
            }
            self.step();
        }
        Token::new(
            TokenKind::Str,
            self.token_start,
            self.previous_stop(),
            self.buffer.as_str(),
        )
    }

    fn scan_symbol_name(&mut self) -> Token {
        self.scan_name();
        if self.current == Some(':') && self.reader.peek() != Some('=') {
            self.scan_keyword_run();
        }
        Token::new(
            TokenKind::Str,
            self.token_start,
            self.previous_stop(),
            self.buffer.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Scanner;
    use crate::token::TokenKind;

    fn tokens(source: &str) -> Vec<(TokenKind, String)> {
        let mut scanner = Scanner::new(source);
        let mut collected = vec![];
        loop {
            let token = scanner.next().expect("scan failure");
            if token.is_eof() {
                return collected;
            }
            collected.push((token.kind, token.text));
        }
    }

    fn single(source: &str) -> (TokenKind, String) {
        let mut scanned = tokens(source);
        assert_eq!(scanned.len(), 1, "expected one token from {source:?}");
        scanned.remove(0)
    }

    #[test]
    fn scans_fractional_number() {
        assert_eq!(single("0.56"), (TokenKind::Number, "0.56".to_owned()));
    }

    #[test]
    fn scans_identifier_with_underscores() {
        assert_eq!(single("radio_altitude"), (TokenKind::Identifier, "radio_altitude".to_owned()));
    }

    #[test]
    fn coercion_marker_without_digits_is_swallowed() {
        assert_eq!(single("1.02d"), (TokenKind::Number, "1.02".to_owned()));
    }

    #[test]
    fn scans_exponents() {
        assert_eq!(single("1e4"), (TokenKind::Number, "10000.0".to_owned()));
        assert_eq!(single("1e-4"), (TokenKind::Number, "0.0001".to_owned()));
    }

    #[test]
    fn period_without_digits_is_a_statement_period() {
        assert_eq!(
            tokens("5."),
            vec![
                (TokenKind::Number, "5.0".to_owned()),
                (TokenKind::Special, ".".to_owned()),
            ]
        );
    }

    #[test]
    fn scans_operator_heavy_expression() {
        assert_eq!(
            tokens(r"ikvsp_iaspeed_kmph\\10/10-0.9*10"),
            vec![
                (TokenKind::Identifier, "ikvsp_iaspeed_kmph".to_owned()),
                (TokenKind::BinarySelector, r"\\".to_owned()),
                (TokenKind::Number, "10.0".to_owned()),
                (TokenKind::BinarySelector, "/".to_owned()),
                (TokenKind::Number, "10.0".to_owned()),
                (TokenKind::Number, "-0.9".to_owned()),
                (TokenKind::BinarySelector, "*".to_owned()),
                (TokenKind::Number, "10.0".to_owned()),
            ]
        );
    }

    #[test]
    fn scans_conditional_with_mixed_token_kinds() {
        assert_eq!(
            tokens("(abc > -137.74 abs) not ifTrue:['b'] ifFalse:[true]"),
            vec![
                (TokenKind::Special, "(".to_owned()),
                (TokenKind::Identifier, "abc".to_owned()),
                (TokenKind::BinarySelector, ">".to_owned()),
                (TokenKind::Number, "-137.74".to_owned()),
                (TokenKind::Identifier, "abs".to_owned()),
                (TokenKind::Special, ")".to_owned()),
                (TokenKind::Identifier, "not".to_owned()),
                (TokenKind::Keyword, "ifTrue:".to_owned()),
                (TokenKind::Special, "[".to_owned()),
                (TokenKind::Str, "b".to_owned()),
                (TokenKind::Special, "]".to_owned()),
                (TokenKind::Keyword, "ifFalse:".to_owned()),
                (TokenKind::Special, "[".to_owned()),
                (TokenKind::Boolean, "true".to_owned()),
                (TokenKind::Special, "]".to_owned()),
            ]
        );
    }

    #[test]
    fn scans_assignment_operator() {
        assert_eq!(
            tokens("a:=1"),
            vec![
                (TokenKind::Identifier, "a".to_owned()),
                (TokenKind::Assignment, ":=".to_owned()),
                (TokenKind::Number, "1.0".to_owned()),
            ]
        );
    }

    #[test]
    fn scans_literal_array_opener() {
        assert_eq!(
            tokens("#(1)"),
            vec![
                (TokenKind::LiteralArrayOpener, "#(".to_owned()),
                (TokenKind::Number, "1.0".to_owned()),
                (TokenKind::Special, ")".to_owned()),
            ]
        );
        assert_eq!(single("#["), (TokenKind::LiteralArrayOpener, "#[".to_owned()));
    }

    #[test]
    fn keyword_scan_backs_up_to_last_colon() {
        assert_eq!(
            tokens("at:put x"),
            vec![
                (TokenKind::Keyword, "at:".to_owned()),
                (TokenKind::Identifier, "put".to_owned()),
                (TokenKind::Identifier, "x".to_owned()),
            ]
        );
    }

    #[test]
    fn multi_keyword_run_is_a_literal_selector() {
        assert_eq!(single("at:put:"), (TokenKind::MultiKeywordLiteral, "#at:put:".to_owned()));
    }

    #[test]
    fn reserved_words_are_literals() {
        assert_eq!(single("true"), (TokenKind::Boolean, "true".to_owned()));
        assert_eq!(single("false"), (TokenKind::Boolean, "false".to_owned()));
        assert_eq!(single("nil"), (TokenKind::Nil, "nil".to_owned()));
    }

    #[test]
    fn hash_forms_scan_as_string_literals() {
        assert_eq!(single("#foo"), (TokenKind::Str, "foo".to_owned()));
        assert_eq!(single("#at:put:"), (TokenKind::Str, "at:put:".to_owned()));
        assert_eq!(single("#+"), (TokenKind::Str, "+".to_owned()));
        assert_eq!(single("#'sym'"), (TokenKind::Str, "sym".to_owned()));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let mut scanner = Scanner::new("'abc");
        assert!(scanner.next().is_err());
    }

    #[test]
    fn binary_selector_never_absorbs_a_minus() {
        assert_eq!(
            tokens("8/-2"),
            vec![
                (TokenKind::Number, "8.0".to_owned()),
                (TokenKind::BinarySelector, "/".to_owned()),
                (TokenKind::Number, "-2.0".to_owned()),
            ]
        );
    }

    #[test]
    fn latin1_math_symbols_are_binary_selectors() {
        assert_eq!(
            tokens("6÷2"),
            vec![
                (TokenKind::Number, "6.0".to_owned()),
                (TokenKind::BinarySelector, "÷".to_owned()),
                (TokenKind::Number, "2.0".to_owned()),
            ]
        );
    }

    #[test]
    fn token_offsets_cover_the_lexeme() {
        let mut scanner = Scanner::new("ab  'cd'");
        let identifier = scanner.next().unwrap();
        assert_eq!((identifier.start, identifier.stop), (0, 1));
        let string = scanner.next().unwrap();
        assert_eq!((string.start, string.stop), (4, 7));
        let eof = scanner.next().unwrap();
        assert_eq!(eof.start, 8);
    }
}
