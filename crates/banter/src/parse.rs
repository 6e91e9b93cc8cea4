//! Recursive-descent parser for the Smalltalk expression grammar.
//!
//! Precedence from loosest to tightest: sequence, assignment, cascade,
//! keyword message, binary message, unary message, primary. Unary binds
//! tightest; all binary operators share one left-associative precedence
//! level; a keyword send combines every following keyword part into a
//! single message.

use std::rc::Rc;

use smallvec::smallvec;

use crate::{
    error::{Error, ParseError},
    expressions::{
        AssignmentNode, BlockNode, CascadeNode, LiteralArrayNode, LiteralNode, MessageNode, Node,
        SequenceNode, Span, VariableNode,
    },
    scanner::Scanner,
    token::{Token, TokenKind},
    value::format_number,
};

/// Parses a source string into its program node.
///
/// A program is a sequence of statements; a sequence with exactly one
/// statement and no temporaries collapses to that statement. Errors are
/// returned, never panicked, and carry the byte offset of the offending
/// token.
pub fn parse(source: &str) -> Result<Node, Error> {
    let mut parser = Parser::new(source)?;
    let sequence = parser.parse_statements()?;
    if !parser.current.is_eof() {
        return Err(parser.unexpected("end of input").into());
    }
    if sequence.statements.len() == 1 && sequence.temporaries.is_empty() {
        let mut statements = sequence.statements;
        Ok(statements.remove(0))
    } else {
        Ok(Node::Sequence(sequence))
    }
}

struct Parser<'src> {
    scanner: Scanner<'src>,
    current: Token,
    /// One-token lookahead; also holds the synthetic token pushed back by
    /// negative-literal patching.
    peek: Option<Token>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Result<Self, Error> {
        let mut scanner = Scanner::new(source);
        let current = scanner.next()?;
        Ok(Self {
            scanner,
            current,
            peek: None,
        })
    }

    fn step(&mut self) -> Result<(), Error> {
        self.current = match self.peek.take() {
            Some(token) => token,
            None => self.scanner.next()?,
        };
        Ok(())
    }

    fn next_token(&mut self) -> Result<&Token, Error> {
        if self.peek.is_none() {
            self.peek = Some(self.scanner.next()?);
        }
        Ok(self.peek.as_ref().expect("peek buffer was just filled"))
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.current.describe(),
            position: self.current.start,
        }
    }

    /// `('|' identifier* '|' | '||')? statement ('.' statement)* '.'?`
    fn parse_statements(&mut self) -> Result<SequenceNode, Error> {
        let mut sequence = SequenceNode::default();
        if self.current.is_binary() {
            if self.current.text == "|" {
                sequence.left_bar = Some(self.current.start);
                self.step()?;
                sequence.temporaries = self.parse_temporaries()?;
                if !(self.current.is_binary() && self.current.text == "|") {
                    return Err(self.unexpected("'|' closing the temporaries declaration").into());
                }
                sequence.right_bar = Some(self.current.start);
                self.step()?;
            } else if self.current.text == "||" {
                sequence.left_bar = Some(self.current.start);
                sequence.right_bar = Some(self.current.start + 1);
                self.step()?;
            }
        }
        self.parse_statement_list_into(&mut sequence)?;
        Ok(sequence)
    }

    fn parse_temporaries(&mut self) -> Result<Vec<VariableNode>, Error> {
        let mut temporaries = vec![];
        while self.current.is_identifier() {
            temporaries.push(self.parse_variable()?);
        }
        Ok(temporaries)
    }

    fn parse_variable(&mut self) -> Result<VariableNode, Error> {
        if !self.current.is_identifier() {
            return Err(self.unexpected("a variable name").into());
        }
        let token = self.current.clone();
        self.step()?;
        Ok(VariableNode { token, parens: vec![] })
    }

    fn at_statement_list_end(&self) -> bool {
        self.current.is_eof() || self.current.is_special(')') || self.current.is_special(']')
    }

    fn parse_statement_list_into(&mut self, sequence: &mut SequenceNode) -> Result<(), Error> {
        let mut expects_end = false;
        while !self.at_statement_list_end() {
            if expects_end {
                return Err(self.unexpected("'.' between statements").into());
            }
            if self.current.is_special('^') {
                return Err(ParseError::NotImplemented {
                    construct: "the return statement '^'",
                    position: self.current.start,
                }
                .into());
            }
            sequence.statements.push(self.parse_assignment()?);
            if self.current.is_special('.') {
                sequence.periods.push(self.current.start);
                self.step()?;
            } else {
                expects_end = true;
            }
        }
        Ok(())
    }

    /// `identifier ':=' statement`, right-associative; otherwise a cascade.
    fn parse_assignment(&mut self) -> Result<Node, Error> {
        if !(self.current.is_identifier() && self.next_token()?.is_assignment()) {
            return self.parse_cascade_message();
        }
        let variable = self.parse_variable()?;
        let position = self.current.start;
        self.step()?;
        let value = self.parse_assignment()?;
        Ok(Node::Assignment(AssignmentNode {
            variable,
            value: Rc::new(value),
            position,
            parens: vec![],
        }))
    }

    fn parse_cascade_message(&mut self) -> Result<Node, Error> {
        let node = self.parse_keyword_message()?;
        if !(self.current.is_special(';') && node.is_message()) {
            return Ok(node);
        }
        let Node::Message(first) = node else {
            unreachable!("is_message guarantees a message node");
        };
        // every cascade part reuses the first message's receiver
        let receiver = Rc::clone(&first.receiver);
        let mut messages = vec![first];
        let mut semicolons = vec![];
        while self.current.is_special(';') {
            semicolons.push(self.current.start);
            self.step()?;
            let message = if self.current.is_keyword() {
                self.parse_keyword_parts(Rc::clone(&receiver))?
            } else {
                self.patch_negative_literal();
                if !self.current.is_binary() {
                    return Err(ParseError::MessageExpected {
                        position: self.current.start,
                    }
                    .into());
                }
                self.parse_binary_message_with(Rc::clone(&receiver))?
            };
            messages.push(message);
        }
        Ok(Node::Cascade(CascadeNode {
            messages,
            semicolons,
            parens: vec![],
        }))
    }

    /// Splits a negative number literal into a binary `-` and a positive
    /// literal, pushing the literal into the peek buffer. Called wherever
    /// the grammar expects a binary operator, so the lexically greedy
    /// `a -5` scan parses as `a - 5`.
    fn patch_negative_literal(&mut self) {
        if self.current.kind != TokenKind::Number {
            return;
        }
        let Ok(value) = self.current.text.parse::<f64>() else {
            return;
        };
        if value >= 0.0 {
            return;
        }
        debug_assert!(self.peek.is_none(), "peek buffer occupied during patching");
        let mut literal = self.current.clone();
        literal.start += 1;
        literal.text = format_number(-value);
        let minus = Token::new(TokenKind::BinarySelector, self.current.start, self.current.start, "-");
        self.peek = Some(literal);
        self.current = minus;
    }

    fn parse_keyword_message(&mut self) -> Result<Node, Error> {
        let receiver = self.parse_binary_message()?;
        if !self.current.is_keyword() {
            return Ok(receiver);
        }
        let message = self.parse_keyword_parts(Rc::new(receiver))?;
        Ok(Node::Message(message))
    }

    /// One keyword send combines all following keyword parts.
    ///
    /// The current token must be a keyword.
    fn parse_keyword_parts(&mut self, receiver: Rc<Node>) -> Result<MessageNode, Error> {
        let mut selector_parts = smallvec![];
        let mut arguments = vec![];
        while self.current.is_keyword() {
            selector_parts.push(self.current.clone());
            self.step()?;
            arguments.push(self.parse_binary_message()?);
        }
        Ok(MessageNode {
            receiver,
            selector_parts,
            arguments,
            parens: vec![],
        })
    }

    fn parse_binary_message(&mut self) -> Result<Node, Error> {
        let mut node = self.parse_unary_message()?;
        while self.is_binary_after_patch() {
            node = Node::Message(self.parse_binary_message_with(Rc::new(node))?);
        }
        Ok(node)
    }

    fn is_binary_after_patch(&mut self) -> bool {
        self.patch_negative_literal();
        self.current.is_binary()
    }

    fn parse_binary_message_with(&mut self, receiver: Rc<Node>) -> Result<MessageNode, Error> {
        let selector = self.current.clone();
        self.step()?;
        let argument = self.parse_unary_message()?;
        Ok(MessageNode {
            receiver,
            selector_parts: smallvec![selector],
            arguments: vec![argument],
            parens: vec![],
        })
    }

    fn parse_unary_message(&mut self) -> Result<Node, Error> {
        let mut node = self.parse_primary()?;
        while self.current.is_identifier() {
            let selector = self.current.clone();
            self.step()?;
            node = Node::Message(MessageNode {
                receiver: Rc::new(node),
                selector_parts: smallvec![selector],
                arguments: vec![],
                parens: vec![],
            });
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<Node, Error> {
        if self.current.is_identifier() {
            return Ok(Node::Variable(self.parse_variable()?));
        }
        if self.current.is_literal() {
            return self.parse_literal();
        }
        if self.current.is_literal_array_opener() {
            if self.current.is_for_byte_array() {
                return Err(ParseError::NotImplemented {
                    construct: "byte array literals",
                    position: self.current.start,
                }
                .into());
            }
            return self.parse_literal_array();
        }
        if self.current.is_special('[') {
            return self.parse_block();
        }
        if self.current.is_special('(') {
            return self.parse_parenthesized();
        }
        Err(self.unexpected("an expression").into())
    }

    fn parse_literal(&mut self) -> Result<Node, Error> {
        let token = self.current.clone();
        self.step()?;
        Ok(Node::Literal(LiteralNode { token, parens: vec![] }))
    }

    fn parse_block(&mut self) -> Result<Node, Error> {
        let left = self.current.start;
        self.step()?;
        let (arguments, colons, bar) = self.parse_block_arguments()?;
        let body = self.parse_statements()?;
        if !self.current.is_special(']') {
            return Err(self.unexpected("']' closing the block").into());
        }
        let right = self.current.start;
        self.step()?;
        Ok(Node::Block(Rc::new(BlockNode {
            arguments,
            colons,
            bar,
            left,
            right,
            body,
            parens: vec![],
        })))
    }

    /// Zero or more `:name` groups; a `|` is mandatory after any group
    /// unless the block body is empty.
    fn parse_block_arguments(&mut self) -> Result<(Vec<VariableNode>, Vec<usize>, Option<usize>), Error> {
        let mut arguments = vec![];
        let mut colons = vec![];
        let mut bar = None;
        while self.current.is_special(':') {
            colons.push(self.current.start);
            self.step()?;
            arguments.push(self.parse_variable()?);
        }
        if !arguments.is_empty() {
            if self.current.is_binary() {
                if self.current.text != "|" {
                    return Err(self.unexpected("'|' after the block arguments").into());
                }
                bar = Some(self.current.start);
                self.step()?;
            } else if !self.current.is_special(']') {
                return Err(self.unexpected("'|' after the block arguments").into());
            }
        }
        Ok((arguments, colons, bar))
    }

    fn parse_parenthesized(&mut self) -> Result<Node, Error> {
        let left = self.current.start;
        self.step()?;
        let mut node = self.parse_assignment()?;
        if !self.current.is_special(')') {
            return Err(self.unexpected("')'").into());
        }
        node.add_parenthesis(Span {
            start: left,
            stop: self.current.start,
        });
        self.step()?;
        Ok(node)
    }

    fn parse_literal_array(&mut self) -> Result<Node, Error> {
        let start = self.current.start;
        self.step()?;
        let mut contents = vec![];
        while !(self.current.is_eof() || self.current.is_special(')')) {
            contents.push(self.parse_literal_array_element()?);
        }
        if !self.current.is_special(')') {
            return Err(self.unexpected("')' closing the literal array").into());
        }
        let stop = self.current.stop;
        self.step()?;
        Ok(Node::LiteralArray(LiteralArrayNode {
            start,
            stop,
            contents,
            parens: vec![],
        }))
    }

    fn parse_literal_array_element(&mut self) -> Result<Node, Error> {
        if self.current.is_special('(') {
            return self.parse_literal_array();
        }
        if self.current.is_literal_array_opener() {
            if self.current.is_for_byte_array() {
                return Err(ParseError::NotImplemented {
                    construct: "byte array literals",
                    position: self.current.start,
                }
                .into());
            }
            return self.parse_literal_array();
        }
        if self.current.is_literal() {
            return self.parse_literal();
        }
        Err(self.unexpected("a literal").into())
    }
}
