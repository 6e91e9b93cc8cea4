//! Parser structure tests.
//!
//! These exercise the public `parse` entry point and inspect the resulting
//! node shapes: precedence (unary > binary > keyword), left associativity,
//! negative-literal patching, cascades, blocks, and the error paths for
//! unsupported or malformed input.

use banter::{Error, Node, ParseError, TokenKind, parse};
use pretty_assertions::assert_eq;

fn parsed(source: &str) -> Node {
    parse(source).unwrap_or_else(|error| panic!("parse of {source:?} failed: {error}"))
}

fn parse_error(source: &str) -> ParseError {
    match parse(source) {
        Err(Error::Parse(error)) => error,
        other => panic!("expected a parse error from {source:?}, got {other:?}"),
    }
}

// =============================================================================
// 1. primaries and collapse
// =============================================================================

/// A single literal collapses to the literal node itself, not a sequence.
#[test]
fn single_statement_collapses() {
    let Node::Literal(literal) = parsed("5") else {
        panic!("expected a literal root");
    };
    assert_eq!(literal.token.kind, TokenKind::Number);
    assert_eq!(literal.token.text, "5.0");
}

/// String and boolean literals parse to literal nodes carrying the lexeme.
#[test]
fn literal_primaries() {
    let Node::Literal(string) = parsed("'str'") else {
        panic!("expected a literal root");
    };
    assert_eq!(string.token.kind, TokenKind::Str);
    assert_eq!(string.token.text, "str");

    let Node::Literal(boolean) = parsed("true") else {
        panic!("expected a literal root");
    };
    assert_eq!(boolean.token.kind, TokenKind::Boolean);

    let Node::Literal(nil) = parsed("nil") else {
        panic!("expected a literal root");
    };
    assert_eq!(nil.token.kind, TokenKind::Nil);
}

/// An identifier parses to a variable node exposing its name.
#[test]
fn identifier_primary() {
    let Node::Variable(variable) = parsed("radio_altitude") else {
        panic!("expected a variable root");
    };
    assert_eq!(variable.name(), "radio_altitude");
}

// =============================================================================
// 2. messages and precedence
// =============================================================================

/// A binary send holds its receiver, one selector part, and one argument.
#[test]
fn binary_message() {
    let Node::Message(message) = parsed("1 + 2") else {
        panic!("expected a message root");
    };
    assert_eq!(message.selector(), "+");
    assert!(message.receiver.is_literal());
    assert_eq!(message.arguments.len(), 1);
}

/// Binary sends are left-associative regardless of operator.
#[test]
fn binary_messages_nest_leftward() {
    let Node::Message(outer) = parsed("1 + 2 - 3") else {
        panic!("expected a message root");
    };
    assert_eq!(outer.selector(), "-");
    let Node::Message(inner) = outer.receiver.as_ref() else {
        panic!("expected the receiver to be the earlier send");
    };
    assert_eq!(inner.selector(), "+");
}

/// `a -5` re-parses the greedy negative literal as a binary minus.
#[test]
fn negative_literal_is_patched_after_a_receiver() {
    let Node::Message(message) = parsed("a -5") else {
        panic!("expected a message root");
    };
    assert_eq!(message.selector(), "-");
    let Node::Literal(argument) = &message.arguments[0] else {
        panic!("expected a literal argument");
    };
    assert_eq!(argument.token.text, "5.0");
}

/// Unary sends chain left-to-right and bind tighter than binary.
#[test]
fn unary_binds_tighter_than_binary() {
    let Node::Message(outer) = parsed("3 - 5 abs") else {
        panic!("expected a message root");
    };
    assert_eq!(outer.selector(), "-");
    let Node::Message(argument) = &outer.arguments[0] else {
        panic!("expected the argument to be the unary send");
    };
    assert_eq!(argument.selector(), "abs");
}

/// A keyword send combines all following parts into one selector.
#[test]
fn keyword_parts_combine() {
    let Node::Message(message) = parsed("x at: 1 put: 2") else {
        panic!("expected a message root");
    };
    assert_eq!(message.selector(), "at:put:");
    assert_eq!(message.arguments.len(), 2);
}

/// Keyword sends bind loosest: the binary send becomes the receiver.
#[test]
fn keyword_binds_loosest() {
    let Node::Message(message) = parsed("2 + 3 max: 2") else {
        panic!("expected a message root");
    };
    assert_eq!(message.selector(), "max:");
    let Node::Message(receiver) = message.receiver.as_ref() else {
        panic!("expected the receiver to be the binary send");
    };
    assert_eq!(receiver.selector(), "+");
}

/// Parentheses escape precedence and are recorded on the wrapped node.
#[test]
fn parentheses_group_and_are_recorded() {
    let Node::Message(outer) = parsed("(1 + 2) * 3") else {
        panic!("expected a message root");
    };
    assert_eq!(outer.selector(), "*");
    let Node::Message(inner) = outer.receiver.as_ref() else {
        panic!("expected the receiver to be the grouped send");
    };
    assert_eq!(inner.selector(), "+");
    assert_eq!(inner.parens.len(), 1);
}

// =============================================================================
// 3. assignment, sequences, cascades
// =============================================================================

/// `name := expr` parses to an assignment node.
#[test]
fn assignment() {
    let Node::Assignment(assignment) = parsed("x := 1") else {
        panic!("expected an assignment root");
    };
    assert_eq!(assignment.variable.name(), "x");
    assert!(assignment.value.is_literal());
}

/// Assignment is right-associative.
#[test]
fn assignment_chains_rightward() {
    let Node::Assignment(outer) = parsed("a := b := 5") else {
        panic!("expected an assignment root");
    };
    assert_eq!(outer.variable.name(), "a");
    assert!(outer.value.is_assignment());
}

/// Temporaries and periods survive on a multi-statement sequence.
#[test]
fn sequence_with_temporaries() {
    let Node::Sequence(sequence) = parsed("|x y| x := 5. y := x. y") else {
        panic!("expected a sequence root");
    };
    assert_eq!(sequence.temporaries.len(), 2);
    assert_eq!(sequence.statements.len(), 3);
    assert_eq!(sequence.periods.len(), 2);
}

/// An empty declaration bar parses as a sequence with no temporaries.
#[test]
fn empty_temporaries_bar() {
    let Node::Sequence(sequence) = parsed("|| 1. 2") else {
        panic!("expected a sequence root");
    };
    assert!(sequence.temporaries.is_empty());
    assert_eq!(sequence.statements.len(), 2);
}

/// Cascade messages share one receiver and record their semicolons.
#[test]
fn cascade_shares_receiver() {
    let Node::Cascade(cascade) = parsed("#(1 2) at: 1; at: 2") else {
        panic!("expected a cascade root");
    };
    assert_eq!(cascade.messages.len(), 2);
    assert_eq!(cascade.semicolons.len(), 1);
    for message in &cascade.messages {
        assert_eq!(message.selector(), "at:");
        assert!(std::rc::Rc::ptr_eq(&message.receiver, &cascade.messages[0].receiver));
    }
}

/// A binary continuation is accepted after the semicolon.
#[test]
fn cascade_with_binary_tail() {
    let Node::Cascade(cascade) = parsed("5 max: 3; + 2") else {
        panic!("expected a cascade root");
    };
    assert_eq!(cascade.messages[1].selector(), "+");
}

// =============================================================================
// 4. blocks and literal arrays
// =============================================================================

/// Block parameters are declared with colons and closed by a bar.
#[test]
fn block_with_parameters() {
    let Node::Block(block) = parsed("[:a :b | a + b]") else {
        panic!("expected a block root");
    };
    assert_eq!(block.arguments.len(), 2);
    assert_eq!(block.colons.len(), 2);
    assert!(block.bar.is_some());
    assert_eq!(block.body.statements.len(), 1);
}

/// A zero-argument block omits the bar.
#[test]
fn block_without_parameters() {
    let Node::Block(block) = parsed("[5 + 7]") else {
        panic!("expected a block root");
    };
    assert!(block.arguments.is_empty());
    assert!(block.bar.is_none());
}

/// Literal arrays may nest and mix literal kinds.
#[test]
fn literal_array_contents() {
    let Node::LiteralArray(array) = parsed("#(1 #(2 3) 'x' true)") else {
        panic!("expected a literal array root");
    };
    assert_eq!(array.contents.len(), 4);
    assert!(matches!(array.contents[1], Node::LiteralArray(_)));
}

// =============================================================================
// 5. errors
// =============================================================================

/// The Smalltalk return statement is outside the supported subset.
#[test]
fn return_statement_is_not_implemented() {
    assert!(matches!(parse_error("^ 5"), ParseError::NotImplemented { .. }));
}

/// Byte array literals are outside the supported subset.
#[test]
fn byte_arrays_are_not_implemented() {
    assert!(matches!(parse_error("#[1 2]"), ParseError::NotImplemented { .. }));
}

/// A unary continuation after the semicolon is rejected.
#[test]
fn cascade_rejects_unary_tail() {
    assert!(matches!(parse_error("1 + 2; abs"), ParseError::MessageExpected { .. }));
}

/// A bare multi-keyword selector cannot start an expression.
#[test]
fn bare_multi_keyword_selector_is_rejected() {
    assert!(matches!(parse_error("at:put:"), ParseError::UnexpectedToken { .. }));
}

/// Unclosed groupings are reported with the expected terminal.
#[test]
fn unclosed_groupings() {
    assert!(matches!(parse_error("(1 + 2"), ParseError::UnexpectedToken { .. }));
    assert!(matches!(parse_error("[1. 2"), ParseError::UnexpectedToken { .. }));
    assert!(matches!(parse_error("#(1 2"), ParseError::UnexpectedToken { .. }));
}

/// Two statements need a period between them.
#[test]
fn missing_period_between_statements() {
    assert!(matches!(parse_error("1 2"), ParseError::UnexpectedToken { .. }));
}

/// Leftover closers after the program are rejected.
#[test]
fn trailing_tokens_are_rejected() {
    assert!(matches!(parse_error("1)"), ParseError::UnexpectedToken { .. }));
}

/// Scan failures surface as scan errors, not parse errors.
#[test]
fn unterminated_string_surfaces_as_scan_error() {
    assert!(matches!(parse("'abc"), Err(Error::Scan(_))));
}

/// A block's parameters require the bar before a non-empty body.
#[test]
fn block_parameters_require_bar() {
    assert!(matches!(parse_error("[:a 5]"), ParseError::UnexpectedToken { .. }));
}
