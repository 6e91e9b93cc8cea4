//! AST node types produced by the parser.
//!
//! The node set is a closed sum type; child links are `Rc` so cascade
//! messages can share their receiver and block values can share their node
//! with the tree. Nodes are immutable after parsing. Parent links are
//! deliberately absent: traversals pass context explicitly.

use std::rc::Rc;

use ahash::AHashSet;
use smallvec::SmallVec;

use crate::token::Token;

/// An inclusive byte interval in the source, used for source mapping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub stop: usize,
}

/// A program node.
#[derive(Debug, Clone)]
pub enum Node {
    Sequence(SequenceNode),
    Assignment(AssignmentNode),
    Variable(VariableNode),
    Literal(LiteralNode),
    LiteralArray(LiteralArrayNode),
    Message(MessageNode),
    Cascade(CascadeNode),
    Block(Rc<BlockNode>),
}

impl Node {
    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }

    pub fn is_assignment(&self) -> bool {
        matches!(self, Self::Assignment(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_) | Self::LiteralArray(_))
    }

    /// Records that this node was wrapped in parentheses at `span`.
    ///
    /// Block nodes are already reference-counted by the time the parser
    /// sees the closing parenthesis, but the count is still one there, so
    /// the write-through always succeeds.
    pub(crate) fn add_parenthesis(&mut self, span: Span) {
        match self {
            Self::Sequence(_) => {}
            Self::Assignment(node) => node.parens.push(span),
            Self::Variable(node) => node.parens.push(span),
            Self::Literal(node) => node.parens.push(span),
            Self::LiteralArray(node) => node.parens.push(span),
            Self::Message(node) => node.parens.push(span),
            Self::Cascade(node) => node.parens.push(span),
            Self::Block(node) => {
                if let Some(block) = Rc::get_mut(node) {
                    block.parens.push(span);
                }
            }
        }
    }

    /// Collects the names of every variable the node reads into `names`.
    ///
    /// Assignment targets are included; over-approximating the read set
    /// only ever invalidates a cached value that would re-evaluate to the
    /// same result.
    pub(crate) fn collect_variable_names(&self, names: &mut AHashSet<String>) {
        match self {
            Self::Sequence(node) => {
                for statement in &node.statements {
                    statement.collect_variable_names(names);
                }
            }
            Self::Assignment(node) => {
                names.insert(node.variable.name().to_owned());
                node.value.collect_variable_names(names);
            }
            Self::Variable(node) => {
                names.insert(node.name().to_owned());
            }
            Self::Literal(_) | Self::LiteralArray(_) => {}
            Self::Message(node) => {
                node.receiver.collect_variable_names(names);
                for argument in &node.arguments {
                    argument.collect_variable_names(names);
                }
            }
            Self::Cascade(node) => {
                if let Some(first) = node.messages.first() {
                    first.receiver.collect_variable_names(names);
                }
                for message in &node.messages {
                    for argument in &message.arguments {
                        argument.collect_variable_names(names);
                    }
                }
            }
            Self::Block(node) => node.body_reads(names),
        }
    }

    /// Collects the names of every assignment target in the node, block
    /// bodies included.
    ///
    /// This is the program's static write set. It over-approximates the
    /// persistent writes an evaluation can make (block-local assignments
    /// never escape their invocation scope), which is safe for cache
    /// invalidation.
    pub(crate) fn collect_assigned_names(&self, names: &mut AHashSet<String>) {
        match self {
            Self::Sequence(node) => {
                for statement in &node.statements {
                    statement.collect_assigned_names(names);
                }
            }
            Self::Assignment(node) => {
                names.insert(node.variable.name().to_owned());
                node.value.collect_assigned_names(names);
            }
            Self::Variable(_) | Self::Literal(_) | Self::LiteralArray(_) => {}
            Self::Message(node) => {
                node.receiver.collect_assigned_names(names);
                for argument in &node.arguments {
                    argument.collect_assigned_names(names);
                }
            }
            Self::Cascade(node) => {
                if let Some(first) = node.messages.first() {
                    first.receiver.collect_assigned_names(names);
                }
                for message in &node.messages {
                    for argument in &message.arguments {
                        argument.collect_assigned_names(names);
                    }
                }
            }
            Self::Block(node) => {
                for statement in &node.body.statements {
                    statement.collect_assigned_names(names);
                }
            }
        }
    }
}

/// A statement list with optional temporaries declaration.
#[derive(Debug, Clone, Default)]
pub struct SequenceNode {
    pub temporaries: Vec<VariableNode>,
    pub statements: Vec<Node>,
    /// Byte offsets of the `|` pair around the temporaries, if declared.
    pub left_bar: Option<usize>,
    pub right_bar: Option<usize>,
    /// Byte offsets of the statement-separating periods.
    pub periods: Vec<usize>,
}

/// `name := value`, right-associative.
#[derive(Debug, Clone)]
pub struct AssignmentNode {
    pub variable: VariableNode,
    pub value: Rc<Node>,
    /// Byte offset of the `:=` operator.
    pub position: usize,
    pub parens: Vec<Span>,
}

/// A variable reference (or assignment target / block parameter).
#[derive(Debug, Clone)]
pub struct VariableNode {
    pub token: Token,
    pub parens: Vec<Span>,
}

impl VariableNode {
    pub fn name(&self) -> &str {
        &self.token.text
    }
}

/// A literal value: number, string, boolean, or nil.
///
/// The node keeps the source lexeme; the evaluator re-parses numbers with
/// the standard float parser so both sides agree on representation.
#[derive(Debug, Clone)]
pub struct LiteralNode {
    pub token: Token,
    pub parens: Vec<Span>,
}

/// `#( … )` with literal contents; arrays may nest.
#[derive(Debug, Clone)]
pub struct LiteralArrayNode {
    pub start: usize,
    pub stop: usize,
    /// `Literal` and `LiteralArray` nodes only.
    pub contents: Vec<Node>,
    pub parens: Vec<Span>,
}

/// A message send: unary, binary, or keyword.
#[derive(Debug, Clone)]
pub struct MessageNode {
    /// Shared with sibling messages when part of a cascade.
    pub receiver: Rc<Node>,
    /// One token for unary/binary sends, one per keyword part otherwise.
    pub selector_parts: SmallVec<[Token; 2]>,
    pub arguments: Vec<Node>,
    pub parens: Vec<Span>,
}

impl MessageNode {
    /// The full selector: the concatenation of the part lexemes.
    pub fn selector(&self) -> String {
        self.selector_parts.iter().map(|part| part.text.as_str()).collect()
    }
}

/// Several messages sent to one shared receiver: `r m1 ; m2 ; m3`.
#[derive(Debug, Clone)]
pub struct CascadeNode {
    pub messages: Vec<MessageNode>,
    /// Byte offsets of the separating semicolons.
    pub semicolons: Vec<usize>,
    pub parens: Vec<Span>,
}

/// A block literal `[ :a :b | body ]`.
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub arguments: Vec<VariableNode>,
    /// Byte offsets of the parameter colons.
    pub colons: Vec<usize>,
    /// Byte offset of the parameter bar, when parameters are declared.
    pub bar: Option<usize>,
    /// Byte offsets of the brackets.
    pub left: usize,
    pub right: usize,
    pub body: SequenceNode,
    pub parens: Vec<Span>,
}

impl BlockNode {
    fn body_reads(&self, names: &mut AHashSet<String>) {
        for statement in &self.body.statements {
            statement.collect_variable_names(names);
        }
    }
}
