//! Tree-walking evaluation of program nodes.
//!
//! Evaluation takes a node and a scope and returns a value. Statements run
//! in source order, message arguments evaluate left to right before the
//! send, and cascades evaluate their shared receiver exactly once.

use std::rc::Rc;

use crate::{
    error::{EvalError, EvalResult},
    expressions::{CascadeNode, Node, SequenceNode},
    scope::Scope,
    token::TokenKind,
    value::{BlockValue, Value},
};

pub(crate) fn eval_node(node: &Node, scope: &Scope) -> EvalResult<Value> {
    match node {
        Node::Sequence(sequence) => eval_sequence(sequence, scope),
        Node::Assignment(assignment) => {
            let value = eval_node(&assignment.value, scope)?;
            scope.set_value(assignment.variable.name(), value);
            // read the binding back so a deferred value is forced exactly
            // like any other variable read
            eval_variable(assignment.variable.name(), scope)
        }
        Node::Variable(variable) => eval_variable(variable.name(), scope),
        Node::Literal(literal) => eval_literal(&literal.token.kind, &literal.token.text),
        Node::LiteralArray(array) => {
            let mut values = Vec::with_capacity(array.contents.len());
            for element in &array.contents {
                values.push(eval_node(element, scope)?);
            }
            Ok(Value::Array(values.into()))
        }
        Node::Message(message) => {
            let receiver = eval_node(&message.receiver, scope)?;
            let mut arguments = Vec::with_capacity(message.arguments.len());
            for argument in &message.arguments {
                arguments.push(eval_node(argument, scope)?);
            }
            receiver.perform(&message.selector(), &arguments)
        }
        Node::Cascade(cascade) => eval_cascade(cascade, scope),
        Node::Block(block) => Ok(Value::Block(BlockValue {
            node: Rc::clone(block),
            scope: scope.clone(),
        })),
    }
}

fn eval_variable(name: &str, scope: &Scope) -> EvalResult<Value> {
    let value = scope.lookup(name).ok_or_else(|| EvalError::UnboundVariable {
        name: name.to_owned(),
    })?;
    match value {
        Value::Deferred(block) => eval_block_body(&block),
        other => Ok(other),
    }
}

fn eval_literal(kind: &TokenKind, lexeme: &str) -> EvalResult<Value> {
    match kind {
        TokenKind::Number => lexeme
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| EvalError::InvalidNumber {
                lexeme: lexeme.to_owned(),
            }),
        TokenKind::Str => Ok(Value::Str(Rc::from(lexeme))),
        TokenKind::Boolean => Ok(Value::Boolean(lexeme == "true")),
        TokenKind::Nil => Ok(Value::Undefined),
        _ => unreachable!("literal nodes only carry literal tokens"),
    }
}

/// Statements evaluate in order; the sequence's value is the last
/// statement's value, or undefined for an empty sequence.
pub(crate) fn eval_sequence(sequence: &SequenceNode, scope: &Scope) -> EvalResult<Value> {
    let mut result = Value::Undefined;
    for statement in &sequence.statements {
        result = eval_node(statement, scope)?;
    }
    Ok(result)
}

fn eval_cascade(cascade: &CascadeNode, scope: &Scope) -> EvalResult<Value> {
    let Some(first) = cascade.messages.first() else {
        return Ok(Value::Undefined);
    };
    let receiver = eval_node(&first.receiver, scope)?;
    let mut result = Value::Undefined;
    for message in &cascade.messages {
        let mut arguments = Vec::with_capacity(message.arguments.len());
        for argument in &message.arguments {
            arguments.push(eval_node(argument, scope)?);
        }
        result = receiver.perform(&message.selector(), &arguments)?;
    }
    Ok(result)
}

/// Evaluates a block's body under a fresh child of its captured scope,
/// without binding parameters. This is the uniform `value` accessor used
/// by conditionals and by deferred unwrapping.
pub(crate) fn eval_block_body(block: &BlockValue) -> EvalResult<Value> {
    let invocation = Scope::child(&block.scope);
    eval_sequence(&block.node.body, &invocation)
}

/// Invokes a block with arguments, checking arity against its parameters.
pub(crate) fn invoke_block(block: &BlockValue, selector: &str, arguments: &[Value]) -> EvalResult<Value> {
    let parameters = &block.node.arguments;
    if parameters.len() != arguments.len() {
        return Err(EvalError::WrongArity {
            selector: selector.to_owned(),
            parameters: parameters.len(),
            arguments: arguments.len(),
        });
    }
    let invocation = Scope::child(&block.scope);
    for (parameter, argument) in parameters.iter().zip(arguments) {
        invocation.set_value(parameter.name(), argument.clone());
    }
    eval_sequence(&block.node.body, &invocation)
}
