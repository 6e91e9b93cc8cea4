#![doc = include_str!("../../../README.md")]

mod cache;
mod error;
mod eval;
mod expressions;
mod methods;
mod object;
mod parse;
mod reader;
mod run;
mod scanner;
mod scope;
mod token;
mod tracer;
mod value;

pub use crate::{
    error::{Error, EvalError, ParseError, ScanError},
    expressions::{
        AssignmentNode, BlockNode, CascadeNode, LiteralArrayNode, LiteralNode, MessageNode, Node,
        SequenceNode, Span, VariableNode,
    },
    object::Object,
    parse::parse,
    run::Vm,
    scope::Scope,
    token::{Token, TokenKind},
    tracer::{NoopTracer, StderrTracer, VmTracer},
    value::Kind,
};
