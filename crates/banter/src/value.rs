//! Runtime values.
//!
//! A closed sum over the seven runtime kinds. Values expose three uniform
//! operations: a kind discriminator, the `force` accessor (which evaluates
//! block bodies and returns every other value unchanged), and `perform`
//! for message dispatch into the per-kind selector tables.

use std::rc::Rc;

use smallvec::SmallVec;
use strum::{Display, IntoStaticStr};

use crate::{
    error::{EvalError, EvalResult},
    eval,
    expressions::BlockNode,
    methods,
    scope::Scope,
};

/// Discriminator for the runtime value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum Kind {
    Number,
    String,
    Boolean,
    Array,
    Block,
    /// A block forced implicitly when the variable holding it is read.
    Deferred,
    Undefined,
}

/// A block closure: the block's node and the scope it was created in.
///
/// The scope is shared by handle, so writes to the defining scope between
/// capture and invocation are visible to the block body.
#[derive(Debug, Clone)]
pub(crate) struct BlockValue {
    pub node: Rc<BlockNode>,
    pub scope: Scope,
}

/// A runtime value.
#[derive(Debug, Clone)]
pub(crate) enum Value {
    Number(f64),
    Str(Rc<str>),
    Boolean(bool),
    Array(Rc<[Value]>),
    Block(BlockValue),
    /// Behaves like `Block` but is forced on variable read and before
    /// dispatch, letting the host install bindings that recompute lazily.
    Deferred(BlockValue),
    /// The result of a non-taken one-armed conditional.
    Undefined,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Number(_) => Kind::Number,
            Self::Str(_) => Kind::String,
            Self::Boolean(_) => Kind::Boolean,
            Self::Array(_) => Kind::Array,
            Self::Block(_) => Kind::Block,
            Self::Deferred(_) => Kind::Deferred,
            Self::Undefined => Kind::Undefined,
        }
    }

    /// The uniform `value` accessor: evaluates a block or deferred body
    /// under a fresh child of its captured scope; any other value is
    /// returned as-is.
    pub fn force(self) -> EvalResult<Self> {
        match self {
            Self::Block(block) | Self::Deferred(block) => eval::eval_block_body(&block),
            other => Ok(other),
        }
    }

    /// Forces only deferred values; blocks stay blocks so they can receive
    /// `value`/`value:` or be passed unevaluated to `and:`/`or:`.
    fn unwrap_deferred(self) -> EvalResult<Self> {
        match self {
            Self::Deferred(block) => eval::eval_block_body(&block),
            other => Ok(other),
        }
    }

    /// Sends `selector` to this value, dispatching by receiver kind.
    ///
    /// Deferred receivers and arguments are forced first; a receiver kind
    /// without a selector table, or a selector absent from the table,
    /// fails with a does-not-understand error.
    pub fn perform(&self, selector: &str, arguments: &[Self]) -> EvalResult<Self> {
        if let Self::Deferred(block) = self {
            let receiver = eval::eval_block_body(block)?;
            return receiver.perform(selector, arguments);
        }
        let arguments: SmallVec<[Self; 2]> = arguments
            .iter()
            .map(|argument| argument.clone().unwrap_deferred())
            .collect::<EvalResult<_>>()?;
        match self {
            Self::Number(receiver) => methods::number::dispatch(*receiver, selector, &arguments),
            Self::Boolean(receiver) => methods::boolean::dispatch(*receiver, selector, &arguments),
            Self::Block(receiver) => methods::block::dispatch(receiver, selector, &arguments),
            Self::Array(receiver) => methods::array::dispatch(receiver, selector, &arguments),
            other => Err(EvalError::DoesNotUnderstand {
                kind: other.kind(),
                selector: selector.to_owned(),
            }),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Formats a number the way the language spells numbers: the shortest
/// decimal form that round-trips through a 64-bit float, with lowercase
/// special values.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-inf" } else { "inf" }.to_owned();
    }
    ryu::Buffer::new().format(value).to_owned()
}
