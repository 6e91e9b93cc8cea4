//! The Boolean selector table.
//!
//! `and:`/`or:` take a block and evaluate it only when the receiver does
//! not already decide the result; `&`/`|` take an already-evaluated
//! boolean. The one-armed conditionals answer the undefined value when the
//! branch is not taken.

use crate::{
    error::EvalResult,
    eval,
    methods::{block_argument, boolean_argument, does_not_understand, type_mismatch},
    value::{Kind, Value},
};

pub(crate) fn dispatch(receiver: bool, selector: &str, arguments: &[Value]) -> EvalResult<Value> {
    match (selector, arguments) {
        ("value", []) => Ok(Value::Boolean(receiver)),

        ("=", [argument]) => Ok(Value::Boolean(receiver == boolean_argument(selector, argument)?)),
        ("~=", [argument]) => Ok(Value::Boolean(receiver != boolean_argument(selector, argument)?)),
        ("&", [argument]) => Ok(Value::Boolean(receiver & boolean_argument(selector, argument)?)),
        ("|", [argument]) => Ok(Value::Boolean(receiver | boolean_argument(selector, argument)?)),
        ("xor:", [argument]) => Ok(Value::Boolean(receiver != boolean_argument(selector, argument)?)),
        ("not", []) => Ok(Value::Boolean(!receiver)),

        ("and:", [argument]) => {
            let block = block_argument(selector, argument)?;
            if receiver {
                boolean_result(selector, eval::eval_block_body(block)?)
            } else {
                Ok(Value::Boolean(false))
            }
        }
        ("or:", [argument]) => {
            let block = block_argument(selector, argument)?;
            if receiver {
                Ok(Value::Boolean(true))
            } else {
                boolean_result(selector, eval::eval_block_body(block)?)
            }
        }

        ("ifTrue:", [argument]) => {
            if receiver {
                argument.clone().force()
            } else {
                Ok(Value::Undefined)
            }
        }
        ("ifFalse:", [argument]) => {
            if receiver {
                Ok(Value::Undefined)
            } else {
                argument.clone().force()
            }
        }
        ("ifTrue:ifFalse:", [when_true, when_false]) => {
            if receiver {
                when_true.clone().force()
            } else {
                when_false.clone().force()
            }
        }
        ("ifFalse:ifTrue:", [when_false, when_true]) => {
            if receiver {
                when_true.clone().force()
            } else {
                when_false.clone().force()
            }
        }

        _ => Err(does_not_understand(Kind::Boolean, selector)),
    }
}

/// A short-circuit block must produce a boolean.
fn boolean_result(selector: &str, value: Value) -> EvalResult<Value> {
    match value {
        Value::Boolean(_) => Ok(value),
        other => Err(type_mismatch(selector, Kind::Boolean, &other)),
    }
}
