//! The Block selector table: `value` and `value:`.

use crate::{
    error::EvalResult,
    eval,
    methods::does_not_understand,
    value::{BlockValue, Kind, Value},
};

pub(crate) fn dispatch(receiver: &BlockValue, selector: &str, arguments: &[Value]) -> EvalResult<Value> {
    match (selector, arguments) {
        ("value", []) => eval::invoke_block(receiver, selector, &[]),
        ("value:", [argument]) => eval::invoke_block(receiver, selector, std::slice::from_ref(argument)),
        _ => Err(does_not_understand(Kind::Block, selector)),
    }
}
