//! The Array selector table.
//!
//! `at:` indexes from 1. Binary arithmetic broadcasts over the elements,
//! producing a new array with the scalar applied element-wise; every
//! element must be a number.

use std::rc::Rc;

use crate::{
    error::{EvalError, EvalResult},
    methods::{does_not_understand, number, number_argument, type_mismatch},
    value::{Kind, Value},
};

pub(crate) fn dispatch(receiver: &Rc<[Value]>, selector: &str, arguments: &[Value]) -> EvalResult<Value> {
    match (selector, arguments) {
        ("at:", [argument]) => {
            let index = number_argument(selector, argument)?;
            let position = index as i64;
            if position < 1 || position > receiver.len() as i64 {
                return Err(EvalError::IndexOutOfRange {
                    index,
                    length: receiver.len(),
                });
            }
            Ok(receiver[(position - 1) as usize].clone())
        }
        ("+" | "-" | "*" | "/" | r"\\" | "//", [argument]) => {
            let scalar = number_argument(selector, argument)?;
            broadcast(receiver, selector, scalar)
        }
        _ => Err(does_not_understand(Kind::Array, selector)),
    }
}

fn broadcast(receiver: &Rc<[Value]>, selector: &str, scalar: f64) -> EvalResult<Value> {
    let mut result = Vec::with_capacity(receiver.len());
    for element in receiver.iter() {
        let Value::Number(value) = element else {
            return Err(type_mismatch(selector, Kind::Number, element));
        };
        result.push(Value::Number(apply(selector, *value, scalar)));
    }
    Ok(Value::Array(result.into()))
}

fn apply(selector: &str, element: f64, scalar: f64) -> f64 {
    match selector {
        "+" => element + scalar,
        "-" => element - scalar,
        "*" => element * scalar,
        "/" => element / scalar,
        r"\\" => number::modulo(element, scalar),
        "//" => (element / scalar).floor(),
        _ => unreachable!("broadcast is only called for arithmetic selectors"),
    }
}
