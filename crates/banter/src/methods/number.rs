//! The Number selector table.
//!
//! Trigonometric selectors treat their receiver as radians; convert with
//! `degreesToRadians` first. Arithmetic follows IEEE 754 throughout, so
//! division by zero and `sqrt` of a negative receiver propagate as
//! infinity and NaN rather than erroring.

use crate::{
    error::EvalResult,
    methods::{does_not_understand, number_argument},
    value::{Kind, Value},
};

pub(crate) fn dispatch(receiver: f64, selector: &str, arguments: &[Value]) -> EvalResult<Value> {
    match (selector, arguments) {
        ("value", []) => Ok(Value::Number(receiver)),

        ("=", [argument]) => compare(receiver, selector, argument, |a, b| a == b),
        ("~=", [argument]) => compare(receiver, selector, argument, |a, b| a != b),
        (">", [argument]) => compare(receiver, selector, argument, |a, b| a > b),
        (">=", [argument]) => compare(receiver, selector, argument, |a, b| a >= b),
        ("<", [argument]) => compare(receiver, selector, argument, |a, b| a < b),
        ("<=", [argument]) => compare(receiver, selector, argument, |a, b| a <= b),

        ("+", [argument]) => arithmetic(receiver, selector, argument, |a, b| a + b),
        ("-", [argument]) => arithmetic(receiver, selector, argument, |a, b| a - b),
        ("*", [argument]) => arithmetic(receiver, selector, argument, |a, b| a * b),
        ("/", [argument]) => arithmetic(receiver, selector, argument, |a, b| a / b),
        (r"\\", [argument]) => arithmetic(receiver, selector, argument, modulo),
        ("//", [argument]) => arithmetic(receiver, selector, argument, |a, b| (a / b).floor()),
        ("rem:", [argument]) => arithmetic(receiver, selector, argument, remainder),
        ("max:", [argument]) => {
            let other = number_argument(selector, argument)?;
            Ok(Value::Number(if receiver > other { receiver } else { other }))
        }
        ("min:", [argument]) => {
            let other = number_argument(selector, argument)?;
            Ok(Value::Number(if receiver > other { other } else { receiver }))
        }

        ("abs", []) => Ok(Value::Number(receiver.abs())),
        ("sqrt", []) => Ok(Value::Number(receiver.sqrt())),
        ("sqr", []) => Ok(Value::Number(receiver * receiver)),
        ("sin", []) => Ok(Value::Number(receiver.sin())),
        ("cos", []) => Ok(Value::Number(receiver.cos())),
        ("tan", []) => Ok(Value::Number(receiver.tan())),
        ("arcSin", []) => Ok(Value::Number(receiver.asin())),
        ("arcCos", []) => Ok(Value::Number(receiver.acos())),
        ("arcTan", []) => Ok(Value::Number(receiver.atan())),
        ("rounded", []) => Ok(Value::Number(receiver.round())),
        ("truncated", []) => Ok(Value::Number(receiver.trunc())),
        ("fractionPart", []) => Ok(Value::Number(receiver - receiver.trunc())),
        ("floor", []) => Ok(Value::Number(receiver.floor())),
        ("ceiling", []) => Ok(Value::Number(receiver.ceil())),
        ("negated", []) => Ok(Value::Number(-receiver)),
        ("degreesToRadians", []) => Ok(Value::Number(receiver.to_radians())),

        _ => Err(does_not_understand(Kind::Number, selector)),
    }
}

fn arithmetic(
    receiver: f64,
    selector: &str,
    argument: &Value,
    operation: impl FnOnce(f64, f64) -> f64,
) -> EvalResult<Value> {
    let other = number_argument(selector, argument)?;
    Ok(Value::Number(operation(receiver, other)))
}

fn compare(
    receiver: f64,
    selector: &str,
    argument: &Value,
    operation: impl FnOnce(f64, f64) -> bool,
) -> EvalResult<Value> {
    let other = number_argument(selector, argument)?;
    Ok(Value::Boolean(operation(receiver, other)))
}

/// Integer modulo of the truncated operands, carrying the dividend's sign.
/// Distinct from `rem:`, which works on the floats themselves. A zero
/// divisor yields NaN, keeping arithmetic error-free like `/`.
pub(super) fn modulo(receiver: f64, argument: f64) -> f64 {
    let divisor = argument as i64;
    if divisor == 0 {
        return f64::NAN;
    }
    ((receiver as i64) % divisor) as f64
}

/// Truncated remainder: `receiver - trunc(receiver/argument) * argument`.
pub(super) fn remainder(receiver: f64, argument: f64) -> f64 {
    receiver - (receiver / argument).trunc() * argument
}
