use crate::ast::NEGATE;
use crate::functions::{Function, Registry};
use mathexpr_macros::builtin;

pub fn register(registry: &mut Registry) {
    registry.add_function(NEGATE, negate_entry());
    registry.add_function("abs", abs_entry());
    registry.add_function("floor", floor_entry());
    registry.add_function("ceil", ceil_entry());
    registry.add_function("round", round_entry());
    registry.add_function("fract", fract_entry());
    registry.add_function("sign", sign_entry());
    registry.add_function("fact", fact_entry());
}

/// `n!` for non-negative integral `n`, `None` otherwise.
pub fn factorial(value: f64) -> Option<f64> {
    if value < 0.0 || value.floor() != value {
        return None;
    }
    // anything past 170! is infinite anyway
    let count = value.min(171.0) as u32;
    Some((1..=count).fold(1.0, |acc, i| acc * i as f64))
}

#[builtin]
fn negate(a: f64) -> f64 {
    -a
}

#[builtin]
fn abs(a: f64) -> f64 {
    a.abs()
}

#[builtin]
fn floor(a: f64) -> f64 {
    a.floor()
}

#[builtin]
fn ceil(a: f64) -> f64 {
    a.ceil()
}

/// Halfway cases round away from zero.
#[builtin]
fn round(a: f64) -> f64 {
    a.round()
}

#[builtin]
fn fract(a: f64) -> f64 {
    a - a.floor()
}

/// Unlike `f64::signum`, zero maps to zero.
#[builtin]
fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

#[builtin]
fn fact(a: f64) -> f64 {
    factorial(a).unwrap_or(f64::NAN)
}
