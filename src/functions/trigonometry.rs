use crate::functions::{Function, Registry};
use mathexpr_macros::builtin;

pub fn register(registry: &mut Registry) {
    registry.add_function("sin", sin_entry());
    registry.add_function("cos", cos_entry());
    registry.add_function("tan", tan_entry());
    registry.add_function("asin", asin_entry());
    registry.add_function("acos", acos_entry());
    registry.add_function("atan", atan_entry());
    registry.add_function("atan2", atan2_entry());
    registry.add_function("sinh", sinh_entry());
    registry.add_function("cosh", cosh_entry());
    registry.add_function("tanh", tanh_entry());
    registry.add_function("asinh", asinh_entry());
    registry.add_function("acosh", acosh_entry());
    registry.add_function("atanh", atanh_entry());
}

#[builtin]
fn sin(a: f64) -> f64 {
    a.sin()
}

#[builtin]
fn cos(a: f64) -> f64 {
    a.cos()
}

#[builtin]
fn tan(a: f64) -> f64 {
    a.tan()
}

#[builtin]
fn asin(a: f64) -> f64 {
    a.asin()
}

#[builtin]
fn acos(a: f64) -> f64 {
    a.acos()
}

#[builtin]
fn atan(a: f64) -> f64 {
    a.atan()
}

/// Angle of the point `(x, y)`, argument order as in C: `atan2(y, x)`.
#[builtin]
fn atan2(y: f64, x: f64) -> f64 {
    y.atan2(x)
}

#[builtin]
fn sinh(a: f64) -> f64 {
    a.sinh()
}

#[builtin]
fn cosh(a: f64) -> f64 {
    a.cosh()
}

#[builtin]
fn tanh(a: f64) -> f64 {
    a.tanh()
}

#[builtin]
fn asinh(a: f64) -> f64 {
    a.asinh()
}

#[builtin]
fn acosh(a: f64) -> f64 {
    a.acosh()
}

#[builtin]
fn atanh(a: f64) -> f64 {
    a.atanh()
}
