use crate::functions::{Function, Registry};
use mathexpr_macros::builtin;

pub fn register(registry: &mut Registry) {
    registry.add_function("ln", ln_entry());
    registry.add_function("log", ln_entry());
    registry.add_function("log1p", log1p_entry());
    registry.add_function("logb", logb_entry());
    registry.add_function("log2", log2_entry());
    registry.add_function("log10", log10_entry());
    registry.add_function("sqrt", sqrt_entry());
    registry.add_function("exp", exp_entry());
    registry.add_function("pow", pow_entry());
}

#[builtin]
fn ln(a: f64) -> f64 {
    a.ln()
}

#[builtin]
fn log1p(a: f64) -> f64 {
    a.ln_1p()
}

/// Unbiased binary exponent of `a`, as C's `logb`.
#[builtin]
fn logb(a: f64) -> f64 {
    if a == 0.0 {
        return f64::NEG_INFINITY;
    }
    if !a.is_finite() {
        return a.abs();
    }
    let biased = ((a.to_bits() >> 52) & 0x7ff) as i64;
    if biased == 0 {
        // subnormal
        a.abs().log2().floor()
    } else {
        (biased - 1023) as f64
    }
}

#[builtin]
fn log2(a: f64) -> f64 {
    a.log2()
}

#[builtin]
fn log10(a: f64) -> f64 {
    a.log10()
}

#[builtin]
fn sqrt(a: f64) -> f64 {
    a.sqrt()
}

#[builtin]
fn exp(a: f64) -> f64 {
    a.exp()
}

/// NaN for a negative base, matching the `^` operator.
#[builtin]
fn pow(base: f64, exponent: f64) -> f64 {
    if base < 0.0 {
        f64::NAN
    } else {
        base.powf(exponent)
    }
}
