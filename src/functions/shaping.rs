//! Shader-style shaping functions. `min`, `max`, `clamp`, `mix`, `step` and
//! `smoothstep` follow the GLSL definitions; `lerp` and `saturate` are the HLSL
//! names.

use crate::functions::{Function, Registry};
use mathexpr_macros::builtin;

pub fn register(registry: &mut Registry) {
    registry.add_function("mod", modulo_entry());
    registry.add_function("min", min_entry());
    registry.add_function("max", max_entry());
    registry.add_function("step", step_entry());
    registry.add_function("hypot", hypot_entry());
    registry.add_function("smoothabs", smoothabs_entry());
    registry.add_function("clamp", clamp_entry());
    registry.add_function("saturate", saturate_entry());
    registry.add_function("lerp", mix_entry());
    registry.add_function("mix", mix_entry());
    registry.add_function("smoothstep", smoothstep_entry());
}

/// Remainder with the sign of `a`, like C's `fmod`.
#[builtin]
fn modulo(a: f64, b: f64) -> f64 {
    a % b
}

#[builtin]
fn min(x: f64, y: f64) -> f64 {
    if x < y {
        x
    } else {
        y
    }
}

#[builtin]
fn max(x: f64, y: f64) -> f64 {
    if x > y {
        x
    } else {
        y
    }
}

#[builtin]
fn step(edge: f64, x: f64) -> f64 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

#[builtin]
fn hypot(a: f64, b: f64) -> f64 {
    a.hypot(b)
}

/// `sqrt(v² + |k|)`: an absolute value rounded off near zero.
#[builtin]
fn smoothabs(v: f64, k: f64) -> f64 {
    (v * v + k.abs()).sqrt()
}

#[builtin]
fn clamp(x: f64, min_val: f64, max_val: f64) -> f64 {
    min(max(x, min_val), max_val)
}

#[builtin]
fn saturate(x: f64) -> f64 {
    clamp(x, 0.0, 1.0)
}

#[builtin]
fn mix(x: f64, y: f64, a: f64) -> f64 {
    x * (1.0 - a) + y * a
}

#[builtin]
fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
