pub mod common;
pub mod exponential;
pub mod shaping;
pub mod trigonometry;

use crate::error::{ErrorCode, ExprError, ExprResult};
use std::collections::HashMap;
use std::f64::consts;
use std::fmt;
use std::sync::Arc;

pub type UnaryFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;
pub type BinaryFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;
pub type TernaryFn = Arc<dyn Fn(f64, f64, f64) -> f64 + Send + Sync>;

/// A registered callable. The variant is the function's arity.
#[derive(Clone)]
pub enum Function {
    Unary(UnaryFn),
    Binary(BinaryFn),
    Ternary(TernaryFn),
}

impl Function {
    pub fn arity(&self) -> usize {
        match self {
            Function::Unary(_) => 1,
            Function::Binary(_) => 2,
            Function::Ternary(_) => 3,
        }
    }

    pub fn call(&self, args: &[f64]) -> ExprResult<f64> {
        match (self, args) {
            (Function::Unary(f), [a]) => Ok(f(*a)),
            (Function::Binary(f), [a, b]) => Ok(f(*a, *b)),
            (Function::Ternary(f), [a, b, c]) => Ok(f(*a, *b, *c)),
            _ => Err(ExprError::new(
                ErrorCode::FunctionWrongArgumentsCount,
                format!(
                    "Expected {} arguments, but got {}",
                    self.arity(),
                    args.len()
                ),
            )),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function(arity = {})", self.arity())
    }
}

/// Functions and constants known to a session.
///
/// Adding a name that already exists overwrites the previous entry. Constants are
/// folded into the tree when an expression is parsed, so changing one afterwards
/// only affects later parses. Functions are looked up by name both when parsing
/// (arity check) and when evaluating.
#[derive(Debug, Clone)]
pub struct Registry {
    functions: HashMap<String, Function>,
    constants: HashMap<String, f64>,
}

impl Default for Registry {
    /// A registry seeded with the builtin functions, `pi` and `e`.
    fn default() -> Self {
        let mut registry = Self::empty();
        register_constants(&mut registry);
        register_functions(&mut registry);
        registry
    }
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
            constants: HashMap::new(),
        }
    }

    pub fn add_function(&mut self, name: &str, function: Function) -> &mut Self {
        self.functions.insert(name.to_string(), function);
        self
    }

    pub fn add_unary<F>(&mut self, name: &str, function: F) -> &mut Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.add_function(name, Function::Unary(Arc::new(function)))
    }

    pub fn add_binary<F>(&mut self, name: &str, function: F) -> &mut Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.add_function(name, Function::Binary(Arc::new(function)))
    }

    pub fn add_ternary<F>(&mut self, name: &str, function: F) -> &mut Self
    where
        F: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.add_function(name, Function::Ternary(Arc::new(function)))
    }

    pub fn add_constant(&mut self, name: &str, value: f64) -> &mut Self {
        self.constants.insert(name.to_string(), value);
        self
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }
}

pub fn register_constants(registry: &mut Registry) {
    registry
        .add_constant("pi", consts::PI)
        .add_constant("e", consts::E);
}

pub fn register_functions(registry: &mut Registry) {
    common::register(registry);
    trigonometry::register(registry);
    exponential::register(registry);
    shaping::register(registry);
}
