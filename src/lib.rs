pub mod ast;
pub mod error;
pub mod expr;
pub mod functions;
pub mod sampling;

pub use error::{ErrorCode, ExprError, ExprResult};
pub use expr::Expr;
pub use functions::{Function, Registry};

/// Parses and evaluates `expression` once, with the default builtins and the
/// given variable values.
pub fn evaluate_expression(
    expression: &str,
    context: &std::collections::HashMap<String, f64>,
) -> ExprResult<f64> {
    let mut expr = Expr::new();
    expr.defined_vars_mut().extend(context.clone());
    Ok(expr.parse(expression)?.eval()?.result())
}
