use crate::ast::{ASTNode, FACTORIAL};
use crate::error::{ErrorCode, ExprError, ExprResult};
use crate::functions::common::factorial;
use crate::functions::Registry;
use log::trace;
use std::collections::HashMap;

/// Most arguments any registered function takes.
const MAX_ARGS: usize = 3;

/// Recursive tree walk resolving a parsed expression to a number.
pub struct Evaluator<'a> {
    registry: &'a Registry,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Evaluates `ast` with variable values taken from `context`.
    ///
    /// Every node's result is checked, so a NaN or infinity fails at the node
    /// that produced it instead of surfacing only at the root.
    pub fn evaluate(&self, ast: &ASTNode, context: &HashMap<String, f64>) -> ExprResult<f64> {
        let result = match ast {
            ASTNode::Number(n) => *n,

            ASTNode::Variable(name) => context.get(name).copied().ok_or_else(|| {
                ExprError::new(
                    ErrorCode::VariableNotFound,
                    format!("Variable not found: {}", name),
                )
            })?,

            ASTNode::BinaryOperation {
                left,
                operator,
                right,
            } => {
                let left_value = self.evaluate(left, context)?;
                let right_value = self.evaluate(right, context)?;
                operator.apply(left_value, right_value)?
            }

            ASTNode::FunctionCall { name, args } => self.call_function(name, args, context)?,
        };

        if result.is_nan() {
            return Err(ExprError::new(ErrorCode::EvaluationNan, "Result is NaN"));
        }
        if result.is_infinite() {
            return Err(ExprError::new(ErrorCode::EvaluationInf, "Result is Inf"));
        }

        trace!("Evaluating node: {}", result);
        Ok(result)
    }

    fn call_function(
        &self,
        name: &str,
        args: &[ASTNode],
        context: &HashMap<String, f64>,
    ) -> ExprResult<f64> {
        let function = self.registry.function(name);
        let expected = match function {
            Some(function) => function.arity(),
            None if name == FACTORIAL => 1,
            None => {
                return Err(ExprError::new(
                    ErrorCode::FunctionNotFound,
                    format!("Function not found: {}", name),
                ))
            }
        };

        // the function may have been redefined since the tree was built
        if args.len() != expected {
            return Err(ExprError::new(
                ErrorCode::FunctionWrongArgumentsCount,
                format!(
                    "Incorrect number of arguments for function {}: expected {}, got {}",
                    name,
                    expected,
                    args.len()
                ),
            ));
        }

        let mut values = [0.0; MAX_ARGS];
        for (slot, arg) in values.iter_mut().zip(args) {
            *slot = self.evaluate(arg, context)?;
        }
        let values = &values[..args.len()];

        match function {
            Some(function) => function.call(values),
            None => factorial(values[0]).ok_or_else(|| {
                ExprError::parse("Factorial is not defined for negative or non-integer values")
            }),
        }
    }
}
