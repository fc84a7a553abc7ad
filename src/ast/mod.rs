use crate::error::{ErrorCode, ExprError, ExprResult};

mod evaluator;
mod lexer;
mod parser;

pub use evaluator::Evaluator;
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{ParsedExpression, Parser};

/// Name of the postfix factorial pseudo-function.
pub const FACTORIAL: &str = "!";
/// Name of the prefix negation function.
pub const NEGATE: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(f64),
    Variable(String),
    BinaryOperation {
        left: Box<ASTNode>,
        operator: Operator,
        right: Box<ASTNode>,
    },
    /// Call of a registered function, or of one of the reserved `!` and `-` names.
    /// The argument count matches the callee's arity at the time of parsing.
    FunctionCall {
        name: String,
        args: Vec<ASTNode>,
    },
}

impl ASTNode {
    pub fn call(name: &str, args: Vec<ASTNode>) -> Self {
        ASTNode::FunctionCall {
            name: name.to_string(),
            args,
        }
    }

    pub fn binary(left: ASTNode, operator: Operator, right: ASTNode) -> Self {
        ASTNode::BinaryOperation {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl Operator {
    /// Binding strength used by the precedence-climbing loop. All operators are
    /// left-associative.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide | Operator::Modulo => 2,
            Operator::Power => 3,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Power => "^",
        }
    }

    pub fn apply(&self, left: f64, right: f64) -> ExprResult<f64> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide => {
                if right == 0.0 {
                    Err(ExprError::new(ErrorCode::DivisionByZero, "Division by zero"))
                } else {
                    Ok(left / right)
                }
            }
            Operator::Modulo => {
                if right == 0.0 {
                    Err(ExprError::new(ErrorCode::DivisionByZero, "Modulo by zero"))
                } else {
                    Ok(left % right)
                }
            }
            Operator::Power => {
                // same guard as the `pow` builtin
                if left < 0.0 {
                    Err(ExprError::new(
                        ErrorCode::EvaluationNan,
                        format!("Power of negative base {}", left),
                    ))
                } else {
                    Ok(left.powf(right))
                }
            }
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = ExprError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "%" => Ok(Operator::Modulo),
            "^" => Ok(Operator::Power),
            _ => Err(ExprError::new(
                ErrorCode::OperatorNotFound,
                format!("Operator not found: {}", value),
            )),
        }
    }
}
