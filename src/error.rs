use std::fmt;
use thiserror::Error;

/// Closed set of failure kinds raised while parsing or evaluating an expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParseError,
    EvaluationNan,
    EvaluationInf,
    DivisionByZero,
    UnknownNodeType,
    EmptyParenthesis,
    VariableNotFound,
    FunctionNotFound,
    OperatorNotFound,
    UnmatchedParenthesis,
    FunctionWrongArgumentsCount,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::EvaluationNan => "EVALUATION_NAN",
            ErrorCode::EvaluationInf => "EVALUATION_INF",
            ErrorCode::DivisionByZero => "DIVISION_BY_ZERO",
            ErrorCode::UnknownNodeType => "UNKNOWN_NODE_TYPE",
            ErrorCode::EmptyParenthesis => "EMPTY_PARENTHESIS",
            ErrorCode::VariableNotFound => "VARIABLE_NOT_FOUND",
            ErrorCode::FunctionNotFound => "FUNCTION_NOT_FOUND",
            ErrorCode::OperatorNotFound => "OPERATOR_NOT_FOUND",
            ErrorCode::UnmatchedParenthesis => "UNMATCHED_PARENTHESIS",
            ErrorCode::FunctionWrongArgumentsCount => "FUNCTION_WRONG_ARGUMENTS_COUNT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every fallible parse or evaluation step.
///
/// Carries the [`ErrorCode`] callers match on, plus a message meant for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ExprError {
    code: ErrorCode,
    message: String,
}

impl ExprError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type ExprResult<T> = Result<T, ExprError>;
