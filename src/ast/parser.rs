use crate::ast::{tokenize, ASTNode, Operator, Token, TokenKind, FACTORIAL, NEGATE};
use crate::error::{ErrorCode, ExprError, ExprResult};
use crate::functions::{Function, Registry};
use log::debug;
use std::collections::HashMap;

/// Precedence the binary loop gives to a trailing `!` it runs into.
const FACTORIAL_PRECEDENCE: u8 = 3;

/// The tree built by a successful parse and the variables it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExpression {
    pub root: ASTNode,
    /// Every non-constant identifier met while parsing, mapped to `0.0`.
    pub variables: HashMap<String, f64>,
}

/// Precedence-climbing parser over the token stream of one expression.
///
/// Function calls are checked against `registry` for existence and arity, and
/// constants are folded into numbers, at parse time.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    registry: &'a Registry,
    variables: HashMap<String, f64>,
}

impl<'a> Parser<'a> {
    pub fn parse_expression(input: &str, registry: &'a Registry) -> ExprResult<ParsedExpression> {
        debug!("Parsing expression: {}", input);
        let mut parser = Parser {
            tokens: tokenize(input),
            pos: 0,
            registry,
            variables: HashMap::new(),
        };

        let root = parser.parse_binary(0)?;

        if let Some(token) = parser.peek() {
            if token.kind == TokenKind::RParen {
                return Err(ExprError::new(
                    ErrorCode::UnmatchedParenthesis,
                    "Unmatched parenthesis found at the end of the expression",
                ));
            }
            return Err(ExprError::parse(format!(
                "Unexpected token '{}' found after complete parsing",
                token.text
            )));
        }

        debug!("Parse result: {:#?}", root);
        Ok(ParsedExpression {
            root,
            variables: parser.variables,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    fn next_token(&mut self) -> ExprResult<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| ExprError::parse("Unexpected end of expression"))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect_closing(&mut self) -> ExprResult<()> {
        if self.peek_kind() == Some(TokenKind::RParen) {
            self.pos += 1;
            Ok(())
        } else {
            Err(ExprError::new(
                ErrorCode::UnmatchedParenthesis,
                "Unmatched parenthesis",
            ))
        }
    }

    /// Parses operands joined by operators binding tighter than `min_precedence`.
    fn parse_binary(&mut self, min_precedence: u8) -> ExprResult<ASTNode> {
        if self.peek().is_none() {
            return Err(ExprError::parse("Unexpected end of expression"));
        }
        let mut node = self.parse_factor()?;

        loop {
            let symbol = match self.peek() {
                Some(token) if token.kind == TokenKind::Operator => token.text.clone(),
                _ => break,
            };

            if symbol == FACTORIAL {
                if FACTORIAL_PRECEDENCE <= min_precedence {
                    break;
                }
                return Err(ExprError::parse(
                    "Factorial operator '!' must directly follow a number, a variable or a call",
                ));
            }

            let operator = Operator::try_from(symbol.as_str())?;
            if operator.precedence() <= min_precedence {
                break;
            }
            self.pos += 1;
            if self.peek().is_none() {
                return Err(ExprError::parse(format!(
                    "Incomplete expression after operator: {}",
                    symbol
                )));
            }

            debug!("Binary operator: {:?}", operator);
            let right = self.parse_binary(operator.precedence())?;
            node = ASTNode::binary(node, operator, right);
        }

        Ok(node)
    }

    fn parse_factor(&mut self) -> ExprResult<ASTNode> {
        let token = self.next_token()?;
        debug!("Building factor: {:?}", token);

        match token.kind {
            TokenKind::Number => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| ExprError::parse(format!("Invalid number: {}", token.text)))?;
                Ok(self.parse_postfix(ASTNode::Number(value)))
            }
            TokenKind::Variable => {
                let node = if self.peek_kind() == Some(TokenKind::LParen) {
                    self.parse_call(token.text)?
                } else if let Some(value) = self.registry.constant(&token.text) {
                    ASTNode::Number(value)
                } else {
                    self.variables.insert(token.text.clone(), 0.0);
                    ASTNode::Variable(token.text)
                };
                Ok(self.parse_postfix(node))
            }
            TokenKind::LParen => {
                if self.peek_kind() == Some(TokenKind::RParen) {
                    return Err(ExprError::new(
                        ErrorCode::EmptyParenthesis,
                        "Empty parenthesis found",
                    ));
                }
                let node = self.parse_binary(0)?;
                self.expect_closing()?;
                Ok(node)
            }
            TokenKind::Operator if token.text == NEGATE => {
                self.check_arity(NEGATE, 1)?;
                let operand = self.parse_factor()?;
                Ok(ASTNode::call(NEGATE, vec![operand]))
            }
            TokenKind::Operator if token.text == FACTORIAL => Err(ExprError::parse(
                "Factorial operator '!' cannot be used alone or in prefix position",
            )),
            TokenKind::Operator => Err(ExprError::parse(format!(
                "Unexpected operator: {}",
                token.text
            ))),
            _ => Err(ExprError::parse(format!(
                "Unexpected token: {}",
                token.text
            ))),
        }
    }

    /// Wraps `node` in a factorial call when a `!` follows it.
    fn parse_postfix(&mut self, node: ASTNode) -> ASTNode {
        match self.peek() {
            Some(token) if token.is_operator(FACTORIAL) => {
                self.pos += 1;
                ASTNode::call(FACTORIAL, vec![node])
            }
            _ => node,
        }
    }

    /// Parses `name(arg, ...)` with the cursor on the opening parenthesis.
    fn parse_call(&mut self, name: String) -> ExprResult<ASTNode> {
        let arity = self
            .registry
            .function(&name)
            .map(Function::arity)
            .ok_or_else(|| {
                ExprError::new(
                    ErrorCode::FunctionNotFound,
                    format!("Function not found: {}", name),
                )
            })?;

        self.pos += 1;
        if self.peek_kind() == Some(TokenKind::RParen) {
            return Err(ExprError::new(
                ErrorCode::FunctionWrongArgumentsCount,
                format!("Function called without arguments: {}", name),
            ));
        }

        let mut args = vec![self.parse_binary(0)?];
        while self.peek_kind() == Some(TokenKind::Separator) {
            self.pos += 1;
            args.push(self.parse_binary(0)?);
        }
        self.expect_closing()?;

        self.check_arity(&name, args.len())?;
        Ok(ASTNode::FunctionCall { name, args })
    }

    /// Fails when `name` is registered with an arity other than `count`.
    fn check_arity(&self, name: &str, count: usize) -> ExprResult<()> {
        match self.registry.function(name) {
            Some(function) if function.arity() != count => Err(ExprError::new(
                ErrorCode::FunctionWrongArgumentsCount,
                format!(
                    "Incorrect number of arguments for function {}: expected {}, got {}",
                    name,
                    function.arity(),
                    count
                ),
            )),
            _ => Ok(()),
        }
    }
}
