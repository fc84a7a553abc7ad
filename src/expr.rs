use crate::ast::{ASTNode, Evaluator, Parser};
use crate::error::{ExprError, ExprResult};
use crate::functions::{Function, Registry};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Tolerance used by [`Expr::check`].
const CHECK_TOLERANCE: f64 = 0.001;

/// An expression session: parse once, then set variables and evaluate as often
/// as needed.
///
/// ```
/// use mathexpr_rs::Expr;
///
/// let mut expr = Expr::new();
/// let result = expr
///     .parse("clamp(a + 5, 0, mix(b, c, 0.5))")?
///     .set("a", 1.0)
///     .set("b", 2.0)
///     .set("c", 10.0)
///     .eval()?
///     .result();
/// assert_eq!(result, 6.0);
/// # Ok::<(), mathexpr_rs::ExprError>(())
/// ```
///
/// A session is not meant to be shared between threads while it is being
/// parsed or evaluated; clone it instead.
#[derive(Debug, Clone)]
pub struct Expr {
    expression: String,
    root: Option<ASTNode>,
    parsed_variables: HashMap<String, f64>,
    defined_variables: HashMap<String, f64>,
    registry: Registry,
    eval_result: f64,
    elapsed: Duration,
}

impl Default for Expr {
    fn default() -> Self {
        Self::new()
    }
}

impl Expr {
    /// A session using the default builtins and constants.
    pub fn new() -> Self {
        Self::with_registry(Registry::default())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            expression: String::new(),
            root: None,
            parsed_variables: HashMap::new(),
            defined_variables: HashMap::new(),
            registry,
            eval_result: 0.0,
            elapsed: Duration::ZERO,
        }
    }

    /// Parses `expression`, replacing the previous tree and the set of parsed
    /// variables. On failure the session holds no tree until the next successful
    /// parse.
    pub fn parse(&mut self, expression: &str) -> ExprResult<&mut Self> {
        self.expression = expression.to_string();
        self.parsed_variables.clear();
        self.root = None;

        let parsed = Parser::parse_expression(expression, &self.registry)?;
        self.root = Some(parsed.root);
        self.parsed_variables = parsed.variables;
        Ok(self)
    }

    /// Binds `name` to `value`, overwriting any previous binding.
    pub fn set(&mut self, name: &str, value: f64) -> &mut Self {
        self.defined_variables.insert(name.to_string(), value);
        self
    }

    /// Binds `name` to `value` unless it is already bound.
    pub fn set_if_absent(&mut self, name: &str, value: f64) -> &mut Self {
        self.defined_variables
            .entry(name.to_string())
            .or_insert(value);
        self
    }

    /// Evaluates the current tree against the defined variables and records the
    /// result and the time it took. A failed evaluation leaves the previous
    /// result in place.
    pub fn eval(&mut self) -> ExprResult<&mut Self> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| ExprError::parse("No expression has been parsed"))?;

        let start = Instant::now();
        let result = Evaluator::new(&self.registry).evaluate(root, &self.defined_variables);
        self.elapsed = start.elapsed();

        self.eval_result = result?;
        debug!(
            "Evaluated \"{}\" => {} in {:?}",
            self.expression, self.eval_result, self.elapsed
        );
        Ok(self)
    }

    pub fn add_constant(&mut self, name: &str, value: f64) -> &mut Self {
        self.registry.add_constant(name, value);
        self
    }

    pub fn add_function(&mut self, name: &str, function: Function) -> &mut Self {
        self.registry.add_function(name, function);
        self
    }

    pub fn add_unary<F>(&mut self, name: &str, function: F) -> &mut Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.registry.add_unary(name, function);
        self
    }

    pub fn add_binary<F>(&mut self, name: &str, function: F) -> &mut Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.registry.add_binary(name, function);
        self
    }

    pub fn add_ternary<F>(&mut self, name: &str, function: F) -> &mut Self
    where
        F: Fn(f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.registry.add_ternary(name, function);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn root(&self) -> Option<&ASTNode> {
        self.root.as_ref()
    }

    pub fn result(&self) -> f64 {
        self.eval_result
    }

    /// Duration of the last evaluation, in milliseconds.
    pub fn eval_time(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Whether the last result is within 0.001 of `value`.
    pub fn check(&self, value: f64) -> bool {
        (self.eval_result - value).abs() < CHECK_TOLERANCE
    }

    /// Variables found by the last parse, each mapped to `0.0`.
    pub fn parsed_vars(&self) -> &HashMap<String, f64> {
        &self.parsed_variables
    }

    pub fn parsed_vars_mut(&mut self) -> &mut HashMap<String, f64> {
        &mut self.parsed_variables
    }

    pub fn defined_vars(&self) -> &HashMap<String, f64> {
        &self.defined_variables
    }

    pub fn defined_vars_mut(&mut self) -> &mut HashMap<String, f64> {
        &mut self.defined_variables
    }

    pub fn has_parsed_variable(&self, name: &str) -> bool {
        self.parsed_variables.contains_key(name)
    }

    pub fn has_defined_variable(&self, name: &str) -> bool {
        self.defined_variables.contains_key(name)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr \"{}\"", self.expression)?;
        let mut names: Vec<&String> = self.defined_variables.keys().collect();
        names.sort();
        for name in names {
            write!(f, ", {} = {}", name, self.defined_variables[name])?;
        }
        write!(f, " => {}", self.eval_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rand::Rng;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn eval_error(input: &str) -> ErrorCode {
        let mut expr = Expr::new();
        match expr.parse(input) {
            Ok(expr) => expr.eval().unwrap_err().code(),
            Err(err) => err.code(),
        }
    }

    #[test]
    fn test_builtins() {
        let cases = [
            ("floor(4.7)", 4.0),
            ("floor(-4.7)", -5.0),
            ("floor(0.3)", 0.0),
            ("ceil(4.3)", 5.0),
            ("ceil(-4.3)", -4.0),
            ("round(4.5)", 5.0),
            ("round(-4.5)", -5.0),
            ("round(2.3)", 2.0),
            ("fract(4.7)", 0.7),
            ("fract(-4.7)", 0.3),
            ("sign(-3)", -1.0),
            ("sign(0)", 0.0),
            ("abs(-5)", 5.0),
            ("sin(pi / 2)", 1.0),
            ("cos(pi)", -1.0),
            ("tan(0)", 0.0),
            ("asin(1)", FRAC_PI_2),
            ("acos(1)", 0.0),
            ("atan(1)", FRAC_PI_4),
            ("sinh(0)", 0.0),
            ("cosh(0)", 1.0),
            ("tanh(0)", 0.0),
            ("asinh(0)", 0.0),
            ("acosh(1)", 0.0),
            ("atanh(0)", 0.0),
            ("ln(e)", 1.0),
            ("log(1)", 0.0),
            ("log1p(0)", 0.0),
            ("logb(8)", 3.0),
            ("log2(8)", 3.0),
            ("log10(100)", 2.0),
            ("sqrt(16)", 4.0),
            ("exp(0)", 1.0),
            ("fact(5)", 120.0),
            ("saturate(1.5)", 1.0),
            ("saturate(0.25)", 0.25),
            ("mod(7, 3)", 1.0),
            ("pow(2, 10)", 1024.0),
            ("atan2(1, 1)", FRAC_PI_4),
            ("min(2, 3)", 2.0),
            ("max(2, 3)", 3.0),
            ("step(1, 0.5)", 0.0),
            ("step(1, 2)", 1.0),
            ("hypot(3, 4)", 5.0),
            ("hypot(8, 15)", 17.0),
            ("smoothabs(-0.5, 0.0)", 0.5),
            ("clamp(15, 0, 10)", 10.0),
            ("clamp(-1, 0, 10)", 0.0),
            ("lerp(10, 20, 0.25)", 12.5),
            ("mix(-10, 10, 0.5)", 0.0),
            ("smoothstep(0, 1, 0.25)", 0.15625),
            ("smoothstep(0, 1, 0.75)", 0.84375),
            ("5!", 120.0),
            ("0!", 1.0),
            ("-4 + 1", -3.0),
        ];

        let mut expr = Expr::new();
        for (input, expected) in cases {
            let ok = expr.parse(input).unwrap().eval().unwrap().check(expected);
            assert!(ok, "{} gave {}, expected {}", input, expr.result(), expected);
        }
    }

    #[test]
    fn test_precedence() {
        let mut expr = Expr::new();
        assert_eq!(expr.parse("2+3*4").unwrap().eval().unwrap().result(), 14.0);
        assert_eq!(expr.parse("(2+3)*4").unwrap().eval().unwrap().result(), 20.0);
        assert_eq!(expr.parse("2^3^2").unwrap().eval().unwrap().result(), 64.0);
        assert_eq!(expr.parse("2*2^3/4").unwrap().eval().unwrap().result(), 4.0);
    }

    #[test]
    fn test_structured_failures() {
        let cases = [
            ("atan2(1,2,3)", ErrorCode::FunctionWrongArgumentsCount),
            ("atan2(1)", ErrorCode::FunctionWrongArgumentsCount),
            ("sin()", ErrorCode::FunctionWrongArgumentsCount),
            ("1/0", ErrorCode::DivisionByZero),
            ("10%0", ErrorCode::DivisionByZero),
            ("sqrt(-1)", ErrorCode::EvaluationNan),
            ("(-1)^0.5", ErrorCode::EvaluationNan),
            ("exp(1000)", ErrorCode::EvaluationInf),
            ("10^1000", ErrorCode::EvaluationInf),
            ("x+1", ErrorCode::VariableNotFound),
            ("1+(2*3", ErrorCode::UnmatchedParenthesis),
            ("1+2)*3", ErrorCode::UnmatchedParenthesis),
            ("()", ErrorCode::EmptyParenthesis),
            ("5$3", ErrorCode::OperatorNotFound),
            ("unknownFunction(5)", ErrorCode::FunctionNotFound),
            ("", ErrorCode::ParseError),
        ];
        for (input, code) in cases {
            assert_eq!(eval_error(input), code, "{}", input);
        }
    }

    #[test]
    fn test_variables() {
        let mut expr = Expr::new();
        expr.parse("x * y + 1").unwrap();
        expr.set("x", 3.0).set("y", 4.0);
        assert_eq!(expr.eval().unwrap().result(), 13.0);

        expr.set("y", 0.5);
        assert_eq!(expr.eval().unwrap().result(), 2.5);
        assert!(expr.has_defined_variable("x"));
        assert!(!expr.has_defined_variable("z"));
    }

    #[test]
    fn test_set_if_absent() {
        let mut expr = Expr::new();
        expr.set("x", 1.0).set_if_absent("x", 5.0).set_if_absent("y", 2.0);
        assert_eq!(expr.defined_vars()["x"], 1.0);
        assert_eq!(expr.defined_vars()["y"], 2.0);
    }

    #[test]
    fn test_defined_before_parse_and_kept_across_parses() {
        let mut expr = Expr::new();
        expr.set("x", 2.0);
        assert_eq!(expr.parse("x*x").unwrap().eval().unwrap().result(), 4.0);
        assert_eq!(expr.parse("x+1").unwrap().eval().unwrap().result(), 3.0);
    }

    #[test]
    fn test_parsed_variables_are_replaced() {
        let mut expr = Expr::new();
        expr.parse("x+y").unwrap();
        assert!(expr.has_parsed_variable("x"));
        assert!(expr.has_parsed_variable("y"));

        expr.parse("x").unwrap();
        assert_eq!(expr.parsed_vars().len(), 1);
        assert_eq!(expr.parsed_vars().get("x"), Some(&0.0));
        assert!(!expr.has_parsed_variable("y"));
    }

    #[test]
    fn test_constants_need_no_binding() {
        let mut expr = Expr::new();
        assert!(expr.parse("pi").unwrap().eval().unwrap().check(PI));
        assert!(expr.parse("e").unwrap().eval().unwrap().check(std::f64::consts::E));
        assert!(expr.parsed_vars().is_empty());
    }

    #[test]
    fn test_constant_redefinition_does_not_touch_parsed_tree() {
        let mut expr = Expr::new();
        expr.parse("pi").unwrap();
        expr.add_constant("pi", 3.0);
        assert_eq!(expr.eval().unwrap().result(), PI);
        assert_eq!(expr.parse("pi").unwrap().eval().unwrap().result(), 3.0);
    }

    #[test]
    fn test_custom_functions() {
        let mut expr = Expr::new();
        expr.add_unary("twice", |a| a * 2.0)
            .add_binary("avg", |a, b| (a + b) / 2.0)
            .add_ternary("sum3", |a, b, c| a + b + c);
        let result = expr
            .parse("twice(avg(2, 4)) + sum3(1, 2, 3)")
            .unwrap()
            .eval()
            .unwrap()
            .result();
        assert_eq!(result, 12.0);

        // redefining a builtin affects later evaluations
        expr.add_unary("twice", |a| a * 3.0);
        assert_eq!(expr.eval().unwrap().result(), 15.0);
    }

    #[test]
    fn test_factorial_override() {
        let mut expr = Expr::new();
        expr.add_unary("!", |a| a + 1.0);
        assert_eq!(expr.parse("5!").unwrap().eval().unwrap().result(), 6.0);
    }

    #[test]
    fn test_eval_without_parse() {
        let mut expr = Expr::new();
        let err = expr.eval().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ParseError);
    }

    #[test]
    fn test_failed_parse_discards_tree() {
        let mut expr = Expr::new();
        expr.parse("x + 1").unwrap();
        assert!(expr.parse("1 + (").is_err());
        assert!(expr.root().is_none());
        assert!(expr.parsed_vars().is_empty());
        assert!(expr.eval().is_err());
    }

    #[test]
    fn test_failed_eval_keeps_previous_result() {
        let mut expr = Expr::new();
        expr.parse("10 / x").unwrap();
        expr.set("x", 2.0).eval().unwrap();
        assert_eq!(expr.result(), 5.0);

        let err = expr.set("x", 0.0).eval().unwrap_err();
        assert_eq!(err.code(), ErrorCode::DivisionByZero);
        assert_eq!(expr.result(), 5.0);
    }

    #[test]
    fn test_idempotent_evaluation() {
        let mut rng = rand::rng();
        let mut expr = Expr::new();
        expr.parse("smoothstep(0, 1, fract(x)) * sin(x) + hypot(x, 2) - x^2 % 3")
            .unwrap();

        for _ in 0..100 {
            let x: f64 = rng.random_range(0.0..100.0);
            expr.set("x", x);
            let first = expr.eval().unwrap().result();
            let second = expr.eval().unwrap().result();
            assert_eq!(first.to_bits(), second.to_bits());

            let mut reparsed = Expr::new();
            reparsed.parse(expr.expression()).unwrap().set("x", x);
            assert_eq!(reparsed.eval().unwrap().result().to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_eval_time_is_recorded() {
        let mut expr = Expr::new();
        expr.parse("sin(1) + cos(1)").unwrap().eval().unwrap();
        assert!(expr.eval_time() >= 0.0);
    }

    #[test]
    fn test_display() {
        let mut expr = Expr::new();
        expr.parse("a + b").unwrap().set("b", 2.0).set("a", 1.0).eval().unwrap();
        assert_eq!(expr.to_string(), "Expr \"a + b\", a = 1, b = 2 => 3");
    }

    #[test]
    fn test_with_empty_registry() {
        let mut expr = Expr::with_registry(Registry::empty());
        let err = expr.parse("sin(1)").unwrap_err();
        assert_eq!(err.code(), ErrorCode::FunctionNotFound);

        // without the constant, `pi` is just a variable
        expr.parse("pi").unwrap();
        assert!(expr.has_parsed_variable("pi"));
    }
}
