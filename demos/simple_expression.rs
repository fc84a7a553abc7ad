use log::debug;
use mathexpr_rs::{ErrorCode, Expr};

fn main() {
    pretty_env_logger::init();

    let mut expr = Expr::new();
    expr.add_binary("avg", |a, b| (a + b) / 2.0)
        .add_constant("tau", std::f64::consts::TAU);

    let inputs = [
        "clamp(a+5, 0, mix(b, c, 0.5))",
        "avg(a, b) * tau",
        "5! / (b - 2)",
        "sqrt(a - 10)",
        "atan2(1)",
        "1 + (2 * 3",
    ];

    expr.set("a", 1.0).set("b", 2.0).set("c", 10.0);

    for input in inputs {
        match expr.parse(input).and_then(|expr| expr.eval()) {
            Ok(expr) => println!("{} ({:.4} ms)", expr, expr.eval_time()),
            Err(err) if err.code() == ErrorCode::DivisionByZero => {
                println!("Expr \"{}\" divides by zero", input)
            }
            Err(err) => println!("Expr \"{}\" failed: {}", input, err),
        }
        debug!("parsed variables: {:?}", expr.parsed_vars());
    }
}
