use mathexpr_rs::sampling::{sample, SampleConfig};
use mathexpr_rs::Expr;

fn main() {
    pretty_env_logger::init();

    let mut expr = Expr::new();
    let parsed = expr.parse("smoothstep(-1, 1, x) / x");
    if let Err(err) = parsed {
        eprintln!("{}", err);
        return;
    }

    let config = SampleConfig::new("x", -2.0, 2.0, 16);
    let samples = match sample(&expr, &config) {
        Ok(samples) => samples,
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };

    for (x, y) in samples.xs.iter().zip(&samples.ys) {
        println!("{:>6.2} {:>10.4}", x, y);
    }
    if let Some(summary) = samples.failures.summary() {
        println!("{}", summary);
    }
}
