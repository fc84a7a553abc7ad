//! Evaluates one parsed expression over an evenly spaced range of a variable,
//! the way a plotting front end fills a curve. Failed samples are replaced by a
//! fallback value and tallied instead of aborting the whole range.

use crate::error::{ErrorCode, ExprError, ExprResult};
use crate::expr::Expr;
use log::debug;
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    /// Variable receiving each sample position.
    pub variable: String,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// Value stored for samples whose evaluation failed.
    pub fallback: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            variable: "x".to_string(),
            min: -2.0,
            max: 2.0,
            count: 1000,
            fallback: 0.0,
        }
    }
}

impl SampleConfig {
    pub fn new(variable: &str, min: f64, max: f64, count: usize) -> Self {
        Self {
            variable: variable.to_string(),
            min,
            max,
            count,
            ..Self::default()
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }
}

/// Which kinds of failures occurred while sampling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleFailures {
    pub division_by_zero: usize,
    pub inf: usize,
    pub nan: usize,
    pub other: usize,
    /// First failure in sample order.
    pub first: Option<ExprError>,
}

impl SampleFailures {
    fn record(&mut self, err: ExprError) {
        match err.code() {
            ErrorCode::DivisionByZero => self.division_by_zero += 1,
            ErrorCode::EvaluationInf => self.inf += 1,
            ErrorCode::EvaluationNan => self.nan += 1,
            _ => self.other += 1,
        }
        if self.first.is_none() {
            self.first = Some(err);
        }
    }

    pub fn total(&self) -> usize {
        self.division_by_zero + self.inf + self.nan + self.other
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// One line describing the most significant numeric failure, if any.
    pub fn summary(&self) -> Option<&'static str> {
        if self.division_by_zero > 0 {
            Some("Some portions have div by zero")
        } else if self.inf > 0 {
            Some("Some portions have inf value")
        } else if self.nan > 0 {
            Some("Some portions have nan value")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Samples {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub failures: SampleFailures,
}

/// Positions `min + i * (max - min) / count` for `i` in `0..count`.
pub fn sample_positions(config: &SampleConfig) -> Vec<f64> {
    if config.count == 0 {
        return Vec::new();
    }
    let step = (config.max - config.min) / config.count as f64;
    (0..config.count)
        .map(|i| config.min + i as f64 * step)
        .collect()
}

/// Samples the expression parsed into `expr` across `config`'s range.
///
/// `expr` itself is left untouched: each worker evaluates on its own clone, with
/// the sampled variable bound on top of `expr`'s defined variables. Fails only
/// when `expr` holds no parsed expression.
pub fn sample(expr: &Expr, config: &SampleConfig) -> ExprResult<Samples> {
    if expr.root().is_none() {
        return Err(ExprError::parse("No expression has been parsed"));
    }

    let xs = sample_positions(config);
    let results: Vec<ExprResult<f64>> = xs
        .par_iter()
        .map_init(
            || expr.clone(),
            |session, &x| {
                session
                    .set(&config.variable, x)
                    .eval()
                    .map(|session| session.result())
            },
        )
        .collect();

    let mut failures = SampleFailures::default();
    let ys = results
        .into_iter()
        .map(|result| {
            result.unwrap_or_else(|err| {
                failures.record(err);
                config.fallback
            })
        })
        .collect();

    debug!(
        "Sampled \"{}\" at {} points, {} failures",
        expr.expression(),
        xs.len(),
        failures.total()
    );
    Ok(Samples { xs, ys, failures })
}
