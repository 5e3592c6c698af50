//! Expression compilation: text → validated [`Expr`] tree, evaluated many times.

use serde::Serialize;

use crate::ast::Expr;
use crate::error::{ExpressionError, FourierError};
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Value substituted for a sample whose evaluation is not a finite number.
pub const EVAL_FALLBACK: f64 = 0.0;

/// An expression that has been lexed, parsed and checked against the
/// function whitelist. Compile once, evaluate at as many `t` as needed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledExpression {
    source: String,
    expr: Expr,
}

impl CompiledExpression {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate at `t`. `None` when the result is NaN or infinite; samplers
    /// substitute [`EVAL_FALLBACK`] for that point.
    pub fn evaluate(&self, t: f64) -> Option<f64> {
        Some(self.expr.eval(t)).filter(|v| v.is_finite())
    }
}

/// Parse an expression source string into an [`Expr`] tree.
pub fn parse(input: &str) -> Result<Expr, ExpressionError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser::new(tokens);
    Ok(parser.parse_expression()?)
}

/// Compile an expression of `t`. Fails with [`FourierError::InvalidExpression`]
/// carrying the parser diagnostic.
pub fn compile(input: &str) -> Result<CompiledExpression, FourierError> {
    let expr = parse(input)?;
    Ok(CompiledExpression {
        source: input.to_string(),
        expr,
    })
}
