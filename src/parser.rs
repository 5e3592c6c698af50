use crate::ast::*;
use crate::error::ParseError;
use crate::token::{Span, Spanned, Token};

/// Deepest nesting of parentheses, calls and prefix operators accepted.
pub const MAX_NESTING: usize = 128;
/// Tallest expression tree accepted. Evaluation recurses once per level.
pub const MAX_TREE_HEIGHT: usize = 1024;

/// A parsed subtree together with its height.
struct Node {
    expr: Expr,
    height: usize,
}

impl Node {
    fn leaf(expr: Expr) -> Self {
        Node { expr, height: 1 }
    }
}

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    // ── Helpers ──────────────────────────────────────────────

    fn peek(&self) -> Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Token {
        self.tokens
            .get(self.pos + offset)
            .map_or(Token::EOF, |s| s.token.clone())
    }

    fn span(&self) -> Span {
        match self.tokens.get(self.pos).or(self.tokens.last()) {
            Some(s) => s.span,
            None => Span { start: 0, end: 0 },
        }
    }

    fn advance(&mut self) -> Option<Spanned> {
        let s = self.tokens.get(self.pos).cloned();
        if s.is_some() {
            self.pos += 1;
        }
        s
    }

    fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(&self.peek()) == std::mem::discriminant(expected)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Token::EOF => ParseError::UnexpectedEOF {
                expected: expected.into(),
                span: self.span(),
            },
            found => ParseError::UnexpectedToken {
                expected: expected.into(),
                found,
                span: self.span(),
            },
        }
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<Spanned, ParseError> {
        if self.check(expected) {
            self.advance().ok_or_else(|| self.unexpected(what))
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Node, ParseError>,
    ) -> Result<Node, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep { span: self.span() });
        }
        self.depth += 1;
        let node = parse(self);
        self.depth -= 1;
        node
    }

    fn grow(&self, height: usize) -> Result<usize, ParseError> {
        let height = height + 1;
        if height > MAX_TREE_HEIGHT {
            return Err(ParseError::TooDeep { span: self.span() });
        }
        Ok(height)
    }

    fn binary(&self, op: BinaryOp, left: Node, right: Node) -> Result<Node, ParseError> {
        let height = self.grow(left.height.max(right.height))?;
        Ok(Node {
            expr: Expr::Binary {
                op,
                left: Box::new(left.expr),
                right: Box::new(right.expr),
            },
            height,
        })
    }

    // ── Entry ────────────────────────────────────────────────

    /// Parse the whole token stream as one expression.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let node = self.parse_sum()?;
        if !self.check(&Token::EOF) {
            return Err(self.unexpected("operator or end of expression"));
        }
        Ok(node.expr)
    }

    // ── Precedence levels ────────────────────────────────────

    fn parse_sum(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_product()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_product()?;
            left = self.binary(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_product(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_implicit()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_implicit()?;
            left = self.binary(op, left, right)?;
        }
        Ok(left)
    }

    /// Implicit multiplication binds tighter than `*` and `/`:
    /// `2t`, `3 sin(t)`, `(t+1)(t-1)`, and `pi / 2 pi` is `pi / (2 pi)`.
    fn parse_implicit(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_numeric_ratio()?;
        while matches!(self.peek(), Token::Ident(_) | Token::LParen) {
            let right = self.parse_numeric_ratio()?;
            left = self.binary(BinaryOp::Mul, left, right)?;
        }
        Ok(left)
    }

    /// A literal ratio followed by a factor divides first: `1/2 t` is
    /// `(1/2) t`, not `1 / (2 t)`.
    fn parse_numeric_ratio(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_unary()?;
        let mut last_is_literal = is_literal(&left.expr);
        while last_is_literal
            && self.check(&Token::Slash)
            && matches!(self.peek_at(1), Token::Number(_))
            && matches!(self.peek_at(2), Token::Ident(_) | Token::LParen)
        {
            self.advance();
            let right = self.parse_unary()?;
            last_is_literal = is_literal(&right.expr);
            left = self.binary(BinaryOp::Div, left, right)?;
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Token::Minus => {
                self.advance();
                let operand = self.nested(Self::parse_unary)?;
                Ok(Node {
                    height: self.grow(operand.height)?,
                    expr: Expr::Unary {
                        op: UnaryOp::Neg,
                        operand: Box::new(operand.expr),
                    },
                })
            }
            Token::Plus => {
                self.advance();
                self.nested(Self::parse_unary)
            }
            _ => self.parse_power(),
        }
    }

    /// `^` is right-associative and binds tighter than unary minus.
    fn parse_power(&mut self) -> Result<Node, ParseError> {
        let base = self.parse_primary()?;
        if self.eat(&Token::Caret) {
            let exponent = self.nested(Self::parse_unary)?;
            return self.binary(BinaryOp::Pow, base, exponent);
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Token::Number(n) => {
                self.advance();
                Ok(Node::leaf(Expr::Number(n)))
            }
            Token::Ident(name) => {
                let start = self.span();
                self.advance();
                if self.check(&Token::LParen) {
                    self.parse_call(name, start)
                } else {
                    match name.as_str() {
                        "t" => Ok(Node::leaf(Expr::Time)),
                        "pi" => Ok(Node::leaf(Expr::Pi)),
                        _ => Err(ParseError::UnknownIdentifier { name, span: start }),
                    }
                }
            }
            Token::LParen => {
                self.advance();
                let inner = self.nested(Self::parse_sum)?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_call(&mut self, name: String, start: Span) -> Result<Node, ParseError> {
        let Some(function) = Function::from_name(&name) else {
            return Err(ParseError::UnknownFunction { name, span: start });
        };

        self.expect(&Token::LParen, "'('")?;
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            args.push(self.nested(Self::parse_sum)?);
            while self.eat(&Token::Comma) {
                args.push(self.nested(Self::parse_sum)?);
            }
        }
        let close = self.expect(&Token::RParen, "')' or ','")?;

        let (min, max) = function.arity();
        if args.len() < min || args.len() > max {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("{min} to {max}")
            };
            return Err(ParseError::ArityMismatch {
                function: function.name().to_string(),
                expected,
                found: args.len(),
                span: Span {
                    start: start.start,
                    end: close.span.end,
                },
            });
        }

        let height = self.grow(args.iter().map(|a| a.height).max().unwrap_or(0))?;
        Ok(Node {
            expr: Expr::Call {
                function,
                args: args.into_iter().map(|a| a.expr).collect(),
            },
            height,
        })
    }
}

/// A number literal, possibly negated.
fn is_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Number(_) => true,
        Expr::Unary {
            op: UnaryOp::Neg,
            operand,
        } => matches!(**operand, Expr::Number(_)),
        _ => false,
    }
}
