use serde::{Deserialize, Serialize};

/// A parsed expression of the single free variable `t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Number(f64),
    /// The sample time `t`.
    Time,
    /// The constant `pi`.
    Pi,
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// The whitelisted functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    Sin,
    Cos,
    Sqrt,
    Abs,
    Exp,
    /// `log(x)` is the natural logarithm; `log(x, base)` divides by `ln(base)`.
    Log,
    Pow,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "sqrt" => Some(Function::Sqrt),
            "abs" => Some(Function::Abs),
            "exp" => Some(Function::Exp),
            "log" => Some(Function::Log),
            "pow" => Some(Function::Pow),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Pow => "pow",
        }
    }

    /// Inclusive range of accepted argument counts.
    pub fn arity(self) -> (usize, usize) {
        match self {
            Function::Log => (1, 2),
            Function::Pow => (2, 2),
            _ => (1, 1),
        }
    }
}

impl Expr {
    /// Evaluate at time `t`. May return NaN or an infinity; callers decide
    /// how to treat non-finite values.
    pub fn eval(&self, t: f64) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Time => t,
            Expr::Pi => std::f64::consts::PI,
            Expr::Unary { op, operand } => match op {
                UnaryOp::Neg => -operand.eval(t),
            },
            Expr::Binary { op, left, right } => {
                let l = left.eval(t);
                let r = right.eval(t);
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    BinaryOp::Pow => l.powf(r),
                }
            }
            Expr::Call { function, args } => {
                let x = args.first().map_or(f64::NAN, |a| a.eval(t));
                match function {
                    Function::Sin => x.sin(),
                    Function::Cos => x.cos(),
                    Function::Sqrt => x.sqrt(),
                    Function::Abs => x.abs(),
                    Function::Exp => x.exp(),
                    Function::Log => match args.get(1) {
                        Some(base) => x.ln() / base.eval(t).ln(),
                        None => x.ln(),
                    },
                    Function::Pow => x.powf(args.get(1).map_or(f64::NAN, |y| y.eval(t))),
                }
            }
        }
    }
}
