//! Formula syntax tree and its evaluator.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use rand::Rng;
use ruleweave_foundation::{Error, ErrorKind, Result};

/// Variable bindings supplied at evaluation time.
pub type Variables = HashMap<String, f64>;

/// Binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `^`
    Pow,
}

impl BinaryOp {
    /// The operator's source symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Rem => '%',
            Self::Pow => '^',
        }
    }
}

/// Built-in functions callable from formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    /// Smallest argument.
    Min,
    /// Largest argument.
    Max,
    /// Absolute value.
    Abs,
    /// Round toward negative infinity.
    Floor,
    /// Round toward positive infinity.
    Ceil,
    /// Round half away from zero.
    Round,
    /// Square root.
    Sqrt,
    /// `pow(base, exponent)`.
    Pow,
    /// `random()` in `[0, 1)`, or `random(a, b)` between two bounds.
    Random,
}

impl Function {
    /// Looks up a function by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "min" => Self::Min,
            "max" => Self::Max,
            "abs" => Self::Abs,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "round" => Self::Round,
            "sqrt" => Self::Sqrt,
            "pow" => Self::Pow,
            "random" | "rand" => Self::Random,
            _ => return None,
        })
    }

    /// The function's canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Abs => "abs",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
            Self::Sqrt => "sqrt",
            Self::Pow => "pow",
            Self::Random => "random",
        }
    }

    /// Returns true if the function accepts `count` arguments.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Min | Self::Max => count >= 1,
            Self::Abs | Self::Floor | Self::Ceil | Self::Round | Self::Sqrt => count == 1,
            Self::Pow => count == 2,
            Self::Random => count == 0 || count == 2,
        }
    }
}

/// A parsed formula expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// Named variable.
    Variable(String),
    /// Arithmetic negation.
    Neg(Box<Expr>),
    /// Binary operation.
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Built-in function call.
    Call(Function, Vec<Expr>),
}

impl Expr {
    /// Evaluates the expression.
    ///
    /// # Errors
    /// Returns `UndefinedVariable` for a variable missing from `variables`,
    /// and `DivisionByZero` for `/` or `%` by zero.
    pub fn eval<R: Rng + ?Sized>(&self, variables: &Variables, rng: &mut R) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Variable(name) => variables
                .get(name)
                .copied()
                .ok_or_else(|| Error::undefined_variable(name.as_str())),
            Self::Neg(inner) => Ok(-inner.eval(variables, rng)?),
            Self::Binary(op, lhs, rhs) => {
                let a = lhs.eval(variables, rng)?;
                let b = rhs.eval(variables, rng)?;
                apply_binary(*op, a, b)
            }
            Self::Call(function, args) => {
                let values = args
                    .iter()
                    .map(|arg| arg.eval(variables, rng))
                    .collect::<Result<Vec<_>>>()?;
                Ok(apply_function(*function, &values, rng))
            }
        }
    }

    /// Collects the names of all referenced variables.
    pub fn collect_variables<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Self::Number(_) => {}
            Self::Variable(name) => {
                out.insert(name.as_str());
            }
            Self::Neg(inner) => inner.collect_variables(out),
            Self::Binary(_, lhs, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
            Self::Call(_, args) => {
                for arg in args {
                    arg.collect_variables(out);
                }
            }
        }
    }

    /// Returns true if evaluation draws from the random source.
    #[must_use]
    pub fn is_random(&self) -> bool {
        match self {
            Self::Number(_) | Self::Variable(_) => false,
            Self::Neg(inner) => inner.is_random(),
            Self::Binary(_, lhs, rhs) => lhs.is_random() || rhs.is_random(),
            Self::Call(Function::Random, _) => true,
            Self::Call(_, args) => args.iter().any(Self::is_random),
        }
    }
}

fn apply_binary(op: BinaryOp, a: f64, b: f64) -> Result<f64> {
    Ok(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div | BinaryOp::Rem if b == 0.0 => {
            return Err(Error::new(ErrorKind::DivisionByZero));
        }
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        BinaryOp::Pow => a.powf(b),
    })
}

fn apply_function<R: Rng + ?Sized>(function: Function, args: &[f64], rng: &mut R) -> f64 {
    match (function, args) {
        (Function::Min, _) => args.iter().copied().fold(f64::INFINITY, f64::min),
        (Function::Max, _) => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        (Function::Abs, [x]) => x.abs(),
        (Function::Floor, [x]) => x.floor(),
        (Function::Ceil, [x]) => x.ceil(),
        (Function::Round, [x]) => x.round(),
        (Function::Sqrt, [x]) => x.sqrt(),
        (Function::Pow, [base, exponent]) => base.powf(*exponent),
        (Function::Random, [a, b]) => {
            let (low, high) = if a <= b { (*a, *b) } else { (*b, *a) };
            // An empty or unbounded span yields its lower bound.
            if low < high && (high - low).is_finite() {
                rng.gen_range(low..high)
            } else {
                low
            }
        }
        (Function::Random, _) => rng.gen_range(0.0..1.0),
        // Arity is checked by the parser.
        _ => f64::NAN,
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Variable(name) => write!(f, "{name}"),
            Self::Neg(inner) => write!(f, "-({inner})"),
            Self::Binary(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Self::Call(function, args) => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
