use crate::errors::RunError;
use crate::Value;

/// arithmetic and comparison operators, applied to already evaluated numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Leq,
    Geq,
    Eq,
}

pub const BUILTINS: &[(&str, Operator)] = &[
    ("+",   Operator::Add),
    ("-",   Operator::Sub),
    ("*",   Operator::Mul),
    ("/",   Operator::Div),
    ("<",   Operator::Lt),
    (">",   Operator::Gt),
    ("<=",  Operator::Leq),
    (">=",  Operator::Geq),
    ("=",   Operator::Eq),
];

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        BUILTINS.iter()
            .find(|(name, _)| *name == symbol)
            .map(|&(_, op)| op)
    }

    pub fn symbol(self) -> &'static str {
        BUILTINS.iter()
            .find(|(_, op)| *op == self)
            .map(|&(name, _)| name)
            .unwrap_or("?")
    }

    /// the fixed number of operands, or `None` for variadic `+`
    pub fn arity(self) -> Option<usize> {
        match self {
            Operator::Add => None,
            _ => Some(2),
        }
    }

    /// apply the operator. binary arity has already been checked when the
    /// form was classified.
    pub fn apply(self, args: &[Value]) -> Result<Value, RunError> {
        if self == Operator::Add {
            return Ok(args.iter().sum());
        }

        let (a, b) = match args {
            [a, b] => (*a, *b),
            _ => {
                return Err(RunError::MissingArguments {
                    name: self.symbol().to_owned(),
                    expected: 2,
                    got: args.len(),
                })
            }
        };

        let result = match self {
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => {
                if b == 0.0 {
                    return Err(RunError::DivisionByZero);
                }
                (a / b).floor()
            }
            Operator::Lt  => truth(a < b),
            Operator::Gt  => truth(a > b),
            Operator::Leq => truth(a <= b),
            Operator::Geq => truth(a >= b),
            Operator::Eq  => truth(a == b),
            Operator::Add => unreachable!(),
        };

        Ok(result)
    }
}

fn truth(b: bool) -> Value {
    if b { 1.0 } else { 0.0 }
}

// }}}
