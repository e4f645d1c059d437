//! Python expressions
//!
//! Comparisons chain in Python (`a < b < c`), so they are non-associative
//! here: a comparison operand that is itself a comparison gets parentheses.

use super::precedence::{Associativity, GeneratedExpression, Operator, Precedence};

/// Generated Python expression
pub type PyExpr = GeneratedExpression;

/// Python operator table
pub mod op {
    use super::{Associativity, Operator};

    pub const CONDITIONAL: Operator = Operator::new("if-else", 2, Associativity::Right);
    pub const OR: Operator = Operator::new("or", 3, Associativity::Left);
    pub const AND: Operator = Operator::new("and", 4, Associativity::Left);
    pub const NOT: Operator = Operator::new("not ", 5, Associativity::Right);
    pub const EQUAL: Operator = Operator::new("==", 6, Associativity::None);
    pub const NOT_EQUAL: Operator = Operator::new("!=", 6, Associativity::None);
    pub const IS: Operator = Operator::new("is", 6, Associativity::None);
    pub const IS_NOT: Operator = Operator::new("is not", 6, Associativity::None);
    pub const LESS_THAN: Operator = Operator::new("<", 6, Associativity::None);
    pub const LESS_THAN_OR_EQUAL: Operator = Operator::new("<=", 6, Associativity::None);
    pub const GREATER_THAN: Operator = Operator::new(">", 6, Associativity::None);
    pub const GREATER_THAN_OR_EQUAL: Operator = Operator::new(">=", 6, Associativity::None);
    pub const PLUS: Operator = Operator::new("+", 11, Associativity::Left);
    pub const MINUS: Operator = Operator::new("-", 11, Associativity::Left);
    pub const TIMES: Operator = Operator::new("*", 12, Associativity::Left);
    pub const DIVIDE: Operator = Operator::new("/", 12, Associativity::Left);
    pub const FLOOR_DIVIDE: Operator = Operator::new("//", 12, Associativity::Left);
    pub const MOD: Operator = Operator::new("%", 12, Associativity::Left);
    pub const NEGATE: Operator = Operator::new("-", 13, Associativity::Right);
}

/// Call arguments: anything but a bare lambda
pub const ARGUMENT_FLOOR: Precedence = Precedence(2);

pub fn call(callee: &str, args: &[PyExpr]) -> PyExpr {
    GeneratedExpression::call(callee, args, ARGUMENT_FLOOR)
}

/// `then if cond else otherwise`
pub fn conditional(cond: &PyExpr, then: &PyExpr, otherwise: &PyExpr) -> PyExpr {
    let floor = op::CONDITIONAL.precedence;
    PyExpr::new(
        format!(
            "{} if {} else {}",
            then.wrap_for(floor.tighter()),
            cond.wrap_for(floor.tighter()),
            otherwise.wrap_for(floor)
        ),
        floor,
    )
}

pub fn binary(op: &Operator, lhs: &PyExpr, rhs: &PyExpr) -> PyExpr {
    GeneratedExpression::binary(op, lhs, rhs)
}

pub fn unary(op: &Operator, operand: &PyExpr) -> PyExpr {
    GeneratedExpression::unary(op, operand)
}

pub fn none() -> PyExpr {
    PyExpr::atomic("None")
}

pub fn integer(value: i64) -> PyExpr {
    if value < 0 {
        PyExpr::new(value.to_string(), op::NEGATE.precedence)
    } else {
        PyExpr::atomic(value.to_string())
    }
}

/// `x is None`
pub fn is_none(value: &PyExpr) -> PyExpr {
    binary(&op::IS, value, &none())
}

/// `x is not None`
pub fn is_not_none(value: &PyExpr) -> PyExpr {
    binary(&op::IS_NOT, value, &none())
}

/// Builds a call with positional and keyword arguments
#[derive(Debug, Clone)]
pub struct PyFunctionExprBuilder {
    name: String,
    args: Vec<String>,
    kwargs: Vec<(String, String)>,
}

impl PyFunctionExprBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            kwargs: Vec::new(),
        }
    }

    pub fn add_arg(&mut self, arg: &PyExpr) -> &mut Self {
        self.args.push(arg.wrap_for(ARGUMENT_FLOOR));
        self
    }

    pub fn add_kwarg(&mut self, key: &str, value: &PyExpr) -> &mut Self {
        self.kwargs.push((key.to_string(), value.wrap_for(ARGUMENT_FLOOR)));
        self
    }

    pub fn build(&self) -> PyExpr {
        let mut parts = self.args.clone();
        parts.extend(self.kwargs.iter().map(|(k, v)| format!("{}={}", k, v)));
        PyExpr::atomic(format!("{}({})", self.name, parts.join(", ")))
    }
}
