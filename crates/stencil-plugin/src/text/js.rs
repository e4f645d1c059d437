//! JavaScript expressions
//!
//! Operator ranks follow the ECMAScript grammar: comma is the loosest,
//! member access and calls are atomic.

use super::precedence::{Associativity, GeneratedExpression, Operator, Precedence};

/// Generated JavaScript expression
pub type JsExpr = GeneratedExpression;

/// JavaScript operator table
pub mod op {
    use super::{Associativity, Operator};

    pub const CONDITIONAL: Operator = Operator::new("?:", 2, Associativity::Right);
    pub const OR: Operator = Operator::new("||", 3, Associativity::Left);
    pub const AND: Operator = Operator::new("&&", 4, Associativity::Left);
    pub const EQUAL: Operator = Operator::new("==", 8, Associativity::Left);
    pub const NOT_EQUAL: Operator = Operator::new("!=", 8, Associativity::Left);
    pub const STRICT_EQUAL: Operator = Operator::new("===", 8, Associativity::Left);
    pub const STRICT_NOT_EQUAL: Operator = Operator::new("!==", 8, Associativity::Left);
    pub const LESS_THAN: Operator = Operator::new("<", 9, Associativity::Left);
    pub const LESS_THAN_OR_EQUAL: Operator = Operator::new("<=", 9, Associativity::Left);
    pub const GREATER_THAN: Operator = Operator::new(">", 9, Associativity::Left);
    pub const GREATER_THAN_OR_EQUAL: Operator = Operator::new(">=", 9, Associativity::Left);
    pub const PLUS: Operator = Operator::new("+", 11, Associativity::Left);
    pub const MINUS: Operator = Operator::new("-", 11, Associativity::Left);
    pub const TIMES: Operator = Operator::new("*", 12, Associativity::Left);
    pub const DIVIDE: Operator = Operator::new("/", 12, Associativity::Left);
    pub const MOD: Operator = Operator::new("%", 12, Associativity::Left);
    pub const NEGATE: Operator = Operator::new("-", 14, Associativity::Right);
    pub const NOT: Operator = Operator::new("!", 14, Associativity::Right);
}

/// Arguments are assignment expressions: anything tighter than the comma
pub const ARGUMENT_FLOOR: Precedence = Precedence(2);

/// `callee(args...)`
pub fn call(callee: &str, args: &[JsExpr]) -> JsExpr {
    GeneratedExpression::call(callee, args, ARGUMENT_FLOOR)
}

/// `cond ? then : otherwise`
pub fn conditional(cond: &JsExpr, then: &JsExpr, otherwise: &JsExpr) -> JsExpr {
    let floor = op::CONDITIONAL.precedence;
    JsExpr::new(
        format!(
            "{} ? {} : {}",
            cond.wrap_for(floor.tighter()),
            then.wrap_for(floor),
            otherwise.wrap_for(floor)
        ),
        floor,
    )
}

pub fn binary(op: &Operator, lhs: &JsExpr, rhs: &JsExpr) -> JsExpr {
    GeneratedExpression::binary(op, lhs, rhs)
}

pub fn unary(op: &Operator, operand: &JsExpr) -> JsExpr {
    GeneratedExpression::unary(op, operand)
}

pub fn null() -> JsExpr {
    JsExpr::atomic("null")
}

/// Integer literal; negative numbers carry unary precedence
pub fn integer(value: i64) -> JsExpr {
    if value < 0 {
        JsExpr::new(value.to_string(), op::NEGATE.precedence)
    } else {
        JsExpr::atomic(value.to_string())
    }
}

/// `x == null`, true for both null and undefined
pub fn is_null(value: &JsExpr) -> JsExpr {
    binary(&op::EQUAL, value, &null())
}

/// `x != null`
pub fn is_not_null(value: &JsExpr) -> JsExpr {
    binary(&op::NOT_EQUAL, value, &null())
}
