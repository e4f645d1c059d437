//! Precedence-tagged generated expressions
//!
//! Every piece of generated JS or Python text carries the precedence of its
//! outermost operator. When a sub-expression is embedded where operands must
//! bind at precedence `R` or tighter, it is parenthesized exactly when its own
//! precedence is below `R`. Calls, literals and parenthesized groups are
//! [`Precedence::ATOMIC`] and never need wrapping.

use std::fmt;

/// Rank on a language's operator table; higher binds tighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precedence(pub u8);

impl Precedence {
    /// Calls, literals and groups
    pub const ATOMIC: Precedence = Precedence(u8::MAX);

    /// The next tighter rank (saturating at `ATOMIC`)
    pub fn tighter(self) -> Precedence {
        Precedence(self.0.saturating_add(1))
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Precedence::ATOMIC {
            write!(f, "atomic")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// How operators of equal precedence group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    /// Neither side may hold the same operator unparenthesized
    None,
}

/// A binary or prefix operator of a target language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    pub symbol: &'static str,
    pub precedence: Precedence,
    pub associativity: Associativity,
}

impl Operator {
    pub const fn new(symbol: &'static str, precedence: u8, associativity: Associativity) -> Self {
        Self {
            symbol,
            precedence: Precedence(precedence),
            associativity,
        }
    }

    /// Minimum precedence of the left operand
    pub fn lhs_floor(&self) -> Precedence {
        match self.associativity {
            Associativity::Left => self.precedence,
            Associativity::Right | Associativity::None => self.precedence.tighter(),
        }
    }

    /// Minimum precedence of the right operand
    pub fn rhs_floor(&self) -> Precedence {
        match self.associativity {
            Associativity::Right => self.precedence,
            Associativity::Left | Associativity::None => self.precedence.tighter(),
        }
    }
}

/// Generated source text plus the precedence of its outermost operator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedExpression {
    text: String,
    precedence: Precedence,
}

impl GeneratedExpression {
    pub fn new(text: impl Into<String>, precedence: Precedence) -> Self {
        Self {
            text: text.into(),
            precedence,
        }
    }

    /// A literal, identifier, call or other atom
    pub fn atomic(text: impl Into<String>) -> Self {
        Self::new(text, Precedence::ATOMIC)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Text to embed where operands must bind at `floor` or tighter
    pub fn wrap_for(&self, floor: Precedence) -> String {
        if self.precedence < floor {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }

    /// `lhs op rhs`
    pub fn binary(op: &Operator, lhs: &Self, rhs: &Self) -> Self {
        Self::new(
            format!(
                "{} {} {}",
                lhs.wrap_for(op.lhs_floor()),
                op.symbol,
                rhs.wrap_for(op.rhs_floor())
            ),
            op.precedence,
        )
    }

    /// `op operand` (prefix)
    pub fn unary(op: &Operator, operand: &Self) -> Self {
        let inner = operand.wrap_for(op.precedence);
        // `- -x`, never `--x`
        let sep = match (op.symbol.chars().last(), inner.chars().next()) {
            (Some(a), Some(b)) if a == b && (a == '-' || a == '+') => " ",
            _ => "",
        };
        Self::new(format!("{}{}{}", op.symbol, sep, inner), op.precedence)
    }

    /// `callee(args...)`; arguments are wrapped against `arg_floor`
    pub fn call(callee: &str, args: &[Self], arg_floor: Precedence) -> Self {
        let args: Vec<String> = args.iter().map(|a| a.wrap_for(arg_floor)).collect();
        Self::atomic(format!("{}({})", callee, args.join(", ")))
    }

    /// The integer this text spells, if it is a plain integer literal
    pub fn as_integer_literal(&self) -> Option<i64> {
        let text = self.text.trim();
        let text = text
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .unwrap_or(text);
        text.parse().ok()
    }
}

impl fmt::Display for GeneratedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
