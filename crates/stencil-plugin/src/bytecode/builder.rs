//! Per-call-site expression builder
//!
//! Handed to a [`BytecodeLowering`](crate::capability::BytecodeLowering)
//! for the duration of one call site. Hands out fresh locals and checks that
//! instance routines only target runtimes registered for the function.

use stencil_runtime::Repr;

use crate::bytecode::expr::Expr;
use crate::config::LoweringConfig;
use crate::error::{LowerError, LowerResult};
use crate::method_ref::MethodRef;

/// Builder state for one lowering operation
pub struct ExprBuilder<'a> {
    function: &'a str,
    config: &'a LoweringConfig,
    runtimes: &'a [String],
    next_local: u16,
}

/// Result of [`ExprBuilder::cache`]
#[derive(Debug, Clone, PartialEq)]
pub enum Cached {
    /// Cheap enough to repeat at every use
    Inline(Expr),
    /// Bound once to a local
    Bound { index: u16, value: Expr },
}

impl Cached {
    /// An expression reading the cached value
    pub fn reference(&self) -> Expr {
        match self {
            Cached::Inline(expr) => expr.clone(),
            Cached::Bound { index, value } => Expr::Local {
                index: *index,
                repr: value.repr(),
            },
        }
    }

    /// Wrap `body` so the binding (if any) is in scope
    pub fn finish(self, body: Expr) -> Expr {
        match self {
            Cached::Inline(_) => body,
            Cached::Bound { index, value } => Expr::Let {
                index,
                value: Box::new(value),
                body: Box::new(body),
            },
        }
    }
}

impl<'a> ExprBuilder<'a> {
    pub fn new(function: &'a str, config: &'a LoweringConfig, runtimes: &'a [String]) -> Self {
        Self {
            function,
            config,
            runtimes,
            next_local: 0,
        }
    }

    /// Start numbering locals at `first` (locals below it belong to the caller)
    pub fn with_first_local(mut self, first: u16) -> Self {
        self.next_local = first;
        self
    }

    /// Name of the function being lowered
    pub fn function(&self) -> &str {
        self.function
    }

    pub fn config(&self) -> &LoweringConfig {
        self.config
    }

    /// One past the highest local handed out so far
    pub fn locals_used(&self) -> u16 {
        self.next_local
    }

    /// Allocate a local slot
    pub fn fresh_local(&mut self) -> LowerResult<u16> {
        let index = self.next_local;
        self.next_local = index
            .checked_add(1)
            .ok_or_else(|| LowerError::internal("too many locals in one expression"))?;
        Ok(index)
    }

    /// Make `expr` safe to use more than once
    ///
    /// Cheap expressions are duplicated; anything else is evaluated once into
    /// a fresh local.
    pub fn cache(&mut self, expr: Expr) -> LowerResult<Cached> {
        if expr.is_cheap() {
            return Ok(Cached::Inline(expr));
        }
        let index = self.fresh_local()?;
        tracing::trace!(
            function = self.function,
            local = index,
            "caching expression in local"
        );
        Ok(Cached::Bound { index, value: expr })
    }

    /// Call `method`, coercing each argument to the declared parameter
    /// representation
    pub fn invoke(&self, method: &MethodRef, args: Vec<Expr>) -> LowerResult<Expr> {
        if method.is_instance() && !self.has_runtime(method.owner()) {
            return Err(LowerError::UnregisteredRuntime {
                function: self.function.to_string(),
                owner: method.owner().to_string(),
            });
        }
        let args = args
            .into_iter()
            .zip(method.params())
            .map(|(arg, repr)| arg.coerce(*repr))
            .collect::<LowerResult<Vec<_>>>()?;
        method.invoke(args)
    }

    /// Is a runtime object registered for `owner` on this function?
    pub fn has_runtime(&self, owner: &str) -> bool {
        self.runtimes.iter().any(|r| r == owner)
    }

    /// Should numeric fast paths be used for operands of representation `repr`?
    pub fn specializes(&self, repr: Repr) -> bool {
        self.config.bytecode.specialize_numeric && repr.is_native_numeric()
    }
}
