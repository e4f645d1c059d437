//! Method references
//!
//! A `MethodRef` is a routine looked up once in the [`RoutineTable`] when a
//! plugin is constructed, then shared read-only by every compilation that
//! lowers a call to it. A failed lookup is a configuration error: the plugin
//! cannot be registered at all.

use std::fmt;
use std::sync::Arc;

use stencil_runtime::{Repr, Routine, RoutineTable};

use crate::bytecode::Expr;
use crate::error::{LowerError, LowerResult};

/// A resolved, immutable handle to a helper routine
#[derive(Clone)]
pub struct MethodRef {
    routine: Arc<Routine>,
    cheap: bool,
}

impl MethodRef {
    /// Resolve `owner.name(params...)` in the routine table
    pub fn resolve(
        table: &RoutineTable,
        owner: &str,
        name: &str,
        params: &[Repr],
    ) -> LowerResult<Self> {
        let routine = table.lookup(owner, name, params).ok_or_else(|| {
            let params: Vec<String> = params.iter().map(Repr::to_string).collect();
            LowerError::configuration(format!(
                "no routine {}.{}({}) is registered",
                owner,
                name,
                params.join(", ")
            ))
        })?;
        tracing::trace!(routine = %routine, "resolved method reference");
        Ok(Self {
            routine,
            cheap: false,
        })
    }

    /// Mark the routine as cheap enough to call repeatedly instead of
    /// caching its result in a local
    ///
    /// The flag is trusted as declared; nothing checks the routine is
    /// actually free of side effects.
    pub fn as_cheap(mut self) -> Self {
        self.cheap = true;
        self
    }

    pub fn is_cheap(&self) -> bool {
        self.cheap
    }

    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    pub fn owner(&self) -> &str {
        self.routine.owner()
    }

    pub fn name(&self) -> &str {
        self.routine.name()
    }

    pub fn params(&self) -> &[Repr] {
        self.routine.params()
    }

    pub fn arity(&self) -> usize {
        self.routine.params().len()
    }

    pub fn ret(&self) -> Repr {
        self.routine.ret()
    }

    pub fn is_instance(&self) -> bool {
        self.routine.is_instance()
    }

    /// Build a call of this routine over already-coerced arguments
    ///
    /// Arguments must match the declared parameter representations exactly;
    /// anything else is a bug in the calling plugin.
    pub fn invoke(&self, args: Vec<Expr>) -> LowerResult<Expr> {
        if args.len() != self.arity() {
            return Err(LowerError::internal(format!(
                "{} takes {} argument(s), got {}",
                self.routine,
                self.arity(),
                args.len()
            )));
        }
        for (i, (arg, expected)) in args.iter().zip(self.params()).enumerate() {
            if arg.repr() != *expected {
                return Err(LowerError::internal(format!(
                    "argument {} of {} is {}, expected {}",
                    i,
                    self.routine,
                    arg.repr(),
                    expected
                )));
            }
        }
        Ok(Expr::Invoke {
            method: self.clone(),
            args,
        })
    }
}

impl PartialEq for MethodRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.routine, &other.routine) && self.cheap == other.cheap
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner(), self.name())
    }
}

impl fmt::Debug for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MethodRef({}{})",
            self.routine,
            if self.cheap { ", cheap" } else { "" }
        )
    }
}
