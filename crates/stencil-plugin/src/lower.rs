//! Lowering entry point
//!
//! `Lowerer::lower` takes one validated call site and the arguments already
//! lowered for the active backend, validates the call against the function's
//! signature, and dispatches to the matching capability.
//!
//! User errors (bad arity, bad types, unsupported backend, invalid argument
//! values) are reported to the [`ErrorReporter`] and a placeholder artifact is
//! returned, so the surrounding compilation keeps collecting diagnostics.
//! Configuration and internal errors are returned as `Err`.

use stencil_runtime::{Slot, Value};
use stencil_types::SemanticType;

use crate::bytecode::{ExprBuilder, TypedExpr};
use crate::capability::{Backend, LoweringContext};
use crate::deferred::{DeferredValue, ValueFactory};
use crate::diagnostic::{Diagnostic, ErrorReporter, SourceLocation};
use crate::error::{ErrorClass, LowerError, LowerResult};
use crate::registry::{validate_call, FunctionEntry, FunctionRegistry};
use crate::text::{js, py, GeneratedExpression, JsExpr, PyExpr};

/// Arguments of a call, lowered for one backend
#[derive(Debug, Clone)]
pub enum BackendArgs {
    Bytecode(Vec<TypedExpr>),
    JsText(Vec<JsExpr>),
    PyText(Vec<PyExpr>),
    GenericCall(Vec<DeferredValue>),
}

impl BackendArgs {
    pub fn backend(&self) -> Backend {
        match self {
            BackendArgs::Bytecode(_) => Backend::Bytecode,
            BackendArgs::JsText(_) => Backend::JsText,
            BackendArgs::PyText(_) => Backend::PyText,
            BackendArgs::GenericCall(_) => Backend::GenericCall,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BackendArgs::Bytecode(args) => args.len(),
            BackendArgs::JsText(args) => args.len(),
            BackendArgs::PyText(args) => args.len(),
            BackendArgs::GenericCall(args) => args.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of lowering one call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendArtifact {
    /// Bytecode expression tree
    Expression(TypedExpr),
    /// JS or Python text, plus the libraries/modules it references
    Text {
        expr: GeneratedExpression,
        required_libraries: Vec<String>,
    },
    /// Generic-call description, not yet materialized
    Deferred(DeferredValue),
}

impl BackendArtifact {
    /// Placeholder standing in for a call that failed with a user error
    pub fn placeholder(backend: Backend) -> Self {
        match backend {
            Backend::Bytecode => BackendArtifact::Expression(TypedExpr::null()),
            Backend::JsText => BackendArtifact::Text {
                expr: js::null(),
                required_libraries: Vec::new(),
            },
            Backend::PyText => BackendArtifact::Text {
                expr: py::none(),
                required_libraries: Vec::new(),
            },
            Backend::GenericCall => {
                BackendArtifact::Deferred(DeferredValue::Constant(Slot::Boxed(Value::Null)))
            }
        }
    }

    pub fn as_text(&self) -> Option<&GeneratedExpression> {
        match self {
            BackendArtifact::Text { expr, .. } => Some(expr),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&TypedExpr> {
        match self {
            BackendArtifact::Expression(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn required_libraries(&self) -> &[String] {
        match self {
            BackendArtifact::Text {
                required_libraries, ..
            } => required_libraries,
            _ => &[],
        }
    }
}

/// A call site handed over by the type checker
#[derive(Debug, Clone)]
pub struct CallSite<'a> {
    pub function: &'a str,
    pub arg_types: &'a [SemanticType],
    pub location: SourceLocation,
    /// First bytecode local the call may use
    pub first_local: u16,
}

impl<'a> CallSite<'a> {
    pub fn new(function: &'a str, arg_types: &'a [SemanticType], location: SourceLocation) -> Self {
        Self {
            function,
            arg_types,
            location,
            first_local: 0,
        }
    }

    pub fn with_first_local(mut self, first_local: u16) -> Self {
        self.first_local = first_local;
        self
    }
}

/// Dispatches calls to capabilities of a frozen registry
#[derive(Debug, Clone, Copy)]
pub struct Lowerer<'r> {
    registry: &'r FunctionRegistry,
}

impl<'r> Lowerer<'r> {
    pub fn new(registry: &'r FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r FunctionRegistry {
        self.registry
    }

    /// Lower one call
    pub fn lower(
        &self,
        site: &CallSite<'_>,
        args: BackendArgs,
        reporter: &mut dyn ErrorReporter,
    ) -> LowerResult<BackendArtifact> {
        let backend = args.backend();
        let span = tracing::debug_span!("lower", function = site.function, backend = %backend);
        let _enter = span.enter();

        match self.try_lower(site, args) {
            Ok(artifact) => {
                tracing::trace!("lowered");
                Ok(artifact)
            }
            Err(err) if err.class() == ErrorClass::User => {
                tracing::debug!(error = %err, "reported user error");
                reporter.report(Diagnostic::from_lower_error(&err, site.location));
                Ok(BackendArtifact::placeholder(backend))
            }
            Err(err) => {
                tracing::debug!(error = %err, "lowering aborted");
                Err(err)
            }
        }
    }

    fn try_lower(&self, site: &CallSite<'_>, args: BackendArgs) -> LowerResult<BackendArtifact> {
        if site.arg_types.len() != args.len() {
            return Err(LowerError::internal(format!(
                "call to '{}' has {} argument type(s) for {} argument(s)",
                site.function,
                site.arg_types.len(),
                args.len()
            )));
        }

        let entry = self.registry.resolve(site.function)?;
        let overload = validate_call(entry.signature(), site.arg_types)?;
        let return_type = overload.return_type.clone();

        self.dispatch(site, entry, args, return_type)
            .map_err(|err| match err {
                LowerError::ArityMismatch { .. } => LowerError::internal(format!(
                    "arity inconsistency discovered while lowering: {}",
                    err
                )),
                other => other,
            })
    }

    fn dispatch(
        &self,
        site: &CallSite<'_>,
        entry: &FunctionEntry,
        args: BackendArgs,
        return_type: SemanticType,
    ) -> LowerResult<BackendArtifact> {
        let function = site.function;
        let caps = entry.capabilities();
        let config = self.registry.config();
        let ctx = LoweringContext::new(function, config);
        let unsupported = |backend| LowerError::UnsupportedBackend {
            function: function.to_string(),
            backend,
        };

        match args {
            BackendArgs::Bytecode(args) => {
                if let Some(capability) = caps.bytecode() {
                    let mut builder = ExprBuilder::new(function, config, entry.runtimes())
                        .with_first_local(site.first_local);
                    let lowered = capability.lower(&mut builder, args)?;
                    return Ok(BackendArtifact::Expression(narrowed(lowered, return_type)));
                }
                let capability = caps.generic().ok_or_else(|| unsupported(Backend::Bytecode))?;
                tracing::trace!("no bytecode capability, materializing generic call");
                let factory = ValueFactory::new(function, entry.runtimes());
                let args = args.into_iter().map(DeferredValue::Leaf).collect();
                let deferred = capability.lower(&factory, args, &ctx)?;
                Ok(BackendArtifact::Expression(narrowed(
                    deferred.materialize()?,
                    return_type,
                )))
            }
            BackendArgs::JsText(args) => {
                let capability = caps.js().ok_or_else(|| unsupported(Backend::JsText))?;
                let expr = capability.lower(&ctx, &args)?;
                Ok(BackendArtifact::Text {
                    expr,
                    required_libraries: dedup(capability.required_libraries(&ctx, &args)),
                })
            }
            BackendArgs::PyText(args) => {
                let capability = caps.python().ok_or_else(|| unsupported(Backend::PyText))?;
                let expr = capability.lower(&ctx, &args)?;
                Ok(BackendArtifact::Text {
                    expr,
                    required_libraries: dedup(capability.required_modules(&ctx, &args)),
                })
            }
            BackendArgs::GenericCall(args) => {
                let capability = caps.generic().ok_or_else(|| unsupported(Backend::GenericCall))?;
                let factory = ValueFactory::new(function, entry.runtimes());
                Ok(BackendArtifact::Deferred(capability.lower(&factory, args, &ctx)?))
            }
        }
    }
}

/// Keep the lowered type only when it is strictly more specific than `declared`
fn narrowed(lowered: TypedExpr, declared: SemanticType) -> TypedExpr {
    let ty = &lowered.ty;
    let narrower = declared.is_assignable_from(ty) && !ty.is_assignable_from(&declared);
    if *ty == declared || narrower {
        lowered
    } else {
        lowered.with_type(declared)
    }
}

fn dedup(mut names: Vec<String>) -> Vec<String> {
    let mut seen = rustc_hash::FxHashSet::default();
    names.retain(|name| seen.insert(name.clone()));
    names
}
